use comfy_table::modifiers::{UTF8_ROUND_CORNERS, UTF8_SOLID_INNER_BORDERS};
use comfy_table::presets::UTF8_FULL;
use comfy_table::{
    Attribute, Cell, CellAlignment, Color, ColumnConstraint, ContentArrangement, Table, Width,
};

use crate::commands::ValidateRun;

pub fn print_summary(run: &ValidateRun) {
    println!("Case: {}", run.case_folder.display());
    println!("Criteria: {}", run.criteria);
    println!("Studies loaded: {}", run.studies_loaded);
    if let Some(limit) = run.outcome.max_targets {
        println!("Max targets: {limit}");
    }
    if let Some(limit) = run.outcome.max_new_targets {
        println!("Max new targets: {limit}");
    }
    if let Some(path) = &run.report_path {
        println!("Conformance report: {}", path.display());
    }

    if run.outcome.is_conformant() {
        println!("No nonconformities found.");
        return;
    }

    if !run.outcome.grouped.globals.is_empty() {
        println!();
        println!("Global nonconformities:");
        for message in &run.outcome.grouped.globals {
            println!("- {message}");
        }
    }

    if run.outcome.grouped.groups.is_empty() {
        return;
    }

    let mut table = Table::new();
    table.set_header(vec![
        header_cell("Group"),
        header_cell("Measurement"),
        header_cell("Findings"),
        header_cell("Messages"),
    ]);
    apply_table_style(&mut table);
    align_column(&mut table, 1, CellAlignment::Right);
    align_column(&mut table, 2, CellAlignment::Right);

    for (group_name, group) in &run.outcome.grouped.groups {
        for (measurement_number, bucket) in &group.measurement_numbers {
            table.add_row(vec![
                Cell::new(group_name)
                    .fg(Color::Blue)
                    .add_attribute(Attribute::Bold),
                Cell::new(measurement_number),
                Cell::new(bucket.messages.len()).fg(Color::Red),
                Cell::new(bucket.messages.join("\n")),
            ]);
        }
    }

    println!();
    println!("Nonconformities:");
    println!("{table}");
}

fn apply_table_style(table: &mut Table) {
    table
        .load_preset(UTF8_FULL)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .apply_modifier(UTF8_SOLID_INNER_BORDERS)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_width(120);
    if table.column_count() >= 4 {
        table.set_constraints(vec![
            ColumnConstraint::UpperBoundary(Width::Fixed(16)),
            ColumnConstraint::LowerBoundary(Width::Fixed(6)),
            ColumnConstraint::LowerBoundary(Width::Fixed(6)),
            ColumnConstraint::UpperBoundary(Width::Percentage(60)),
        ]);
    }
}

fn align_column(table: &mut Table, index: usize, alignment: CellAlignment) {
    if let Some(column) = table.column_mut(index) {
        column.set_cell_alignment(alignment);
    }
}

fn header_cell(label: &str) -> Cell {
    Cell::new(label)
        .fg(Color::Cyan)
        .add_attribute(Attribute::Bold)
}
