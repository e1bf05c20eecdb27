//! JSON conformance report output.

use std::path::{Path, PathBuf};

use anyhow::Result;
use chrono::Utc;
use serde::Serialize;

use lrs_model::{GroupedNonconformities, Nonconformity, ValidationOutcome};

#[derive(Debug, Serialize)]
pub struct ConformanceReportPayload<'a> {
    pub schema: &'static str,
    pub schema_version: u32,
    pub generated_at: String,
    pub trial_criteria_type: String,
    pub nonconformity_count: usize,
    pub global_count: usize,
    pub nonconformities: &'a [Nonconformity],
    pub grouped: &'a GroupedNonconformities,
    pub max_targets: Option<u32>,
    pub max_new_targets: Option<u32>,
}

const REPORT_SCHEMA: &str = "lesion-review-studio.conformance-report";
const REPORT_SCHEMA_VERSION: u32 = 1;

pub fn write_conformance_report_json(
    output_dir: &Path,
    trial_criteria_type: &str,
    outcome: &ValidationOutcome,
) -> Result<PathBuf> {
    std::fs::create_dir_all(output_dir)?;
    let output_path = output_dir.join("conformance_report.json");
    let payload = ConformanceReportPayload {
        schema: REPORT_SCHEMA,
        schema_version: REPORT_SCHEMA_VERSION,
        generated_at: Utc::now().to_rfc3339(),
        trial_criteria_type: trial_criteria_type.to_string(),
        nonconformity_count: outcome.nonconformities.len(),
        global_count: outcome.grouped.globals.len(),
        nonconformities: &outcome.nonconformities,
        grouped: &outcome.grouped,
        max_targets: outcome.max_targets,
        max_new_targets: outcome.max_new_targets,
    };
    let json = serde_json::to_string_pretty(&payload)?;
    std::fs::write(&output_path, format!("{json}\n"))?;
    Ok(output_path)
}
