use lrs_model::{GroupedNonconformities, Nonconformity};

use crate::api::MeasurementApi;

/// Partition nonconformities into presentation groups.
///
/// Global violations contribute only their message to the `globals` list.
/// A non-global violation fans out over each of its measurements: the
/// group name comes from the tools-groups map, and entries within a group
/// are bucketed by measurement number. A nonconformity with N measurements
/// can therefore appear in up to N distinct buckets.
pub fn group_nonconformities(
    nonconformities: &[Nonconformity],
    measurement_api: &dyn MeasurementApi,
) -> GroupedNonconformities {
    let mut grouped = GroupedNonconformities::default();

    for nonconformity in nonconformities {
        if nonconformity.is_global {
            grouped.globals.push(nonconformity.message.clone());
            continue;
        }

        for measurement in &nonconformity.measurements {
            let Some(group_name) = measurement_api.tool_group(&measurement.tool_type) else {
                tracing::warn!(
                    tool_type = %measurement.tool_type,
                    "measurement tool type has no tool-group mapping, skipping"
                );
                continue;
            };
            let bucket = grouped
                .groups
                .entry(group_name)
                .or_default()
                .measurement_numbers
                .entry(measurement.measurement_number)
                .or_default();
            bucket.messages.push(nonconformity.message.clone());
            bucket.measurements.push(measurement.clone());
        }
    }

    grouped
}
