//! Display-set construction.

use lrs_model::{DisplaySet, StudyMetadata};

/// Compute display-set groupings for a structured study: one display set
/// per non-empty series, in series order. The study's series must already
/// be sorted.
pub fn build_display_sets(study: &StudyMetadata) -> Vec<DisplaySet> {
    study
        .series
        .iter()
        .filter(|series| !series.instances.is_empty())
        .map(|series| DisplaySet {
            display_set_instance_uid: series.series_instance_uid.clone(),
            series_instance_uid: series.series_instance_uid.clone(),
            modality: series.modality.clone(),
            series_number: series.series_number,
            image_count: series.instances.len(),
        })
        .collect()
}
