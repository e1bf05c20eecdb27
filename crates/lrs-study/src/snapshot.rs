use lrs_model::{InstanceSnapshot, StudyMetadata};

/// Derives a representative image record from a loaded study.
pub trait InstanceSnapshotSource: Send + Sync {
    /// The representative record, or `None` when the study has no
    /// instances.
    fn first_instance(&self, study: &StudyMetadata) -> Option<InstanceSnapshot>;
}

/// Default snapshot source: the first instance of the first non-empty
/// series, after sorting.
#[derive(Debug, Clone, Copy, Default)]
pub struct FirstInstanceSnapshot;

impl InstanceSnapshotSource for FirstInstanceSnapshot {
    fn first_instance(&self, study: &StudyMetadata) -> Option<InstanceSnapshot> {
        let series = study.series.iter().find(|series| !series.instances.is_empty())?;
        let instance = series.instances.first()?;
        Some(InstanceSnapshot {
            study_instance_uid: study.study_instance_uid.clone(),
            series_instance_uid: series.series_instance_uid.clone(),
            sop_instance_uid: instance.sop_instance_uid.clone(),
            modality: series.modality.clone(),
        })
    }
}
