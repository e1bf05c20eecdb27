//! Structuring of raw study payloads into `StudyMetadata`.

use lrs_model::{InstanceMetadata, SeriesMetadata, StudyMetadata};

use crate::raw::RawStudy;

/// Wrap sorted raw data in a structured metadata object. Display sets are
/// attached separately by the loader.
pub fn structure_study(raw: RawStudy) -> StudyMetadata {
    StudyMetadata {
        study_instance_uid: raw.study_instance_uid,
        patient_id: raw.patient_id,
        patient_name: raw.patient_name,
        study_description: raw.study_description,
        study_date: raw.study_date,
        series: raw
            .series
            .into_iter()
            .map(|series| SeriesMetadata {
                series_instance_uid: series.series_instance_uid,
                series_number: series.series_number,
                series_description: series.series_description,
                modality: series.modality,
                instances: series
                    .instances
                    .into_iter()
                    .map(|instance| InstanceMetadata {
                        sop_instance_uid: instance.sop_instance_uid,
                        instance_number: instance.instance_number,
                        rows: instance.rows,
                        columns: instance.columns,
                    })
                    .collect(),
            })
            .collect(),
        display_sets: Vec::new(),
    }
}
