use lrs_model::{InstanceSnapshot, LesionCategory, Measurement, Timepoint};

/// One measurement with its resolved timepoint and the first-instance
/// snapshot of its owning study.
#[derive(Debug, Clone, PartialEq)]
pub struct DatasetEntry {
    pub measurement: Measurement,
    pub timepoint: Timepoint,
    pub instance: Option<InstanceSnapshot>,
}

/// Transient aggregate of target and non-target entries for one timepoint
/// scope. Constructed fresh per validation run and discarded after use.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Dataset {
    pub targets: Vec<DatasetEntry>,
    pub non_targets: Vec<DatasetEntry>,
}

impl Dataset {
    /// Combined dataset: baseline entries followed by follow-up entries,
    /// without deduplication.
    pub fn merged(baseline: &Dataset, followup: &Dataset) -> Dataset {
        let mut merged = Dataset::default();
        merged.targets.extend(baseline.targets.iter().cloned());
        merged.targets.extend(followup.targets.iter().cloned());
        merged
            .non_targets
            .extend(baseline.non_targets.iter().cloned());
        merged
            .non_targets
            .extend(followup.non_targets.iter().cloned());
        merged
    }

    pub fn category(&self, category: LesionCategory) -> &[DatasetEntry] {
        match category {
            LesionCategory::Targets => &self.targets,
            LesionCategory::NonTargets => &self.non_targets,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.targets.is_empty() && self.non_targets.is_empty()
    }
}
