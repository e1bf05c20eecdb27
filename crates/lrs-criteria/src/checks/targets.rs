use std::collections::{BTreeMap, BTreeSet};

use lrs_model::{Nonconformity, TimepointId};

use crate::dataset::{Dataset, DatasetEntry};
use crate::evaluator::CriteriaEvaluator;

/// Caps the number of distinct target lesions measured at any single
/// timepoint.
#[derive(Debug, Clone, Copy)]
pub struct TargetCountEvaluator {
    max_targets: u32,
}

impl TargetCountEvaluator {
    pub fn new(max_targets: u32) -> Self {
        Self { max_targets }
    }
}

impl CriteriaEvaluator for TargetCountEvaluator {
    fn max_targets(&self, new_lesions: bool) -> Option<u32> {
        (!new_lesions).then_some(self.max_targets)
    }

    fn evaluate(&self, dataset: &Dataset) -> Vec<Nonconformity> {
        let mut by_timepoint: BTreeMap<&TimepointId, Vec<&DatasetEntry>> = BTreeMap::new();
        for entry in &dataset.targets {
            by_timepoint
                .entry(&entry.timepoint.timepoint_id)
                .or_default()
                .push(entry);
        }

        let mut nonconformities = Vec::new();
        for (timepoint_id, entries) in by_timepoint {
            let numbers: BTreeSet<u32> = entries
                .iter()
                .map(|entry| entry.measurement.measurement_number)
                .collect();
            if numbers.len() > self.max_targets as usize {
                nonconformities.push(Nonconformity::with_measurements(
                    format!(
                        "Timepoint {timepoint_id} has {} target lesions; at most {} are allowed",
                        numbers.len(),
                        self.max_targets
                    ),
                    entries
                        .iter()
                        .map(|entry| entry.measurement.clone())
                        .collect(),
                ));
            }
        }
        nonconformities
    }
}

/// Requires at least one measured target lesion.
#[derive(Debug, Clone, Copy, Default)]
pub struct TargetsRequiredEvaluator;

impl CriteriaEvaluator for TargetsRequiredEvaluator {
    fn evaluate(&self, dataset: &Dataset) -> Vec<Nonconformity> {
        if dataset.targets.is_empty() {
            vec![Nonconformity::global(
                "At least one target lesion must be measured at baseline",
            )]
        } else {
            Vec::new()
        }
    }
}
