use std::collections::{BTreeMap, BTreeSet};

use lrs_model::{Measurement, Nonconformity, TimepointId, TimepointType};

use crate::dataset::Dataset;
use crate::evaluator::CriteriaEvaluator;

/// Baseline target measurements grouped by measurement number.
fn baseline_targets(dataset: &Dataset) -> BTreeMap<u32, Vec<&Measurement>> {
    let mut by_number: BTreeMap<u32, Vec<&Measurement>> = BTreeMap::new();
    for entry in &dataset.targets {
        if entry.timepoint.timepoint_type == TimepointType::Baseline {
            by_number
                .entry(entry.measurement.measurement_number)
                .or_default()
                .push(&entry.measurement);
        }
    }
    by_number
}

/// Distinct follow-up timepoints appearing anywhere in the dataset.
fn followup_timepoints(dataset: &Dataset) -> BTreeSet<&TimepointId> {
    dataset
        .targets
        .iter()
        .chain(dataset.non_targets.iter())
        .filter(|entry| entry.timepoint.timepoint_type == TimepointType::Followup)
        .map(|entry| &entry.timepoint.timepoint_id)
        .collect()
}

/// Caps new target lesions: target numbers first seen at follow-up.
///
/// Operates on the combined dataset so baseline and follow-up entries can
/// be compared.
#[derive(Debug, Clone, Copy)]
pub struct NewTargetCountEvaluator {
    max_new_targets: u32,
}

impl NewTargetCountEvaluator {
    pub fn new(max_new_targets: u32) -> Self {
        Self { max_new_targets }
    }
}

impl CriteriaEvaluator for NewTargetCountEvaluator {
    fn max_targets(&self, new_lesions: bool) -> Option<u32> {
        new_lesions.then_some(self.max_new_targets)
    }

    fn evaluate(&self, dataset: &Dataset) -> Vec<Nonconformity> {
        let baseline_numbers: BTreeSet<u32> = baseline_targets(dataset).into_keys().collect();

        let mut new_numbers = BTreeSet::new();
        let mut new_measurements = Vec::new();
        for entry in &dataset.targets {
            if entry.timepoint.timepoint_type != TimepointType::Followup {
                continue;
            }
            let number = entry.measurement.measurement_number;
            if baseline_numbers.contains(&number) {
                continue;
            }
            new_numbers.insert(number);
            new_measurements.push(entry.measurement.clone());
        }

        if new_numbers.len() > self.max_new_targets as usize {
            vec![Nonconformity::with_measurements(
                format!(
                    "{} new target lesions recorded at follow-up; at most {} are allowed",
                    new_numbers.len(),
                    self.max_new_targets
                ),
                new_measurements,
            )]
        } else {
            Vec::new()
        }
    }
}

/// Requires every baseline target lesion to be re-assessed at every
/// follow-up timepoint.
#[derive(Debug, Clone, Copy, Default)]
pub struct TargetTrackingEvaluator;

impl CriteriaEvaluator for TargetTrackingEvaluator {
    fn evaluate(&self, dataset: &Dataset) -> Vec<Nonconformity> {
        let baseline = baseline_targets(dataset);
        let followups = followup_timepoints(dataset);

        let assessed: BTreeSet<(u32, &TimepointId)> = dataset
            .targets
            .iter()
            .filter(|entry| entry.timepoint.timepoint_type == TimepointType::Followup)
            .map(|entry| {
                (
                    entry.measurement.measurement_number,
                    &entry.timepoint.timepoint_id,
                )
            })
            .collect();

        let mut nonconformities = Vec::new();
        for (number, measurements) in &baseline {
            for timepoint_id in &followups {
                if !assessed.contains(&(*number, *timepoint_id)) {
                    nonconformities.push(Nonconformity::with_measurements(
                        format!(
                            "Target lesion {number} was not re-assessed at timepoint {timepoint_id}"
                        ),
                        measurements
                            .iter()
                            .map(|measurement| (*measurement).clone())
                            .collect(),
                    ));
                }
            }
        }
        nonconformities
    }
}
