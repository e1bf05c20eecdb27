//! Conformance validation over merged measurement datasets.

use std::sync::Arc;

use futures::FutureExt;
use futures::future::{self, BoxFuture};
use tokio::sync::watch;

use lrs_model::{LesionCategory, Nonconformity, TimepointScope, ValidationOutcome};
use lrs_study::{FirstInstanceSnapshot, InstanceSnapshotSource, Server, StudyLoader};

use crate::api::{MeasurementApi, TimepointApi};
use crate::dataset::{Dataset, DatasetEntry};
use crate::error::ValidateError;
use crate::grouping::group_nonconformities;
use crate::registry::CriteriaRegistry;

/// Most recently observed max-target limits across the evaluators of one
/// validation run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MaxTargetCounts {
    pub existing: Option<u32>,
    pub new_lesions: Option<u32>,
}

/// Checks measurement data against a trial's conformance criteria.
pub struct CriteriaValidator {
    measurement_api: Arc<dyn MeasurementApi>,
    timepoint_api: Arc<dyn TimepointApi>,
    loader: Arc<StudyLoader>,
    registry: Arc<CriteriaRegistry>,
    snapshots: Arc<dyn InstanceSnapshotSource>,
    server: Server,
    outcome_tx: watch::Sender<Option<Arc<ValidationOutcome>>>,
}

impl CriteriaValidator {
    pub fn new(
        measurement_api: Arc<dyn MeasurementApi>,
        timepoint_api: Arc<dyn TimepointApi>,
        loader: Arc<StudyLoader>,
        registry: Arc<CriteriaRegistry>,
        server: Server,
    ) -> Self {
        let (outcome_tx, _) = watch::channel(None);
        Self {
            measurement_api,
            timepoint_api,
            loader,
            registry,
            snapshots: Arc::new(FirstInstanceSnapshot),
            server,
            outcome_tx,
        }
    }

    /// Replace the default first-instance snapshot source.
    pub fn with_snapshot_source(mut self, snapshots: Arc<dyn InstanceSnapshotSource>) -> Self {
        self.snapshots = snapshots;
        self
    }

    pub fn registry(&self) -> &Arc<CriteriaRegistry> {
        &self.registry
    }

    pub fn loader(&self) -> &Arc<StudyLoader> {
        &self.loader
    }

    /// Observe outcomes of subsequent `validate` calls.
    pub fn subscribe(&self) -> watch::Receiver<Option<Arc<ValidationOutcome>>> {
        self.outcome_tx.subscribe()
    }

    /// Validate all measurement data against the rule sets registered for
    /// a trial criteria type.
    ///
    /// Baseline and follow-up datasets are built concurrently and must
    /// both fully resolve before any evaluator runs; a single failing
    /// study load fails the whole call. Nonconformities are returned in
    /// the order baseline, follow-up, combined.
    pub async fn validate(
        &self,
        trial_criteria_type: &str,
    ) -> Result<ValidationOutcome, ValidateError> {
        tracing::debug!(criteria = trial_criteria_type, "validating measurement conformance");
        let (baseline, followup) = future::try_join(
            self.build_data(TimepointScope::Baseline),
            self.build_data(TimepointScope::Followup),
        )
        .await?;
        let merged = Dataset::merged(&baseline, &followup);

        let mut max_targets = MaxTargetCounts::default();
        let combined_results = self.validate_timepoint(
            TimepointScope::Both,
            trial_criteria_type,
            &merged,
            &mut max_targets,
        );
        let baseline_results = self.validate_timepoint(
            TimepointScope::Baseline,
            trial_criteria_type,
            &baseline,
            &mut max_targets,
        );
        let followup_results = self.validate_timepoint(
            TimepointScope::Followup,
            trial_criteria_type,
            &followup,
            &mut max_targets,
        );

        let mut nonconformities = baseline_results;
        nonconformities.extend(followup_results);
        nonconformities.extend(combined_results);

        let grouped = group_nonconformities(&nonconformities, self.measurement_api.as_ref());
        let outcome = ValidationOutcome {
            nonconformities,
            grouped,
            max_targets: max_targets.existing,
            max_new_targets: max_targets.new_lesions,
        };
        self.outcome_tx.send_replace(Some(Arc::new(outcome.clone())));
        tracing::debug!(
            criteria = trial_criteria_type,
            nonconformities = outcome.nonconformities.len(),
            "criteria validation finished"
        );
        Ok(outcome)
    }

    /// Run the evaluators registered for one scope against a dataset,
    /// recording any max-target limits they report.
    pub fn validate_timepoint(
        &self,
        scope: TimepointScope,
        trial_criteria_type: &str,
        dataset: &Dataset,
        max_targets: &mut MaxTargetCounts,
    ) -> Vec<Nonconformity> {
        let mut nonconformities = Vec::new();
        for evaluator in self.registry.evaluators(trial_criteria_type, scope) {
            if let Some(limit) = evaluator.max_targets(false) {
                max_targets.existing = Some(limit);
            }
            if let Some(limit) = evaluator.max_targets(true) {
                max_targets.new_lesions = Some(limit);
            }
            nonconformities.extend(evaluator.evaluate(dataset));
        }
        nonconformities
    }

    /// Build the dataset for one timepoint scope.
    ///
    /// Measurements without a resolvable timepoint are silently excluded.
    /// Study loads for both categories are issued eagerly and jointly
    /// awaited; any failure rejects the whole build.
    pub async fn build_data(&self, scope: TimepointScope) -> Result<Dataset, ValidateError> {
        let target_loads = self.dataset_loads(LesionCategory::Targets, scope);
        let non_target_loads = self.dataset_loads(LesionCategory::NonTargets, scope);
        let (targets, non_targets) = future::try_join(
            future::try_join_all(target_loads),
            future::try_join_all(non_target_loads),
        )
        .await?;
        Ok(Dataset {
            targets,
            non_targets,
        })
    }

    fn dataset_loads(
        &self,
        category: LesionCategory,
        scope: TimepointScope,
    ) -> Vec<BoxFuture<'_, Result<DatasetEntry, ValidateError>>> {
        self.measurement_api
            .fetch(category)
            .into_iter()
            .filter_map(|measurement| {
                let timepoint = self.timepoint_api.find(&measurement.timepoint_id)?;
                if !scope.includes(timepoint.timepoint_type) {
                    return None;
                }
                Some(
                    async move {
                        let study = self
                            .loader
                            .load_study(&self.server, &measurement.study_instance_uid)
                            .await?;
                        let instance = self.snapshots.first_instance(&study);
                        Ok(DatasetEntry {
                            measurement,
                            timepoint,
                            instance,
                        })
                    }
                    .boxed(),
                )
            })
            .collect()
    }
}
