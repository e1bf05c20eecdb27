//! End-to-end validator behavior against fake collaborators.

use std::collections::{BTreeMap, HashMap, HashSet};
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;

use lrs_criteria::{
    CriteriaEvaluator, CriteriaRegistry, CriteriaValidator, Dataset, MeasurementApi, TimepointApi,
    ValidateError,
};
use lrs_model::{
    LesionCategory, Measurement, Nonconformity, StudyInstanceUid, Timepoint, TimepointId,
    TimepointScope, TimepointType,
};
use lrs_study::{
    RawInstance, RawMetadataIndex, RawSeries, RawStudy, Server, StudyLoadError, StudyLoader,
    StudyMetadataManager, StudyMetadataRetriever,
};

fn uid(value: &str) -> StudyInstanceUid {
    StudyInstanceUid::new(value).expect("valid uid")
}

fn measurement(tool_type: &str, number: u32, timepoint_id: &str, study: &str) -> Measurement {
    Measurement {
        tool_type: tool_type.to_string(),
        measurement_number: number,
        timepoint_id: TimepointId::new(timepoint_id),
        study_instance_uid: uid(study),
        location: None,
        response: None,
    }
}

fn raw_study(study_uid: &str) -> RawStudy {
    RawStudy {
        study_instance_uid: uid(study_uid),
        patient_id: None,
        patient_name: None,
        study_description: None,
        study_date: None,
        series: vec![RawSeries {
            series_instance_uid: format!("{study_uid}.1"),
            series_number: Some(1),
            series_description: None,
            modality: Some("CT".to_string()),
            instances: vec![RawInstance {
                sop_instance_uid: format!("{study_uid}.1.1"),
                instance_number: Some(1),
                rows: None,
                columns: None,
            }],
        }],
    }
}

#[derive(Default)]
struct FakeMeasurementApi {
    targets: Vec<Measurement>,
    non_targets: Vec<Measurement>,
    groups: BTreeMap<String, String>,
}

impl FakeMeasurementApi {
    fn with_group(mut self, tool_type: &str, group: &str) -> Self {
        self.groups.insert(tool_type.to_string(), group.to_string());
        self
    }
}

impl MeasurementApi for FakeMeasurementApi {
    fn fetch(&self, category: LesionCategory) -> Vec<Measurement> {
        match category {
            LesionCategory::Targets => self.targets.clone(),
            LesionCategory::NonTargets => self.non_targets.clone(),
        }
    }

    fn tool_group(&self, tool_type: &str) -> Option<String> {
        self.groups.get(tool_type).cloned()
    }
}

struct FakeTimepointApi {
    timepoints: Vec<Timepoint>,
}

impl FakeTimepointApi {
    fn new(timepoints: Vec<(&str, TimepointType)>) -> Self {
        Self {
            timepoints: timepoints
                .into_iter()
                .map(|(id, timepoint_type)| Timepoint {
                    timepoint_id: TimepointId::new(id),
                    timepoint_type,
                })
                .collect(),
        }
    }
}

impl TimepointApi for FakeTimepointApi {
    fn timepoints(&self) -> Vec<Timepoint> {
        self.timepoints.clone()
    }
}

struct FakeRetriever {
    studies: HashMap<StudyInstanceUid, RawStudy>,
    fail_for: HashSet<StudyInstanceUid>,
}

impl FakeRetriever {
    fn new(study_uids: &[&str]) -> Self {
        Self {
            studies: study_uids
                .iter()
                .map(|study_uid| (uid(study_uid), raw_study(study_uid)))
                .collect(),
            fail_for: HashSet::new(),
        }
    }

    fn failing_for(mut self, study_uid: &str) -> Self {
        self.fail_for.insert(uid(study_uid));
        self
    }
}

#[async_trait]
impl StudyMetadataRetriever for FakeRetriever {
    async fn retrieve_study_metadata(
        &self,
        _server: &Server,
        study_instance_uid: &StudyInstanceUid,
    ) -> Result<RawStudy, StudyLoadError> {
        if self.fail_for.contains(study_instance_uid) {
            return Err(StudyLoadError::retrieve(
                study_instance_uid.clone(),
                "connection refused",
            ));
        }
        self.studies
            .get(study_instance_uid)
            .cloned()
            .ok_or_else(|| StudyLoadError::retrieve(study_instance_uid.clone(), "study not found"))
    }
}

/// Evaluator that records invocations and returns fixed nonconformities.
struct RecordingEvaluator {
    calls: Arc<AtomicUsize>,
    results: Vec<Nonconformity>,
    existing_limit: Option<u32>,
    new_limit: Option<u32>,
}

impl RecordingEvaluator {
    fn silent(calls: Arc<AtomicUsize>) -> Self {
        Self {
            calls,
            results: Vec::new(),
            existing_limit: None,
            new_limit: None,
        }
    }

    fn returning(results: Vec<Nonconformity>) -> Self {
        Self {
            calls: Arc::new(AtomicUsize::new(0)),
            results,
            existing_limit: None,
            new_limit: None,
        }
    }

    fn with_limits(mut self, existing: Option<u32>, new_lesions: Option<u32>) -> Self {
        self.existing_limit = existing;
        self.new_limit = new_lesions;
        self
    }
}

impl CriteriaEvaluator for RecordingEvaluator {
    fn max_targets(&self, new_lesions: bool) -> Option<u32> {
        if new_lesions {
            self.new_limit
        } else {
            self.existing_limit
        }
    }

    fn evaluate(&self, _dataset: &Dataset) -> Vec<Nonconformity> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.results.clone()
    }
}

fn make_validator(
    measurement_api: FakeMeasurementApi,
    timepoint_api: FakeTimepointApi,
    retriever: FakeRetriever,
    registry: CriteriaRegistry,
) -> CriteriaValidator {
    let loader = Arc::new(StudyLoader::new(
        Arc::new(retriever),
        Arc::new(RawMetadataIndex::new()),
        Arc::new(StudyMetadataManager::new()),
    ));
    CriteriaValidator::new(
        Arc::new(measurement_api),
        Arc::new(timepoint_api),
        loader,
        Arc::new(registry),
        Server::new("local", "fixtures://"),
    )
}

#[tokio::test]
async fn unregistered_criteria_yields_empty_outcome() {
    let measurement_api = FakeMeasurementApi {
        targets: vec![measurement("targetCR", 1, "tp-1", "1.2.3")],
        ..FakeMeasurementApi::default()
    };
    let timepoint_api = FakeTimepointApi::new(vec![("tp-1", TimepointType::Baseline)]);
    let validator = make_validator(
        measurement_api,
        timepoint_api,
        FakeRetriever::new(&["1.2.3"]),
        CriteriaRegistry::new(),
    );

    let outcome = validator.validate("unknown").await.expect("validate");

    assert!(outcome.is_conformant());
    assert!(outcome.grouped.is_empty());
    assert_eq!(outcome.max_targets, None);
    assert_eq!(outcome.max_new_targets, None);
}

#[tokio::test]
async fn merged_dataset_preserves_baseline_then_followup_order() {
    let measurement_api = FakeMeasurementApi {
        targets: vec![
            measurement("targetCR", 1, "tp-1", "1.2.3"),
            measurement("targetCR", 2, "tp-1", "1.2.3"),
            measurement("targetCR", 1, "tp-2", "1.2.4"),
        ],
        ..FakeMeasurementApi::default()
    };
    let timepoint_api = FakeTimepointApi::new(vec![
        ("tp-1", TimepointType::Baseline),
        ("tp-2", TimepointType::Followup),
    ]);
    let validator = make_validator(
        measurement_api,
        timepoint_api,
        FakeRetriever::new(&["1.2.3", "1.2.4"]),
        CriteriaRegistry::new(),
    );

    let baseline = validator
        .build_data(TimepointScope::Baseline)
        .await
        .expect("baseline data");
    let followup = validator
        .build_data(TimepointScope::Followup)
        .await
        .expect("followup data");
    let merged = Dataset::merged(&baseline, &followup);

    assert_eq!(baseline.targets.len(), 2);
    assert_eq!(followup.targets.len(), 1);
    assert_eq!(merged.targets.len(), 3);
    let expected: Vec<_> = baseline
        .targets
        .iter()
        .chain(followup.targets.iter())
        .cloned()
        .collect();
    assert_eq!(merged.targets, expected);
}

#[tokio::test]
async fn baseline_scenario_groups_single_nonconformity() {
    let target = measurement("targetCR", 1, "tp-1", "1.2.3");
    let measurement_api = FakeMeasurementApi {
        targets: vec![target.clone()],
        ..FakeMeasurementApi::default()
    }
    .with_group("targetCR", "allTools");
    let timepoint_api = FakeTimepointApi::new(vec![("tp-1", TimepointType::Baseline)]);

    let registry = CriteriaRegistry::new();
    registry.register(
        "recist",
        TimepointScope::Baseline,
        Arc::new(RecordingEvaluator::returning(vec![
            Nonconformity::with_measurements("too many targets", vec![target.clone()]),
        ])),
    );

    let validator = make_validator(
        measurement_api,
        timepoint_api,
        FakeRetriever::new(&["1.2.3"]),
        registry,
    );

    let outcome = validator.validate("recist").await.expect("validate");

    assert_eq!(outcome.nonconformities.len(), 1);
    assert_eq!(outcome.nonconformities[0].message, "too many targets");

    let group = outcome.grouped.groups.get("allTools").expect("group");
    let bucket = group.measurement_numbers.get(&1).expect("bucket");
    assert_eq!(bucket.messages, vec!["too many targets".to_string()]);
    assert_eq!(bucket.measurements, vec![target]);
    assert!(outcome.grouped.globals.is_empty());
}

#[tokio::test]
async fn build_data_excludes_other_timepoint_types() {
    let measurement_api = FakeMeasurementApi {
        targets: vec![
            measurement("targetCR", 1, "tp-1", "1.2.3"),
            measurement("targetCR", 2, "tp-2", "1.2.4"),
        ],
        ..FakeMeasurementApi::default()
    };
    let timepoint_api = FakeTimepointApi::new(vec![
        ("tp-1", TimepointType::Baseline),
        ("tp-2", TimepointType::Followup),
    ]);
    let validator = make_validator(
        measurement_api,
        timepoint_api,
        FakeRetriever::new(&["1.2.3", "1.2.4"]),
        CriteriaRegistry::new(),
    );

    let dataset = validator
        .build_data(TimepointScope::Baseline)
        .await
        .expect("baseline data");

    assert_eq!(dataset.targets.len(), 1);
    assert_eq!(dataset.targets[0].measurement.measurement_number, 1);
    assert!(dataset.targets[0].instance.is_some());
}

#[tokio::test]
async fn measurements_without_timepoint_are_excluded() {
    let measurement_api = FakeMeasurementApi {
        targets: vec![
            measurement("targetCR", 1, "tp-1", "1.2.3"),
            measurement("targetCR", 2, "tp-orphan", "1.2.4"),
        ],
        ..FakeMeasurementApi::default()
    };
    let timepoint_api = FakeTimepointApi::new(vec![("tp-1", TimepointType::Baseline)]);
    let validator = make_validator(
        measurement_api,
        timepoint_api,
        FakeRetriever::new(&["1.2.3", "1.2.4"]),
        CriteriaRegistry::new(),
    );

    let dataset = validator
        .build_data(TimepointScope::Both)
        .await
        .expect("data");

    assert_eq!(dataset.targets.len(), 1);
}

#[tokio::test]
async fn failing_study_load_fails_validate_before_evaluation() {
    let calls = Arc::new(AtomicUsize::new(0));
    let measurement_api = FakeMeasurementApi {
        targets: vec![
            measurement("targetCR", 1, "tp-1", "1.2.3"),
            measurement("targetCR", 2, "tp-2", "1.2.4"),
        ],
        ..FakeMeasurementApi::default()
    };
    let timepoint_api = FakeTimepointApi::new(vec![
        ("tp-1", TimepointType::Baseline),
        ("tp-2", TimepointType::Followup),
    ]);

    let registry = CriteriaRegistry::new();
    for scope in [
        TimepointScope::Baseline,
        TimepointScope::Followup,
        TimepointScope::Both,
    ] {
        registry.register(
            "recist",
            scope,
            Arc::new(RecordingEvaluator::silent(Arc::clone(&calls))),
        );
    }

    let validator = make_validator(
        measurement_api,
        timepoint_api,
        FakeRetriever::new(&["1.2.3", "1.2.4"]).failing_for("1.2.4"),
        registry,
    );

    let result = validator.validate("recist").await;

    assert!(matches!(
        result,
        Err(ValidateError::StudyLoad(StudyLoadError::Retrieve { .. }))
    ));
    assert_eq!(calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn most_recent_max_target_limit_wins() {
    let measurement_api = FakeMeasurementApi {
        targets: vec![measurement("targetCR", 1, "tp-1", "1.2.3")],
        ..FakeMeasurementApi::default()
    };
    let timepoint_api = FakeTimepointApi::new(vec![("tp-1", TimepointType::Baseline)]);

    let registry = CriteriaRegistry::new();
    registry.register(
        "recist",
        TimepointScope::Both,
        Arc::new(RecordingEvaluator::returning(Vec::new()).with_limits(Some(5), Some(2))),
    );
    registry.register(
        "recist",
        TimepointScope::Baseline,
        Arc::new(RecordingEvaluator::returning(Vec::new()).with_limits(Some(3), None)),
    );

    let validator = make_validator(
        measurement_api,
        timepoint_api,
        FakeRetriever::new(&["1.2.3"]),
        registry,
    );

    let outcome = validator.validate("recist").await.expect("validate");

    // Baseline evaluators run after the combined scope, so their limit is
    // the most recently observed one.
    assert_eq!(outcome.max_targets, Some(3));
    assert_eq!(outcome.max_new_targets, Some(2));
}

#[tokio::test]
async fn builtin_recist_flags_excess_baseline_targets() {
    let targets: Vec<Measurement> = (1..=6)
        .map(|number| measurement("targetCR", number, "tp-1", "1.2.3"))
        .collect();
    let measurement_api = FakeMeasurementApi {
        targets,
        ..FakeMeasurementApi::default()
    }
    .with_group("targetCR", "allTools");
    let timepoint_api = FakeTimepointApi::new(vec![("tp-1", TimepointType::Baseline)]);

    let validator = make_validator(
        measurement_api,
        timepoint_api,
        FakeRetriever::new(&["1.2.3"]),
        CriteriaRegistry::with_builtin(),
    );

    let outcome = validator.validate("recist").await.expect("validate");

    assert_eq!(outcome.nonconformities.len(), 1);
    assert!(outcome.nonconformities[0].message.contains("6 target lesions"));
    assert_eq!(outcome.max_targets, Some(5));
    assert_eq!(outcome.grouped.groups.len(), 1);
}

#[tokio::test]
async fn builtin_irrc_allows_more_targets() {
    let targets: Vec<Measurement> = (1..=6)
        .map(|number| measurement("targetCR", number, "tp-1", "1.2.3"))
        .collect();
    let measurement_api = FakeMeasurementApi {
        targets,
        ..FakeMeasurementApi::default()
    }
    .with_group("targetCR", "allTools");
    let timepoint_api = FakeTimepointApi::new(vec![("tp-1", TimepointType::Baseline)]);

    let validator = make_validator(
        measurement_api,
        timepoint_api,
        FakeRetriever::new(&["1.2.3"]),
        CriteriaRegistry::with_builtin(),
    );

    let outcome = validator.validate("irrc").await.expect("validate");

    assert!(outcome.is_conformant());
    assert_eq!(outcome.max_targets, Some(10));
    assert_eq!(outcome.max_new_targets, Some(5));
}

#[tokio::test]
async fn subscribers_observe_each_outcome() {
    let measurement_api = FakeMeasurementApi {
        targets: vec![measurement("targetCR", 1, "tp-1", "1.2.3")],
        ..FakeMeasurementApi::default()
    };
    let timepoint_api = FakeTimepointApi::new(vec![("tp-1", TimepointType::Baseline)]);
    let validator = make_validator(
        measurement_api,
        timepoint_api,
        FakeRetriever::new(&["1.2.3"]),
        CriteriaRegistry::new(),
    );

    let mut outcomes = validator.subscribe();
    assert!(outcomes.borrow().is_none());

    let outcome = validator.validate("recist").await.expect("validate");

    let observed = outcomes
        .borrow_and_update()
        .clone()
        .expect("published outcome");
    assert_eq!(*observed, outcome);
}
