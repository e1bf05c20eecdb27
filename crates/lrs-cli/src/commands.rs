use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Result;

use lrs_cli::logging::redact_value;
use lrs_criteria::{CriteriaRegistry, CriteriaValidator, write_conformance_report_json};
use lrs_model::ValidationOutcome;
use lrs_study::{RawMetadataIndex, StudyLoader, StudyMetadataManager};

use crate::cli::ValidateArgs;
use crate::fixtures::load_case;

pub struct ValidateRun {
    pub case_folder: PathBuf,
    pub criteria: String,
    pub outcome: ValidationOutcome,
    pub studies_loaded: usize,
    pub report_path: Option<PathBuf>,
}

pub async fn run_validate(args: &ValidateArgs) -> Result<ValidateRun> {
    let case = load_case(&args.case_folder)?;

    let manager = Arc::new(StudyMetadataManager::new());
    let loader = Arc::new(StudyLoader::new(
        Arc::new(case.retriever),
        Arc::new(RawMetadataIndex::new()),
        Arc::clone(&manager),
    ));
    let validator = CriteriaValidator::new(
        Arc::new(case.measurement_api),
        Arc::new(case.timepoint_api),
        loader,
        Arc::new(CriteriaRegistry::with_builtin()),
        case.server,
    );

    let outcome = validator.validate(&args.criteria).await?;

    for study in manager.all() {
        tracing::debug!(
            study = %study.study_instance_uid,
            patient = redact_value(study.patient_id.as_deref().unwrap_or("-")),
            display_sets = study.display_sets.len(),
            "study in review case"
        );
    }
    tracing::info!(
        criteria = %args.criteria,
        nonconformities = outcome.nonconformities.len(),
        studies = manager.len(),
        "validation complete"
    );

    let report_path = match &args.report_dir {
        Some(dir) => Some(write_conformance_report_json(dir, &args.criteria, &outcome)?),
        None => None,
    };

    Ok(ValidateRun {
        case_folder: args.case_folder.clone(),
        criteria: args.criteria.clone(),
        outcome,
        studies_loaded: manager.len(),
        report_path,
    })
}

pub fn run_criteria() -> Result<()> {
    let registry = CriteriaRegistry::with_builtin();
    println!("Registered trial criteria:");
    for criteria_type in registry.criteria_types() {
        let scopes: Vec<&str> = registry
            .scopes(&criteria_type)
            .into_iter()
            .map(|scope| scope.as_str())
            .collect();
        println!("- {criteria_type} ({})", scopes.join(", "));
    }
    Ok(())
}
