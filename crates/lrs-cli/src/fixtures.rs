//! Fixture-backed collaborators reading a review case folder.
//!
//! Case layout: `measurements.json` (targets, non-targets, and an optional
//! tools-groups map), `timepoints.json`, and `studies/<StudyInstanceUID>.json`
//! with raw study metadata as served.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use async_trait::async_trait;
use serde::Deserialize;
use serde::de::DeserializeOwned;

use lrs_criteria::{MeasurementApi, TimepointApi};
use lrs_model::{LesionCategory, Measurement, StudyInstanceUid, Timepoint};
use lrs_study::{RawStudy, Server, StudyLoadError, StudyMetadataRetriever};

/// Tool group applied when a case defines no tools-groups map.
const DEFAULT_TOOL_GROUP: &str = "allTools";

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct CaseMeasurements {
    #[serde(default)]
    targets: Vec<Measurement>,
    #[serde(default)]
    non_targets: Vec<Measurement>,
    #[serde(default)]
    tools_groups: BTreeMap<String, String>,
}

pub struct CaseMeasurementApi {
    measurements: CaseMeasurements,
}

impl MeasurementApi for CaseMeasurementApi {
    fn fetch(&self, category: LesionCategory) -> Vec<Measurement> {
        match category {
            LesionCategory::Targets => self.measurements.targets.clone(),
            LesionCategory::NonTargets => self.measurements.non_targets.clone(),
        }
    }

    fn tool_group(&self, tool_type: &str) -> Option<String> {
        if self.measurements.tools_groups.is_empty() {
            return Some(DEFAULT_TOOL_GROUP.to_string());
        }
        self.measurements.tools_groups.get(tool_type).cloned()
    }
}

pub struct CaseTimepointApi {
    timepoints: Vec<Timepoint>,
}

impl TimepointApi for CaseTimepointApi {
    fn timepoints(&self) -> Vec<Timepoint> {
        self.timepoints.clone()
    }
}

/// Serves raw study metadata from `studies/<uid>.json` files.
pub struct CaseStudyRetriever {
    studies_dir: PathBuf,
}

#[async_trait]
impl StudyMetadataRetriever for CaseStudyRetriever {
    async fn retrieve_study_metadata(
        &self,
        _server: &Server,
        study_instance_uid: &StudyInstanceUid,
    ) -> Result<RawStudy, StudyLoadError> {
        let path = self.studies_dir.join(format!("{study_instance_uid}.json"));
        let bytes = tokio::fs::read(&path).await.map_err(|error| {
            StudyLoadError::retrieve(
                study_instance_uid.clone(),
                format!("{}: {error}", path.display()),
            )
        })?;
        serde_json::from_slice(&bytes).map_err(|error| {
            StudyLoadError::invalid_payload(study_instance_uid.clone(), error.to_string())
        })
    }
}

/// A review case folder's collaborators, ready to wire into the validator.
pub struct ReviewCase {
    pub measurement_api: CaseMeasurementApi,
    pub timepoint_api: CaseTimepointApi,
    pub retriever: CaseStudyRetriever,
    pub server: Server,
}

pub fn load_case(case_folder: &Path) -> Result<ReviewCase> {
    let measurements: CaseMeasurements = read_json(&case_folder.join("measurements.json"))?;
    let timepoints: Vec<Timepoint> = read_json(&case_folder.join("timepoints.json"))?;
    let studies_dir = case_folder.join("studies");

    Ok(ReviewCase {
        measurement_api: CaseMeasurementApi { measurements },
        timepoint_api: CaseTimepointApi { timepoints },
        retriever: CaseStudyRetriever {
            studies_dir: studies_dir.clone(),
        },
        server: Server::new("case", studies_dir.display().to_string()),
    })
}

fn read_json<T: DeserializeOwned>(path: &Path) -> Result<T> {
    let contents = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read {}", path.display()))?;
    serde_json::from_str(&contents).with_context(|| format!("failed to parse {}", path.display()))
}
