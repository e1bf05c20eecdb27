use async_trait::async_trait;
use lrs_model::StudyInstanceUid;
use serde::{Deserialize, Serialize};

use crate::error::StudyLoadError;
use crate::raw::RawStudy;

/// Imaging archive a study is retrieved from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Server {
    pub name: String,
    /// Root of the archive's WADO endpoint or fixture location.
    pub wado_root: String,
}

impl Server {
    pub fn new(name: impl Into<String>, wado_root: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            wado_root: wado_root.into(),
        }
    }
}

/// Server metadata retrieval collaborator.
#[async_trait]
pub trait StudyMetadataRetriever: Send + Sync {
    async fn retrieve_study_metadata(
        &self,
        server: &Server,
        study_instance_uid: &StudyInstanceUid,
    ) -> Result<RawStudy, StudyLoadError>;
}
