use serde::{Deserialize, Serialize};

use crate::study::StudyInstanceUid;
use crate::timepoint::TimepointId;

/// Lesion measurement categories tracked separately by trial response criteria.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum LesionCategory {
    Targets,
    NonTargets,
}

impl LesionCategory {
    pub const ALL: [LesionCategory; 2] = [LesionCategory::Targets, LesionCategory::NonTargets];

    pub fn as_str(self) -> &'static str {
        match self {
            LesionCategory::Targets => "targets",
            LesionCategory::NonTargets => "nonTargets",
        }
    }
}

impl std::fmt::Display for LesionCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single lesion measurement record.
///
/// Created by external measurement capture; read-only to this workspace.
/// Belongs to exactly one timepoint and one study.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Measurement {
    /// Measurement tool that produced this record (e.g. `targetCR`, `bidirectional`).
    pub tool_type: String,
    /// Lesion number; shared by re-assessments of the same lesion across timepoints.
    pub measurement_number: u32,
    pub timepoint_id: TimepointId,
    pub study_instance_uid: StudyInstanceUid,
    /// Anatomical location, when recorded.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    /// Tool-specific response payload; opaque to the validator.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub response: Option<serde_json::Value>,
}
