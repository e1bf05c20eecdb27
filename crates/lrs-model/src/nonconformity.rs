use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::measurement::Measurement;

/// A detected violation of a trial's measurement-completeness or
/// consistency rule.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Nonconformity {
    /// Human-readable message describing the violation.
    pub message: String,
    /// Global violations concern the review as a whole and carry no
    /// measurement association.
    pub is_global: bool,
    /// The offending measurements, empty for global violations.
    #[serde(default)]
    pub measurements: Vec<Measurement>,
}

impl Nonconformity {
    pub fn global(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            is_global: true,
            measurements: Vec::new(),
        }
    }

    pub fn with_measurements(message: impl Into<String>, measurements: Vec<Measurement>) -> Self {
        Self {
            message: message.into(),
            is_global: false,
            measurements,
        }
    }
}

/// Messages and measurements accumulated for one measurement number within
/// a tool group.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MeasurementBucket {
    pub messages: Vec<String>,
    pub measurements: Vec<Measurement>,
}

/// Nonconformities of one tool group, bucketed by measurement number.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ToolGroupNonconformities {
    pub measurement_numbers: BTreeMap<u32, MeasurementBucket>,
}

/// Nonconformities partitioned for presentation: global messages plus
/// per-tool-group, per-measurement-number buckets.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GroupedNonconformities {
    /// Messages of global violations, in evaluation order.
    pub globals: Vec<String>,
    pub groups: BTreeMap<String, ToolGroupNonconformities>,
}

impl GroupedNonconformities {
    pub fn is_empty(&self) -> bool {
        self.globals.is_empty() && self.groups.is_empty()
    }
}

/// Result of one `validate` call.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ValidationOutcome {
    /// All nonconformities, in the order baseline, follow-up, combined.
    pub nonconformities: Vec<Nonconformity>,
    pub grouped: GroupedNonconformities,
    /// Maximum allowed existing-target count reported by the rule set, if any.
    pub max_targets: Option<u32>,
    /// Maximum allowed new-target count reported by the rule set, if any.
    pub max_new_targets: Option<u32>,
}

impl ValidationOutcome {
    pub fn is_conformant(&self) -> bool {
        self.nonconformities.is_empty()
    }
}
