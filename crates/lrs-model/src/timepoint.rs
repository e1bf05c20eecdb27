use std::fmt;

use serde::{Deserialize, Serialize};

/// Identifier of an imaging session.
#[derive(
    Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, serde::Serialize, serde::Deserialize,
)]
pub struct TimepointId(String);

impl TimepointId {
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for TimepointId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Whether an imaging session is the trial baseline or a follow-up.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TimepointType {
    Baseline,
    Followup,
}

impl TimepointType {
    pub fn as_str(self) -> &'static str {
        match self {
            TimepointType::Baseline => "baseline",
            TimepointType::Followup => "followup",
        }
    }
}

impl fmt::Display for TimepointType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Scope a rule set is registered under and datasets are built for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TimepointScope {
    Baseline,
    Followup,
    Both,
}

impl TimepointScope {
    /// Whether a timepoint of the given type belongs to a dataset built for this scope.
    pub fn includes(self, timepoint_type: TimepointType) -> bool {
        match self {
            TimepointScope::Both => true,
            TimepointScope::Baseline => timepoint_type == TimepointType::Baseline,
            TimepointScope::Followup => timepoint_type == TimepointType::Followup,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            TimepointScope::Baseline => "baseline",
            TimepointScope::Followup => "followup",
            TimepointScope::Both => "both",
        }
    }
}

impl fmt::Display for TimepointScope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A named imaging session instance, typed as baseline or follow-up.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Timepoint {
    pub timepoint_id: TimepointId,
    pub timepoint_type: TimepointType,
}
