use lrs_model::Nonconformity;

use crate::dataset::Dataset;

/// A conformance rule for one timepoint scope of a trial criteria type.
///
/// The validator depends only on this contract; rule sets are assembled in
/// the `CriteriaRegistry`.
pub trait CriteriaEvaluator: Send + Sync {
    /// Maximum allowed target count this rule enforces, if any.
    /// `new_lesions` selects the new-target limit over the existing-target
    /// limit.
    fn max_targets(&self, new_lesions: bool) -> Option<u32> {
        let _ = new_lesions;
        None
    }

    /// Check the dataset and report each violation found.
    fn evaluate(&self, dataset: &Dataset) -> Vec<Nonconformity>;
}
