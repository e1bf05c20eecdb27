//! Built-in trial criteria rule sets.

use std::sync::Arc;

use lrs_model::TimepointScope;

use crate::checks::{
    NewTargetCountEvaluator, TargetCountEvaluator, TargetTrackingEvaluator,
    TargetsRequiredEvaluator,
};
use crate::registry::CriteriaRegistry;

/// Per-criteria constraint table: `(criteria type, max targets, max new
/// targets)`.
const CONSTRAINTS: &[(&str, u32, Option<u32>)] = &[("recist", 5, None), ("irrc", 10, Some(5))];

/// Install the built-in rule sets into a registry. Applications may layer
/// their own registrations on top.
pub fn install(registry: &CriteriaRegistry) {
    for &(criteria_type, max_targets, max_new_targets) in CONSTRAINTS {
        registry.register(
            criteria_type,
            TimepointScope::Baseline,
            Arc::new(TargetCountEvaluator::new(max_targets)),
        );
        registry.register(
            criteria_type,
            TimepointScope::Baseline,
            Arc::new(TargetsRequiredEvaluator),
        );
        registry.register(
            criteria_type,
            TimepointScope::Both,
            Arc::new(TargetTrackingEvaluator),
        );
        if let Some(max_new_targets) = max_new_targets {
            registry.register(
                criteria_type,
                TimepointScope::Both,
                Arc::new(NewTargetCountEvaluator::new(max_new_targets)),
            );
        }
    }
}
