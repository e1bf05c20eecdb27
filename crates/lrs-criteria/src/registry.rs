use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use lrs_model::TimepointScope;

use crate::builtin;
use crate::evaluator::CriteriaEvaluator;

#[derive(Default)]
struct ScopedRuleSets {
    by_scope: HashMap<TimepointScope, Vec<Arc<dyn CriteriaEvaluator>>>,
}

/// Registry of rule sets keyed by trial criteria type (case-insensitive)
/// and timepoint scope.
///
/// Passed to the validator's constructor; extendable at any time, and
/// later `validate` calls pick up new registrations.
#[derive(Default)]
pub struct CriteriaRegistry {
    rule_sets: RwLock<HashMap<String, ScopedRuleSets>>,
}

impl CriteriaRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry preloaded with the built-in trial criteria rule sets.
    pub fn with_builtin() -> Self {
        let registry = Self::new();
        builtin::install(&registry);
        registry
    }

    pub fn register(
        &self,
        criteria_type: &str,
        scope: TimepointScope,
        evaluator: Arc<dyn CriteriaEvaluator>,
    ) {
        let mut rule_sets = self.rule_sets.write().expect("criteria registry lock");
        rule_sets
            .entry(criteria_type.to_lowercase())
            .or_default()
            .by_scope
            .entry(scope)
            .or_default()
            .push(evaluator);
    }

    /// Evaluators registered for a criteria type and scope; empty when the
    /// combination has no rule set.
    pub fn evaluators(
        &self,
        criteria_type: &str,
        scope: TimepointScope,
    ) -> Vec<Arc<dyn CriteriaEvaluator>> {
        let rule_sets = self.rule_sets.read().expect("criteria registry lock");
        rule_sets
            .get(&criteria_type.to_lowercase())
            .and_then(|scoped| scoped.by_scope.get(&scope))
            .cloned()
            .unwrap_or_default()
    }

    /// Registered criteria types, sorted.
    pub fn criteria_types(&self) -> Vec<String> {
        let rule_sets = self.rule_sets.read().expect("criteria registry lock");
        let mut types: Vec<String> = rule_sets.keys().cloned().collect();
        types.sort();
        types
    }

    /// Scopes with registered evaluators for a criteria type.
    pub fn scopes(&self, criteria_type: &str) -> Vec<TimepointScope> {
        let rule_sets = self.rule_sets.read().expect("criteria registry lock");
        let Some(scoped) = rule_sets.get(&criteria_type.to_lowercase()) else {
            return Vec::new();
        };
        [
            TimepointScope::Baseline,
            TimepointScope::Followup,
            TimepointScope::Both,
        ]
        .into_iter()
        .filter(|scope| {
            scoped
                .by_scope
                .get(scope)
                .is_some_and(|evaluators| !evaluators.is_empty())
        })
        .collect()
    }
}
