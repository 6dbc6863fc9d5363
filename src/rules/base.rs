//! The live rule collection: coverage lookup, voting and pruning.

use tracing::debug;

use crate::data::Instance;
use crate::rules::rule::{Rule, RuleId};

/// When a rule is dropped from the rule base.
///
/// A rule is removed on a miscoverage once it has been tried at least
/// `min_rule_trials` times and its accuracy is strictly below
/// `accuracy_threshold`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PruningPolicy {
    pub min_rule_trials: u64,
    pub accuracy_threshold: f64,
}

impl PruningPolicy {
    pub fn should_prune(&self, rule: &Rule) -> bool {
        rule.stats().times_covered >= self.min_rule_trials && rule.accuracy() < self.accuracy_threshold
    }
}

/// Result of feeding a training instance to the rule base.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CoverageUpdate {
    /// Number of rules that covered the instance.
    pub covered_by: usize,
    /// Rules removed because of this instance.
    pub pruned: Vec<RuleId>,
}

/// Unordered collection of rules. Every rule is evaluated independently.
#[derive(Debug, Clone, Default)]
pub struct RuleBase {
    rules: Vec<Rule>,
    next_id: u64,
}

impl RuleBase {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Rule> {
        self.rules.iter()
    }

    pub fn get(&self, id: RuleId) -> Option<&Rule> {
        self.rules.iter().find(|rule| rule.id == id)
    }

    /// Append a rule, assigning it a fresh id.
    pub fn insert(&mut self, mut rule: Rule) -> RuleId {
        let id = RuleId(self.next_id);
        self.next_id += 1;
        rule.id = id;
        self.rules.push(rule);
        id
    }

    /// Append all rules, returning their ids in order.
    pub fn extend<I: IntoIterator<Item = Rule>>(&mut self, rules: I) -> Vec<RuleId> {
        rules.into_iter().map(|rule| self.insert(rule)).collect()
    }

    /// Remove the given rules. Returns how many were present.
    pub fn remove(&mut self, ids: &[RuleId]) -> usize {
        let before = self.rules.len();
        self.rules.retain(|rule| !ids.contains(&rule.id));
        before - self.rules.len()
    }

    pub fn clear(&mut self) {
        self.rules.clear();
    }

    /// Ids of all rules covering the instance.
    pub fn covering(&self, instance: &Instance) -> Vec<RuleId> {
        self.rules
            .iter()
            .filter(|rule| rule.covers(instance))
            .map(Rule::id)
            .collect()
    }

    /// One unit vote per covering rule at its class, or `None` when no rule
    /// covers the instance.
    pub fn votes(&self, instance: &Instance, num_classes: usize) -> Option<Vec<f64>> {
        let mut votes = vec![0.0; num_classes];
        let mut covered = false;
        for rule in self.rules.iter().filter(|rule| rule.covers(instance)) {
            covered = true;
            if let Some(slot) = votes.get_mut(rule.class_index()) {
                *slot += 1.0;
            }
        }
        covered.then_some(votes)
    }

    /// Update the statistics of every covering rule with the instance's true
    /// class and prune the rules the policy rejects.
    ///
    /// Removals are collected during the scan and applied once it is over.
    pub fn update(&mut self, instance: &Instance, policy: &PruningPolicy) -> CoverageUpdate {
        let true_class = instance.class_index();
        let mut update = CoverageUpdate::default();

        for rule in self.rules.iter_mut().filter(|rule| rule.covers(instance)) {
            update.covered_by += 1;
            let correct = rule.record_coverage(true_class);
            if !correct && policy.should_prune(rule) {
                debug!(
                    rule = %rule.id(),
                    accuracy = rule.accuracy(),
                    times_covered = rule.stats().times_covered,
                    "pruning rule"
                );
                update.pruned.push(rule.id());
            }
        }

        if !update.pruned.is_empty() {
            self.remove(&update.pruned);
        }
        update
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rules::term::RuleTerm;

    const POLICY: PruningPolicy = PruningPolicy {
        min_rule_trials: 10,
        accuracy_threshold: 0.8,
    };

    fn rule_on(value: usize, class: usize) -> Rule {
        let mut rule = Rule::new(class, 2, 0);
        rule.push_term(RuleTerm::categorical(0, value));
        rule
    }

    fn hit(class: usize) -> Instance {
        Instance::new(vec![0.0], class)
    }

    #[test]
    fn test_insert_and_covering() {
        let mut base = RuleBase::new();
        let a = base.insert(rule_on(0, 0));
        let b = base.insert(rule_on(1, 1));
        let c = base.insert(rule_on(0, 1));
        assert_ne!(a, b);
        assert_eq!(base.len(), 3);
        assert_eq!(base.covering(&hit(0)), vec![a, c]);
        assert_eq!(base.get(b).unwrap().class_index(), 1);
    }

    #[test]
    fn test_votes_are_unweighted() {
        let mut base = RuleBase::new();
        base.insert(rule_on(0, 0));
        base.insert(rule_on(0, 1));
        base.insert(rule_on(0, 1));
        assert_eq!(base.votes(&hit(0), 2), Some(vec![1.0, 2.0]));
        assert_eq!(base.votes(&Instance::new(vec![2.0], 0), 2), None);
        assert_eq!(RuleBase::new().votes(&hit(0), 2), None);
    }

    #[test]
    fn test_correct_coverings_never_prune() {
        let mut base = RuleBase::new();
        let id = base.insert(rule_on(0, 0));
        for _ in 0..50 {
            let update = base.update(&hit(0), &POLICY);
            assert_eq!(update.covered_by, 1);
            assert!(update.pruned.is_empty());
        }
        assert_eq!(base.get(id).unwrap().stats().times_covered, 51);
    }

    #[test]
    fn test_below_min_trials_is_never_pruned() {
        let mut base = RuleBase::new();
        let id = base.insert(rule_on(0, 0));
        // 1 initial covering + 8 misses = 9 = min_rule_trials - 1
        for _ in 0..8 {
            assert!(base.update(&hit(1), &POLICY).pruned.is_empty());
        }
        let rule = base.get(id).unwrap();
        assert_eq!(rule.stats().times_covered, POLICY.min_rule_trials - 1);
        assert!(rule.accuracy() < POLICY.accuracy_threshold);

        let update = base.update(&hit(1), &POLICY);
        assert_eq!(update.pruned, vec![id]);
        assert!(base.is_empty());
    }

    #[test]
    fn test_accuracy_equal_to_threshold_is_kept() {
        let mut base = RuleBase::new();
        let id = base.insert(rule_on(0, 0));
        for _ in 0..7 {
            base.update(&hit(0), &POLICY);
        }
        // 8/9
        assert!(base.update(&hit(1), &POLICY).pruned.is_empty());
        // 8/10 == threshold
        assert!(base.update(&hit(1), &POLICY).pruned.is_empty());
        assert_eq!(base.get(id).unwrap().accuracy(), 0.8);
        // 8/11 < threshold
        assert_eq!(base.update(&hit(1), &POLICY).pruned, vec![id]);
        assert!(base.get(id).is_none());
    }

    #[test]
    fn test_pruning_applies_after_scan() {
        let mut base = RuleBase::new();
        let doomed = base.insert(rule_on(0, 1));
        let survivor = base.insert(rule_on(0, 0));
        let doomed_too = base.insert(rule_on(0, 1));
        let policy = PruningPolicy {
            min_rule_trials: 2,
            accuracy_threshold: 0.8,
        };

        let update = base.update(&hit(0), &policy);
        assert_eq!(update.covered_by, 3);
        assert_eq!(update.pruned, vec![doomed, doomed_too]);
        assert_eq!(base.len(), 1);
        assert!(base.get(survivor).is_some());
    }

    #[test]
    fn test_remove_and_extend() {
        let mut base = RuleBase::new();
        let ids = base.extend(vec![rule_on(0, 0), rule_on(1, 1)]);
        assert_eq!(ids.len(), 2);
        assert_eq!(base.remove(&[ids[0], RuleId(99)]), 1);
        assert_eq!(base.len(), 1);
        base.clear();
        assert!(base.is_empty());
    }
}
