//! Conjunctive classification rules and their running statistics.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::data::{Instance, InstanceHeader};
use crate::rules::term::RuleTerm;

/// Identifier of a rule inside a [`RuleBase`](crate::rules::RuleBase).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize)]
pub struct RuleId(pub u64);

impl fmt::Display for RuleId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Running coverage statistics of a rule.
#[derive(Debug, Clone, PartialEq)]
pub struct RuleStats {
    /// Instances covered since creation.
    pub times_covered: u64,
    /// Covered instances whose true class matched the rule's class.
    pub times_correctly_covered: u64,
    /// True classes of the covered instances.
    pub class_distribution: Vec<f64>,
    /// Size of the working set the rule was built from.
    pub instances_covered_at_creation: usize,
}

impl RuleStats {
    /// Fresh statistics. A new rule is credited with one correct covering.
    fn new(num_classes: usize) -> Self {
        RuleStats {
            times_covered: 1,
            times_correctly_covered: 1,
            class_distribution: vec![0.0; num_classes],
            instances_covered_at_creation: 0,
        }
    }
}

/// A conjunction of [`RuleTerm`]s implying a class.
///
/// Terms are only appended while the rule is being induced; afterwards only
/// the statistics change. The target class never changes.
#[derive(Debug, Clone, PartialEq)]
pub struct Rule {
    pub(crate) id: RuleId,
    terms: Vec<RuleTerm>,
    class_index: usize,
    age: u64,
    stats: RuleStats,
}

impl Rule {
    /// Start an empty rule for `class_index`, created after `age` instances
    /// were seen by the classifier.
    pub(crate) fn new(class_index: usize, num_classes: usize, age: u64) -> Self {
        Rule {
            id: RuleId::default(),
            terms: Vec::new(),
            class_index,
            age,
            stats: RuleStats::new(num_classes),
        }
    }

    pub(crate) fn push_term(&mut self, term: RuleTerm) {
        self.terms.push(term);
    }

    pub(crate) fn set_instances_covered_at_creation(&mut self, count: usize) {
        self.stats.instances_covered_at_creation = count;
    }

    pub fn id(&self) -> RuleId {
        self.id
    }

    pub fn terms(&self) -> &[RuleTerm] {
        &self.terms
    }

    pub fn class_index(&self) -> usize {
        self.class_index
    }

    /// Number of instances the classifier had seen when the rule was created.
    pub fn age(&self) -> u64 {
        self.age
    }

    pub fn stats(&self) -> &RuleStats {
        &self.stats
    }

    /// A rule covers an instance iff every term holds.
    pub fn covers(&self, instance: &Instance) -> bool {
        self.terms.iter().all(|term| term.covers(instance))
    }

    /// Fraction of covered instances that were correctly covered.
    pub fn accuracy(&self) -> f64 {
        if self.stats.times_covered == 0 {
            return 0.0;
        }
        self.stats.times_correctly_covered as f64 / self.stats.times_covered as f64
    }

    /// Times covered relative to the instances seen by the classifier.
    pub fn coverage(&self, instances_seen: u64) -> f64 {
        if instances_seen == 0 {
            return 0.0;
        }
        self.stats.times_covered as f64 / instances_seen as f64
    }

    /// Class most often observed among covered instances.
    pub fn majority_class(&self) -> Option<usize> {
        let mut best: Option<(usize, f64)> = None;
        for (class, &count) in self.stats.class_distribution.iter().enumerate() {
            if count > best.map_or(0.0, |(_, c)| c) {
                best = Some((class, count));
            }
        }
        best.map(|(class, _)| class)
    }

    /// Record that the rule covered an instance of `true_class`.
    ///
    /// Returns `true` when the covering was correct.
    pub(crate) fn record_coverage(&mut self, true_class: usize) -> bool {
        if let Some(slot) = self.stats.class_distribution.get_mut(true_class) {
            *slot += 1.0;
        }
        self.stats.times_covered += 1;
        let correct = true_class == self.class_index;
        if correct {
            self.stats.times_correctly_covered += 1;
        }
        correct
    }

    /// Human-readable rendering using the header's names.
    pub fn display<'a>(&'a self, header: &'a InstanceHeader, instances_seen: u64) -> RuleDisplay<'a> {
        RuleDisplay {
            rule: self,
            header,
            instances_seen,
        }
    }
}

/// Display adapter returned by [`Rule::display`].
pub struct RuleDisplay<'a> {
    rule: &'a Rule,
    header: &'a InstanceHeader,
    instances_seen: u64,
}

impl fmt::Display for RuleDisplay<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, term) in self.rule.terms.iter().enumerate() {
            if i > 0 {
                f.write_str(" AND ")?;
            }
            write!(f, "{}", term.display(self.header))?;
        }
        let class = self.header.class_label(self.rule.class_index).unwrap_or("?");
        write!(
            f,
            " THEN {class} (age: {}, covered at creation: {}, accuracy: {:.3}, coverage: {:.3})",
            self.rule.age,
            self.rule.stats.instances_covered_at_creation,
            self.rule.accuracy(),
            self.rule.coverage(self.instances_seen)
        )
    }
}
