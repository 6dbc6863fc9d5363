//! Separate-and-conquer rule induction over one buffered batch.
//!
//! For every class label in ascending order, rules are grown greedily from
//! the working pool: each step adds the highest scoring term on an unused
//! attribute and narrows the working set to the instances that satisfy it.
//! Instances captured by a finished attempt leave the pool; once the pool
//! holds no instance of the class, the next class starts again from the full
//! batch.
//!
//! Categorical terms are scored by `P(class | attribute = value)` on the
//! working set. Numeric terms bracket the density peak of the attribute's
//! Gaussian (see [`find_bounds`]) and are scored by the probability mass of
//! that range. Ties keep the first candidate in enumeration order
//! (attributes ascending, then values ascending).

use std::collections::BTreeSet;
use std::sync::Arc;

use rayon::prelude::*;
use tracing::{debug, trace};

use crate::data::{AttributeKind, Instance, InstanceHeader};
use crate::induction::numeric::{NumericModel, find_bounds};
use crate::rules::{Rule, RuleTerm};

/// Result of one induction call.
#[derive(Debug, Clone, PartialEq)]
pub enum InductionOutcome {
    /// The search ran; the rules may be empty if every attempt was discarded.
    Induced(Vec<Rule>),
    /// The batch held at most one class. Nothing was learned and the batch
    /// should be retried together with later data.
    Deferred,
}

impl InductionOutcome {
    pub fn is_deferred(&self) -> bool {
        matches!(self, InductionOutcome::Deferred)
    }

    /// Induced rules, empty when deferred.
    pub fn into_rules(self) -> Vec<Rule> {
        match self {
            InductionOutcome::Induced(rules) => rules,
            InductionOutcome::Deferred => Vec::new(),
        }
    }
}

#[derive(Debug, Clone, Copy)]
struct Candidate {
    term: RuleTerm,
    score: f64,
}

/// One rule growing attempt: the rule if accepted, plus the final working
/// set as indices into the pool.
struct Attempt {
    rule: Option<Rule>,
    working: Vec<usize>,
}

/// Stateless rule induction engine.
///
/// Instances passed to [`learn`](Self::learn) must conform to the engine's
/// header (see [`InstanceHeader::check`]).
#[derive(Debug, Clone)]
pub struct RuleInductionEngine {
    header: Arc<InstanceHeader>,
    parallel_scoring: bool,
}

impl RuleInductionEngine {
    pub fn new(header: Arc<InstanceHeader>) -> Self {
        RuleInductionEngine {
            header,
            parallel_scoring: false,
        }
    }

    /// Score the candidates of all attributes in parallel. The outcome is
    /// identical to sequential scoring.
    pub fn with_parallel_scoring(mut self, parallel: bool) -> Self {
        self.parallel_scoring = parallel;
        self
    }

    pub fn header(&self) -> &InstanceHeader {
        &self.header
    }

    /// Induce rules from `batch`. `age` is stamped on every created rule.
    pub fn learn(&self, batch: &[Instance], age: u64) -> InductionOutcome {
        let classes: BTreeSet<usize> = batch.iter().map(Instance::class_index).collect();
        if classes.len() <= 1 {
            debug!(batch = batch.len(), "batch holds at most one class, deferring");
            return InductionOutcome::Deferred;
        }

        debug!(batch = batch.len(), classes = classes.len(), "inducing rules");
        let model = NumericModel::fit(&self.header, batch);
        let mut rules = Vec::new();

        for class in 0..self.header.num_classes() {
            let mut pool: Vec<&Instance> = batch.iter().collect();
            while pool.iter().any(|i| i.class_index() == class) {
                let attempt = self.grow_rule(&model, &pool, class, age);
                if let Some(rule) = attempt.rule {
                    debug!(
                        class,
                        terms = rule.terms().len(),
                        covered = rule.stats().instances_covered_at_creation,
                        "rule induced"
                    );
                    rules.push(rule);
                }

                let mut captured = vec![false; pool.len()];
                for &i in &attempt.working {
                    captured[i] = true;
                }
                let mut flags = captured.into_iter();
                pool.retain(|_| !flags.next().unwrap_or(false));
            }
        }

        debug!(rules = rules.len(), "induction finished");
        InductionOutcome::Induced(rules)
    }

    fn grow_rule(&self, model: &NumericModel, pool: &[&Instance], class: usize, age: u64) -> Attempt {
        let mut rule = Rule::new(class, self.header.num_classes(), age);
        let mut working: Vec<usize> = (0..pool.len()).collect();
        let mut used = vec![false; self.header.num_attributes()];

        while working.iter().any(|&i| pool[i].class_index() != class) {
            let Some(best) = self.best_candidate(model, pool, &working, &used, class) else {
                if majority_class(pool, &working, self.header.num_classes()) == Some(class) {
                    break;
                }
                trace!(class, "attributes exhausted without majority, discarding rule");
                return Attempt { rule: None, working };
            };

            if best.score == 0.0 {
                break;
            }

            trace!(class, term = ?best.term, score = best.score, "adding term");
            rule.push_term(best.term);
            used[best.term.attribute()] = true;
            working.retain(|&i| best.term.covers(pool[i]));
        }

        if rule.terms().is_empty() {
            return Attempt { rule: None, working };
        }
        rule.set_instances_covered_at_creation(working.len());
        Attempt {
            rule: Some(rule),
            working,
        }
    }

    /// Highest scoring candidate over all unused attributes, first one wins
    /// on ties. `None` when no candidate exists.
    fn best_candidate(
        &self,
        model: &NumericModel,
        pool: &[&Instance],
        working: &[usize],
        used: &[bool],
        class: usize,
    ) -> Option<Candidate> {
        let unused: Vec<usize> = (0..self.header.num_attributes()).filter(|&a| !used[a]).collect();
        let score = |&attribute: &usize| self.candidates(model, pool, working, attribute, class);

        let per_attribute: Vec<Vec<Candidate>> = if self.parallel_scoring {
            unused.par_iter().map(score).collect()
        } else {
            unused.iter().map(score).collect()
        };

        let mut best: Option<Candidate> = None;
        for candidate in per_attribute.into_iter().flatten() {
            if best.is_none_or(|b| candidate.score > b.score) {
                best = Some(candidate);
            }
        }
        best
    }

    fn candidates(
        &self,
        model: &NumericModel,
        pool: &[&Instance],
        working: &[usize],
        attribute: usize,
        class: usize,
    ) -> Vec<Candidate> {
        let Some(descriptor) = self.header.attribute(attribute) else {
            return Vec::new();
        };

        match &descriptor.kind {
            AttributeKind::Categorical { values } => {
                let mut occurrences = vec![0usize; values.len()];
                let mut matches = vec![0usize; values.len()];
                for &i in working {
                    let value = pool[i].value(attribute) as usize;
                    if let Some(count) = occurrences.get_mut(value) {
                        *count += 1;
                        if pool[i].class_index() == class {
                            matches[value] += 1;
                        }
                    }
                }

                (0..values.len())
                    .map(|value| Candidate {
                        term: RuleTerm::categorical(attribute, value),
                        score: if occurrences[value] == 0 {
                            0.0
                        } else {
                            matches[value] as f64 / occurrences[value] as f64
                        },
                    })
                    .collect()
            }
            AttributeKind::Numeric => {
                let Some(gaussian) = model.get(attribute, class) else {
                    return Vec::new();
                };
                let subset: Vec<&Instance> = working.iter().map(|&i| pool[i]).collect();
                match find_bounds(gaussian, attribute, &subset) {
                    Some(bounds) => vec![Candidate {
                        term: RuleTerm::numeric(attribute, bounds.lower, bounds.upper),
                        score: gaussian.probability(bounds.lower, bounds.upper),
                    }],
                    None => Vec::new(),
                }
            }
        }
    }
}

/// Most frequent class in the working set, highest index on ties.
fn majority_class(pool: &[&Instance], working: &[usize], num_classes: usize) -> Option<usize> {
    let mut counts = vec![0usize; num_classes];
    for &i in working {
        if let Some(count) = counts.get_mut(pool[i].class_index()) {
            *count += 1;
        }
    }
    let mut best: Option<(usize, usize)> = None;
    for (class, &count) in counts.iter().enumerate() {
        if count > 0 && best.is_none_or(|(_, c)| count >= c) {
            best = Some((class, count));
        }
    }
    best.map(|(class, _)| class)
}
