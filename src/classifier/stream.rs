//! The stream classifier: buffering, induction scheduling, voting and
//! rule maintenance.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::classifier::config::ClassifierConfig;
use crate::classifier::traits::StreamingClassifier;
use crate::data::{Instance, InstanceHeader};
use crate::error::Result;
use crate::induction::{InductionOutcome, RuleInductionEngine};
use crate::rules::{Rule, RuleBase, RuleId};

/// Votes for one instance.
#[derive(Debug, Clone, PartialEq)]
pub struct Prediction {
    /// Rule votes when covered, otherwise the weighted class frequencies.
    pub votes: Vec<f64>,
    /// Whether at least one rule covered the instance.
    pub covered: bool,
}

impl Prediction {
    /// First class index holding the maximum vote, `None` if no vote is
    /// positive.
    pub fn predicted_class(&self) -> Option<usize> {
        first_max_index(&self.votes)
    }
}

/// First index of the maximum of `votes`, `None` unless some vote is
/// positive.
pub(crate) fn first_max_index(votes: &[f64]) -> Option<usize> {
    let mut best: Option<(usize, f64)> = None;
    for (i, &vote) in votes.iter().enumerate() {
        if vote > best.map_or(0.0, |(_, v)| v) {
            best = Some((i, vote));
        }
    }
    best.map(|(i, _)| i)
}

/// What an induction pass did.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InductionReport {
    /// Instances the pass ran over (window plus leftover).
    pub batch_size: usize,
    /// The batch held a single class and was requeued as leftover.
    pub deferred: bool,
    /// Ids of the rules added to the rule base.
    pub rules_added: Vec<RuleId>,
}

/// What a training step did.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TrainOutcome {
    /// Rules that covered the instance.
    pub covered_by: usize,
    /// Rules pruned because of the instance.
    pub pruned: Vec<RuleId>,
    /// Present when the step filled the window.
    pub induction: Option<InductionReport>,
}

/// Counters and rates describing the classifier so far.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ClassifierMetrics {
    /// Instances passed to `votes_for_instance`.
    pub instances_seen: u64,
    /// Instances passed to `train`.
    pub instances_trained: u64,
    /// Recorded predictions where at least one rule covered the instance.
    pub attempts: u64,
    /// Covered predictions whose voted class was correct.
    pub correct_attempts: u64,
    pub induction_passes: u64,
    pub deferred_batches: u64,
    pub rules_pruned: u64,
    pub rule_count: usize,
    pub window_len: usize,
    pub leftover_len: usize,
    /// `attempts / instances_seen`, undefined before the first prediction.
    pub abstaining_rate: Option<f64>,
    /// `correct_attempts / attempts`, undefined before the first covered
    /// prediction.
    pub tentative_accuracy: Option<f64>,
}

#[derive(Debug, Clone, Default)]
struct Counters {
    instances_seen: u64,
    instances_trained: u64,
    attempts: u64,
    correct_attempts: u64,
    induction_passes: u64,
    deferred_batches: u64,
    rules_pruned: u64,
}

/// A batch taken out of the classifier, ready to be induced.
///
/// Running it does not touch the classifier, so it can happen outside any
/// lock guarding the classifier. The result goes back through
/// [`StreamClassifier::install`].
#[derive(Debug)]
pub struct PendingInduction {
    engine: RuleInductionEngine,
    batch: Vec<Instance>,
    age: u64,
}

impl PendingInduction {
    pub fn batch(&self) -> &[Instance] {
        &self.batch
    }

    pub fn run(self) -> CompletedInduction {
        let outcome = self.engine.learn(&self.batch, self.age);
        CompletedInduction {
            batch: self.batch,
            outcome,
        }
    }
}

/// Result of [`PendingInduction::run`].
#[derive(Debug)]
pub struct CompletedInduction {
    batch: Vec<Instance>,
    outcome: InductionOutcome,
}

impl CompletedInduction {
    pub fn outcome(&self) -> &InductionOutcome {
        &self.outcome
    }
}

/// Incremental rule-based classifier for data streams.
///
/// Instances no rule covers are buffered; every time the buffer reaches the
/// configured window size a separate-and-conquer pass induces new rules from
/// it. Covered instances update the statistics of the covering rules, and
/// rules whose accuracy drops below the threshold are pruned. Predictions
/// are unweighted rule votes, or the class frequencies seen so far when no
/// rule covers the instance.
#[derive(Debug, Clone)]
pub struct StreamClassifier {
    header: Arc<InstanceHeader>,
    config: ClassifierConfig,
    engine: RuleInductionEngine,
    rule_base: RuleBase,
    window: Vec<Instance>,
    leftover: Vec<Instance>,
    class_distribution: Vec<f64>,
    counters: Counters,
}

impl StreamClassifier {
    pub fn new(header: InstanceHeader, config: ClassifierConfig) -> Result<Self> {
        Self::with_header(Arc::new(header), config)
    }

    pub fn with_header(header: Arc<InstanceHeader>, config: ClassifierConfig) -> Result<Self> {
        config.validate()?;
        let engine =
            RuleInductionEngine::new(header.clone()).with_parallel_scoring(config.parallel_scoring);
        Ok(StreamClassifier {
            class_distribution: vec![0.0; header.num_classes()],
            window: Vec::with_capacity(config.window_size),
            leftover: Vec::new(),
            rule_base: RuleBase::new(),
            counters: Counters::default(),
            engine,
            header,
            config,
        })
    }

    pub fn header(&self) -> &InstanceHeader {
        &self.header
    }

    pub fn config(&self) -> &ClassifierConfig {
        &self.config
    }

    pub fn rule_base(&self) -> &RuleBase {
        &self.rule_base
    }

    pub fn rules(&self) -> impl Iterator<Item = &Rule> {
        self.rule_base.iter()
    }

    pub fn window(&self) -> &[Instance] {
        &self.window
    }

    pub fn leftover(&self) -> &[Instance] {
        &self.leftover
    }

    /// Accumulated instance weight per true class since the stream started.
    pub fn class_distribution(&self) -> &[f64] {
        &self.class_distribution
    }

    /// Votes for an instance without recording anything.
    pub fn predict(&self, instance: &Instance) -> Result<Prediction> {
        self.header.check(instance)?;
        Ok(match self.rule_base.votes(instance, self.header.num_classes()) {
            Some(votes) => Prediction {
                votes,
                covered: true,
            },
            None => Prediction {
                votes: self.class_distribution.clone(),
                covered: false,
            },
        })
    }

    /// Votes for an instance, recording the abstaining and tentative
    /// accuracy statistics against its true class.
    pub fn votes_for_instance(&mut self, instance: &Instance) -> Result<Vec<f64>> {
        let prediction = self.predict(instance)?;
        self.counters.instances_seen += 1;
        if prediction.covered {
            self.counters.attempts += 1;
            if prediction.predicted_class() == Some(instance.class_index()) {
                self.counters.correct_attempts += 1;
            }
        }
        Ok(prediction.votes)
    }

    /// Learn from one labeled instance.
    pub fn train(&mut self, instance: &Instance) -> Result<TrainOutcome> {
        self.header.check(instance)?;
        let mut outcome = self.observe(instance);
        if let Some(pending) = self.begin_induction() {
            let completed = pending.run();
            outcome.induction = Some(self.install(completed));
        }
        Ok(outcome)
    }

    /// Class statistics, rule maintenance and buffering for one instance.
    /// The instance must already be checked against the header.
    pub(crate) fn observe(&mut self, instance: &Instance) -> TrainOutcome {
        self.counters.instances_trained += 1;
        if let Some(mass) = self.class_distribution.get_mut(instance.class_index()) {
            *mass += instance.weight();
        }

        let update = self
            .rule_base
            .update(instance, &self.config.pruning_policy());
        self.counters.rules_pruned += update.pruned.len() as u64;

        if update.covered_by == 0 && self.config.window_size > 0 {
            self.window.push(instance.clone());
        }

        TrainOutcome {
            covered_by: update.covered_by,
            pruned: update.pruned,
            induction: None,
        }
    }

    /// Take the window (plus leftover) out once the window is full.
    pub fn begin_induction(&mut self) -> Option<PendingInduction> {
        if self.config.window_size == 0 || self.window.len() < self.config.window_size {
            return None;
        }

        let mut batch = std::mem::take(&mut self.window);
        batch.append(&mut self.leftover);
        self.window.reserve(self.config.window_size);

        Some(PendingInduction {
            engine: self.engine.clone(),
            batch,
            age: self.counters.instances_seen,
        })
    }

    /// Apply a finished induction pass: append the new rules, or requeue the
    /// whole batch as leftover when it was deferred.
    pub fn install(&mut self, completed: CompletedInduction) -> InductionReport {
        self.counters.induction_passes += 1;
        let batch_size = completed.batch.len();

        match completed.outcome {
            InductionOutcome::Deferred => {
                self.counters.deferred_batches += 1;
                self.leftover.extend(completed.batch);
                debug!(
                    batch = batch_size,
                    leftover = self.leftover.len(),
                    "batch deferred to leftover buffer"
                );
                InductionReport {
                    batch_size,
                    deferred: true,
                    rules_added: Vec::new(),
                }
            }
            InductionOutcome::Induced(rules) => {
                let rules_added = self.rule_base.extend(rules);
                info!(
                    batch = batch_size,
                    added = rules_added.len(),
                    total = self.rule_base.len(),
                    "installed induced rules"
                );
                InductionReport {
                    batch_size,
                    deferred: false,
                    rules_added,
                }
            }
        }
    }

    pub fn metrics(&self) -> ClassifierMetrics {
        let c = &self.counters;
        ClassifierMetrics {
            instances_seen: c.instances_seen,
            instances_trained: c.instances_trained,
            attempts: c.attempts,
            correct_attempts: c.correct_attempts,
            induction_passes: c.induction_passes,
            deferred_batches: c.deferred_batches,
            rules_pruned: c.rules_pruned,
            rule_count: self.rule_base.len(),
            window_len: self.window.len(),
            leftover_len: self.leftover.len(),
            abstaining_rate: ratio(c.attempts, c.instances_seen),
            tentative_accuracy: ratio(c.correct_attempts, c.attempts),
        }
    }

    /// Rendered rules, one line each.
    pub fn describe_rules(&self) -> Vec<String> {
        self.rule_base
            .iter()
            .map(|rule| {
                rule.display(&self.header, self.counters.instances_seen)
                    .to_string()
            })
            .collect()
    }

    /// Forget everything learned, keeping header and configuration.
    pub fn reset(&mut self) {
        self.rule_base.clear();
        self.window.clear();
        self.leftover.clear();
        self.class_distribution.iter_mut().for_each(|mass| *mass = 0.0);
        self.counters = Counters::default();
    }
}

fn ratio(numerator: u64, denominator: u64) -> Option<f64> {
    (denominator > 0).then(|| numerator as f64 / denominator as f64)
}

impl StreamingClassifier for StreamClassifier {
    fn num_classes(&self) -> usize {
        self.header.num_classes()
    }

    fn votes_for_instance(&mut self, instance: &Instance) -> Result<Vec<f64>> {
        StreamClassifier::votes_for_instance(self, instance)
    }

    fn train_on_instance(&mut self, instance: &Instance) -> Result<()> {
        self.train(instance).map(|_| ())
    }

    fn name(&self) -> &str {
        "stream_rules"
    }
}
