//! Classifier configuration.

use serde::{Deserialize, Serialize};

use crate::error::{Result, RuleStreamError};
use crate::rules::PruningPolicy;

/// Configuration for [`StreamClassifier`](crate::classifier::StreamClassifier).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClassifierConfig {
    /// Number of uncovered instances buffered before an induction pass.
    /// Zero disables induction.
    pub window_size: usize,
    /// Coverings a rule must have before it may be pruned.
    pub min_rule_trials: u64,
    /// Rules whose accuracy falls strictly below this value are pruned.
    pub accuracy_threshold: f64,
    /// Score induction candidates on the rayon thread pool.
    pub parallel_scoring: bool,
}

impl Default for ClassifierConfig {
    fn default() -> Self {
        Self {
            window_size: 500,
            min_rule_trials: 10,
            accuracy_threshold: 0.8,
            parallel_scoring: false,
        }
    }
}

impl ClassifierConfig {
    pub fn with_window_size(mut self, window_size: usize) -> Self {
        self.window_size = window_size;
        self
    }

    pub fn with_min_rule_trials(mut self, min_rule_trials: u64) -> Self {
        self.min_rule_trials = min_rule_trials;
        self
    }

    pub fn with_accuracy_threshold(mut self, accuracy_threshold: f64) -> Self {
        self.accuracy_threshold = accuracy_threshold;
        self
    }

    pub fn with_parallel_scoring(mut self, parallel_scoring: bool) -> Self {
        self.parallel_scoring = parallel_scoring;
        self
    }

    /// Check the value ranges.
    pub fn validate(&self) -> Result<()> {
        if self.min_rule_trials < 2 {
            return Err(RuleStreamError::invalid_config(format!(
                "min_rule_trials must be at least 2, got {}",
                self.min_rule_trials
            )));
        }
        if !(0.0..=1.0).contains(&self.accuracy_threshold) {
            return Err(RuleStreamError::invalid_config(format!(
                "accuracy_threshold must be within [0, 1], got {}",
                self.accuracy_threshold
            )));
        }
        Ok(())
    }

    pub fn pruning_policy(&self) -> PruningPolicy {
        PruningPolicy {
            min_rule_trials: self.min_rule_trials,
            accuracy_threshold: self.accuracy_threshold,
        }
    }
}
