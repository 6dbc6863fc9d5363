//! # rulestream
//!
//! Incremental, interpretable rule induction for classifying unbounded data
//! streams under a fixed memory budget.
//!
//! ## Features
//!
//! - PRISM-style separate-and-conquer induction over buffered windows
//! - Gaussian density bounds for numeric attributes
//! - Unweighted rule voting with class-frequency fallback
//! - Accuracy-threshold rule pruning
//! - Lock-friendly shared classifier and a prequential evaluation driver

pub mod classifier;
pub mod cli;
pub mod data;
pub mod error;
pub mod induction;
pub mod rules;

pub mod prelude {
    pub use crate::classifier::{
        ClassifierConfig, ClassifierMetrics, Prediction, SharedClassifier, StreamClassifier,
        StreamingClassifier, evaluate_prequential,
    };
    pub use crate::data::{Attribute, AttributeKind, Instance, InstanceHeader};
    pub use crate::error::{Result, RuleStreamError};
    pub use crate::induction::{InductionOutcome, RuleInductionEngine};
    pub use crate::rules::{Rule, RuleBase, RuleId, RuleTerm};
}

// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
