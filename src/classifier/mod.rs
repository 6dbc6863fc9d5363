//! Incremental rule-based stream classification.
//!
//! # Architecture
//!
//! - `StreamingClassifier` trait: test-then-train interface for hosts
//! - `StreamClassifier`: window buffering, induction scheduling, rule voting
//!   and accuracy-based pruning
//! - `SharedClassifier`: lock-protected handle that runs induction passes
//!   outside the write lock
//! - `evaluate_prequential`: predict-then-train driver over any stream
//!
//! # Example
//!
//! ```
//! use rulestream::classifier::{ClassifierConfig, StreamClassifier};
//! use rulestream::data::{Attribute, Instance, InstanceHeader};
//!
//! # fn main() -> rulestream::error::Result<()> {
//! let header = InstanceHeader::new(
//!     vec![
//!         Attribute::categorical("A", ["x", "y"]),
//!         Attribute::categorical("B", ["p", "q"]),
//!     ],
//!     "class",
//!     ["0", "1"],
//! )?;
//! let mut classifier =
//!     StreamClassifier::new(header, ClassifierConfig::default().with_window_size(4))?;
//!
//! for (a, b, class) in [(0, 0, 0), (0, 1, 0), (1, 0, 1), (1, 1, 1)] {
//!     classifier.train(&Instance::new(vec![a as f64, b as f64], class))?;
//! }
//!
//! let prediction = classifier.predict(&Instance::new(vec![1.0, 1.0], 1))?;
//! assert_eq!(prediction.predicted_class(), Some(1));
//! # Ok(())
//! # }
//! ```

pub mod config;
pub mod evaluation;
pub mod shared;
pub mod stream;
pub mod traits;

pub use config::ClassifierConfig;
pub use evaluation::{PrequentialSummary, evaluate_prequential};
pub use shared::SharedClassifier;
pub use stream::{
    ClassifierMetrics, CompletedInduction, InductionReport, PendingInduction, Prediction,
    StreamClassifier, TrainOutcome,
};
pub use traits::StreamingClassifier;
