//! Batch rule induction.
//!
//! [`RuleInductionEngine`] runs a PRISM-style separate-and-conquer search over
//! one batch of buffered instances. Numeric attributes are handled through a
//! per-batch [`NumericModel`] of Gaussian densities.

pub mod engine;
pub mod numeric;

pub use engine::{InductionOutcome, RuleInductionEngine};
pub use numeric::{Gaussian, NumericBounds, NumericModel, find_bounds};
