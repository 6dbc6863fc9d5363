//! Rules and the live rule base.
//!
//! A [`Rule`] is a conjunction of [`RuleTerm`]s with a target class and
//! running coverage statistics. The [`RuleBase`] holds every active rule;
//! rules leave it only through accuracy-based pruning and never come back.

pub mod base;
pub mod rule;
pub mod term;

pub use base::{CoverageUpdate, PruningPolicy, RuleBase};
pub use rule::{Rule, RuleDisplay, RuleId, RuleStats};
pub use term::{RuleTerm, TermDisplay};
