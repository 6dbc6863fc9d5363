//! Streaming classifier trait definition.

use crate::data::Instance;
use crate::error::Result;

/// A classifier that learns from a stream one instance at a time.
///
/// Hosts call [`votes_for_instance`](Self::votes_for_instance) and then
/// [`train_on_instance`](Self::train_on_instance) for every instance
/// (test-then-train).
pub trait StreamingClassifier: Send + Sync {
    /// Number of class labels.
    fn num_classes(&self) -> usize;

    /// Class votes for an instance. The predicted class is the first index
    /// holding the maximum.
    fn votes_for_instance(&mut self, instance: &Instance) -> Result<Vec<f64>>;

    /// Learn from a labeled instance.
    fn train_on_instance(&mut self, instance: &Instance) -> Result<()>;

    /// Get the name of this classifier for debugging and logging.
    fn name(&self) -> &str;
}
