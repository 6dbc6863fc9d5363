//! Prequential (test-then-train) evaluation over a stream.

use std::time::{Duration, Instant};

use serde::{Deserialize, Serialize};

use crate::classifier::stream::first_max_index;
use crate::classifier::traits::StreamingClassifier;
use crate::data::Instance;
use crate::error::Result;

/// Summary of a prequential run.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PrequentialSummary {
    /// Instances processed.
    pub instances: u64,
    /// Instances whose predicted class matched the true class.
    pub correct: u64,
    /// Wall-clock duration of the run.
    pub duration: Duration,
}

impl PrequentialSummary {
    /// `correct / instances`, undefined for an empty stream.
    pub fn accuracy(&self) -> Option<f64> {
        (self.instances > 0).then(|| self.correct as f64 / self.instances as f64)
    }
}

/// Predict then train on every instance of `stream`.
pub fn evaluate_prequential<C, I>(classifier: &mut C, stream: I) -> Result<PrequentialSummary>
where
    C: StreamingClassifier + ?Sized,
    I: IntoIterator<Item = Instance>,
{
    let start = Instant::now();
    let mut summary = PrequentialSummary::default();

    for instance in stream {
        let votes = classifier.votes_for_instance(&instance)?;
        if first_max_index(&votes) == Some(instance.class_index()) {
            summary.correct += 1;
        }
        classifier.train_on_instance(&instance)?;
        summary.instances += 1;
    }

    summary.duration = start.elapsed();
    Ok(summary)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::classifier::{ClassifierConfig, StreamClassifier};
    use crate::data::{SyntheticStream, SyntheticStreamConfig};

    #[test]
    fn test_prequential_on_clean_stream() {
        let config = SyntheticStreamConfig {
            num_numeric: 0,
            ..Default::default()
        };
        let stream = SyntheticStream::new(config).unwrap();
        let header = stream.header().clone();
        let mut classifier =
            StreamClassifier::new(header, ClassifierConfig::default().with_window_size(100)).unwrap();

        let summary = evaluate_prequential(&mut classifier, stream.take(2000)).unwrap();
        assert_eq!(summary.instances, 2000);
        assert!(summary.accuracy().unwrap() > 0.9);
        assert_eq!(classifier.metrics().instances_seen, 2000);
        assert!(classifier.rule_base().len() > 0);
    }

    #[test]
    fn test_empty_stream() {
        let stream = SyntheticStream::new(SyntheticStreamConfig::default()).unwrap();
        let mut classifier =
            StreamClassifier::new(stream.header().clone(), ClassifierConfig::default()).unwrap();
        let summary = evaluate_prequential(&mut classifier, Vec::new()).unwrap();
        assert_eq!(summary.accuracy(), None);
    }
}
