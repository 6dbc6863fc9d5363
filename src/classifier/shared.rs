//! Thread-safe handle around a [`StreamClassifier`].

use std::sync::Arc;

use parking_lot::RwLock;

use crate::classifier::stream::{ClassifierMetrics, Prediction, StreamClassifier, TrainOutcome};
use crate::classifier::traits::StreamingClassifier;
use crate::data::Instance;
use crate::error::Result;

/// Cloneable handle sharing one classifier between threads.
///
/// Predictions take a read lock. Training updates the classifier under the
/// write lock; when the window fills, the induction pass runs with the lock
/// released and its result is installed under the write lock again, so
/// readers never observe a partially updated rule base.
#[derive(Debug, Clone)]
pub struct SharedClassifier {
    inner: Arc<RwLock<StreamClassifier>>,
}

impl SharedClassifier {
    pub fn new(classifier: StreamClassifier) -> Self {
        SharedClassifier {
            inner: Arc::new(RwLock::new(classifier)),
        }
    }

    pub fn predict(&self, instance: &Instance) -> Result<Prediction> {
        self.inner.read().predict(instance)
    }

    pub fn votes_for_instance(&self, instance: &Instance) -> Result<Vec<f64>> {
        self.inner.write().votes_for_instance(instance)
    }

    pub fn train(&self, instance: &Instance) -> Result<TrainOutcome> {
        let (mut outcome, pending) = {
            let mut classifier = self.inner.write();
            classifier.header().check(instance)?;
            let outcome = classifier.observe(instance);
            (outcome, classifier.begin_induction())
        };

        if let Some(pending) = pending {
            let completed = pending.run();
            outcome.induction = Some(self.inner.write().install(completed));
        }
        Ok(outcome)
    }

    pub fn metrics(&self) -> ClassifierMetrics {
        self.inner.read().metrics()
    }

    /// Run `f` with read access to the classifier.
    pub fn read<R>(&self, f: impl FnOnce(&StreamClassifier) -> R) -> R {
        f(&self.inner.read())
    }
}

impl StreamingClassifier for SharedClassifier {
    fn num_classes(&self) -> usize {
        self.inner.read().header().num_classes()
    }

    fn votes_for_instance(&mut self, instance: &Instance) -> Result<Vec<f64>> {
        SharedClassifier::votes_for_instance(self, instance)
    }

    fn train_on_instance(&mut self, instance: &Instance) -> Result<()> {
        self.train(instance).map(|_| ())
    }

    fn name(&self) -> &str {
        "shared_stream_rules"
    }
}

#[cfg(test)]
mod tests {
    use std::thread;

    use super::*;
    use crate::classifier::ClassifierConfig;
    use crate::data::{SyntheticStream, SyntheticStreamConfig};

    #[test]
    fn test_shared_matches_plain_classifier() {
        let stream = SyntheticStream::new(SyntheticStreamConfig::default()).unwrap();
        let header = stream.header().clone();
        let instances: Vec<Instance> = stream.take(600).collect();
        let config = ClassifierConfig::default().with_window_size(50);

        let mut plain = StreamClassifier::new(header.clone(), config.clone()).unwrap();
        let shared = SharedClassifier::new(StreamClassifier::new(header, config).unwrap());
        for instance in &instances {
            plain.train(instance).unwrap();
            shared.train(instance).unwrap();
        }

        assert_eq!(plain.metrics(), shared.metrics());
        assert_eq!(plain.describe_rules(), shared.read(|c| c.describe_rules()));
    }

    #[test]
    fn test_concurrent_readers_and_writer() {
        let stream = SyntheticStream::new(SyntheticStreamConfig::default()).unwrap();
        let header = stream.header().clone();
        let instances: Vec<Instance> = stream.take(400).collect();
        let shared = SharedClassifier::new(
            StreamClassifier::new(header, ClassifierConfig::default().with_window_size(40)).unwrap(),
        );

        let writer = {
            let shared = shared.clone();
            let instances = instances.clone();
            thread::spawn(move || {
                for instance in &instances {
                    shared.train(instance).unwrap();
                }
            })
        };
        let reader = {
            let shared = shared.clone();
            thread::spawn(move || {
                for instance in &instances {
                    let prediction = shared.predict(instance).unwrap();
                    assert_eq!(prediction.votes.len(), 3);
                }
            })
        };

        writer.join().unwrap();
        reader.join().unwrap();
        assert_eq!(shared.metrics().instances_trained, 400);
        assert!(shared.metrics().induction_passes > 0);
    }
}
