//! Seeded synthetic stream with a hidden rule-shaped concept.
//!
//! Every categorical attribute takes one of three values and every numeric
//! attribute is uniform on `[0, 1)`. The class is the value index of the
//! first categorical attribute, rotated by one when the first numeric
//! attribute exceeds `0.7`. With probability `noise` the label is replaced by
//! a uniformly drawn class.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};

use crate::data::header::{Attribute, InstanceHeader};
use crate::data::instance::Instance;
use crate::error::{Result, RuleStreamError};

const NUM_CLASSES: usize = 3;
const CATEGORICAL_VALUES: [&str; 3] = ["a", "b", "c"];
const NUMERIC_SHIFT_THRESHOLD: f64 = 0.7;

/// Configuration of a [`SyntheticStream`].
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SyntheticStreamConfig {
    /// Number of categorical attributes (at least one).
    pub num_categorical: usize,
    /// Number of numeric attributes.
    pub num_numeric: usize,
    /// Probability of replacing the true label by a random one.
    pub noise: f64,
    /// RNG seed.
    pub seed: u64,
}

impl Default for SyntheticStreamConfig {
    fn default() -> Self {
        Self {
            num_categorical: 2,
            num_numeric: 1,
            noise: 0.0,
            seed: 1,
        }
    }
}

/// Endless iterator of synthetic instances.
#[derive(Debug)]
pub struct SyntheticStream {
    config: SyntheticStreamConfig,
    header: InstanceHeader,
    rng: StdRng,
}

impl SyntheticStream {
    pub fn new(config: SyntheticStreamConfig) -> Result<Self> {
        if config.num_categorical == 0 {
            return Err(RuleStreamError::invalid_config(
                "synthetic stream needs at least one categorical attribute",
            ));
        }
        if !(0.0..=1.0).contains(&config.noise) {
            return Err(RuleStreamError::invalid_config(format!(
                "noise must be within [0, 1], got {}",
                config.noise
            )));
        }

        let mut attributes = Vec::with_capacity(config.num_categorical + config.num_numeric);
        for i in 0..config.num_categorical {
            attributes.push(Attribute::categorical(format!("cat{i}"), CATEGORICAL_VALUES));
        }
        for i in 0..config.num_numeric {
            attributes.push(Attribute::numeric(format!("num{i}")));
        }
        let header = InstanceHeader::new(
            attributes,
            "class",
            (0..NUM_CLASSES).map(|c| format!("c{c}")),
        )?;

        Ok(SyntheticStream {
            rng: StdRng::seed_from_u64(config.seed),
            config,
            header,
        })
    }

    pub fn header(&self) -> &InstanceHeader {
        &self.header
    }

    fn next_instance(&mut self) -> Instance {
        let mut values = Vec::with_capacity(self.header.num_attributes());
        for _ in 0..self.config.num_categorical {
            values.push(self.rng.random_range(0..CATEGORICAL_VALUES.len()) as f64);
        }
        for _ in 0..self.config.num_numeric {
            values.push(self.rng.random::<f64>());
        }

        let mut class = values[0] as usize % NUM_CLASSES;
        if self.config.num_numeric > 0 && values[self.config.num_categorical] > NUMERIC_SHIFT_THRESHOLD {
            class = (class + 1) % NUM_CLASSES;
        }
        if self.config.noise > 0.0 && self.rng.random_bool(self.config.noise) {
            class = self.rng.random_range(0..NUM_CLASSES);
        }

        Instance::new(values, class)
    }
}

impl Iterator for SyntheticStream {
    type Item = Instance;

    fn next(&mut self) -> Option<Instance> {
        Some(self.next_instance())
    }
}
