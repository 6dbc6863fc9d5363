//! Gaussian models of numeric attributes and the density-peak bound search.
//!
//! The model is fitted from scratch on every induction call and is never
//! updated incrementally: new batches are the only way drift reaches it.

use std::collections::HashMap;

use statrs::distribution::{Continuous, ContinuousCDF, Normal};
use statrs::statistics::Statistics;

use crate::data::{Instance, InstanceHeader};

/// Normal distribution fitted to a sample.
///
/// A sample without spread (or with fewer than two values) is modelled as a
/// point mass at its mean: the density is infinite there and zero elsewhere,
/// and the CDF is a step.
#[derive(Debug, Clone, PartialEq)]
pub struct Gaussian {
    mean: f64,
    std_dev: f64,
    normal: Option<Normal>,
}

impl Gaussian {
    pub fn new(mean: f64, std_dev: f64) -> Self {
        let normal = if std_dev > 0.0 && std_dev.is_finite() {
            Normal::new(mean, std_dev).ok()
        } else {
            None
        };
        Gaussian {
            mean,
            std_dev: if normal.is_some() { std_dev } else { 0.0 },
            normal,
        }
    }

    /// Fit mean and sample standard deviation.
    pub fn fit(values: &[f64]) -> Self {
        if values.is_empty() {
            return Gaussian::new(0.0, 0.0);
        }
        let mean = values.iter().mean();
        let std_dev = if values.len() < 2 { 0.0 } else { values.iter().std_dev() };
        Gaussian::new(mean, std_dev)
    }

    pub fn mean(&self) -> f64 {
        self.mean
    }

    pub fn std_dev(&self) -> f64 {
        self.std_dev
    }

    pub fn density(&self, x: f64) -> f64 {
        match &self.normal {
            Some(normal) => normal.pdf(x),
            None if x == self.mean => f64::INFINITY,
            None => 0.0,
        }
    }

    pub fn cdf(&self, x: f64) -> f64 {
        match &self.normal {
            Some(normal) => normal.cdf(x),
            None if x >= self.mean => 1.0,
            None => 0.0,
        }
    }

    /// Probability mass of `(lower, upper]`; zero for an empty range.
    pub fn probability(&self, lower: f64, upper: f64) -> f64 {
        if upper <= lower {
            return 0.0;
        }
        (self.cdf(upper) - self.cdf(lower)).max(0.0)
    }
}

/// Per (numeric attribute, class) Gaussians for one batch.
///
/// Every class of an attribute is fitted on the whole batch, not only the
/// instances of that class.
#[derive(Debug, Clone, Default)]
pub struct NumericModel {
    distributions: HashMap<(usize, usize), Gaussian>,
}

impl NumericModel {
    pub fn fit(header: &InstanceHeader, batch: &[Instance]) -> Self {
        let mut distributions = HashMap::new();
        for (attribute, descriptor) in header.attributes().iter().enumerate() {
            if !descriptor.is_numeric() {
                continue;
            }
            let values: Vec<f64> = batch.iter().map(|i| i.value(attribute)).collect();
            let gaussian = Gaussian::fit(&values);
            for class in 0..header.num_classes() {
                distributions.insert((attribute, class), gaussian.clone());
            }
        }
        NumericModel { distributions }
    }

    pub fn get(&self, attribute: usize, class: usize) -> Option<&Gaussian> {
        self.distributions.get(&(attribute, class))
    }

    pub fn len(&self) -> usize {
        self.distributions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.distributions.is_empty()
    }
}

/// Range around the density peak of a numeric attribute.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NumericBounds {
    /// Value with the highest density.
    pub peak: f64,
    /// Exclusive lower bound.
    pub lower: f64,
    /// Inclusive upper bound.
    pub upper: f64,
}

/// Bracket the density peak of an attribute within `instances`.
///
/// Values are grouped by density: values sharing a density collapse into one
/// level represented by the value seen last. The peak is the value of the
/// densest level. The lower bound is the value of the densest level below the
/// peak and the upper bound the value of the densest level above it; a
/// missing side reuses the peak. For a unimodal density these are the nearest
/// surviving values on either side.
///
/// Returns `None` for an empty working set.
pub fn find_bounds(gaussian: &Gaussian, attribute: usize, instances: &[&Instance]) -> Option<NumericBounds> {
    let mut scored: Vec<(f64, usize, f64)> = instances
        .iter()
        .enumerate()
        .map(|(position, instance)| {
            let value = instance.value(attribute);
            (gaussian.density(value), position, value)
        })
        .collect();
    scored.sort_by(|a, b| a.0.total_cmp(&b.0).then(a.1.cmp(&b.1)));

    // ascending density, one entry per distinct density
    let mut levels: Vec<(f64, f64)> = Vec::with_capacity(scored.len());
    for (density, _, value) in scored {
        match levels.last_mut() {
            Some(level) if level.0 == density => level.1 = value,
            _ => levels.push((density, value)),
        }
    }

    let &(_, peak) = levels.last()?;
    let densest = |side: fn(f64, f64) -> bool| {
        levels
            .iter()
            .rev()
            .map(|&(_, value)| value)
            .find(|&value| side(value, peak))
            .unwrap_or(peak)
    };

    Some(NumericBounds {
        peak,
        lower: densest(|value, peak| value < peak),
        upper: densest(|value, peak| value > peak),
    })
}
