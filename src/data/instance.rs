//! Labeled stream instances.

use serde::{Deserialize, Serialize};

/// One labeled observation: attribute values, the true class and a weight.
///
/// Categorical values are stored as value indices (see
/// [`InstanceHeader`](crate::data::InstanceHeader)).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Instance {
    values: Vec<f64>,
    class_index: usize,
    weight: f64,
}

impl Instance {
    /// Create an instance with unit weight.
    pub fn new(values: Vec<f64>, class_index: usize) -> Self {
        Instance {
            values,
            class_index,
            weight: 1.0,
        }
    }

    /// Set the instance weight.
    pub fn with_weight(mut self, weight: f64) -> Self {
        self.weight = weight;
        self
    }

    pub fn values(&self) -> &[f64] {
        &self.values
    }

    /// Value of the attribute at `attribute`.
    ///
    /// # Panics
    ///
    /// Panics if `attribute` is out of range for this instance.
    pub fn value(&self, attribute: usize) -> f64 {
        self.values[attribute]
    }

    pub fn num_values(&self) -> usize {
        self.values.len()
    }

    pub fn class_index(&self) -> usize {
        self.class_index
    }

    pub fn weight(&self) -> f64 {
        self.weight
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_instance_accessors() {
        let instance = Instance::new(vec![1.0, 2.5], 1).with_weight(0.5);
        assert_eq!(instance.value(1), 2.5);
        assert_eq!(instance.num_values(), 2);
        assert_eq!(instance.class_index(), 1);
        assert_eq!(instance.weight(), 0.5);
        assert_eq!(Instance::new(vec![], 0).weight(), 1.0);
    }

    #[test]
    fn test_instance_equality() {
        let a = Instance::new(vec![1.0, 2.0], 0);
        assert_eq!(a, Instance::new(vec![1.0, 2.0], 0));
        assert_ne!(a, Instance::new(vec![1.0, 2.0], 1));
        assert_ne!(a, Instance::new(vec![1.0, 2.0], 0).with_weight(2.0));
    }
}
