//! JSON-lines record format for instances.
//!
//! A record names categorical values and the class by label:
//!
//! ```json
//! {"values": ["sunny", 21.5], "class": "yes", "weight": 1.0}
//! ```

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::data::header::{AttributeKind, InstanceHeader};
use crate::data::instance::Instance;
use crate::error::{Result, RuleStreamError};

/// An instance as it appears in a JSON stream.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InstanceRecord {
    /// Attribute values in header order.
    pub values: Vec<Value>,
    /// Class label.
    pub class: String,
    /// Instance weight, 1.0 when absent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub weight: Option<f64>,
}

impl InstanceHeader {
    /// Convert a record into an instance of this header.
    pub fn parse_record(&self, record: &InstanceRecord) -> Result<Instance> {
        if record.values.len() != self.num_attributes() {
            return Err(RuleStreamError::invalid_instance(format!(
                "expected {} values, got {}",
                self.num_attributes(),
                record.values.len()
            )));
        }

        let mut values = Vec::with_capacity(record.values.len());
        for (attribute, raw) in self.attributes().iter().zip(&record.values) {
            let value = match &attribute.kind {
                AttributeKind::Categorical { .. } => {
                    let label = match raw {
                        Value::String(s) => s.clone(),
                        Value::Number(n) => n.to_string(),
                        Value::Bool(b) => b.to_string(),
                        other => {
                            return Err(RuleStreamError::invalid_instance(format!(
                                "unsupported value {other} for categorical attribute '{}'",
                                attribute.name
                            )));
                        }
                    };
                    attribute.value_index(&label).ok_or_else(|| {
                        RuleStreamError::invalid_instance(format!(
                            "unknown value '{label}' for attribute '{}'",
                            attribute.name
                        ))
                    })? as f64
                }
                AttributeKind::Numeric => raw.as_f64().ok_or_else(|| {
                    RuleStreamError::invalid_instance(format!(
                        "numeric attribute '{}' got non-numeric value {raw}",
                        attribute.name
                    ))
                })?,
            };
            values.push(value);
        }

        let class_index = self.class_index(&record.class).ok_or_else(|| {
            RuleStreamError::invalid_instance(format!("unknown class label '{}'", record.class))
        })?;

        let instance = Instance::new(values, class_index).with_weight(record.weight.unwrap_or(1.0));
        self.check(&instance)?;
        Ok(instance)
    }

    /// Convert an instance of this header back into a record.
    pub fn to_record(&self, instance: &Instance) -> Result<InstanceRecord> {
        self.check(instance)?;

        let values = self
            .attributes()
            .iter()
            .zip(instance.values())
            .map(|(attribute, &value)| match attribute.value_label(value as usize) {
                Some(label) => Value::String(label.to_string()),
                None => serde_json::Number::from_f64(value)
                    .map(Value::Number)
                    .unwrap_or(Value::Null),
            })
            .collect();

        let class = self
            .class_label(instance.class_index())
            .unwrap_or_default()
            .to_string();
        let weight = (instance.weight() != 1.0).then_some(instance.weight());

        Ok(InstanceRecord {
            values,
            class,
            weight,
        })
    }
}
