//! Attribute descriptors and the dataset header.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::data::instance::Instance;
use crate::error::{Result, RuleStreamError};

/// Kind of an input attribute.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum AttributeKind {
    /// Finite set of named values, stored in instances by index.
    Categorical { values: Vec<String> },
    /// Real-valued attribute.
    Numeric,
}

/// A named input attribute.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Attribute {
    /// Attribute name, unique within a header.
    pub name: String,
    /// Attribute kind.
    #[serde(flatten)]
    pub kind: AttributeKind,
}

impl Attribute {
    /// Create a categorical attribute with the given value labels.
    pub fn categorical<S, I, V>(name: S, values: I) -> Self
    where
        S: Into<String>,
        I: IntoIterator<Item = V>,
        V: Into<String>,
    {
        Attribute {
            name: name.into(),
            kind: AttributeKind::Categorical {
                values: values.into_iter().map(Into::into).collect(),
            },
        }
    }

    /// Create a numeric attribute.
    pub fn numeric<S: Into<String>>(name: S) -> Self {
        Attribute {
            name: name.into(),
            kind: AttributeKind::Numeric,
        }
    }

    pub fn is_numeric(&self) -> bool {
        matches!(self.kind, AttributeKind::Numeric)
    }

    pub fn is_categorical(&self) -> bool {
        matches!(self.kind, AttributeKind::Categorical { .. })
    }

    /// Number of declared values (0 for numeric attributes).
    pub fn num_values(&self) -> usize {
        match &self.kind {
            AttributeKind::Categorical { values } => values.len(),
            AttributeKind::Numeric => 0,
        }
    }

    /// Label of a categorical value index.
    pub fn value_label(&self, index: usize) -> Option<&str> {
        match &self.kind {
            AttributeKind::Categorical { values } => values.get(index).map(String::as_str),
            AttributeKind::Numeric => None,
        }
    }

    /// Index of a categorical value label.
    pub fn value_index(&self, label: &str) -> Option<usize> {
        match &self.kind {
            AttributeKind::Categorical { values } => values.iter().position(|v| v == label),
            AttributeKind::Numeric => None,
        }
    }
}

/// Serialized shape of a header.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct HeaderRepr {
    attributes: Vec<Attribute>,
    class: ClassRepr,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct ClassRepr {
    name: String,
    values: Vec<String>,
}

/// Describes the instances of a stream: input attributes plus the nominal
/// class attribute.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "HeaderRepr", into = "HeaderRepr")]
pub struct InstanceHeader {
    attributes: Vec<Attribute>,
    class_name: String,
    class_values: Vec<String>,
}

impl InstanceHeader {
    /// Create a header, validating attribute names and the class attribute.
    pub fn new<S, I, V>(attributes: Vec<Attribute>, class_name: S, class_values: I) -> Result<Self>
    where
        S: Into<String>,
        I: IntoIterator<Item = V>,
        V: Into<String>,
    {
        let class_name = class_name.into();
        let class_values: Vec<String> = class_values.into_iter().map(Into::into).collect();

        if class_values.is_empty() {
            return Err(RuleStreamError::schema(format!(
                "class attribute '{class_name}' must declare at least one value"
            )));
        }

        let mut names = HashSet::new();
        names.insert(class_name.as_str());
        for attribute in &attributes {
            if !names.insert(attribute.name.as_str()) {
                return Err(RuleStreamError::schema(format!(
                    "duplicate attribute name '{}'",
                    attribute.name
                )));
            }
            if attribute.is_categorical() && attribute.num_values() == 0 {
                return Err(RuleStreamError::schema(format!(
                    "categorical attribute '{}' declares no values",
                    attribute.name
                )));
            }
        }

        Ok(InstanceHeader {
            attributes,
            class_name,
            class_values,
        })
    }

    pub fn attributes(&self) -> &[Attribute] {
        &self.attributes
    }

    pub fn attribute(&self, index: usize) -> Option<&Attribute> {
        self.attributes.get(index)
    }

    /// Position of the attribute with the given name.
    pub fn attribute_index(&self, name: &str) -> Option<usize> {
        self.attributes.iter().position(|a| a.name == name)
    }

    pub fn num_attributes(&self) -> usize {
        self.attributes.len()
    }

    pub fn class_name(&self) -> &str {
        &self.class_name
    }

    pub fn num_classes(&self) -> usize {
        self.class_values.len()
    }

    pub fn class_label(&self, index: usize) -> Option<&str> {
        self.class_values.get(index).map(String::as_str)
    }

    pub fn class_index(&self, label: &str) -> Option<usize> {
        self.class_values.iter().position(|v| v == label)
    }

    /// Verify that an instance conforms to this header.
    pub fn check(&self, instance: &Instance) -> Result<()> {
        if instance.num_values() != self.attributes.len() {
            return Err(RuleStreamError::invalid_instance(format!(
                "expected {} attribute values, got {}",
                self.attributes.len(),
                instance.num_values()
            )));
        }
        if instance.class_index() >= self.num_classes() {
            return Err(RuleStreamError::invalid_instance(format!(
                "class index {} out of range for {} classes",
                instance.class_index(),
                self.num_classes()
            )));
        }
        for (attribute, &value) in self.attributes.iter().zip(instance.values()) {
            match &attribute.kind {
                AttributeKind::Categorical { values } => {
                    if value.fract() != 0.0 || value < 0.0 || value >= values.len() as f64 {
                        return Err(RuleStreamError::invalid_instance(format!(
                            "value {value} is not a valid index for categorical attribute '{}'",
                            attribute.name
                        )));
                    }
                }
                AttributeKind::Numeric => {
                    if !value.is_finite() {
                        return Err(RuleStreamError::invalid_instance(format!(
                            "numeric attribute '{}' has non-finite value {value}",
                            attribute.name
                        )));
                    }
                }
            }
        }
        Ok(())
    }
}

impl TryFrom<HeaderRepr> for InstanceHeader {
    type Error = RuleStreamError;

    fn try_from(repr: HeaderRepr) -> Result<Self> {
        InstanceHeader::new(repr.attributes, repr.class.name, repr.class.values)
    }
}

impl From<InstanceHeader> for HeaderRepr {
    fn from(header: InstanceHeader) -> Self {
        HeaderRepr {
            attributes: header.attributes,
            class: ClassRepr {
                name: header.class_name,
                values: header.class_values,
            },
        }
    }
}
