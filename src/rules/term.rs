//! Single-attribute tests that make up a rule.

use std::fmt;

use crate::data::{Instance, InstanceHeader};

/// An immutable test on one attribute.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum RuleTerm {
    /// `attribute == value` where `value` is a categorical value index.
    Categorical { attribute: usize, value: usize },
    /// `lower < attribute <= upper`.
    ///
    /// A zero-width range (`lower == upper`) matches exactly that value.
    Numeric {
        attribute: usize,
        lower: f64,
        upper: f64,
    },
}

impl RuleTerm {
    pub fn categorical(attribute: usize, value: usize) -> Self {
        RuleTerm::Categorical { attribute, value }
    }

    pub fn numeric(attribute: usize, lower: f64, upper: f64) -> Self {
        RuleTerm::Numeric {
            attribute,
            lower,
            upper,
        }
    }

    /// Index of the attribute this term tests.
    pub fn attribute(&self) -> usize {
        match *self {
            RuleTerm::Categorical { attribute, .. } | RuleTerm::Numeric { attribute, .. } => attribute,
        }
    }

    /// Whether the instance satisfies this term.
    pub fn covers(&self, instance: &Instance) -> bool {
        match *self {
            RuleTerm::Categorical { attribute, value } => instance.value(attribute) == value as f64,
            RuleTerm::Numeric {
                attribute,
                lower,
                upper,
            } => {
                let v = instance.value(attribute);
                if lower == upper {
                    v == lower
                } else {
                    v > lower && v <= upper
                }
            }
        }
    }

    /// Human-readable rendering using the header's names.
    pub fn display<'a>(&'a self, header: &'a InstanceHeader) -> TermDisplay<'a> {
        TermDisplay { term: self, header }
    }
}

/// Display adapter returned by [`RuleTerm::display`].
pub struct TermDisplay<'a> {
    term: &'a RuleTerm,
    header: &'a InstanceHeader,
}

impl fmt::Display for TermDisplay<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let attribute = self.header.attribute(self.term.attribute());
        let name = attribute.map(|a| a.name.as_str()).unwrap_or("?");
        match *self.term {
            RuleTerm::Categorical { value, .. } => {
                let label = attribute.and_then(|a| a.value_label(value)).unwrap_or("?");
                write!(f, "[C]{name} = {label}")
            }
            RuleTerm::Numeric { lower, upper, .. } => {
                write!(f, "[N]{name} : {lower} < (value) <= {upper}")
            }
        }
    }
}
