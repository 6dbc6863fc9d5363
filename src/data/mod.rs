//! Stream data model: attribute descriptors, the dataset header and instances.
//!
//! Categorical values are stored inside an [`Instance`] as the index of the
//! value in the attribute's declared value list, numeric values as-is. The
//! [`InstanceHeader`] gives those numbers their meaning.

pub mod generator;
pub mod header;
pub mod instance;
pub mod record;

pub use generator::{SyntheticStream, SyntheticStreamConfig};
pub use header::{Attribute, AttributeKind, InstanceHeader};
pub use instance::Instance;
pub use record::InstanceRecord;
