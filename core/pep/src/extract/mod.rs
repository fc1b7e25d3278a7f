//! Transport adapters: capture raw call data and extract operation specific fields.
//!
//! Two call surfaces reach the enforcement layer: path-addressed calls (an
//! ordered sequence of path segments plus query parameters) and message-style
//! remote calls (an opaque payload exposing named read accessors). Both are
//! reduced to the same [`ExtractedFields`] bag so the rest of the layer never
//! cares which surface a call arrived on.
use std::collections::BTreeMap;

mod message;
mod path;

pub use self::message::MessageFields;
pub use self::message::MessageRule;
pub use self::path::PathCall;
pub use self::path::PathRule;
pub use self::path::PathSubResource;
pub use self::path::TemporalParam;

/// Well known extracted field names shared by the operation tables.
pub mod fields {
    /// Identifier of the digital object the operation targets.
    pub const PID: &str = "pid";

    pub const AS_OF_DATETIME: &str = "asOfDateTime";
    pub const CHECKSUM: &str = "checksum";
    pub const CHECKSUM_TYPE: &str = "checksumType";
    pub const CONTROL_GROUP: &str = "controlGroup";
    pub const DS_ID: &str = "dsID";
    pub const DS_LOCATION: &str = "dsLocation";
    pub const DS_STATE: &str = "dsState";
    pub const FORMAT_URI: &str = "formatURI";
    pub const MIME_TYPE: &str = "mimeType";
    pub const SDEF_PID: &str = "sDefPid";
}

/// The raw transport capture for one inbound call.
pub enum Call<'a> {
    /// A path-addressed call decomposed into segments and query parameters.
    Path(&'a PathCall),

    /// A message-style call exposing named read accessors.
    Message(&'a dyn MessageFields),
}

/// Operation specific fields extracted from an inbound call.
///
/// Values are guaranteed non-empty: absent or blank fields are never stored,
/// they are simply not present in the bag.
#[derive(Clone, Debug, Default)]
pub struct ExtractedFields(BTreeMap<&'static str, String>);

impl ExtractedFields {
    /// Create an empty field bag.
    pub fn new() -> ExtractedFields {
        ExtractedFields::default()
    }

    /// Access the value of an extracted field.
    pub fn get(&self, field: &str) -> Option<&str> {
        self.0.get(field).map(String::as_str)
    }

    /// Store an extracted field, dropping blank values.
    pub fn insert(&mut self, field: &'static str, value: String) {
        if !value.is_empty() {
            self.0.insert(field, value);
        }
    }
}
