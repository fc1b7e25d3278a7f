//! Typed attribute values and the maps decision requests are assembled from.
use std::collections::BTreeMap;

use anyhow::Result;
use serde::Deserialize;
use serde::Serialize;
use time::format_description::well_known::Rfc3339;
use time::OffsetDateTime;
use url::Url;

use crate::errors::MalformedRequest;

/// An immutable typed value attached to a canonical attribute identifier.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub enum AttributeValue {
    /// A plain string literal.
    String(String),

    /// A URI, validated at construction.
    Uri(Url),

    /// An RFC 3339 date-time.
    DateTime(#[serde(with = "time::serde::rfc3339")] OffsetDateTime),
}

impl AttributeValue {
    /// Access the value as a string slice, for string attributes.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            AttributeValue::String(value) => Some(value),
            _ => None,
        }
    }
}

/// Expected type of an attribute value in a per-operation field table.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum ValueKind {
    /// Keep the extracted value as a string literal.
    String,

    /// Parse the extracted value as a URI.
    AnyUri,

    /// Parse the extracted value as an RFC 3339 date-time.
    DateTime,
}

impl ValueKind {
    /// Convert a raw extracted field into a typed [`AttributeValue`].
    ///
    /// URI and date-time values that fail to parse are [`MalformedRequest`]
    /// errors naming the offending field.
    pub fn value(&self, field: &str, raw: &str) -> Result<AttributeValue> {
        match self {
            ValueKind::String => Ok(AttributeValue::String(raw.to_string())),
            ValueKind::AnyUri => {
                let url = Url::parse(raw).map_err(|_| MalformedRequest::InvalidUri {
                    field: field.to_string(),
                    value: raw.to_string(),
                })?;
                Ok(AttributeValue::Uri(url))
            }
            ValueKind::DateTime => {
                let time = OffsetDateTime::parse(raw, &Rfc3339).map_err(|_| {
                    MalformedRequest::InvalidDateTime {
                        field: field.to_string(),
                        value: raw.to_string(),
                    }
                })?;
                Ok(AttributeValue::DateTime(time))
            }
        }
    }
}

/// Attributes keyed by canonical identifier URN.
///
/// Keys are unique within a map: inserting an identifier that is already
/// present replaces the previous value. Escalation rules rely on this to
/// substitute, never duplicate, the action identifier.
#[derive(Clone, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AttributeMap(BTreeMap<String, AttributeValue>);

impl AttributeMap {
    /// Create an empty attribute map.
    pub fn new() -> AttributeMap {
        AttributeMap::default()
    }

    /// Check if the map holds an attribute with the given identifier.
    pub fn contains(&self, id: &str) -> bool {
        self.0.contains_key(id)
    }

    /// Access the attribute with the given identifier.
    pub fn get(&self, id: &str) -> Option<&AttributeValue> {
        self.0.get(id)
    }

    /// Add an attribute to the map, replacing any previous value for the identifier.
    pub fn insert<K: Into<String>>(&mut self, id: K, value: AttributeValue) -> Option<AttributeValue> {
        self.0.insert(id.into(), value)
    }

    /// Check if the map holds no attributes.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Iterate over identifier/value pairs in the map.
    pub fn iter(&self) -> impl Iterator<Item = (&String, &AttributeValue)> {
        self.0.iter()
    }

    /// Number of attributes in the map.
    pub fn len(&self) -> usize {
        self.0.len()
    }
}
