//! Adapter for message-style (object RPC) repository operations.
use anyhow::Result;

use crate::errors::ParameterExtraction;

use super::ExtractedFields;

/// Read named operation parameters from an opaque message payload.
///
/// Payload shapes vary per operation; implementations look a field up by name
/// and report absence rather than failing when the payload has no such field.
///
/// - Return `Ok(None)` if the payload carries no field with the given name.
/// - Return `Err` only if the field exists but could not be read or decoded.
///
/// Implementations are read-only views over the captured payload and must be
/// safe to share across the threads serving concurrent invocations.
pub trait MessageFields: Send + Sync {
    /// Look for a field with the given name on the payload.
    fn field(&self, name: &str) -> Result<Option<String>>;
}

impl MessageFields for std::collections::BTreeMap<String, String> {
    fn field(&self, name: &str) -> Result<Option<String>> {
        Ok(self.get(name).cloned())
    }
}

/// Declarative extraction rule for a message-style operation.
///
/// The accessor name lists are the only thing that varies between operations:
/// the reading logic is shared by every message-style handler.
#[derive(Clone, Debug)]
pub struct MessageRule {
    /// Fields the operation cannot proceed without.
    pub required: &'static [&'static str],

    /// Fields attached as attributes only when present and non-empty.
    pub optional: &'static [&'static str],
}

impl MessageRule {
    /// Extract the operation's fields from a message payload.
    ///
    /// Any reader failure is wrapped into a [`ParameterExtraction::Read`]
    /// error naming the field and preserving the underlying cause. A missing
    /// or blank required field is a [`ParameterExtraction::MissingRequired`]
    /// error. Absent or blank optional fields are simply omitted.
    pub fn extract(&self, payload: &dyn MessageFields) -> Result<ExtractedFields> {
        let mut extracted = ExtractedFields::new();
        for field in self.required {
            match self.read(payload, field)? {
                Some(value) => extracted.insert(field, value),
                None => {
                    let error = ParameterExtraction::MissingRequired {
                        field: field.to_string(),
                    };
                    return Err(error.into());
                }
            }
        }
        for field in self.optional {
            if let Some(value) = self.read(payload, field)? {
                extracted.insert(field, value);
            }
        }
        Ok(extracted)
    }

    /// Read one field, normalising blank values to absent.
    fn read(&self, payload: &dyn MessageFields, field: &'static str) -> Result<Option<String>> {
        let value = payload.field(field).map_err(|source| {
            ParameterExtraction::Read {
                field: field.to_string(),
                source,
            }
        })?;
        let value = value.filter(|value| !value.is_empty());
        Ok(value)
    }
}
