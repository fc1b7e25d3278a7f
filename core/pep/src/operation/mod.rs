//! Declarative operation tables driving the generic enforcement flow.
//!
//! Rather than one hand-written handler per repository operation, each
//! operation is described by an [`OperationSpec`]: its default action and API
//! family, the transport extraction rule, the field-to-attribute table and an
//! optional escalation rule. One generic flow interprets these tables for
//! every operation on either call surface.
use anyhow::Result;

use crate::attrs::ValueKind;
use crate::errors::TransportMismatch;
use crate::extract::Call;
use crate::extract::ExtractedFields;
use crate::extract::MessageRule;
use crate::extract::PathRule;

mod builtin;
mod registry;

pub use self::builtin::policy_datastream_escalation;
pub use self::builtin::ADD_DATASTREAM;
pub use self::builtin::GET_OBJECT_XML;
pub use self::builtin::LIST_DATASTREAMS;
pub use self::builtin::LIST_METHODS;
pub use self::builtin::MODIFY_DATASTREAM_BY_REFERENCE;
pub use self::builtin::PURGE_DATASTREAM;
pub use self::registry::HandlerRegistry;
pub use self::registry::HandlerRegistryBuilder;

/// API family a repository operation belongs to.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum ApiCategory {
    /// The read/access API.
    Access,

    /// The content management API.
    Management,
}

impl ApiCategory {
    /// Canonical URN value for the API category attribute.
    pub fn as_urn(&self) -> &'static str {
        match self {
            ApiCategory::Access => crate::vocabulary::action::API_ACCESS,
            ApiCategory::Management => crate::vocabulary::action::API_MANAGEMENT,
        }
    }
}

/// One entry of an operation's field-to-attribute table.
#[derive(Clone, Debug)]
pub struct FieldSpec {
    /// Canonical attribute identifier the field maps onto.
    pub attribute: &'static str,

    /// Extracted field the entry reads from.
    pub field: &'static str,

    /// Value type the raw field is converted to.
    pub kind: ValueKind,
}

/// Operation specific rule substituting a more privileged action.
///
/// Runs after default action assignment and before the request is finalised:
/// a returned override always replaces the operation's default action
/// identifier.
pub type EscalationRule = fn(&ExtractedFields) -> Option<&'static str>;

/// Transport extraction rule for an operation.
#[derive(Clone, Debug)]
pub enum Extraction {
    /// The operation is invoked over the path-addressed surface.
    Path(PathRule),

    /// The operation is invoked over the message-style surface.
    Message(MessageRule),
}

impl Extraction {
    /// Extract operation fields from a call, rejecting mismatched transports.
    pub fn extract(&self, operation: &str, call: &Call<'_>) -> Result<ExtractedFields> {
        match (self, call) {
            (Extraction::Path(rule), Call::Path(call)) => rule.extract(call),
            (Extraction::Message(rule), Call::Message(payload)) => rule.extract(*payload),
            _ => {
                let error = TransportMismatch {
                    operation: operation.to_string(),
                };
                Err(error.into())
            }
        }
    }
}

/// Static description of one repository operation for the enforcement layer.
#[derive(Clone, Debug)]
pub struct OperationSpec {
    /// Default action identifier attempted by the operation.
    pub action: &'static str,

    /// API family the operation belongs to.
    pub api: ApiCategory,

    /// Extracted field recorded as the audit sub-resource, if any.
    pub audit_sub_resource: Option<&'static str>,

    /// Optional rule substituting a more privileged action.
    pub escalation: Option<EscalationRule>,

    /// Transport extraction rule.
    pub extract: Extraction,

    /// Field-to-attribute table for the resource map.
    pub fields: &'static [FieldSpec],

    /// Operation identity the registry is keyed by.
    pub name: &'static str,
}
