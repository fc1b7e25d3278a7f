//! Errors raised while translating inbound calls into decision requests.
//!
//! The first three kinds abort the invocation with no partial decision request
//! (fail-closed); audit recording failures are logged by the enforcement layer
//! and never surface to the caller.
use thiserror::Error;

/// The inbound call cannot be interpreted as a valid operation invocation.
#[derive(Debug, Error)]
pub enum MalformedRequest {
    /// A URI-typed field failed to parse.
    #[error("value '{value}' of field '{field}' is not a valid URI")]
    InvalidUri { field: String, value: String },

    /// A date-time typed field failed to parse.
    #[error("value '{value}' of field '{field}' is not a valid RFC 3339 date-time")]
    InvalidDateTime { field: String, value: String },

    /// The request path does not carry enough segments for the operation.
    #[error("not enough path segments on request path '{path}'")]
    PathTooShort { path: String },
}

/// Reading operation parameters from the call payload failed.
#[derive(Debug, Error)]
pub enum ParameterExtraction {
    /// A required field is missing or blank on the payload.
    #[error("required field '{field}' is missing from the request payload")]
    MissingRequired { field: String },

    /// The payload reader raised while reading a field.
    #[error("unable to read field '{field}' from the request payload")]
    Read {
        field: String,
        #[source]
        source: anyhow::Error,
    },
}

/// The decision gateway rejected the assembled attribute maps.
#[derive(Debug, Error)]
#[error("the decision gateway rejected the assembled attribute maps")]
pub struct AssemblyRejected;

/// Recording the audit event for an authorisation attempt failed.
#[derive(Debug, Error)]
#[error("unable to record the audit event for the authorisation attempt")]
pub struct AuditEmit;

/// No operation with the given name is registered with the enforcement layer.
#[derive(Debug, Error)]
#[error("no operation named '{operation}' is registered with the enforcement layer")]
pub struct UnknownOperation {
    /// Name of the operation that was looked up.
    pub operation: String,
}

/// An operation with the given name is already present in the registry builder.
#[derive(Debug, Error)]
#[error("operation already present in the registry: name '{operation}'")]
pub struct OperationAlreadyRegistered {
    /// Name of the duplicate operation being registered.
    pub operation: String,
}

/// An operation was invoked over a transport shape it does not support.
#[derive(Debug, Error)]
#[error("operation '{operation}' was invoked over an unsupported transport")]
pub struct TransportMismatch {
    /// Name of the operation that was invoked.
    pub operation: String,
}
