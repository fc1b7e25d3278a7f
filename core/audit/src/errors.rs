//! Errors returned by the depot-audit crate.

/// Errors dealing with audit events.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Unable to decode event payload into the specified type.
    #[error("unable to decode event payload into the specified type")]
    PayloadDecode,

    /// Unable to encode the event payload for recording.
    #[error("unable to encode the event payload for recording")]
    PayloadEncode,
}
