//! Audit trail interface for the Depot enforcement layer.
//!
//! Recording who asked to do what on which object is a separate concern from
//! deciding whether they can: audit records flow to whatever platform the
//! process is configured with and failures recording them never change the
//! outcome of the request that produced them.
use std::collections::BTreeMap;

use anyhow::Context as AnyContext;
use anyhow::Result;
use serde::Deserialize;
use serde::Serialize;
use serde_json::Value;
use time::OffsetDateTime;

pub mod emit;
mod errors;

pub use self::errors::Error;

/// An individual audit event emitted by the enforcement layer.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct Event {
    /// Identifier of the specific event (and its payload type).
    pub code: String,

    /// Additional unstructured metadata attached to the event.
    #[serde(default)]
    pub metadata: BTreeMap<String, String>,

    /// JSON encoded event payload.
    #[serde(default)]
    pub payload: Value,

    /// Time the event was generated.
    #[serde(with = "time::serde::rfc3339")]
    pub time: OffsetDateTime,
}

impl Event {
    /// Create a new event with the given code and serialisable payload.
    pub fn new_with_payload<C, P>(code: C, payload: P) -> Result<Event>
    where
        C: Into<String>,
        P: Serialize,
    {
        let payload = serde_json::to_value(payload).context(Error::PayloadEncode)?;
        let event = Event {
            code: code.into(),
            metadata: BTreeMap::new(),
            payload,
            time: OffsetDateTime::now_utc(),
        };
        Ok(event)
    }

    /// Attempt to decode the event payload into the specified type.
    pub fn decode<T>(&self) -> Result<T>
    where
        T: serde::de::DeserializeOwned,
    {
        serde_json::from_value(self.payload.clone())
            .context(Error::PayloadDecode)
            .map_err(anyhow::Error::from)
    }
}

#[cfg(test)]
mod tests {
    use super::Event;

    #[test]
    fn decode_event() {
        let event = Event {
            code: "TEST".into(),
            metadata: Default::default(),
            payload: serde_json::json!("test string"),
            time: time::OffsetDateTime::now_utc(),
        };
        let actual: String = event.decode().unwrap();
        assert_eq!(actual, "test string");
    }

    #[test]
    fn encode_event() {
        let event = Event::new_with_payload("TEST", 42u64).unwrap();
        assert_eq!(event.code, "TEST");
        assert_eq!(event.payload, serde_json::json!(42u64));
    }
}
