//! Interfaces to record audit events onto the configured audit platform.
use std::sync::Arc;

use anyhow::Result;
use serde_json::Value as Json;

use depot_context::Context;

use super::Event;

/// Record audit events onto the backing audit platform.
#[derive(Clone)]
pub struct Audit(Arc<dyn AuditBackend>);

impl Audit {
    /// Record an auditing event.
    pub async fn record(&self, context: &Context, event: Event) -> Result<()> {
        self.0.record(context, event).await
    }
}

impl<T> From<T> for Audit
where
    T: AuditBackend + 'static,
{
    fn from(value: T) -> Self {
        Audit(Arc::new(value))
    }
}

/// Operations implemented by audit platforms supported by Depot.
#[async_trait::async_trait]
pub trait AuditBackend: Send + Sync {
    /// Record an auditing event.
    async fn record(&self, context: &Context, event: Event) -> Result<()>;
}

/// Initialisation logic for the audit platform and the client to access it.
#[async_trait::async_trait]
pub trait AuditBackendFactory: Send + Sync {
    /// Validate the user provided configuration for the backend.
    fn conf_check(&self, context: &Context, conf: &Json) -> Result<()>;

    /// Register backend specific metrics.
    fn register_metrics(&self, registry: &prometheus::Registry) -> Result<()>;

    /// Instantiate an [`Audit`] object to record events onto the platform.
    async fn audit<'a>(&self, args: AuditBackendFactoryArgs<'a>) -> Result<Audit>;
}

/// Arguments passed to the [`AuditBackendFactory`] client initialisation method.
pub struct AuditBackendFactoryArgs<'a> {
    /// The configuration block for the backend to initialise.
    pub conf: &'a Json,

    /// Container for invocation scoped values.
    pub context: &'a Context,
}

#[cfg(any(test, feature = "test-fixture"))]
pub use self::fixture::{AuditFixture, AuditFixtureBackend};

#[cfg(any(test, feature = "test-fixture"))]
mod fixture {
    use std::time::Duration;

    use anyhow::Result;
    use tokio::sync::broadcast;
    use tokio::sync::broadcast::Receiver;
    use tokio::sync::broadcast::Sender;

    use depot_context::Context;

    use super::Event;
    use super::AuditBackend;

    /// Introspection tools for audit events emitted during unit tests.
    pub struct AuditFixture {
        events: Receiver<Event>,
        send: Sender<Event>,
    }

    impl Clone for AuditFixture {
        fn clone(&self) -> Self {
            let events = self.send.subscribe();
            Self {
                events,
                send: self.send.clone(),
            }
        }
    }

    impl AuditFixture {
        /// Create a backend that will send events to this fixture.
        pub fn backend(&self) -> AuditFixtureBackend {
            let send = self.send.clone();
            AuditFixtureBackend { send }
        }

        /// Initialise an audit backend fixture for unit tests.
        pub fn new() -> AuditFixture {
            let (send, events) = broadcast::channel(50);
            AuditFixture { events, send }
        }

        /// Fetch the next [`Event`] recorded onto the audit trail.
        pub async fn pop(&mut self) -> Result<Event> {
            let event = self.events.recv().await?;
            Ok(event)
        }

        /// Fetch the next [`Event`] recorded onto the audit trail, with a timeout.
        pub async fn pop_timeout(&mut self, timeout: Duration) -> Result<Event> {
            let event = tokio::time::timeout(timeout, self.pop()).await?;
            event
        }
    }

    /// Audit backend for unit tests.
    pub struct AuditFixtureBackend {
        send: Sender<Event>,
    }

    #[async_trait::async_trait]
    impl AuditBackend for AuditFixtureBackend {
        async fn record(&self, _: &Context, event: Event) -> Result<()> {
            self.send.send(event)?;
            Ok(())
        }
    }
}
