//! The [`Context`] is a general purpose immutable container to carry scoped values around.
//!
//! Code executed as part of Depot request processing can access invocation scoped values.
//!
//! Contexts are organised into a tree structure:
//!
//! - A root context represents the general process wide scope.
//! - Derived contexts represents a narrower scope within their parent with additional
//!   or updated information attached to them.
//!
//! For example: [`Context`]s provide access to the current [`Logger`].
//! For the root context this is the process-wide logger with no additional attributes.
//! But for individual invocations a derived context can be provided with a [`Logger`]
//! decorated with the operation trace ID or other request attributes.
//!
//! For the enforcement layer the [`Context`] also carries the caller identity determined
//! by the transport layer and the invocation timestamp, so no per-call state ever lives
//! on handlers themselves.
use std::collections::BTreeMap;

use opentelemetry_api::trace::TraceContextExt;
use opentelemetry_api::trace::TraceId;
use opentelemetry_api::Context as OtelContext;
use slog::Logger;
use slog::OwnedKV;
use slog::SendSyncRefUnwindSafeKV;
use time::OffsetDateTime;

/// Identity of the caller on whose behalf an operation is invoked.
///
/// The identity is established by the transport layer (session extraction, HTTP
/// authentication, ...) before the enforcement layer is reached and is carried
/// here as data only.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Actor {
    /// Login identifier of the caller.
    pub id: String,

    /// Additional subject attributes resolved for the caller.
    ///
    /// Keys are canonical attribute identifier URNs so entries can be merged
    /// into decision requests without further mapping.
    pub attributes: BTreeMap<String, String>,
}

impl Actor {
    /// Create an [`Actor`] with the given login identifier and no extra attributes.
    pub fn named<S: Into<String>>(id: S) -> Actor {
        Actor {
            id: id.into(),
            attributes: BTreeMap::new(),
        }
    }
}

/// The [`Context`] is a general purpose container to carry scoped values around.
///
/// Refer to the [crate level docs](crate) for details.
#[derive(Clone, Debug)]
pub struct Context {
    /// Identity of the caller for the current invocation.
    ///
    /// The initial value of `None` indicates no identity was established.
    pub actor: Option<Actor>,

    /// Logger with contextual attributes attached to it.
    pub logger: Logger,

    /// Time the current invocation was received.
    pub time: OffsetDateTime,
}

impl Context {
    /// Derive a new [`Context`] by making changes to the current one.
    ///
    /// The invocation timestamp is refreshed when the derived context is built,
    /// unless one is set explicitly with [`ContextBuilder::timestamp`].
    pub fn derive(&self) -> ContextBuilder {
        ContextBuilder {
            actor: self.actor.clone(),
            logger: self.logger.clone(),
            time: None,
        }
    }

    /// Derive a new [`Context`] by making changes to the current one using the provided callback.
    pub fn derive_with<F>(&self, callback: F) -> Context
    where
        F: FnOnce(ContextBuilder) -> ContextBuilder,
    {
        let builder = callback(self.derive());
        builder.build()
    }

    /// Initialise a new root context with no values attached.
    pub fn root(logger: Logger) -> ContextBuilder {
        ContextBuilder {
            actor: None,
            logger,
            time: None,
        }
    }
}

/// A builder for root and derived contexts.
pub struct ContextBuilder {
    actor: Option<Actor>,
    logger: Logger,
    time: Option<OffsetDateTime>,
}

impl ContextBuilder {
    /// Mark the context to be created as invoked by the given caller.
    pub fn actor(mut self, actor: Actor) -> Self {
        self.actor = Some(actor);
        self
    }

    /// Attach an additional subject attribute to the context's caller.
    ///
    /// This is helpful when subject attributes are resolved in stages, with
    /// transport session data enriching an already established identity.
    ///
    /// ## Panics
    ///
    /// This method panics if the context has no caller set.
    /// Doing so ensures that attempts to attach subject attributes are not
    /// ignored by incorrect ordering of operations.
    pub fn actor_attribute<K, V>(mut self, key: K, value: V) -> Self
    where
        K: Into<String>,
        V: Into<String>,
    {
        match self.actor.as_mut() {
            None => panic!("ContextBuilder::actor_attribute called before ContextBuilder::actor"),
            Some(actor) => {
                actor.attributes.insert(key.into(), value.into());
            }
        }
        self
    }

    /// Finalise the build process and return a new [`Context`].
    pub fn build(self) -> Context {
        let time = self.time.unwrap_or_else(OffsetDateTime::now_utc);
        Context {
            actor: self.actor,
            logger: self.logger,
            time,
        }
    }

    /// Decorate the [`Context`]'s logger with the trace ID of the current OpenTelemetry span.
    ///
    /// [`Context`]: super::Context
    pub fn log_trace(self) -> Self {
        let context = OtelContext::current();
        let span = context.span();
        let trace_id = span.span_context().trace_id();
        if trace_id == TraceId::INVALID {
            self
        } else {
            let trace_id = trace_id.to_string();
            self.log_values(slog::o!("trace_id" => trace_id))
        }
    }

    /// Update the [`Context`] logger to attach new log key/pair values.
    pub fn log_values<T>(mut self, entries: OwnedKV<T>) -> Self
    where
        T: SendSyncRefUnwindSafeKV + 'static,
    {
        self.logger = self.logger.new(entries);
        self
    }

    /// Set the invocation timestamp for the context to be created.
    pub fn timestamp(mut self, time: OffsetDateTime) -> Self {
        self.time = Some(time);
        self
    }
}

#[cfg(any(test, feature = "test-fixture"))]
impl Context {
    /// Create an empty context useful for test.
    pub fn fixture() -> Context {
        let logger = Logger::root(slog::Discard, slog::o!());
        Context {
            actor: None,
            logger,
            time: OffsetDateTime::UNIX_EPOCH,
        }
    }
}
