//! Interfaces to the external policy decision gateway.
use std::sync::Arc;

use anyhow::Context as AnyContext;
use anyhow::Result;
use serde::Deserialize;
use serde::Serialize;
use serde_json::Value as Json;

use depot_context::Context;

use crate::attrs::AttributeMap;
use crate::errors::AssemblyRejected;

/// The complete canonical set of attributes submitted for one authorisation evaluation.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct DecisionRequest {
    /// Attributes describing the attempted action.
    pub action: AttributeMap,

    /// Attributes describing the invocation environment.
    pub environment: AttributeMap,

    /// Attributes describing the targeted resource.
    pub resource: AttributeMap,

    /// Attributes describing the requesting caller.
    pub subject: AttributeMap,
}

/// Outcome of evaluating a [`DecisionRequest`] against policy.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub enum Decision {
    /// The request is allowed by policy.
    Permit,

    /// The request is denied by policy.
    Deny,

    /// Policy evaluation could not reach a decision (treated as a denial
    /// by the surrounding server).
    Indeterminate,
}

/// Operations implemented by policy decision engines supported by Depot.
#[async_trait::async_trait]
pub trait DecisionGateway: Send + Sync {
    /// Assemble and validate a decision request from the four attribute maps.
    ///
    /// Implementations are expected to check structural well-formedness of
    /// the maps and fail rather than accept an incomplete request.
    async fn build_request(
        &self,
        context: &Context,
        subject: AttributeMap,
        action: AttributeMap,
        resource: AttributeMap,
        environment: AttributeMap,
    ) -> Result<DecisionRequest>;

    /// Evaluate a previously assembled request against policy.
    async fn evaluate(&self, context: &Context, request: &DecisionRequest) -> Result<Decision>;
}

/// Initialisation logic for [`DecisionGateway`] implementations.
#[async_trait::async_trait]
pub trait DecisionGatewayFactory: Send + Sync {
    /// Validate the user provided configuration for the backend.
    fn conf_check(&self, context: &Context, conf: &Json) -> Result<()>;

    /// Register backend specific metrics.
    fn register_metrics(&self, registry: &prometheus::Registry) -> Result<()>;

    /// Initialise a [`Gateway`] object.
    async fn gateway<'a>(&self, args: DecisionGatewayFactoryArgs<'a>) -> Result<Gateway>;
}

/// Arguments passed to the [`DecisionGatewayFactory`] initialisation method.
pub struct DecisionGatewayFactoryArgs<'a> {
    /// The configuration block for the backend to initialise.
    pub conf: &'a Json,

    /// Container for invocation scoped values.
    pub context: &'a Context,
}

/// Submit assembled attribute maps to the configured policy decision engine.
#[derive(Clone)]
pub struct Gateway(Arc<dyn DecisionGateway>);

impl Gateway {
    /// Assemble a decision request from the four attribute maps.
    ///
    /// A backend rejection surfaces as an [`AssemblyRejected`] error so
    /// callers can distinguish it from extraction failures.
    pub async fn build_request(
        &self,
        context: &Context,
        subject: AttributeMap,
        action: AttributeMap,
        resource: AttributeMap,
        environment: AttributeMap,
    ) -> Result<DecisionRequest> {
        self.0
            .build_request(context, subject, action, resource, environment)
            .await
            .context(AssemblyRejected)
    }

    /// Evaluate a previously assembled request against policy.
    pub async fn evaluate(&self, context: &Context, request: &DecisionRequest) -> Result<Decision> {
        self.0.evaluate(context, request).await
    }
}

impl<T> From<T> for Gateway
where
    T: DecisionGateway + 'static,
{
    fn from(value: T) -> Self {
        Gateway(Arc::new(value))
    }
}

#[cfg(any(test, feature = "test-fixture"))]
pub use self::fixture::{GatewayFixture, GatewayRejectAll};

#[cfg(any(test, feature = "test-fixture"))]
mod fixture {
    use anyhow::Result;

    use depot_context::Context;

    use crate::attrs::AttributeMap;

    use super::Decision;
    use super::DecisionGateway;
    use super::DecisionRequest;

    /// Gateway fixture assembling requests verbatim and permitting every evaluation.
    pub struct GatewayFixture;

    #[async_trait::async_trait]
    impl DecisionGateway for GatewayFixture {
        async fn build_request(
            &self,
            _: &Context,
            subject: AttributeMap,
            action: AttributeMap,
            resource: AttributeMap,
            environment: AttributeMap,
        ) -> Result<DecisionRequest> {
            Ok(DecisionRequest {
                action,
                environment,
                resource,
                subject,
            })
        }

        async fn evaluate(&self, _: &Context, _: &DecisionRequest) -> Result<Decision> {
            Ok(Decision::Permit)
        }
    }

    /// Gateway fixture rejecting every request assembly.
    pub struct GatewayRejectAll;

    #[async_trait::async_trait]
    impl DecisionGateway for GatewayRejectAll {
        async fn build_request(
            &self,
            _: &Context,
            _: AttributeMap,
            _: AttributeMap,
            _: AttributeMap,
            _: AttributeMap,
        ) -> Result<DecisionRequest> {
            anyhow::bail!("gateway fixture rejects all requests")
        }

        async fn evaluate(&self, _: &Context, _: &DecisionRequest) -> Result<Decision> {
            Ok(Decision::Deny)
        }
    }
}
