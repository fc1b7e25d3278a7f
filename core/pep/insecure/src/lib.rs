//! Insecure decision gateway and resource supplier to allow all access.
//!
//! These backends are intended for early development cycles or demo instances.
use anyhow::Result;
use serde_json::Value as Json;

use depot_context::Context;
use depot_pep::attrs::AttributeMap;
use depot_pep::attrs::AttributeValue;
use depot_pep::gateway::Decision;
use depot_pep::gateway::DecisionGateway;
use depot_pep::gateway::DecisionGatewayFactory;
use depot_pep::gateway::DecisionGatewayFactoryArgs;
use depot_pep::gateway::DecisionRequest;
use depot_pep::gateway::Gateway;
use depot_pep::resource::Resolver;
use depot_pep::resource::ResourceAttributes;
use depot_pep::resource::ResourceAttributesFactory;
use depot_pep::resource::ResourceAttributesFactoryArgs;
use depot_pep::vocabulary;

/// Assemble decision requests without validation and permit every evaluation.
pub struct PassThrough;

#[async_trait::async_trait]
impl DecisionGateway for PassThrough {
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

#[async_trait::async_trait]
impl DecisionGatewayFactory for PassThrough {
    fn conf_check(&self, _: &Context, _: &Json) -> Result<()> {
        Ok(())
    }

    fn register_metrics(&self, _: &prometheus::Registry) -> Result<()> {
        Ok(())
    }

    async fn gateway<'a>(&self, _: DecisionGatewayFactoryArgs<'a>) -> Result<Gateway> {
        Ok(Gateway::from(PassThrough))
    }
}

/// Supply only the object identifier as the baseline resource attributes.
pub struct Baseline;

#[async_trait::async_trait]
impl ResourceAttributes for Baseline {
    async fn base_attributes(&self, _: &Context, pid: &str) -> Result<AttributeMap> {
        let mut base = AttributeMap::new();
        base.insert(
            vocabulary::resource::OBJECT_PID,
            AttributeValue::String(pid.to_string()),
        );
        Ok(base)
    }
}

#[async_trait::async_trait]
impl ResourceAttributesFactory for Baseline {
    fn conf_check(&self, _: &Context, _: &Json) -> Result<()> {
        Ok(())
    }

    fn register_metrics(&self, _: &prometheus::Registry) -> Result<()> {
        Ok(())
    }

    async fn resolver<'a>(&self, _: ResourceAttributesFactoryArgs<'a>) -> Result<Resolver> {
        Ok(Resolver::from(Baseline))
    }
}
