//! Interfaces to the external base resource-attribute supplier.
use std::sync::Arc;

use anyhow::Result;
use serde_json::Value as Json;

use depot_context::Context;

use crate::attrs::AttributeMap;

/// Operations implemented by base resource-attribute suppliers supported by Depot.
#[async_trait::async_trait]
pub trait ResourceAttributes: Send + Sync {
    /// Resolve the baseline resource attributes for an object identifier.
    ///
    /// The returned map must carry the object identifier attribute itself;
    /// operation specific attributes are layered on top of it by the
    /// enforcement layer.
    async fn base_attributes(&self, context: &Context, pid: &str) -> Result<AttributeMap>;
}

/// Initialisation logic for [`ResourceAttributes`] implementations.
#[async_trait::async_trait]
pub trait ResourceAttributesFactory: Send + Sync {
    /// Validate the user provided configuration for the backend.
    fn conf_check(&self, context: &Context, conf: &Json) -> Result<()>;

    /// Register backend specific metrics.
    fn register_metrics(&self, registry: &prometheus::Registry) -> Result<()>;

    /// Initialise a [`Resolver`] object.
    async fn resolver<'a>(&self, args: ResourceAttributesFactoryArgs<'a>) -> Result<Resolver>;
}

/// Arguments passed to the [`ResourceAttributesFactory`] initialisation method.
pub struct ResourceAttributesFactoryArgs<'a> {
    /// The configuration block for the backend to initialise.
    pub conf: &'a Json,

    /// Container for invocation scoped values.
    pub context: &'a Context,
}

/// Resolve baseline resource attributes through the configured supplier.
#[derive(Clone)]
pub struct Resolver(Arc<dyn ResourceAttributes>);

impl Resolver {
    /// Resolve the baseline resource attributes for an object identifier.
    ///
    /// For details see [`ResourceAttributes::base_attributes`].
    pub async fn base_attributes(&self, context: &Context, pid: &str) -> Result<AttributeMap> {
        self.0.base_attributes(context, pid).await
    }
}

impl<T> From<T> for Resolver
where
    T: ResourceAttributes + 'static,
{
    fn from(value: T) -> Self {
        Resolver(Arc::new(value))
    }
}

#[cfg(any(test, feature = "test-fixture"))]
pub use self::fixture::ResolverFixture;

#[cfg(any(test, feature = "test-fixture"))]
mod fixture {
    use anyhow::Result;

    use depot_context::Context;

    use crate::attrs::AttributeMap;
    use crate::attrs::AttributeValue;
    use crate::vocabulary;

    use super::ResourceAttributes;

    /// Supplier fixture returning only the object identifier attribute.
    pub struct ResolverFixture;

    #[async_trait::async_trait]
    impl ResourceAttributes for ResolverFixture {
        async fn base_attributes(&self, _: &Context, pid: &str) -> Result<AttributeMap> {
            let mut base = AttributeMap::new();
            base.insert(
                vocabulary::resource::OBJECT_PID,
                AttributeValue::String(pid.to_string()),
            );
            Ok(base)
        }
    }
}
