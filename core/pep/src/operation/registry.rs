//! Registry of operations known to the enforcement layer.
use std::collections::hash_map::Entry;
use std::collections::HashMap;

use anyhow::Result;

use crate::errors::OperationAlreadyRegistered;

use super::OperationSpec;

/// Registry mapping operation identities to their [`OperationSpec`]s.
///
/// Registries are built once during process initialisation and handed to the
/// enforcement facade; lookups of operations nobody registered fail the
/// invocation, they never fall through to a default.
pub struct HandlerRegistry {
    operations: HashMap<&'static str, &'static OperationSpec>,
}

impl HandlerRegistry {
    /// Lookup an operation from the registry by name.
    pub fn lookup(&self, name: &str) -> Option<&'static OperationSpec> {
        self.operations.get(name).copied()
    }

    /// Registry holding every operation shipped with the layer.
    pub fn standard() -> HandlerRegistry {
        let mut builder = HandlerRegistryBuilder::empty();
        builder
            .register(&super::LIST_METHODS)
            .expect("standard operation registered twice")
            .register(&super::LIST_DATASTREAMS)
            .expect("standard operation registered twice")
            .register(&super::GET_OBJECT_XML)
            .expect("standard operation registered twice")
            .register(&super::ADD_DATASTREAM)
            .expect("standard operation registered twice")
            .register(&super::MODIFY_DATASTREAM_BY_REFERENCE)
            .expect("standard operation registered twice")
            .register(&super::PURGE_DATASTREAM)
            .expect("standard operation registered twice");
        builder.build()
    }
}

/// Builds a new [`HandlerRegistry`] instance.
#[derive(Debug, Default)]
pub struct HandlerRegistryBuilder {
    operations: HashMap<&'static str, &'static OperationSpec>,
}

impl HandlerRegistryBuilder {
    /// Consume the builder to finish building the registry.
    pub fn build(self) -> HandlerRegistry {
        HandlerRegistry {
            operations: self.operations,
        }
    }

    /// Start building an empty registry.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Register an operation with the registry being built.
    pub fn register(&mut self, spec: &'static OperationSpec) -> Result<&mut Self> {
        match self.operations.entry(spec.name) {
            Entry::Occupied(entry) => {
                let operation = entry.key().to_string();
                anyhow::bail!(OperationAlreadyRegistered { operation });
            }
            Entry::Vacant(entry) => {
                entry.insert(spec);
                Ok(self)
            }
        }
    }
}
