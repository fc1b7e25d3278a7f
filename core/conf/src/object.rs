//! Data object storing the enforcement layer configuration.
use serde::Deserialize;
use serde::Serialize;

/// Configuration for the Depot access enforcement layer.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Conf {
    /// Audit trail service configuration.
    pub audit: BackendConf,

    /// Policy decision gateway service configuration.
    pub gateway: BackendConf,

    /// Base resource attribute supplier configuration.
    pub resources: BackendConf,
}

/// Unstructured configuration for runtime selected service backends.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct BackendConf {
    /// ID of the backend selected to provide the service.
    pub backend: String,

    /// Backend specific configuration options.
    #[serde(default, flatten)]
    pub options: serde_json::Value,
}
