//! Canonical attribute identifiers understood by the policy decision gateway.
//!
//! The vocabulary is fixed: every handler maps its call-specific fields onto
//! these identifiers so policies can be written against a stable set of names
//! regardless of which transport surface a call arrived on.

/// Name of the reserved datastream holding an object's access policy.
///
/// Edits touching this datastream require policy management permissions
/// instead of ordinary content modification permissions.
pub const POLICY_DATASTREAM: &str = "POLICY";

/// Action attribute identifiers and well known action values.
pub mod action {
    /// Identifier of the action being attempted.
    pub const ID: &str = "urn:depot:names:access:1.0:action:id";

    /// API family the attempted action belongs to.
    pub const API: &str = "urn:depot:names:access:1.0:action:api";

    /// The read/access API family.
    pub const API_ACCESS: &str = "urn:depot:names:access:1.0:action:api-a";

    /// The content management API family.
    pub const API_MANAGEMENT: &str = "urn:depot:names:access:1.0:action:api-m";

    pub const ADD_DATASTREAM: &str = "urn:depot:names:access:1.0:action:id-addDatastream";
    pub const GET_OBJECT_XML: &str = "urn:depot:names:access:1.0:action:id-getObjectXML";
    pub const LIST_DATASTREAMS: &str = "urn:depot:names:access:1.0:action:id-listDatastreams";
    pub const LIST_METHODS: &str = "urn:depot:names:access:1.0:action:id-listMethods";
    pub const MANAGE_POLICIES: &str = "urn:depot:names:access:1.0:action:id-managePolicies";
    pub const MODIFY_DATASTREAM_BY_REFERENCE: &str =
        "urn:depot:names:access:1.0:action:id-modifyDatastreamByReference";
    pub const PURGE_DATASTREAM: &str = "urn:depot:names:access:1.0:action:id-purgeDatastream";
}

/// Resource attribute identifiers.
pub mod resource {
    /// Identifier of the digital object the operation targets.
    pub const OBJECT_PID: &str = "urn:depot:names:access:1.0:resource:object:pid";

    /// Identifier of the service definition a method listing is narrowed to.
    pub const SDEF_PID: &str = "urn:depot:names:access:1.0:resource:sdef:pid";

    /// Identifier of the datastream the operation targets.
    pub const DATASTREAM_ID: &str = "urn:depot:names:access:1.0:resource:datastream:id";

    /// Point in time a dated view of the object is requested at.
    pub const AS_OF_DATETIME: &str =
        "urn:depot:names:access:1.0:resource:datastream:asOfDateTime";

    pub const NEW_MIME_TYPE: &str =
        "urn:depot:names:access:1.0:resource:datastream:newMimeType";
    pub const NEW_FORMAT_URI: &str =
        "urn:depot:names:access:1.0:resource:datastream:newFormatURI";
    pub const NEW_LOCATION: &str =
        "urn:depot:names:access:1.0:resource:datastream:newLocation";
    pub const NEW_CONTROL_GROUP: &str =
        "urn:depot:names:access:1.0:resource:datastream:newControlGroup";
    pub const NEW_STATE: &str = "urn:depot:names:access:1.0:resource:datastream:newState";
    pub const NEW_CHECKSUM_TYPE: &str =
        "urn:depot:names:access:1.0:resource:datastream:newChecksumType";
    pub const NEW_CHECKSUM: &str =
        "urn:depot:names:access:1.0:resource:datastream:newChecksum";
}

/// Subject attribute identifiers.
pub mod subject {
    /// Login identifier of the caller.
    pub const LOGIN_ID: &str = "urn:depot:names:access:1.0:subject:loginId";
}

/// Environment attribute identifiers.
pub mod environment {
    /// Time the invocation was received.
    pub const CURRENT_DATETIME: &str =
        "urn:depot:names:access:1.0:environment:currentDateTime";
}
