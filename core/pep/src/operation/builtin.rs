//! Operation tables for the repository operations shipped with the layer.
use crate::attrs::ValueKind;
use crate::extract::fields;
use crate::extract::ExtractedFields;
use crate::extract::MessageRule;
use crate::extract::PathRule;
use crate::extract::PathSubResource;
use crate::extract::TemporalParam;
use crate::vocabulary;

use super::ApiCategory;
use super::Extraction;
use super::FieldSpec;
use super::OperationSpec;

/// Require policy management permissions when the reserved policy datastream is touched.
pub fn policy_datastream_escalation(extracted: &ExtractedFields) -> Option<&'static str> {
    match extracted.get(fields::DS_ID) {
        Some(id) if id == vocabulary::POLICY_DATASTREAM => {
            Some(vocabulary::action::MANAGE_POLICIES)
        }
        _ => None,
    }
}

/// List the methods a digital object can be disseminated through.
///
/// `/objects/{pid}/methods[/{sdefPid}]`, optionally narrowed to a dated view
/// with the `asOfDateTime` query parameter.
pub static LIST_METHODS: OperationSpec = OperationSpec {
    action: vocabulary::action::LIST_METHODS,
    api: ApiCategory::Access,
    audit_sub_resource: None,
    escalation: None,
    extract: Extraction::Path(PathRule {
        min_segments: 3,
        pid_segment: 1,
        sub_resource: Some(PathSubResource {
            field: fields::SDEF_PID,
            marker: "methods",
            marker_segment: 2,
            value_segment: 3,
        }),
        temporal: Some(TemporalParam {
            field: fields::AS_OF_DATETIME,
            param: "asOfDateTime",
        }),
    }),
    fields: &[
        FieldSpec {
            attribute: vocabulary::resource::SDEF_PID,
            field: fields::SDEF_PID,
            kind: ValueKind::String,
        },
        FieldSpec {
            attribute: vocabulary::resource::AS_OF_DATETIME,
            field: fields::AS_OF_DATETIME,
            kind: ValueKind::DateTime,
        },
    ],
    name: "listMethods",
};

/// List the datastreams attached to a digital object.
///
/// `/objects/{pid}/datastreams`, with the same dated view parameter as
/// method listing.
pub static LIST_DATASTREAMS: OperationSpec = OperationSpec {
    action: vocabulary::action::LIST_DATASTREAMS,
    api: ApiCategory::Access,
    audit_sub_resource: None,
    escalation: None,
    extract: Extraction::Path(PathRule {
        min_segments: 3,
        pid_segment: 1,
        sub_resource: None,
        temporal: Some(TemporalParam {
            field: fields::AS_OF_DATETIME,
            param: "asOfDateTime",
        }),
    }),
    fields: &[FieldSpec {
        attribute: vocabulary::resource::AS_OF_DATETIME,
        field: fields::AS_OF_DATETIME,
        kind: ValueKind::DateTime,
    }],
    name: "listDatastreams",
};

/// Export the full serialised form of a digital object.
///
/// `/objects/{pid}/objectXML`. A read, but one that belongs to the
/// management API family.
pub static GET_OBJECT_XML: OperationSpec = OperationSpec {
    action: vocabulary::action::GET_OBJECT_XML,
    api: ApiCategory::Management,
    audit_sub_resource: None,
    escalation: None,
    extract: Extraction::Path(PathRule {
        min_segments: 3,
        pid_segment: 1,
        sub_resource: None,
        temporal: None,
    }),
    fields: &[],
    name: "getObjectXML",
};

/// Shared field table for datastream creation and modification.
static DATASTREAM_WRITE_FIELDS: [FieldSpec; 8] = [
    FieldSpec {
        attribute: vocabulary::resource::DATASTREAM_ID,
        field: fields::DS_ID,
        kind: ValueKind::String,
    },
    FieldSpec {
        attribute: vocabulary::resource::NEW_MIME_TYPE,
        field: fields::MIME_TYPE,
        kind: ValueKind::String,
    },
    FieldSpec {
        attribute: vocabulary::resource::NEW_FORMAT_URI,
        field: fields::FORMAT_URI,
        kind: ValueKind::AnyUri,
    },
    FieldSpec {
        attribute: vocabulary::resource::NEW_LOCATION,
        field: fields::DS_LOCATION,
        kind: ValueKind::AnyUri,
    },
    FieldSpec {
        attribute: vocabulary::resource::NEW_CONTROL_GROUP,
        field: fields::CONTROL_GROUP,
        kind: ValueKind::String,
    },
    FieldSpec {
        attribute: vocabulary::resource::NEW_STATE,
        field: fields::DS_STATE,
        kind: ValueKind::String,
    },
    FieldSpec {
        attribute: vocabulary::resource::NEW_CHECKSUM_TYPE,
        field: fields::CHECKSUM_TYPE,
        kind: ValueKind::String,
    },
    FieldSpec {
        attribute: vocabulary::resource::NEW_CHECKSUM,
        field: fields::CHECKSUM,
        kind: ValueKind::String,
    },
];

/// Accessors read from datastream creation and modification payloads.
static DATASTREAM_WRITE_ACCESSORS: [&str; 8] = [
    fields::DS_ID,
    fields::MIME_TYPE,
    fields::FORMAT_URI,
    fields::DS_LOCATION,
    fields::CONTROL_GROUP,
    fields::DS_STATE,
    fields::CHECKSUM_TYPE,
    fields::CHECKSUM,
];

/// Attach a new datastream to a digital object.
pub static ADD_DATASTREAM: OperationSpec = OperationSpec {
    action: vocabulary::action::ADD_DATASTREAM,
    api: ApiCategory::Management,
    audit_sub_resource: Some(fields::DS_ID),
    escalation: Some(policy_datastream_escalation),
    extract: Extraction::Message(MessageRule {
        required: &[fields::PID],
        optional: &DATASTREAM_WRITE_ACCESSORS,
    }),
    fields: &DATASTREAM_WRITE_FIELDS,
    name: "addDatastream",
};

/// Point an existing datastream at new content by reference.
pub static MODIFY_DATASTREAM_BY_REFERENCE: OperationSpec = OperationSpec {
    action: vocabulary::action::MODIFY_DATASTREAM_BY_REFERENCE,
    api: ApiCategory::Management,
    audit_sub_resource: Some(fields::DS_ID),
    escalation: Some(policy_datastream_escalation),
    extract: Extraction::Message(MessageRule {
        required: &[fields::PID],
        optional: &DATASTREAM_WRITE_ACCESSORS,
    }),
    fields: &DATASTREAM_WRITE_FIELDS,
    name: "modifyDatastreamByReference",
};

/// Permanently remove a datastream from a digital object.
pub static PURGE_DATASTREAM: OperationSpec = OperationSpec {
    action: vocabulary::action::PURGE_DATASTREAM,
    api: ApiCategory::Management,
    audit_sub_resource: Some(fields::DS_ID),
    escalation: None,
    extract: Extraction::Message(MessageRule {
        required: &[fields::PID],
        optional: &[fields::DS_ID],
    }),
    fields: &[FieldSpec {
        attribute: vocabulary::resource::DATASTREAM_ID,
        field: fields::DS_ID,
        kind: ValueKind::String,
    }],
    name: "purgeDatastream",
};

#[cfg(test)]
mod tests {
    use crate::extract::fields;
    use crate::extract::ExtractedFields;
    use crate::vocabulary;

    #[test]
    fn escalate_on_policy_datastream() {
        let mut extracted = ExtractedFields::new();
        extracted.insert(fields::DS_ID, vocabulary::POLICY_DATASTREAM.to_string());
        let action = super::policy_datastream_escalation(&extracted);
        assert_eq!(action, Some(vocabulary::action::MANAGE_POLICIES));
    }

    #[test]
    fn no_escalation_on_ordinary_datastream() {
        let mut extracted = ExtractedFields::new();
        extracted.insert(fields::DS_ID, "DC".to_string());
        assert_eq!(super::policy_datastream_escalation(&extracted), None);
    }

    #[test]
    fn no_escalation_without_datastream() {
        let extracted = ExtractedFields::new();
        assert_eq!(super::policy_datastream_escalation(&extracted), None);
    }
}
