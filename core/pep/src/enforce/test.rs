use std::collections::BTreeMap;
use std::time::Duration;

use anyhow::Result;

use depot_audit::emit::Audit;
use depot_audit::emit::AuditBackend;
use depot_audit::emit::AuditFixture;
use depot_audit::Event;
use depot_context::Actor;
use depot_context::Context;

use crate::attrs::AttributeValue;
use crate::errors::AssemblyRejected;
use crate::errors::MalformedRequest;
use crate::errors::ParameterExtraction;
use crate::errors::UnknownOperation;
use crate::extract::Call;
use crate::extract::MessageFields;
use crate::extract::PathCall;
use crate::gateway::GatewayFixture;
use crate::gateway::GatewayRejectAll;
use crate::operation::HandlerRegistry;
use crate::resource::ResolverFixture;
use crate::vocabulary;

use super::Enforcer;
use super::AUDIT_ACCESS_DECISION;

const ONE_SEC: Duration = Duration::from_secs(1);

/// Audit backend fixture failing every record attempt.
struct FailingAudit;

#[async_trait::async_trait]
impl AuditBackend for FailingAudit {
    async fn record(&self, _: &Context, _: Event) -> Result<()> {
        anyhow::bail!("audit platform unavailable")
    }
}

/// Message payload fixture failing every read.
struct BrokenPayload;

impl MessageFields for BrokenPayload {
    fn field(&self, _: &str) -> Result<Option<String>> {
        anyhow::bail!("payload decoding failed")
    }
}

fn context() -> Context {
    Context::fixture()
        .derive()
        .actor(Actor::named("depot-admin"))
        .timestamp(time::OffsetDateTime::from_unix_timestamp(1_700_000_000).unwrap())
        .build()
}

fn enforcer(audit: Audit) -> Enforcer {
    Enforcer::new(
        HandlerRegistry::standard(),
        ResolverFixture.into(),
        GatewayFixture.into(),
        audit,
    )
}

fn datastream_payload(entries: &[(&str, &str)]) -> BTreeMap<String, String> {
    entries
        .iter()
        .map(|(key, value)| (key.to_string(), value.to_string()))
        .collect()
}

#[tokio::test]
async fn list_methods_request() {
    let events = AuditFixture::new();
    let enforcer = enforcer(events.backend().into());
    let context = context();

    let call = PathCall::new("/objects/demo:1/methods/sdef:2", BTreeMap::new());
    let request = enforcer
        .handle_request(&context, "listMethods", Call::Path(&call))
        .await
        .expect("request should be translated")
        .expect("a decision request should be produced");

    assert_eq!(
        request
            .resource
            .get(vocabulary::resource::OBJECT_PID)
            .unwrap()
            .as_str(),
        Some("demo:1"),
    );
    assert_eq!(
        request
            .resource
            .get(vocabulary::resource::SDEF_PID)
            .unwrap()
            .as_str(),
        Some("sdef:2"),
    );
    assert_eq!(request.action.len(), 2);
    assert_eq!(
        request.action.get(vocabulary::action::ID).unwrap().as_str(),
        Some(vocabulary::action::LIST_METHODS),
    );
    assert_eq!(
        request.action.get(vocabulary::action::API).unwrap().as_str(),
        Some(vocabulary::action::API_ACCESS),
    );
    assert_eq!(
        request
            .subject
            .get(vocabulary::subject::LOGIN_ID)
            .unwrap()
            .as_str(),
        Some("depot-admin"),
    );
    let time = request
        .environment
        .get(vocabulary::environment::CURRENT_DATETIME)
        .unwrap();
    assert_eq!(
        time,
        &AttributeValue::DateTime(time::OffsetDateTime::from_unix_timestamp(1_700_000_000).unwrap()),
    );
}

#[tokio::test]
async fn list_methods_path_too_short() {
    let events = AuditFixture::new();
    let enforcer = enforcer(events.backend().into());
    let context = context();

    let call = PathCall::new("/objects/demo:1", BTreeMap::new());
    let error = enforcer
        .handle_request(&context, "listMethods", Call::Path(&call))
        .await
        .unwrap_err();
    assert!(error.is::<MalformedRequest>());
}

#[tokio::test]
async fn list_methods_invalid_as_of_datetime_is_dropped() {
    let events = AuditFixture::new();
    let enforcer = enforcer(events.backend().into());
    let context = context();

    let mut query = BTreeMap::new();
    query.insert("asOfDateTime".to_string(), "next tuesday".to_string());
    let call = PathCall::new("/objects/demo:1/methods", query);
    let request = enforcer
        .handle_request(&context, "listMethods", Call::Path(&call))
        .await
        .unwrap()
        .unwrap();
    assert!(!request
        .resource
        .contains(vocabulary::resource::AS_OF_DATETIME));
}

#[tokio::test]
async fn list_datastreams_valid_as_of_datetime() {
    let events = AuditFixture::new();
    let enforcer = enforcer(events.backend().into());
    let context = context();

    let mut query = BTreeMap::new();
    query.insert("asOfDateTime".to_string(), "2024-05-01T12:00:00Z".to_string());
    let call = PathCall::new("/objects/demo:1/datastreams", query);
    let request = enforcer
        .handle_request(&context, "listDatastreams", Call::Path(&call))
        .await
        .unwrap()
        .unwrap();
    let value = request
        .resource
        .get(vocabulary::resource::AS_OF_DATETIME)
        .unwrap();
    match value {
        AttributeValue::DateTime(_) => (),
        other => panic!("expected a date-time attribute, got {:?}", other),
    }
}

#[tokio::test]
async fn add_datastream_escalates_for_policy_datastream() {
    let events = AuditFixture::new();
    let enforcer = enforcer(events.backend().into());
    let context = context();

    let payload = datastream_payload(&[
        ("pid", "demo:1"),
        ("dsID", "POLICY"),
        ("mimeType", "text/xml"),
        ("formatURI", "info:depot/format:policy"),
        ("dsLocation", "http://localhost:8080/policy.xml"),
        ("controlGroup", "X"),
        ("dsState", "A"),
        ("checksumType", "SHA-256"),
        ("checksum", "abc123"),
    ]);
    let request = enforcer
        .handle_request(&context, "addDatastream", Call::Message(&payload))
        .await
        .unwrap()
        .unwrap();

    assert_eq!(request.action.len(), 2);
    assert_eq!(
        request.action.get(vocabulary::action::ID).unwrap().as_str(),
        Some(vocabulary::action::MANAGE_POLICIES),
    );
    assert_eq!(
        request.action.get(vocabulary::action::API).unwrap().as_str(),
        Some(vocabulary::action::API_MANAGEMENT),
    );
}

#[tokio::test]
async fn add_datastream_default_action() {
    let events = AuditFixture::new();
    let enforcer = enforcer(events.backend().into());
    let context = context();

    let payload = datastream_payload(&[("pid", "demo:1"), ("dsID", "DC")]);
    let request = enforcer
        .handle_request(&context, "addDatastream", Call::Message(&payload))
        .await
        .unwrap()
        .unwrap();
    assert_eq!(
        request.action.get(vocabulary::action::ID).unwrap().as_str(),
        Some(vocabulary::action::ADD_DATASTREAM),
    );
}

#[tokio::test]
async fn add_datastream_optional_fields() {
    let events = AuditFixture::new();
    let enforcer = enforcer(events.backend().into());
    let context = context();

    let payload = datastream_payload(&[
        ("pid", "demo:1"),
        ("dsID", "DC"),
        ("mimeType", ""),
        ("dsLocation", "http://localhost:8080/dc.xml"),
    ]);
    let request = enforcer
        .handle_request(&context, "addDatastream", Call::Message(&payload))
        .await
        .unwrap()
        .unwrap();

    assert!(!request
        .resource
        .contains(vocabulary::resource::NEW_MIME_TYPE));
    assert!(!request
        .resource
        .contains(vocabulary::resource::NEW_FORMAT_URI));
    match request
        .resource
        .get(vocabulary::resource::NEW_LOCATION)
        .unwrap()
    {
        AttributeValue::Uri(url) => assert_eq!(url.as_str(), "http://localhost:8080/dc.xml"),
        other => panic!("expected a URI attribute, got {:?}", other),
    }
}

#[tokio::test]
async fn add_datastream_invalid_format_uri() {
    let events = AuditFixture::new();
    let enforcer = enforcer(events.backend().into());
    let context = context();

    let payload = datastream_payload(&[
        ("pid", "demo:1"),
        ("dsID", "DC"),
        ("formatURI", "not a uri"),
    ]);
    let error = enforcer
        .handle_request(&context, "addDatastream", Call::Message(&payload))
        .await
        .unwrap_err();
    assert!(error.is::<MalformedRequest>());
}

#[tokio::test]
async fn add_datastream_missing_pid() {
    let events = AuditFixture::new();
    let enforcer = enforcer(events.backend().into());
    let context = context();

    let payload = datastream_payload(&[("dsID", "DC")]);
    let error = enforcer
        .handle_request(&context, "addDatastream", Call::Message(&payload))
        .await
        .unwrap_err();
    assert!(error.is::<ParameterExtraction>());
}

#[tokio::test]
async fn add_datastream_broken_payload() {
    let events = AuditFixture::new();
    let enforcer = enforcer(events.backend().into());
    let context = context();

    let error = enforcer
        .handle_request(&context, "addDatastream", Call::Message(&BrokenPayload))
        .await
        .unwrap_err();
    assert!(error.is::<ParameterExtraction>());
}

#[tokio::test]
async fn audit_event_for_translated_request() {
    let mut events = AuditFixture::new();
    let enforcer = enforcer(events.backend().into());
    let context = context();

    let payload = datastream_payload(&[("pid", "demo:1"), ("dsID", "POLICY")]);
    enforcer
        .handle_request(&context, "addDatastream", Call::Message(&payload))
        .await
        .unwrap()
        .unwrap();

    let audit = events.pop_timeout(ONE_SEC).await.unwrap();
    assert_eq!(audit.code, AUDIT_ACCESS_DECISION);
    assert_eq!(
        audit.payload,
        serde_json::json!({
            // The default action is recorded even when escalation replaced
            // the action submitted to the gateway.
            "action": vocabulary::action::ADD_DATASTREAM,
            "actor": "depot-admin",
            "object": "demo:1",
            "sub_resource": "POLICY",
            "trace_id": null,
        }),
    );
}

#[tokio::test]
async fn audit_failure_does_not_abort() {
    let enforcer = enforcer(FailingAudit.into());
    let context = context();

    let call = PathCall::new("/objects/demo:1/methods", BTreeMap::new());
    let request = enforcer
        .handle_request(&context, "listMethods", Call::Path(&call))
        .await
        .expect("audit failures must not surface");
    assert!(request.is_some());
}

#[tokio::test]
async fn gateway_rejection_is_assembly_error() {
    let events = AuditFixture::new();
    let enforcer = Enforcer::new(
        HandlerRegistry::standard(),
        ResolverFixture.into(),
        GatewayRejectAll.into(),
        events.backend().into(),
    );
    let context = context();

    let call = PathCall::new("/objects/demo:1/methods", BTreeMap::new());
    let error = enforcer
        .handle_request(&context, "listMethods", Call::Path(&call))
        .await
        .unwrap_err();
    assert!(error.is::<AssemblyRejected>());
}

#[tokio::test]
async fn unknown_operation() {
    let events = AuditFixture::new();
    let enforcer = enforcer(events.backend().into());
    let context = context();

    let call = PathCall::new("/objects/demo:1/versions", BTreeMap::new());
    let error = enforcer
        .handle_request(&context, "listVersions", Call::Path(&call))
        .await
        .unwrap_err();
    assert!(error.is::<UnknownOperation>());
}

#[tokio::test]
async fn handle_response_is_pass_through() {
    let events = AuditFixture::new();
    let enforcer = enforcer(events.backend().into());
    let context = context();

    let call = PathCall::new("/objects/demo:1/methods", BTreeMap::new());
    let response = enforcer
        .handle_response(&context, "listMethods", Call::Path(&call))
        .await
        .unwrap();
    assert!(response.is_none());
}

#[tokio::test]
async fn anonymous_caller_has_empty_subject() {
    let events = AuditFixture::new();
    let enforcer = enforcer(events.backend().into());
    let context = Context::fixture();

    let call = PathCall::new("/objects/demo:1/methods", BTreeMap::new());
    let request = enforcer
        .handle_request(&context, "listMethods", Call::Path(&call))
        .await
        .unwrap()
        .unwrap();
    assert!(request.subject.is_empty());
}
