//! Information attached to access decision audit events.
use anyhow::Result;
use opentelemetry_api::trace::TraceContextExt;
use opentelemetry_api::trace::TraceId;
use opentelemetry_api::Context as OTelContext;
use serde::Deserialize;
use serde::Serialize;

use depot_audit::Event;
use depot_context::Context;

use crate::extract::ExtractedFields;
use crate::operation::OperationSpec;

/// Event code for access decision audit events.
pub const AUDIT_ACCESS_DECISION: &str = "AUDIT_ACCESS_DECISION";

/// Payload for access decision audit events.
///
/// The action recorded here is the operation's default action identifier,
/// kept stable for reporting even when an escalation rule substituted the
/// action submitted to the decision gateway.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct AccessAudit {
    /// Default action identifier of the attempted operation.
    pub action: String,

    /// Login identifier of the caller, when an identity was established.
    pub actor: Option<String>,

    /// Identifier of the digital object the operation targeted.
    pub object: String,

    /// Identifier of the targeted sub-resource, for operations that have one.
    pub sub_resource: Option<String>,

    /// Tracing ID to link this audit event to a larger context, if tracing is available.
    pub trace_id: Option<String>,
}

impl AccessAudit {
    /// Compose an access decision audit event from invocation information.
    pub fn event(
        context: &Context,
        spec: &OperationSpec,
        pid: &str,
        extracted: &ExtractedFields,
    ) -> Result<Event> {
        let trace_id = OTelContext::current().span().span_context().trace_id();
        let trace_id = if trace_id == TraceId::INVALID {
            None
        } else {
            Some(trace_id.to_string())
        };
        let sub_resource = spec
            .audit_sub_resource
            .and_then(|field| extracted.get(field))
            .map(String::from);
        let payload = AccessAudit {
            action: spec.action.to_string(),
            actor: context.actor.as_ref().map(|actor| actor.id.clone()),
            object: pid.to_string(),
            sub_resource,
            trace_id,
        };
        Event::new_with_payload(AUDIT_ACCESS_DECISION, payload)
    }
}
