//! The enforcement facade: intercept an operation, produce a decision request.
use std::sync::Arc;

use anyhow::Result;

use depot_audit::emit::Audit;
use depot_context::Context;

use crate::assemble;
use crate::errors::AuditEmit;
use crate::errors::ParameterExtraction;
use crate::errors::UnknownOperation;
use crate::extract::fields;
use crate::extract::Call;
use crate::extract::ExtractedFields;
use crate::gateway::DecisionRequest;
use crate::gateway::Gateway;
use crate::operation::HandlerRegistry;
use crate::operation::OperationSpec;
use crate::resource::Resolver;

mod audit;

#[cfg(test)]
mod test;

pub use self::audit::AccessAudit;
pub use self::audit::AUDIT_ACCESS_DECISION;

/// Translate intercepted repository operations into policy decision requests.
///
/// One [`Enforcer`] serves the whole process: it holds no per-call state, so
/// any number of invocations can flow through it concurrently. Everything
/// specific to a call travels in its [`Context`] and [`Call`] capture and is
/// discarded once a request is produced or an error is raised.
///
/// The flow is fail-closed: any failure extracting parameters, resolving
/// base attributes or assembling the request aborts the invocation with no
/// partial [`DecisionRequest`], so the surrounding server cannot let the
/// operation proceed. Only audit recording is best-effort.
#[derive(Clone)]
pub struct Enforcer {
    /// Interface to the audit platform for access decision records.
    audit: Audit,

    /// Interface to the policy decision gateway.
    gateway: Gateway,

    /// Operations known to the enforcement layer.
    registry: Arc<HandlerRegistry>,

    /// Interface to the base resource-attribute supplier.
    resolver: Resolver,
}

impl Enforcer {
    /// Initialise an [`Enforcer`] with its external collaborators.
    pub fn new(
        registry: HandlerRegistry,
        resolver: Resolver,
        gateway: Gateway,
        audit: Audit,
    ) -> Enforcer {
        let registry = Arc::new(registry);
        Enforcer {
            audit,
            gateway,
            registry,
            resolver,
        }
    }

    /// Translate the request phase of an intercepted operation.
    ///
    /// Extracts the operation's fields from the transport capture, resolves
    /// the base resource attributes, assembles the four attribute maps
    /// (applying the operation's escalation rule, if any) and submits them to
    /// the decision gateway. One audit event is recorded per produced
    /// request; audit failures are logged and never change the outcome.
    pub async fn handle_request(
        &self,
        context: &Context,
        operation: &str,
        call: Call<'_>,
    ) -> Result<Option<DecisionRequest>> {
        let spec = self.lookup(operation)?;
        slog::debug!(
            context.logger, "Translating operation into a decision request";
            "operation" => operation,
        );

        let extracted = spec.extract.extract(operation, &call)?;
        let pid = match extracted.get(fields::PID) {
            Some(pid) => pid.to_string(),
            None => {
                let error = ParameterExtraction::MissingRequired {
                    field: fields::PID.to_string(),
                };
                return Err(error.into());
            }
        };

        let base = self.resolver.base_attributes(context, &pid).await?;
        let resource = assemble::resource_map(base, spec, &extracted)?;
        let action = assemble::action_map(spec, &extracted);
        let subject = assemble::subject_map(context.actor.as_ref());
        let environment = assemble::environment_map(context.time);

        let request = self
            .gateway
            .build_request(context, subject, action, resource, environment)
            .await?;

        self.audit_request(context, spec, &pid, &extracted).await;
        Ok(Some(request))
    }

    /// Translate the response phase of an intercepted operation.
    ///
    /// No in-scope operation attaches response-phase attributes, so this is a
    /// pass-through for every known operation. Unknown operations still fail,
    /// matching the request phase.
    pub async fn handle_response(
        &self,
        _context: &Context,
        operation: &str,
        _call: Call<'_>,
    ) -> Result<Option<DecisionRequest>> {
        self.lookup(operation)?;
        Ok(None)
    }

    /// Lookup the operation table, failing closed for unknown operations.
    fn lookup(&self, operation: &str) -> Result<&'static OperationSpec> {
        match self.registry.lookup(operation) {
            Some(spec) => Ok(spec),
            None => {
                let error = UnknownOperation {
                    operation: operation.to_string(),
                };
                Err(error.into())
            }
        }
    }
}

impl Enforcer {
    /// Record an access decision audit event.
    ///
    /// Errors during audit are ignored to preserve availability in case of
    /// upstream issues or misconfiguration.
    ///
    /// NOTE:
    ///   Only auditing errors are ignored, extraction and assembly errors
    ///   abort the invocation before this point is reached.
    async fn audit_request(
        &self,
        context: &Context,
        spec: &OperationSpec,
        pid: &str,
        extracted: &ExtractedFields,
    ) {
        let event = match AccessAudit::event(context, spec, pid, extracted) {
            Ok(event) => event,
            Err(error) => {
                let error = error.context(AuditEmit);
                slog::error!(
                    context.logger,
                    "Failed to encode access decision audit event payload";
                    "audit" => true,
                    "error" => ?error,
                );
                return;
            }
        };
        if let Err(error) = self.audit.record(context, event).await {
            let error = error.context(AuditEmit);
            slog::error!(
                context.logger,
                "Failed to record access decision audit event";
                "audit" => true,
                "error" => ?error,
            );
        }
    }
}
