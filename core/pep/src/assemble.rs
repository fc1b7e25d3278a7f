//! Assemble canonical attribute maps from extracted call data and context.
//!
//! Assembly is pure: all inputs arrive as values and the four maps come back
//! as values, so the functions here are safe for any number of concurrent
//! invocations. Blank values never become attributes, on any map.
use anyhow::Result;
use time::OffsetDateTime;

use depot_context::Actor;

use crate::attrs::AttributeMap;
use crate::attrs::AttributeValue;
use crate::extract::ExtractedFields;
use crate::operation::OperationSpec;
use crate::vocabulary;

/// Build the action attribute map for an operation.
///
/// The map carries exactly one action identifier and one API category entry.
/// When the operation defines an escalation rule and the rule fires, the
/// override replaces the default action identifier: the two are never present
/// together.
pub fn action_map(spec: &OperationSpec, extracted: &ExtractedFields) -> AttributeMap {
    let mut actions = AttributeMap::new();
    actions.insert(
        vocabulary::action::ID,
        AttributeValue::String(spec.action.to_string()),
    );
    actions.insert(
        vocabulary::action::API,
        AttributeValue::String(spec.api.as_urn().to_string()),
    );
    if let Some(rule) = spec.escalation {
        if let Some(action) = rule(extracted) {
            actions.insert(
                vocabulary::action::ID,
                AttributeValue::String(action.to_string()),
            );
        }
    }
    actions
}

/// Build the environment attribute map for an invocation.
pub fn environment_map(time: OffsetDateTime) -> AttributeMap {
    let mut environment = AttributeMap::new();
    environment.insert(
        vocabulary::environment::CURRENT_DATETIME,
        AttributeValue::DateTime(time),
    );
    environment
}

/// Build the resource attribute map for an operation.
///
/// Starts from the externally supplied base attributes (which carry the
/// object identifier) and adds one entry per extracted field present in the
/// operation's table, converted to the table's value kind.
pub fn resource_map(
    base: AttributeMap,
    spec: &OperationSpec,
    extracted: &ExtractedFields,
) -> Result<AttributeMap> {
    let mut resource = base;
    for entry in spec.fields {
        if let Some(raw) = extracted.get(entry.field) {
            let value = entry.kind.value(entry.field, raw)?;
            resource.insert(entry.attribute, value);
        }
    }
    Ok(resource)
}

/// Build the subject attribute map for the invoking caller.
///
/// Callers without an established identity produce an empty subject map:
/// a synthetic anonymous attribute is never emitted.
pub fn subject_map(actor: Option<&Actor>) -> AttributeMap {
    let mut subject = AttributeMap::new();
    let actor = match actor {
        Some(actor) => actor,
        None => return subject,
    };
    if !actor.id.is_empty() {
        subject.insert(
            vocabulary::subject::LOGIN_ID,
            AttributeValue::String(actor.id.clone()),
        );
    }
    for (id, value) in &actor.attributes {
        if !value.is_empty() {
            subject.insert(id.clone(), AttributeValue::String(value.clone()));
        }
    }
    subject
}
