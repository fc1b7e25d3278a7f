//! Access enforcement layer for the Depot content repository.
//!
//! Every externally invoked repository operation is intercepted before it
//! executes and translated into a canonical authorisation decision request:
//!
//! 1. A transport adapter captures the raw call: either a path-addressed
//!    call decomposed into segments and query parameters, or a message-style
//!    remote call exposing named read accessors.
//! 2. The operation's declarative table drives extraction of the fields that
//!    matter to authorisation for that operation.
//! 3. The attribute assembler merges extracted fields with the externally
//!    resolved base resource attributes and the invocation's identity and
//!    environment context into four attribute maps (subject, action,
//!    resource, environment).
//! 4. An escalation rule may substitute a more privileged action when a
//!    sensitive sub-resource is touched.
//! 5. The assembled maps are submitted to the external policy decision
//!    gateway and the resulting [`DecisionRequest`] handed back to the
//!    caller of this layer for evaluation and enforcement.
//!
//! The flow is fail-closed: no partial decision request is ever produced,
//! so a failed translation always denies the underlying operation. Audit
//! recording is the one best-effort step and never affects the outcome.
pub mod assemble;
pub mod attrs;
pub mod enforce;
pub mod errors;
pub mod extract;
pub mod gateway;
pub mod operation;
pub mod resource;
pub mod vocabulary;

pub use self::attrs::AttributeMap;
pub use self::attrs::AttributeValue;
pub use self::attrs::ValueKind;
pub use self::enforce::Enforcer;
pub use self::gateway::Decision;
pub use self::gateway::DecisionRequest;
