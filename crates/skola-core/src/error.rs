// ── Workflow error types ──
//
// User-facing errors from skola-core. Consumers of the reconciler never
// see raw transport errors directly; the `From<skola_api::Error>` impl
// translates API-layer failures into domain-appropriate variants while
// preserving the server's own message text.

use thiserror::Error;

use crate::reconcile::ReconcileState;

/// Unified error type for the core crate.
#[derive(Debug, Error)]
pub enum WorkflowError {
    // ── Session errors ───────────────────────────────────────────────
    #[error("Authentication failed: {message}")]
    AuthenticationFailed { message: String },

    // ── Data errors ──────────────────────────────────────────────────
    /// The server does not know the entity a step referred to. Carries
    /// the server's message verbatim ("could not find invitation ...").
    #[error("Not found: {message}")]
    NotFound { message: String },

    /// The server rejected the request as malformed, or a step was
    /// invoked with arguments the client can tell are invalid before
    /// issuing the request (empty invitation id, empty tree).
    #[error("Bad request: {message}")]
    BadRequest { message: String },

    // ── Workflow errors ──────────────────────────────────────────────
    /// A step was invoked from a state it is not legal in. The request
    /// is never issued.
    #[error("Step {step} not allowed in state {state:?}")]
    OutOfOrder {
        step: &'static str,
        state: ReconcileState,
    },

    /// A polled job exhausted its budget without reaching its terminal
    /// status. Carries the last status observed.
    #[error("Job did not complete, last status {status:?}")]
    JobIncomplete { status: String },

    /// A sync batch reported a failed record. Approval refuses to build
    /// on a tree the offline store did not fully accept.
    #[error("Sync rejected for enrollment {id}: {message}")]
    SyncRejected { id: String, message: String },

    /// The server declined to mark an enrollment as approved.
    #[error("Approval rejected for enrollment {id}")]
    ApprovalRejected { id: String },

    // ── API errors (wrapped, not exposed raw) ────────────────────────
    #[error("API error {status}: {message}")]
    Api { status: u16, message: String },

    #[error("Transport error: {0}")]
    Transport(String),

    // ── Internal errors ──────────────────────────────────────────────
    #[error("Internal error: {0}")]
    Internal(String),
}

// ── Conversion from API-layer errors ─────────────────────────────────

impl From<skola_api::Error> for WorkflowError {
    fn from(err: skola_api::Error) -> Self {
        match err {
            skola_api::Error::Api { status: 404, message } => {
                WorkflowError::NotFound { message }
            }
            skola_api::Error::Api { status: 400, message } => {
                WorkflowError::BadRequest { message }
            }
            skola_api::Error::Api { status, message } => WorkflowError::Api { status, message },
            skola_api::Error::Authentication { message } => {
                WorkflowError::AuthenticationFailed { message }
            }
            skola_api::Error::Transport(e) => WorkflowError::Transport(e.to_string()),
            skola_api::Error::PollTimeout { attempts } => WorkflowError::JobIncomplete {
                status: format!("not terminal after {attempts} attempts"),
            },
            other => WorkflowError::Internal(other.to_string()),
        }
    }
}
