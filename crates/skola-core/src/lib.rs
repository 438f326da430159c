// skola-core: offline enrollment reconciliation on top of skola-api.

pub mod error;
pub mod reconcile;

// ── Primary re-exports ──────────────────────────────────────────────
pub use error::WorkflowError;
pub use reconcile::{ReconcileState, Reconciler};
