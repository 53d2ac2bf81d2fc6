//! Core domain logic for the chronoscrm sales pipeline.
//! This crate is the single source of truth for lead data and pipeline
//! invariants; UI layers only call its operations and render snapshots.

pub mod logging;
pub mod model;
pub mod pipeline;
pub mod selection;
pub mod store;

pub use logging::{default_log_level, init_logging, logging_status};
pub use model::lead::{
    Lead, LeadId, LeadStatus, LeadValidationError, Note, WatchInterest, CURRENT_OPERATOR_LABEL,
};
pub use model::validate::{
    normalize_handle, normalize_tags, validate_email, validate_note_content, LeadInputError,
};
pub use pipeline::optimistic::{MoveOutcome, OptimisticMove};
pub use pipeline::transition::{
    plan_move, recent_activity_window, stage_summaries, BoardPosition, StageMove, StageSummary,
    RECENT_ACTIVITY_WINDOW_HOURS,
};
pub use selection::coordinator::{PendingDeletion, SelectionCoordinator, SelectionError};
pub use store::lead_store::{LeadStore, LeadStoreConfig, StoreError, StoreResult};
pub use store::subscription::{SnapshotListener, SubscriberRegistry, Subscription};

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
