//! View-local selection and staged bulk operations.
//!
//! # Responsibility
//! - Track which lead ids one view has marked for a batch action.
//! - Run the two-phase confirmation flow for destructive bulk actions.
//!
//! # Invariants
//! - Selection is purely a view projection, never part of the entity
//!   model and never persisted.

pub mod coordinator;
