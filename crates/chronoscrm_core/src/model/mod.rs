//! Domain model for leads tracked through the sales pipeline.
//!
//! # Responsibility
//! - Define canonical data structures used by core business logic.
//! - Keep one lead-centric shape shared by board/table/detail projections.
//!
//! # Invariants
//! - Every domain object is identified by a stable `LeadId`.
//! - A lead's status is always a member of the fixed stage enumeration.

pub mod lead;
pub mod validate;
