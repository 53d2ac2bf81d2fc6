//! Authoritative lead storage and change notification.
//!
//! # Responsibility
//! - Own the single mutable lead table and its mutation entry points.
//! - Fan committed snapshots out to subscribed views.
//!
//! # Invariants
//! - Only the store mutates the table; views read snapshots or request
//!   mutations through store operations.
//! - Every table-changing operation broadcasts exactly once, after commit.

pub mod lead_store;
pub mod subscription;
