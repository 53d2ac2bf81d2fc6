//! Pipeline stage movement rules and board projections.
//!
//! # Responsibility
//! - Govern drag-and-drop stage movement and its observable effects.
//! - Derive per-stage board statistics from a snapshot on every read.
//!
//! # Invariants
//! - Derived statistics are pure projections; nothing here caches state.

pub mod optimistic;
pub mod transition;
