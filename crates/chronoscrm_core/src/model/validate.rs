//! Caller-side input validation for lead mutations.
//!
//! # Responsibility
//! - Reject invalid user input before it reaches the store.
//! - Normalize free-form profile input (handles, tags) to canonical form.
//!
//! # Invariants
//! - The store assumes input passed through this layer and does not
//!   re-validate; every view must call these checks first.
//! - Tag normalization preserves first-occurrence order while enforcing
//!   set semantics.

use once_cell::sync::Lazy;
use regex::Regex;
use std::error::Error;
use std::fmt::{Display, Formatter};

static EMAIL_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").expect("valid email regex"));
static HANDLE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^@?[A-Za-z0-9_.]+$").expect("valid handle regex"));

/// Rejection reasons produced by the validation layer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LeadInputError {
    /// Note content is empty or whitespace-only.
    EmptyNote,
    /// Email does not look like `local@domain.tld`.
    InvalidEmail(String),
    /// Handle contains characters outside `[A-Za-z0-9_.]`.
    InvalidHandle(String),
}

impl Display for LeadInputError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EmptyNote => write!(f, "note content cannot be empty"),
            Self::InvalidEmail(value) => write!(f, "invalid email: `{value}`"),
            Self::InvalidHandle(value) => write!(f, "invalid contact handle: `{value}`"),
        }
    }
}

impl Error for LeadInputError {}

/// Checks note content before `LeadStore::add_note`.
///
/// The store itself appends whatever it is given; empty or
/// whitespace-only content must be stopped here.
pub fn validate_note_content(content: &str) -> Result<(), LeadInputError> {
    if content.trim().is_empty() {
        return Err(LeadInputError::EmptyNote);
    }
    Ok(())
}

/// Checks email shape. Intentionally loose; deliverability is not core's
/// concern.
pub fn validate_email(value: &str) -> Result<(), LeadInputError> {
    if EMAIL_RE.is_match(value.trim()) {
        Ok(())
    } else {
        Err(LeadInputError::InvalidEmail(value.to_string()))
    }
}

/// Normalizes a contact handle to the canonical `@name` form.
pub fn normalize_handle(value: &str) -> Result<String, LeadInputError> {
    let trimmed = value.trim();
    if trimmed.is_empty() || trimmed == "@" || !HANDLE_RE.is_match(trimmed) {
        return Err(LeadInputError::InvalidHandle(value.to_string()));
    }
    if trimmed.starts_with('@') {
        Ok(trimmed.to_string())
    } else {
        Ok(format!("@{trimmed}"))
    }
}

/// Normalizes a tag list to set semantics.
///
/// Rules:
/// - values are trimmed; blank values are dropped,
/// - duplicates are removed, keeping the first occurrence's position.
pub fn normalize_tags(tags: &[String]) -> Vec<String> {
    let mut seen = Vec::new();
    for tag in tags {
        let trimmed = tag.trim();
        if trimmed.is_empty() {
            continue;
        }
        if !seen.iter().any(|existing: &String| existing == trimmed) {
            seen.push(trimmed.to_string());
        }
    }
    seen
}
