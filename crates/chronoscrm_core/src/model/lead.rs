//! Lead domain model.
//!
//! # Responsibility
//! - Define the canonical lead record shared by board/table/detail views.
//! - Define the fixed pipeline stage enumeration and its display order.
//!
//! # Invariants
//! - `id` is stable and never reused for another lead.
//! - `added_at` is fixed at creation and never changes afterwards.
//! - `last_status_change` moves only as a side effect of a status
//!   transition and is never earlier than `added_at`.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};
use uuid::Uuid;

/// Stable identifier for every lead owned by the store.
///
/// Kept as a type alias to make semantic intent explicit in signatures.
pub type LeadId = Uuid;

/// Pipeline stage of a lead.
///
/// The variant order is the display order of the kanban board. Any stage
/// may transition to any other stage in one hop; there is no
/// forbidden-transition graph.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum LeadStatus {
    /// Fresh, untouched prospect.
    New,
    /// Vetted as a realistic buyer.
    Qualified,
    /// Awaiting a follow-up touchpoint.
    FollowUp,
    /// Showroom visit on the calendar.
    VisitScheduled,
    /// Price/terms under discussion.
    Negotiating,
    /// Deal closed.
    Won,
    /// Deal lost or dropped out.
    Lost,
}

impl LeadStatus {
    /// Every pipeline stage, in board display order.
    pub const ALL: [Self; 7] = [
        Self::New,
        Self::Qualified,
        Self::FollowUp,
        Self::VisitScheduled,
        Self::Negotiating,
        Self::Won,
        Self::Lost,
    ];

    /// Stable string form used in logs and external schemas.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::New => "new",
            Self::Qualified => "qualified",
            Self::FollowUp => "follow_up",
            Self::VisitScheduled => "visit_scheduled",
            Self::Negotiating => "negotiating",
            Self::Won => "won",
            Self::Lost => "lost",
        }
    }

    /// Parses the stable string form back into a stage.
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "new" => Some(Self::New),
            "qualified" => Some(Self::Qualified),
            "follow_up" => Some(Self::FollowUp),
            "visit_scheduled" => Some(Self::VisitScheduled),
            "negotiating" => Some(Self::Negotiating),
            "won" => Some(Self::Won),
            "lost" => Some(Self::Lost),
            _ => None,
        }
    }
}

impl Display for LeadStatus {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Validation error for lead records.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LeadValidationError {
    /// `last_status_change` predates `added_at`.
    StatusChangeBeforeAdded {
        added_at: DateTime<Utc>,
        last_status_change: DateTime<Utc>,
    },
}

impl Display for LeadValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::StatusChangeBeforeAdded {
                added_at,
                last_status_change,
            } => write!(
                f,
                "last_status_change {last_status_change} is earlier than added_at {added_at}"
            ),
        }
    }
}

impl Error for LeadValidationError {}

/// A watch the lead has expressed interest in.
///
/// Immutable once attached to a lead; the `interests` sequence keeps
/// insertion order because that is the display order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WatchInterest {
    pub id: Uuid,
    pub brand: String,
    pub model: String,
    /// Manufacturer reference code, e.g. `116500LN`.
    pub reference: String,
    /// Asking price in whole currency units. Unsigned: a price is never
    /// negative.
    pub price: u64,
    /// Image reference handed through to the rendering layer untouched.
    pub image: String,
}

impl WatchInterest {
    pub fn new(
        brand: impl Into<String>,
        model: impl Into<String>,
        reference: impl Into<String>,
        price: u64,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            brand: brand.into(),
            model: model.into(),
            reference: reference.into(),
            price,
            image: String::new(),
        }
    }
}

/// One entry in a lead's append-only conversation log.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Note {
    pub id: Uuid,
    pub content: String,
    /// Display label of the author.
    pub author: String,
    pub created_at: DateTime<Utc>,
    /// True when the note was written by the current operator. Affects
    /// rendering only, never business logic.
    pub is_me: bool,
}

/// Author label stamped on notes written through the store.
pub const CURRENT_OPERATOR_LABEL: &str = "You";

impl Note {
    /// Creates a note authored by the current operator.
    pub fn by_operator(content: impl Into<String>, created_at: DateTime<Utc>) -> Self {
        Self {
            id: Uuid::new_v4(),
            content: content.into(),
            author: CURRENT_OPERATOR_LABEL.to_string(),
            created_at,
            is_me: true,
        }
    }
}

/// Canonical record for one sales prospect.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Lead {
    /// Stable global ID used for selection, drag-and-drop and auditing.
    pub id: LeadId,
    pub name: String,
    /// Social contact handle, e.g. `@jimc_collector`.
    pub handle: String,
    pub avatar: String,
    pub email: String,
    pub phone: String,
    pub location: String,
    /// Current pipeline stage. Exactly one active value at any time.
    pub status: LeadStatus,
    /// Stamped only by status transitions, never by other field edits.
    pub last_status_change: DateTime<Utc>,
    /// Where the lead came from, e.g. `Instagram`, `Website`.
    pub source: String,
    /// Free-form budget description, e.g. `$20k-50k`.
    pub budget: String,
    /// Insertion order is display order.
    pub interests: Vec<WatchInterest>,
    /// Append-only; individual notes are never edited or removed.
    pub notes: Vec<Note>,
    /// Set semantics: no duplicates, display order irrelevant.
    pub tags: Vec<String>,
    /// Fixed at creation, immutable thereafter.
    pub added_at: DateTime<Utc>,
}

impl Lead {
    /// Creates a new lead entering the pipeline at `New`.
    ///
    /// # Invariants
    /// - `added_at` and `last_status_change` start at the same instant.
    /// - Profile fields not covered by parameters start empty.
    pub fn new(name: impl Into<String>, handle: impl Into<String>) -> Self {
        Self::with_id(Uuid::new_v4(), name, handle)
    }

    /// Creates a new lead with a caller-provided stable ID.
    ///
    /// Used by import paths where identity already exists externally.
    pub fn with_id(id: LeadId, name: impl Into<String>, handle: impl Into<String>) -> Self {
        let now = Utc::now();
        Self {
            id,
            name: name.into(),
            handle: handle.into(),
            avatar: String::new(),
            email: String::new(),
            phone: String::new(),
            location: String::new(),
            status: LeadStatus::New,
            last_status_change: now,
            source: String::new(),
            budget: String::new(),
            interests: Vec::new(),
            notes: Vec::new(),
            tags: Vec::new(),
            added_at: now,
        }
    }

    /// Checks record-level invariants.
    pub fn validate(&self) -> Result<(), LeadValidationError> {
        if self.last_status_change < self.added_at {
            return Err(LeadValidationError::StatusChangeBeforeAdded {
                added_at: self.added_at,
                last_status_change: self.last_status_change,
            });
        }
        Ok(())
    }

    /// Returns the most recent note, if any.
    pub fn last_note(&self) -> Option<&Note> {
        self.notes.last()
    }
}

#[cfg(test)]
mod tests {
    use super::{Lead, LeadStatus, LeadValidationError, Note, WatchInterest};
    use chrono::Duration;

    #[test]
    fn status_string_forms_round_trip() {
        for status in LeadStatus::ALL {
            assert_eq!(LeadStatus::parse(status.as_str()), Some(status));
        }
        assert_eq!(LeadStatus::parse("archived"), None);
    }

    #[test]
    fn all_lists_every_stage_once_in_board_order() {
        assert_eq!(LeadStatus::ALL.len(), 7);
        assert_eq!(LeadStatus::ALL[0], LeadStatus::New);
        assert_eq!(LeadStatus::ALL[6], LeadStatus::Lost);
    }

    #[test]
    fn new_lead_starts_at_new_with_aligned_timestamps() {
        let lead = Lead::new("Jim Collector", "@jimc_collector");
        assert_eq!(lead.status, LeadStatus::New);
        assert_eq!(lead.added_at, lead.last_status_change);
        lead.validate().expect("fresh lead should be valid");
    }

    #[test]
    fn validate_rejects_status_change_before_added() {
        let mut lead = Lead::new("Jim Collector", "@jimc_collector");
        lead.last_status_change = lead.added_at - Duration::seconds(1);
        let err = lead.validate().expect_err("backdated change must fail");
        assert!(matches!(
            err,
            LeadValidationError::StatusChangeBeforeAdded { .. }
        ));
    }

    #[test]
    fn last_note_tracks_the_append_only_log() {
        let mut lead = Lead::new("Jim Collector", "@jimc_collector");
        assert!(lead.last_note().is_none());

        lead.notes
            .push(Note::by_operator("first contact", chrono::Utc::now()));
        lead.notes
            .push(Note::by_operator("sent catalogue", chrono::Utc::now()));
        let latest = lead.last_note().expect("two notes were appended");
        assert_eq!(latest.content, "sent catalogue");
    }

    #[test]
    fn operator_note_is_flagged_is_me() {
        let note = Note::by_operator("called back", chrono::Utc::now());
        assert!(note.is_me);
        assert_eq!(note.author, super::CURRENT_OPERATOR_LABEL);
    }

    #[test]
    fn serde_uses_camel_case_field_names() {
        let mut lead = Lead::new("Jim Collector", "@jimc_collector");
        lead.interests
            .push(WatchInterest::new("Rolex", "Daytona", "116500LN", 45_000));
        let json = serde_json::to_value(&lead).expect("lead should serialize");
        assert!(json.get("lastStatusChange").is_some());
        assert!(json.get("addedAt").is_some());
        assert_eq!(json["status"], "new");
        assert_eq!(json["interests"][0]["price"], 45_000);
    }
}
