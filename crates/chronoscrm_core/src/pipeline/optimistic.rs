//! Two-phase optimistic stage movement.
//!
//! # Responsibility
//! - Let a view apply a provisional stage change before the store
//!   confirms it, and reconcile once the authoritative answer arrives.
//!
//! # Invariants
//! - The provisional snapshot is view-local; the authoritative table is
//!   never touched by this module.
//! - Reconciliation either confirms the guess or reports exactly how to
//!   roll it back.

use crate::model::lead::{Lead, LeadId, LeadStatus};
use chrono::{DateTime, Utc};

/// A provisional stage movement awaiting store confirmation.
///
/// Protocol: `apply` rewrites the view's local snapshot immediately, the
/// view issues `LeadStore::update_status`, then `reconcile` compares the
/// authoritative result against the guess.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OptimisticMove {
    lead_id: LeadId,
    to: LeadStatus,
    prior_status: LeadStatus,
    prior_status_change: DateTime<Utc>,
}

/// Result of reconciling a provisional move against the store's answer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MoveOutcome {
    /// The authoritative result matches the provisional guess.
    Confirmed,
    /// The lead no longer exists; drop it from the provisional snapshot.
    TargetGone,
    /// The authoritative status differs from the guess; restore the
    /// prior state and surface the mismatch.
    Diverged { authoritative: LeadStatus },
}

impl OptimisticMove {
    /// Applies a provisional stage change to a local snapshot copy.
    ///
    /// Returns the rewritten snapshot plus the pending record needed for
    /// reconciliation, or `None` when the lead is not in the snapshot.
    pub fn apply(
        snapshot: &[Lead],
        lead_id: LeadId,
        to: LeadStatus,
        now: DateTime<Utc>,
    ) -> Option<(Vec<Lead>, Self)> {
        let prior = snapshot.iter().find(|lead| lead.id == lead_id)?;
        let pending = Self {
            lead_id,
            to,
            prior_status: prior.status,
            prior_status_change: prior.last_status_change,
        };

        let provisional = snapshot
            .iter()
            .cloned()
            .map(|mut lead| {
                if lead.id == lead_id {
                    lead.status = to;
                    lead.last_status_change = now;
                }
                lead
            })
            .collect();
        Some((provisional, pending))
    }

    pub fn lead_id(&self) -> LeadId {
        self.lead_id
    }

    pub fn to(&self) -> LeadStatus {
        self.to
    }

    /// Compares the store's authoritative answer against the guess.
    ///
    /// `authoritative` is the value returned by
    /// `LeadStore::update_status` (or a later `get_by_id`).
    pub fn reconcile(&self, authoritative: Option<&Lead>) -> MoveOutcome {
        match authoritative {
            None => MoveOutcome::TargetGone,
            Some(lead) if lead.status == self.to => MoveOutcome::Confirmed,
            Some(lead) => MoveOutcome::Diverged {
                authoritative: lead.status,
            },
        }
    }

    /// Rolls the provisional change back in a local snapshot.
    ///
    /// Used on `Diverged`; restores the lead's prior status and
    /// transition timestamp.
    pub fn roll_back(&self, snapshot: &mut [Lead]) {
        if let Some(lead) = snapshot.iter_mut().find(|lead| lead.id == self.lead_id) {
            lead.status = self.prior_status;
            lead.last_status_change = self.prior_status_change;
        }
    }
}
