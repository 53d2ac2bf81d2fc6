//! Selection set and two-phase bulk deletion.
//!
//! # Responsibility
//! - Maintain one view's set of selected lead ids.
//! - Stage, confirm or cancel bulk deletions against the store.
//!
//! # Invariants
//! - Set semantics: an id is selected at most once; order carries no
//!   meaning.
//! - After the view processes a broadcast through
//!   `sync_with_snapshot`, no selected or staged id refers to a lead
//!   absent from that snapshot.
//! - `request_confirmation` never deletes; only `confirm` reaches the
//!   store.

use crate::model::lead::{Lead, LeadId};
use crate::store::lead_store::{LeadStore, StoreError};
use std::collections::BTreeSet;
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Errors raised by the selection/bulk-operation flow.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SelectionError {
    /// `request_confirmation` was called with no ids.
    EmptySelection,
    /// `confirm` was called with nothing staged.
    NothingStaged,
    /// The store rejected the delete request.
    Store(StoreError),
}

impl Display for SelectionError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EmptySelection => write!(f, "cannot stage a deletion of zero leads"),
            Self::NothingStaged => write!(f, "no staged deletion to confirm"),
            Self::Store(err) => write!(f, "{err}"),
        }
    }
}

impl Error for SelectionError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Store(err) => Some(err),
            _ => None,
        }
    }
}

impl From<StoreError> for SelectionError {
    fn from(value: StoreError) -> Self {
        Self::Store(value)
    }
}

/// A staged deletion awaiting explicit confirmation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingDeletion {
    ids: BTreeSet<LeadId>,
}

impl PendingDeletion {
    /// Ids staged for deletion.
    pub fn ids(&self) -> impl Iterator<Item = &LeadId> {
        self.ids.iter()
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }
}

/// Per-view selection state layered on top of the store.
///
/// The coordinator never holds a reference to the store; the view passes
/// its store handle into `confirm` explicitly.
#[derive(Debug, Default)]
pub struct SelectionCoordinator {
    selected: BTreeSet<LeadId>,
    staged: Option<PendingDeletion>,
}

impl SelectionCoordinator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts the id if absent, removes it if present. Returns whether
    /// the id is selected afterwards.
    pub fn toggle(&mut self, id: LeadId) -> bool {
        if self.selected.remove(&id) {
            false
        } else {
            self.selected.insert(id);
            true
        }
    }

    pub fn is_selected(&self, id: LeadId) -> bool {
        self.selected.contains(&id)
    }

    /// Replaces the selection with every id in the snapshot.
    pub fn select_all(&mut self, snapshot: &[Lead]) {
        self.selected = snapshot.iter().map(|lead| lead.id).collect();
    }

    /// Empties the selection. Staged deletions are unaffected.
    pub fn clear(&mut self) {
        self.selected.clear();
    }

    pub fn len(&self) -> usize {
        self.selected.len()
    }

    pub fn is_empty(&self) -> bool {
        self.selected.is_empty()
    }

    /// Currently selected ids, in no meaningful order.
    pub fn selected_ids(&self) -> Vec<LeadId> {
        self.selected.iter().copied().collect()
    }

    /// Drops every selected and staged id absent from the snapshot.
    ///
    /// Views call this while processing each broadcast, so a selection
    /// never outlives its lead past the observed snapshot.
    pub fn sync_with_snapshot(&mut self, snapshot: &[Lead]) {
        let live: BTreeSet<LeadId> = snapshot.iter().map(|lead| lead.id).collect();
        self.selected.retain(|id| live.contains(id));
        if let Some(staged) = self.staged.as_mut() {
            staged.ids.retain(|id| live.contains(id));
            if staged.ids.is_empty() {
                self.staged = None;
            }
        }
    }

    /// Stages a deletion for explicit confirmation. Never deletes.
    ///
    /// Restaging replaces any previously staged set.
    pub fn request_confirmation(
        &mut self,
        ids: Vec<LeadId>,
    ) -> Result<&PendingDeletion, SelectionError> {
        let ids: BTreeSet<LeadId> = ids.into_iter().collect();
        if ids.is_empty() {
            return Err(SelectionError::EmptySelection);
        }
        Ok(self.staged.insert(PendingDeletion { ids }))
    }

    /// The staged deletion, if any.
    pub fn pending(&self) -> Option<&PendingDeletion> {
        self.staged.as_ref()
    }

    /// Issues the store's bulk delete with the staged ids and clears
    /// staging. Returns how many ids were requested for deletion.
    ///
    /// The confirmed ids are dropped from the selection immediately; the
    /// broadcast-driven `sync_with_snapshot` pass then agrees with the
    /// post-delete table.
    pub async fn confirm(&mut self, store: &LeadStore) -> Result<usize, SelectionError> {
        let staged = self.staged.take().ok_or(SelectionError::NothingStaged)?;
        let ids: Vec<LeadId> = staged.ids.iter().copied().collect();
        store.delete_many(&ids).await?;
        self.selected.retain(|id| !staged.ids.contains(id));
        Ok(ids.len())
    }

    /// Discards the staged deletion without any store call.
    pub fn cancel(&mut self) {
        self.staged = None;
    }
}

#[cfg(test)]
mod tests {
    use super::{SelectionCoordinator, SelectionError};
    use crate::model::lead::Lead;
    use uuid::Uuid;

    fn two_leads() -> Vec<Lead> {
        vec![
            Lead::new("Jim Collector", "@jimc_collector"),
            Lead::new("Ana Peters", "@ana.watches"),
        ]
    }

    #[test]
    fn toggle_inserts_then_removes() {
        let mut coordinator = SelectionCoordinator::new();
        let id = Uuid::new_v4();
        assert!(coordinator.toggle(id));
        assert!(coordinator.is_selected(id));
        assert!(!coordinator.toggle(id));
        assert!(coordinator.is_empty());
    }

    #[test]
    fn select_all_mirrors_the_snapshot_and_clear_empties() {
        let leads = two_leads();
        let mut coordinator = SelectionCoordinator::new();
        coordinator.select_all(&leads);
        assert_eq!(coordinator.len(), 2);
        assert!(coordinator.is_selected(leads[0].id));

        coordinator.clear();
        assert!(coordinator.is_empty());
    }

    #[test]
    fn sync_with_snapshot_drops_dead_ids() {
        let leads = two_leads();
        let mut coordinator = SelectionCoordinator::new();
        coordinator.select_all(&leads);
        coordinator
            .request_confirmation(vec![leads[0].id, leads[1].id])
            .expect("two ids should stage");

        // Snapshot in which the first lead no longer exists.
        coordinator.sync_with_snapshot(&leads[1..]);
        assert!(!coordinator.is_selected(leads[0].id));
        assert!(coordinator.is_selected(leads[1].id));
        let staged = coordinator.pending().expect("staging survives partially");
        assert_eq!(staged.len(), 1);

        coordinator.sync_with_snapshot(&[]);
        assert!(coordinator.is_empty());
        assert!(coordinator.pending().is_none());
    }

    #[test]
    fn request_confirmation_rejects_empty_input_and_never_deletes() {
        let mut coordinator = SelectionCoordinator::new();
        let err = coordinator
            .request_confirmation(Vec::new())
            .expect_err("empty staging must fail");
        assert_eq!(err, SelectionError::EmptySelection);
        assert!(coordinator.pending().is_none());
    }

    #[test]
    fn staging_deduplicates_ids() {
        let mut coordinator = SelectionCoordinator::new();
        let id = Uuid::new_v4();
        let staged = coordinator
            .request_confirmation(vec![id, id, id])
            .expect("duplicate ids should stage once");
        assert_eq!(staged.len(), 1);
        assert_eq!(staged.ids().copied().collect::<Vec<_>>(), vec![id]);
    }

    #[test]
    fn cancel_discards_staging_only() {
        let leads = two_leads();
        let mut coordinator = SelectionCoordinator::new();
        coordinator.select_all(&leads);
        coordinator
            .request_confirmation(coordinator.selected_ids())
            .expect("selection should stage");

        coordinator.cancel();
        assert!(coordinator.pending().is_none());
        assert_eq!(coordinator.len(), 2);
    }
}
