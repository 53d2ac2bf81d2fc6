//! Authoritative in-memory lead store.
//!
//! # Responsibility
//! - Sole writer of the lead table; single source of truth for views.
//! - Apply mutations serially and broadcast the committed snapshot once
//!   per table-changing call.
//!
//! # Invariants
//! - Mutations hold the table lock across their simulated backend
//!   latency, so no caller ever observes a partially applied state and
//!   broadcasts are delivered in commit order.
//! - A missing id is a normal outcome (`Ok(None)` / silent no-op), never
//!   an error.
//! - `last_status_change` only moves on status transitions and is always
//!   strictly greater than its previous value.

use crate::model::lead::{Lead, LeadId, LeadStatus, Note};
use crate::store::subscription::{SnapshotListener, SubscriberRegistry, Subscription};
use chrono::{DateTime, Duration, Utc};
use log::{debug, info};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::sync::Arc;
use tokio::sync::Mutex;

pub type StoreResult<T> = Result<T, StoreError>;

/// Store-level failure taxonomy.
///
/// The in-memory implementation never fails; `Unavailable` reserves room
/// in the contract for a real backing datastore to report transient
/// outages without changing any operation signature.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreError {
    /// The backing transport could not serve the request.
    Unavailable {
        reason: String,
        /// Whether the caller may retry the same request.
        retryable: bool,
    },
}

impl Display for StoreError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Unavailable { reason, retryable } => {
                write!(f, "lead store unavailable (retryable={retryable}): {reason}")
            }
        }
    }
}

impl Error for StoreError {}

/// Latency knobs for the simulated backend round trip.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LeadStoreConfig {
    /// Suspension applied to read operations.
    pub read_latency: std::time::Duration,
    /// Suspension applied to mutating operations.
    pub write_latency: std::time::Duration,
}

impl LeadStoreConfig {
    /// Latency profile matching the simulated remote datastore: 300 ms
    /// reads, 200 ms writes.
    pub fn simulated() -> Self {
        Self {
            read_latency: std::time::Duration::from_millis(300),
            write_latency: std::time::Duration::from_millis(200),
        }
    }

    /// Zero-latency profile for tests and local tooling.
    pub fn instant() -> Self {
        Self {
            read_latency: std::time::Duration::ZERO,
            write_latency: std::time::Duration::ZERO,
        }
    }
}

impl Default for LeadStoreConfig {
    fn default() -> Self {
        Self::simulated()
    }
}

/// Authoritative, single-writer lead table.
///
/// Constructed explicitly by the composition root and handed by
/// reference to every consumer; tests build as many independent stores
/// as they need.
pub struct LeadStore {
    table: Mutex<Vec<Lead>>,
    subscribers: Arc<SubscriberRegistry>,
    config: LeadStoreConfig,
}

impl LeadStore {
    /// Creates an empty store.
    pub fn new(config: LeadStoreConfig) -> Self {
        Self {
            table: Mutex::new(Vec::new()),
            subscribers: SubscriberRegistry::new(),
            config,
        }
    }

    /// Creates a store pre-loaded with externally created leads.
    ///
    /// No broadcast fires for the seed: listeners only observe state from
    /// the moment they subscribe.
    pub fn with_leads(config: LeadStoreConfig, leads: Vec<Lead>) -> Self {
        Self {
            table: Mutex::new(leads),
            subscribers: SubscriberRegistry::new(),
            config,
        }
    }

    /// Registers a listener for post-commit snapshots.
    pub fn subscribe(&self, listener: Arc<dyn SnapshotListener>) -> Subscription {
        self.subscribers.subscribe(listener)
    }

    /// Number of currently subscribed listeners.
    pub fn subscriber_count(&self) -> usize {
        self.subscribers.len()
    }

    /// Returns a full, defensively copied snapshot of the table.
    pub async fn get_all(&self) -> StoreResult<Vec<Lead>> {
        self.suspend(self.config.read_latency).await;
        let table = self.table.lock().await;
        Ok(table.clone())
    }

    /// Looks one lead up by id. `Ok(None)` is a normal outcome.
    pub async fn get_by_id(&self, id: LeadId) -> StoreResult<Option<Lead>> {
        self.suspend(self.config.read_latency).await;
        let table = self.table.lock().await;
        Ok(table.iter().find(|lead| lead.id == id).cloned())
    }

    /// Hands an externally created lead to the store.
    ///
    /// Appends to the table and broadcasts the new snapshot.
    pub async fn insert(&self, lead: Lead) -> StoreResult<Lead> {
        let mut table = self.table.lock().await;
        self.suspend(self.config.write_latency).await;
        info!(
            "event=lead_insert module=store status=ok lead_id={} stage={}",
            lead.id, lead.status
        );
        table.push(lead.clone());
        self.broadcast(&table);
        Ok(lead)
    }

    /// Moves a lead to a new pipeline stage.
    ///
    /// # Contract
    /// - Status and `last_status_change` update together or not at all.
    /// - The new `last_status_change` is strictly greater than the prior
    ///   value, even when the clock reads the same instant twice.
    /// - Missing id: `Ok(None)`, table untouched, no broadcast.
    pub async fn update_status(
        &self,
        id: LeadId,
        status: LeadStatus,
    ) -> StoreResult<Option<Lead>> {
        let mut table = self.table.lock().await;
        self.suspend(self.config.write_latency).await;

        let Some(lead) = table.iter_mut().find(|lead| lead.id == id) else {
            debug!("event=lead_status_update module=store status=missing lead_id={id}");
            return Ok(None);
        };

        let from = lead.status;
        lead.status = status;
        lead.last_status_change = transition_timestamp(lead.last_status_change);
        let updated = lead.clone();
        info!(
            "event=lead_status_update module=store status=ok lead_id={id} from={from} to={status}"
        );

        self.broadcast(&table);
        Ok(Some(updated))
    }

    /// Appends an operator note to a lead's conversation log.
    ///
    /// Content is assumed pre-validated by the caller-side validation
    /// layer; this operation does not re-check it. Missing id is a silent
    /// no-op with no broadcast.
    pub async fn add_note(&self, id: LeadId, content: &str) -> StoreResult<()> {
        let mut table = self.table.lock().await;
        self.suspend(self.config.write_latency).await;

        let Some(lead) = table.iter_mut().find(|lead| lead.id == id) else {
            debug!("event=lead_note_add module=store status=missing lead_id={id}");
            return Ok(());
        };

        lead.notes.push(Note::by_operator(content, Utc::now()));
        info!(
            "event=lead_note_add module=store status=ok lead_id={id} note_count={}",
            lead.notes.len()
        );

        self.broadcast(&table);
        Ok(())
    }

    /// Removes one lead from the table and broadcasts once.
    pub async fn delete(&self, id: LeadId) -> StoreResult<()> {
        self.delete_many(&[id]).await
    }

    /// Removes every matching lead and broadcasts exactly once for the
    /// whole batch, never once per id.
    pub async fn delete_many(&self, ids: &[LeadId]) -> StoreResult<()> {
        let mut table = self.table.lock().await;
        self.suspend(self.config.write_latency).await;

        let before = table.len();
        table.retain(|lead| !ids.contains(&lead.id));
        info!(
            "event=lead_delete module=store status=ok requested={} removed={}",
            ids.len(),
            before - table.len()
        );

        self.broadcast(&table);
        Ok(())
    }

    /// Fans the committed snapshot out to all listeners.
    ///
    /// Called while the table lock is held so delivery order always
    /// matches commit order.
    fn broadcast(&self, table: &[Lead]) {
        self.subscribers.notify(table);
    }

    async fn suspend(&self, latency: std::time::Duration) {
        if !latency.is_zero() {
            tokio::time::sleep(latency).await;
        }
    }
}

/// Stamps a status transition strictly after the prior one.
///
/// Coarse clocks can return the same instant twice in a row; clamping
/// keeps transition timestamps totally ordered per lead.
fn transition_timestamp(prior: DateTime<Utc>) -> DateTime<Utc> {
    let now = Utc::now();
    if now > prior {
        now
    } else {
        prior + Duration::microseconds(1)
    }
}
