//! Tracks the outcome of best-effort relay forwards.
//!
//! A completed signing run spawns a detached task that POSTs the record to
//! the remote relay (see `backend/src/services/contracts/complete.rs`). The
//! request path never waits on that task; its outcome is only observable
//! here, via the shared map behind `GET /api/contracts/relay/{contract_id}`,
//! and in the log.
//!
//! The main components are:
//! - `RelayState`: a clonable, thread-safe struct holding the per-contract
//!   attempt statuses. It is injected into the Actix application state in
//!   `main.rs`.
//! - `RelayUpdate`: a message struct used by forward tasks to report their
//!   result back to the central state manager.
//! - `start_relay_updater`: a long-running task that listens for
//!   `RelayUpdate` messages on an MPSC channel and folds them into the map.

use common::relay::RelayStatus;
use std::{collections::HashMap, sync::Arc};
use tokio::sync::{mpsc, RwLock};

/// A thread-safe, shareable container for the state of all relay attempts.
#[derive(Clone)]
pub struct RelayState {
    /// Map from contract id to the current state of its forward attempt.
    ///
    /// Protected by an `Arc<RwLock>` so the status endpoint can read
    /// concurrently while the updater task holds the only write path.
    pub attempts: Arc<RwLock<HashMap<String, RelayStatus>>>,

    /// Sender used by forward tasks to report outcomes without needing
    /// write access to the map.
    pub tx: mpsc::Sender<RelayUpdate>,
}

/// A status report for one contract's forward attempt.
#[derive(Debug)]
pub struct RelayUpdate {
    pub contract_id: String,
    pub status: RelayStatus,
}

/// Starts the central relay state updater task.
///
/// Spawned once from `main.rs`; listens for `RelayUpdate` messages on `rx`
/// and updates the shared map accordingly.
pub async fn start_relay_updater(state: RelayState, mut rx: mpsc::Receiver<RelayUpdate>) {
    while let Some(update) = rx.recv().await {
        let mut attempts = state.attempts.write().await;
        attempts.insert(update.contract_id, update.status);
    }
}
