//! Run registry and timer drivers
//!
//! Each live run sits in a [`RunSlot`] behind its own async mutex. While a
//! run is processing, one tokio task (its driver) sleeps until the run's next
//! deadline and polls it. Pausing, resetting or deleting a run aborts the
//! driver, which drops any pending timer with it.
//!
//! Clients never say goodbye, so runs that are not processing expire once
//! they have been left alone for the registry's idle TTL.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::{Mutex, RwLock};
use tokio::task::JoinHandle;
use tokio::time::Instant;
use tracing::{debug, info};

use core_kernel::{Clock, RunId};
use domain_claims::{RunState, WorkflowSession};

/// A run and the task currently driving it
pub struct RunSlot {
    pub session: WorkflowSession,
    driver: Option<JoinHandle<()>>,
    last_activity: Instant,
}

impl RunSlot {
    fn new(session: WorkflowSession) -> Self {
        Self {
            session,
            driver: None,
            last_activity: Instant::now(),
        }
    }

    /// Records client or driver activity, restarting the idle TTL
    pub fn touch(&mut self) {
        self.last_activity = Instant::now();
    }

    /// A run waiting on its auto-start delay is still Idle, so a live driver
    /// also keeps the slot alive.
    fn is_expired(&self, ttl: Duration) -> bool {
        let driving = self.driver.as_ref().is_some_and(|handle| !handle.is_finished());
        !driving && self.session.run().state() != RunState::Running && self.last_activity.elapsed() >= ttl
    }

    /// Aborts the driver, if any
    pub fn stop_driver(&mut self) {
        if let Some(handle) = self.driver.take() {
            handle.abort();
        }
    }
}

pub type SharedSlot = Arc<Mutex<RunSlot>>;

/// All live runs, keyed by id
#[derive(Clone)]
pub struct RunRegistry {
    runs: Arc<RwLock<HashMap<RunId, SharedSlot>>>,
    idle_ttl: Duration,
}

impl RunRegistry {
    pub fn new(idle_ttl: Duration) -> Self {
        Self {
            runs: Arc::default(),
            idle_ttl,
        }
    }

    /// Adds a run, first evicting expired ones
    pub async fn insert(&self, session: WorkflowSession) -> (RunId, SharedSlot) {
        self.evict_expired().await;
        let id = session.run().id();
        let slot = Arc::new(Mutex::new(RunSlot::new(session)));
        self.runs.write().await.insert(id, slot.clone());
        (id, slot)
    }

    pub async fn get(&self, id: RunId) -> Option<SharedSlot> {
        self.runs.read().await.get(&id).cloned()
    }

    /// Removes a run and stops its driver
    pub async fn remove(&self, id: RunId) -> bool {
        let Some(slot) = self.runs.write().await.remove(&id) else {
            return false;
        };
        slot.lock().await.stop_driver();
        true
    }

    pub async fn len(&self) -> usize {
        self.runs.read().await.len()
    }

    /// Drops runs that are not processing and have sat idle past the TTL
    ///
    /// Slots locked by a request in flight are in use and are skipped.
    pub async fn evict_expired(&self) -> usize {
        let mut runs = self.runs.write().await;
        let before = runs.len();
        runs.retain(|id, slot| match slot.try_lock() {
            Ok(mut guard) if guard.is_expired(self.idle_ttl) => {
                guard.stop_driver();
                debug!(run_id = %id, "Idle run evicted");
                false
            }
            _ => true,
        });
        let evicted = before - runs.len();
        if evicted > 0 {
            info!(evicted, live = runs.len(), "Evicted idle runs");
        }
        evicted
    }

    /// Spawns a task that evicts expired runs every `period`
    pub fn spawn_sweeper(&self, period: Duration) -> JoinHandle<()> {
        let registry = self.clone();
        tokio::spawn(async move {
            let mut interval = tokio::time::interval(period);
            loop {
                interval.tick().await;
                registry.evict_expired().await;
            }
        })
    }
}

/// Replaces the slot's driver with a fresh one
///
/// With `start_after`, the driver first waits that long and then starts the
/// run; otherwise it only advances a run that is already processing.
pub fn spawn_driver(
    slot_ref: &SharedSlot,
    slot: &mut RunSlot,
    clock: Arc<dyn Clock>,
    start_after: Option<Duration>,
) {
    slot.stop_driver();
    let shared = slot_ref.clone();
    slot.driver = Some(tokio::spawn(drive(shared, clock, start_after)));
}

async fn drive(slot: SharedSlot, clock: Arc<dyn Clock>, start_after: Option<Duration>) {
    if let Some(delay) = start_after {
        tokio::time::sleep(delay).await;
        let mut guard = slot.lock().await;
        let now = clock.now();
        guard.session.run_mut().start(now);
    }

    loop {
        let deadline = slot.lock().await.session.run().next_deadline();
        let Some(deadline) = deadline else {
            break;
        };

        let wait = (deadline - clock.now()).to_std().unwrap_or_default();
        tokio::time::sleep(wait).await;

        let mut guard = slot.lock().await;
        let now = clock.now();
        let events = guard.session.run_mut().poll(now);
        guard.touch();
        debug!(run_id = %guard.session.run().id(), events = events.len(), "Run polled");
    }
}
