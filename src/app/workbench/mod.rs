//! Workbench service: owns the store and drives persistence around it.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::mpsc::UnboundedReceiver;
use tokio::sync::watch;
use tokio::task::JoinHandle;

use super::autosave::{sweep_expired, AutoSaveEvent, AutoSaveScheduler, RecoveredContent};
use super::session::SessionPersistence;
use crate::kernel::clock::{now_millis, Clock};
use crate::kernel::services::ports::{LayoutConfig, StorageAdapter, WorkbenchSettings};
use crate::kernel::{
    recover_session, RecoveryReport, StateError, Store, TabId, WorkbenchError, WorkbenchState,
};

mod bridge;
mod lifecycle;
mod save;
mod tick;

pub use save::{document_key, DocumentRecord, DOCUMENT_PREFIX};

/// Application-root service around the layout engine. Every method that
/// arms a timer must run inside a tokio runtime.
pub struct Workbench {
    store: Store,
    config: LayoutConfig,
    storage: Arc<dyn StorageAdapter>,
    autosave: AutoSaveScheduler,
    autosave_rx: UnboundedReceiver<AutoSaveEvent>,
    session: SessionPersistence,
    revision: watch::Sender<u64>,
    sweeper: Option<JoinHandle<()>>,
    clock: Clock,
}

impl Workbench {
    pub fn new(
        storage: Arc<dyn StorageAdapter>,
        settings: WorkbenchSettings,
        config: LayoutConfig,
    ) -> Self {
        Self::with_clock(storage, settings, config, now_millis)
    }

    pub fn with_clock(
        storage: Arc<dyn StorageAdapter>,
        settings: WorkbenchSettings,
        config: LayoutConfig,
        clock: Clock,
    ) -> Self {
        let state = WorkbenchState::with_default_layout(config.clone(), settings);
        let (autosave, autosave_rx) = AutoSaveScheduler::new(Arc::clone(&storage), clock);
        let (revision, _) = watch::channel(0);
        Self {
            store: Store::with_clock(state, clock),
            config,
            session: SessionPersistence::new(Arc::clone(&storage)),
            storage,
            autosave,
            autosave_rx,
            revision,
            sweeper: None,
            clock,
        }
    }

    pub fn state(&self) -> &WorkbenchState {
        self.store.state()
    }

    /// Revision counter bumped after every state change.
    pub fn subscribe(&self) -> watch::Receiver<u64> {
        self.revision.subscribe()
    }

    pub fn revision(&self) -> u64 {
        *self.revision.borrow()
    }

    pub fn autosave(&self) -> &AutoSaveScheduler {
        &self.autosave
    }

    pub fn session(&self) -> &SessionPersistence {
        &self.session
    }

    /// Attempts recovery once and starts the periodic auto-save sweep.
    pub async fn init(&mut self) -> RecoveryReport {
        let report = self.recover_session().await;
        self.start_sweeper();
        tracing::info!(
            recovered = report.recovered,
            errors = report.errors.len(),
            warnings = report.warnings.len(),
            "workbench initialized"
        );
        report
    }

    /// Stops every timer and flushes the session.
    pub async fn dispose(&mut self) -> Result<(), WorkbenchError> {
        self.autosave.cancel_all();
        if let Some(sweeper) = self.sweeper.take() {
            sweeper.abort();
        }
        let result = self.save_session().await;
        tracing::info!(ok = result.is_ok(), "workbench disposed");
        result
    }

    /// Tolerant restore from storage. A missing snapshot keeps the current state.
    pub async fn recover_session(&mut self) -> RecoveryReport {
        let value = match self.session.load_raw().await {
            Ok(Some(value)) => value,
            Ok(None) => {
                tracing::info!("no stored session");
                return RecoveryReport::default();
            }
            Err(err) => {
                tracing::warn!(error = %err, "session unreadable; keeping defaults");
                return RecoveryReport {
                    recovered: false,
                    errors: vec![StateError::corruption(err.to_string())],
                    warnings: Vec::new(),
                };
            }
        };
        let (state, report) = recover_session(&value, self.config.clone());
        self.replace_state(state);
        report
    }

    /// Strict restore. `Ok(false)` when nothing is stored.
    pub async fn load_session(&mut self) -> Result<bool, WorkbenchError> {
        let Some(snapshot) = self.session.load().await? else {
            return Ok(false);
        };
        let state = WorkbenchState::from_snapshot(snapshot, self.config.clone())?;
        self.replace_state(state);
        Ok(true)
    }

    pub async fn save_session(&mut self) -> Result<(), WorkbenchError> {
        let snapshot = self.state().snapshot((self.clock)());
        self.session.save_now(&snapshot).await
    }

    pub async fn recover_auto_saved_content(&self, tab: TabId) -> Option<RecoveredContent> {
        self.autosave.recover_auto_saved_content(tab).await
    }

    fn replace_state(&mut self, state: WorkbenchState) {
        self.autosave.cancel_all();
        self.store.replace_state(state);
        self.notify();
    }

    fn notify(&self) {
        self.revision.send_modify(|rev| *rev += 1);
    }

    fn start_sweeper(&mut self) {
        if let Some(previous) = self.sweeper.take() {
            previous.abort();
        }
        let settings = self.state().settings().clone();
        let storage = Arc::clone(&self.storage);
        let clock = self.clock;
        let period = Duration::from_millis(settings.sweep_interval_ms.max(1));
        let max_age = settings.auto_save_retention_ms;
        self.sweeper = Some(tokio::spawn(async move {
            let mut interval = tokio::time::interval(period);
            loop {
                interval.tick().await;
                if let Err(err) = sweep_expired(&*storage, max_age, clock()).await {
                    tracing::warn!(error = %err, "auto-save sweep failed");
                }
            }
        }));
    }
}

impl Drop for Workbench {
    fn drop(&mut self) {
        if let Some(sweeper) = self.sweeper.take() {
            sweeper.abort();
        }
    }
}

#[cfg(test)]
#[path = "../../../tests/unit/app/workbench.rs"]
mod tests;
