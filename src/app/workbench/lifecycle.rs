use super::Workbench;
use crate::kernel::services::ports::{BeforeUnload, HookFuture, LifecycleHooks};
use crate::kernel::{Action, RecoveryReport, Tab};

impl LifecycleHooks for Workbench {
    fn on_load(&mut self) -> HookFuture<'_, RecoveryReport> {
        Box::pin(self.init())
    }

    /// Starts a best-effort session write; the host cannot wait for it.
    fn on_before_unload(&mut self) -> BeforeUnload {
        self.autosave.cancel_all();
        match self.state().snapshot((self.clock)()).to_value() {
            Ok(value) => {
                self.session.save_detached(value);
            }
            Err(err) => tracing::warn!(error = %err, "session snapshot on unload failed"),
        }
        BeforeUnload {
            should_prompt: self.state().has_dirty_tabs(),
        }
    }

    /// Flushes dirty tabs to auto-save storage when auto-save is on.
    fn on_blur(&mut self) -> HookFuture<'_, ()> {
        Box::pin(async move {
            if !self.state().settings().auto_save {
                return;
            }
            let dirty: Vec<Tab> = self.state().tabs().dirty().cloned().collect();
            if dirty.is_empty() {
                return;
            }
            let report = self.autosave.save_all(&dirty).await;
            for tab in dirty.iter().filter(|t| report.saved.contains(&t.id)) {
                self.dispatch(Action::MarkSaved {
                    tab: tab.id,
                    modified_at: tab.modified_at,
                });
            }
            if !report.failed.is_empty() {
                tracing::warn!(failed = report.failed.len(), "auto-save on blur incomplete");
            }
        })
    }
}
