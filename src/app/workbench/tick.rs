use super::Workbench;
use crate::app::autosave::AutoSaveEvent;
use crate::kernel::Action;

const MAX_EVENTS_PER_PUMP: usize = 256;

impl Workbench {
    /// Applies finished auto-saves to the store. Returns whether state changed.
    pub fn pump(&mut self) -> bool {
        let mut changed = false;
        for _ in 0..MAX_EVENTS_PER_PUMP {
            let Ok(event) = self.autosave_rx.try_recv() else {
                break;
            };
            match event {
                AutoSaveEvent::Saved { tab, modified_at } => {
                    changed |= self
                        .dispatch(Action::MarkSaved { tab, modified_at })
                        .state_changed;
                }
                AutoSaveEvent::Failed { tab, error } => {
                    tracing::warn!(tab = %tab, %error, "tab stays dirty after failed auto-save");
                }
            }
        }
        changed
    }
}
