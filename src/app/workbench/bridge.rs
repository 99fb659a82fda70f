use std::time::Duration;

use super::Workbench;
use crate::kernel::{Action, DispatchResult, Effect};

impl Workbench {
    /// Runs one action through the store, then its effects. A state change
    /// notifies subscribers and re-arms the session write.
    pub fn dispatch(&mut self, action: Action) -> DispatchResult {
        let result = self.store.dispatch(action);
        for effect in &result.effects {
            self.run_effect(effect);
        }
        if result.state_changed {
            self.notify();
            self.schedule_session_save();
        }
        result
    }

    fn run_effect(&mut self, effect: &Effect) {
        match effect {
            Effect::ScheduleAutoSave { tab } => {
                let state = self.store.state();
                let Some(tab) = state.tab(*tab) else {
                    return;
                };
                let settings = state.settings();
                self.autosave.trigger_auto_save(tab, settings);
            }
            Effect::CancelAutoSave { tab } => {
                self.autosave.cancel(*tab);
            }
            Effect::CancelAllAutoSaves => self.autosave.cancel_all(),
        }
    }

    fn schedule_session_save(&mut self) {
        let state = self.store.state();
        let delay = Duration::from_millis(state.settings().session_save_delay_ms);
        match state.snapshot((self.clock)()).to_value() {
            Ok(value) => self.session.schedule(value, delay),
            Err(err) => tracing::warn!(error = %err, "session snapshot failed"),
        }
    }
}
