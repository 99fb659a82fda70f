use serde::{Deserialize, Serialize};

pub const MIN_AUTO_SAVE_DELAY_MS: u64 = 500;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub enum StackingStrategy {
    #[default]
    Overflow,
    Manual,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct WorkbenchSettings {
    pub auto_save: bool,
    pub auto_save_delay_ms: u64,
    pub session_save_delay_ms: u64,
    pub auto_stacking: bool,
    pub stacking_strategy: StackingStrategy,
    pub max_visible_tabs: usize,
    pub auto_save_retention_ms: u64,
    pub sweep_interval_ms: u64,
}

impl Default for WorkbenchSettings {
    fn default() -> Self {
        Self {
            auto_save: true,
            auto_save_delay_ms: 2000,
            session_save_delay_ms: 2000,
            auto_stacking: true,
            stacking_strategy: StackingStrategy::Overflow,
            max_visible_tabs: 8,
            auto_save_retention_ms: 7 * 24 * 60 * 60 * 1000,
            sweep_interval_ms: 60_000,
        }
    }
}

impl WorkbenchSettings {
    pub fn effective_auto_save_delay_ms(&self) -> u64 {
        self.auto_save_delay_ms.max(MIN_AUTO_SAVE_DELAY_MS)
    }
}

#[cfg(test)]
#[path = "../../../../tests/unit/kernel/services/ports/settings.rs"]
mod tests;
