/// Engine constants for the pane graph and the bookkeeping lists around it.
#[derive(Clone, Debug, PartialEq)]
pub struct LayoutConfig {
    pub default_pane_width: f32,
    pub default_pane_height: f32,
    pub min_pane_width: f32,
    pub min_pane_height: f32,
    /// Container size assumed when translating a splitter ratio into pixels.
    pub container_width: f32,
    pub container_height: f32,
    pub min_split_ratio: f32,
    pub max_split_ratio: f32,
    pub max_history: usize,
    pub max_recent_files: usize,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            default_pane_width: 800.0,
            default_pane_height: 600.0,
            min_pane_width: 200.0,
            min_pane_height: 150.0,
            container_width: 1200.0,
            container_height: 800.0,
            min_split_ratio: 0.15,
            max_split_ratio: 0.85,
            max_history: 50,
            max_recent_files: 10,
        }
    }
}

impl LayoutConfig {
    pub fn clamp_ratio(&self, ratio: f32) -> f32 {
        if ratio.is_nan() {
            return 0.5;
        }
        ratio.clamp(self.min_split_ratio, self.max_split_ratio)
    }

    pub fn is_below_min(&self, width: f32, height: f32) -> bool {
        width < self.min_pane_width || height < self.min_pane_height
    }
}

#[cfg(test)]
#[path = "../../../../tests/unit/kernel/services/ports/config.rs"]
mod tests;
