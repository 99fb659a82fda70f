use std::path::{Path, PathBuf};

use crate::kernel::services::ports::WorkbenchSettings;

use super::paths::create_dir;

/// Writes default settings to `path` unless a file is already there.
pub fn ensure_settings_file(path: &Path) -> std::io::Result<PathBuf> {
    if let Some(parent) = path.parent() {
        create_dir(parent)?;
    }
    if !path.exists() {
        let content = serde_json::to_string_pretty(&WorkbenchSettings::default())
            .unwrap_or_else(|_| "{}".to_string());
        std::fs::write(path, content)?;
    }
    Ok(path.to_path_buf())
}

/// Reads settings from `path`. Missing keys take their defaults; an absent
/// or unreadable file yields the defaults outright.
pub fn load_settings(path: &Path) -> WorkbenchSettings {
    let data = match std::fs::read_to_string(path) {
        Ok(data) => data,
        Err(err) => {
            if err.kind() != std::io::ErrorKind::NotFound {
                tracing::warn!(path = %path.display(), error = %err, "settings unreadable");
            }
            return WorkbenchSettings::default();
        }
    };
    match serde_json::from_str(&data) {
        Ok(settings) => settings,
        Err(err) => {
            tracing::warn!(path = %path.display(), error = %err, "settings malformed; using defaults");
            WorkbenchSettings::default()
        }
    }
}

#[cfg(test)]
#[path = "../../../../tests/unit/kernel/services/adapters/settings.rs"]
mod tests;
