//! Per-user data locations.
//!
//! - macOS: ~/Library/Application Support/panekit/
//! - Linux: $XDG_DATA_HOME/panekit/ or ~/.local/share/panekit/
//! - Windows: %APPDATA%\panekit\

use std::path::{Path, PathBuf};

const APP_NAME: &str = "panekit";
const STORAGE_DIR: &str = "storage";
const LOG_DIR: &str = "logs";
const SETTINGS_FILE: &str = "settings.json";

pub fn get_app_data_dir() -> Option<PathBuf> {
    #[cfg(target_os = "macos")]
    {
        dirs_path_macos()
    }

    #[cfg(target_os = "linux")]
    {
        dirs_path_linux()
    }

    #[cfg(target_os = "windows")]
    {
        dirs_path_windows()
    }

    #[cfg(not(any(target_os = "macos", target_os = "linux", target_os = "windows")))]
    {
        None
    }
}

#[cfg(target_os = "macos")]
fn dirs_path_macos() -> Option<PathBuf> {
    std::env::var("HOME").ok().map(|home| {
        PathBuf::from(home)
            .join("Library/Application Support")
            .join(APP_NAME)
    })
}

#[cfg(target_os = "linux")]
fn dirs_path_linux() -> Option<PathBuf> {
    if let Ok(xdg) = std::env::var("XDG_DATA_HOME") {
        if !xdg.is_empty() {
            return Some(PathBuf::from(xdg).join(APP_NAME));
        }
    }
    std::env::var("HOME")
        .ok()
        .map(|home| PathBuf::from(home).join(".local/share").join(APP_NAME))
}

#[cfg(target_os = "windows")]
fn dirs_path_windows() -> Option<PathBuf> {
    std::env::var("APPDATA")
        .ok()
        .map(|appdata| PathBuf::from(appdata).join(APP_NAME))
}

/// Directory backing [`super::JsonDirStorage`].
pub fn get_storage_dir() -> Option<PathBuf> {
    get_app_data_dir().map(|p| p.join(STORAGE_DIR))
}

pub fn get_log_dir() -> Option<PathBuf> {
    get_app_data_dir().map(|p| p.join(LOG_DIR))
}

pub fn get_settings_path() -> Option<PathBuf> {
    get_app_data_dir().map(|p| p.join(SETTINGS_FILE))
}

fn ensure_dir(dir: Option<PathBuf>, what: &str) -> std::io::Result<PathBuf> {
    let dir = dir.ok_or_else(|| {
        std::io::Error::new(
            std::io::ErrorKind::NotFound,
            format!("Cannot determine {what} directory"),
        )
    })?;
    create_dir(&dir)?;
    Ok(dir)
}

pub(crate) fn create_dir(dir: &Path) -> std::io::Result<()> {
    if !dir.exists() {
        std::fs::create_dir_all(dir)?;
    }
    Ok(())
}

pub fn ensure_storage_dir() -> std::io::Result<PathBuf> {
    ensure_dir(get_storage_dir(), "storage")
}

pub fn ensure_log_dir() -> std::io::Result<PathBuf> {
    ensure_dir(get_log_dir(), "log")
}

#[cfg(test)]
#[path = "../../../../tests/unit/kernel/services/adapters/paths.rs"]
mod tests;
