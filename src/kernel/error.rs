use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::ids::TabId;

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("storage io error on `{key}`: {source}")]
    Io {
        key: String,
        #[source]
        source: std::io::Error,
    },
    #[error("storage value for `{key}` is not valid json: {source}")]
    Json {
        key: String,
        #[source]
        source: serde_json::Error,
    },
    #[error("invalid storage key `{0}`")]
    InvalidKey(String),
    #[error("storage rejected `{key}`: {reason}")]
    Rejected { key: String, reason: String },
}

#[derive(Debug, Error)]
pub enum WorkbenchError {
    #[error(transparent)]
    Storage(#[from] StorageError),
    #[error("session snapshot is corrupt: {0}")]
    Corruption(String),
    #[error("unknown tab {0}")]
    UnknownTab(TabId),
    #[error("failed to save {} tab(s)", failed.len())]
    SaveAll {
        saved: Vec<TabId>,
        failed: Vec<TabId>,
        #[source]
        source: StorageError,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum StateErrorKind {
    Corruption,
    SaveFailure,
    InvalidReference,
}

impl std::fmt::Display for StateErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let label = match self {
            StateErrorKind::Corruption => "corruption",
            StateErrorKind::SaveFailure => "save failure",
            StateErrorKind::InvalidReference => "invalid reference",
        };
        f.write_str(label)
    }
}

/// A problem found while restoring or persisting state, reported rather than thrown.
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize, Deserialize)]
#[error("{kind}: {message}")]
pub struct StateError {
    pub kind: StateErrorKind,
    pub message: String,
}

impl StateError {
    pub fn corruption(message: impl Into<String>) -> Self {
        Self {
            kind: StateErrorKind::Corruption,
            message: message.into(),
        }
    }

    pub fn save_failure(message: impl Into<String>) -> Self {
        Self {
            kind: StateErrorKind::SaveFailure,
            message: message.into(),
        }
    }

    pub fn invalid_reference(message: impl Into<String>) -> Self {
        Self {
            kind: StateErrorKind::InvalidReference,
            message: message.into(),
        }
    }
}
