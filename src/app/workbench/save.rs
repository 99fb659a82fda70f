use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use super::Workbench;
use crate::kernel::services::ports::set_json;
use crate::kernel::{Action, StorageError, Tab, TabId, WorkbenchError};

pub const DOCUMENT_PREFIX: &str = "document:";

/// Storage key of an explicit save: file path, else document id, else tab id.
pub fn document_key(tab: &Tab) -> String {
    match (&tab.file_path, &tab.document_id) {
        (Some(path), _) => format!("{DOCUMENT_PREFIX}{}", path.display()),
        (None, Some(document)) => format!("{DOCUMENT_PREFIX}{document}"),
        (None, None) => format!("{DOCUMENT_PREFIX}{}", tab.id),
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DocumentRecord {
    pub title: String,
    pub content: String,
    pub language: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub file_path: Option<PathBuf>,
    pub saved_at: u64,
}

impl DocumentRecord {
    fn capture(tab: &Tab, saved_at: u64) -> Self {
        Self {
            title: tab.title.clone(),
            content: tab.content.clone(),
            language: tab.language.clone(),
            file_path: tab.file_path.clone(),
            saved_at,
        }
    }
}

impl Workbench {
    /// Persists `tab` under its document key and marks it clean. Storage
    /// errors reach the caller; the tab then stays dirty.
    pub async fn save_file(&mut self, tab: TabId) -> Result<(), WorkbenchError> {
        let Some(tab) = self.state().tab(tab).cloned() else {
            return Err(WorkbenchError::UnknownTab(tab));
        };
        self.autosave.cancel(tab.id);

        let record = DocumentRecord::capture(&tab, (self.clock)());
        if let Err(err) = set_json(&*self.storage, &document_key(&tab), &record).await {
            tracing::warn!(tab = %tab.id, error = %err, "save failed");
            return Err(err.into());
        }
        self.dispatch(Action::MarkSaved {
            tab: tab.id,
            modified_at: tab.modified_at,
        });
        if let Err(err) = self.autosave.discard(tab.id).await {
            tracing::debug!(tab = %tab.id, error = %err, "stale auto-save entry kept");
        }
        tracing::info!(tab = %tab.id, "saved");
        Ok(())
    }

    /// Saves every dirty tab in order and returns the saved ids. Keeps going
    /// past failures and reports them together with the first error.
    pub async fn save_all_files(&mut self) -> Result<Vec<TabId>, WorkbenchError> {
        let dirty: Vec<TabId> = self.state().tabs().dirty().map(|t| t.id).collect();
        let mut saved = Vec::new();
        let mut failed = Vec::new();
        let mut first_error = None;
        for tab in dirty {
            match self.save_file(tab).await {
                Ok(()) => saved.push(tab),
                Err(err) => {
                    failed.push(tab);
                    let source = match err {
                        WorkbenchError::Storage(source) => source,
                        other => StorageError::Rejected {
                            key: tab.to_string(),
                            reason: other.to_string(),
                        },
                    };
                    first_error.get_or_insert(source);
                }
            }
        }
        match first_error {
            None => Ok(saved),
            Some(source) => Err(WorkbenchError::SaveAll {
                saved,
                failed,
                source,
            }),
        }
    }
}
