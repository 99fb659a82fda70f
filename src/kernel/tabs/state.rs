use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use std::path::{Path, PathBuf};

use crate::kernel::ids::{GroupId, StackId, TabId};

pub const DEFAULT_LANGUAGE: &str = "plaintext";
pub const UNTITLED: &str = "Untitled";

fn default_language() -> String {
    DEFAULT_LANGUAGE.to_string()
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Tab {
    pub id: TabId,
    pub title: String,
    #[serde(default)]
    pub content: String,
    #[serde(default = "default_language")]
    pub language: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub file_path: Option<PathBuf>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub document_id: Option<String>,
    #[serde(default)]
    pub is_dirty: bool,
    #[serde(default)]
    pub is_locked: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub group_id: Option<GroupId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stack_id: Option<StackId>,
    #[serde(default)]
    pub related_tabs: BTreeSet<TabId>,
    #[serde(default)]
    pub last_activated: u64,
    #[serde(default)]
    pub modified_at: u64,
}

impl Tab {
    pub fn new(id: TabId, options: TabOptions, now: u64) -> Self {
        let title = options.title.unwrap_or_else(|| {
            options
                .file_path
                .as_deref()
                .and_then(file_name)
                .unwrap_or_else(|| UNTITLED.to_string())
        });
        Self {
            id,
            title,
            content: options.content,
            language: options.language.unwrap_or_else(default_language),
            file_path: options.file_path,
            document_id: options.document_id,
            is_dirty: false,
            is_locked: false,
            group_id: None,
            color: None,
            stack_id: None,
            related_tabs: BTreeSet::new(),
            last_activated: now,
            modified_at: now,
        }
    }

    pub fn display_title(&self) -> String {
        if self.is_dirty {
            format!("\u{25cf} {}", self.title)
        } else {
            self.title.clone()
        }
    }
}

pub(crate) fn file_name(path: &Path) -> Option<String> {
    path.file_name().map(|s| s.to_string_lossy().to_string())
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct TabOptions {
    pub title: Option<String>,
    pub content: String,
    pub language: Option<String>,
    pub file_path: Option<PathBuf>,
    pub document_id: Option<String>,
}

impl TabOptions {
    pub fn titled(title: impl Into<String>) -> Self {
        Self {
            title: Some(title.into()),
            ..Self::default()
        }
    }

    pub fn for_file(path: impl Into<PathBuf>, content: impl Into<String>) -> Self {
        Self {
            file_path: Some(path.into()),
            content: content.into(),
            ..Self::default()
        }
    }

    pub fn with_content(mut self, content: impl Into<String>) -> Self {
        self.content = content.into();
        self
    }

    pub fn with_language(mut self, language: impl Into<String>) -> Self {
        self.language = Some(language.into());
        self
    }
}

/// Shallow field update; `None` leaves the field untouched.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TabUpdate {
    pub title: Option<String>,
    pub content: Option<String>,
    pub language: Option<String>,
    pub file_path: Option<PathBuf>,
    pub document_id: Option<String>,
    pub color: Option<String>,
}

impl TabUpdate {
    pub fn content(content: impl Into<String>) -> Self {
        Self {
            content: Some(content.into()),
            ..Self::default()
        }
    }

    pub fn title(title: impl Into<String>) -> Self {
        Self {
            title: Some(title.into()),
            ..Self::default()
        }
    }
}

/// Owns every [`Tab`] by id. Iteration follows id (creation) order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TabRegistry {
    tabs: BTreeMap<TabId, Tab>,
}

impl TabRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, id: TabId) -> Option<&Tab> {
        self.tabs.get(&id)
    }

    pub(crate) fn get_mut(&mut self, id: TabId) -> Option<&mut Tab> {
        self.tabs.get_mut(&id)
    }

    pub fn contains(&self, id: TabId) -> bool {
        self.tabs.contains_key(&id)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Tab> {
        self.tabs.values()
    }

    pub fn ids(&self) -> impl Iterator<Item = TabId> + '_ {
        self.tabs.keys().copied()
    }

    pub fn len(&self) -> usize {
        self.tabs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tabs.is_empty()
    }

    pub fn dirty(&self) -> impl Iterator<Item = &Tab> {
        self.tabs.values().filter(|t| t.is_dirty)
    }

    pub fn find_by_path(&self, path: &Path) -> Option<TabId> {
        self.tabs
            .values()
            .find(|t| t.file_path.as_deref() == Some(path))
            .map(|t| t.id)
    }

    pub(crate) fn insert(&mut self, tab: Tab) {
        self.tabs.insert(tab.id, tab);
    }

    pub(crate) fn remove(&mut self, id: TabId) -> Option<Tab> {
        self.tabs.remove(&id)
    }
}
