//! Symmetric tab links plus a file-name heuristic for finding related tabs.

use std::path::Path;

use super::ids::TabId;
use super::state::WorkbenchState;
use super::tabs::TabRegistry;

/// Why a tab was considered related, strongest first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Relation {
    /// Same base name, different extension (`foo.ts` / `foo.css`).
    SameBaseName,
    /// Test/spec file in the same directory (`foo.ts` / `foo.test.ts`).
    TestCompanion,
    /// One name contains the other and they differ by at most 3 chars.
    FuzzyName,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RelatedFile {
    pub tab: TabId,
    pub relation: Relation,
}

const FUZZY_MAX_LEN_DIFF: usize = 3;

fn base_name(path: &Path) -> Option<String> {
    let name = path.file_name()?.to_string_lossy();
    let base = match name.split_once('.') {
        Some((stem, _)) if !stem.is_empty() => stem,
        _ => name.as_ref(),
    };
    Some(base.to_lowercase())
}

fn full_stem(path: &Path) -> Option<String> {
    path.file_stem().map(|s| s.to_string_lossy().to_lowercase())
}

fn extension(path: &Path) -> Option<String> {
    path.extension().map(|s| s.to_string_lossy().to_lowercase())
}

fn classify(target: &Path, candidate: &Path) -> Option<Relation> {
    let target_base = base_name(target)?;
    let candidate_base = base_name(candidate)?;
    let target_stem = full_stem(target)?;
    let candidate_stem = full_stem(candidate)?;

    if target_stem == candidate_stem && extension(target) != extension(candidate) {
        return Some(Relation::SameBaseName);
    }

    let candidate_name = candidate
        .file_name()
        .map(|s| s.to_string_lossy().to_lowercase())
        .unwrap_or_default();
    let is_test = candidate_name.contains("test") || candidate_name.contains("spec");
    if target.parent() == candidate.parent()
        && is_test
        && (candidate_stem.contains(&target_base) || target_base.contains(&candidate_base))
    {
        return Some(Relation::TestCompanion);
    }

    let contains = target_stem.contains(&candidate_stem) || candidate_stem.contains(&target_stem);
    if contains && target_stem.len().abs_diff(candidate_stem.len()) <= FUZZY_MAX_LEN_DIFF {
        return Some(Relation::FuzzyName);
    }
    None
}

/// Scans the registry in order and reports tabs whose file looks related to `path`.
pub fn find_related_files(tabs: &TabRegistry, path: &Path) -> Vec<RelatedFile> {
    tabs.iter()
        .filter_map(|tab| {
            let candidate = tab.file_path.as_deref()?;
            if candidate == path {
                return None;
            }
            classify(path, candidate).map(|relation| RelatedFile {
                tab: tab.id,
                relation,
            })
        })
        .collect()
}

impl WorkbenchState {
    pub(crate) fn link_tabs(&mut self, a: TabId, b: TabId) -> bool {
        if a == b || !self.tabs.contains(a) || !self.tabs.contains(b) {
            return false;
        }
        let mut changed = false;
        if let Some(tab) = self.tabs.get_mut(a) {
            changed |= tab.related_tabs.insert(b);
        }
        if let Some(tab) = self.tabs.get_mut(b) {
            changed |= tab.related_tabs.insert(a);
        }
        changed
    }

    pub(crate) fn unlink_tabs(&mut self, a: TabId, b: TabId) -> bool {
        let mut changed = false;
        if let Some(tab) = self.tabs.get_mut(a) {
            changed |= tab.related_tabs.remove(&b);
        }
        if let Some(tab) = self.tabs.get_mut(b) {
            changed |= tab.related_tabs.remove(&a);
        }
        changed
    }

    pub fn find_related_files(&self, path: &Path) -> Vec<RelatedFile> {
        find_related_files(&self.tabs, path)
    }

    /// Links `tab` with every tab the name heuristic relates to it.
    pub(crate) fn link_related_files(&mut self, tab: TabId) -> bool {
        let Some(path) = self.tabs.get(tab).and_then(|t| t.file_path.clone()) else {
            return false;
        };
        let mut changed = false;
        for related in find_related_files(&self.tabs, &path) {
            changed |= self.link_tabs(tab, related.tab);
        }
        changed
    }
}

#[cfg(test)]
#[path = "../../tests/unit/kernel/related.rs"]
mod tests;
