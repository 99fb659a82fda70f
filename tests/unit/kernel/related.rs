use super::*;
use crate::kernel::services::ports::{LayoutConfig, WorkbenchSettings};
use crate::kernel::tabs::TabOptions;
use std::path::PathBuf;

fn state_with(paths: &[&str]) -> (WorkbenchState, Vec<TabId>) {
    let mut state =
        WorkbenchState::with_default_layout(LayoutConfig::default(), WorkbenchSettings::default());
    let tabs = paths
        .iter()
        .enumerate()
        .map(|(i, p)| state.create_tab(TabOptions::for_file(PathBuf::from(p), ""), None, i as u64))
        .collect();
    (state, tabs)
}

#[test]
fn link_then_unlink_restores_both_sides() {
    let (mut state, tabs) = state_with(&["/a.rs", "/b.rs"]);
    let before: Vec<_> = tabs
        .iter()
        .map(|t| state.tab(*t).unwrap().related_tabs.clone())
        .collect();

    assert!(state.link_tabs(tabs[0], tabs[1]));
    assert!(state.tab(tabs[1]).unwrap().related_tabs.contains(&tabs[0]));
    assert!(state.unlink_tabs(tabs[0], tabs[1]));

    let after: Vec<_> = tabs
        .iter()
        .map(|t| state.tab(*t).unwrap().related_tabs.clone())
        .collect();
    assert_eq!(before, after);
}

#[test]
fn self_links_and_unknown_ids_are_ignored() {
    let (mut state, tabs) = state_with(&["/a.rs"]);
    assert!(!state.link_tabs(tabs[0], tabs[0]));
    assert!(!state.link_tabs(tabs[0], TabId::new(404)));
    assert!(state.tab(tabs[0]).unwrap().related_tabs.is_empty());
}

#[test]
fn same_base_name_with_other_extension_ranks_first() {
    let (state, tabs) = state_with(&["/src/button.ts", "/src/button.css", "/src/other.ts"]);
    let found = state.find_related_files(Path::new("/src/button.ts"));

    assert_eq!(
        found,
        vec![RelatedFile {
            tab: tabs[1],
            relation: Relation::SameBaseName,
        }]
    );
}

#[test]
fn test_companions_in_the_same_directory() {
    let (state, tabs) = state_with(&["/src/parser.ts", "/src/parser.test.ts", "/lib/parser.spec.ts"]);
    let found = state.find_related_files(Path::new("/src/parser.ts"));

    assert!(found.contains(&RelatedFile {
        tab: tabs[1],
        relation: Relation::TestCompanion,
    }));
    assert!(found.iter().all(|r| r.tab != tabs[0]));
}

#[test]
fn fuzzy_names_within_three_chars() {
    let (state, tabs) = state_with(&["/x/user.rs", "/y/users.rs", "/z/user_service_impl.rs"]);
    let found = state.find_related_files(Path::new("/x/user.rs"));

    assert_eq!(
        found,
        vec![RelatedFile {
            tab: tabs[1],
            relation: Relation::FuzzyName,
        }]
    );
}

#[test]
fn link_related_files_links_every_match() {
    let (mut state, tabs) = state_with(&["/src/app.ts", "/src/app.css", "/src/app.test.ts", "/src/zzz.ts"]);
    assert!(state.link_related_files(tabs[0]));

    let related = &state.tab(tabs[0]).unwrap().related_tabs;
    assert!(related.contains(&tabs[1]));
    assert!(related.contains(&tabs[2]));
    assert!(!related.contains(&tabs[3]));
    assert!(state.check_invariants().is_empty());
}
