//! End-to-end grouping behavior against a real directory tree.

use furl::config::CollapseConfig;
use furl::group::{GroupKey, GroupedEntry};
use furl::listing::{self, FsEntry, SortOrder};
use furl::session::{CollapseSession, RefreshScope};
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// 12 folders `f01..f12` and 12 files `x01..x12` under one parent.
fn mixed_tree() -> (TempDir, PathBuf) {
    let tmp = TempDir::new().unwrap();
    let root = tmp.path().canonicalize().unwrap();
    for i in 1..=12 {
        fs::create_dir(root.join(format!("f{:02}", i))).unwrap();
        fs::write(root.join(format!("x{:02}", i)), "x").unwrap();
    }
    (tmp, root)
}

fn config(folder_threshold: usize, file_threshold: usize) -> CollapseConfig {
    CollapseConfig {
        folder_threshold,
        file_threshold,
        ..CollapseConfig::default()
    }
}

fn regroup(session: &CollapseSession, root: &Path) -> Vec<GroupedEntry<FsEntry>> {
    let children = listing::list_children(root, false).unwrap();
    let comparator = SortOrder::Name.comparator();
    session.group_children(Some(root), children, Some(&comparator))
}

fn shape(entries: &[GroupedEntry<FsEntry>]) -> Vec<String> {
    entries
        .iter()
        .map(|entry| match entry {
            GroupedEntry::Single(node) => furl::entry::TreeEntry::display_name(node),
            GroupedEntry::Collapsed(group) => {
                format!("[{} {}]", group.len(), group.kind().display_name())
            }
        })
        .collect()
}

fn first_group_key(entries: &[GroupedEntry<FsEntry>]) -> GroupKey {
    entries
        .iter()
        .find_map(|entry| match entry {
            GroupedEntry::Collapsed(group) => Some(group.key().clone()),
            GroupedEntry::Single(_) => None,
        })
        .expect("expected a collapsed group")
}

#[test]
fn mixed_kinds_collapse_into_one_group_per_kind() {
    let (_tmp, root) = mixed_tree();
    let session = CollapseSession::new(config(10, 10));

    let result = regroup(&session, &root);
    assert_eq!(shape(&result), vec!["[12 folders]", "[12 files]"]);
}

#[test]
fn opening_an_item_mid_run_repartitions_both_sides() {
    let (_tmp, root) = mixed_tree();
    let mut session = CollapseSession::new(config(4, 4));

    session.path_opened(&root.join("f05"));
    let result = regroup(&session, &root);
    assert_eq!(
        shape(&result),
        vec!["[4 folders]", "f05", "[7 folders]", "[12 files]"]
    );
}

#[test]
fn split_sides_below_threshold_fall_open() {
    let (_tmp, root) = mixed_tree();
    let mut session = CollapseSession::new(config(10, 10));

    // Both folder sub-runs (4 and 7) now miss the threshold of 10 and
    // render individually; the file run is untouched.
    session.path_opened(&root.join("f05"));
    let result = regroup(&session, &root);

    let expected: Vec<String> = (1..=12)
        .map(|i| format!("f{:02}", i))
        .chain(std::iter::once("[12 files]".to_string()))
        .collect();
    assert_eq!(shape(&result), expected);
}

#[test]
fn closing_the_item_restores_the_single_group() {
    let (_tmp, root) = mixed_tree();
    let mut session = CollapseSession::new(config(10, 10));

    session.path_opened(&root.join("f05"));
    session.path_closed(&root.join("f05"));
    let result = regroup(&session, &root);
    assert_eq!(shape(&result), vec!["[12 folders]", "[12 files]"]);
}

#[test]
fn threshold_boundary_exactly_t_collapses_t_minus_one_does_not() {
    let tmp = TempDir::new().unwrap();
    let root = tmp.path().canonicalize().unwrap();
    for i in 0..9 {
        fs::write(root.join(format!("file{}.txt", i)), "x").unwrap();
    }

    let session = CollapseSession::new(config(10, 10));
    assert_eq!(regroup(&session, &root).len(), 9);

    fs::write(root.join("file9.txt"), "x").unwrap();
    let result = regroup(&session, &root);
    assert_eq!(shape(&result), vec!["[10 files]"]);
}

#[test]
fn expand_round_trip_and_focus_loss() {
    let (_tmp, root) = mixed_tree();
    let mut session = CollapseSession::new(config(10, 10));

    let collapsed = regroup(&session, &root);
    let key = first_group_key(&collapsed);

    // Activating the placeholder marks the key expanded and requests a
    // recompute of the parent; the next pass renders the run flat.
    session.set_group_expanded(Some(&root), key.clone(), true);
    assert_eq!(
        session.take_refresh_requests(),
        vec![RefreshScope::Parent(root.clone())]
    );
    let expanded = regroup(&session, &root);
    assert_eq!(expanded.len(), 13); // 12 folders + 1 file group

    // Focus loss forgets the expansion; the same run folds again.
    session.focus_lost();
    let refolded = regroup(&session, &root);
    assert_eq!(shape(&refolded), vec!["[12 folders]", "[12 files]"]);
}

#[test]
fn group_keys_are_stable_across_identical_passes() {
    let (_tmp, root) = mixed_tree();
    let session = CollapseSession::new(config(10, 10));

    let first = first_group_key(&regroup(&session, &root));
    let second = first_group_key(&regroup(&session, &root));
    assert_eq!(first, second);
}

#[test]
fn adding_an_edge_member_invalidates_the_expansion() {
    let (_tmp, root) = mixed_tree();
    let mut session = CollapseSession::new(config(10, 10));

    let key = first_group_key(&regroup(&session, &root));
    session.set_group_expanded(Some(&root), key, true);
    assert_eq!(regroup(&session, &root).len(), 13);

    // A new folder sorting before f01 moves the run's first endpoint;
    // the old key no longer matches and the bigger run starts collapsed.
    fs::create_dir(root.join("f00")).unwrap();
    let result = regroup(&session, &root);
    assert_eq!(shape(&result), vec!["[13 folders]", "[12 files]"]);
}

#[test]
fn two_opens_under_a_folder_keep_it_protected_until_both_close() {
    let tmp = TempDir::new().unwrap();
    let root = tmp.path().canonicalize().unwrap();
    let sub = root.join("sub");
    fs::create_dir(&sub).unwrap();
    for i in 0..3 {
        fs::create_dir(root.join(format!("d{}", i))).unwrap();
    }
    fs::write(sub.join("a.txt"), "a").unwrap();
    fs::write(sub.join("b.txt"), "b").unwrap();

    let mut session = CollapseSession::new(config(4, 4));
    session.path_opened(&sub.join("a.txt"));
    session.path_opened(&sub.join("b.txt"));

    session.path_closed(&sub.join("a.txt"));
    assert!(session.tracker().is_protected(&sub));
    // The protected folder splits what would otherwise be a run of 4.
    let result = regroup(&session, &root);
    assert!(result
        .iter()
        .all(|entry| matches!(entry, GroupedEntry::Single(_))));

    session.path_closed(&sub.join("b.txt"));
    assert!(!session.tracker().is_protected(&sub));
    let result = regroup(&session, &root);
    assert_eq!(shape(&result), vec!["[4 folders]"]);
}

#[test]
fn settings_change_applies_on_next_pass_without_invalidation() {
    let (_tmp, root) = mixed_tree();
    let mut session = CollapseSession::new(config(10, 10));
    assert_eq!(regroup(&session, &root).len(), 2);

    let mut tighter = config(10, 10);
    tighter.file_collapse_enabled = false;
    session.set_config(tighter);

    let result = regroup(&session, &root);
    assert_eq!(result.len(), 13); // folder group + 12 flat files
}
