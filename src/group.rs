//! The consecutive-run grouping engine.
//!
//! Given one directory's siblings in host order, replaces every long
//! enough run of same-kind, not-in-use items with a single collapsed
//! placeholder. The engine owns no state: it borrows the open-paths
//! tracker, the expansion store and the configuration for the duration of
//! one call and never mutates any of them.

use crate::config::CollapseConfig;
use crate::entry::{ItemKind, TreeEntry};
use crate::expansion::ExpandedGroups;
use crate::tracker::OpenPathsTracker;
use std::cmp::Ordering;
use std::fmt;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// Host-supplied total order over sibling nodes, reflecting the user's
/// current sort preference (by name, by type, by time, ...). The engine
/// never inspects it; it only applies it.
pub type Comparator<T> = dyn Fn(&T, &T) -> Ordering;

/// Identity of a collapsed run, derived from its endpoints.
///
/// The key survives recomputation only while the run's first and last
/// member (by path) are unchanged; edge edits or a run splitting due to
/// protection changes naturally invalidate it and the new group starts
/// collapsed. This is a deliberate, cheap substitute for tracking group
/// identity across structural edits.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct GroupKey {
    kind: ItemKind,
    first: PathBuf,
    last: PathBuf,
}

impl GroupKey {
    pub fn new(kind: ItemKind, first: &Path, last: &Path) -> Self {
        Self {
            kind,
            first: first.to_path_buf(),
            last: last.to_path_buf(),
        }
    }

    pub fn kind(&self) -> ItemKind {
        self.kind
    }
}

impl fmt::Display for GroupKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}_{}...{}",
            self.kind.display_name(),
            self.first.display(),
            self.last.display()
        )
    }
}

/// One collapsed run: a view object created fresh on every grouping pass,
/// never persisted.
#[derive(Debug)]
pub struct CollapsedGroup<T> {
    key: GroupKey,
    members: Vec<T>,
    kind: ItemKind,
}

impl<T: TreeEntry> CollapsedGroup<T> {
    fn new(kind: ItemKind, members: Vec<T>) -> Option<Self> {
        let first = members.first()?.path()?;
        let last = members.last()?.path()?;
        let key = GroupKey::new(kind, first, last);
        Some(Self { key, members, kind })
    }

    pub fn key(&self) -> &GroupKey {
        &self.key
    }

    pub fn kind(&self) -> ItemKind {
        self.kind
    }

    pub fn members(&self) -> &[T] {
        &self.members
    }

    pub fn len(&self) -> usize {
        self.members.len()
    }

    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    /// The member this placeholder impersonates for ordering purposes.
    ///
    /// A placeholder replaces a run, so it must sort into the position its
    /// first member would occupy. Every attribute an opaque host
    /// comparator may consult is answered with the first member's value;
    /// the comparator cannot be special-cased because the host owns it.
    pub fn representative(&self) -> Option<&T> {
        self.members.first()
    }

    /// True iff `path` is one of the members or lives under a member
    /// folder. Lets hosts answer "which visible node contains this file".
    pub fn contains(&self, path: &Path) -> bool {
        self.members.iter().any(|member| match member.path() {
            Some(member_path) => {
                member_path == path
                    || (member.kind() == Some(ItemKind::Folder) && path.starts_with(member_path))
            }
            None => false,
        })
    }

    pub fn into_members(self) -> Vec<T> {
        self.members
    }
}

/// One slot of the display list: a sibling shown individually, or a
/// placeholder standing in for a collapsed run.
#[derive(Debug)]
pub enum GroupedEntry<T> {
    Single(T),
    Collapsed(CollapsedGroup<T>),
}

impl<T: TreeEntry> GroupedEntry<T> {
    /// The node to consult when ordering this slot among its siblings:
    /// the item itself, or the collapsed run's first member.
    pub fn representative(&self) -> Option<&T> {
        match self {
            GroupedEntry::Single(entry) => Some(entry),
            GroupedEntry::Collapsed(group) => group.representative(),
        }
    }
}

/// Re-sorts a display list with the host comparator, letting collapsed
/// placeholders sort as their first member.
pub fn sort_grouped<T: TreeEntry>(entries: &mut [GroupedEntry<T>], comparator: &Comparator<T>) {
    entries.sort_by(|a, b| match (a.representative(), b.representative()) {
        (Some(a), Some(b)) => comparator(a, b),
        _ => Ordering::Equal,
    });
}

/// Computes the display list for one directory's children.
///
/// `children` need not be pre-sorted; they are materialized and sorted
/// with `comparator` first, because runs are defined by adjacency under
/// the user's current sort order. Without a comparator the engine fails
/// open and returns the children ungrouped in input order: guessing an
/// order could produce non-deterministic grouping.
pub fn group_children<T: TreeEntry>(
    parent: Option<&Path>,
    mut children: Vec<T>,
    comparator: Option<&Comparator<T>>,
    tracker: &OpenPathsTracker,
    expanded: &ExpandedGroups,
    config: &CollapseConfig,
) -> Vec<GroupedEntry<T>> {
    if !config.collapsing_enabled() {
        debug!("collapsing disabled for both kinds, returning children as-is");
        return pass_through(children);
    }

    let comparator = match comparator {
        Some(comparator) => comparator,
        None => {
            warn!("no comparator available, returning children ungrouped");
            return pass_through(children);
        }
    };

    debug!(
        parent = %parent.unwrap_or_else(|| Path::new("?")).display(),
        children = children.len(),
        "grouping pass"
    );

    // Names and other sort inputs may be lazily computed; resolve them
    // before the sort consults them.
    for child in children.iter_mut() {
        child.materialize();
    }
    children.sort_by(|a, b| comparator(a, b));

    let mut result: Vec<GroupedEntry<T>> = Vec::with_capacity(children.len());
    let mut current_run: Vec<T> = Vec::new();
    let mut current_kind: Option<ItemKind> = None;

    for child in children {
        let kind = match child.kind() {
            Some(kind) => kind,
            None => {
                // Structural node: breaks any run and passes through.
                if let Some(run_kind) = current_kind {
                    flush_run(&mut current_run, run_kind, &mut result, expanded, config);
                }
                result.push(GroupedEntry::Single(child));
                current_kind = None;
                continue;
            }
        };

        if current_kind != Some(kind) {
            if let Some(run_kind) = current_kind {
                flush_run(&mut current_run, run_kind, &mut result, expanded, config);
            }
            if can_collapse(&child, tracker) {
                current_run.push(child);
            } else {
                result.push(GroupedEntry::Single(child));
            }
            current_kind = Some(kind);
        } else if can_collapse(&child, tracker) {
            current_run.push(child);
        } else {
            // A protected item always splits the run; each side is tested
            // against the threshold independently.
            flush_run(&mut current_run, kind, &mut result, expanded, config);
            result.push(GroupedEntry::Single(child));
        }
    }

    if let Some(run_kind) = current_kind {
        flush_run(&mut current_run, run_kind, &mut result, expanded, config);
    }

    result
}

/// An item can join a run only when it has a real path and nothing open
/// underneath or at it. Pathless items pass through like protected ones.
fn can_collapse<T: TreeEntry>(entry: &T, tracker: &OpenPathsTracker) -> bool {
    match entry.path() {
        Some(path) => !tracker.is_protected(path),
        None => false,
    }
}

/// Empties the accumulated run into the output: individually when below
/// threshold or explicitly expanded, as one placeholder otherwise.
fn flush_run<T: TreeEntry>(
    run: &mut Vec<T>,
    kind: ItemKind,
    result: &mut Vec<GroupedEntry<T>>,
    expanded: &ExpandedGroups,
    config: &CollapseConfig,
) {
    if run.is_empty() {
        return;
    }

    let members = std::mem::take(run);
    let threshold = config.threshold_for(kind);
    let qualifies = matches!(threshold, Some(t) if members.len() >= t);

    if !qualifies {
        result.extend(members.into_iter().map(GroupedEntry::Single));
        return;
    }

    match CollapsedGroup::new(kind, members) {
        Some(group) if expanded.is_expanded(group.key()) => {
            debug!(key = %group.key(), "group is expanded, emitting members individually");
            result.extend(group.into_members().into_iter().map(GroupedEntry::Single));
        }
        Some(group) => {
            debug!(key = %group.key(), members = group.len(), "collapsing run");
            result.push(GroupedEntry::Collapsed(group));
        }
        // Endpoint had no path; without identity the run cannot collapse.
        None => warn!("run member without a path, emitting run ungrouped"),
    }
}

fn pass_through<T: TreeEntry>(children: Vec<T>) -> Vec<GroupedEntry<T>> {
    children.into_iter().map(GroupedEntry::Single).collect()
}
