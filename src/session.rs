//! Per-workspace session: owns the two state trackers, the active
//! configuration and the queue of pending recompute requests.
//!
//! One session exists per browsed workspace; it is created explicitly by
//! the host and dropped when the workspace closes. Host events (item
//! opened or closed, focus lost, structure changed, placeholder
//! activated) arrive here, mutate the trackers, and enqueue refresh
//! requests instead of recomputing synchronously — bursts of events (a
//! session restore opening dozens of files at once) coalesce into one
//! recompute when the host drains the queue.

use crate::config::CollapseConfig;
use crate::entry::TreeEntry;
use crate::expansion::ExpandedGroups;
use crate::group::{group_children, Comparator, GroupKey, GroupedEntry};
use crate::tracker::OpenPathsTracker;
use std::path::{Path, PathBuf};
use tracing::debug;

/// What the host should recompute.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RefreshScope {
    /// Every visible parent. Used when protection state changed somewhere
    /// along an ancestor chain or the structure itself changed.
    FromRoot,
    /// One parent's display list, after a placeholder was activated.
    Parent(PathBuf),
}

/// Coalescing queue of pending recompute requests. A root refresh
/// subsumes every per-parent request; duplicate parents collapse into
/// one. Recomputation is idempotent, so dropping duplicates is always
/// safe.
#[derive(Debug, Default)]
struct RefreshQueue {
    from_root: bool,
    parents: Vec<PathBuf>,
}

impl RefreshQueue {
    fn schedule_root(&mut self) {
        self.from_root = true;
        self.parents.clear();
    }

    fn schedule_parent(&mut self, parent: PathBuf) {
        if !self.from_root && !self.parents.contains(&parent) {
            self.parents.push(parent);
        }
    }

    fn drain(&mut self) -> Vec<RefreshScope> {
        if self.from_root {
            self.from_root = false;
            self.parents.clear();
            return vec![RefreshScope::FromRoot];
        }
        self.parents.drain(..).map(RefreshScope::Parent).collect()
    }

    fn is_empty(&self) -> bool {
        !self.from_root && self.parents.is_empty()
    }
}

/// Grouping state for one browsed workspace.
pub struct CollapseSession {
    tracker: OpenPathsTracker,
    expanded: ExpandedGroups,
    config: CollapseConfig,
    refresh: RefreshQueue,
}

impl CollapseSession {
    pub fn new(config: CollapseConfig) -> Self {
        let mut config = config;
        config.normalize();
        Self {
            tracker: OpenPathsTracker::new(),
            expanded: ExpandedGroups::new(),
            config,
            refresh: RefreshQueue::default(),
        }
    }

    /// Creates a session and replays paths that were already open before
    /// the session existed (editors restored at startup). Schedules one
    /// initial refresh iff anything was seeded.
    pub fn with_open_paths<'a, I>(config: CollapseConfig, open: I) -> Self
    where
        I: IntoIterator<Item = &'a Path>,
    {
        let mut session = Self::new(config);
        let mut seeded = false;
        for path in open {
            session.tracker.path_opened(path);
            seeded = true;
        }
        if seeded {
            session.refresh.schedule_root();
        }
        session
    }

    pub fn config(&self) -> &CollapseConfig {
        &self.config
    }

    /// Replaces the active configuration (settings panel "apply"). Takes
    /// effect on the next recompute; the refresh makes that immediate.
    pub fn set_config(&mut self, config: CollapseConfig) {
        self.config = config;
        self.config.normalize();
        self.refresh.schedule_root();
    }

    pub fn tracker(&self) -> &OpenPathsTracker {
        &self.tracker
    }

    pub fn expanded(&self) -> &ExpandedGroups {
        &self.expanded
    }

    /// An item was opened (editor tab) or a folder manually expanded.
    /// Requests a refresh only when some level actually became protected.
    pub fn path_opened(&mut self, path: &Path) {
        if self.tracker.path_opened(path) {
            self.refresh.schedule_root();
        }
    }

    /// Symmetric close/collapse notification.
    pub fn path_closed(&mut self, path: &Path) {
        if self.tracker.path_closed(path) {
            self.refresh.schedule_root();
        }
    }

    /// The hosting view lost focus: forget all expansions so previously
    /// expanded groups fold back together on the next look.
    pub fn focus_lost(&mut self) {
        debug!("view lost focus, dropping expansion state");
        self.expanded.clear();
        self.refresh.schedule_root();
    }

    /// Project structure changed underneath us; endpoints of any run may
    /// have moved, so everything gets recomputed.
    pub fn structure_changed(&mut self) {
        debug!("structure changed, scheduling full refresh");
        self.refresh.schedule_root();
    }

    /// The activation contract for a placeholder: activating it does not
    /// reveal children inline, it marks the key expanded and asks for the
    /// parent to be regrouped. The next grouping pass finds the key and
    /// renders the run as individual items.
    pub fn set_group_expanded(&mut self, parent: Option<&Path>, key: GroupKey, value: bool) {
        self.expanded.set_expanded(key, value);
        match parent {
            Some(parent) => self.refresh.schedule_parent(parent.to_path_buf()),
            None => self.refresh.schedule_root(),
        }
    }

    /// Computes the display list for one parent, borrowing this session's
    /// trackers and configuration for the duration of the call.
    pub fn group_children<T: TreeEntry>(
        &self,
        parent: Option<&Path>,
        children: Vec<T>,
        comparator: Option<&Comparator<T>>,
    ) -> Vec<GroupedEntry<T>> {
        group_children(
            parent,
            children,
            comparator,
            &self.tracker,
            &self.expanded,
            &self.config,
        )
    }

    /// Hands all pending recompute requests to the host. The host decides
    /// when to call this; everything queued in between coalesces.
    pub fn take_refresh_requests(&mut self) -> Vec<RefreshScope> {
        self.refresh.drain()
    }

    pub fn has_pending_refresh(&self) -> bool {
        !self.refresh.is_empty()
    }
}
