//! Remembers which collapsed groups the user has un-collapsed.
//!
//! The memory is deliberately short-lived: the whole set is dropped when
//! the hosting view loses focus, so stale expansions never accumulate
//! across browsing sessions.

use crate::group::GroupKey;
use std::collections::HashSet;
use tracing::debug;

/// Set of group keys the user has explicitly expanded in the current
/// focus session.
#[derive(Debug, Default)]
pub struct ExpandedGroups {
    keys: HashSet<GroupKey>,
}

impl ExpandedGroups {
    pub fn new() -> Self {
        Self::default()
    }

    /// True iff a run producing exactly `key` should render ungrouped.
    pub fn is_expanded(&self, key: &GroupKey) -> bool {
        self.keys.contains(key)
    }

    pub fn set_expanded(&mut self, key: GroupKey, expanded: bool) {
        if expanded {
            debug!(%key, "group expanded");
            self.keys.insert(key);
        } else {
            debug!(%key, "group collapsed");
            self.keys.remove(&key);
        }
    }

    /// Forgets every expansion. Invoked once per focus-loss event.
    pub fn clear(&mut self) {
        if !self.keys.is_empty() {
            debug!(count = self.keys.len(), "clearing expanded groups");
        }
        self.keys.clear();
    }

    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }
}
