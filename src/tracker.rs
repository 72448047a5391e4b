//! Tracks which paths are "in use" and therefore exempt from collapsing.
//!
//! A path is protected while it is open (in an editor, or manually
//! expanded in the tree) or while it is an ancestor of something open.
//! Counts are reference counts, not booleans: opening two files under the
//! same folder and closing one must leave the folder protected.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Reference-counted set of open paths and their ancestors.
#[derive(Debug, Default)]
pub struct OpenPathsTracker {
    open_counts: HashMap<PathBuf, u32>,
}

impl OpenPathsTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records `path` as opened: its count and the count of every
    /// ancestor up to the root is incremented.
    ///
    /// Returns true iff at least one count transitioned 0→1, i.e. some
    /// level of the tree became protected and the view showing it needs a
    /// recompute. Opening a second file under an already-protected folder
    /// returns false for that folder's levels; redundant refreshes are
    /// suppressed by the caller checking this flag.
    pub fn path_opened(&mut self, path: &Path) -> bool {
        debug!(path = %path.display(), "path opened");
        let mut became_protected = false;
        self.ascend(path, |counts, level| {
            let count = counts.entry(level.to_path_buf()).or_insert(0);
            *count += 1;
            if *count == 1 {
                became_protected = true;
            }
        });
        became_protected
    }

    /// Records `path` as closed: symmetric decrement, purging entries
    /// that reach zero.
    ///
    /// Returns true iff at least one count transitioned 1→0. Closing a
    /// path that was never opened is a tolerated no-op; counts never go
    /// negative.
    pub fn path_closed(&mut self, path: &Path) -> bool {
        debug!(path = %path.display(), "path closed");
        // An unmatched close must not eat counts that ancestors hold on
        // behalf of other open paths, so bail before ascending.
        if !self.open_counts.contains_key(path) {
            return false;
        }
        let mut became_unprotected = false;
        self.ascend(path, |counts, level| {
            match counts.get_mut(level) {
                Some(count) if *count <= 1 => {
                    counts.remove(level);
                    became_unprotected = true;
                }
                Some(count) => *count -= 1,
                // Unmatched close, nothing to do.
                None => {}
            }
        });
        became_unprotected
    }

    /// True iff `path` is open or an ancestor of something open.
    pub fn is_protected(&self, path: &Path) -> bool {
        self.open_counts.contains_key(path)
    }

    /// Number of distinct protected paths (all levels counted).
    pub fn len(&self) -> usize {
        self.open_counts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.open_counts.is_empty()
    }

    /// Applies `update` at `path` and at every ancestor, walking up until
    /// the root. This ascent is what makes "any ancestor of an open item"
    /// protected, not just the open item itself.
    fn ascend<F>(&mut self, path: &Path, mut update: F)
    where
        F: FnMut(&mut HashMap<PathBuf, u32>, &Path),
    {
        for level in path.ancestors() {
            if level.as_os_str().is_empty() {
                continue;
            }
            update(&mut self.open_counts, level);
        }
    }
}
