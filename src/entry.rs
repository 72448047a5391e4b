//! The seam between the grouping engine and the host's tree-node model.
//!
//! The engine never owns tree nodes; it sees each sibling through the
//! [`TreeEntry`] trait and hands nodes back unchanged (individually or
//! inside a collapsed placeholder).

use std::path::Path;

/// Kind of a collapsible tree item.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ItemKind {
    Folder,
    File,
}

impl ItemKind {
    /// Plural display name, used in group keys, labels and tooltips.
    pub fn display_name(&self) -> &'static str {
        match self {
            ItemKind::Folder => "folders",
            ItemKind::File => "files",
        }
    }
}

/// What the engine needs to know about one sibling node.
///
/// Hosts keep their own node types and implement this on them.
pub trait TreeEntry {
    /// Filesystem path of the node, if it represents one.
    fn path(&self) -> Option<&Path>;

    /// `None` marks a structural node the host injected (a synthetic
    /// entry with no file behind it). Structural nodes pass through
    /// grouping untouched and always break the current run.
    fn kind(&self) -> Option<ItemKind>;

    /// Resolve any lazily-computed attributes the host's comparator may
    /// consult. Called on every sibling before sorting; sorting is
    /// undefined on unresolved entries.
    fn materialize(&mut self) {}

    /// Name shown for this entry in labels and tooltips.
    fn display_name(&self) -> String {
        self.path()
            .and_then(|p| p.file_name())
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| "?".to_string())
    }
}
