//! Filesystem adapter for the demo host: materializes one directory's
//! children as [`FsEntry`] nodes and supplies the sort orders a real tree
//! view would offer.

use crate::entry::{ItemKind, TreeEntry};
use anyhow::Result;
use chrono::{DateTime, Utc};
use clap::ValueEnum;
use std::cmp::Ordering;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// One directory entry as the demo host models it.
#[derive(Debug, Clone)]
pub struct FsEntry {
    path: PathBuf,
    kind: ItemKind,
    modified: Option<DateTime<Utc>>,
    /// Lowercased name, computed on materialize; comparators sort on it.
    sort_name: Option<String>,
}

impl FsEntry {
    pub fn new(path: PathBuf, kind: ItemKind) -> Self {
        Self {
            path,
            kind,
            modified: None,
            sort_name: None,
        }
    }

    pub fn from_path(path: &Path) -> Option<Self> {
        let meta = std::fs::metadata(path).ok()?;
        let kind = if meta.is_dir() {
            ItemKind::Folder
        } else {
            ItemKind::File
        };
        let modified = meta.modified().ok().map(DateTime::<Utc>::from);
        Some(Self {
            path: path.to_path_buf(),
            kind,
            modified,
            sort_name: None,
        })
    }

    pub fn is_folder(&self) -> bool {
        self.kind == ItemKind::Folder
    }

    pub fn entry_path(&self) -> &Path {
        &self.path
    }

    pub fn modified(&self) -> Option<DateTime<Utc>> {
        self.modified
    }

    fn sort_name(&self) -> String {
        match &self.sort_name {
            Some(name) => name.clone(),
            None => self.display_name().to_lowercase(),
        }
    }
}

impl TreeEntry for FsEntry {
    fn path(&self) -> Option<&Path> {
        Some(&self.path)
    }

    fn kind(&self) -> Option<ItemKind> {
        Some(self.kind)
    }

    fn materialize(&mut self) {
        if self.sort_name.is_none() {
            self.sort_name = Some(self.display_name().to_lowercase());
        }
    }
}

/// Sort orders offered by the demo CLI, standing in for the host view's
/// user-selectable comparator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum SortOrder {
    /// Folders first, then case-insensitive name.
    Name,
    /// Folders first, then extension, then name.
    Kind,
    /// Folders first, then newest first.
    Time,
}

impl SortOrder {
    pub fn comparator(self) -> impl Fn(&FsEntry, &FsEntry) -> Ordering {
        move |a, b| {
            // Every order keeps folders above files, like most browsers.
            let folders_first = b.is_folder().cmp(&a.is_folder());
            if folders_first != Ordering::Equal {
                return folders_first;
            }
            match self {
                SortOrder::Name => a.sort_name().cmp(&b.sort_name()),
                SortOrder::Kind => {
                    let ext = |e: &FsEntry| {
                        e.entry_path()
                            .extension()
                            .map(|x| x.to_string_lossy().to_lowercase())
                            .unwrap_or_default()
                    };
                    ext(a)
                        .cmp(&ext(b))
                        .then_with(|| a.sort_name().cmp(&b.sort_name()))
                }
                SortOrder::Time => b
                    .modified
                    .cmp(&a.modified)
                    .then_with(|| a.sort_name().cmp(&b.sort_name())),
            }
        }
    }
}

/// Lists the immediate children of `dir`. Unreadable entries are skipped
/// rather than failing the whole listing.
pub fn list_children(dir: &Path, include_hidden: bool) -> Result<Vec<FsEntry>> {
    if !dir.is_dir() {
        anyhow::bail!("Not a directory: {}", dir.display());
    }

    let mut children = Vec::new();
    for entry in WalkDir::new(dir)
        .min_depth(1)
        .max_depth(1)
        .follow_links(false)
        .into_iter()
        .filter_map(|e| e.ok())
    {
        if !include_hidden {
            let hidden = entry
                .file_name()
                .to_string_lossy()
                .starts_with('.');
            if hidden {
                continue;
            }
        }
        let kind = if entry.file_type().is_dir() {
            ItemKind::Folder
        } else {
            ItemKind::File
        };
        let modified = entry
            .metadata()
            .ok()
            .and_then(|m| m.modified().ok())
            .map(DateTime::<Utc>::from);
        children.push(FsEntry {
            path: entry.into_path(),
            kind,
            modified,
            sort_name: None,
        });
    }
    Ok(children)
}

/// Resolves a user-supplied path against the tree root so `--open src/a.rs`
/// matches the absolute paths the listing produces.
pub fn resolve_open_path(root: &Path, path: &Path) -> PathBuf {
    let joined = if path.is_absolute() {
        path.to_path_buf()
    } else {
        root.join(path)
    };
    // Canonicalization can fail for not-yet-existing paths; fall back to
    // the joined form so protection still matches prefix-wise.
    joined.canonicalize().unwrap_or(joined)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn populate(dir: &Path) {
        fs::create_dir(dir.join("beta")).unwrap();
        fs::create_dir(dir.join("alpha")).unwrap();
        fs::write(dir.join("notes.txt"), "n").unwrap();
        fs::write(dir.join("Makefile"), "m").unwrap();
        fs::write(dir.join(".hidden"), "h").unwrap();
    }

    #[test]
    fn lists_immediate_children_without_hidden() {
        let tmp = TempDir::new().unwrap();
        populate(tmp.path());

        let children = list_children(tmp.path(), false).unwrap();
        let mut names: Vec<String> = children.iter().map(|c| c.display_name()).collect();
        names.sort();
        assert_eq!(names, vec!["Makefile", "alpha", "beta", "notes.txt"]);
    }

    #[test]
    fn hidden_entries_included_on_request() {
        let tmp = TempDir::new().unwrap();
        populate(tmp.path());

        let children = list_children(tmp.path(), true).unwrap();
        assert!(children.iter().any(|c| c.display_name() == ".hidden"));
    }

    #[test]
    fn listing_a_file_fails() {
        let tmp = TempDir::new().unwrap();
        let file = tmp.path().join("f.txt");
        fs::write(&file, "x").unwrap();
        assert!(list_children(&file, false).is_err());
    }

    #[test]
    fn name_order_puts_folders_first_case_insensitive() {
        let mut entries = vec![
            FsEntry::new(PathBuf::from("/p/Zeta.txt"), ItemKind::File),
            FsEntry::new(PathBuf::from("/p/beta"), ItemKind::Folder),
            FsEntry::new(PathBuf::from("/p/alpha.txt"), ItemKind::File),
            FsEntry::new(PathBuf::from("/p/Alps"), ItemKind::Folder),
        ];
        let cmp = SortOrder::Name.comparator();
        entries.sort_by(|a, b| cmp(a, b));

        let names: Vec<String> = entries.iter().map(|e| e.display_name()).collect();
        assert_eq!(names, vec!["Alps", "beta", "alpha.txt", "Zeta.txt"]);
    }

    #[test]
    fn kind_order_groups_by_extension() {
        let mut entries = vec![
            FsEntry::new(PathBuf::from("/p/b.txt"), ItemKind::File),
            FsEntry::new(PathBuf::from("/p/a.rs"), ItemKind::File),
            FsEntry::new(PathBuf::from("/p/a.txt"), ItemKind::File),
        ];
        let cmp = SortOrder::Kind.comparator();
        entries.sort_by(|a, b| cmp(a, b));

        let names: Vec<String> = entries.iter().map(|e| e.display_name()).collect();
        assert_eq!(names, vec!["a.rs", "a.txt", "b.txt"]);
    }

    #[test]
    fn resolve_open_path_joins_relative_paths() {
        let tmp = TempDir::new().unwrap();
        fs::write(tmp.path().join("a.txt"), "x").unwrap();

        let resolved = resolve_open_path(tmp.path(), Path::new("a.txt"));
        assert!(resolved.is_absolute());
        assert!(resolved.ends_with("a.txt"));
    }
}
