use crate::entry::ItemKind;
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;

/// Minimum meaningful collapse threshold; a "run" of one item is not a run.
pub const MIN_THRESHOLD: usize = 2;

/// Grouping configuration, read fresh on every grouping pass.
///
/// There is no caching layer: a settings change takes effect on the next
/// recompute with no invalidation step.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CollapseConfig {
    #[serde(default = "default_enabled")]
    pub folder_collapse_enabled: bool,

    #[serde(default = "default_enabled")]
    pub file_collapse_enabled: bool,

    /// Minimum consecutive folders to collapse.
    #[serde(default = "default_threshold")]
    pub folder_threshold: usize,

    /// Minimum consecutive files to collapse.
    #[serde(default = "default_threshold")]
    pub file_threshold: usize,

    /// Compact labels like `a.txt ... d.txt (4 files)` instead of the
    /// full `a.txt|b.txt|c.txt|d.txt` concatenation. Full labels keep
    /// type-to-navigate search working over every member name.
    #[serde(default)]
    pub compact_labels: bool,
}

impl Default for CollapseConfig {
    fn default() -> Self {
        Self {
            folder_collapse_enabled: default_enabled(),
            file_collapse_enabled: default_enabled(),
            folder_threshold: default_threshold(),
            file_threshold: default_threshold(),
            compact_labels: false,
        }
    }
}

fn default_enabled() -> bool {
    true
}

fn default_threshold() -> usize {
    10
}

impl CollapseConfig {
    /// Effective threshold for one item kind; `None` means collapsing is
    /// disabled for that kind (effectively an infinite threshold).
    pub fn threshold_for(&self, kind: ItemKind) -> Option<usize> {
        match kind {
            ItemKind::Folder => self.folder_collapse_enabled.then_some(self.folder_threshold),
            ItemKind::File => self.file_collapse_enabled.then_some(self.file_threshold),
        }
    }

    /// True iff at least one kind can be collapsed at all.
    pub fn collapsing_enabled(&self) -> bool {
        self.folder_collapse_enabled || self.file_collapse_enabled
    }

    /// Clamp thresholds up to the minimum meaningful value.
    pub fn normalize(&mut self) {
        self.folder_threshold = self.folder_threshold.max(MIN_THRESHOLD);
        self.file_threshold = self.file_threshold.max(MIN_THRESHOLD);
    }

    /// Config file location under the platform config directory.
    pub fn config_path() -> Result<PathBuf> {
        let dirs = directories::ProjectDirs::from("", "", "furl")
            .context("Could not determine config directory")?;
        Ok(dirs.config_dir().join("config.toml"))
    }

    /// Load config from file or return defaults. Parse failures warn and
    /// fall back to defaults rather than erroring out.
    pub fn load() -> Self {
        let mut config = match Self::config_path() {
            Ok(path) if path.exists() => match fs::read_to_string(&path) {
                Ok(content) => match toml::from_str(&content) {
                    Ok(config) => config,
                    Err(e) => {
                        tracing::warn!("Failed to parse config file: {}", e);
                        Self::default()
                    }
                },
                Err(e) => {
                    tracing::warn!("Failed to read config file: {}", e);
                    Self::default()
                }
            },
            _ => Self::default(),
        };
        config.normalize();
        config
    }

    /// Save config to file.
    pub fn save(&self) -> Result<()> {
        let path = Self::config_path()?;

        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).context("Failed to create config directory")?;
        }

        let toml = toml::to_string_pretty(self).context("Failed to serialize config")?;

        fs::write(&path, toml).context("Failed to write config file")?;

        Ok(())
    }

    /// Apply CLI option overrides.
    pub fn apply_cli_overrides(
        &mut self,
        folder_threshold: Option<usize>,
        file_threshold: Option<usize>,
        no_folders: bool,
        no_files: bool,
        compact_labels: Option<bool>,
    ) {
        if let Some(t) = folder_threshold {
            self.folder_threshold = t;
        }
        if let Some(t) = file_threshold {
            self.file_threshold = t;
        }
        if no_folders {
            self.folder_collapse_enabled = false;
        }
        if no_files {
            self.file_collapse_enabled = false;
        }
        if let Some(compact) = compact_labels {
            self.compact_labels = compact;
        }
        self.normalize();
    }
}
