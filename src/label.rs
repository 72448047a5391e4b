//! Presentation strings for collapsed-group placeholders.
//!
//! How a placeholder is drawn is the host's business; this module only
//! produces the text metadata every host needs: a label and a tooltip.

use crate::config::CollapseConfig;
use crate::entry::TreeEntry;
use crate::group::CollapsedGroup;

/// Tooltip lists at most this many member names before trailing off.
const TOOLTIP_PREVIEW: usize = 5;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LabelStyle {
    /// All member names joined with `|`. Verbose, but type-to-navigate
    /// search keeps matching every collapsed name.
    Full,
    /// `first ... last (N files)`.
    Compact,
}

impl LabelStyle {
    pub fn from_config(config: &CollapseConfig) -> Self {
        if config.compact_labels {
            LabelStyle::Compact
        } else {
            LabelStyle::Full
        }
    }
}

/// Label shown in place of the collapsed run.
pub fn group_label<T: TreeEntry>(group: &CollapsedGroup<T>, style: LabelStyle) -> String {
    match style {
        LabelStyle::Full => group
            .members()
            .iter()
            .map(|m| m.display_name())
            .collect::<Vec<_>>()
            .join("|"),
        LabelStyle::Compact => {
            let first = group
                .members()
                .first()
                .map(|m| m.display_name())
                .unwrap_or_else(|| "?".to_string());
            let last = group
                .members()
                .last()
                .map(|m| m.display_name())
                .unwrap_or_else(|| "?".to_string());
            format!(
                "{} ... {} ({} {})",
                first,
                last,
                group.len(),
                group.kind().display_name()
            )
        }
    }
}

/// Tooltip enumerating the first few collapsed members.
pub fn group_tooltip<T: TreeEntry>(group: &CollapsedGroup<T>) -> String {
    let mut tooltip = format!("{} collapsed {}:", group.len(), group.kind().display_name());
    for member in group.members().iter().take(TOOLTIP_PREVIEW) {
        tooltip.push_str(" \u{2022} ");
        tooltip.push_str(&member.display_name());
    }
    if group.len() > TOOLTIP_PREVIEW {
        tooltip.push_str("...");
    }
    tooltip
}
