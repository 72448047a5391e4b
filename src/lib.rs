//! Furl folds long runs of same-kind siblings in a tree view into single
//! collapsed placeholders.
//!
//! The core is three pieces of state machinery:
//! - [`group`] — the consecutive-run grouping engine, stateless per call;
//! - [`tracker`] — reference-counted protection for open paths and their
//!   ancestors (protected items never fold and always split a run);
//! - [`expansion`] — the per-focus-session memory of which groups the
//!   user has un-collapsed.
//!
//! [`session`] ties them together, one instance per browsed workspace.
//! The remaining modules are host glue: a filesystem [`listing`] adapter
//! and a [`cli`] that previews the folding on a real directory.

pub mod cli;
pub mod config;
pub mod entry;
pub mod expansion;
pub mod group;
pub mod label;
pub mod listing;
pub mod session;
pub mod tracker;
