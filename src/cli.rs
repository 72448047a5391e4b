use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use colored::Colorize;
use std::path::{Path, PathBuf};

use crate::config::CollapseConfig;
use crate::entry::TreeEntry;
use crate::group::GroupedEntry;
use crate::label::{self, LabelStyle};
use crate::listing::{self, SortOrder};
use crate::session::CollapseSession;

#[derive(Parser)]
#[command(name = "furl")]
#[command(version)]
#[command(about = "Preview how long runs of sibling files and folders fold into placeholders")]
#[command(
    long_about = "Furl walks a directory the way a tree view would and folds every \
    long run of same-kind siblings into a single placeholder, keeping anything \
    'open' visible.\n\n\
    Examples:\n  \
    furl tree src                      # Fold runs under src/\n  \
    furl tree . --open src/main.rs     # main.rs and its ancestors stay visible\n  \
    furl tree . --file-threshold 5     # Fold runs of 5+ files\n  \
    furl config --show                 # Show the saved configuration"
)]
pub struct Cli {
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand)]
enum Command {
    /// Print a directory listing with collapsible runs folded
    Tree(TreeArgs),
    /// Show or edit the saved configuration
    Config(ConfigArgs),
}

#[derive(Args)]
struct TreeArgs {
    /// Root directory to list
    #[arg(default_value = ".")]
    path: PathBuf,

    /// How deep to descend into subfolders
    #[arg(long, default_value_t = 3)]
    depth: usize,

    /// Sibling sort order (the grouping adjacency follows it)
    #[arg(long, value_enum, default_value_t = SortOrder::Name)]
    sort: SortOrder,

    /// Treat PATH as open in an editor; it and its ancestors never fold
    #[arg(long = "open", value_name = "PATH")]
    open: Vec<PathBuf>,

    /// Minimum consecutive folders to fold
    #[arg(long)]
    folder_threshold: Option<usize>,

    /// Minimum consecutive files to fold
    #[arg(long)]
    file_threshold: Option<usize>,

    /// Never fold folders
    #[arg(long)]
    no_folders: bool,

    /// Never fold files
    #[arg(long)]
    no_files: bool,

    /// Compact placeholder labels: 'a.txt ... d.txt (4 files)'
    #[arg(long)]
    compact_labels: bool,

    /// Include dotfiles
    #[arg(long)]
    hidden: bool,
}

#[derive(Args)]
struct ConfigArgs {
    /// Print the saved configuration and its location
    #[arg(long)]
    show: bool,

    #[arg(long)]
    folder_threshold: Option<usize>,

    #[arg(long)]
    file_threshold: Option<usize>,

    /// Enable or disable folder folding
    #[arg(long)]
    fold_folders: Option<bool>,

    /// Enable or disable file folding
    #[arg(long)]
    fold_files: Option<bool>,

    /// Use compact placeholder labels
    #[arg(long)]
    compact_labels: Option<bool>,
}

impl Cli {
    pub fn run(self) -> Result<()> {
        match self.command {
            Some(Command::Tree(args)) => run_tree(args),
            Some(Command::Config(args)) => run_config(args),
            None => run_tree(TreeArgs {
                path: PathBuf::from("."),
                depth: 3,
                sort: SortOrder::Name,
                open: Vec::new(),
                folder_threshold: None,
                file_threshold: None,
                no_folders: false,
                no_files: false,
                compact_labels: false,
                hidden: false,
            }),
        }
    }
}

fn run_tree(args: TreeArgs) -> Result<()> {
    let root = args
        .path
        .canonicalize()
        .with_context(|| format!("Cannot open {}", args.path.display()))?;

    let mut config = CollapseConfig::load();
    config.apply_cli_overrides(
        args.folder_threshold,
        args.file_threshold,
        args.no_folders,
        args.no_files,
        args.compact_labels.then_some(true),
    );
    let style = LabelStyle::from_config(&config);

    let open: Vec<PathBuf> = args
        .open
        .iter()
        .map(|p| listing::resolve_open_path(&root, p))
        .collect();
    let session =
        CollapseSession::with_open_paths(config, open.iter().map(PathBuf::as_path));

    println!("{}", root.display().to_string().bold());
    print_level(&session, &root, args.sort, style, args.hidden, args.depth, "")?;
    Ok(())
}

fn print_level(
    session: &CollapseSession,
    dir: &Path,
    sort: SortOrder,
    style: LabelStyle,
    hidden: bool,
    depth: usize,
    indent: &str,
) -> Result<()> {
    if depth == 0 {
        return Ok(());
    }

    let children = listing::list_children(dir, hidden)?;
    let comparator = sort.comparator();
    let grouped = session.group_children(Some(dir), children, Some(&comparator));

    for entry in grouped {
        match entry {
            GroupedEntry::Single(node) if node.is_folder() => {
                println!("{}{}/", indent, node.display_name().blue().bold());
                let child_indent = format!("{}  ", indent);
                print_level(
                    session,
                    node.entry_path(),
                    sort,
                    style,
                    hidden,
                    depth - 1,
                    &child_indent,
                )?;
            }
            GroupedEntry::Single(node) => {
                println!("{}{}", indent, node.display_name());
            }
            GroupedEntry::Collapsed(group) => {
                let text = label::group_label(&group, style);
                println!("{}{} {}", indent, "\u{25b8}".yellow(), text.dimmed());
            }
        }
    }
    Ok(())
}

fn run_config(args: ConfigArgs) -> Result<()> {
    let mut config = CollapseConfig::load();

    let editing = args.folder_threshold.is_some()
        || args.file_threshold.is_some()
        || args.fold_folders.is_some()
        || args.fold_files.is_some()
        || args.compact_labels.is_some();

    if editing {
        if let Some(t) = args.folder_threshold {
            config.folder_threshold = t;
        }
        if let Some(t) = args.file_threshold {
            config.file_threshold = t;
        }
        if let Some(v) = args.fold_folders {
            config.folder_collapse_enabled = v;
        }
        if let Some(v) = args.fold_files {
            config.file_collapse_enabled = v;
        }
        if let Some(v) = args.compact_labels {
            config.compact_labels = v;
        }
        config.normalize();
        config.save()?;
        println!("{}", "Configuration saved".green());
    }

    if args.show || !editing {
        let path = CollapseConfig::config_path()?;
        println!("{} {}", "Config file:".bold(), path.display());
        print!("{}", toml::to_string_pretty(&config)?);
    }
    Ok(())
}
