use crate::layout::Direction;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "codecanvas")]
#[command(about = "Visualize the import graph of a GitHub repository")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Analyze a repository and emit its dependency graph
    Analyze(AnalyzeArgs),

    /// Show a repository's file hierarchy as a graph
    Tree(TreeArgs),

    /// Inspect or clear cached snapshots
    Cache(CacheArgs),

    /// Generate a starter .codecanvas.toml configuration file
    Init(InitArgs),
}

#[derive(Parser, Debug, Clone)]
pub struct AnalyzeArgs {
    /// Repository, as owner/repo or a github.com URL
    pub repo: String,

    /// Output format
    #[arg(short, long, default_value = "markdown")]
    pub format: OutputFormat,

    /// Output file (defaults to stdout)
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Layout direction for the dependency graph
    #[arg(short, long, default_value = "top-down")]
    pub direction: LayoutDirection,

    /// Skip the snapshot cache for this run
    #[arg(long)]
    pub no_cache: bool,
}

#[derive(Parser, Debug, Clone)]
pub struct TreeArgs {
    /// Repository, as owner/repo or a github.com URL
    pub repo: String,

    /// Output format
    #[arg(short, long, default_value = "markdown")]
    pub format: OutputFormat,

    /// Output file (defaults to stdout)
    #[arg(short, long)]
    pub output: Option<PathBuf>,
}

#[derive(Parser, Debug, Clone)]
pub struct CacheArgs {
    #[command(subcommand)]
    pub action: CacheAction,
}

#[derive(Subcommand, Debug, Clone)]
pub enum CacheAction {
    /// Show how many snapshots are stored and how many are stale
    Stats,
    /// Delete all cached snapshots
    Clear,
}

#[derive(Parser, Debug, Clone)]
pub struct InitArgs {
    /// Path where to create .codecanvas.toml (defaults to current directory)
    #[arg(default_value = ".")]
    pub path: PathBuf,
}

#[derive(Debug, Clone, Copy, Default, clap::ValueEnum)]
pub enum OutputFormat {
    #[default]
    Markdown,
    Json,
}

#[derive(Debug, Clone, Copy, Default, clap::ValueEnum)]
pub enum LayoutDirection {
    /// Ranks grow downward
    #[default]
    TopDown,
    /// Ranks grow rightward
    LeftRight,
}

impl From<LayoutDirection> for Direction {
    fn from(value: LayoutDirection) -> Self {
        match value {
            LayoutDirection::TopDown => Direction::TopToBottom,
            LayoutDirection::LeftRight => Direction::LeftToRight,
        }
    }
}
