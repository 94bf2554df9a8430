use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "apalysis")]
#[command(about = "Explore neural-network module hierarchies one level at a time")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Launch the interactive visualization server
    Serve(ServeArgs),

    /// Print the visible part of a model's hierarchy
    View(ViewArgs),

    /// Show full details for one module
    Node(NodeArgs),

    /// Print model-level totals
    Summary(SummaryArgs),

    /// Generate a starter .apalysis.toml configuration file
    Init(InitArgs),
}

/// Model document plus optional shape enrichment, shared by every command
/// that loads a model.
#[derive(Parser, Debug, Clone)]
pub struct ModelArgs {
    /// Model document (JSON, flat or nested form)
    pub model: PathBuf,

    /// Companion tensor shape document
    #[arg(long)]
    pub shapes: Option<PathBuf>,

    /// Allow approximate name-based shape matching
    #[arg(long)]
    pub fuzzy_shapes: bool,
}

#[derive(Parser, Debug, Clone)]
pub struct ServeArgs {
    #[command(flatten)]
    pub model: ModelArgs,

    /// Address to bind (defaults to the config value)
    #[arg(long)]
    pub host: Option<String>,

    /// Port for the HTTP server (defaults to the config value)
    #[arg(long)]
    pub port: Option<u16>,

    /// Open browser automatically
    #[arg(long)]
    pub open: bool,

    /// Restore expansion state from this file and keep it updated
    #[arg(long)]
    pub state: Option<PathBuf>,
}

#[derive(Parser, Debug, Clone)]
pub struct ViewArgs {
    #[command(flatten)]
    pub model: ModelArgs,

    /// Node ids to expand, in order (comma-separated)
    #[arg(long, value_delimiter = ',')]
    pub expand: Vec<String>,

    /// Expand every node above this depth
    #[arg(long)]
    pub depth: Option<usize>,

    /// Expand every node
    #[arg(long)]
    pub all: bool,

    /// Restore expansion state from this file before applying other flags
    #[arg(long)]
    pub state: Option<PathBuf>,

    /// Save the resulting expansion state to this file
    #[arg(long)]
    pub save_state: Option<PathBuf>,

    /// Output format
    #[arg(short, long, default_value = "tree")]
    pub format: ViewFormat,

    /// Output file (defaults to stdout)
    #[arg(short, long)]
    pub output: Option<PathBuf>,
}

#[derive(Parser, Debug, Clone)]
pub struct NodeArgs {
    #[command(flatten)]
    pub model: ModelArgs,

    /// Module id, e.g. `net.encoder.0`
    pub id: String,
}

#[derive(Parser, Debug, Clone)]
pub struct SummaryArgs {
    /// Model document (JSON, flat or nested form)
    pub model: PathBuf,
}

#[derive(Parser, Debug, Clone)]
pub struct InitArgs {
    /// Directory where to create .apalysis.toml (defaults to current directory)
    #[arg(default_value = ".")]
    pub path: PathBuf,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, clap::ValueEnum)]
pub enum ViewFormat {
    #[default]
    Tree,
    Json,
}
