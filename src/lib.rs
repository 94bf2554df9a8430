pub mod api;
pub mod cli;
pub mod commands;
pub mod config;
pub mod engine;
pub mod fs;
pub mod hierarchy;
pub mod model;
pub mod output;
pub mod server;
pub mod session;
pub mod snapshot;
pub mod style;

pub use api::{ApalysisError, LoadOptions, load_session, load_session_with_fs};
pub use cli::Cli;
pub use commands::{cmd_init, cmd_node, cmd_serve, cmd_summary, cmd_view};
pub use config::Config;
pub use hierarchy::{HierarchyError, HierarchyStore, ModuleRecord, ModuleTree};
pub use model::{EdgeType, GraphView, ModelSummary, NodeDetail, ViewEdge, ViewNode};
pub use session::Session;
