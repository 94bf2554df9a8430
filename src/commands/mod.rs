mod init;
mod node;
mod serve;
mod summary;
mod view;

pub use init::cmd_init;
pub use node::cmd_node;
pub use serve::cmd_serve;
pub use summary::cmd_summary;
pub use view::cmd_view;

use crate::api::{LoadOptions, load_session_with_fs};
use crate::cli::ModelArgs;
use crate::config::Config;
use crate::fs::{FileSystem, default_fs};
use crate::session::Session;
use crate::style;
use std::path::{Path, PathBuf};

/// Shared context for command execution: the loaded config and a session over
/// the requested model.
pub struct CommandContext {
    pub config: Config,
    pub session: Session,
}

impl CommandContext {
    /// Load config from the working directory and the model named by `args`.
    /// Returns Err(exit_code) if setup fails.
    pub fn new(args: &ModelArgs, state: Option<PathBuf>) -> Result<Self, i32> {
        Self::with_fs(args, state, default_fs())
    }

    /// Like [`CommandContext::new`], reading the model, shapes and saved
    /// state through `fs`.
    pub fn with_fs(
        args: &ModelArgs,
        state: Option<PathBuf>,
        fs: &dyn FileSystem,
    ) -> Result<Self, i32> {
        let config = Config::load(Path::new(".")).unwrap_or_else(|e| {
            style::warning(&format!("Failed to load config: {}. Using defaults.", e));
            Config::default()
        });

        let mut options = LoadOptions::from_config(&config);
        options.shapes = args.shapes.clone();
        options.fuzzy_shapes |= args.fuzzy_shapes;
        options.state = state;

        let session = match load_session_with_fs(fs, &args.model, options) {
            Ok(session) => session,
            Err(e) => {
                style::error(&format!("Could not load {}: {}", style::path(&args.model), e));
                return Err(1);
            }
        };

        Ok(Self { config, session })
    }
}
