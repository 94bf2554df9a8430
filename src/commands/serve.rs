use crate::cli::ServeArgs;
use crate::server::{AppState, ServeOptions};
use crate::style;
use std::sync::Arc;

use super::CommandContext;

pub fn cmd_serve(args: ServeArgs) -> i32 {
    let ctx = match CommandContext::new(&args.model, args.state.clone()) {
        Ok(ctx) => ctx,
        Err(code) => return code,
    };

    let options = ServeOptions {
        host: args.host.unwrap_or(ctx.config.server.host),
        port: args.port.unwrap_or(ctx.config.server.port),
        open_browser: args.open || ctx.config.server.open_browser,
    };
    let state = Arc::new(AppState::new(ctx.session).with_state_path(args.state));

    let rt = match tokio::runtime::Runtime::new() {
        Ok(rt) => rt,
        Err(e) => {
            style::error(&format!("Failed to start async runtime: {}", e));
            return 1;
        }
    };

    if let Err(e) = rt.block_on(crate::server::serve(state, options)) {
        style::error(&format!("Server failed: {}", e));
        return 1;
    }

    0
}
