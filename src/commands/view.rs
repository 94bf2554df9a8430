use crate::cli::{ViewArgs, ViewFormat};
use crate::fs::{FileSystem, default_fs};
use crate::output::{JsonOutput, TreeOutput, render};
use crate::session::Session;
use crate::snapshot::save_snapshot;
use crate::style;

use super::CommandContext;

pub fn cmd_view(args: ViewArgs) -> i32 {
    cmd_view_with_fs(args, default_fs())
}

pub fn cmd_view_with_fs(args: ViewArgs, fs: &dyn FileSystem) -> i32 {
    let mut ctx = match CommandContext::with_fs(&args.model, args.state.clone(), fs) {
        Ok(ctx) => ctx,
        Err(code) => return code,
    };

    for skipped in apply_expansion(&mut ctx.session, &args) {
        style::warning(&skipped);
    }

    let view = ctx.session.full_view();
    let rendered = match args.format {
        ViewFormat::Tree => render(&TreeOutput::new(), &view),
        ViewFormat::Json => render(&JsonOutput::new(), &view),
    };
    let rendered = match rendered {
        Ok(text) => text,
        Err(e) => {
            style::error(&format!("Failed to render view: {}", e));
            return 1;
        }
    };

    match &args.output {
        Some(path) => {
            if let Err(e) = fs.write(path, &rendered) {
                style::error(&format!("Could not write output file: {}", e));
                return 1;
            }
            style::success(&format!("View written to {}", style::path(path)));
        }
        None => print!("{}", rendered),
    }

    if let Some(path) = &args.save_state {
        if let Err(e) = save_snapshot(fs, &ctx.session.snapshot(), path) {
            style::error(&format!("Failed to save expansion state: {}", e));
            return 1;
        }
        style::success(&format!("Expansion state saved to {}", style::path(path)));
    }

    0
}

/// Apply `--all`, `--depth` and `--expand` on top of any restored state.
/// Returns a message for every `--expand` id that was skipped.
fn apply_expansion(session: &mut Session, args: &ViewArgs) -> Vec<String> {
    if args.all {
        session.expand_all();
    } else if let Some(depth) = args.depth {
        session.expand_to_depth(depth);
    }

    let mut skipped = Vec::new();
    for id in &args.expand {
        match session.store().get(id).map(|layer| layer.has_children()) {
            None => skipped.push(format!("Unknown node id: {}", id)),
            Some(false) => skipped.push(format!("{} has no children to expand", id)),
            Some(true) => {
                session.expand(id);
            }
        }
    }
    skipped
}
