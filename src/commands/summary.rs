use crate::cli::{ModelArgs, SummaryArgs};
use crate::style;

use super::CommandContext;

pub fn cmd_summary(args: SummaryArgs) -> i32 {
    let model = ModelArgs {
        model: args.model,
        shapes: None,
        fuzzy_shapes: false,
    };
    let ctx = match CommandContext::new(&model, None) {
        Ok(ctx) => ctx,
        Err(code) => return code,
    };

    let summary = ctx.session.summary();
    style::header(&summary.name);
    println!("{}", style::metric("Class", &summary.class));
    println!("{}", style::metric("Parameters", summary.total_parameters));
    println!("{}", style::metric("Layers", summary.total_layers));
    println!("{}", style::metric("Has children", summary.has_children));
    0
}
