use crate::cli::NodeArgs;
use crate::model::NodeDetail;
use crate::style;

use super::CommandContext;

pub fn cmd_node(args: NodeArgs) -> i32 {
    let ctx = match CommandContext::new(&args.model, None) {
        Ok(ctx) => ctx,
        Err(code) => return code,
    };

    let Some(detail) = ctx.session.node_details(&args.id) else {
        style::error(&format!("Node '{}' not found", args.id));
        style::hint("Module ids are dotted paths from the root, e.g. `model.encoder.0`");
        return 1;
    };

    print_detail(&detail);
    0
}

fn print_detail(detail: &NodeDetail) {
    style::header(&detail.id);
    println!("{}", style::metric("Class", &detail.module_class));
    println!("{}", style::metric("Type", detail.layer_type));
    println!("{}", style::metric("Parameters", detail.num_parameters));
    println!("{}", style::metric("Depth", detail.depth));
    if let Some(parent) = &detail.parent_id {
        println!("{}", style::metric("Parent", parent));
    }

    if !detail.params.is_empty() {
        style::section("Params");
        for (key, value) in &detail.params {
            println!("{}", style::metric(key, value));
        }
    }

    if detail.input_shape.is_some() || detail.output_shape.is_some() {
        style::section("Shapes");
        if let Some(shape) = &detail.input_shape {
            println!("{}", style::metric("Input", format!("{:?}", shape)));
        }
        if let Some(shape) = &detail.output_shape {
            println!("{}", style::metric("Output", format!("{:?}", shape)));
        }
    }

    if !detail.children.is_empty() {
        style::section(&format!("Children ({})", detail.child_count));
        for child in &detail.children {
            println!("  {}", child);
        }
    }
}
