use crate::model::{EdgeType, GraphView, ViewNode};
use crate::output::OutputFormatter;
use std::collections::HashMap;
use std::io::Write;

/// ASCII tree of the visible nodes, one line per node.
///
/// Collapsed nodes that have children are marked with `[+]`, expanded ones
/// with `[-]`. Parameter counts are shown when non-zero.
#[derive(Debug, Default, Clone, Copy)]
pub struct TreeOutput;

impl TreeOutput {
    pub fn new() -> Self {
        Self
    }
}

impl OutputFormatter for TreeOutput {
    fn format<W: Write>(&self, view: &GraphView, writer: &mut W) -> std::io::Result<()> {
        let Some(root) = view.nodes.first() else {
            return Ok(());
        };

        let nodes: HashMap<&str, &ViewNode> =
            view.nodes.iter().map(|n| (n.id.as_str(), n)).collect();
        let mut children: HashMap<&str, Vec<&ViewNode>> = HashMap::new();
        for edge in view
            .edges
            .iter()
            .filter(|e| e.edge_type == EdgeType::Hierarchy)
        {
            if let Some(child) = nodes.get(edge.target.as_str()) {
                children.entry(edge.source.as_str()).or_default().push(child);
            }
        }

        let mut output = String::new();
        format_tree(root, &children, "", true, true, &mut output);
        write!(writer, "{}", output)
    }
}

fn format_tree(
    node: &ViewNode,
    children: &HashMap<&str, Vec<&ViewNode>>,
    prefix: &str,
    is_last: bool,
    is_root: bool,
    output: &mut String,
) {
    if is_root {
        output.push_str(&format!("{}\n", node_line(node)));
    } else {
        let connector = if is_last { "└── " } else { "├── " };
        output.push_str(&format!("{}{}{}\n", prefix, connector, node_line(node)));
    }

    let child_prefix = if is_root {
        String::new()
    } else if is_last {
        format!("{}    ", prefix)
    } else {
        format!("{}│   ", prefix)
    };

    let Some(kids) = children.get(node.id.as_str()) else {
        return;
    };
    for (i, child) in kids.iter().enumerate() {
        format_tree(
            child,
            children,
            &child_prefix,
            i == kids.len() - 1,
            false,
            output,
        );
    }
}

fn node_line(node: &ViewNode) -> String {
    let marker = match (node.has_children, node.expanded) {
        (false, _) => "",
        (true, true) => "[-] ",
        (true, false) => "[+] ",
    };
    let mut line = format!("{}{} ({})", marker, node.label, node.layer_type);
    if node.num_parameters > 0 {
        line.push_str(&format!(" {} params", node.num_parameters));
    }
    line
}
