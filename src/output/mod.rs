mod json;
mod tree;

pub use json::JsonOutput;
pub use tree::TreeOutput;

use crate::model::GraphView;
use std::io::Write;

pub trait OutputFormatter {
    fn format<W: Write>(&self, view: &GraphView, writer: &mut W) -> std::io::Result<()>;
}

/// Render a view into a string with the given formatter.
pub fn render<F: OutputFormatter>(formatter: &F, view: &GraphView) -> std::io::Result<String> {
    let mut buffer = Vec::new();
    formatter.format(view, &mut buffer)?;
    Ok(String::from_utf8_lossy(&buffer).into_owned())
}
