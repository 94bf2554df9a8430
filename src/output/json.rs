use crate::model::GraphView;
use crate::output::OutputFormatter;
use std::io::Write;

/// The view exactly as the HTTP API returns it.
#[derive(Debug, Default, Clone, Copy)]
pub struct JsonOutput;

impl JsonOutput {
    pub fn new() -> Self {
        Self
    }
}

impl OutputFormatter for JsonOutput {
    fn format<W: Write>(&self, view: &GraphView, writer: &mut W) -> std::io::Result<()> {
        let json = serde_json::to_string_pretty(view).map_err(std::io::Error::other)?;
        writeln!(writer, "{}", json)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::output::render;

    #[test]
    fn test_empty_view_shape() {
        let rendered = render(&JsonOutput::new(), &GraphView::default()).unwrap();
        let value: serde_json::Value = serde_json::from_str(&rendered).unwrap();
        assert_eq!(value, serde_json::json!({ "nodes": [], "edges": [] }));
    }
}
