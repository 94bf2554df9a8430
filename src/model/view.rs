use super::layer::{LayerNode, LayerType, Params, Shapes};
use serde::{Deserialize, Serialize};

/// The visible part of the hierarchy for one expansion state.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GraphView {
    pub nodes: Vec<ViewNode>,
    pub edges: Vec<ViewEdge>,
}

impl GraphView {
    pub fn contains(&self, id: &str) -> bool {
        self.nodes.iter().any(|n| n.id == id)
    }

    pub fn node_ids(&self) -> Vec<&str> {
        self.nodes.iter().map(|n| n.id.as_str()).collect()
    }
}

/// Snapshot of a layer as it appears in a view.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ViewNode {
    pub id: String,
    pub label: String,
    pub layer_type: LayerType,
    pub module_class: String,
    pub num_parameters: u64,
    pub params: Params,
    pub has_children: bool,
    pub expanded: bool,
    pub depth: usize,
    pub parent_id: Option<String>,
}

impl ViewNode {
    pub fn from_layer(layer: &LayerNode, expanded: bool) -> Self {
        Self {
            id: layer.id.clone(),
            label: layer.label.clone(),
            layer_type: layer.layer_type,
            module_class: layer.module_class.clone(),
            num_parameters: layer.num_parameters,
            params: layer.params.clone(),
            has_children: layer.has_children(),
            expanded,
            depth: layer.depth,
            parent_id: layer.parent_id.clone(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EdgeType {
    /// Parent to child containment.
    Hierarchy,
    /// Previous sibling to next sibling, in declaration order.
    Sequence,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ViewEdge {
    pub source: String,
    pub target: String,
    pub edge_type: EdgeType,
}

impl ViewEdge {
    pub fn hierarchy(parent: &str, child: &str) -> Self {
        Self {
            source: parent.to_string(),
            target: child.to_string(),
            edge_type: EdgeType::Hierarchy,
        }
    }

    pub fn sequence(previous: &str, next: &str) -> Self {
        Self {
            source: previous.to_string(),
            target: next.to_string(),
            edge_type: EdgeType::Sequence,
        }
    }
}

/// Full metadata for one node, available whether or not it is visible.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NodeDetail {
    pub id: String,
    pub name: String,
    pub label: String,
    pub layer_type: LayerType,
    pub module_class: String,
    pub num_parameters: u64,
    pub params: Params,
    pub has_children: bool,
    pub child_count: usize,
    pub children: Vec<String>,
    pub parent_id: Option<String>,
    pub depth: usize,
    pub input_shape: Option<Shapes>,
    pub output_shape: Option<Shapes>,
    pub expanded: bool,
}

impl NodeDetail {
    pub fn from_layer(layer: &LayerNode, expanded: bool) -> Self {
        Self {
            id: layer.id.clone(),
            name: layer.name.clone(),
            label: layer.label.clone(),
            layer_type: layer.layer_type,
            module_class: layer.module_class.clone(),
            num_parameters: layer.num_parameters,
            params: layer.params.clone(),
            has_children: layer.has_children(),
            child_count: layer.children.len(),
            children: layer.children.clone(),
            parent_id: layer.parent_id.clone(),
            depth: layer.depth,
            input_shape: layer.input_shape.clone(),
            output_shape: layer.output_shape.clone(),
            expanded,
        }
    }
}

/// Model-level totals shown in the viewer header.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ModelSummary {
    pub name: String,
    pub class: String,
    pub total_parameters: u64,
    /// Every module except the root.
    pub total_layers: usize,
    pub has_children: bool,
}
