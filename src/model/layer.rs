use serde::{Deserialize, Serialize};
use std::fmt;

/// Type-specific layer configuration (e.g. `in_features`, `kernel_size`).
pub type Params = serde_json::Map<String, serde_json::Value>;

/// One tensor shape per input or output, e.g. `[[1, 3, 224, 224]]`.
/// Dynamic dimensions may be reported as `-1` by the tracer.
pub type Shapes = Vec<Vec<i64>>;

/// Coarse category of a layer, used by the frontend for coloring and grouping.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum LayerType {
    Linear,
    Conv,
    Normalization,
    Dropout,
    Activation,
    Pooling,
    Reshape,
    Recurrent,
    Embedding,
    Attention,
    Container,
    Module,
}

impl LayerType {
    pub fn as_str(&self) -> &'static str {
        match self {
            LayerType::Linear => "Linear",
            LayerType::Conv => "Conv",
            LayerType::Normalization => "Normalization",
            LayerType::Dropout => "Dropout",
            LayerType::Activation => "Activation",
            LayerType::Pooling => "Pooling",
            LayerType::Reshape => "Reshape",
            LayerType::Recurrent => "Recurrent",
            LayerType::Embedding => "Embedding",
            LayerType::Attention => "Attention",
            LayerType::Container => "Container",
            LayerType::Module => "Module",
        }
    }
}

impl fmt::Display for LayerType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A node of the module hierarchy. Immutable once the store is built.
#[derive(Debug, Clone, PartialEq)]
pub struct LayerNode {
    /// Dotted path from the root (`model`, `model.encoder.0`).
    pub id: String,
    pub name: String,
    pub label: String,
    pub layer_type: LayerType,
    pub module_class: String,
    /// Parameters owned directly by this module, not by its descendants.
    pub num_parameters: u64,
    pub params: Params,
    /// Child ids in declaration order.
    pub children: Vec<String>,
    pub parent_id: Option<String>,
    pub depth: usize,
    pub input_shape: Option<Shapes>,
    pub output_shape: Option<Shapes>,
}

impl LayerNode {
    pub fn has_children(&self) -> bool {
        !self.children.is_empty()
    }

    pub fn is_root(&self) -> bool {
        self.parent_id.is_none()
    }
}
