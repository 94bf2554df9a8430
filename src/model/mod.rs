mod layer;
mod view;

pub use layer::{LayerNode, LayerType, Params, Shapes};
pub use view::{EdgeType, GraphView, ModelSummary, NodeDetail, ViewEdge, ViewNode};
