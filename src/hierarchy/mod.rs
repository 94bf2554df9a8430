mod classify;
mod shapes;
mod source;
mod store;

pub use classify::{classify, extract_params, known_layer_type};
pub use shapes::{ApproximateMatch, EnrichmentReport, ShapeEntry, ShapeMap, load_shapes};
pub use source::{ModelDocument, ModuleRecord, ModuleTree, NestedModule, load_model, parse_model};
pub use store::{HierarchyError, HierarchyStore};
