mod materialize;
mod visibility;

pub use materialize::{full_view, initial_view, node_details};
pub use visibility::VisibilityEngine;
