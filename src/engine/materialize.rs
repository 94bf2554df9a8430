//! Turn a hierarchy plus an expansion set into the visible node/edge lists.
//!
//! Both functions are pure: the same inputs always produce the same view,
//! element order included.

use super::visibility::VisibilityEngine;
use crate::hierarchy::HierarchyStore;
use crate::model::{GraphView, LayerNode, NodeDetail, ViewEdge, ViewNode};

/// The root alone, collapsed, with no edges.
pub fn initial_view(store: &HierarchyStore) -> GraphView {
    GraphView {
        nodes: vec![ViewNode::from_layer(store.root(), false)],
        edges: Vec::new(),
    }
}

/// Pre-order walk from the root that only descends into expanded nodes.
///
/// For each expanded node, every child gets a hierarchy edge from the parent
/// and, except the first, a sequence edge from its previous sibling; the
/// child's own subtree follows before the next sibling is processed.
pub fn full_view(store: &HierarchyStore, visibility: &VisibilityEngine) -> GraphView {
    let mut view = GraphView::default();
    visit(store, visibility, store.root(), &mut view);
    view
}

fn visit(
    store: &HierarchyStore,
    visibility: &VisibilityEngine,
    layer: &LayerNode,
    view: &mut GraphView,
) {
    let expanded = visibility.is_expanded(&layer.id);
    view.nodes.push(ViewNode::from_layer(layer, expanded));

    if !expanded {
        return;
    }

    let mut previous: Option<&str> = None;
    for child in store.children(&layer.id) {
        view.edges.push(ViewEdge::hierarchy(&layer.id, &child.id));
        if let Some(prev) = previous {
            view.edges.push(ViewEdge::sequence(prev, &child.id));
        }
        visit(store, visibility, child, view);
        previous = Some(&child.id);
    }
}

/// Full metadata for any known node, visible or not.
pub fn node_details(
    store: &HierarchyStore,
    visibility: &VisibilityEngine,
    id: &str,
) -> Option<NodeDetail> {
    store
        .get(id)
        .map(|layer| NodeDetail::from_layer(layer, visibility.is_expanded(id)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hierarchy::{ModuleRecord, ModuleTree};
    use crate::model::EdgeType;

    fn store() -> HierarchyStore {
        HierarchyStore::build(ModuleTree::new(
            "R",
            vec![
                ModuleRecord::new("R", None, "Net").with_children(["A", "B", "C"]),
                ModuleRecord::new("A", Some("R"), "Block").with_children(["A1", "A2"]),
                ModuleRecord::new("A1", Some("A"), "Linear"),
                ModuleRecord::new("A2", Some("A"), "ReLU"),
                ModuleRecord::new("B", Some("R"), "Linear"),
                ModuleRecord::new("C", Some("R"), "Linear"),
            ],
        ))
        .unwrap()
    }

    fn edges(view: &GraphView) -> Vec<(&str, &str, EdgeType)> {
        view.edges
            .iter()
            .map(|e| (e.source.as_str(), e.target.as_str(), e.edge_type))
            .collect()
    }

    #[test]
    fn test_initial_view_is_root_only() {
        let store = store();
        let view = initial_view(&store);
        assert_eq!(view.node_ids(), vec!["R"]);
        assert!(!view.nodes[0].expanded);
        assert!(view.nodes[0].has_children);
        assert!(view.edges.is_empty());
    }

    #[test]
    fn test_initial_view_ignores_expansion() {
        let store = store();
        let mut visibility = VisibilityEngine::new();
        visibility.expand(&store, "R");
        // The initial view never consults the expansion set
        assert!(!initial_view(&store).nodes[0].expanded);
        assert_eq!(full_view(&store, &visibility).nodes.len(), 4);
    }

    #[test]
    fn test_collapsed_root() {
        let store = store();
        let view = full_view(&store, &VisibilityEngine::new());
        assert_eq!(view, initial_view(&store));
    }

    #[test]
    fn test_preorder_with_interleaved_edges() {
        let store = store();
        let mut visibility = VisibilityEngine::new();
        visibility.expand(&store, "R");
        visibility.expand(&store, "A");

        let view = full_view(&store, &visibility);
        assert_eq!(view.node_ids(), vec!["R", "A", "A1", "A2", "B", "C"]);
        assert_eq!(
            edges(&view),
            vec![
                ("R", "A", EdgeType::Hierarchy),
                ("A", "A1", EdgeType::Hierarchy),
                ("A", "A2", EdgeType::Hierarchy),
                ("A1", "A2", EdgeType::Sequence),
                ("R", "B", EdgeType::Hierarchy),
                ("A", "B", EdgeType::Sequence),
                ("R", "C", EdgeType::Hierarchy),
                ("B", "C", EdgeType::Sequence),
            ]
        );
    }

    #[test]
    fn test_edge_composition() {
        let store = store();
        let mut visibility = VisibilityEngine::new();
        visibility.expand(&store, "R");

        let view = full_view(&store, &visibility);
        let hierarchy = view
            .edges
            .iter()
            .filter(|e| e.edge_type == EdgeType::Hierarchy && e.source == "R")
            .count();
        let sequence = view
            .edges
            .iter()
            .filter(|e| e.edge_type == EdgeType::Sequence)
            .count();
        assert_eq!(hierarchy, 3);
        assert_eq!(sequence, 2);
    }

    #[test]
    fn test_orphaned_expansion_is_inert() {
        let store = store();
        let mut visibility = VisibilityEngine::new();
        visibility.replace(["A", "ghost"]);

        let view = full_view(&store, &visibility);
        assert_eq!(view.node_ids(), vec!["R"]);
        assert!(view.edges.is_empty());
    }

    #[test]
    fn test_expanded_flag_tracks_membership() {
        let store = store();
        let mut visibility = VisibilityEngine::new();
        visibility.expand(&store, "R");

        let view = full_view(&store, &visibility);
        let a = view.nodes.iter().find(|n| n.id == "A").unwrap();
        assert!(!a.expanded);
        assert!(a.has_children);
        let b = view.nodes.iter().find(|n| n.id == "B").unwrap();
        assert!(!b.has_children);
        assert_eq!(b.parent_id.as_deref(), Some("R"));
        assert_eq!(b.depth, 1);
    }

    #[test]
    fn test_node_details_independent_of_visibility() {
        let store = store();
        let visibility = VisibilityEngine::new();

        // A1 is hidden under collapsed ancestors but still has details
        let detail = node_details(&store, &visibility, "A1").unwrap();
        assert_eq!(detail.parent_id.as_deref(), Some("A"));
        assert_eq!(detail.child_count, 0);
        assert!(!detail.expanded);

        let a = node_details(&store, &visibility, "A").unwrap();
        assert_eq!(a.children, vec!["A1", "A2"]);
        assert_eq!(a.child_count, 2);

        assert!(node_details(&store, &visibility, "missing").is_none());
    }
}
