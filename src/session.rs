//! A visualization session: one loaded model plus its expansion state.

use crate::engine::{self, VisibilityEngine};
use crate::hierarchy::HierarchyStore;
use crate::model::{GraphView, ModelSummary, NodeDetail};
use crate::snapshot::ExpansionSnapshot;

/// Owns the hierarchy of one model and the expansion state the user built on
/// top of it.
///
/// The store is never mutated once the session exists. The materialized full
/// view is cached and recomputed after every mutation, so reads are a clone.
/// Sessions have no internal locking; callers sharing one across tasks must
/// serialize mutations.
#[derive(Debug, Clone)]
pub struct Session {
    store: HierarchyStore,
    visibility: VisibilityEngine,
    view: GraphView,
}

impl Session {
    pub fn new(store: HierarchyStore) -> Self {
        let visibility = VisibilityEngine::new();
        let view = engine::full_view(&store, &visibility);
        Self {
            store,
            visibility,
            view,
        }
    }

    pub fn store(&self) -> &HierarchyStore {
        &self.store
    }

    pub fn name(&self) -> &str {
        self.store.name()
    }

    pub fn summary(&self) -> ModelSummary {
        self.store.summary()
    }

    pub fn initial_view(&self) -> GraphView {
        engine::initial_view(&self.store)
    }

    pub fn full_view(&self) -> GraphView {
        self.view.clone()
    }

    pub fn expand(&mut self, id: &str) -> GraphView {
        if self.visibility.expand(&self.store, id) {
            self.refresh();
        }
        self.full_view()
    }

    pub fn collapse(&mut self, id: &str) -> GraphView {
        if self.visibility.collapse(&self.store, id) {
            self.refresh();
        }
        self.full_view()
    }

    pub fn toggle(&mut self, id: &str) -> GraphView {
        if self.visibility.toggle(&self.store, id) {
            self.refresh();
        }
        self.full_view()
    }

    /// Expand every node with children above `depth`, keeping existing flags.
    pub fn expand_to_depth(&mut self, depth: usize) -> GraphView {
        self.visibility.expand_to_depth(&self.store, depth);
        self.refresh();
        self.full_view()
    }

    pub fn expand_all(&mut self) -> GraphView {
        self.visibility.expand_all(&self.store);
        self.refresh();
        self.full_view()
    }

    pub fn is_expanded(&self, id: &str) -> bool {
        self.visibility.is_expanded(id)
    }

    pub fn node_details(&self, id: &str) -> Option<NodeDetail> {
        engine::node_details(&self.store, &self.visibility, id)
    }

    pub fn expansion_state(&self) -> Vec<String> {
        self.visibility.ids()
    }

    pub fn set_expansion_state<I, S>(&mut self, ids: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.visibility.replace(ids);
        self.refresh();
    }

    pub fn snapshot(&self) -> ExpansionSnapshot {
        ExpansionSnapshot::new(self.name(), self.expansion_state())
    }

    /// Apply a saved expansion state. A snapshot taken from another model is
    /// still applied; ids that do not exist here stay inert.
    pub fn restore(&mut self, snapshot: &ExpansionSnapshot) {
        if snapshot.model != self.name() {
            tracing::warn!(
                snapshot_model = %snapshot.model,
                model = %self.name(),
                "restoring expansion state captured from a different model"
            );
        }
        self.set_expansion_state(snapshot.expanded.iter().cloned());
    }

    fn refresh(&mut self) {
        self.view = engine::full_view(&self.store, &self.visibility);
    }
}
