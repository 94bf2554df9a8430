use crate::hierarchy::HierarchyStore;
use std::collections::BTreeSet;

/// The set of expanded node ids: the only mutable state of a session.
///
/// Every mutation goes through [`expand`](Self::expand),
/// [`collapse`](Self::collapse), [`toggle`](Self::toggle) or
/// [`replace`](Self::replace). Ids are kept sorted so exports are stable.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct VisibilityEngine {
    expanded: BTreeSet<String>,
}

impl VisibilityEngine {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_expanded(&self, id: &str) -> bool {
        self.expanded.contains(id)
    }

    /// Mark `id` as expanded. Unknown and childless ids are ignored.
    /// Returns whether the set changed.
    pub fn expand(&mut self, store: &HierarchyStore, id: &str) -> bool {
        match store.get(id) {
            Some(layer) if layer.has_children() => {
                let changed = self.expanded.insert(id.to_string());
                if changed {
                    tracing::debug!(node = id, "expanded");
                }
                changed
            }
            _ => {
                tracing::debug!(node = id, "expand ignored: unknown or childless");
                false
            }
        }
    }

    /// Clear `id` and every descendant of it in the hierarchy, so a later
    /// expand of `id` shows its children collapsed.
    pub fn collapse(&mut self, store: &HierarchyStore, id: &str) -> bool {
        let mut changed = self.expanded.remove(id);
        for descendant in store.descendants(id) {
            changed |= self.expanded.remove(descendant);
        }
        if changed {
            tracing::debug!(node = id, "collapsed");
        }
        changed
    }

    pub fn toggle(&mut self, store: &HierarchyStore, id: &str) -> bool {
        if self.is_expanded(id) {
            self.collapse(store, id)
        } else {
            self.expand(store, id)
        }
    }

    /// Expand every node with children above `depth` (root is depth 0).
    pub fn expand_to_depth(&mut self, store: &HierarchyStore, depth: usize) {
        for layer in store.iter() {
            if layer.depth < depth && layer.has_children() {
                self.expanded.insert(layer.id.clone());
            }
        }
    }

    pub fn expand_all(&mut self, store: &HierarchyStore) {
        self.expand_to_depth(store, usize::MAX);
    }

    /// Expanded ids in sorted order.
    pub fn ids(&self) -> Vec<String> {
        self.expanded.iter().cloned().collect()
    }

    /// Replace the whole set verbatim. Ids are not checked against the
    /// hierarchy: unknown ids never reach a view and stay inert.
    pub fn replace<I, S>(&mut self, ids: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.expanded = ids.into_iter().map(Into::into).collect();
    }

    pub fn len(&self) -> usize {
        self.expanded.len()
    }

    pub fn is_empty(&self) -> bool {
        self.expanded.is_empty()
    }
}
