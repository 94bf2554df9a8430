use super::classify::{classify, extract_params};
use super::source::{ModuleRecord, ModuleTree};
use crate::model::{LayerNode, ModelSummary};
use petgraph::algo::tarjan_scc;
use petgraph::graph::{DiGraph, NodeIndex};
use std::collections::{HashMap, HashSet};
use thiserror::Error;

/// Reasons a module tree cannot be turned into a hierarchy. All of them are
/// fatal: construction aborts and no partial store is returned.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum HierarchyError {
    #[error("malformed hierarchy: module tree is empty")]
    Empty,
    #[error("malformed hierarchy: duplicate module id '{0}'")]
    DuplicateId(String),
    #[error("malformed hierarchy: no root module (every module declares a parent)")]
    NoRoot,
    #[error("malformed hierarchy: several root modules: {}", .0.join(", "))]
    MultipleRoots(Vec<String>),
    #[error("malformed hierarchy: module '{id}' declares unknown parent '{parent}'")]
    DanglingParent { id: String, parent: String },
    #[error("malformed hierarchy: cycle through {}", .0.join(" -> "))]
    Cycle(Vec<String>),
    #[error("malformed hierarchy: module '{parent}' lists unknown child '{child}'")]
    UnknownChild { parent: String, child: String },
    #[error(
        "malformed hierarchy: module '{parent}' lists '{child}' whose parent is {}",
        .actual.as_deref().unwrap_or("none")
    )]
    ChildMismatch {
        parent: String,
        child: String,
        actual: Option<String>,
    },
    #[error("malformed hierarchy: module '{parent}' lists child '{child}' more than once")]
    DuplicateChild { parent: String, child: String },
}

/// Id-indexed table of every layer in a model.
///
/// Layers live in an arena in producer order and reference each other only by
/// id, so parent and child links can never form reference cycles. The store is
/// read-only once built.
#[derive(Debug, Clone)]
pub struct HierarchyStore {
    name: String,
    layers: Vec<LayerNode>,
    index: HashMap<String, usize>,
    root: usize,
}

impl HierarchyStore {
    pub fn build(tree: ModuleTree) -> Result<Self, HierarchyError> {
        let ModuleTree { name, records } = tree;

        if records.is_empty() {
            return Err(HierarchyError::Empty);
        }

        let mut index: HashMap<String, usize> = HashMap::with_capacity(records.len());
        for (idx, record) in records.iter().enumerate() {
            if index.insert(record.id.clone(), idx).is_some() {
                return Err(HierarchyError::DuplicateId(record.id.clone()));
            }
        }

        let roots: Vec<usize> = records
            .iter()
            .enumerate()
            .filter(|(_, r)| r.parent_id.is_none())
            .map(|(idx, _)| idx)
            .collect();
        let root = match roots.as_slice() {
            [] => return Err(HierarchyError::NoRoot),
            [single] => *single,
            many => {
                return Err(HierarchyError::MultipleRoots(
                    many.iter().map(|&idx| records[idx].id.clone()).collect(),
                ));
            }
        };

        for record in &records {
            if let Some(parent) = &record.parent_id {
                if !index.contains_key(parent) {
                    return Err(HierarchyError::DanglingParent {
                        id: record.id.clone(),
                        parent: parent.clone(),
                    });
                }
            }
        }

        detect_cycle(&records, &index)?;

        let children = resolve_children(&records, &index)?;
        let depths = compute_depths(root, &children, records.len());
        let ids: Vec<String> = records.iter().map(|r| r.id.clone()).collect();

        let layers = records
            .into_iter()
            .zip(children)
            .zip(depths)
            .map(|((record, child_indices), depth)| {
                let child_ids: Vec<String> = child_indices
                    .iter()
                    .map(|&idx| ids[idx].clone())
                    .collect();
                into_layer(record, child_ids, depth)
            })
            .collect();

        Ok(Self {
            name,
            layers,
            index,
            root,
        })
    }

    /// Model name the store was built for.
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn root(&self) -> &LayerNode {
        &self.layers[self.root]
    }

    pub fn root_id(&self) -> &str {
        &self.layers[self.root].id
    }

    pub fn get(&self, id: &str) -> Option<&LayerNode> {
        self.index.get(id).map(|&idx| &self.layers[idx])
    }

    pub fn contains(&self, id: &str) -> bool {
        self.index.contains_key(id)
    }

    /// Children of `id` in declaration order; empty for unknown ids.
    pub fn children(&self, id: &str) -> impl Iterator<Item = &LayerNode> + '_ {
        self.get(id)
            .into_iter()
            .flat_map(|layer| layer.children.iter())
            .filter_map(|child| self.get(child))
    }

    /// Every descendant of `id`, walking the hierarchy depth-first.
    pub fn descendants(&self, id: &str) -> Vec<&str> {
        let mut result = Vec::new();
        let mut stack: Vec<&str> = match self.get(id) {
            Some(layer) => layer.children.iter().rev().map(String::as_str).collect(),
            None => return result,
        };

        while let Some(current) = stack.pop() {
            result.push(current);
            if let Some(layer) = self.get(current) {
                stack.extend(layer.children.iter().rev().map(String::as_str));
            }
        }

        result
    }

    /// All layers in producer order.
    pub fn iter(&self) -> impl Iterator<Item = &LayerNode> + '_ {
        self.layers.iter()
    }

    pub fn len(&self) -> usize {
        self.layers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.layers.is_empty()
    }

    pub fn total_parameters(&self) -> u64 {
        self.layers.iter().map(|l| l.num_parameters).sum()
    }

    pub fn summary(&self) -> ModelSummary {
        let root = self.root();
        ModelSummary {
            name: self.name.clone(),
            class: root.module_class.clone(),
            total_parameters: self.total_parameters(),
            total_layers: self.layers.len() - 1,
            has_children: root.has_children(),
        }
    }

    pub(crate) fn layers_mut(&mut self) -> impl Iterator<Item = &mut LayerNode> + '_ {
        self.layers.iter_mut()
    }
}

/// Reject parent links that loop back on themselves. With a single root and
/// no dangling parents, a cycle is the only way a module can be unreachable.
fn detect_cycle(
    records: &[ModuleRecord],
    index: &HashMap<String, usize>,
) -> Result<(), HierarchyError> {
    let mut graph: DiGraph<usize, ()> = DiGraph::with_capacity(records.len(), records.len());
    let nodes: Vec<NodeIndex> = (0..records.len()).map(|idx| graph.add_node(idx)).collect();

    for (idx, record) in records.iter().enumerate() {
        if let Some(parent) = record.parent_id.as_ref().and_then(|p| index.get(p)) {
            graph.add_edge(nodes[*parent], nodes[idx], ());
        }
    }

    for scc in tarjan_scc(&graph) {
        let is_cycle = scc.len() > 1
            || (scc.len() == 1 && graph.contains_edge(scc[0], scc[0]));
        if is_cycle {
            let mut members: Vec<String> = scc
                .iter()
                .map(|&node| records[graph[node]].id.clone())
                .collect();
            members.sort();
            return Err(HierarchyError::Cycle(members));
        }
    }

    Ok(())
}

/// Child indices per record: the declared order first, then any children
/// linked only through their `parent_id`, in record order.
fn resolve_children(
    records: &[ModuleRecord],
    index: &HashMap<String, usize>,
) -> Result<Vec<Vec<usize>>, HierarchyError> {
    let mut linked: Vec<Vec<usize>> = vec![Vec::new(); records.len()];
    for (idx, record) in records.iter().enumerate() {
        if let Some(&parent) = record.parent_id.as_ref().and_then(|p| index.get(p)) {
            linked[parent].push(idx);
        }
    }

    let mut resolved = Vec::with_capacity(records.len());
    for (idx, record) in records.iter().enumerate() {
        let mut seen: HashSet<usize> = HashSet::new();
        let mut children = Vec::with_capacity(linked[idx].len());

        for child_id in &record.children {
            let child = *index
                .get(child_id)
                .ok_or_else(|| HierarchyError::UnknownChild {
                    parent: record.id.clone(),
                    child: child_id.clone(),
                })?;

            let actual = records[child].parent_id.clone();
            if actual.as_deref() != Some(record.id.as_str()) {
                return Err(HierarchyError::ChildMismatch {
                    parent: record.id.clone(),
                    child: child_id.clone(),
                    actual,
                });
            }

            if !seen.insert(child) {
                return Err(HierarchyError::DuplicateChild {
                    parent: record.id.clone(),
                    child: child_id.clone(),
                });
            }
            children.push(child);
        }

        for &child in &linked[idx] {
            if seen.insert(child) {
                children.push(child);
            }
        }

        resolved.push(children);
    }

    Ok(resolved)
}

fn compute_depths(root: usize, children: &[Vec<usize>], len: usize) -> Vec<usize> {
    let mut depths = vec![0; len];
    let mut stack = vec![(root, 0usize)];
    while let Some((idx, depth)) = stack.pop() {
        depths[idx] = depth;
        for &child in &children[idx] {
            stack.push((child, depth + 1));
        }
    }
    depths
}

fn into_layer(record: ModuleRecord, children: Vec<String>, depth: usize) -> LayerNode {
    // A root without an explicit name keeps its whole id, dots included
    let name = record.name.unwrap_or_else(|| match record.parent_id {
        Some(_) => leaf_segment(&record.id).to_string(),
        None => record.id.clone(),
    });
    let layer_type = record
        .layer_type
        .unwrap_or_else(|| classify(&record.module_class, !children.is_empty()));
    let params = extract_params(&record.module_class, &record.params);

    LayerNode {
        label: name.clone(),
        name,
        layer_type,
        module_class: record.module_class,
        num_parameters: record.num_parameters,
        params,
        children,
        parent_id: record.parent_id,
        depth,
        input_shape: None,
        output_shape: None,
        id: record.id,
    }
}

fn leaf_segment(id: &str) -> &str {
    id.rsplit('.').next().unwrap_or(id)
}
