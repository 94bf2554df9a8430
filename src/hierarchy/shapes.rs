//! Optional tensor shape enrichment from a traced computation graph.
//!
//! Shapes are a best-effort annotation. Entries keyed by layer id are exact.
//! Entries keyed by a tracer node name can only be aligned to layers by name,
//! which is ambiguous for models that reuse layer names (`fc` in several
//! blocks), so substring matching is opt-in and every such match is reported
//! as approximate.

use super::store::HierarchyStore;
use crate::fs::{DocumentError, FileSystem, read_json};
use crate::model::Shapes;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ShapeEntry {
    #[serde(default)]
    pub input_shape: Option<Shapes>,
    #[serde(default)]
    pub output_shape: Option<Shapes>,
}

/// Shapes reported by a tracer, keyed by layer id or by traced node name.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ShapeMap {
    #[serde(default)]
    pub by_id: BTreeMap<String, ShapeEntry>,
    #[serde(default)]
    pub by_name: BTreeMap<String, ShapeEntry>,
}

impl ShapeMap {
    pub fn is_empty(&self) -> bool {
        self.by_id.is_empty() && self.by_name.is_empty()
    }
}

/// A name-based match that may have attached shapes to the wrong layer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApproximateMatch {
    pub layer_id: String,
    pub traced_name: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EnrichmentReport {
    pub exact: usize,
    pub approximate: Vec<ApproximateMatch>,
    /// Keys of the shape map that matched no layer.
    pub unmatched: Vec<String>,
}

impl EnrichmentReport {
    pub fn matched(&self) -> usize {
        self.exact + self.approximate.len()
    }
}

pub fn load_shapes(fs: &dyn FileSystem, path: &Path) -> Result<ShapeMap, DocumentError> {
    read_json(fs, path)
}

impl HierarchyStore {
    /// Attach shapes to layers. Must run before the store is handed to a
    /// session; afterwards the store is read-only.
    ///
    /// Id keys are matched first. A name key matches the single non-root layer
    /// whose name equals it; with `fuzzy` on, a name key that still has no
    /// match falls back to the first shapeless layer (in producer order) whose
    /// name occurs in the traced name or whose id contains it.
    pub fn apply_shapes(&mut self, shapes: &ShapeMap, fuzzy: bool) -> EnrichmentReport {
        let mut report = EnrichmentReport::default();
        let mut assignments: BTreeMap<String, &ShapeEntry> = BTreeMap::new();

        for (id, entry) in &shapes.by_id {
            if self.contains(id) {
                assignments.insert(id.clone(), entry);
                report.exact += 1;
            } else {
                report.unmatched.push(id.clone());
            }
        }

        for (traced_name, entry) in &shapes.by_name {
            let named: Vec<&str> = self
                .iter()
                .filter(|l| !l.is_root() && l.name == *traced_name)
                .map(|l| l.id.as_str())
                .collect();

            if let [id] = named.as_slice() {
                if !assignments.contains_key(*id) {
                    assignments.insert(id.to_string(), entry);
                    report.exact += 1;
                    continue;
                }
            }

            if !fuzzy {
                report.unmatched.push(traced_name.clone());
                continue;
            }

            let candidate = self
                .iter()
                .filter(|l| !l.is_root() && !assignments.contains_key(&l.id))
                .find(|l| traced_name.contains(&l.name) || l.id.contains(traced_name.as_str()))
                .map(|l| l.id.clone());

            match candidate {
                Some(layer_id) => {
                    assignments.insert(layer_id.clone(), entry);
                    report.approximate.push(ApproximateMatch {
                        layer_id,
                        traced_name: traced_name.clone(),
                    });
                }
                None => report.unmatched.push(traced_name.clone()),
            }
        }

        for layer in self.layers_mut() {
            if let Some(entry) = assignments.get(&layer.id) {
                layer.input_shape = entry.input_shape.clone();
                layer.output_shape = entry.output_shape.clone();
            }
        }

        report
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hierarchy::{ModuleRecord, ModuleTree};

    fn store() -> HierarchyStore {
        HierarchyStore::build(ModuleTree::new(
            "net",
            vec![
                ModuleRecord::new("net", None, "Net")
                    .with_children(["net.block1", "net.block2", "net.head"]),
                ModuleRecord::new("net.block1", Some("net"), "Block")
                    .with_children(["net.block1.fc"]),
                ModuleRecord::new("net.block1.fc", Some("net.block1"), "Linear"),
                ModuleRecord::new("net.block2", Some("net"), "Block")
                    .with_children(["net.block2.fc"]),
                ModuleRecord::new("net.block2.fc", Some("net.block2"), "Linear"),
                ModuleRecord::new("net.head", Some("net"), "Linear"),
            ],
        ))
        .unwrap()
    }

    fn entry(input: Vec<i64>, output: Vec<i64>) -> ShapeEntry {
        ShapeEntry {
            input_shape: Some(vec![input]),
            output_shape: Some(vec![output]),
        }
    }

    #[test]
    fn test_exact_id_match() {
        let mut store = store();
        let mut shapes = ShapeMap::default();
        shapes
            .by_id
            .insert("net.head".to_string(), entry(vec![1, 64], vec![1, 10]));
        shapes
            .by_id
            .insert("net.missing".to_string(), entry(vec![1], vec![1]));

        let report = store.apply_shapes(&shapes, false);

        assert_eq!(report.exact, 1);
        assert_eq!(report.unmatched, vec!["net.missing"]);
        let head = store.get("net.head").unwrap();
        assert_eq!(head.input_shape, Some(vec![vec![1, 64]]));
        assert_eq!(head.output_shape, Some(vec![vec![1, 10]]));
        assert!(store.get("net.block1.fc").unwrap().input_shape.is_none());
    }

    #[test]
    fn test_unique_name_match_is_exact() {
        let mut store = store();
        let mut shapes = ShapeMap::default();
        shapes
            .by_name
            .insert("head".to_string(), entry(vec![1, 64], vec![1, 10]));

        let report = store.apply_shapes(&shapes, false);
        assert_eq!(report.exact, 1);
        assert!(report.approximate.is_empty());
        assert!(store.get("net.head").unwrap().output_shape.is_some());
    }

    #[test]
    fn test_ambiguous_name_needs_fuzzy() {
        let mut shapes = ShapeMap::default();
        shapes
            .by_name
            .insert("fc".to_string(), entry(vec![1, 32], vec![1, 32]));

        let mut strict = store();
        let report = strict.apply_shapes(&shapes, false);
        assert_eq!(report.matched(), 0);
        assert_eq!(report.unmatched, vec!["fc"]);

        let mut fuzzy = store();
        let report = fuzzy.apply_shapes(&shapes, true);
        assert_eq!(
            report.approximate,
            vec![ApproximateMatch {
                layer_id: "net.block1.fc".to_string(),
                traced_name: "fc".to_string()
            }]
        );
        assert!(fuzzy.get("net.block2.fc").unwrap().input_shape.is_none());
    }

    #[test]
    fn test_fuzzy_never_overrides_exact() {
        let mut store = store();
        let mut shapes = ShapeMap::default();
        shapes
            .by_id
            .insert("net.block1.fc".to_string(), entry(vec![1, 8], vec![1, 8]));
        shapes
            .by_name
            .insert("block1.fc-linear".to_string(), entry(vec![1, 99], vec![1, 99]));

        let report = store.apply_shapes(&shapes, true);
        assert_eq!(report.exact, 1);
        assert_eq!(
            store.get("net.block1.fc").unwrap().input_shape,
            Some(vec![vec![1, 8]])
        );
        // The name contains "block1", which is the next shapeless candidate
        assert_eq!(report.approximate[0].layer_id, "net.block1");
    }

    #[test]
    fn test_parse_shape_document() {
        let shapes: ShapeMap = serde_json::from_str(
            r#"{ "byId": { "net.head": { "inputShape": [[1, 64]], "outputShape": [[1, 10]] } } }"#,
        )
        .unwrap();
        assert_eq!(shapes.by_id.len(), 1);
        assert!(shapes.by_name.is_empty());
        assert!(!shapes.is_empty());
    }
}
