//! The producer boundary: module trees handed over by an external extractor.
//!
//! A model document is JSON in one of two forms. The flat form lists every
//! module as a record with its parent id and declared child order:
//!
//! ```json
//! { "name": "net", "modules": [
//!     { "id": "net", "moduleClass": "Net", "children": ["net.fc"] },
//!     { "id": "net.fc", "parentId": "net", "moduleClass": "Linear",
//!       "numParameters": 220, "params": { "in_features": 10, "out_features": 20 } }
//! ] }
//! ```
//!
//! The nested form mirrors the module tree directly and is flattened into
//! dotted path ids (`net`, `net.fc`, `net.block.0`).

use crate::fs::{DocumentError, FileSystem, read_json};
use crate::model::{LayerType, Params};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// One module as reported by the producer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ModuleRecord {
    pub id: String,
    #[serde(default)]
    pub parent_id: Option<String>,
    pub module_class: String,
    /// Overrides the class lookup table when present.
    #[serde(default)]
    pub layer_type: Option<LayerType>,
    /// Display name; defaults to the last segment of `id`.
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub num_parameters: u64,
    #[serde(default)]
    pub params: Params,
    /// Declared child order. Children linked only through `parent_id` are
    /// appended after these in record order.
    #[serde(default)]
    pub children: Vec<String>,
}

impl ModuleRecord {
    pub fn new(id: impl Into<String>, parent_id: Option<&str>, module_class: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            parent_id: parent_id.map(str::to_string),
            module_class: module_class.into(),
            layer_type: None,
            name: None,
            num_parameters: 0,
            params: Params::new(),
            children: Vec::new(),
        }
    }

    pub fn with_parameters(mut self, count: u64) -> Self {
        self.num_parameters = count;
        self
    }

    pub fn with_params(mut self, params: Params) -> Self {
        self.params = params;
        self
    }

    pub fn with_children<I, S>(mut self, children: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.children = children.into_iter().map(Into::into).collect();
        self
    }
}

/// Ordered module records covering every node, root included.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ModuleTree {
    pub name: String,
    pub records: Vec<ModuleRecord>,
}

/// A module in the nested document form.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NestedModule {
    pub name: String,
    pub module_class: String,
    #[serde(default)]
    pub layer_type: Option<LayerType>,
    #[serde(default)]
    pub num_parameters: u64,
    #[serde(default)]
    pub params: Params,
    #[serde(default)]
    pub children: Vec<NestedModule>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum ModelDocument {
    Flat {
        name: Option<String>,
        modules: Vec<ModuleRecord>,
    },
    Nested {
        name: Option<String>,
        root: NestedModule,
    },
}

impl ModelDocument {
    pub fn into_tree(self) -> ModuleTree {
        match self {
            ModelDocument::Flat { name, modules } => {
                let name = name
                    .or_else(|| {
                        modules
                            .iter()
                            .find(|r| r.parent_id.is_none())
                            .map(|r| r.id.clone())
                    })
                    .unwrap_or_else(|| "model".to_string());
                ModuleTree {
                    name,
                    records: modules,
                }
            }
            ModelDocument::Nested { name, root } => {
                let name = name.unwrap_or_else(|| root.name.clone());
                ModuleTree::from_nested(&name, root)
            }
        }
    }
}

impl ModuleTree {
    pub fn new(name: impl Into<String>, records: Vec<ModuleRecord>) -> Self {
        Self {
            name: name.into(),
            records,
        }
    }

    /// Flatten a nested module tree. The root gets `model_name` as its id and
    /// every other module `parent_id.child_name`, in pre-order.
    pub fn from_nested(model_name: &str, root: NestedModule) -> Self {
        let mut records = Vec::new();
        flatten_nested(root, model_name.to_string(), None, &mut records);
        Self {
            name: model_name.to_string(),
            records,
        }
    }
}

fn flatten_nested(
    module: NestedModule,
    id: String,
    parent_id: Option<String>,
    records: &mut Vec<ModuleRecord>,
) {
    let child_ids: Vec<String> = module
        .children
        .iter()
        .map(|child| format!("{}.{}", id, child.name))
        .collect();

    // The root is labelled with the model name rather than its own attribute name
    let name = match parent_id {
        Some(_) => module.name,
        None => id.clone(),
    };

    records.push(ModuleRecord {
        id: id.clone(),
        parent_id,
        module_class: module.module_class,
        layer_type: module.layer_type,
        name: Some(name),
        num_parameters: module.num_parameters,
        params: module.params,
        children: child_ids.clone(),
    });

    for (child, child_id) in module.children.into_iter().zip(child_ids) {
        flatten_nested(child, child_id, Some(id.clone()), records);
    }
}

pub fn load_model(fs: &dyn FileSystem, path: &Path) -> Result<ModuleTree, DocumentError> {
    let document: ModelDocument = read_json(fs, path)?;
    Ok(document.into_tree())
}

pub fn parse_model(content: &str) -> Result<ModuleTree, serde_json::Error> {
    let document: ModelDocument = serde_json::from_str(content)?;
    Ok(document.into_tree())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_flat_document() {
        let tree = parse_model(
            r#"{
                "name": "net",
                "modules": [
                    { "id": "net", "moduleClass": "Net", "children": ["net.fc"] },
                    { "id": "net.fc", "parentId": "net", "moduleClass": "Linear",
                      "numParameters": 220, "params": { "in_features": 10 } }
                ]
            }"#,
        )
        .unwrap();

        assert_eq!(tree.name, "net");
        assert_eq!(tree.records.len(), 2);
        assert_eq!(tree.records[1].parent_id.as_deref(), Some("net"));
        assert_eq!(tree.records[1].num_parameters, 220);
        assert!(tree.records[0].params.is_empty());
    }

    #[test]
    fn test_flat_document_name_defaults_to_root_id() {
        let tree = parse_model(
            r#"{ "modules": [ { "id": "encoder", "moduleClass": "Encoder" } ] }"#,
        )
        .unwrap();
        assert_eq!(tree.name, "encoder");
    }

    #[test]
    fn test_nested_document_builds_path_ids() {
        let tree = parse_model(
            r#"{
                "name": "model",
                "root": {
                    "name": "MyNet",
                    "moduleClass": "MyNet",
                    "children": [
                        { "name": "features", "moduleClass": "Sequential", "children": [
                            { "name": "0", "moduleClass": "Conv2d", "numParameters": 896 },
                            { "name": "1", "moduleClass": "ReLU" }
                        ] },
                        { "name": "fc", "moduleClass": "Linear", "numParameters": 650 }
                    ]
                }
            }"#,
        )
        .unwrap();

        let ids: Vec<_> = tree.records.iter().map(|r| r.id.as_str()).collect();
        assert_eq!(
            ids,
            vec![
                "model",
                "model.features",
                "model.features.0",
                "model.features.1",
                "model.fc"
            ]
        );
        assert_eq!(
            tree.records[1].children,
            vec!["model.features.0", "model.features.1"]
        );
        assert_eq!(tree.records[2].parent_id.as_deref(), Some("model.features"));
        assert_eq!(tree.records[0].name.as_deref(), Some("model"));
        assert_eq!(tree.records[0].module_class, "MyNet");
        assert_eq!(tree.records[4].name.as_deref(), Some("fc"));
    }

    #[test]
    fn test_rejects_unknown_layer_type() {
        let result = parse_model(
            r#"{ "modules": [ { "id": "m", "moduleClass": "X", "layerType": "Quantum" } ] }"#,
        );
        assert!(result.is_err());
    }
}
