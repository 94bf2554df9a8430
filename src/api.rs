//! Library API for apalysis.
//!
//! Loads a model document into a ready-to-use [`Session`]. Unlike the CLI
//! commands, which print and return exit codes, these functions return
//! `Result`s for the caller to handle.
//!
//! # Example
//!
//! ```no_run
//! use apalysis::{LoadOptions, load_session};
//! use std::path::Path;
//!
//! let mut session = load_session(Path::new("model.json"), LoadOptions::default())?;
//! let view = session.expand(&session.store().root_id().to_string());
//! println!("{} visible nodes", view.nodes.len());
//! # Ok::<(), apalysis::ApalysisError>(())
//! ```

use crate::config::Config;
use crate::fs::{DocumentError, FileSystem, default_fs};
use crate::hierarchy::{HierarchyError, HierarchyStore, load_model, load_shapes};
use crate::session::Session;
use crate::snapshot::load_snapshot;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Errors that can occur while loading a model.
#[derive(Debug, Error)]
pub enum ApalysisError {
    /// Model or session document could not be read or parsed.
    #[error(transparent)]
    Document(#[from] DocumentError),

    /// The module hierarchy is malformed.
    #[error("Invalid module hierarchy: {0}")]
    Hierarchy(#[from] HierarchyError),
}

/// Options for [`load_session`].
#[derive(Debug, Clone, Default)]
pub struct LoadOptions {
    /// Companion shape document. Failing to load it is logged, not fatal.
    pub shapes: Option<PathBuf>,

    /// Allow approximate name-based shape matching.
    pub fuzzy_shapes: bool,

    /// Levels expanded when the session starts.
    pub initial_depth: usize,

    /// Saved expansion state to restore. A missing file is ignored.
    pub state: Option<PathBuf>,
}

impl LoadOptions {
    /// Options seeded from a config file's view and shape sections.
    pub fn from_config(config: &Config) -> Self {
        Self {
            fuzzy_shapes: config.shapes.fuzzy_match,
            initial_depth: config.view.initial_depth,
            ..Self::default()
        }
    }
}

/// Load a model document and build a session over it.
pub fn load_session(path: &Path, options: LoadOptions) -> Result<Session, ApalysisError> {
    load_session_with_fs(default_fs(), path, options)
}

pub fn load_session_with_fs(
    fs: &dyn FileSystem,
    path: &Path,
    options: LoadOptions,
) -> Result<Session, ApalysisError> {
    let tree = load_model(fs, path)?;
    let mut store = HierarchyStore::build(tree)?;
    tracing::info!(
        model = %store.name(),
        layers = store.len(),
        parameters = store.total_parameters(),
        "loaded module hierarchy"
    );

    if let Some(shapes_path) = &options.shapes {
        enrich(fs, &mut store, shapes_path, options.fuzzy_shapes);
    }

    let mut session = Session::new(store);
    if options.initial_depth > 0 {
        session.expand_to_depth(options.initial_depth);
    }

    if let Some(state_path) = &options.state {
        if fs.exists(state_path) {
            let snapshot = load_snapshot(fs, state_path)?;
            session.restore(&snapshot);
        } else {
            tracing::debug!(path = %state_path.display(), "no saved expansion state");
        }
    }

    Ok(session)
}

/// Attach shapes to the store. Shapes are optional, so any failure leaves
/// every layer without shapes and the load continues.
fn enrich(
    fs: &dyn FileSystem,
    store: &mut HierarchyStore,
    path: &Path,
    fuzzy: bool,
) {
    let shapes = match load_shapes(fs, path) {
        Ok(shapes) => shapes,
        Err(e) => {
            tracing::warn!(error = %e, "shape enrichment skipped");
            return;
        }
    };

    if shapes.is_empty() {
        tracing::warn!(path = %path.display(), "shape document has no entries");
        return;
    }

    let report = store.apply_shapes(&shapes, fuzzy);
    for m in &report.approximate {
        tracing::debug!(layer = %m.layer_id, traced = %m.traced_name, "approximate shape match");
    }
    tracing::info!(
        matched = report.matched(),
        exact = report.exact,
        approximate = report.approximate.len(),
        unmatched = report.unmatched.len(),
        "applied tensor shapes"
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fs::mock::MockFs;
    use crate::snapshot::{ExpansionSnapshot, save_snapshot};

    const MODEL: &str = r#"{
        "name": "tiny",
        "root": {
            "name": "tiny",
            "moduleClass": "Tiny",
            "children": [
                { "name": "encoder", "moduleClass": "Sequential", "children": [
                    { "name": "0", "moduleClass": "Linear", "numParameters": 72,
                      "params": { "in_features": 8, "out_features": 8, "bias": true } }
                ] },
                { "name": "head", "moduleClass": "Linear", "numParameters": 18 }
            ]
        }
    }"#;

    fn fs() -> MockFs {
        MockFs::with_files([(Path::new("/m.json"), MODEL)])
    }

    #[test]
    fn test_load_collapsed_by_default() {
        let session = load_session_with_fs(&fs(), Path::new("/m.json"), LoadOptions::default())
            .unwrap();
        assert_eq!(session.full_view().node_ids(), vec!["tiny"]);
        assert_eq!(session.summary().total_parameters, 90);
    }

    #[test]
    fn test_initial_depth() {
        let options = LoadOptions {
            initial_depth: 2,
            ..LoadOptions::default()
        };
        let session = load_session_with_fs(&fs(), Path::new("/m.json"), options).unwrap();
        assert_eq!(
            session.full_view().node_ids(),
            vec!["tiny", "tiny.encoder", "tiny.encoder.0", "tiny.head"]
        );
    }

    #[test]
    fn test_missing_shapes_are_not_fatal() {
        let options = LoadOptions {
            shapes: Some(PathBuf::from("/missing.shapes.json")),
            ..LoadOptions::default()
        };
        let session = load_session_with_fs(&fs(), Path::new("/m.json"), options).unwrap();
        assert!(session.node_details("tiny.head").unwrap().input_shape.is_none());
    }

    #[test]
    fn test_shapes_applied() {
        let fs = fs();
        fs.write(
            Path::new("/m.shapes.json"),
            r#"{ "byId": { "tiny.head": { "inputShape": [[1, 8]], "outputShape": [[1, 2]] } } }"#,
        )
        .unwrap();
        let options = LoadOptions {
            shapes: Some(PathBuf::from("/m.shapes.json")),
            ..LoadOptions::default()
        };
        let session = load_session_with_fs(&fs, Path::new("/m.json"), options).unwrap();
        let head = session.node_details("tiny.head").unwrap();
        assert_eq!(head.output_shape, Some(vec![vec![1, 2]]));
    }

    #[test]
    fn test_empty_shape_document_is_skipped() {
        let fs = fs();
        fs.write(Path::new("/empty.shapes.json"), "{}").unwrap();
        let options = LoadOptions {
            shapes: Some(PathBuf::from("/empty.shapes.json")),
            ..LoadOptions::default()
        };
        let session = load_session_with_fs(&fs, Path::new("/m.json"), options).unwrap();
        assert!(session.node_details("tiny.head").unwrap().output_shape.is_none());
        assert_eq!(session.summary().total_parameters, 90);
    }

    #[test]
    fn test_restore_saved_state() {
        let fs = fs();
        let snapshot = ExpansionSnapshot::new("tiny", vec!["tiny".into()]);
        save_snapshot(&fs, &snapshot, Path::new("/state.json")).unwrap();

        let options = LoadOptions {
            state: Some(PathBuf::from("/state.json")),
            ..LoadOptions::default()
        };
        let session = load_session_with_fs(&fs, Path::new("/m.json"), options).unwrap();
        assert_eq!(
            session.full_view().node_ids(),
            vec!["tiny", "tiny.encoder", "tiny.head"]
        );
    }

    #[test]
    fn test_missing_model() {
        let err = load_session_with_fs(&fs(), Path::new("/nope.json"), LoadOptions::default())
            .unwrap_err();
        assert!(matches!(err, ApalysisError::Document(DocumentError::Io { .. })));
    }

    #[test]
    fn test_malformed_hierarchy() {
        let fs = MockFs::with_files([(
            Path::new("/bad.json"),
            r#"{ "name": "bad", "modules": [] }"#,
        )]);
        let err = load_session_with_fs(&fs, Path::new("/bad.json"), LoadOptions::default())
            .unwrap_err();
        assert!(matches!(err, ApalysisError::Hierarchy(HierarchyError::Empty)));
    }
}
