//! Filesystem access for model, shape and session documents.
//!
//! Everything the crate reads or writes goes through the `FileSystem` trait so
//! commands and tests can swap the real disk for an in-memory map.

use serde::Serialize;
use serde::de::DeserializeOwned;
use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Failure to load or store a JSON document.
#[derive(Debug, Error)]
pub enum DocumentError {
    #[error("Failed to read {}: {source}", path.display())]
    Io { path: PathBuf, source: io::Error },
    #[error("Failed to parse {}: {source}", path.display())]
    Parse {
        path: PathBuf,
        source: serde_json::Error,
    },
}

pub trait FileSystem: Send + Sync {
    fn read_to_string(&self, path: &Path) -> io::Result<String>;

    /// Write content to a file, creating it if it doesn't exist.
    fn write(&self, path: &Path, content: &str) -> io::Result<()>;

    fn exists(&self, path: &Path) -> bool;
}

#[derive(Debug, Default, Clone, Copy)]
pub struct RealFs;

impl FileSystem for RealFs {
    fn read_to_string(&self, path: &Path) -> io::Result<String> {
        std::fs::read_to_string(path)
    }

    fn write(&self, path: &Path, content: &str) -> io::Result<()> {
        std::fs::write(path, content)
    }

    fn exists(&self, path: &Path) -> bool {
        path.exists()
    }
}

pub fn default_fs() -> &'static RealFs {
    static INSTANCE: RealFs = RealFs;
    &INSTANCE
}

pub fn read_json<T: DeserializeOwned>(fs: &dyn FileSystem, path: &Path) -> Result<T, DocumentError> {
    let content = fs.read_to_string(path).map_err(|source| DocumentError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    serde_json::from_str(&content).map_err(|source| DocumentError::Parse {
        path: path.to_path_buf(),
        source,
    })
}

pub fn write_json<T: Serialize>(
    fs: &dyn FileSystem,
    path: &Path,
    value: &T,
) -> Result<(), DocumentError> {
    let json = serde_json::to_string_pretty(value).map_err(|source| DocumentError::Parse {
        path: path.to_path_buf(),
        source,
    })?;
    fs.write(path, &json).map_err(|source| DocumentError::Io {
        path: path.to_path_buf(),
        source,
    })
}

#[cfg(test)]
pub mod mock {
    use super::*;
    use std::collections::HashMap;
    use std::sync::RwLock;

    /// In-memory filesystem for testing.
    #[derive(Debug, Default)]
    pub struct MockFs {
        files: RwLock<HashMap<String, String>>,
    }

    impl MockFs {
        pub fn new() -> Self {
            Self::default()
        }

        pub fn with_files<I, P, C>(files: I) -> Self
        where
            I: IntoIterator<Item = (P, C)>,
            P: AsRef<Path>,
            C: Into<String>,
        {
            let map: HashMap<String, String> = files
                .into_iter()
                .map(|(p, c)| (p.as_ref().to_string_lossy().to_string(), c.into()))
                .collect();
            Self {
                files: RwLock::new(map),
            }
        }

        pub fn get(&self, path: &Path) -> Option<String> {
            let key = path.to_string_lossy().to_string();
            self.files.read().unwrap().get(&key).cloned()
        }
    }

    impl FileSystem for MockFs {
        fn read_to_string(&self, path: &Path) -> io::Result<String> {
            self.get(path).ok_or_else(|| {
                io::Error::new(
                    io::ErrorKind::NotFound,
                    format!("file not found: {}", path.display()),
                )
            })
        }

        fn write(&self, path: &Path, content: &str) -> io::Result<()> {
            let key = path.to_string_lossy().to_string();
            self.files.write().unwrap().insert(key, content.to_string());
            Ok(())
        }

        fn exists(&self, path: &Path) -> bool {
            self.get(path).is_some()
        }
    }

    #[cfg(test)]
    mod tests {
        use super::*;
        use serde_json::json;

        #[test]
        fn test_json_round_trip_through_mock() {
            let fs = MockFs::new();
            let path = Path::new("/state/session.json");

            assert!(!fs.exists(path));
            write_json(&fs, path, &json!({ "expanded": ["model"] })).unwrap();
            assert!(fs.exists(path));

            let value: serde_json::Value = read_json(&fs, path).unwrap();
            assert_eq!(value["expanded"][0], "model");
        }

        #[test]
        fn test_read_json_errors() {
            let fs = MockFs::with_files([(Path::new("/bad.json"), "{ not json")]);

            let missing = read_json::<serde_json::Value>(&fs, Path::new("/missing.json"));
            assert!(matches!(missing, Err(DocumentError::Io { .. })));

            let bad = read_json::<serde_json::Value>(&fs, Path::new("/bad.json"));
            assert!(matches!(bad, Err(DocumentError::Parse { .. })));
        }
    }
}
