use serde::Deserialize;
use std::path::Path;
use thiserror::Error;

pub const CONFIG_FILE: &str = ".apalysis.toml";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),
    #[error("Failed to parse config file: {0}")]
    Parse(#[from] toml::de::Error),
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Config {
    pub server: ServerConfig,
    pub view: ViewConfig,
    pub shapes: ShapeConfig,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub open_browser: bool,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ViewConfig {
    /// Levels expanded automatically when a session starts
    pub initial_depth: usize,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ShapeConfig {
    pub fuzzy_match: bool,
}

#[derive(Debug, Deserialize)]
struct RawConfig {
    server: Option<RawServer>,
    view: Option<RawView>,
    shapes: Option<RawShapes>,
}

#[derive(Debug, Deserialize)]
struct RawServer {
    host: Option<String>,
    port: Option<u16>,
    open_browser: Option<bool>,
}

#[derive(Debug, Deserialize)]
struct RawView {
    initial_depth: Option<usize>,
}

#[derive(Debug, Deserialize)]
struct RawShapes {
    fuzzy_match: Option<bool>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 8765,
            open_browser: false,
        }
    }
}

impl Config {
    /// Load `.apalysis.toml` from `dir`, falling back to defaults when absent.
    pub fn load(dir: &Path) -> Result<Self, ConfigError> {
        let config_path = dir.join(CONFIG_FILE);

        if !config_path.exists() {
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(&config_path)?;
        Self::parse(&content)
    }

    pub fn parse(content: &str) -> Result<Self, ConfigError> {
        let raw: RawConfig = toml::from_str(content)?;
        let defaults = ServerConfig::default();

        let server = match raw.server {
            Some(s) => ServerConfig {
                host: s.host.unwrap_or(defaults.host),
                port: s.port.unwrap_or(defaults.port),
                open_browser: s.open_browser.unwrap_or(defaults.open_browser),
            },
            None => defaults,
        };

        let view = ViewConfig {
            initial_depth: raw.view.and_then(|v| v.initial_depth).unwrap_or(0),
        };

        let shapes = ShapeConfig {
            fuzzy_match: raw.shapes.and_then(|s| s.fuzzy_match).unwrap_or(false),
        };

        Ok(Self {
            server,
            view,
            shapes,
        })
    }
}

pub fn generate_config_template() -> String {
    r#"# apalysis configuration

[server]
# Address the visualization server binds to
host = "127.0.0.1"
port = 8765
# Open the viewer in a browser once the server is up
open_browser = false

[view]
# Hierarchy levels expanded when a session starts (0 shows only the root)
initial_depth = 0

[shapes]
# Match traced shape names to layers by substring when no exact match exists.
# Such matches can land on the wrong layer and are reported as approximate.
fuzzy_match = false
"#
    .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_missing_file_uses_defaults() {
        let dir = TempDir::new().unwrap();
        let config = Config::load(dir.path()).unwrap();
        assert_eq!(config, Config::default());
        assert_eq!(config.server.port, 8765);
        assert_eq!(config.server.host, "127.0.0.1");
    }

    #[test]
    fn test_partial_file_keeps_other_defaults() {
        let dir = TempDir::new().unwrap();
        std::fs::write(
            dir.path().join(CONFIG_FILE),
            "[server]\nport = 9000\n\n[view]\ninitial_depth = 2\n",
        )
        .unwrap();

        let config = Config::load(dir.path()).unwrap();
        assert_eq!(config.server.port, 9000);
        assert_eq!(config.server.host, "127.0.0.1");
        assert!(!config.server.open_browser);
        assert_eq!(config.view.initial_depth, 2);
        assert!(!config.shapes.fuzzy_match);
    }

    #[test]
    fn test_invalid_toml() {
        let err = Config::parse("[server\nport = ").unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn test_template_parses_to_defaults() {
        let config = Config::parse(&generate_config_template()).unwrap();
        assert_eq!(config, Config::default());
    }
}
