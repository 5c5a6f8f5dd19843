//! Configuration file discovery and loading

use std::path::{Path, PathBuf};

use super::CstConfig;
use crate::error::CstError;
use crate::result::Result;

/// File names probed by [`ConfigLoader::auto_discover`], in priority order
pub const CONFIG_FILE_NAMES: [&str; 2] = ["cst-algo.toml", "cst-algo.json"];

/// Configuration loader for discovering and loading config files
pub struct ConfigLoader;

impl ConfigLoader {
    /// Auto-discover a config file by traversing upward from `start_path`
    ///
    /// In each directory `cst-algo.toml` wins over `cst-algo.json`. Stops at
    /// the filesystem root.
    pub fn auto_discover(start_path: &Path) -> Result<Option<PathBuf>> {
        let mut current = start_path.canonicalize().map_err(|e| {
            CstError::config_error(format!("Invalid path '{}': {e}", start_path.display()))
        })?;

        loop {
            for filename in CONFIG_FILE_NAMES {
                let config_path = current.join(filename);
                if config_path.is_file() {
                    tracing::debug!("Found config: {}", config_path.display());
                    return Ok(Some(config_path));
                }
            }

            match current.parent() {
                Some(parent) => current = parent.to_path_buf(),
                None => break,
            }
        }

        Ok(None)
    }

    /// Load configuration from a specific file
    ///
    /// The format follows the extension: `.toml` or `.json`.
    pub fn load_from_file(path: &Path) -> Result<CstConfig> {
        let content =
            std::fs::read_to_string(path).map_err(|e| CstError::io_error(path, e))?;
        let config = match path.extension().and_then(|ext| ext.to_str()) {
            Some("toml") => Self::from_toml_str(&content),
            Some("json") => Self::from_json_str(&content),
            _ => Err(CstError::config_error(
                "Unsupported file extension (expected .toml or .json)",
            )),
        };
        config.map_err(|e| match e {
            CstError::ConfigError { message } => CstError::config_error(format!(
                "Failed to load config from '{}': {message}",
                path.display()
            )),
            other => other,
        })
    }

    pub fn from_toml_str(content: &str) -> Result<CstConfig> {
        let config: CstConfig =
            toml::from_str(content).map_err(|e| CstError::config_error(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_json_str(content: &str) -> Result<CstConfig> {
        let config: CstConfig =
            serde_json::from_str(content).map_err(|e| CstError::config_error(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Load config from path or auto-discover
    ///
    /// An explicit path must exist. Without one, the search starts at
    /// `start_dir` (or the current directory) and falls back to the defaults
    /// when nothing is found.
    pub fn load(custom_path: Option<&Path>, start_dir: Option<&Path>) -> Result<CstConfig> {
        if let Some(path) = custom_path {
            if !path.exists() {
                return Err(CstError::config_error(format!(
                    "Config file not found: {}",
                    path.display()
                )));
            }
            return Self::load_from_file(path);
        }

        let search_dir = start_dir.unwrap_or_else(|| Path::new("."));
        match Self::auto_discover(search_dir)? {
            Some(path) => Self::load_from_file(&path),
            None => {
                tracing::debug!("No config file found, using defaults");
                Ok(CstConfig::default())
            }
        }
    }
}
