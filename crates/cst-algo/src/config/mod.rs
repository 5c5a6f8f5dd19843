//! Configuration for cst-algo
//!
//! Every field has a default, so configuration is optional. When a file is
//! used it is either TOML or JSON, with camelCase keys:
//!
//! ```toml
//! [diff]
//! maxAlignmentCells = 1048576
//!
//! [incremental]
//! relexTokens = true
//! maxRelexLen = 1024
//! ```
//!
//! ## Configuration Discovery
//!
//! [`ConfigLoader::load`] without an explicit path searches for
//! `cst-algo.toml` or `cst-algo.json` starting from the given directory and
//! moving up the directory tree.

mod cst_config;
mod loader;

pub use cst_config::{CstConfig, DiffConfig, IncrementalConfig};
pub use loader::{CONFIG_FILE_NAMES, ConfigLoader};
