//! cst-algo
//!
//! Algorithms over lossless concrete syntax trees: locating elements by text
//! offset, computing edit scripts between two tree versions, and applying
//! structural edits that produce a new tree while sharing every unchanged
//! subtree with the old one.

pub mod algo;
pub mod config;
pub mod cst; // Concrete Syntax Tree (rowan trees over our kinds)
pub mod error;
pub mod result;

#[cfg(test)]
pub(crate) mod test_utils;

// Re-export commonly used types
pub use algo::{
    DiffOp, IncrementalUpdater, InsertPosition, Reparse, TextEdit, TreeDiff, UpdateMetrics,
    UpdateResult, UpdateStrategy, ancestors_at_offset, diff, find_covering_element,
    find_node_at_offset, insert_children, non_trivia_sibling, replace_children,
    replace_descendants,
};
pub use config::{ConfigLoader, CstConfig, DiffConfig, IncrementalConfig};
pub use cst::{
    CstLanguage, Direction, GreenElement, GreenNode, GreenToken, NodeOrToken, SyntaxElement,
    SyntaxKind, SyntaxNode, SyntaxToken, TokenAtOffset, TreeBuilder, shares_green, tree_root,
};
pub use error::{CstError, ErrorKind};
pub use result::{Result, ResultExt};
pub use rowan::{TextRange, TextSize};

/// Initialize the tracing subscriber for logging
///
/// `RUST_LOG` overrides the default `cst_algo=info` filter. Calling this more
/// than once is harmless.
pub fn init_tracing() {
    use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("cst_algo=info"));

    let _ = tracing_subscriber::registry()
        .with(filter)
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(false)
                .with_thread_ids(false)
                .with_file(true)
                .with_line_number(true),
        )
        .try_init();
}

/// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
pub const NAME: &str = env!("CARGO_PKG_NAME");
