//! Algorithms over syntax trees
//!
//! - [`offset`]: read-only lookups by text offset or range
//! - [`diff`]: edit scripts between two tree versions
//! - [`edit`]: copy-on-write structural edits
//! - [`incremental`]: keeping a tree in sync with text edits

pub mod diff;
pub mod edit;
pub mod incremental;
pub mod offset;

pub use diff::{DiffOp, InsertPosition, TreeDiff, diff, diff_with_config};
pub use edit::{insert_children, replace_children, replace_descendants, replace_with};
pub use incremental::{
    IncrementalUpdater, Reparse, TextEdit, UpdateMetrics, UpdateResult, UpdateStrategy,
    apply_text_edits, relex_token,
};
pub use offset::{
    AncestorsAtOffset, ancestors_at_offset, find_covering_element, find_node_at_offset,
    find_node_at_offset_by_kind, find_node_at_range, non_trivia_sibling, token_at_offset,
};
