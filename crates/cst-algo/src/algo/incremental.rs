//! Incremental tree updates
//!
//! An edited text is brought back into tree form in one of two ways:
//!
//! - **Token relex**: the edit stays inside one token whose kind is decided
//!   by its own characters (whitespace, comment, identifier, number,
//!   string), and the edited text is still exactly one such token. The
//!   token is swapped and nothing else is touched.
//! - **Reparse**: the caller's parser produces a fresh tree for the new
//!   text, [`diff`](super::diff::diff_with_config) compares it against the
//!   old one, and the old tree is patched with the result. Everything the
//!   edit did not change keeps the old tree's storage.
//!
//! # Example
//!
//! ```rust,ignore
//! use cst_algo::algo::incremental::{IncrementalUpdater, TextEdit};
//!
//! let updater = IncrementalUpdater::new();
//! let edit = TextEdit::replace_range(13..14, "2")?;
//!
//! let result = updater.apply_edit(&root, &edit, &my_parser)?;
//! assert_eq!(result.root.text(), "fn f() { 1 + 2 }");
//! ```

use std::collections::HashSet;
use std::time::Instant;

use rowan::{TextRange, TextSize};
use tracing::debug;

use super::diff::{DiffOp, TreeDiff, diff_with_config};
use super::edit::replace_descendants;
use super::offset::{find_covering_element, token_at_offset};
use crate::config::{CstConfig, DiffConfig, IncrementalConfig};
use crate::cst::{
    Direction, GreenNode, GreenNodeData, GreenToken, NodeOrToken, SyntaxElement, SyntaxNode,
    SyntaxToken, tree_root,
};
use crate::error::CstError;
use crate::result::{Result, ResultExt};

/// Represents a text edit operation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextEdit {
    /// Range to replace
    pub range: TextRange,
    /// New text to insert
    pub new_text: String,
}

impl TextEdit {
    pub fn new(range: TextRange, new_text: String) -> Self {
        Self { range, new_text }
    }

    /// Create a replacement edit
    pub fn replace(range: impl Into<TextRange>, new_text: impl Into<String>) -> Self {
        Self {
            range: range.into(),
            new_text: new_text.into(),
        }
    }

    /// Create a replacement edit from a byte range
    ///
    /// Fails when an end of `range` does not fit a [`TextSize`].
    pub fn replace_range(
        range: std::ops::Range<usize>,
        new_text: impl Into<String>,
    ) -> Result<Self> {
        Ok(Self {
            range: range_to_text_range(range)?,
            new_text: new_text.into(),
        })
    }

    /// Create an insertion edit
    pub fn insert(position: TextSize, text: impl Into<String>) -> Self {
        Self {
            range: TextRange::empty(position),
            new_text: text.into(),
        }
    }

    /// Create a deletion edit
    pub fn delete(range: impl Into<TextRange>) -> Self {
        Self {
            range: range.into(),
            new_text: String::new(),
        }
    }

    pub fn is_insertion(&self) -> bool {
        self.range.is_empty() && !self.new_text.is_empty()
    }

    pub fn is_deletion(&self) -> bool {
        !self.range.is_empty() && self.new_text.is_empty()
    }

    pub fn is_replacement(&self) -> bool {
        !self.range.is_empty() && !self.new_text.is_empty()
    }

    /// Get the length change caused by this edit
    pub fn length_delta(&self) -> i64 {
        self.new_text.len() as i64 - i64::from(u32::from(self.range.len()))
    }

    /// Apply this edit to `text`
    ///
    /// Fails when the range does not fit `text` or splits a character.
    pub fn apply(&self, text: &str) -> Result<String> {
        apply_text_edits(text, std::slice::from_ref(self))
    }
}

impl From<(TextRange, String)> for TextEdit {
    fn from((range, new_text): (TextRange, String)) -> Self {
        Self::new(range, new_text)
    }
}

impl TryFrom<(std::ops::Range<usize>, &str)> for TextEdit {
    type Error = CstError;

    fn try_from((range, new_text): (std::ops::Range<usize>, &str)) -> Result<Self> {
        Self::replace_range(range, new_text)
    }
}

fn range_to_text_range(range: std::ops::Range<usize>) -> Result<TextRange> {
    let addressable = TextRange::up_to(TextSize::from(u32::MAX));
    let saturate = |offset: usize| TextSize::try_from(offset).unwrap_or(addressable.end());
    match (TextSize::try_from(range.start), TextSize::try_from(range.end)) {
        (Ok(start), Ok(end)) if start <= end => Ok(TextRange::new(start, end)),
        _ => {
            let (start, end) = (saturate(range.start), saturate(range.end));
            Err(CstError::RangeOutOfBounds {
                requested: TextRange::new(start.min(end), start.max(end)),
                range: addressable,
            })
        }
    }
}

/// Apply a batch of edits, all expressed against the original `text`
///
/// Edits may come in any order. Insertions at the same offset keep their
/// relative order. Overlapping edits fail with
/// [`CstError::OverlappingEdits`].
pub fn apply_text_edits(text: &str, edits: &[TextEdit]) -> Result<String> {
    let mut sorted: Vec<&TextEdit> = edits.iter().collect();
    sorted.sort_by_key(|edit| (edit.range.start(), edit.range.end()));

    for pair in sorted.windows(2) {
        if pair[0].range.end() > pair[1].range.start() {
            return Err(CstError::OverlappingEdits {
                first: pair[0].range,
                second: pair[1].range,
            });
        }
    }

    let text_range = TextRange::up_to(TextSize::of(text));
    let mut result = String::with_capacity(text.len());
    let mut cursor = 0;
    for edit in sorted {
        let start = usize::from(edit.range.start());
        let end = usize::from(edit.range.end());
        if !text_range.contains_range(edit.range)
            || !text.is_char_boundary(start)
            || !text.is_char_boundary(end)
        {
            return Err(CstError::RangeOutOfBounds {
                requested: edit.range,
                range: text_range,
            });
        }
        result.push_str(&text[cursor..start]);
        result.push_str(&edit.new_text);
        cursor = end;
    }
    result.push_str(&text[cursor..]);
    Ok(result)
}

/// Patch a single token in place when `edit` keeps it a valid token
///
/// Returns a one-operation diff replacing the token, or `None` when the edit
/// spans several tokens, touches a kind that cannot be relexed on its own,
/// or would make the token merge with a neighbour.
pub fn relex_token(root: &SyntaxNode, edit: &TextEdit) -> Option<TreeDiff> {
    let candidates: Vec<SyntaxToken> = if edit.range.is_empty() {
        token_at_offset(root, edit.range.start())
            .log_and_continue()?
            .collect()
    } else {
        find_covering_element(root, edit.range)
            .log_and_continue()?
            .into_token()
            .into_iter()
            .collect()
    };

    let op = candidates
        .into_iter()
        .find_map(|token| relex_one(&token, edit))?;
    Some(std::iter::once(op).collect())
}

fn relex_one(token: &SyntaxToken, edit: &TextEdit) -> Option<DiffOp> {
    let kind = token.kind();
    let range = token.text_range();
    if !range.contains_range(edit.range) {
        return None;
    }
    let start = usize::from(edit.range.start() - range.start());
    let end = usize::from(edit.range.end() - range.start());
    let old_text = token.text();
    if !old_text.is_char_boundary(start) || !old_text.is_char_boundary(end) {
        return None;
    }

    let mut new_text = old_text.to_string();
    new_text.replace_range(start..end, &edit.new_text);
    if !kind.accepts_text(&new_text) {
        return None;
    }

    // The previous token must not swallow our first character, and we must
    // not swallow the next token's first character
    if let Some(prev) = adjacent_token(token, Direction::Prev) {
        let first = new_text.chars().next()?;
        if prev.kind().accepts_text(&format!("{}{first}", prev.text())) {
            return None;
        }
    }
    if let Some(next) = adjacent_token(token, Direction::Next) {
        if let Some(first) = next.text().chars().next() {
            if kind.accepts_text(&format!("{new_text}{first}")) {
                return None;
            }
        }
    }

    Some(DiffOp::Replace {
        old: NodeOrToken::Token(token.clone()),
        new: GreenToken::new(kind.into(), &new_text).into(),
    })
}

/// Nearest non-empty token before or after `token` in text order
///
/// Unlike `SyntaxToken::next_token`, this steps over nodes without tokens.
fn adjacent_token(token: &SyntaxToken, direction: Direction) -> Option<SyntaxToken> {
    let mut element: SyntaxElement = NodeOrToken::Token(token.clone());
    loop {
        let sibling = match direction {
            Direction::Next => element.next_sibling_or_token(),
            Direction::Prev => element.prev_sibling_or_token(),
        };
        let Some(sibling) = sibling else {
            element = NodeOrToken::Node(element.parent()?);
            continue;
        };
        let found = match &sibling {
            NodeOrToken::Token(token) => Some(token.clone()),
            NodeOrToken::Node(node) => {
                let mut tokens = node
                    .descendants_with_tokens()
                    .filter_map(SyntaxElement::into_token);
                match direction {
                    Direction::Next => tokens.next(),
                    Direction::Prev => tokens.last(),
                }
            }
        };
        match found {
            Some(token) if !token.text().is_empty() => return Some(token),
            _ => element = sibling,
        }
    }
}

/// Source of fresh trees for the reparse strategy
pub trait Reparse {
    fn reparse(&self, text: &str) -> GreenNode;
}

impl<F> Reparse for F
where
    F: Fn(&str) -> GreenNode,
{
    fn reparse(&self, text: &str) -> GreenNode {
        self(text)
    }
}

/// How an update was carried out
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum UpdateStrategy {
    /// A single token was patched
    TokenRelex,
    /// The text was reparsed and the old tree patched with the diff
    #[default]
    Reparse,
}

/// Result of an incremental update operation
#[derive(Debug, Clone)]
pub struct UpdateResult {
    /// Root of the updated tree
    pub root: SyntaxNode,
    /// Script that was applied to the old tree
    pub diff: TreeDiff,
    /// Performance metrics
    pub metrics: UpdateMetrics,
}

/// Performance metrics for incremental updates
#[derive(Debug, Clone, Default)]
pub struct UpdateMetrics {
    pub strategy: UpdateStrategy,
    /// Number of operations in the applied diff
    pub ops: usize,
    /// Time taken for the update (in microseconds)
    pub update_time_us: u64,
    /// Nodes of the new tree that were built for this update
    pub nodes_rebuilt: usize,
    /// Nodes of the new tree shared with the old tree
    pub nodes_reused: usize,
    /// Old-text range touched by the applied diff
    pub affected_range: Option<TextRange>,
}

impl UpdateMetrics {
    /// Calculate the reuse ratio (0.0 to 1.0)
    pub fn reuse_ratio(&self) -> f64 {
        let total = self.nodes_rebuilt + self.nodes_reused;
        if total == 0 {
            0.0
        } else {
            self.nodes_reused as f64 / total as f64
        }
    }

    /// Check if the update was efficient (high reuse ratio)
    pub fn is_efficient(&self) -> bool {
        self.reuse_ratio() > 0.7
    }
}

/// Keeps a tree in sync with edits of its text
#[derive(Debug, Clone, Default)]
pub struct IncrementalUpdater {
    config: IncrementalConfig,
    diff_config: DiffConfig,
}

impl IncrementalUpdater {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(config: &CstConfig) -> Self {
        Self {
            config: config.incremental.clone(),
            diff_config: config.diff.clone(),
        }
    }

    /// Enable or disable the token relex strategy
    pub fn relex_tokens(mut self, enabled: bool) -> Self {
        self.config.relex_tokens = enabled;
        self
    }

    /// Apply a single text edit to the tree `root` belongs to
    ///
    /// The returned root is a new tree version; `root` stays valid.
    pub fn apply_edit(
        &self,
        root: &SyntaxNode,
        edit: &TextEdit,
        reparser: &impl Reparse,
    ) -> Result<UpdateResult> {
        let start_time = Instant::now();
        let root = tree_root(root);
        let text_range = root.text_range();
        if !text_range.contains_range(edit.range) {
            return Err(CstError::RangeOutOfBounds {
                requested: edit.range,
                range: text_range,
            });
        }

        if let Some(diff) = self.try_relex(&root, edit) {
            return self.finish(&root, diff, UpdateStrategy::TokenRelex, start_time);
        }
        let new_text = edit.apply(&root.text().to_string())?;
        self.reparse(&root, &new_text, reparser, start_time)
    }

    /// Apply several edits, all expressed against the current text
    ///
    /// A single edit goes through [`apply_edit`](Self::apply_edit); a batch
    /// is always reparsed.
    pub fn apply_edits(
        &self,
        root: &SyntaxNode,
        edits: &[TextEdit],
        reparser: &impl Reparse,
    ) -> Result<UpdateResult> {
        match edits {
            [] => Ok(UpdateResult {
                root: tree_root(root),
                diff: TreeDiff::new(),
                metrics: UpdateMetrics::default(),
            }),
            [edit] => self.apply_edit(root, edit, reparser),
            _ => {
                let start_time = Instant::now();
                let root = tree_root(root);
                let new_text = apply_text_edits(&root.text().to_string(), edits)?;
                self.reparse(&root, &new_text, reparser, start_time)
            }
        }
    }

    fn try_relex(&self, root: &SyntaxNode, edit: &TextEdit) -> Option<TreeDiff> {
        if !self.config.relex_tokens {
            return None;
        }
        let diff = relex_token(root, edit)?;
        let fits = diff.iter().all(|op| match op {
            DiffOp::Replace { new, .. } => usize::from(new.text_len()) <= self.config.max_relex_len,
            _ => false,
        });
        fits.then_some(diff)
    }

    fn reparse(
        &self,
        root: &SyntaxNode,
        new_text: &str,
        reparser: &impl Reparse,
        start_time: Instant,
    ) -> Result<UpdateResult> {
        let fresh = SyntaxNode::new_root(reparser.reparse(new_text));
        if fresh.text() != new_text {
            debug!("reparsed tree does not reproduce the edited text");
        }
        let diff = diff_with_config(root, &fresh, &self.diff_config);
        self.finish(root, diff, UpdateStrategy::Reparse, start_time)
    }

    fn finish(
        &self,
        root: &SyntaxNode,
        diff: TreeDiff,
        strategy: UpdateStrategy,
        start_time: Instant,
    ) -> Result<UpdateResult> {
        let patched = replace_descendants(root, &diff)?;
        let (nodes_reused, nodes_rebuilt) = count_reuse(root, &patched);
        let affected_range = diff
            .iter()
            .map(|op| op.to_text_edit().range)
            .reduce(|a, b| a.cover(b));

        let metrics = UpdateMetrics {
            strategy,
            ops: diff.len(),
            update_time_us: start_time.elapsed().as_micros() as u64,
            nodes_rebuilt,
            nodes_reused,
            affected_range,
        };
        debug!(
            strategy = ?metrics.strategy,
            ops = metrics.ops,
            reused = metrics.nodes_reused,
            rebuilt = metrics.nodes_rebuilt,
            time_us = metrics.update_time_us,
            "applied incremental update"
        );

        Ok(UpdateResult {
            root: patched,
            diff,
            metrics,
        })
    }
}

fn green_ptr(node: &SyntaxNode) -> *const GreenNodeData {
    &*node.green()
}

/// Count nodes of `new` whose storage also appears in `old`, and the rest
fn count_reuse(old: &SyntaxNode, new: &SyntaxNode) -> (usize, usize) {
    let old_nodes: HashSet<*const GreenNodeData> =
        old.descendants().map(|node| green_ptr(&node)).collect();
    new.descendants()
        .fold((0, 0), |(reused, rebuilt), node| {
            if old_nodes.contains(&green_ptr(&node)) {
                (reused + 1, rebuilt)
            } else {
                (reused, rebuilt + 1)
            }
        })
}
