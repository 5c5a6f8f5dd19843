//! Event-style construction of green trees
//!
//! This is the surface an upstream parser drives: open a node, push tokens,
//! close the node. Storage comes from `rowan::GreenNodeBuilder`, whose node
//! cache already interns repeated tokens and small nodes. The wrapper keeps
//! a shadow of the builder's child stack so that a misuse surfaces as an
//! error from [`TreeBuilder::finish`] rather than a panic.

use rowan::GreenNodeBuilder;

use super::{GreenNode, SyntaxKind};
use crate::error::CstError;
use crate::result::Result;

/// Marker returned by [`TreeBuilder::checkpoint`]
#[derive(Debug, Clone, Copy)]
pub struct Checkpoint {
    inner: rowan::Checkpoint,
    position: usize,
}

/// Builder for green trees
///
/// ```rust,ignore
/// let mut builder = TreeBuilder::new();
/// builder.start_node(SyntaxKind::Literal);
/// builder.token(SyntaxKind::IntNumber, "92");
/// builder.finish_node();
/// let green = builder.finish()?;
/// ```
#[derive(Debug, Default)]
pub struct TreeBuilder {
    inner: GreenNodeBuilder<'static>,
    /// First-child index of every open node
    parents: Vec<usize>,
    /// One flag per pending child, `true` for nodes
    children: Vec<bool>,
    error: Option<String>,
}

impl TreeBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Open a new node; every element pushed until the matching
    /// [`finish_node`](Self::finish_node) becomes its child
    pub fn start_node(&mut self, kind: SyntaxKind) {
        self.parents.push(self.children.len());
        self.inner.start_node(kind.into());
    }

    /// Push a token into the currently open node
    pub fn token(&mut self, kind: SyntaxKind, text: &str) {
        self.children.push(false);
        self.inner.token(kind.into(), text);
    }

    /// Close the most recently opened node
    pub fn finish_node(&mut self) {
        let Some(first_child) = self.parents.pop() else {
            self.error
                .get_or_insert_with(|| "finish_node called without an open node".to_string());
            return;
        };
        self.children.truncate(first_child);
        self.children.push(true);
        self.inner.finish_node();
    }

    /// Remember the current position so a node can later be opened around
    /// everything pushed after it
    pub fn checkpoint(&self) -> Checkpoint {
        Checkpoint {
            inner: self.inner.checkpoint(),
            position: self.children.len(),
        }
    }

    /// Open a node whose first child is the element pushed at `checkpoint`
    ///
    /// A checkpoint taken outside the currently open node is recorded as an
    /// error; the node is then opened at the current position so the rest
    /// of the event stream stays balanced.
    pub fn start_node_at(&mut self, checkpoint: Checkpoint, kind: SyntaxKind) {
        let open_floor = self.parents.last().copied().unwrap_or(0);
        if checkpoint.position > self.children.len() || checkpoint.position < open_floor {
            self.error.get_or_insert_with(|| {
                format!(
                    "checkpoint {} is outside the currently open node",
                    checkpoint.position
                )
            });
            self.start_node(kind);
            return;
        }
        self.parents.push(checkpoint.position);
        self.inner.start_node_at(checkpoint.inner, kind.into());
    }

    /// Complete the tree, returning its single root node
    pub fn finish(mut self) -> Result<GreenNode> {
        if let Some(message) = self.error.take() {
            return Err(CstError::unbalanced_builder(message));
        }
        if !self.parents.is_empty() {
            return Err(CstError::unbalanced_builder(format!(
                "{} node(s) left open",
                self.parents.len()
            )));
        }
        match self.children.as_slice() {
            [true] => Ok(self.inner.finish()),
            [] => Err(CstError::unbalanced_builder("no root node was built")),
            _ => Err(CstError::unbalanced_builder(
                "expected exactly one root node",
            )),
        }
    }
}
