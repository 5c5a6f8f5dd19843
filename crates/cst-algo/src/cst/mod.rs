//! Concrete Syntax Tree (CST) model
//!
//! The CST is lossless: every byte of the source, whitespace and comments
//! included, lives in some token, so `root.text()` reproduces the input.
//!
//! ## Architecture
//!
//! Trees are `rowan` trees over [`CstLanguage`]:
//!
//! - **Green tree** ([`GreenNode`], [`GreenToken`]): immutable,
//!   position-independent storage. Unchanged green subtrees are shared
//!   between tree versions, so an edit only allocates along the edited path.
//!
//! - **Positioned view** ([`SyntaxNode`], [`SyntaxToken`], [`SyntaxElement`]):
//!   a green element plus its absolute offset and parent. Ranges and parents
//!   are derived here, never stored in the green layer.
//!
//! ## Example
//!
//! ```rust,ignore
//! use cst_algo::cst::{SyntaxKind, SyntaxNode, TreeBuilder};
//!
//! let mut builder = TreeBuilder::new();
//! builder.start_node(SyntaxKind::Literal);
//! builder.token(SyntaxKind::IntNumber, "42");
//! builder.finish_node();
//!
//! let root = SyntaxNode::new_root(builder.finish()?);
//! assert_eq!(root.text(), "42");
//! ```

mod builder;
mod language;
mod syntax_kind;

pub mod ast;

pub use builder::{Checkpoint, TreeBuilder};
pub use language::{
    CstLanguage, GreenElement, SyntaxElement, SyntaxElementChildren, SyntaxNode,
    SyntaxNodeChildren, SyntaxToken, shares_green, tree_root,
};
pub use rowan::{
    Direction, GreenNode, GreenNodeData, GreenToken, GreenTokenData, NodeOrToken, TokenAtOffset,
    WalkEvent,
};
pub use syntax_kind::SyntaxKind;
