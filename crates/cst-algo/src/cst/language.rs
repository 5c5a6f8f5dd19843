//! Rowan language binding for [`SyntaxKind`]
//!
//! Storage and navigation come from `rowan`; this module only ties its
//! generic tree types to our kind enum and names them.

use rowan::{GreenNodeData, Language, NodeOrToken};

use super::SyntaxKind;

/// Language marker for `rowan`
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct CstLanguage;

impl Language for CstLanguage {
    type Kind = SyntaxKind;

    fn kind_from_raw(raw: rowan::SyntaxKind) -> Self::Kind {
        SyntaxKind::from_raw(raw.0).unwrap_or(SyntaxKind::Error)
    }

    fn kind_to_raw(kind: Self::Kind) -> rowan::SyntaxKind {
        rowan::SyntaxKind(kind.to_raw())
    }
}

impl From<SyntaxKind> for rowan::SyntaxKind {
    fn from(kind: SyntaxKind) -> Self {
        CstLanguage::kind_to_raw(kind)
    }
}

impl From<rowan::SyntaxKind> for SyntaxKind {
    fn from(raw: rowan::SyntaxKind) -> Self {
        CstLanguage::kind_from_raw(raw)
    }
}

pub type SyntaxNode = rowan::SyntaxNode<CstLanguage>;
pub type SyntaxToken = rowan::SyntaxToken<CstLanguage>;
pub type SyntaxElement = rowan::SyntaxElement<CstLanguage>;
pub type SyntaxNodeChildren = rowan::SyntaxNodeChildren<CstLanguage>;
pub type SyntaxElementChildren = rowan::SyntaxElementChildren<CstLanguage>;

/// Owned green child, as taken by `GreenNodeData::splice_children`
pub type GreenElement = NodeOrToken<rowan::GreenNode, rowan::GreenToken>;

/// Root of the tree `node` belongs to
pub fn tree_root(node: &SyntaxNode) -> SyntaxNode {
    node.ancestors().last().unwrap_or_else(|| node.clone())
}

/// Whether two nodes are backed by the same green storage
///
/// Position is ignored: a subtree carried over unchanged into a new tree
/// version shares storage with the old one.
pub fn shares_green(a: &SyntaxNode, b: &SyntaxNode) -> bool {
    std::ptr::eq::<GreenNodeData>(&*a.green(), &*b.green())
}
