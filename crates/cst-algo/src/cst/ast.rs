//! Typed AST layer over the CST
//!
//! Each wrapper implements [`AstNode::cast`], a total downcast from the
//! generic [`SyntaxNode`] that returns `None` when the kind tag does not
//! match. Wrappers hold nothing but the node, so casting is free.
//!
//! # Example
//!
//! ```rust,ignore
//! use cst_algo::cst::ast::{AstNode, FnDef};
//!
//! let root = SyntaxNode::new_root(green);
//! let func = root.children().find_map(FnDef::cast).unwrap();
//! assert_eq!(func.name().unwrap(), "f");
//! ```

use super::{SyntaxElement, SyntaxKind, SyntaxNode, SyntaxToken};

/// Helper trait for casting CST nodes to typed wrappers
pub trait AstNode: Sized {
    fn can_cast(kind: SyntaxKind) -> bool;
    fn cast(node: SyntaxNode) -> Option<Self>;
    fn syntax(&self) -> &SyntaxNode;
}

/// Helper function to find first child of a specific kind
fn child_of_kind(parent: &SyntaxNode, kind: SyntaxKind) -> Option<SyntaxNode> {
    parent.children().find(|n| n.kind() == kind)
}

/// Helper function to find first token of a specific kind
fn token_of_kind(parent: &SyntaxNode, kind: SyntaxKind) -> Option<SyntaxToken> {
    parent
        .children_with_tokens()
        .filter_map(SyntaxElement::into_token)
        .find(|t| t.kind() == kind)
}

// ============================================================================
// SourceFile
// ============================================================================

/// Root of a parsed file
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SourceFile {
    syntax: SyntaxNode,
}

impl AstNode for SourceFile {
    fn can_cast(kind: SyntaxKind) -> bool {
        kind == SyntaxKind::SourceFile
    }

    fn cast(node: SyntaxNode) -> Option<Self> {
        if Self::can_cast(node.kind()) {
            Some(Self { syntax: node })
        } else {
            None
        }
    }

    fn syntax(&self) -> &SyntaxNode {
        &self.syntax
    }
}

impl SourceFile {
    pub fn functions(&self) -> impl Iterator<Item = FnDef> + use<> {
        self.syntax.children().filter_map(FnDef::cast)
    }
}

// ============================================================================
// FnDef
// ============================================================================

/// Function definition: fn name(params) -> Ret { body }
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct FnDef {
    syntax: SyntaxNode,
}

impl AstNode for FnDef {
    fn can_cast(kind: SyntaxKind) -> bool {
        kind == SyntaxKind::FnDef
    }

    fn cast(node: SyntaxNode) -> Option<Self> {
        if Self::can_cast(node.kind()) {
            Some(Self { syntax: node })
        } else {
            None
        }
    }

    fn syntax(&self) -> &SyntaxNode {
        &self.syntax
    }
}

impl FnDef {
    /// Get the function name text
    pub fn name(&self) -> Option<String> {
        self.name_node().and_then(|name| name.text())
    }

    pub fn name_node(&self) -> Option<Name> {
        child_of_kind(&self.syntax, SyntaxKind::Name).and_then(Name::cast)
    }

    pub fn param_list(&self) -> Option<ParamList> {
        child_of_kind(&self.syntax, SyntaxKind::ParamList).and_then(ParamList::cast)
    }

    pub fn body(&self) -> Option<BlockExpr> {
        child_of_kind(&self.syntax, SyntaxKind::BlockExpr).and_then(BlockExpr::cast)
    }
}

// ============================================================================
// Name
// ============================================================================

/// Binding name in a definition
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Name {
    syntax: SyntaxNode,
}

impl AstNode for Name {
    fn can_cast(kind: SyntaxKind) -> bool {
        kind == SyntaxKind::Name
    }

    fn cast(node: SyntaxNode) -> Option<Self> {
        if Self::can_cast(node.kind()) {
            Some(Self { syntax: node })
        } else {
            None
        }
    }

    fn syntax(&self) -> &SyntaxNode {
        &self.syntax
    }
}

impl Name {
    pub fn ident_token(&self) -> Option<SyntaxToken> {
        token_of_kind(&self.syntax, SyntaxKind::Ident)
    }

    pub fn text(&self) -> Option<String> {
        self.ident_token().map(|t| t.text().to_string())
    }
}

// ============================================================================
// ParamList / Param
// ============================================================================

/// Parenthesized parameter list of a function
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ParamList {
    syntax: SyntaxNode,
}

impl AstNode for ParamList {
    fn can_cast(kind: SyntaxKind) -> bool {
        kind == SyntaxKind::ParamList
    }

    fn cast(node: SyntaxNode) -> Option<Self> {
        if Self::can_cast(node.kind()) {
            Some(Self { syntax: node })
        } else {
            None
        }
    }

    fn syntax(&self) -> &SyntaxNode {
        &self.syntax
    }
}

impl ParamList {
    pub fn params(&self) -> impl Iterator<Item = Param> + use<> {
        self.syntax.children().filter_map(Param::cast)
    }
}

/// Single parameter: name: Type
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Param {
    syntax: SyntaxNode,
}

impl AstNode for Param {
    fn can_cast(kind: SyntaxKind) -> bool {
        kind == SyntaxKind::Param
    }

    fn cast(node: SyntaxNode) -> Option<Self> {
        if Self::can_cast(node.kind()) {
            Some(Self { syntax: node })
        } else {
            None
        }
    }

    fn syntax(&self) -> &SyntaxNode {
        &self.syntax
    }
}

impl Param {
    pub fn name(&self) -> Option<Name> {
        child_of_kind(&self.syntax, SyntaxKind::Name).and_then(Name::cast)
    }
}

// ============================================================================
// BlockExpr / statements
// ============================================================================

/// Braced block: { stmts tail }
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct BlockExpr {
    syntax: SyntaxNode,
}

impl AstNode for BlockExpr {
    fn can_cast(kind: SyntaxKind) -> bool {
        kind == SyntaxKind::BlockExpr
    }

    fn cast(node: SyntaxNode) -> Option<Self> {
        if Self::can_cast(node.kind()) {
            Some(Self { syntax: node })
        } else {
            None
        }
    }

    fn syntax(&self) -> &SyntaxNode {
        &self.syntax
    }
}

impl BlockExpr {
    pub fn let_stmts(&self) -> impl Iterator<Item = LetStmt> + use<> {
        self.syntax.children().filter_map(LetStmt::cast)
    }

    /// Trailing expression without a semicolon, if any
    pub fn tail_expr(&self) -> Option<SyntaxNode> {
        self.syntax
            .children()
            .filter(|n| !matches!(n.kind(), SyntaxKind::LetStmt | SyntaxKind::ExprStmt))
            .last()
    }

    pub fn l_brace(&self) -> Option<SyntaxToken> {
        token_of_kind(&self.syntax, SyntaxKind::LBrace)
    }

    pub fn r_brace(&self) -> Option<SyntaxToken> {
        token_of_kind(&self.syntax, SyntaxKind::RBrace)
    }
}

/// let name = init;
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct LetStmt {
    syntax: SyntaxNode,
}

impl AstNode for LetStmt {
    fn can_cast(kind: SyntaxKind) -> bool {
        kind == SyntaxKind::LetStmt
    }

    fn cast(node: SyntaxNode) -> Option<Self> {
        if Self::can_cast(node.kind()) {
            Some(Self { syntax: node })
        } else {
            None
        }
    }

    fn syntax(&self) -> &SyntaxNode {
        &self.syntax
    }
}

impl LetStmt {
    pub fn name(&self) -> Option<Name> {
        child_of_kind(&self.syntax, SyntaxKind::Name).and_then(Name::cast)
    }

    /// Initializer expression after `=`
    pub fn initializer(&self) -> Option<SyntaxNode> {
        self.syntax.children().find(|n| n.kind() != SyntaxKind::Name)
    }
}

/// Expression followed by a semicolon
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ExprStmt {
    syntax: SyntaxNode,
}

impl AstNode for ExprStmt {
    fn can_cast(kind: SyntaxKind) -> bool {
        kind == SyntaxKind::ExprStmt
    }

    fn cast(node: SyntaxNode) -> Option<Self> {
        if Self::can_cast(node.kind()) {
            Some(Self { syntax: node })
        } else {
            None
        }
    }

    fn syntax(&self) -> &SyntaxNode {
        &self.syntax
    }
}

impl ExprStmt {
    pub fn expr(&self) -> Option<SyntaxNode> {
        self.syntax.first_child()
    }
}

// ============================================================================
// Expressions
// ============================================================================

/// Binary expression: lhs op rhs
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct BinExpr {
    syntax: SyntaxNode,
}

impl AstNode for BinExpr {
    fn can_cast(kind: SyntaxKind) -> bool {
        kind == SyntaxKind::BinExpr
    }

    fn cast(node: SyntaxNode) -> Option<Self> {
        if Self::can_cast(node.kind()) {
            Some(Self { syntax: node })
        } else {
            None
        }
    }

    fn syntax(&self) -> &SyntaxNode {
        &self.syntax
    }
}

impl BinExpr {
    pub fn lhs(&self) -> Option<SyntaxNode> {
        self.syntax.children().next()
    }

    pub fn rhs(&self) -> Option<SyntaxNode> {
        self.syntax.children().nth(1)
    }

    /// Operator token, skipping surrounding trivia
    pub fn op_token(&self) -> Option<SyntaxToken> {
        self.syntax
            .children_with_tokens()
            .filter_map(SyntaxElement::into_token)
            .find(|t| !t.kind().is_trivia())
    }
}

/// Literal value: integer, string or boolean
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Literal {
    syntax: SyntaxNode,
}

impl AstNode for Literal {
    fn can_cast(kind: SyntaxKind) -> bool {
        kind == SyntaxKind::Literal
    }

    fn cast(node: SyntaxNode) -> Option<Self> {
        if Self::can_cast(node.kind()) {
            Some(Self { syntax: node })
        } else {
            None
        }
    }

    fn syntax(&self) -> &SyntaxNode {
        &self.syntax
    }
}

impl Literal {
    pub fn token(&self) -> Option<SyntaxToken> {
        self.syntax
            .children_with_tokens()
            .filter_map(SyntaxElement::into_token)
            .find(|t| t.kind().is_literal())
    }

    /// Value of an integer literal
    pub fn as_int(&self) -> Option<i64> {
        let token = self.token()?;
        if token.kind() != SyntaxKind::IntNumber {
            return None;
        }
        token.text().parse().ok()
    }
}

/// Reference to a named value
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct PathExpr {
    syntax: SyntaxNode,
}

impl AstNode for PathExpr {
    fn can_cast(kind: SyntaxKind) -> bool {
        kind == SyntaxKind::PathExpr
    }

    fn cast(node: SyntaxNode) -> Option<Self> {
        if Self::can_cast(node.kind()) {
            Some(Self { syntax: node })
        } else {
            None
        }
    }

    fn syntax(&self) -> &SyntaxNode {
        &self.syntax
    }
}

impl PathExpr {
    pub fn name(&self) -> Option<String> {
        self.syntax
            .descendants_with_tokens()
            .filter_map(SyntaxElement::into_token)
            .find(|t| t.kind() == SyntaxKind::Ident)
            .map(|t| t.text().to_string())
    }
}

/// Call expression: callee(args)
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CallExpr {
    syntax: SyntaxNode,
}

impl AstNode for CallExpr {
    fn can_cast(kind: SyntaxKind) -> bool {
        kind == SyntaxKind::CallExpr
    }

    fn cast(node: SyntaxNode) -> Option<Self> {
        if Self::can_cast(node.kind()) {
            Some(Self { syntax: node })
        } else {
            None
        }
    }

    fn syntax(&self) -> &SyntaxNode {
        &self.syntax
    }
}

impl CallExpr {
    pub fn callee(&self) -> Option<SyntaxNode> {
        self.syntax.first_child()
    }

    /// Argument expressions inside the parentheses
    pub fn args(&self) -> impl Iterator<Item = SyntaxNode> + use<> {
        child_of_kind(&self.syntax, SyntaxKind::ArgList)
            .into_iter()
            .flat_map(|list| list.children())
    }
}
