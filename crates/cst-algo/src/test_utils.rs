//! Tree fixtures shared by unit tests

use crate::cst::{GreenNode, SyntaxKind, SyntaxNode, TreeBuilder};

/// Green tree for `fn {name}() { {lhs} + {rhs} }`
pub(crate) fn sample_fn_green(name: &str, lhs: &str, rhs: &str) -> GreenNode {
    let mut b = TreeBuilder::new();
    b.start_node(SyntaxKind::SourceFile);
    b.start_node(SyntaxKind::FnDef);
    b.token(SyntaxKind::FnKw, "fn");
    b.token(SyntaxKind::Whitespace, " ");
    b.start_node(SyntaxKind::Name);
    b.token(SyntaxKind::Ident, name);
    b.finish_node();
    b.start_node(SyntaxKind::ParamList);
    b.token(SyntaxKind::LParen, "(");
    b.token(SyntaxKind::RParen, ")");
    b.finish_node();
    b.token(SyntaxKind::Whitespace, " ");
    b.start_node(SyntaxKind::BlockExpr);
    b.token(SyntaxKind::LBrace, "{");
    b.token(SyntaxKind::Whitespace, " ");
    b.start_node(SyntaxKind::BinExpr);
    b.start_node(SyntaxKind::Literal);
    b.token(SyntaxKind::IntNumber, lhs);
    b.finish_node();
    b.token(SyntaxKind::Whitespace, " ");
    b.token(SyntaxKind::Plus, "+");
    b.token(SyntaxKind::Whitespace, " ");
    b.start_node(SyntaxKind::Literal);
    b.token(SyntaxKind::IntNumber, rhs);
    b.finish_node();
    b.finish_node();
    b.token(SyntaxKind::Whitespace, " ");
    b.token(SyntaxKind::RBrace, "}");
    b.finish_node();
    b.finish_node();
    b.finish_node();
    b.finish().expect("fixture tree is balanced")
}

/// Positioned root for `fn {name}() { {lhs} + {rhs} }`
pub(crate) fn sample_fn(name: &str, lhs: &str, rhs: &str) -> SyntaxNode {
    SyntaxNode::new_root(sample_fn_green(name, lhs, rhs))
}

/// `ArgList` node holding one `PathExpr` per name, without separators
pub(crate) fn path_list(names: &[&str]) -> SyntaxNode {
    let mut b = TreeBuilder::new();
    b.start_node(SyntaxKind::ArgList);
    for name in names {
        b.start_node(SyntaxKind::PathExpr);
        b.token(SyntaxKind::Ident, name);
        b.finish_node();
    }
    b.finish_node();
    SyntaxNode::new_root(b.finish().expect("fixture tree is balanced"))
}

/// Detached `PathExpr` green node for `name`
pub(crate) fn path_green(name: &str) -> GreenNode {
    let mut b = TreeBuilder::new();
    b.start_node(SyntaxKind::PathExpr);
    b.token(SyntaxKind::Ident, name);
    b.finish_node();
    b.finish().expect("fixture tree is balanced")
}

/// Parse a line of words: identifiers become `PathExpr`, digit runs
/// `Literal`, whitespace runs stay loose tokens, anything else is `Error`
pub(crate) fn parse_words(text: &str) -> GreenNode {
    let mut b = TreeBuilder::new();
    b.start_node(SyntaxKind::ArgList);
    let mut rest = text;
    while let Some(first) = rest.chars().next() {
        let class = |c: char| {
            if c.is_whitespace() {
                0
            } else if c.is_alphanumeric() || c == '_' {
                1
            } else {
                2
            }
        };
        let len = rest
            .char_indices()
            .find(|&(_, c)| class(c) != class(first) || class(c) == 2)
            .map_or(rest.len(), |(i, _)| i)
            .max(first.len_utf8());
        let (word, tail) = rest.split_at(len);
        rest = tail;
        match class(first) {
            0 => b.token(SyntaxKind::Whitespace, word),
            1 if first.is_ascii_digit() => {
                b.start_node(SyntaxKind::Literal);
                b.token(SyntaxKind::IntNumber, word);
                b.finish_node();
            }
            1 => {
                b.start_node(SyntaxKind::PathExpr);
                b.token(SyntaxKind::Ident, word);
                b.finish_node();
            }
            _ => b.token(SyntaxKind::Error, word),
        }
    }
    b.finish_node();
    b.finish().expect("word list is balanced")
}

/// Names of the `PathExpr` children of `node`, in order
pub(crate) fn child_names(node: &SyntaxNode) -> Vec<String> {
    node.children().map(|child| child.text().to_string()).collect()
}
