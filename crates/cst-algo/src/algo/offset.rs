//! Offset and range lookups over a positioned tree
//!
//! Every function here is read-only. Offsets are absolute; a lookup rooted
//! at a subtree only accepts offsets inside that subtree, but the ancestor
//! chains it returns still run up to the real tree root.
//!
//! Boundary convention: when an offset sits between two elements, the one
//! that starts at the offset (the right-hand one) wins. At the very end of
//! the text there is no right-hand element and the last token is used.

use rowan::{TextRange, TextSize, TokenAtOffset};

use crate::cst::ast::AstNode;
use crate::cst::{Direction, NodeOrToken, SyntaxElement, SyntaxKind, SyntaxNode, SyntaxToken};
use crate::error::CstError;
use crate::result::Result;

fn check_offset(root: &SyntaxNode, offset: TextSize) -> Result<()> {
    let range = root.text_range();
    if range.contains_inclusive(offset) {
        Ok(())
    } else {
        Err(CstError::OffsetOutOfRange { offset, range })
    }
}

fn check_range(root: &SyntaxNode, range: TextRange) -> Result<()> {
    let root_range = root.text_range();
    if root_range.contains_range(range) {
        Ok(())
    } else {
        Err(CstError::RangeOutOfBounds {
            requested: range,
            range: root_range,
        })
    }
}

/// Find the token(s) touching `offset`
///
/// Fails with a lookup error when `offset` is outside `root`, where
/// `SyntaxNode::token_at_offset` would panic.
pub fn token_at_offset(root: &SyntaxNode, offset: TextSize) -> Result<TokenAtOffset<SyntaxToken>> {
    check_offset(root, offset)?;
    Ok(root.token_at_offset(offset))
}

/// Lazy innermost-to-outermost walk produced by [`ancestors_at_offset`]
///
/// Cloning the iterator restarts the walk from the current position.
#[derive(Debug, Clone)]
pub struct AncestorsAtOffset {
    next: Option<SyntaxElement>,
}

impl Iterator for AncestorsAtOffset {
    type Item = SyntaxElement;

    fn next(&mut self) -> Option<SyntaxElement> {
        let current = self.next.take()?;
        self.next = current.parent().map(NodeOrToken::Node);
        Some(current)
    }
}

/// Elements whose range contains `offset`, innermost first, root last
///
/// The first element is the token at `offset` (right-biased at a token
/// boundary), followed by its ancestors. A tree without tokens yields just
/// `root`'s ancestor chain. Fails with a lookup error when `offset` is
/// outside `root`.
pub fn ancestors_at_offset(root: &SyntaxNode, offset: TextSize) -> Result<AncestorsAtOffset> {
    let start = match token_at_offset(root, offset)?.right_biased() {
        Some(token) => NodeOrToken::Token(token),
        None => NodeOrToken::Node(root.clone()),
    };
    Ok(AncestorsAtOffset { next: Some(start) })
}

/// Innermost node of type `N` containing `offset`
///
/// `Ok(None)` means the offset is valid but no such node encloses it; an
/// invalid offset is an error instead.
pub fn find_node_at_offset<N: AstNode>(root: &SyntaxNode, offset: TextSize) -> Result<Option<N>> {
    Ok(ancestors_at_offset(root, offset)?
        .filter_map(SyntaxElement::into_node)
        .find_map(N::cast))
}

/// Untyped variant of [`find_node_at_offset`]
pub fn find_node_at_offset_by_kind(
    root: &SyntaxNode,
    offset: TextSize,
    kind: SyntaxKind,
) -> Result<Option<SyntaxNode>> {
    Ok(ancestors_at_offset(root, offset)?
        .filter_map(SyntaxElement::into_node)
        .find(|node| node.kind() == kind))
}

/// Smallest element whose range contains `range`
///
/// A non-empty `range` fits inside at most one child per level, which is
/// what `SyntaxNode::covering_element` finds. An empty `range` on a
/// boundary between two children fits both; rowan picks the left one, so
/// that case descends here and steps into the right-hand one instead.
/// Fails with a lookup error only when `range` is not inside `root`.
pub fn find_covering_element(root: &SyntaxNode, range: TextRange) -> Result<SyntaxElement> {
    check_range(root, range)?;
    if !range.is_empty() {
        return Ok(root.covering_element(range));
    }

    let mut current: SyntaxElement = NodeOrToken::Node(root.clone());
    while let NodeOrToken::Node(node) = &current {
        let child = node
            .children_with_tokens()
            .take_while(|child| child.text_range().start() <= range.start())
            .filter(|child| child.text_range().contains_range(range))
            .last();
        match child {
            Some(child) => current = child,
            None => break,
        }
    }
    Ok(current)
}

/// First node of type `N` enclosing the element that covers `range`
pub fn find_node_at_range<N: AstNode>(root: &SyntaxNode, range: TextRange) -> Result<Option<N>> {
    Ok(find_covering_element(root, range)?
        .ancestors()
        .find_map(N::cast))
}

/// Nearest sibling of `element` in `direction` that is not trivia
pub fn non_trivia_sibling(element: &SyntaxElement, direction: Direction) -> Option<SyntaxElement> {
    let step = |element: &SyntaxElement| match direction {
        Direction::Next => element.next_sibling_or_token(),
        Direction::Prev => element.prev_sibling_or_token(),
    };
    std::iter::successors(step(element), step).find(|sibling| !sibling.kind().is_trivia())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cst::ast::{BinExpr, BlockExpr, FnDef, Literal, ParamList};
    use crate::error::ErrorKind;
    use crate::test_utils::sample_fn;

    // "fn f() { 1 + 1 }"
    //  0123456789012345

    #[test]
    fn test_token_at_offset_inside_and_between() {
        let root = sample_fn("f", "1", "1");

        let inside = token_at_offset(&root, 1.into()).unwrap();
        assert!(matches!(&inside, TokenAtOffset::Single(t) if t.kind() == SyntaxKind::FnKw));

        let between = token_at_offset(&root, 8.into()).unwrap();
        match between {
            TokenAtOffset::Between(left, right) => {
                assert_eq!(left.kind(), SyntaxKind::LBrace);
                assert_eq!(right.kind(), SyntaxKind::Whitespace);
            }
            other => panic!("expected two tokens, got {other:?}"),
        }

        let end = token_at_offset(&root, 16.into()).unwrap();
        assert!(matches!(&end, TokenAtOffset::Single(t) if t.kind() == SyntaxKind::RBrace));
    }

    #[test]
    fn test_ancestors_prefer_token_starting_at_offset() {
        let root = sample_fn("f", "1", "1");
        // Between `+` and the following whitespace: the whitespace wins
        let kinds: Vec<SyntaxKind> = ancestors_at_offset(&root, 12.into())
            .unwrap()
            .map(|e| e.kind())
            .collect();
        assert_eq!(
            kinds,
            vec![
                SyntaxKind::Whitespace,
                SyntaxKind::BinExpr,
                SyntaxKind::BlockExpr,
                SyntaxKind::FnDef,
                SyntaxKind::SourceFile,
            ]
        );

        // Between `(` and `)` the right paren wins
        let first = ancestors_at_offset(&root, 5.into()).unwrap().next().unwrap();
        assert_eq!(first.kind(), SyntaxKind::RParen);
    }

    #[test]
    fn test_ancestors_is_restartable() {
        let root = sample_fn("f", "1", "1");
        let walk = ancestors_at_offset(&root, 9.into()).unwrap();
        let first: Vec<_> = walk.clone().collect();
        let second: Vec<_> = walk.collect();
        assert_eq!(first, second);
        assert_eq!(first.last().and_then(|e| e.as_node().cloned()), Some(root));
    }

    #[test]
    fn test_out_of_range_offset_is_lookup_error() {
        let root = sample_fn("f", "1", "1");
        let err = ancestors_at_offset(&root, 17.into()).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Lookup);
        assert!(find_node_at_offset::<FnDef>(&root, 100.into()).is_err());
    }

    #[test]
    fn test_find_node_at_offset() {
        let root = sample_fn("f", "1", "2");

        let literal = find_node_at_offset::<Literal>(&root, 13.into())
            .unwrap()
            .unwrap();
        assert_eq!(literal.as_int(), Some(2));

        let bin = find_node_at_offset::<BinExpr>(&root, 11.into()).unwrap();
        assert!(bin.is_some());

        // Valid offset, but no parameter list around the body
        let params = find_node_at_offset::<ParamList>(&root, 11.into()).unwrap();
        assert!(params.is_none());

        // At the boundary between `)` and ` ` the right side does not belong to ParamList
        let at_boundary = find_node_at_offset::<ParamList>(&root, 6.into()).unwrap();
        assert!(at_boundary.is_none());
        let block = find_node_at_offset_by_kind(&root, 7.into(), SyntaxKind::BlockExpr).unwrap();
        assert_eq!(block.map(|b| b.text_range().start()), Some(7.into()));
    }

    #[test]
    fn test_find_covering_element() {
        let root = sample_fn("f", "1", "1");

        let lit = find_covering_element(&root, TextRange::new(9.into(), 10.into())).unwrap();
        assert_eq!(lit.kind(), SyntaxKind::IntNumber);

        let bin = find_covering_element(&root, TextRange::new(9.into(), 12.into())).unwrap();
        assert_eq!(bin.kind(), SyntaxKind::BinExpr);

        let whole = find_covering_element(&root, root.text_range()).unwrap();
        assert_eq!(whole.kind(), SyntaxKind::FnDef);

        let empty = find_covering_element(&root, TextRange::empty(8.into())).unwrap();
        assert_eq!(empty.kind(), SyntaxKind::Whitespace);

        let block = find_node_at_range::<BlockExpr>(&root, TextRange::new(8.into(), 10.into()))
            .unwrap();
        assert!(block.is_some());

        let err = find_covering_element(&root, TextRange::new(3.into(), 40.into())).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Lookup);
    }

    #[test]
    fn test_non_trivia_sibling() {
        let root = sample_fn("f", "1", "1");
        let plus = ancestors_at_offset(&root, 11.into()).unwrap().next().unwrap();
        assert_eq!(plus.kind(), SyntaxKind::Plus);

        let next = non_trivia_sibling(&plus, Direction::Next).unwrap();
        assert_eq!(next.kind(), SyntaxKind::Literal);
        assert_eq!(next.text_range().start(), 13.into());

        let prev = non_trivia_sibling(&plus, Direction::Prev).unwrap();
        assert_eq!(prev.text_range().start(), 9.into());

        let lhs = prev.as_node().unwrap().first_child_or_token().unwrap();
        assert!(non_trivia_sibling(&lhs, Direction::Next).is_none());
    }
}
