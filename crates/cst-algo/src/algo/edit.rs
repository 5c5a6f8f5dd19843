//! Structural edits producing new tree versions
//!
//! Nothing here mutates its input. Each function copies the path from the
//! edited node up to the root and shares every other subtree with the old
//! version, then returns the edited node positioned inside the new tree;
//! [`tree_root`](crate::cst::tree_root) of the result is the new root.
//!
//! Elements are identified the way `rowan` identifies them, by storage and
//! offset, and must be reachable from the node being edited through their
//! own parent chain.

use std::collections::{HashMap, HashSet};

use tracing::{debug, trace};

use super::diff::{DiffOp, InsertPosition, TreeDiff};
use crate::cst::{GreenElement, GreenNode, GreenNodeData, NodeOrToken, SyntaxElement, SyntaxNode};
use crate::error::CstError;
use crate::result::Result;

/// Put `green` in place of `node`, rebuilding every ancestor
///
/// Returns the replacement positioned inside the new tree.
pub fn replace_with(node: &SyntaxNode, green: GreenNode) -> SyntaxNode {
    trace!(kind = ?node.kind(), range = ?node.text_range(), "path-copying to root");
    let mut path: Vec<usize> = node
        .ancestors()
        .take_while(|ancestor| ancestor.parent().is_some())
        .map(|ancestor| ancestor.index())
        .collect();
    path.reverse();

    // The parent keeps its kind, so rowan's own path copy applies from there
    let new_root = match node.parent() {
        None => green,
        Some(parent) => {
            parent.replace_with(parent.green().replace_child(node.index(), green.into()))
        }
    };

    let mut current = SyntaxNode::new_root(new_root);
    for index in path {
        match current.children_with_tokens().nth(index).and_then(NodeOrToken::into_node) {
            Some(child) => current = child,
            None => break,
        }
    }
    current
}

/// Splice `new_children` into `node`'s children at `position`
///
/// Fails with [`CstError::NotAChild`] when the anchor of `position` is not a
/// direct child of `node`.
pub fn insert_children(
    node: &SyntaxNode,
    position: InsertPosition<SyntaxElement>,
    new_children: impl IntoIterator<Item = GreenElement>,
) -> Result<SyntaxNode> {
    let index = match &position {
        InsertPosition::First => 0,
        InsertPosition::Last => node.green().children().len(),
        InsertPosition::Before(anchor) => child_index(node, anchor)?,
        InsertPosition::After(anchor) => child_index(node, anchor)? + 1,
    };
    let green = node.green().splice_children(index..index, new_children);
    Ok(replace_with(node, green))
}

/// Remove `to_delete` from `node` and put `to_insert` where the first of
/// them was
///
/// `to_delete` must be a non-empty set of `node`'s direct children; they
/// need not be adjacent. The remaining children keep their order.
pub fn replace_children(
    node: &SyntaxNode,
    to_delete: &[SyntaxElement],
    to_insert: impl IntoIterator<Item = GreenElement>,
) -> Result<SyntaxNode> {
    let mut indices = to_delete
        .iter()
        .map(|element| child_index(node, element))
        .collect::<Result<Vec<usize>>>()?;
    indices.sort_unstable();
    indices.dedup();
    let Some(&first) = indices.first() else {
        return Err(CstError::EmptyDeletion);
    };

    let green = node.green();
    let mut to_insert = Some(to_insert);
    let mut children: Vec<GreenElement> = Vec::with_capacity(green.children().len());
    for (index, child) in green.children().enumerate() {
        if index == first {
            children.extend(to_insert.take().into_iter().flatten());
        }
        if indices.binary_search(&index).is_err() {
            children.push(child.to_owned());
        }
    }
    Ok(replace_with(node, GreenNode::new(green.kind(), children)))
}

fn child_index(node: &SyntaxNode, element: &SyntaxElement) -> Result<usize> {
    if element.parent().as_ref() == Some(node) {
        Ok(element.index())
    } else {
        Err(CstError::NotAChild {
            kind: element.kind(),
            range: element.text_range(),
            parent_kind: node.kind(),
            parent_range: node.text_range(),
        })
    }
}

/// Apply every operation of `diff` to the tree under `root` at once
///
/// All referenced elements must belong to the subtree of `root` in this very
/// tree version, or the call fails with [`CstError::NotFound`]. Two
/// operations may not target the same element, and nothing may target the
/// inside of a replaced or deleted subtree ([`CstError::ConflictingEdits`]).
/// Checks run before anything is built, so a failure leaves no partial
/// result. Returns `root` rebuilt and positioned inside the new tree.
pub fn replace_descendants(root: &SyntaxNode, diff: &TreeDiff) -> Result<SyntaxNode> {
    if diff.is_empty() {
        return Ok(root.clone());
    }
    debug!(ops = diff.len(), kind = ?root.kind(), "applying tree diff");

    let plan = EditPlan::build(root, diff)?;
    let green = match plan.root_replacement {
        Some(green) => green,
        None => plan.rebuild(&root.green(), &mut Vec::new()),
    };
    Ok(replace_with(root, green))
}

/// Edits collected per parent, keyed by child-index path relative to the root
#[derive(Default)]
struct EditPlan {
    nodes: HashMap<Vec<usize>, NodeEdits>,
    dirty: HashSet<Vec<usize>>,
    root_replacement: Option<GreenNode>,
}

#[derive(Default)]
struct NodeEdits {
    /// `None` deletes the child
    replaced: HashMap<usize, Option<GreenElement>>,
    inserted: Vec<(InsertPosition<usize>, Vec<GreenElement>)>,
}

impl EditPlan {
    fn build(root: &SyntaxNode, diff: &TreeDiff) -> Result<EditPlan> {
        let mut plan = EditPlan::default();
        let mut targets: Vec<(Vec<usize>, &SyntaxElement)> = Vec::new();
        let mut insert_parents: Vec<(Vec<usize>, &SyntaxNode)> = Vec::new();

        for op in diff {
            match op {
                DiffOp::Replace { old, new } => {
                    let path = locate(root, old)?;
                    if path.is_empty() {
                        match new {
                            NodeOrToken::Node(green) => plan.root_replacement = Some(green.clone()),
                            NodeOrToken::Token(_) => {
                                return Err(CstError::conflicting_edits(
                                    old.kind(),
                                    old.text_range(),
                                    "the edited root can only be replaced by a node",
                                ));
                            }
                        }
                    } else {
                        plan.child_edits(&path).replaced.insert(last(&path), Some(new.clone()));
                    }
                    targets.push((path, old));
                }
                DiffOp::Delete { old } => {
                    let path = locate(root, old)?;
                    if path.is_empty() {
                        return Err(CstError::conflicting_edits(
                            old.kind(),
                            old.text_range(),
                            "the edited root cannot be deleted",
                        ));
                    }
                    plan.child_edits(&path).replaced.insert(last(&path), None);
                    targets.push((path, old));
                }
                DiffOp::InsertAt {
                    parent,
                    position,
                    elements,
                } => {
                    let parent_element = NodeOrToken::Node(parent.clone());
                    let path = locate(root, &parent_element)?;
                    let slot = match position {
                        InsertPosition::First => InsertPosition::First,
                        InsertPosition::Last => InsertPosition::Last,
                        InsertPosition::Before(anchor) => {
                            InsertPosition::Before(child_index(parent, anchor)?)
                        }
                        InsertPosition::After(anchor) => {
                            InsertPosition::After(child_index(parent, anchor)?)
                        }
                    };
                    plan.mark_dirty(&path);
                    plan.nodes
                        .entry(path.clone())
                        .or_default()
                        .inserted
                        .push((slot, elements.clone()));
                    insert_parents.push((path, parent));
                }
            }
        }

        check_conflicts(&mut targets, &insert_parents)?;
        Ok(plan)
    }

    /// Edits of the parent of the element at `path`, marking the way there dirty
    fn child_edits(&mut self, path: &[usize]) -> &mut NodeEdits {
        let parent = &path[..path.len() - 1];
        self.mark_dirty(parent);
        self.nodes.entry(parent.to_vec()).or_default()
    }

    fn mark_dirty(&mut self, path: &[usize]) {
        for len in 0..=path.len() {
            if !self.dirty.contains(&path[..len]) {
                self.dirty.insert(path[..len].to_vec());
            }
        }
    }

    fn rebuild(&self, green: &GreenNodeData, path: &mut Vec<usize>) -> GreenNode {
        if !self.dirty.contains(path.as_slice()) {
            return green.to_owned();
        }
        let edits = self.nodes.get(path.as_slice());
        let inserted_at = |slot: InsertPosition<usize>, out: &mut Vec<GreenElement>| {
            if let Some(edits) = edits {
                for (position, elements) in &edits.inserted {
                    if *position == slot {
                        out.extend(elements.iter().cloned());
                    }
                }
            }
        };

        let mut children = Vec::with_capacity(green.children().len());
        inserted_at(InsertPosition::First, &mut children);
        for (index, child) in green.children().enumerate() {
            inserted_at(InsertPosition::Before(index), &mut children);
            match edits.and_then(|edits| edits.replaced.get(&index)) {
                Some(Some(new)) => children.push(new.clone()),
                Some(None) => {}
                None => match child {
                    NodeOrToken::Node(node) => {
                        path.push(index);
                        children.push(NodeOrToken::Node(self.rebuild(node, path)));
                        path.pop();
                    }
                    NodeOrToken::Token(_) => children.push(child.to_owned()),
                },
            }
            inserted_at(InsertPosition::After(index), &mut children);
        }
        inserted_at(InsertPosition::Last, &mut children);
        GreenNode::new(green.kind(), children)
    }
}

fn last(path: &[usize]) -> usize {
    path.last().copied().unwrap_or_default()
}

/// Child-index path from `root` down to `element`
///
/// Tokens get their parent's path plus their own index. Fails when
/// `element` is not `root` itself or inside it.
fn locate(root: &SyntaxNode, element: &SyntaxElement) -> Result<Vec<usize>> {
    let not_found = || CstError::NotFound {
        kind: element.kind(),
        range: element.text_range(),
    };

    let mut path = Vec::new();
    let mut current = match element {
        NodeOrToken::Node(node) => node.clone(),
        NodeOrToken::Token(token) => {
            path.push(token.index());
            token.parent().ok_or_else(not_found)?
        }
    };
    loop {
        if current == *root {
            path.reverse();
            return Ok(path);
        }
        path.push(current.index());
        current = current.parent().ok_or_else(not_found)?;
    }
}

fn check_conflicts(
    targets: &mut [(Vec<usize>, &SyntaxElement)],
    insert_parents: &[(Vec<usize>, &SyntaxNode)],
) -> Result<()> {
    // After sorting, a path that contains another one as a prefix sits right
    // behind it or behind something that shares that prefix too
    targets.sort_by(|a, b| a.0.cmp(&b.0));
    for pair in targets.windows(2) {
        let (outer_path, _) = &pair[0];
        let (inner_path, inner) = &pair[1];
        if inner_path.starts_with(outer_path) {
            let message = if inner_path == outer_path {
                "element is edited more than once"
            } else {
                "element lies inside a replaced or deleted subtree"
            };
            return Err(CstError::conflicting_edits(
                inner.kind(),
                inner.text_range(),
                message,
            ));
        }
    }

    let target_paths: HashSet<&[usize]> = targets.iter().map(|(path, _)| path.as_slice()).collect();
    for (path, parent) in insert_parents {
        if (0..=path.len()).any(|len| target_paths.contains(&path[..len])) {
            return Err(CstError::conflicting_edits(
                parent.kind(),
                parent.text_range(),
                "insertion into a replaced or deleted subtree",
            ));
        }
    }
    Ok(())
}
