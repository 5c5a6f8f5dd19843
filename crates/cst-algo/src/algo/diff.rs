//! Edit scripts between two tree versions
//!
//! [`diff`] walks both trees top-down. At each node pair it skips the
//! children the two sides share at the front and back, aligns what is left
//! in the middle, and only descends into node pairs that the alignment
//! matched but that still differ. The resulting [`TreeDiff`] references
//! elements of the old tree and carries the new content as green storage,
//! so applying it with
//! [`replace_descendants`](crate::algo::edit::replace_descendants) shares
//! every unchanged subtree with the old tree.

use rowan::TextSize;
use tracing::{debug, trace};

use super::incremental::TextEdit;
use crate::config::DiffConfig;
use crate::cst::{
    GreenElement, GreenNodeData, GreenTokenData, NodeOrToken, SyntaxElement, SyntaxKind,
    SyntaxNode,
};

/// Borrowed child of a green node
type GreenChild<'a> = NodeOrToken<&'a GreenNodeData, &'a GreenTokenData>;

/// Where new children go relative to the existing ones
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InsertPosition<T> {
    First,
    Last,
    Before(T),
    After(T),
}

impl<T> InsertPosition<T> {
    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> InsertPosition<U> {
        match self {
            InsertPosition::First => InsertPosition::First,
            InsertPosition::Last => InsertPosition::Last,
            InsertPosition::Before(anchor) => InsertPosition::Before(f(anchor)),
            InsertPosition::After(anchor) => InsertPosition::After(f(anchor)),
        }
    }

    pub fn anchor(&self) -> Option<&T> {
        match self {
            InsertPosition::First | InsertPosition::Last => None,
            InsertPosition::Before(anchor) | InsertPosition::After(anchor) => Some(anchor),
        }
    }
}

/// One step of a [`TreeDiff`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DiffOp {
    /// Swap `old` (and its whole subtree) for `new`
    Replace {
        old: SyntaxElement,
        new: GreenElement,
    },
    /// Remove `old` from its parent
    Delete { old: SyntaxElement },
    /// Add `elements` to `parent`'s children at `position`
    InsertAt {
        parent: SyntaxNode,
        position: InsertPosition<SyntaxElement>,
        elements: Vec<GreenElement>,
    },
}

impl DiffOp {
    /// The same change expressed on the old text
    pub fn to_text_edit(&self) -> TextEdit {
        match self {
            DiffOp::Replace { old, new } => TextEdit::replace(old.text_range(), new.to_string()),
            DiffOp::Delete { old } => TextEdit::delete(old.text_range()),
            DiffOp::InsertAt {
                parent,
                position,
                elements,
            } => {
                let offset: TextSize = match position {
                    InsertPosition::First => parent.text_range().start(),
                    InsertPosition::Last => parent.text_range().end(),
                    InsertPosition::Before(anchor) => anchor.text_range().start(),
                    InsertPosition::After(anchor) => anchor.text_range().end(),
                };
                let text: String = elements.iter().map(ToString::to_string).collect();
                TextEdit::insert(offset, text)
            }
        }
    }
}

/// Ordered edit script against one specific tree version
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TreeDiff {
    ops: Vec<DiffOp>,
}

impl TreeDiff {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, op: DiffOp) {
        self.ops.push(op);
    }

    pub fn ops(&self) -> &[DiffOp] {
        &self.ops
    }

    pub fn len(&self) -> usize {
        self.ops.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ops.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, DiffOp> {
        self.ops.iter()
    }

    /// Text edits against the old text, sorted by position
    ///
    /// Applying them with
    /// [`apply_text_edits`](crate::algo::incremental::apply_text_edits) to
    /// the old tree's text gives the text the script produces.
    pub fn into_text_edits(self) -> Vec<TextEdit> {
        let mut edits: Vec<TextEdit> = self.ops.iter().map(DiffOp::to_text_edit).collect();
        edits.sort_by_key(|edit| (edit.range.start(), edit.range.end()));
        edits
    }
}

impl IntoIterator for TreeDiff {
    type Item = DiffOp;
    type IntoIter = std::vec::IntoIter<DiffOp>;

    fn into_iter(self) -> Self::IntoIter {
        self.ops.into_iter()
    }
}

impl<'a> IntoIterator for &'a TreeDiff {
    type Item = &'a DiffOp;
    type IntoIter = std::slice::Iter<'a, DiffOp>;

    fn into_iter(self) -> Self::IntoIter {
        self.ops.iter()
    }
}

impl FromIterator<DiffOp> for TreeDiff {
    fn from_iter<I: IntoIterator<Item = DiffOp>>(iter: I) -> Self {
        Self {
            ops: iter.into_iter().collect(),
        }
    }
}

/// Edit script turning `from` into `to`, with the default [`DiffConfig`]
pub fn diff(from: &SyntaxNode, to: &SyntaxNode) -> TreeDiff {
    diff_with_config(from, to, &DiffConfig::default())
}

/// Edit script turning `from` into `to`
///
/// Equal trees give an empty script; roots of different kinds give a single
/// `Replace` of the whole of `from`.
pub fn diff_with_config(from: &SyntaxNode, to: &SyntaxNode, config: &DiffConfig) -> TreeDiff {
    let mut differ = Differ {
        config,
        diff: TreeDiff::new(),
    };

    let (old_green, new_green) = (from.green(), to.green());
    if same_node(&old_green, &new_green) {
        trace!("trees are equal, nothing to diff");
    } else if from.kind() != to.kind() {
        differ.diff.push(DiffOp::Replace {
            old: NodeOrToken::Node(from.clone()),
            new: NodeOrToken::Node(new_green.into_owned()),
        });
    } else {
        differ.diff_children(from, &new_green);
    }

    debug!(
        ops = differ.diff.len(),
        from_len = u32::from(from.text_range().len()),
        to_len = u32::from(to.text_range().len()),
        "computed tree diff"
    );
    differ.diff
}

struct Differ<'a> {
    config: &'a DiffConfig,
    diff: TreeDiff,
}

impl Differ<'_> {
    /// `old` and `new` have the same kind but different content
    fn diff_children(&mut self, old: &SyntaxNode, new: &GreenNodeData) {
        let old_children: Vec<SyntaxElement> = old.children_with_tokens().collect();
        let new_children: Vec<GreenChild<'_>> = new.children().collect();

        let prefix = old_children
            .iter()
            .zip(&new_children)
            .take_while(|&(o, &n)| same(o, n))
            .count();
        let suffix = old_children[prefix..]
            .iter()
            .rev()
            .zip(new_children[prefix..].iter().rev())
            .take_while(|&(o, &n)| same(o, n))
            .count();

        let old_mid = &old_children[prefix..old_children.len() - suffix];
        let new_mid = &new_children[prefix..new_children.len() - suffix];
        let anchor = prefix.checked_sub(1).map(|i| old_children[i].clone());

        trace!(
            kind = ?old.kind(),
            prefix,
            suffix,
            old_mid = old_mid.len(),
            new_mid = new_mid.len(),
            "aligning children"
        );
        self.align(old, old_mid, new_mid, anchor);
    }

    fn align(
        &mut self,
        parent: &SyntaxNode,
        old: &[SyntaxElement],
        new: &[GreenChild<'_>],
        mut anchor: Option<SyntaxElement>,
    ) {
        let cells = (old.len() + 1).saturating_mul(new.len() + 1);
        let pairs = if old.is_empty() || new.is_empty() {
            Vec::new()
        } else if cells > self.config.max_alignment_cells {
            debug!(
                kind = ?parent.kind(),
                cells,
                limit = self.config.max_alignment_cells,
                "alignment budget exceeded, diffing children positionally"
            );
            Vec::new()
        } else {
            align_children(old, new)
        };

        let (mut i, mut j) = (0, 0);
        for (oi, nj) in pairs {
            self.fill_gap(parent, &old[i..oi], &new[j..nj], anchor.take());
            self.diff_pair(&old[oi], new[nj]);
            anchor = Some(old[oi].clone());
            i = oi + 1;
            j = nj + 1;
        }
        self.fill_gap(parent, &old[i..], &new[j..], anchor);
    }

    /// Diff two elements that occupy the same slot
    fn diff_pair(&mut self, old: &SyntaxElement, new: GreenChild<'_>) {
        if same(old, new) {
            return;
        }
        match (old, new) {
            (NodeOrToken::Node(old_node), NodeOrToken::Node(new_node))
                if old_node.kind() == SyntaxKind::from(new_node.kind()) =>
            {
                self.diff_children(old_node, new_node);
            }
            _ => self.diff.push(DiffOp::Replace {
                old: old.clone(),
                new: owned(new),
            }),
        }
    }

    /// Unaligned run between two anchors: pair up positionally, then delete
    /// or insert whatever is left on the longer side
    fn fill_gap(
        &mut self,
        parent: &SyntaxNode,
        old: &[SyntaxElement],
        new: &[GreenChild<'_>],
        anchor: Option<SyntaxElement>,
    ) {
        let paired = old.len().min(new.len());
        for (o, &n) in old.iter().zip(new) {
            self.diff_pair(o, n);
        }
        for o in &old[paired..] {
            self.diff.push(DiffOp::Delete { old: o.clone() });
        }
        if new.len() > paired {
            let position = match old.last().cloned().or(anchor) {
                Some(after) => InsertPosition::After(after),
                None => InsertPosition::First,
            };
            self.diff.push(DiffOp::InsertAt {
                parent: parent.clone(),
                position,
                elements: new[paired..].iter().map(|&n| owned(n)).collect(),
            });
        }
    }
}

/// Shared or structurally equal green nodes
fn same_node(old: &GreenNodeData, new: &GreenNodeData) -> bool {
    std::ptr::eq(old, new) || old == new
}

/// Equal storage: same kind and text all the way down
fn same(old: &SyntaxElement, new: GreenChild<'_>) -> bool {
    match (old, new) {
        (NodeOrToken::Node(o), NodeOrToken::Node(n)) => same_node(&o.green(), n),
        (NodeOrToken::Token(o), NodeOrToken::Token(n)) => o.green() == n,
        _ => false,
    }
}

/// Elements worth keeping in the same slot: equal tokens, or nodes of one kind
fn compatible(old: &SyntaxElement, new: GreenChild<'_>) -> bool {
    match (old, new) {
        (NodeOrToken::Node(o), NodeOrToken::Node(n)) => o.kind() == SyntaxKind::from(n.kind()),
        (NodeOrToken::Token(o), NodeOrToken::Token(n)) => o.green() == n,
        _ => false,
    }
}

fn owned(child: GreenChild<'_>) -> GreenElement {
    match child {
        NodeOrToken::Node(node) => NodeOrToken::Node(node.to_owned()),
        NodeOrToken::Token(token) => NodeOrToken::Token(token.to_owned()),
    }
}

/// Longest common subsequence of compatible pairs, as increasing index pairs
///
/// Among alignments of equal length, pairs whose storage is already equal
/// are preferred so that unchanged children stay anchors.
fn align_children(old: &[SyntaxElement], new: &[GreenChild<'_>]) -> Vec<(usize, usize)> {
    let (n, m) = (old.len(), new.len());
    let width = m + 1;
    // score(i, j) for the suffixes old[i..] and new[j..]: twice the pair
    // count plus one per exact match
    let mut table = vec![0u32; (n + 1) * width];
    for i in (0..n).rev() {
        for j in (0..m).rev() {
            let skip = table[(i + 1) * width + j].max(table[i * width + j + 1]);
            let take = if compatible(&old[i], new[j]) {
                let bonus = if same(&old[i], new[j]) { 3 } else { 2 };
                table[(i + 1) * width + j + 1] + bonus
            } else {
                0
            };
            table[i * width + j] = skip.max(take);
        }
    }

    let mut pairs = Vec::new();
    let (mut i, mut j) = (0, 0);
    while i < n && j < m {
        let current = table[i * width + j];
        if compatible(&old[i], new[j]) {
            let bonus = if same(&old[i], new[j]) { 3 } else { 2 };
            if current == table[(i + 1) * width + j + 1] + bonus {
                pairs.push((i, j));
                i += 1;
                j += 1;
                continue;
            }
        }
        if table[(i + 1) * width + j] == current {
            i += 1;
        } else {
            j += 1;
        }
    }
    pairs
}
