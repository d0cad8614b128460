//! # Parse Forest Module
//!
//! The result model produced by the engine: an index-addressed arena of
//! nodes forming a DAG (cyclic in the presence of cyclic grammars). Sharing
//! is by [`NodeId`]: every consumer of "the parse of sort S over this span"
//! holds the same id, so ambiguity merges are observed by all of them without
//! copying.

mod render;
mod visitor;

pub use render::{render_node, render_parse_tree};
pub use visitor::ForestVisitor;

use crate::grammar::{Production, Symbol};
use std::sync::Arc;

#[cfg(feature = "serialize")]
use serde::{Deserialize, Serialize};

/// A half-open span `[start, end)` in codepoint offsets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serialize", derive(Serialize, Deserialize))]
pub struct Span {
    start: u32,
    end: u32,
}

impl Span {
    /// Create a span. `start` must not exceed `end`.
    #[must_use]
    pub fn new(start: u32, end: u32) -> Self {
        debug_assert!(start <= end, "span start {start} exceeds end {end}");
        Self { start, end }
    }

    /// Inclusive start offset.
    #[must_use]
    pub const fn start(self) -> u32 {
        self.start
    }

    /// Exclusive end offset.
    #[must_use]
    pub const fn end(self) -> u32 {
        self.end
    }

    /// Number of codepoints covered.
    #[must_use]
    pub const fn len(self) -> u32 {
        self.end - self.start
    }

    /// Whether the span covers no input.
    #[must_use]
    pub const fn is_empty(self) -> bool {
        self.start == self.end
    }
}

/// Handle to a node in a [`ParseForest`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serialize", derive(Serialize, Deserialize))]
pub struct NodeId(pub(crate) u32);

impl NodeId {
    #[inline]
    pub(crate) fn index(self) -> usize {
        self.0 as usize
    }
}

/// A parse forest node.
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serialize", derive(Serialize, Deserialize))]
pub enum ParseNode {
    /// A production applied to ordered children.
    Appl {
        production: Arc<Production>,
        children: Vec<NodeId>,
        span: Span,
    },
    /// A single matched codepoint.
    Char { codepoint: u32, span: Span },
    /// Alternative derivations with identical span and yielded symbol.
    ///
    /// The alternative list is an unordered set; no canonical order is
    /// guaranteed.
    Amb {
        alternatives: Vec<NodeId>,
        span: Span,
    },
    /// A sort-level failure: the span could not be derived, `unmatched`
    /// holds the raw character leaves recovery skipped over.
    ErrorSort {
        symbol: Symbol,
        children: Vec<NodeId>,
        unmatched: Vec<NodeId>,
        span: Span,
    },
    /// A failure inside an iteration context, preserving the elements
    /// recognized before the failure.
    ErrorList {
        symbol: Symbol,
        children: Vec<NodeId>,
        unmatched: Vec<NodeId>,
        span: Span,
    },
}

impl ParseNode {
    /// The node's span.
    #[must_use]
    pub const fn span(&self) -> Span {
        match self {
            Self::Appl { span, .. }
            | Self::Char { span, .. }
            | Self::Amb { span, .. }
            | Self::ErrorSort { span, .. }
            | Self::ErrorList { span, .. } => *span,
        }
    }

    /// Whether this node is an ambiguity cluster.
    #[must_use]
    pub const fn is_ambiguous(&self) -> bool {
        matches!(self, Self::Amb { .. })
    }

    /// Whether this node is an error container.
    #[must_use]
    pub const fn is_error(&self) -> bool {
        matches!(self, Self::ErrorSort { .. } | Self::ErrorList { .. })
    }
}

/// Arena of parse nodes produced by one parse.
///
/// Nodes are finalized once their offset's alternatives are complete; the
/// only post-hoc mutation is appending a newly discovered alternative to an
/// existing ambiguity cluster, performed in place so the cluster keeps its
/// id.
#[derive(Debug, Default, Clone)]
#[cfg_attr(feature = "serialize", derive(Serialize, Deserialize))]
pub struct ParseForest {
    nodes: Vec<ParseNode>,
}

impl ParseForest {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// The node behind a handle.
    ///
    /// # Panics
    ///
    /// Panics if the handle belongs to a different forest.
    #[must_use]
    pub fn node(&self, id: NodeId) -> &ParseNode {
        &self.nodes[id.index()]
    }

    /// Number of nodes in the forest.
    #[must_use]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Whether the forest holds no nodes.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// The alternatives of an ambiguity node, or `None` for any other node.
    #[must_use]
    pub fn amb_alternatives(&self, id: NodeId) -> Option<&[NodeId]> {
        match self.node(id) {
            ParseNode::Amb { alternatives, .. } => Some(alternatives),
            _ => None,
        }
    }

    /// The production and ordered children of an application node.
    #[must_use]
    pub fn appl(&self, id: NodeId) -> Option<(&Production, &[NodeId])> {
        match self.node(id) {
            ParseNode::Appl {
                production,
                children,
                ..
            } => Some((production, children)),
            _ => None,
        }
    }

    pub(crate) fn alloc(&mut self, node: ParseNode) -> NodeId {
        let id = NodeId(u32::try_from(self.nodes.len()).expect("node count fits in u32"));
        self.nodes.push(node);
        id
    }

    /// Merge one more derivation into the result stored at `existing`.
    ///
    /// Idempotent: an alternative with the same production and children as an
    /// already-present one is dropped. A plain application is converted in
    /// place into an ambiguity cluster so consumers holding the id observe
    /// the merge.
    pub(crate) fn merge_alternative(
        &mut self,
        existing: NodeId,
        production: Arc<Production>,
        children: Vec<NodeId>,
        span: Span,
    ) {
        match &self.nodes[existing.index()] {
            ParseNode::Appl {
                production: p,
                children: c,
                ..
            } => {
                if **p == *production && *c == children {
                    return;
                }
                let first = std::mem::replace(
                    &mut self.nodes[existing.index()],
                    ParseNode::Amb {
                        alternatives: Vec::new(),
                        span,
                    },
                );
                let first_id = self.alloc(first);
                let second_id = self.alloc(ParseNode::Appl {
                    production,
                    children,
                    span,
                });
                if let ParseNode::Amb { alternatives, .. } = &mut self.nodes[existing.index()] {
                    alternatives.push(first_id);
                    alternatives.push(second_id);
                }
            }
            ParseNode::Amb { alternatives, .. } => {
                let duplicate = alternatives.iter().any(|&alt| {
                    matches!(
                        &self.nodes[alt.index()],
                        ParseNode::Appl { production: p, children: c, .. }
                            if **p == *production && *c == children
                    )
                });
                if duplicate {
                    return;
                }
                let new_id = self.alloc(ParseNode::Appl {
                    production,
                    children,
                    span,
                });
                if let ParseNode::Amb { alternatives, .. } = &mut self.nodes[existing.index()] {
                    alternatives.push(new_id);
                }
            }
            other => unreachable!("cannot merge an alternative into {other:?}"),
        }
    }

    /// Structural equality between two trees, possibly from different
    /// forests. Ambiguity alternatives are compared as multisets; cyclic
    /// references are compared coinductively.
    #[must_use]
    pub fn tree_equals(&self, a: NodeId, other: &Self, b: NodeId) -> bool {
        let mut in_progress = hashbrown::HashSet::new();
        self.eq_nodes(a, other, b, &mut in_progress)
    }

    fn eq_nodes(
        &self,
        a: NodeId,
        other: &Self,
        b: NodeId,
        in_progress: &mut hashbrown::HashSet<(NodeId, NodeId)>,
    ) -> bool {
        if !in_progress.insert((a, b)) {
            // Back-edge on both sides: assume equal (coinductive reading).
            return true;
        }
        let result = match (self.node(a), other.node(b)) {
            (
                ParseNode::Appl {
                    production: pa,
                    children: ca,
                    span: sa,
                },
                ParseNode::Appl {
                    production: pb,
                    children: cb,
                    span: sb,
                },
            ) => {
                sa == sb
                    && pa == pb
                    && ca.len() == cb.len()
                    && ca
                        .iter()
                        .zip(cb)
                        .all(|(&x, &y)| self.eq_nodes(x, other, y, in_progress))
            }
            (
                ParseNode::Char {
                    codepoint: xa,
                    span: sa,
                },
                ParseNode::Char {
                    codepoint: xb,
                    span: sb,
                },
            ) => xa == xb && sa == sb,
            (
                ParseNode::Amb {
                    alternatives: aa,
                    span: sa,
                },
                ParseNode::Amb {
                    alternatives: ab,
                    span: sb,
                },
            ) => sa == sb && self.eq_multiset(aa, other, ab, in_progress),
            (
                ParseNode::ErrorSort {
                    symbol: ya,
                    children: ca,
                    unmatched: ua,
                    span: sa,
                },
                ParseNode::ErrorSort {
                    symbol: yb,
                    children: cb,
                    unmatched: ub,
                    span: sb,
                },
            )
            | (
                ParseNode::ErrorList {
                    symbol: ya,
                    children: ca,
                    unmatched: ua,
                    span: sa,
                },
                ParseNode::ErrorList {
                    symbol: yb,
                    children: cb,
                    unmatched: ub,
                    span: sb,
                },
            ) => {
                ya == yb
                    && sa == sb
                    && ca.len() == cb.len()
                    && ua.len() == ub.len()
                    && ca
                        .iter()
                        .zip(cb)
                        .all(|(&x, &y)| self.eq_nodes(x, other, y, in_progress))
                    && ua
                        .iter()
                        .zip(ub)
                        .all(|(&x, &y)| self.eq_nodes(x, other, y, in_progress))
            }
            _ => false,
        };
        in_progress.remove(&(a, b));
        result
    }

    fn eq_multiset(
        &self,
        left: &[NodeId],
        other: &Self,
        right: &[NodeId],
        in_progress: &mut hashbrown::HashSet<(NodeId, NodeId)>,
    ) -> bool {
        if left.len() != right.len() {
            return false;
        }
        let mut used = vec![false; right.len()];
        'outer: for &l in left {
            for (slot, &r) in right.iter().enumerate() {
                if !used[slot] && self.eq_nodes(l, other, r, in_progress) {
                    used[slot] = true;
                    continue 'outer;
                }
            }
            return false;
        }
        true
    }
}
