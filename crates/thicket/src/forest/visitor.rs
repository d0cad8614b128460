//! Forest traversal.
//!
//! A single generic walker drives a [`ForestVisitor`]; every hook has a no-op
//! default, so a visitor only implements the cases it cares about. Every
//! visitor sees both single-derivation nodes and ambiguity clusters, which is
//! the traversal contract higher layers (AST builders and the like) consume.

use crate::forest::{NodeId, ParseForest, ParseNode, Span};
use crate::grammar::{Production, Symbol};
use hashbrown::HashSet;
use std::ops::ControlFlow;

/// Visitor over parse forest nodes.
///
/// Shared nodes are visited once per reference. The walker guards the active
/// path, so cyclic forests terminate; a back-edge surfaces as
/// [`visit_cycle`](Self::visit_cycle).
pub trait ForestVisitor {
    /// Called when entering an application node, before its children.
    fn enter_appl(
        &mut self,
        id: NodeId,
        production: &Production,
        children: &[NodeId],
        span: Span,
    ) -> ControlFlow<()> {
        let _ = (id, production, children, span);
        ControlFlow::Continue(())
    }

    /// Called when leaving an application node.
    fn exit_appl(&mut self, id: NodeId, production: &Production, span: Span) -> ControlFlow<()> {
        let _ = (id, production, span);
        ControlFlow::Continue(())
    }

    /// Called when entering an ambiguity cluster, before its alternatives.
    fn enter_amb(&mut self, id: NodeId, alternatives: &[NodeId], span: Span) -> ControlFlow<()> {
        let _ = (id, alternatives, span);
        ControlFlow::Continue(())
    }

    /// Called when leaving an ambiguity cluster.
    fn exit_amb(&mut self, id: NodeId, span: Span) -> ControlFlow<()> {
        let _ = (id, span);
        ControlFlow::Continue(())
    }

    /// Called for each character leaf.
    fn visit_char(&mut self, id: NodeId, codepoint: u32, span: Span) -> ControlFlow<()> {
        let _ = (id, codepoint, span);
        ControlFlow::Continue(())
    }

    /// Called when entering an error container. `in_list` distinguishes
    /// iteration-scoped containers from sort-scoped ones.
    fn enter_error(
        &mut self,
        id: NodeId,
        symbol: &Symbol,
        children: &[NodeId],
        unmatched: &[NodeId],
        span: Span,
        in_list: bool,
    ) -> ControlFlow<()> {
        let _ = (id, symbol, children, unmatched, span, in_list);
        ControlFlow::Continue(())
    }

    /// Called when leaving an error container.
    fn exit_error(&mut self, id: NodeId, span: Span) -> ControlFlow<()> {
        let _ = (id, span);
        ControlFlow::Continue(())
    }

    /// Called for a back-edge to a node on the active path.
    fn visit_cycle(&mut self, id: NodeId, span: Span) -> ControlFlow<()> {
        let _ = (id, span);
        ControlFlow::Continue(())
    }
}

impl ParseForest {
    /// Walk the tree rooted at `root` in pre-order.
    pub fn walk_with<V: ForestVisitor>(&self, root: NodeId, visitor: &mut V) -> ControlFlow<()> {
        let mut in_progress = HashSet::new();
        self.walk_node(root, visitor, &mut in_progress)
    }

    fn walk_node<V: ForestVisitor>(
        &self,
        id: NodeId,
        visitor: &mut V,
        in_progress: &mut HashSet<NodeId>,
    ) -> ControlFlow<()> {
        if !in_progress.insert(id) {
            return visitor.visit_cycle(id, self.node(id).span());
        }
        let flow = self.walk_children(id, visitor, in_progress);
        in_progress.remove(&id);
        flow
    }

    fn walk_children<V: ForestVisitor>(
        &self,
        id: NodeId,
        visitor: &mut V,
        in_progress: &mut HashSet<NodeId>,
    ) -> ControlFlow<()> {
        match self.node(id) {
            ParseNode::Appl {
                production,
                children,
                span,
            } => {
                visitor.enter_appl(id, production, children, *span)?;
                for &child in children {
                    self.walk_node(child, visitor, in_progress)?;
                }
                visitor.exit_appl(id, production, *span)
            }
            ParseNode::Char { codepoint, span } => visitor.visit_char(id, *codepoint, *span),
            ParseNode::Amb { alternatives, span } => {
                visitor.enter_amb(id, alternatives, *span)?;
                for &alt in alternatives {
                    self.walk_node(alt, visitor, in_progress)?;
                }
                visitor.exit_amb(id, *span)
            }
            ParseNode::ErrorSort {
                symbol,
                children,
                unmatched,
                span,
            } => {
                visitor.enter_error(id, symbol, children, unmatched, *span, false)?;
                for &child in children.iter().chain(unmatched) {
                    self.walk_node(child, visitor, in_progress)?;
                }
                visitor.exit_error(id, *span)
            }
            ParseNode::ErrorList {
                symbol,
                children,
                unmatched,
                span,
            } => {
                visitor.enter_error(id, symbol, children, unmatched, *span, true)?;
                for &child in children.iter().chain(unmatched) {
                    self.walk_node(child, visitor, in_progress)?;
                }
                visitor.exit_error(id, *span)
            }
        }
    }
}
