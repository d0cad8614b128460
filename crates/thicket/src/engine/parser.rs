//! The worklist scheduling loop.
//!
//! The engine runs a generalized, scannerless, bottom-up recognition over a
//! worklist of descriptors threaded through the graph-structured stack:
//!
//! 1. Seed the start sort's alternatives at offset 0.
//! 2. Pop a descriptor. A terminal slot matches directly against the raw
//!    buffer; a sort slot goes through the GSS, expanding the sort's
//!    alternatives at most once per offset; an exhausted alternative reduces
//!    to an application node, merged span-keyed into the memo table.
//! 3. Completing a sort resumes every return edge waiting on it.
//!
//! A literal mismatch only discards its own path. The parse fails globally
//! only if the worklist drains without a full-span result for the start
//! sort, in which case recovery builds a partial tree instead.

use crate::engine::gss::GssEdge;
use crate::engine::state::{Descriptor, ParseState};
use crate::grammar::{Grammar, MatchResult, Production, SortId, StackNode, Symbol};
use crate::forest::{NodeId, ParseNode, Span};
use std::sync::Arc;

/// Run the scheduling loop to completion (or until `budget` descriptors have
/// been processed).
pub(crate) fn run(grammar: &Grammar, state: &mut ParseState, budget: Option<usize>) {
    let (root, _) = state.gss.get_or_create(grammar.start(), 0);
    for &alternative in grammar.alternatives_of(grammar.start()) {
        state.schedule(Descriptor {
            alternative,
            slot: 0,
            gss: root,
            offset: 0,
            children: Vec::new(),
        });
    }

    while let Some(descriptor) = state.worklist.pop_front() {
        state.descriptors_processed += 1;
        process(grammar, state, descriptor);
        if budget.is_some_and(|limit| state.descriptors_processed >= limit) {
            break;
        }
    }
}

fn process(grammar: &Grammar, state: &mut ParseState, descriptor: Descriptor) {
    let alternative = grammar.alternative(descriptor.alternative);
    let Some(slot) = alternative.slots.get(descriptor.slot as usize) else {
        reduce(state, alternative.production.clone(), descriptor);
        return;
    };

    match slot {
        StackNode::Literal {
            production, chars, ..
        } => match slot.match_at(&state.input, descriptor.offset as usize) {
            MatchResult::Matched(end) => {
                let node = literal_node(state, production, chars.len(), descriptor.offset);
                let end = u32::try_from(end).expect("offset fits in u32");
                advance(state, descriptor, end, node);
            }
            MatchResult::NoMatch => state.record_failure(descriptor.offset),
        },
        StackNode::CharClass { .. } => {
            match slot.match_at(&state.input, descriptor.offset as usize) {
                MatchResult::Matched(_) => {
                    let node = state.char_node(descriptor.offset);
                    let end = descriptor.offset + 1;
                    advance(state, descriptor, end, node);
                }
                MatchResult::NoMatch => state.record_failure(descriptor.offset),
            }
        }
        StackNode::Sort { sort, .. } => enter_sort(grammar, state, *sort, descriptor),
    }
}

/// Schedule the next slot of the same alternative with one more child.
fn advance(state: &mut ParseState, descriptor: Descriptor, end: u32, child: NodeId) {
    let mut children = descriptor.children;
    children.push(child);
    state.schedule(Descriptor {
        alternative: descriptor.alternative,
        slot: descriptor.slot + 1,
        gss: descriptor.gss,
        offset: end,
        children,
    });
}

/// Enter a sort slot: push a return edge onto the (sort, offset) GSS node.
/// A fresh node expands the sort's alternatives; an existing one replays the
/// completions it has already performed.
fn enter_sort(grammar: &Grammar, state: &mut ParseState, sort: SortId, descriptor: Descriptor) {
    let (callee, created) = state.gss.get_or_create(sort, descriptor.offset);
    let edge = GssEdge {
        target: descriptor.gss,
        alternative: descriptor.alternative,
        slot: descriptor.slot,
        children: descriptor.children,
    };
    state.gss.add_edge(callee, edge.clone());

    if created {
        for &alternative in grammar.alternatives_of(sort) {
            state.schedule(Descriptor {
                alternative,
                slot: 0,
                gss: callee,
                offset: descriptor.offset,
                children: Vec::new(),
            });
        }
    } else {
        // This sort was already expanded at this offset: reuse the cached
        // result nodes directly.
        let pops: Vec<(u32, NodeId)> = state.gss.node(callee).pops.to_vec();
        state.memo_hits += pops.len();
        for (end, node) in pops {
            resume(state, &edge, end, node);
        }
    }
}

/// An alternative has consumed its whole right-hand side: build or merge the
/// application node for (sort, start, end) and resume the waiting edges.
fn reduce(state: &mut ParseState, production: Arc<Production>, descriptor: Descriptor) {
    let (sort, start) = {
        let node = state.gss.node(descriptor.gss);
        (node.sort, node.start)
    };
    let end = descriptor.offset;
    let span = Span::new(start, end);
    let key = (sort, start, end);

    if let Some(&existing) = state.sort_results.get(&key) {
        // A result for this span already reached every consumer; fold the new
        // derivation into it in place.
        state
            .forest
            .merge_alternative(existing, production, descriptor.children, span);
        return;
    }

    let node = state.forest.alloc(ParseNode::Appl {
        production,
        children: descriptor.children,
        span,
    });
    state.sort_results.insert(key, node);
    state.gss.node_mut(descriptor.gss).pops.push((end, node));

    let edges: Vec<GssEdge> = state.gss.node(descriptor.gss).edges.clone();
    for edge in &edges {
        resume(state, edge, end, node);
    }
}

/// Resume one return edge with a completed sort result.
fn resume(state: &mut ParseState, edge: &GssEdge, end: u32, node: NodeId) {
    let mut children = edge.children.clone();
    children.push(node);
    state.schedule(Descriptor {
        alternative: edge.alternative,
        slot: edge.slot + 1,
        gss: edge.target,
        offset: end,
        children,
    });
}

/// The shared application node for a matched literal: the literal's own
/// production over one character leaf per matched codepoint.
fn literal_node(
    state: &mut ParseState,
    production: &Arc<Production>,
    len: usize,
    offset: u32,
) -> NodeId {
    let Symbol::Literal(text) = production.lhs() else {
        unreachable!("literal stack nodes always carry a literal production")
    };
    if let Some(existing) = state.literal_result(text, offset) {
        state.memo_hits += 1;
        return existing;
    }
    let len = u32::try_from(len).expect("literal length fits in u32");
    let children: Vec<NodeId> = (offset..offset + len).map(|o| state.char_node(o)).collect();
    let node = state.forest.alloc(ParseNode::Appl {
        production: production.clone(),
        children,
        span: Span::new(offset, offset + len),
    });
    state.insert_literal_result(text, offset, node);
    node
}
