//! Best-effort recovery when no derivation spans the whole input.
//!
//! Failures are data: instead of aborting, the engine wraps the longest
//! recognized prefix in an error container together with the raw character
//! leaves it could not consume. Callers get a valid forest node they can
//! render, report, or skip, plus the offset of the first unmatched character.

use crate::engine::state::ParseState;
use crate::forest::{NodeId, ParseNode, Span};
use crate::grammar::{Grammar, SortId};

/// Outcome of a drained worklist.
pub(crate) enum Outcome {
    /// A result node spans the entire input.
    Success(NodeId),
    /// A partial tree was built; `error_offset` is the first unmatched
    /// character's position.
    Partial { root: NodeId, error_offset: usize },
}

/// Read out the full-span result for the start sort, or construct the error
/// container for the best partial parse. With `attach_partial` disabled the
/// container stays empty and only the offset is reported.
pub(crate) fn finish(grammar: &Grammar, state: &mut ParseState, attach_partial: bool) -> Outcome {
    let start = grammar.start();
    let len = state.input_len();
    if let Some(&root) = state.sort_results.get(&(start, 0, len)) {
        return Outcome::Success(root);
    }

    // Wrap the longest recognized prefix of the start sort. When the start
    // sort recognized nothing, fall back to the farthest-reaching sort at
    // offset 0, preferring iteration sorts on ties so a failed list keeps its
    // already-parsed elements.
    let prefix = (0..=len)
        .rev()
        .find_map(|end| state.sort_results.get(&(start, 0, end)).map(|&n| (end, n)));
    let (wrapped, matched_to, mut children) = match prefix {
        Some((end, node)) => (start, end, vec![node]),
        None => match farthest_prefix(grammar, state) {
            Some((sort, end, node)) => (sort, end, vec![node]),
            None => (start, 0, Vec::new()),
        },
    };

    let mut unmatched: Vec<NodeId> = (matched_to..len).map(|o| state.char_node(o)).collect();
    if !attach_partial {
        children.clear();
        unmatched.clear();
    }

    let symbol = grammar.sort(wrapped).symbol.clone();
    let span = Span::new(0, len);
    let node = if symbol.is_iteration() {
        ParseNode::ErrorList {
            symbol,
            children,
            unmatched,
            span,
        }
    } else {
        ParseNode::ErrorSort {
            symbol,
            children,
            unmatched,
            span,
        }
    };
    let root = state.forest.alloc(node);
    Outcome::Partial {
        root,
        error_offset: matched_to as usize,
    }
}

/// The farthest-reaching non-empty result at offset 0, tie-broken toward
/// iteration sorts and then lower sort ids for determinism.
fn farthest_prefix(grammar: &Grammar, state: &ParseState) -> Option<(SortId, u32, NodeId)> {
    let mut best: Option<(SortId, u32, NodeId)> = None;
    for (&(sort, start, end), &node) in &state.sort_results {
        if start != 0 || end == 0 {
            continue;
        }
        let better = match best {
            None => true,
            Some((best_sort, best_end, _)) => {
                let iteration = grammar.sort(sort).symbol.is_iteration();
                let best_iteration = grammar.sort(best_sort).symbol.is_iteration();
                end > best_end
                    || (end == best_end && iteration && !best_iteration)
                    || (end == best_end
                        && iteration == best_iteration
                        && sort.index() < best_sort.index())
            }
        };
        if better {
            best = Some((sort, end, node));
        }
    }
    best
}
