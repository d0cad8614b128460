//! Per-parse mutable state.
//!
//! Everything here is owned by exactly one parse and mutated only by the
//! scheduling loop; the grammar itself stays read-only throughout.

use crate::engine::gss::{Gss, GssId};
use crate::forest::{NodeId, ParseForest, ParseNode, Span};
use crate::grammar::SortId;
use compact_str::CompactString;
use hashbrown::{HashMap, HashSet};
use std::collections::VecDeque;

/// One schedulable unit of work: a position inside an alternative, bound to
/// an input offset, with the children collected so far.
///
/// Identity covers the collected children, so two derivations that reach the
/// same slot at the same offset through different sub-parses are both kept.
/// The children draw from the finite set of shared result nodes, which keeps
/// the visited set (and therefore the parse) finite. The cost is a weaker
/// scheduling bound: a (slot, offset) pair can be processed once per distinct
/// split of the preceding span, O(P * N^k) for rhs length k rather than
/// O(P * N), still polynomial because results are memoized per span.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub(crate) struct Descriptor {
    pub alternative: u32,
    pub slot: u32,
    pub gss: GssId,
    pub offset: u32,
    pub children: Vec<NodeId>,
}

#[derive(Debug)]
pub(crate) struct ParseState {
    /// The raw character buffer, as codepoints.
    pub input: Vec<u32>,
    pub forest: ParseForest,
    pub gss: Gss,
    pub worklist: VecDeque<Descriptor>,
    visited: HashSet<Descriptor, ahash::RandomState>,
    /// Memo table: completed sorts, keyed (sort, start, end). The single
    /// shared result node per key is the ambiguity merge point.
    pub sort_results: HashMap<(SortId, u32, u32), NodeId, ahash::RandomState>,
    /// Memo table: literal applications, keyed (literal text, offset).
    literal_results: HashMap<(CompactString, u32), NodeId, ahash::RandomState>,
    /// Memo table: character leaves, one slot per input offset.
    char_results: Vec<Option<NodeId>>,
    /// Rightmost offset at which any terminal failed to match.
    pub rightmost_failure: Option<u32>,
    pub descriptors_processed: usize,
    pub memo_hits: usize,
}

impl ParseState {
    pub fn new(input: Vec<u32>) -> Self {
        let len = input.len();
        Self {
            input,
            forest: ParseForest::new(),
            gss: Gss::new(),
            worklist: VecDeque::new(),
            visited: HashSet::default(),
            sort_results: HashMap::default(),
            literal_results: HashMap::default(),
            char_results: vec![None; len],
            rightmost_failure: None,
            descriptors_processed: 0,
            memo_hits: 0,
        }
    }

    /// Enqueue a descriptor unless an identical one was already scheduled.
    pub fn schedule(&mut self, descriptor: Descriptor) {
        if self.visited.insert(descriptor.clone()) {
            self.worklist.push_back(descriptor);
        }
    }

    /// The shared character leaf for `offset`.
    pub fn char_node(&mut self, offset: u32) -> NodeId {
        let slot = offset as usize;
        if let Some(id) = self.char_results[slot] {
            return id;
        }
        let id = self.forest.alloc(ParseNode::Char {
            codepoint: self.input[slot],
            span: Span::new(offset, offset + 1),
        });
        self.char_results[slot] = Some(id);
        id
    }

    /// The shared literal application for (text, offset), if already built.
    pub fn literal_result(&self, text: &str, offset: u32) -> Option<NodeId> {
        self.literal_results
            .get(&(CompactString::from(text), offset))
            .copied()
    }

    pub fn insert_literal_result(&mut self, text: &str, offset: u32, node: NodeId) {
        self.literal_results
            .insert((CompactString::from(text), offset), node);
    }

    pub fn record_failure(&mut self, offset: u32) {
        self.rightmost_failure = Some(match self.rightmost_failure {
            Some(existing) => existing.max(offset),
            None => offset,
        });
    }

    pub fn input_len(&self) -> u32 {
        u32::try_from(self.input.len()).expect("input length fits in u32")
    }
}
