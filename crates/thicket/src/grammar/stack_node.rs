//! Stack node templates.
//!
//! A stack node is one position within a production's right-hand side, used
//! as the engine's scheduling unit. Templates are read-only: the engine binds
//! them to input offsets during a parse but never mutates them, so one
//! compiled grammar serves any number of concurrent parses.

use crate::grammar::symbol::CharRange;
use crate::grammar::Production;
use std::sync::Arc;

/// Identifier of a sort within a compiled grammar.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SortId(pub(crate) u32);

impl SortId {
    #[inline]
    pub(crate) fn index(self) -> usize {
        self.0 as usize
    }
}

/// Outcome of matching a terminal stack node against the input buffer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatchResult {
    /// The node matched; parsing resumes at the contained offset.
    Matched(usize),
    /// The node did not match at the attempted offset.
    NoMatch,
}

/// A position within one production's right-hand side.
///
/// The `id` is the position inside that production, scoped to the production,
/// not globally unique.
#[derive(Debug, Clone)]
pub enum StackNode {
    /// Expects a sort; expansion is driven by the grammar's alternative table.
    Sort { id: u32, sort: SortId },
    /// Expects a fixed character sequence. Carries the literal's own
    /// production (`prod([\char-class(..) ...], lit(text), \no-attrs())`) so a
    /// match can be wrapped into an application over `char(..)` leaves.
    Literal {
        id: u32,
        production: Arc<Production>,
        chars: Box<[u32]>,
    },
    /// Expects a single codepoint from a character class.
    CharClass { id: u32, ranges: Box<[CharRange]> },
}

impl StackNode {
    /// The node's position within its production.
    #[must_use]
    pub const fn id(&self) -> u32 {
        match self {
            Self::Sort { id, .. } | Self::Literal { id, .. } | Self::CharClass { id, .. } => *id,
        }
    }

    /// Match a terminal node against the raw character buffer at `offset`.
    ///
    /// Sort nodes never match directly; they are expanded through the
    /// grammar's alternative table instead.
    #[must_use]
    pub fn match_at(&self, input: &[u32], offset: usize) -> MatchResult {
        match self {
            Self::Sort { .. } => MatchResult::NoMatch,
            Self::Literal { chars, .. } => match input.get(offset..offset + chars.len()) {
                Some(window) if window == &**chars => MatchResult::Matched(offset + chars.len()),
                _ => MatchResult::NoMatch,
            },
            Self::CharClass { ranges, .. } => match input.get(offset) {
                Some(&cp) if ranges.iter().any(|r| r.contains(cp)) => {
                    MatchResult::Matched(offset + 1)
                }
                _ => MatchResult::NoMatch,
            },
        }
    }
}
