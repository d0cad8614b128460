//! # Grammar Module
//!
//! Grammar definition and compilation for context-free grammars.
//!
//! ## Overview
//!
//! A [`Grammar`] is built once with [`GrammarBuilder`] and is immutable
//! afterwards: each sort owns a fixed list of alternatives, each compiled into
//! a sequence of [`StackNode`] templates. Structured symbols (`opt`, `iter`,
//! `seq`) are desugared into synthetic sorts during construction so the engine
//! only ever deals with sorts, literals, and character classes.
//!
//! A built grammar is `Send + Sync` and can be shared read-only across any
//! number of concurrent parses.
//!
//! ## Usage
//!
//! ```rust
//! use thicket::grammar::{GrammarBuilder, Symbol};
//!
//! let grammar = GrammarBuilder::new()
//!     .start("S")
//!     .rule("S", [Symbol::sort("A"), Symbol::sort("B")])
//!     .rule("A", [Symbol::lit("a")])
//!     .rule("B", [Symbol::lit("b")])
//!     .build()?;
//! # Ok::<(), thicket::GrammarError>(())
//! ```

mod builder;
mod production;
mod stack_node;
mod symbol;

pub use builder::GrammarBuilder;
pub use production::Production;
pub use stack_node::{MatchResult, SortId, StackNode};
pub use symbol::{Associativity, Attribute, Attributes, CharRange, Symbol};

use crate::intern::FrozenInterner;
use smallvec::SmallVec;
use std::sync::Arc;

/// One compiled right-hand-side alternative.
#[derive(Debug, Clone)]
pub(crate) struct Alternative {
    /// The sort this alternative yields.
    pub lhs: SortId,
    /// The production, used to label application nodes.
    pub production: Arc<Production>,
    /// The right-hand side as stack node templates, in order.
    pub slots: Box<[StackNode]>,
}

/// Per-sort data: the labelling symbol and the fixed alternative list.
#[derive(Debug, Clone)]
pub(crate) struct SortData {
    pub symbol: Symbol,
    pub alternatives: SmallVec<[u32; 4]>,
}

/// An immutable, compiled grammar.
#[derive(Debug)]
pub struct Grammar {
    pub(crate) interner: FrozenInterner,
    pub(crate) named: hashbrown::HashMap<crate::intern::InternedStr, SortId, ahash::RandomState>,
    pub(crate) sorts: Vec<SortData>,
    pub(crate) alternatives: Vec<Alternative>,
    pub(crate) start: SortId,
}

impl Grammar {
    /// The symbol parsing starts from.
    #[must_use]
    pub fn start_symbol(&self) -> &Symbol {
        &self.sorts[self.start.index()].symbol
    }

    /// Number of sorts, including synthetic sorts created by desugaring.
    #[must_use]
    pub fn sort_count(&self) -> usize {
        self.sorts.len()
    }

    /// Number of compiled alternatives across all sorts.
    #[must_use]
    pub fn alternative_count(&self) -> usize {
        self.alternatives.len()
    }

    /// Expand a sort into its fixed set of alternatives.
    ///
    /// This set is established when the grammar is built and never changes
    /// during a parse.
    #[must_use]
    pub(crate) fn alternatives_of(&self, sort: SortId) -> &[u32] {
        &self.sorts[sort.index()].alternatives
    }

    pub(crate) fn alternative(&self, id: u32) -> &Alternative {
        &self.alternatives[id as usize]
    }

    pub(crate) fn sort(&self, id: SortId) -> &SortData {
        &self.sorts[id.index()]
    }

    pub(crate) const fn start(&self) -> SortId {
        self.start
    }

    /// Look up a named sort.
    #[must_use]
    pub fn sort_named(&self, name: &str) -> Option<&Symbol> {
        let key = self.interner.get(name)?;
        let id = *self.named.get(&key)?;
        Some(&self.sorts[id.index()].symbol)
    }
}
