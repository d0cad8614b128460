//! # Parse Engine Module
//!
//! The generalized scannerless parser: a worklist of descriptors scheduled
//! over a graph-structured stack, producing a shared parse forest. The engine
//! handles arbitrary context-free grammars, including ambiguous, left- and
//! right-recursive, and cyclic ones, in the same loop with no grammar-class
//! fallbacks.
//!
//! ```
//! use thicket::{GrammarBuilder, Parser, Symbol};
//!
//! let grammar = GrammarBuilder::new()
//!     .start("S")
//!     .rule("S", [Symbol::lit("a"), Symbol::sort("S")])
//!     .rule("S", [Symbol::lit("a")])
//!     .build()
//!     .unwrap();
//! let output = Parser::new(&grammar).parse("aaa");
//! assert!(output.is_success());
//! ```

mod gss;
mod parser;
mod recovery;
mod state;

use crate::error::ParseMetrics;
use crate::forest::{NodeId, ParseForest};
use crate::grammar::Grammar;
use state::ParseState;
use std::time::Instant;

/// Knobs for a single parse.
#[derive(Debug, Clone)]
pub struct ParseConfig {
    /// Build a partial tree with error containers when the parse fails,
    /// instead of an empty error wrapper only.
    pub recovery: bool,
    /// Abort the scheduling loop after this many descriptors. `None` runs to
    /// completion; the loop terminates on every grammar regardless.
    pub max_descriptors: Option<usize>,
}

impl Default for ParseConfig {
    fn default() -> Self {
        Self {
            recovery: true,
            max_descriptors: None,
        }
    }
}

/// A parser for one grammar. Cheap to construct; reusable across inputs.
#[derive(Debug, Clone)]
pub struct Parser<'g> {
    grammar: &'g Grammar,
    config: ParseConfig,
}

impl<'g> Parser<'g> {
    #[must_use]
    pub fn new(grammar: &'g Grammar) -> Self {
        Self {
            grammar,
            config: ParseConfig::default(),
        }
    }

    #[must_use]
    pub fn with_config(grammar: &'g Grammar, config: ParseConfig) -> Self {
        Self { grammar, config }
    }

    /// Parse `input`, producing a forest rooted at the start sort over the
    /// whole input, or a best-effort partial tree with an error offset.
    #[must_use]
    pub fn parse(&self, input: &str) -> ParseOutput {
        let codepoints: Vec<u32> = input.chars().map(u32::from).collect();
        let started = Instant::now();
        let mut state = ParseState::new(codepoints);
        parser::run(self.grammar, &mut state, self.config.max_descriptors);

        let (root, error_offset) =
            match recovery::finish(self.grammar, &mut state, self.config.recovery) {
                recovery::Outcome::Success(root) => (root, None),
                recovery::Outcome::Partial { root, error_offset } => (root, Some(error_offset)),
            };
        let metrics = ParseMetrics {
            parse_time: started.elapsed(),
            descriptors_processed: state.descriptors_processed,
            gss_nodes: state.gss.len(),
            nodes_created: state.forest.len(),
            memo_hits: state.memo_hits,
        };
        ParseOutput {
            forest: state.forest,
            root,
            error_offset,
            rightmost_failure: state.rightmost_failure.map(|o| o as usize),
            metrics,
        }
    }
}

/// The result of one parse: the forest, its root, and whether (and where)
/// recovery kicked in.
#[derive(Debug, Clone)]
pub struct ParseOutput {
    forest: ParseForest,
    root: NodeId,
    error_offset: Option<usize>,
    rightmost_failure: Option<usize>,
    metrics: ParseMetrics,
}

impl ParseOutput {
    /// The forest holding every node of this parse.
    #[must_use]
    pub fn forest(&self) -> &ParseForest {
        &self.forest
    }

    /// The root node: the start sort over the whole input, or the error
    /// container recovery built.
    #[must_use]
    pub fn root(&self) -> NodeId {
        self.root
    }

    /// Offset of the first unmatched character, or `None` on success.
    #[must_use]
    pub fn error_offset(&self) -> Option<usize> {
        self.error_offset
    }

    /// Rightmost offset at which any terminal failed to match, regardless of
    /// whether the parse succeeded overall. Useful for "expected something
    /// else here" diagnostics.
    #[must_use]
    pub fn rightmost_failure(&self) -> Option<usize> {
        self.rightmost_failure
    }

    /// Whether a derivation of the start sort spans the entire input.
    #[must_use]
    pub fn is_success(&self) -> bool {
        self.error_offset.is_none()
    }

    /// Counters collected during the parse.
    #[must_use]
    pub fn metrics(&self) -> &ParseMetrics {
        &self.metrics
    }

    /// The canonical textual form, `parsetree(TREE,OFFSET)` with offset `-1`
    /// on success.
    #[must_use]
    pub fn render(&self) -> String {
        crate::forest::render_parse_tree(&self.forest, self.root, self.error_offset)
    }

    /// Structural equality with another parse's result tree. Ambiguity
    /// clusters compare as unordered sets.
    #[must_use]
    pub fn structurally_equal(&self, other: &Self) -> bool {
        self.error_offset == other.error_offset
            && self.forest.tree_equals(self.root, &other.forest, other.root)
    }
}
