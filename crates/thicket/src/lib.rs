//! # Thicket
//!
//! A scannerless generalized parser for arbitrary context-free grammars.
//!
//! Thicket parses directly over characters, with no tokenizer, and accepts
//! the full class of context-free grammars: ambiguous, left-recursive,
//! right-recursive, and cyclic grammars all go through the same scheduling
//! loop. Where a deterministic parser would have to reject a grammar or pick
//! one derivation, thicket produces a shared parse forest in which every
//! derivation is present and ambiguities are explicit `amb` nodes.
//!
//! ## Architecture
//!
//! - [`grammar`]: symbols, productions, and the builder that compiles them
//!   into stack-node templates. Structured symbols (`opt`, `iter`, `seq`) are
//!   desugared into synthetic sorts at build time.
//! - [`engine`]: the worklist scheduler over a graph-structured stack, with
//!   span-keyed memoization and best-effort error recovery.
//! - [`forest`]: the result model (application, character, ambiguity, and
//!   error-container nodes), the canonical textual rendering, and a visitor
//!   for traversal.
//!
//! ## Quick start
//!
//! ```
//! use thicket::{GrammarBuilder, Parser, Symbol};
//!
//! // S ::= S S | 'a'  over "aa"
//! let grammar = GrammarBuilder::new()
//!     .start("S")
//!     .rule("S", [Symbol::sort("S"), Symbol::sort("S")])
//!     .rule("S", [Symbol::lit("a")])
//!     .build()?;
//!
//! let output = Parser::new(&grammar).parse("aa");
//! assert!(output.is_success());
//! assert!(output.render().starts_with("parsetree("));
//! # Ok::<(), thicket::GrammarError>(())
//! ```
//!
//! ## Feature flags
//!
//! - `serialize`: `serde` support for forests, spans, symbols, and
//!   productions.
//! - `diagnostics`: `miette` diagnostics on grammar construction errors.

pub mod engine;
pub mod error;
pub mod forest;
pub mod grammar;

mod intern;

pub use engine::{ParseConfig, ParseOutput, Parser};
pub use error::{GrammarError, ParseMetrics};
pub use forest::{
    render_node, render_parse_tree, ForestVisitor, NodeId, ParseForest, ParseNode, Span,
};
pub use grammar::{
    Associativity, Attribute, Attributes, CharRange, Grammar, GrammarBuilder, Production, Symbol,
};
