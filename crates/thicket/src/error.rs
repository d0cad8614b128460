//! # Error Types
//!
//! Errors raised while building a grammar, plus per-parse metrics.
//!
//! Parse-time failures are deliberately *not* represented here: a mismatch
//! during parsing is data, not control flow. The engine reports failures
//! through error container nodes in the forest and a non-`None` error offset
//! on [`crate::engine::ParseOutput`].

use thiserror::Error;

#[cfg(feature = "diagnostics")]
use miette::Diagnostic;

/// Errors detected while constructing a [`crate::grammar::Grammar`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[cfg_attr(feature = "diagnostics", derive(Diagnostic))]
pub enum GrammarError {
    #[error("grammar defines no productions")]
    #[cfg_attr(feature = "diagnostics", diagnostic(code(grammar::empty)))]
    Empty,

    #[error("no start symbol was declared")]
    #[cfg_attr(feature = "diagnostics", diagnostic(code(grammar::missing_start)))]
    MissingStart,

    #[error("start symbol `{name}` has no productions")]
    #[cfg_attr(feature = "diagnostics", diagnostic(code(grammar::undefined_start)))]
    UndefinedStart { name: String },

    #[error("sort `{name}` is referenced but has no productions")]
    #[cfg_attr(feature = "diagnostics", diagnostic(code(grammar::undefined_sort)))]
    UndefinedSort { name: String },

    #[error("invalid character range: {lo} > {hi}")]
    #[cfg_attr(feature = "diagnostics", diagnostic(code(grammar::invalid_char_range)))]
    InvalidCharRange { lo: u32, hi: u32 },
}

/// Counters collected over a single parse.
#[derive(Debug, Clone, Copy, Default)]
pub struct ParseMetrics {
    /// Wall-clock time spent in the scheduling loop.
    pub parse_time: std::time::Duration,
    /// Descriptors popped off the worklist.
    pub descriptors_processed: usize,
    /// Graph-structured stack nodes created.
    pub gss_nodes: usize,
    /// Result nodes allocated in the forest.
    pub nodes_created: usize,
    /// Times a memoized result was reused instead of re-derived.
    pub memo_hits: usize,
}
