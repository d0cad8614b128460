//! Canonical textual serialization of parse forests.
//!
//! The format is the interoperability contract of the crate:
//!
//! ```text
//! ParseTree ::= "parsetree(" Tree "," ErrorOffset ")"
//! Tree      ::= "appl(" Production ",[" Tree,* "])"
//!             | "amb({" Tree,* "})"
//!             | "char(" codepoint ")"
//! ```
//!
//! `amb` renders its alternatives in arena order; the alternative set is
//! semantically unordered, so consumers (and tests) must compare it as a set.
//! Back-edges in cyclic forests render as `cycle(<symbol>)`.

use crate::forest::{NodeId, ParseForest, ParseNode};
use hashbrown::HashSet;
use std::fmt::Write;

/// Render a complete parse tree, including the error offset (`-1` when the
/// parse succeeded).
#[must_use]
pub fn render_parse_tree(
    forest: &ParseForest,
    root: NodeId,
    error_offset: Option<usize>,
) -> String {
    let mut out = String::new();
    out.push_str("parsetree(");
    let mut in_progress = HashSet::new();
    write_node(forest, root, &mut out, &mut in_progress);
    match error_offset {
        None => out.push_str(",-1)"),
        Some(offset) => {
            let _ = write!(out, ",{offset})");
        }
    }
    out
}

/// Render a single forest node.
#[must_use]
pub fn render_node(forest: &ParseForest, id: NodeId) -> String {
    let mut out = String::new();
    let mut in_progress = HashSet::new();
    write_node(forest, id, &mut out, &mut in_progress);
    out
}

fn write_node(
    forest: &ParseForest,
    id: NodeId,
    out: &mut String,
    in_progress: &mut HashSet<NodeId>,
) {
    if !in_progress.insert(id) {
        write_cycle(forest, id, out);
        return;
    }
    match forest.node(id) {
        ParseNode::Appl {
            production,
            children,
            ..
        } => {
            let _ = write!(out, "appl({production},[");
            write_list(forest, children, out, in_progress);
            out.push_str("])");
        }
        ParseNode::Char { codepoint, .. } => {
            let _ = write!(out, "char({codepoint})");
        }
        ParseNode::Amb { alternatives, .. } => {
            out.push_str("amb({");
            write_list(forest, alternatives, out, in_progress);
            out.push_str("})");
        }
        ParseNode::ErrorSort {
            symbol,
            children,
            unmatched,
            ..
        } => {
            let _ = write!(out, "error({symbol},[");
            write_list(forest, children, out, in_progress);
            out.push_str("],[");
            write_list(forest, unmatched, out, in_progress);
            out.push_str("])");
        }
        ParseNode::ErrorList {
            symbol,
            children,
            unmatched,
            ..
        } => {
            let _ = write!(out, "\\error-list({symbol},[");
            write_list(forest, children, out, in_progress);
            out.push_str("],[");
            write_list(forest, unmatched, out, in_progress);
            out.push_str("])");
        }
    }
    in_progress.remove(&id);
}

fn write_list(
    forest: &ParseForest,
    ids: &[NodeId],
    out: &mut String,
    in_progress: &mut HashSet<NodeId>,
) {
    for (i, &child) in ids.iter().enumerate() {
        if i > 0 {
            out.push(',');
        }
        write_node(forest, child, out, in_progress);
    }
}

// A node that contains itself renders as a cycle marker labelled with the
// symbol it yields.
fn write_cycle(forest: &ParseForest, id: NodeId, out: &mut String) {
    let symbol = yielded_symbol(forest, id);
    match symbol {
        Some(text) => {
            let _ = write!(out, "cycle({text})");
        }
        None => out.push_str("cycle()"),
    }
}

fn yielded_symbol(forest: &ParseForest, id: NodeId) -> Option<String> {
    match forest.node(id) {
        ParseNode::Appl { production, .. } => Some(production.lhs().to_string()),
        ParseNode::Amb { alternatives, .. } => alternatives
            .first()
            .and_then(|&alt| yielded_symbol(forest, alt)),
        ParseNode::ErrorSort { symbol, .. } | ParseNode::ErrorList { symbol, .. } => {
            Some(symbol.to_string())
        }
        ParseNode::Char { .. } => None,
    }
}
