//! Grammar construction.
//!
//! The builder collects `sort ::= rhs` rules, then compiles them in one pass:
//! named sorts get stable ids, structured symbols are desugared into synthetic
//! sorts, and every right-hand side becomes a sequence of stack node
//! templates. Literal symbols get an auto-generated production
//! `prod([\char-class(..) ...], lit(text), \no-attrs())` shared by every
//! occurrence of the same literal text.

use crate::error::GrammarError;
use crate::grammar::symbol::{Attributes, CharRange, Symbol};
use crate::grammar::{Alternative, Grammar, Production, SortData, SortId, StackNode};
use crate::intern::{InternedStr, Interner};
use compact_str::CompactString;
use hashbrown::HashMap;
use smallvec::SmallVec;
use std::collections::VecDeque;
use std::sync::Arc;

/// Builder for [`Grammar`].
///
/// Rules for the same sort accumulate as alternatives. Desugaring rules for
/// structured symbols:
///
/// - `opt(s)`       becomes `opt(s) ::= s | ε`
/// - `iter(s)`      becomes `iter(s) ::= iter(s) s | s`
/// - `iter-seps`    becomes `it ::= it sep s | s`
/// - `seq([..])`    becomes `seq([..]) ::= ..`
///
/// The generated productions keep the structured symbol as their left-hand
/// side, so forest labels and rendering stay faithful to the written grammar.
#[derive(Debug, Default)]
pub struct GrammarBuilder {
    rules: Vec<(CompactString, Vec<Symbol>, Attributes)>,
    start: Option<CompactString>,
}

impl GrammarBuilder {
    /// Create an empty builder.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Declare the start sort.
    #[must_use]
    pub fn start(mut self, name: &str) -> Self {
        self.start = Some(name.into());
        self
    }

    /// Add one alternative for `name`.
    #[must_use]
    pub fn rule(self, name: &str, rhs: impl IntoIterator<Item = Symbol>) -> Self {
        self.rule_with_attributes(name, rhs, Attributes::NoAttrs)
    }

    /// Add one alternative for `name`, carrying attributes.
    #[must_use]
    pub fn rule_with_attributes(
        mut self,
        name: &str,
        rhs: impl IntoIterator<Item = Symbol>,
        attributes: Attributes,
    ) -> Self {
        self.rules
            .push((name.into(), rhs.into_iter().collect(), attributes));
        self
    }

    /// Compile the collected rules into an immutable grammar.
    ///
    /// # Errors
    ///
    /// Fails on an empty rule set, a missing or undefined start sort, a
    /// reference to a sort without productions, or an inverted character
    /// range.
    pub fn build(self) -> Result<Grammar, GrammarError> {
        if self.rules.is_empty() {
            return Err(GrammarError::Empty);
        }
        let start_name = self.start.ok_or(GrammarError::MissingStart)?;

        let mut compiler = Compiler::default();

        // First pass: ids for every named sort that has at least one rule.
        for (name, _, _) in &self.rules {
            let key = compiler.interner.intern(name);
            if !compiler.named.contains_key(&key) {
                let id = compiler.push_sort(Symbol::Sort(name.clone()));
                compiler.named.insert(key, id);
            }
        }

        let start = compiler
            .interner
            .get(&start_name)
            .and_then(|key| compiler.named.get(&key).copied())
            .ok_or(GrammarError::UndefinedStart {
                name: start_name.into(),
            })?;

        let mut work: VecDeque<(SortId, Vec<Symbol>, Attributes)> = self
            .rules
            .into_iter()
            .map(|(name, rhs, attrs)| {
                let key = compiler.interner.intern(&name);
                (compiler.named[&key], rhs, attrs)
            })
            .collect();

        while let Some((lhs, rhs, attrs)) = work.pop_front() {
            compiler.compile_alternative(lhs, rhs, attrs, &mut work)?;
        }

        Ok(Grammar {
            interner: compiler.interner.freeze(),
            named: compiler.named,
            sorts: compiler.sorts,
            alternatives: compiler.alternatives,
            start,
        })
    }
}

#[derive(Default)]
struct Compiler {
    interner: Interner,
    named: HashMap<InternedStr, SortId, ahash::RandomState>,
    synthetic: HashMap<Symbol, SortId, ahash::RandomState>,
    literal_productions: HashMap<CompactString, Arc<Production>, ahash::RandomState>,
    sorts: Vec<SortData>,
    alternatives: Vec<Alternative>,
}

impl Compiler {
    fn push_sort(&mut self, symbol: Symbol) -> SortId {
        let id = SortId(u32::try_from(self.sorts.len()).expect("sort count fits in u32"));
        self.sorts.push(SortData {
            symbol,
            alternatives: SmallVec::new(),
        });
        id
    }

    fn compile_alternative(
        &mut self,
        lhs: SortId,
        rhs: Vec<Symbol>,
        attributes: Attributes,
        work: &mut VecDeque<(SortId, Vec<Symbol>, Attributes)>,
    ) -> Result<(), GrammarError> {
        let lhs_symbol = self.sorts[lhs.index()].symbol.clone();
        let production = Arc::new(Production::with_attributes(
            rhs.clone(),
            lhs_symbol,
            attributes,
        ));

        let mut slots = Vec::with_capacity(rhs.len());
        for (position, symbol) in rhs.into_iter().enumerate() {
            let id = u32::try_from(position).expect("rhs length fits in u32");
            slots.push(self.compile_slot(id, symbol, work)?);
        }

        let alt_id =
            u32::try_from(self.alternatives.len()).expect("alternative count fits in u32");
        self.alternatives.push(Alternative {
            lhs,
            production,
            slots: slots.into_boxed_slice(),
        });
        self.sorts[lhs.index()].alternatives.push(alt_id);
        Ok(())
    }

    fn compile_slot(
        &mut self,
        id: u32,
        symbol: Symbol,
        work: &mut VecDeque<(SortId, Vec<Symbol>, Attributes)>,
    ) -> Result<StackNode, GrammarError> {
        match symbol {
            Symbol::Sort(name) => {
                let sort = self
                    .interner
                    .get(&name)
                    .and_then(|key| self.named.get(&key).copied())
                    .ok_or(GrammarError::UndefinedSort { name: name.into() })?;
                Ok(StackNode::Sort { id, sort })
            }
            Symbol::Literal(text) => {
                let production = self.literal_production(&text);
                let chars: Vec<u32> = text.chars().map(u32::from).collect();
                Ok(StackNode::Literal {
                    id,
                    production,
                    chars: chars.into_boxed_slice(),
                })
            }
            Symbol::CharClass(ranges) => {
                validate_ranges(&ranges)?;
                Ok(StackNode::CharClass {
                    id,
                    ranges: ranges.into_boxed_slice(),
                })
            }
            structured => {
                let sort = self.synthetic_sort(structured, work);
                Ok(StackNode::Sort { id, sort })
            }
        }
    }

    /// The shared production for a literal: one single-codepoint character
    /// class per character, yielding `lit(text)`.
    fn literal_production(&mut self, text: &str) -> Arc<Production> {
        if let Some(existing) = self.literal_productions.get(text) {
            return existing.clone();
        }
        let rhs = text
            .chars()
            .map(|c| Symbol::CharClass(vec![CharRange::single(c)]))
            .collect();
        let production = Arc::new(Production::new(rhs, Symbol::lit(text)));
        self.literal_productions
            .insert(text.into(), production.clone());
        production
    }

    /// Sort backing a structured symbol, creating its generated productions
    /// on first encounter. Keyed structurally, so repeated occurrences of the
    /// same structured symbol share one sort.
    fn synthetic_sort(
        &mut self,
        symbol: Symbol,
        work: &mut VecDeque<(SortId, Vec<Symbol>, Attributes)>,
    ) -> SortId {
        if let Some(&existing) = self.synthetic.get(&symbol) {
            return existing;
        }
        let id = self.push_sort(symbol.clone());
        self.synthetic.insert(symbol.clone(), id);

        match symbol {
            Symbol::Optional(inner) => {
                work.push_back((id, vec![*inner], Attributes::NoAttrs));
                work.push_back((id, vec![], Attributes::NoAttrs));
            }
            Symbol::Iteration {
                ref element,
                separator: None,
            } => {
                work.push_back((
                    id,
                    vec![symbol.clone(), (**element).clone()],
                    Attributes::NoAttrs,
                ));
                work.push_back((id, vec![(**element).clone()], Attributes::NoAttrs));
            }
            Symbol::Iteration {
                ref element,
                separator: Some(ref sep),
            } => {
                work.push_back((
                    id,
                    vec![symbol.clone(), (**sep).clone(), (**element).clone()],
                    Attributes::NoAttrs,
                ));
                work.push_back((id, vec![(**element).clone()], Attributes::NoAttrs));
            }
            Symbol::Sequence(parts) => {
                work.push_back((id, parts, Attributes::NoAttrs));
            }
            Symbol::Sort(_) | Symbol::Literal(_) | Symbol::CharClass(_) => {
                unreachable!("flat symbols are compiled directly into slots")
            }
        }
        id
    }
}

fn validate_ranges(ranges: &[CharRange]) -> Result<(), GrammarError> {
    for range in ranges {
        if let CharRange::Range(lo, hi) = *range {
            if lo > hi {
                return Err(GrammarError::InvalidCharRange { lo, hi });
            }
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_grammar_is_rejected() {
        assert!(matches!(
            GrammarBuilder::new().build(),
            Err(GrammarError::Empty)
        ));
    }

    #[test]
    fn missing_start_is_rejected() {
        let result = GrammarBuilder::new()
            .rule("S", [Symbol::lit("a")])
            .build();
        assert!(matches!(result, Err(GrammarError::MissingStart)));
    }

    #[test]
    fn undefined_start_is_rejected() {
        let result = GrammarBuilder::new()
            .start("T")
            .rule("S", [Symbol::lit("a")])
            .build();
        assert!(matches!(
            result,
            Err(GrammarError::UndefinedStart { name }) if name == "T"
        ));
    }

    #[test]
    fn undefined_sort_reference_is_rejected() {
        let result = GrammarBuilder::new()
            .start("S")
            .rule("S", [Symbol::sort("Missing")])
            .build();
        assert!(matches!(
            result,
            Err(GrammarError::UndefinedSort { name }) if name == "Missing"
        ));
    }

    #[test]
    fn inverted_char_range_is_rejected() {
        let result = GrammarBuilder::new()
            .start("S")
            .rule("S", [Symbol::char_class(vec![CharRange::Range(98, 97)])])
            .build();
        assert!(matches!(
            result,
            Err(GrammarError::InvalidCharRange { lo: 98, hi: 97 })
        ));
    }

    #[test]
    fn alternatives_accumulate_per_sort() {
        let grammar = GrammarBuilder::new()
            .start("S")
            .rule("S", [Symbol::lit("a")])
            .rule("S", [Symbol::lit("b")])
            .build()
            .unwrap();
        assert_eq!(grammar.alternatives_of(grammar.start()).len(), 2);
    }

    #[test]
    fn structured_symbols_create_synthetic_sorts() {
        let grammar = GrammarBuilder::new()
            .start("S")
            .rule("S", [Symbol::optional(Symbol::lit("a")), Symbol::lit("b")])
            .build()
            .unwrap();
        // "S" plus the synthetic sort for opt(lit("a")).
        assert_eq!(grammar.sort_count(), 2);
        // S ::= opt b, opt ::= 'a', opt ::= ε.
        assert_eq!(grammar.alternative_count(), 3);
    }

    #[test]
    fn repeated_structured_symbols_share_one_sort() {
        let iter_a = Symbol::iter(Symbol::lit("a"));
        let grammar = GrammarBuilder::new()
            .start("S")
            .rule("S", [iter_a.clone(), Symbol::lit(";"), iter_a])
            .build()
            .unwrap();
        assert_eq!(grammar.sort_count(), 2);
    }

    #[test]
    fn literal_productions_are_shared() {
        let grammar = GrammarBuilder::new()
            .start("S")
            .rule("S", [Symbol::lit("a"), Symbol::lit("a")])
            .build()
            .unwrap();
        let alt = grammar.alternative(grammar.alternatives_of(grammar.start())[0]);
        let (first, second) = match (&alt.slots[0], &alt.slots[1]) {
            (
                StackNode::Literal { production: p0, .. },
                StackNode::Literal { production: p1, .. },
            ) => (p0, p1),
            other => panic!("expected two literal slots, got {other:?}"),
        };
        assert!(Arc::ptr_eq(first, second));
    }
}
