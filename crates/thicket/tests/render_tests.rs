//! Tests for the canonical rendering and the forest visitor

use std::ops::ControlFlow;
use thicket::{
    ForestVisitor, GrammarBuilder, NodeId, ParseForest, Parser, Production, Span, Symbol,
};

fn ambiguous_grammar() -> thicket::Grammar {
    // S ::= A | B; A ::= 'a'; B ::= 'a'
    GrammarBuilder::new()
        .start("S")
        .rule("S", [Symbol::sort("A")])
        .rule("S", [Symbol::sort("B")])
        .rule("A", [Symbol::lit("a")])
        .rule("B", [Symbol::lit("a")])
        .build()
        .unwrap()
}

#[test]
fn amb_renders_as_braced_set() {
    let grammar = ambiguous_grammar();
    let output = Parser::new(&grammar).parse("a");
    let rendered = output.render();
    assert!(rendered.starts_with("parsetree(amb({"));
    assert!(rendered.ends_with("}),-1)"));
}

#[test]
fn render_node_omits_the_parsetree_wrapper() {
    let grammar = GrammarBuilder::new()
        .start("S")
        .rule("S", [Symbol::lit("a")])
        .build()
        .unwrap();
    let output = Parser::new(&grammar).parse("a");
    let rendered = thicket::render_node(output.forest(), output.root());
    assert!(rendered.starts_with("appl("));
    assert!(!rendered.contains("parsetree"));
}

#[test]
fn literal_nodes_carry_their_character_leaves() {
    let grammar = GrammarBuilder::new()
        .start("S")
        .rule("S", [Symbol::lit("ab")])
        .build()
        .unwrap();
    let output = Parser::new(&grammar).parse("ab");
    assert_eq!(
        output.render(),
        "parsetree(appl(prod([lit(\"ab\")],sort(\"S\"),\\no-attrs()),\
         [appl(prod([\\char-class([single(97)]),\\char-class([single(98)])],\
         lit(\"ab\"),\\no-attrs()),[char(97),char(98)])]),-1)",
    );
}

#[test]
fn char_class_slots_render_as_char_leaves() {
    let grammar = GrammarBuilder::new()
        .start("S")
        .rule(
            "S",
            [Symbol::char_class(vec![thicket::CharRange::range(
                '0', '9',
            )])],
        )
        .build()
        .unwrap();
    let output = Parser::new(&grammar).parse("7");
    assert_eq!(
        output.render(),
        "parsetree(appl(prod([\\char-class([range(48,57)])],sort(\"S\"),\\no-attrs()),\
         [char(55)]),-1)",
    );
}

/// Records one line per visitor event, in visit order.
#[derive(Default)]
struct EventLog {
    events: Vec<String>,
}

impl ForestVisitor for EventLog {
    fn enter_appl(
        &mut self,
        _id: NodeId,
        production: &Production,
        _children: &[NodeId],
        span: Span,
    ) -> ControlFlow<()> {
        self.events
            .push(format!("appl {} {}..{}", production.lhs(), span.start(), span.end()));
        ControlFlow::Continue(())
    }

    fn enter_amb(&mut self, _id: NodeId, alternatives: &[NodeId], _span: Span) -> ControlFlow<()> {
        self.events.push(format!("amb {}", alternatives.len()));
        ControlFlow::Continue(())
    }

    fn visit_char(&mut self, _id: NodeId, codepoint: u32, _span: Span) -> ControlFlow<()> {
        self.events.push(format!("char {codepoint}"));
        ControlFlow::Continue(())
    }

    fn enter_error(
        &mut self,
        _id: NodeId,
        symbol: &Symbol,
        _children: &[NodeId],
        _unmatched: &[NodeId],
        _span: Span,
        in_list: bool,
    ) -> ControlFlow<()> {
        self.events.push(format!("error {symbol} list={in_list}"));
        ControlFlow::Continue(())
    }

    fn visit_cycle(&mut self, _id: NodeId, _span: Span) -> ControlFlow<()> {
        self.events.push("cycle".into());
        ControlFlow::Continue(())
    }
}

#[test]
fn visitor_sees_amb_and_both_alternatives() {
    let grammar = ambiguous_grammar();
    let output = Parser::new(&grammar).parse("a");
    let mut log = EventLog::default();
    let _ = output.forest().walk_with(output.root(), &mut log);
    assert_eq!(log.events[0], "amb 2");
    let sort_entries = log
        .events
        .iter()
        .filter(|e| e.starts_with("appl sort"))
        .count();
    // One S-labelled appl per alternative plus one A and one B.
    assert_eq!(sort_entries, 4);
    assert!(log.events.iter().any(|e| e == "char 97"));
}

#[test]
fn visitor_traversal_is_preorder() {
    let grammar = GrammarBuilder::new()
        .start("S")
        .rule("S", [Symbol::sort("A"), Symbol::sort("B")])
        .rule("A", [Symbol::lit("a")])
        .rule("B", [Symbol::lit("b")])
        .build()
        .unwrap();
    let output = Parser::new(&grammar).parse("ab");
    let mut log = EventLog::default();
    let _ = output.forest().walk_with(output.root(), &mut log);
    assert_eq!(
        log.events,
        vec![
            "appl sort(\"S\") 0..2",
            "appl sort(\"A\") 0..1",
            "appl lit(\"a\") 0..1",
            "char 97",
            "appl sort(\"B\") 1..2",
            "appl lit(\"b\") 1..2",
            "char 98",
        ],
    );
}

#[test]
fn visitor_can_stop_early() {
    struct StopAtFirstChar;
    impl ForestVisitor for StopAtFirstChar {
        fn visit_char(&mut self, _id: NodeId, _codepoint: u32, _span: Span) -> ControlFlow<()> {
            ControlFlow::Break(())
        }
    }
    let grammar = GrammarBuilder::new()
        .start("S")
        .rule("S", [Symbol::lit("ab")])
        .build()
        .unwrap();
    let output = Parser::new(&grammar).parse("ab");
    let flow = output.forest().walk_with(output.root(), &mut StopAtFirstChar);
    assert_eq!(flow, ControlFlow::Break(()));
}

#[test]
fn visitor_reports_cycles_instead_of_looping() {
    let grammar = GrammarBuilder::new()
        .start("S")
        .rule("S", [Symbol::sort("S")])
        .rule("S", [Symbol::lit("a")])
        .build()
        .unwrap();
    let output = Parser::new(&grammar).parse("a");
    let mut log = EventLog::default();
    let _ = output.forest().walk_with(output.root(), &mut log);
    assert!(log.events.iter().any(|e| e == "cycle"));
}

#[test]
fn visitor_distinguishes_list_errors() {
    let grammar = GrammarBuilder::new()
        .start("S")
        .rule("S", [Symbol::iter(Symbol::lit("a")), Symbol::lit(";")])
        .build()
        .unwrap();
    let output = Parser::new(&grammar).parse("ab");
    let mut log = EventLog::default();
    let _ = output.forest().walk_with(output.root(), &mut log);
    assert!(log
        .events
        .iter()
        .any(|e| e.starts_with("error iter(lit(\"a\")) list=true")));
}

#[test]
fn tree_equals_ignores_amb_ordering() {
    // Build two forests whose amb alternatives were discovered in a different
    // order by reversing the rule declarations.
    let forward = ambiguous_grammar();
    let backward = GrammarBuilder::new()
        .start("S")
        .rule("S", [Symbol::sort("B")])
        .rule("S", [Symbol::sort("A")])
        .rule("A", [Symbol::lit("a")])
        .rule("B", [Symbol::lit("a")])
        .build()
        .unwrap();
    let first = Parser::new(&forward).parse("a");
    let second = Parser::new(&backward).parse("a");
    assert!(first
        .forest()
        .tree_equals(first.root(), second.forest(), second.root()));
}

#[test]
fn tree_equals_rejects_different_trees() {
    let grammar_a = GrammarBuilder::new()
        .start("S")
        .rule("S", [Symbol::lit("a")])
        .build()
        .unwrap();
    let grammar_b = GrammarBuilder::new()
        .start("S")
        .rule("S", [Symbol::lit("b")])
        .build()
        .unwrap();
    let first = Parser::new(&grammar_a).parse("a");
    let second = Parser::new(&grammar_b).parse("b");
    assert!(!first
        .forest()
        .tree_equals(first.root(), second.forest(), second.root()));
}

#[test]
fn forest_accessors_expose_structure() {
    let grammar = ambiguous_grammar();
    let output = Parser::new(&grammar).parse("a");
    let forest: &ParseForest = output.forest();
    let alternatives = forest.amb_alternatives(output.root()).unwrap();
    for &alt in alternatives {
        let (production, children) = forest.appl(alt).unwrap();
        assert_eq!(production.lhs(), &Symbol::sort("S"));
        assert_eq!(children.len(), 1);
    }
    assert!(forest.appl(output.root()).is_none());
}
