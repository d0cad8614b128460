#![no_main]
use libfuzzer_sys::fuzz_target;
use thicket::{GrammarBuilder, Parser, Symbol};

fuzz_target!(|data: &[u8]| {
    let Ok(input) = std::str::from_utf8(data) else {
        return;
    };
    if input.chars().count() > 64 {
        return;
    }

    // Ambiguous and left-recursive on purpose: every path through the
    // scheduling loop, the GSS, and the ambiguity merge gets exercised.
    let grammar = GrammarBuilder::new()
        .start("S")
        .rule("S", [Symbol::sort("S"), Symbol::sort("S")])
        .rule("S", [Symbol::iter(Symbol::sort("A"))])
        .rule("A", [Symbol::lit("a")])
        .rule("A", [Symbol::lit("ab")])
        .rule("A", [Symbol::optional(Symbol::lit("b"))])
        .build()
        .expect("fuzz grammar is well formed");

    let output = Parser::new(&grammar).parse(input);

    assert_eq!(output.is_success(), output.error_offset().is_none());
    let rendered = output.render();
    assert!(rendered.starts_with("parsetree("));
    if let Some(offset) = output.error_offset() {
        assert!(offset <= input.chars().count());
    }

    let again = Parser::new(&grammar).parse(input);
    assert!(output.structurally_equal(&again));
});
