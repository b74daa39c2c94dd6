//! Trace capture through debug-instrumented parsers.

use weft::grammar::{alt, lit, refn, seq, Grammar};
use weft::{CompileOptions, GrammarCompiler};

fn debug_opts() -> CompileOptions {
    CompileOptions {
        debug: true,
        ..CompileOptions::default()
    }
}

#[test]
fn successful_parse_records_one_frame_per_entry() {
    let grammar = Grammar::new(
        "Greeting",
        [("Greeting", seq([lit("hello"), lit(" "), lit("world")]))],
    );
    let compiled = GrammarCompiler::with_options(grammar, debug_opts())
        .compile()
        .unwrap();
    let (result, roots) = compiled.trace("hello world");
    assert!(result.is_some());
    assert_eq!(roots.len(), 1);
    let root = &roots[0];
    assert_eq!(root.pattern.type_name(), "Greeting");
    assert_eq!(root.pos, 0);
    let matched = root.matched.as_ref().unwrap();
    assert_eq!((matched.pos(), matched.end()), (0, 11));
    assert_eq!(root.children.len(), 3);
    assert!(root.children.iter().all(|c| c.matched.is_some()));
}

#[test]
fn abandoned_alternatives_stay_in_the_trace() {
    let grammar = Grammar::new("Choice", [("Choice", alt([lit("a"), lit("b")]))]);
    let compiled = GrammarCompiler::with_options(grammar, debug_opts())
        .compile()
        .unwrap();
    let (result, roots) = compiled.trace("b");
    assert!(result.is_some());
    let root = &roots[0];
    assert_eq!(root.children.len(), 2);
    assert!(root.children[0].matched.is_none());
    assert!(root.children[1].matched.is_some());
}

#[test]
fn failed_parse_still_produces_a_trace() {
    let grammar = Grammar::new(
        "Wrap",
        [("Wrap", seq([lit("("), refn("Inner"), lit(")")])), ("Inner", lit("x"))],
    );
    let compiled = GrammarCompiler::with_options(grammar, debug_opts())
        .compile()
        .unwrap();
    let (result, roots) = compiled.trace("(y)");
    assert!(result.is_none());
    assert_eq!(roots.len(), 1);
    assert!(roots[0].matched.is_none());
    // The opening paren matched before Inner failed.
    assert!(roots[0].children[0].matched.is_some());
}

#[test]
fn undebug_parsers_record_nothing() {
    let grammar = Grammar::new("A", [("A", lit("a"))]);
    let compiled = GrammarCompiler::new(grammar).compile().unwrap();
    let (result, roots) = compiled.trace("a");
    assert!(result.is_some());
    assert!(roots.is_empty());
}

#[test]
fn rendered_trace_marks_failures_by_omission() {
    let grammar = Grammar::new("Choice", [("Choice", alt([lit("a"), lit("b")]))]);
    let compiled = GrammarCompiler::with_options(grammar, debug_opts())
        .compile()
        .unwrap();
    let (_, roots) = compiled.trace("b");
    let rendered = weft::print::print_trace(&roots, "b");
    assert!(rendered.contains("Choice 0:1 → \"b\""));
    // The failed first alternative renders with no match suffix.
    assert!(rendered.contains("Text\n"));
}
