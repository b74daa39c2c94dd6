//! Behavioral guarantees of compiled parsers: determinism, span discipline,
//! match ordering, and termination on adversarial grammars.

use weft::grammar::{alt, list, lit, refn, rx, seq, set, Grammar, Repeat};
use weft::{CompileOptions, CstNode, GrammarCompiler};

fn compile(grammar: Grammar) -> weft::CompiledGrammar {
    GrammarCompiler::new(grammar).compile().unwrap()
}

/// Children lie inside the parent span, in order, edge to edge.
fn assert_span_discipline(node: &CstNode) {
    assert!(node.pos() <= node.end());
    let mut cursor = node.pos();
    for child in node.children() {
        assert_eq!(child.pos(), cursor, "gap before {}", child.ptr().type_name());
        assert!(child.end() <= node.end());
        cursor = child.end();
        assert_span_discipline(child);
    }
    if !node.children().is_empty() {
        assert_eq!(cursor, node.end(), "children do not cover the parent span");
    }
}

#[test]
fn parsing_is_deterministic_across_compilations() {
    let input = r#"{"a": [1, 2], "b": "x"}"#;
    let first = compile(weft::grammars::json::grammar());
    let second = compile(weft::grammars::json::grammar());
    assert_eq!(
        weft::print::print_cst(&first.parse(input).unwrap(), input),
        weft::print::print_cst(&second.parse(input).unwrap(), input)
    );
    assert_eq!(first.ast(input), second.ast(input));
    assert_eq!(first.ast(input), first.ast(input));
}

#[test]
fn production_spans_are_contiguous() {
    let compiled = compile(weft::grammars::json::grammar());
    let input = r#" { "key" : [ true, null ] } "#;
    let cst = compiled.parse(input).unwrap();
    assert_eq!((cst.pos(), cst.end()), (0, input.len()));
    assert_span_discipline(&cst);
}

#[test]
fn sequence_fails_as_a_unit() {
    let compiled = compile(Grammar::new(
        "Pair",
        [("Pair", seq([lit("a"), lit("b")]))],
    ));
    assert!(compiled.parse("ab").is_some());
    // A partial prefix match produces no node at all.
    assert!(compiled.parse("ac").is_none());
    assert!(compiled.parse("a").is_none());
}

#[test]
fn alternation_takes_the_first_match() {
    let compiled = compile(Grammar::new(
        "Choice",
        [("Choice", alt([lit("a"), lit("ab")]))],
    ));
    // "ab" begins with "a", and earlier alternatives win outright.
    let cst = compiled.parse("ab").unwrap();
    assert_eq!((cst.pos(), cst.end()), (0, 1));
}

#[test]
fn repetition_always_matches() {
    let compiled = compile(Grammar::new("Items", [("Items", list(lit("a")))]));
    let empty = compiled.parse("").unwrap();
    assert_eq!((empty.pos(), empty.end()), (0, 0));
    assert!(empty.children().is_empty());
    let three = compiled.parse("aaab").unwrap();
    assert_eq!((three.pos(), three.end()), (0, 3));
    assert_eq!(three.children().len(), 3);
}

#[test]
fn zero_width_list_items_terminate() {
    // The item matches "" anywhere, so the loop must stop on its own.
    let compiled = compile(Grammar::new("Items", [("Items", list(rx("a*")))]));
    let cst = compiled.parse("b").unwrap();
    assert_eq!(cst.end(), 0);
}

#[test]
fn regex_terminals_are_anchored() {
    let compiled = compile(Grammar::new("Digits", [("Digits", rx("[0-9]+"))]));
    assert!(compiled.parse("x12").is_none());
    let cst = compiled.parse("12x").unwrap();
    assert_eq!((cst.pos(), cst.end()), (0, 2));
}

#[test]
fn terminal_sets_try_candidates_in_order() {
    let compiled = compile(Grammar::new(
        "Run",
        [("Run", set(["ab", "a"]).repeat(Repeat::OneOrMore))],
    ));
    // "a" at 0 (after "ab" fails), then "ab" at 1.
    let cst = compiled.parse("aab").unwrap();
    assert_eq!((cst.pos(), cst.end()), (0, 3));
    // OneOrMore needs progress on the first iteration.
    assert!(compiled.parse("xa").is_none());
}

#[test]
fn deep_recursion_terminates() {
    let compiled = compile(Grammar::new(
        "X",
        [("X", alt([seq([lit("("), refn("X"), lit(")")]), lit("")]))],
    ));
    let depth = 200;
    let input = format!("{}{}", "(".repeat(depth), ")".repeat(depth));
    let cst = compiled.parse(&input).unwrap();
    assert_eq!((cst.pos(), cst.end()), (0, input.len()));
}

#[test]
fn suppressed_nodes_stay_in_the_cst_but_leave_the_ast() {
    let grammar = Grammar::new(
        "Pair",
        [("Pair", seq([lit("a").suppress_ast(), lit("b")]))],
    );
    let compiled = compile(grammar);
    let cst = compiled.parse("ab").unwrap();
    assert_eq!(cst.children().len(), 2);
    let ast = compiled.ast("ab").unwrap();
    let children = ast["children"].as_array().unwrap();
    assert_eq!(children.len(), 1);
    assert_eq!(children[0]["raw"], "b");
}

#[test]
fn positions_can_be_omitted_from_default_shapes() {
    let grammar = Grammar::new("Word", [("Word", rx("[a-z]+"))]);
    let opts = CompileOptions {
        positions: false,
        ..CompileOptions::default()
    };
    let compiled = GrammarCompiler::with_options(grammar, opts).compile().unwrap();
    let ast = compiled.ast("hi").unwrap();
    assert_eq!(ast["type"], "Word");
    assert_eq!(ast["raw"], "hi");
    assert!(ast.get("pos").is_none());
    assert!(ast.get("end").is_none());
}

#[test]
fn children_shorthand_agrees_with_the_general_form() {
    use serde_json::{json, Value};
    let items = |expr: Value, leaf: bool| {
        let node = if leaf {
            list(lit("a")).leaf().ast(expr)
        } else {
            list(lit("a")).ast(expr)
        };
        compile(Grammar::new("Items", [("Items", node)]))
    };
    // A leaf list's default shape has no `children` field, so both spellings
    // select nothing.
    let shorthand = items(json!(["$", "/ast/children"]), true);
    let general = items(json!(["$", "/ast/children", Value::Null]), true);
    assert_eq!(shorthand.ast("aa"), general.ast("aa"));
    assert_eq!(shorthand.ast("aa"), Some(Value::Null));
    // A plain list exposes `children`; both spellings yield the array.
    let shorthand = items(json!(["$", "/ast/children"]), false);
    let general = items(json!(["$", "/ast/children", Value::Null]), false);
    assert_eq!(shorthand.ast("aa"), general.ast("aa"));
    assert_eq!(shorthand.ast("aa").unwrap().as_array().unwrap().len(), 2);
    // A named-children production also omits the array from its default.
    let pair = |expr: Value| {
        compile(Grammar::new(
            "Pair",
            [(
                "Pair",
                seq([lit("a"), lit("b")])
                    .named_children([(0, "first")])
                    .ast(expr),
            )],
        ))
    };
    assert_eq!(
        pair(json!(["$", "/ast/children/0"])).ast("ab"),
        pair(json!(["$", "/ast/children/0", Value::Null])).ast("ab")
    );
}

#[test]
fn ast_expressions_can_be_disabled_wholesale() {
    let grammar = Grammar::new(
        "Num",
        [(
            "Num",
            rx("[0-9]+").ast(serde_json::json!(["num", ["$", "/cst/raw"]])),
        )],
    );
    let opts = CompileOptions {
        ast_expressions: false,
        ..CompileOptions::default()
    };
    let compiled = GrammarCompiler::with_options(grammar, opts).compile().unwrap();
    // The expression is ignored; the terminal default shape comes back.
    let ast = compiled.ast("42").unwrap();
    assert_eq!(ast["raw"], "42");
    assert!(ast.get("value").is_none());
}
