//! A small JavaScript-like expression grammar.
//!
//! Where the calculator evaluates, this grammar preserves structure: binary
//! operators synthesize `{type, operator, left, right}` records nested to
//! the right, and literals stay typed leaf records.

use serde_json::{json, Value};

use crate::grammar::{alt, lit, refn, rx, seq, Grammar, GrammarNode};

/// Collapses a `(operand, continuation?)` pair into either the operand's AST
/// or a binary-expression record.
fn binary_record() -> Value {
    json!([
        "?",
        ["==", ["len", ["$", "/ast/children"]], 1],
        ["$", "/ast/children/0"],
        [
            "o.del",
            [
                "o.set",
                ["$", "/ast"],
                "left",
                ["$", "/ast/children/0"],
                "operator",
                ["$", "/ast/children/1/op"],
                "right",
                ["$", "/ast/children/1/value"]
            ],
            "children"
        ]
    ])
}

fn continuation(operator_class: &str, operand: &str) -> GrammarNode {
    alt([
        seq([
            refn("Whitespace"),
            rx(operator_class).ast(json!(["$", "/cst/raw"])),
            refn("Whitespace"),
            refn(operand),
        ])
        .ast(json!({
            "op": ["$", "/ast/children/0"],
            "value": ["$", "/ast/children/1"]
        })),
        lit("").suppress_ast(),
    ])
    .leaf()
}

pub fn grammar() -> Grammar {
    Grammar::new(
        "Program",
        [
            ("Program", refn("Expression")),
            ("Whitespace", rx(r"\s*").suppress_ast()),
            (
                "Expression",
                alt([refn("AdditiveExpression"), refn("Literal")]),
            ),
            (
                "AdditiveExpression",
                seq([refn("MultiplicativeExpression"), refn("AdditiveCont")])
                    .ast(binary_record()),
            ),
            ("AdditiveCont", continuation(r"[+\-]", "AdditiveExpression")),
            (
                "MultiplicativeExpression",
                seq([refn("Literal"), refn("MultiplicativeCont")]).ast(binary_record()),
            ),
            (
                "MultiplicativeCont",
                continuation(r"[*/]", "MultiplicativeExpression"),
            ),
            (
                "Literal",
                alt([
                    refn("NullLiteral"),
                    refn("BooleanLiteral"),
                    refn("NumericLiteral"),
                ])
                .ast(json!(["$", "/ast/children/0"])),
            ),
            ("NullLiteral", lit("null")),
            ("BooleanLiteral", rx("true|false")),
            ("NumericLiteral", rx(r"\d+")),
        ],
    )
}
