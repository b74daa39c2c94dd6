//! A simple math expression grammar.
//!
//! The AST expressions evaluate the arithmetic during synthesis, so the
//! "AST" of `"1 + 2 * 3"` is simply the number `7`. Operators at the same
//! precedence level associate to the right through the continuation rules.

use serde_json::json;

use crate::grammar::{alt, lit, refn, rx, seq, set, Grammar};

pub fn grammar() -> Grammar {
    Grammar::new(
        "SingleExpression",
        [
            ("Whitespace", rx(r"\s*").suppress_ast()),
            (
                "SingleExpression",
                seq([refn("Whitespace"), refn("Expression"), refn("Whitespace")])
                    .ast(json!(["$", "/ast/children/0"])),
            ),
            (
                "Expression",
                alt([refn("AdditiveExpression"), refn("Literal")])
                    .ast(json!(["$", "/ast/children/0"])),
            ),
            (
                "AdditiveExpression",
                seq([refn("MultiplicativeExpression"), refn("AdditiveCont")]).ast(json!([
                    "?",
                    ["==", ["len", ["$", "/ast/children"]], 1],
                    ["$", "/ast/children/0"],
                    [
                        "?",
                        ["==", ["$", "/ast/children/1/op"], "+"],
                        ["+", ["$", "/ast/children/0"], ["$", "/ast/children/1/value"]],
                        ["-", ["$", "/ast/children/0"], ["$", "/ast/children/1/value"]]
                    ]
                ])),
            ),
            (
                "AdditiveCont",
                alt([
                    seq([
                        refn("Whitespace"),
                        set(["+", "-"]).ast(json!(["$", "/cst/raw"])),
                        refn("Whitespace"),
                        refn("AdditiveExpression"),
                    ])
                    .ast(json!({
                        "op": ["$", "/ast/children/0"],
                        "value": ["$", "/ast/children/1"]
                    })),
                    lit("").suppress_ast(),
                ])
                .leaf(),
            ),
            (
                "MultiplicativeExpression",
                seq([refn("Literal"), refn("MultiplicativeCont")]).ast(json!([
                    "?",
                    ["==", ["len", ["$", "/ast/children"]], 1],
                    ["$", "/ast/children/0"],
                    [
                        "?",
                        ["==", ["$", "/ast/children/1/op"], "*"],
                        ["*", ["$", "/ast/children/0"], ["$", "/ast/children/1/value"]],
                        ["/", ["$", "/ast/children/0"], ["$", "/ast/children/1/value"]]
                    ]
                ])),
            ),
            (
                "MultiplicativeCont",
                alt([
                    seq([
                        refn("Whitespace"),
                        set(["*", "/"]).ast(json!(["$", "/cst/raw"])),
                        refn("Whitespace"),
                        refn("MultiplicativeExpression"),
                    ])
                    .ast(json!({
                        "op": ["$", "/ast/children/0"],
                        "value": ["$", "/ast/children/1"]
                    })),
                    lit("").suppress_ast(),
                ])
                .leaf(),
            ),
            ("Literal", rx(r"\d+").ast(json!(["num", ["$", "/cst/raw"]]))),
        ],
    )
}
