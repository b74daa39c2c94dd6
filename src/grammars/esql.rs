//! An ES|QL-like query grammar.
//!
//! The largest bundled grammar: a piped command language (`FROM a, b | EVAL
//! x = f(y)`) with case-insensitive keywords, comma-separated clause lists,
//! an expression hierarchy, and a literal zoo including parameters and
//! bracketed arrays. Commands synthesize structured records (`sources`,
//! `fields`, `metadata`, ...) rather than positional children.

use serde_json::{json, Value};

use crate::grammar::{alt, lit, list, refn, rx, seq, Grammar, GrammarNode};

fn kw(word: &str) -> GrammarNode {
    rx(format!("(?i:{word})")).suppress_ast()
}

fn punct(token: &str) -> GrammarNode {
    lit(token).suppress_ast()
}

/// One more comma-separated element.
fn next(rule: &str) -> GrammarNode {
    seq([refn("Ws"), punct(","), refn("Ws"), refn(rule)]).ast(first_child())
}

/// `[ elem, elem, ... ]`
fn bracketed(rule: &str) -> GrammarNode {
    seq([
        punct("["),
        refn("Ws"),
        refn(rule),
        list(seq([refn("Ws"), punct(","), refn("Ws"), refn(rule)]).ast(first_child()))
            .ast(children_array()),
        refn("Ws"),
        punct("]"),
    ])
}

fn first_child() -> Value {
    json!(["$", "/ast/children/0"])
}

fn children_array() -> Value {
    json!(["$", "/ast/children"])
}

/// Flattens the `(head, tail-array)` pair back into the record's `children`.
fn spread_head_tail() -> Value {
    json!([
        "o.set",
        ["$", "/ast"],
        "children",
        [
            "concat",
            ["push", [[]], ["$", "/ast/children/0"]],
            ["$", "/ast/children/1"]
        ]
    ])
}

pub fn grammar() -> Grammar {
    Grammar::new(
        "Query",
        [
            (
                "Query",
                seq([
                    refn("Ws"),
                    refn("SourceCommand"),
                    refn("QueryChain"),
                    rx(r"\s|$").suppress_ast(),
                ])
                .ast(spread_head_tail()),
            ),
            ("QueryChain", list(refn("PipedCommand")).ast(children_array())),
            (
                "PipedCommand",
                seq([refn("Ws"), punct("|"), refn("Ws"), refn("Command")]).ast(first_child()),
            ),
            (
                "Command",
                alt([refn("SourceCommand"), refn("ProcessingCommand")]).leaf(),
            ),
            ("W", rx(r"\s+").sampled(" ")),
            ("Ws", rx(r"\s*").sampled(" ")),
            (
                "SourceCommand",
                alt([
                    refn("ExplainCommand"),
                    refn("FromCommand"),
                    refn("RowCommand"),
                    refn("ShowCommand"),
                    refn("MetaCommand"),
                ])
                .leaf(),
            ),
            (
                "ProcessingCommand",
                alt([refn("EvalCommand"), refn("InlineStatsCommand")]).leaf(),
            ),
            // Source commands.
            (
                "ExplainCommand",
                seq([kw("EXPLAIN"), refn("W"), refn("SubqueryExpression")]),
            ),
            (
                "SubqueryExpression",
                seq([refn("Ws"), punct("("), refn("Query"), punct(")"), refn("Ws")]),
            ),
            (
                "FromCommand",
                seq([
                    kw("FROM"),
                    refn("W"),
                    refn("IndexIdentifierList"),
                    refn("Metadata"),
                ])
                .ast(json!([
                    "o.del",
                    [
                        "o.set",
                        ["$", "/ast"],
                        "sources",
                        ["$", "/ast/children/0"],
                        "metadata",
                        ["$", "/ast/children/1", null]
                    ],
                    "children"
                ])),
            ),
            (
                "IndexIdentifierList",
                seq([
                    refn("Ws"),
                    refn("IndexIdentifier"),
                    list(refn("NextIndexIdentifier")).ast(children_array()),
                ])
                .ast(spread_head_tail()),
            ),
            ("NextIndexIdentifier", next("IndexIdentifier")),
            (
                "IndexIdentifier",
                rx(r"[a-zA-Z_\.][a-zA-Z0-9_\.\-\*]*(?:/[a-zA-Z0-9_\.\-\*]+)*").sampled("abc"),
            ),
            (
                "Metadata",
                alt([
                    seq([
                        refn("Ws"),
                        alt([refn("MetadataOption"), refn("DeprecatedMetadata")]).leaf(),
                    ])
                    .ast(first_child()),
                    lit("").suppress_ast(),
                ])
                .leaf(),
            ),
            (
                "MetadataOption",
                seq([kw("METADATA"), refn("W"), refn("IndexIdentifierList")]).ast(first_child()),
            ),
            (
                "DeprecatedMetadata",
                seq([
                    punct("["),
                    refn("Ws"),
                    refn("MetadataOption"),
                    refn("Ws"),
                    punct("]"),
                ])
                .ast(first_child()),
            ),
            (
                "RowCommand",
                seq([kw("ROW"), refn("W"), refn("Fields")]).ast(json!([
                    "o.del",
                    [
                        "o.set",
                        ["$", "/ast"],
                        "fields",
                        ["$", "/ast/children/0/children"]
                    ],
                    "children"
                ])),
            ),
            ("ShowCommand", rx("(?i:SHOW INFO)")),
            ("MetaCommand", rx("(?i:META FUNCTIONS)")),
            // Processing commands.
            (
                "EvalCommand",
                seq([kw("EVAL"), refn("W"), refn("Fields")]).ast(json!([
                    "o.del",
                    [
                        "o.set",
                        ["$", "/ast"],
                        "fields",
                        ["$", "/ast/children/0/children"]
                    ],
                    "children"
                ])),
            ),
            (
                "InlineStatsCommand",
                seq([
                    kw("INLINESTATS"),
                    refn("W"),
                    refn("Fields"),
                    alt([refn("ByGrouping"), lit("").suppress_ast()]).leaf(),
                ])
                .ast(json!([
                    "o.del",
                    [
                        "o.set",
                        ["$", "/ast"],
                        "aggregates",
                        ["$", "/ast/children/0/children"],
                        "grouping",
                        ["$", "/ast/children/1/children", null]
                    ],
                    "children"
                ])),
            ),
            (
                "ByGrouping",
                seq([refn("W"), kw("BY"), refn("W"), refn("Fields")]).ast(first_child()),
            ),
            // Clause lists.
            (
                "Fields",
                seq([
                    refn("Ws"),
                    refn("Field"),
                    list(refn("NextField")).ast(children_array()),
                ])
                .ast(spread_head_tail()),
            ),
            ("NextField", next("Field")),
            (
                "Field",
                alt([refn("AssignmentExpression"), refn("BooleanExpression")]).ast(json!([
                    "o.del",
                    ["o.set", ["$", "/ast"], "value", ["$", "/ast/children/0"]],
                    "children"
                ])),
            ),
            // Expressions.
            (
                "BooleanExpressionList",
                seq([
                    refn("BooleanExpression"),
                    list(refn("NextBooleanExpression")).ast(children_array()),
                ])
                .ast(json!([
                    "concat",
                    ["push", [[]], ["$", "/ast/children/0"]],
                    ["$", "/ast/children/1"]
                ])),
            ),
            ("NextBooleanExpression", next("BooleanExpression")),
            (
                "BooleanExpression",
                alt([refn("LogicalNot"), refn("ValueExpression")]).leaf(),
            ),
            (
                "LogicalNot",
                seq([
                    refn("Ws"),
                    kw("NOT"),
                    refn("W"),
                    refn("BooleanExpression"),
                ]),
            ),
            ("ValueExpression", alt([refn("OperatorExpression")]).leaf()),
            ("OperatorExpression", alt([refn("PrimaryExpression")]).leaf()),
            (
                "PrimaryExpression",
                alt([
                    refn("Constant"),
                    refn("FunctionExpression"),
                    refn("QualifiedName"),
                    seq([refn("Ws"), punct("("), refn("BooleanExpression"), punct(")")])
                        .ast(first_child()),
                ])
                .leaf(),
            ),
            (
                "AssignmentExpression",
                seq([
                    refn("QualifiedName"),
                    refn("Ws"),
                    punct("="),
                    refn("Ws"),
                    refn("BooleanExpression"),
                ])
                .ast(json!([
                    "o.del",
                    [
                        "o.set",
                        ["$", "/ast"],
                        "left",
                        ["$", "/ast/children/0"],
                        "right",
                        ["$", "/ast/children/1"]
                    ],
                    "children"
                ])),
            ),
            (
                "FunctionExpression",
                seq([
                    refn("Identifier"),
                    refn("Ws"),
                    punct("("),
                    refn("Ws"),
                    alt([
                        lit("*").typed("StarArgument"),
                        refn("BooleanExpressionList"),
                    ])
                    .leaf(),
                    refn("Ws"),
                    punct(")"),
                ])
                .ast(json!([
                    "o.del",
                    [
                        "o.set",
                        ["$", "/ast"],
                        "name",
                        ["$", "/ast/children/0"],
                        "arguments",
                        ["$", "/ast/children/1"]
                    ],
                    "children"
                ])),
            ),
            // Literals.
            (
                "Constant",
                alt([
                    refn("NullLiteral"),
                    seq([refn("IntegerLiteral"), refn("Ws"), refn("UnquotedIdentifier")])
                        .typed("QualifiedIntegerLiteral"),
                    refn("DecimalLiteral"),
                    refn("IntegerLiteral"),
                    refn("BooleanLiteral"),
                    refn("ParamLiteral"),
                    refn("StringLiteral"),
                    refn("NumericArrayLiteral"),
                    refn("BooleanArrayLiteral"),
                    refn("StringArrayLiteral"),
                ])
                .ast(json!([
                    "o.del",
                    ["o.set", ["$", "/ast"], "value", ["$", "/ast/children/0"]],
                    "children"
                ])),
            ),
            ("NullLiteral", rx("(?i:NULL)")),
            (
                "NumericLiteral",
                alt([refn("DecimalLiteral"), refn("IntegerLiteral")]).leaf(),
            ),
            ("DecimalLiteral", rx(r"[\-\+]?\d+\.\d+")),
            ("IntegerLiteral", rx(r"[\-\+]?\d+")),
            ("BooleanLiteral", rx("(?i:TRUE|FALSE)")),
            ("StringLiteral", rx(r#""(\\[\t\n\r"]|[^\t\n\r"])*""#)),
            (
                "ParamLiteral",
                alt([
                    refn("NamedParam"),
                    refn("PositionalParam"),
                    refn("UnnamedParam"),
                ])
                .leaf(),
            ),
            ("UnnamedParam", lit("?")),
            ("NamedParam", rx(r"\?[a-zA-Z][a-zA-Z0-9_]*")),
            ("PositionalParam", rx(r"\?\d+")),
            ("NumericArrayLiteral", bracketed("NumericLiteral")),
            ("BooleanArrayLiteral", bracketed("BooleanLiteral")),
            ("StringArrayLiteral", bracketed("StringLiteral")),
            // Identifiers.
            (
                "QualifiedName",
                seq([
                    refn("Identifier"),
                    list(refn("NextIdentifier")).ast(children_array()),
                ])
                .ast(spread_head_tail()),
            ),
            (
                "Identifier",
                alt([refn("UnquotedIdentifier"), refn("QuotedIdentifier")]).ast(json!([
                    "o.del",
                    [
                        "o.set",
                        ["$", "/ast"],
                        "value",
                        ["$", "/ast/children/0/value"]
                    ],
                    "children"
                ])),
            ),
            (
                "NextIdentifier",
                seq([refn("Ws"), punct("."), refn("Ws"), refn("Identifier")]).ast(first_child()),
            ),
            (
                "UnquotedIdentifier",
                rx(r"[a-zA-Z][a-zA-Z0-9_]*|[_\@][a-zA-Z0-9_]+")
                    .ast(json!(["o.set", ["$", "/ast"], "value", ["$", "/cst/raw"]])),
            ),
            (
                "QuotedIdentifier",
                rx(r"`([^`]|``)+`").sampled("`abc`").ast(json!([
                    "o.set",
                    ["$", "/ast"],
                    "value",
                    ["substr", ["$", "/cst/raw"], 1, ["-", ["len", ["$", "/cst/raw"]], 1]]
                ])),
            ),
        ],
    )
    .with_default("W", json!(null))
    .with_default("Ws", json!(null))
}
