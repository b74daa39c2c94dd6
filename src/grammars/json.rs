//! JSON grammar.
//!
//! Parses JSON documents into a CST mirroring the grammar exactly
//! (whitespace and punctuation included) and an AST of typed value records:
//! `{"type": "Number", "pos": .., "end": .., "raw": "..", "value": ..}` for
//! scalars, `children` arrays for arrays, `members` entry lists for objects.
//!
//! Delimiters accept a trailing comma; this grammar trades strictness for
//! size.

use serde_json::json;

use crate::grammar::{alt, lit, list, refn, rx, seq, set, Grammar};

pub fn grammar() -> Grammar {
    Grammar::new(
        "Value",
        [
            ("Value", seq([refn("Ws"), refn("TValue"), refn("Ws")])),
            ("Ws", rx(r"\s*")),
            (
                "TValue",
                alt([
                    refn("Null"),
                    refn("Boolean"),
                    refn("Number"),
                    refn("String"),
                    refn("Array"),
                    refn("Object"),
                ]),
            ),
            (
                "Null",
                lit("null").ast(json!(["o.set", ["$", "/ast"], "value", null])),
            ),
            (
                "Boolean",
                set(["true", "false"]).ast(json!([
                    "o.set",
                    ["$", "/ast"],
                    "value",
                    ["==", ["$", "/cst/raw"], "true"]
                ])),
            ),
            (
                "Number",
                rx(r"-?0|(-?[1-9][0-9]*)(\.[0-9]+)?").ast(json!([
                    "o.set",
                    ["$", "/ast"],
                    "value",
                    ["num", ["$", "/cst/raw"]]
                ])),
            ),
            (
                "String",
                seq([
                    lit("\"").suppress_ast(),
                    refn("StringValue"),
                    lit("\"").suppress_ast(),
                ])
                .ast(json!([
                    "o.del",
                    [
                        "o.set",
                        ["$", "/ast"],
                        "value",
                        ["$", "/cst/children/1/raw"]
                    ],
                    "children"
                ])),
            ),
            ("StringValue", rx(r#"[^"]*"#)),
            (
                "Array",
                seq([
                    lit("[").suppress_ast(),
                    refn("Elements"),
                    lit("]").suppress_ast(),
                ])
                .ast(json!([
                    "o.set",
                    ["$", "/ast"],
                    "children",
                    ["$", "/ast/children/0/children", [[]]]
                ])),
            ),
            ("Elements", list(refn("Element"))),
            (
                "Element",
                seq([refn("Value"), alt([lit(","), lit("")]).suppress_ast()])
                    .ast(json!(["$", "/ast/children/0"])),
            ),
            (
                "Object",
                seq([
                    lit("{").suppress_ast(),
                    refn("Members"),
                    lit("}").suppress_ast(),
                ])
                .ast(json!([
                    "o.del",
                    [
                        "o.set",
                        ["$", "/ast"],
                        "members",
                        ["$", "/ast/children/0/children", [[]]]
                    ],
                    "children"
                ])),
            ),
            ("Members", list(refn("Entry"))),
            (
                "Entry",
                seq([
                    refn("Ws"),
                    refn("String"),
                    refn("Ws"),
                    lit(":").suppress_ast(),
                    refn("Value"),
                    alt([lit(","), lit("")]).suppress_ast(),
                ])
                .ast(json!([
                    "o.del",
                    [
                        "o.set",
                        ["$", "/ast"],
                        "key",
                        ["$", "/ast/children/0/value"],
                        "value",
                        ["$", "/ast/children/1"]
                    ],
                    "children"
                ])),
            ),
        ],
    )
    .with_default("Ws", json!(null))
    .with_default("Value", json!(["$", "/cst/children/1/ast"]))
    .with_default("TValue", json!(["$", "/ast/children/0"]))
}
