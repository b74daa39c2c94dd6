//! A basic HTML-like grammar.
//!
//! Not a complete HTML parser; it covers nested elements and text runs the
//! way a template or rich-text clipboard buffer would use them. Elements
//! synthesize named `tag`/`body` properties through the production's
//! position→name children map; matching of open and close tag names is not
//! validated.

use serde_json::json;

use crate::grammar::{alt, lit, list, refn, rx, seq, Grammar};

pub fn grammar() -> Grammar {
    Grammar::new(
        "Fragment",
        [
            (
                "Fragment",
                list(refn("Node")).ast(json!(["$", "/ast/children"])),
            ),
            ("Node", alt([refn("Element"), refn("Text")]).leaf()),
            (
                "Element",
                seq([
                    lit("<").suppress_ast(),
                    refn("TagName"),
                    lit(">").suppress_ast(),
                    refn("Fragment"),
                    lit("</").suppress_ast(),
                    refn("TagName"),
                    lit(">").suppress_ast(),
                ])
                .named_children([(1, "tag"), (3, "body")]),
            ),
            ("TagName", rx("[a-zA-Z][a-zA-Z0-9]*").ast(json!(["$", "/cst/raw"]))),
            ("Text", rx("[^<]+")),
        ],
    )
}
