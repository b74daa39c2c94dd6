//! Compiled pattern identity.
//!
//! A [`Pattern`] is the compiled, identity-bearing representation of one
//! grammar rule (or inline sub-node): it owns the rule's parsing closure and
//! AST-synthesis closure and is the type tag attached to every CST node the
//! rule produces.
//!
//! Patterns are created empty and registered in the compiler's resolution
//! table *before* their bodies are compiled. That is what breaks cycles in
//! self-referential and mutually-recursive grammars: a `Ref` met while a
//! rule's body is still compiling receives the same placeholder, whose slots
//! are filled once that rule's compilation completes. Both slots are
//! fill-once; after compilation a pattern is immutable and freely shareable
//! across threads.

use std::fmt;
use std::sync::Arc;

use once_cell::sync::OnceCell;
use serde_json::Value;

use crate::context::ParseContext;
use crate::cst::CstNode;
use crate::synth;

/// A compiled parsing procedure: attempts a match at exactly `pos` and
/// returns the produced CST node, or `None` for an ordinary non-match.
pub type ParserFn =
    Box<dyn for<'s> Fn(&mut ParseContext<'s>, usize) -> Option<CstNode> + Send + Sync>;

/// A compiled AST-synthesis procedure. `None` means "no value": the node is
/// omitted from ancestors' default `children` arrays (distinct from a
/// present-but-null value produced by an expression).
pub type AstFn = Box<dyn Fn(&CstNode, &str) -> Option<Value> + Send + Sync>;

pub struct Pattern {
    type_name: String,
    parser: OnceCell<ParserFn>,
    to_ast: OnceCell<AstFn>,
}

impl Pattern {
    pub(crate) fn new(type_name: &str) -> Arc<Self> {
        Arc::new(Pattern {
            type_name: scrub(type_name),
            parser: OnceCell::new(),
            to_ast: OnceCell::new(),
        })
    }

    /// Sanitized display name of the rule this pattern compiles.
    pub fn type_name(&self) -> &str {
        &self.type_name
    }

    /// Runs the compiled parser at `pos`.
    ///
    /// # Panics
    ///
    /// Panics if the pattern's parser slot was never filled. That indicates a
    /// compiler bug (a pattern escaping a failed compilation), not a grammar
    /// authoring mistake, and is reported loudly rather than tolerated.
    pub fn parse(&self, ctx: &mut ParseContext<'_>, pos: usize) -> Option<CstNode> {
        let parser = self.parser.get().unwrap_or_else(|| {
            panic!(
                "pattern '{}' invoked before its parser was compiled",
                self.type_name
            )
        });
        parser(ctx, pos)
    }

    /// Synthesizes the AST value for a CST node produced by this pattern.
    pub fn to_ast(&self, cst: &CstNode, src: &str) -> Option<Value> {
        match self.to_ast.get() {
            Some(to_ast) => to_ast(cst, src),
            // Placeholder default, mirroring the canonical shape.
            None => synth::generic_default(cst, src),
        }
    }

    pub(crate) fn set_parser(&self, parser: ParserFn) {
        if self.parser.set(parser).is_err() {
            panic!("pattern '{}' compiled twice", self.type_name);
        }
    }

    pub(crate) fn set_to_ast(&self, to_ast: AstFn) {
        if self.to_ast.set(to_ast).is_err() {
            panic!("pattern '{}' compiled twice", self.type_name);
        }
    }
}

impl fmt::Debug for Pattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Pattern")
            .field("type_name", &self.type_name)
            .field("compiled", &self.parser.get().is_some())
            .finish()
    }
}

/// Restricts a display name to identifier-safe characters.
fn scrub(name: &str) -> String {
    let cleaned: String = name
        .chars()
        .filter(|c| c.is_alphanumeric() || *c == '_')
        .collect();
    if cleaned.is_empty() {
        "Anonymous".to_string()
    } else {
        cleaned
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scrub_keeps_identifier_characters() {
        assert_eq!(scrub("Value"), "Value");
        assert_eq!(scrub("My Rule!"), "MyRule");
        assert_eq!(scrub("___"), "___");
        assert_eq!(scrub("()"), "Anonymous");
    }

    #[test]
    #[should_panic(expected = "invoked before its parser was compiled")]
    fn unfilled_parser_slot_panics() {
        let pattern = Pattern::new("Orphan");
        let mut ctx = ParseContext::new("x");
        pattern.parse(&mut ctx, 0);
    }
}
