//! Per-parse mutable state.

use crate::trace::{Trace, TraceNode};

/// State for one top-level parse invocation.
///
/// The source text is immutable for the duration of the parse; all parse
/// progress is passed explicitly as `pos`, so a context carries no cursor. A
/// context must not be shared between concurrent parses.
#[derive(Debug)]
pub struct ParseContext<'s> {
    pub text: &'s str,
    /// Caller's request to synthesize an AST after the parse. Parsing itself
    /// never consults this; it is read by the [`crate::compile::CompiledGrammar`]
    /// convenience surface.
    pub want_ast: bool,
    /// Present only when the caller wants a trace captured. Parsers compiled
    /// without debug instrumentation never touch it.
    pub trace: Option<Trace>,
}

impl<'s> ParseContext<'s> {
    pub fn new(text: &'s str) -> Self {
        ParseContext {
            text,
            want_ast: false,
            trace: None,
        }
    }

    pub fn with_ast(text: &'s str) -> Self {
        ParseContext {
            text,
            want_ast: true,
            trace: None,
        }
    }

    pub fn with_trace(text: &'s str) -> Self {
        ParseContext {
            text,
            want_ast: false,
            trace: Some(Trace::new()),
        }
    }

    /// Consumes the captured trace, if any, yielding the finished tree of
    /// trace records (one root per top-level pattern entered).
    pub fn take_trace(&mut self) -> Vec<TraceNode> {
        self.trace.take().map(Trace::finish).unwrap_or_default()
    }
}
