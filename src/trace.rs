//! Debug trace facility.
//!
//! When a grammar is compiled with `CompileOptions::debug`, every node
//! parser is wrapped so that, on entry, it records a frame holding the
//! pattern and position, attached under the frame currently on top of the
//! stack. On exit the frame is popped and, on success, the produced CST node
//! is stored on it. Frames for failed attempts stay in the tree, so the
//! finished trace shows every rule entered during the parse, including
//! abandoned union alternatives.
//!
//! Frames live in an index-addressed arena rather than behind shared
//! pointers; [`Trace::finish`] assembles the plain [`TraceNode`] tree.

use std::sync::Arc;

use crate::cst::CstNode;
use crate::pattern::{Pattern, ParserFn};

/// A finished trace record: one rule entry during the parse.
#[derive(Debug, Clone)]
pub struct TraceNode {
    pub pattern: Arc<Pattern>,
    pub pos: usize,
    pub children: Vec<TraceNode>,
    /// The CST node produced on success; `None` for a failed attempt.
    pub matched: Option<CstNode>,
}

#[derive(Debug)]
struct Frame {
    pattern: Arc<Pattern>,
    pos: usize,
    children: Vec<usize>,
    matched: Option<CstNode>,
}

/// In-progress trace capture for a single parse.
#[derive(Debug, Default)]
pub struct Trace {
    frames: Vec<Frame>,
    stack: Vec<usize>,
    roots: Vec<usize>,
}

impl Trace {
    pub fn new() -> Self {
        Trace::default()
    }

    pub(crate) fn enter(&mut self, pattern: &Arc<Pattern>, pos: usize) -> usize {
        let id = self.frames.len();
        self.frames.push(Frame {
            pattern: pattern.clone(),
            pos,
            children: Vec::new(),
            matched: None,
        });
        match self.stack.last() {
            Some(&top) => self.frames[top].children.push(id),
            None => self.roots.push(id),
        }
        self.stack.push(id);
        id
    }

    pub(crate) fn exit(&mut self, id: usize, matched: Option<&CstNode>) {
        debug_assert_eq!(self.stack.last().copied(), Some(id), "unbalanced trace exit");
        self.stack.pop();
        self.frames[id].matched = matched.cloned();
    }

    /// Assembles the captured frames into trace trees, one per top-level
    /// pattern entered.
    pub fn finish(self) -> Vec<TraceNode> {
        let mut slots: Vec<Option<Frame>> = self.frames.into_iter().map(Some).collect();
        self.roots
            .iter()
            .map(|&id| build(&mut slots, id))
            .collect()
    }
}

fn build(slots: &mut Vec<Option<Frame>>, id: usize) -> TraceNode {
    let frame = slots[id].take().expect("trace frame consumed twice");
    let children = frame.children.iter().map(|&c| build(slots, c)).collect();
    TraceNode {
        pattern: frame.pattern,
        pos: frame.pos,
        children,
        matched: frame.matched,
    }
}

/// Wraps a node parser with trace recording. Applied only when the compiler
/// was built with debug instrumentation; non-debug parsers carry no trace
/// code at all.
pub(crate) fn instrument(pattern: Arc<Pattern>, parser: ParserFn) -> ParserFn {
    Box::new(move |ctx, pos| {
        let id = ctx.trace.as_mut().map(|t| t.enter(&pattern, pos));
        let result = parser(ctx, pos);
        if let (Some(id), Some(trace)) = (id, ctx.trace.as_mut()) {
            trace.exit(id, result.as_ref());
        }
        result
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pattern::Pattern;

    #[test]
    fn nested_frames_form_a_tree() {
        let outer = Pattern::new("Outer");
        let inner = Pattern::new("Inner");
        let mut trace = Trace::new();
        let a = trace.enter(&outer, 0);
        let b = trace.enter(&inner, 0);
        trace.exit(b, None);
        trace.exit(a, None);
        let roots = trace.finish();
        assert_eq!(roots.len(), 1);
        assert_eq!(roots[0].pattern.type_name(), "Outer");
        assert_eq!(roots[0].children.len(), 1);
        assert_eq!(roots[0].children[0].pattern.type_name(), "Inner");
    }
}
