//! Union compiler: ordered alternatives, first match wins.
//!
//! No backtracking across alternatives once one matches, and no
//! longest-match preference; declaration order is the tie-break. The match
//! is wrapped in an internal node with exactly one child.

use std::sync::Arc;

use crate::cst::CstNode;
use crate::pattern::{ParserFn, Pattern};

pub(crate) fn compile(pattern: Arc<Pattern>, alternatives: Vec<Arc<Pattern>>) -> ParserFn {
    Box::new(move |ctx, pos| {
        for alternative in &alternatives {
            if let Some(child) = alternative.parse(ctx, pos) {
                let end = child.end();
                return Some(CstNode::node(pattern.clone(), pos, end, vec![child]));
            }
        }
        None
    })
}
