//! List compiler: the item repeated until it fails to match.
//!
//! A list always succeeds, possibly with zero children and a zero-width
//! span. There is no "at least one" variant; that is expressed as a
//! production of (item, list(item)).

use std::sync::Arc;

use crate::cst::CstNode;
use crate::pattern::{ParserFn, Pattern};

pub(crate) fn compile(pattern: Arc<Pattern>, item: Arc<Pattern>) -> ParserFn {
    Box::new(move |ctx, pos| {
        let mut children = Vec::new();
        let mut cursor = pos;
        while let Some(child) = item.parse(ctx, cursor) {
            let end = child.end();
            children.push(child);
            if end == cursor {
                // A zero-width match cannot advance the cursor; stop after
                // recording it instead of looping forever.
                break;
            }
            cursor = end;
        }
        Some(CstNode::node(pattern.clone(), pos, cursor, children))
    })
}
