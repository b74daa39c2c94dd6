//! Production compiler: all items, in order, consecutively.
//!
//! The cursor threads forward between items; any item failure fails the
//! whole production at the original position, surfacing no partial CST.

use std::sync::Arc;

use crate::cst::CstNode;
use crate::pattern::{ParserFn, Pattern};

pub(crate) fn compile(pattern: Arc<Pattern>, items: Vec<Arc<Pattern>>) -> ParserFn {
    Box::new(move |ctx, pos| {
        let mut children = Vec::with_capacity(items.len());
        let mut cursor = pos;
        for item in &items {
            let child = item.parse(ctx, cursor)?;
            cursor = child.end();
            children.push(child);
        }
        Some(CstNode::node(pattern.clone(), pos, cursor, children))
    })
}
