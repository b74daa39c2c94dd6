//! Concrete Syntax Tree node model.
//!
//! CST nodes are immutable value records produced per successful match. A
//! leaf records only its half-open span; an internal node additionally owns
//! its ordered children. Every node points back at the [`Pattern`] that
//! produced it, which doubles as the node's type tag.

use std::sync::Arc;

use crate::pattern::Pattern;

#[derive(Debug, Clone)]
pub enum CstNode {
    Leaf {
        pos: usize,
        end: usize,
        ptr: Arc<Pattern>,
    },
    Node {
        pos: usize,
        end: usize,
        ptr: Arc<Pattern>,
        children: Vec<CstNode>,
    },
}

impl CstNode {
    pub(crate) fn leaf(ptr: Arc<Pattern>, pos: usize, end: usize) -> Self {
        debug_assert!(pos <= end);
        CstNode::Leaf { pos, end, ptr }
    }

    pub(crate) fn node(ptr: Arc<Pattern>, pos: usize, end: usize, children: Vec<CstNode>) -> Self {
        debug_assert!(pos <= end);
        CstNode::Node {
            pos,
            end,
            ptr,
            children,
        }
    }

    pub fn pos(&self) -> usize {
        match self {
            CstNode::Leaf { pos, .. } | CstNode::Node { pos, .. } => *pos,
        }
    }

    pub fn end(&self) -> usize {
        match self {
            CstNode::Leaf { end, .. } | CstNode::Node { end, .. } => *end,
        }
    }

    /// The pattern that produced this node.
    pub fn ptr(&self) -> &Arc<Pattern> {
        match self {
            CstNode::Leaf { ptr, .. } | CstNode::Node { ptr, .. } => ptr,
        }
    }

    /// Ordered children; empty for leaves.
    pub fn children(&self) -> &[CstNode] {
        match self {
            CstNode::Leaf { .. } => &[],
            CstNode::Node { children, .. } => children,
        }
    }

    pub fn is_leaf(&self) -> bool {
        matches!(self, CstNode::Leaf { .. })
    }

    /// The matched slice of the source text.
    pub fn raw<'s>(&self, src: &'s str) -> &'s str {
        &src[self.pos()..self.end()]
    }
}
