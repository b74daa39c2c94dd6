//! Terminal compiler.
//!
//! Terminals match at exactly `pos`, never skipping characters. Literal and
//! set candidates compare byte slices; regexes are anchored by wrapping the
//! source in `^(?:...)` and compiled once, at grammar-compile time.

use std::sync::Arc;

use regex::Regex;

use crate::cst::CstNode;
use crate::errors::CompileError;
use crate::grammar::{Repeat, TerminalMatcher, TerminalNode};
use crate::pattern::{ParserFn, Pattern};

pub(crate) fn compile(
    node: &TerminalNode,
    pattern: Arc<Pattern>,
    rule: &str,
) -> Result<ParserFn, CompileError> {
    match &node.matcher {
        TerminalMatcher::Literal(s) => {
            let literal = s.clone();
            Ok(Box::new(move |ctx, pos| {
                let end = pos + literal.len();
                match ctx.text.get(pos..end) {
                    Some(slice) if slice == literal => Some(CstNode::leaf(pattern.clone(), pos, end)),
                    _ => None,
                }
            }))
        }
        TerminalMatcher::Regex(source) => {
            let re = Regex::new(&format!("^(?:{source})")).map_err(|e| CompileError::Regex {
                rule: rule.to_string(),
                source: e,
            })?;
            Ok(Box::new(move |ctx, pos| {
                let rest = ctx.text.get(pos..)?;
                let found = re.find(rest)?;
                Some(CstNode::leaf(pattern.clone(), pos, pos + found.end()))
            }))
        }
        TerminalMatcher::Set(candidates) => {
            if candidates.is_empty() {
                return Err(CompileError::EmptyTerminalSet {
                    rule: rule.to_string(),
                });
            }
            let candidates = candidates.clone();
            let repeat = node.repeat;
            Ok(Box::new(move |ctx, pos| match repeat {
                Repeat::Once => {
                    let end = match_one(ctx.text, &candidates, pos)?;
                    Some(CstNode::leaf(pattern.clone(), pos, end))
                }
                Repeat::ZeroOrMore | Repeat::OneOrMore => {
                    let mut cursor = pos;
                    while let Some(next) = match_one(ctx.text, &candidates, cursor) {
                        if next == cursor {
                            // An empty candidate cannot advance the run.
                            break;
                        }
                        cursor = next;
                    }
                    if repeat == Repeat::OneOrMore && cursor == pos {
                        return None;
                    }
                    Some(CstNode::leaf(pattern.clone(), pos, cursor))
                }
            }))
        }
    }
}

/// First candidate in declaration order matching at `at` wins.
fn match_one(text: &str, candidates: &[String], at: usize) -> Option<usize> {
    candidates.iter().find_map(|c| match text.get(at..at + c.len()) {
        Some(slice) if slice == *c => Some(at + c.len()),
        _ => None,
    })
}
