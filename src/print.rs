//! Human-readable tree rendering for grammars, CSTs, and parse traces.
//!
//! Presentation only: everything here reads the public `type_name`, span,
//! `children`, and `matched` fields and never mutates or re-parses.

use std::collections::HashSet;

use crate::cst::CstNode;
use crate::grammar::{Grammar, GrammarNode, Repeat, TerminalMatcher};
use crate::trace::TraceNode;

/// Renders a grammar's rule tree starting from its start symbol.
pub fn print_grammar(grammar: &Grammar) -> String {
    let mut printer = GrammarPrinter {
        grammar,
        visited: HashSet::new(),
    };
    let mut out = String::new();
    match grammar.rules.get(&grammar.start) {
        Some(node) => {
            printer.visited.insert(grammar.start.clone());
            printer.render(&mut out, node, Some(&grammar.start), "");
        }
        None => out.push_str("unknown start symbol\n"),
    }
    out
}

struct GrammarPrinter<'g> {
    grammar: &'g Grammar,
    visited: HashSet<String>,
}

impl GrammarPrinter<'_> {
    fn render(&mut self, out: &mut String, node: &GrammarNode, name: Option<&str>, prefix: &str) {
        match node {
            GrammarNode::Terminal(t) => {
                let display = match &t.matcher {
                    TerminalMatcher::Literal(s) => format!("{s:?}"),
                    TerminalMatcher::Regex(source) => format!("/{source}/"),
                    TerminalMatcher::Set(candidates) => {
                        let body = candidates
                            .iter()
                            .map(|c| format!("{c:?}"))
                            .collect::<Vec<_>>()
                            .join(" | ");
                        let marker = match t.repeat {
                            Repeat::Once => "",
                            Repeat::ZeroOrMore => "*",
                            Repeat::OneOrMore => "+",
                        };
                        format!("({body}){marker}")
                    }
                };
                let label = t.type_name.as_deref().or(name).unwrap_or("Text");
                out.push_str(&format!("{label} (terminal): {display}\n"));
            }
            GrammarNode::Production(p) => {
                let label = p.type_name.as_deref().or(name).unwrap_or("Production");
                out.push_str(&format!("{label} (production)\n"));
                self.render_children(out, &p.items, prefix);
            }
            GrammarNode::Union(u) => {
                let label = u.type_name.as_deref().or(name).unwrap_or("Union");
                out.push_str(&format!("{label} (union)\n"));
                self.render_children(out, &u.alternatives, prefix);
            }
            GrammarNode::List(l) => {
                let label = l.type_name.as_deref().or(name).unwrap_or("List");
                out.push_str(&format!("{label} (list)\n"));
                self.render_children(out, std::slice::from_ref(&*l.item), prefix);
            }
            GrammarNode::Ref(target) => {
                if self.visited.contains(target) {
                    out.push_str(&format!("→ {target}\n"));
                } else {
                    self.visited.insert(target.clone());
                    match self.grammar.rules.get(target) {
                        Some(resolved) => self.render(out, resolved, Some(target), prefix),
                        None => out.push_str(&format!("{target} (unresolved)\n")),
                    }
                }
            }
        }
    }

    fn render_children(&mut self, out: &mut String, children: &[GrammarNode], prefix: &str) {
        for (i, child) in children.iter().enumerate() {
            let last = i + 1 == children.len();
            out.push_str(prefix);
            out.push_str(if last { "└── " } else { "├── " });
            let next = format!("{prefix}{}", if last { "    " } else { "│   " });
            self.render(out, child, None, &next);
        }
    }
}

/// Renders a CST with `Type pos:end → "slice"` lines, slices truncated at
/// 32 characters.
pub fn print_cst(cst: &CstNode, src: &str) -> String {
    let mut out = String::new();
    render_cst(&mut out, cst, src, "");
    out
}

fn render_cst(out: &mut String, node: &CstNode, src: &str, prefix: &str) {
    out.push_str(node.ptr().type_name());
    out.push_str(&format_match(node.pos(), node.end(), src));
    out.push('\n');
    let children = node.children();
    for (i, child) in children.iter().enumerate() {
        let last = i + 1 == children.len();
        out.push_str(prefix);
        out.push_str(if last { "└── " } else { "├── " });
        let next = format!("{prefix}{}", if last { "    " } else { "│   " });
        render_cst(out, child, src, &next);
    }
}

/// Renders captured trace trees. Frames for failed attempts appear without
/// a match suffix.
pub fn print_trace(roots: &[TraceNode], src: &str) -> String {
    let mut out = String::new();
    for root in roots {
        render_trace(&mut out, root, src, "");
    }
    out
}

fn render_trace(out: &mut String, node: &TraceNode, src: &str, prefix: &str) {
    out.push_str(node.pattern.type_name());
    if let Some(matched) = &node.matched {
        out.push_str(&format_match(matched.pos(), matched.end(), src));
    }
    out.push('\n');
    for (i, child) in node.children.iter().enumerate() {
        let last = i + 1 == node.children.len();
        out.push_str(prefix);
        out.push_str(if last { "└── " } else { "├── " });
        let next = format!("{prefix}{}", if last { "    " } else { "│   " });
        render_trace(out, child, src, &next);
    }
}

fn format_match(pos: usize, end: usize, src: &str) -> String {
    let slice = &src[pos..end];
    let shown: String = slice.chars().take(32).collect();
    let ellipsis = if slice.chars().count() > 32 { "..." } else { "" };
    format!(" {pos}:{end} → {shown:?}{ellipsis}")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::compile::GrammarCompiler;
    use crate::grammar::{lit, refn, seq, Grammar};

    fn pair() -> Grammar {
        Grammar::new(
            "Pair",
            [("Pair", seq([refn("A"), refn("A")])), ("A", lit("a"))],
        )
    }

    #[test]
    fn grammar_tree_marks_visited_references() {
        let rendered = print_grammar(&pair());
        assert!(rendered.starts_with("Pair (production)\n"));
        assert!(rendered.contains("A (terminal): \"a\""));
        // The second reference to A collapses to an arrow.
        assert!(rendered.contains("→ A"));
    }

    #[test]
    fn cst_lines_carry_spans_and_slices() {
        let compiled = GrammarCompiler::new(pair()).compile().unwrap();
        let cst = compiled.parse("aa").unwrap();
        let rendered = print_cst(&cst, "aa");
        assert!(rendered.starts_with("Pair 0:2 → \"aa\"\n"));
        assert!(rendered.contains("├── A 0:1 → \"a\"\n"));
        assert!(rendered.contains("└── A 1:2 → \"a\"\n"));
    }
}
