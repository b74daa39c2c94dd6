//! Grammar compiler.
//!
//! Walks a [`Grammar`] from its start symbol, resolving named references
//! through a memoized resolution table of [`Pattern`]s, and wires each
//! node's compiled parsing closure to its children's. The resolution table
//! is scoped to one compiler instance and mutated only during the one-shot
//! build phase; the resulting pattern graph is immutable and shareable.
//!
//! Recursive grammars terminate because a rule's pattern is registered
//! *before* its body compiles: a `Ref` met mid-compilation wires against the
//! placeholder, whose slots are filled when that rule's compilation returns.
//!
//! Inline (non-`Ref`) sub-nodes each get an anonymous pattern compiled
//! during the same phase. Named rules not reachable from the start symbol
//! stay uncompiled under [`GrammarCompiler::compile`]; the eager
//! [`GrammarCompiler::compile_all`] compiles every rule up front so all
//! patterns can be enumerated. Both modes produce behaviorally identical
//! parsers.

mod list;
mod production;
mod terminal;
mod union;

use std::collections::HashMap;
use std::sync::Arc;

use serde_json::Value;

use crate::context::ParseContext;
use crate::cst::CstNode;
use crate::errors::CompileError;
use crate::grammar::{Grammar, GrammarNode};
use crate::pattern::{ParserFn, Pattern};
use crate::synth;
use crate::trace::{self, TraceNode};

/// Compile-time switches. Debug instrumentation is decided here, once; a
/// parser compiled without it carries no tracing code at all.
#[derive(Debug, Clone, Copy)]
pub struct CompileOptions {
    /// Include `pos`/`end` in default AST shapes.
    pub positions: bool,
    /// Honor custom AST expressions (when off, every node uses its default
    /// shape).
    pub ast_expressions: bool,
    /// Weave trace recording into every node parser.
    pub debug: bool,
}

impl Default for CompileOptions {
    fn default() -> Self {
        CompileOptions {
            positions: true,
            ast_expressions: true,
            debug: false,
        }
    }
}

pub struct GrammarCompiler {
    grammar: Arc<Grammar>,
    opts: CompileOptions,
    patterns: HashMap<String, Arc<Pattern>>,
}

impl GrammarCompiler {
    pub fn new(grammar: Grammar) -> Self {
        Self::with_options(grammar, CompileOptions::default())
    }

    pub fn with_options(grammar: Grammar, opts: CompileOptions) -> Self {
        GrammarCompiler {
            grammar: Arc::new(grammar),
            opts,
            patterns: HashMap::new(),
        }
    }

    /// Compiles from the start symbol; rules are pulled in transitively as
    /// references resolve.
    pub fn compile(mut self) -> Result<CompiledGrammar, CompileError> {
        let start_name = self.grammar.start.clone();
        let start = self.compile_rule(&start_name)?;
        Ok(CompiledGrammar {
            grammar: self.grammar,
            start,
            patterns: self.patterns,
        })
    }

    /// Eager mode: compiles every named rule, so the full pattern set can be
    /// enumerated (printing, introspection). Parsers behave identically to
    /// [`GrammarCompiler::compile`]'s.
    pub fn compile_all(mut self) -> Result<CompiledGrammar, CompileError> {
        let names: Vec<String> = self.grammar.rules.keys().cloned().collect();
        for name in &names {
            self.compile_rule(name)?;
        }
        let start = self
            .patterns
            .get(&self.grammar.start)
            .cloned()
            .ok_or_else(|| CompileError::UnknownRule {
                name: self.grammar.start.clone(),
            })?;
        Ok(CompiledGrammar {
            grammar: self.grammar,
            start,
            patterns: self.patterns,
        })
    }

    /// Resolves a named rule to its pattern, compiling the rule on first
    /// request. Idempotent: later requests return the same pattern.
    pub fn compile_rule(&mut self, name: &str) -> Result<Arc<Pattern>, CompileError> {
        if let Some(existing) = self.patterns.get(name) {
            return Ok(existing.clone());
        }
        let node = self
            .grammar
            .rules
            .get(name)
            .cloned()
            .ok_or_else(|| CompileError::UnknownRule {
                name: name.to_string(),
            })?;
        // Register the placeholder before compiling the body; this is what
        // lets self-referential and mutually-recursive rules terminate.
        let pattern = Pattern::new(node.type_name().unwrap_or(name));
        self.patterns.insert(name.to_string(), pattern.clone());
        self.fill(&node, &pattern, name)?;
        Ok(pattern)
    }

    /// Compiles a node body into `pattern`'s parser and AST slots.
    fn fill(
        &mut self,
        node: &GrammarNode,
        pattern: &Arc<Pattern>,
        rule: &str,
    ) -> Result<(), CompileError> {
        let parser: ParserFn = match node {
            GrammarNode::Terminal(t) => terminal::compile(t, pattern.clone(), rule)?,
            GrammarNode::Production(p) => {
                if p.items.is_empty() {
                    return Err(CompileError::EmptyProduction {
                        rule: rule.to_string(),
                    });
                }
                let items = p
                    .items
                    .iter()
                    .map(|item| self.inline(item, rule))
                    .collect::<Result<Vec<_>, _>>()?;
                production::compile(pattern.clone(), items)
            }
            GrammarNode::Union(u) => {
                if u.alternatives.is_empty() {
                    return Err(CompileError::EmptyUnion {
                        rule: rule.to_string(),
                    });
                }
                let alternatives = u
                    .alternatives
                    .iter()
                    .map(|alternative| self.inline(alternative, rule))
                    .collect::<Result<Vec<_>, _>>()?;
                union::compile(pattern.clone(), alternatives)
            }
            GrammarNode::List(l) => {
                let item = self.inline(&l.item, rule)?;
                list::compile(pattern.clone(), item)
            }
            GrammarNode::Ref(target) => {
                let target = self.compile_rule(target)?;
                Box::new(move |ctx, pos| target.parse(ctx, pos))
            }
        };
        let parser = if self.opts.debug {
            trace::instrument(pattern.clone(), parser)
        } else {
            parser
        };
        pattern.set_parser(parser);
        pattern.set_to_ast(synth::compile_to_ast(
            node,
            pattern,
            &self.grammar,
            &self.opts,
            rule,
        )?);
        Ok(())
    }

    /// Pattern for a child node: references resolve through the rule table,
    /// inline sub-nodes get anonymous patterns of their own.
    fn inline(&mut self, node: &GrammarNode, rule: &str) -> Result<Arc<Pattern>, CompileError> {
        match node {
            GrammarNode::Ref(name) => self.compile_rule(name),
            _ => {
                let pattern =
                    Pattern::new(node.type_name().unwrap_or_else(|| node.default_type_name()));
                self.fill(node, &pattern, rule)?;
                Ok(pattern)
            }
        }
    }
}

/// A compiled grammar: the immutable pattern graph plus conveniences for
/// running it.
#[derive(Debug)]
pub struct CompiledGrammar {
    grammar: Arc<Grammar>,
    start: Arc<Pattern>,
    patterns: HashMap<String, Arc<Pattern>>,
}

impl CompiledGrammar {
    pub fn grammar(&self) -> &Grammar {
        &self.grammar
    }

    pub fn start(&self) -> &Arc<Pattern> {
        &self.start
    }

    /// Pattern for a named rule, if it was compiled.
    pub fn pattern(&self, name: &str) -> Option<&Arc<Pattern>> {
        self.patterns.get(name)
    }

    /// Compiled patterns in rule order.
    pub fn patterns(&self) -> impl Iterator<Item = (&str, &Arc<Pattern>)> {
        self.grammar
            .rules
            .keys()
            .filter_map(|name| self.patterns.get(name).map(|p| (name.as_str(), p)))
    }

    /// Parses from the start symbol at position 0.
    pub fn parse(&self, text: &str) -> Option<CstNode> {
        let mut ctx = ParseContext::new(text);
        self.start.parse(&mut ctx, 0)
    }

    /// Parses with a caller-supplied context and position.
    pub fn parse_with(&self, ctx: &mut ParseContext<'_>, pos: usize) -> Option<CstNode> {
        self.start.parse(ctx, pos)
    }

    /// Parses and synthesizes the AST of the root match.
    pub fn ast(&self, text: &str) -> Option<Value> {
        let mut ctx = ParseContext::with_ast(text);
        let cst = self.start.parse(&mut ctx, 0)?;
        self.ast_of(&ctx, &cst)
    }

    /// Synthesizes the root AST for a finished parse, honoring the context's
    /// `want_ast` flag.
    pub fn ast_of(&self, ctx: &ParseContext<'_>, cst: &CstNode) -> Option<Value> {
        if !ctx.want_ast {
            return None;
        }
        cst.ptr().to_ast(cst, ctx.text)
    }

    /// Parses with trace capture. Meaningful only for grammars compiled with
    /// `CompileOptions::debug`; otherwise the trace comes back empty.
    pub fn trace(&self, text: &str) -> (Option<CstNode>, Vec<TraceNode>) {
        let mut ctx = ParseContext::with_trace(text);
        let result = self.start.parse(&mut ctx, 0);
        (result, ctx.take_trace())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grammar::{alt, lit, list, refn, rx, seq, Grammar};

    fn nesting() -> Grammar {
        // X := '(' X ')' | ''
        Grammar::new(
            "X",
            [("X", alt([seq([lit("("), refn("X"), lit(")")]), lit("")]))],
        )
    }

    #[test]
    fn self_referential_rule_compiles_and_parses() {
        let compiled = GrammarCompiler::new(nesting()).compile().unwrap();
        let cst = compiled.parse("(())").unwrap();
        assert_eq!((cst.pos(), cst.end()), (0, 4));
        // Depth 2: X > ( X > ( X ) ) with the innermost X matching "".
        let inner = &cst.children()[0].children()[1];
        assert_eq!(inner.ptr().type_name(), "X");
        assert_eq!((inner.pos(), inner.end()), (1, 3));
    }

    #[test]
    fn rule_resolution_is_memoized() {
        let mut compiler = GrammarCompiler::new(nesting());
        let first = compiler.compile_rule("X").unwrap();
        let second = compiler.compile_rule("X").unwrap();
        assert!(Arc::ptr_eq(&first, &second));
    }

    #[test]
    fn unknown_rule_fails_resolution() {
        let grammar = Grammar::new("Top", [("Top", refn("Missing"))]);
        let err = GrammarCompiler::new(grammar).compile().unwrap_err();
        assert!(matches!(err, CompileError::UnknownRule { name } if name == "Missing"));
    }

    #[test]
    fn empty_production_is_rejected() {
        let grammar = Grammar::new("Top", [("Top", seq([]))]);
        assert!(matches!(
            GrammarCompiler::new(grammar).compile(),
            Err(CompileError::EmptyProduction { .. })
        ));
    }

    #[test]
    fn ast_synthesis_honors_the_context_flag() {
        let grammar = Grammar::new("A", [("A", lit("a"))]);
        let compiled = GrammarCompiler::new(grammar).compile().unwrap();
        let mut plain = ParseContext::new("a");
        let cst = compiled.parse_with(&mut plain, 0).unwrap();
        assert_eq!(compiled.ast_of(&plain, &cst), None);
        let mut wanting = ParseContext::with_ast("a");
        let cst = compiled.parse_with(&mut wanting, 0).unwrap();
        assert!(compiled.ast_of(&wanting, &cst).is_some());
    }

    #[test]
    fn eager_and_lazy_modes_parse_identically() {
        let grammar = Grammar::new(
            "Word",
            [
                ("Word", list(refn("Letter"))),
                ("Letter", rx("[a-z]")),
                ("Unreachable", lit("!")),
            ],
        );
        let lazy = GrammarCompiler::new(grammar.clone()).compile().unwrap();
        let eager = GrammarCompiler::new(grammar).compile_all().unwrap();
        // Lazy mode never touched the unreachable rule; eager mode did.
        assert!(lazy.pattern("Unreachable").is_none());
        assert!(eager.pattern("Unreachable").is_some());
        for input in ["", "abc", "abc1"] {
            let a = lazy.parse(input).map(|c| (c.pos(), c.end()));
            let b = eager.parse(input).map(|c| (c.pos(), c.end()));
            assert_eq!(a, b, "divergence on {input:?}");
        }
    }
}
