//! Random sample generator.
//!
//! Walks the grammar node model (not the compiled pattern graph) producing
//! random strings that match the grammar. Useful for fuzzing a parser or
//! eyeballing what a grammar accepts. Regex terminals cannot be synthesized
//! randomly; they rely on their `sample` hint and otherwise contribute an
//! empty string (see DESIGN.md).

use rand::{Rng, SeedableRng};
use rand_xoshiro::Xoshiro256PlusPlus;

use crate::errors::CompileError;
use crate::grammar::{Grammar, GrammarNode, Repeat, TerminalMatcher};

pub struct Generator<'g, R: Rng> {
    grammar: &'g Grammar,
    rng: R,
    use_samples: bool,
}

/// Deterministic generator over a seeded xoshiro PRNG.
pub fn seeded(grammar: &Grammar, seed: u64) -> Generator<'_, Xoshiro256PlusPlus> {
    Generator::new(grammar, Xoshiro256PlusPlus::seed_from_u64(seed))
}

impl<'g, R: Rng> Generator<'g, R> {
    pub fn new(grammar: &'g Grammar, rng: R) -> Self {
        Generator {
            grammar,
            rng,
            use_samples: false,
        }
    }

    /// Prefer literal `sample` hints wherever a node carries one.
    pub fn prefer_samples(mut self, yes: bool) -> Self {
        self.use_samples = yes;
        self
    }

    /// Generates one string from the start symbol.
    pub fn gen(&mut self) -> Result<String, CompileError> {
        let start = self.grammar.start.clone();
        self.gen_rule(&start)
    }

    /// Generates one string from a named rule.
    pub fn gen_rule(&mut self, name: &str) -> Result<String, CompileError> {
        let grammar = self.grammar;
        let node = grammar
            .rules
            .get(name)
            .ok_or_else(|| CompileError::UnknownRule {
                name: name.to_string(),
            })?;
        self.gen_node(node)
    }

    fn gen_node(&mut self, node: &GrammarNode) -> Result<String, CompileError> {
        if self.use_samples {
            if let Some(sample) = node.sample() {
                return Ok(sample.to_string());
            }
        }
        match node {
            GrammarNode::Terminal(t) => Ok(match &t.matcher {
                TerminalMatcher::Literal(s) => s.clone(),
                TerminalMatcher::Regex(_) => t.sample.clone().unwrap_or_default(),
                TerminalMatcher::Set(candidates) => {
                    if candidates.is_empty() {
                        return Ok(String::new());
                    }
                    let repeats = match t.repeat {
                        Repeat::Once => 1,
                        Repeat::ZeroOrMore => self.rng.gen_range(0..=5),
                        Repeat::OneOrMore => self.rng.gen_range(1..=5),
                    };
                    let mut out = String::new();
                    for _ in 0..repeats {
                        let pick = self.rng.gen_range(0..candidates.len());
                        out.push_str(&candidates[pick]);
                    }
                    out
                }
            }),
            GrammarNode::Production(p) => {
                let mut out = String::new();
                for item in &p.items {
                    out.push_str(&self.gen_node(item)?);
                }
                Ok(out)
            }
            GrammarNode::Union(u) => {
                if u.alternatives.is_empty() {
                    return Ok(String::new());
                }
                let pick = self.rng.gen_range(0..u.alternatives.len());
                self.gen_node(&u.alternatives[pick])
            }
            GrammarNode::List(l) => {
                let repeats = self.rng.gen_range(0..=5);
                let mut out = String::new();
                for _ in 0..repeats {
                    out.push_str(&self.gen_node(&l.item)?);
                }
                Ok(out)
            }
            GrammarNode::Ref(target) => self.gen_rule(target),
        }
    }
}
