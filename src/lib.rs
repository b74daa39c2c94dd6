pub use crate::compile::{CompileOptions, CompiledGrammar, GrammarCompiler};
pub use crate::context::ParseContext;
pub use crate::cst::CstNode;
pub use crate::errors::CompileError;
pub use crate::grammar::{Grammar, GrammarNode};
pub use crate::pattern::Pattern;

pub mod cli;
pub mod compile;
pub mod context;
pub mod cst;
pub mod errors;
pub mod expr;
pub mod generate;
pub mod grammar;
pub mod grammars;
pub mod pattern;
pub mod print;
mod synth;
pub mod trace;
