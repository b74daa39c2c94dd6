//! Compile-time errors for grammar compilation.
//!
//! Only grammar compilation can fail. Parse-time non-matches are ordinary
//! control flow (`Option::None`), and AST expression evaluation degrades to
//! `null` rather than raising, so neither appears here.

use miette::Diagnostic;
use thiserror::Error;

#[derive(Debug, Error, Diagnostic)]
pub enum CompileError {
    /// A `Ref` node (or the start symbol) named a rule the grammar does not
    /// define. Raised lazily, at the first use of the name.
    #[error("unknown rule '{name}'")]
    #[diagnostic(
        code(weft::compile::unknown_rule),
        help("every reference must name a rule defined in the grammar")
    )]
    UnknownRule { name: String },

    #[error("invalid regex terminal in rule '{rule}'")]
    #[diagnostic(code(weft::compile::regex))]
    Regex {
        rule: String,
        #[source]
        source: regex::Error,
    },

    #[error("production in rule '{rule}' has no items")]
    #[diagnostic(code(weft::compile::empty_production))]
    EmptyProduction { rule: String },

    #[error("union in rule '{rule}' has no alternatives")]
    #[diagnostic(code(weft::compile::empty_union))]
    EmptyUnion { rule: String },

    #[error("terminal set in rule '{rule}' has no candidates")]
    #[diagnostic(code(weft::compile::empty_terminal_set))]
    EmptyTerminalSet { rule: String },

    #[error("unknown operator '{op}' in AST expression for rule '{rule}'")]
    #[diagnostic(
        code(weft::compile::unknown_operator),
        help("see the expression module docs for the supported operator set")
    )]
    UnknownOperator { rule: String, op: String },

    #[error("malformed AST expression for rule '{rule}': {detail}")]
    #[diagnostic(code(weft::compile::bad_expression))]
    BadExpression { rule: String, detail: String },
}
