//! Command-line interface.
//!
//! Thin shell over the library: load a grammar (bundled by name or from a
//! JSON document), compile it, then parse, print, or generate. Uses `clap`
//! with its derive feature for declarative, type-safe argument parsing and
//! `miette` for diagnostic rendering.

use std::fs;
use std::io::Write;

use clap::{Parser, Subcommand};
use miette::{IntoDiagnostic, Result, WrapErr};
use termcolor::{Color, ColorChoice, ColorSpec, StandardStream, WriteColor};

use crate::compile::{CompileOptions, GrammarCompiler};
use crate::generate;
use crate::grammar::Grammar;
use crate::grammars;
use crate::print;

/// The main CLI argument structure.
#[derive(Debug, Parser)]
#[command(
    name = "weft",
    version,
    about = "Compile declarative grammars into fast CST/AST parsers."
)]
pub struct WeftArgs {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Parse input text and print the CST, AST, or parse trace.
    Parse {
        /// Bundled grammar name (json, calculator, html, esql, javascript)
        /// or path to a grammar JSON document.
        grammar: String,
        /// Input text, or a file path with --file.
        input: String,
        /// Read the input argument as a file path.
        #[arg(long)]
        file: bool,
        /// Print the synthesized AST instead of the CST.
        #[arg(long)]
        ast: bool,
        /// Compile with debug instrumentation and print the parse trace.
        #[arg(long)]
        trace: bool,
    },
    /// Print a grammar's rule tree.
    Print { grammar: String },
    /// Generate random sample strings matching a grammar.
    Gen {
        grammar: String,
        /// Number of samples to produce.
        #[arg(long, default_value_t = 1)]
        count: u32,
        /// PRNG seed; random when omitted.
        #[arg(long)]
        seed: Option<u64>,
        /// Prefer literal sample hints attached to grammar nodes.
        #[arg(long)]
        samples: bool,
    },
}

pub fn run(args: WeftArgs) -> Result<()> {
    match args.command {
        Command::Parse {
            grammar,
            input,
            file,
            ast,
            trace,
        } => {
            let grammar = load_grammar(&grammar)?;
            let input = if file {
                fs::read_to_string(&input)
                    .into_diagnostic()
                    .wrap_err_with(|| format!("cannot read input file '{input}'"))?
            } else {
                input
            };
            parse_command(grammar, &input, ast, trace)
        }
        Command::Print { grammar } => {
            let grammar = load_grammar(&grammar)?;
            print_plain(&print::print_grammar(&grammar))
        }
        Command::Gen {
            grammar,
            count,
            seed,
            samples,
        } => {
            let grammar = load_grammar(&grammar)?;
            let seed = seed.unwrap_or_else(rand::random);
            let mut generator = generate::seeded(&grammar, seed).prefer_samples(samples);
            for _ in 0..count {
                let sample = generator.gen()?;
                print_plain(&format!("{sample}\n"))?;
            }
            Ok(())
        }
    }
}

fn parse_command(grammar: Grammar, input: &str, ast: bool, trace: bool) -> Result<()> {
    if trace {
        let opts = CompileOptions {
            debug: true,
            ..CompileOptions::default()
        };
        let compiled = GrammarCompiler::with_options(grammar, opts).compile()?;
        let (result, roots) = compiled.trace(input);
        print_plain(&print::print_trace(&roots, input))?;
        return match result {
            Some(_) => status(Color::Green, "match"),
            None => status(Color::Red, "no match"),
        };
    }
    let compiled = GrammarCompiler::new(grammar).compile()?;
    if ast {
        match compiled.ast(input) {
            Some(value) => {
                let rendered = serde_json::to_string_pretty(&value).into_diagnostic()?;
                print_plain(&format!("{rendered}\n"))
            }
            None => status(Color::Red, "no match"),
        }
    } else {
        match compiled.parse(input) {
            Some(cst) => print_plain(&print::print_cst(&cst, input)),
            None => status(Color::Red, "no match"),
        }
    }
}

fn load_grammar(name_or_path: &str) -> Result<Grammar> {
    match name_or_path {
        "json" => Ok(grammars::json::grammar()),
        "calculator" | "calc" => Ok(grammars::calculator::grammar()),
        "html" => Ok(grammars::html::grammar()),
        "esql" => Ok(grammars::esql::grammar()),
        "javascript" | "js" => Ok(grammars::javascript::grammar()),
        path => {
            let text = fs::read_to_string(path)
                .into_diagnostic()
                .wrap_err_with(|| format!("cannot read grammar '{path}' (not a bundled name)"))?;
            serde_json::from_str(&text)
                .into_diagnostic()
                .wrap_err("malformed grammar document")
        }
    }
}

fn print_plain(text: &str) -> Result<()> {
    let mut stdout = StandardStream::stdout(ColorChoice::Auto);
    write!(stdout, "{text}").into_diagnostic()
}

fn status(color: Color, text: &str) -> Result<()> {
    let mut stdout = StandardStream::stdout(ColorChoice::Auto);
    stdout
        .set_color(ColorSpec::new().set_fg(Some(color)).set_bold(true))
        .into_diagnostic()?;
    write!(stdout, "{text}").into_diagnostic()?;
    stdout.reset().into_diagnostic()?;
    writeln!(stdout).into_diagnostic()
}
