use clap::Parser;
use weft::cli::{run, WeftArgs};

fn main() -> miette::Result<()> {
    run(WeftArgs::parse())
}
