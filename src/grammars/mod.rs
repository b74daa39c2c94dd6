//! Bundled example grammars.
//!
//! Pure data: each module exposes a `grammar()` constructor built with the
//! shorthand helpers from [`crate::grammar`]. They double as documentation
//! of the AST expression conventions and as fixtures for the integration
//! tests.

pub mod calculator;
pub mod esql;
pub mod html;
pub mod javascript;
pub mod json;
