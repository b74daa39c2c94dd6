//! Embedded AST expression language.
//!
//! Grammar nodes may reshape their AST with a small JSON-encoded expression
//! language, compiled once per node at grammar-compile time and interpreted
//! against a data root at parse time. The language is deliberately total and
//! permissive: a missing field selects the `$` default (or `null`), operator
//! type mismatches coerce or degrade to `null`, and evaluation never raises.
//! It exists for best-effort tree reshaping, not general computation.
//!
//! Encoding, mirroring JSON expression conventions:
//! - `["$", "/path"]` or `["$", "/path", default]`: JSON-pointer selection
//!   from the data root;
//! - `["op", arg, ...]`: operator call (see [`ops`] for the fixed set);
//! - `[[x]]`: the literal value `x` (escape hatch for literal arrays);
//! - `{...}`: object template, each value itself an expression;
//! - any scalar: a literal.
//!
//! Unknown operator names are rejected at compile time; everything at
//! evaluation time is total.

pub mod ops;

use serde_json::Value;
use thiserror::Error;

use ops::Op;

/// Expression compilation failure. The grammar compiler wraps this with the
/// offending rule's name.
#[derive(Debug, Error)]
pub enum ExprError {
    #[error("unknown operator '{0}'")]
    UnknownOperator(String),
    #[error("{0}")]
    Malformed(String),
}

/// One JSON-pointer segment.
#[derive(Debug, Clone, PartialEq)]
pub enum Seg {
    Key(String),
    Index(usize),
}

/// A compiled expression.
#[derive(Debug, Clone, PartialEq)]
pub enum Expr {
    Lit(Value),
    Get {
        path: Vec<Seg>,
        default: Option<Box<Expr>>,
    },
    Object(Vec<(String, Expr)>),
    Call {
        op: Op,
        args: Vec<Expr>,
    },
}

/// Compiles a JSON-encoded expression. Total over well-formed grammars;
/// fails only on unknown operators and malformed `$` calls.
pub fn compile(spec: &Value) -> Result<Expr, ExprError> {
    match spec {
        Value::Array(items) => compile_array(items, spec),
        Value::Object(map) => {
            let fields = map
                .iter()
                .map(|(k, v)| Ok((k.clone(), compile(v)?)))
                .collect::<Result<Vec<_>, ExprError>>()?;
            Ok(Expr::Object(fields))
        }
        other => Ok(Expr::Lit(other.clone())),
    }
}

fn compile_array(items: &[Value], whole: &Value) -> Result<Expr, ExprError> {
    // [[x]] escapes a literal array.
    if let [Value::Array(inner)] = items {
        return Ok(Expr::Lit(Value::Array(inner.clone())));
    }
    let Some(Value::String(head)) = items.first() else {
        // Arrays without an operator head are literals.
        return Ok(Expr::Lit(whole.clone()));
    };
    if head == "$" {
        let Some(Value::String(pointer)) = items.get(1) else {
            return Err(ExprError::Malformed(
                "'$' expects a JSON-pointer string argument".to_string(),
            ));
        };
        let default = match items.get(2) {
            Some(d) => Some(Box::new(compile(d)?)),
            None => None,
        };
        return Ok(Expr::Get {
            path: parse_pointer(pointer),
            default,
        });
    }
    let Some(op) = Op::from_name(head) else {
        return Err(ExprError::UnknownOperator(head.clone()));
    };
    let args = items[1..]
        .iter()
        .map(compile)
        .collect::<Result<Vec<_>, ExprError>>()?;
    Ok(Expr::Call { op, args })
}

fn parse_pointer(pointer: &str) -> Vec<Seg> {
    pointer
        .split('/')
        .skip(1) // pointers start with '/'; "" selects the root
        .map(|part| match part.parse::<usize>() {
            Ok(index) => Seg::Index(index),
            Err(_) => Seg::Key(part.to_string()),
        })
        .collect()
}

/// Evaluates a compiled expression against a data root. Total: never panics,
/// never errors.
pub fn eval(expr: &Expr, data: &Value) -> Value {
    match expr {
        Expr::Lit(value) => value.clone(),
        Expr::Get { path, default } => match select(data, path) {
            Some(found) => found.clone(),
            None => default
                .as_ref()
                .map(|d| eval(d, data))
                .unwrap_or(Value::Null),
        },
        Expr::Object(fields) => {
            let map = fields
                .iter()
                .map(|(key, field)| (key.clone(), eval(field, data)))
                .collect();
            Value::Object(map)
        }
        Expr::Call { op, args } => ops::apply(*op, args, data),
    }
}

fn select<'v>(data: &'v Value, path: &[Seg]) -> Option<&'v Value> {
    let mut cursor = data;
    for seg in path {
        cursor = match (seg, cursor) {
            (Seg::Key(key), Value::Object(map)) => map.get(key)?,
            (Seg::Index(index), Value::Array(items)) => items.get(*index)?,
            // Numeric keys select object fields too ("/0" on an object).
            (Seg::Index(index), Value::Object(map)) => map.get(&index.to_string())?,
            _ => return None,
        };
    }
    Some(cursor)
}
