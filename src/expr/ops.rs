//! Operator set for the AST expression language.
//!
//! All operators are side-effect-free and total. Coercions follow the
//! permissive conventions of the language: anything coerces to a number
//! (garbage becomes zero), `null`/`false`/`0`/`""` are falsy, everything
//! else is truthy.

use serde_json::Value;

use super::{eval, Expr};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Op {
    // record patching
    Set,
    Del,
    // arrays and strings
    Concat,
    Push,
    Len,
    Substr,
    Reduce,
    // control and comparison
    If,
    Eq,
    Ne,
    Gt,
    Ge,
    Lt,
    Le,
    Not,
    And,
    Or,
    // arithmetic and coercion
    Add,
    Sub,
    Mul,
    Div,
    Num,
    Str,
}

impl Op {
    pub fn from_name(name: &str) -> Option<Op> {
        Some(match name {
            "o.set" => Op::Set,
            "o.del" => Op::Del,
            "concat" => Op::Concat,
            "push" => Op::Push,
            "len" => Op::Len,
            "substr" => Op::Substr,
            "reduce" => Op::Reduce,
            "?" => Op::If,
            "==" => Op::Eq,
            "!=" => Op::Ne,
            ">" => Op::Gt,
            ">=" => Op::Ge,
            "<" => Op::Lt,
            "<=" => Op::Le,
            "!" => Op::Not,
            "&&" => Op::And,
            "||" => Op::Or,
            "+" => Op::Add,
            "-" => Op::Sub,
            "*" => Op::Mul,
            "/" => Op::Div,
            "num" => Op::Num,
            "str" => Op::Str,
            _ => return None,
        })
    }
}

pub(super) fn apply(op: Op, args: &[Expr], data: &Value) -> Value {
    match op {
        // Short-circuiting forms evaluate lazily.
        Op::If => {
            let cond = arg(args, 0, data);
            if truthy(&cond) {
                arg(args, 1, data)
            } else {
                arg(args, 2, data)
            }
        }
        Op::And => Value::Bool(args.iter().all(|a| truthy(&eval(a, data)))),
        Op::Or => Value::Bool(args.iter().any(|a| truthy(&eval(a, data)))),
        _ => {
            let values: Vec<Value> = args.iter().map(|a| eval(a, data)).collect();
            apply_strict(op, &values)
        }
    }
}

fn apply_strict(op: Op, values: &[Value]) -> Value {
    match op {
        Op::Set => set(values),
        Op::Del => del(values),
        Op::Concat => concat(values),
        Op::Push => push(values),
        Op::Len => number(len(values.first().unwrap_or(&Value::Null)) as f64),
        Op::Substr => substr(values),
        Op::Reduce => reduce(values),
        Op::Eq => Value::Bool(loose_eq(first(values), second(values))),
        Op::Ne => Value::Bool(!loose_eq(first(values), second(values))),
        Op::Gt => Value::Bool(num(first(values)) > num(second(values))),
        Op::Ge => Value::Bool(num(first(values)) >= num(second(values))),
        Op::Lt => Value::Bool(num(first(values)) < num(second(values))),
        Op::Le => Value::Bool(num(first(values)) <= num(second(values))),
        Op::Not => Value::Bool(!truthy(first(values))),
        Op::Add => fold_numeric(values, |a, b| Some(a + b)),
        Op::Sub => fold_numeric(values, |a, b| Some(a - b)),
        Op::Mul => fold_numeric(values, |a, b| Some(a * b)),
        Op::Div => fold_numeric(values, |a, b| if b == 0.0 { None } else { Some(a / b) }),
        Op::Num => number(num(first(values))),
        Op::Str => Value::String(stringify(first(values))),
        Op::If | Op::And | Op::Or => unreachable!("handled in apply"),
    }
}

fn arg(args: &[Expr], index: usize, data: &Value) -> Value {
    args.get(index).map(|a| eval(a, data)).unwrap_or(Value::Null)
}

fn first(values: &[Value]) -> &Value {
    values.first().unwrap_or(&Value::Null)
}

fn second(values: &[Value]) -> &Value {
    values.get(1).unwrap_or(&Value::Null)
}

pub(super) fn truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().map(|f| f != 0.0).unwrap_or(false),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}

pub(super) fn num(value: &Value) -> f64 {
    match value {
        Value::Number(n) => n.as_f64().unwrap_or(0.0),
        Value::String(s) => s.trim().parse().unwrap_or(0.0),
        Value::Bool(true) => 1.0,
        _ => 0.0,
    }
}

/// Builds a JSON number, preferring integers for whole values.
pub(crate) fn number(n: f64) -> Value {
    if n.fract() == 0.0 && n.abs() < (i64::MAX as f64) {
        Value::from(n as i64)
    } else {
        serde_json::Number::from_f64(n)
            .map(Value::Number)
            .unwrap_or(Value::Null)
    }
}

fn stringify(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

/// Numbers compare numerically (`1 == 1.0`); everything else compares deep.
fn loose_eq(a: &Value, b: &Value) -> bool {
    match (a, b) {
        (Value::Number(_), Value::Number(_)) => num(a) == num(b),
        _ => a == b,
    }
}

fn fold_numeric(values: &[Value], f: impl Fn(f64, f64) -> Option<f64>) -> Value {
    let mut iter = values.iter();
    let Some(head) = iter.next() else {
        return Value::Null;
    };
    let mut acc = num(head);
    for value in iter {
        match f(acc, num(value)) {
            Some(next) => acc = next,
            None => return Value::Null,
        }
    }
    number(acc)
}

fn set(values: &[Value]) -> Value {
    let target = first(values).clone();
    let Value::Object(mut map) = target else {
        return target;
    };
    for pair in values[1..].chunks(2) {
        if let [key, value] = pair {
            map.insert(stringify(key), value.clone());
        }
    }
    Value::Object(map)
}

fn del(values: &[Value]) -> Value {
    let target = first(values).clone();
    let Value::Object(mut map) = target else {
        return target;
    };
    for key in &values[1..] {
        map.remove(&stringify(key));
    }
    Value::Object(map)
}

fn concat(values: &[Value]) -> Value {
    let mut out = Vec::new();
    for value in values {
        match value {
            Value::Array(items) => out.extend(items.iter().cloned()),
            other => out.push(other.clone()),
        }
    }
    Value::Array(out)
}

fn push(values: &[Value]) -> Value {
    let target = first(values).clone();
    let Value::Array(mut items) = target else {
        return target;
    };
    items.extend(values[1..].iter().cloned());
    Value::Array(items)
}

fn len(value: &Value) -> usize {
    match value {
        Value::Array(items) => items.len(),
        Value::String(s) => s.chars().count(),
        Value::Object(map) => map.len(),
        _ => 0,
    }
}

fn substr(values: &[Value]) -> Value {
    let Value::String(s) = first(values) else {
        return Value::String(String::new());
    };
    let chars: Vec<char> = s.chars().collect();
    let start = (num(second(values)).max(0.0) as usize).min(chars.len());
    let end = match values.get(2) {
        Some(v) => (num(v).max(0.0) as usize).clamp(start, chars.len()),
        None => chars.len(),
    };
    Value::String(chars[start..end].iter().collect())
}

/// `["reduce", array, init, "op"]` folds the array with a binary operator
/// named by its expression-language name. An unknown name yields the initial
/// value unchanged.
fn reduce(values: &[Value]) -> Value {
    let Value::Array(items) = first(values) else {
        return second(values).clone();
    };
    let mut acc = second(values).clone();
    let Some(op) = values.get(2).and_then(|v| match v {
        Value::String(name) => Op::from_name(name),
        _ => None,
    }) else {
        return acc;
    };
    for item in items {
        acc = apply_strict(op, &[acc, item.clone()]);
    }
    acc
}
