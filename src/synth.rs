//! AST synthesis.
//!
//! Every pattern gets a `to_ast` closure, chosen once at grammar-compile
//! time:
//!
//! 1. a suppressed node always yields "no value";
//! 2. a custom expression is compiled once and evaluated against
//!    `{"cst": <cst view>, "ast": <default shape>}`, where the cst view
//!    exposes `type`/`pos`/`end`/`raw`/`children` per node, children
//!    recursively, plus each child's own synthesized `ast`;
//! 3. otherwise the node kind's canonical default shape applies, after
//!    consulting the grammar-level default expression registered for the
//!    rule's type name.
//!
//! Two common selections get fast, non-interpreted paths: the first
//! non-null child AST (`["$", "/ast/children/0"]`) and the plain array of
//! all children ASTs (`["$", "/ast/children"]`).

use std::collections::BTreeMap;
use std::sync::Arc;

use serde_json::{json, Map, Value};

use crate::compile::CompileOptions;
use crate::cst::CstNode;
use crate::errors::CompileError;
use crate::expr::{self, ExprError};
use crate::grammar::{AstSpec, Grammar, GrammarNode};
use crate::pattern::{AstFn, Pattern};

/// Default-shape discriminant, captured per node at compile time.
#[derive(Debug, Clone)]
pub(crate) enum Shape {
    Terminal,
    Production { named: Option<BTreeMap<usize, String>> },
    Union { leaf: bool },
    List { leaf: bool },
    Generic,
}

impl Shape {
    fn of(node: &GrammarNode) -> Shape {
        match node {
            GrammarNode::Terminal(_) => Shape::Terminal,
            GrammarNode::Production(p) => Shape::Production {
                named: if p.children.is_empty() {
                    None
                } else {
                    Some(p.children.clone())
                },
            },
            GrammarNode::Union(u) => Shape::Union { leaf: u.leaf },
            GrammarNode::List(l) => Shape::List { leaf: l.leaf },
            GrammarNode::Ref(_) => Shape::Generic,
        }
    }
}

/// Compiles the AST procedure for one grammar node.
pub(crate) fn compile_to_ast(
    node: &GrammarNode,
    pattern: &Arc<Pattern>,
    grammar: &Grammar,
    opts: &CompileOptions,
    rule: &str,
) -> Result<AstFn, CompileError> {
    // A node's own directive wins; an unset one falls back to the
    // grammar-level default for the rule's type name (JSON null suppresses).
    let spec = match node.ast_spec() {
        AstSpec::Default => match grammar.defaults.get(pattern.type_name()) {
            Some(Value::Null) => AstSpec::Suppress,
            Some(expr) => AstSpec::Expr(expr.clone()),
            None => AstSpec::Default,
        },
        other => other.clone(),
    };

    let shape = Shape::of(node);
    let positions = opts.positions;
    // The shorthand fast paths must agree with the general evaluator, which
    // resolves `/ast/...` against the default shape; only shapes whose
    // default carries a `children` field qualify. Leaf lists and
    // named-children productions omit it, so they take the general path.
    let has_children_field = matches!(
        &shape,
        Shape::Production { named: None } | Shape::Union { leaf: false } | Shape::List { leaf: false }
    );
    match spec {
        AstSpec::Suppress => Ok(Box::new(|_, _| None)),
        AstSpec::Default => Ok(default_factory(shape, positions)),
        AstSpec::Expr(_) if !opts.ast_expressions => Ok(default_factory(shape, positions)),
        AstSpec::Expr(value) if has_children_field && value == json!(["$", "/ast/children/0"]) => {
            Ok(Box::new(|cst, src| first_child_ast(cst, src)))
        }
        AstSpec::Expr(value) if has_children_field && value == json!(["$", "/ast/children"]) => {
            Ok(Box::new(|cst, src| Some(children_asts(cst, src))))
        }
        AstSpec::Expr(value) => {
            let compiled = expr::compile(&value).map_err(|e| match e {
                ExprError::UnknownOperator(op) => CompileError::UnknownOperator {
                    rule: rule.to_string(),
                    op,
                },
                ExprError::Malformed(detail) => CompileError::BadExpression {
                    rule: rule.to_string(),
                    detail,
                },
            })?;
            Ok(Box::new(move |cst, src| {
                let default = default_shape(&shape, positions, cst, src).unwrap_or(Value::Null);
                let data = json!({"cst": cst_view(cst, src, false), "ast": default});
                Some(expr::eval(&compiled, &data))
            }))
        }
    }
}

fn default_factory(shape: Shape, positions: bool) -> AstFn {
    Box::new(move |cst, src| default_shape(&shape, positions, cst, src))
}

/// Canonical default AST shape for a node.
pub(crate) fn default_shape(
    shape: &Shape,
    positions: bool,
    cst: &CstNode,
    src: &str,
) -> Option<Value> {
    // A leaf union is transparent: its AST is the matched alternative's AST
    // alone, while the CST wrapper stays for printing and tracing.
    if let Shape::Union { leaf: true } = shape {
        let child = cst.children().first()?;
        return child.ptr().to_ast(child, src);
    }

    let mut map = Map::new();
    map.insert(
        "type".to_string(),
        Value::String(cst.ptr().type_name().to_string()),
    );
    if positions {
        map.insert("pos".to_string(), Value::from(cst.pos() as u64));
        map.insert("end".to_string(), Value::from(cst.end() as u64));
    }
    match shape {
        Shape::Terminal => {
            map.insert("raw".to_string(), Value::String(cst.raw(src).to_string()));
        }
        Shape::Production { named: Some(named) } => {
            for (index, name) in named {
                if let Some(child) = cst.children().get(*index) {
                    if let Some(value) = child.ptr().to_ast(child, src) {
                        if !value.is_null() {
                            map.insert(name.clone(), value);
                        }
                    }
                }
            }
        }
        Shape::Production { named: None } | Shape::Union { leaf: false } => {
            map.insert("children".to_string(), children_asts(cst, src));
        }
        Shape::List { leaf } => {
            if !leaf {
                map.insert("children".to_string(), children_asts(cst, src));
            }
        }
        Shape::Generic => {
            if cst.is_leaf() {
                map.insert("raw".to_string(), Value::String(cst.raw(src).to_string()));
            } else {
                map.insert("children".to_string(), children_asts(cst, src));
            }
        }
        Shape::Union { leaf: true } => unreachable!("handled above"),
    }
    Some(Value::Object(map))
}

/// Default shape used when a pattern has no compiled AST procedure.
pub(crate) fn generic_default(cst: &CstNode, src: &str) -> Option<Value> {
    default_shape(&Shape::Generic, true, cst, src)
}

/// Children ASTs in order, omitting suppressed and null values.
fn children_asts(cst: &CstNode, src: &str) -> Value {
    let mut out = Vec::with_capacity(cst.children().len());
    for child in cst.children() {
        if let Some(value) = child.ptr().to_ast(child, src) {
            if !value.is_null() {
                out.push(value);
            }
        }
    }
    Value::Array(out)
}

fn first_child_ast(cst: &CstNode, src: &str) -> Option<Value> {
    for child in cst.children() {
        if let Some(value) = child.ptr().to_ast(child, src) {
            if !value.is_null() {
                return Some(value);
            }
        }
    }
    Some(Value::Null)
}

/// JSON view of a CST node for expression evaluation. Children carry their
/// own synthesized `ast` value; the root does not (its AST is the value
/// being computed).
fn cst_view(cst: &CstNode, src: &str, include_ast: bool) -> Value {
    let mut map = Map::new();
    map.insert(
        "type".to_string(),
        Value::String(cst.ptr().type_name().to_string()),
    );
    map.insert("pos".to_string(), Value::from(cst.pos() as u64));
    map.insert("end".to_string(), Value::from(cst.end() as u64));
    map.insert("raw".to_string(), Value::String(cst.raw(src).to_string()));
    if !cst.is_leaf() {
        let children = cst
            .children()
            .iter()
            .map(|child| cst_view(child, src, true))
            .collect();
        map.insert("children".to_string(), Value::Array(children));
    }
    if include_ast {
        map.insert(
            "ast".to_string(),
            cst.ptr().to_ast(cst, src).unwrap_or(Value::Null),
        );
    }
    Value::Object(map)
}
