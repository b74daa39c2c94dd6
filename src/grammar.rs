//! Grammar node model.
//!
//! A grammar is pure data: a start symbol plus a map of named rules, each rule
//! a tagged [`GrammarNode`]. Nothing in this module parses anything; the
//! [`crate::compile`] module turns these shapes into parsing closures.
//!
//! Nodes are usually built with the shorthand constructors ([`lit`], [`rx`],
//! [`set`], [`seq`], [`alt`], [`list`], [`refn`]) and refined with the builder
//! methods on [`GrammarNode`]. All shapes derive serde, so grammars can also
//! be loaded from JSON documents.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Repetition marker for terminal sets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Repeat {
    #[default]
    Once,
    ZeroOrMore,
    OneOrMore,
}

/// What a terminal matches: a literal string, an anchored regex, or an
/// ordered set of literal alternatives (first match wins).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum TerminalMatcher {
    Literal(String),
    Regex(String),
    Set(Vec<String>),
}

/// Per-node AST directive.
///
/// `Default` uses the node kind's canonical shape (possibly overridden by a
/// grammar-level default for the rule's type name), `Suppress` produces no
/// AST value at all, and `Expr` evaluates a custom expression (see
/// [`crate::expr`]).
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub enum AstSpec {
    #[default]
    Default,
    Suppress,
    Expr(Value),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TerminalNode {
    pub matcher: TerminalMatcher,
    #[serde(default)]
    pub repeat: Repeat,
    #[serde(default)]
    pub type_name: Option<String>,
    #[serde(default)]
    pub ast: AstSpec,
    /// Literal hint for the sample generator.
    #[serde(default)]
    pub sample: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProductionNode {
    pub items: Vec<GrammarNode>,
    #[serde(default)]
    pub type_name: Option<String>,
    #[serde(default)]
    pub ast: AstSpec,
    /// Map from item position to an AST property name. When present, the
    /// default AST attaches those positions' values as named fields instead
    /// of the positional `children` array.
    #[serde(default)]
    pub children: BTreeMap<usize, String>,
    #[serde(default)]
    pub sample: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UnionNode {
    pub alternatives: Vec<GrammarNode>,
    #[serde(default)]
    pub type_name: Option<String>,
    #[serde(default)]
    pub ast: AstSpec,
    /// Transparent wrapper: the default AST is the matched alternative's AST
    /// alone. The CST wrapper node is still produced.
    #[serde(default)]
    pub leaf: bool,
    #[serde(default)]
    pub sample: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ListNode {
    pub item: Box<GrammarNode>,
    #[serde(default)]
    pub type_name: Option<String>,
    #[serde(default)]
    pub ast: AstSpec,
    /// Omit the `children` array from the default AST shape.
    #[serde(default)]
    pub leaf: bool,
    #[serde(default)]
    pub sample: Option<String>,
}

/// One grammar node. Exactly one tag applies to any given node.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum GrammarNode {
    Terminal(TerminalNode),
    Production(ProductionNode),
    Union(UnionNode),
    List(ListNode),
    /// Named reference to another rule; resolved lazily at compile time.
    Ref(String),
}

impl GrammarNode {
    /// Explicit type-name override, if any.
    pub fn type_name(&self) -> Option<&str> {
        match self {
            GrammarNode::Terminal(t) => t.type_name.as_deref(),
            GrammarNode::Production(p) => p.type_name.as_deref(),
            GrammarNode::Union(u) => u.type_name.as_deref(),
            GrammarNode::List(l) => l.type_name.as_deref(),
            GrammarNode::Ref(_) => None,
        }
    }

    /// Display name used for inline nodes that carry no override.
    pub fn default_type_name(&self) -> &'static str {
        match self {
            GrammarNode::Terminal(_) => "Text",
            GrammarNode::Production(_) => "Production",
            GrammarNode::Union(_) => "Union",
            GrammarNode::List(_) => "List",
            GrammarNode::Ref(_) => "Reference",
        }
    }

    pub fn ast_spec(&self) -> &AstSpec {
        const DEFAULT: AstSpec = AstSpec::Default;
        match self {
            GrammarNode::Terminal(t) => &t.ast,
            GrammarNode::Production(p) => &p.ast,
            GrammarNode::Union(u) => &u.ast,
            GrammarNode::List(l) => &l.ast,
            GrammarNode::Ref(_) => &DEFAULT,
        }
    }

    pub fn sample(&self) -> Option<&str> {
        match self {
            GrammarNode::Terminal(t) => t.sample.as_deref(),
            GrammarNode::Production(p) => p.sample.as_deref(),
            GrammarNode::Union(u) => u.sample.as_deref(),
            GrammarNode::List(l) => l.sample.as_deref(),
            GrammarNode::Ref(_) => None,
        }
    }

    /// Sets the display type name.
    pub fn typed(mut self, name: impl Into<String>) -> Self {
        let name = Some(name.into());
        match &mut self {
            GrammarNode::Terminal(t) => t.type_name = name,
            GrammarNode::Production(p) => p.type_name = name,
            GrammarNode::Union(u) => u.type_name = name,
            GrammarNode::List(l) => l.type_name = name,
            GrammarNode::Ref(_) => {}
        }
        self
    }

    /// Attaches a custom AST expression.
    pub fn ast(mut self, expr: Value) -> Self {
        let spec = AstSpec::Expr(expr);
        match &mut self {
            GrammarNode::Terminal(t) => t.ast = spec,
            GrammarNode::Production(p) => p.ast = spec,
            GrammarNode::Union(u) => u.ast = spec,
            GrammarNode::List(l) => l.ast = spec,
            GrammarNode::Ref(_) => {}
        }
        self
    }

    /// Suppresses AST output for this node. Its CST node is still produced,
    /// but ancestors omit it from their default `children` arrays.
    pub fn suppress_ast(mut self) -> Self {
        match &mut self {
            GrammarNode::Terminal(t) => t.ast = AstSpec::Suppress,
            GrammarNode::Production(p) => p.ast = AstSpec::Suppress,
            GrammarNode::Union(u) => u.ast = AstSpec::Suppress,
            GrammarNode::List(l) => l.ast = AstSpec::Suppress,
            GrammarNode::Ref(_) => {}
        }
        self
    }

    /// Marks a union or list as AST-transparent. No effect on other kinds.
    pub fn leaf(mut self) -> Self {
        match &mut self {
            GrammarNode::Union(u) => u.leaf = true,
            GrammarNode::List(l) => l.leaf = true,
            _ => {}
        }
        self
    }

    /// Sets the repetition marker on a terminal set.
    pub fn repeat(mut self, repeat: Repeat) -> Self {
        if let GrammarNode::Terminal(t) = &mut self {
            t.repeat = repeat;
        }
        self
    }

    /// Names production item positions as AST properties.
    pub fn named_children<S: Into<String>>(
        mut self,
        pairs: impl IntoIterator<Item = (usize, S)>,
    ) -> Self {
        if let GrammarNode::Production(p) = &mut self {
            p.children = pairs.into_iter().map(|(i, s)| (i, s.into())).collect();
        }
        self
    }

    /// Attaches a sample hint for the generator.
    pub fn sampled(mut self, sample: impl Into<String>) -> Self {
        let sample = Some(sample.into());
        match &mut self {
            GrammarNode::Terminal(t) => t.sample = sample,
            GrammarNode::Production(p) => p.sample = sample,
            GrammarNode::Union(u) => u.sample = sample,
            GrammarNode::List(l) => l.sample = sample,
            GrammarNode::Ref(_) => {}
        }
        self
    }
}

/// Literal string terminal. `lit("")` always matches with a zero-width span.
pub fn lit(s: impl Into<String>) -> GrammarNode {
    GrammarNode::Terminal(TerminalNode {
        matcher: TerminalMatcher::Literal(s.into()),
        repeat: Repeat::Once,
        type_name: None,
        ast: AstSpec::Default,
        sample: None,
    })
}

/// Regex terminal, anchored at the current position.
pub fn rx(source: impl Into<String>) -> GrammarNode {
    GrammarNode::Terminal(TerminalNode {
        matcher: TerminalMatcher::Regex(source.into()),
        repeat: Repeat::Once,
        type_name: None,
        ast: AstSpec::Default,
        sample: None,
    })
}

/// Terminal matching the first of an ordered set of literal candidates.
pub fn set<S: Into<String>>(candidates: impl IntoIterator<Item = S>) -> GrammarNode {
    GrammarNode::Terminal(TerminalNode {
        matcher: TerminalMatcher::Set(candidates.into_iter().map(Into::into).collect()),
        repeat: Repeat::Once,
        type_name: None,
        ast: AstSpec::Default,
        sample: None,
    })
}

/// Production: all items must match consecutively, in order.
pub fn seq(items: impl IntoIterator<Item = GrammarNode>) -> GrammarNode {
    GrammarNode::Production(ProductionNode {
        items: items.into_iter().collect(),
        type_name: None,
        ast: AstSpec::Default,
        children: BTreeMap::new(),
        sample: None,
    })
}

/// Union: ordered alternatives, first match wins.
pub fn alt(alternatives: impl IntoIterator<Item = GrammarNode>) -> GrammarNode {
    GrammarNode::Union(UnionNode {
        alternatives: alternatives.into_iter().collect(),
        type_name: None,
        ast: AstSpec::Default,
        leaf: false,
        sample: None,
    })
}

/// List: the item repeated zero or more times. Never fails to match.
pub fn list(item: GrammarNode) -> GrammarNode {
    GrammarNode::List(ListNode {
        item: Box::new(item),
        type_name: None,
        ast: AstSpec::Default,
        leaf: false,
        sample: None,
    })
}

/// Reference to a named rule.
pub fn refn(name: impl Into<String>) -> GrammarNode {
    GrammarNode::Ref(name.into())
}

/// A declarative grammar: start symbol, named rules, and optional
/// grammar-level default AST expressions keyed by rule name.
///
/// A default of JSON `null` suppresses the rule's AST; any other value is a
/// custom expression applied when the rule's own AST field is unset.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Grammar {
    pub start: String,
    pub rules: BTreeMap<String, GrammarNode>,
    #[serde(default)]
    pub defaults: BTreeMap<String, Value>,
}

impl Grammar {
    pub fn new<S: Into<String>>(
        start: impl Into<String>,
        rules: impl IntoIterator<Item = (S, GrammarNode)>,
    ) -> Self {
        Grammar {
            start: start.into(),
            rules: rules.into_iter().map(|(n, r)| (n.into(), r)).collect(),
            defaults: BTreeMap::new(),
        }
    }

    /// Registers a grammar-level default AST expression for a rule name.
    pub fn with_default(mut self, rule: impl Into<String>, expr: Value) -> Self {
        self.defaults.insert(rule.into(), expr);
        self
    }
}

/// Rules for a delimiter-separated list of elements: `Name` matches one
/// element followed by any number of delimited elements, collecting element
/// ASTs into a flat array.
pub fn delimited_list(
    name: &str,
    delim: GrammarNode,
    elem: GrammarNode,
) -> Vec<(String, GrammarNode)> {
    let item_name = elem
        .type_name()
        .map(str::to_owned)
        .unwrap_or_else(|| format!("{name}Item"));
    let tail = list(
        seq([delim.suppress_ast(), refn(&item_name)])
            .ast(serde_json::json!(["$", "/ast/children/0"])),
    )
    .ast(serde_json::json!(["$", "/ast/children"]));
    let head = seq([refn(&item_name), tail]).ast(serde_json::json!([
        "concat",
        ["push", [[]], ["$", "/ast/children/0"]],
        ["$", "/ast/children/1", [[]]]
    ]));
    vec![(name.to_owned(), head), (item_name, elem)]
}
