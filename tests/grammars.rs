//! Bundled grammars, the delimited-list helper, and generator/parser
//! agreement.

use serde_json::json;
use weft::grammar::{delimited_list, list, lit, rx, seq, set, Grammar};
use weft::{generate, CompiledGrammar, GrammarCompiler};

fn compile(grammar: Grammar) -> CompiledGrammar {
    GrammarCompiler::new(grammar).compile().unwrap()
}

#[test]
fn calculator_evaluates_during_synthesis() {
    let calc = compile(weft::grammars::calculator::grammar());
    for (input, expected) in [
        ("42", 42),
        ("1 + 2 * 3", 7),
        ("2 * 3 + 4", 10),
        ("10 - 2", 8),
        ("8 / 2", 4),
    ] {
        assert_eq!(calc.ast(input).unwrap(), json!(expected), "for {input:?}");
    }
}

#[test]
fn calculator_same_precedence_associates_right() {
    let calc = compile(weft::grammars::calculator::grammar());
    // 8 - (2 - 1), by construction of the continuation rules.
    assert_eq!(calc.ast("8 - 2 - 1").unwrap(), json!(7));
}

#[test]
fn html_elements_expose_named_children() {
    let html = compile(weft::grammars::html::grammar());
    assert_eq!(
        html.ast("<b>hi</b>").unwrap(),
        json!([{
            "type": "Element",
            "pos": 0,
            "end": 9,
            "tag": "b",
            "body": [{"type": "Text", "pos": 3, "end": 5, "raw": "hi"}]
        }])
    );
}

#[test]
fn html_fragments_mix_text_and_elements() {
    let html = compile(weft::grammars::html::grammar());
    let ast = html.ast("a<i>b</i>c").unwrap();
    let nodes = ast.as_array().unwrap();
    assert_eq!(nodes.len(), 3);
    assert_eq!(nodes[0]["type"], "Text");
    assert_eq!(nodes[1]["type"], "Element");
    assert_eq!(nodes[1]["tag"], "i");
    assert_eq!(nodes[2]["raw"], "c");
}

#[test]
fn delimited_list_collects_element_asts() {
    let rules = delimited_list(
        "Args",
        lit(","),
        rx("[a-z]+").typed("Ident").ast(json!(["$", "/cst/raw"])),
    );
    let compiled = compile(Grammar::new("Args", rules));
    assert_eq!(compiled.ast("a,b,c").unwrap(), json!(["a", "b", "c"]));
    assert_eq!(compiled.ast("a").unwrap(), json!(["a"]));
    assert!(compiled.ast(",a").is_none());
}

#[test]
fn javascript_binary_operators_nest_to_the_right() {
    let js = compile(weft::grammars::javascript::grammar());
    let ast = js.ast("1 + 2 * 3 + 4").unwrap();
    assert_eq!(ast["type"], "Expression");
    let add = &ast["children"][0];
    assert_eq!(add["type"], "AdditiveExpression");
    assert_eq!(add["operator"], "+");
    assert_eq!(add["left"]["raw"], "1");
    // Multiplication binds tighter; addition associates right.
    let rest = &add["right"];
    assert_eq!(rest["operator"], "+");
    assert_eq!(rest["left"]["type"], "MultiplicativeExpression");
    assert_eq!(rest["left"]["operator"], "*");
    assert_eq!(rest["left"]["left"]["raw"], "2");
    assert_eq!(rest["left"]["right"]["raw"], "3");
    assert_eq!(rest["right"]["raw"], "4");
}

#[test]
fn javascript_lone_literals_skip_the_operator_record() {
    let js = compile(weft::grammars::javascript::grammar());
    let ast = js.ast("true").unwrap();
    assert_eq!(ast["children"][0]["type"], "BooleanLiteral");
    assert!(ast["children"][0].get("operator").is_none());
}

#[test]
fn esql_from_command_collects_sources_and_metadata() {
    let esql = compile(weft::grammars::esql::grammar());
    let ast = esql.ast("FROM sample-index-* [METADATA _id]").unwrap();
    assert_eq!(ast["type"], "Query");
    let from = &ast["children"][0];
    assert_eq!(from["type"], "FromCommand");
    assert_eq!(from["sources"]["children"][0]["raw"], "sample-index-*");
    assert_eq!(from["metadata"]["children"][0]["raw"], "_id");
    assert!(from.get("children").is_none());
}

#[test]
fn esql_piped_commands_chain_onto_the_query() {
    let esql = compile(weft::grammars::esql::grammar());
    let ast = esql.ast("FROM a, b | EVAL x = 1").unwrap();
    let commands = ast["children"].as_array().unwrap();
    assert_eq!(commands.len(), 2);
    let sources = commands[0]["sources"]["children"].as_array().unwrap();
    assert_eq!(sources.len(), 2);
    assert_eq!(sources[1]["raw"], "b");
    assert_eq!(commands[0]["metadata"], json!(null));
    let eval = &commands[1];
    assert_eq!(eval["type"], "EvalCommand");
    let field = &eval["fields"][0];
    assert_eq!(field["type"], "Field");
    let assignment = &field["value"];
    assert_eq!(assignment["type"], "AssignmentExpression");
    assert_eq!(assignment["left"]["children"][0]["value"], "x");
    assert_eq!(assignment["right"]["value"]["type"], "IntegerLiteral");
    assert_eq!(assignment["right"]["value"]["raw"], "1");
}

#[test]
fn esql_function_calls_take_a_star_argument() {
    let esql = compile(weft::grammars::esql::grammar());
    let ast = esql.ast("ROW abc(*)").unwrap();
    let row = &ast["children"][0];
    assert_eq!(row["type"], "RowCommand");
    let call = &row["fields"][0]["value"];
    assert_eq!(call["type"], "FunctionExpression");
    assert_eq!(call["name"]["value"], "abc");
    assert_eq!(call["arguments"]["type"], "StarArgument");
}

#[test]
fn esql_keywords_are_case_insensitive() {
    let esql = compile(weft::grammars::esql::grammar());
    let ast = esql.ast("from a | eval x = null").unwrap();
    let eval = &ast["children"][1];
    let right = &eval["fields"][0]["value"]["right"];
    assert_eq!(right["value"]["type"], "NullLiteral");
}

#[test]
fn esql_quoted_identifiers_strip_their_backticks() {
    let esql = compile(weft::grammars::esql::grammar());
    let ast = esql.ast("ROW `a b` = 1").unwrap();
    let left = &ast["children"][0]["fields"][0]["value"]["left"];
    assert_eq!(left["children"][0]["value"], "a b");
}

#[test]
fn generated_samples_parse_back() {
    let grammar = Grammar::new(
        "Word",
        [("Word", seq([set(["x", "y"]), list(set(["a", "b", "c"]))]))],
    );
    let compiled = compile(grammar.clone());
    for seed in 0..20 {
        let sample = generate::seeded(&grammar, seed).gen().unwrap();
        let cst = compiled
            .parse(&sample)
            .unwrap_or_else(|| panic!("seed {seed} produced unparseable {sample:?}"));
        assert_eq!(cst.end(), sample.len());
    }
}
