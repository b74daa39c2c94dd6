//! CLI smoke tests.

use assert_cmd::Command;
use predicates::prelude::*;

fn weft() -> Command {
    Command::cargo_bin("weft").unwrap()
}

#[test]
fn parse_renders_the_cst() {
    weft()
        .args(["parse", "json", " 1 "])
        .assert()
        .success()
        .stdout(predicate::str::contains("Value 0:3"))
        .stdout(predicate::str::contains("Number 1:2"));
}

#[test]
fn parse_ast_renders_json() {
    weft()
        .args(["parse", "json", "123", "--ast"])
        .assert()
        .success()
        .stdout(predicate::str::contains("\"value\": 123"));
}

#[test]
fn calculator_ast_is_the_evaluated_number() {
    weft()
        .args(["parse", "calc", "1 + 2 * 3", "--ast"])
        .assert()
        .success()
        .stdout("7\n");
}

#[test]
fn unparseable_input_reports_no_match() {
    weft()
        .args(["parse", "json", "@@"])
        .assert()
        .success()
        .stdout(predicate::str::contains("no match"));
}

#[test]
fn trace_renders_the_attempt_tree() {
    weft()
        .args(["parse", "json", "1", "--trace"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Value 0:1"))
        .stdout(predicate::str::ends_with("match\n"));
}

#[test]
fn print_renders_the_rule_tree() {
    weft()
        .args(["print", "json"])
        .assert()
        .success()
        .stdout(predicate::str::starts_with("Value (production)"));
}

#[test]
fn gen_is_deterministic_for_a_seed() {
    let run = |n: &str| {
        let out = weft()
            .args(["gen", "json", "--seed", "17", "--count", n])
            .assert()
            .success();
        String::from_utf8(out.get_output().stdout.clone()).unwrap()
    };
    assert_eq!(run("3"), run("3"));
}

#[test]
fn unknown_grammar_fails() {
    weft()
        .args(["print", "no-such-grammar"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("no-such-grammar"));
}
