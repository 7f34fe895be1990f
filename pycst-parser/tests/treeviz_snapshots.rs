//! Snapshot tests for the treeviz rendering of small trees.
//!
//! The snapshots double as documentation of the exact tree shape, trivia
//! placement included.

use pycst_parser::py::formats::to_treeviz;
use pycst_parser::py::parsing::parse_module;

fn treeviz(source: &str) -> String {
    let result = parse_module(source);
    assert!(result.diagnostics.is_empty());
    to_treeviz(&result.root, source)
}

#[test]
fn test_assignment_snapshot() {
    let viz = treeviz("x = 1\n");
    insta::assert_snapshot!(viz.trim_end(), @r#"
Module
  AssignmentStatement
    NameExpr
      Ident "x"
    Whitespace " "
    Assign "="
    Whitespace " "
    LiteralExpr
      Int "1"
  Newline "\n"
"#);
}

#[test]
fn test_block_snapshot() {
    let viz = treeviz("if x:\n    pass\n");
    insta::assert_snapshot!(viz.trim_end(), @r#"
Module
  IfStatement
    IfKw "if"
    Whitespace " "
    NameExpr
      Ident "x"
    Colon ":"
    Suite
      Newline "\n"
      Indent "    "
      PassStatement
        PassKw "pass"
      Newline "\n"
      Dedent ""
"#);
}
