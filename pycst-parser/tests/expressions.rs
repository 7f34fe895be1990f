//! Integration tests for expression parsing.

use pycst_parser::py::formats::detokenize;
use pycst_parser::py::parsing::parse_module;
use pycst_parser::py::syntax::{ParseResult, SyntaxKind, SyntaxNode};

fn parse_clean(source: &str) -> ParseResult {
    let result = parse_module(source);
    assert!(
        result.diagnostics.is_empty(),
        "unexpected diagnostics for {:?}: {:?}",
        source,
        result.diagnostics
    );
    assert_eq!(detokenize(&result.root, source), source);
    result
}

fn count(root: &SyntaxNode, kind: SyntaxKind) -> usize {
    root.descendants().iter().filter(|n| n.kind == kind).count()
}

fn texts_of<'a>(root: &'a SyntaxNode, kind: SyntaxKind, source: &'a str) -> Vec<&'a str> {
    root.descendants()
        .into_iter()
        .filter(|n| n.kind == kind)
        .map(|n| n.text(source))
        .collect()
}

#[test]
fn test_multiplication_binds_tighter_than_addition() {
    let source = "r = 1 + 2 * 3\n";
    let result = parse_clean(source);
    let binaries = texts_of(&result.root, SyntaxKind::BinaryExpr, source);
    assert!(binaries.contains(&"2 * 3"));
    assert!(binaries.contains(&"1 + 2 * 3"));
}

#[test]
fn test_power_is_right_associative() {
    let source = "r = 2 ** 3 ** 2\n";
    let result = parse_clean(source);
    let binaries = texts_of(&result.root, SyntaxKind::BinaryExpr, source);
    assert!(binaries.contains(&"3 ** 2"));
}

#[test]
fn test_comparison_chain_nests_leftward() {
    let source = "r = a < b < c\n";
    let result = parse_clean(source);
    let binaries = texts_of(&result.root, SyntaxKind::BinaryExpr, source);
    assert!(binaries.contains(&"a < b"));
}

#[test]
fn test_two_token_comparison_operators() {
    let source = "r = a not in b\ns = c is not d\n";
    let result = parse_clean(source);
    assert_eq!(count(&result.root, SyntaxKind::BinaryExpr), 2);
}

#[test]
fn test_boolean_operators_and_not() {
    let source = "r = not a and b or c\n";
    let result = parse_clean(source);
    assert_eq!(count(&result.root, SyntaxKind::UnaryExpr), 1);
    assert_eq!(count(&result.root, SyntaxKind::BinaryExpr), 2);
}

#[test]
fn test_unary_binds_looser_than_power() {
    let source = "r = -x ** 2\n";
    let result = parse_clean(source);
    let unaries = texts_of(&result.root, SyntaxKind::UnaryExpr, source);
    assert_eq!(unaries, vec!["-x ** 2"]);
}

#[test]
fn test_postfix_chain_is_nested_leftward() {
    let source = "r = a.b(1)[0]\n";
    let result = parse_clean(source);
    assert_eq!(count(&result.root, SyntaxKind::AttributeExpr), 1);
    assert_eq!(count(&result.root, SyntaxKind::CallExpr), 1);
    assert_eq!(count(&result.root, SyntaxKind::SubscriptExpr), 1);
    let subscript_texts = texts_of(&result.root, SyntaxKind::SubscriptExpr, source);
    assert_eq!(subscript_texts, vec!["a.b(1)[0]"]);
}

#[test]
fn test_long_attribute_chain_parses_without_deep_recursion() {
    let mut source = String::from("r = a");
    for _ in 0..300 {
        source.push_str(".f");
    }
    source.push('\n');
    let result = parse_clean(&source);
    assert_eq!(count(&result.root, SyntaxKind::AttributeExpr), 300);
}

#[test]
fn test_call_arguments() {
    let source = "r = f(1, name=2, *args, **kwargs)\n";
    let result = parse_clean(source);
    let call = &result.root;
    assert_eq!(count(call, SyntaxKind::KeywordArgument), 1);
    assert_eq!(count(call, SyntaxKind::StarArgument), 2);
}

#[test]
fn test_tuple_paren_and_empty_tuple() {
    let result = parse_clean("a = ()\nb = (1)\nc = (1, 2)\nd = 1, 2\n");
    assert_eq!(count(&result.root, SyntaxKind::TupleExpr), 3);
    assert_eq!(count(&result.root, SyntaxKind::ParenExpr), 1);
}

#[test]
fn test_list_display_and_comprehension() {
    let source = "a = [1, 2]\nb = [x for x in items if x]\n";
    let result = parse_clean(source);
    assert_eq!(count(&result.root, SyntaxKind::ListExpr), 1);
    assert_eq!(count(&result.root, SyntaxKind::ListComp), 1);
    assert_eq!(count(&result.root, SyntaxKind::CompFor), 1);
    assert_eq!(count(&result.root, SyntaxKind::CompIf), 1);
}

#[test]
fn test_dict_display_and_comprehension() {
    let source = "a = {}\nb = {1: 'x', 2: 'y'}\nc = {k: v for k, v in pairs}\n";
    let result = parse_clean(source);
    assert_eq!(count(&result.root, SyntaxKind::DictExpr), 2);
    assert_eq!(count(&result.root, SyntaxKind::DictComp), 1);
    assert_eq!(count(&result.root, SyntaxKind::KeyValuePair), 3);
}

#[test]
fn test_set_display_on_default_level() {
    let result = parse_clean("s = {1, 2, 3}\n");
    assert_eq!(count(&result.root, SyntaxKind::SetExpr), 1);
}

#[test]
fn test_generator_argument() {
    let result = parse_clean("total = sum(x * x for x in items)\n");
    assert_eq!(count(&result.root, SyntaxKind::GeneratorExpr), 1);
}

#[test]
fn test_lambda_with_defaults() {
    let result = parse_clean("f = lambda a, b=2: a + b\n");
    let lambda = &result.root;
    assert_eq!(count(lambda, SyntaxKind::LambdaExpr), 1);
    assert_eq!(count(lambda, SyntaxKind::Parameter), 2);
}

#[test]
fn test_conditional_expression() {
    let source = "r = a if cond else b\n";
    let result = parse_clean(source);
    let texts = texts_of(&result.root, SyntaxKind::ConditionalExpr, source);
    assert_eq!(texts, vec!["a if cond else b"]);
}

#[test]
fn test_slices() {
    let source = "a = s[1:2:3]\nb = s[:]\nc = s[::2]\nd = m[1:2, 3]\n";
    let result = parse_clean(source);
    assert_eq!(count(&result.root, SyntaxKind::SubscriptExpr), 4);
    assert_eq!(count(&result.root, SyntaxKind::SliceItem), 4);
}

#[test]
fn test_adjacent_string_concatenation() {
    let source = "s = 'a' \"b\"\n";
    let result = parse_clean(source);
    let strings = texts_of(&result.root, SyntaxKind::StringLiteralExpr, source);
    assert_eq!(strings, vec!["'a' \"b\""]);
}

#[test]
fn test_yield_expression_as_assignment_source() {
    let result = parse_clean("def g():\n    x = yield v\n");
    assert_eq!(count(&result.root, SyntaxKind::YieldExpr), 1);
}

#[test]
fn test_backtick_repr_on_legacy_level() {
    let result = parse_clean("s = `x, y`\n");
    assert_eq!(count(&result.root, SyntaxKind::ReprExpr), 1);
}

#[test]
fn test_angle_inequality_on_legacy_level() {
    let result = parse_clean("r = a <> b\n");
    assert_eq!(count(&result.root, SyntaxKind::BinaryExpr), 1);
}

#[test]
fn test_implicit_line_joining_inside_brackets() {
    let source = "r = f(1,\n      2,\n      3)\n";
    let result = parse_clean(source);
    assert_eq!(count(&result.root, SyntaxKind::CallExpr), 1);
}

#[test]
fn test_missing_expression_is_zero_token_error() {
    let source = "x = \ny = 2\n";
    let result = parse_module(source);
    assert_eq!(result.diagnostics.len(), 1);
    assert!(result.diagnostics[0].message.contains("expression expected"));
    // The error region covers nothing; both assignments are in the tree.
    assert_eq!(count(&result.root, SyntaxKind::AssignmentStatement), 2);
    let error = result
        .root
        .descendants()
        .into_iter()
        .find(|n| n.kind == SyntaxKind::ErrorNode)
        .unwrap();
    assert!(error.span.is_empty());
    assert_eq!(detokenize(&result.root, source), source);
}

#[test]
fn test_unclosed_call_recovers() {
    let source = "x = f(1,\n";
    let result = parse_module(source);
    assert!(!result.diagnostics.is_empty());
    assert_eq!(detokenize(&result.root, source), source);
}

#[test]
fn test_operator_without_operand_recovers() {
    let source = "x = 1 +\n";
    let result = parse_module(source);
    assert!(!result.diagnostics.is_empty());
    assert_eq!(count(&result.root, SyntaxKind::BinaryExpr), 1);
    assert_eq!(detokenize(&result.root, source), source);
}
