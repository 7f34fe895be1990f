//! Treeviz formatter for syntax trees.
//!
//!     One line per node or leaf, nesting encoded as two spaces of
//!     indentation. Leaves show their token kind and a truncated, escaped
//!     text snippet; zero-width synthetic tokens show only the kind. The
//!     format is deterministic, which makes it the natural target for
//!     snapshot tests.
//!
//!     Example, for `x = 1`:
//!
//!         Module
//!           AssignmentStatement
//!             NameExpr
//!               Ident "x"
//!             Whitespace " "
//!             Assign "="
//!             Whitespace " "
//!             LiteralExpr
//!               Int "1"
//!           Newline ""

use crate::py::syntax::{NodeChild, SyntaxNode};
use crate::py::token::Token;

const MAX_SNIPPET_CHARS: usize = 30;

fn escape(text: &str) -> String {
    let mut out = String::new();
    for ch in text.chars() {
        match ch {
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            '"' => out.push_str("\\\""),
            '\\' => out.push_str("\\\\"),
            other => out.push(other),
        }
    }
    out
}

fn truncate(text: &str) -> String {
    if text.chars().count() > MAX_SNIPPET_CHARS {
        let mut out: String = text.chars().take(MAX_SNIPPET_CHARS).collect();
        out.push_str("...");
        out
    } else {
        text.to_string()
    }
}

fn format_token(token: &Token, source: &str, depth: usize, out: &mut String) {
    let indent = "  ".repeat(depth);
    let text = escape(&truncate(token.text(source)));
    out.push_str(&format!("{}{:?} \"{}\"\n", indent, token.kind, text));
}

fn format_node(node: &SyntaxNode, source: &str, depth: usize, out: &mut String) {
    let indent = "  ".repeat(depth);
    out.push_str(&format!("{}{:?}\n", indent, node.kind));
    for child in &node.children {
        match child {
            NodeChild::Node(nested) => format_node(nested, source, depth + 1, out),
            NodeChild::Token(token) => format_token(token, source, depth + 1, out),
        }
    }
}

/// Render the subtree rooted at `node` as an indented one-line-per-node
/// listing.
pub fn to_treeviz(node: &SyntaxNode, source: &str) -> String {
    let mut out = String::new();
    format_node(node, source, 0, &mut out);
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::py::parsing::parse_module;

    #[test]
    fn test_every_leaf_appears() {
        let source = "x = 1\n";
        let result = parse_module(source);
        let viz = to_treeviz(&result.root, source);
        assert!(viz.starts_with("Module\n"));
        assert!(viz.contains("Ident \"x\""));
        assert!(viz.contains("Assign \"=\""));
        assert!(viz.contains("Int \"1\""));
        assert!(viz.contains("Newline \"\\n\""));
    }

    #[test]
    fn test_long_tokens_are_truncated() {
        let source = "s = 'aaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaa'\n";
        let result = parse_module(source);
        let viz = to_treeviz(&result.root, source);
        assert!(viz.contains("..."));
    }
}
