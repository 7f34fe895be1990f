//! The concrete syntax tree.
//!
//!     Nodes own their children; children are either tokens (leaves) or
//!     nested nodes. The tree is lossless: walking the leaves left to right
//!     yields every token of the input exactly once, trivia included, so the
//!     original source can always be reproduced from the tree alone.

use crate::py::syntax::SyntaxKind;
use crate::py::token::{TextSpan, Token};
use serde::Serialize;
use std::fmt;

/// One child of a node: a leaf token or a nested node.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum NodeChild {
    Token(Token),
    Node(SyntaxNode),
}

/// An interior node of the tree.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SyntaxNode {
    pub kind: SyntaxKind,
    pub span: TextSpan,
    pub children: Vec<NodeChild>,
}

impl SyntaxNode {
    pub fn new(kind: SyntaxKind, span: TextSpan, children: Vec<NodeChild>) -> Self {
        SyntaxNode {
            kind,
            span,
            children,
        }
    }

    pub fn text<'a>(&self, source: &'a str) -> &'a str {
        &source[self.span.start as usize..self.span.end as usize]
    }

    /// Direct child nodes, skipping leaf tokens.
    pub fn child_nodes(&self) -> impl Iterator<Item = &SyntaxNode> {
        self.children.iter().filter_map(|child| match child {
            NodeChild::Node(node) => Some(node),
            NodeChild::Token(_) => None,
        })
    }

    /// Direct leaf tokens, skipping child nodes.
    pub fn child_tokens(&self) -> impl Iterator<Item = &Token> {
        self.children.iter().filter_map(|child| match child {
            NodeChild::Token(token) => Some(token),
            NodeChild::Node(_) => None,
        })
    }

    pub fn first_child_of_kind(&self, kind: SyntaxKind) -> Option<&SyntaxNode> {
        self.child_nodes().find(|node| node.kind == kind)
    }

    pub fn children_of_kind(&self, kind: SyntaxKind) -> impl Iterator<Item = &SyntaxNode> {
        self.child_nodes().filter(move |node| node.kind == kind)
    }

    /// All nodes of the subtree in preorder, this node included.
    pub fn descendants(&self) -> Vec<&SyntaxNode> {
        let mut out = Vec::new();
        collect_descendants(self, &mut out);
        out
    }

    /// All leaf tokens of the subtree, left to right.
    pub fn leaf_tokens(&self) -> Vec<&Token> {
        let mut out = Vec::new();
        collect_leaves(self, &mut out);
        out
    }

    /// Whether `span` lies within this node's span.
    pub fn contains_span(&self, span: TextSpan) -> bool {
        self.span.start <= span.start && span.end <= self.span.end
    }
}

fn collect_descendants<'a>(node: &'a SyntaxNode, out: &mut Vec<&'a SyntaxNode>) {
    out.push(node);
    for child in node.child_nodes() {
        collect_descendants(child, out);
    }
}

fn collect_leaves<'a>(node: &'a SyntaxNode, out: &mut Vec<&'a Token>) {
    for child in &node.children {
        match child {
            NodeChild::Token(token) => out.push(token),
            NodeChild::Node(nested) => collect_leaves(nested, out),
        }
    }
}

/// A problem found while parsing, anchored to the span of the error node that
/// was produced for it. The parse itself never aborts.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ParseDiagnostic {
    pub message: String,
    pub span: TextSpan,
}

impl fmt::Display for ParseDiagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.span, self.message)
    }
}

/// The outcome of one parse: the root node plus every diagnostic.
#[derive(Debug, Clone, PartialEq)]
pub struct ParseResult {
    pub root: SyntaxNode,
    pub diagnostics: Vec<ParseDiagnostic>,
}

impl ParseResult {
    pub fn is_clean(&self) -> bool {
        self.diagnostics.is_empty()
    }
}
