//! Detokenization: exact source reproduction from a tree.
//!
//!     Because the tree is lossless, concatenating the text of every leaf
//!     token in order reproduces the original source byte-for-byte. This is
//!     both a user-facing format (round-tripping a file proves the tree is
//!     trustworthy) and the backbone of the coverage tests.

use crate::py::syntax::SyntaxNode;

/// Reproduce the source text covered by `node` from its leaf tokens.
pub fn detokenize(node: &SyntaxNode, source: &str) -> String {
    let mut out = String::with_capacity(node.span.len());
    for token in node.leaf_tokens() {
        out.push_str(token.text(source));
    }
    out
}
