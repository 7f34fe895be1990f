//! Semantic indentation mapper.
//!
//!     Turns raw leading whitespace into semantic `Indent`/`Dedent` tokens by
//!     tracking indentation levels across logical lines, the same stateful
//!     machine every indentation-sensitive language needs. An `Indent` token
//!     reuses the span of the whitespace it was classified from, while
//!     `Dedent` tokens are synthetic and zero-width, so the transformed
//!     stream still covers the source byte-for-byte.
//!
//!     The machine only looks at lines that carry a significant token; blank
//!     and comment-only lines were already demoted by the logical-lines pass
//!     and cannot open or close a block.
//!
//!     Inconsistent dedents (a width that matches no open level) are repaired
//!     by opening a fresh level; the parser reports the structural damage, the
//!     lexer just refuses to lose tokens over it.

use crate::py::token::{TextSpan, Token, TokenKind};

const TAB_WIDTH: usize = 8;

/// Column width of a whitespace run, with tabs advancing to the next tab stop.
fn indent_width(text: &str) -> usize {
    let mut width = 0;
    for ch in text.chars() {
        if ch == '\t' {
            width = (width / TAB_WIDTH + 1) * TAB_WIDTH;
        } else {
            width += 1;
        }
    }
    width
}

pub struct SemanticIndentationMapper {
    stack: Vec<usize>,
}

impl SemanticIndentationMapper {
    pub fn new() -> Self {
        SemanticIndentationMapper { stack: vec![0] }
    }

    pub fn map(mut self, tokens: Vec<Token>, source: &str) -> Vec<Token> {
        let mut out: Vec<Token> = Vec::with_capacity(tokens.len());
        let mut at_line_start = true;
        let mut pending_content = false;

        for token in tokens {
            if token.kind == TokenKind::Newline {
                at_line_start = true;
                pending_content = false;
                out.push(token);
                continue;
            }
            if token.kind.is_trivia() {
                out.push(token);
                continue;
            }
            if at_line_start {
                at_line_start = false;
                self.adjust_level(&mut out, source, token.span.start as usize);
            }
            pending_content = true;
            out.push(token);
        }

        let end = source.len();
        if pending_content {
            out.push(Token::new(TokenKind::Newline, TextSpan::empty(end)));
        }
        while self.stack.len() > 1 {
            self.stack.pop();
            out.push(Token::new(TokenKind::Dedent, TextSpan::empty(end)));
        }
        out
    }

    /// Compare the indentation of the line holding the token that starts at
    /// `token_start` against the open levels, rewriting the already-emitted
    /// leading whitespace into `Indent` or inserting synthetic `Dedent`s.
    fn adjust_level(&mut self, out: &mut Vec<Token>, source: &str, token_start: usize) {
        let line_start = source[..token_start].rfind('\n').map_or(0, |i| i + 1);
        let width = indent_width(&source[line_start..token_start]);
        let current = *self.stack.last().expect("indent stack is never empty");

        if width == current {
            return;
        }

        // The leading whitespace, if any, is the trivia token emitted last.
        let has_leading_ws = matches!(
            out.last(),
            Some(t) if t.kind == TokenKind::Whitespace
                && t.span.start as usize == line_start
                && t.span.end as usize == token_start
        );
        let leading_ws = if has_leading_ws { out.pop() } else { None };

        if width < current {
            while *self.stack.last().expect("indent stack is never empty") > width {
                self.stack.pop();
                out.push(Token::new(TokenKind::Dedent, TextSpan::empty(line_start)));
            }
        }

        let landed = *self.stack.last().expect("indent stack is never empty");
        if landed != width {
            // Deeper than the enclosing level: a real indent, or the repair
            // path for a dedent that matches no open level.
            self.stack.push(width);
            match leading_ws {
                Some(ws) => {
                    out.push(Token::new(TokenKind::Indent, ws.span));
                    return;
                }
                None => out.push(Token::new(TokenKind::Indent, TextSpan::empty(token_start))),
            }
        }
        if let Some(ws) = leading_ws {
            out.push(ws);
        }
    }
}

impl Default for SemanticIndentationMapper {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::py::lexing::base_tokenize;
    use crate::py::lexing::transformations::logical_lines::demote_non_logical_newlines;

    fn structural_kinds(source: &str) -> Vec<TokenKind> {
        let tokens = demote_non_logical_newlines(base_tokenize(source), source);
        SemanticIndentationMapper::new()
            .map(tokens, source)
            .into_iter()
            .map(|t| t.kind)
            .filter(|k| matches!(k, TokenKind::Indent | TokenKind::Dedent))
            .collect()
    }

    #[test]
    fn test_indent_width_with_tabs() {
        assert_eq!(indent_width("    "), 4);
        assert_eq!(indent_width("\t"), 8);
        assert_eq!(indent_width("  \t"), 8);
        assert_eq!(indent_width("\t "), 9);
    }

    #[test]
    fn test_single_block() {
        assert_eq!(
            structural_kinds("if x:\n    pass\n"),
            vec![TokenKind::Indent, TokenKind::Dedent]
        );
    }

    #[test]
    fn test_nested_blocks_close_together() {
        let source = "if x:\n    if y:\n        pass\nz\n";
        assert_eq!(
            structural_kinds(source),
            vec![
                TokenKind::Indent,
                TokenKind::Indent,
                TokenKind::Dedent,
                TokenKind::Dedent,
            ]
        );
    }

    #[test]
    fn test_blank_lines_do_not_dedent() {
        let source = "if x:\n    a\n\n    b\n";
        assert_eq!(
            structural_kinds(source),
            vec![TokenKind::Indent, TokenKind::Dedent]
        );
    }

    #[test]
    fn test_inconsistent_dedent_reopens_level() {
        // 4-space block dedents to 2 spaces, which matches no open level.
        let source = "if x:\n    a\n  b\n";
        assert_eq!(
            structural_kinds(source),
            vec![
                TokenKind::Indent,
                TokenKind::Dedent,
                TokenKind::Indent,
                TokenKind::Dedent,
            ]
        );
    }

    #[test]
    fn test_dedents_carry_empty_spans() {
        let source = "if x:\n    pass\n";
        let tokens = demote_non_logical_newlines(base_tokenize(source), source);
        let mapped = SemanticIndentationMapper::new().map(tokens, source);
        for token in mapped.iter().filter(|t| t.kind == TokenKind::Dedent) {
            assert!(token.span.is_empty());
        }
    }
}
