//! Logical line detection.
//!
//!     A newline terminates a logical line only when it occurs at bracket
//!     depth zero on a line that produced at least one significant token.
//!     Every other newline (inside parentheses, brackets or braces, or on a
//!     blank or comment-only line) is demoted to whitespace trivia, so the
//!     parser sees exactly one `Newline` per logical line.
//!
//!     The token spans are untouched; only kinds change.

use crate::py::token::{Token, TokenKind};

pub fn demote_non_logical_newlines(mut tokens: Vec<Token>, _source: &str) -> Vec<Token> {
    let mut depth: u32 = 0;
    let mut line_has_content = false;

    for token in tokens.iter_mut() {
        match token.kind {
            TokenKind::Newline => {
                if depth > 0 || !line_has_content {
                    token.kind = TokenKind::Whitespace;
                } else {
                    line_has_content = false;
                }
            }
            kind if kind.is_trivia() => {}
            kind => {
                if kind.is_open_bracket() {
                    depth += 1;
                } else if kind.is_close_bracket() {
                    depth = depth.saturating_sub(1);
                }
                line_has_content = true;
            }
        }
    }

    tokens
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::py::lexing::base_tokenize;

    fn newline_count(source: &str) -> usize {
        demote_non_logical_newlines(base_tokenize(source), source)
            .iter()
            .filter(|t| t.kind == TokenKind::Newline)
            .count()
    }

    #[test]
    fn test_blank_line_newlines_are_demoted() {
        assert_eq!(newline_count("x\n\n\ny\n"), 2);
    }

    #[test]
    fn test_comment_only_lines_are_demoted() {
        assert_eq!(newline_count("# header\nx\n"), 1);
    }

    #[test]
    fn test_bracketed_newlines_are_demoted() {
        assert_eq!(newline_count("f(1,\n2,\n3)\n"), 1);
    }

    #[test]
    fn test_unbalanced_closers_do_not_underflow() {
        assert_eq!(newline_count(")\nx\n"), 2);
    }
}
