//! Lexing pipeline: base tokenization plus stream transformations.
//!
//!     The base tokenizer is a plain logos pass that turns source text into a
//!     flat token vector, trivia included. Two stateful transformations then
//!     run in order:
//!
//!         1. logical_lines: tracks bracket depth and demotes newlines that do
//!            not terminate a logical line (implicit line joining, blank
//!            lines) to whitespace trivia.
//!         2. semantic_indentation: compares the indentation of consecutive
//!            logical lines and rewrites leading whitespace into `Indent`
//!            tokens or inserts synthetic zero-width `Dedent` tokens.
//!
//!     The output stream covers every byte of the input exactly once; the only
//!     additions are zero-width synthetic tokens (`Dedent`, and a final
//!     `Newline` when the last line is unterminated), so detokenization stays
//!     exact.

pub mod transformations;

use crate::py::token::{TextSpan, Token, TokenKind};
use logos::Logos;

/// Run the base logos tokenizer. Unmatched bytes become `Error` tokens.
pub fn base_tokenize(source: &str) -> Vec<Token> {
    let mut lexer = TokenKind::lexer(source);
    let mut tokens = Vec::new();
    while let Some(result) = lexer.next() {
        let span = lexer.span();
        let kind = result.unwrap_or(TokenKind::Error);
        tokens.push(Token::new(kind, TextSpan::new(span.start, span.end)));
    }
    tokens
}

/// Full lexing pipeline: base tokenization plus both transformations.
pub fn tokenize(source: &str) -> Vec<Token> {
    let tokens = base_tokenize(source);
    let tokens = transformations::logical_lines::demote_non_logical_newlines(tokens, source);
    transformations::semantic_indentation::SemanticIndentationMapper::new().map(tokens, source)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kinds(source: &str) -> Vec<TokenKind> {
        tokenize(source)
            .into_iter()
            .map(|t| t.kind)
            .filter(|k| !k.is_trivia())
            .collect()
    }

    #[test]
    fn test_tokenize_covers_every_byte() {
        let source = "x = 1  # comment\nif x:\n    pass\n";
        let tokens = tokenize(source);
        let mut text = String::new();
        for token in &tokens {
            text.push_str(token.text(source));
        }
        assert_eq!(text, source);
    }

    #[test]
    fn test_simple_statement_kinds() {
        assert_eq!(
            kinds("x = 1\n"),
            vec![
                TokenKind::Ident,
                TokenKind::Assign,
                TokenKind::Int,
                TokenKind::Newline,
            ]
        );
    }

    #[test]
    fn test_block_produces_indent_and_dedent() {
        assert_eq!(
            kinds("if x:\n    pass\n"),
            vec![
                TokenKind::IfKw,
                TokenKind::Ident,
                TokenKind::Colon,
                TokenKind::Newline,
                TokenKind::Indent,
                TokenKind::PassKw,
                TokenKind::Newline,
                TokenKind::Dedent,
            ]
        );
    }

    #[test]
    fn test_newline_inside_brackets_is_trivia() {
        assert_eq!(
            kinds("f(1,\n  2)\n"),
            vec![
                TokenKind::Ident,
                TokenKind::LParen,
                TokenKind::Int,
                TokenKind::Comma,
                TokenKind::Int,
                TokenKind::RParen,
                TokenKind::Newline,
            ]
        );
    }

    #[test]
    fn test_blank_lines_are_trivia() {
        assert_eq!(
            kinds("x = 1\n\n\ny = 2\n"),
            vec![
                TokenKind::Ident,
                TokenKind::Assign,
                TokenKind::Int,
                TokenKind::Newline,
                TokenKind::Ident,
                TokenKind::Assign,
                TokenKind::Int,
                TokenKind::Newline,
            ]
        );
    }

    #[test]
    fn test_unterminated_last_line_gets_synthetic_newline() {
        let source = "x = 1";
        let tokens = tokenize(source);
        let last = tokens.last().unwrap();
        assert_eq!(last.kind, TokenKind::Newline);
        assert!(last.span.is_empty());
    }
}
