//! Core token types shared across the lexer, parser, and tooling.
//!
//!     Tokens carry a kind and a byte span into the source text; nothing else.
//!     The text of a token is always recovered by slicing the source with the
//!     span, which keeps tokens cheap to copy and guarantees that concatenating
//!     every token of a file reproduces the file exactly.
//!
//!     Contextual keywords (`print`, `with`, `as`, `exec`, `nonlocal`) are not
//!     produced by the lexer. They are lexed as plain identifiers and promoted
//!     later by the token filter, because whether they are keywords depends on
//!     the language level and on the parse position, neither of which the lexer
//!     knows. The same goes for `Indent`/`Dedent`, which are produced by the
//!     indentation transformation, and `Eof`/`Error`, which are synthesized by
//!     the token source and the base tokenizer respectively.

use logos::Logos;
use serde::Serialize;
use std::fmt;

/// A half-open byte range into the source text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct TextSpan {
    pub start: u32,
    pub end: u32,
}

impl TextSpan {
    pub fn new(start: usize, end: usize) -> Self {
        TextSpan {
            start: start as u32,
            end: end as u32,
        }
    }

    /// A zero-width span anchored at `offset`, used by synthetic tokens.
    pub fn empty(offset: usize) -> Self {
        TextSpan::new(offset, offset)
    }

    pub fn len(&self) -> usize {
        (self.end - self.start) as usize
    }

    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }
}

impl fmt::Display for TextSpan {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}..{}", self.start, self.end)
    }
}

/// All token kinds of the language, across every language level.
///
/// Variants without a logos pattern are never produced by the base tokenizer:
/// they come from the indentation transformation (`Indent`, `Dedent`), from
/// the token filter (the contextual keywords), or from the token source
/// (`Eof`). `Error` covers source bytes the tokenizer could not match.
#[derive(Logos, Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum TokenKind {
    // Trivia
    #[regex(r"[ \t\x0c]+")]
    Whitespace,
    #[regex(r"#[^\n]*")]
    Comment,
    #[regex(r"\\\r?\n")]
    LineContinuation,

    #[regex(r"\r?\n")]
    Newline,

    // Keywords that are keywords at every language level.
    #[token("and")]
    AndKw,
    #[token("assert")]
    AssertKw,
    #[token("break")]
    BreakKw,
    #[token("class")]
    ClassKw,
    #[token("continue")]
    ContinueKw,
    #[token("def")]
    DefKw,
    #[token("del")]
    DelKw,
    #[token("elif")]
    ElifKw,
    #[token("else")]
    ElseKw,
    #[token("except")]
    ExceptKw,
    #[token("finally")]
    FinallyKw,
    #[token("for")]
    ForKw,
    #[token("from")]
    FromKw,
    #[token("global")]
    GlobalKw,
    #[token("if")]
    IfKw,
    #[token("import")]
    ImportKw,
    #[token("in")]
    InKw,
    #[token("is")]
    IsKw,
    #[token("lambda")]
    LambdaKw,
    #[token("not")]
    NotKw,
    #[token("or")]
    OrKw,
    #[token("pass")]
    PassKw,
    #[token("raise")]
    RaiseKw,
    #[token("return")]
    ReturnKw,
    #[token("try")]
    TryKw,
    #[token("while")]
    WhileKw,
    #[token("yield")]
    YieldKw,

    // Contextual keywords, promoted from `Ident` by the token filter.
    PrintKw,
    WithKw,
    AsKw,
    ExecKw,
    NonlocalKw,

    #[regex(r"[A-Za-z_][A-Za-z0-9_]*")]
    Ident,

    // Literals
    #[regex(r"[0-9]+[lL]?")]
    #[regex(r"0[xX][0-9a-fA-F]+[lL]?")]
    #[regex(r"0[oO][0-7]+[lL]?")]
    #[regex(r"0[bB][01]+[lL]?")]
    Int,
    #[regex(r"[0-9]+\.[0-9]*([eE][+-]?[0-9]+)?")]
    #[regex(r"\.[0-9]+([eE][+-]?[0-9]+)?")]
    #[regex(r"[0-9]+[eE][+-]?[0-9]+")]
    Float,
    #[regex(r"([0-9]+\.[0-9]*|\.[0-9]+|[0-9]+)([eE][+-]?[0-9]+)?[jJ]")]
    Imaginary,
    #[regex(r#"([rRuUbB]|[uUbB][rR]|[rR][bB])?'([^'\\\n]|\\.|\\\r?\n)*'"#)]
    #[regex(r#"([rRuUbB]|[uUbB][rR]|[rR][bB])?"([^"\\\n]|\\.|\\\r?\n)*""#)]
    #[regex(r#"([rRuUbB]|[uUbB][rR]|[rR][bB])?'''([^'\\]|\\.|'[^'\\]|''[^'\\])*'''"#)]
    #[regex(r#"([rRuUbB]|[uUbB][rR]|[rR][bB])?"""([^"\\]|\\.|"[^"\\]|""[^"\\])*""""#)]
    Str,

    // Operators
    #[token("+")]
    Plus,
    #[token("-")]
    Minus,
    #[token("*")]
    Star,
    #[token("**")]
    DoubleStar,
    #[token("/")]
    Slash,
    #[token("//")]
    DoubleSlash,
    #[token("%")]
    Percent,
    #[token("@")]
    At,
    #[token("<<")]
    LeftShift,
    #[token(">>")]
    RightShift,
    #[token("&")]
    Amp,
    #[token("|")]
    Pipe,
    #[token("^")]
    Caret,
    #[token("~")]
    Tilde,
    #[token("<")]
    Lt,
    #[token(">")]
    Gt,
    #[token("<=")]
    LtEq,
    #[token(">=")]
    GtEq,
    #[token("==")]
    EqEq,
    #[token("!=")]
    NotEq,
    #[token("<>")]
    LtGt,
    #[token("=")]
    Assign,
    #[token("+=")]
    PlusAssign,
    #[token("-=")]
    MinusAssign,
    #[token("*=")]
    StarAssign,
    #[token("/=")]
    SlashAssign,
    #[token("//=")]
    DoubleSlashAssign,
    #[token("%=")]
    PercentAssign,
    #[token("&=")]
    AmpAssign,
    #[token("|=")]
    PipeAssign,
    #[token("^=")]
    CaretAssign,
    #[token("<<=")]
    LeftShiftAssign,
    #[token(">>=")]
    RightShiftAssign,
    #[token("**=")]
    DoubleStarAssign,
    #[token("->")]
    Arrow,

    // Delimiters
    #[token("(")]
    LParen,
    #[token(")")]
    RParen,
    #[token("[")]
    LBracket,
    #[token("]")]
    RBracket,
    #[token("{")]
    LBrace,
    #[token("}")]
    RBrace,
    #[token(",")]
    Comma,
    #[token(":")]
    Colon,
    #[token(".")]
    Dot,
    #[token(";")]
    Semicolon,
    #[token("`")]
    Backtick,

    // Synthetic kinds, never produced by the base tokenizer.
    Indent,
    Dedent,
    Eof,
    Error,
}

impl TokenKind {
    /// Trivia never influences parsing decisions; it only survives as tree
    /// leaves for lossless reproduction.
    pub fn is_trivia(self) -> bool {
        matches!(
            self,
            TokenKind::Whitespace | TokenKind::Comment | TokenKind::LineContinuation
        )
    }

    pub fn is_augmented_assign(self) -> bool {
        matches!(
            self,
            TokenKind::PlusAssign
                | TokenKind::MinusAssign
                | TokenKind::StarAssign
                | TokenKind::SlashAssign
                | TokenKind::DoubleSlashAssign
                | TokenKind::PercentAssign
                | TokenKind::AmpAssign
                | TokenKind::PipeAssign
                | TokenKind::CaretAssign
                | TokenKind::LeftShiftAssign
                | TokenKind::RightShiftAssign
                | TokenKind::DoubleStarAssign
        )
    }

    pub fn is_open_bracket(self) -> bool {
        matches!(
            self,
            TokenKind::LParen | TokenKind::LBracket | TokenKind::LBrace
        )
    }

    pub fn is_close_bracket(self) -> bool {
        matches!(
            self,
            TokenKind::RParen | TokenKind::RBracket | TokenKind::RBrace
        )
    }
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}", self)
    }
}

/// One token: a kind plus the byte span it covers in the source.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Token {
    pub kind: TokenKind,
    pub span: TextSpan,
}

impl Token {
    pub fn new(kind: TokenKind, span: TextSpan) -> Self {
        Token { kind, span }
    }

    pub fn text<'a>(&self, source: &'a str) -> &'a str {
        &source[self.span.start as usize..self.span.end as usize]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_keywords_win_over_identifiers() {
        let mut lexer = TokenKind::lexer("if x");
        assert_eq!(lexer.next(), Some(Ok(TokenKind::IfKw)));
        assert_eq!(lexer.next(), Some(Ok(TokenKind::Whitespace)));
        assert_eq!(lexer.next(), Some(Ok(TokenKind::Ident)));
    }

    #[test]
    fn test_contextual_keywords_lex_as_identifiers() {
        for text in ["print", "with", "as", "exec", "nonlocal"] {
            let mut lexer = TokenKind::lexer(text);
            assert_eq!(lexer.next(), Some(Ok(TokenKind::Ident)), "{}", text);
        }
    }

    #[test]
    fn test_numeric_literals() {
        let mut lexer = TokenKind::lexer("12 0x1f 1.5 .5 1e3 2j 10L");
        let kinds: Vec<_> = lexer
            .by_ref()
            .filter_map(|t| t.ok())
            .filter(|k| *k != TokenKind::Whitespace)
            .collect();
        assert_eq!(
            kinds,
            vec![
                TokenKind::Int,
                TokenKind::Int,
                TokenKind::Float,
                TokenKind::Float,
                TokenKind::Float,
                TokenKind::Imaginary,
                TokenKind::Int,
            ]
        );
    }

    #[test]
    fn test_string_literals() {
        for text in ["'a'", "\"a b\"", "r'\\d+'", "'''multi\nline'''", "u\"x\""] {
            let mut lexer = TokenKind::lexer(text);
            assert_eq!(lexer.next(), Some(Ok(TokenKind::Str)), "{}", text);
            assert_eq!(lexer.next(), None, "{}", text);
        }
    }

    #[test]
    fn test_compound_operators() {
        let mut lexer = TokenKind::lexer("<> // **= ->");
        let kinds: Vec<_> = lexer
            .by_ref()
            .filter_map(|t| t.ok())
            .filter(|k| *k != TokenKind::Whitespace)
            .collect();
        assert_eq!(
            kinds,
            vec![
                TokenKind::LtGt,
                TokenKind::DoubleSlash,
                TokenKind::DoubleStarAssign,
                TokenKind::Arrow,
            ]
        );
    }
}
