//! The token source consumed by the tree builder.
//!
//!     The source wraps the lexed token vector behind a cursor with lookahead
//!     and carries the reclassification hook: a `TokenFilter` the parser
//!     installs before any token is consulted. The filter runs exactly once
//!     per token, the first time that token's kind is needed, and the result
//!     is cached in place. Later accesses, including accesses after the
//!     cursor was rewound by a rollback, therefore always agree with the
//!     first one.
//!
//!     Installing the filter after a token has already been consulted would
//!     leave stale unfiltered kinds in the cache, which is a programming
//!     defect rather than a recoverable condition; `set_filter` panics when
//!     it detects one.

use crate::py::token::{Token, TokenKind};

/// Reclassification hook invoked once per token, immediately before the
/// token's kind is first exposed to parsing code.
pub trait TokenFilter {
    fn filter(&self, kind: TokenKind, text: &str) -> TokenKind;
}

pub struct TokenSource<'s, 'f> {
    source: &'s str,
    tokens: Vec<Token>,
    pos: usize,
    /// Tokens below this index have been through the filter.
    filtered_upto: usize,
    filter: Option<&'f dyn TokenFilter>,
    touched: bool,
}

impl<'s, 'f> TokenSource<'s, 'f> {
    pub fn new(source: &'s str, tokens: Vec<Token>) -> Self {
        TokenSource {
            source,
            tokens,
            pos: 0,
            filtered_upto: 0,
            filter: None,
            touched: false,
        }
    }

    /// Install the reclassification hook. Must happen before the first kind
    /// lookup; a late install means earlier lookups cached unfiltered kinds.
    pub fn set_filter(&mut self, filter: &'f dyn TokenFilter) {
        assert!(
            !self.touched,
            "token filter installed after a token was already consulted"
        );
        self.filter = Some(filter);
    }

    pub fn source(&self) -> &'s str {
        self.source
    }

    pub fn len(&self) -> usize {
        self.tokens.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }

    pub fn position(&self) -> usize {
        self.pos
    }

    /// Rewind the cursor to an earlier position. Filtered kinds stay cached.
    pub fn rewind(&mut self, pos: usize) {
        debug_assert!(pos <= self.pos, "rewind may only move the cursor back");
        self.pos = pos;
    }

    pub fn advance(&mut self) {
        debug_assert!(self.pos < self.tokens.len(), "advanced past end of input");
        self.pos += 1;
    }

    /// Kind of the token at raw index `raw`, `Eof` past the end. Runs the
    /// filter over every not-yet-filtered token up to and including `raw`;
    /// the filtered kinds are cached, so the filter sees each token exactly
    /// once.
    pub fn kind_at(&mut self, raw: usize) -> TokenKind {
        self.touched = true;
        if raw >= self.tokens.len() {
            return TokenKind::Eof;
        }
        while self.filtered_upto <= raw {
            if let Some(filter) = self.filter {
                let token = self.tokens[self.filtered_upto];
                let filtered = filter.filter(token.kind, token.text(self.source));
                self.tokens[self.filtered_upto].kind = filtered;
            }
            self.filtered_upto += 1;
        }
        self.tokens[raw].kind
    }

    /// Kind of the token at raw index `raw` without running the filter. Used
    /// for structural probes (trivia, newlines, dedents, end of input) whose
    /// outcome the filter can never change; the filter still runs before the
    /// token's kind is exposed to grammar decisions via `kind_at`.
    pub fn raw_kind_at(&mut self, raw: usize) -> TokenKind {
        self.touched = true;
        match self.tokens.get(raw) {
            Some(token) => token.kind,
            None => TokenKind::Eof,
        }
    }

    pub fn text_at(&self, raw: usize) -> &'s str {
        match self.tokens.get(raw) {
            Some(token) => token.text(self.source),
            None => "",
        }
    }

    pub fn token_at(&self, raw: usize) -> Option<Token> {
        self.tokens.get(raw).copied()
    }

    pub fn at_end(&self) -> bool {
        self.pos >= self.tokens.len()
    }

    /// Consume the source, returning the token vector with filtered kinds.
    pub fn into_tokens(self) -> Vec<Token> {
        self.tokens
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::py::lexing::tokenize;

    struct PromoteFoo;

    impl TokenFilter for PromoteFoo {
        fn filter(&self, kind: TokenKind, text: &str) -> TokenKind {
            if kind == TokenKind::Ident && text == "foo" {
                TokenKind::PrintKw
            } else {
                kind
            }
        }
    }

    #[test]
    fn test_filter_applies_on_first_access() {
        let source = "foo\n";
        let filter = PromoteFoo;
        let mut src = TokenSource::new(source, tokenize(source));
        src.set_filter(&filter);
        assert_eq!(src.kind_at(0), TokenKind::PrintKw);
    }

    #[test]
    fn test_filtered_kind_is_cached_across_rewind() {
        let source = "foo\n";
        let filter = PromoteFoo;
        let mut src = TokenSource::new(source, tokenize(source));
        src.set_filter(&filter);
        assert_eq!(src.kind_at(0), TokenKind::PrintKw);
        src.advance();
        src.rewind(0);
        assert_eq!(src.kind_at(0), TokenKind::PrintKw);
    }

    #[test]
    #[should_panic(expected = "token filter installed after")]
    fn test_late_filter_install_panics() {
        let source = "x\n";
        let filter = PromoteFoo;
        let mut src = TokenSource::new(source, tokenize(source));
        src.kind_at(0);
        src.set_filter(&filter);
    }

    #[test]
    fn test_past_end_is_eof() {
        let source = "";
        let mut src = TokenSource::new(source, tokenize(source));
        assert_eq!(src.kind_at(0), TokenKind::Eof);
        assert!(src.at_end());
    }
}
