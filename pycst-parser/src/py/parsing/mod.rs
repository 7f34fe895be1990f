//! Parsing: the entry point plus the builder, context, and sub-parsers.
//!
//!     One parse owns one context, one builder, and one token source; nothing
//!     is shared between parses, so independent parses can run on independent
//!     threads. The entry point wires the pieces together in a fixed order:
//!     open the root marker, install the token filter, drive the statement
//!     parser until the input is exhausted, close the root, assemble the
//!     tree. The filter must be installed before the first end-of-input
//!     probe, because the probe touches the token stream and the source
//!     caches what it hands out.

pub mod builder;
pub mod context;
pub mod expressions;
pub mod source;
pub mod statements;

pub use builder::{CompletedMarker, Marker, TreeBuilder};
pub use context::{LanguageLevel, ParsingContext};
pub use source::{TokenFilter, TokenSource};

use crate::py::lexing;
use crate::py::syntax::{ParseResult, SyntaxKind};
use std::time::Instant;

/// A parser bound to one language level. Reusable: each call to `parse`
/// builds fresh per-parse state.
pub struct Parser {
    level: LanguageLevel,
}

impl Parser {
    pub fn new(level: LanguageLevel) -> Self {
        Parser { level }
    }

    pub fn level(&self) -> LanguageLevel {
        self.level
    }

    /// Parse one module. Never fails: malformed input yields a tree with
    /// error nodes covering the full token range.
    pub fn parse(&self, source: &str) -> ParseResult {
        let started = Instant::now();
        let tokens = lexing::tokenize(source);
        let ctx = ParsingContext::new(self.level);
        let mut b = TreeBuilder::new(source, tokens);
        let root = b.mark();
        let statements = ctx.statement_parser();
        // Must happen before the eof probe below; the source caches the
        // kinds it hands out.
        b.set_token_filter(statements);
        while !b.eof() {
            statements.parse_statement(&ctx, &mut b);
        }
        root.done(&mut b, SyntaxKind::Module);
        let (tree, diagnostics) = b.finish();
        log::debug!(
            "parsed {:.1}K of source in {}ms",
            source.len() as f64 / 1000.0,
            started.elapsed().as_millis()
        );
        ParseResult {
            root: tree,
            diagnostics,
        }
    }
}

impl Default for Parser {
    fn default() -> Self {
        Parser::new(LanguageLevel::default_level())
    }
}

/// Parse with the default language level.
pub fn parse_module(source: &str) -> ParseResult {
    Parser::default().parse(source)
}

/// Parse with an explicit language level.
pub fn parse_module_at_level(source: &str, level: LanguageLevel) -> ParseResult {
    Parser::new(level).parse(source)
}
