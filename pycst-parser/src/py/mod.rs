//! The Python-dialect parsing stack: tokens, lexing, parsing, tree, formats.

pub mod formats;
pub mod lexing;
pub mod parsing;
pub mod syntax;
pub mod token;

pub use parsing::{
    parse_module, parse_module_at_level, LanguageLevel, Parser, ParsingContext,
};
pub use syntax::{NodeChild, ParseDiagnostic, ParseResult, SyntaxKind, SyntaxNode};
pub use token::{TextSpan, Token, TokenKind};
