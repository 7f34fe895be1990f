//! Language levels and the per-parse context.

use crate::py::parsing::expressions::ExpressionParser;
use crate::py::parsing::statements::StatementParser;
use once_cell::unsync::OnceCell;
use serde::Serialize;
use std::fmt;
use std::str::FromStr;

/// The grammar generation a parse targets. Ordered: later levels compare
/// greater than earlier ones.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub enum LanguageLevel {
    Python24,
    Python25,
    Python26,
    Python27,
    Python30,
    Python31,
}

impl LanguageLevel {
    pub fn default_level() -> LanguageLevel {
        LanguageLevel::Python27
    }

    pub fn is_py3(self) -> bool {
        self >= LanguageLevel::Python30
    }

    /// `print` is a statement keyword on the 2.x line.
    pub fn has_print_statement(self) -> bool {
        !self.is_py3()
    }

    /// `exec` is a statement keyword on the 2.x line.
    pub fn has_exec_statement(self) -> bool {
        !self.is_py3()
    }

    pub fn has_nonlocal_statement(self) -> bool {
        self.is_py3()
    }

    /// `with` is unconditionally available from 2.6; on 2.5 it needs the
    /// `with_statement` future import, which is parser state, not a level
    /// question.
    pub fn has_with_statement(self) -> bool {
        self >= LanguageLevel::Python26
    }

    pub fn with_statement_needs_future_import(self) -> bool {
        self == LanguageLevel::Python25
    }

    pub fn supports_conditional_expressions(self) -> bool {
        self >= LanguageLevel::Python25
    }

    pub fn supports_set_displays(self) -> bool {
        self >= LanguageLevel::Python27
    }

    pub fn supports_dict_and_set_comprehensions(self) -> bool {
        self >= LanguageLevel::Python27
    }

    pub fn supports_multiple_with_items(self) -> bool {
        self >= LanguageLevel::Python27
    }

    pub fn supports_except_as(self) -> bool {
        self >= LanguageLevel::Python26
    }

    /// `except E, name` was removed on the 3.x line.
    pub fn supports_legacy_except_target(self) -> bool {
        !self.is_py3()
    }

    /// The `<>` spelling of inequality was removed on the 3.x line.
    pub fn supports_angle_inequality(self) -> bool {
        !self.is_py3()
    }

    /// Backtick repr-expressions were removed on the 3.x line.
    pub fn supports_backtick_repr(self) -> bool {
        !self.is_py3()
    }

    pub fn supports_return_annotations(self) -> bool {
        self.is_py3()
    }

    pub fn supports_raise_from(self) -> bool {
        self.is_py3()
    }

    /// `raise E, arg, tb` was removed on the 3.x line.
    pub fn supports_three_argument_raise(self) -> bool {
        !self.is_py3()
    }

    /// `def f((a, b)):` tuple parameters were removed on the 3.x line.
    pub fn supports_tuple_parameters(self) -> bool {
        !self.is_py3()
    }

    pub fn supports_starred_targets(self) -> bool {
        self.is_py3()
    }
}

impl fmt::Display for LanguageLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            LanguageLevel::Python24 => "2.4",
            LanguageLevel::Python25 => "2.5",
            LanguageLevel::Python26 => "2.6",
            LanguageLevel::Python27 => "2.7",
            LanguageLevel::Python30 => "3.0",
            LanguageLevel::Python31 => "3.1",
        };
        write!(f, "{}", text)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct UnknownLanguageLevel(pub String);

impl fmt::Display for UnknownLanguageLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown language level: {}", self.0)
    }
}

impl std::error::Error for UnknownLanguageLevel {}

impl FromStr for LanguageLevel {
    type Err = UnknownLanguageLevel;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "2.4" => Ok(LanguageLevel::Python24),
            "2.5" => Ok(LanguageLevel::Python25),
            "2.6" => Ok(LanguageLevel::Python26),
            "2.7" => Ok(LanguageLevel::Python27),
            "3.0" => Ok(LanguageLevel::Python30),
            "3.1" => Ok(LanguageLevel::Python31),
            other => Err(UnknownLanguageLevel(other.to_string())),
        }
    }
}

/// Per-parse configuration: the language level plus lazily constructed
/// sub-parsers bound to it. One context per parse; the level never changes
/// for the lifetime of the context, and the sub-parsers read it from here
/// rather than from any ambient state.
pub struct ParsingContext {
    level: LanguageLevel,
    statements: OnceCell<StatementParser>,
    expressions: OnceCell<ExpressionParser>,
}

impl ParsingContext {
    pub fn new(level: LanguageLevel) -> Self {
        ParsingContext {
            level,
            statements: OnceCell::new(),
            expressions: OnceCell::new(),
        }
    }

    pub fn level(&self) -> LanguageLevel {
        self.level
    }

    pub fn statement_parser(&self) -> &StatementParser {
        self.statements
            .get_or_init(|| StatementParser::new(self.level))
    }

    pub fn expression_parser(&self) -> &ExpressionParser {
        self.expressions
            .get_or_init(|| ExpressionParser::new(self.level))
    }
}
