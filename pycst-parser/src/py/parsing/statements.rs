//! The statement parser.
//!
//!     Recursive descent over statement forms, dispatching on the leading
//!     token kind. Statement forms that exist only on some language levels
//!     are parsed anyway and wrapped in an error node naming the level, so
//!     malformed or mismatched input is never silently dropped.
//!
//!     The statement parser is also the token filter: contextual keywords are
//!     promoted from plain identifiers exactly when the parse position makes
//!     them meaningful. `print`, `exec`, `nonlocal`, and `with` are only
//!     keywords at the start of a statement, and `as` only directly after an
//!     import element, an except expression, or a with item. The position
//!     state lives in cells because the filter is invoked from behind the
//!     token source while the parser drives it.
//!
//!     `from __future__ import …` updates the filter state mid-parse: the
//!     `with_statement` flag enables the with statement on 2.5, and
//!     `print_function` turns `print` back into a plain name.

use crate::py::parsing::builder::{Marker, TreeBuilder};
use crate::py::parsing::context::{LanguageLevel, ParsingContext};
use crate::py::parsing::source::TokenFilter;
use crate::py::syntax::SyntaxKind;
use crate::py::token::TokenKind;
use std::cell::Cell;

pub struct StatementParser {
    level: LanguageLevel,
    /// True while the first token of a statement is being classified.
    stmt_start: Cell<bool>,
    /// True while a construct that may be followed by `as` is being parsed.
    expect_as: Cell<bool>,
    /// Set by `from __future__ import with_statement`.
    future_with: Cell<bool>,
    /// Set by `from __future__ import print_function`.
    future_print: Cell<bool>,
}

impl TokenFilter for StatementParser {
    fn filter(&self, kind: TokenKind, text: &str) -> TokenKind {
        if kind != TokenKind::Ident {
            return kind;
        }
        match text {
            "print" if self.stmt_start.get() && self.print_is_statement() => TokenKind::PrintKw,
            "exec" if self.stmt_start.get() && self.level.has_exec_statement() => TokenKind::ExecKw,
            "nonlocal" if self.stmt_start.get() && self.level.has_nonlocal_statement() => {
                TokenKind::NonlocalKw
            }
            "with" if self.stmt_start.get() && self.with_is_statement() => TokenKind::WithKw,
            "as" if self.expect_as.get() => TokenKind::AsKw,
            _ => kind,
        }
    }
}

impl StatementParser {
    pub fn new(level: LanguageLevel) -> Self {
        StatementParser {
            level,
            stmt_start: Cell::new(false),
            expect_as: Cell::new(false),
            future_with: Cell::new(false),
            future_print: Cell::new(false),
        }
    }

    fn print_is_statement(&self) -> bool {
        self.level.has_print_statement() && !self.future_print.get()
    }

    fn with_is_statement(&self) -> bool {
        self.level.has_with_statement()
            || (self.level.with_statement_needs_future_import() && self.future_with.get())
    }

    /// Classify the current token with statement-start promotion active.
    fn statement_first_token(&self, b: &mut TreeBuilder<'_, '_>) -> TokenKind {
        self.stmt_start.set(true);
        let kind = b.current();
        self.stmt_start.set(false);
        kind
    }

    /// Parse one statement at the current position. Always consumes at least
    /// one token unless the input is exhausted.
    pub fn parse_statement(&self, ctx: &ParsingContext, b: &mut TreeBuilder<'_, '_>) {
        match self.statement_first_token(b) {
            TokenKind::Eof => {}
            TokenKind::Newline => b.bump(),
            TokenKind::Indent => {
                let m = b.mark();
                b.bump();
                m.error(b, "unexpected indent");
            }
            TokenKind::Dedent => {
                let m = b.mark();
                b.bump();
                m.error(b, "unexpected dedent");
            }
            TokenKind::IfKw => self.parse_if(ctx, b),
            TokenKind::WhileKw => self.parse_while(ctx, b),
            TokenKind::ForKw => self.parse_for(ctx, b),
            TokenKind::TryKw => self.parse_try(ctx, b),
            TokenKind::WithKw => self.parse_with(ctx, b),
            TokenKind::DefKw => self.parse_function(ctx, b, None),
            TokenKind::ClassKw => self.parse_class(ctx, b, None),
            TokenKind::At => self.parse_decorated(ctx, b),
            _ => self.parse_simple_statement_line(ctx, b),
        }
    }

    /// One or more `;`-separated simple statements followed by the logical
    /// line terminator.
    fn parse_simple_statement_line(&self, ctx: &ParsingContext, b: &mut TreeBuilder<'_, '_>) {
        self.parse_simple_statement(ctx, b);
        while b.at_raw(TokenKind::Semicolon) {
            b.bump();
            match b.raw_current() {
                TokenKind::Newline | TokenKind::Dedent | TokenKind::Eof => break,
                _ => self.parse_simple_statement(ctx, b),
            }
        }
        self.expect_end_of_line(b);
    }

    fn expect_end_of_line(&self, b: &mut TreeBuilder<'_, '_>) {
        match b.raw_current() {
            TokenKind::Newline => b.bump(),
            TokenKind::Dedent | TokenKind::Eof => {}
            _ => {
                let m = b.mark();
                loop {
                    match b.raw_current() {
                        TokenKind::Newline | TokenKind::Dedent | TokenKind::Eof => break,
                        _ => b.bump(),
                    }
                }
                m.error(b, "end of statement expected");
                if b.at_raw(TokenKind::Newline) {
                    b.bump();
                }
            }
        }
    }

    fn parse_simple_statement(&self, ctx: &ParsingContext, b: &mut TreeBuilder<'_, '_>) {
        match self.statement_first_token(b) {
            TokenKind::PassKw => self.parse_single_keyword(b, SyntaxKind::PassStatement),
            TokenKind::BreakKw => self.parse_single_keyword(b, SyntaxKind::BreakStatement),
            TokenKind::ContinueKw => self.parse_single_keyword(b, SyntaxKind::ContinueStatement),
            TokenKind::PrintKw => self.parse_print(ctx, b),
            TokenKind::DelKw => self.parse_del(ctx, b),
            TokenKind::ReturnKw => self.parse_return(ctx, b),
            TokenKind::RaiseKw => self.parse_raise(ctx, b),
            TokenKind::ImportKw => self.parse_import(b),
            TokenKind::FromKw => self.parse_from_import(b),
            TokenKind::GlobalKw => self.parse_name_list_statement(b, SyntaxKind::GlobalStatement),
            TokenKind::NonlocalKw => {
                self.parse_name_list_statement(b, SyntaxKind::NonlocalStatement)
            }
            TokenKind::ExecKw => self.parse_exec(ctx, b),
            TokenKind::AssertKw => self.parse_assert(ctx, b),
            TokenKind::Ident
                if b.current_text() == "print"
                    && !self.print_is_statement()
                    && self.looks_like_legacy_print(ctx, b) =>
            {
                self.parse_legacy_print_under_modern_level(ctx, b)
            }
            _ => self.parse_expression_statement(ctx, b),
        }
    }

    fn parse_single_keyword(&self, b: &mut TreeBuilder<'_, '_>, kind: SyntaxKind) {
        let m = b.mark();
        b.bump();
        m.done(b, kind);
    }

    /// Speculative probe: does `print <token>` at this position look like the
    /// legacy print statement rather than a reference to the builtin? The
    /// probe consumes nothing; the mark is rolled back either way.
    fn looks_like_legacy_print(&self, ctx: &ParsingContext, b: &mut TreeBuilder<'_, '_>) -> bool {
        let probe = b.mark();
        b.bump();
        let next = b.current();
        probe.rollback_to(b);
        if next == TokenKind::RightShift {
            return true;
        }
        // `print(...)` is an ordinary call; everything else that can begin an
        // expression means the legacy statement form.
        next != TokenKind::LParen && ctx.expression_parser().can_begin_expression(next)
    }

    fn parse_legacy_print_under_modern_level(
        &self,
        ctx: &ParsingContext,
        b: &mut TreeBuilder<'_, '_>,
    ) {
        let m = b.mark();
        b.bump(); // the `print` identifier
        self.parse_print_arguments(ctx, b);
        let cm = m.done(b, SyntaxKind::PrintStatement);
        cm.precede(b)
            .error(b, "the print statement is not available here; use print(...)");
    }

    fn parse_print(&self, ctx: &ParsingContext, b: &mut TreeBuilder<'_, '_>) {
        let m = b.mark();
        b.bump();
        self.parse_print_arguments(ctx, b);
        m.done(b, SyntaxKind::PrintStatement);
    }

    fn parse_print_arguments(&self, ctx: &ParsingContext, b: &mut TreeBuilder<'_, '_>) {
        let expr = ctx.expression_parser();
        if b.at(TokenKind::RightShift) {
            // `print >> stream, value, ...`
            b.bump();
            expr.parse_expression(b);
        } else if expr.can_begin_expression(b.current()) {
            expr.parse_expression(b);
        } else {
            return;
        }
        while b.at(TokenKind::Comma) {
            b.bump();
            if expr.can_begin_expression(b.current()) {
                expr.parse_expression(b);
            } else {
                // A trailing comma suppresses the newline; nothing follows.
                break;
            }
        }
    }

    fn parse_del(&self, ctx: &ParsingContext, b: &mut TreeBuilder<'_, '_>) {
        let m = b.mark();
        b.bump();
        ctx.expression_parser().parse_target_list(b);
        m.done(b, SyntaxKind::DelStatement);
    }

    fn parse_return(&self, ctx: &ParsingContext, b: &mut TreeBuilder<'_, '_>) {
        let m = b.mark();
        b.bump();
        let expr = ctx.expression_parser();
        let kind = b.current();
        if kind == TokenKind::Star || expr.can_begin_expression(kind) {
            expr.parse_expression_list(b);
        }
        m.done(b, SyntaxKind::ReturnStatement);
    }

    fn parse_raise(&self, ctx: &ParsingContext, b: &mut TreeBuilder<'_, '_>) {
        let m = b.mark();
        b.bump();
        let expr = ctx.expression_parser();
        let mut legacy_args = false;
        let mut raise_from = false;
        if expr.can_begin_expression(b.current()) {
            expr.parse_expression(b);
            if b.at(TokenKind::Comma) {
                legacy_args = true;
                b.bump();
                expr.parse_expression(b);
                if b.at(TokenKind::Comma) {
                    b.bump();
                    expr.parse_expression(b);
                }
            } else if b.at(TokenKind::FromKw) {
                raise_from = true;
                b.bump();
                expr.parse_expression(b);
            }
        }
        let cm = m.done(b, SyntaxKind::RaiseStatement);
        if legacy_args && !self.level.supports_three_argument_raise() {
            cm.precede(b)
                .error(b, "multi-argument raise was removed in Python 3.0");
        } else if raise_from && !self.level.supports_raise_from() {
            cm.precede(b).error(b, "raise ... from requires Python 3.0");
        }
    }

    fn parse_import(&self, b: &mut TreeBuilder<'_, '_>) {
        let m = b.mark();
        b.bump();
        self.parse_import_element(b);
        while b.at(TokenKind::Comma) {
            b.bump();
            self.parse_import_element(b);
        }
        m.done(b, SyntaxKind::ImportStatement);
    }

    /// `dotted.name ['as' name]`.
    fn parse_import_element(&self, b: &mut TreeBuilder<'_, '_>) {
        let m = b.mark();
        self.expect_as.set(true);
        let _ = self.parse_dotted_name(b);
        if b.at(TokenKind::AsKw) {
            b.bump();
            if b.at(TokenKind::Ident) {
                b.bump();
            } else {
                b.error_here("name expected after 'as'");
            }
        }
        self.expect_as.set(false);
        m.done(b, SyntaxKind::ImportElement);
    }

    /// Returns the first name segment so the caller can recognize
    /// `__future__` imports.
    fn parse_dotted_name(&self, b: &mut TreeBuilder<'_, '_>) -> Option<String> {
        if !b.at(TokenKind::Ident) {
            b.error_here("module name expected");
            return None;
        }
        let m = b.mark();
        let first = b.current_text().to_string();
        b.bump();
        while b.at(TokenKind::Dot) && b.nth(1) == TokenKind::Ident {
            b.bump();
            b.bump();
        }
        m.done(b, SyntaxKind::DottedName);
        Some(first)
    }

    fn parse_from_import(&self, b: &mut TreeBuilder<'_, '_>) {
        let m = b.mark();
        b.bump();
        let mut relative = false;
        while b.at(TokenKind::Dot) {
            relative = true;
            b.bump();
        }
        let module = if b.at(TokenKind::Ident) {
            self.parse_dotted_name(b)
        } else {
            if !relative {
                b.error_here("module name expected");
            }
            None
        };
        b.expect(TokenKind::ImportKw, "expected 'import'");
        let mut names = Vec::new();
        if b.at(TokenKind::Star) {
            b.bump();
        } else if b.at(TokenKind::LParen) {
            b.bump();
            self.parse_from_import_names(b, &mut names);
            b.expect(TokenKind::RParen, "expected ')'");
        } else {
            self.parse_from_import_names(b, &mut names);
        }
        if !relative && module.as_deref() == Some("__future__") {
            self.apply_future_imports(&names);
        }
        m.done(b, SyntaxKind::FromImportStatement);
    }

    fn parse_from_import_names(&self, b: &mut TreeBuilder<'_, '_>, names: &mut Vec<String>) {
        loop {
            if let Some(name) = self.parse_from_import_name(b) {
                names.push(name);
            }
            if b.at(TokenKind::Comma) {
                b.bump();
                // A trailing comma inside parentheses is legal.
                if !b.at(TokenKind::Ident) {
                    break;
                }
            } else {
                break;
            }
        }
    }

    fn parse_from_import_name(&self, b: &mut TreeBuilder<'_, '_>) -> Option<String> {
        self.expect_as.set(true);
        let result = if b.at(TokenKind::Ident) {
            let m = b.mark();
            let name = b.current_text().to_string();
            b.bump();
            if b.at(TokenKind::AsKw) {
                b.bump();
                if b.at(TokenKind::Ident) {
                    b.bump();
                } else {
                    b.error_here("name expected after 'as'");
                }
            }
            m.done(b, SyntaxKind::ImportElement);
            Some(name)
        } else {
            b.error_here("imported name expected");
            None
        };
        self.expect_as.set(false);
        result
    }

    fn apply_future_imports(&self, names: &[String]) {
        for name in names {
            match name.as_str() {
                "with_statement" => self.future_with.set(true),
                "print_function" => self.future_print.set(true),
                _ => {}
            }
        }
    }

    fn parse_name_list_statement(&self, b: &mut TreeBuilder<'_, '_>, kind: SyntaxKind) {
        let m = b.mark();
        b.bump();
        if b.at(TokenKind::Ident) {
            b.bump();
        } else {
            b.error_here("name expected");
        }
        while b.at(TokenKind::Comma) {
            b.bump();
            if b.at(TokenKind::Ident) {
                b.bump();
            } else {
                b.error_here("name expected");
                break;
            }
        }
        m.done(b, kind);
    }

    fn parse_exec(&self, ctx: &ParsingContext, b: &mut TreeBuilder<'_, '_>) {
        let m = b.mark();
        b.bump();
        let expr = ctx.expression_parser();
        // The code operand is restricted so that `in` stays the clause
        // separator.
        expr.parse_bitwise_expr(b);
        if b.at(TokenKind::InKw) {
            b.bump();
            expr.parse_expression(b);
            if b.at(TokenKind::Comma) {
                b.bump();
                expr.parse_expression(b);
            }
        }
        m.done(b, SyntaxKind::ExecStatement);
    }

    fn parse_assert(&self, ctx: &ParsingContext, b: &mut TreeBuilder<'_, '_>) {
        let m = b.mark();
        b.bump();
        let expr = ctx.expression_parser();
        expr.parse_expression(b);
        if b.at(TokenKind::Comma) {
            b.bump();
            expr.parse_expression(b);
        }
        m.done(b, SyntaxKind::AssertStatement);
    }

    fn parse_expression_statement(&self, ctx: &ParsingContext, b: &mut TreeBuilder<'_, '_>) {
        let expr = ctx.expression_parser();
        let kind = b.current();
        if kind != TokenKind::Star && !expr.can_begin_expression(kind) {
            if b.eof() {
                b.error_here("statement expected");
            } else {
                let bad = b.mark();
                b.bump();
                bad.error(b, "statement expected");
            }
            return;
        }
        let m = b.mark();
        expr.parse_expression_list(b);
        if b.at(TokenKind::Assign) {
            while b.at(TokenKind::Assign) {
                b.bump();
                expr.parse_expression_list(b);
            }
            m.done(b, SyntaxKind::AssignmentStatement);
        } else if b.current().is_augmented_assign() {
            b.bump();
            expr.parse_expression_list(b);
            m.done(b, SyntaxKind::AugAssignmentStatement);
        } else {
            m.done(b, SyntaxKind::ExpressionStatement);
        }
    }

    fn parse_if(&self, ctx: &ParsingContext, b: &mut TreeBuilder<'_, '_>) {
        let m = b.mark();
        b.bump();
        ctx.expression_parser().parse_expression(b);
        b.expect(TokenKind::Colon, "expected ':'");
        self.parse_suite(ctx, b);
        while b.at_raw(TokenKind::ElifKw) {
            b.bump();
            ctx.expression_parser().parse_expression(b);
            b.expect(TokenKind::Colon, "expected ':'");
            self.parse_suite(ctx, b);
        }
        self.parse_optional_else_clause(ctx, b);
        m.done(b, SyntaxKind::IfStatement);
    }

    fn parse_while(&self, ctx: &ParsingContext, b: &mut TreeBuilder<'_, '_>) {
        let m = b.mark();
        b.bump();
        ctx.expression_parser().parse_expression(b);
        b.expect(TokenKind::Colon, "expected ':'");
        self.parse_suite(ctx, b);
        self.parse_optional_else_clause(ctx, b);
        m.done(b, SyntaxKind::WhileStatement);
    }

    fn parse_for(&self, ctx: &ParsingContext, b: &mut TreeBuilder<'_, '_>) {
        let m = b.mark();
        b.bump();
        let expr = ctx.expression_parser();
        expr.parse_target_list(b);
        b.expect(TokenKind::InKw, "expected 'in'");
        expr.parse_expression_list(b);
        b.expect(TokenKind::Colon, "expected ':'");
        self.parse_suite(ctx, b);
        self.parse_optional_else_clause(ctx, b);
        m.done(b, SyntaxKind::ForStatement);
    }

    fn parse_optional_else_clause(&self, ctx: &ParsingContext, b: &mut TreeBuilder<'_, '_>) {
        if b.at_raw(TokenKind::ElseKw) {
            let m = b.mark();
            b.bump();
            b.expect(TokenKind::Colon, "expected ':'");
            self.parse_suite(ctx, b);
            m.done(b, SyntaxKind::ElseClause);
        }
    }

    /// `try` statements keep the protected body, each handler, the else
    /// region, and the always-run region as distinct clause nodes, so
    /// downstream analyses can walk from an expression to the always-run
    /// region of the nearest enclosing try statement.
    fn parse_try(&self, ctx: &ParsingContext, b: &mut TreeBuilder<'_, '_>) {
        let m = b.mark();
        let tc = b.mark();
        b.bump();
        b.expect(TokenKind::Colon, "expected ':'");
        self.parse_suite(ctx, b);
        tc.done(b, SyntaxKind::TryClause);
        let mut saw_handler = false;
        while b.at_raw(TokenKind::ExceptKw) {
            saw_handler = true;
            self.parse_except_clause(ctx, b);
        }
        if saw_handler {
            self.parse_optional_else_clause(ctx, b);
        }
        if b.at_raw(TokenKind::FinallyKw) {
            saw_handler = true;
            let fc = b.mark();
            b.bump();
            b.expect(TokenKind::Colon, "expected ':'");
            self.parse_suite(ctx, b);
            fc.done(b, SyntaxKind::FinallyClause);
        }
        if !saw_handler {
            b.error_here("expected 'except' or 'finally'");
        }
        m.done(b, SyntaxKind::TryStatement);
    }

    fn parse_except_clause(&self, ctx: &ParsingContext, b: &mut TreeBuilder<'_, '_>) {
        let ec = b.mark();
        b.bump();
        let expr = ctx.expression_parser();
        let mut legacy_target = false;
        let mut as_target = false;
        self.expect_as.set(true);
        if expr.can_begin_expression(b.current()) {
            expr.parse_expression(b);
            if b.at(TokenKind::Comma) {
                legacy_target = true;
                b.bump();
                expr.parse_single_target(b);
            } else if b.at(TokenKind::AsKw) {
                as_target = true;
                b.bump();
                expr.parse_single_target(b);
            }
        }
        self.expect_as.set(false);
        b.expect(TokenKind::Colon, "expected ':'");
        self.parse_suite(ctx, b);
        let cm = ec.done(b, SyntaxKind::ExceptClause);
        if legacy_target && !self.level.supports_legacy_except_target() {
            cm.precede(b)
                .error(b, "'except E, name' was removed in Python 3.0; use 'except E as name'");
        } else if as_target && !self.level.supports_except_as() {
            cm.precede(b)
                .error(b, "'except ... as name' requires Python 2.6");
        }
    }

    fn parse_with(&self, ctx: &ParsingContext, b: &mut TreeBuilder<'_, '_>) {
        let m = b.mark();
        b.bump();
        let mut items = 1;
        self.parse_with_item(ctx, b);
        while b.at(TokenKind::Comma) {
            b.bump();
            items += 1;
            self.parse_with_item(ctx, b);
        }
        b.expect(TokenKind::Colon, "expected ':'");
        self.parse_suite(ctx, b);
        let cm = m.done(b, SyntaxKind::WithStatement);
        if items > 1 && !self.level.supports_multiple_with_items() {
            cm.precede(b)
                .error(b, "multiple context managers in one with statement require Python 2.7");
        }
    }

    fn parse_with_item(&self, ctx: &ParsingContext, b: &mut TreeBuilder<'_, '_>) {
        let m = b.mark();
        let expr = ctx.expression_parser();
        self.expect_as.set(true);
        expr.parse_expression(b);
        if b.at(TokenKind::AsKw) {
            b.bump();
            expr.parse_single_target(b);
        }
        self.expect_as.set(false);
        m.done(b, SyntaxKind::WithItem);
    }

    fn parse_decorated(&self, ctx: &ParsingContext, b: &mut TreeBuilder<'_, '_>) {
        let m = b.mark();
        let dl = b.mark();
        while b.at_raw(TokenKind::At) {
            let d = b.mark();
            b.bump();
            ctx.expression_parser().parse_decorator_expression(b);
            if b.at_raw(TokenKind::Newline) {
                b.bump();
            } else {
                b.error_here("newline expected after decorator");
            }
            d.done(b, SyntaxKind::Decorator);
        }
        dl.done(b, SyntaxKind::DecoratorList);
        match b.raw_current() {
            TokenKind::DefKw => self.parse_function(ctx, b, Some(m)),
            TokenKind::ClassKw => self.parse_class(ctx, b, Some(m)),
            _ => {
                m.error(b, "expected 'def' or 'class' after decorators");
            }
        }
    }

    fn parse_function(
        &self,
        ctx: &ParsingContext,
        b: &mut TreeBuilder<'_, '_>,
        outer: Option<Marker>,
    ) {
        let m = outer.unwrap_or_else(|| b.mark());
        b.bump();
        if b.at(TokenKind::Ident) {
            b.bump();
        } else {
            b.error_here("function name expected");
        }
        self.parse_parameter_list(ctx, b);
        if b.at(TokenKind::Arrow) {
            let a = b.mark();
            b.bump();
            ctx.expression_parser().parse_expression(b);
            let cm = a.done(b, SyntaxKind::Annotation);
            if !self.level.supports_return_annotations() {
                cm.precede(b)
                    .error(b, "return annotations require Python 3.0");
            }
        }
        b.expect(TokenKind::Colon, "expected ':'");
        self.parse_suite(ctx, b);
        m.done(b, SyntaxKind::FunctionDef);
    }

    fn parse_parameter_list(&self, ctx: &ParsingContext, b: &mut TreeBuilder<'_, '_>) {
        if !b.at(TokenKind::LParen) {
            b.error_here("expected parameter list");
            return;
        }
        let pl = b.mark();
        b.bump();
        while !b.at(TokenKind::RParen) && !b.eof() {
            match b.current() {
                TokenKind::Ident => {
                    let p = b.mark();
                    b.bump();
                    if b.at(TokenKind::Assign) {
                        b.bump();
                        ctx.expression_parser().parse_expression(b);
                    }
                    p.done(b, SyntaxKind::Parameter);
                }
                TokenKind::Star | TokenKind::DoubleStar => {
                    let p = b.mark();
                    b.bump();
                    if b.at(TokenKind::Ident) {
                        b.bump();
                    }
                    p.done(b, SyntaxKind::Parameter);
                }
                TokenKind::LParen => {
                    // Legacy tuple parameter: `def f((a, b)):`
                    let tp = b.mark();
                    b.bump();
                    ctx.expression_parser().parse_target_list(b);
                    b.expect(TokenKind::RParen, "expected ')'");
                    let cm = tp.done(b, SyntaxKind::TupleParameter);
                    if !self.level.supports_tuple_parameters() {
                        cm.precede(b)
                            .error(b, "tuple parameters were removed in Python 3.0");
                    }
                }
                _ => {
                    let bad = b.mark();
                    b.bump();
                    bad.error(b, "unexpected token in parameter list");
                }
            }
            if b.at(TokenKind::Comma) {
                b.bump();
            } else {
                break;
            }
        }
        b.expect(TokenKind::RParen, "expected ')'");
        pl.done(b, SyntaxKind::ParameterList);
    }

    fn parse_class(
        &self,
        ctx: &ParsingContext,
        b: &mut TreeBuilder<'_, '_>,
        outer: Option<Marker>,
    ) {
        let m = outer.unwrap_or_else(|| b.mark());
        b.bump();
        if b.at(TokenKind::Ident) {
            b.bump();
        } else {
            b.error_here("class name expected");
        }
        if b.at(TokenKind::LParen) {
            ctx.expression_parser().parse_argument_list(b);
        }
        b.expect(TokenKind::Colon, "expected ':'");
        self.parse_suite(ctx, b);
        m.done(b, SyntaxKind::ClassDef);
    }

    /// A suite: either an indented block after a newline, or simple
    /// statements on the same line.
    fn parse_suite(&self, ctx: &ParsingContext, b: &mut TreeBuilder<'_, '_>) {
        if b.at_raw(TokenKind::Newline) {
            let m = b.mark();
            b.bump();
            if b.at_raw(TokenKind::Indent) {
                b.bump();
                while !b.at_raw(TokenKind::Dedent) && !b.eof() {
                    self.parse_statement(ctx, b);
                }
                if b.at_raw(TokenKind::Dedent) {
                    b.bump();
                }
            } else {
                b.error_here("an indented block is expected");
            }
            m.done(b, SyntaxKind::Suite);
        } else {
            let m = b.mark();
            match b.raw_current() {
                TokenKind::Dedent | TokenKind::Eof => {
                    b.error_here("statement expected");
                }
                _ => self.parse_simple_statement_line(ctx, b),
            }
            m.done(b, SyntaxKind::Suite);
        }
    }
}
