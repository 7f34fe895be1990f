//! The expression parser.
//!
//!     Precedence climbing over a fixed binding-power table, with dedicated
//!     handling for the primary forms (literals, parenthesized and display
//!     forms, comprehensions, calls, attribute access, subscripting).
//!     Postfix chains are built iteratively by wrapping the completed node
//!     with `precede`, so arbitrarily long `a.b.c()[0](x)` chains never
//!     recurse.
//!
//!     "No expression here" is ordinary control flow: the `_opt` entry points
//!     return `None` without touching the stream, and the non-optional ones
//!     emit a zero-token error node instead, so a missing expression never
//!     consumes unrelated tokens.

use crate::py::parsing::builder::{CompletedMarker, TreeBuilder};
use crate::py::parsing::context::LanguageLevel;
use crate::py::syntax::SyntaxKind;
use crate::py::token::TokenKind;

// Binding powers, loosest to tightest. Left entry is the power the operator
// demands from its left context, right entry is the minimum it passes to its
// right operand; `**` passes a smaller right power because it associates to
// the right.
const BP_OR: (u8, u8) = (3, 4);
const BP_AND: (u8, u8) = (5, 6);
const BP_NOT_RHS: u8 = 8;
const BP_COMPARISON: (u8, u8) = (9, 10);
const BP_BITOR: (u8, u8) = (11, 12);
const BP_BITXOR: (u8, u8) = (13, 14);
const BP_BITAND: (u8, u8) = (15, 16);
const BP_SHIFT: (u8, u8) = (17, 18);
const BP_ADDITIVE: (u8, u8) = (19, 20);
const BP_MULTIPLICATIVE: (u8, u8) = (21, 22);
const BP_UNARY_RHS: u8 = 24;
const BP_POWER: (u8, u8) = (27, 26);

pub struct ExpressionParser {
    level: LanguageLevel,
}

impl ExpressionParser {
    pub fn new(level: LanguageLevel) -> Self {
        ExpressionParser { level }
    }

    /// Whether a token kind can begin an expression.
    pub fn can_begin_expression(&self, kind: TokenKind) -> bool {
        matches!(
            kind,
            TokenKind::Ident
                | TokenKind::Int
                | TokenKind::Float
                | TokenKind::Imaginary
                | TokenKind::Str
                | TokenKind::LParen
                | TokenKind::LBracket
                | TokenKind::LBrace
                | TokenKind::Backtick
                | TokenKind::Minus
                | TokenKind::Plus
                | TokenKind::Tilde
                | TokenKind::NotKw
                | TokenKind::LambdaKw
                | TokenKind::YieldKw
        )
    }

    /// Parse one full expression; emits a zero-token error node when the
    /// current token cannot begin one.
    pub fn parse_expression(&self, b: &mut TreeBuilder<'_, '_>) -> CompletedMarker {
        match self.parse_expression_opt(b) {
            Some(cm) => cm,
            None => b.error_here("expression expected"),
        }
    }

    pub fn parse_expression_opt(&self, b: &mut TreeBuilder<'_, '_>) -> Option<CompletedMarker> {
        match b.current() {
            TokenKind::YieldKw => Some(self.parse_yield_expr(b)),
            TokenKind::LambdaKw => Some(self.parse_lambda(b)),
            _ => {
                let lhs = self.parse_binary(b, 0)?;
                Some(self.parse_conditional_rest(b, lhs))
            }
        }
    }

    /// `expr (',' expr)*`, wrapped in a tuple node when a comma appears.
    /// Items may be starred (`*a`); the star form is gated to modern levels.
    pub fn parse_expression_list(&self, b: &mut TreeBuilder<'_, '_>) -> CompletedMarker {
        let m = b.mark();
        let first = self.parse_list_item(b);
        if !b.at(TokenKind::Comma) {
            m.abandon(b);
            return first;
        }
        while b.at(TokenKind::Comma) {
            b.bump();
            let kind = b.current();
            if kind == TokenKind::Star || self.can_begin_expression(kind) {
                self.parse_list_item(b);
            } else {
                break;
            }
        }
        m.done(b, SyntaxKind::TupleExpr)
    }

    fn parse_list_item(&self, b: &mut TreeBuilder<'_, '_>) -> CompletedMarker {
        if b.at(TokenKind::Star) {
            self.parse_starred(b)
        } else {
            self.parse_expression(b)
        }
    }

    fn parse_starred(&self, b: &mut TreeBuilder<'_, '_>) -> CompletedMarker {
        let m = b.mark();
        b.bump();
        match self.parse_postfix(b) {
            Some(_) => {}
            None => {
                b.error_here("expression expected after '*'");
            }
        }
        let cm = m.done(b, SyntaxKind::StarExpr);
        if self.level.supports_starred_targets() {
            cm
        } else {
            self.unsupported(b, cm, "starred expressions require Python 3.0")
        }
    }

    /// Assignment/loop targets: postfix-level expressions only, so that the
    /// `in` of a `for` statement is never mistaken for the comparison
    /// operator.
    pub fn parse_target_list(&self, b: &mut TreeBuilder<'_, '_>) -> CompletedMarker {
        let m = b.mark();
        let first = self.parse_single_target(b);
        if !b.at(TokenKind::Comma) {
            m.abandon(b);
            return first;
        }
        while b.at(TokenKind::Comma) {
            b.bump();
            let kind = b.current();
            if kind == TokenKind::Star || self.can_begin_expression(kind) {
                self.parse_single_target(b);
            } else {
                break;
            }
        }
        m.done(b, SyntaxKind::TupleExpr)
    }

    pub fn parse_single_target(&self, b: &mut TreeBuilder<'_, '_>) -> CompletedMarker {
        if b.at(TokenKind::Star) {
            return self.parse_starred(b);
        }
        match self.parse_postfix(b) {
            Some(cm) => cm,
            None => b.error_here("target expected"),
        }
    }

    /// Restricted expression without comparisons or boolean operators, used
    /// where `in` must stay available as a keyword (`exec code in globals`).
    pub(crate) fn parse_bitwise_expr(&self, b: &mut TreeBuilder<'_, '_>) -> CompletedMarker {
        match self.parse_binary(b, BP_BITOR.0) {
            Some(cm) => cm,
            None => b.error_here("expression expected"),
        }
    }

    /// Decorator bodies: a dotted name with an optional call, nothing more.
    pub(crate) fn parse_decorator_expression(&self, b: &mut TreeBuilder<'_, '_>) -> CompletedMarker {
        match self.parse_postfix(b) {
            Some(cm) => cm,
            None => b.error_here("decorator name expected"),
        }
    }

    fn parse_conditional_rest(
        &self,
        b: &mut TreeBuilder<'_, '_>,
        lhs: CompletedMarker,
    ) -> CompletedMarker {
        if !b.at(TokenKind::IfKw) {
            return lhs;
        }
        let m = lhs.precede(b);
        b.bump();
        if self.parse_binary(b, 0).is_none() {
            b.error_here("condition expected");
        }
        b.expect(
            TokenKind::ElseKw,
            "expected 'else' in conditional expression",
        );
        self.parse_expression(b);
        let cm = m.done(b, SyntaxKind::ConditionalExpr);
        if self.level.supports_conditional_expressions() {
            cm
        } else {
            self.unsupported(b, cm, "conditional expressions require Python 2.5")
        }
    }

    /// The binary operator at the current position: token count, left and
    /// right binding power. Two-token operators (`not in`, `is not`) are
    /// resolved with one token of lookahead.
    fn binary_op(&self, b: &mut TreeBuilder<'_, '_>) -> Option<(usize, u8, u8)> {
        let (len, (l_bp, r_bp)) = match b.current() {
            TokenKind::OrKw => (1, BP_OR),
            TokenKind::AndKw => (1, BP_AND),
            TokenKind::NotKw if b.nth(1) == TokenKind::InKw => (2, BP_COMPARISON),
            TokenKind::IsKw if b.nth(1) == TokenKind::NotKw => (2, BP_COMPARISON),
            TokenKind::IsKw
            | TokenKind::InKw
            | TokenKind::Lt
            | TokenKind::Gt
            | TokenKind::LtEq
            | TokenKind::GtEq
            | TokenKind::EqEq
            | TokenKind::NotEq
            | TokenKind::LtGt => (1, BP_COMPARISON),
            TokenKind::Pipe => (1, BP_BITOR),
            TokenKind::Caret => (1, BP_BITXOR),
            TokenKind::Amp => (1, BP_BITAND),
            TokenKind::LeftShift | TokenKind::RightShift => (1, BP_SHIFT),
            TokenKind::Plus | TokenKind::Minus => (1, BP_ADDITIVE),
            TokenKind::Star
            | TokenKind::Slash
            | TokenKind::DoubleSlash
            | TokenKind::Percent => (1, BP_MULTIPLICATIVE),
            TokenKind::DoubleStar => (1, BP_POWER),
            _ => return None,
        };
        Some((len, l_bp, r_bp))
    }

    fn parse_binary(&self, b: &mut TreeBuilder<'_, '_>, min_bp: u8) -> Option<CompletedMarker> {
        let mut lhs = self.parse_prefix(b)?;
        loop {
            let (len, l_bp, r_bp) = match self.binary_op(b) {
                Some(op) => op,
                None => break,
            };
            if l_bp < min_bp {
                break;
            }
            let angle_inequality = b.at(TokenKind::LtGt);
            let m = lhs.precede(b);
            for _ in 0..len {
                b.bump();
            }
            if self.parse_binary(b, r_bp).is_none() {
                b.error_here("expression expected");
            }
            lhs = m.done(b, SyntaxKind::BinaryExpr);
            if angle_inequality && !self.level.supports_angle_inequality() {
                lhs = self.unsupported(b, lhs, "the <> operator was removed in Python 3.0");
            }
        }
        Some(lhs)
    }

    fn parse_prefix(&self, b: &mut TreeBuilder<'_, '_>) -> Option<CompletedMarker> {
        match b.current() {
            TokenKind::Minus | TokenKind::Plus | TokenKind::Tilde => {
                let m = b.mark();
                b.bump();
                if self.parse_binary(b, BP_UNARY_RHS).is_none() {
                    b.error_here("expression expected");
                }
                Some(m.done(b, SyntaxKind::UnaryExpr))
            }
            TokenKind::NotKw => {
                let m = b.mark();
                b.bump();
                if self.parse_binary(b, BP_NOT_RHS).is_none() {
                    b.error_here("expression expected");
                }
                Some(m.done(b, SyntaxKind::UnaryExpr))
            }
            _ => self.parse_postfix(b),
        }
    }

    fn parse_postfix(&self, b: &mut TreeBuilder<'_, '_>) -> Option<CompletedMarker> {
        let mut cm = self.parse_atom(b)?;
        loop {
            cm = match b.current() {
                TokenKind::LParen => {
                    let m = cm.precede(b);
                    self.parse_argument_list(b);
                    m.done(b, SyntaxKind::CallExpr)
                }
                TokenKind::LBracket => {
                    let m = cm.precede(b);
                    b.bump();
                    self.parse_subscript_items(b);
                    b.expect(TokenKind::RBracket, "expected ']'");
                    m.done(b, SyntaxKind::SubscriptExpr)
                }
                TokenKind::Dot => {
                    let m = cm.precede(b);
                    b.bump();
                    if b.at(TokenKind::Ident) {
                        b.bump();
                    } else {
                        b.error_here("attribute name expected");
                    }
                    m.done(b, SyntaxKind::AttributeExpr)
                }
                _ => break,
            };
        }
        Some(cm)
    }

    fn parse_atom(&self, b: &mut TreeBuilder<'_, '_>) -> Option<CompletedMarker> {
        match b.current() {
            TokenKind::Ident => {
                let m = b.mark();
                b.bump();
                Some(m.done(b, SyntaxKind::NameExpr))
            }
            TokenKind::Int | TokenKind::Float | TokenKind::Imaginary => {
                let m = b.mark();
                b.bump();
                Some(m.done(b, SyntaxKind::LiteralExpr))
            }
            TokenKind::Str => {
                // Adjacent string literals concatenate into one node.
                let m = b.mark();
                b.bump();
                while b.at(TokenKind::Str) {
                    b.bump();
                }
                Some(m.done(b, SyntaxKind::StringLiteralExpr))
            }
            TokenKind::LParen => Some(self.parse_paren_form(b)),
            TokenKind::LBracket => Some(self.parse_list_form(b)),
            TokenKind::LBrace => Some(self.parse_brace_form(b)),
            TokenKind::Backtick => Some(self.parse_repr(b)),
            TokenKind::YieldKw => Some(self.parse_yield_expr(b)),
            TokenKind::LambdaKw => Some(self.parse_lambda(b)),
            _ => None,
        }
    }

    fn parse_paren_form(&self, b: &mut TreeBuilder<'_, '_>) -> CompletedMarker {
        let m = b.mark();
        b.bump();
        if b.at(TokenKind::RParen) {
            b.bump();
            return m.done(b, SyntaxKind::TupleExpr);
        }
        self.parse_list_item(b);
        if b.at(TokenKind::ForKw) {
            self.parse_comp_clauses(b);
            b.expect(TokenKind::RParen, "expected ')'");
            return m.done(b, SyntaxKind::GeneratorExpr);
        }
        if b.at(TokenKind::Comma) {
            while b.at(TokenKind::Comma) {
                b.bump();
                let kind = b.current();
                if kind == TokenKind::Star || self.can_begin_expression(kind) {
                    self.parse_list_item(b);
                } else {
                    break;
                }
            }
            b.expect(TokenKind::RParen, "expected ')'");
            return m.done(b, SyntaxKind::TupleExpr);
        }
        b.expect(TokenKind::RParen, "expected ')'");
        m.done(b, SyntaxKind::ParenExpr)
    }

    fn parse_list_form(&self, b: &mut TreeBuilder<'_, '_>) -> CompletedMarker {
        let m = b.mark();
        b.bump();
        if b.at(TokenKind::RBracket) {
            b.bump();
            return m.done(b, SyntaxKind::ListExpr);
        }
        self.parse_list_item(b);
        if b.at(TokenKind::ForKw) {
            self.parse_comp_clauses(b);
            b.expect(TokenKind::RBracket, "expected ']'");
            return m.done(b, SyntaxKind::ListComp);
        }
        while b.at(TokenKind::Comma) {
            b.bump();
            let kind = b.current();
            if kind == TokenKind::Star || self.can_begin_expression(kind) {
                self.parse_list_item(b);
            } else {
                break;
            }
        }
        b.expect(TokenKind::RBracket, "expected ']'");
        m.done(b, SyntaxKind::ListExpr)
    }

    fn parse_brace_form(&self, b: &mut TreeBuilder<'_, '_>) -> CompletedMarker {
        let m = b.mark();
        b.bump();
        if b.at(TokenKind::RBrace) {
            b.bump();
            return m.done(b, SyntaxKind::DictExpr);
        }
        let first = self.parse_expression(b);
        if b.at(TokenKind::Colon) {
            // Dict display or dict comprehension.
            self.parse_key_value_rest(b, first);
            if b.at(TokenKind::ForKw) {
                self.parse_comp_clauses(b);
                b.expect(TokenKind::RBrace, "expected '}'");
                let cm = m.done(b, SyntaxKind::DictComp);
                return self.gate_brace_comprehension(b, cm);
            }
            while b.at(TokenKind::Comma) {
                b.bump();
                if !self.can_begin_expression(b.current()) {
                    break;
                }
                let key = self.parse_expression(b);
                if b.at(TokenKind::Colon) {
                    self.parse_key_value_rest(b, key);
                } else {
                    b.error_here("expected ':' after dictionary key");
                }
            }
            b.expect(TokenKind::RBrace, "expected '}'");
            return m.done(b, SyntaxKind::DictExpr);
        }
        // Set display or set comprehension.
        if b.at(TokenKind::ForKw) {
            self.parse_comp_clauses(b);
            b.expect(TokenKind::RBrace, "expected '}'");
            let cm = m.done(b, SyntaxKind::SetComp);
            return self.gate_brace_comprehension(b, cm);
        }
        while b.at(TokenKind::Comma) {
            b.bump();
            if !self.can_begin_expression(b.current()) {
                break;
            }
            self.parse_expression(b);
        }
        b.expect(TokenKind::RBrace, "expected '}'");
        let cm = m.done(b, SyntaxKind::SetExpr);
        if self.level.supports_set_displays() {
            cm
        } else {
            self.unsupported(b, cm, "set displays require Python 2.7")
        }
    }

    fn gate_brace_comprehension(
        &self,
        b: &mut TreeBuilder<'_, '_>,
        cm: CompletedMarker,
    ) -> CompletedMarker {
        if self.level.supports_dict_and_set_comprehensions() {
            cm
        } else {
            self.unsupported(b, cm, "dict and set comprehensions require Python 2.7")
        }
    }

    fn parse_key_value_rest(&self, b: &mut TreeBuilder<'_, '_>, key: CompletedMarker) {
        let m = key.precede(b);
        b.bump(); // ':'
        self.parse_expression(b);
        m.done(b, SyntaxKind::KeyValuePair);
    }

    /// One or more `for target_list in iterable` clauses with interleaved
    /// `if condition` clauses.
    fn parse_comp_clauses(&self, b: &mut TreeBuilder<'_, '_>) {
        loop {
            match b.current() {
                TokenKind::ForKw => {
                    let m = b.mark();
                    b.bump();
                    self.parse_target_list(b);
                    b.expect(TokenKind::InKw, "expected 'in' in comprehension");
                    if self.parse_binary(b, 0).is_none() {
                        b.error_here("iterable expected");
                    }
                    m.done(b, SyntaxKind::CompFor);
                }
                TokenKind::IfKw => {
                    let m = b.mark();
                    b.bump();
                    if self.parse_binary(b, 0).is_none() {
                        b.error_here("condition expected");
                    }
                    m.done(b, SyntaxKind::CompIf);
                }
                _ => break,
            }
        }
    }

    fn parse_repr(&self, b: &mut TreeBuilder<'_, '_>) -> CompletedMarker {
        let m = b.mark();
        b.bump();
        self.parse_expression_list(b);
        b.expect(TokenKind::Backtick, "expected closing '`'");
        let cm = m.done(b, SyntaxKind::ReprExpr);
        if self.level.supports_backtick_repr() {
            cm
        } else {
            self.unsupported(b, cm, "backtick repr expressions were removed in Python 3.0")
        }
    }

    fn parse_yield_expr(&self, b: &mut TreeBuilder<'_, '_>) -> CompletedMarker {
        let m = b.mark();
        b.bump();
        let kind = b.current();
        if kind == TokenKind::Star || self.can_begin_expression(kind) {
            self.parse_expression_list(b);
        }
        m.done(b, SyntaxKind::YieldExpr)
    }

    fn parse_lambda(&self, b: &mut TreeBuilder<'_, '_>) -> CompletedMarker {
        let m = b.mark();
        b.bump();
        while !b.at(TokenKind::Colon) && !b.eof() {
            match b.current() {
                TokenKind::Ident => {
                    let p = b.mark();
                    b.bump();
                    if b.at(TokenKind::Assign) {
                        b.bump();
                        self.parse_expression(b);
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
                _ => {
                    let p = b.mark();
                    b.bump();
                    p.error(b, "unexpected token in lambda parameters");
                }
            }
            if b.at(TokenKind::Comma) {
                b.bump();
            } else {
                break;
            }
        }
        b.expect(TokenKind::Colon, "expected ':' after lambda parameters");
        self.parse_expression(b);
        m.done(b, SyntaxKind::LambdaExpr)
    }

    /// `'(' argument (',' argument)* ')'` as an `ArgumentList` node. Also
    /// used for class bases.
    pub fn parse_argument_list(&self, b: &mut TreeBuilder<'_, '_>) {
        let m = b.mark();
        if !b.expect(TokenKind::LParen, "expected '('") {
            m.abandon(b);
            return;
        }
        while !b.at(TokenKind::RParen) && !b.eof() {
            match b.current() {
                TokenKind::Star | TokenKind::DoubleStar => {
                    let arg = b.mark();
                    b.bump();
                    self.parse_expression(b);
                    arg.done(b, SyntaxKind::StarArgument);
                }
                TokenKind::Ident if b.nth(1) == TokenKind::Assign => {
                    let arg = b.mark();
                    b.bump();
                    b.bump();
                    self.parse_expression(b);
                    arg.done(b, SyntaxKind::KeywordArgument);
                }
                kind if self.can_begin_expression(kind) => {
                    let value = self.parse_expression(b);
                    if b.at(TokenKind::ForKw) {
                        // A bare generator expression argument.
                        let gen = value.precede(b);
                        self.parse_comp_clauses(b);
                        gen.done(b, SyntaxKind::GeneratorExpr);
                    }
                }
                _ => {
                    let bad = b.mark();
                    b.bump();
                    bad.error(b, "unexpected token in argument list");
                }
            }
            if b.at(TokenKind::Comma) {
                b.bump();
            } else {
                break;
            }
        }
        b.expect(TokenKind::RParen, "expected ')'");
        m.done(b, SyntaxKind::ArgumentList);
    }

    /// Subscript content: comma-separated indices, each either a plain
    /// expression or a slice with optional bounds and stride.
    fn parse_subscript_items(&self, b: &mut TreeBuilder<'_, '_>) {
        loop {
            let kind = b.current();
            if kind == TokenKind::RBracket || kind == TokenKind::Eof {
                break;
            }
            self.parse_subscript_item(b);
            if b.at(TokenKind::Comma) {
                b.bump();
            } else {
                break;
            }
        }
    }

    fn parse_subscript_item(&self, b: &mut TreeBuilder<'_, '_>) {
        let m = b.mark();
        let has_lower = if self.can_begin_expression(b.current()) {
            self.parse_expression(b);
            true
        } else {
            false
        };
        if b.at(TokenKind::Colon) {
            b.bump();
            if self.can_begin_expression(b.current()) {
                self.parse_expression(b);
            }
            if b.at(TokenKind::Colon) {
                b.bump();
                if self.can_begin_expression(b.current()) {
                    self.parse_expression(b);
                }
            }
            m.done(b, SyntaxKind::SliceItem);
            return;
        }
        m.abandon(b);
        if !has_lower {
            let bad = b.mark();
            b.bump();
            bad.error(b, "index or slice expected");
        }
    }

    fn unsupported(
        &self,
        b: &mut TreeBuilder<'_, '_>,
        cm: CompletedMarker,
        message: &str,
    ) -> CompletedMarker {
        cm.precede(b).error(b, message)
    }
}
