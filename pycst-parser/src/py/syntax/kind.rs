//! Node kinds of the concrete syntax tree.

use serde::Serialize;
use std::fmt;

/// Every kind of interior node the parser can produce. Leaves are tokens and
/// carry a `TokenKind` instead.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum SyntaxKind {
    Module,

    // Simple statements
    ExpressionStatement,
    AssignmentStatement,
    AugAssignmentStatement,
    PrintStatement,
    DelStatement,
    PassStatement,
    BreakStatement,
    ContinueStatement,
    ReturnStatement,
    RaiseStatement,
    ImportStatement,
    FromImportStatement,
    ImportElement,
    DottedName,
    GlobalStatement,
    NonlocalStatement,
    ExecStatement,
    AssertStatement,

    // Compound statements
    IfStatement,
    WhileStatement,
    ForStatement,
    TryStatement,
    TryClause,
    ExceptClause,
    ElseClause,
    FinallyClause,
    WithStatement,
    WithItem,
    FunctionDef,
    ClassDef,
    DecoratorList,
    Decorator,
    ParameterList,
    Parameter,
    TupleParameter,
    Annotation,
    Suite,

    // Expressions
    NameExpr,
    LiteralExpr,
    StringLiteralExpr,
    TupleExpr,
    ParenExpr,
    ListExpr,
    DictExpr,
    SetExpr,
    KeyValuePair,
    ListComp,
    SetComp,
    DictComp,
    GeneratorExpr,
    CompFor,
    CompIf,
    CallExpr,
    ArgumentList,
    KeywordArgument,
    StarArgument,
    AttributeExpr,
    SubscriptExpr,
    SliceItem,
    BinaryExpr,
    UnaryExpr,
    LambdaExpr,
    ConditionalExpr,
    YieldExpr,
    ReprExpr,
    StarExpr,

    /// A region that failed to parse, or parsed but is illegal for the active
    /// language level. The region's tokens are kept as children.
    ErrorNode,
}

impl SyntaxKind {
    pub fn is_statement(self) -> bool {
        matches!(
            self,
            SyntaxKind::ExpressionStatement
                | SyntaxKind::AssignmentStatement
                | SyntaxKind::AugAssignmentStatement
                | SyntaxKind::PrintStatement
                | SyntaxKind::DelStatement
                | SyntaxKind::PassStatement
                | SyntaxKind::BreakStatement
                | SyntaxKind::ContinueStatement
                | SyntaxKind::ReturnStatement
                | SyntaxKind::RaiseStatement
                | SyntaxKind::ImportStatement
                | SyntaxKind::FromImportStatement
                | SyntaxKind::GlobalStatement
                | SyntaxKind::NonlocalStatement
                | SyntaxKind::ExecStatement
                | SyntaxKind::AssertStatement
                | SyntaxKind::IfStatement
                | SyntaxKind::WhileStatement
                | SyntaxKind::ForStatement
                | SyntaxKind::TryStatement
                | SyntaxKind::WithStatement
                | SyntaxKind::FunctionDef
                | SyntaxKind::ClassDef
        )
    }

    pub fn is_expression(self) -> bool {
        matches!(
            self,
            SyntaxKind::NameExpr
                | SyntaxKind::LiteralExpr
                | SyntaxKind::StringLiteralExpr
                | SyntaxKind::TupleExpr
                | SyntaxKind::ParenExpr
                | SyntaxKind::ListExpr
                | SyntaxKind::DictExpr
                | SyntaxKind::SetExpr
                | SyntaxKind::ListComp
                | SyntaxKind::SetComp
                | SyntaxKind::DictComp
                | SyntaxKind::GeneratorExpr
                | SyntaxKind::CallExpr
                | SyntaxKind::AttributeExpr
                | SyntaxKind::SubscriptExpr
                | SyntaxKind::BinaryExpr
                | SyntaxKind::UnaryExpr
                | SyntaxKind::LambdaExpr
                | SyntaxKind::ConditionalExpr
                | SyntaxKind::YieldExpr
                | SyntaxKind::ReprExpr
                | SyntaxKind::StarExpr
        )
    }
}

impl fmt::Display for SyntaxKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}", self)
    }
}
