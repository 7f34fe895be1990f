//! Resource-lifecycle checking: opened in a try block, closed in a finally
//! block.
//!
//!     For every call whose callee matches the configured factory set, the
//!     checker requires that the call is the right-hand side of a direct
//!     assignment to a simple name, and that some enclosing try statement
//!     both protects the allocation in its try clause and closes the bound
//!     name in its finally clause. Try statements that fail either condition
//!     are skipped and the walk continues outward, so a finally on an outer
//!     try discharges an allocation in an inner one.
//!
//!     The close match is deliberately conservative: a call of the form
//!     `name.close(...)` where the receiver is exactly the assigned name.
//!     Reassignments, aliases, and helper functions that close the resource
//!     are not tracked; changing that would change which code is flagged, so
//!     the behavior is kept as-is.

use pycst_parser::py::syntax::{SyntaxKind, SyntaxNode};
use pycst_parser::py::token::{TextSpan, TokenKind};
use std::fmt;

/// A flagged allocation site.
#[derive(Debug, Clone, PartialEq)]
pub struct ResourceDiagnostic {
    pub message: String,
    pub span: TextSpan,
}

impl fmt::Display for ResourceDiagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.span, self.message)
    }
}

pub struct ResourceChecker {
    factories: Vec<String>,
}

impl ResourceChecker {
    /// Checker for the default factory set.
    pub fn new() -> Self {
        ResourceChecker {
            factories: vec!["open".to_string()],
        }
    }

    /// Checker for an explicit factory set. A bare call `f(...)` matches
    /// when `f` is in the set; a method call `x.f(...)` matches on `f`.
    pub fn with_factories<I, S>(factories: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        ResourceChecker {
            factories: factories.into_iter().map(Into::into).collect(),
        }
    }

    /// Walk the tree rooted at `root` and report every allocation that is
    /// not safely closed.
    pub fn check(&self, root: &SyntaxNode, source: &str) -> Vec<ResourceDiagnostic> {
        let mut diagnostics = Vec::new();
        let mut ancestors = Vec::new();
        self.visit(root, source, &mut ancestors, &mut diagnostics);
        diagnostics
    }

    fn visit<'a>(
        &self,
        node: &'a SyntaxNode,
        source: &str,
        ancestors: &mut Vec<&'a SyntaxNode>,
        diagnostics: &mut Vec<ResourceDiagnostic>,
    ) {
        if node.kind == SyntaxKind::CallExpr {
            if let Some(name) = self.factory_name(node, source) {
                self.check_allocation(node, name, source, ancestors, diagnostics);
            }
        }
        ancestors.push(node);
        for child in node.child_nodes() {
            self.visit(child, source, ancestors, diagnostics);
        }
        ancestors.pop();
    }

    /// The factory name this call matches, if any.
    fn factory_name<'s>(&self, call: &SyntaxNode, source: &'s str) -> Option<&'s str> {
        let callee = call.child_nodes().next()?;
        let name = match callee.kind {
            SyntaxKind::NameExpr => callee.text(source),
            SyntaxKind::AttributeExpr => attribute_name(callee, source)?,
            _ => return None,
        };
        if self.factories.iter().any(|f| f == name) {
            Some(name)
        } else {
            None
        }
    }

    fn check_allocation(
        &self,
        call: &SyntaxNode,
        factory: &str,
        source: &str,
        ancestors: &[&SyntaxNode],
        diagnostics: &mut Vec<ResourceDiagnostic>,
    ) {
        let flag = |diagnostics: &mut Vec<ResourceDiagnostic>| {
            diagnostics.push(ResourceDiagnostic {
                message: format!(
                    "{} result should be opened in a try block and closed in a finally block",
                    factory
                ),
                span: call.span,
            });
        };

        let parent = match ancestors.last() {
            Some(parent) => *parent,
            None => return,
        };
        if parent.kind != SyntaxKind::AssignmentStatement || !is_rhs_of_assignment(parent, call) {
            flag(diagnostics);
            return;
        }
        // Only direct assignment to a simple name is tracked; anything else
        // is skipped rather than guessed at.
        let target = match parent.child_nodes().next() {
            Some(target) if target.kind == SyntaxKind::NameExpr => target,
            _ => return,
        };
        let bound_name = target.text(source);

        for ancestor in ancestors.iter().rev() {
            if ancestor.kind != SyntaxKind::TryStatement {
                continue;
            }
            if try_discharges(ancestor, call.span, bound_name, source) {
                return;
            }
        }
        flag(diagnostics);
    }
}

impl Default for ResourceChecker {
    fn default() -> Self {
        Self::new()
    }
}

/// Whether `call` sits after the first `=` of the assignment, i.e. on the
/// right-hand side.
fn is_rhs_of_assignment(assignment: &SyntaxNode, call: &SyntaxNode) -> bool {
    assignment
        .child_tokens()
        .find(|t| t.kind == TokenKind::Assign)
        .map(|assign| call.span.start >= assign.span.end)
        .unwrap_or(false)
}

/// Whether `try_stmt` protects `span` in its try clause and closes
/// `bound_name` in its finally clause.
fn try_discharges(try_stmt: &SyntaxNode, span: TextSpan, bound_name: &str, source: &str) -> bool {
    let finally = match try_stmt.first_child_of_kind(SyntaxKind::FinallyClause) {
        Some(clause) => clause,
        None => return false,
    };
    let protected = match try_stmt.first_child_of_kind(SyntaxKind::TryClause) {
        Some(clause) => clause,
        None => return false,
    };
    if !protected.contains_span(span) {
        return false;
    }
    contains_close_call(finally, bound_name, source)
}

/// Recursive search for `bound_name.close(...)` anywhere under `node`.
fn contains_close_call(node: &SyntaxNode, bound_name: &str, source: &str) -> bool {
    if node.kind == SyntaxKind::CallExpr {
        if let Some(callee) = node.child_nodes().next() {
            if callee.kind == SyntaxKind::AttributeExpr
                && attribute_name(callee, source) == Some("close")
            {
                if let Some(receiver) = callee.child_nodes().next() {
                    if receiver.kind == SyntaxKind::NameExpr && receiver.text(source) == bound_name
                    {
                        return true;
                    }
                }
            }
        }
    }
    node.child_nodes()
        .any(|child| contains_close_call(child, bound_name, source))
}

/// The attribute name of an `AttributeExpr`, i.e. the identifier after the
/// last dot.
fn attribute_name<'s>(attr: &SyntaxNode, source: &'s str) -> Option<&'s str> {
    attr.child_tokens()
        .filter(|t| t.kind == TokenKind::Ident)
        .last()
        .map(|t| t.text(source))
}

#[cfg(test)]
mod tests {
    use super::*;
    use pycst_parser::py::parsing::parse_module;

    fn check(source: &str) -> Vec<ResourceDiagnostic> {
        let result = parse_module(source);
        assert!(
            result.diagnostics.is_empty(),
            "fixture should parse cleanly: {:?}",
            result.diagnostics
        );
        ResourceChecker::new().check(&result.root, source)
    }

    #[test]
    fn test_open_closed_in_finally_is_clean() {
        let source = "\
try:
    f = open(path)
finally:
    f.close()
";
        assert!(check(source).is_empty());
    }

    #[test]
    fn test_open_without_finally_is_flagged() {
        let source = "\
try:
    f = open(path)
except IOError:
    pass
";
        let diagnostics = check(source);
        assert_eq!(diagnostics.len(), 1);
        assert!(diagnostics[0].message.contains("finally"));
    }

    #[test]
    fn test_outer_try_discharges_inner_allocation() {
        let source = "\
try:
    try:
        f = open(path)
    except IOError:
        pass
finally:
    f.close()
";
        assert!(check(source).is_empty());
    }

    #[test]
    fn test_close_of_other_name_does_not_discharge() {
        let source = "\
try:
    f = open(path)
finally:
    g.close()
";
        assert_eq!(check(source).len(), 1);
    }

    #[test]
    fn test_unassigned_allocation_is_flagged() {
        let source = "open(path)\n";
        assert_eq!(check(source).len(), 1);
    }

    #[test]
    fn test_allocation_in_finally_is_not_protected() {
        // The allocation must be inside the try clause, not just anywhere
        // inside the try statement.
        let source = "\
try:
    pass
finally:
    f = open(path)
    f.close()
";
        let diagnostics = check(source);
        assert_eq!(diagnostics.len(), 1);
    }

    #[test]
    fn test_attribute_assignment_is_skipped() {
        // Not a simple name; the conservative checker stays silent.
        let source = "self.f = open(path)\n";
        assert!(check(source).is_empty());
    }

    #[test]
    fn test_method_factories_match_on_attribute_name() {
        let source = "\
e = ctx.list_bindings(name)
";
        let checker = ResourceChecker::with_factories(["list_bindings"]);
        let result = parse_module(source);
        let diagnostics = checker.check(&result.root, source);
        assert_eq!(diagnostics.len(), 1);
    }

    #[test]
    fn test_close_via_alias_is_not_tracked() {
        // Conservative by design: the alias is not followed.
        let source = "\
try:
    f = open(path)
    g = f
finally:
    g.close()
";
        let diagnostics = check(source);
        assert_eq!(diagnostics.len(), 1);
    }
}
