//! Semantic descriptors attached to tree nodes by later analysis stages.
//!
//!     `Maybe` is the tri-state wrapper these descriptors need: an analysis
//!     can either determine a value (including determining that it is
//!     absent) or fail to determine anything, and the two must not be
//!     conflated. `Option` alone cannot express "defined as absent" next to
//!     "unknown".

use pycst_parser::py::syntax::{NodeChild, SyntaxKind, SyntaxNode};
use pycst_parser::py::token::{TextSpan, TokenKind};
use std::fmt;

/// A value that may be defined or not, where a defined value can itself be
/// meaningful absence. Instances are immutable.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Maybe<T> {
    Undefined,
    Defined(T),
}

impl<T> Maybe<T> {
    pub fn is_defined(&self) -> bool {
        matches!(self, Maybe::Defined(_))
    }

    /// The value if defined.
    pub fn as_option(&self) -> Option<&T> {
        match self {
            Maybe::Defined(value) => Some(value),
            Maybe::Undefined => None,
        }
    }

    /// The value; panics when undefined.
    pub fn value(&self) -> &T {
        match self {
            Maybe::Defined(value) => value,
            Maybe::Undefined => panic!("accessing undefined value of Maybe"),
        }
    }
}

impl<T: fmt::Display> fmt::Display for Maybe<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Maybe::Undefined => write!(f, "?_"),
            Maybe::Defined(value) => write!(f, "?({})", value),
        }
    }
}

/// The type of `None`. A singleton: member resolution never succeeds and the
/// name is fixed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NoneType;

impl NoneType {
    pub fn instance() -> &'static NoneType {
        static INSTANCE: NoneType = NoneType;
        &INSTANCE
    }

    pub fn name(&self) -> &'static str {
        "None"
    }

    pub fn resolve_member(&self, _name: &str) -> Maybe<String> {
        Maybe::Undefined
    }
}

/// One accessor slot of a property: the name of the function filling the
/// slot, `None` when the slot is explicitly empty, or undefined when the
/// argument was something the analysis cannot name.
pub type Accessor = Maybe<Option<String>>;

/// A property descriptor recovered from a `name = property(...)` assignment.
/// This is a description of the tree, not part of it.
#[derive(Debug, Clone, PartialEq)]
pub struct Property {
    getter: Accessor,
    setter: Accessor,
    deleter: Accessor,
    doc: Option<String>,
    definition_span: TextSpan,
}

impl Property {
    /// Recover a property descriptor from an assignment statement of the
    /// form `name = property(fget, fset, fdel, doc)`, positional or keyword.
    /// Returns `None` when the statement is not such an assignment.
    pub fn from_assignment(node: &SyntaxNode, source: &str) -> Option<Property> {
        if node.kind != SyntaxKind::AssignmentStatement {
            return None;
        }
        let call = node
            .child_nodes()
            .find(|child| child.kind == SyntaxKind::CallExpr)?;
        let callee = call.child_nodes().next()?;
        if callee.kind != SyntaxKind::NameExpr || callee.text(source) != "property" {
            return None;
        }
        let arguments = call.first_child_of_kind(SyntaxKind::ArgumentList)?;

        let mut slots: [Accessor; 3] = [Maybe::Defined(None), Maybe::Defined(None), Maybe::Defined(None)];
        let mut doc = None;
        let mut positional = 0usize;
        for argument in arguments.children.iter() {
            match argument {
                NodeChild::Node(node) if node.kind == SyntaxKind::KeywordArgument => {
                    let keyword = node
                        .child_tokens()
                        .find(|t| t.kind == TokenKind::Ident)
                        .map(|t| t.text(source));
                    let value = node.child_nodes().next();
                    match keyword {
                        Some("fget") => slots[0] = accessor_from(value, source),
                        Some("fset") => slots[1] = accessor_from(value, source),
                        Some("fdel") => slots[2] = accessor_from(value, source),
                        Some("doc") => doc = doc_from(value, source),
                        _ => {}
                    }
                }
                NodeChild::Node(node) if node.kind.is_expression() => {
                    match positional {
                        0 => slots[0] = accessor_from(Some(node), source),
                        1 => slots[1] = accessor_from(Some(node), source),
                        2 => slots[2] = accessor_from(Some(node), source),
                        3 => doc = doc_from(Some(node), source),
                        _ => {}
                    }
                    positional += 1;
                }
                _ => {}
            }
        }

        let [getter, setter, deleter] = slots;
        Some(Property {
            getter,
            setter,
            deleter,
            doc,
            definition_span: node.span,
        })
    }

    pub fn getter(&self) -> &Accessor {
        &self.getter
    }

    pub fn setter(&self) -> &Accessor {
        &self.setter
    }

    pub fn deleter(&self) -> &Accessor {
        &self.deleter
    }

    pub fn doc(&self) -> Option<&str> {
        self.doc.as_deref()
    }

    /// Span of the assignment the property was recovered from.
    pub fn definition_span(&self) -> TextSpan {
        self.definition_span
    }
}

fn accessor_from(value: Option<&SyntaxNode>, source: &str) -> Accessor {
    match value {
        None => Maybe::Defined(None),
        Some(node) if node.kind == SyntaxKind::NameExpr => {
            let name = node.text(source);
            if name == "None" {
                Maybe::Defined(None)
            } else {
                Maybe::Defined(Some(name.to_string()))
            }
        }
        Some(_) => Maybe::Undefined,
    }
}

fn doc_from(value: Option<&SyntaxNode>, source: &str) -> Option<String> {
    let node = value?;
    if node.kind != SyntaxKind::StringLiteralExpr {
        return None;
    }
    Some(strip_quotes(node.text(source)).to_string())
}

fn strip_quotes(text: &str) -> &str {
    for quote in ["'''", "\"\"\"", "'", "\""] {
        if let Some(inner) = text
            .strip_prefix(quote)
            .and_then(|rest| rest.strip_suffix(quote))
        {
            return inner;
        }
    }
    text
}

#[cfg(test)]
mod tests {
    use super::*;
    use pycst_parser::py::parsing::parse_module;

    fn property_from(source: &str) -> Option<Property> {
        let result = parse_module(source);
        let assignment = result
            .root
            .first_child_of_kind(SyntaxKind::AssignmentStatement)?
            .clone();
        Property::from_assignment(&assignment, source)
    }

    #[test]
    fn test_maybe_display() {
        let undefined: Maybe<i32> = Maybe::Undefined;
        assert_eq!(undefined.to_string(), "?_");
        assert_eq!(Maybe::Defined(3).to_string(), "?(3)");
    }

    #[test]
    #[should_panic(expected = "undefined value")]
    fn test_maybe_value_panics_when_undefined() {
        let undefined: Maybe<i32> = Maybe::Undefined;
        undefined.value();
    }

    #[test]
    fn test_none_type_singleton() {
        let none = NoneType::instance();
        assert_eq!(none.name(), "None");
        assert_eq!(none.resolve_member("anything"), Maybe::Undefined);
    }

    #[test]
    fn test_positional_property() {
        let property = property_from("x = property(get_x, set_x)\n").unwrap();
        assert_eq!(property.getter().as_option().unwrap().as_deref(), Some("get_x"));
        assert_eq!(property.setter().as_option().unwrap().as_deref(), Some("set_x"));
        assert_eq!(property.deleter(), &Maybe::Defined(None));
    }

    #[test]
    fn test_keyword_property_with_doc() {
        let property = property_from("x = property(fget=get_x, doc='the x')\n").unwrap();
        assert_eq!(property.getter().as_option().unwrap().as_deref(), Some("get_x"));
        assert_eq!(property.doc(), Some("the x"));
    }

    #[test]
    fn test_explicit_none_slot_is_defined_absence() {
        let property = property_from("x = property(None, set_x)\n").unwrap();
        assert_eq!(property.getter(), &Maybe::Defined(None));
    }

    #[test]
    fn test_unnameable_accessor_is_undefined() {
        let property = property_from("x = property(lambda self: 1)\n").unwrap();
        assert_eq!(property.getter(), &Maybe::Undefined);
    }

    #[test]
    fn test_non_property_assignment_is_ignored() {
        assert!(property_from("x = compute()\n").is_none());
    }
}
