//! Incremental tree construction over the token source.
//!
//!     The builder does not build nodes while parsing. Parsing appends flat
//!     events (start, finish, token, error) to a list, and the final tree is
//!     assembled from the event list in one pass at the end. Markers are
//!     indices into the event list plus the token cursor position at the time
//!     the mark was opened, which makes the whole protocol cheap:
//!
//!         - `done(kind)` turns the mark's placeholder event into a start
//!           event and appends a finish event;
//!         - `rollback_to()` truncates the event list and rewinds the token
//!           cursor, so speculative parsing costs nothing but bookkeeping;
//!         - `error(message)` finalizes the region as an error node carrying
//!           a message, without discarding anything;
//!         - `abandon()` leaves a placeholder that the assembly pass skips.
//!
//!     `CompletedMarker::precede` supports left-recursive constructs: the
//!     completed node records a forward parent, and the assembly pass opens
//!     the parent node first even though the parser produced the child first.
//!
//!     Trivia tokens are flushed into the event list whenever the parser
//!     looks at or consumes a significant token, so the final tree carries
//!     every token of the input.
//!
//!     A marker that is dropped without being resolved is a bug in the
//!     grammar code, not a recoverable condition; `Marker` panics on drop in
//!     that case so the defect surfaces in tests.

use crate::py::parsing::source::{TokenFilter, TokenSource};
use crate::py::syntax::tree::{NodeChild, ParseDiagnostic, SyntaxNode};
use crate::py::syntax::SyntaxKind;
use crate::py::token::{TextSpan, Token, TokenKind};
use std::mem;

#[derive(Debug)]
pub(crate) enum Event {
    /// An unresolved mark, or a slot consumed by the assembly pass.
    Placeholder,
    Start {
        kind: SyntaxKind,
        /// Event index of a node that should wrap this one, recorded by
        /// `CompletedMarker::precede`.
        forward_parent: Option<u32>,
    },
    Finish,
    Token {
        raw: u32,
    },
    Error {
        message: String,
    },
}

pub struct TreeBuilder<'s, 'f> {
    src: TokenSource<'s, 'f>,
    events: Vec<Event>,
}

impl<'s, 'f> TreeBuilder<'s, 'f> {
    pub fn new(source: &'s str, tokens: Vec<Token>) -> Self {
        TreeBuilder {
            src: TokenSource::new(source, tokens),
            events: Vec::new(),
        }
    }

    /// Install the reclassification hook on the underlying token source.
    /// Must run before the first token access, including the first `eof`
    /// probe.
    pub fn set_token_filter(&mut self, filter: &'f dyn TokenFilter) {
        self.src.set_filter(filter);
    }

    fn flush_trivia(&mut self) {
        while !self.src.at_end() {
            let pos = self.src.position();
            // Trivia classification never depends on the filter, and probing
            // with the raw kind keeps the filter from seeing the next
            // significant token before the parser has set up its position
            // state.
            if !self.src.raw_kind_at(pos).is_trivia() {
                break;
            }
            self.events.push(Event::Token { raw: pos as u32 });
            self.src.advance();
        }
    }

    /// Kind of the current significant token, flushing leading trivia into
    /// the tree.
    pub fn current(&mut self) -> TokenKind {
        self.flush_trivia();
        self.src.kind_at(self.src.position())
    }

    /// Text of the current significant token.
    pub fn current_text(&mut self) -> &'s str {
        self.flush_trivia();
        self.src.text_at(self.src.position())
    }

    /// Kind of the n-th significant token ahead of the current one, without
    /// flushing anything. `nth(0)` is the current token.
    pub fn nth(&mut self, n: usize) -> TokenKind {
        let mut raw = self.src.position();
        let mut remaining = n;
        loop {
            let kind = self.src.kind_at(raw);
            if kind == TokenKind::Eof {
                return kind;
            }
            if kind.is_trivia() {
                raw += 1;
                continue;
            }
            if remaining == 0 {
                return kind;
            }
            remaining -= 1;
            raw += 1;
        }
    }

    pub fn at(&mut self, kind: TokenKind) -> bool {
        self.current() == kind
    }

    /// Raw kind of the current significant token, bypassing the filter. Only
    /// for structural checks (`Newline`, `Indent`, `Dedent`, `Eof`) that the
    /// filter can never influence; grammar dispatch must go through
    /// `current`.
    pub fn raw_current(&mut self) -> TokenKind {
        self.flush_trivia();
        self.src.raw_kind_at(self.src.position())
    }

    pub fn at_raw(&mut self, kind: TokenKind) -> bool {
        self.raw_current() == kind
    }

    pub fn eof(&mut self) -> bool {
        self.flush_trivia();
        self.src.at_end()
    }

    /// Consume the current significant token into the tree.
    pub fn bump(&mut self) {
        self.flush_trivia();
        if self.src.at_end() {
            debug_assert!(false, "bump at end of input");
            return;
        }
        // Make sure the filter ran before the token is consumed structurally.
        let pos = self.src.position();
        self.src.kind_at(pos);
        self.events.push(Event::Token { raw: pos as u32 });
        self.src.advance();
    }

    /// Consume the current token if it has the expected kind; otherwise emit
    /// a zero-token error node and leave the token alone.
    pub fn expect(&mut self, kind: TokenKind, message: &str) -> bool {
        if self.at(kind) {
            self.bump();
            true
        } else {
            self.error_here(message);
            false
        }
    }

    /// Emit an error node covering zero tokens at the current position, so
    /// that a missing construct never swallows unrelated following tokens.
    pub fn error_here(&mut self, message: &str) -> CompletedMarker {
        let marker = self.mark();
        marker.error(self, message)
    }

    /// Open a marker at the current position.
    pub fn mark(&mut self) -> Marker {
        let event_idx = self.events.len() as u32;
        self.events.push(Event::Placeholder);
        Marker::new(event_idx, self.src.position() as u32)
    }

    /// Assemble the final tree from the event list. Every token must have
    /// been consumed and every marker resolved by now.
    pub fn finish(mut self) -> (SyntaxNode, Vec<ParseDiagnostic>) {
        debug_assert!(self.src.at_end(), "tokens remain unconsumed at finish");
        let tokens = self.src.into_tokens();

        struct Frame {
            kind: SyntaxKind,
            start: u32,
            children: Vec<NodeChild>,
            error_messages: Vec<String>,
        }

        let mut stack: Vec<Frame> = Vec::new();
        let mut diagnostics: Vec<ParseDiagnostic> = Vec::new();
        let mut result: Option<SyntaxNode> = None;
        let mut text_pos: u32 = 0;

        for i in 0..self.events.len() {
            match mem::replace(&mut self.events[i], Event::Placeholder) {
                Event::Placeholder => {}
                Event::Start {
                    kind,
                    forward_parent,
                } => {
                    // Collect the forward-parent chain; outermost last.
                    let mut kinds = vec![kind];
                    let mut fp = forward_parent;
                    while let Some(idx) = fp {
                        fp = match mem::replace(&mut self.events[idx as usize], Event::Placeholder)
                        {
                            Event::Start {
                                kind,
                                forward_parent,
                            } => {
                                kinds.push(kind);
                                forward_parent
                            }
                            // An abandoned precede marker ends the chain.
                            Event::Placeholder => None,
                            _ => panic!("forward parent does not point at a start event"),
                        };
                    }
                    for kind in kinds.into_iter().rev() {
                        stack.push(Frame {
                            kind,
                            start: text_pos,
                            children: Vec::new(),
                            error_messages: Vec::new(),
                        });
                    }
                }
                Event::Finish => {
                    let frame = stack.pop().expect("finish event without matching start");
                    let span = TextSpan {
                        start: frame.start,
                        end: text_pos,
                    };
                    for message in frame.error_messages {
                        diagnostics.push(ParseDiagnostic { message, span });
                    }
                    let node = SyntaxNode::new(frame.kind, span, frame.children);
                    match stack.last_mut() {
                        Some(parent) => parent.children.push(NodeChild::Node(node)),
                        None => {
                            debug_assert!(result.is_none(), "more than one root node");
                            result = Some(node);
                        }
                    }
                }
                Event::Token { raw } => {
                    let token = tokens[raw as usize];
                    text_pos = token.span.end;
                    stack
                        .last_mut()
                        .expect("token event outside any node")
                        .children
                        .push(NodeChild::Token(token));
                }
                Event::Error { message } => {
                    stack
                        .last_mut()
                        .expect("error event outside any node")
                        .error_messages
                        .push(message);
                }
            }
        }

        assert!(stack.is_empty(), "unbalanced start/finish events");
        (result.expect("no root node was produced"), diagnostics)
    }
}

/// Handle for a not-yet-finalized region of the tree. Must be resolved by
/// exactly one of `done`, `error`, `abandon`, or `rollback_to` before it goes
/// out of scope.
pub struct Marker {
    event_idx: u32,
    start_pos: u32,
    live: bool,
}

impl Marker {
    fn new(event_idx: u32, start_pos: u32) -> Self {
        Marker {
            event_idx,
            start_pos,
            live: true,
        }
    }

    /// Wrap everything produced since the mark into one node of `kind`.
    pub fn done(mut self, b: &mut TreeBuilder<'_, '_>, kind: SyntaxKind) -> CompletedMarker {
        self.live = false;
        b.events[self.event_idx as usize] = Event::Start {
            kind,
            forward_parent: None,
        };
        b.events.push(Event::Finish);
        CompletedMarker {
            event_idx: self.event_idx,
            start_pos: self.start_pos,
        }
    }

    /// Wrap everything produced since the mark into an error node carrying
    /// `message`. The region may cover zero tokens.
    pub fn error(
        mut self,
        b: &mut TreeBuilder<'_, '_>,
        message: impl Into<String>,
    ) -> CompletedMarker {
        self.live = false;
        b.events[self.event_idx as usize] = Event::Start {
            kind: SyntaxKind::ErrorNode,
            forward_parent: None,
        };
        b.events.push(Event::Error {
            message: message.into(),
        });
        b.events.push(Event::Finish);
        CompletedMarker {
            event_idx: self.event_idx,
            start_pos: self.start_pos,
        }
    }

    /// Discard everything produced since the mark and rewind the token
    /// cursor, so the tokens can be re-parsed by an alternative rule. Must
    /// not be called on a marker created by `precede`.
    pub fn rollback_to(mut self, b: &mut TreeBuilder<'_, '_>) {
        self.live = false;
        b.events.truncate(self.event_idx as usize);
        b.src.rewind(self.start_pos as usize);
    }

    /// Discard the handle without affecting structure; whatever was produced
    /// since the mark stays where it is. The slot stays a placeholder rather
    /// than being popped, because a forward parent recorded by `precede` may
    /// reference this index; the assembly pass skips placeholders.
    pub fn abandon(mut self, _b: &mut TreeBuilder<'_, '_>) {
        self.live = false;
    }
}

impl Drop for Marker {
    fn drop(&mut self) {
        if self.live && !std::thread::panicking() {
            panic!("marker dropped without done/error/abandon/rollback");
        }
    }
}

/// A finalized region. Can still be wrapped from the outside via `precede`.
#[derive(Debug, Clone, Copy)]
pub struct CompletedMarker {
    event_idx: u32,
    start_pos: u32,
}

impl CompletedMarker {
    /// Open a new marker that will wrap this completed node once done. The
    /// wrapping node starts where this node started, which is how postfix
    /// chains grow leftward without recursion.
    pub fn precede(self, b: &mut TreeBuilder<'_, '_>) -> Marker {
        let new_idx = b.events.len() as u32;
        b.events.push(Event::Placeholder);
        match &mut b.events[self.event_idx as usize] {
            Event::Start { forward_parent, .. } => *forward_parent = Some(new_idx),
            _ => panic!("completed marker does not point at a start event"),
        }
        Marker::new(new_idx, self.start_pos)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::py::lexing::tokenize;

    fn builder(source: &str) -> TreeBuilder<'_, 'static> {
        TreeBuilder::new(source, tokenize(source))
    }

    fn consume_all(b: &mut TreeBuilder<'_, '_>) {
        while !b.eof() {
            b.bump();
        }
    }

    #[test]
    fn test_done_wraps_tokens_since_mark() {
        let source = "x\n";
        let mut b = builder(source);
        let root = b.mark();
        let m = b.mark();
        b.bump(); // x
        m.done(&mut b, SyntaxKind::NameExpr);
        consume_all(&mut b);
        root.done(&mut b, SyntaxKind::Module);
        let (tree, diagnostics) = b.finish();
        assert!(diagnostics.is_empty());
        assert_eq!(tree.kind, SyntaxKind::Module);
        let name = tree.first_child_of_kind(SyntaxKind::NameExpr).unwrap();
        assert_eq!(name.text(source), "x");
    }

    #[test]
    fn test_rollback_restores_cursor_position() {
        let source = "a b\n";
        let mut b = builder(source);
        let root = b.mark();
        let before = b.current();
        let m = b.mark();
        b.bump();
        b.bump();
        m.rollback_to(&mut b);
        assert_eq!(b.current(), before);
        consume_all(&mut b);
        root.done(&mut b, SyntaxKind::Module);
        let (tree, _) = b.finish();
        // Every token still ends up in the tree exactly once.
        assert_eq!(tree.text(source), source);
    }

    #[test]
    fn test_precede_wraps_completed_node() {
        let source = "a.b\n";
        let mut b = builder(source);
        let root = b.mark();
        let m = b.mark();
        b.bump(); // a
        let name = m.done(&mut b, SyntaxKind::NameExpr);
        let attr = name.precede(&mut b);
        b.bump(); // .
        b.bump(); // b
        attr.done(&mut b, SyntaxKind::AttributeExpr);
        consume_all(&mut b);
        root.done(&mut b, SyntaxKind::Module);
        let (tree, _) = b.finish();
        let attr = tree.first_child_of_kind(SyntaxKind::AttributeExpr).unwrap();
        assert_eq!(attr.text(source), "a.b");
        let inner = attr.first_child_of_kind(SyntaxKind::NameExpr).unwrap();
        assert_eq!(inner.text(source), "a");
    }

    #[test]
    fn test_error_marker_produces_error_node_and_diagnostic() {
        let source = "x\n";
        let mut b = builder(source);
        let root = b.mark();
        b.error_here("expression expected");
        consume_all(&mut b);
        root.done(&mut b, SyntaxKind::Module);
        let (tree, diagnostics) = b.finish();
        assert_eq!(diagnostics.len(), 1);
        assert_eq!(diagnostics[0].message, "expression expected");
        let error = tree.first_child_of_kind(SyntaxKind::ErrorNode).unwrap();
        assert!(error.span.is_empty());
    }

    #[test]
    fn test_abandoned_precede_leaves_structure_intact() {
        let source = "a\n";
        let mut b = builder(source);
        let root = b.mark();
        let m = b.mark();
        b.bump();
        let name = m.done(&mut b, SyntaxKind::NameExpr);
        let wrapper = name.precede(&mut b);
        wrapper.abandon(&mut b);
        consume_all(&mut b);
        root.done(&mut b, SyntaxKind::Module);
        let (tree, _) = b.finish();
        assert!(tree.first_child_of_kind(SyntaxKind::NameExpr).is_some());
    }

    #[test]
    #[should_panic(expected = "marker dropped")]
    fn test_unresolved_marker_panics() {
        let source = "x\n";
        let mut b = builder(source);
        let _root = b.mark();
    }
}
