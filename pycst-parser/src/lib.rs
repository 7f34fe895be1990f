//! # pycst-parser
//!
//! A lossless concrete-syntax-tree parser for Python dialects, legacy (2.x)
//! and modern (3.x).
//!
//! Every token of the input, trivia included, survives as a leaf of the
//! produced tree, so the tree serves both semantic analysis and exact source
//! reproduction. Malformed input never aborts a parse: unparsable regions
//! become error nodes and parsing continues, which is what editor-grade
//! tooling needs.
//!
//! The grammar generation is selected per parse with a
//! [language level](py::LanguageLevel). Forms that exist only on some levels
//! are still parsed on the others, wrapped in an error node naming the
//! level, so nothing is silently dropped.

pub mod py;
