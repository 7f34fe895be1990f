//! Stream transformations applied after base tokenization.

pub mod logical_lines;
pub mod semantic_indentation;
