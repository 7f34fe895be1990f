//! Output formats for inspecting trees: detokenization and treeviz.

pub mod detokenizer;
pub mod treeviz;

pub use detokenizer::detokenize;
pub use treeviz::to_treeviz;
