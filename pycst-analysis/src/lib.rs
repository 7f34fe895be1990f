//! # pycst-analysis
//!
//! Read-only analyses over the trees produced by `pycst-parser`.
//!
//! The resource checker walks a parsed module looking for resource
//! allocations that are not closed in a guaranteed cleanup path, relying on
//! the parser's precise try/except/else/finally clause nesting. The types
//! module carries the small semantic descriptors later analysis stages
//! attach to tree nodes.

pub mod resources;
pub mod types;

pub use resources::{ResourceChecker, ResourceDiagnostic};
pub use types::{Maybe, NoneType, Property};
