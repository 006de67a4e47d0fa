//! Document building: part classification, body normalization, the tree
//! walk, and document assembly.

pub mod assemble;
pub mod classify;
pub mod normalize;
pub mod walker;

pub use assemble::{convert, convert_with_sink, DocumentOptions};
