//! Core data model: content-types, the part tree, addresses, and the output document.

pub mod address;
pub mod content_type;
pub mod document;
pub mod message;
pub mod part;
