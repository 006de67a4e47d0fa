//! `mail2es` — turn one RFC 5322 email message into a flat JSON document
//! ready for a full-text search index.
//!
//! The header fields become `from`, `to`, `subject` and `date`; every
//! leaf MIME part becomes a `part-<depth>.<rank>` entry holding either
//! UTF-8 text (`body`) or base64 octets (`file`).

pub mod config;
pub mod error;
pub mod index;
pub mod model;
pub mod parser;

pub use index::assemble::{convert, convert_with_sink, DocumentOptions};
