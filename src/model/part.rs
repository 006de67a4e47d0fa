//! The MIME part tree handed to the indexer.
//!
//! This is a crate-owned snapshot of what the MIME parser produced: every
//! node carries its content-type and optional filename, and leaf bodies are
//! already content-transfer decoded.

use super::content_type::ContentType;

/// One node of a message's content tree.
#[derive(Debug, Clone, PartialEq)]
pub struct Part {
    /// Declared content-type. `None` when the header is missing or malformed.
    pub content_type: Option<ContentType>,
    /// Attachment filename, from Content-Disposition or the `name` parameter.
    pub filename: Option<String>,
    /// What kind of node this is, and its payload.
    pub body: PartBody,
}

/// The four part variants, plus a catch-all for nodes the parser could not
/// classify or decode.
#[derive(Debug, Clone, PartialEq)]
pub enum PartBody {
    /// An embedded message (`message/rfc822` and friends). Holds the
    /// embedded message's root part.
    Container(Box<Part>),
    /// A `message/partial` fragment. Never reassembled.
    Partial,
    /// A `multipart/*` node with its children in order.
    Multipart(Vec<Part>),
    /// A body-carrying part with its transfer-decoded octets.
    Leaf(Vec<u8>),
    /// Anything else.
    Unknown,
}

/// Payload-free discriminant of [`PartBody`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PartKind {
    Container,
    Partial,
    Multipart,
    Leaf,
    Unknown,
}

impl Part {
    /// A leaf part.
    pub fn leaf(content_type: ContentType, octets: impl Into<Vec<u8>>) -> Self {
        Self {
            content_type: Some(content_type),
            filename: None,
            body: PartBody::Leaf(octets.into()),
        }
    }

    /// A multipart node of the given subtype.
    pub fn multipart(subtype: &str, children: Vec<Part>) -> Self {
        Self {
            content_type: Some(ContentType::new("multipart", subtype)),
            filename: None,
            body: PartBody::Multipart(children),
        }
    }

    /// An embedded `message/rfc822` wrapping `inner`.
    pub fn container(inner: Part) -> Self {
        Self {
            content_type: Some(ContentType::new("message", "rfc822")),
            filename: None,
            body: PartBody::Container(Box::new(inner)),
        }
    }

    /// Attach a filename (builder style).
    pub fn named(mut self, filename: &str) -> Self {
        self.filename = Some(filename.to_string());
        self
    }

    pub fn kind(&self) -> PartKind {
        match self.body {
            PartBody::Container(_) => PartKind::Container,
            PartBody::Partial => PartKind::Partial,
            PartBody::Multipart(_) => PartKind::Multipart,
            PartBody::Leaf(_) => PartKind::Leaf,
            PartBody::Unknown => PartKind::Unknown,
        }
    }

    /// `true` for nodes that open a new nesting level (multipart or
    /// embedded message).
    pub fn is_nesting(&self) -> bool {
        matches!(self.kind(), PartKind::Multipart | PartKind::Container)
    }

    /// `true` when this node is `multipart/alternative`.
    pub fn is_alternative(&self) -> bool {
        self.content_type
            .as_ref()
            .is_some_and(|ct| ct.is("multipart", "alternative"))
    }

    /// Content-type for diagnostics, `"null"` when absent.
    pub fn content_type_label(&self) -> String {
        self.content_type
            .as_ref()
            .map_or_else(|| "null".to_string(), ContentType::to_string)
    }
}
