//! A parsed message: header envelope plus the root of its part tree.

use chrono::{DateTime, Utc};

use super::address::EmailAddress;
use super::part::Part;

/// The header fields copied into the document.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Envelope {
    /// Primary sender (first `From:` address).
    pub from: Option<EmailAddress>,
    /// All recipients from `To:`, `Cc:` and `Bcc:`, in that order.
    pub recipients: Vec<EmailAddress>,
    /// Decoded subject line (RFC 2047 encoded-words resolved).
    pub subject: Option<String>,
    /// Parsed `Date:` header. `None` when missing or unparsable.
    pub date: Option<DateTime<Utc>>,
}

/// One complete message.
#[derive(Debug, Clone, PartialEq)]
pub struct Message {
    pub envelope: Envelope,
    pub root: Part,
}
