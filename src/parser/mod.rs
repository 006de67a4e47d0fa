//! Message parsing: input acquisition, envelope headers, and the MIME part tree.

pub mod header;
pub mod mime;
pub mod source;

use crate::error::Result;
use crate::model::message::Message;

/// Parse raw message bytes into a [`Message`].
///
/// A leading mbox `From ` line and a UTF-8 BOM are skipped. Fails only when
/// the bytes do not form a message at all.
pub fn parse_message(raw: &[u8]) -> Result<Message> {
    let data = source::strip_envelope(raw);
    let envelope = header::parse_envelope(data)?;
    let root = mime::parse_part_tree(data)?;
    Ok(Message { envelope, root })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Mail2EsError;

    #[test]
    fn test_parse_message_from_mbox_chunk() {
        let raw = b"From alice@example.com Thu Jan 04 10:00:00 2024\n\
From: alice@example.com\n\
Subject: Hello\n\
\n\
Hi there\n";
        let message = parse_message(raw).unwrap();
        assert_eq!(message.envelope.subject.as_deref(), Some("Hello"));
        assert_eq!(
            message.envelope.from.map(|a| a.address),
            Some("alice@example.com".to_string())
        );
    }

    #[test]
    fn test_parse_message_empty() {
        assert!(matches!(parse_message(b"\r\n"), Err(Mail2EsError::Unparsable(_))));
    }
}
