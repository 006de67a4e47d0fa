//! MIME structure: turn raw message bytes into a [`Part`] tree.
//!
//! `mailparse` provides the structure and the content-transfer decoding.
//! Embedded messages are re-parsed from their decoded payload, so a
//! forwarded message shows up as a [`PartBody::Container`] holding its own
//! tree.

use mailparse::ParsedMail;
use tracing::warn;

use crate::error::{Mail2EsError, Result};
use crate::model::content_type::ContentType;
use crate::model::part::{Part, PartBody};

/// Maximum nesting depth (to prevent stack overflow on adversarial input).
/// Deeper nodes are kept as [`PartBody::Unknown`].
const MAX_DEPTH: usize = 64;

/// Content-types carrying a complete embedded message.
const EMBEDDED_MESSAGE_TYPES: &[&str] = &["message/rfc822", "message/news", "message/global"];

/// Parse a complete raw message (headers + body) into its part tree.
pub fn parse_part_tree(data: &[u8]) -> Result<Part> {
    let parsed = mailparse::parse_mail(data).map_err(|e| Mail2EsError::Unparsable(e.to_string()))?;
    Ok(convert(&parsed, 0))
}

fn convert(mail: &ParsedMail<'_>, depth: usize) -> Part {
    let mimetype = mail.ctype.mimetype.as_str();

    let body = if depth >= MAX_DEPTH {
        warn!(depth, mimetype, "MIME nesting too deep, ignoring part");
        PartBody::Unknown
    } else if EMBEDDED_MESSAGE_TYPES.contains(&mimetype) {
        embedded_message(mail, depth)
    } else if mimetype == "message/partial" {
        PartBody::Partial
    } else if mimetype.starts_with("multipart/") {
        PartBody::Multipart(
            mail.subparts
                .iter()
                .map(|sub| convert(sub, depth + 1))
                .collect(),
        )
    } else {
        match mail.get_body_raw() {
            Ok(octets) => PartBody::Leaf(octets),
            Err(e) => {
                let err = Mail2EsError::TransferDecoding(e.to_string());
                warn!(mimetype, error = %err, "Ignoring undecodable part");
                PartBody::Unknown
            }
        }
    };

    Part {
        content_type: content_type_of(mail),
        filename: filename_of(mail),
        body,
    }
}

fn embedded_message(mail: &ParsedMail<'_>, depth: usize) -> PartBody {
    let payload = match mail.get_body_raw() {
        Ok(payload) => payload,
        Err(e) => {
            warn!(error = %e, "Cannot decode embedded message");
            return PartBody::Unknown;
        }
    };
    match mailparse::parse_mail(&payload) {
        Ok(inner) => PartBody::Container(Box::new(convert(&inner, depth + 1))),
        Err(e) => {
            warn!(error = %e, "Cannot parse embedded message");
            PartBody::Unknown
        }
    }
}

/// Declared content-type with its parameters. `None` when the header value
/// is not a `type/subtype` pair.
fn content_type_of(mail: &ParsedMail<'_>) -> Option<ContentType> {
    let mut ct = ContentType::parse(&mail.ctype.mimetype)?;
    for (name, value) in &mail.ctype.params {
        ct.set_param(name, value);
    }
    Some(ct)
}

/// Attachment name: Content-Disposition `filename`, else Content-Type `name`.
fn filename_of(mail: &ParsedMail<'_>) -> Option<String> {
    let disposition = mail.get_content_disposition();
    disposition
        .params
        .get("filename")
        .or_else(|| mail.ctype.params.get("name"))
        .map(|name| name.trim().to_string())
        .filter(|name| !name.is_empty())
}
