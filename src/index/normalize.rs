//! Turn a part's decoded octets into document text.
//!
//! `text/*` parts are converted to UTF-8 from their declared charset. When no
//! charset is declared, `text/plain` is read as US-ASCII and every other text
//! subtype as ISO-8859-1. Everything else is base64-encoded.

use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;
use encoding_rs::Encoding;

use crate::error::{Mail2EsError, Result};
use crate::model::content_type::ContentType;
use crate::model::document::EntryBody;

/// Charset assumed for unlabeled `text/plain`.
pub const DEFAULT_PLAIN_CHARSET: &str = "us-ascii";

/// Charset assumed for every other unlabeled `text/*` subtype.
pub const DEFAULT_TEXT_CHARSET: &str = "iso-8859-1";

/// Labels decoded byte-for-byte as ISO-8859-1. `encoding_rs` follows the
/// WHATWG table, which maps these to windows-1252 instead.
const LATIN1_LABELS: &[&str] = &[
    "iso-8859-1",
    "iso8859-1",
    "iso_8859-1",
    "iso_8859-1:1987",
    "iso-ir-100",
    "latin1",
    "latin-1",
    "l1",
    "cp819",
    "ibm819",
    "csisolatin1",
];

/// Normalize one part body.
///
/// Fails only with [`Mail2EsError::UnsupportedCharset`], for text parts
/// whose charset has no known decoder.
pub fn normalize(octets: &[u8], content_type: Option<&ContentType>) -> Result<EntryBody> {
    match content_type {
        Some(ct) if ct.is("text", "*") => {
            let charset = source_charset(ct);
            decode_charset(charset, octets).map(EntryBody::Text)
        }
        _ => Ok(EntryBody::Binary(STANDARD.encode(octets))),
    }
}

/// Best-effort text for a part whose charset could not be converted: the raw
/// octets read as UTF-8, invalid sequences replaced.
pub fn lossy_text(octets: &[u8]) -> EntryBody {
    EntryBody::Text(String::from_utf8_lossy(octets).into_owned())
}

/// The charset a text part is read in.
pub fn source_charset(content_type: &ContentType) -> &str {
    match content_type.param("charset").map(str::trim) {
        Some(label) if !label.is_empty() => label,
        _ if content_type.is("text", "plain") => DEFAULT_PLAIN_CHARSET,
        _ => DEFAULT_TEXT_CHARSET,
    }
}

/// Convert `bytes` from the named charset to UTF-8.
pub fn decode_charset(charset: &str, bytes: &[u8]) -> Result<String> {
    let label = charset.trim().trim_matches('"');

    if LATIN1_LABELS.iter().any(|l| l.eq_ignore_ascii_case(label)) {
        return Ok(encoding_rs::mem::decode_latin1(bytes).into_owned());
    }

    let encoding = Encoding::for_label(label.as_bytes())
        .ok_or_else(|| Mail2EsError::UnsupportedCharset(label.to_string()))?;
    let (decoded, had_errors) = encoding.decode_without_bom_handling(bytes);
    if had_errors {
        tracing::debug!(
            charset = encoding.name(),
            "Malformed input replaced during charset conversion"
        );
    }
    Ok(decoded.into_owned())
}
