//! Message envelope: sender, recipients, subject and date.
//!
//! Header decoding (folding, RFC 2047 encoded-words, address lists) is done
//! by `mail-parser`. Dates it cannot read go through a lenient fallback.

use chrono::{DateTime, NaiveDateTime, TimeZone, Utc};
use mail_parser::{Address, MessageParser};
use tracing::warn;

use crate::error::{Mail2EsError, Result};
use crate::model::address::EmailAddress;
use crate::model::message::Envelope;

/// Parse the header block of `data` into an [`Envelope`].
///
/// Fails when `mail-parser` cannot build a message at all (for example on
/// empty input).
pub fn parse_envelope(data: &[u8]) -> Result<Envelope> {
    if data.iter().all(u8::is_ascii_whitespace) {
        return Err(Mail2EsError::Unparsable("empty input".into()));
    }
    let message = MessageParser::default()
        .parse(data)
        .ok_or_else(|| Mail2EsError::Unparsable("no RFC 5322 message found".into()))?;
    Ok(envelope_from_parsed(&message))
}

/// Build the envelope from an already parsed message.
pub fn envelope_from_parsed(message: &mail_parser::Message<'_>) -> Envelope {
    let from = message
        .from()
        .and_then(Address::first)
        .and_then(EmailAddress::from_addr);

    let recipients = [message.to(), message.cc(), message.bcc()]
        .into_iter()
        .flatten()
        .flat_map(|list| list.iter())
        .filter_map(EmailAddress::from_addr)
        .collect();

    let subject = message.subject().map(str::to_string);

    // mail-parser accepts out-of-range fields; their timestamp would wrap
    // into some other date.
    let date = message
        .date()
        .filter(|dt| dt.is_valid())
        .and_then(|dt| DateTime::from_timestamp(dt.to_timestamp(), 0))
        .or_else(|| message.header_raw("Date").and_then(parse_date));

    Envelope {
        from,
        recipients,
        subject,
        date,
    }
}

/// Parse an email date string in various common formats.
///
/// Supports RFC 2822, ISO 8601, and many broken real-world variants.
pub fn parse_date(date_str: &str) -> Option<DateTime<Utc>> {
    let trimmed = date_str.trim();
    if trimmed.is_empty() {
        return None;
    }

    if let Ok(dt) = DateTime::parse_from_rfc2822(trimmed) {
        return Some(dt.with_timezone(&Utc));
    }
    if let Ok(dt) = DateTime::parse_from_rfc3339(trimmed) {
        return Some(dt.with_timezone(&Utc));
    }

    let no_dow = strip_day_of_week(trimmed);
    let candidates = [
        no_dow.clone(),
        normalize_imap_date(&no_dow),
        replace_named_tz(&no_dow),
    ];

    const FORMATS: &[&str] = &[
        "%d %b %Y %H:%M:%S %z",
        "%d %b %Y %H:%M:%S",
        "%d %b %Y %H:%M %z",
        "%b %d %H:%M:%S %Y",
        "%Y-%m-%d %H:%M:%S %z",
        "%Y-%m-%d %H:%M:%S",
        "%d/%m/%Y %H:%M:%S",
    ];

    for candidate in &candidates {
        for fmt in FORMATS {
            if let Ok(dt) = DateTime::parse_from_str(candidate, fmt) {
                return Some(dt.with_timezone(&Utc));
            }
            if let Ok(ndt) = NaiveDateTime::parse_from_str(candidate, fmt) {
                return Some(Utc.from_utc_datetime(&ndt));
            }
        }
    }

    warn!(date = trimmed, "Could not parse date");
    None
}

/// `"16-JUL-2025 03:01:03"` → `"16 Jul 2025 03:01:03"`.
fn normalize_imap_date(s: &str) -> String {
    const MONTHS: [&str; 12] = [
        "Jan", "Feb", "Mar", "Apr", "May", "Jun", "Jul", "Aug", "Sep", "Oct", "Nov", "Dec",
    ];

    for month in MONTHS {
        let pattern = format!("-{month}-");
        if let Some(pos) = s.to_ascii_lowercase().find(&pattern.to_ascii_lowercase()) {
            let mut result = s.to_string();
            result.replace_range(pos..pos + pattern.len(), &format!(" {month} "));
            return result;
        }
    }
    s.to_string()
}

/// Strip a leading day-of-week prefix (e.g. "Thu, " or "Thu ").
fn strip_day_of_week(s: &str) -> String {
    const DAYS: [&str; 7] = ["Mon", "Tue", "Wed", "Thu", "Fri", "Sat", "Sun"];
    for day in DAYS {
        if let Some(rest) = s.strip_prefix(day) {
            if let Some(rest) = rest.strip_prefix(',').or_else(|| rest.strip_prefix(' ')) {
                return rest.trim().to_string();
            }
        }
    }
    s.to_string()
}

/// Replace a trailing timezone abbreviation with its numeric offset.
fn replace_named_tz(s: &str) -> String {
    const ZONES: [(&str, &str); 13] = [
        ("EST", "-0500"),
        ("EDT", "-0400"),
        ("CST", "-0600"),
        ("CDT", "-0500"),
        ("MST", "-0700"),
        ("MDT", "-0600"),
        ("PST", "-0800"),
        ("PDT", "-0700"),
        ("GMT", "+0000"),
        ("UTC", "+0000"),
        ("CEST", "+0200"),
        ("CET", "+0100"),
        ("JST", "+0900"),
    ];
    for (name, offset) in ZONES {
        if let Some(head) = s.strip_suffix(name).filter(|h| h.ends_with(' ')) {
            return format!("{head}{offset}");
        }
    }
    s.to_string()
}
