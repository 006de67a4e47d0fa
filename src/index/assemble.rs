//! Document assembly: header fields first, then the walked parts.

use tracing::{debug, info_span};

use crate::error::Result;
use crate::index::walker::{DiagnosticSink, NoopSink, Walker};
use crate::model::document::{DateFormat, Document};
use crate::model::message::{Envelope, Message};
use crate::parser;

/// Knobs for building a document.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DocumentOptions {
    pub date_format: DateFormat,
}

/// Start a document from the message envelope.
///
/// `from`, `subject` and `date` are left out when absent; `to` when there
/// are no recipients at all.
pub fn assemble_header(envelope: &Envelope, options: &DocumentOptions) -> Document {
    let mut document = Document::new();
    document.from = envelope.from.as_ref().map(|a| a.display());
    document.to = envelope.recipients.iter().map(|a| a.display()).collect();
    document.subject = envelope.subject.clone();
    document.date = envelope
        .date
        .as_ref()
        .map(|date| options.date_format.render(date));
    document
}

/// Close the document. Nothing mutates it after this point.
pub fn finalize(document: Document) -> Document {
    debug!(parts = document.part_count(), "Document complete");
    document
}

/// Build the document for an already parsed message.
pub fn build_document<S: DiagnosticSink>(
    message: &Message,
    options: &DocumentOptions,
    walker: &mut Walker<S>,
) -> Document {
    let mut document = assemble_header(&message.envelope, options);
    walker.walk_message(&mut document, &message.root);
    finalize(document)
}

/// Parse raw message bytes and build its document.
pub fn convert(raw: &[u8], options: &DocumentOptions) -> Result<Document> {
    convert_with_sink(raw, options, NoopSink)
}

/// [`convert`], reporting every walk step to `sink`.
pub fn convert_with_sink<S: DiagnosticSink>(
    raw: &[u8],
    options: &DocumentOptions,
    sink: S,
) -> Result<Document> {
    let _span = info_span!("convert", bytes = raw.len()).entered();
    let message = parser::parse_message(raw)?;
    let mut walker = Walker::with_sink(sink);
    Ok(build_document(&message, options, &mut walker))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::address::EmailAddress;
    use crate::model::document::DateValue;
    use chrono::{TimeZone, Utc};

    fn envelope() -> Envelope {
        Envelope {
            from: Some(EmailAddress::new("Alice", "alice@example.com")),
            recipients: vec![
                EmailAddress::new("", "bob@example.com"),
                EmailAddress::new("Carol", "carol@example.com"),
            ],
            subject: Some("Hello".into()),
            date: Some(Utc.with_ymd_and_hms(2024, 1, 4, 10, 0, 0).unwrap()),
        }
    }

    #[test]
    fn test_assemble_header() {
        let doc = assemble_header(&envelope(), &DocumentOptions::default());
        assert_eq!(doc.from.as_deref(), Some("Alice <alice@example.com>"));
        assert_eq!(doc.to, ["bob@example.com", "Carol <carol@example.com>"]);
        assert_eq!(doc.subject.as_deref(), Some("Hello"));
        assert_eq!(
            doc.date,
            Some(DateValue::Formatted("2024-01-04T10:00:00+00:00".into()))
        );
        assert_eq!(doc.part_count(), 0);
    }

    #[test]
    fn test_assemble_header_timestamp() {
        let options = DocumentOptions {
            date_format: DateFormat::Timestamp,
        };
        let doc = assemble_header(&envelope(), &options);
        assert_eq!(doc.date, Some(DateValue::Timestamp(1_704_362_400)));
    }

    #[test]
    fn test_no_recipients_means_no_to_key() {
        let env = Envelope {
            recipients: Vec::new(),
            ..envelope()
        };
        let doc = assemble_header(&env, &DocumentOptions::default());
        let json: serde_json::Value = serde_json::from_str(&doc.to_json(false).unwrap()).unwrap();
        assert!(json.get("to").is_none());
        assert!(json.get("from").is_some());
    }

    #[test]
    fn test_empty_envelope_is_empty_object() {
        let doc = assemble_header(&Envelope::default(), &DocumentOptions::default());
        assert_eq!(doc.to_json(false).unwrap(), "{}");
    }

    #[test]
    fn test_convert_single_part() {
        let raw = b"From: a@example.com\r\nTo: b@example.com\r\nSubject: s\r\n\r\nbody text\r\n";
        let doc = convert(raw, &DocumentOptions::default()).unwrap();
        let json: serde_json::Value = serde_json::from_str(&doc.to_json(true).unwrap()).unwrap();
        assert_eq!(json["from"], "a@example.com");
        assert_eq!(json["to"], serde_json::json!(["b@example.com"]));
        assert_eq!(json["part-0.1"]["content-type"], "text/plain");
        assert!(json["part-0.1"]["body"]
            .as_str()
            .unwrap()
            .starts_with("body text"));
    }
}
