//! The output document: message header fields plus one entry per indexed part.
//!
//! Serializes to a JSON object whose keys keep insertion order:
//! `from`, `to`, `subject`, `date`, then `part-<depth>.<rank>` entries in
//! traversal order.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::ser::{SerializeMap, Serializer};
use serde::{Deserialize, Serialize};

/// Identifier of a numbered part, rendered as `part-<depth>.<rank>`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PartId {
    pub depth: u32,
    pub rank: u32,
}

impl PartId {
    pub fn new(depth: u32, rank: u32) -> Self {
        Self { depth, rank }
    }
}

impl fmt::Display for PartId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "part-{}.{}", self.depth, self.rank)
    }
}

/// Normalized body of a part: UTF-8 text or base64-encoded binary.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum EntryBody {
    #[serde(rename = "body")]
    Text(String),
    #[serde(rename = "file")]
    Binary(String),
}

impl EntryBody {
    pub fn as_str(&self) -> &str {
        match self {
            Self::Text(s) | Self::Binary(s) => s,
        }
    }

    pub fn is_text(&self) -> bool {
        matches!(self, Self::Text(_))
    }
}

/// One indexed part.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PartEntry {
    #[serde(rename = "content-type")]
    pub content_type: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub filename: Option<String>,
    #[serde(flatten)]
    pub body: EntryBody,
}

/// How the `date` field is rendered.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum DateFormat {
    /// `2024-01-04T10:00:00+00:00`
    #[default]
    Rfc3339,
    /// `Thu, 4 Jan 2024 10:00:00 +0000`
    Rfc2822,
    /// Unix seconds as a JSON integer.
    Timestamp,
}

impl DateFormat {
    pub fn render(self, date: &DateTime<Utc>) -> DateValue {
        match self {
            Self::Rfc3339 => DateValue::Formatted(date.to_rfc3339()),
            Self::Rfc2822 => DateValue::Formatted(date.to_rfc2822()),
            Self::Timestamp => DateValue::Timestamp(date.timestamp()),
        }
    }
}

/// The `date` field: a formatted string or a numeric timestamp.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum DateValue {
    Timestamp(i64),
    Formatted(String),
}

/// The document for one message.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Document {
    pub from: Option<String>,
    /// All recipients; the `to` key is omitted when this is empty.
    pub to: Vec<String>,
    pub subject: Option<String>,
    pub date: Option<DateValue>,
    parts: Vec<(PartId, PartEntry)>,
}

impl Document {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a part entry. An existing entry with the same id is replaced in
    /// place.
    pub fn insert_part(&mut self, id: PartId, entry: PartEntry) {
        match self.parts.iter_mut().find(|(k, _)| *k == id) {
            Some(slot) => slot.1 = entry,
            None => self.parts.push((id, entry)),
        }
    }

    /// Remove a part entry, keeping the order of the others.
    pub fn remove_part(&mut self, id: PartId) -> Option<PartEntry> {
        let pos = self.parts.iter().position(|(k, _)| *k == id)?;
        Some(self.parts.remove(pos).1)
    }

    pub fn part(&self, id: PartId) -> Option<&PartEntry> {
        self.parts.iter().find(|(k, _)| *k == id).map(|(_, v)| v)
    }

    /// Part entries in insertion order.
    pub fn parts(&self) -> impl Iterator<Item = (PartId, &PartEntry)> {
        self.parts.iter().map(|(k, v)| (*k, v))
    }

    pub fn part_ids(&self) -> Vec<PartId> {
        self.parts.iter().map(|(k, _)| *k).collect()
    }

    pub fn part_count(&self) -> usize {
        self.parts.len()
    }

    /// Render as JSON text.
    pub fn to_json(&self, pretty: bool) -> crate::error::Result<String> {
        let text = if pretty {
            serde_json::to_string_pretty(self)?
        } else {
            serde_json::to_string(self)?
        };
        Ok(text)
    }
}

impl Serialize for Document {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(None)?;
        if let Some(from) = &self.from {
            map.serialize_entry("from", from)?;
        }
        if !self.to.is_empty() {
            map.serialize_entry("to", &self.to)?;
        }
        if let Some(subject) = &self.subject {
            map.serialize_entry("subject", subject)?;
        }
        if let Some(date) = &self.date {
            map.serialize_entry("date", date)?;
        }
        for (id, entry) in &self.parts {
            map.serialize_entry(&id.to_string(), entry)?;
        }
        map.end()
    }
}
