//! MIME content-type value (`type/subtype; param=value`).

use std::fmt;

/// A parsed MIME content-type.
///
/// Type and subtype are stored lowercase. Parameter names are lowercase;
/// parameter values are kept as given.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContentType {
    ctype: String,
    subtype: String,
    params: Vec<(String, String)>,
}

impl ContentType {
    /// Build a content-type from its two halves, without parameters.
    pub fn new(ctype: &str, subtype: &str) -> Self {
        Self {
            ctype: ctype.trim().to_ascii_lowercase(),
            subtype: subtype.trim().to_ascii_lowercase(),
            params: Vec::new(),
        }
    }

    /// Parse a bare `type/subtype` essence.
    ///
    /// Returns `None` when there is no `/` or either half is empty.
    pub fn parse(essence: &str) -> Option<Self> {
        let essence = essence.split(';').next().unwrap_or("");
        let (ctype, subtype) = essence.split_once('/')?;
        if ctype.trim().is_empty() || subtype.trim().is_empty() {
            return None;
        }
        Some(Self::new(ctype, subtype))
    }

    /// Attach a parameter (builder style).
    pub fn with_param(mut self, name: &str, value: &str) -> Self {
        self.set_param(name, value);
        self
    }

    /// Set a parameter, replacing any previous value with the same name.
    pub fn set_param(&mut self, name: &str, value: &str) {
        let name = name.to_ascii_lowercase();
        match self.params.iter_mut().find(|(k, _)| *k == name) {
            Some(slot) => slot.1 = value.to_string(),
            None => self.params.push((name, value.to_string())),
        }
    }

    /// Look up a parameter by (case-insensitive) name.
    pub fn param(&self, name: &str) -> Option<&str> {
        self.params
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }

    /// Top-level media type (`text` in `text/plain`).
    pub fn ctype(&self) -> &str {
        &self.ctype
    }

    /// Media subtype (`plain` in `text/plain`).
    pub fn subtype(&self) -> &str {
        &self.subtype
    }

    /// Return a copy with the type/subtype replaced and the parameters kept.
    pub fn with_essence(&self, ctype: &str, subtype: &str) -> Self {
        Self {
            params: self.params.clone(),
            ..Self::new(ctype, subtype)
        }
    }

    /// Match against a `type`/`subtype` pattern, case-insensitively.
    ///
    /// `*` on either side of the pattern matches anything.
    pub fn is(&self, ctype: &str, subtype: &str) -> bool {
        (ctype == "*" || self.ctype.eq_ignore_ascii_case(ctype))
            && (subtype == "*" || self.subtype.eq_ignore_ascii_case(subtype))
    }

    /// `true` for `multipart/*`.
    pub fn is_multipart(&self) -> bool {
        self.is("multipart", "*")
    }

    /// `type/subtype`, without parameters.
    pub fn essence(&self) -> String {
        format!("{}/{}", self.ctype, self.subtype)
    }
}

impl fmt::Display for ContentType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.ctype, self.subtype)
    }
}
