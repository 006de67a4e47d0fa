//! Email address rendering for the document header.

/// A sender or recipient address.
///
/// # Examples
/// - `"Juan García <juan@ejemplo.com>"` → `display_name = "Juan García"`, `address = "juan@ejemplo.com"`
/// - `"user@example.com"` → `display_name = ""`, `address = "user@example.com"`
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize, PartialEq)]
pub struct EmailAddress {
    /// Human-readable display name (may be empty).
    pub display_name: String,
    /// The bare email address (`user@domain`, may be empty for group names).
    pub address: String,
}

impl EmailAddress {
    pub fn new(display_name: &str, address: &str) -> Self {
        Self {
            display_name: strip_quotes(display_name),
            address: address.trim().to_string(),
        }
    }

    /// Convert a `mail-parser` address, returning `None` when it carries
    /// neither a name nor an address.
    pub fn from_addr(addr: &mail_parser::Addr<'_>) -> Option<Self> {
        let entry = Self::new(addr.name().unwrap_or(""), addr.address().unwrap_or(""));
        if entry.is_empty() {
            None
        } else {
            Some(entry)
        }
    }

    pub fn is_empty(&self) -> bool {
        self.display_name.is_empty() && self.address.is_empty()
    }

    /// Format for display: `"Display Name <address>"` or just `"address"`.
    pub fn display(&self) -> String {
        match (self.display_name.is_empty(), self.address.is_empty()) {
            (true, _) => self.address.clone(),
            (false, true) => self.display_name.clone(),
            (false, false) => format!("{} <{}>", self.display_name, self.address),
        }
    }
}

/// Strip surrounding double-quotes and trim whitespace.
fn strip_quotes(s: &str) -> String {
    let trimmed = s.trim();
    if trimmed.starts_with('"') && trimmed.ends_with('"') && trimmed.len() >= 2 {
        trimmed[1..trimmed.len() - 1].trim().to_string()
    } else {
        trimmed.to_string()
    }
}

impl std::fmt::Display for EmailAddress {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.display())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_with_name() {
        let addr = EmailAddress::new("Alice", "alice@example.com");
        assert_eq!(addr.display(), "Alice <alice@example.com>");
    }

    #[test]
    fn test_display_without_name() {
        let addr = EmailAddress::new("", "alice@example.com");
        assert_eq!(addr.display(), "alice@example.com");
    }

    #[test]
    fn test_display_name_only() {
        let addr = EmailAddress::new("Undisclosed recipients", "");
        assert_eq!(addr.to_string(), "Undisclosed recipients");
    }

    #[test]
    fn test_quoted_name_is_unquoted() {
        let addr = EmailAddress::new("\"Last, First\"", "user@example.com");
        assert_eq!(addr.display_name, "Last, First");
    }

    #[test]
    fn test_empty() {
        assert!(EmailAddress::new("  ", "").is_empty());
    }
}
