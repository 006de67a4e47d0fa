//! Where the message bytes come from: a named file or standard input.

use std::fmt;
use std::io::Read;
use std::path::{Path, PathBuf};

use crate::error::{Mail2EsError, Result};

/// Input for exactly one message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Source {
    Stdin,
    File(PathBuf),
}

impl Source {
    /// Interpret a CLI argument: no argument, or `-`, means standard input.
    pub fn from_arg(arg: Option<&Path>) -> Self {
        match arg {
            None => Self::Stdin,
            Some(path) if path.as_os_str() == "-" => Self::Stdin,
            Some(path) => Self::File(path.to_path_buf()),
        }
    }

    /// Read the whole message, refusing inputs larger than `limit` bytes.
    pub fn read(&self, limit: usize) -> Result<Vec<u8>> {
        match self {
            Self::Stdin => read_limited(std::io::stdin().lock(), limit, Path::new("<stdin>")),
            Self::File(path) => {
                let file = std::fs::File::open(path).map_err(|e| {
                    if e.kind() == std::io::ErrorKind::NotFound {
                        Mail2EsError::FileNotFound(path.clone())
                    } else {
                        Mail2EsError::io(path, e)
                    }
                })?;
                read_limited(file, limit, path)
            }
        }
    }
}

impl fmt::Display for Source {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Stdin => write!(f, "<stdin>"),
            Self::File(path) => write!(f, "{}", path.display()),
        }
    }
}

/// Read at most `limit` bytes; anything beyond is an error rather than a
/// silent truncation.
pub fn read_limited<R: Read>(reader: R, limit: usize, path: &Path) -> Result<Vec<u8>> {
    let mut data = Vec::new();
    reader
        .take(limit as u64 + 1)
        .read_to_end(&mut data)
        .map_err(|e| Mail2EsError::io(path, e))?;
    if data.len() > limit {
        return Err(Mail2EsError::MessageTooLarge { limit });
    }
    Ok(data)
}

/// Skip a UTF-8 BOM and a leading mbox `From ` separator line.
pub fn strip_envelope(data: &[u8]) -> &[u8] {
    let data = data.strip_prefix(b"\xEF\xBB\xBF").unwrap_or(data);

    if data.starts_with(b"From ") {
        if let Some(pos) = data.iter().position(|&b| b == b'\n') {
            return &data[pos + 1..];
        }
    }
    data
}
