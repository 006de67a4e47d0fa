//! Decide which parts are worth indexing.
//!
//! A single table maps file suffixes to the content-types historically used
//! for that kind of document. Read one way it infers a type from an
//! attachment name; read the other way it is the indexability whitelist.

use crate::model::content_type::ContentType;

/// Suffixes of one document kind and the types it travels under.
/// The first type is the canonical one.
struct FileTypeMapping {
    suffixes: &'static [&'static str],
    types: &'static [(&'static str, &'static str)],
}

const MAPPINGS: &[FileTypeMapping] = &[
    FileTypeMapping {
        suffixes: &["txt"],
        types: &[("text", "plain"), ("application", "txt")],
    },
    FileTypeMapping {
        suffixes: &["html", "htm"],
        types: &[("text", "html")],
    },
    FileTypeMapping {
        suffixes: &["c"],
        types: &[("text", "x-csrc")],
    },
    FileTypeMapping {
        suffixes: &["pdf"],
        types: &[
            ("application", "pdf"),
            ("application", "x-pdf"),
            ("text", "pdf"),
            ("text", "x-pdf"),
        ],
    },
    FileTypeMapping {
        suffixes: &["rtf"],
        types: &[
            ("application", "rtf"),
            ("application", "x-rtf"),
            ("text", "rtf"),
            ("text", "richtext"),
        ],
    },
    FileTypeMapping {
        suffixes: &["doc"],
        types: &[
            ("application", "msword"),
            ("application", "x-msword"),
            ("application", "vnd.msword"),
            ("application", "vnd.ms-word"),
        ],
    },
    FileTypeMapping {
        suffixes: &["docx"],
        types: &[(
            "application",
            "vnd.openxmlformats-officedocument.wordprocessingml.document",
        )],
    },
    FileTypeMapping {
        suffixes: &["xls"],
        types: &[
            ("application", "vnd.ms-excel"),
            ("application", "msexcel"),
            ("application", "x-msexcel"),
        ],
    },
    FileTypeMapping {
        suffixes: &["xlsx"],
        types: &[(
            "application",
            "vnd.openxmlformats-officedocument.spreadsheetml.sheet",
        )],
    },
    FileTypeMapping {
        suffixes: &["ppt"],
        types: &[
            ("application", "vnd.ms-powerpoint"),
            ("application", "mspowerpoint"),
            ("application", "ms-powerpoint"),
            ("application", "x-mspowerpoint"),
        ],
    },
    FileTypeMapping {
        suffixes: &["pptx"],
        types: &[(
            "application",
            "vnd.openxmlformats-officedocument.presentationml.presentation",
        )],
    },
    FileTypeMapping {
        suffixes: &["odt"],
        types: &[("application", "vnd.oasis.opendocument.text")],
    },
    FileTypeMapping {
        suffixes: &["ods"],
        types: &[("application", "vnd.oasis.opendocument.spreadsheet")],
    },
    FileTypeMapping {
        suffixes: &["odp"],
        types: &[("application", "vnd.oasis.opendocument.presentation")],
    },
];

/// Outcome of classifying one part.
#[derive(Debug, Clone, PartialEq)]
pub struct Classification {
    /// Whether the part goes into the document.
    pub indexable: bool,
    /// The working content-type: the declared one, or the type inferred from
    /// the filename when the declared one was `application/octet-stream`.
    pub content_type: Option<ContentType>,
}

/// Canonical content-type for a filename's suffix (case-insensitive).
///
/// Returns `None` for names without a suffix or with an unknown one.
pub fn infer_from_filename(filename: &str) -> Option<ContentType> {
    let (_, suffix) = filename.rsplit_once('.')?;
    MAPPINGS
        .iter()
        .find(|m| m.suffixes.iter().any(|s| s.eq_ignore_ascii_case(suffix)))
        .and_then(|m| m.types.first())
        .map(|(ctype, subtype)| ContentType::new(ctype, subtype))
}

/// Classify a part from its declared content-type and filename.
pub fn classify(content_type: Option<&ContentType>, filename: Option<&str>) -> Classification {
    let working = match (content_type, filename) {
        (Some(ct), Some(name)) if ct.is("application", "octet-stream") => {
            match infer_from_filename(name) {
                Some(inferred) => Some(ct.with_essence(inferred.ctype(), inferred.subtype())),
                None => Some(ct.clone()),
            }
        }
        (ct, _) => ct.cloned(),
    };

    Classification {
        indexable: working.as_ref().is_some_and(is_whitelisted),
        content_type: working,
    }
}

/// Shorthand for `classify(..).indexable`.
pub fn is_indexable(content_type: Option<&ContentType>, filename: Option<&str>) -> bool {
    classify(content_type, filename).indexable
}

fn is_whitelisted(content_type: &ContentType) -> bool {
    MAPPINGS
        .iter()
        .flat_map(|m| m.types.iter())
        .any(|(ctype, subtype)| content_type.is(ctype, subtype))
}
