//! Error types.
//!
//! Only construction-time work (loading catalogs, parsing language tags)
//! returns these to callers. Per-request translation never fails outward:
//! the delegate turns every [`TranslateError`] into a best-effort string and
//! at most a log line.

use std::path::PathBuf;

use thiserror::Error;

use crate::i18n::LanguageTag;

/// A string could not be parsed as a language tag.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LanguageTagError {
    #[error("language tag is empty")]
    Empty,

    #[error("invalid language tag '{tag}': {reason}")]
    Invalid { tag: String, reason: String },
}

/// The minimal template renderer rejected a template or its data.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TemplateError {
    #[error("unclosed action starting at byte {0}")]
    Unclosed(usize),

    #[error("invalid action '{0}'")]
    InvalidAction(String),

    #[error("no data supplied for field '{0}'")]
    MissingData(String),

    #[error("field '{0}' not found in data")]
    MissingField(String),

    #[error("field '{0}' is not a scalar value")]
    NotScalar(String),
}

/// A catalog source failed while the engine was being built.
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("failed to read catalog {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse catalog {}: {source}", path.display())]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("catalog {} is not named after a language tag: {source}", path.display())]
    FileName {
        path: PathBuf,
        #[source]
        source: LanguageTagError,
    },

    #[error("catalog {} must be a JSON object of strings (bad entry '{key}')", path.display())]
    Shape { path: PathBuf, key: String },
}

/// The engine could not produce a translation.
///
/// Every variant carries the text the engine hands back in place of a
/// translation; the delegate forwards it to the caller unchanged.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TranslateError {
    #[error("message '{key}' not found for language '{language}'")]
    MessageNotFound { language: LanguageTag, key: String },

    #[error("message '{key}' for language '{language}' failed to render: {source}")]
    Template {
        language: LanguageTag,
        key: String,
        raw: String,
        #[source]
        source: TemplateError,
    },
}

impl TranslateError {
    /// The string returned to callers when this error occurs.
    pub fn output(&self) -> &str {
        match self {
            Self::MessageNotFound { key, .. } => key,
            Self::Template { raw, .. } => raw,
        }
    }
}
