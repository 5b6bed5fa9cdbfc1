//! Error types for registration, loading and translation.

use std::error::Error as StdError;
use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Misuse detected when registering a language or an entry.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum RegisterError {
    #[error("language identifier must not be empty")]
    EmptyIdentifier,

    #[error("language '{language}' is already registered")]
    DuplicateLanguage { language: String },

    #[error("path '{path}' is already registered")]
    DuplicatePath { path: String },

    #[error("invalid path '{path}': {reason}")]
    InvalidPath { path: String, reason: &'static str },
}

/// Errors returned by a [`Loader`](crate::loader::Loader).
#[derive(Debug, Error)]
pub enum LoaderError {
    /// File I/O error when reading a language source.
    #[error("failed to read '{path}': {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// Malformed JSON source.
    #[error("malformed JSON: {0}")]
    Json(#[from] serde_json::Error),

    /// The loader supplied a value for a path nobody registered.
    #[error("unknown path '{path}'")]
    UnknownPath { path: String },

    /// Any other loader-specific failure.
    #[error(transparent)]
    Other(Box<dyn StdError + Send + Sync>),
}

/// Errors from `load` and `reload`. A failed call leaves the manager unchanged.
#[derive(Debug, Error)]
pub enum LoadError {
    #[error(transparent)]
    Register(#[from] RegisterError),

    #[error("failed to load language '{language}': {source}")]
    Loader {
        language: String,
        #[source]
        source: LoaderError,
    },
}

/// Errors surfaced when an entry is accessed.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum TranslateError {
    #[error("unknown language '{language}'{}", format_suggestions(suggestions))]
    UnknownLanguage {
        language: String,
        suggestions: Vec<String>,
    },

    #[error("missing translation: '{path}' in language '{language}'")]
    MissingTranslation { language: String, path: String },

    #[error("invalid type for '{path}' in language '{language}': expected {expected}, found {found}")]
    InvalidType {
        language: String,
        path: String,
        expected: String,
        found: String,
    },
}

/// A value did not match the shape it was coerced to.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("expected {expected}, found {found}")]
pub struct CoercionError {
    pub expected: String,
    pub found: String,
}

impl CoercionError {
    pub(crate) fn new(expected: impl Into<String>, found: impl Into<String>) -> Self {
        Self {
            expected: expected.into(),
            found: found.into(),
        }
    }
}

/// A problem found by [`LanguageManager::validate`](crate::LanguageManager::validate).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationIssue {
    /// No loader supplied a value for the path.
    Missing { language: String, path: String },

    /// The supplied value does not match the entry's shape.
    InvalidType {
        language: String,
        path: String,
        expected: String,
        found: String,
    },
}

impl ValidationIssue {
    pub fn language(&self) -> &str {
        match self {
            ValidationIssue::Missing { language, .. }
            | ValidationIssue::InvalidType { language, .. } => language,
        }
    }

    pub fn path(&self) -> &str {
        match self {
            ValidationIssue::Missing { path, .. } | ValidationIssue::InvalidType { path, .. } => {
                path
            }
        }
    }
}

/// Compute up to three registered names similar to `key`, most similar first.
pub fn compute_suggestions(key: &str, available: &[String]) -> Vec<String> {
    let mut scored: Vec<(f64, &String)> = available
        .iter()
        .map(|candidate| (strsim::jaro_winkler(key, candidate), candidate))
        .filter(|(score, _)| *score >= 0.7)
        .collect();
    scored.sort_by(|a, b| b.0.total_cmp(&a.0).then_with(|| a.1.cmp(b.1)));
    scored
        .into_iter()
        .take(3)
        .map(|(_, name)| name.clone())
        .collect()
}

fn format_suggestions(suggestions: &[String]) -> String {
    if suggestions.is_empty() {
        String::new()
    } else {
        format!(", did you mean: {}?", suggestions.join(", "))
    }
}
