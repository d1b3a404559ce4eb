//! Error types for the search crate.

use thiserror::Error;

/// Errors that can occur when building, translating or running a search.
///
/// Everything except [`SearchError::FieldAccess`] and [`SearchError::Backend`]
/// is raised while the search is being built, before any record is read.
#[derive(Debug, Error)]
pub enum SearchError {
    /// `fields` was called with no selectors.
    #[error("at least one field must be selected")]
    EmptyFieldSet,

    /// A term-based strategy was given no terms.
    #[error("{strategy} requires at least one search term")]
    EmptyTermSet { strategy: &'static str },

    /// A literal term was the empty string.
    #[error("search term at position {index} is empty")]
    EmptyTerm { index: usize },

    /// A strategy was applied before any field was selected.
    #[error("no fields selected; call `fields` before applying {strategy}")]
    NoFieldsSelected { strategy: &'static str },

    /// A selector does not name a readable field of the record type.
    #[error("'{field}' is not a searchable field of {record}")]
    InvalidFieldPath {
        record: &'static str,
        field: String,
    },

    /// The backend has no native primitive for the strategy or option.
    #[error("{backend} cannot express {feature}")]
    UnsupportedStrategy {
        backend: &'static str,
        feature: &'static str,
    },

    /// A distance bound was supplied to a strategy that does not take one.
    #[error("a maximum distance is only valid for fuzzy searches, not {strategy}")]
    InvalidDistance { strategy: &'static str },

    /// An option was combined with a strategy that does not support it.
    #[error("option '{option}' is not valid for {strategy}")]
    InvalidOption {
        option: &'static str,
        strategy: &'static str,
    },

    /// A whole-word pattern could not be compiled for a term.
    #[error("invalid word pattern: {0}")]
    InvalidPattern(#[from] regex::Error),

    /// The accessor for a field failed while reading a record.
    #[error("failed to read field '{field}' of record #{record}: {message}")]
    FieldAccess {
        field: String,
        record: usize,
        message: String,
    },

    /// The query backend rejected or failed to run a translated query.
    #[cfg(feature = "sqlite")]
    #[error("backend error: {0}")]
    Backend(#[from] rusqlite::Error),
}

/// Result type for search operations.
pub type Result<T> = std::result::Result<T, SearchError>;
