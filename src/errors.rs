use thiserror::Error;

/// Errors that abort a whole extraction (or a setup step such as loading configuration)
#[derive(Error, Debug)]
pub enum StatementParseError {
    /// No layout profile matched and no default profile is available
    #[error("Unsupported statement layout: {0}")]
    UnsupportedStatement(String),

    /// Failed to read the statement text from disk
    #[error("Failed to read file content: {0}")]
    ReadContentFailed(#[from] std::io::Error),

    /// The builder was called without content or a file path
    #[error("Content or filepath is required")]
    MissingContentAndFilepath,

    /// A layout profile declares a pattern that does not compile
    #[error("Invalid pattern in layout profile '{profile}': {source}")]
    InvalidPattern {
        profile: String,
        #[source]
        source: regex::Error,
    },

    /// A layout profile with the same name is already registered
    #[error("Layout profile '{0}' is already registered")]
    DuplicateProfile(String),

    // ── Configuration ───────────────────────────────────────────────────────────

    /// Structurally valid YAML that does not describe a usable configuration
    #[error("Invalid configuration: {0}")]
    ConfigInvalid(String),

    #[error("Failed to parse configuration: {0}")]
    ConfigParse(#[from] serde_yaml::Error),

    /// `reload` was requested on a classifier that was not loaded from a file
    #[error("Configuration has no file source to reload from")]
    ConfigSourceMissing,

    // ── Record log ──────────────────────────────────────────────────────────────

    #[error("Record log error: {0}")]
    Records(#[from] csv::Error),
}

/// Per-line failures. These never abort a document: the line is skipped and a
/// [`Diagnostic`](crate::types::Diagnostic) is recorded instead.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum LineParseError {
    /// Date substring matched no declared format and the permissive fallback failed
    #[error("Invalid statement date: {0}")]
    DateInvalidFormat(String),

    /// Date carries no year and the statement year is unknown
    #[error("Statement date '{0}' has no year and the statement year is unknown")]
    MissingYear(String),

    #[error("Invalid amount: {0}")]
    AmountInvalid(String),
}

/// Result state for a document that parsed cleanly but produced no transactions.
///
/// Not an error: callers check [`ExtractionReport::empty_warning`](crate::ExtractionReport::empty_warning)
/// and report it differently from a failed extraction.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("No transactions found in statement (layout: {profile})")]
pub struct EmptyResultWarning {
    pub profile: String,
}

/// Convenience alias for results carrying the crate's main error type
pub type StatementResult<T> = Result<T, StatementParseError>;
