use thiserror::Error;

/// Errors surfaced by the formatter, its configuration and its front ends.
///
/// Malformed source code is never an error: unmatched delimiters and
/// unterminated statements produce best-effort output instead.
#[derive(Debug, Error)]
pub enum FormatError {
    /// Selection lines are 1-based
    #[error("selection start must be at least 1")]
    InvalidSelectionStart,

    #[error("selection end {end} precedes selection start {start}")]
    InvertedSelection { start: usize, end: usize },

    #[error("selection starts at line {start} but the source has {lines} lines")]
    SelectionOutOfRange { start: usize, lines: usize },

    #[error("unknown language `{0}`")]
    UnknownLanguage(String),

    #[error("indentation unit must not be empty")]
    EmptyIndentUnit,

    #[error("invalid configuration: {0}")]
    Config(#[from] serde_json::Error),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}
