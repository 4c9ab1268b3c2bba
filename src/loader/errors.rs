use thiserror::Error;

/// A single record that failed coercion or validation, with enough context
/// for the caller to decide skip-vs-abort.
#[derive(Debug, Clone, Error)]
#[error("Record [{record}] at line {line} was rejected on field [{field}]: {message}")]
pub struct RecordIssue {
    /// The record identifier as written in the file, or `?` when missing.
    pub record: String,
    /// 1-based line number within the file.
    pub line: u64,
    pub field: &'static str,
    pub message: String
}

#[derive(Debug, Error)]
pub enum LoadError {
    #[error("Failed to open CSV at path: {path} | {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error
    },
    #[error("CSV read error: {0}")]
    Csv(#[from] csv::Error),
    #[error(transparent)]
    Malformed(#[from] RecordIssue)
}
