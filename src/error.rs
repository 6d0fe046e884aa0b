use thiserror::Error;

/// Errors that stop the pipeline before any row is processed.
///
/// Per-row failures (generation, extraction, transcription) never show up here:
/// they are turned into row content instead.
#[derive(Debug, Error)]
pub enum InsightError {
    #[error("CSV must contain: {}. Missing: {}", .required.join(", "), .missing.join(", "))]
    SchemaViolation {
        required: Vec<String>,
        missing: Vec<String>,
    },

    #[error("Missing {0} env var. Set it before running.")]
    MissingCredential(String),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, InsightError>;
