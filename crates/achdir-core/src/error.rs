use std::path::PathBuf;

#[derive(Debug, thiserror::Error)]
pub enum AchdirError {
    #[error("source not found: {}", .0.display())]
    SourceMissing(PathBuf),

    #[error("no usable participant data in {0}")]
    EmptySource(String),

    #[error("malformed sheet '{sheet}': {reason}")]
    MalformedSheet { sheet: String, reason: String },

    #[error("failed to read workbook: {0}")]
    Workbook(String),

    #[error("PDF extraction failed: {0}")]
    Extraction(String),

    #[error("pdftotext not found. Install poppler: brew install poppler (macOS) or apt install poppler-utils (Linux)")]
    PdftotextNotFound,

    #[error("pdftotext failed with exit code {code}: {stderr}")]
    PdftotextFailed { code: i32, stderr: String },

    #[error("failed to load config from {path}: {reason}")]
    ConfigLoad { path: PathBuf, reason: String },

    #[error("invalid config: {0}")]
    ConfigInvalid(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}
