use serde::{Deserialize, Serialize};

use crate::analysis::Suggestion;
use crate::url_parser::RejectReason;

/// Request to analyze a previously uploaded file.
#[derive(Debug, Deserialize)]
pub struct AnalyzeRequest {
    /// Name of a file in the upload directory
    pub filename: String,
    /// Used in generated report file names
    #[serde(default)]
    pub client_name: Option<String>,
}

/// Names of the report files one analysis produced.
#[derive(Debug, Serialize)]
pub struct ReportFileNames {
    pub txt_file: String,
    pub csv_file: String,
    pub botify_file: String,
    pub markdown_file: String,
}

/// Response for a completed analysis.
#[derive(Debug, Serialize)]
pub struct AnalyzeResponse {
    pub message: String,
    pub corpus_size: usize,
    pub rejected: Vec<(String, RejectReason)>,
    /// True when no input row parsed; suggestions will be empty
    pub empty_corpus: bool,
    pub insights: Vec<String>,
    pub suggestions: Vec<Suggestion>,
    /// Highest-coverage n-grams, for a quick look in the UI
    pub top_ngrams: Vec<(String, usize)>,
    pub files: ReportFileNames,
    pub processing_time_seconds: f64,
}

/// Response after storing an uploaded file.
#[derive(Debug, Serialize)]
pub struct UploadResponse {
    pub message: String,
    /// Name the file was stored under (after sanitization)
    pub filename: String,
}

/// Standard error response format for the API.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub status: String,
    pub message: String,
}

impl ErrorResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            status: "error".to_string(),
            message: message.into(),
        }
    }
}

/// Response for the health check endpoint.
#[derive(Debug, Serialize)]
pub struct HealthStatus {
    pub status: String,
    pub uploaded_files: usize,
    pub result_files: usize,
}
