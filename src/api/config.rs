use std::time::Duration;

use crate::analysis::AnalyzerConfig;

/// Uploaded sample kept through `/delete_files` so the UI always has
/// something to demo with.
pub const SAMPLE_FILENAME: &str = "sample-pagelist.csv";

/// Configuration for the API server.
#[derive(Debug, Clone)]
pub struct ApiConfig {
    /// Directory uploaded input files land in
    pub upload_dir: String,

    /// Directory generated report files are written to
    pub results_dir: String,

    /// Analysis parameters applied to every run
    pub analyzer: AnalyzerConfig,

    /// Upper bound for one analyze request, ingest to report writing
    pub request_timeout: Duration,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            upload_dir: "uploads".to_string(),
            results_dir: "results".to_string(),
            analyzer: AnalyzerConfig::default(),
            request_timeout: Duration::from_secs(60),
        }
    }
}
