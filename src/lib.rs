pub mod analysis;
pub mod api;
pub mod corpus;
pub mod ingest;
pub mod report;
pub mod url_parser;
pub mod utils;

pub use analysis::{analyze, AnalysisReport, AnalyzerConfig};
pub use corpus::Corpus;
pub use url_parser::{ParsedUrl, RejectReason};
