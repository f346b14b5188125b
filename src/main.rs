use anyhow::Result;
use clap::Parser;

use url_insights::analysis::AnalyzerConfig;
use url_insights::api::{start_server, ApiConfig};
use url_insights::utils::logger::init_logger;

/// URL structure insights and segmentation rule suggestions over
/// uploaded URL lists.
#[derive(Debug, Parser)]
#[command(name = "url_insights", version)]
struct Args {
    /// Host address to bind to
    #[arg(long, default_value = "127.0.0.1")]
    host: String,

    /// Port to listen on
    #[arg(long, default_value_t = 8080, env = "PORT")]
    port: u16,

    /// Directory uploaded input files are stored in
    #[arg(long, default_value = "uploads")]
    upload_dir: String,

    /// Directory generated reports are written to
    #[arg(long, default_value = "results")]
    results_dir: String,

    /// Directory for log files
    #[arg(long, default_value = "logs")]
    log_dir: String,

    /// Maximum n-gram length considered by the analyzer
    #[arg(long, default_value_t = 3)]
    max_ngram_length: usize,

    /// Absolute minimum coverage for a pattern to be suggested
    /// (default: 2, or 0.1% of the corpus, whichever is larger)
    #[arg(long)]
    min_support: Option<usize>,

    /// Number of suggestions to return
    #[arg(long, default_value_t = 20)]
    top_n: usize,
}

#[actix_web::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    let _ = init_logger(&args.log_dir);

    let config = ApiConfig {
        upload_dir: args.upload_dir,
        results_dir: args.results_dir,
        analyzer: AnalyzerConfig {
            max_ngram_length: args.max_ngram_length,
            min_support: args.min_support,
            top_n: args.top_n,
        },
        ..ApiConfig::default()
    };

    start_server(&args.host, args.port, Some(config)).await?;

    Ok(())
}
