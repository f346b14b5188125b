use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Instant;

use actix_web::{web, HttpResponse, Responder};
use anyhow::{Context, Result};
use tokio::time::timeout;
use tracing::{debug, error, info, instrument, warn};

use crate::analysis::{analyze, AnalysisReport};
use crate::api::config::{ApiConfig, SAMPLE_FILENAME};
use crate::api::models::{
    AnalyzeRequest, AnalyzeResponse, ErrorResponse, HealthStatus, ReportFileNames, UploadResponse,
};
use crate::ingest;
use crate::report::{self, ReportFiles};

/// N-grams echoed inline in the analyze response.
const TOP_NGRAMS_IN_RESPONSE: usize = 10;

/// Stores an uploaded delimited file in the upload directory.
///
/// The name comes from the `filename` query parameter and is
/// sanitized before it touches the filesystem; only `.csv` uploads
/// are accepted.
#[instrument(skip(body, config), fields(bytes = body.len()))]
pub async fn upload_handler(
    query: web::Query<HashMap<String, String>>,
    body: web::Bytes,
    config: web::Data<ApiConfig>,
) -> impl Responder {
    let filename = match query.get("filename") {
        Some(name) if !name.is_empty() => name,
        _ => {
            warn!("Upload without a filename");
            return HttpResponse::BadRequest()
                .json(ErrorResponse::new("missing 'filename' query parameter"));
        }
    };

    let safe_name = sanitize_filename::sanitize(filename);
    if !ingest::is_allowed_file(&safe_name) {
        warn!("Rejected upload '{}': not a csv", safe_name);
        return HttpResponse::BadRequest()
            .json(ErrorResponse::new("only .csv files are accepted"));
    }

    if let Err(e) = fs::create_dir_all(&config.upload_dir) {
        error!("Failed to create upload dir: {}", e);
        return HttpResponse::InternalServerError()
            .json(ErrorResponse::new("could not store upload"));
    }
    let path = Path::new(&config.upload_dir).join(&safe_name);
    match fs::write(&path, &body) {
        Ok(()) => {
            info!("Stored upload {} ({} bytes)", path.display(), body.len());
            HttpResponse::Ok().json(UploadResponse {
                message: "File uploaded".to_string(),
                filename: safe_name,
            })
        }
        Err(e) => {
            error!("Failed to write upload {}: {}", path.display(), e);
            HttpResponse::InternalServerError()
                .json(ErrorResponse::new("could not store upload"))
        }
    }
}

/// Runs the analysis pipeline over an uploaded file and writes the
/// report artifacts.
///
/// The pipeline itself is pure CPU work, so it runs on the blocking
/// pool rather than the async executor.
#[instrument(skip(config), fields(filename = %request.filename))]
pub async fn analyze_handler(
    request: web::Json<AnalyzeRequest>,
    config: web::Data<ApiConfig>,
) -> impl Responder {
    info!("Received analyze request for file: {}", request.filename);
    let started = Instant::now();

    let safe_name = sanitize_filename::sanitize(&request.filename);
    let input_path = Path::new(&config.upload_dir).join(&safe_name);
    if !input_path.is_file() {
        warn!("Analyze request for missing file {}", input_path.display());
        return HttpResponse::NotFound().json(ErrorResponse::new(format!(
            "no uploaded file named '{}'",
            safe_name
        )));
    }

    let client_name = request
        .client_name
        .clone()
        .filter(|name| !name.is_empty())
        .map(|name| sanitize_filename::sanitize(name).replace(' ', "_"))
        .unwrap_or_else(|| "unnamed_client".to_string());

    let analyzer = config.analyzer.clone();
    let results_dir = PathBuf::from(&config.results_dir);
    let blocking = web::block(move || run_analysis(&input_path, &analyzer, &results_dir, &client_name));

    let (report, files) = match timeout(config.request_timeout, blocking).await {
        Ok(Ok(Ok(output))) => output,
        Ok(Ok(Err(e))) => {
            error!("Analysis failed: {:#}", e);
            return HttpResponse::BadRequest()
                .json(ErrorResponse::new(format!("analysis failed: {}", e)));
        }
        Ok(Err(e)) => {
            error!("Blocking task failed: {}", e);
            return HttpResponse::InternalServerError()
                .json(ErrorResponse::new("analysis task failed"));
        }
        Err(_) => {
            error!(
                "Analysis of {} exceeded the {:?} request timeout",
                safe_name, config.request_timeout
            );
            return HttpResponse::RequestTimeout()
                .json(ErrorResponse::new("analysis timed out"));
        }
    };

    if report.empty_corpus {
        warn!("Analysis produced an empty corpus");
    }

    let top_ngrams = report
        .ngram_counts
        .iter()
        .take(TOP_NGRAMS_IN_RESPONSE)
        .cloned()
        .collect();

    info!(
        "Analysis of {} complete in {:.2}s",
        safe_name,
        started.elapsed().as_secs_f64()
    );
    HttpResponse::Ok().json(AnalyzeResponse {
        message: "Analysis complete".to_string(),
        corpus_size: report.corpus_size,
        rejected: report.rejected,
        empty_corpus: report.empty_corpus,
        insights: report.insights,
        suggestions: report.suggestions,
        top_ngrams,
        files: ReportFileNames {
            txt_file: files.summary_txt,
            csv_file: files.ngram_csv,
            botify_file: files.rules_txt,
            markdown_file: files.recommendations_md,
        },
        processing_time_seconds: started.elapsed().as_secs_f64(),
    })
}

/// Ingest, analyze, and write reports. Runs on the blocking pool.
fn run_analysis(
    input_path: &Path,
    analyzer: &crate::analysis::AnalyzerConfig,
    results_dir: &Path,
    client_name: &str,
) -> Result<(AnalysisReport, ReportFiles)> {
    let urls = ingest::read_url_column(input_path)?;
    let report = analyze(&urls, analyzer).context("analysis pipeline failed")?;
    let files = report::write_all(&report, results_dir, client_name)?;
    Ok((report, files))
}

/// Lists uploaded files available for analysis.
#[instrument(skip(config))]
pub async fn list_files_handler(config: web::Data<ApiConfig>) -> impl Responder {
    let files = list_dir(Path::new(&config.upload_dir))
        .into_iter()
        .filter(|name| ingest::is_allowed_file(name))
        .collect::<Vec<_>>();
    debug!("Listing {} uploaded files", files.len());
    HttpResponse::Ok().json(files)
}

/// Streams a generated report file back to the caller.
#[instrument(skip(config))]
pub async fn download_handler(
    filename: web::Path<String>,
    config: web::Data<ApiConfig>,
) -> impl Responder {
    let safe_name = sanitize_filename::sanitize(filename.as_str());
    let path = Path::new(&config.results_dir).join(&safe_name);
    match fs::read(&path) {
        Ok(bytes) => {
            debug!("Serving {} ({} bytes)", path.display(), bytes.len());
            HttpResponse::Ok()
                .insert_header((
                    "Content-Disposition",
                    format!("attachment; filename=\"{}\"", safe_name),
                ))
                .body(bytes)
        }
        Err(e) => {
            warn!("Download of {} failed: {}", path.display(), e);
            HttpResponse::NotFound().json(ErrorResponse::new(format!(
                "no result file named '{}'",
                safe_name
            )))
        }
    }
}

/// Clears uploads (keeping the bundled sample) and all result files.
#[instrument(skip(config))]
pub async fn delete_files_handler(config: web::Data<ApiConfig>) -> impl Responder {
    let mut deleted = 0usize;

    for name in list_dir(Path::new(&config.upload_dir)) {
        if name == SAMPLE_FILENAME {
            continue;
        }
        let path = Path::new(&config.upload_dir).join(&name);
        match fs::remove_file(&path) {
            Ok(()) => deleted += 1,
            Err(e) => warn!("Failed to delete {}: {}", path.display(), e),
        }
    }
    for name in list_dir(Path::new(&config.results_dir)) {
        let path = Path::new(&config.results_dir).join(&name);
        match fs::remove_file(&path) {
            Ok(()) => deleted += 1,
            Err(e) => warn!("Failed to delete {}: {}", path.display(), e),
        }
    }

    info!("Deleted {} files", deleted);
    HttpResponse::Ok().json(serde_json::json!({
        "message": "All files deleted successfully",
        "deleted": deleted,
    }))
}

/// Health check endpoint for monitoring service status.
#[instrument(skip(config))]
pub async fn health_check(config: web::Data<ApiConfig>) -> impl Responder {
    let uploaded_files = list_dir(Path::new(&config.upload_dir)).len();
    let result_files = list_dir(Path::new(&config.results_dir)).len();
    HttpResponse::Ok().json(HealthStatus {
        status: "healthy".to_string(),
        uploaded_files,
        result_files,
    })
}

/// File names directly under `dir`; missing directory reads as empty.
fn list_dir(dir: &Path) -> Vec<String> {
    let mut names: Vec<String> = fs::read_dir(dir)
        .map(|entries| {
            entries
                .filter_map(|entry| entry.ok())
                .filter(|entry| entry.path().is_file())
                .filter_map(|entry| entry.file_name().into_string().ok())
                .collect()
        })
        .unwrap_or_default();
    names.sort();
    names
}
