pub mod config;
pub mod handlers;
pub mod models;

use actix_web::{web, App, HttpServer};
use anyhow::Result;
use tracing::{debug, error, info, instrument};

pub use config::ApiConfig;

/// Starts the API server with the specified configuration.
///
/// Routes:
/// - `POST /upload?filename=<name>` — store a delimited input file
/// - `POST /analyze` — run the pipeline over an uploaded file
/// - `GET /list_files` — uploaded files available for analysis
/// - `GET /download/{filename}` — fetch a generated report file
/// - `POST /delete_files` — clear uploads and results
/// - `GET /health` — service status
///
/// # Arguments
/// * `host` - Host address to bind to (e.g., "127.0.0.1")
/// * `port` - Port to listen on
/// * `config` - Optional API configuration (uses defaults if None)
#[instrument(skip(config))]
pub async fn start_server(host: &str, port: u16, config: Option<ApiConfig>) -> Result<()> {
    let config = config.unwrap_or_else(|| {
        debug!("Using default API configuration");
        ApiConfig::default()
    });

    // A bad analyzer configuration should fail startup, not the first
    // analyze request.
    config.analyzer.validate()?;

    info!(
        "Starting URL insights server on {}:{} (uploads: {}, results: {})",
        host, port, config.upload_dir, config.results_dir
    );
    std::fs::create_dir_all(&config.upload_dir)?;
    std::fs::create_dir_all(&config.results_dir)?;

    let config_data = web::Data::new(config);

    HttpServer::new(move || {
        App::new()
            .app_data(config_data.clone())
            .service(web::resource("/upload").route(web::post().to(handlers::upload_handler)))
            .service(web::resource("/analyze").route(web::post().to(handlers::analyze_handler)))
            .service(web::resource("/list_files").route(web::get().to(handlers::list_files_handler)))
            .service(
                web::resource("/download/{filename}")
                    .route(web::get().to(handlers::download_handler)),
            )
            .service(
                web::resource("/delete_files").route(web::post().to(handlers::delete_files_handler)),
            )
            .service(web::resource("/health").route(web::get().to(handlers::health_check)))
    })
    .bind((host, port))
    .map_err(|e| {
        error!("Failed to bind to {}:{}: {}", host, port, e);
        e
    })?
    .run()
    .await?;

    info!("Server shutdown complete");
    Ok(())
}
