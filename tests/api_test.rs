use actix_web::{test, web, App};

use url_insights::analysis::AnalyzerConfig;
use url_insights::api::handlers;
use url_insights::api::ApiConfig;

fn test_config(root: &std::path::Path) -> ApiConfig {
    ApiConfig {
        upload_dir: root.join("uploads").to_string_lossy().into_owned(),
        results_dir: root.join("results").to_string_lossy().into_owned(),
        analyzer: AnalyzerConfig::default(),
        ..ApiConfig::default()
    }
}

macro_rules! test_app {
    ($config:expr) => {
        test::init_service(
            App::new()
                .app_data(web::Data::new($config))
                .service(web::resource("/upload").route(web::post().to(handlers::upload_handler)))
                .service(web::resource("/analyze").route(web::post().to(handlers::analyze_handler)))
                .service(
                    web::resource("/list_files")
                        .route(web::get().to(handlers::list_files_handler)),
                )
                .service(
                    web::resource("/download/{filename}")
                        .route(web::get().to(handlers::download_handler)),
                )
                .service(
                    web::resource("/delete_files")
                        .route(web::post().to(handlers::delete_files_handler)),
                )
                .service(web::resource("/health").route(web::get().to(handlers::health_check))),
        )
        .await
    };
}

const FIXTURE_CSV: &str = "page_url,clicks\n\
https://example.com/shop/shoes/red,10\n\
https://example.com/shop/shoes/blue,7\n\
https://example.com/about,3\n\
not a url,1\n";

#[actix_web::test]
async fn test_upload_then_analyze_flow() {
    let dir = tempfile::tempdir().unwrap();
    let app = test_app!(test_config(dir.path()));

    // Upload
    let req = test::TestRequest::post()
        .uri("/upload?filename=pages.csv")
        .set_payload(FIXTURE_CSV)
        .to_request();
    let resp: serde_json::Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(resp["filename"], "pages.csv");

    // Analyze
    let req = test::TestRequest::post()
        .uri("/analyze")
        .set_json(serde_json::json!({ "filename": "pages.csv", "client_name": "acme" }))
        .to_request();
    let resp: serde_json::Value = test::call_and_read_body_json(&app, req).await;

    assert_eq!(resp["corpus_size"], 3);
    assert_eq!(resp["rejected"].as_array().unwrap().len(), 1);
    assert_eq!(resp["empty_corpus"], false);
    let top = &resp["suggestions"][0];
    assert_eq!(top["pattern_description"], "/shop/shoes/*");
    assert_eq!(top["coverage_count"], 2);

    // All four report files exist and are downloadable
    for key in ["txt_file", "csv_file", "botify_file", "markdown_file"] {
        let name = resp["files"][key].as_str().unwrap();
        let req = test::TestRequest::get()
            .uri(&format!("/download/{}", name))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert!(resp.status().is_success(), "download of {} failed", name);
    }
}

#[actix_web::test]
async fn test_upload_rejects_non_csv() {
    let dir = tempfile::tempdir().unwrap();
    let app = test_app!(test_config(dir.path()));

    let req = test::TestRequest::post()
        .uri("/upload?filename=pages.xlsx")
        .set_payload("whatever")
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), actix_web::http::StatusCode::BAD_REQUEST);
}

#[actix_web::test]
async fn test_analyze_missing_file_is_404() {
    let dir = tempfile::tempdir().unwrap();
    let app = test_app!(test_config(dir.path()));

    let req = test::TestRequest::post()
        .uri("/analyze")
        .set_json(serde_json::json!({ "filename": "nope.csv" }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), actix_web::http::StatusCode::NOT_FOUND);
}

#[actix_web::test]
async fn test_analyze_file_without_url_column() {
    let dir = tempfile::tempdir().unwrap();
    let app = test_app!(test_config(dir.path()));

    let req = test::TestRequest::post()
        .uri("/upload?filename=noting.csv")
        .set_payload("id,clicks\n1,2\n")
        .to_request();
    let _ = test::call_service(&app, req).await;

    let req = test::TestRequest::post()
        .uri("/analyze")
        .set_json(serde_json::json!({ "filename": "noting.csv" }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), actix_web::http::StatusCode::BAD_REQUEST);
}

#[actix_web::test]
async fn test_list_and_delete_files() {
    let dir = tempfile::tempdir().unwrap();
    let config = test_config(dir.path());
    std::fs::create_dir_all(&config.upload_dir).unwrap();
    std::fs::write(
        std::path::Path::new(&config.upload_dir).join("sample-pagelist.csv"),
        FIXTURE_CSV,
    )
    .unwrap();
    std::fs::write(
        std::path::Path::new(&config.upload_dir).join("other.csv"),
        FIXTURE_CSV,
    )
    .unwrap();
    let app = test_app!(config);

    let req = test::TestRequest::get().uri("/list_files").to_request();
    let files: Vec<String> = test::call_and_read_body_json(&app, req).await;
    assert_eq!(files, vec!["other.csv", "sample-pagelist.csv"]);

    // Delete keeps the bundled sample
    let req = test::TestRequest::post().uri("/delete_files").to_request();
    let resp = test::call_service(&app, req).await;
    assert!(resp.status().is_success());

    let req = test::TestRequest::get().uri("/list_files").to_request();
    let files: Vec<String> = test::call_and_read_body_json(&app, req).await;
    assert_eq!(files, vec!["sample-pagelist.csv"]);
}

#[actix_web::test]
async fn test_health_endpoint() {
    let dir = tempfile::tempdir().unwrap();
    let app = test_app!(test_config(dir.path()));

    let req = test::TestRequest::get().uri("/health").to_request();
    let resp: serde_json::Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(resp["status"], "healthy");
}
