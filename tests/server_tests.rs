//! HTTP API tests against a server bound to an ephemeral port

use document_analyzer::config::{Config, QuotaConfig, StorageBackend, StorageConfig};
use document_analyzer::server::{router, AppState};
use document_analyzer::storage::{build_store, StorageManager};
use printpdf::{BuiltinFont, Mm, PdfDocument};
use reqwest::multipart::{Form, Part};
use reqwest::StatusCode;
use serde_json::Value;
use std::sync::Arc;

const CONTRACT_LINES: &[&str] = &[
    "This Agreement is made between Acme Corporation and Globex Ltd.",
    "The parties agree that the contract is governed by the laws of California.",
    "Any breach of this agreement will be resolved by arbitration.",
    "Payment of $10,000 is due on March 1, 2024.",
];

fn make_pdf(lines: &[&str]) -> Vec<u8> {
    let (doc, page, layer) = PdfDocument::new("Test document", Mm(210.0), Mm(297.0), "Layer 1");
    let font = doc.add_builtin_font(BuiltinFont::Helvetica).unwrap();
    let layer = doc.get_page(page).get_layer(layer);

    for (i, line) in lines.iter().enumerate() {
        layer.use_text(*line, 11.0, Mm(15.0), Mm(280.0 - 8.0 * i as f32), &font);
    }

    doc.save_to_bytes().unwrap()
}

async fn spawn_app(config: Config, storage: Option<Arc<StorageManager>>) -> String {
    let state = AppState::new(&config, storage).unwrap();
    let app = router(state);

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    format!("http://{}", addr)
}

fn memory_storage(quota: QuotaConfig) -> Arc<StorageManager> {
    let config = StorageConfig {
        enabled: true,
        backend: StorageBackend::Memory,
        quota,
        ..StorageConfig::default()
    };
    let (store, location) = build_store(&config).unwrap();
    Arc::new(StorageManager::with_store(store, location, &config))
}

fn upload_form(file_name: &str, bytes: Vec<u8>) -> Form {
    Form::new().part("file", Part::bytes(bytes).file_name(file_name.to_string()))
}

async fn post_analyze(base: &str, query: &str, form: Form) -> (StatusCode, Value) {
    let response = reqwest::Client::new()
        .post(format!("{}/analyze{}", base, query))
        .multipart(form)
        .send()
        .await
        .unwrap();
    let status = response.status();
    let body: Value = response.json().await.unwrap();
    (status, body)
}

#[tokio::test]
async fn test_root_and_health() {
    let base = spawn_app(Config::default(), None).await;

    let root: Value = reqwest::get(format!("{}/", base)).await.unwrap().json().await.unwrap();
    assert_eq!(root, serde_json::json!({"status": "ok"}));

    let health: Value = reqwest::get(format!("{}/health", base))
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(health["status"], "ok");
    assert_eq!(health["version"], env!("CARGO_PKG_VERSION"));
    assert_eq!(health["storage_enabled"], false);
    assert!(health["uptime_secs"].is_u64());
}

#[tokio::test]
async fn test_analyze_pdf_returns_report() {
    let base = spawn_app(Config::default(), None).await;

    let (status, body) = post_analyze(&base, "", upload_form("contract.pdf", make_pdf(CONTRACT_LINES))).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "success");

    let data = &body["data"];
    assert!(!data["summary"].as_str().unwrap().is_empty());
    assert_eq!(data["classification"]["document_type"], "Legal Document");
    assert!(data["entities"].as_array().unwrap().iter().any(|e| e["entity_group"] == "MONEY"));
    assert!(data["keywords"].as_array().unwrap().len() <= 10);
    assert!(data["readability"]["reading_level"].is_string());
    assert!(data["statistics"]["word_count"].as_u64().unwrap() > 20);
    assert_eq!(data["metadata"]["source_name"], "contract.pdf");
    assert!(data["metadata"].get("storage").is_none());
}

#[tokio::test]
async fn test_non_pdf_name_is_rejected() {
    let base = spawn_app(Config::default(), None).await;

    let (status, body) = post_analyze(&base, "", upload_form("notes.txt", b"plain text".to_vec())).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["status"], "error");
    assert_eq!(body["error"], "Only PDF files are supported");
}

#[tokio::test]
async fn test_pdf_name_with_wrong_content_is_rejected() {
    let base = spawn_app(Config::default(), None).await;

    let (status, body) = post_analyze(&base, "", upload_form("fake.pdf", b"not really a pdf".to_vec())).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "File content is not a valid PDF");
}

#[tokio::test]
async fn test_missing_file_field() {
    let base = spawn_app(Config::default(), None).await;

    let form = Form::new().text("comment", "no file here");
    let (status, body) = post_analyze(&base, "", form).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["status"], "error");
}

#[tokio::test]
async fn test_invalid_store_flag_returns_json_error() {
    let base = spawn_app(Config::default(), None).await;

    let (status, body) = post_analyze(&base, "?store=yes", upload_form("contract.pdf", make_pdf(CONTRACT_LINES))).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["status"], "error");
    assert!(body["error"].as_str().unwrap().contains("store"));
}

#[tokio::test]
async fn test_oversized_upload() {
    let mut config = Config::default();
    config.server.max_upload_bytes = 1024;
    let base = spawn_app(config, None).await;

    let mut bytes = b"%PDF-1.4\n".to_vec();
    bytes.resize(4096, b' ');
    let (status, body) = post_analyze(&base, "", upload_form("big.pdf", bytes)).await;

    assert_eq!(status, StatusCode::PAYLOAD_TOO_LARGE);
    assert_eq!(body["status"], "error");
}

#[tokio::test]
async fn test_pdf_without_text() {
    let base = spawn_app(Config::default(), None).await;

    let (status, body) = post_analyze(&base, "", upload_form("blank.pdf", make_pdf(&[]))).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "No text could be extracted from the PDF");
}

#[tokio::test]
async fn test_storage_stats_disabled() {
    let base = spawn_app(Config::default(), None).await;

    let stats: Value = reqwest::get(format!("{}/storage/stats", base))
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(stats, serde_json::json!({"enabled": false}));
}

#[tokio::test]
async fn test_analyze_persists_to_storage() {
    let storage = memory_storage(QuotaConfig::default());
    let base = spawn_app(Config::default(), Some(storage)).await;

    let (status, body) = post_analyze(&base, "", upload_form("contract.pdf", make_pdf(CONTRACT_LINES))).await;
    assert_eq!(status, StatusCode::OK);

    let receipt = &body["data"]["metadata"]["storage"];
    assert!(receipt["upload_key"].as_str().unwrap().ends_with("-contract.pdf"));
    assert!(receipt["result_key"].as_str().unwrap().ends_with(".json"));

    // Opting out leaves storage untouched
    let (status, body) = post_analyze(&base, "?store=false", upload_form("contract.pdf", make_pdf(CONTRACT_LINES))).await;
    assert_eq!(status, StatusCode::OK);
    assert!(body["data"]["metadata"].get("storage").is_none());

    let stats: Value = reqwest::get(format!("{}/storage/stats", base))
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(stats["enabled"], true);
    assert_eq!(stats["backend"], "memory");
    assert_eq!(stats["usage"]["object_count"], 2);
    assert_eq!(stats["remaining"]["objects"], 998);
    assert_eq!(stats["limits"]["max_monthly_writes"], 1500);
}

#[tokio::test]
async fn test_quota_exhaustion_does_not_fail_requests() {
    let storage = memory_storage(QuotaConfig {
        max_objects: 1,
        ..QuotaConfig::default()
    });
    let base = spawn_app(Config::default(), Some(storage)).await;

    let (status, body) = post_analyze(&base, "", upload_form("contract.pdf", make_pdf(CONTRACT_LINES))).await;

    assert_eq!(status, StatusCode::OK);
    let receipt = &body["data"]["metadata"]["storage"];
    assert!(receipt["upload_key"].is_string());
    assert!(receipt["result_key"].is_null());
    assert!(receipt["skipped"][0]
        .as_str()
        .unwrap()
        .contains("object limit of 1 reached"));
}

#[tokio::test]
async fn test_cors_allows_any_origin() {
    let base = spawn_app(Config::default(), None).await;

    let response = reqwest::Client::new()
        .get(format!("{}/health", base))
        .header("Origin", "http://example.com")
        .send()
        .await
        .unwrap();

    assert_eq!(
        response.headers().get("access-control-allow-origin").unwrap(),
        "*"
    );
}
