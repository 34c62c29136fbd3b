//! Router tests for the detection API
//!
//! Requests go through the full axum router with `oneshot`; the models are
//! trained from the bundled corpus on the first `/detect` call.

use axum::{
    body::Body,
    http::{Request, StatusCode},
    Router,
};
use serde_json::{json, Value};
use spam_api::{ApiConfig, ApiServer};
use std::io::Write;
use std::path::PathBuf;
use tower::ServiceExt;

const DATASET: &str = concat!(
    env!("CARGO_MANIFEST_DIR"),
    "/../dataset/cleaned_dataset_small.csv"
);

fn config_with_dataset(path: PathBuf) -> ApiConfig {
    let mut config = ApiConfig::development();
    config.training.dataset_path = path;
    config
}

fn server() -> ApiServer {
    ApiServer::new(&config_with_dataset(PathBuf::from(DATASET)))
}

async fn get(app: &Router, uri: &str) -> (StatusCode, Value) {
    let request = Request::builder().uri(uri).body(Body::empty()).unwrap();
    send(app, request).await
}

async fn detect(app: &Router, body: Value) -> (StatusCode, Value) {
    let request = Request::builder()
        .method("POST")
        .uri("/detect")
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap();
    send(app, request).await
}

async fn send(app: &Router, request: Request<Body>) -> (StatusCode, Value) {
    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let value = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
    (status, value)
}

fn all_loaded(health: &Value, expected: bool) -> bool {
    ["tfidf", "logistic_regression", "naive_bayes", "kmeans"]
        .iter()
        .all(|key| health["models_loaded"][key] == Value::Bool(expected))
}

#[tokio::test]
async fn test_root_and_ping() {
    let app = server().router();

    let (status, body) = get(&app, "/").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Spam Detection API is running!");
    assert_eq!(body["status"], "healthy");

    let (status, body) = get(&app, "/ping").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "pong");
    assert_eq!(body["message"], "API is running");
}

#[tokio::test]
async fn test_models_lists_three_choices() {
    let app = server().router();
    let (status, body) = get(&app, "/models").await;
    assert_eq!(status, StatusCode::OK);

    let names: Vec<&str> = body["available_models"]
        .as_array()
        .unwrap()
        .iter()
        .map(|m| m["name"].as_str().unwrap())
        .collect();
    assert_eq!(names, vec!["logistic", "naive_bayes", "kmeans"]);
    assert_eq!(
        body["available_models"][0]["description"],
        "Logistic Regression - Best overall performance"
    );
}

#[tokio::test]
async fn test_obvious_spam_with_logistic() {
    let app = server().router();
    let (status, body) = detect(
        &app,
        json!({"text": "WIN A FREE PRIZE NOW!!!", "model": "logistic"}),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["is_spam"], true);
    assert_eq!(body["model_used"], "Logistic Regression");
    assert_eq!(body["message"], "This message appears to be spam.");
    assert!(body["confidence"].as_f64().unwrap() > 0.5);
}

#[tokio::test]
async fn test_legitimate_message_with_naive_bayes() {
    let app = server().router();
    let (status, body) = detect(
        &app,
        json!({"text": "See you at the meeting tomorrow", "model": "naive_bayes"}),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["is_spam"], false);
    assert_eq!(body["model_used"], "Naive Bayes");
    assert_eq!(body["message"], "This message appears to be legitimate.");
}

#[tokio::test]
async fn test_model_defaults_to_logistic_and_is_case_insensitive() {
    let app = server().router();

    let (status, body) = detect(&app, json!({"text": "Claim your free cash prize"})).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["model_used"], "Logistic Regression");

    let (status, body) = detect(&app, json!({"text": "hello", "model": "KMeans"})).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["model_used"], "K-Means");
}

#[tokio::test]
async fn test_every_model_returns_consistent_results() {
    let app = server().router();
    let texts = [
        "URGENT! You have won a cash award, call now",
        "Are we still meeting for lunch?",
        "the and of",
        "zzzz qqqq",
    ];

    for model in ["logistic", "naive_bayes", "kmeans"] {
        for text in texts {
            let (status, body) = detect(&app, json!({"text": text, "model": model})).await;
            assert_eq!(status, StatusCode::OK, "{} / {}", model, text);

            let confidence = body["confidence"].as_f64().unwrap();
            assert!((0.0..=1.0).contains(&confidence));

            let is_spam = body["is_spam"].as_bool().unwrap();
            let expected_message = if is_spam {
                "This message appears to be spam."
            } else {
                "This message appears to be legitimate."
            };
            assert_eq!(body["message"], expected_message);
        }
    }
}

#[tokio::test]
async fn test_empty_text_is_rejected_without_training() {
    let server = server();
    let app = server.router();

    for text in ["", "   "] {
        let (status, body) = detect(&app, json!({"text": text, "model": "logistic"})).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["detail"], "Text cannot be empty");
    }

    assert_eq!(server.state().registry.training_runs(), 0);
    let (_, health) = get(&app, "/health").await;
    assert!(all_loaded(&health, false));
}

#[tokio::test]
async fn test_unknown_model_names_the_choices() {
    let server = server();
    let app = server.router();

    let (status, body) = detect(&app, json!({"text": "hello", "model": "unknown_model"})).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let detail = body["detail"].as_str().unwrap();
    assert!(detail.contains("logistic"));
    assert!(detail.contains("naive_bayes"));
    assert!(detail.contains("kmeans"));
    assert_eq!(server.state().registry.training_runs(), 0);
}

#[tokio::test]
async fn test_malformed_body_is_a_client_error() {
    let app = server().router();
    let (status, body) = detect(&app, json!({"model": "logistic"})).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["detail"].is_string());
}

#[tokio::test]
async fn test_health_reports_training_state() {
    let app = server().router();

    let (status, health) = get(&app, "/health").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(health["status"], "healthy");
    assert!(all_loaded(&health, false));

    let (status, _) = detect(&app, json!({"text": "hello there", "model": "logistic"})).await;
    assert_eq!(status, StatusCode::OK);

    let (_, health) = get(&app, "/health").await;
    assert!(all_loaded(&health, true));
}

#[tokio::test]
async fn test_concurrent_first_requests_train_once() {
    let server = server();
    let app = server.router();

    let handles: Vec<_> = (0..8)
        .map(|i| {
            let app = app.clone();
            let model = ["logistic", "naive_bayes", "kmeans"][i % 3];
            tokio::spawn(async move {
                detect(&app, json!({"text": "Free entry to win a prize", "model": model})).await
            })
        })
        .collect();

    for handle in handles {
        let (status, body) = handle.await.unwrap();
        assert_eq!(status, StatusCode::OK);
        assert!(body["is_spam"].is_boolean());
    }

    assert_eq!(server.state().registry.training_runs(), 1);
    assert!(server.state().registry.is_loaded());
}

#[tokio::test]
async fn test_missing_dataset_fails_and_retries() {
    let dir = tempfile::tempdir().unwrap();
    let server = ApiServer::new(&config_with_dataset(dir.path().join("missing.csv")));
    let app = server.router();

    let (status, body) = detect(&app, json!({"text": "hello", "model": "logistic"})).await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert!(body["detail"]
        .as_str()
        .unwrap()
        .starts_with("Failed to train models"));

    let (_, health) = get(&app, "/health").await;
    assert!(all_loaded(&health, false));

    let (status, _) = detect(&app, json!({"text": "hello", "model": "logistic"})).await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(server.state().registry.training_runs(), 2);
}

#[tokio::test]
async fn test_corrupt_dataset_is_a_training_failure() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    writeln!(file, "text,label").unwrap();
    writeln!(file, "free prize,1").unwrap();
    file.flush().unwrap();

    let server = ApiServer::new(&config_with_dataset(file.path().to_path_buf()));
    let app = server.router();

    let (status, body) = detect(&app, json!({"text": "hello", "model": "naive_bayes"})).await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert!(body["detail"].as_str().unwrap().contains("preprocessed_text"));
}

#[tokio::test]
async fn test_single_class_dataset_is_a_training_failure() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    writeln!(file, "preprocessed_text,spam").unwrap();
    writeln!(file, "see meet tomorrow,0").unwrap();
    writeln!(file, "lunch later,0").unwrap();
    file.flush().unwrap();

    let server = ApiServer::new(&config_with_dataset(file.path().to_path_buf()));
    let app = server.router();

    let (status, _) = detect(&app, json!({"text": "hello", "model": "kmeans"})).await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert!(!server.state().registry.is_loaded());
}
