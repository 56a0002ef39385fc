use async_trait::async_trait;
use axum::body::Body;
use axum::Router;
use base64::{engine::general_purpose::STANDARD, Engine};
use glimpse::auth::TokenSource;
use glimpse::errors::AuthError;
use glimpse::orchestrator::Orchestrator;
use glimpse::providers::configs::GeminiProviderConfig;
use glimpse::providers::gemini::GeminiProvider;
use glimpse::vision::google::{GoogleVisionClient, GoogleVisionConfig};
use glimpse_server::{build_app, configuration::ServerSettings, state::AppState};
use http::{Request, StatusCode};
use http_body_util::BodyExt;
use serde_json::{json, Value};
use std::sync::Arc;
use tower::ServiceExt;
use wiremock::matchers::{body_partial_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

struct StaticToken;

#[async_trait]
impl TokenSource for StaticToken {
    async fn access_token(&self) -> Result<String, AuthError> {
        Ok("e2e-token".to_string())
    }
}

/// A generation backend that answers with the prompt it received
async fn echo_generation() -> MockServer {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v1beta/models/gemini-1.5-flash:generateContent"))
        .and(header("x-goog-api-key", "e2e-key"))
        .respond_with(|request: &wiremock::Request| {
            let body: Value = serde_json::from_slice(&request.body).unwrap();
            let prompt = body["contents"][0]["parts"][0]["text"].clone();
            ResponseTemplate::new(200).set_body_json(json!({
                "candidates": [{
                    "content": {"role": "model", "parts": [{"text": prompt}]},
                    "finishReason": "STOP"
                }],
                "usageMetadata": {"promptTokenCount": 12, "candidatesTokenCount": 12, "totalTokenCount": 24}
            }))
        })
        .mount(&server)
        .await;
    server
}

async fn mount_feature(server: &MockServer, feature: &str, response: Value) {
    Mock::given(method("POST"))
        .and(path("/v1/images:annotate"))
        .and(header("authorization", "Bearer e2e-token"))
        .and(body_partial_json(json!({
            "requests": [{"features": [{"type": feature}]}]
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"responses": [response]})))
        .mount(server)
        .await;
}

fn orchestrator(generation: &MockServer) -> Orchestrator {
    let config = GeminiProviderConfig {
        host: generation.uri(),
        ..GeminiProviderConfig::new("e2e-key")
    };
    Orchestrator::new(Arc::new(GeminiProvider::new(config).unwrap()))
}

fn with_vision(orchestrator: Orchestrator, vision: &MockServer) -> Orchestrator {
    let config = GoogleVisionConfig {
        host: vision.uri(),
        ..Default::default()
    };
    let client = GoogleVisionClient::new(config, Box::new(StaticToken)).unwrap();
    orchestrator.with_vision(Arc::new(client))
}

fn app(orchestrator: Orchestrator) -> Router {
    build_app(AppState::new(orchestrator), &ServerSettings::default())
}

async fn send(app: Router, request: Request<Body>) -> (StatusCode, http::HeaderMap, Vec<u8>) {
    let response = app.oneshot(request).await.unwrap();
    let status = response.status();
    let headers = response.headers().clone();
    let body = response.into_body().collect().await.unwrap().to_bytes();
    (status, headers, body.to_vec())
}

fn ask(body: Value) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri("/api/ask")
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

fn image_data_url() -> String {
    format!("data:image/jpeg;base64,{}", STANDARD.encode(b"\xff\xd8\xff\xe0 not really a jpeg"))
}

#[tokio::test]
async fn test_text_question_round_trip() {
    let generation = echo_generation().await;
    let app = app(orchestrator(&generation));

    let (status, _, body) = send(app, ask(json!({"message": "What is this?"}))).await;
    let body: Value = serde_json::from_slice(&body).unwrap();

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({"reply": "What is this?"}));
}

#[tokio::test]
async fn test_image_question_round_trip() {
    let generation = echo_generation().await;
    let vision = MockServer::start().await;
    mount_feature(
        &vision,
        "TEXT_DETECTION",
        json!({"textAnnotations": [{"description": "STOP"}]}),
    )
    .await;
    mount_feature(
        &vision,
        "OBJECT_LOCALIZATION",
        json!({"localizedObjectAnnotations": [{"name": "Traffic sign"}]}),
    )
    .await;
    mount_feature(
        &vision,
        "LABEL_DETECTION",
        json!({"labelAnnotations": [{"description": "Signage"}, {"description": "Red"}]}),
    )
    .await;

    let app = app(with_vision(orchestrator(&generation), &vision));

    let request = ask(json!({"message": "What does the sign say?", "image": image_data_url()}));
    let (status, _, body) = send(app, request).await;
    let body: Value = serde_json::from_slice(&body).unwrap();

    assert_eq!(status, StatusCode::OK);
    let reply = body["reply"].as_str().unwrap();
    assert!(reply.contains("STOP"));
    assert!(reply.contains("Traffic sign"));
    assert!(reply.contains("Signage, Red"));
    assert!(reply.contains("What does the sign say?"));
}

#[tokio::test]
async fn test_vision_outage_still_answers() {
    let generation = echo_generation().await;
    let vision = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v1/images:annotate"))
        .respond_with(ResponseTemplate::new(403).set_body_json(json!({
            "error": {"code": 403, "message": "Permission denied", "status": "PERMISSION_DENIED"}
        })))
        .mount(&vision)
        .await;

    let app = app(with_vision(orchestrator(&generation), &vision));

    let request = ask(json!({"message": "What is this?", "image": image_data_url()}));
    let (status, _, body) = send(app, request).await;
    let body: Value = serde_json::from_slice(&body).unwrap();

    assert_eq!(status, StatusCode::OK);
    let reply = body["reply"].as_str().unwrap();
    assert!(reply.contains("could not be analyzed"));
    assert!(reply.ends_with("What is this?"));
}

#[tokio::test]
async fn test_generation_rejection_is_reported() {
    let generation = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(400).set_body_json(json!({
            "error": {"code": 400, "message": "API key not valid. Please pass a valid API key.", "status": "INVALID_ARGUMENT"}
        })))
        .mount(&generation)
        .await;

    let app = app(orchestrator(&generation));

    let (status, _, body) = send(app, ask(json!({"message": "Hi"}))).await;
    let body: Value = serde_json::from_slice(&body).unwrap();

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    let reply = body["reply"].as_str().unwrap();
    assert!(reply.starts_with("Error occurred: "));
    assert!(reply.contains("API key not valid"));
}

#[tokio::test]
async fn test_index_page_and_assets() {
    let generation = echo_generation().await;
    let app = app(orchestrator(&generation));

    let request = Request::builder().uri("/").body(Body::empty()).unwrap();
    let (status, headers, body) = send(app.clone(), request).await;
    assert_eq!(status, StatusCode::OK);
    assert!(headers["content-type"].to_str().unwrap().starts_with("text/html"));
    assert!(String::from_utf8(body).unwrap().contains("id=\"chatBox\""));

    let request = Request::builder()
        .uri("/static/script.js")
        .body(Body::empty())
        .unwrap();
    let (status, headers, body) = send(app.clone(), request).await;
    assert_eq!(status, StatusCode::OK);
    assert!(headers["content-type"]
        .to_str()
        .unwrap()
        .starts_with("text/javascript"));
    assert!(String::from_utf8(body).unwrap().contains("/api/ask"));

    let request = Request::builder()
        .uri("/static/style.css")
        .body(Body::empty())
        .unwrap();
    let (status, headers, _) = send(app, request).await;
    assert_eq!(status, StatusCode::OK);
    assert!(headers["content-type"].to_str().unwrap().starts_with("text/css"));
}

#[tokio::test]
async fn test_unknown_asset_is_not_found() {
    let generation = echo_generation().await;
    let app = app(orchestrator(&generation));

    let request = Request::builder()
        .uri("/static/Moon.png")
        .body(Body::empty())
        .unwrap();
    let (status, _, body) = send(app, request).await;
    let body: Value = serde_json::from_slice(&body).unwrap();

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body, json!({"reply": "Not found"}));
}

#[tokio::test]
async fn test_photo_sized_image_round_trip() {
    let generation = echo_generation().await;
    let vision = MockServer::start().await;
    mount_feature(&vision, "TEXT_DETECTION", json!({})).await;
    mount_feature(&vision, "OBJECT_LOCALIZATION", json!({})).await;
    mount_feature(
        &vision,
        "LABEL_DETECTION",
        json!({"labelAnnotations": [{"description": "Landscape"}]}),
    )
    .await;

    let app = app(with_vision(orchestrator(&generation), &vision));

    let photo = format!(
        "data:image/jpeg;base64,{}",
        STANDARD.encode(vec![0x5au8; 4 * 1024 * 1024])
    );
    let request = ask(json!({"message": "Where was this taken?", "image": photo}));
    let (status, _, body) = send(app, request).await;
    let body: Value = serde_json::from_slice(&body).unwrap();

    assert_eq!(status, StatusCode::OK);
    assert!(body["reply"].as_str().unwrap().contains("Landscape"));
}

#[tokio::test]
async fn test_unknown_route_is_not_found() {
    let generation = echo_generation().await;
    let app = app(orchestrator(&generation));

    let request = Request::builder()
        .uri("/api/unknown")
        .body(Body::empty())
        .unwrap();
    let (status, _, body) = send(app, request).await;
    let body: Value = serde_json::from_slice(&body).unwrap();

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body, json!({"reply": "Not found"}));
}

#[tokio::test]
async fn test_cors_allows_any_origin() {
    let generation = echo_generation().await;
    let app = app(orchestrator(&generation));

    let request = Request::builder()
        .method("OPTIONS")
        .uri("/api/ask")
        .header("origin", "https://example.com")
        .header("access-control-request-method", "POST")
        .header("access-control-request-headers", "content-type")
        .body(Body::empty())
        .unwrap();
    let (status, headers, _) = send(app, request).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(headers["access-control-allow-origin"], "*");
}
