//! Functional tests for the OpenAI-compatible backend against a mock HTTP server

use serde_json::json;
use tokio_test::{assert_err, assert_ok};
use wiremock::{
    matchers::{body_partial_json, header, method, path},
    Match, Mock, MockServer, Request, ResponseTemplate,
};

use image_gen_gateway::{
    backend::{ApiKey, GenerateRequest, ImageBackend, OpenAiBackend},
    config::UpstreamConfig,
    error::AppError,
    payload::ImageAsset,
    request::Mode,
};

/// Matches multipart bodies containing every given fragment
struct BodyContains(Vec<&'static str>);

impl Match for BodyContains {
    fn matches(&self, request: &Request) -> bool {
        let body = String::from_utf8_lossy(&request.body);
        self.0.iter().all(|fragment| body.contains(fragment))
    }
}

fn backend_for(server: &MockServer) -> OpenAiBackend {
    let config = UpstreamConfig {
        base_url: format!("{}/v1", server.uri()),
        model: "gpt-image-1".to_string(),
        timeout_ms: 5000,
    };
    OpenAiBackend::new(&config).unwrap()
}

fn asset(bytes: &[u8], filename: &str) -> ImageAsset {
    ImageAsset {
        bytes: bytes.to_vec(),
        mime_type: "image/png",
        filename: filename.to_string(),
    }
}

fn request(mode: Mode, images: Vec<ImageAsset>, mask: Option<ImageAsset>) -> GenerateRequest {
    GenerateRequest {
        mode,
        prompt: "a red ball".to_string(),
        size: "1024x1024".to_string(),
        quality: "medium".to_string(),
        images,
        mask,
        api_key: ApiKey::new("sk-test"),
    }
}

#[tokio::test]
async fn test_generate_posts_json() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v1/images/generations"))
        .and(header("authorization", "Bearer sk-test"))
        .and(body_partial_json(json!({
            "model": "gpt-image-1",
            "prompt": "a red ball",
            "size": "1024x1024",
            "quality": "medium",
            "n": 1
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "created": 1700000000,
            "data": [{ "b64_json": "AQID" }]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let backend = backend_for(&server);
    let response = backend
        .generate(request(Mode::Generate, vec![], None))
        .await
        .unwrap();

    assert_eq!(response.created, Some(1700000000));
    assert_eq!(response.images.len(), 1);
    assert_eq!(response.images[0].b64_json.as_deref(), Some("AQID"));
    assert!(response.images[0].url.is_none());
}

#[tokio::test]
async fn test_edit_posts_single_image_multipart() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v1/images/edits"))
        .and(header("authorization", "Bearer sk-test"))
        .and(BodyContains(vec![
            "name=\"image\"",
            "filename=\"image.png\"",
            "name=\"prompt\"",
            "a red ball",
        ]))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": [{ "url": "https://img.example/out.png" }]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let backend = backend_for(&server);
    let response = assert_ok!(
        backend
            .generate(request(Mode::Edit, vec![asset(b"img", "image.png")], None))
            .await
    );
    assert_eq!(
        response.images[0].url.as_deref(),
        Some("https://img.example/out.png")
    );
}

#[tokio::test]
async fn test_inpaint_posts_images_list_and_mask() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v1/images/edits"))
        .and(BodyContains(vec![
            "image[]",
            "filename=\"image_0.png\"",
            "filename=\"image_1.png\"",
            "name=\"mask\"",
            "filename=\"mask.png\"",
        ]))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": [{ "b64_json": "AQID" }]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let backend = backend_for(&server);
    let images = vec![asset(b"one", "image_0.png"), asset(b"two", "image_1.png")];
    assert_ok!(
        backend
            .generate(request(Mode::Inpaint, images, Some(asset(b"m", "mask.png"))))
            .await
    );
}

#[tokio::test]
async fn test_upstream_error_message_and_status() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v1/images/generations"))
        .respond_with(ResponseTemplate::new(429).set_body_json(json!({
            "error": { "message": "Rate limit reached", "type": "requests" }
        })))
        .mount(&server)
        .await;

    let backend = backend_for(&server);
    let err = assert_err!(backend.generate(request(Mode::Generate, vec![], None)).await);

    match err {
        AppError::Upstream { status, message } => {
            assert_eq!(status, Some(429));
            assert_eq!(message, "Rate limit reached");
        }
        other => panic!("expected upstream error, got {:?}", other),
    }
}

#[tokio::test]
async fn test_upstream_plain_text_error() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v1/images/generations"))
        .respond_with(ResponseTemplate::new(503).set_body_string("overloaded"))
        .mount(&server)
        .await;

    let backend = backend_for(&server);
    let err = assert_err!(backend.generate(request(Mode::Generate, vec![], None)).await);
    assert_eq!(err.status_code().as_u16(), 503);
    assert_eq!(err.to_string(), "API error: overloaded");
}

#[tokio::test]
async fn test_unparseable_success_body_is_internal() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v1/images/generations"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>"))
        .mount(&server)
        .await;

    let backend = backend_for(&server);
    let err = assert_err!(backend.generate(request(Mode::Generate, vec![], None)).await);
    assert!(matches!(err, AppError::Internal(_)));
}

#[tokio::test]
async fn test_connection_failure_is_500() {
    let config = UpstreamConfig {
        base_url: "http://127.0.0.1:1/v1".to_string(),
        model: "gpt-image-1".to_string(),
        timeout_ms: 2000,
    };
    let backend = OpenAiBackend::new(&config).unwrap();

    let err = assert_err!(backend.generate(request(Mode::Generate, vec![], None)).await);
    assert_eq!(err.status_code().as_u16(), 500);
}
