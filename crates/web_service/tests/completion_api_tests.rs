use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use actix_http::Request;
use actix_web::{
    dev::{Service, ServiceResponse},
    test, web, App, Error,
};
use async_trait::async_trait;
use completion_client::{
    CompletionClient, CompletionClientTrait, CompletionError, CompletionParams, Config, Message,
};
use serde_json::json;
use wiremock::{
    matchers::{method, path},
    Mock, MockServer, ResponseTemplate,
};

use web_service::config::ServiceConfig;
use web_service::server::{app_config, AppState};

const COMPLETION_ENDPOINTS: [&str; 4] = [
    "/api/v1/openai/summary",
    "/api/v1/openai/paragraph",
    "/api/v1/openai/chatbot",
    "/api/v1/openai/js-converter",
];

/// Matches upstream requests whose JSON body contains the given fragment.
struct BodyContains(&'static str);

impl wiremock::Match for BodyContains {
    fn matches(&self, request: &wiremock::Request) -> bool {
        String::from_utf8_lossy(&request.body).contains(self.0)
    }
}

/// Trait-level mock that records how often the adapter was invoked.
#[derive(Default)]
struct CountingClient {
    calls: AtomicUsize,
}

#[async_trait]
impl CompletionClientTrait for CountingClient {
    async fn complete(
        &self,
        _messages: &[Message],
        _params: CompletionParams,
    ) -> Result<String, CompletionError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok("mock content".to_string())
    }
}

async fn init_app(
    client: Arc<dyn CompletionClientTrait>,
    service_config: ServiceConfig,
) -> impl Service<Request, Response = ServiceResponse, Error = Error> {
    let app_state = web::Data::new(AppState {
        completion_client: client,
    });
    test::init_service(
        App::new()
            .app_data(app_state)
            .configure(app_config(service_config)),
    )
    .await
}

/// Full relay chain: real `CompletionClient` pointed at a wiremock upstream.
async fn setup_relay() -> (
    impl Service<Request, Response = ServiceResponse, Error = Error>,
    MockServer,
) {
    let mock_server = MockServer::start().await;
    let config = Config {
        api_key: Some("sk-test".to_string()),
        api_base: mock_server.uri(),
        model: "deepseek-chat".to_string(),
        timeout_secs: 5,
        max_concurrent_requests: 4,
    };
    let client: Arc<dyn CompletionClientTrait> =
        Arc::new(CompletionClient::new(config).unwrap());
    let app = init_app(client, ServiceConfig::default()).await;
    (app, mock_server)
}

fn post_text(uri: &str, text: &str) -> Request {
    test::TestRequest::post()
        .uri(uri)
        .set_json(json!({ "text": text }))
        .to_request()
}

#[actix_web::test]
async fn success_returns_bare_content_for_every_capability() {
    let (app, mock_server) = setup_relay().await;

    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "choices": [{"message": {"role": "assistant", "content": "relayed content"}}]
        })))
        .expect(4)
        .mount(&mock_server)
        .await;

    for endpoint in COMPLETION_ENDPOINTS {
        let resp = test::call_service(&app, post_text(endpoint, "hello")).await;
        assert_eq!(resp.status(), 200, "endpoint {endpoint}");
        let body: String = test::read_body_json(resp).await;
        assert_eq!(body, "relayed content", "endpoint {endpoint}");
    }
}

#[actix_web::test]
async fn upstream_429_maps_to_429_for_every_capability() {
    let (app, mock_server) = setup_relay().await;

    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .respond_with(ResponseTemplate::new(429))
        .mount(&mock_server)
        .await;

    for endpoint in COMPLETION_ENDPOINTS {
        let resp = test::call_service(&app, post_text(endpoint, "hello")).await;
        assert_eq!(resp.status(), 429, "endpoint {endpoint}");
        let body: serde_json::Value = test::read_body_json(resp).await;
        let message = body["message"].as_str().unwrap();
        assert!(message.contains("rate limit"), "endpoint {endpoint}: {message}");
    }
}

#[actix_web::test]
async fn empty_text_returns_400_without_calling_upstream() {
    let counting = Arc::new(CountingClient::default());
    let app = init_app(counting.clone(), ServiceConfig::default()).await;

    for endpoint in COMPLETION_ENDPOINTS {
        let resp = test::call_service(&app, post_text(endpoint, "")).await;
        assert_eq!(resp.status(), 400, "endpoint {endpoint}");
        let body: serde_json::Value = test::read_body_json(resp).await;
        assert_eq!(body["message"], "Invalid input", "endpoint {endpoint}");
    }

    assert_eq!(counting.calls.load(Ordering::SeqCst), 0);
}

#[actix_web::test]
async fn malformed_bodies_return_400_without_calling_upstream() {
    let counting = Arc::new(CountingClient::default());
    let app = init_app(counting.clone(), ServiceConfig::default()).await;

    // Missing text field
    let req = test::TestRequest::post()
        .uri("/api/v1/openai/chatbot")
        .set_json(json!({ "prompt": "hi" }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), 400);
    let body: serde_json::Value = test::read_body_json(resp).await;
    assert_eq!(body["message"], "Invalid input");

    // Non-string text
    let req = test::TestRequest::post()
        .uri("/api/v1/openai/chatbot")
        .set_json(json!({ "text": 42 }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), 400);

    assert_eq!(counting.calls.load(Ordering::SeqCst), 0);
}

#[actix_web::test]
async fn missing_content_returns_500_not_200() {
    let (app, mock_server) = setup_relay().await;

    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "choices": [{"message": {"role": "assistant"}}]
        })))
        .mount(&mock_server)
        .await;

    let resp = test::call_service(&app, post_text("/api/v1/openai/summary", "hello")).await;
    assert_eq!(resp.status(), 500);
    let body: serde_json::Value = test::read_body_json(resp).await;
    assert_eq!(body["message"], "Failed to summarize text");
}

#[actix_web::test]
async fn upstream_error_message_is_relayed() {
    let (app, mock_server) = setup_relay().await;

    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .respond_with(ResponseTemplate::new(400).set_body_json(json!({
            "error": {"message": "quota exhausted"}
        })))
        .mount(&mock_server)
        .await;

    let resp = test::call_service(&app, post_text("/api/v1/openai/js-converter", "hi")).await;
    assert_eq!(resp.status(), 500);
    let body: serde_json::Value = test::read_body_json(resp).await;
    assert_eq!(body["message"], "quota exhausted");
}

#[actix_web::test]
async fn concurrent_requests_resolve_independently() {
    let (app, mock_server) = setup_relay().await;

    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .and(BodyContains("Summarize this: first"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "choices": [{"message": {"role": "assistant", "content": "first summary"}}]
        })))
        .mount(&mock_server)
        .await;

    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .and(BodyContains("Summarize this: second"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "choices": [{"message": {"role": "assistant", "content": "second summary"}}]
        })))
        .mount(&mock_server)
        .await;

    let (resp_a, resp_b) = tokio::join!(
        test::call_service(&app, post_text("/api/v1/openai/summary", "first")),
        test::call_service(&app, post_text("/api/v1/openai/summary", "second")),
    );

    let body_a: String = test::read_body_json(resp_a).await;
    let body_b: String = test::read_body_json(resp_b).await;
    assert_eq!(body_a, "first summary");
    assert_eq!(body_b, "second summary");
}

#[actix_web::test]
async fn auth_gate_rejects_missing_and_wrong_tokens() {
    let counting = Arc::new(CountingClient::default());
    let service_config = ServiceConfig {
        auth_token: Some("secret".to_string()),
    };
    let app = init_app(counting.clone(), service_config).await;

    let resp = test::call_service(&app, post_text("/api/v1/openai/summary", "hello")).await;
    assert_eq!(resp.status(), 401);
    let body: serde_json::Value = test::read_body_json(resp).await;
    assert_eq!(body["message"], "Unauthorized");

    let req = test::TestRequest::post()
        .uri("/api/v1/openai/summary")
        .insert_header(("Authorization", "Bearer wrong"))
        .set_json(json!({ "text": "hello" }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), 401);

    assert_eq!(counting.calls.load(Ordering::SeqCst), 0);
}

#[actix_web::test]
async fn auth_gate_passes_the_configured_token() {
    let counting = Arc::new(CountingClient::default());
    let service_config = ServiceConfig {
        auth_token: Some("secret".to_string()),
    };
    let app = init_app(counting.clone(), service_config).await;

    let req = test::TestRequest::post()
        .uri("/api/v1/openai/summary")
        .insert_header(("Authorization", "Bearer secret"))
        .set_json(json!({ "text": "hello" }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), 200);
    let body: String = test::read_body_json(resp).await;
    assert_eq!(body, "mock content");
    assert_eq!(counting.calls.load(Ordering::SeqCst), 1);
}

#[actix_web::test]
async fn health_stays_open_when_gate_is_enabled() {
    let counting = Arc::new(CountingClient::default());
    let service_config = ServiceConfig {
        auth_token: Some("secret".to_string()),
    };
    let app = init_app(counting, service_config).await;

    let req = test::TestRequest::get().uri("/api/v1/health").to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), 200);
}
