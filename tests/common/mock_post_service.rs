//! Mock post endpoint for exercising the HTTP post service.

use std::time::Duration;

use revdup::services::HttpPostService;
use wiremock::{
    matchers::{body_json, header, method, path},
    Mock, MockServer, ResponseTemplate,
};

/// Wrapper around wiremock MockServer with convenience methods
pub struct MockPostServer {
    pub server: MockServer,
}

impl MockPostServer {
    /// Start a new mock post server
    pub async fn start() -> Self {
        let server = MockServer::start().await;
        Self { server }
    }

    /// Base URL of the mock server
    pub fn url(&self) -> String {
        self.server.uri()
    }

    /// HTTP post service pointed at this server
    pub fn service(&self, token: Option<&str>) -> HttpPostService {
        HttpPostService::new(
            &self.url(),
            Duration::from_secs(5),
            token.map(str::to_string),
        )
        .unwrap()
    }

    /// Accept posts and answer with the given id, expecting exactly `times` calls
    pub async fn mock_created(&self, id: serde_json::Value, times: u64) {
        Mock::given(method("POST"))
            .and(path("/posts"))
            .and(header("content-type", "application/json"))
            .respond_with(ResponseTemplate::new(201).set_body_json(serde_json::json!({ "id": id })))
            .expect(times)
            .mount(&self.server)
            .await;
    }

    /// Accept only a post with exactly this JSON body
    pub async fn mock_created_for_body(&self, body: serde_json::Value, id: &str) {
        Mock::given(method("POST"))
            .and(path("/posts"))
            .and(body_json(body))
            .respond_with(ResponseTemplate::new(201).set_body_json(serde_json::json!({ "id": id })))
            .expect(1)
            .mount(&self.server)
            .await;
    }

    /// Require a bearer token
    pub async fn mock_created_with_token(&self, token: &str, id: &str) {
        Mock::given(method("POST"))
            .and(path("/posts"))
            .and(header("authorization", format!("Bearer {token}").as_str()))
            .respond_with(ResponseTemplate::new(201).set_body_json(serde_json::json!({ "id": id })))
            .expect(1)
            .mount(&self.server)
            .await;
    }

    /// Fail every post with a status and body
    pub async fn mock_error(&self, status: u16, body: &str) {
        Mock::given(method("POST"))
            .and(path("/posts"))
            .respond_with(ResponseTemplate::new(status).set_body_string(body))
            .mount(&self.server)
            .await;
    }

    /// Answer 200 with a body that is not a post
    pub async fn mock_malformed(&self, body: &str) {
        Mock::given(method("POST"))
            .and(path("/posts"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_string(body)
                    .insert_header("content-type", "application/json"),
            )
            .mount(&self.server)
            .await;
    }

    /// Answer after a delay
    pub async fn mock_slow(&self, delay: Duration, id: &str) {
        Mock::given(method("POST"))
            .and(path("/posts"))
            .respond_with(
                ResponseTemplate::new(201)
                    .set_body_json(serde_json::json!({ "id": id }))
                    .set_delay(delay),
            )
            .mount(&self.server)
            .await;
    }

    /// Bodies of every request received so far
    pub async fn received_bodies(&self) -> Vec<serde_json::Value> {
        self.server
            .received_requests()
            .await
            .unwrap_or_default()
            .iter()
            .filter_map(|r| serde_json::from_slice(&r.body).ok())
            .collect()
    }
}
