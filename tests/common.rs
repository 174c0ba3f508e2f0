//! Test helper utilities for cloud-report integration tests
//!
//! IMPORTANT: These helpers are test-only and should NEVER be used in production code.

// Allow dead code in test utilities - functions are used across different test files
#![allow(dead_code)]

use cloud_report::{CloudReportClient, ReportConfig};
use serde_json::Value;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

pub const CHAT_PATH: &str = "/v1/chat/completions";

/// Configuration pointing at the mock server's chat endpoint.
pub fn create_test_config(server: &MockServer) -> ReportConfig {
    let mut config = ReportConfig::new(format!("{}{}", server.uri(), CHAT_PATH));
    config.api_key = Some("k".to_string());
    config.api_model = Some("demo".to_string());
    config.timeout_seconds = 5;
    config
}

pub fn create_test_client(config: ReportConfig) -> CloudReportClient {
    CloudReportClient::new(config).expect("test config should be valid")
}

/// Mount a POST handler on the chat path answering `status` with a JSON body.
pub async fn mount_json_response(server: &MockServer, status: u16, body: Value) {
    Mock::given(method("POST"))
        .and(path(CHAT_PATH))
        .respond_with(ResponseTemplate::new(status).set_body_json(body))
        .mount(server)
        .await;
}

/// Mount a POST handler on the chat path answering 200 with a raw body.
pub async fn mount_raw_response(server: &MockServer, body: &str) {
    Mock::given(method("POST"))
        .and(path(CHAT_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_string(body))
        .mount(server)
        .await;
}

/// OpenAI-style chat completion response carrying `content`.
pub fn chat_response(content: &str) -> Value {
    serde_json::json!({
        "id": "chatcmpl-1",
        "choices": [{
            "index": 0,
            "message": {"role": "assistant", "content": content},
            "finish_reason": "stop"
        }]
    })
}

pub fn complete_report(date: &str) -> String {
    format!(
        "# Daily Report - {date}\n\n## What I Did Today\n- x\n## Problems / Blockers\n- x\n\
         ## Root Cause\n- x\n## Attempts & Fixes\n- x\n## Key Learnings\n- x\n\
         ## Metrics\n- x\n## Next Steps (Tomorrow)\n- [ ] x"
    )
}
