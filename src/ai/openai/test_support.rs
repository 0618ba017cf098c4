use wiremock::matchers::{method, path};
use wiremock::{Mock, MockBuilder};

pub use super::{CHAT_COMPLETIONS_PATH, IMAGE_GENERATIONS_PATH};

pub fn post(endpoint: &str) -> MockBuilder {
    Mock::given(method("POST")).and(path(endpoint))
}

/// Chat completion body with a single choice.
pub fn chat_body(role: &str, content: &str) -> serde_json::Value {
    serde_json::json!({
        "choices": [{
            "message": { "role": role, "content": content },
            "finish_reason": "stop"
        }]
    })
}
