//! Router-level tests with stubbed model and lint backends.

use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use axum::body::Body;
use axum::http::{Request, StatusCode};
use serde_json::{json, Value};
use tower::ServiceExt;

use coderelay::language::LanguageTag;
use coderelay::lint::{LintBackend, LintError, LintResult, Linter, OutputStream, RawToolOutput};
use coderelay::llm::{CompletionBackend, LlmError};
use coderelay::server::{handlers::LIVENESS_MESSAGE, router, AppState};

/// Returns a fixed reply and records every prompt.
struct StubModel {
    reply: Option<String>,
    prompts: Mutex<Vec<String>>,
}

impl StubModel {
    fn replying(text: &str) -> Arc<Self> {
        Arc::new(Self {
            reply: Some(text.into()),
            prompts: Mutex::new(Vec::new()),
        })
    }

    fn failing() -> Arc<Self> {
        Arc::new(Self {
            reply: None,
            prompts: Mutex::new(Vec::new()),
        })
    }

    fn last_prompt(&self) -> String {
        self.prompts.lock().unwrap().last().cloned().unwrap_or_default()
    }
}

#[async_trait]
impl CompletionBackend for StubModel {
    async fn complete(&self, prompt: &str) -> Result<String, LlmError> {
        self.prompts.lock().unwrap().push(prompt.to_string());
        self.reply.clone().ok_or(LlmError::ApiError {
            status: 503,
            message: "overloaded".into(),
        })
    }
}

/// Lint backend that answers with fixed tool output.
struct StubTool(Option<&'static str>);

#[async_trait]
impl LintBackend for StubTool {
    fn name(&self) -> &str {
        "stub"
    }

    async fn analyze(&self, _source: &str) -> LintResult<RawToolOutput> {
        match self.0 {
            Some(text) => Ok(RawToolOutput {
                text: text.into(),
                stream: OutputStream::Stdout,
                exit_code: Some(1),
            }),
            None => Err(LintError::EmptyOutput {
                command: "stub".into(),
            }),
        }
    }
}

fn state(model: Arc<StubModel>, tool_output: Option<&'static str>) -> AppState {
    let mut linter = Linter::new();
    linter.register(LanguageTag::from("python"), Arc::new(StubTool(tool_output)));
    AppState::new(model, linter)
}

async fn post_json(state: AppState, uri: &str, body: Value) -> (StatusCode, Value) {
    let request = Request::builder()
        .method("POST")
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap();
    let response = router(state).oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let json = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
    (status, json)
}

const ONE_FINDING: &str =
    r#"{"files": {"f.py": {"errors": [{"line": 2, "column": 1, "message": "undefined name 'x'"}]}}}"#;

#[tokio::test]
async fn index_is_plain_text_liveness() {
    let request = Request::builder().uri("/").body(Body::empty()).unwrap();
    let response = router(state(StubModel::replying(""), None))
        .oneshot(request)
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert!(response.headers()["content-type"]
        .to_str()
        .unwrap()
        .starts_with("text/plain"));
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    assert_eq!(&bytes[..], LIVENESS_MESSAGE.as_bytes());
}

#[tokio::test]
async fn bugdetect_maps_tool_findings() {
    let (status, body) = post_json(
        state(StubModel::replying(""), Some(ONE_FINDING)),
        "/api/bugdetect",
        json!({"code": "print(x)", "language": "Python"}),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        body,
        json!({"errors": [{
            "severity": "error",
            "startLineNumber": 2,
            "startColumn": 1,
            "endLineNumber": 2,
            "endColumn": 2,
            "message": "undefined name 'x'"
        }]})
    );
}

#[tokio::test]
async fn bugdetect_unsupported_language_is_empty() {
    for language in [json!("javascript"), json!("C++"), json!(""), Value::Null] {
        let (status, body) = post_json(
            state(StubModel::replying(""), Some(ONE_FINDING)),
            "/api/bugdetect",
            json!({"code": "int main() { return x; }", "language": language}),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, json!({"errors": []}), "language {language}");
    }
}

#[tokio::test]
async fn bugdetect_missing_fields_is_empty() {
    let (status, body) = post_json(
        state(StubModel::replying(""), Some(ONE_FINDING)),
        "/api/bugdetect",
        json!({}),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({"errors": []}));
}

#[tokio::test]
async fn bugdetect_unparseable_tool_output_is_empty() {
    let (status, body) = post_json(
        state(StubModel::replying(""), Some("tool crashed")),
        "/api/bugdetect",
        json!({"code": "x", "language": "python"}),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({"errors": []}));
}

#[tokio::test]
async fn bugdetect_tool_failure_is_empty() {
    let (status, body) = post_json(
        state(StubModel::replying(""), None),
        "/api/bugdetect",
        json!({"code": "x", "language": "python"}),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({"errors": []}));
}

#[tokio::test]
async fn suggestion_builds_prompt_and_strips_fences() {
    let model = StubModel::replying("```python\nreturn a + b\n```");
    let (status, body) = post_json(
        state(model.clone(), None),
        "/api/suggestion",
        json!({"code": "def add(a, b):", "language": "Python"}),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({"suggestion": "return a + b"}));

    let prompt = model.last_prompt();
    assert!(prompt.starts_with("provide code completion"));
    assert!(prompt.ends_with(" in Python\n\ndef add(a, b):"));
}

#[tokio::test]
async fn bugfix_returns_trimmed_code() {
    let model = StubModel::replying("\n  def add(a, b):\n    print(a + b)\n\n");
    let (status, body) = post_json(
        state(model.clone(), None),
        "/api/bugfix",
        json!({"code": "def add(a, b):\nprint(a + b)", "language": "python"}),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({"fixed_code": "def add(a, b):\n    print(a + b)"}));
    assert!(model
        .last_prompt()
        .starts_with("Analyze the following code and fix any bugs."));
}

#[tokio::test]
async fn fenced_replies_never_reach_the_client() {
    for uri in ["/api/suggestion", "/api/bugfix"] {
        let (_, body) = post_json(
            state(StubModel::replying("```\nx = 1\n```"), None),
            uri,
            json!({"code": "x =", "language": "python"}),
        )
        .await;
        let text = body
            .as_object()
            .and_then(|o| o.values().next())
            .and_then(Value::as_str)
            .unwrap();
        assert_eq!(text, "x = 1", "endpoint {uri}");
    }
}

#[tokio::test]
async fn model_failure_is_generic_server_error() {
    for uri in ["/api/suggestion", "/api/bugfix"] {
        let (status, body) = post_json(
            state(StubModel::failing(), None),
            uri,
            json!({"code": "x", "language": "python"}),
        )
        .await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR, "endpoint {uri}");
        assert_eq!(body["error"]["type"], "upstream_error");
        assert!(!body.to_string().contains("overloaded"));
    }
}

#[tokio::test]
async fn cors_preflight_is_allowed() {
    let request = Request::builder()
        .method("OPTIONS")
        .uri("/api/bugdetect")
        .header("origin", "http://localhost:3000")
        .header("access-control-request-method", "POST")
        .body(Body::empty())
        .unwrap();
    let response = router(state(StubModel::replying(""), None))
        .oneshot(request)
        .await
        .unwrap();
    assert!(response.status().is_success());
    assert!(response
        .headers()
        .contains_key("access-control-allow-origin"));
}

#[tokio::test]
async fn non_json_body_is_rejected() {
    let request = Request::builder()
        .method("POST")
        .uri("/api/bugdetect")
        .header("content-type", "application/json")
        .body(Body::from("code=x"))
        .unwrap();
    let response = router(state(StubModel::replying(""), None))
        .oneshot(request)
        .await
        .unwrap();
    assert!(response.status().is_client_error());
}
