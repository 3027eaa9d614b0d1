//! Request handlers for the editor endpoints.

use axum::{extract::State, Json};
use serde::{Deserialize, Serialize};

use super::error::ApiResult;
use super::state::AppState;
use crate::lint::{Diagnostic, LintOutcome};
use crate::llm::prompts;

pub const LIVENESS_MESSAGE: &str = "CodeRelay inline code suggestion service is running.";

/// Body shared by all three POST endpoints. Missing or null fields are empty.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CodeRequest {
    #[serde(default)]
    pub code: Option<String>,
    #[serde(default)]
    pub language: Option<String>,
}

impl CodeRequest {
    fn code(&self) -> &str {
        self.code.as_deref().unwrap_or_default()
    }

    fn language(&self) -> &str {
        self.language.as_deref().unwrap_or_default()
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct SuggestionResponse {
    pub suggestion: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct BugDetectResponse {
    pub errors: Vec<Diagnostic>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct BugFixResponse {
    pub fixed_code: String,
}

/// `GET /`
pub async fn index() -> &'static str {
    LIVENESS_MESSAGE
}

/// `POST /api/suggestion`
pub async fn suggestion(
    State(state): State<AppState>,
    Json(req): Json<CodeRequest>,
) -> ApiResult<Json<SuggestionResponse>> {
    let prompt = prompts::suggestion_prompt(req.language(), req.code());
    let text = state.llm.complete(&prompt).await?;
    Ok(Json(SuggestionResponse {
        suggestion: prompts::clean_code_response(&text),
    }))
}

/// `POST /api/bugdetect` always answers with a list, empty on any failure.
pub async fn bugdetect(
    State(state): State<AppState>,
    Json(req): Json<CodeRequest>,
) -> Json<BugDetectResponse> {
    let outcome = state.linter.lint(req.language.as_deref(), req.code()).await;
    match &outcome {
        LintOutcome::Unsupported { language } => {
            tracing::debug!("no lint backend for {language:?}");
        }
        LintOutcome::Findings(diagnostics) => {
            tracing::info!("bugdetect: {} diagnostic(s)", diagnostics.len());
        }
        // Already logged by the linter.
        LintOutcome::Failed(_) => {}
    }
    Json(BugDetectResponse {
        errors: outcome.into_diagnostics(),
    })
}

/// `POST /api/bugfix`
pub async fn bugfix(
    State(state): State<AppState>,
    Json(req): Json<CodeRequest>,
) -> ApiResult<Json<BugFixResponse>> {
    let prompt = prompts::bugfix_prompt(req.language(), req.code());
    let text = state.llm.complete(&prompt).await?;
    Ok(Json(BugFixResponse {
        fixed_code: prompts::clean_code_response(&text),
    }))
}
