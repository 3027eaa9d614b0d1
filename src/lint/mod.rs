//! Bug detection: language tag → external tool → editor diagnostics.
//!
//! `Linter` owns the backend table. A language without a backend is answered
//! immediately; otherwise the backend runs and its output is normalized.
//! Nothing in here fails outward: every failure becomes a `LintOutcome` that
//! the HTTP layer turns into an empty list.

pub mod command;
pub mod diagnostic;
pub mod error;

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;

pub use command::CommandBackend;
pub use diagnostic::{parse_diagnostics, Diagnostic, Severity};
pub use error::{LintError, LintResult};

use crate::config::LintConfig;
use crate::language::LanguageTag;

/// Characters of raw tool output kept in a failure log line.
const RAW_PREVIEW_CHARS: usize = 200;

/// Which stream the tool output was taken from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputStream {
    Stdout,
    Stderr,
}

/// Captured tool output, trimmed, before parsing.
#[derive(Debug, Clone)]
pub struct RawToolOutput {
    pub text: String,
    pub stream: OutputStream,
    pub exit_code: Option<i32>,
}

/// A static-analysis tool that can inspect a single source text.
#[async_trait]
pub trait LintBackend: Send + Sync {
    /// Short name for logs.
    fn name(&self) -> &str;

    /// Analyze `source` and return the tool's raw structured output.
    async fn analyze(&self, source: &str) -> LintResult<RawToolOutput>;
}

/// Result of one bug detection request.
#[derive(Debug)]
pub enum LintOutcome {
    /// No backend configured for this language.
    Unsupported { language: LanguageTag },
    /// The tool ran and its output parsed (possibly zero findings).
    Findings(Vec<Diagnostic>),
    /// The tool failed or its output was unusable.
    Failed(LintError),
}

impl LintOutcome {
    /// Collapse to what the editor receives.
    pub fn into_diagnostics(self) -> Vec<Diagnostic> {
        match self {
            LintOutcome::Findings(diagnostics) => diagnostics,
            LintOutcome::Unsupported { .. } | LintOutcome::Failed(_) => Vec::new(),
        }
    }
}

/// Language → backend dispatch.
#[derive(Clone, Default)]
pub struct Linter {
    backends: HashMap<LanguageTag, Arc<dyn LintBackend>>,
}

impl Linter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build the table from config: one `CommandBackend` per entry.
    pub fn from_config(config: &LintConfig) -> Self {
        let timeout = Duration::from_millis(config.timeout_ms);
        let mut linter = Self::new();
        for (language, backend_config) in &config.backends {
            let mut backend = CommandBackend::new(backend_config, timeout);
            if let Some(dir) = &config.temp_dir {
                backend = backend.with_temp_dir(dir);
            }
            linter.register(LanguageTag::from(language.as_str()), Arc::new(backend));
        }
        linter
    }

    /// Register (or replace) the backend for a language.
    pub fn register(&mut self, language: LanguageTag, backend: Arc<dyn LintBackend>) {
        self.backends.insert(language, backend);
    }

    pub fn supports(&self, language: &LanguageTag) -> bool {
        self.backends.contains_key(language)
    }

    /// Supported language tags, sorted.
    pub fn languages(&self) -> Vec<&str> {
        let mut tags: Vec<&str> = self.backends.keys().map(LanguageTag::as_str).collect();
        tags.sort_unstable();
        tags
    }

    /// Run bug detection for one request.
    pub async fn lint(&self, language: Option<&str>, code: &str) -> LintOutcome {
        let language = LanguageTag::normalize(language);
        tracing::debug!("normalized language: {language:?}");

        // The empty tag never has a tool, whatever the table says.
        if language.is_empty() {
            return LintOutcome::Unsupported { language };
        }
        let Some(backend) = self.backends.get(&language) else {
            return LintOutcome::Unsupported { language };
        };

        let raw = match backend.analyze(code).await {
            Ok(raw) => raw,
            Err(e) => {
                tracing::warn!("{} failed: {e}", backend.name());
                return LintOutcome::Failed(e);
            }
        };

        match parse_diagnostics(&raw.text) {
            Ok(diagnostics) => {
                tracing::debug!(
                    "{} reported {} finding(s) for {language}",
                    backend.name(),
                    diagnostics.len()
                );
                LintOutcome::Findings(diagnostics)
            }
            Err(e) => {
                tracing::warn!(
                    "error parsing {} output ({:?}, {} bytes): {e}\nraw output: {}",
                    backend.name(),
                    raw.stream,
                    raw.text.len(),
                    preview(&raw.text, RAW_PREVIEW_CHARS)
                );
                LintOutcome::Failed(e)
            }
        }
    }
}

fn preview(s: &str, max: usize) -> String {
    match s.char_indices().nth(max) {
        Some((end, _)) => format!("{}...", &s[..end]),
        None => s.to_string(),
    }
}

impl std::fmt::Debug for Linter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Linter")
            .field("languages", &self.languages())
            .finish()
    }
}
