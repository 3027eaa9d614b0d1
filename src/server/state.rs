//! Application state shared across all handlers.

use std::sync::Arc;

use crate::lint::Linter;
use crate::llm::CompletionBackend;

/// Built once at startup; cloned per request (cheap, all `Arc`s).
#[derive(Clone)]
pub struct AppState {
    pub llm: Arc<dyn CompletionBackend>,
    pub linter: Arc<Linter>,
}

impl AppState {
    pub fn new(llm: Arc<dyn CompletionBackend>, linter: Linter) -> Self {
        Self {
            llm,
            linter: Arc::new(linter),
        }
    }
}
