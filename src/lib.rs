//! CodeRelay: editor backend for inline suggestions, bug detection and
//! bug fixing.
//!
//! Bug detection runs an external static-analysis tool over the submitted
//! code and normalizes its JSON report into editor markers. Suggestions and
//! fixes go through a generative model.

pub mod config;
pub mod language;
pub mod lint;
pub mod llm;
pub mod server;
