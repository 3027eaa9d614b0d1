//! Service configuration: server bind, model provider, lint backends.
//!
//! File: `--config <path>`, else `.coderelay/config.yaml` (optional).
//! Secrets usually come from the environment (or `.env`), not the file.
//!
//! Resolution: defaults → config file → env vars → CLI flags. Loaded once at
//! startup, validated, then handed to the server by value.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::language::LanguageTag;

/// Project-level config file, relative to the working directory.
pub const DEFAULT_CONFIG_PATH: &str = ".coderelay/config.yaml";

const DEFAULT_TIMEOUT_MS: u64 = 30_000;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid YAML in {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },

    #[error("missing API key for provider '{provider}'. Set {env_var} or llm.api_key.")]
    MissingApiKey { provider: String, env_var: String },

    #[error("invalid value for {name}: {value}")]
    InvalidEnv { name: String, value: String },

    #[error("lint backend '{0}' has an empty command")]
    EmptyBackendCommand(String),

    #[error("lint backend key '{0}' normalizes to an empty language tag")]
    EmptyLanguageKey(String),

    #[error("lint.timeout_ms must be greater than zero")]
    ZeroTimeout,
}

/// Generative model provider.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Provider {
    #[default]
    Gemini,
    Anthropic,
}

impl Provider {
    /// Provider-specific API key variable (checked after `CODERELAY_API_KEY`).
    pub fn api_key_env(&self) -> &'static str {
        match self {
            Provider::Gemini => "GEMINI_API_KEY",
            Provider::Anthropic => "ANTHROPIC_API_KEY",
        }
    }

    pub fn default_model(&self) -> &'static str {
        match self {
            Provider::Gemini => "gemini-2.0-flash",
            Provider::Anthropic => "claude-haiku-4-5-20251001",
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".into(),
            port: 5000,
        }
    }
}

impl ServerConfig {
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct LlmConfig {
    pub provider: Provider,
    /// Model ID. Provider default when unset.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub model: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,
    /// Override the provider endpoint (mock servers, proxies).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub base_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_tokens: Option<u32>,
}

impl LlmConfig {
    pub fn model(&self) -> &str {
        self.model
            .as_deref()
            .unwrap_or_else(|| self.provider.default_model())
    }
}

/// One external analysis tool: `<command> <args...> <file>`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BackendConfig {
    pub command: String,
    #[serde(default)]
    pub args: Vec<String>,
    /// Transient file suffix, e.g. `.py`. Some tools pick a parser by extension.
    #[serde(default)]
    pub suffix: String,
}

impl BackendConfig {
    pub fn pyright() -> Self {
        Self {
            command: "pyright".into(),
            args: vec!["--outputjson".into()],
            suffix: ".py".into(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LintConfig {
    pub timeout_ms: u64,
    /// Where transient source files go. System temp dir when unset.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub temp_dir: Option<PathBuf>,
    /// Language tag → backend.
    pub backends: BTreeMap<String, BackendConfig>,
}

impl Default for LintConfig {
    fn default() -> Self {
        let mut backends = BTreeMap::new();
        backends.insert("python".into(), BackendConfig::pyright());
        Self {
            timeout_ms: DEFAULT_TIMEOUT_MS,
            temp_dir: None,
            backends,
        }
    }
}

/// Top-level configuration.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct ServiceConfig {
    pub server: ServerConfig,
    pub llm: LlmConfig,
    pub lint: LintConfig,
}

impl ServiceConfig {
    /// Load from an explicit path, or from the project default if it exists,
    /// then apply environment overrides.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let mut config = match path {
            Some(path) => Self::from_file(path)?,
            None => {
                let default = Path::new(DEFAULT_CONFIG_PATH);
                if default.exists() {
                    Self::from_file(default)?
                } else {
                    Self::default()
                }
            }
        };
        config.apply_env(|name| std::env::var(name).ok())?;
        Ok(config)
    }

    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_yaml(&content).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    pub fn from_yaml(content: &str) -> Result<Self, serde_yaml::Error> {
        // An empty file deserializes to null, not to the defaults.
        if content.trim().is_empty() {
            return Ok(Self::default());
        }
        serde_yaml::from_str(content)
    }

    /// Apply environment overrides. `lookup` is injected so tests don't touch
    /// the process environment.
    pub fn apply_env<F>(&mut self, lookup: F) -> Result<(), ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        if self.llm.api_key.is_none() {
            self.llm.api_key = lookup("CODERELAY_API_KEY")
                .or_else(|| lookup(self.llm.provider.api_key_env()))
                .filter(|k| !k.is_empty());
        }
        if let Some(host) = lookup("CODERELAY_HOST") {
            self.server.host = host;
        }
        if let Some(port) = lookup("CODERELAY_PORT") {
            self.server.port = port.parse().map_err(|_| ConfigError::InvalidEnv {
                name: "CODERELAY_PORT".into(),
                value: port,
            })?;
        }
        Ok(())
    }

    /// Check everything the server needs before it binds.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.llm.api_key.as_deref().map_or(true, str::is_empty) {
            return Err(ConfigError::MissingApiKey {
                provider: format!("{:?}", self.llm.provider).to_lowercase(),
                env_var: self.llm.provider.api_key_env().into(),
            });
        }
        if self.lint.timeout_ms == 0 {
            return Err(ConfigError::ZeroTimeout);
        }
        for (language, backend) in &self.lint.backends {
            if LanguageTag::from(language.as_str()).is_empty() {
                return Err(ConfigError::EmptyLanguageKey(language.clone()));
            }
            if backend.command.trim().is_empty() {
                return Err(ConfigError::EmptyBackendCommand(language.clone()));
            }
        }
        Ok(())
    }
}
