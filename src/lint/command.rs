//! CommandBackend: run an external analysis tool over a transient file.
//!
//! The source goes into a uniquely named temp file, the tool runs as
//! `<command> <args...> <file>`, and the file is removed on every path out,
//! including timeout and a dropped future.

use std::io::Write;
use std::path::{Path, PathBuf};
use std::process::Stdio;
use std::time::Duration;

use async_trait::async_trait;
use tempfile::NamedTempFile;
use tokio::process::Command;

use super::error::{LintError, LintResult};
use super::{LintBackend, OutputStream, RawToolOutput};
use crate::config::BackendConfig;

const FILE_PREFIX: &str = "coderelay_";

/// External tool invoked once per request.
#[derive(Debug, Clone)]
pub struct CommandBackend {
    command: String,
    args: Vec<String>,
    suffix: String,
    timeout: Duration,
    temp_dir: Option<PathBuf>,
}

impl CommandBackend {
    pub fn new(config: &BackendConfig, timeout: Duration) -> Self {
        Self {
            command: config.command.clone(),
            args: config.args.clone(),
            suffix: config.suffix.clone(),
            timeout,
            temp_dir: None,
        }
    }

    /// Put transient files in `dir` instead of the system temp dir.
    pub fn with_temp_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.temp_dir = Some(dir.into());
        self
    }

    fn create_source_file(&self, source: &str) -> LintResult<NamedTempFile> {
        let mut builder = tempfile::Builder::new();
        builder.prefix(FILE_PREFIX).suffix(&self.suffix);
        let mut file = match &self.temp_dir {
            Some(dir) => builder.tempfile_in(dir)?,
            None => builder.tempfile()?,
        };
        file.write_all(source.as_bytes())?;
        file.flush()?;
        Ok(file)
    }

    async fn run(&self, path: &Path) -> LintResult<RawToolOutput> {
        let mut cmd = Command::new(&self.command);
        cmd.args(&self.args)
            .arg(path)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true);

        let child = cmd.spawn().map_err(|source| LintError::Spawn {
            command: self.command.clone(),
            source,
        })?;

        let output = match tokio::time::timeout(self.timeout, child.wait_with_output()).await {
            Ok(result) => result?,
            Err(_) => {
                return Err(LintError::Timeout {
                    command: self.command.clone(),
                    timeout_ms: self.timeout.as_millis() as u64,
                })
            }
        };

        let exit_code = output.status.code();
        if !output.status.success() {
            tracing::debug!("{} exited with {:?}", self.command, exit_code);
        }

        let stdout = String::from_utf8_lossy(&output.stdout);
        let stderr = String::from_utf8_lossy(&output.stderr);
        let (text, stream) = if !stdout.trim().is_empty() {
            (stdout.trim(), OutputStream::Stdout)
        } else if !stderr.trim().is_empty() {
            (stderr.trim(), OutputStream::Stderr)
        } else {
            return Err(LintError::EmptyOutput {
                command: self.command.clone(),
            });
        };

        Ok(RawToolOutput {
            text: text.to_string(),
            stream,
            exit_code,
        })
    }
}

#[async_trait]
impl LintBackend for CommandBackend {
    fn name(&self) -> &str {
        &self.command
    }

    async fn analyze(&self, source: &str) -> LintResult<RawToolOutput> {
        let file = self.create_source_file(source)?;
        let result = self.run(file.path()).await;

        let path = file.path().to_path_buf();
        if let Err(e) = file.close() {
            tracing::warn!("failed to remove {}: {e}", path.display());
        }
        result
    }
}
