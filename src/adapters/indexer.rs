//! Indexing service adapters.
//!
//! [`CommandIndexer`] hands roots to an external scanner program, e.g. a
//! wrapper around the platform's media scanner. [`NoopIndexer`] drops every
//! request and is used when no scanner is configured.

use std::process::Stdio;
use std::time::Duration;

use async_trait::async_trait;
use tokio::process::Command;
use tokio::time::timeout;
use tracing::debug;

use super::{IndexerError, MediaIndexer};

/// Indexer that runs a scanner program per request.
///
/// The program is invoked as `<program> <args..> <mime_type> <root..>` and
/// must exit with status 0.
pub struct CommandIndexer {
    program: String,
    args: Vec<String>,
    timeout: Duration,
}

impl CommandIndexer {
    /// Create an indexer for `program` with a 30 second timeout
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
            args: Vec::new(),
            timeout: Duration::from_secs(30),
        }
    }

    /// Build from a command line split into program and leading arguments.
    /// Returns `None` for an empty command.
    pub fn from_command(command: &[String]) -> Option<Self> {
        let (program, args) = command.split_first()?;
        Some(Self::new(program.clone()).with_args(args.iter().cloned()))
    }

    pub fn with_args(mut self, args: impl IntoIterator<Item = impl Into<String>>) -> Self {
        self.args.extend(args.into_iter().map(Into::into));
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}

#[async_trait]
impl MediaIndexer for CommandIndexer {
    fn name(&self) -> &str {
        "command"
    }

    async fn request_indexing(&self, roots: &[String], mime_type: &str) -> Result<(), IndexerError> {
        if roots.is_empty() {
            return Ok(());
        }

        debug!(program = %self.program, ?roots, "Requesting media scan");

        let child = Command::new(&self.program)
            .args(&self.args)
            .arg(mime_type)
            .args(roots)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .spawn()
            .map_err(|source| IndexerError::Spawn {
                program: self.program.clone(),
                source,
            })?;

        let output = timeout(self.timeout, child.wait_with_output())
            .await
            .map_err(|_| IndexerError::Timeout {
                seconds: self.timeout.as_secs(),
            })??;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(IndexerError::Failed {
                code: output.status.code().unwrap_or(-1),
                stderr: stderr.trim().to_string(),
            });
        }

        Ok(())
    }
}

/// Indexer that accepts and ignores every request
#[derive(Debug, Default)]
pub struct NoopIndexer;

#[async_trait]
impl MediaIndexer for NoopIndexer {
    fn name(&self) -> &str {
        "noop"
    }

    async fn request_indexing(&self, roots: &[String], _mime_type: &str) -> Result<(), IndexerError> {
        debug!(?roots, "Indexing disabled, dropping request");
        Ok(())
    }
}
