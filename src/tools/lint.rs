//! Linter subprocess client

use crate::core::config::LintConfig;
use crate::tools::{LintReport, Linter, ToolError};
use async_trait::async_trait;
use std::path::Path;
use std::time::Duration;
use tokio::process::Command;
use tokio::time::timeout;
use tracing::debug;

/// Client for the external linter.
///
/// A non-zero exit from the linter is a finding, not a tool error: the
/// report carries the linter's own output. Tool errors are reserved for
/// spawn failures, timeouts and undecodable output.
#[derive(Debug, Clone)]
pub struct LintCli {
    command: String,
    timeout_secs: u64,
}

impl LintCli {
    pub fn new(config: &LintConfig) -> Self {
        Self {
            command: config.command.clone(),
            timeout_secs: config.timeout_secs,
        }
    }
}

#[async_trait]
impl Linter for LintCli {
    async fn lint(&self, path: &Path) -> Result<LintReport, ToolError> {
        debug!("linting {}", path.display());

        let result = timeout(
            Duration::from_secs(self.timeout_secs),
            Command::new(&self.command)
                .arg(path)
                .kill_on_drop(true)
                .output(),
        )
        .await
        .map_err(|_| ToolError::Timeout {
            tool: self.command.clone(),
            seconds: self.timeout_secs,
        })?;

        let output = result.map_err(|e| ToolError::Spawn {
            tool: self.command.clone(),
            message: e.to_string(),
        })?;

        let stdout = String::from_utf8(output.stdout).map_err(|e| ToolError::Decode {
            tool: self.command.clone(),
            message: e.to_string(),
        })?;
        let stderr = String::from_utf8_lossy(&output.stderr);

        let mut report_output = stdout.trim().to_string();
        if !stderr.trim().is_empty() {
            if !report_output.is_empty() {
                report_output.push('\n');
            }
            report_output.push_str(stderr.trim());
        }

        Ok(LintReport {
            path: path.to_path_buf(),
            clean: output.status.success(),
            output: report_output,
        })
    }
}
