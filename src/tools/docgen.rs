//! Documentation generator subprocess client

use crate::core::config::DocsConfig;
use crate::tools::{DocGenerator, ToolError};
use async_trait::async_trait;
use std::path::PathBuf;
use std::time::Duration;
use tokio::process::Command;
use tokio::time::timeout;
use tracing::debug;

/// Client for the external documentation generator
#[derive(Debug, Clone)]
pub struct DocsCli {
    command: String,
    timeout_secs: u64,
}

impl DocsCli {
    pub fn new(config: &DocsConfig) -> Self {
        Self {
            command: config.command.clone(),
            timeout_secs: config.timeout_secs,
        }
    }
}

#[async_trait]
impl DocGenerator for DocsCli {
    async fn generate(&self, sources: &[PathBuf], options: &DocsConfig) -> Result<(), ToolError> {
        debug!(
            "generating docs for {} sources into {}",
            sources.len(),
            options.dest.display()
        );

        let mut command = Command::new(&self.command);
        command.args(sources);
        command.arg("--dest").arg(&options.dest);
        if let Some(theme) = &options.theme {
            command.arg("--theme").arg(theme);
        }
        command.arg("--sort").arg(options.sort.as_flag());

        let result = timeout(
            Duration::from_secs(self.timeout_secs),
            command.kill_on_drop(true).output(),
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

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(ToolError::NonZeroExit {
                tool: self.command.clone(),
                code: output.status.code().unwrap_or(-1),
                stderr: stderr.trim().to_string(),
            });
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_spawn_error_for_missing_binary() {
        let options = DocsConfig {
            command: "nonexistent-docgen-binary".to_string(),
            ..DocsConfig::default()
        };
        let client = DocsCli::new(&options);

        let result = client
            .generate(&[PathBuf::from("main.scss")], &options)
            .await;
        assert!(matches!(result, Err(ToolError::Spawn { .. })));
    }
}
