//! Style-sheet compiler subprocess client

use crate::core::asset::SourceFile;
use crate::core::config::{CompilerConfig, OutputStyle};
use crate::tools::{ToolError, Transformer};
use async_trait::async_trait;
use std::path::PathBuf;
use std::time::Duration;
use tokio::process::Command;
use tokio::time::timeout;
use tracing::{debug, warn};

/// Client for the external style-sheet compiler
#[derive(Debug, Clone)]
pub struct SassCli {
    /// Compiler command (e.g., "sass", "/usr/local/bin/sass")
    command: String,

    /// Import resolution paths
    load_paths: Vec<PathBuf>,

    output_style: OutputStyle,

    /// Embed the source map in the emitted content so it survives the
    /// post-processing chain
    source_maps: bool,

    timeout_secs: u64,
}

impl SassCli {
    pub fn new(config: &CompilerConfig, output_style: OutputStyle, source_maps: bool) -> Self {
        Self {
            command: config.command.clone(),
            load_paths: config.load_paths.clone(),
            output_style,
            source_maps,
            timeout_secs: config.timeout_secs,
        }
    }

}

#[async_trait]
impl Transformer for SassCli {
    /// Compile one source file by spawning the configured compiler.
    ///
    /// Stdout is the compiled content. A non-zero exit carries the
    /// compiler's stderr (the tool's own diagnostic is the error surface).
    async fn transform(&self, source: &SourceFile) -> Result<String, ToolError> {
        debug!("compiling {}", source.path.display());

        let mut command = Command::new(&self.command);
        for load_path in &self.load_paths {
            command.arg("--load-path").arg(load_path);
        }
        command.arg("--style").arg(self.output_style.as_flag());
        if self.source_maps {
            command.arg("--embed-source-map");
        } else {
            command.arg("--no-source-map");
        }
        command.arg(&source.path);

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
            let code = output.status.code().unwrap_or(-1);
            warn!(
                "{} exited with code {} for {}",
                self.command,
                code,
                source.path.display()
            );
            return Err(ToolError::NonZeroExit {
                tool: self.command.clone(),
                code,
                stderr: stderr.trim().to_string(),
            });
        }

        let content = String::from_utf8(output.stdout).map_err(|e| ToolError::Decode {
            tool: self.command.clone(),
            message: e.to_string(),
        })?;

        debug!(
            "{} produced {} bytes for {}",
            self.command,
            content.len(),
            source.path.display()
        );

        Ok(content)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn source(path: &str) -> SourceFile {
        SourceFile {
            path: PathBuf::from(path),
            rel: PathBuf::from(path),
        }
    }

    #[tokio::test]
    async fn test_spawn_error_for_missing_binary() {
        let config = CompilerConfig {
            command: "nonexistent-sass-binary".to_string(),
            load_paths: vec![],
            timeout_secs: 5,
        };
        let client = SassCli::new(&config, OutputStyle::Expanded, false);

        let result = client.transform(&source("main.scss")).await;
        assert!(matches!(result, Err(ToolError::Spawn { .. })));
    }

    #[tokio::test]
    #[ignore] // Requires a sass compiler on PATH
    async fn test_compile_with_real_compiler() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("main.scss");
        std::fs::write(&path, "$c: red;\nbody { color: $c; }\n").unwrap();

        let config = CompilerConfig::default();
        let client = SassCli::new(&config, OutputStyle::Expanded, false);
        let css = client
            .transform(&SourceFile {
                path,
                rel: PathBuf::from("main.scss"),
            })
            .await
            .unwrap();

        assert!(css.contains("color: red"));
    }
}
