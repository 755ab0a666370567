//! External tool clients
//!
//! The compiler, linter and documentation generator are external commands.
//! Each sits behind a trait so the operations can be exercised without the
//! tools installed.

pub mod docgen;
pub mod lint;
pub mod sass;

use crate::core::asset::SourceFile;
use crate::core::config::DocsConfig;
use async_trait::async_trait;
pub use docgen::DocsCli;
pub use lint::LintCli;
pub use sass::SassCli;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Error types for external tool invocations
#[derive(Debug, Error)]
pub enum ToolError {
    #[error("failed to spawn {tool}: {message}")]
    Spawn { tool: String, message: String },

    #[error("{tool} exited with code {code}: {stderr}")]
    NonZeroExit {
        tool: String,
        code: i32,
        stderr: String,
    },

    #[error("{tool} timed out after {seconds} seconds")]
    Timeout { tool: String, seconds: u64 },

    #[error("failed to decode {tool} output: {message}")]
    Decode { tool: String, message: String },
}

/// Transformation seam - turns a source file into compiled content
#[async_trait]
pub trait Transformer: Send + Sync {
    async fn transform(&self, source: &SourceFile) -> Result<String, ToolError>;
}

/// Result of linting one file
#[derive(Debug, Clone)]
pub struct LintReport {
    pub path: PathBuf,

    /// No violations found
    pub clean: bool,

    /// Whatever the linter printed
    pub output: String,
}

/// Lint seam
#[async_trait]
pub trait Linter: Send + Sync {
    async fn lint(&self, path: &Path) -> Result<LintReport, ToolError>;
}

/// Documentation generation seam
#[async_trait]
pub trait DocGenerator: Send + Sync {
    async fn generate(&self, sources: &[PathBuf], options: &DocsConfig) -> Result<(), ToolError>;
}
