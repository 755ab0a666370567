//! assetline - a staged asset pipeline for front-end builds

pub mod cli;
pub mod core;
pub mod notifier;
pub mod ops;
pub mod stages;
pub mod tools;
pub mod watch;

// Re-export commonly used types
pub use crate::core::{
    ChannelSink, EventSink, Failure, FailureKind, FailureMode, LintMode, NullSink, OutputStyle,
    Pipeline, PipelineConfig, PipelineEvent, RunOutcome,
};
pub use crate::notifier::{ConsoleNotifier, Notifier, NullNotifier};
pub use crate::ops::{CleanOperation, CompileOperation, DocsOperation, OperationInfo, ValidateOperation};
pub use crate::stages::{PostProcessor, StageError};
pub use crate::tools::{DocGenerator, LintReport, Linter, ToolError, Transformer};
pub use crate::watch::{WatchPlan, WatchSession};
