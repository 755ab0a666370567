//! Core domain: configuration, pipeline construction, outcomes, events

pub mod asset;
pub mod config;
pub mod events;
pub mod merge;
pub mod outcome;
pub mod pipeline;

pub use asset::{Asset, SourceFile};
pub use config::{OutputStyle, PipelineConfig};
pub use events::{ChannelSink, EventSink, NullSink, PipelineEvent};
pub use outcome::{Failure, FailureKind, FailureMode, LintMode, RunOutcome};
pub use pipeline::Pipeline;
