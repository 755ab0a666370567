//! Completion signals
//!
//! Each operation publishes a completion event intended for an external
//! live-reload consumer. The sink is handed to the pipeline at construction
//! and scoped to that instance; nothing here is process-wide.

use std::path::PathBuf;
use tokio::sync::broadcast;
use tracing::debug;

/// Events published on operation completion
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PipelineEvent {
    /// Compiled output landed under the destination
    CompileFinished {
        /// Path pattern covering the written artifacts
        pattern: String,
    },
    /// Generated artifacts were removed
    CleanFinished { dest: PathBuf },
    /// A lint pass finished
    LintFinished { checked: usize, violations: usize },
    /// Documentation was regenerated
    DocsFinished { dest: PathBuf },
}

impl PipelineEvent {
    /// Stable event name for external consumers
    pub fn name(&self) -> &'static str {
        match self {
            PipelineEvent::CompileFinished { .. } => "compile.finished",
            PipelineEvent::CleanFinished { .. } => "clean.finished",
            PipelineEvent::LintFinished { .. } => "lint.finished",
            PipelineEvent::DocsFinished { .. } => "docs.finished",
        }
    }
}

/// Subscription interface for completion signals
pub trait EventSink: Send + Sync {
    fn publish(&self, event: PipelineEvent);
}

/// Discards every event
pub struct NullSink;

impl EventSink for NullSink {
    fn publish(&self, _event: PipelineEvent) {}
}

/// Fans events out to in-process subscribers over a broadcast channel
pub struct ChannelSink {
    tx: broadcast::Sender<PipelineEvent>,
}

impl ChannelSink {
    pub fn new(capacity: usize) -> (Self, broadcast::Receiver<PipelineEvent>) {
        let (tx, rx) = broadcast::channel(capacity);
        (Self { tx }, rx)
    }

    pub fn subscribe(&self) -> broadcast::Receiver<PipelineEvent> {
        self.tx.subscribe()
    }
}

impl EventSink for ChannelSink {
    fn publish(&self, event: PipelineEvent) {
        // Nobody listening is fine; the signal is advisory
        if self.tx.send(event.clone()).is_err() {
            debug!("no subscriber for {}", event.name());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_event_names() {
        let event = PipelineEvent::CompileFinished {
            pattern: "dist/css/**/*.css".to_string(),
        };
        assert_eq!(event.name(), "compile.finished");
    }

    #[tokio::test]
    async fn test_channel_sink_delivers() {
        let (sink, mut rx) = ChannelSink::new(8);
        sink.publish(PipelineEvent::CleanFinished {
            dest: PathBuf::from("dist/css"),
        });

        let event = rx.recv().await.unwrap();
        assert_eq!(event.name(), "clean.finished");
    }

    #[test]
    fn test_channel_sink_without_subscriber_does_not_panic() {
        let (sink, rx) = ChannelSink::new(8);
        drop(rx);
        sink.publish(PipelineEvent::DocsFinished {
            dest: PathBuf::from("docs/styles"),
        });
    }
}
