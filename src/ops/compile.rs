//! Compile operation
//!
//! Read matching sources, transform each, pipe the result through the active
//! post-processing chain, write to the destination, publish the completion
//! signal. Failure handling is two-tier: every failure is reported through
//! the notifier and the log; whether it aborts the batch is the caller's
//! per-invocation choice.

use crate::core::asset::{resolve_sources, with_extension, Asset, SourceFile};
use crate::core::config::PipelineConfig;
use crate::core::events::{EventSink, PipelineEvent};
use crate::core::outcome::{Failure, FailureKind, FailureMode, RunOutcome};
use crate::notifier::Notifier;
use crate::stages::PostProcessor;
use crate::tools::Transformer;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{debug, error, info};

pub struct CompileOperation {
    config: Arc<PipelineConfig>,
    transformer: Arc<dyn Transformer>,
    chain: Vec<Box<dyn PostProcessor>>,
    sink: Arc<dyn EventSink>,
    notifier: Arc<dyn Notifier>,
}

impl CompileOperation {
    pub fn new(
        config: Arc<PipelineConfig>,
        transformer: Arc<dyn Transformer>,
        chain: Vec<Box<dyn PostProcessor>>,
        sink: Arc<dyn EventSink>,
        notifier: Arc<dyn Notifier>,
    ) -> Self {
        Self {
            config,
            transformer,
            chain,
            sink,
            notifier,
        }
    }

    /// Run one compile pass over the configured sources
    pub async fn run(&self, mode: FailureMode) -> RunOutcome {
        let mut tracker = RunOutcome::begin("compile");
        info!(
            "compile run {} starting for '{}'",
            tracker.run_id, self.config.name
        );

        let sources = match resolve_sources(&self.config.src) {
            Ok(sources) => sources,
            Err(err) => {
                tracker.record(Failure::new(FailureKind::Io, None, err.to_string()));
                return tracker.finish();
            }
        };

        for source in sources.iter().filter(|s| !s.is_partial()) {
            match self.compile_one(source).await {
                Ok(dest) => {
                    debug!("wrote {}", dest.display());
                    tracker.file_done();
                }
                Err(failure) => {
                    error!(
                        "compile failed for {}: {}",
                        source.path.display(),
                        failure.message
                    );
                    self.notifier.error(
                        &format!("{} compile failed", self.config.name),
                        &format!("{}: {}", source.path.display(), failure.message),
                    );
                    tracker.record(failure);
                    if mode == FailureMode::FailFast {
                        break;
                    }
                }
            }
        }

        let outcome = tracker.finish();
        if outcome.files > 0 {
            self.sink.publish(PipelineEvent::CompileFinished {
                pattern: format!("{}/**/*.css", self.config.dest.display()),
            });
        }
        info!(
            "compile run {} finished: {} file(s), {} failure(s)",
            outcome.run_id,
            outcome.files,
            outcome.failures.len()
        );
        outcome
    }

    async fn compile_one(&self, source: &SourceFile) -> Result<PathBuf, Failure> {
        let content = self.transformer.transform(source).await.map_err(|err| {
            Failure::new(
                FailureKind::Transform,
                Some(source.path.clone()),
                err.to_string(),
            )
        })?;

        let mut asset = Asset {
            rel: with_extension(&source.rel, "css"),
            source_dir: source
                .path
                .parent()
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from(".")),
            content,
        };

        for stage in &self.chain {
            asset = stage.process(asset).map_err(|err| {
                Failure::new(
                    FailureKind::PostProcess,
                    Some(source.path.clone()),
                    err.to_string(),
                )
            })?;
        }

        let rel = if self.config.flatten {
            asset
                .rel
                .file_name()
                .map(PathBuf::from)
                .unwrap_or_else(|| asset.rel.clone())
        } else {
            asset.rel.clone()
        };
        let dest = self.config.dest.join(rel);

        if let Some(parent) = dest.parent() {
            tokio::fs::create_dir_all(parent).await.map_err(|err| {
                Failure::new(FailureKind::Io, Some(source.path.clone()), err.to_string())
            })?;
        }
        tokio::fs::write(&dest, &asset.content).await.map_err(|err| {
            Failure::new(FailureKind::Io, Some(source.path.clone()), err.to_string())
        })?;

        Ok(dest)
    }
}
