//! Validate operation
//!
//! Lints source files, restricted to files changed since the last pass. The
//! incremental cache is keyed by file identity (path, modification time,
//! length) and lives with the pipeline instance, so repeated watch-triggered
//! runs only hand changed files to the linter. Files with violations are not
//! cached; a persistent violation keeps being reported until it is fixed.

use crate::core::asset::resolve_sources;
use crate::core::config::PipelineConfig;
use crate::core::events::{EventSink, PipelineEvent};
use crate::core::outcome::{Failure, FailureKind, LintMode, RunOutcome};
use crate::notifier::Notifier;
use crate::tools::Linter;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::SystemTime;
use tokio::sync::Mutex;
use tracing::{debug, info, warn};

/// Identity stamp for the incremental cache
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FileStamp {
    mtime: SystemTime,
    len: u64,
}

impl FileStamp {
    async fn of(path: &Path) -> std::io::Result<Self> {
        let meta = tokio::fs::metadata(path).await?;
        Ok(Self {
            mtime: meta.modified()?,
            len: meta.len(),
        })
    }
}

pub type LintCache = Arc<Mutex<HashMap<PathBuf, FileStamp>>>;

pub struct ValidateOperation {
    config: Arc<PipelineConfig>,
    linter: Arc<dyn Linter>,
    cache: LintCache,
    sink: Arc<dyn EventSink>,
    notifier: Arc<dyn Notifier>,
}

impl ValidateOperation {
    pub fn new(
        config: Arc<PipelineConfig>,
        linter: Arc<dyn Linter>,
        cache: LintCache,
        sink: Arc<dyn EventSink>,
        notifier: Arc<dyn Notifier>,
    ) -> Self {
        Self {
            config,
            linter,
            cache,
            sink,
            notifier,
        }
    }

    pub async fn run(&self, mode: LintMode) -> RunOutcome {
        let mut tracker = RunOutcome::begin("validate");
        info!("validate run {} starting ({:?})", tracker.run_id, mode);

        let sources = match resolve_sources(&self.config.src) {
            Ok(sources) => sources,
            Err(err) => {
                tracker.record(Failure::new(FailureKind::Io, None, err.to_string()));
                return tracker.finish();
            }
        };

        let mut violations = 0usize;
        for source in &sources {
            let stamp = match FileStamp::of(&source.path).await {
                Ok(stamp) => stamp,
                Err(err) => {
                    warn!("skipping {}: {}", source.path.display(), err);
                    continue;
                }
            };

            let unchanged = {
                let cache = self.cache.lock().await;
                cache.get(&source.path) == Some(&stamp)
            };
            if unchanged {
                debug!("unchanged since last pass: {}", source.path.display());
                continue;
            }

            match self.linter.lint(&source.path).await {
                Ok(report) if report.clean => {
                    self.cache.lock().await.insert(source.path.clone(), stamp);
                    tracker.file_done();
                }
                Ok(report) => {
                    violations += 1;
                    tracker.file_done();
                    self.notifier.error(
                        &format!("{} lint", self.config.name),
                        &format!("{}\n{}", report.path.display(), report.output),
                    );
                    tracker.record(Failure::new(
                        FailureKind::Lint,
                        Some(report.path),
                        report.output,
                    ));
                }
                Err(err) => {
                    tracker.record(Failure::new(
                        FailureKind::Lint,
                        Some(source.path.clone()),
                        err.to_string(),
                    ));
                }
            }
        }

        let outcome = tracker.finish();
        self.sink.publish(PipelineEvent::LintFinished {
            checked: outcome.files,
            violations,
        });
        info!(
            "validate run {} finished: {} checked, {} violation(s)",
            outcome.run_id, outcome.files, violations
        );
        outcome
    }
}
