//! Docs operation
//!
//! Hands the matching sources (minus exclusions) to the external
//! documentation generator. Purely additive; compile output is never
//! touched.

use crate::core::asset::resolve_sources;
use crate::core::config::PipelineConfig;
use crate::core::events::{EventSink, PipelineEvent};
use crate::core::outcome::{Failure, FailureKind, RunOutcome};
use crate::notifier::Notifier;
use crate::tools::DocGenerator;
use globset::{Glob, GlobSet, GlobSetBuilder};
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{info, warn};

pub struct DocsOperation {
    config: Arc<PipelineConfig>,
    generator: Arc<dyn DocGenerator>,
    sink: Arc<dyn EventSink>,
    notifier: Arc<dyn Notifier>,
}

impl DocsOperation {
    pub fn new(
        config: Arc<PipelineConfig>,
        generator: Arc<dyn DocGenerator>,
        sink: Arc<dyn EventSink>,
        notifier: Arc<dyn Notifier>,
    ) -> Self {
        Self {
            config,
            generator,
            sink,
            notifier,
        }
    }

    pub async fn run(&self) -> RunOutcome {
        let mut tracker = RunOutcome::begin("docs");

        if !self.config.docs.enabled {
            info!("docs generation is disabled, skipping");
            return tracker.finish();
        }
        info!("docs run {} starting", tracker.run_id);

        let sources = match resolve_sources(&self.config.src) {
            Ok(sources) => sources,
            Err(err) => {
                tracker.record(Failure::new(FailureKind::Io, None, err.to_string()));
                return tracker.finish();
            }
        };

        let excludes = exclusion_set(&self.config.docs.exclude);
        let paths: Vec<PathBuf> = sources
            .into_iter()
            .filter(|s| !excludes.is_match(&s.rel) && !excludes.is_match(&s.path))
            .map(|s| s.path)
            .collect();

        if paths.is_empty() {
            info!("no sources to document");
            return tracker.finish();
        }

        match self.generator.generate(&paths, &self.config.docs).await {
            Ok(()) => {
                tracker.files_done(paths.len());
                self.sink.publish(PipelineEvent::DocsFinished {
                    dest: self.config.docs.dest.clone(),
                });
            }
            Err(err) => {
                self.notifier.error(
                    &format!("{} docs failed", self.config.name),
                    &err.to_string(),
                );
                tracker.record(Failure::new(FailureKind::Docs, None, err.to_string()));
            }
        }

        let outcome = tracker.finish();
        info!(
            "docs run {} finished: {} source(s), {} failure(s)",
            outcome.run_id,
            outcome.files,
            outcome.failures.len()
        );
        outcome
    }
}

/// Exclusion patterns were validated at configuration time; one that no
/// longer compiles is skipped with a warning rather than failing the run.
fn exclusion_set(patterns: &[String]) -> GlobSet {
    let mut builder = GlobSetBuilder::new();
    for pattern in patterns {
        match Glob::new(pattern) {
            Ok(glob) => {
                builder.add(glob);
            }
            Err(err) => warn!("ignoring docs exclusion '{}': {}", pattern, err),
        }
    }
    builder.build().unwrap_or_else(|err| {
        warn!("docs exclusion set failed to build: {}", err);
        GlobSet::empty()
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exclusion_set_matches_rel_paths() {
        let set = exclusion_set(&["**/_*.scss".to_string(), "vendor/**".to_string()]);
        assert!(set.is_match("pages/_draft.scss"));
        assert!(set.is_match("vendor/normalize.scss"));
        assert!(!set.is_match("pages/home.scss"));
    }
}
