//! Watch session
//!
//! Binds file-change events to a set of operations and re-runs them until
//! the hosting process exits. The bound operations for one change event run
//! concurrently with one another; successive change events are serialized so
//! two triggered runs never write the destination at the same time.

use crate::core::asset::pattern_root;
use crate::core::config::PipelineConfig;
use crate::core::outcome::{FailureMode, LintMode};
use crate::core::pipeline::Pipeline;
use globset::{Glob, GlobSet, GlobSetBuilder};
use notify::{Event, EventKind, RecursiveMode, Watcher};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use thiserror::Error;
use tokio::sync::{mpsc, Mutex};
use tracing::{debug, info, warn};

/// Error types for watch sessions
#[derive(Debug, Error)]
pub enum WatchError {
    #[error("failed to initialize file watcher: {0}")]
    Init(#[from] notify::Error),

    #[error("no watchable paths resolved from the configuration")]
    NothingToWatch,
}

/// The resolved binding of observed paths to operations
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WatchPlan {
    /// Directories registered with the watcher: the static roots of the
    /// source patterns plus caller-declared extra paths
    pub paths: Vec<PathBuf>,

    /// Lint on each change event
    pub validate: bool,

    /// Regenerate docs on each change event
    pub docs: bool,
}

impl WatchPlan {
    pub fn resolve(config: &PipelineConfig) -> Self {
        let mut paths: Vec<PathBuf> = config.src.iter().map(|p| pattern_root(p)).collect();
        paths.extend(config.watch.extra_paths.iter().cloned());
        paths.sort();
        paths.dedup();

        Self {
            paths,
            validate: config.lint.enabled && config.lint.on_watch,
            docs: config.docs.enabled,
        }
    }

    /// Names of the operations bound to each change event
    pub fn bound_operations(&self) -> Vec<&'static str> {
        let mut ops = vec!["compile"];
        if self.validate {
            ops.push("validate");
        }
        if self.docs {
            ops.push("docs");
        }
        ops
    }
}

/// A long-lived binding of file-change events to pipeline operations
pub struct WatchSession {
    pipeline: Pipeline,
    plan: WatchPlan,
    sources: GlobSet,
    extra_paths: Vec<PathBuf>,
    gate: Arc<Mutex<()>>,
}

impl WatchSession {
    pub fn new(pipeline: Pipeline, plan: WatchPlan) -> Self {
        let sources = source_set(&pipeline.config().src);
        let extra_paths = pipeline.config().watch.extra_paths.clone();
        Self {
            pipeline,
            plan,
            sources,
            extra_paths,
            gate: Arc::new(Mutex::new(())),
        }
    }

    pub fn plan(&self) -> &WatchPlan {
        &self.plan
    }

    /// Serve change events until the hosting process exits (or the session
    /// future is dropped).
    pub async fn run(self) -> Result<(), WatchError> {
        let (tx, mut rx) = mpsc::unbounded_channel();

        let mut watcher =
            notify::recommended_watcher(move |result: Result<Event, notify::Error>| {
                match result {
                    Ok(event) => {
                        let _ = tx.send(event);
                    }
                    Err(err) => warn!("watch backend error: {}", err),
                }
            })?;

        let mut registered = 0usize;
        for path in &self.plan.paths {
            match watcher.watch(path, RecursiveMode::Recursive) {
                Ok(()) => {
                    registered += 1;
                    debug!("watching {}", path.display());
                }
                Err(err) => warn!("cannot watch {}: {}", path.display(), err),
            }
        }
        if registered == 0 {
            return Err(WatchError::NothingToWatch);
        }

        info!(
            "watch session started: {} path(s), operations: {}",
            registered,
            self.plan.bound_operations().join(", ")
        );

        while let Some(event) = rx.recv().await {
            if !self.qualifies(&event) {
                continue;
            }
            debug!("change event: {:?}", event.paths);
            self.trigger().await;
        }

        Ok(())
    }

    /// Whether a change event triggers the bound operations
    pub fn qualifies(&self, event: &Event) -> bool {
        let interesting = matches!(
            event.kind,
            EventKind::Create(_) | EventKind::Modify(_) | EventKind::Remove(_)
        );
        if !interesting {
            return false;
        }
        event.paths.iter().any(|path| self.is_relevant(path))
    }

    /// A path is relevant when it matches a source pattern or lives under a
    /// caller-declared extra path.
    pub fn is_relevant(&self, path: &Path) -> bool {
        if self.sources.is_match(path) {
            return true;
        }
        self.extra_paths
            .iter()
            .any(|extra| path.starts_with(extra))
    }

    /// Run the bound operation set once. The operations for one trigger run
    /// concurrently with one another; compile failures are resilient and
    /// lint runs lenient, so one bad save never ends the session. Triggered
    /// runs are serialized: a second trigger waits for the in-flight one.
    pub async fn trigger(&self) {
        let _guard = self.gate.lock().await;

        let compile = self.pipeline.compile();
        let validate = self.plan.validate.then(|| self.pipeline.validate());
        let docs = self.plan.docs.then(|| self.pipeline.docs());

        tokio::join!(
            async {
                let outcome = compile.run(FailureMode::Resilient).await;
                debug!("compile trigger finished: {} file(s)", outcome.files);
            },
            async {
                if let Some(validate) = validate {
                    let outcome = validate.run(LintMode::Lenient).await;
                    debug!("validate trigger finished: {} file(s)", outcome.files);
                }
            },
            async {
                if let Some(docs) = docs {
                    let outcome = docs.run().await;
                    debug!("docs trigger finished: {} file(s)", outcome.files);
                }
            },
        );
    }
}

/// Match event paths against the source patterns wherever the project root
/// happens to be, since the watcher reports absolute paths.
fn source_set(patterns: &[String]) -> GlobSet {
    let mut builder = GlobSetBuilder::new();
    for pattern in patterns {
        let anchored = if pattern.starts_with("**") || pattern.starts_with('/') {
            pattern.clone()
        } else {
            format!("**/{}", pattern)
        };
        match Glob::new(&anchored) {
            Ok(glob) => {
                builder.add(glob);
            }
            Err(err) => warn!("ignoring source pattern '{}': {}", pattern, err),
        }
    }
    builder.build().unwrap_or_else(|err| {
        warn!("source match set failed to build: {}", err);
        GlobSet::empty()
    })
}
