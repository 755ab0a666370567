//! Pipeline construction
//!
//! A pipeline captures the effective configuration and its collaborators
//! (transformer, linter, doc generator, event sink, notifier) and hands out
//! the named operations. Construction performs no file I/O; it only decides
//! which stages are active and wires the seams.

use crate::core::config::PipelineConfig;
use crate::core::events::{EventSink, NullSink};
use crate::notifier::{ConsoleNotifier, Notifier};
use crate::ops::validate::LintCache;
use crate::ops::{
    CleanOperation, CompileOperation, DocsOperation, OperationInfo, ValidateOperation,
};
use crate::stages::active_chain;
use crate::tools::{DocGenerator, DocsCli, LintCli, Linter, SassCli, Transformer};
use crate::watch::{WatchPlan, WatchSession};
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::Mutex;

/// A configured pipeline handing out the named operations
#[derive(Clone)]
pub struct Pipeline {
    config: Arc<PipelineConfig>,
    transformer: Arc<dyn Transformer>,
    linter: Arc<dyn Linter>,
    docgen: Arc<dyn DocGenerator>,
    sink: Arc<dyn EventSink>,
    notifier: Arc<dyn Notifier>,
    lint_cache: LintCache,
}

impl Pipeline {
    /// Build a pipeline with the subprocess-backed default collaborators
    pub fn from_config(config: PipelineConfig) -> Self {
        let transformer = Arc::new(SassCli::new(
            &config.compiler,
            config.output_style,
            config.source_maps,
        ));
        let linter = Arc::new(LintCli::new(&config.lint));
        let docgen = Arc::new(DocsCli::new(&config.docs));

        Self {
            config: Arc::new(config),
            transformer,
            linter,
            docgen,
            sink: Arc::new(NullSink),
            notifier: Arc::new(ConsoleNotifier),
            lint_cache: Arc::new(Mutex::new(HashMap::new())),
        }
    }

    pub fn with_transformer(mut self, transformer: Arc<dyn Transformer>) -> Self {
        self.transformer = transformer;
        self
    }

    pub fn with_linter(mut self, linter: Arc<dyn Linter>) -> Self {
        self.linter = linter;
        self
    }

    pub fn with_doc_generator(mut self, docgen: Arc<dyn DocGenerator>) -> Self {
        self.docgen = docgen;
        self
    }

    /// Subscribe this pipeline instance to completion signals
    pub fn with_event_sink(mut self, sink: Arc<dyn EventSink>) -> Self {
        self.sink = sink;
        self
    }

    pub fn with_notifier(mut self, notifier: Arc<dyn Notifier>) -> Self {
        self.notifier = notifier;
        self
    }

    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    /// The operation catalog, for external task-runner integration
    pub fn operations() -> Vec<OperationInfo> {
        vec![
            crate::ops::COMPILE,
            crate::ops::CLEAN,
            crate::ops::VALIDATE,
            crate::ops::DOCS,
            crate::ops::WATCH,
        ]
    }

    pub fn compile(&self) -> CompileOperation {
        CompileOperation::new(
            self.config.clone(),
            self.transformer.clone(),
            active_chain(&self.config),
            self.sink.clone(),
            self.notifier.clone(),
        )
    }

    pub fn clean(&self) -> CleanOperation {
        CleanOperation::new(self.config.clone(), self.sink.clone())
    }

    /// The incremental lint cache is shared across invocations from the
    /// same pipeline, so watch-triggered passes stay incremental.
    pub fn validate(&self) -> ValidateOperation {
        ValidateOperation::new(
            self.config.clone(),
            self.linter.clone(),
            self.lint_cache.clone(),
            self.sink.clone(),
            self.notifier.clone(),
        )
    }

    pub fn docs(&self) -> DocsOperation {
        DocsOperation::new(
            self.config.clone(),
            self.docgen.clone(),
            self.sink.clone(),
            self.notifier.clone(),
        )
    }

    pub fn watch(&self) -> WatchSession {
        WatchSession::new(self.clone(), WatchPlan::resolve(&self.config))
    }
}
