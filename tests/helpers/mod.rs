//! Test utility functions for assetline
#![allow(dead_code)]

use assetline::core::asset::SourceFile;
use assetline::core::config::PipelineConfig;
use assetline::{
    EventSink, LintReport, Linter, Notifier, Pipeline, PipelineEvent, ToolError, Transformer,
};
use async_trait::async_trait;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

/// A throwaway project on disk: sources under `src/`, output under `dist/`
pub struct Project {
    pub dir: tempfile::TempDir,
}

impl Project {
    pub fn new() -> Self {
        let dir = tempfile::tempdir().expect("tempdir");
        std::fs::create_dir_all(dir.path().join("src")).expect("src dir");
        Self { dir }
    }

    pub fn root(&self) -> &Path {
        self.dir.path()
    }

    pub fn src_dir(&self) -> PathBuf {
        self.root().join("src")
    }

    pub fn dest(&self) -> PathBuf {
        self.root().join("dist")
    }

    /// Write a source file under `src/`, creating parent directories
    pub fn write_source(&self, rel: &str, content: &str) -> PathBuf {
        let path = self.src_dir().join(rel);
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).expect("source parent");
        }
        std::fs::write(&path, content).expect("write source");
        path
    }

    /// Write a file anywhere under the project root
    pub fn write_file(&self, rel: &str, content: &[u8]) -> PathBuf {
        let path = self.root().join(rel);
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).expect("file parent");
        }
        std::fs::write(&path, content).expect("write file");
        path
    }

    /// Build an effective configuration rooted in this project, with an
    /// extra YAML overlay appended
    pub fn config(&self, extra: &str) -> PipelineConfig {
        let yaml = format!(
            "src: [\"{}/**/*.scss\"]\ndest: \"{}\"\n{}",
            self.src_dir().display(),
            self.dest().display(),
            extra
        );
        PipelineConfig::from_yaml(&yaml).expect("project config")
    }

    pub fn dest_file(&self, rel: &str) -> PathBuf {
        self.dest().join(rel)
    }
}

/// Transformer that echoes the source content as "compiled" output.
///
/// A source containing the marker `@fail` errors the way the real compiler
/// reports a syntax error.
pub struct MockTransformer {
    calls: AtomicUsize,
}

impl MockTransformer {
    pub fn new() -> Arc<Self> {
        Arc::new(Self {
            calls: AtomicUsize::new(0),
        })
    }
}

#[async_trait]
impl Transformer for MockTransformer {
    async fn transform(&self, source: &SourceFile) -> Result<String, ToolError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let content = std::fs::read_to_string(&source.path).map_err(|e| ToolError::Spawn {
            tool: "mock-sass".to_string(),
            message: e.to_string(),
        })?;
        if content.contains("@fail") {
            return Err(ToolError::NonZeroExit {
                tool: "mock-sass".to_string(),
                code: 65,
                stderr: format!("Error: expected \"{{\" in {}", source.path.display()),
            });
        }
        Ok(content)
    }
}

/// Linter that records every path it sees; content containing `BAD` is a
/// violation.
pub struct RecordingLinter {
    pub calls: Mutex<Vec<PathBuf>>,
}

impl RecordingLinter {
    pub fn new() -> Arc<Self> {
        Arc::new(Self {
            calls: Mutex::new(Vec::new()),
        })
    }

    pub fn call_count(&self) -> usize {
        self.calls.lock().unwrap().len()
    }
}

#[async_trait]
impl Linter for RecordingLinter {
    async fn lint(&self, path: &Path) -> Result<LintReport, ToolError> {
        self.calls.lock().unwrap().push(path.to_path_buf());
        let content = std::fs::read_to_string(path).unwrap_or_default();
        let clean = !content.contains("BAD");
        Ok(LintReport {
            path: path.to_path_buf(),
            clean,
            output: if clean {
                String::new()
            } else {
                "deliberate violation".to_string()
            },
        })
    }
}

/// Doc generator that records what it was asked to document
pub struct RecordingDocGen {
    pub calls: Mutex<Vec<Vec<PathBuf>>>,
    pub fail: std::sync::atomic::AtomicBool,
}

impl RecordingDocGen {
    pub fn new() -> Arc<Self> {
        Arc::new(Self {
            calls: Mutex::new(Vec::new()),
            fail: std::sync::atomic::AtomicBool::new(false),
        })
    }

    pub fn call_count(&self) -> usize {
        self.calls.lock().unwrap().len()
    }

    pub fn documented(&self) -> Vec<PathBuf> {
        self.calls.lock().unwrap().concat()
    }
}

#[async_trait]
impl assetline::DocGenerator for RecordingDocGen {
    async fn generate(
        &self,
        sources: &[PathBuf],
        _options: &assetline::core::config::DocsConfig,
    ) -> Result<(), ToolError> {
        self.calls.lock().unwrap().push(sources.to_vec());
        if self.fail.load(Ordering::SeqCst) {
            return Err(ToolError::NonZeroExit {
                tool: "mock-docgen".to_string(),
                code: 1,
                stderr: "boom".to_string(),
            });
        }
        Ok(())
    }
}

/// Event sink that collects published events
pub struct RecordingSink {
    pub events: Mutex<Vec<PipelineEvent>>,
}

impl RecordingSink {
    pub fn new() -> Arc<Self> {
        Arc::new(Self {
            events: Mutex::new(Vec::new()),
        })
    }

    pub fn event_names(&self) -> Vec<&'static str> {
        self.events.lock().unwrap().iter().map(|e| e.name()).collect()
    }

    pub fn has_event(&self, name: &str) -> bool {
        self.event_names().contains(&name)
    }
}

impl EventSink for RecordingSink {
    fn publish(&self, event: PipelineEvent) {
        self.events.lock().unwrap().push(event);
    }
}

/// Notifier that captures user-facing reports
pub struct RecordingNotifier {
    pub errors: Mutex<Vec<(String, String)>>,
    pub successes: Mutex<Vec<(String, String)>>,
}

impl RecordingNotifier {
    pub fn new() -> Arc<Self> {
        Arc::new(Self {
            errors: Mutex::new(Vec::new()),
            successes: Mutex::new(Vec::new()),
        })
    }

    pub fn error_count(&self) -> usize {
        self.errors.lock().unwrap().len()
    }
}

impl Notifier for RecordingNotifier {
    fn error(&self, title: &str, message: &str) {
        self.errors
            .lock()
            .unwrap()
            .push((title.to_string(), message.to_string()));
    }

    fn success(&self, title: &str, message: &str) {
        self.successes
            .lock()
            .unwrap()
            .push((title.to_string(), message.to_string()));
    }
}

/// Wire a pipeline over the project with mock collaborators
pub struct TestRig {
    pub pipeline: Pipeline,
    pub transformer: Arc<MockTransformer>,
    pub linter: Arc<RecordingLinter>,
    pub sink: Arc<RecordingSink>,
    pub notifier: Arc<RecordingNotifier>,
}

pub fn rig(project: &Project, extra_config: &str) -> TestRig {
    let transformer = MockTransformer::new();
    let linter = RecordingLinter::new();
    let sink = RecordingSink::new();
    let notifier = RecordingNotifier::new();

    let pipeline = Pipeline::from_config(project.config(extra_config))
        .with_transformer(transformer.clone())
        .with_linter(linter.clone())
        .with_event_sink(sink.clone())
        .with_notifier(notifier.clone());

    TestRig {
        pipeline,
        transformer,
        linter,
        sink,
        notifier,
    }
}

/// Poll until the condition holds or the timeout elapses
pub async fn wait_for<F>(mut condition: F, timeout: std::time::Duration) -> bool
where
    F: FnMut() -> bool,
{
    let deadline = std::time::Instant::now() + timeout;
    while std::time::Instant::now() < deadline {
        if condition() {
            return true;
        }
        tokio::time::sleep(std::time::Duration::from_millis(50)).await;
    }
    condition()
}
