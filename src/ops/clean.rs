//! Clean operation
//!
//! Forced, best-effort deletion of generated artifacts: compiled output
//! under the destination plus the derived documentation tree. Read-only
//! permission bits are cleared before removal, and a missing destination is
//! a no-op, so cleaning an already-clean tree always succeeds.

use crate::core::config::PipelineConfig;
use crate::core::events::{EventSink, PipelineEvent};
use crate::core::outcome::RunOutcome;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{debug, info, warn};

pub struct CleanOperation {
    config: Arc<PipelineConfig>,
    sink: Arc<dyn EventSink>,
}

impl CleanOperation {
    pub fn new(config: Arc<PipelineConfig>, sink: Arc<dyn EventSink>) -> Self {
        Self { config, sink }
    }

    pub async fn run(&self) -> RunOutcome {
        let mut tracker = RunOutcome::begin("clean");
        info!("clean run {} starting", tracker.run_id);

        let removed = remove_compiled(&self.config.dest).await;
        tracker.files_done(removed);

        if self.config.docs.enabled {
            let removed = remove_tree(&self.config.docs.dest).await;
            tracker.files_done(removed);
        }

        self.sink.publish(PipelineEvent::CleanFinished {
            dest: self.config.dest.clone(),
        });

        let outcome = tracker.finish();
        info!(
            "clean run {} removed {} artifact(s)",
            outcome.run_id, outcome.files
        );
        outcome
    }
}

/// Remove compiled artifacts (`*.css`, `*.css.map`) under the destination
async fn remove_compiled(dest: &Path) -> usize {
    let mut removed = 0usize;
    let mut pending = vec![dest.to_path_buf()];

    while let Some(dir) = pending.pop() {
        let mut entries = match tokio::fs::read_dir(&dir).await {
            Ok(entries) => entries,
            // missing destination is already clean
            Err(_) => continue,
        };
        while let Ok(Some(entry)) = entries.next_entry().await {
            let path = entry.path();
            if path.is_dir() {
                pending.push(path);
            } else if is_compiled_artifact(&path) && force_remove_file(&path).await {
                removed += 1;
            }
        }
    }

    removed
}

fn is_compiled_artifact(path: &Path) -> bool {
    let name = match path.file_name().and_then(|n| n.to_str()) {
        Some(name) => name,
        None => return false,
    };
    name.ends_with(".css") || name.ends_with(".css.map")
}

/// Remove an entire generated tree, counting the files it held
async fn remove_tree(root: &Path) -> usize {
    let mut count = 0usize;
    let mut pending = vec![root.to_path_buf()];
    let mut files: Vec<PathBuf> = Vec::new();

    while let Some(dir) = pending.pop() {
        let mut entries = match tokio::fs::read_dir(&dir).await {
            Ok(entries) => entries,
            Err(_) => continue,
        };
        while let Ok(Some(entry)) = entries.next_entry().await {
            let path = entry.path();
            if path.is_dir() {
                pending.push(path);
            } else {
                files.push(path);
            }
        }
    }

    for file in files {
        if force_remove_file(&file).await {
            count += 1;
        }
    }
    if let Err(err) = tokio::fs::remove_dir_all(root).await {
        if err.kind() != std::io::ErrorKind::NotFound {
            debug!("leaving {}: {}", root.display(), err);
        }
    }

    count
}

/// Best-effort removal that clears a read-only bit and retries once
async fn force_remove_file(path: &Path) -> bool {
    match tokio::fs::remove_file(path).await {
        Ok(()) => true,
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => false,
        Err(_) => {
            if let Ok(meta) = tokio::fs::metadata(path).await {
                let mut perms = meta.permissions();
                #[allow(clippy::permissions_set_readonly_false)]
                perms.set_readonly(false);
                let _ = tokio::fs::set_permissions(path, perms).await;
            }
            match tokio::fs::remove_file(path).await {
                Ok(()) => true,
                Err(err) => {
                    warn!("could not remove {}: {}", path.display(), err);
                    false
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_artifact_patterns() {
        assert!(is_compiled_artifact(Path::new("dist/css/main.css")));
        assert!(is_compiled_artifact(Path::new("dist/css/main.css.map")));
        assert!(!is_compiled_artifact(Path::new("dist/css/notes.txt")));
        assert!(!is_compiled_artifact(Path::new("dist/css/main.scss")));
    }
}
