//! Source and compiled asset models

use std::path::{Component, Path, PathBuf};
use tracing::warn;

/// A source file matched by the configured patterns
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceFile {
    /// Path on disk
    pub path: PathBuf,

    /// Path relative to the pattern root (drives output layout)
    pub rel: PathBuf,
}

impl SourceFile {
    /// Partials are compiled into their importers, never emitted on their own
    pub fn is_partial(&self) -> bool {
        self.path
            .file_name()
            .and_then(|n| n.to_str())
            .map(|n| n.starts_with('_'))
            .unwrap_or(false)
    }
}

/// A compiled asset flowing through the post-processing chain
#[derive(Debug, Clone)]
pub struct Asset {
    /// Destination-relative path (extension already rewritten)
    pub rel: PathBuf,

    /// Directory of the originating source, for resolving relative url() refs
    pub source_dir: PathBuf,

    /// Compiled content
    pub content: String,
}

/// Expand the configured source patterns into source files.
///
/// Unreadable entries are skipped with a warning; the patterns themselves are
/// validated at configuration time, so a pattern error here means the config
/// was constructed without going through validation.
pub fn resolve_sources(patterns: &[String]) -> Result<Vec<SourceFile>, glob::PatternError> {
    let mut sources = Vec::new();

    for pattern in patterns {
        let root = pattern_root(pattern);
        for entry in glob::glob(pattern)? {
            let path = match entry {
                Ok(path) => path,
                Err(err) => {
                    warn!("skipping unreadable entry: {}", err);
                    continue;
                }
            };
            if !path.is_file() {
                continue;
            }
            let rel = path.strip_prefix(&root).unwrap_or(&path).to_path_buf();
            sources.push(SourceFile { path, rel });
        }
    }

    sources.sort_by(|a, b| a.path.cmp(&b.path));
    sources.dedup();
    Ok(sources)
}

/// The static prefix of a glob pattern (the directories before the first
/// meta character). Watch registration observes these roots.
pub fn pattern_root(pattern: &str) -> PathBuf {
    let mut root = PathBuf::new();

    for component in Path::new(pattern).components() {
        let literal = match component {
            Component::Normal(part) => part
                .to_str()
                .map(|s| !s.contains(['*', '?', '[', '{']))
                .unwrap_or(false),
            _ => true,
        };
        if !literal {
            break;
        }
        root.push(component);
    }

    // A bare filename pattern watches the current directory
    if root.as_os_str().is_empty() || root == Path::new(pattern) {
        if root == Path::new(pattern) {
            root.pop();
        }
        if root.as_os_str().is_empty() {
            root.push(".");
        }
    }

    root
}

/// Rewrite a source-relative path to its compiled extension
pub fn with_extension(rel: &Path, ext: &str) -> PathBuf {
    let mut out = rel.to_path_buf();
    out.set_extension(ext);
    out
}
