//! Asset URL inlining
//!
//! Rewrites `url(...)` references to data URIs when the referenced file is
//! small enough and matches the optional path filter. References that are
//! already data URIs, remote, or over the threshold pass through untouched.

use crate::core::asset::Asset;
use crate::stages::{PostProcessor, StageError};
use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;
use regex::Regex;
use tracing::{debug, warn};

pub struct Inliner {
    max_size: u64,
    filter: Option<Regex>,
}

impl Inliner {
    /// The filter pattern was validated at configuration time; a pattern
    /// that no longer compiles falls back to inlining nothing.
    pub fn new(max_size: u64, filter: Option<&str>) -> Self {
        let filter = filter.map(|pattern| {
            Regex::new(pattern).unwrap_or_else(|_| {
                warn!("inline path filter '{}' is invalid, inlining nothing", pattern);
                Regex::new("$^").unwrap()
            })
        });
        Self { max_size, filter }
    }

    fn eligible(&self, reference: &str) -> bool {
        if reference.starts_with("data:")
            || reference.starts_with("http:")
            || reference.starts_with("https:")
            || reference.starts_with("//")
            || reference.starts_with('#')
        {
            return false;
        }
        match &self.filter {
            Some(filter) => filter.is_match(reference),
            None => true,
        }
    }
}

impl PostProcessor for Inliner {
    fn name(&self) -> &'static str {
        "inline"
    }

    fn process(&self, asset: Asset) -> Result<Asset, StageError> {
        let url_ref = Regex::new(r#"url\(\s*['"]?([^'")]+)['"]?\s*\)"#)
            .map_err(|e| StageError::new("inline", e.to_string()))?;

        let mut replaced = 0usize;
        let content = url_ref
            .replace_all(&asset.content, |caps: &regex::Captures<'_>| {
                let reference = caps[1].trim();
                if !self.eligible(reference) {
                    return caps[0].to_string();
                }

                // strip a query/fragment suffix for resolution (fonts do this)
                let file_part = reference.split(['?', '#']).next().unwrap_or(reference);
                let path = asset.source_dir.join(file_part);

                let meta = match std::fs::metadata(&path) {
                    Ok(meta) => meta,
                    Err(_) => return caps[0].to_string(),
                };
                if meta.len() > self.max_size {
                    debug!(
                        "{} is {} bytes, over the inline threshold",
                        path.display(),
                        meta.len()
                    );
                    return caps[0].to_string();
                }

                let bytes = match std::fs::read(&path) {
                    Ok(bytes) => bytes,
                    Err(err) => {
                        warn!("failed to read {}: {}", path.display(), err);
                        return caps[0].to_string();
                    }
                };

                replaced += 1;
                format!(
                    "url(data:{};base64,{})",
                    mime_for(file_part),
                    STANDARD.encode(bytes)
                )
            })
            .into_owned();

        if replaced > 0 {
            debug!("inlined {} reference(s) in {}", replaced, asset.rel.display());
        }

        Ok(Asset { content, ..asset })
    }
}

fn mime_for(reference: &str) -> &'static str {
    match reference.rsplit('.').next().map(|e| e.to_lowercase()).as_deref() {
        Some("png") => "image/png",
        Some("jpg") | Some("jpeg") => "image/jpeg",
        Some("gif") => "image/gif",
        Some("svg") => "image/svg+xml",
        Some("webp") => "image/webp",
        Some("woff") => "font/woff",
        Some("woff2") => "font/woff2",
        Some("ttf") => "font/ttf",
        Some("eot") => "application/vnd.ms-fontobject",
        _ => "application/octet-stream",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    fn asset_in(dir: &std::path::Path, content: &str) -> Asset {
        Asset {
            rel: PathBuf::from("main.css"),
            source_dir: dir.to_path_buf(),
            content: content.to_string(),
        }
    }

    #[test]
    fn test_small_file_inlined() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("dot.png"), [0x89u8, 0x50, 0x4e, 0x47]).unwrap();

        let inliner = Inliner::new(1024, None);
        let result = inliner
            .process(asset_in(dir.path(), "a { background: url(dot.png); }"))
            .unwrap();

        assert!(result.content.contains("url(data:image/png;base64,"));
        assert!(!result.content.contains("url(dot.png)"));
    }

    #[test]
    fn test_large_file_passed_through() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("big.png"), vec![0u8; 64]).unwrap();

        let inliner = Inliner::new(8, None);
        let result = inliner
            .process(asset_in(dir.path(), "a { background: url(big.png); }"))
            .unwrap();

        assert!(result.content.contains("url(big.png)"));
    }

    #[test]
    fn test_remote_and_data_refs_untouched() {
        let dir = tempfile::tempdir().unwrap();
        let css = "a { background: url(https://cdn/x.png); } b { background: url(data:image/png;base64,AA==); }";

        let inliner = Inliner::new(1024, None);
        let result = inliner.process(asset_in(dir.path(), css)).unwrap();

        assert_eq!(result.content, css);
    }

    #[test]
    fn test_path_filter_restricts_inlining() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("icon.svg"), b"<svg/>").unwrap();
        std::fs::write(dir.path().join("photo.png"), b"png").unwrap();

        let inliner = Inliner::new(1024, Some(r"\.svg$"));
        let css = "a { background: url(icon.svg); } b { background: url(photo.png); }";
        let result = inliner.process(asset_in(dir.path(), css)).unwrap();

        assert!(result.content.contains("url(data:image/svg+xml;base64,"));
        assert!(result.content.contains("url(photo.png)"));
    }

    #[test]
    fn test_missing_file_passed_through() {
        let dir = tempfile::tempdir().unwrap();
        let css = "a { background: url(missing.png); }";

        let inliner = Inliner::new(1024, None);
        let result = inliner.process(asset_in(dir.path(), css)).unwrap();

        assert_eq!(result.content, css);
    }

    #[test]
    fn test_query_suffix_resolved() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("font.woff2"), b"wOF2").unwrap();

        let inliner = Inliner::new(1024, None);
        let result = inliner
            .process(asset_in(dir.path(), "@font-face { src: url(font.woff2?v=3); }"))
            .unwrap();

        assert!(result.content.contains("url(data:font/woff2;base64,"));
    }
}
