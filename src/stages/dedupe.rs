//! Duplicate-rule elision
//!
//! Drops rule blocks that are exact duplicates of a later one (the last
//! occurrence wins, matching the cascade). Blocks compare on their
//! whitespace-normalized text, so formatting differences do not defeat the
//! match. Nested blocks (@media and friends) are treated as one unit.

use crate::core::asset::Asset;
use crate::stages::{PostProcessor, StageError};
use std::collections::HashSet;

pub struct Dedupe;

impl PostProcessor for Dedupe {
    fn name(&self) -> &'static str {
        "dedupe"
    }

    fn process(&self, asset: Asset) -> Result<Asset, StageError> {
        let chunks = split_chunks(&asset.content);

        // Walk backwards keeping the last occurrence of each normalized block
        let mut seen: HashSet<String> = HashSet::new();
        let mut keep = vec![true; chunks.len()];
        for (idx, chunk) in chunks.iter().enumerate().rev() {
            if let Chunk::Block(text) = chunk {
                if !seen.insert(normalize(text)) {
                    keep[idx] = false;
                }
            }
        }

        let mut out = String::with_capacity(asset.content.len());
        for (idx, chunk) in chunks.iter().enumerate() {
            if keep[idx] {
                match chunk {
                    Chunk::Block(text) | Chunk::Other(text) => out.push_str(text),
                }
            }
        }

        Ok(Asset {
            content: out,
            ..asset
        })
    }
}

enum Chunk {
    /// A top-level `selector { ... }` block including trailing newline
    Block(String),
    /// Anything between blocks: @charset, comments, blank lines
    Other(String),
}

/// Split content into top-level blocks by brace depth
fn split_chunks(content: &str) -> Vec<Chunk> {
    let mut chunks = Vec::new();
    let mut current = String::new();
    let mut depth = 0usize;
    let mut in_block = false;

    for ch in content.chars() {
        match ch {
            '{' => {
                if depth == 0 && !in_block {
                    // selector text accumulated so far belongs to this block
                    let split = current.rfind('\n').map(|i| i + 1).unwrap_or(0);
                    let (before, selector) = current.split_at(split);
                    if !before.is_empty() {
                        chunks.push(Chunk::Other(before.to_string()));
                    }
                    current = selector.to_string();
                    in_block = true;
                }
                depth += 1;
                current.push(ch);
            }
            '}' => {
                depth = depth.saturating_sub(1);
                current.push(ch);
                if depth == 0 && in_block {
                    chunks.push(Chunk::Block(std::mem::take(&mut current)));
                    in_block = false;
                }
            }
            _ => current.push(ch),
        }
    }
    if !current.is_empty() {
        chunks.push(Chunk::Other(current));
    }

    chunks
}

fn normalize(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}
