//! Minification
//!
//! Comment and whitespace stripping. Annotation comments (`/*!` banners and
//! `/*#` pragmas such as the source-map annotation) survive, so positional
//! debugging metadata emitted by the compiler is preserved.

use crate::core::asset::Asset;
use crate::stages::{PostProcessor, StageError};

pub struct Minifier;

impl PostProcessor for Minifier {
    fn name(&self) -> &'static str {
        "minify"
    }

    fn process(&self, asset: Asset) -> Result<Asset, StageError> {
        let without_comments = strip_comments(&asset.content);
        let content = collapse_whitespace(&without_comments);

        Ok(Asset { content, ..asset })
    }
}

fn strip_comments(content: &str) -> String {
    let mut out = String::with_capacity(content.len());
    let mut rest = content;

    while let Some(start) = rest.find("/*") {
        out.push_str(&rest[..start]);
        let comment = &rest[start..];
        let end = comment.find("*/").map(|i| i + 2).unwrap_or(comment.len());

        // keep annotation comments
        if comment.starts_with("/*!") || comment.starts_with("/*#") {
            out.push_str(&comment[..end]);
        }
        rest = &comment[end..];
    }
    out.push_str(rest);

    out
}

fn collapse_whitespace(content: &str) -> String {
    let mut out = String::with_capacity(content.len());
    let mut in_string: Option<char> = None;
    let mut pending_space = false;

    for ch in content.chars() {
        if let Some(quote) = in_string {
            out.push(ch);
            if ch == quote {
                in_string = None;
            }
            continue;
        }

        match ch {
            '"' | '\'' => {
                if pending_space {
                    out.push(' ');
                    pending_space = false;
                }
                in_string = Some(ch);
                out.push(ch);
            }
            c if c.is_whitespace() => {
                pending_space = !out.is_empty();
            }
            '{' | '}' | ':' | ';' | ',' | '>' => {
                // no space around structural characters
                pending_space = false;
                out.push(ch);
            }
            _ => {
                if pending_space {
                    let keep = !matches!(out.chars().last(), Some('{' | '}' | ':' | ';' | ',' | '>'));
                    if keep {
                        out.push(' ');
                    }
                    pending_space = false;
                }
                out.push(ch);
            }
        }
    }

    out
}
