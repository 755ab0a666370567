//! Vendor-prefix fixups
//!
//! A bounded pass over declarations that still need vendor prefixes in
//! shipping browsers. Which prefixes are emitted follows the configured
//! browser target list; an unrecognized target keeps every prefix family.

use crate::core::asset::Asset;
use crate::stages::{PostProcessor, StageError};

/// Properties that still want prefixed copies, with the prefix families
/// that apply to each.
const PREFIXABLE: &[(&str, &[&str])] = &[
    ("appearance", &["-webkit-", "-moz-"]),
    ("backface-visibility", &["-webkit-"]),
    ("user-select", &["-webkit-", "-ms-"]),
    ("text-size-adjust", &["-webkit-", "-ms-"]),
    ("tab-size", &["-moz-"]),
    ("hyphens", &["-webkit-", "-ms-"]),
    ("mask-image", &["-webkit-"]),
    ("box-decoration-break", &["-webkit-"]),
];

pub struct Prefixer {
    /// Prefix families active for the configured browser targets
    families: Vec<&'static str>,
}

impl Prefixer {
    pub fn new(browsers: &[String]) -> Self {
        Self {
            families: active_families(browsers),
        }
    }
}

/// Map browser targets onto prefix families. Range-style targets
/// ("last 2 versions", "> 1%") keep everything, specific vendors narrow
/// the set.
fn active_families(browsers: &[String]) -> Vec<&'static str> {
    let mut webkit = false;
    let mut moz = false;
    let mut ms = false;

    for target in browsers {
        let target = target.to_lowercase();
        if target.contains("chrome") || target.contains("safari") || target.contains("ios") {
            webkit = true;
        } else if target.contains("firefox") {
            moz = true;
        } else if target.contains("edge") || target.contains("ie") {
            ms = true;
        } else {
            // "last N versions", percentages and anything else: keep all
            webkit = true;
            moz = true;
            ms = true;
        }
    }

    let mut families = Vec::new();
    if webkit {
        families.push("-webkit-");
    }
    if moz {
        families.push("-moz-");
    }
    if ms {
        families.push("-ms-");
    }
    families
}

impl PostProcessor for Prefixer {
    fn name(&self) -> &'static str {
        "prefixer"
    }

    fn process(&self, asset: Asset) -> Result<Asset, StageError> {
        let mut out = String::with_capacity(asset.content.len());

        for line in asset.content.lines() {
            let trimmed = line.trim_start();
            let indent = &line[..line.len() - trimmed.len()];

            if let Some((property, families)) = declaration_of(trimmed) {
                for family in families {
                    if self.families.contains(family) {
                        let prefixed = trimmed.replacen(property, &format!("{family}{property}"), 1);
                        out.push_str(indent);
                        out.push_str(&prefixed);
                        out.push('\n');
                    }
                }
            }

            out.push_str(line);
            out.push('\n');
        }

        Ok(Asset {
            content: out,
            ..asset
        })
    }
}

/// Match a declaration line against the prefixable table. Lines that are
/// already prefixed are left alone.
fn declaration_of(trimmed: &str) -> Option<(&'static str, &'static [&'static str])> {
    if trimmed.starts_with('-') {
        return None;
    }
    for (property, families) in PREFIXABLE {
        if let Some(rest) = trimmed.strip_prefix(property) {
            if rest.trim_start().starts_with(':') {
                return Some((property, families));
            }
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    fn asset(content: &str) -> Asset {
        Asset {
            rel: PathBuf::from("main.css"),
            source_dir: PathBuf::from("."),
            content: content.to_string(),
        }
    }

    #[test]
    fn test_prefixes_known_property() {
        let prefixer = Prefixer::new(&["last 2 versions".to_string()]);
        let result = prefixer
            .process(asset("a {\n  user-select: none;\n}\n"))
            .unwrap();

        assert!(result.content.contains("-webkit-user-select: none;"));
        assert!(result.content.contains("-ms-user-select: none;"));
        // the unprefixed declaration stays last
        let webkit = result.content.find("-webkit-user-select").unwrap();
        let plain = result.content.find("\n  user-select").unwrap();
        assert!(webkit < plain);
    }

    #[test]
    fn test_vendor_targets_narrow_families() {
        let prefixer = Prefixer::new(&["firefox 120".to_string()]);
        let result = prefixer.process(asset("a {\n  tab-size: 4;\n}\n")).unwrap();

        assert!(result.content.contains("-moz-tab-size: 4;"));
        assert!(!result.content.contains("-webkit-"));
    }

    #[test]
    fn test_already_prefixed_lines_untouched() {
        let prefixer = Prefixer::new(&["last 2 versions".to_string()]);
        let input = "a {\n  -webkit-user-select: none;\n}\n";
        let result = prefixer.process(asset(input)).unwrap();

        assert_eq!(result.content.matches("-webkit-user-select").count(), 1);
    }

    #[test]
    fn test_unknown_properties_untouched() {
        let prefixer = Prefixer::new(&["last 2 versions".to_string()]);
        let input = "a {\n  color: red;\n}\n";
        let result = prefixer.process(asset(input)).unwrap();

        assert_eq!(result.content, input);
    }
}
