//! Pipeline configuration schema
//!
//! Configuration is an explicit typed schema with package-supplied defaults.
//! A caller overlay (YAML file or `--set` pairs) is deep-merged over the
//! default template value-by-value, then deserialized and validated, so a
//! malformed overlay fails at construction rather than inside a stage.

use crate::core::merge::{deep_merge, merge_layers};
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use serde_yaml::Value;
use std::path::{Path, PathBuf};

/// Effective pipeline configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PipelineConfig {
    /// Pipeline name, used in logs and notifications
    pub name: String,

    /// Source glob patterns
    pub src: Vec<String>,

    /// Destination directory for compiled output
    pub dest: PathBuf,

    /// Output formatting mode
    pub output_style: OutputStyle,

    /// Embed positional debugging metadata alongside output
    pub source_maps: bool,

    /// Flatten compiled output into the destination root
    pub flatten: bool,

    /// Vendor-prefix fixups
    pub prefixer: PrefixerConfig,

    /// Duplicate-rule elision
    pub dedupe: DedupeConfig,

    /// Asset URL inlining
    pub inline: InlineConfig,

    /// Minification
    pub minify: MinifyConfig,

    /// Linting
    pub lint: LintConfig,

    /// Documentation generation
    pub docs: DocsConfig,

    /// Watch-mode options
    pub watch: WatchPaths,

    /// External compiler invocation
    pub compiler: CompilerConfig,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            name: "styles".to_string(),
            src: vec!["src/**/*.scss".to_string()],
            dest: PathBuf::from("dist/css"),
            output_style: OutputStyle::Expanded,
            source_maps: true,
            flatten: false,
            prefixer: PrefixerConfig::default(),
            dedupe: DedupeConfig::default(),
            inline: InlineConfig::default(),
            minify: MinifyConfig::default(),
            lint: LintConfig::default(),
            docs: DocsConfig::default(),
            watch: WatchPaths::default(),
            compiler: CompilerConfig::default(),
        }
    }
}

/// Output formatting mode
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputStyle {
    Expanded,
    Compressed,
}

impl OutputStyle {
    /// Flag value handed to the external compiler
    pub fn as_flag(&self) -> &'static str {
        match self {
            OutputStyle::Expanded => "expanded",
            OutputStyle::Compressed => "compressed",
        }
    }
}

/// Vendor-prefix stage options
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PrefixerConfig {
    pub enabled: bool,

    /// Browser targets deciding which prefixes to emit
    pub browsers: Vec<String>,
}

impl Default for PrefixerConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            browsers: vec!["last 2 versions".to_string()],
        }
    }
}

/// Duplicate-rule elision stage options
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct DedupeConfig {
    pub enabled: bool,
}

impl Default for DedupeConfig {
    fn default() -> Self {
        Self { enabled: true }
    }
}

/// Asset URL inlining stage options
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct InlineConfig {
    pub enabled: bool,

    /// Only files at or below this size are inlined
    pub max_size: u64,

    /// Optional regex restricting which url() references are considered
    pub path_filter: Option<String>,
}

impl Default for InlineConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            max_size: 16 * 1024,
            path_filter: None,
        }
    }
}

/// Minification stage options
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(default, deny_unknown_fields)]
pub struct MinifyConfig {
    /// Unset falls back to the production-build environment flag
    pub enabled: Option<bool>,
}

/// Lint stage options
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct LintConfig {
    pub enabled: bool,

    /// Re-lint on watch-triggered runs
    pub on_watch: bool,

    /// External linter command
    pub command: String,

    pub timeout_secs: u64,
}

impl Default for LintConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            on_watch: true,
            command: "stylelint".to_string(),
            timeout_secs: 60,
        }
    }
}

/// Documentation generation options
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct DocsConfig {
    pub enabled: bool,

    /// Destination directory for generated documentation
    pub dest: PathBuf,

    /// Glob patterns excluded from documentation
    pub exclude: Vec<String>,

    /// Theme handed to the generator
    pub theme: Option<String>,

    /// Sort order handed to the generator
    pub sort: DocSort,

    /// External generator command
    pub command: String,

    pub timeout_secs: u64,
}

impl Default for DocsConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            dest: PathBuf::from("docs/styles"),
            exclude: Vec::new(),
            theme: None,
            sort: DocSort::File,
            command: "sassdoc".to_string(),
            timeout_secs: 120,
        }
    }
}

/// Documentation sort order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DocSort {
    File,
    Name,
}

impl DocSort {
    pub fn as_flag(&self) -> &'static str {
        match self {
            DocSort::File => "file",
            DocSort::Name => "name",
        }
    }
}

/// Watch-mode options
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(default, deny_unknown_fields)]
pub struct WatchPaths {
    /// Caller-declared paths observed in addition to the source roots
    pub extra_paths: Vec<PathBuf>,
}

/// External compiler invocation options
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct CompilerConfig {
    pub command: String,

    /// Import resolution paths handed to the compiler
    pub load_paths: Vec<PathBuf>,

    pub timeout_secs: u64,
}

impl Default for CompilerConfig {
    fn default() -> Self {
        Self {
            command: "sass".to_string(),
            load_paths: Vec::new(),
            timeout_secs: 60,
        }
    }
}

impl PipelineConfig {
    /// Load configuration from a YAML overlay file merged over the defaults
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path).with_context(|| {
            format!("failed to read configuration file {}", path.as_ref().display())
        })?;
        Self::from_yaml(&content)
    }

    /// Parse a YAML overlay and merge it over the defaults
    pub fn from_yaml(yaml: &str) -> Result<Self> {
        let overlay: Value =
            serde_yaml::from_str(yaml).context("configuration overlay is not valid YAML")?;
        Self::with_overrides(overlay)
    }

    /// Merge a caller overlay over the default template.
    ///
    /// Each call serializes a fresh default template, so no sequence of
    /// constructions can leak state between effective configurations.
    pub fn with_overrides(overlay: Value) -> Result<Self> {
        let base = serde_yaml::to_value(Self::default())
            .context("failed to serialize default configuration template")?;
        let merged = match overlay {
            Value::Null => base,
            overlay => deep_merge(base, overlay),
        };
        let config: Self =
            serde_yaml::from_value(merged).context("invalid configuration")?;
        config.validate()?;
        Ok(config)
    }

    /// Load from an optional file plus `--set key=value` pairs, flags winning
    pub fn load(path: Option<&Path>, sets: &[(String, String)]) -> Result<Self> {
        let file_overlay = match path {
            Some(path) => {
                let content = std::fs::read_to_string(path).with_context(|| {
                    format!("failed to read configuration file {}", path.display())
                })?;
                serde_yaml::from_str(&content)
                    .context("configuration overlay is not valid YAML")?
            }
            None => Value::Null,
        };
        let overlay = merge_layers(vec![file_overlay, overlay_from_pairs(sets)?]);
        Self::with_overrides(overlay)
    }

    /// Validate the effective configuration
    pub fn validate(&self) -> Result<()> {
        if self.src.is_empty() {
            anyhow::bail!("at least one source pattern is required");
        }
        for pattern in &self.src {
            glob::Pattern::new(pattern)
                .with_context(|| format!("invalid source pattern '{}'", pattern))?;
        }
        if self.dest.as_os_str().is_empty() {
            anyhow::bail!("destination directory must not be empty");
        }
        if self.compiler.command.is_empty() {
            anyhow::bail!("compiler command must not be empty");
        }
        if self.prefixer.enabled && self.prefixer.browsers.is_empty() {
            anyhow::bail!("prefixer is enabled but the browser target list is empty");
        }
        if self.inline.enabled {
            if self.inline.max_size == 0 {
                anyhow::bail!("inline is enabled but max_size is zero");
            }
            if let Some(filter) = &self.inline.path_filter {
                regex::Regex::new(filter)
                    .with_context(|| format!("invalid inline path filter '{}'", filter))?;
            }
        }
        if self.lint.enabled && self.lint.command.is_empty() {
            anyhow::bail!("lint is enabled but the linter command is empty");
        }
        if self.docs.enabled {
            if self.docs.dest.as_os_str().is_empty() {
                anyhow::bail!("docs is enabled but the destination is empty");
            }
            if self.docs.command.is_empty() {
                anyhow::bail!("docs is enabled but the generator command is empty");
            }
            for pattern in &self.docs.exclude {
                globset::Glob::new(pattern)
                    .with_context(|| format!("invalid docs exclusion pattern '{}'", pattern))?;
            }
        }
        Ok(())
    }

    /// Whether the minification stage is active: explicit flag, or the
    /// production-build environment flag when unset.
    pub fn minify_active(&self) -> bool {
        self.minify.enabled.unwrap_or_else(|| {
            std::env::var("ASSETLINE_ENV")
                .map(|v| v == "production")
                .unwrap_or(false)
        })
    }
}

/// Build a nested overlay value from dotted `--set key=value` pairs
pub fn overlay_from_pairs(pairs: &[(String, String)]) -> Result<Value> {
    let mut overlay = Value::Null;

    for (key, raw) in pairs {
        let parsed: Value = serde_yaml::from_str(raw)
            .with_context(|| format!("invalid value for '{}': {}", key, raw))?;

        let mut value = parsed;
        for segment in key.rsplit('.') {
            let mut map = serde_yaml::Mapping::new();
            map.insert(Value::String(segment.to_string()), value);
            value = Value::Mapping(map);
        }
        overlay = deep_merge(overlay, value);
    }

    Ok(overlay)
}
