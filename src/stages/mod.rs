//! Post-processing chain
//!
//! Compiled content flows through the active post-processors in a fixed
//! order: vendor-prefix fixups, duplicate-rule elision, optional asset
//! inlining, optional minification. A disabled stage is absent from the
//! chain entirely, not present as a no-op.

pub mod dedupe;
pub mod inline;
pub mod minify;
pub mod prefixer;

use crate::core::asset::Asset;
use crate::core::config::PipelineConfig;
pub use dedupe::Dedupe;
pub use inline::Inliner;
pub use minify::Minifier;
pub use prefixer::Prefixer;
use thiserror::Error;

/// One named pass over a compiled asset
pub trait PostProcessor: Send + Sync {
    fn name(&self) -> &'static str;

    fn process(&self, asset: Asset) -> Result<Asset, StageError>;
}

/// Error raised by a post-processing stage
#[derive(Debug, Error)]
pub enum StageError {
    #[error("{stage}: {message}")]
    Failed {
        stage: &'static str,
        message: String,
    },
}

impl StageError {
    pub fn new(stage: &'static str, message: impl Into<String>) -> Self {
        StageError::Failed {
            stage,
            message: message.into(),
        }
    }
}

/// Assemble the active chain for a configuration.
///
/// Construction is pure: no file I/O happens here, only the decision of
/// which stages participate.
pub fn active_chain(config: &PipelineConfig) -> Vec<Box<dyn PostProcessor>> {
    let mut chain: Vec<Box<dyn PostProcessor>> = Vec::new();

    if config.prefixer.enabled {
        chain.push(Box::new(Prefixer::new(&config.prefixer.browsers)));
    }
    if config.dedupe.enabled {
        chain.push(Box::new(Dedupe));
    }
    if config.inline.enabled {
        chain.push(Box::new(Inliner::new(
            config.inline.max_size,
            config.inline.path_filter.as_deref(),
        )));
    }
    if config.minify_active() {
        chain.push(Box::new(Minifier));
    }

    chain
}
