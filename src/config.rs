//! Configuration builders controlling corpus analysis and ingestion.

use std::fmt;

use crate::error::{NgramError, Result};
use serde::{Deserialize, Serialize};

/// Strategy used to compute Witten-Bell extension counts.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "kebab-case")]
pub enum ExtensionStrategy {
    /// Single pass over observed n-grams, grouping final words by their (n-1)-gram prefix.
    #[default]
    PrefixScan,
    /// Probe every (n-1)-gram against every vocabulary word in parallel.
    CrossProduct,
}

impl fmt::Display for ExtensionStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            ExtensionStrategy::PrefixScan => "prefix-scan",
            ExtensionStrategy::CrossProduct => "cross-product",
        };
        f.write_str(label)
    }
}

/// Parameters of a single corpus analysis run.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AnalyzerConfig {
    /// N-gram order; (n-1)-grams are derived from the same sentences.
    pub order: usize,
    /// Katz threshold `k`: frequencies `c <= k` are re-estimated, larger ones are kept.
    pub katz_threshold: usize,
    /// How Witten-Bell extension counts are computed.
    pub extension_strategy: ExtensionStrategy,
    /// Enables per-stage logging through the `log` facade.
    pub show_progress: bool,
}

impl AnalyzerConfig {
    /// Returns a builder initialised with [`AnalyzerConfig::default`].
    #[must_use]
    pub fn builder() -> AnalyzerBuilder {
        AnalyzerBuilder::default()
    }

    /// Validates the invariants required for analysis.
    pub fn validate(&self) -> Result<()> {
        if self.order < 2 {
            return Err(NgramError::InvalidConfig(format!(
                "n-gram order must be at least 2 (got {}); order - 1 is the context window size",
                self.order
            )));
        }
        if self.katz_threshold == usize::MAX {
            return Err(NgramError::InvalidConfig(
                "katz_threshold is too large to address N_(k+1)".into(),
            ));
        }
        Ok(())
    }
}

impl Default for AnalyzerConfig {
    fn default() -> Self {
        Self {
            order: 2,
            katz_threshold: 5,
            extension_strategy: ExtensionStrategy::PrefixScan,
            show_progress: true,
        }
    }
}

/// Builder for [`AnalyzerConfig`].
#[derive(Debug, Default, Clone)]
pub struct AnalyzerBuilder {
    cfg: AnalyzerConfig,
}

impl AnalyzerBuilder {
    /// Creates a builder with [`AnalyzerConfig::default`] settings.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the n-gram order.
    #[must_use]
    pub fn order(mut self, value: usize) -> Self {
        self.cfg.order = value;
        self
    }

    /// Sets the Katz threshold.
    #[must_use]
    pub fn katz_threshold(mut self, value: usize) -> Self {
        self.cfg.katz_threshold = value;
        self
    }

    /// Selects the Witten-Bell extension counting strategy.
    #[must_use]
    pub fn extension_strategy(mut self, strategy: ExtensionStrategy) -> Self {
        self.cfg.extension_strategy = strategy;
        self
    }

    /// Enables or disables per-stage logging.
    #[must_use]
    pub fn show_progress(mut self, enabled: bool) -> Self {
        self.cfg.show_progress = enabled;
        self
    }

    /// Finalises the builder, returning a validated [`AnalyzerConfig`].
    pub fn build(self) -> Result<AnalyzerConfig> {
        self.cfg.validate()?;
        Ok(self.cfg)
    }
}

/// Configuration controlling how text corpora are discovered on disk.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct IngestConfig {
    /// Enables recursive directory traversal.
    pub recursive: bool,
    /// Follows symlinks encountered during traversal.
    pub follow_symlinks: bool,
}

impl Default for IngestConfig {
    fn default() -> Self {
        Self {
            recursive: true,
            follow_symlinks: false,
        }
    }
}

impl IngestConfig {
    /// Returns a builder initialised with [`IngestConfig::default`].
    #[must_use]
    pub fn builder() -> IngestBuilder {
        IngestBuilder::default()
    }
}

/// Builder for [`IngestConfig`].
#[derive(Debug, Default, Clone)]
pub struct IngestBuilder {
    cfg: IngestConfig,
}

impl IngestBuilder {
    /// Creates a new builder with [`IngestConfig::default`] settings.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Enables or disables recursive directory traversal.
    #[must_use]
    pub fn recursive(mut self, enabled: bool) -> Self {
        self.cfg.recursive = enabled;
        self
    }

    /// Enables or disables following of symlinks when traversing directories.
    #[must_use]
    pub fn follow_symlinks(mut self, enabled: bool) -> Self {
        self.cfg.follow_symlinks = enabled;
        self
    }

    /// Finalises the builder, returning the [`IngestConfig`].
    pub fn build(self) -> IngestConfig {
        self.cfg
    }
}
