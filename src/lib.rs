//! N-gram frequency statistics and smoothing parameters for plain-text corpora.
//!
//! The crate exposes both a library API and an `ngram-stats` command line interface.
//! A run segments paragraphs into sentences, tokenizes them into lowercase words, and
//! counts n-grams, (n-1)-grams and vocabulary words. From those tables it derives
//! Witten-Bell extension counts, the frequency-of-frequencies distribution, and
//! Good-Turing re-estimated counts with a Katz cutoff.
//!
//! ```no_run
//! use ngram_stats::{Analyzer, AnalyzerConfig, CsvSink, IngestConfig};
//!
//! # fn main() -> ngram_stats::Result<()> {
//! let cfg = AnalyzerConfig::builder()
//!     .order(3)
//!     .katz_threshold(5)
//!     .show_progress(false)
//!     .build()?;
//! let analyzer = Analyzer::new(cfg);
//! let artifacts = analyzer.analyze_paths(&["/path/to/corpus"], &IngestConfig::default())?;
//! let mut sink = CsvSink::new("tables")?;
//! artifacts.persist(&mut sink)?;
//! # Ok(())
//! # }
//! ```
//!
//! The CLI is enabled by default through the `cli` feature. Library users can disable
//! default features to avoid the CLI dependencies:
//! `ngram-stats = { version = "...", default-features = false }`.

#![forbid(unsafe_code)]
#![warn(
    missing_docs,
    clippy::all,
    rust_2018_idioms,
    future_incompatible,
    unused_lifetimes,
    unreachable_pub
)]
#![allow(
    clippy::module_name_repetitions,
    clippy::missing_panics_doc,
    clippy::missing_errors_doc,
    clippy::doc_markdown,
    clippy::cast_precision_loss
)]

pub mod analyzer;
pub mod config;
pub mod corpus;
pub mod error;
pub mod export;
pub mod extension;
pub mod fof;
pub mod frequency;
pub mod good_turing;
pub mod inspect;
pub mod metrics;
pub mod ngrams;
pub mod segment;
pub mod tokenize;

pub use analyzer::{AnalysisArtifacts, Analyzer};
pub use config::{AnalyzerBuilder, AnalyzerConfig, ExtensionStrategy, IngestConfig};
pub use error::{NgramError, Result};
pub use export::{AnalysisReport, CsvSink, JsonSink, MultiSink, TableKind, TableSink};
pub use extension::WittenBellParameters;
pub use fof::FrequencyOfFrequencies;
pub use frequency::{FrequencyTable, Vocabulary};
pub use good_turing::{GoodTuringEstimate, GoodTuringRow};
pub use metrics::AnalysisMetrics;
pub use segment::{PunctuationSegmenter, SentenceSegmenter, UnicodeSentences};
