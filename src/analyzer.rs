//! Corpus analysis pipeline producing frequency tables and smoothing parameters.

use std::fmt;
use std::path::Path;
use std::time::Instant;

use log::{debug, info};

use crate::config::{AnalyzerBuilder, AnalyzerConfig, IngestConfig};
use crate::corpus::load_paragraphs;
use crate::error::{NgramError, Result};
use crate::export::{TableKind, TableSink};
use crate::extension::WittenBellParameters;
use crate::fof::{total_addressable, FrequencyOfFrequencies};
use crate::frequency::{FrequencyTable, Vocabulary};
use crate::good_turing::GoodTuringEstimate;
use crate::metrics::{sample_rss_kb, AnalysisMetrics, Stage};
use crate::ngrams::corpus_ngrams;
use crate::segment::{PunctuationSegmenter, SentenceSegmenter};
use crate::tokenize::split_words;

/// High-level façade configuring and executing analysis runs.
#[derive(Debug, Clone)]
pub struct Analyzer<S = PunctuationSegmenter> {
    cfg: AnalyzerConfig,
    segmenter: S,
}

/// Tables returned after an analysis run completes.
///
/// Every table is present: a run that fails at any stage returns an error instead.
#[must_use]
#[derive(Debug, Clone)]
pub struct AnalysisArtifacts {
    /// Configuration the run used.
    pub config: AnalyzerConfig,
    /// N-gram frequencies.
    pub ngrams: FrequencyTable<String>,
    /// (n-1)-gram frequencies.
    pub contexts: FrequencyTable<String>,
    /// Word frequencies in first-occurrence order.
    pub vocabulary: Vocabulary,
    /// Distinct extension counts per (n-1)-gram.
    pub witten_bell: WittenBellParameters,
    /// Frequency-of-frequencies with the synthesized zero bucket.
    pub frequency_of_frequencies: FrequencyOfFrequencies,
    /// Good-Turing re-estimated counts.
    pub good_turing: GoodTuringEstimate,
    /// Sizes and timings captured during the run.
    pub metrics: AnalysisMetrics,
}

impl Analyzer {
    /// Creates an analyzer that segments paragraphs on sentence-final punctuation.
    #[must_use]
    pub fn new(cfg: AnalyzerConfig) -> Self {
        Self::with_segmenter(cfg, PunctuationSegmenter)
    }

    /// Returns an [`AnalyzerBuilder`] with default settings.
    #[must_use]
    pub fn builder() -> AnalyzerBuilder {
        AnalyzerConfig::builder()
    }
}

impl<S: SentenceSegmenter> Analyzer<S> {
    /// Creates an analyzer that splits paragraphs with `segmenter`.
    #[must_use]
    pub fn with_segmenter(cfg: AnalyzerConfig, segmenter: S) -> Self {
        Self { cfg, segmenter }
    }

    /// Returns an immutable reference to the underlying configuration.
    #[must_use]
    pub fn config(&self) -> &AnalyzerConfig {
        &self.cfg
    }

    /// Analyzes text files discovered according to [`IngestConfig`].
    pub fn analyze_paths<P: AsRef<Path>>(
        &self,
        inputs: &[P],
        ingest: &IngestConfig,
    ) -> Result<AnalysisArtifacts> {
        let paragraphs = load_paragraphs(inputs, ingest)?;
        self.analyze(&paragraphs)
    }

    /// Analyzes an in-memory corpus given as ordered paragraphs.
    pub fn analyze<T: AsRef<str>>(&self, paragraphs: &[T]) -> Result<AnalysisArtifacts> {
        self.cfg.validate()?;
        let n = self.cfg.order;
        let run_start = Instant::now();
        let mut metrics = AnalysisMetrics {
            paragraphs: paragraphs.len(),
            ..AnalysisMetrics::default()
        };

        let stage_start = Instant::now();
        let sentences: Vec<Vec<String>> = paragraphs
            .iter()
            .flat_map(|paragraph| self.segmenter.split(paragraph.as_ref()))
            .map(split_words)
            .collect();
        metrics.sentences = sentences.len();
        metrics.tokens = sentences.iter().map(Vec::len).sum();
        metrics.record(Stage::Tokenization, stage_start.elapsed());
        self.progress(format_args!(
            "tokenized {} paragraphs into {} sentences and {} tokens",
            metrics.paragraphs, metrics.sentences, metrics.tokens
        ));

        let stage_start = Instant::now();
        let ngram_list = corpus_ngrams(&sentences, n)?;
        if ngram_list.is_empty() {
            return Err(NgramError::Data(format!(
                "corpus produced no {n}-grams; every sentence is shorter than {n} tokens"
            )));
        }
        let context_list = corpus_ngrams(&sentences, n - 1)?;
        metrics.ngram_occurrences = ngram_list.len();
        metrics.context_occurrences = context_list.len();
        let ngrams: FrequencyTable<String> = ngram_list.into_iter().collect();
        let contexts: FrequencyTable<String> = context_list.into_iter().collect();
        let vocabulary: Vocabulary = sentences.into_iter().flatten().collect();
        metrics.record(Stage::Counting, stage_start.elapsed());
        self.progress(format_args!(
            "{} {n}-gram types, {} {}-gram types, {} vocabulary words",
            ngrams.len(),
            contexts.len(),
            n - 1,
            vocabulary.len()
        ));

        let stage_start = Instant::now();
        let witten_bell = WittenBellParameters::compute(
            &ngrams,
            &contexts,
            &vocabulary,
            self.cfg.extension_strategy,
        );
        metrics.record(Stage::Extensions, stage_start.elapsed());
        debug!(
            "witten-bell extension counts for {} contexts via {}",
            witten_bell.len(),
            self.cfg.extension_strategy
        );

        let stage_start = Instant::now();
        let addressable = total_addressable(contexts.len(), vocabulary.len())?;
        let frequency_of_frequencies = FrequencyOfFrequencies::build(&ngrams, addressable)?;
        metrics.record(Stage::FrequencyOfFrequencies, stage_start.elapsed());
        self.progress(format_args!(
            "frequency of frequencies over {} addressable n-grams, max frequency {}",
            addressable,
            frequency_of_frequencies.max_frequency()
        ));

        let stage_start = Instant::now();
        let good_turing =
            GoodTuringEstimate::estimate(&frequency_of_frequencies, self.cfg.katz_threshold)?;
        metrics.record(Stage::GoodTuring, stage_start.elapsed());

        metrics.total_duration = run_start.elapsed();
        metrics.rss_kb = sample_rss_kb();
        self.progress(format_args!(
            "analysis completed in {:.2?} (katz threshold {})",
            metrics.total_duration, self.cfg.katz_threshold
        ));

        Ok(AnalysisArtifacts {
            config: self.cfg.clone(),
            ngrams,
            contexts,
            vocabulary,
            witten_bell,
            frequency_of_frequencies,
            good_turing,
            metrics,
        })
    }

    fn progress(&self, message: fmt::Arguments<'_>) {
        if self.cfg.show_progress {
            info!("{message}");
        }
    }
}

impl AnalysisArtifacts {
    /// Size of the addressable n-gram space, `|(n-1)-gram types| × |vocabulary|`.
    #[must_use]
    pub fn total_addressable(&self) -> usize {
        self.frequency_of_frequencies.total_addressable()
    }

    /// Hands every table to `sink`, one call per table, then finishes the sink.
    pub fn persist<K: TableSink + ?Sized>(&self, sink: &mut K) -> Result<()> {
        sink.write_frequencies(TableKind::Ngrams, &self.ngrams.rows())?;
        sink.write_frequencies(TableKind::Contexts, &self.contexts.rows())?;
        sink.write_frequencies(TableKind::Vocabulary, &self.vocabulary.rows())?;
        sink.write_frequencies(TableKind::WittenBell, &self.witten_bell.rows())?;
        sink.write_good_turing(self.good_turing.rows())?;
        sink.finish(self)
    }
}

impl fmt::Display for AnalysisArtifacts {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let n = self.config.order;
        writeln!(f, "{n}-gram types: {}", self.ngrams.len())?;
        writeln!(f, "{}-gram types: {}", n - 1, self.contexts.len())?;
        writeln!(f, "Vocabulary size: {}", self.vocabulary.len())?;
        writeln!(f, "Addressable {n}-grams: {}", self.total_addressable())?;
        writeln!(
            f,
            "Max frequency: {}",
            self.frequency_of_frequencies.max_frequency()
        )?;
        writeln!(f, "Katz threshold: {}", self.good_turing.katz_threshold())?;
        writeln!(f, "Total duration: {:?}", self.metrics.total_duration)?;
        Ok(())
    }
}
