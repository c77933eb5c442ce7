//! Metrics describing a corpus analysis run.

use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Pipeline stage timed by [`AnalysisMetrics`].
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum Stage {
    /// Sentence segmentation and word tokenization.
    Tokenization,
    /// N-gram, (n-1)-gram and vocabulary frequency tables.
    Counting,
    /// Witten-Bell extension counts.
    Extensions,
    /// Frequency-of-frequencies distribution.
    FrequencyOfFrequencies,
    /// Good-Turing re-estimation.
    GoodTuring,
}

/// Wall-clock time spent in one stage.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct StageTiming {
    /// Stage that was measured.
    pub stage: Stage,
    /// Time spent in the stage.
    pub elapsed: Duration,
}

/// Aggregate metrics produced by an analysis run.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct AnalysisMetrics {
    /// Paragraphs handed to the analyzer.
    pub paragraphs: usize,
    /// Sentences produced by the segmenter.
    pub sentences: usize,
    /// Word tokens across all sentences.
    pub tokens: usize,
    /// N-gram occurrences generated (equals the sum of the n-gram table).
    pub ngram_occurrences: usize,
    /// (n-1)-gram occurrences generated.
    pub context_occurrences: usize,
    /// Per-stage timings in pipeline order.
    pub stages: Vec<StageTiming>,
    /// Total duration of the run.
    pub total_duration: Duration,
    /// Resident set size sample captured from `/proc/self/status` on Linux.
    pub rss_kb: Option<usize>,
}

impl AnalysisMetrics {
    /// Records the time spent in `stage`.
    pub fn record(&mut self, stage: Stage, elapsed: Duration) {
        self.stages.push(StageTiming { stage, elapsed });
    }

    /// Time recorded for `stage`, if it ran.
    #[must_use]
    pub fn stage_duration(&self, stage: Stage) -> Option<Duration> {
        self.stages
            .iter()
            .find(|timing| timing.stage == stage)
            .map(|timing| timing.elapsed)
    }
}

#[cfg(target_os = "linux")]
fn current_rss_kb() -> Option<usize> {
    use std::fs::File;
    use std::io::{BufRead, BufReader};

    let file = File::open("/proc/self/status").ok()?;
    for line in BufReader::new(file).lines().map_while(Result::ok) {
        if let Some(rest) = line.strip_prefix("VmRSS:") {
            return rest
                .split_whitespace()
                .find_map(|part| part.parse::<usize>().ok());
        }
    }
    None
}

#[cfg(not(target_os = "linux"))]
fn current_rss_kb() -> Option<usize> {
    None
}

/// Samples the current resident set size (RSS) on supported platforms.
pub fn sample_rss_kb() -> Option<usize> {
    current_rss_kb()
}
