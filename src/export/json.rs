//! JSON report bundling every table with the configuration and run metrics.

use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tempfile::NamedTempFile;

use crate::analyzer::AnalysisArtifacts;
use crate::config::AnalyzerConfig;
use crate::error::{NgramError, Result};
use crate::export::{TableKind, TableSink};
use crate::good_turing::GoodTuringRow;
use crate::metrics::AnalysisMetrics;

/// Serialisable snapshot of a finished analysis.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisReport {
    /// Configuration the run used.
    pub config: AnalyzerConfig,
    /// `|(n-1)-gram types| × |vocabulary|`.
    pub total_addressable: usize,
    /// N-gram frequency rows.
    pub ngrams: Vec<(String, usize)>,
    /// (n-1)-gram frequency rows.
    pub contexts: Vec<(String, usize)>,
    /// Vocabulary frequency rows in first-occurrence order.
    pub vocabulary: Vec<(String, usize)>,
    /// Witten-Bell extension count rows.
    pub witten_bell: Vec<(String, usize)>,
    /// `N_c` indexed by `c`, including the synthesized `N_0`.
    pub frequency_of_frequencies: Vec<usize>,
    /// Good-Turing rows.
    pub good_turing: Vec<GoodTuringRow>,
    /// Sizes and timings of the run.
    pub metrics: AnalysisMetrics,
}

impl AnalysisReport {
    /// Builds a report directly from finished artifacts.
    #[must_use]
    pub fn from_artifacts(artifacts: &AnalysisArtifacts) -> Self {
        Self {
            config: artifacts.config.clone(),
            total_addressable: artifacts.total_addressable(),
            ngrams: artifacts.ngrams.rows(),
            contexts: artifacts.contexts.rows(),
            vocabulary: artifacts.vocabulary.rows(),
            witten_bell: artifacts.witten_bell.rows(),
            frequency_of_frequencies: artifacts.frequency_of_frequencies.as_slice().to_vec(),
            good_turing: artifacts.good_turing.rows().to_vec(),
            metrics: artifacts.metrics.clone(),
        }
    }

    /// Serialises the report to a JSON string.
    pub fn to_json(&self, pretty: bool) -> Result<String> {
        let json = if pretty {
            serde_json::to_string_pretty(self)?
        } else {
            serde_json::to_string(self)?
        };
        Ok(json)
    }

    /// Reads a report previously written by [`JsonSink`].
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let raw = fs::read_to_string(path)
            .map_err(|err| NgramError::io(err, Some(path.to_path_buf())))?;
        Ok(serde_json::from_str(&raw)?)
    }
}

#[derive(Debug, Default)]
struct CollectedTables {
    ngrams: Option<Vec<(String, usize)>>,
    contexts: Option<Vec<(String, usize)>>,
    vocabulary: Option<Vec<(String, usize)>>,
    witten_bell: Option<Vec<(String, usize)>>,
    good_turing: Option<Vec<GoodTuringRow>>,
}

/// Collects the tables it receives and writes a single [`AnalysisReport`].
///
/// [`TableSink::prepare`] writes the report to a temporary sibling of the target and
/// [`TableSink::commit`] renames it into place, so readers never observe a half-written
/// report.
#[derive(Debug)]
pub struct JsonSink {
    path: PathBuf,
    pretty: bool,
    tables: CollectedTables,
    staged: Option<NamedTempFile>,
}

impl JsonSink {
    /// Creates a sink targeting `path`.
    pub fn new<P: AsRef<Path>>(path: P, pretty: bool) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
            pretty,
            tables: CollectedTables::default(),
            staged: None,
        }
    }

    /// Destination of the report.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn take_table(
        slot: &mut Option<Vec<(String, usize)>>,
        kind: TableKind,
    ) -> Result<Vec<(String, usize)>> {
        slot.take()
            .ok_or_else(|| NgramError::Data(format!("{kind} were never written to the report")))
    }
}

impl TableSink for JsonSink {
    fn write_frequencies(&mut self, kind: TableKind, rows: &[(String, usize)]) -> Result<()> {
        let slot = match kind {
            TableKind::Ngrams => &mut self.tables.ngrams,
            TableKind::Contexts => &mut self.tables.contexts,
            TableKind::Vocabulary => &mut self.tables.vocabulary,
            TableKind::WittenBell => &mut self.tables.witten_bell,
        };
        *slot = Some(rows.to_vec());
        Ok(())
    }

    fn write_good_turing(&mut self, rows: &[GoodTuringRow]) -> Result<()> {
        self.tables.good_turing = Some(rows.to_vec());
        Ok(())
    }

    fn prepare(&mut self, artifacts: &AnalysisArtifacts) -> Result<()> {
        let mut tables = std::mem::take(&mut self.tables);
        let good_turing = tables.good_turing.take().ok_or_else(|| {
            NgramError::Data("good-turing table was never written to the report".into())
        })?;
        let report = AnalysisReport {
            config: artifacts.config.clone(),
            total_addressable: artifacts.total_addressable(),
            ngrams: Self::take_table(&mut tables.ngrams, TableKind::Ngrams)?,
            contexts: Self::take_table(&mut tables.contexts, TableKind::Contexts)?,
            vocabulary: Self::take_table(&mut tables.vocabulary, TableKind::Vocabulary)?,
            witten_bell: Self::take_table(&mut tables.witten_bell, TableKind::WittenBell)?,
            frequency_of_frequencies: artifacts.frequency_of_frequencies.as_slice().to_vec(),
            good_turing,
            metrics: artifacts.metrics.clone(),
        };
        let json = report.to_json(self.pretty)?;

        let parent = match self.path.parent() {
            Some(dir) if !dir.as_os_str().is_empty() => dir.to_path_buf(),
            _ => PathBuf::from("."),
        };
        fs::create_dir_all(&parent).map_err(|err| NgramError::io(err, Some(parent.clone())))?;
        let mut staged = NamedTempFile::new_in(&parent)
            .map_err(|err| NgramError::io(err, Some(parent.clone())))?;
        staged
            .write_all(json.as_bytes())
            .map_err(|err| NgramError::io(err, Some(staged.path().to_path_buf())))?;
        self.staged = Some(staged);
        Ok(())
    }

    fn commit(&mut self) -> Result<()> {
        let staged = self.staged.take().ok_or_else(|| {
            NgramError::Data("report must be prepared before it is committed".into())
        })?;
        staged
            .persist(&self.path)
            .map_err(|err| NgramError::io(err.error, Some(self.path.clone())))?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analyzer::Analyzer;
    use tempfile::tempdir;

    fn artefacts() -> AnalysisArtifacts {
        let cfg = AnalyzerConfig::builder()
            .katz_threshold(3)
            .show_progress(false)
            .build()
            .unwrap();
        Analyzer::new(cfg)
            .analyze(&["the cat sat. the dog sat. the cat ran."])
            .unwrap()
    }

    #[test]
    fn report_round_trips_through_disk() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("reports").join("analysis.json");
        let artefacts = artefacts();
        let mut sink = JsonSink::new(&path, true);
        artefacts.persist(&mut sink).unwrap();

        let loaded = AnalysisReport::load(&path).unwrap();
        assert_eq!(loaded, AnalysisReport::from_artifacts(&artefacts));
        assert_eq!(loaded.config.katz_threshold, 3);
        assert_eq!(loaded.vocabulary[0], ("the".to_string(), 3));
        assert_eq!(loaded.frequency_of_frequencies, vec![19, 4, 1]);
    }

    #[test]
    fn prepared_report_is_invisible_until_commit() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("analysis.json");
        let artefacts = artefacts();
        let mut sink = JsonSink::new(&path, false);
        for kind in TableKind::ALL {
            let rows = match kind {
                TableKind::Ngrams => artefacts.ngrams.rows(),
                TableKind::Contexts => artefacts.contexts.rows(),
                TableKind::Vocabulary => artefacts.vocabulary.rows(),
                TableKind::WittenBell => artefacts.witten_bell.rows(),
            };
            sink.write_frequencies(kind, &rows).unwrap();
        }
        sink.write_good_turing(artefacts.good_turing.rows()).unwrap();
        sink.prepare(&artefacts).unwrap();
        assert!(!path.exists());
        sink.commit().unwrap();
        assert!(path.exists());
        assert!(matches!(sink.commit(), Err(NgramError::Data(_))));
    }

    #[test]
    fn finishing_without_tables_is_an_error() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("analysis.json");
        let mut sink = JsonSink::new(&path, false);
        let err = sink.finish(&artefacts()).unwrap_err();
        assert!(matches!(err, NgramError::Data(_)));
        assert!(!path.exists());
    }
}
