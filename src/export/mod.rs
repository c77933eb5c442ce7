//! Persistence sinks receiving the finished result tables.

pub mod csv;
pub mod json;

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::analyzer::AnalysisArtifacts;
use crate::error::Result;
use crate::good_turing::GoodTuringRow;

pub use self::csv::CsvSink;
pub use self::json::{AnalysisReport, JsonSink};

/// Result tables with `(key, count)` rows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TableKind {
    /// N-gram frequencies.
    Ngrams,
    /// (n-1)-gram frequencies.
    Contexts,
    /// Vocabulary word frequencies.
    Vocabulary,
    /// Witten-Bell extension counts per (n-1)-gram.
    WittenBell,
}

impl TableKind {
    /// Every table kind in persistence order.
    pub const ALL: [TableKind; 4] = [
        TableKind::Ngrams,
        TableKind::Contexts,
        TableKind::Vocabulary,
        TableKind::WittenBell,
    ];

    /// Base file name used by file-backed sinks.
    #[must_use]
    pub fn file_stem(self) -> &'static str {
        match self {
            TableKind::Ngrams => "ngrams",
            TableKind::Contexts => "n_minus1_grams",
            TableKind::Vocabulary => "vocabulary",
            TableKind::WittenBell => "witten-bell",
        }
    }
}

impl fmt::Display for TableKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            TableKind::Ngrams => "n-gram frequencies",
            TableKind::Contexts => "(n-1)-gram frequencies",
            TableKind::Vocabulary => "vocabulary frequencies",
            TableKind::WittenBell => "witten-bell extension counts",
        };
        f.write_str(label)
    }
}

/// Base file name of the Good-Turing table.
pub const GOOD_TURING_STEM: &str = "good-turing";

/// Receives each result table once, after the whole analysis succeeded.
///
/// Output becomes visible in two phases: [`TableSink::prepare`] stages it and
/// [`TableSink::commit`] publishes it. Sinks that cannot fail while publishing may do all
/// their work in `prepare`.
pub trait TableSink {
    /// Stores a `(key, count)` table.
    fn write_frequencies(&mut self, kind: TableKind, rows: &[(String, usize)]) -> Result<()>;

    /// Stores the Good-Turing `(c, N_c, c*)` table.
    fn write_good_turing(&mut self, rows: &[GoodTuringRow]) -> Result<()>;

    /// Stages everything written so far without making it visible.
    fn prepare(&mut self, _artifacts: &AnalysisArtifacts) -> Result<()> {
        Ok(())
    }

    /// Publishes the staged output.
    fn commit(&mut self) -> Result<()> {
        Ok(())
    }

    /// Prepares and commits in one step.
    fn finish(&mut self, artifacts: &AnalysisArtifacts) -> Result<()> {
        self.prepare(artifacts)?;
        self.commit()
    }
}

impl<T: TableSink + ?Sized> TableSink for Box<T> {
    fn write_frequencies(&mut self, kind: TableKind, rows: &[(String, usize)]) -> Result<()> {
        (**self).write_frequencies(kind, rows)
    }

    fn write_good_turing(&mut self, rows: &[GoodTuringRow]) -> Result<()> {
        (**self).write_good_turing(rows)
    }

    fn prepare(&mut self, artifacts: &AnalysisArtifacts) -> Result<()> {
        (**self).prepare(artifacts)
    }

    fn commit(&mut self) -> Result<()> {
        (**self).commit()
    }

    fn finish(&mut self, artifacts: &AnalysisArtifacts) -> Result<()> {
        (**self).finish(artifacts)
    }
}

/// Fans every table out to several sinks.
///
/// All sinks are prepared before any is committed, and sinks commit in the order they
/// were added. A failure while preparing publishes nothing.
#[derive(Default)]
pub struct MultiSink {
    sinks: Vec<Box<dyn TableSink>>,
}

impl MultiSink {
    /// Creates an empty fan-out.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds `sink`; it commits after every sink added before it.
    pub fn push<K: TableSink + 'static>(&mut self, sink: K) {
        self.sinks.push(Box::new(sink));
    }

    /// Number of sinks.
    #[must_use]
    pub fn len(&self) -> usize {
        self.sinks.len()
    }

    /// Returns `true` when no sink was added.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.sinks.is_empty()
    }
}

impl fmt::Debug for MultiSink {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MultiSink")
            .field("sinks", &self.sinks.len())
            .finish()
    }
}

impl TableSink for MultiSink {
    fn write_frequencies(&mut self, kind: TableKind, rows: &[(String, usize)]) -> Result<()> {
        self.sinks
            .iter_mut()
            .try_for_each(|sink| sink.write_frequencies(kind, rows))
    }

    fn write_good_turing(&mut self, rows: &[GoodTuringRow]) -> Result<()> {
        self.sinks
            .iter_mut()
            .try_for_each(|sink| sink.write_good_turing(rows))
    }

    fn prepare(&mut self, artifacts: &AnalysisArtifacts) -> Result<()> {
        self.sinks
            .iter_mut()
            .try_for_each(|sink| sink.prepare(artifacts))
    }

    fn commit(&mut self) -> Result<()> {
        self.sinks.iter_mut().try_for_each(|sink| sink.commit())
    }
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;
    use std::rc::Rc;

    use super::*;
    use crate::analyzer::Analyzer;
    use crate::config::AnalyzerConfig;
    use crate::error::NgramError;

    #[derive(Clone, Default)]
    struct Journal(Rc<RefCell<Vec<String>>>);

    impl Journal {
        fn log(&self, entry: String) {
            self.0.borrow_mut().push(entry);
        }

        fn entries(&self) -> Vec<String> {
            self.0.borrow().clone()
        }
    }

    struct ScriptedSink {
        name: &'static str,
        fail_prepare: bool,
        journal: Journal,
    }

    impl TableSink for ScriptedSink {
        fn write_frequencies(&mut self, kind: TableKind, _rows: &[(String, usize)]) -> Result<()> {
            self.journal.log(format!("{} write {}", self.name, kind.file_stem()));
            Ok(())
        }

        fn write_good_turing(&mut self, _rows: &[GoodTuringRow]) -> Result<()> {
            self.journal.log(format!("{} write {GOOD_TURING_STEM}", self.name));
            Ok(())
        }

        fn prepare(&mut self, _artifacts: &AnalysisArtifacts) -> Result<()> {
            self.journal.log(format!("{} prepare", self.name));
            if self.fail_prepare {
                return Err(NgramError::Data(format!("{} cannot stage", self.name)));
            }
            Ok(())
        }

        fn commit(&mut self) -> Result<()> {
            self.journal.log(format!("{} commit", self.name));
            Ok(())
        }
    }

    fn artefacts() -> AnalysisArtifacts {
        let cfg = AnalyzerConfig::builder()
            .show_progress(false)
            .build()
            .unwrap();
        Analyzer::new(cfg)
            .analyze(&["the cat sat. the dog sat."])
            .unwrap()
    }

    fn sink(name: &'static str, fail_prepare: bool, journal: &Journal) -> ScriptedSink {
        ScriptedSink {
            name,
            fail_prepare,
            journal: journal.clone(),
        }
    }

    #[test]
    fn every_sink_is_prepared_before_any_commit() {
        let journal = Journal::default();
        let mut sinks = MultiSink::new();
        sinks.push(sink("json", false, &journal));
        sinks.push(sink("csv", false, &journal));
        artefacts().persist(&mut sinks).unwrap();

        let entries = journal.entries();
        let tail: Vec<&str> = entries[entries.len() - 4..]
            .iter()
            .map(String::as_str)
            .collect();
        assert_eq!(
            tail,
            vec!["json prepare", "csv prepare", "json commit", "csv commit"]
        );
        assert_eq!(entries.iter().filter(|e| e.starts_with("csv write")).count(), 5);
    }

    #[test]
    fn failed_prepare_commits_nothing() {
        let journal = Journal::default();
        let mut sinks = MultiSink::new();
        sinks.push(sink("json", true, &journal));
        sinks.push(sink("csv", false, &journal));
        let err = artefacts().persist(&mut sinks).unwrap_err();

        assert!(matches!(err, NgramError::Data(_)));
        assert!(!journal.entries().iter().any(|e| e.ends_with("commit")));
        assert!(!journal.entries().contains(&"csv prepare".to_string()));
    }
}
