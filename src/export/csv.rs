//! Semicolon-delimited export of every result table.

use std::fs;
use std::path::{Path, PathBuf};

use ::csv::{QuoteStyle, WriterBuilder};
use log::{debug, warn};
use serde::Serialize;
use tempfile::TempDir;

use crate::error::{NgramError, Result};
use crate::export::{TableKind, TableSink, GOOD_TURING_STEM};
use crate::good_turing::GoodTuringRow;

/// Writes one headerless `;`-delimited file per table into an output directory.
///
/// Files are staged in a hidden temporary directory and moved into place by
/// [`TableSink::commit`]; dropping the sink earlier discards everything written. If a
/// move fails, the files already moved are taken back out of the output directory.
#[derive(Debug)]
pub struct CsvSink {
    output_dir: PathBuf,
    staging: TempDir,
    staged: Vec<String>,
}

impl CsvSink {
    /// Creates `output_dir` if needed and prepares a staging area inside it.
    pub fn new<P: AsRef<Path>>(output_dir: P) -> Result<Self> {
        let output_dir = output_dir.as_ref().to_path_buf();
        fs::create_dir_all(&output_dir)
            .map_err(|err| NgramError::io(err, Some(output_dir.clone())))?;
        let staging = tempfile::Builder::new()
            .prefix(".ngram-stats-")
            .tempdir_in(&output_dir)
            .map_err(|err| NgramError::io(err, Some(output_dir.clone())))?;
        Ok(Self {
            output_dir,
            staging,
            staged: Vec::new(),
        })
    }

    /// Final path of the file holding `stem`.
    #[must_use]
    pub fn table_path(&self, stem: &str) -> PathBuf {
        self.output_dir.join(format!("{stem}.csv"))
    }

    fn write_rows<I, R>(&mut self, stem: &str, rows: I) -> Result<()>
    where
        I: IntoIterator<Item = R>,
        R: Serialize,
    {
        let file_name = format!("{stem}.csv");
        let path = self.staging.path().join(&file_name);
        let mut writer = WriterBuilder::new()
            .delimiter(b';')
            .quote_style(QuoteStyle::Necessary)
            .has_headers(false)
            .from_path(&path)?;
        let mut written = 0usize;
        for row in rows {
            writer.serialize(row)?;
            written += 1;
        }
        writer
            .flush()
            .map_err(|err| NgramError::io(err, Some(path.clone())))?;
        debug!("staged {written} rows in {}", path.display());
        self.staged.push(file_name);
        Ok(())
    }

    /// Moves already placed files back into staging so a failed commit leaves no tables.
    fn unplace(&self, placed: &[String]) {
        for file_name in placed {
            let placed_path = self.output_dir.join(file_name);
            if let Err(err) = fs::rename(&placed_path, self.staging.path().join(file_name)) {
                warn!(
                    "could not withdraw {} after a failed commit: {err}",
                    placed_path.display()
                );
            }
        }
    }
}

impl TableSink for CsvSink {
    fn write_frequencies(&mut self, kind: TableKind, rows: &[(String, usize)]) -> Result<()> {
        self.write_rows(kind.file_stem(), rows.iter().map(|(key, count)| (key, count)))
    }

    fn write_good_turing(&mut self, rows: &[GoodTuringRow]) -> Result<()> {
        self.write_rows(
            GOOD_TURING_STEM,
            rows.iter().map(|row| (row.frequency, row.count, row.estimate)),
        )
    }

    fn commit(&mut self) -> Result<()> {
        for (placed, file_name) in self.staged.iter().enumerate() {
            let from = self.staging.path().join(file_name);
            let to = self.output_dir.join(file_name);
            if let Err(err) = fs::rename(&from, &to) {
                self.unplace(&self.staged[..placed]);
                return Err(NgramError::io(err, Some(to)));
            }
        }
        debug!(
            "placed {} tables in {}",
            self.staged.len(),
            self.output_dir.display()
        );
        self.staged.clear();
        Ok(())
    }
}
