//! Facilities for discovering input files and loading text corpora as paragraphs.

use std::fs;
use std::path::{Path, PathBuf};

use encoding_rs::WINDOWS_1251;
use walkdir::WalkDir;

use crate::config::IngestConfig;
use crate::error::{NgramError, Result};

const UTF8_BOM: char = '\u{feff}';

/// Discovers files rooted at the provided input paths according to the ingest configuration.
///
/// Directories are traversed recursively by default; set [`IngestConfig::recursive`] to `false`
/// to limit discovery to the first level. Files within a directory are returned in name order.
pub fn collect_paths<P: AsRef<Path>>(inputs: &[P], cfg: &IngestConfig) -> Result<Vec<PathBuf>> {
    let mut files = Vec::new();
    for input in inputs {
        let path = input.as_ref();
        if !path.exists() {
            return Err(NgramError::InvalidConfig(format!(
                "input path {path:?} does not exist"
            )));
        }
        let metadata = path
            .symlink_metadata()
            .map_err(|err| NgramError::io(err, Some(path.to_path_buf())))?;
        if metadata.is_dir() {
            let depth = if cfg.recursive { usize::MAX } else { 1 };
            let walker = WalkDir::new(path)
                .follow_links(cfg.follow_symlinks)
                .max_depth(depth)
                .sort_by_file_name();
            for entry in walker {
                let entry = entry.map_err(|err| {
                    let entry_path = err.path().map(Path::to_path_buf);
                    match err.into_io_error() {
                        Some(source) => NgramError::io(source, entry_path),
                        None => NgramError::InvalidConfig("filesystem loop detected".into()),
                    }
                })?;
                if entry.file_type().is_file() {
                    files.push(entry.into_path());
                }
            }
        } else if metadata.is_file() || (cfg.follow_symlinks && path.is_file()) {
            files.push(path.to_path_buf());
        }
    }
    if files.is_empty() {
        return Err(NgramError::InvalidConfig(
            "no files discovered in provided inputs".into(),
        ));
    }
    Ok(files)
}

/// Splits decoded text into paragraphs: one per non-blank line, with a leading BOM removed.
#[must_use]
pub fn paragraphs_from_text(text: &str) -> Vec<String> {
    text.strip_prefix(UTF8_BOM)
        .unwrap_or(text)
        .lines()
        .filter(|line| !line.trim().is_empty())
        .map(str::to_owned)
        .collect()
}

/// Decodes file contents as UTF-8, falling back to Windows-1251.
///
/// Returns `None` when neither encoding accepts the bytes.
#[must_use]
pub fn decode_text(bytes: Vec<u8>) -> Option<String> {
    match String::from_utf8(bytes) {
        Ok(text) => Some(text),
        Err(err) => {
            let bytes = err.into_bytes();
            let (text, had_errors) = WINDOWS_1251.decode_without_bom_handling(&bytes);
            (!had_errors).then(|| text.into_owned())
        }
    }
}

/// Loads text files and returns their paragraphs in file order.
///
/// Files are read as UTF-8; anything else is retried as Windows-1251.
pub fn load_paragraphs<P: AsRef<Path>>(inputs: &[P], cfg: &IngestConfig) -> Result<Vec<String>> {
    let file_paths = collect_paths(inputs, cfg)?;
    let mut paragraphs = Vec::new();
    for file_path in file_paths {
        let bytes =
            fs::read(&file_path).map_err(|err| NgramError::io(err, Some(file_path.clone())))?;
        let text = decode_text(bytes).ok_or_else(|| {
            NgramError::io(
                std::io::Error::new(
                    std::io::ErrorKind::InvalidData,
                    "file is neither UTF-8 nor Windows-1251",
                ),
                Some(file_path.clone()),
            )
        })?;
        paragraphs.extend(paragraphs_from_text(&text));
    }
    if paragraphs.is_empty() {
        return Err(NgramError::Data(
            "no text could be loaded from inputs".into(),
        ));
    }
    Ok(paragraphs)
}
