// src/storage/sheet.rs

//! Single-row spreadsheet export.
//!
//! `create_sheet("run", &["run", "to move fast"])` writes `run.xlsx` whose
//! first row holds the fields in columns A, B, ...

use std::collections::HashSet;
use std::ffi::OsString;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use rust_xlsxwriter::Workbook;

use crate::error::{AppError, Result};
use crate::models::CrawlResult;
use crate::utils::file_stem;

use super::ResultSink;

/// Write `fields` into the first row of `<name>.xlsx`, logging any failure.
pub fn create_sheet<S: AsRef<str>>(name: impl AsRef<Path>, fields: &[S]) {
    if let Err(e) = write_sheet(name, fields) {
        log::error!("{}", e);
    }
}

/// Write `fields` into the first row of `<name>.xlsx` and return its path.
///
/// The workbook is saved to a temporary file first and renamed into place.
pub fn write_sheet<S: AsRef<str>>(name: impl AsRef<Path>, fields: &[S]) -> Result<PathBuf> {
    let path = with_suffix(name.as_ref(), ".xlsx");
    let display = path.display().to_string();

    let mut workbook = Workbook::new();
    let sheet = workbook.add_worksheet();
    for (col, field) in fields.iter().enumerate() {
        let col = u16::try_from(col).map_err(|_| AppError::export(&display, "too many fields"))?;
        sheet
            .write_string(0, col, field.as_ref())
            .map_err(|e| AppError::export(&display, e))?;
    }

    let tmp = with_suffix(&path, ".tmp");
    workbook
        .save(&tmp)
        .map_err(|e| AppError::export(&display, e))?;
    std::fs::rename(&tmp, &path)?;

    Ok(path)
}

fn with_suffix(path: &Path, suffix: &str) -> PathBuf {
    let mut name = OsString::from(path.as_os_str());
    name.push(suffix);
    PathBuf::from(name)
}

/// Exports each successful entry as its own sheet in a directory.
///
/// Entries whose words share a file stem (homographs, or words differing
/// only in punctuation) get numbered names: `bank.xlsx`, `bank-2.xlsx`, ...
pub struct SheetSink {
    dir: PathBuf,
    names: HashSet<String>,
    written: usize,
}

impl SheetSink {
    /// Create the sink, making `dir` if needed.
    pub fn new(dir: impl Into<PathBuf>) -> Result<Self> {
        let dir = dir.into();
        std::fs::create_dir_all(&dir)?;
        Ok(Self {
            dir,
            names: HashSet::new(),
            written: 0,
        })
    }

    pub fn written(&self) -> usize {
        self.written
    }

    /// First name for `word` not yet used by this sink.
    fn claim_name(&mut self, word: &str) -> String {
        let stem = file_stem(word);
        let mut name = stem.clone();
        let mut n = 1;
        while !self.names.insert(name.to_lowercase()) {
            n += 1;
            name = format!("{stem}-{n}");
        }
        name
    }
}

#[async_trait]
impl ResultSink for SheetSink {
    async fn write(&mut self, result: &CrawlResult) -> Result<()> {
        let Some(entry) = result.entry() else {
            log::debug!("Nothing to export for {}", result.url);
            return Ok(());
        };

        let file_name = self.claim_name(&entry.word);
        let name = self.dir.join(file_name);
        let fields = [
            entry.word.clone(),
            entry.definition.clone(),
            entry.level.to_string(),
            entry.example_usage.clone(),
        ];

        tokio::task::spawn_blocking(move || write_sheet(name, &fields))
            .await
            .map_err(|e| AppError::export(&entry.word, e))??;
        self.written += 1;
        Ok(())
    }

    async fn finish(&mut self) -> Result<()> {
        log::info!(
            "Exported {} sheets to {}",
            self.written,
            self.dir.display()
        );
        Ok(())
    }
}
