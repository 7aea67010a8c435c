//! Flat-file storage: one file per record kind, one line per record.
//!
//! Each load treats the file as the full source of truth; each save
//! rewrites it in full. Lines that fail to decode are skipped and reported,
//! never fatal.

use crate::codec::{LineRecord, RecordKind};
use std::fs::{self, File};
use std::io::{self, BufRead, BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};

pub const DEFAULT_DATA_DIR: &str = "data";
pub const DEFAULT_ITEMS_FILE: &str = "books.txt";
pub const DEFAULT_BORROWERS_FILE: &str = "members.txt";

/// Errors at the file boundary.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("storage unavailable: {path}: {message}")]
    Unavailable { path: String, message: String },
}

impl StoreError {
    fn unavailable(path: &Path, err: impl ToString) -> Self {
        Self::Unavailable {
            path: path.display().to_string(),
            message: err.to_string(),
        }
    }
}

/// A line that was dropped while loading.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SkippedLine {
    /// 1-based line number.
    pub line_no: usize,
    pub reason: String,
}

/// Result of reading one record kind.
#[derive(Debug, Clone)]
pub struct LoadOutcome<R> {
    pub path: PathBuf,
    /// Whether the backing file existed. A missing file loads as empty.
    pub existed: bool,
    pub records: Vec<R>,
    pub skipped: Vec<SkippedLine>,
}

/// Result of writing one record kind.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SaveOutcome {
    pub path: PathBuf,
    pub count: usize,
}

/// Read records from a line reader.
///
/// Blank lines are ignored. Lines that do not decode (including lines that
/// are not valid UTF-8) are collected in the skipped list.
pub fn read_records<R: LineRecord>(
    reader: impl BufRead,
) -> io::Result<(Vec<R>, Vec<SkippedLine>)> {
    let mut records = Vec::new();
    let mut skipped = Vec::new();
    for (index, raw) in reader.split(b'\n').enumerate() {
        let raw = raw?;
        let line_no = index + 1;
        let raw = raw.strip_suffix(b"\r").unwrap_or(&raw);
        let line = match std::str::from_utf8(raw) {
            Ok(line) => line,
            Err(e) => {
                skipped.push(SkippedLine {
                    line_no,
                    reason: format!("invalid UTF-8: {e}"),
                });
                continue;
            }
        };
        if line.trim().is_empty() {
            continue;
        }
        match R::decode(line) {
            Ok(record) => records.push(record),
            Err(e) => skipped.push(SkippedLine {
                line_no,
                reason: e.to_string(),
            }),
        }
    }
    Ok((records, skipped))
}

/// Write records to a writer, one encoded line each, in the given order.
pub fn write_records<R: LineRecord>(writer: &mut impl Write, records: &[R]) -> io::Result<()> {
    for record in records {
        writeln!(writer, "{}", record.encode())?;
    }
    Ok(())
}

/// File-backed persistence for items and borrowers under one directory.
#[derive(Debug, Clone)]
pub struct FlatFileStore {
    root: PathBuf,
    items_file: String,
    borrowers_file: String,
}

impl Default for FlatFileStore {
    fn default() -> Self {
        Self::new(DEFAULT_DATA_DIR)
    }
}

impl FlatFileStore {
    /// A store rooted at `root` using the default file names.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            items_file: DEFAULT_ITEMS_FILE.to_string(),
            borrowers_file: DEFAULT_BORROWERS_FILE.to_string(),
        }
    }

    /// Override the file name used for one record kind.
    pub fn with_file_name(mut self, kind: RecordKind, name: impl Into<String>) -> Self {
        match kind {
            RecordKind::Item => self.items_file = name.into(),
            RecordKind::Borrower => self.borrowers_file = name.into(),
        }
        self
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn path_for(&self, kind: RecordKind) -> PathBuf {
        match kind {
            RecordKind::Item => self.root.join(&self.items_file),
            RecordKind::Borrower => self.root.join(&self.borrowers_file),
        }
    }

    /// Create the storage directory if it does not exist yet.
    pub fn ensure_dir(&self) -> Result<(), StoreError> {
        if self.root.as_os_str().is_empty() || self.root.is_dir() {
            return Ok(());
        }
        fs::create_dir_all(&self.root).map_err(|e| StoreError::unavailable(&self.root, e))?;
        tracing::debug!(path = %self.root.display(), "created data directory");
        Ok(())
    }

    /// Load every decodable record of kind `R`.
    pub fn load<R: LineRecord>(&self) -> Result<LoadOutcome<R>, StoreError> {
        let path = self.path_for(R::KIND);
        let file = match File::open(&path) {
            Ok(file) => file,
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                tracing::debug!(
                    kind = %R::KIND,
                    path = %path.display(),
                    "no data file, starting empty"
                );
                return Ok(LoadOutcome {
                    path,
                    existed: false,
                    records: Vec::new(),
                    skipped: Vec::new(),
                });
            }
            Err(e) => return Err(StoreError::unavailable(&path, e)),
        };

        let (records, skipped) = read_records::<R>(BufReader::new(file))
            .map_err(|e| StoreError::unavailable(&path, e))?;
        for line in &skipped {
            tracing::warn!(
                kind = %R::KIND,
                path = %path.display(),
                line = line.line_no,
                reason = %line.reason,
                "skipping malformed line"
            );
        }
        tracing::debug!(
            kind = %R::KIND,
            path = %path.display(),
            loaded = records.len(),
            skipped = skipped.len(),
            "loaded records"
        );
        Ok(LoadOutcome {
            path,
            existed: true,
            records,
            skipped,
        })
    }

    /// Replace the file for kind `R` with exactly `records`, in order.
    ///
    /// Not atomic: a crash mid-write can leave a truncated file.
    pub fn save<R: LineRecord>(&self, records: &[R]) -> Result<SaveOutcome, StoreError> {
        self.ensure_dir()?;
        let path = self.path_for(R::KIND);
        let file = File::create(&path).map_err(|e| StoreError::unavailable(&path, e))?;
        let mut writer = BufWriter::new(file);
        write_records(&mut writer, records).map_err(|e| StoreError::unavailable(&path, e))?;
        writer
            .flush()
            .map_err(|e| StoreError::unavailable(&path, e))?;
        tracing::debug!(
            kind = %R::KIND,
            path = %path.display(),
            saved = records.len(),
            "saved records"
        );
        Ok(SaveOutcome {
            path,
            count: records.len(),
        })
    }
}
