//! Append-only persistence for the health log.
//!
//! The log is a UTF-8 CSV file with a byte-order mark. Every append reads the
//! whole table, adds one row and rewrites the file through a temp file that is
//! renamed over the original, so a failed append leaves the previous file in
//! place. There is no protection against two writers racing the
//! read-modify-write cycle; the last rename wins.

use crate::{schema, Error, HealthLog, HealthRecord, Result};
use fs2::FileExt;
use std::fs::File;
use std::io::{BufWriter, Read, Write};
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;

/// File name of the log inside the data directory
pub const LOG_FILE_NAME: &str = "health_log.csv";

const UTF8_BOM: &[u8] = b"\xEF\xBB\xBF";

/// Storage backend for the health log
pub trait LogStore {
    /// Read the full log, normalized to the canonical columns
    fn load(&self) -> Result<HealthLog>;

    /// Add one record as the last row and persist
    fn append(&mut self, record: &HealthRecord) -> Result<()>;
}

/// CSV-file log store
pub struct CsvLogStore {
    path: PathBuf,
}

impl CsvLogStore {
    /// Create a store backed by the given file
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Create a store for the standard log file inside `data_dir`
    pub fn in_dir(data_dir: &Path) -> Self {
        Self::new(data_dir.join(LOG_FILE_NAME))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Write the current (normalized) log to `dest` in the persisted format.
    ///
    /// Returns the number of rows written.
    pub fn export_to(&self, dest: &Path) -> Result<usize> {
        let log = self.load()?;
        write_atomic(dest, &log)?;
        tracing::info!("Exported {} records to {:?}", log.len(), dest);
        Ok(log.len())
    }
}

impl LogStore for CsvLogStore {
    fn load(&self) -> Result<HealthLog> {
        if !self.path.exists() {
            tracing::debug!("No log file at {:?}, starting empty", self.path);
            return Ok(HealthLog::default());
        }

        let file = File::open(&self.path)?;
        // Acquire shared lock for reading
        file.lock_shared()?;

        let mut contents = Vec::new();
        let read = std::io::BufReader::new(&file).read_to_end(&mut contents);
        file.unlock()?;
        read?;

        let log = parse_log(&contents)?;
        tracing::debug!("Loaded {} records from {:?}", log.len(), self.path);
        Ok(log)
    }

    fn append(&mut self, record: &HealthRecord) -> Result<()> {
        let mut log = self.load()?;
        log.push(record.clone());
        write_atomic(&self.path, &log)?;

        tracing::info!(
            "Appended record for {} to {:?} ({} rows)",
            record.timestamp,
            self.path,
            log.len()
        );
        Ok(())
    }
}

/// Parse the persisted table (with or without a BOM) into a log.
///
/// Missing optional columns are backfilled; anything unparseable is an error,
/// including a file with no header row. An absent file is the only way to
/// start from an empty log.
pub fn parse_log(bytes: &[u8]) -> Result<HealthLog> {
    let bytes = bytes.strip_prefix(UTF8_BOM).unwrap_or(bytes);
    if bytes.iter().all(u8::is_ascii_whitespace) {
        return Err(Error::Schema(
            "log file is empty; expected a header row".to_string(),
        ));
    }

    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .from_reader(bytes);

    let source_headers = reader.headers()?.clone();
    let rows = reader
        .records()
        .collect::<std::result::Result<Vec<_>, csv::Error>>()?;

    let header = schema::header();
    let records = schema::normalize(&source_headers, &rows)?
        .iter()
        .map(|row| row.deserialize::<HealthRecord>(Some(&header)))
        .collect::<std::result::Result<Vec<_>, csv::Error>>()?;

    Ok(HealthLog::new(records))
}

/// Write the log in the persisted format: BOM, canonical header, one row per
/// record.
pub fn write_log<W: Write>(mut out: W, log: &HealthLog) -> Result<()> {
    out.write_all(UTF8_BOM)?;

    let mut writer = csv::WriterBuilder::new()
        .has_headers(false)
        .from_writer(out);
    // Header goes out explicitly so an empty log still gets one
    writer.write_record(&schema::header())?;
    for record in log.records() {
        writer.serialize(record)?;
    }
    writer.flush()?;
    Ok(())
}

/// Atomically replace `path` with the serialized log
fn write_atomic(path: &Path, log: &HealthLog) -> Result<()> {
    let parent = match path.parent() {
        Some(p) if !p.as_os_str().is_empty() => p,
        _ => Path::new("."),
    };
    std::fs::create_dir_all(parent)?;

    // Temp file in the same directory so the rename stays on one filesystem
    let temp = NamedTempFile::new_in(parent)?;
    temp.as_file().lock_exclusive()?;

    write_log(BufWriter::new(temp.as_file()), log)?;

    temp.as_file().sync_all()?;
    temp.as_file().unlock()?;

    temp.persist(path).map_err(|e| Error::Io(e.error))?;

    tracing::debug!("Wrote {} records to {:?}", log.len(), path);
    Ok(())
}
