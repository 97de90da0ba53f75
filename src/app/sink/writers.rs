//! Output writers for the result sink
//!
//! Two append-only outputs, each behind its own lock: the audit log gets one
//! line per result, the CSV gets one row per valid result. A lock is held for
//! exactly one append plus flush, and the two locks are never nested.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use std::sync::{Mutex, MutexGuard};

use chrono::{DateTime, Local};
use tracing::debug;

use crate::app::models::ProbeResult;
use crate::constants::output;
use crate::errors::{OutputError, OutputResult};

/// Current local time in log format
pub fn timestamp() -> String {
    format_timestamp(&Local::now())
}

/// Format a time in log format (`YYYY-MM-DD HH:MM:SS`)
pub fn format_timestamp(time: &DateTime<Local>) -> String {
    time.format(output::TIMESTAMP_FORMAT).to_string()
}

/// Full log line for a result
pub fn format_log_line(result: &ProbeResult, timestamp: &str) -> String {
    format!("{} - {}", timestamp, result.log_message())
}

fn lock<'a, T>(mutex: &'a Mutex<T>, resource: &'static str) -> OutputResult<MutexGuard<'a, T>> {
    mutex
        .lock()
        .map_err(|_| OutputError::LockPoisoned { resource })
}

fn create_file(path: &Path) -> OutputResult<File> {
    File::create(path).map_err(|source| OutputError::Create {
        path: path.to_path_buf(),
        source,
    })
}

/// Append-only audit log
#[derive(Debug)]
pub struct ResultLog {
    path: PathBuf,
    file: Mutex<BufWriter<File>>,
    sync_each_line: bool,
}

impl ResultLog {
    /// Create (truncate) the log file
    ///
    /// # Errors
    ///
    /// Returns `OutputError::Create` if the file cannot be created
    pub fn create(path: impl AsRef<Path>, sync_each_line: bool) -> OutputResult<Self> {
        let path = path.as_ref().to_path_buf();
        let file = create_file(&path)?;
        debug!("Opened log file {}", path.display());
        Ok(Self {
            path,
            file: Mutex::new(BufWriter::new(file)),
            sync_each_line,
        })
    }

    /// Path of the log file
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Append a raw line
    pub fn write_line(&self, line: &str) -> OutputResult<()> {
        let mut file = lock(&self.file, "log")?;
        writeln!(file, "{}", line)?;
        file.flush()?;
        if self.sync_each_line {
            file.get_ref().sync_data()?;
        }
        Ok(())
    }

    /// Append the timestamped line for a result
    pub fn append(&self, result: &ProbeResult) -> OutputResult<()> {
        self.write_line(&format_log_line(result, &timestamp()))
    }

    /// Flush and sync to disk
    pub fn finish(&self) -> OutputResult<()> {
        let mut file = lock(&self.file, "log")?;
        file.flush()?;
        file.get_ref().sync_all()?;
        Ok(())
    }
}

/// Append-only CSV of valid results
#[derive(Debug)]
pub struct RecordWriter {
    path: PathBuf,
    writer: Mutex<csv::Writer<File>>,
}

impl RecordWriter {
    /// Create (truncate) the CSV file and write the header row
    ///
    /// # Errors
    ///
    /// Returns `OutputError` if the file cannot be created or the header
    /// cannot be written
    pub fn create(path: impl AsRef<Path>) -> OutputResult<Self> {
        let path = path.as_ref().to_path_buf();
        let file = create_file(&path)?;
        let mut writer = csv::Writer::from_writer(file);
        writer.write_record(output::CSV_HEADER)?;
        writer.flush()?;
        debug!("Opened results file {}", path.display());
        Ok(Self {
            path,
            writer: Mutex::new(writer),
        })
    }

    /// Path of the CSV file
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Append a row for `result` and flush
    pub fn append(&self, result: &ProbeResult) -> OutputResult<()> {
        let mut writer = lock(&self.writer, "records")?;
        writer.write_record(result.csv_record())?;
        writer.flush()?;
        Ok(())
    }

    /// Flush and sync to disk
    pub fn finish(&self) -> OutputResult<()> {
        let mut writer = lock(&self.writer, "records")?;
        writer.flush()?;
        writer.get_ref().sync_all()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::models::ProbeStatus;
    use chrono::TimeZone;
    use tempfile::TempDir;

    fn valid(id: i64) -> ProbeResult {
        ProbeResult::from_response(
            id,
            format!("https://x/{}", id),
            ProbeStatus::Valid,
            format!("https://x/catalog,{}", id),
            200,
        )
    }

    #[test]
    fn test_format_log_line() {
        let time = Local.with_ymd_and_hms(2024, 3, 7, 9, 5, 1).unwrap();
        let ts = format_timestamp(&time);
        assert_eq!(ts, "2024-03-07 09:05:01");

        let line = format_log_line(&valid(9), &ts);
        assert_eq!(line, "2024-03-07 09:05:01 - ID 9: VALID catalog found!");
    }

    #[test]
    fn test_record_writer_header_and_quoting() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("valid.csv");

        let writer = RecordWriter::create(&path).unwrap();
        writer.append(&valid(42)).unwrap();
        writer.finish().unwrap();

        let content = std::fs::read_to_string(&path).unwrap();
        let lines: Vec<&str> = content.lines().collect();
        assert_eq!(lines[0], "catalog_id,url,status,final_url,http_code");
        assert_eq!(
            lines[1],
            "42,https://x/42,valid,\"https://x/catalog,42\",200"
        );
        assert_eq!(lines.len(), 2);
    }

    #[test]
    fn test_result_log_appends_lines() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("log.txt");

        let log = ResultLog::create(&path, false).unwrap();
        log.write_line("Starting catalog check").unwrap();
        log.append(&valid(1)).unwrap();
        log.append(&ProbeResult::transport_failure(2, "https://x/2".into(), "boom"))
            .unwrap();
        log.finish().unwrap();

        let content = std::fs::read_to_string(&path).unwrap();
        let lines: Vec<&str> = content.lines().collect();
        assert_eq!(lines.len(), 3);
        assert!(lines[1].ends_with(" - ID 1: VALID catalog found!"));
        assert!(lines[2].ends_with(" - ID 2: Error - boom"));
    }

    #[test]
    fn test_create_fails_for_missing_directory() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("missing").join("log.txt");

        match ResultLog::create(&path, false) {
            Err(OutputError::Create { path: failed, .. }) => assert_eq!(failed, path),
            other => panic!("expected create error, got {:?}", other.map(|_| ())),
        }
        assert!(RecordWriter::create(&path).is_err());
    }
}
