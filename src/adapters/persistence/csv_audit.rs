//! Implements AuditLogPort with local CSV files.
//! One file per platform and category: {dir}/{platform}-{category}.csv.
//! Used when a spreadsheet is not configured or cannot be opened.

use crate::domain::{AuditEntry, DomainError, LogCategory, Platform};
use crate::ports::AuditLogPort;
use std::path::{Path, PathBuf};
use tokio::fs;
use tokio::io::AsyncWriteExt;
use tokio::sync::Mutex;
use tracing::debug;

const HEADER: [&str; 2] = ["timestamp", "message"];

pub struct CsvAuditLog {
    dir: PathBuf,
    platform: Platform,
    write_lock: Mutex<()>,
}

impl CsvAuditLog {
    pub fn new(dir: impl AsRef<Path>, platform: Platform) -> Self {
        Self {
            dir: dir.as_ref().to_path_buf(),
            platform,
            write_lock: Mutex::new(()),
        }
    }

    pub fn path(&self, category: LogCategory) -> PathBuf {
        self.dir
            .join(format!("{}-{}.csv", self.platform.as_str(), category.as_str()))
    }

    fn format_row(fields: [&str; 2]) -> Result<Vec<u8>, DomainError> {
        let mut wtr = csv::WriterBuilder::new()
            .has_headers(false)
            .from_writer(Vec::new());
        wtr.write_record(fields)
            .map_err(|e| DomainError::AuditLog(format!("csv encode: {}", e)))?;
        wtr.into_inner()
            .map_err(|e| DomainError::AuditLog(format!("csv flush: {}", e)))
    }
}

#[async_trait::async_trait]
impl AuditLogPort for CsvAuditLog {
    async fn append(&self, category: LogCategory, entry: &AuditEntry) -> Result<(), DomainError> {
        let _guard = self.write_lock.lock().await;
        let path = self.path(category);

        fs::create_dir_all(&self.dir)
            .await
            .map_err(|e| DomainError::AuditLog(format!("create {}: {}", self.dir.display(), e)))?;

        let is_new = fs::metadata(&path).await.map(|m| m.len() == 0).unwrap_or(true);
        let mut bytes = if is_new {
            Self::format_row(HEADER)?
        } else {
            Vec::new()
        };
        bytes.extend(Self::format_row([&entry.timestamp, &entry.message])?);

        let mut f = fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(&path)
            .await
            .map_err(|e| DomainError::AuditLog(format!("open {}: {}", path.display(), e)))?;
        f.write_all(&bytes)
            .await
            .map_err(|e| DomainError::AuditLog(format!("write {}: {}", path.display(), e)))?;
        f.flush()
            .await
            .map_err(|e| DomainError::AuditLog(format!("flush {}: {}", path.display(), e)))?;

        debug!(path = %path.display(), "audit row appended");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(ts: &str, msg: &str) -> AuditEntry {
        AuditEntry {
            timestamp: ts.to_string(),
            message: msg.to_string(),
        }
    }

    #[tokio::test]
    async fn test_append_writes_header_once() {
        let dir = tempfile::tempdir().unwrap();
        let log = CsvAuditLog::new(dir.path().join("audit"), Platform::X);

        log.append(LogCategory::Posted, &entry("01-05-2024 10:00:00", "first #post"))
            .await
            .unwrap();
        log.append(LogCategory::Posted, &entry("01-05-2024 11:00:00", "second"))
            .await
            .unwrap();

        let content = std::fs::read_to_string(dir.path().join("audit/x-posted.csv")).unwrap();
        assert_eq!(
            content,
            "timestamp,message\n01-05-2024 10:00:00,first #post\n01-05-2024 11:00:00,second\n"
        );
    }

    #[tokio::test]
    async fn test_message_with_comma_and_newline_is_quoted() {
        let dir = tempfile::tempdir().unwrap();
        let log = CsvAuditLog::new(dir.path(), Platform::Bluesky);

        log.append(LogCategory::Rejected, &entry("t", "well, this\nis two lines"))
            .await
            .unwrap();

        let mut rdr = csv::Reader::from_path(log.path(LogCategory::Rejected)).unwrap();
        let rows: Vec<csv::StringRecord> = rdr.records().map(|r| r.unwrap()).collect();
        assert_eq!(rows.len(), 1);
        assert_eq!(&rows[0][1], "well, this\nis two lines");
    }

    #[tokio::test]
    async fn test_categories_use_separate_files() {
        let dir = tempfile::tempdir().unwrap();
        let log = CsvAuditLog::new(dir.path(), Platform::Bluesky);
        log.append(LogCategory::Error, &entry("t", "boom")).await.unwrap();
        assert!(dir.path().join("bluesky-error.csv").exists());
        assert!(!dir.path().join("bluesky-posted.csv").exists());
    }
}
