//! JSONL file writer for account status updates.
//!
//! Each [`StatusPatch`] is written as a single JSON line carrying the
//! account id and a `timestamp`, appended via a buffered writer.

use relay_application::ports::status_sink::{StatusPatch, StatusSink};
use relay_domain::AccountId;
use std::fs::{File, OpenOptions};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use tracing::warn;

/// Status sink that appends one JSON object per update.
///
/// Thread-safe via `Mutex<BufWriter<File>>`. Flushes on `Drop`.
pub struct JsonlStatusLog {
    writer: Mutex<BufWriter<File>>,
    path: PathBuf,
}

impl JsonlStatusLog {
    /// Open `path` for appending.
    ///
    /// Creates the file (and parent directories) if they don't exist.
    /// Returns `None` if the file cannot be opened.
    pub fn new(path: impl AsRef<Path>) -> Option<Self> {
        let path = path.as_ref();

        if let Some(parent) = path.parent()
            && !parent.as_os_str().is_empty()
            && let Err(e) = std::fs::create_dir_all(parent)
        {
            warn!(
                "Could not create status log directory {}: {}",
                parent.display(),
                e
            );
            return None;
        }

        let file = match OpenOptions::new().create(true).append(true).open(path) {
            Ok(f) => f,
            Err(e) => {
                warn!("Could not open status log file {}: {}", path.display(), e);
                return None;
            }
        };

        Some(Self {
            writer: Mutex::new(BufWriter::new(file)),
            path: path.to_path_buf(),
        })
    }

    /// Get the path to the log file.
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl StatusSink for JsonlStatusLog {
    fn update(&self, account: &AccountId, patch: StatusPatch) {
        let timestamp = chrono::Utc::now().to_rfc3339_opts(chrono::SecondsFormat::Millis, true);

        let mut record = match serde_json::to_value(&patch) {
            Ok(serde_json::Value::Object(map)) => map,
            _ => return,
        };
        record.insert(
            "account".to_string(),
            serde_json::Value::String(account.to_string()),
        );
        record.insert(
            "timestamp".to_string(),
            serde_json::Value::String(timestamp),
        );

        let Ok(line) = serde_json::to_string(&record) else {
            return;
        };

        if let Ok(mut writer) = self.writer.lock() {
            let _ = writeln!(writer, "{}", line);
            let _ = writer.flush();
        }
    }
}

impl Drop for JsonlStatusLog {
    fn drop(&mut self) {
        if let Ok(mut writer) = self.writer.lock() {
            let _ = writer.flush();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lines(path: &Path) -> Vec<serde_json::Value> {
        std::fs::read_to_string(path)
            .unwrap()
            .lines()
            .map(|l| serde_json::from_str(l).unwrap())
            .collect()
    }

    #[test]
    fn writes_one_line_per_update() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("logs").join("status.jsonl");
        let log = JsonlStatusLog::new(&path).unwrap();
        let account = AccountId::new("default");

        log.update(&account, StatusPatch::started());
        log.update(&account, StatusPatch::disconnected(Some("refused".into())));
        drop(log);

        let records = lines(&path);
        assert_eq!(records.len(), 2);
        for record in &records {
            assert_eq!(record["account"], "default");
            assert!(record["timestamp"].is_string());
        }
        assert_eq!(records[0]["running"], true);
        assert!(records[0].get("connected").is_none());
        assert_eq!(records[1]["connected"], false);
        assert_eq!(records[1]["last_error"], "refused");
    }

    #[test]
    fn appends_across_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("status.jsonl");
        let account = AccountId::new("a");

        JsonlStatusLog::new(&path)
            .unwrap()
            .update(&account, StatusPatch::started());
        JsonlStatusLog::new(&path)
            .unwrap()
            .update(&account, StatusPatch::stopped());

        assert_eq!(lines(&path).len(), 2);
    }

    #[test]
    fn unwritable_path_returns_none() {
        let dir = tempfile::tempdir().unwrap();
        let blocker = dir.path().join("file");
        std::fs::write(&blocker, "").unwrap();

        assert!(JsonlStatusLog::new(blocker.join("status.jsonl")).is_none());
    }
}
