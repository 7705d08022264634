use std::fs::{File, OpenOptions};
use std::io::{BufRead, BufReader, Write};
use std::path::{Path, PathBuf};

use crate::domain::email::ClassificationRecord;
use crate::error::{Error, Result};
use crate::store::repo::ResultRecorder;

/// JSON Lines file: one record per line, only ever appended to.
///
/// The file is opened and closed on every append.
pub struct JsonlStore {
    path: PathBuf,
}

impl JsonlStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// All records in file order; a missing file reads as empty.
    pub fn read_all(&self) -> Result<Vec<ClassificationRecord>> {
        let file = match File::open(&self.path) {
            Ok(f) => f,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(vec![]),
            Err(e) => return Err(self.fail(e)),
        };

        let mut out = Vec::new();
        for line in BufReader::new(file).lines() {
            let line = line.map_err(|e| self.fail(e))?;
            if line.trim().is_empty() {
                continue;
            }
            out.push(serde_json::from_str(&line).map_err(|e| self.fail(e))?);
        }
        Ok(out)
    }

    fn fail(&self, e: impl std::fmt::Display) -> Error {
        Error::Record {
            path: self.path.display().to_string(),
            reason: e.to_string(),
        }
    }
}

impl ResultRecorder for JsonlStore {
    fn append_record(&self, record: &ClassificationRecord) -> Result<()> {
        let mut line = serde_json::to_string(record).map_err(|e| self.fail(e))?;
        line.push('\n');

        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .map_err(|e| self.fail(e))?;
        file.write_all(line.as_bytes()).map_err(|e| self.fail(e))?;
        file.flush().map_err(|e| self.fail(e))?;
        log::debug!("recorded email {} to {}", record.email_id, self.path.display());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::email::Classification;

    fn record(id: &str, label: Classification, reason: &str) -> ClassificationRecord {
        ClassificationRecord {
            email_id: id.to_string(),
            subject: format!("subject {id}"),
            classification: label,
            reason: reason.to_string(),
        }
    }

    #[test]
    fn records_read_back_in_order() {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonlStore::new(dir.path().join("results.jsonl"));
        let written = vec![
            record("1", Classification::Spam, "This is spam because...\nlinks"),
            record("2", Classification::NotSpam, "Not spam — \"legit\""),
            record("3", Classification::Unknown, ""),
        ];
        for r in &written {
            store.append_record(r).unwrap();
        }

        assert_eq!(store.read_all().unwrap(), written);

        let raw = std::fs::read_to_string(store.path()).unwrap();
        assert_eq!(raw.lines().count(), 3);
        let first: serde_json::Value = serde_json::from_str(raw.lines().next().unwrap()).unwrap();
        assert_eq!(first["email_id"], "1");
        assert_eq!(first["classification"], "Spam");
    }

    #[test]
    fn appends_never_overwrite_existing_lines() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("results.jsonl");
        std::fs::write(
            &path,
            "{\"email_id\":\"9\",\"subject\":\"old\",\"classification\":\"Unknown\",\"reason\":\"?\"}\n",
        )
        .unwrap();

        let store = JsonlStore::new(&path);
        store
            .append_record(&record("10", Classification::Spam, "spam"))
            .unwrap();

        let all = store.read_all().unwrap();
        assert_eq!(all.len(), 2);
        assert_eq!(all[0].subject, "old");
        assert_eq!(all[1].email_id, "10");
    }

    #[test]
    fn missing_file_reads_as_empty() {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonlStore::new(dir.path().join("nope.jsonl"));
        assert!(store.read_all().unwrap().is_empty());
    }
}
