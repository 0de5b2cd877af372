//! Append-only text journal kept next to the user's home directory.
//!
//! Every line is prefixed with a local timestamp. Failures to write are
//! reported through `tracing` and swallowed: the journal must never be the
//! reason a run fails.

use std::ffi::OsStr;
use std::fs::{File, OpenOptions};
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use chrono::Local;
use tracing::{debug, warn};

pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S%.3f %z";

pub trait Journal: Send {
    fn record(&mut self, text: &str);
}

/// Journal used when logging to file is disabled.
#[derive(Debug, Default)]
pub struct NoopJournal;

impl Journal for NoopJournal {
    fn record(&mut self, _text: &str) {}
}

#[derive(Debug)]
pub struct FileJournal {
    path: PathBuf,
    file: File,
}

impl FileJournal {
    pub fn open(path: impl AsRef<Path>) -> io::Result<Self> {
        let path = path.as_ref().to_path_buf();
        let file = OpenOptions::new().create(true).append(true).open(&path)?;
        debug!(path = %path.display(), "Opened journal");
        Ok(Self { path, file })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Journal for FileJournal {
    fn record(&mut self, text: &str) {
        let line = format!("{} : {}\n", Local::now().format(TIMESTAMP_FORMAT), text.trim_end());
        if let Err(e) = self.file.write_all(line.as_bytes()) {
            warn!(path = %self.path.display(), error = %e, "Failed to write journal line");
        }
    }
}

impl Drop for FileJournal {
    fn drop(&mut self) {
        if let Err(e) = self.file.flush() {
            warn!(path = %self.path.display(), error = %e, "Failed to flush journal");
        }
    }
}

/// `$HOME/<file_name>`, or just `<file_name>` when `HOME` is unset or empty.
pub fn log_file_path(home: Option<&OsStr>, file_name: &str) -> PathBuf {
    match home {
        Some(dir) if !dir.is_empty() => Path::new(dir).join(file_name),
        _ => PathBuf::from(file_name),
    }
}

/// Open the file journal, or fall back to a no-op one when disabled or unopenable.
pub fn open_journal(enabled: bool, path: &Path) -> Box<dyn Journal> {
    if !enabled {
        return Box::new(NoopJournal);
    }
    match FileJournal::open(path) {
        Ok(journal) => Box::new(journal),
        Err(e) => {
            warn!(path = %path.display(), error = %e, "Couldn't open journal for writing, continuing without it");
            Box::new(NoopJournal)
        }
    }
}

#[cfg(test)]
#[derive(Debug, Default)]
pub(crate) struct MemoryJournal {
    pub lines: Vec<String>,
}

#[cfg(test)]
impl Journal for MemoryJournal {
    fn record(&mut self, text: &str) {
        self.lines.push(text.to_string());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::DateTime;
    use std::ffi::OsString;
    use std::fs;

    fn split_line(line: &str) -> (&str, &str) {
        line.split_once(" : ").expect("line has a timestamp prefix")
    }

    #[test]
    fn test_log_file_path() {
        let home = OsString::from("/home/doge");
        assert_eq!(log_file_path(Some(home.as_os_str()), ".wst_log"), PathBuf::from("/home/doge/.wst_log"));
        assert_eq!(log_file_path(Some(OsStr::new("")), ".wst_log"), PathBuf::from(".wst_log"));
        assert_eq!(log_file_path(None, ".wst_log"), PathBuf::from(".wst_log"));
    }

    #[test]
    fn test_lines_are_timestamped() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(".wst_log");

        let mut journal = FileJournal::open(&path).unwrap();
        journal.record("SUCCESS: Dogecoin : 0.00000123\n");
        drop(journal);

        let contents = fs::read_to_string(&path).unwrap();
        let lines: Vec<&str> = contents.lines().collect();
        assert_eq!(lines.len(), 1);
        let (ts, text) = split_line(lines[0]);
        assert!(DateTime::parse_from_str(ts, TIMESTAMP_FORMAT).is_ok(), "bad timestamp {:?}", ts);
        assert_eq!(text, "SUCCESS: Dogecoin : 0.00000123");
    }

    #[test]
    fn test_appends_across_opens() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(".wst_log");

        for run in 0..3 {
            let mut journal = FileJournal::open(&path).unwrap();
            journal.record(&format!("run {}", run));
        }

        let contents = fs::read_to_string(&path).unwrap();
        let texts: Vec<&str> = contents.lines().map(|l| split_line(l).1).collect();
        assert_eq!(texts, vec!["run 0", "run 1", "run 2"]);
    }

    #[test]
    fn test_unopenable_path_falls_back() {
        let dir = tempfile::tempdir().unwrap();
        // a directory cannot be opened for appending
        let mut journal = open_journal(true, dir.path());
        journal.record("dropped");
        drop(journal);
        assert_eq!(fs::read_dir(dir.path()).unwrap().count(), 0);
    }

    #[test]
    fn test_disabled_journal_creates_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(".wst_log");
        let mut journal = open_journal(false, &path);
        journal.record("ignored");
        drop(journal);
        assert!(!path.exists());
    }
}
