//! Size-rotated log file with an in-memory tail.

use std::collections::VecDeque;
use std::fs::{self, File, OpenOptions};
use std::io::{self, Write};
use std::path::PathBuf;
use std::sync::{Arc, Mutex, MutexGuard};

use tracing_subscriber::fmt::MakeWriter;

use crate::LoggerConfig;

struct Inner {
    file: File,
    written: u64,
    ring: VecDeque<String>,
}

/// `<dir>/<app>.log`, shifted to `<app>.log.1..N` when it grows past the limit
pub struct RollingFile {
    config: LoggerConfig,
    inner: Mutex<Inner>,
}

impl RollingFile {
    pub fn open(config: LoggerConfig) -> io::Result<Self> {
        fs::create_dir_all(&config.log_dir)?;
        let path = config.log_path();
        let file = OpenOptions::new().create(true).append(true).open(&path)?;
        let written = file.metadata()?.len();
        Ok(Self {
            inner: Mutex::new(Inner {
                file,
                written,
                ring: VecDeque::with_capacity(config.ring_capacity),
            }),
            config,
        })
    }

    pub fn path(&self) -> PathBuf {
        self.config.log_path()
    }

    /// Append formatted output, rotating first if it would overflow the file
    pub fn write_bytes(&self, buf: &[u8]) -> io::Result<()> {
        let mut inner = self.lock();
        if inner.written > 0 && inner.written + buf.len() as u64 > self.config.max_file_bytes {
            self.rotate(&mut inner)?;
        }
        inner.file.write_all(buf)?;
        inner.written += buf.len() as u64;

        let capacity = self.config.ring_capacity;
        if capacity > 0 {
            for line in String::from_utf8_lossy(buf).lines().filter(|l| !l.trim().is_empty()) {
                if inner.ring.len() == capacity {
                    inner.ring.pop_front();
                }
                inner.ring.push_back(line.to_string());
            }
        }
        Ok(())
    }

    /// Most recent lines, oldest first
    pub fn recent_lines(&self) -> Vec<String> {
        self.lock().ring.iter().cloned().collect()
    }

    fn rotate(&self, inner: &mut Inner) -> io::Result<()> {
        inner.file.flush()?;
        let path = self.config.log_path();
        let keep = self.config.max_files;

        if keep == 0 {
            fs::remove_file(&path)?;
        } else {
            let oldest = self.config.rotated_path(keep);
            if oldest.exists() {
                fs::remove_file(&oldest)?;
            }
            for n in (1..keep).rev() {
                let from = self.config.rotated_path(n);
                if from.exists() {
                    fs::rename(&from, self.config.rotated_path(n + 1))?;
                }
            }
            fs::rename(&path, self.config.rotated_path(1))?;
        }

        inner.file = OpenOptions::new().create(true).append(true).open(&path)?;
        inner.written = 0;
        Ok(())
    }

    fn lock(&self) -> MutexGuard<'_, Inner> {
        // a panic mid-write leaves the file usable
        self.inner.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

/// Cloneable handle usable as a `tracing-subscriber` writer
#[derive(Clone)]
pub struct SharedRollingFile(Arc<RollingFile>);

impl SharedRollingFile {
    pub fn open(config: LoggerConfig) -> io::Result<Self> {
        Ok(Self(Arc::new(RollingFile::open(config)?)))
    }

    pub fn file(&self) -> &RollingFile {
        &self.0
    }
}

pub struct RollingHandle(Arc<RollingFile>);

impl Write for RollingHandle {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0.write_bytes(buf)?;
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        self.0.lock().file.flush()
    }
}

impl<'a> MakeWriter<'a> for SharedRollingFile {
    type Writer = RollingHandle;

    fn make_writer(&'a self) -> Self::Writer {
        RollingHandle(self.0.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config(dir: &std::path::Path) -> LoggerConfig {
        LoggerConfig {
            max_file_bytes: 64,
            max_files: 2,
            ring_capacity: 2,
            ..LoggerConfig::new(dir, "board")
        }
    }

    #[test]
    fn test_rotates_when_full() {
        let dir = tempfile::tempdir().unwrap();
        let file = RollingFile::open(config(dir.path())).unwrap();
        let line = format!("{}\n", "x".repeat(39));

        for _ in 0..4 {
            file.write_bytes(line.as_bytes()).unwrap();
        }

        assert!(dir.path().join("board.log").exists());
        assert!(dir.path().join("board.log.1").exists());
        assert!(dir.path().join("board.log.2").exists());
        assert!(!dir.path().join("board.log.3").exists());
        assert_eq!(fs::read_to_string(dir.path().join("board.log")).unwrap(), line);
    }

    #[test]
    fn test_ring_keeps_latest_lines() {
        let dir = tempfile::tempdir().unwrap();
        let file = RollingFile::open(config(dir.path())).unwrap();

        file.write_bytes(b"one\ntwo\n").unwrap();
        file.write_bytes(b"three\n").unwrap();
        assert_eq!(file.recent_lines(), vec!["two".to_string(), "three".to_string()]);
    }

    #[test]
    fn test_reopen_appends() {
        let dir = tempfile::tempdir().unwrap();
        {
            let file = RollingFile::open(config(dir.path())).unwrap();
            file.write_bytes(b"first\n").unwrap();
        }
        let file = RollingFile::open(config(dir.path())).unwrap();
        file.write_bytes(b"second\n").unwrap();
        assert_eq!(
            fs::read_to_string(file.path()).unwrap(),
            "first\nsecond\n"
        );
    }
}
