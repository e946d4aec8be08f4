//! File sink implementation

use crate::core::{LoggerError, Result, Sink};
use std::fs::{File, OpenOptions};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

/// Appends lines to a file through a `BufWriter`
///
/// The buffer is flushed at the end of every batch, so the file is never
/// more than one batch behind the logger.
pub struct FileSink {
    writer: BufWriter<File>,
    path: PathBuf,
}

impl FileSink {
    /// Open `path` for appending, creating it if needed
    pub fn new(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        let file = Self::open(&path)?;
        Ok(Self {
            writer: BufWriter::new(file),
            path,
        })
    }

    /// Open `path` and take an exclusive advisory lock on it
    ///
    /// Fails with [`LoggerError::FileLock`] if another process already holds
    /// the lock. The lock is released when the sink is dropped.
    #[cfg(feature = "file")]
    pub fn locked(path: impl Into<PathBuf>) -> Result<Self> {
        use fs2::FileExt;

        let path = path.into();
        let file = Self::open(&path)?;
        file.try_lock_exclusive()
            .map_err(|_| LoggerError::file_lock(path.display().to_string()))?;
        Ok(Self {
            writer: BufWriter::new(file),
            path,
        })
    }

    fn open(path: &Path) -> Result<File> {
        Ok(OpenOptions::new().create(true).append(true).open(path)?)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Sink for FileSink {
    fn write(&mut self, bytes: &[u8]) -> Result<()> {
        self.writer
            .write_all(bytes)
            .map_err(|e| LoggerError::sink_write(self.path.display().to_string(), bytes.len(), e))
    }

    fn flush(&mut self) -> Result<()> {
        self.writer
            .flush()
            .map_err(|e| LoggerError::sink_write(self.path.display().to_string(), 0, e))
    }

    fn name(&self) -> &str {
        "file"
    }
}

impl Drop for FileSink {
    fn drop(&mut self) {
        // Ensure all buffered data is flushed to disk
        let _ = self.writer.flush();
    }
}
