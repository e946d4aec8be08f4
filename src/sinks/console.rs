//! Console sink implementation

use crate::core::{LoggerError, Result, Sink};
use std::io::{self, Write};

/// Writes lines to standard output
pub struct ConsoleSink {
    stdout: io::Stdout,
}

impl ConsoleSink {
    pub fn new() -> Self {
        Self {
            stdout: io::stdout(),
        }
    }
}

impl Default for ConsoleSink {
    fn default() -> Self {
        Self::new()
    }
}

impl Sink for ConsoleSink {
    fn write(&mut self, bytes: &[u8]) -> Result<()> {
        self.stdout
            .lock()
            .write_all(bytes)
            .map_err(|e| LoggerError::sink_write("console", bytes.len(), e))
    }

    fn flush(&mut self) -> Result<()> {
        self.stdout
            .flush()
            .map_err(|e| LoggerError::sink_write("console", 0, e))
    }

    fn name(&self) -> &str {
        "console"
    }
}
