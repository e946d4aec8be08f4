//! Sinks over arbitrary writers

use crate::core::{LoggerError, Result, Sink};
use parking_lot::Mutex;
use std::io::Write;
use std::sync::Arc;

/// Adapts any `io::Write` (a socket, a pipe, `io::sink()`) into a [`Sink`]
pub struct WriterSink<W: Write + Send> {
    writer: W,
    name: String,
}

impl<W: Write + Send> WriterSink<W> {
    pub fn new(writer: W) -> Self {
        Self::named(writer, "writer")
    }

    pub fn named(writer: W, name: impl Into<String>) -> Self {
        Self {
            writer,
            name: name.into(),
        }
    }
}

impl<W: Write + Send> Sink for WriterSink<W> {
    fn write(&mut self, bytes: &[u8]) -> Result<()> {
        self.writer
            .write_all(bytes)
            .map_err(|e| LoggerError::sink_write(self.name.as_str(), bytes.len(), e))
    }

    fn flush(&mut self) -> Result<()> {
        self.writer
            .flush()
            .map_err(|e| LoggerError::sink_write(self.name.as_str(), 0, e))
    }

    fn name(&self) -> &str {
        &self.name
    }
}

/// In-memory sink whose clones share one buffer
///
/// Keep a clone to read back what the logger wrote.
#[derive(Clone, Default)]
pub struct MemorySink {
    buffer: Arc<Mutex<Vec<u8>>>,
    flushes: Arc<Mutex<u64>>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Everything written so far, lossily decoded as UTF-8
    pub fn contents(&self) -> String {
        String::from_utf8_lossy(&self.buffer.lock()).into_owned()
    }

    pub fn lines(&self) -> Vec<String> {
        self.contents().lines().map(String::from).collect()
    }

    /// Number of completed sink flushes
    pub fn flush_count(&self) -> u64 {
        *self.flushes.lock()
    }

    pub fn clear(&self) {
        self.buffer.lock().clear();
    }
}

impl Sink for MemorySink {
    fn write(&mut self, bytes: &[u8]) -> Result<()> {
        self.buffer.lock().extend_from_slice(bytes);
        Ok(())
    }

    fn flush(&mut self) -> Result<()> {
        *self.flushes.lock() += 1;
        Ok(())
    }

    fn name(&self) -> &str {
        "memory"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io;

    struct ShortWriter;

    impl Write for ShortWriter {
        fn write(&mut self, _buf: &[u8]) -> io::Result<usize> {
            Ok(0)
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    #[test]
    fn test_writer_sink_writes_bytes() {
        let mut sink = WriterSink::named(Vec::new(), "vec");
        sink.write(b"hello\n").unwrap();
        sink.flush().unwrap();
        assert_eq!(sink.name(), "vec");
        assert_eq!(sink.writer, b"hello\n");
    }

    #[test]
    fn test_short_write_is_an_error() {
        let mut sink = WriterSink::new(ShortWriter);
        let err = sink.write(b"lost bytes").unwrap_err();
        match err {
            LoggerError::SinkWrite { bytes, source, .. } => {
                assert_eq!(bytes, 10);
                assert_eq!(source.kind(), io::ErrorKind::WriteZero);
            }
            other => panic!("unexpected error: {}", other),
        }
    }

    struct StuckWriter;

    impl Write for StuckWriter {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            Ok(buf.len())
        }

        fn flush(&mut self) -> io::Result<()> {
            Err(io::Error::new(io::ErrorKind::BrokenPipe, "peer went away"))
        }
    }

    #[test]
    fn test_flush_failure_is_a_sink_write_error() {
        let mut sink = WriterSink::named(StuckWriter, "pipe");
        sink.write(b"line\n").unwrap();
        match sink.flush().unwrap_err() {
            LoggerError::SinkWrite {
                sink,
                bytes,
                source,
            } => {
                assert_eq!(sink, "pipe");
                assert_eq!(bytes, 0);
                assert_eq!(source.kind(), io::ErrorKind::BrokenPipe);
            }
            other => panic!("unexpected error: {}", other),
        }
    }

    #[test]
    fn test_memory_sink_clones_share_buffer() {
        let sink = MemorySink::new();
        let mut writer = sink.clone();
        writer.write(b"a\nb\n").unwrap();
        writer.flush().unwrap();

        assert_eq!(sink.lines(), vec!["a", "b"]);
        assert_eq!(sink.flush_count(), 1);

        sink.clear();
        assert!(sink.contents().is_empty());
    }
}
