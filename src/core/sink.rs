//! Sink trait for log output destinations

use super::error::Result;

/// Destination for finished lines: append bytes, then flush.
///
/// Only the flush worker calls into a sink, so implementations need no
/// internal synchronization.
pub trait Sink: Send {
    /// Append `bytes` in full; a short write is an error
    fn write(&mut self, bytes: &[u8]) -> Result<()>;
    fn flush(&mut self) -> Result<()>;
    fn name(&self) -> &str;
}

impl<S: Sink + ?Sized> Sink for Box<S> {
    fn write(&mut self, bytes: &[u8]) -> Result<()> {
        (**self).write(bytes)
    }

    fn flush(&mut self) -> Result<()> {
        (**self).flush()
    }

    fn name(&self) -> &str {
        (**self).name()
    }
}
