//! Error types for the logger system

use std::time::Duration;

pub type Result<T> = std::result::Result<T, LoggerError>;

#[derive(Debug, thiserror::Error)]
pub enum LoggerError {
    /// A message argument failed to render (its `Display` returned an error or panicked)
    #[error("Format error: {message}")]
    Format { message: String },

    /// The output sink failed or accepted fewer bytes than requested
    #[error("Sink '{sink}' failed to write {bytes} bytes: {source}")]
    SinkWrite {
        sink: String,
        bytes: usize,
        #[source]
        source: std::io::Error,
    },

    /// The final drain did not complete within the configured bound
    #[error("Shutdown drain exceeded {timeout:?} with {pending} records still buffered")]
    ShutdownTimeout { timeout: Duration, pending: usize },

    /// The flush worker thread panicked
    #[error("Flush worker thread panicked: {0}")]
    WorkerPanicked(String),

    /// Invalid configuration with details
    #[error("Invalid configuration for {component}: {message}")]
    InvalidConfiguration { component: String, message: String },

    /// Another process holds the lock on a log file
    #[error("Failed to acquire file lock on '{path}'")]
    FileLock { path: String },

    /// Generic IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON configuration error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl LoggerError {
    /// Create a format error
    pub fn format(message: impl Into<String>) -> Self {
        LoggerError::Format {
            message: message.into(),
        }
    }

    /// Create a sink write error with the number of bytes that were not delivered
    pub fn sink_write(sink: impl Into<String>, bytes: usize, source: std::io::Error) -> Self {
        LoggerError::SinkWrite {
            sink: sink.into(),
            bytes,
            source,
        }
    }

    /// Create a shutdown timeout error
    pub fn shutdown_timeout(timeout: Duration, pending: usize) -> Self {
        LoggerError::ShutdownTimeout { timeout, pending }
    }

    /// Create a file lock error
    pub fn file_lock(path: impl Into<String>) -> Self {
        LoggerError::FileLock { path: path.into() }
    }

    /// Create an invalid configuration error
    pub fn config(component: impl Into<String>, message: impl Into<String>) -> Self {
        LoggerError::InvalidConfiguration {
            component: component.into(),
            message: message.into(),
        }
    }
}

/// Extract a readable message from a caught panic payload
pub(crate) fn panic_message(payload: &(dyn std::any::Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        s.to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "Unknown panic".to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_creation() {
        let err = LoggerError::format("bad argument");
        assert!(matches!(err, LoggerError::Format { .. }));

        let err = LoggerError::config("LoggerConfig", "batch_size must be positive");
        assert!(matches!(err, LoggerError::InvalidConfiguration { .. }));

        let err = LoggerError::shutdown_timeout(Duration::from_millis(10), 3);
        assert!(matches!(err, LoggerError::ShutdownTimeout { pending: 3, .. }));
    }

    #[test]
    fn test_error_display() {
        let err = LoggerError::config("LoggerConfig", "batch_size must be positive");
        assert_eq!(
            err.to_string(),
            "Invalid configuration for LoggerConfig: batch_size must be positive"
        );

        let err = LoggerError::shutdown_timeout(Duration::from_secs(5), 42);
        assert_eq!(
            err.to_string(),
            "Shutdown drain exceeded 5s with 42 records still buffered"
        );
    }

    #[test]
    fn test_sink_write_error() {
        let io_err = std::io::Error::new(std::io::ErrorKind::WriteZero, "short write");
        let err = LoggerError::sink_write("file", 128, io_err);

        assert!(matches!(err, LoggerError::SinkWrite { bytes: 128, .. }));
        assert!(err.to_string().contains("file"));
        assert!(err.to_string().contains("128 bytes"));
        assert!(std::error::Error::source(&err).is_some());
    }

    #[test]
    fn test_panic_message() {
        let payload: Box<dyn std::any::Any + Send> = Box::new("boom");
        assert_eq!(panic_message(payload.as_ref()), "boom");

        let payload: Box<dyn std::any::Any + Send> = Box::new(String::from("owned boom"));
        assert_eq!(panic_message(payload.as_ref()), "owned boom");

        let payload: Box<dyn std::any::Any + Send> = Box::new(7u32);
        assert_eq!(panic_message(payload.as_ref()), "Unknown panic");
    }
}
