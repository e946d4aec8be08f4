//! Flush policy configuration
//!
//! All tunables are plain `Duration`s and counts so callers pick the unit.
//! When (de)serialized, durations are written as integer microseconds.

use super::error::{LoggerError, Result};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Records buffered before a swap is forced
pub const DEFAULT_BATCH_SIZE: usize = 1024;

/// Maximum age of the last swap before the next enqueue forces another one
pub const DEFAULT_FLUSH_LATENCY: Duration = Duration::from_micros(200);

/// Longest the flush worker sleeps before stealing a partially filled buffer
pub const DEFAULT_IDLE_WAIT: Duration = Duration::from_millis(10);

/// Default bound on the shutdown drain
///
/// Used when the logger is dropped without an explicit shutdown call, and by
/// `Logger::shutdown()` unless configured otherwise.
pub const DEFAULT_SHUTDOWN_TIMEOUT: Duration = Duration::from_secs(5);

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggerConfig {
    /// Front-buffer length that triggers a swap
    pub batch_size: usize,

    /// Time since the last swap that triggers a swap on enqueue
    #[serde(with = "micros")]
    pub flush_latency: Duration,

    /// Idle-wait ceiling of the flush worker
    #[serde(with = "micros")]
    pub idle_wait: Duration,

    /// Bound on the final drain; `None` waits for as long as it takes
    #[serde(with = "micros_opt")]
    pub shutdown_timeout: Option<Duration>,
}

impl LoggerConfig {
    /// Parse a configuration from JSON; missing fields take their defaults
    ///
    /// # Example
    ///
    /// ```
    /// use flux_logger::LoggerConfig;
    /// use std::time::Duration;
    ///
    /// let config = LoggerConfig::from_json(r#"{"batch_size": 64, "idle_wait": 2000}"#).unwrap();
    /// assert_eq!(config.batch_size, 64);
    /// assert_eq!(config.idle_wait, Duration::from_millis(2));
    /// ```
    pub fn from_json(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn validate(&self) -> Result<()> {
        if self.batch_size == 0 {
            return Err(LoggerError::config(
                "LoggerConfig",
                "batch_size must be at least 1",
            ));
        }
        if self.idle_wait.is_zero() {
            return Err(LoggerError::config(
                "LoggerConfig",
                "idle_wait must be greater than zero",
            ));
        }
        Ok(())
    }
}

impl Default for LoggerConfig {
    fn default() -> Self {
        Self {
            batch_size: DEFAULT_BATCH_SIZE,
            flush_latency: DEFAULT_FLUSH_LATENCY,
            idle_wait: DEFAULT_IDLE_WAIT,
            shutdown_timeout: Some(DEFAULT_SHUTDOWN_TIMEOUT),
        }
    }
}

mod micros {
    use serde::{Deserialize, Deserializer, Serializer};
    use std::time::Duration;

    pub fn serialize<S: Serializer>(value: &Duration, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_u64(value.as_micros().min(u64::MAX as u128) as u64)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Duration, D::Error> {
        u64::deserialize(deserializer).map(Duration::from_micros)
    }
}

mod micros_opt {
    use serde::{Deserialize, Deserializer, Serializer};
    use std::time::Duration;

    pub fn serialize<S: Serializer>(
        value: &Option<Duration>,
        serializer: S,
    ) -> Result<S::Ok, S::Error> {
        match value {
            Some(d) => serializer.serialize_some(&(d.as_micros().min(u64::MAX as u128) as u64)),
            None => serializer.serialize_none(),
        }
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(
        deserializer: D,
    ) -> Result<Option<Duration>, D::Error> {
        Option::<u64>::deserialize(deserializer).map(|v| v.map(Duration::from_micros))
    }
}
