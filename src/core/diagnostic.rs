//! Out-of-band diagnostics
//!
//! The logger cannot report its own failures through its buffers, so they go
//! straight to stderr. Writes here are best effort and never touch the
//! logger's locks.

use std::io::Write;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    Warning,
    Error,
    Critical,
}

impl Severity {
    fn tag(self) -> &'static str {
        match self {
            Severity::Warning => "[FLUX WARNING]",
            Severity::Error => "[FLUX ERROR]",
            Severity::Critical => "[FLUX CRITICAL]",
        }
    }
}

/// Write one diagnostic line to stderr, ignoring failures
pub fn report(severity: Severity, message: impl std::fmt::Display) {
    let mut stderr = std::io::stderr().lock();
    let _ = writeln!(stderr, "{} {}", severity.tag(), message);
}

/// Whether the `n`-th occurrence (zero based) of a repeated failure is reported
///
/// Reports the first occurrence and every 1000th after it.
pub fn should_report(previous: u64) -> bool {
    previous == 0 || (previous + 1) % 1000 == 0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_should_report() {
        assert!(should_report(0));
        assert!(!should_report(1));
        assert!(!should_report(998));
        assert!(should_report(999));
        assert!(should_report(1999));
    }
}
