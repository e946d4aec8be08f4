//! Logging macros that capture the call site.
//!
//! These macros record the enclosing function, file and line of the call
//! and pass the message arguments through `format_args!`, so nothing is
//! allocated for the message until the logger renders it.
//!
//! # Examples
//!
//! ```
//! use flux_logger::prelude::*;
//! use flux_logger::info;
//!
//! let logger = Logger::builder().sink(MemorySink::new()).build().unwrap();
//!
//! // Basic logging
//! info!(logger, "Server started");
//!
//! // With format arguments
//! let port = 8080;
//! info!(logger, "Server listening on port {}", port);
//! ```

/// Path of the enclosing function, e.g. `my_app::server::run`.
///
/// Closures report the function that contains them.
#[macro_export]
macro_rules! function_name {
    () => {{
        fn __flux_here() {}
        fn type_name_of<T>(_: T) -> &'static str {
            ::std::any::type_name::<T>()
        }
        let name = type_name_of(__flux_here);
        let name = name.strip_suffix("::__flux_here").unwrap_or(name);
        name.trim_end_matches("::{{closure}}")
    }};
}

/// [`SourceLocation`](crate::SourceLocation) of the invocation.
#[macro_export]
macro_rules! location {
    () => {
        $crate::SourceLocation::new($crate::function_name!(), file!(), line!())
    };
}

/// Log a message at the given level.
///
/// # Examples
///
/// ```
/// # use flux_logger::prelude::*;
/// # let logger = Logger::builder().sink(MemorySink::new()).build().unwrap();
/// use flux_logger::log;
/// log!(logger, LogLevel::Info, "Simple message");
/// log!(logger, LogLevel::Error, "Error code: {}", 500);
/// ```
#[macro_export]
macro_rules! log {
    ($logger:expr, $level:expr, $($arg:tt)+) => {
        $logger.log($level, $crate::location!(), format_args!($($arg)+))
    };
}

/// Log a debug-level message.
#[macro_export]
macro_rules! debug {
    ($logger:expr, $($arg:tt)+) => {
        $crate::log!($logger, $crate::LogLevel::Debug, $($arg)+)
    };
}

/// Log an info-level message.
///
/// # Examples
///
/// ```
/// # use flux_logger::prelude::*;
/// # let logger = Logger::builder().sink(MemorySink::new()).build().unwrap();
/// use flux_logger::info;
/// info!(logger, "Processing {} items", 100);
/// ```
#[macro_export]
macro_rules! info {
    ($logger:expr, $($arg:tt)+) => {
        $crate::log!($logger, $crate::LogLevel::Info, $($arg)+)
    };
}

/// Log a warning-level message.
#[macro_export]
macro_rules! warn {
    ($logger:expr, $($arg:tt)+) => {
        $crate::log!($logger, $crate::LogLevel::Warn, $($arg)+)
    };
}

/// Log an error-level message.
///
/// # Examples
///
/// ```
/// # use flux_logger::prelude::*;
/// # let logger = Logger::builder().sink(MemorySink::new()).build().unwrap();
/// use flux_logger::error;
/// error!(logger, "Error code: {}, message: {}", 500, "Internal error");
/// ```
#[macro_export]
macro_rules! error {
    ($logger:expr, $($arg:tt)+) => {
        $crate::log!($logger, $crate::LogLevel::Error, $($arg)+)
    };
}
