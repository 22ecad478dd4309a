//! Logging infrastructure
//!
//! Structured logging using tracing and tracing-subscriber:
//! - JSON or pretty console output
//! - Optional rolling JSON log files

pub mod config;
pub mod logger;

pub use config::{LogFormat, RotationPolicy};
pub use logger::{parse_log_level, LoggerImpl};
