//! Structured logging for the edge asset gateway.
//!
//! This crate provides:
//! - `StructuredLogger` - Per-request logger with tenant/path context
//! - `LogEntry` / `LogLevel` - Structured log records
//! - `LogFormat` - JSON (production) or human-readable (development) output

mod logging;

pub use logging::*;
