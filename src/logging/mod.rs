//! Structured logging for run auditing.

mod format;

pub use format::StructuredLogger;
