//! Alert construction and delimited report serialization.

mod builder;

pub use builder::{write_combined, write_report, Alert, AlertBuilder, AlertReport};

/// Columns appended after each record's original fields, in stable order.
pub const ALERT_COLUMNS: [&str; 5] = [
    "source_file",
    "threat_detected",
    "threat_probability",
    "alert_level",
    "timestamp",
];
