//! Typed representation of a single bwm-ng CSV line.
//!
//! In `rate` mode, bwm-ng writes lines of the form
//!
//! ```text
//! unix_timestamp;iface_name;bytes_out/s;bytes_in/s;bytes_total/s;bytes_in;bytes_out;packets_out/s;packets_in/s;packets_total/s;packets_in;packets_out;errors_out/s;errors_in/s;errors_in;errors_out
//! ```
//!
//! Only the timestamp, the interface name, the outgoing rate and the two byte counters are
//! parsed. The remaining columns are never inspected, so a malformed packet or error counter does
//! not invalidate the line.

use std::str::FromStr;

use csv::StringRecord;
use serde::{Deserialize, Serialize};

use crate::BwmNgError;

pub const COLUMN_TIMESTAMP: usize = 0;
pub const COLUMN_IFACE: usize = 1;
pub const COLUMN_BYTES_OUT_RATE: usize = 2;
pub const COLUMN_BYTES_IN: usize = 5;
pub const COLUMN_BYTES_OUT: usize = 6;

/// Number of leading columns that must be present on every line.
pub const REQUIRED_COLUMNS: usize = COLUMN_BYTES_OUT + 1;

/// One sample of one interface, as written by bwm-ng once per second.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Sample {
    /// Unix timestamp (seconds) of the sample window.
    pub timestamp: u64,
    /// Name of the interface, e.g. `3001-eth3`, `lo`, or `total`.
    pub iface: String,
    /// Outgoing rate in bytes/s
    pub bytes_out_rate: f64,
    /// Bytes received during the sample window
    pub bytes_in: u64,
    /// Bytes sent during the sample window
    pub bytes_out: u64,
}

impl Sample {
    /// Parse a sample from a split CSV line. Additional trailing columns are ignored.
    pub fn from_record(record: &StringRecord) -> Result<Self, BwmNgError> {
        let line = record.position().map(|p| p.line()).unwrap_or_default();
        if record.len() < REQUIRED_COLUMNS {
            return Err(BwmNgError::TooFewFields {
                line,
                expected: REQUIRED_COLUMNS,
                found: record.len(),
            });
        }

        Ok(Self {
            timestamp: field(record, line, COLUMN_TIMESTAMP)?,
            iface: record[COLUMN_IFACE].to_string(),
            bytes_out_rate: field(record, line, COLUMN_BYTES_OUT_RATE)?,
            bytes_in: field(record, line, COLUMN_BYTES_IN)?,
            bytes_out: field(record, line, COLUMN_BYTES_OUT)?,
        })
    }
}

fn field<T: FromStr>(record: &StringRecord, line: u64, column: usize) -> Result<T, BwmNgError> {
    let value = &record[column];
    value.parse().map_err(|_| BwmNgError::InvalidNumber {
        line,
        column,
        value: value.to_string(),
    })
}
