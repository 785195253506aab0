//! Reading the ping outputs (`first_packets.txt` and `successive_packets.txt`) stored next to the
//! bwm-ng logs.

use std::{
    fs,
    io::{BufRead, BufReader},
    path::Path,
};

use serde::{Deserialize, Serialize};

use crate::BwmNgError;

/// Statistics line printed by ping when it terminates.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RttSummary {
    pub min: f64,
    pub avg: f64,
    pub max: f64,
    pub mdev: f64,
}

/// Read a ping log, keeping only the per-packet lines (ending with `ms`) and the final `rtt`
/// statistics lines.
pub fn read_ping_lines(path: impl AsRef<Path>) -> Result<Vec<String>, BwmNgError> {
    let path = path.as_ref();
    let file = fs::File::open(path).map_err(|e| BwmNgError::from(e).in_file(path))?;
    let mut lines = Vec::new();
    for line in BufReader::new(file).lines() {
        let line = line.map_err(|e| BwmNgError::from(e).in_file(path))?;
        if line.starts_with("rtt") || line.trim_end().ends_with("ms") {
            lines.push(line);
        }
    }
    Ok(lines)
}

/// Extract the round-trip times (in ms) of all individual echo replies.
pub fn packet_rtts<S: AsRef<str>>(lines: &[S]) -> Vec<f64> {
    lines
        .iter()
        .filter_map(|line| {
            let (_, rest) = line.as_ref().split_once("time=")?;
            rest.trim_end_matches("ms").trim().parse().ok()
        })
        .collect()
}

/// Parse the `rtt min/avg/max/mdev = a/b/c/d ms` lines.
pub fn rtt_summaries<S: AsRef<str>>(lines: &[S]) -> Vec<RttSummary> {
    lines
        .iter()
        .filter(|line| line.as_ref().starts_with("rtt"))
        .filter_map(|line| {
            let (_, values) = line.as_ref().split_once('=')?;
            let values = values
                .trim()
                .trim_end_matches("ms")
                .trim()
                .split('/')
                .map(|v| v.parse::<f64>().ok())
                .collect::<Option<Vec<_>>>()?;
            match values[..] {
                [min, avg, max, mdev] => Some(RttSummary {
                    min,
                    avg,
                    max,
                    mdev,
                }),
                _ => None,
            }
        })
        .collect()
}

/// Arithmetic mean, `None` for an empty slice.
pub fn average(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        None
    } else {
        Some(values.iter().sum::<f64>() / values.len() as f64)
    }
}
