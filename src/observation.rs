// FATTREE-EVAL: Throughput and Link Utilization of Routing Strategies on Fat-Tree Networks
// Copyright (C) 2026 The fattree-eval developers
//
// This program is free software: you can redistribute it and/or modify
// it under the terms of the GNU General Public License as published by
// the Free Software Foundation, either version 3 of the License, or
// (at your option) any later version.
//
// This program is distributed in the hope that it will be useful,
// but WITHOUT ANY WARRANTY; without even the implied warranty of
// MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the
// GNU General Public License for more details.
//
// You should have received a copy of the GNU General Public License
// along with this program.  If not, see <http://www.gnu.org/licenses/>.
//! Samples of switch interfaces within the observation window.
use bwmng_utils::Sample;

use crate::topology::Interface;

/// A sample of a switch interface, taken `elapsed` seconds after the first sample of the log.
#[derive(Debug, Clone, PartialEq)]
pub struct Observation {
    pub elapsed: usize,
    pub iface: Interface,
    pub sample: Sample,
}

/// Turn the samples of one log into observations. The first sample of the log marks second 0;
/// samples outside of `[0, duration]` and samples of interfaces that do not belong to a switch
/// (`total`, `lo`, `eth0`, host interfaces, ...) are skipped.
pub fn observe(samples: Vec<Sample>, duration: usize) -> Vec<Observation> {
    let Some(first_second) = samples.first().map(|s| s.timestamp) else {
        return Vec::new();
    };

    samples
        .into_iter()
        .filter_map(|sample| {
            let Some(elapsed) = sample.timestamp.checked_sub(first_second) else {
                log::trace!("Skipping sample before the first second: {sample:?}");
                return None;
            };
            let elapsed = elapsed as usize;
            if elapsed > duration {
                return None;
            }
            let iface = sample.iface.parse().ok()?;
            Some(Observation {
                elapsed,
                iface,
                sample,
            })
        })
        .collect()
}
