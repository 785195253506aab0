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
//! Throughput and link utilization reports of routing strategies on an emulated fat-tree.
//!
//! The bwm-ng logs of all experiments are aggregated by [`aggregate::collect`] into a
//! [`ThroughputTable`](throughput::ThroughputTable) and a
//! [`UtilizationTable`](utilization::UtilizationTable). From these, [`report::build_chart`] builds
//! the six comparison charts, which are drawn by [`render::render_report`].

pub mod aggregate;
pub mod cdf;
pub mod config;
pub mod error;
pub mod experiments;
pub mod html;
pub mod observation;
pub mod render;
pub mod report;
pub mod serde_map;
pub mod summary;
pub mod throughput;
pub mod topology;
pub mod util;
pub mod utilization;

#[cfg(test)]
mod test;

pub use config::{ReportArgs, ReportConfig};
pub use error::ReportError;

pub mod prelude {
    pub use super::{
        aggregate::{collect, Aggregates},
        experiments::{Experiment, Strategy},
        report::{build_chart, Chart, Metric},
        ReportConfig, ReportError,
    };
}
