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
//! Utilization of the core and aggregation links.
use std::{
    collections::{BTreeMap, HashMap},
    path::Path,
};

use serde::Serialize;

use crate::{
    cdf,
    experiments::Experiment,
    observation::{observe, Observation},
    throughput::bytes_to_mbit,
    topology::{FatTree, Interface, LINK_CAPACITY_MBPS},
    ReportConfig, ReportError,
};

/// Byte counts that bwm-ng reports for a link without any traffic.
///
/// This is an approximation: an idle link shows either nothing or the keep-alive traffic of the
/// controller (60 bytes per second). A link carrying exactly 60 bytes of payload in every second
/// would be considered unused.
pub const IDLE_BYTE_COUNTS: [u64; 2] = [0, 60];

/// Number of thresholds at which the bandwidth utilization CDF is sampled.
pub const CDF_POINTS: usize = 101;

fn is_idle(bytes: u64) -> bool {
    IDLE_BYTE_COUNTS.contains(&bytes)
}

/// Usage of a single interface during the experiment.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct LinkUsage {
    /// Did any sample show outgoing traffic?
    pub used_out: bool,
    /// Did any sample show incoming traffic?
    pub used_in: bool,
    pub bytes_out_sum: u64,
    pub bytes_in_sum: u64,
}

impl LinkUsage {
    fn add(&mut self, bytes_out: u64, bytes_in: u64) {
        self.used_out |= !is_idle(bytes_out);
        self.used_in |= !is_idle(bytes_in);
        self.bytes_out_sum += bytes_out;
        self.bytes_in_sum += bytes_in;
    }

    /// Number of used directions (0, 1 or 2).
    pub fn used_directions(&self) -> usize {
        self.used_out as usize + self.used_in as usize
    }
}

#[derive(Debug, Clone, Default, Serialize)]
struct LinkTable {
    #[serde(serialize_with = "crate::serde_map::serialize_btree")]
    links: BTreeMap<Interface, LinkUsage>,
}

/// Link usage of all aggregated experiments. Like the
/// [`ThroughputTable`](crate::throughput::ThroughputTable), the table is additive.
#[derive(Debug, Clone, Default, Serialize)]
pub struct UtilizationTable {
    #[serde(serialize_with = "crate::serde_map::serialize")]
    experiments: HashMap<Experiment, LinkTable>,
}

impl UtilizationTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Read the bwm-ng log at `path` and aggregate it into `experiment`.
    pub fn aggregate_file(
        &mut self,
        experiment: &Experiment,
        path: impl AsRef<Path>,
        config: &ReportConfig,
    ) -> Result<(), ReportError> {
        let samples = bwmng_utils::read_samples(path, config.delimiter)?;
        let observations = observe(samples, config.duration);
        self.aggregate(experiment, &observations, &config.topology);
        Ok(())
    }

    /// Add the observations of a single log to the link usage of `experiment`.
    pub fn aggregate(
        &mut self,
        experiment: &Experiment,
        observations: &[Observation],
        topology: &FatTree,
    ) {
        let table = self.experiments.entry(experiment.clone()).or_default();
        for obs in observations
            .iter()
            .filter(|obs| topology.is_utilization_link(&obs.iface))
        {
            table
                .links
                .entry(obs.iface)
                .or_default()
                .add(obs.sample.bytes_out, obs.sample.bytes_in);
        }
        if table.links.is_empty() {
            log::warn!("{experiment}: no samples of core or aggregation links");
        }
    }

    /// Usage of every observed link of `experiment`.
    pub fn get(
        &self,
        experiment: &Experiment,
    ) -> Result<&BTreeMap<Interface, LinkUsage>, ReportError> {
        self.experiments
            .get(experiment)
            .map(|t| &t.links)
            .ok_or_else(|| ReportError::missing(experiment))
    }

    /// Number of used link directions.
    pub fn used_link_count(&self, experiment: &Experiment) -> Result<usize, ReportError> {
        Ok(self
            .get(experiment)?
            .values()
            .map(LinkUsage::used_directions)
            .sum())
    }

    /// Fraction of the observed link directions that carried traffic. Returns 0 if no link was
    /// observed.
    pub fn link_utilization_ratio(&self, experiment: &Experiment) -> Result<f64, ReportError> {
        let links = self.get(experiment)?;
        if links.is_empty() {
            return Ok(0.0);
        }
        Ok(self.used_link_count(experiment)? as f64 / (2 * links.len()) as f64)
    }

    /// Bandwidth utilization of every observed link direction: the data it carried relative to
    /// what it could carry during `duration` seconds, at most 1. An empty window has no capacity
    /// to utilize, so every direction reports 0.
    pub fn bandwidth_utilization(
        &self,
        experiment: &Experiment,
        duration: usize,
    ) -> Result<Vec<f64>, ReportError> {
        let capacity = LINK_CAPACITY_MBPS * duration as f64;
        let ratio = |bytes: u64| {
            if capacity > 0.0 {
                (bytes_to_mbit(bytes as f64) / capacity).min(1.0)
            } else {
                0.0
            }
        };
        Ok(self
            .get(experiment)?
            .values()
            .flat_map(|usage| [ratio(usage.bytes_out_sum), ratio(usage.bytes_in_sum)])
            .collect())
    }

    /// CDF of the [bandwidth utilization](Self::bandwidth_utilization), sampled at the thresholds
    /// `0.00, 0.01, ..., 1.00`.
    pub fn bandwidth_utilization_cdf(
        &self,
        experiment: &Experiment,
        duration: usize,
    ) -> Result<Vec<f64>, ReportError> {
        let values = self.bandwidth_utilization(experiment, duration)?;
        if values.is_empty() {
            log::warn!("{experiment}: no links to compute the bandwidth utilization of");
        }
        Ok(cdf::sample(&values, &cdf_thresholds()))
    }

    pub fn len(&self) -> usize {
        self.experiments.len()
    }

    pub fn is_empty(&self) -> bool {
        self.experiments.is_empty()
    }
}

/// Thresholds `0.00, 0.01, ..., 1.00` of the bandwidth utilization CDF.
pub fn cdf_thresholds() -> Vec<f64> {
    cdf::linspace(0.0, 1.0, CDF_POINTS)
}
