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
//! Throughput delivered to the hosts, per second and accumulated over the experiment.
use std::{collections::HashMap, path::Path};

use serde::Serialize;

use crate::{
    experiments::Experiment,
    observation::{observe, Observation},
    topology::FatTree,
    ReportConfig, ReportError,
};

/// Convert bytes into Mbit.
pub fn bytes_to_mbit(bytes: f64) -> f64 {
    bytes * 8.0 / 1e6
}

/// Throughput of a single experiment. All series are indexed by the elapsed second
/// `0..=duration`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ThroughputSeries {
    /// Sum of the outgoing rates of all selected interfaces, in Mbit/s.
    pub realtime_bisection_bw: Vec<f64>,
    /// Data sent out of all selected interfaces during each second, in Mbit.
    pub realtime_throughput: Vec<f64>,
    /// Prefix sum of `realtime_throughput`, in Mbit.
    pub accumulated_throughput: Vec<f64>,
    /// Accumulated throughput at the end of the experiment, relative to what the full bisection
    /// bandwidth could deliver during the same time.
    pub normalized_total_throughput: f64,
}

impl ThroughputSeries {
    fn new(duration: usize) -> Self {
        Self {
            realtime_bisection_bw: vec![0.0; duration + 1],
            realtime_throughput: vec![0.0; duration + 1],
            accumulated_throughput: vec![0.0; duration + 1],
            normalized_total_throughput: 0.0,
        }
    }

    /// Observation window in seconds.
    pub fn duration(&self) -> usize {
        self.realtime_throughput.len() - 1
    }

    /// Accumulated throughput at the end of the observation window, in Mbit.
    pub fn total_throughput(&self) -> f64 {
        self.accumulated_throughput[self.duration()]
    }

    /// Average throughput over the observation window, in Mbit/s.
    pub fn average_throughput(&self) -> f64 {
        match self.duration() {
            0 => self.total_throughput(),
            d => self.total_throughput() / d as f64,
        }
    }

    fn update_accumulated(&mut self, full_bisection_bw: f64) {
        let mut sum = 0.0;
        for (acc, realtime) in self
            .accumulated_throughput
            .iter_mut()
            .zip(&self.realtime_throughput)
        {
            sum += realtime;
            *acc = sum;
        }
        let utmost_throughput = full_bisection_bw * self.duration() as f64;
        self.normalized_total_throughput = if utmost_throughput > 0.0 {
            self.total_throughput() / utmost_throughput
        } else {
            0.0
        };
    }
}

/// Throughput of all aggregated experiments.
///
/// The table is additive: aggregating a second log for the same experiment adds its values on top
/// of the existing ones. Every log should thus be aggregated exactly once.
#[derive(Debug, Clone, Default, Serialize)]
pub struct ThroughputTable {
    #[serde(serialize_with = "crate::serde_map::serialize")]
    series: HashMap<Experiment, ThroughputSeries>,
}

impl ThroughputTable {
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
        self.aggregate(experiment, &observations, &config.topology, config.duration);
        Ok(())
    }

    /// Add the observations of a single log to the throughput of `experiment`.
    pub fn aggregate(
        &mut self,
        experiment: &Experiment,
        observations: &[Observation],
        topology: &FatTree,
        duration: usize,
    ) {
        let series = self
            .series
            .entry(experiment.clone())
            .or_insert_with(|| ThroughputSeries::new(duration));
        let len = series.realtime_throughput.len();

        let mut selected = 0;
        for obs in observations
            .iter()
            .filter(|obs| topology.carries_bisection_traffic(experiment.strategy, &obs.iface))
            .filter(|obs| obs.elapsed < len)
        {
            series.realtime_bisection_bw[obs.elapsed] += bytes_to_mbit(obs.sample.bytes_out_rate);
            series.realtime_throughput[obs.elapsed] += bytes_to_mbit(obs.sample.bytes_out as f64);
            selected += 1;
        }
        if selected == 0 {
            log::warn!("{experiment}: no samples of host-facing interfaces");
        }

        series.update_accumulated(topology.full_bisection_bw());
        log::debug!(
            "{experiment}: accumulated throughput {:.3} Mbit, normalized {:.4}",
            series.total_throughput(),
            series.normalized_total_throughput
        );
    }

    pub fn get(&self, experiment: &Experiment) -> Result<&ThroughputSeries, ReportError> {
        self.series
            .get(experiment)
            .ok_or_else(|| ReportError::missing(experiment))
    }

    pub fn len(&self) -> usize {
        self.series.len()
    }

    pub fn is_empty(&self) -> bool {
        self.series.is_empty()
    }
}
