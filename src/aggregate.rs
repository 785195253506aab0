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
//! Aggregation of all experiment logs of a run.
use serde::Serialize;

use crate::{
    experiments::Experiment, observation::observe, throughput::ThroughputTable,
    utilization::UtilizationTable, ReportConfig, ReportError,
};

/// Both aggregate tables of a run.
#[derive(Debug, Clone, Default, Serialize)]
pub struct Aggregates {
    pub throughput: ThroughputTable,
    pub utilization: UtilizationTable,
}

impl Aggregates {
    pub fn new() -> Self {
        Self::default()
    }

    /// Read the bwm-ng log of `experiment` once and feed it into both tables.
    pub fn ingest_file(
        &mut self,
        experiment: &Experiment,
        config: &ReportConfig,
    ) -> Result<(), ReportError> {
        let path = config.bwmng_path(experiment);
        let samples = bwmng_utils::read_samples(&path, config.delimiter)?;
        let num_samples = samples.len();
        let observations = observe(samples, config.duration);
        log::info!(
            "Aggregating {} ({} samples, {} switch observations)",
            path.display(),
            num_samples,
            observations.len()
        );

        self.throughput.aggregate(
            experiment,
            &observations,
            &config.topology,
            config.duration,
        );
        self.utilization
            .aggregate(experiment, &observations, &config.topology);
        Ok(())
    }
}

/// Aggregate the logs of all experiments of the configuration, one after the other. Stops at the
/// first log that cannot be read.
pub fn collect(config: &ReportConfig) -> Result<Aggregates, ReportError> {
    let mut aggregates = Aggregates::new();
    for experiment in config.experiments() {
        aggregates.ingest_file(&experiment, config)?;
    }
    Ok(aggregates)
}
