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
use bwmng_utils::BwmNgError;

use crate::experiments::{Experiment, Strategy};

#[derive(Debug, thiserror::Error)]
pub enum ReportError {
    #[error("Log Error: {0}")]
    Log(#[from] BwmNgError),
    #[error("IO Error: {0}")]
    Io(#[from] std::io::Error),
    #[error("CSV Error: {0}")]
    Csv(#[from] csv::Error),
    #[error("JSON Error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("Invalid fanout {0}: must be an even number of at least 2")]
    InvalidFanout(usize),
    #[error("Invalid delimiter {0:?}: must be a single byte character")]
    InvalidDelimiter(char),
    #[error("No data aggregated for traffic {traffic} with strategy {strategy}")]
    MissingExperiment { traffic: String, strategy: Strategy },
    #[error("Cannot render chart: {0}")]
    Render(String),
}

impl ReportError {
    pub fn missing(experiment: &Experiment) -> Self {
        Self::MissingExperiment {
            traffic: experiment.traffic.clone(),
            strategy: experiment.strategy,
        }
    }
}
