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
//! Run parameters shared by all binaries.
use std::path::{Path, PathBuf};

use clap::Args;
use serde::Serialize;
use strum::IntoEnumIterator;

use crate::{
    experiments::{Experiment, Strategy, DEFAULT_TRAFFICS},
    topology::FatTree,
    util::PathBufExt,
    ReportError,
};

/// Command-line options describing where the experiment data lives and how it was produced.
#[derive(Args, Debug, Clone)]
pub struct ReportArgs {
    /// Switch fanout number.
    #[arg(long, default_value_t = 4, value_parser = parse_fanout)]
    pub k: usize,
    /// Duration (sec) for each iperf traffic generation.
    #[arg(long, default_value_t = 60)]
    pub duration: usize,
    /// Directory containing the experiment data, and where the outputs are stored.
    #[arg(long = "dir")]
    pub out_dir: PathBuf,
    /// Number of iperf flows per host.
    #[arg(long = "fnum", default_value_t = 1)]
    pub flows_per_host: u32,
    /// Field delimiter of the bwm-ng logs.
    #[arg(long, default_value_t = ',')]
    pub delimiter: char,
    /// Comma-separated list of traffic patterns, overriding the default list.
    #[arg(long, value_delimiter = ',')]
    pub traffics: Option<Vec<String>>,
}

fn parse_fanout(s: &str) -> Result<usize, String> {
    match s.parse::<usize>() {
        Ok(k @ (4 | 8)) => Ok(k),
        _ => Err(format!("fanout must be 4 or 8, not {s:?}")),
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct ReportConfig {
    pub topology: FatTree,
    /// Length of the observation window in seconds.
    pub duration: usize,
    pub flows_per_host: u32,
    pub out_dir: PathBuf,
    pub delimiter: u8,
    pub traffics: Vec<String>,
    pub strategies: Vec<Strategy>,
}

impl ReportConfig {
    /// Configuration for the default set of traffic patterns and all strategies.
    pub fn new(
        k: usize,
        duration: usize,
        flows_per_host: u32,
        out_dir: impl Into<PathBuf>,
    ) -> Result<Self, ReportError> {
        Ok(Self {
            topology: FatTree::new(k)?,
            duration,
            flows_per_host,
            out_dir: out_dir.into(),
            delimiter: bwmng_utils::DEFAULT_DELIMITER,
            traffics: DEFAULT_TRAFFICS.iter().map(|t| t.to_string()).collect(),
            strategies: Strategy::iter().collect(),
        })
    }

    pub fn with_traffics(mut self, traffics: impl IntoIterator<Item = impl Into<String>>) -> Self {
        self.traffics = traffics.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_strategies(mut self, strategies: impl IntoIterator<Item = Strategy>) -> Self {
        self.strategies = strategies.into_iter().collect();
        self
    }

    pub fn experiments(&self) -> impl Iterator<Item = Experiment> + '_ {
        crate::experiments::iterate_experiments(&self.traffics, &self.strategies)
    }

    pub fn bwmng_path(&self, experiment: &Experiment) -> PathBuf {
        experiment.bwmng_path(&self.out_dir, self.flows_per_host)
    }

    /// Output file `{out_dir}/{flows_per_host}-{name}`.
    pub fn output_path(&self, name: impl AsRef<str>) -> PathBuf {
        Path::new(&self.out_dir).then(format!("{}-{}", self.flows_per_host, name.as_ref()))
    }
}

impl TryFrom<ReportArgs> for ReportConfig {
    type Error = ReportError;

    fn try_from(args: ReportArgs) -> Result<Self, Self::Error> {
        let delimiter = u8::try_from(args.delimiter)
            .map_err(|_| ReportError::InvalidDelimiter(args.delimiter))?;
        let mut config = Self::new(args.k, args.duration, args.flows_per_host, args.out_dir)?;
        config.delimiter = delimiter;
        if let Some(traffics) = args.traffics {
            config = config.with_traffics(traffics);
        }
        Ok(config)
    }
}
