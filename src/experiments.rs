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
//! Identity of an experiment and the layout of its data on disk.
use std::{
    fmt,
    path::{Path, PathBuf},
};

use itertools::iproduct;
use serde::{Deserialize, Serialize};

use crate::util::PathBufExt;

/// Traffic patterns generated for every strategy, three runs each.
pub const DEFAULT_TRAFFICS: [&str; 27] = [
    "random1",
    "random2",
    "random3",
    "stag1_0.1_0.2",
    "stag2_0.1_0.2",
    "stag3_0.1_0.2",
    "stag1_0.2_0.3",
    "stag2_0.2_0.3",
    "stag3_0.2_0.3",
    "stag1_0.3_0.3",
    "stag2_0.3_0.3",
    "stag3_0.3_0.3",
    "stag1_0.4_0.3",
    "stag2_0.4_0.3",
    "stag3_0.4_0.3",
    "stag1_0.5_0.3",
    "stag2_0.5_0.3",
    "stag3_0.5_0.3",
    "stag1_0.6_0.2",
    "stag2_0.6_0.2",
    "stag3_0.6_0.2",
    "stag1_0.7_0.2",
    "stag2_0.7_0.2",
    "stag3_0.7_0.2",
    "stag1_0.8_0.1",
    "stag2_0.8_0.1",
    "stag3_0.8_0.1",
];

/// Name of the bwm-ng log in every experiment directory.
pub const BWMNG_FILE: &str = "bwmng.txt";
/// Ping output of the first packets of every flow.
pub const FIRST_PACKETS_FILE: &str = "first_packets.txt";
/// Ping output of the packets following the first ones.
pub const SUCCESSIVE_PACKETS_FILE: &str = "successive_packets.txt";

#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Deserialize,
    Serialize,
    strum::Display,
    strum::EnumIter,
    strum_macros::EnumString,
)]
/// Routing strategies evaluated on the fat-tree.
pub enum Strategy {
    BFlows,
    #[serde(rename = "ECMP")]
    #[strum(serialize = "ECMP")]
    Ecmp,
    #[serde(rename = "PureSDN")]
    #[strum(serialize = "PureSDN")]
    PureSdn,
    Hedera,
    /// Baseline: all hosts attached to a single switch.
    NonBlocking,
}

impl Strategy {
    /// Does the strategy run on an actual fat-tree (as opposed to the non-blocking baseline)?
    pub fn is_fat_tree(&self) -> bool {
        !matches!(self, Self::NonBlocking)
    }
}

/// A single experiment: one traffic pattern routed by one strategy.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Deserialize, Serialize)]
pub struct Experiment {
    pub traffic: String,
    pub strategy: Strategy,
}

impl Experiment {
    pub fn new(traffic: impl Into<String>, strategy: Strategy) -> Self {
        Self {
            traffic: traffic.into(),
            strategy,
        }
    }

    /// Directory holding the data of this experiment:
    /// `{data_root}/{flows_per_host}/{traffic}/{strategy}`.
    pub fn data_dir(&self, data_root: impl AsRef<Path>, flows_per_host: u32) -> PathBuf {
        data_root
            .as_ref()
            .then(flows_per_host.to_string())
            .then(&self.traffic)
            .then(self.strategy.to_string())
    }

    /// Path to the bwm-ng log of this experiment.
    pub fn bwmng_path(&self, data_root: impl AsRef<Path>, flows_per_host: u32) -> PathBuf {
        self.data_dir(data_root, flows_per_host).then(BWMNG_FILE)
    }
}

impl fmt::Display for Experiment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.traffic, self.strategy)
    }
}

/// All combinations of traffic patterns and strategies, grouped by traffic pattern.
pub fn iterate_experiments<'a>(
    traffics: &'a [String],
    strategies: &'a [Strategy],
) -> impl Iterator<Item = Experiment> + 'a {
    iproduct!(traffics.iter(), strategies.iter())
        .map(|(traffic, strategy)| Experiment::new(traffic.as_str(), *strategy))
}
