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
//! The emulated fat-tree and the naming scheme of its switch interfaces.
//!
//! Switches are named by a four-digit id whose leading digit is the layer (`1xxx` core, `2xxx`
//! aggregation, `3xxx` edge). Their interfaces are called `{switch}-eth{port}`. On aggregation
//! and edge switches, ports `1..=k/2` face upwards and ports `k/2+1..=k` face downwards.
use std::{fmt, str::FromStr};

use lazy_static::lazy_static;
use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::{experiments::Strategy, ReportError};

/// Capacity of every link in the emulated network, in Mbit/s.
pub const LINK_CAPACITY_MBPS: f64 = 10.0;

/// The single switch used to emulate an ideal non-blocking network.
pub const NON_BLOCKING_SWITCH: u16 = 1001;

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Layer {
    Core,
    Aggregation,
    Edge,
}

impl Layer {
    fn from_switch(switch: u16) -> Option<Self> {
        match switch / 1000 {
            1 => Some(Self::Core),
            2 => Some(Self::Aggregation),
            3 => Some(Self::Edge),
            _ => None,
        }
    }
}

/// A parsed switch interface name.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Interface {
    pub layer: Layer,
    pub switch: u16,
    pub port: u16,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{0:?} is not a switch interface")]
pub struct InterfaceNameError(pub String);

lazy_static! {
    static ref IFACE_RE: Regex =
        Regex::new(r"^(?P<switch>[1-9][0-9]{3})-eth(?P<port>[0-9]+)$").unwrap();
}

impl FromStr for Interface {
    type Err = InterfaceNameError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let err = || InterfaceNameError(s.to_string());
        let caps = IFACE_RE.captures(s).ok_or_else(err)?;
        let switch: u16 = caps["switch"].parse().map_err(|_| err())?;
        let port: u16 = caps["port"].parse().map_err(|_| err())?;
        let layer = Layer::from_switch(switch).ok_or_else(err)?;
        Ok(Self {
            layer,
            switch,
            port,
        })
    }
}

impl fmt::Display for Interface {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-eth{}", self.switch, self.port)
    }
}

/// A k-ary fat-tree.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct FatTree {
    k: usize,
}

impl FatTree {
    pub fn new(k: usize) -> Result<Self, ReportError> {
        if k < 2 || k % 2 != 0 {
            return Err(ReportError::InvalidFanout(k));
        }
        Ok(Self { k })
    }

    /// Switch fanout
    pub fn k(&self) -> usize {
        self.k
    }

    /// Theoretical full bisection bandwidth in Mbit/s: `k³/4` hosts, each with a 10 Mbit/s link.
    pub fn full_bisection_bw(&self) -> f64 {
        LINK_CAPACITY_MBPS * (self.k.pow(3) / 4) as f64
    }

    /// Is the interface facing downwards (towards the hosts)?
    pub fn is_downlink(&self, iface: &Interface) -> bool {
        iface.port as usize > self.k / 2
    }

    /// Interfaces whose outgoing traffic is counted as delivered throughput of `strategy`: all
    /// ports of the non-blocking switch, or the host-facing ports of the edge layer. Only one
    /// direction of every host link is selected, so nothing is counted twice.
    pub fn carries_bisection_traffic(&self, strategy: Strategy, iface: &Interface) -> bool {
        match strategy {
            Strategy::NonBlocking => iface.switch == NON_BLOCKING_SWITCH,
            Strategy::BFlows | Strategy::Ecmp | Strategy::PureSdn | Strategy::Hedera => {
                iface.layer == Layer::Edge && self.is_downlink(iface)
            }
        }
    }

    /// Interfaces considered for link utilization: all ports of core switches, and the
    /// downward-facing ports of aggregation switches.
    pub fn is_utilization_link(&self, iface: &Interface) -> bool {
        match iface.layer {
            Layer::Core => true,
            Layer::Aggregation => self.is_downlink(iface),
            Layer::Edge => false,
        }
    }
}
