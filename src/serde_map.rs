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
//! Serialize maps with non-string keys (e.g. [`Experiment`](crate::experiments::Experiment)) as
//! a list of `{key, val}` entries, which JSON can represent.
//!
//! NOTE: adapted from <https://github.com/serde-rs/json/issues/456>
use std::collections::{BTreeMap, HashMap};

use itertools::Itertools;
use serde::{Serialize, Serializer};

#[derive(Serialize)]
struct Entry<K, V> {
    key: K,
    val: V,
}

/// Serialize a `HashMap` as a list of entries, sorted by key for a stable output.
pub fn serialize<K: Serialize + Ord, V: Serialize, S: Serializer>(
    map: &HashMap<K, V>,
    serializer: S,
) -> Result<S::Ok, S::Error> {
    serializer.collect_seq(
        map.iter()
            .sorted_by(|a, b| a.0.cmp(b.0))
            .map(|(key, val)| Entry { key, val }),
    )
}

/// Serialize a `BTreeMap` as a list of entries.
pub fn serialize_btree<K: Serialize, V: Serialize, S: Serializer>(
    map: &BTreeMap<K, V>,
    serializer: S,
) -> Result<S::Ok, S::Error> {
    serializer.collect_seq(map.iter().map(|(key, val)| Entry { key, val }))
}
