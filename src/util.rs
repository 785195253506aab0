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
//! Utility module collection of functions

use std::path::{Path, PathBuf};

/// Configuration file for `log4rs`, looked up in the working directory.
pub const LOG_CONFIG_FILE: &str = "log4rs.yml";

/// Initialize logging from `log4rs.yml` if it exists, and from `RUST_LOG` otherwise.
pub fn init_logging() {
    if Path::new(LOG_CONFIG_FILE).exists() {
        if let Err(e) = log4rs::init_file(LOG_CONFIG_FILE, Default::default()) {
            eprintln!("Cannot initialize logging from {LOG_CONFIG_FILE}: {e}");
        }
    } else {
        // fails only if a logger is already set, e.g., in tests
        let _ = pretty_env_logger::try_init();
    }
}

pub trait PathBufExt: Sized {
    fn then(self, p: impl AsRef<Path>) -> PathBuf;
}

impl PathBufExt for PathBuf {
    fn then(mut self, p: impl AsRef<Path>) -> PathBuf {
        self.push(p);
        self
    }
}

impl PathBufExt for &Path {
    fn then(self, p: impl AsRef<Path>) -> PathBuf {
        let mut path = self.to_path_buf();
        path.push(p);
        path
    }
}
