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
//! Export the scalar metrics of every experiment as CSV, and optionally both aggregate tables as
//! JSON.
use clap::Parser;
use itertools::Itertools;

use fattree_eval::{
    aggregate,
    summary::{self, AGGREGATES_FILE, SUMMARY_FILE},
    util, ReportArgs, ReportConfig,
};

#[derive(Parser, Debug)]
#[command(about, long_about = None)]
struct Args {
    #[command(flatten)]
    report: ReportArgs,
    /// Also dump the aggregated throughput and link usage as JSON.
    #[arg(long)]
    json: bool,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    util::init_logging();
    let args = Args::parse();
    let config = ReportConfig::try_from(args.report)?;

    let aggregates = aggregate::collect(&config)?;
    let records = summary::summarize(&aggregates, &config)?;

    for (traffic, records) in &records.iter().group_by(|r| r.traffic.clone()) {
        let used_links = records
            .map(|r| format!("{}: {}", r.strategy, r.used_links))
            .join(", ");
        log::info!("{traffic}: used links {used_links}");
    }

    summary::write_summary(&records, config.output_path(SUMMARY_FILE))?;
    if args.json {
        summary::write_aggregates(&aggregates, config.output_path(AGGREGATES_FILE))?;
    }

    Ok(())
}
