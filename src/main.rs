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
//! Aggregate the bwm-ng logs of all experiments and draw the six comparison charts.
use clap::Parser;
use strum::IntoEnumIterator;

use fattree_eval::{
    aggregate, html, render,
    report::{build_chart, Metric},
    util, ReportArgs, ReportConfig,
};

#[derive(Parser, Debug)]
#[command(about, long_about = None)]
struct Args {
    #[command(flatten)]
    report: ReportArgs,
    /// Also write every chart as an interactive HTML page.
    #[arg(long)]
    html: bool,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    util::init_logging();
    let args = Args::parse();
    let config = ReportConfig::try_from(args.report)?;
    log::info!(
        "Evaluating {} traffic patterns on a fat-tree with k = {} ({}s per experiment)",
        config.traffics.len(),
        config.topology.k(),
        config.duration
    );

    let aggregates = aggregate::collect(&config)?;

    // build all charts before writing any of them
    let charts = Metric::iter()
        .map(|metric| build_chart(metric, &aggregates, &config))
        .collect::<Result<Vec<_>, _>>()?;

    render::render_report(&charts, &config)?;
    if args.html {
        html::write_report(&charts, &config)?;
    }

    Ok(())
}
