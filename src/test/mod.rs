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
//! Shared helpers and end-to-end tests of the whole pipeline on generated logs.

use std::{fmt::Write, fs, path::Path};

use bwmng_utils::Sample;
use strum::IntoEnumIterator;

use crate::{
    observation::Observation, prelude::*, render, summary, throughput::ThroughputTable,
    utilization::UtilizationTable,
};

pub fn assert_close(acq: f64, exp: f64) {
    assert!(
        (acq - exp).abs() <= 1e-9 * exp.abs().max(1.0),
        "expected {exp}, got {acq}"
    );
}

/// A sample with the given outgoing rate and byte counters. All other counters are zero.
pub fn sample(
    timestamp: u64,
    iface: &str,
    bytes_out_rate: f64,
    bytes_out: u64,
    bytes_in: u64,
) -> Sample {
    Sample {
        timestamp,
        iface: iface.to_string(),
        bytes_out_rate,
        bytes_in,
        bytes_out,
    }
}

/// Observations from `(elapsed, iface, bytes_out_rate, bytes_out, bytes_in)`.
pub fn observations(rows: &[(usize, &str, f64, u64, u64)]) -> Vec<Observation> {
    rows.iter()
        .map(|(elapsed, iface, rate, bytes_out, bytes_in)| Observation {
            elapsed: *elapsed,
            iface: iface.parse().unwrap(),
            sample: sample(*elapsed as u64, iface, *rate, *bytes_out, *bytes_in),
        })
        .collect()
}

/// Write a bwm-ng log in CSV output format from `(timestamp, iface, bytes_out, bytes_in)`, with
/// the outgoing rate equal to the outgoing bytes.
fn write_log(path: &Path, rows: &[(u64, &str, u64, u64)]) {
    let mut content = String::new();
    for (ts, iface, bytes_out, bytes_in) in rows {
        writeln!(
            content,
            "{ts},{iface},{bytes_out}.00,{bytes_in}.00,{}.00,{bytes_in},{bytes_out},\
             1.00,1.00,2.00,1,1,0.00,0.00,0,0",
            bytes_out + bytes_in
        )
        .unwrap();
    }
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    fs::write(path, content).unwrap();
}

/// Every strategy delivers 125 kB per second to a single host, and sends 250 kB over one of two
/// core links. The last second (t = 1003) is incomplete.
fn write_experiments(config: &ReportConfig) {
    for exp in config.experiments() {
        let host = match exp.strategy {
            Strategy::NonBlocking => "1001-eth2",
            _ => "3002-eth4",
        };
        let mut rows = Vec::new();
        for ts in 1000..=1003 {
            rows.push((ts, "total", 999_999, 999_999));
            rows.push((ts, "eth0", 999_999, 999_999));
            rows.push((ts, host, 125_000, 0));
            rows.push((ts, "3002-eth1", 125_000, 0));
            rows.push((ts, "1002-eth1", 250_000, 60));
            rows.push((ts, "1003-eth1", 0, 60));
        }
        write_log(&config.bwmng_path(&exp), &rows);
    }
}

fn config(dir: &Path) -> ReportConfig {
    ReportConfig::new(4, 2, 1, dir)
        .unwrap()
        .with_traffics(["random1", "stag1_0.1_0.2"])
}

#[test]
fn full_pipeline() {
    let dir = tempfile::tempdir().unwrap();
    let config = config(dir.path());
    write_experiments(&config);

    let aggregates = collect(&config).unwrap();
    assert_eq!(aggregates.throughput.len(), 10);
    assert_eq!(aggregates.utilization.len(), 10);

    let exp = Experiment::new("random1", Strategy::Ecmp);
    let series = aggregates.throughput.get(&exp).unwrap();
    for t in 0..=2 {
        assert_close(series.realtime_throughput[t], 1.0);
        assert_close(series.realtime_bisection_bw[t], 1.0);
    }
    assert_close(series.total_throughput(), 3.0);
    assert_close(series.normalized_total_throughput, 3.0 / 320.0);
    // core link 1002 is used outwards, link 1003 is idle
    assert_eq!(aggregates.utilization.used_link_count(&exp).unwrap(), 1);
    assert_close(
        aggregates.utilization.link_utilization_ratio(&exp).unwrap(),
        0.25,
    );

    let nb = Experiment::new("stag1_0.1_0.2", Strategy::NonBlocking);
    assert_close(aggregates.throughput.get(&nb).unwrap().total_throughput(), 3.0);

    let charts = Metric::iter()
        .map(|metric| build_chart(metric, &aggregates, &config))
        .collect::<Result<Vec<_>, _>>()
        .unwrap();
    assert_eq!(charts.len(), 6);
    for (chart, metric) in charts.iter().zip(Metric::iter()) {
        assert_eq!(chart.metric(), metric);
        match chart {
            Chart::Line(chart) => assert_eq!(chart.panels.len(), 2),
            Chart::Bar(chart) => assert_eq!(
                chart.panels.iter().map(|p| p.groups.len()).sum::<usize>(),
                2
            ),
        }
    }

    let records = summary::summarize(&aggregates, &config).unwrap();
    assert_eq!(records.len(), 10);
    assert!(records.iter().all(|r| r.first_packet_rtt.is_none()));
}

#[test]
fn render_all_charts() {
    let dir = tempfile::tempdir().unwrap();
    let few = config(&dir.path().join("few"));
    let all = ReportConfig::new(4, 2, 1, dir.path().join("all")).unwrap();

    for (config, bar_panels) in [(few, 2), (all, 3)] {
        write_experiments(&config);
        let aggregates = collect(&config).unwrap();
        let charts = Metric::iter()
            .map(|metric| build_chart(metric, &aggregates, &config))
            .collect::<Result<Vec<_>, _>>()
            .unwrap();
        let Chart::Bar(bar) = &charts[1] else {
            panic!("expected a bar chart")
        };
        assert_eq!(bar.panels.len(), bar_panels);

        let paths = render::render_report(&charts, &config).unwrap();
        assert_eq!(paths.len(), 6);
        for (path, metric) in paths.iter().zip(Metric::iter()) {
            assert_eq!(path, &config.output_path(metric.file_name("png")));
            assert!(fs::metadata(path).unwrap().len() > 0);
        }

        let mut written = fs::read_dir(&config.out_dir)
            .unwrap()
            .map(|entry| entry.unwrap().path())
            .filter(|path| path.extension().is_some_and(|ext| ext == "png"))
            .collect::<Vec<_>>();
        written.sort();
        assert_eq!(written, paths);
    }
}

#[test]
fn missing_log_aborts() {
    let dir = tempfile::tempdir().unwrap();
    let config = config(dir.path());
    write_experiments(&config);
    fs::remove_file(config.bwmng_path(&Experiment::new("stag1_0.1_0.2", Strategy::Hedera)))
        .unwrap();

    assert!(matches!(
        collect(&config),
        Err(ReportError::Log(bwmng_utils::BwmNgError::File { .. }))
    ));
}

#[test]
fn log_with_only_the_last_second() {
    let dir = tempfile::tempdir().unwrap();
    let config = config(dir.path()).with_traffics(["random1"]);
    write_experiments(&config);
    let exp = Experiment::new("random1", Strategy::BFlows);
    write_log(&config.bwmng_path(&exp), &[(1000, "3001-eth3", 1, 1)]);

    let err = collect(&config).unwrap_err();
    assert!(err.to_string().contains("incomplete"), "{err}");
}

#[test]
fn aggregate_single_files() {
    let dir = tempfile::tempdir().unwrap();
    let config = config(dir.path()).with_traffics(["random1"]);
    write_experiments(&config);
    let exp = Experiment::new("random1", Strategy::PureSdn);

    let mut throughput = ThroughputTable::new();
    throughput
        .aggregate_file(&exp, config.bwmng_path(&exp), &config)
        .unwrap();
    let mut utilization = UtilizationTable::new();
    utilization
        .aggregate_file(&exp, config.bwmng_path(&exp), &config)
        .unwrap();

    let aggregates = collect(&config).unwrap();
    assert_eq!(
        throughput.get(&exp).unwrap(),
        aggregates.throughput.get(&exp).unwrap()
    );
    assert_eq!(
        utilization.get(&exp).unwrap(),
        aggregates.utilization.get(&exp).unwrap()
    );
}
