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
//! Scalar metrics of every experiment, exported as CSV and JSON.
use std::{fs, path::Path};

use bwmng_utils::ping;
use serde::{Deserialize, Serialize};

use crate::{
    aggregate::Aggregates,
    experiments::{Experiment, Strategy, FIRST_PACKETS_FILE, SUCCESSIVE_PACKETS_FILE},
    util::PathBufExt,
    ReportConfig, ReportError,
};

/// Name of the summary file, without the run prefix.
pub const SUMMARY_FILE: &str = "summary.csv";
/// Name of the aggregate dump, without the run prefix.
pub const AGGREGATES_FILE: &str = "aggregates.json";

/// Index of the threshold 0.1 in the bandwidth utilization CDF.
const CDF_AT_0_1: usize = 10;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SummaryRecord {
    pub traffic: String,
    pub strategy: Strategy,
    /// Mbit/s
    pub average_throughput: f64,
    pub normalized_total_throughput: f64,
    pub link_utilization_ratio: f64,
    /// Number of used link directions in the core and aggregation layer.
    pub used_links: usize,
    /// Fraction of link directions with a bandwidth utilization of at most 0.1.
    pub cdf_at_0_1: f64,
    /// Average round-trip time of the first packets, in ms.
    pub first_packet_rtt: Option<f64>,
    /// Average round-trip time of the first packets as reported by ping, in ms.
    pub first_packet_reported_rtt: Option<f64>,
    /// Average round-trip time of the successive packets, in ms.
    pub successive_packet_rtt: Option<f64>,
    /// Average round-trip time of the successive packets as reported by ping, in ms.
    pub successive_packet_reported_rtt: Option<f64>,
}

/// Round-trip times of a ping log, in ms.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct PingRtt {
    /// Mean of the individual echo replies.
    pub packet_mean: Option<f64>,
    /// Mean of the `avg` values of all `rtt` statistics lines.
    pub reported_avg: Option<f64>,
}

/// Round-trip times of a ping log. Both values are `None` if the log does not exist.
pub fn ping_rtt(path: impl AsRef<Path>) -> Result<PingRtt, ReportError> {
    let path = path.as_ref();
    if !path.exists() {
        return Ok(PingRtt::default());
    }
    let lines = ping::read_ping_lines(path)?;
    let reported: Vec<f64> = ping::rtt_summaries(&lines).iter().map(|s| s.avg).collect();
    Ok(PingRtt {
        packet_mean: ping::average(&ping::packet_rtts(&lines)),
        reported_avg: ping::average(&reported),
    })
}

/// Summarize a single experiment.
pub fn summarize_experiment(
    experiment: &Experiment,
    aggregates: &Aggregates,
    config: &ReportConfig,
) -> Result<SummaryRecord, ReportError> {
    let throughput = aggregates.throughput.get(experiment)?;
    let utilization = &aggregates.utilization;
    let cdf = utilization.bandwidth_utilization_cdf(experiment, config.duration)?;
    let data_dir = experiment.data_dir(&config.out_dir, config.flows_per_host);
    let first = ping_rtt(data_dir.clone().then(FIRST_PACKETS_FILE))?;
    let successive = ping_rtt(data_dir.then(SUCCESSIVE_PACKETS_FILE))?;

    let record = SummaryRecord {
        traffic: experiment.traffic.clone(),
        strategy: experiment.strategy,
        average_throughput: throughput.average_throughput(),
        normalized_total_throughput: throughput.normalized_total_throughput,
        link_utilization_ratio: utilization.link_utilization_ratio(experiment)?,
        used_links: utilization.used_link_count(experiment)?,
        cdf_at_0_1: cdf[CDF_AT_0_1],
        first_packet_rtt: first.packet_mean,
        first_packet_reported_rtt: first.reported_avg,
        successive_packet_rtt: successive.packet_mean,
        successive_packet_reported_rtt: successive.reported_avg,
    };
    log::debug!(
        "{experiment}: {} used links, CDF at 0.1: {:.3}",
        record.used_links,
        record.cdf_at_0_1
    );
    Ok(record)
}

/// Summarize all experiments of the configuration.
pub fn summarize(
    aggregates: &Aggregates,
    config: &ReportConfig,
) -> Result<Vec<SummaryRecord>, ReportError> {
    config
        .experiments()
        .map(|exp| summarize_experiment(&exp, aggregates, config))
        .collect()
}

/// Write the summary records as CSV (with header) to `path`.
pub fn write_summary(
    records: &[SummaryRecord],
    path: impl AsRef<Path>,
) -> Result<(), ReportError> {
    let mut csv = csv::WriterBuilder::new().has_headers(true).from_writer(
        fs::OpenOptions::new()
            .write(true)
            .create(true)
            .truncate(true)
            .open(path.as_ref())?,
    );
    for record in records {
        csv.serialize(record)?;
    }
    csv.flush()?;
    log::info!("Wrote {}", path.as_ref().display());
    Ok(())
}

/// Dump both aggregate tables as JSON to `path`.
pub fn write_aggregates(
    aggregates: &Aggregates,
    path: impl AsRef<Path>,
) -> Result<(), ReportError> {
    let file = fs::File::create(path.as_ref())?;
    serde_json::to_writer_pretty(file, aggregates)?;
    log::info!("Wrote {}", path.as_ref().display());
    Ok(())
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::test::{assert_close, observations};

    fn setup(dir: &Path) -> (ReportConfig, Aggregates) {
        let config = ReportConfig::new(4, 2, 1, dir)
            .unwrap()
            .with_traffics(["random1"])
            .with_strategies([Strategy::Ecmp]);
        let exp = Experiment::new("random1", Strategy::Ecmp);
        let obs = observations(&[
            (0, "3001-eth3", 0.0, 250_000, 0),
            (1, "3001-eth3", 0.0, 250_000, 0),
            (0, "1001-eth1", 0.0, 125_000, 60),
        ]);
        let mut aggregates = Aggregates::new();
        aggregates
            .throughput
            .aggregate(&exp, &obs, &config.topology, config.duration);
        aggregates.utilization.aggregate(&exp, &obs, &config.topology);
        (config, aggregates)
    }

    #[test]
    fn summary_records() {
        let dir = tempfile::tempdir().unwrap();
        let (config, aggregates) = setup(dir.path());
        let data_dir = Experiment::new("random1", Strategy::Ecmp).data_dir(dir.path(), 1);
        fs::create_dir_all(&data_dir).unwrap();
        fs::write(
            data_dir.join(FIRST_PACKETS_FILE),
            "PING 10.2.0.1 (10.2.0.1) 56(84) bytes of data.\n\
             64 bytes from 10.2.0.1: icmp_seq=1 ttl=64 time=20.0 ms\n\
             64 bytes from 10.2.0.1: icmp_seq=2 ttl=64 time=10.0 ms\n\
             rtt min/avg/max/mdev = 10.0/14.5/20.0/5.0 ms\n",
        )
        .unwrap();

        let records = summarize(&aggregates, &config).unwrap();
        assert_eq!(records.len(), 1);
        let record = &records[0];
        assert_eq!(record.strategy, Strategy::Ecmp);
        assert_close(record.average_throughput, 2.0);
        assert_close(record.normalized_total_throughput, 4.0 / 320.0);
        assert_close(record.link_utilization_ratio, 0.5);
        assert_eq!(record.used_links, 1);
        // out: 1 Mbit of 20 Mbit, in: nearly idle
        assert_close(record.cdf_at_0_1, 1.0);
        assert_eq!(record.first_packet_rtt, Some(15.0));
        assert_eq!(record.first_packet_reported_rtt, Some(14.5));
        assert_eq!(record.successive_packet_rtt, None);
        assert_eq!(record.successive_packet_reported_rtt, None);
    }

    #[test]
    fn write_csv_and_json() {
        let dir = tempfile::tempdir().unwrap();
        let (config, aggregates) = setup(dir.path());
        let records = summarize(&aggregates, &config).unwrap();

        let csv_path = config.output_path(SUMMARY_FILE);
        write_summary(&records, &csv_path).unwrap();
        let content = fs::read_to_string(&csv_path).unwrap();
        let mut lines = content.lines();
        assert_eq!(
            lines.next(),
            Some(
                "traffic,strategy,average_throughput,normalized_total_throughput,\
                 link_utilization_ratio,used_links,cdf_at_0_1,first_packet_rtt,\
                 first_packet_reported_rtt,successive_packet_rtt,successive_packet_reported_rtt"
            )
        );
        assert!(lines.next().unwrap().starts_with("random1,ECMP,2.0,"));

        let mut rdr = csv::Reader::from_path(&csv_path).unwrap();
        let read: Vec<SummaryRecord> = rdr.deserialize().collect::<Result<_, _>>().unwrap();
        assert_eq!(read, records);

        let json_path = config.output_path(AGGREGATES_FILE);
        write_aggregates(&aggregates, &json_path).unwrap();
        let json: serde_json::Value =
            serde_json::from_str(&fs::read_to_string(&json_path).unwrap()).unwrap();
        let entry = &json["throughput"]["series"][0];
        assert_eq!(entry["key"]["strategy"], "ECMP");
        assert_eq!(
            json["utilization"]["experiments"][0]["val"]["links"][0]["key"]["switch"],
            1001
        );
    }

    #[test]
    fn missing_ping_log() {
        assert_eq!(
            ping_rtt("/nonexistent/first_packets.txt").unwrap(),
            PingRtt::default()
        );
    }

    #[test]
    fn several_ping_runs() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(SUCCESSIVE_PACKETS_FILE);
        fs::write(
            &path,
            "64 bytes from 10.2.0.1: icmp_seq=1 ttl=64 time=4.0 ms\n\
             rtt min/avg/max/mdev = 4.0/4.0/4.0/0.0 ms\n\
             64 bytes from 10.3.0.1: icmp_seq=1 ttl=64 time=1.0 ms\n\
             64 bytes from 10.3.0.1: icmp_seq=2 ttl=64 time=1.0 ms\n\
             rtt min/avg/max/mdev = 1.0/1.0/1.0/0.0 ms\n",
        )
        .unwrap();
        let rtt = ping_rtt(&path).unwrap();
        assert_eq!(rtt.packet_mean, Some(2.0));
        assert_eq!(rtt.reported_avg, Some(2.5));
    }
}
