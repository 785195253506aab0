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
//! The six comparison charts of a report, as plain data.
//!
//! Building a chart only looks up values in the [`Aggregates`]; drawing it is left to
//! [`render`](crate::render) (PNG) and [`html`](crate::html) (interactive HTML).
use std::ops::Range;

use serde::Serialize;

use crate::{
    aggregate::Aggregates,
    experiments::{Experiment, Strategy},
    utilization::cdf_thresholds,
    ReportConfig, ReportError,
};

/// Maximal number of rows of the per-traffic panel grid.
pub const MAX_GRID_ROWS: usize = 9;
/// Number of panels the traffic patterns are split into for bar charts.
pub const BAR_PANELS: usize = 3;

/// Order in which the strategies are drawn in line charts.
const LINE_ORDER: [Strategy; 5] = [
    Strategy::BFlows,
    Strategy::Ecmp,
    Strategy::PureSdn,
    Strategy::Hedera,
    Strategy::NonBlocking,
];
/// Order of the bars within a group.
const BAR_ORDER: [Strategy; 5] = [
    Strategy::Ecmp,
    Strategy::Hedera,
    Strategy::PureSdn,
    Strategy::BFlows,
    Strategy::NonBlocking,
];

#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    strum::Display,
    strum::EnumIter,
    strum_macros::EnumString,
)]
#[strum(serialize_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum Metric {
    RealtimeThroughput,
    AverageThroughput,
    AccumulatedThroughput,
    NormalizedTotalThroughput,
    LinkUtilizationRatio,
    LinkBandwidthUtilizationRatio,
}

impl Metric {
    /// Number of the chart within the report, starting at 1.
    pub fn number(&self) -> usize {
        match self {
            Self::RealtimeThroughput => 1,
            Self::AverageThroughput => 2,
            Self::AccumulatedThroughput => 3,
            Self::NormalizedTotalThroughput => 4,
            Self::LinkUtilizationRatio => 5,
            Self::LinkBandwidthUtilizationRatio => 6,
        }
    }

    /// File name of the chart without the run prefix, e.g., `1.realtime_throughput.png`.
    pub fn file_name(&self, extension: &str) -> String {
        format!("{}.{}.{}", self.number(), self, extension)
    }

    /// Strategies shown in the chart, in drawing order. Link utilization is only measured on
    /// the fat-tree.
    pub fn strategies(&self) -> Vec<Strategy> {
        match self {
            Self::RealtimeThroughput | Self::AccumulatedThroughput => LINE_ORDER.to_vec(),
            Self::AverageThroughput | Self::NormalizedTotalThroughput => BAR_ORDER.to_vec(),
            Self::LinkUtilizationRatio | Self::LinkBandwidthUtilizationRatio => BAR_ORDER
                .into_iter()
                .filter(Strategy::is_fat_tree)
                .collect(),
        }
    }

    pub fn title(&self) -> &'static str {
        match self {
            Self::RealtimeThroughput => "Realtime throughput",
            Self::AverageThroughput => "Average throughput",
            Self::AccumulatedThroughput => "Accumulated throughput",
            Self::NormalizedTotalThroughput => "Normalized total throughput",
            Self::LinkUtilizationRatio => "Link utilization ratio",
            Self::LinkBandwidthUtilizationRatio => "Link bandwidth utilization ratio",
        }
    }

    fn legend(&self) -> LegendPosition {
        match self {
            Self::AccumulatedThroughput => LegendPosition::UpperLeft,
            Self::LinkUtilizationRatio | Self::LinkBandwidthUtilizationRatio => {
                LegendPosition::LowerRight
            }
            _ => LegendPosition::UpperRight,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum LegendPosition {
    UpperLeft,
    UpperRight,
    LowerRight,
}

/// Color of a strategy in all charts, as RGB.
pub fn strategy_color(strategy: Strategy) -> (u8, u8, u8) {
    match strategy {
        Strategy::BFlows => (255, 0, 0),
        Strategy::Ecmp => (0, 0, 255),
        Strategy::PureSdn => (0, 128, 0),
        Strategy::Hedera => (191, 191, 0),
        Strategy::NonBlocking => (0, 0, 0),
    }
}

/// A line of a single strategy.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Series {
    pub strategy: Strategy,
    pub points: Vec<(f64, f64)>,
}

/// All strategies for a single traffic pattern.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LinePanel {
    pub traffic: String,
    pub series: Vec<Series>,
}

/// One panel per traffic pattern, all sharing the same axes.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LineChart {
    pub metric: Metric,
    pub x_label: String,
    pub y_label: String,
    pub x_range: Range<f64>,
    pub y_range: Range<f64>,
    pub legend: LegendPosition,
    pub panels: Vec<LinePanel>,
}

impl LineChart {
    /// Rows and columns of the panel grid.
    pub fn grid(&self) -> (usize, usize) {
        grid(self.panels.len())
    }
}

/// The bars of all strategies for a single traffic pattern, in [`BarChart::strategies`] order.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BarGroup {
    pub traffic: String,
    pub values: Vec<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BarPanel {
    pub groups: Vec<BarGroup>,
}

/// Grouped bars, with the traffic patterns split over [`BAR_PANELS`] panels.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BarChart {
    pub metric: Metric,
    pub y_label: String,
    pub y_range: Range<f64>,
    pub legend: LegendPosition,
    pub strategies: Vec<Strategy>,
    pub panels: Vec<BarPanel>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum Chart {
    Line(LineChart),
    Bar(BarChart),
}

impl Chart {
    pub fn metric(&self) -> Metric {
        match self {
            Self::Line(c) => c.metric,
            Self::Bar(c) => c.metric,
        }
    }
}

/// Rows and columns to lay out `n` panels: at most [`MAX_GRID_ROWS`] rows, filled row by row.
pub fn grid(n: usize) -> (usize, usize) {
    let rows = n.clamp(1, MAX_GRID_ROWS);
    (rows, n.div_ceil(rows).max(1))
}

/// Build the chart of `metric` from the aggregated data. Fails if an experiment of the
/// configuration was not aggregated.
pub fn build_chart(
    metric: Metric,
    aggregates: &Aggregates,
    config: &ReportConfig,
) -> Result<Chart, ReportError> {
    let duration = config.duration as f64;
    let full_bw = config.topology.full_bisection_bw();
    let throughput = &aggregates.throughput;
    let utilization = &aggregates.utilization;

    let chart = match metric {
        Metric::RealtimeThroughput => Chart::Line(LineChart {
            metric,
            x_label: "Time (s)".to_string(),
            y_label: "Realtime throughput (Mbps)".to_string(),
            x_range: 0.0..duration,
            y_range: 0.0..full_bw,
            legend: metric.legend(),
            panels: line_panels(metric, config, |exp| {
                Ok(seconds(&throughput.get(exp)?.realtime_bisection_bw))
            })?,
        }),
        Metric::AccumulatedThroughput => Chart::Line(LineChart {
            metric,
            x_label: "Time (s)".to_string(),
            y_label: "Accumulated throughput (Mbit)".to_string(),
            x_range: 0.0..duration,
            y_range: 0.0..full_bw * duration,
            legend: metric.legend(),
            panels: line_panels(metric, config, |exp| {
                Ok(seconds(&throughput.get(exp)?.accumulated_throughput))
            })?,
        }),
        Metric::LinkBandwidthUtilizationRatio => {
            let thresholds = cdf_thresholds();
            Chart::Line(LineChart {
                metric,
                x_label: "Link bandwidth utilization".to_string(),
                y_label: "CDF".to_string(),
                x_range: 0.0..1.0,
                y_range: 0.0..1.0,
                legend: metric.legend(),
                panels: line_panels(metric, config, |exp| {
                    let cdf = utilization.bandwidth_utilization_cdf(exp, config.duration)?;
                    log::debug!("{exp}: bandwidth utilization CDF at 0.1: {:.3}", cdf[10]);
                    Ok(thresholds.iter().copied().zip(cdf).collect())
                })?,
            })
        }
        Metric::AverageThroughput => Chart::Bar(BarChart {
            metric,
            y_label: "Average throughput (Mbps)".to_string(),
            y_range: 0.0..full_bw,
            legend: metric.legend(),
            strategies: chart_strategies(metric, config),
            panels: bar_panels(metric, config, |exp| {
                Ok(throughput.get(exp)?.average_throughput())
            })?,
        }),
        Metric::NormalizedTotalThroughput => Chart::Bar(BarChart {
            metric,
            y_label: "Normalized total throughput".to_string(),
            y_range: 0.0..1.0,
            legend: metric.legend(),
            strategies: chart_strategies(metric, config),
            panels: bar_panels(metric, config, |exp| {
                Ok(throughput.get(exp)?.normalized_total_throughput)
            })?,
        }),
        Metric::LinkUtilizationRatio => Chart::Bar(BarChart {
            metric,
            y_label: "Link utilization ratio".to_string(),
            y_range: 0.0..1.0,
            legend: metric.legend(),
            strategies: chart_strategies(metric, config),
            panels: bar_panels(metric, config, |exp| {
                log::debug!("{exp}: {} used links", utilization.used_link_count(exp)?);
                utilization.link_utilization_ratio(exp)
            })?,
        }),
    };
    Ok(chart)
}

/// Points `(second, value)` of a series indexed by the elapsed second.
fn seconds(values: &[f64]) -> Vec<(f64, f64)> {
    values
        .iter()
        .enumerate()
        .map(|(t, v)| (t as f64, *v))
        .collect()
}

/// Strategies of `metric` that are part of the configuration.
fn chart_strategies(metric: Metric, config: &ReportConfig) -> Vec<Strategy> {
    metric
        .strategies()
        .into_iter()
        .filter(|s| config.strategies.contains(s))
        .collect()
}

fn line_panels<F>(
    metric: Metric,
    config: &ReportConfig,
    mut points: F,
) -> Result<Vec<LinePanel>, ReportError>
where
    F: FnMut(&Experiment) -> Result<Vec<(f64, f64)>, ReportError>,
{
    let strategies = chart_strategies(metric, config);
    config
        .traffics
        .iter()
        .map(|traffic| {
            let series = strategies
                .iter()
                .map(|strategy| {
                    Ok(Series {
                        strategy: *strategy,
                        points: points(&Experiment::new(traffic.as_str(), *strategy))?,
                    })
                })
                .collect::<Result<Vec<_>, ReportError>>()?;
            Ok(LinePanel {
                traffic: traffic.clone(),
                series,
            })
        })
        .collect()
}

fn bar_panels<F>(
    metric: Metric,
    config: &ReportConfig,
    mut value: F,
) -> Result<Vec<BarPanel>, ReportError>
where
    F: FnMut(&Experiment) -> Result<f64, ReportError>,
{
    let strategies = chart_strategies(metric, config);
    let groups = config
        .traffics
        .iter()
        .map(|traffic| {
            let values = strategies
                .iter()
                .map(|strategy| value(&Experiment::new(traffic.as_str(), *strategy)))
                .collect::<Result<Vec<_>, ReportError>>()?;
            Ok(BarGroup {
                traffic: traffic.clone(),
                values,
            })
        })
        .collect::<Result<Vec<_>, ReportError>>()?;

    let per_panel = groups.len().div_ceil(BAR_PANELS).max(1);
    Ok(groups
        .chunks(per_panel)
        .map(|groups| BarPanel {
            groups: groups.to_vec(),
        })
        .collect())
}

#[cfg(test)]
mod test {
    use std::str::FromStr;

    use itertools::Itertools;
    use strum::IntoEnumIterator;

    use super::*;
    use crate::test::{assert_close, observations};

    #[test]
    fn metric_file_names() {
        assert_eq!(
            Metric::iter().map(|m| m.file_name("png")).collect_vec(),
            vec![
                "1.realtime_throughput.png",
                "2.average_throughput.png",
                "3.accumulated_throughput.png",
                "4.normalized_total_throughput.png",
                "5.link_utilization_ratio.png",
                "6.link_bandwidth_utilization_ratio.png",
            ]
        );
        assert_eq!(
            Metric::from_str("link_utilization_ratio").unwrap(),
            Metric::LinkUtilizationRatio
        );
        assert!(!Metric::LinkUtilizationRatio
            .strategies()
            .contains(&Strategy::NonBlocking));
    }

    #[test]
    fn panel_grid() {
        assert_eq!(grid(27), (9, 3));
        assert_eq!(grid(28), (9, 4));
        assert_eq!(grid(4), (4, 1));
        assert_eq!(grid(0), (1, 1));
    }

    /// Two traffic patterns, where every strategy delivers `1 Mbit` per second on one host link
    /// and uses one of two core links.
    fn aggregates(config: &ReportConfig) -> Aggregates {
        let mut aggregates = Aggregates::new();
        for exp in config.experiments() {
            let host = match exp.strategy {
                Strategy::NonBlocking => "1001-eth1",
                _ => "3001-eth3",
            };
            let obs = observations(&[
                (0, host, 125_000.0, 125_000, 0),
                (1, host, 125_000.0, 125_000, 0),
                (2, host, 125_000.0, 125_000, 0),
                (0, "1002-eth1", 0.0, 250_000, 0),
                (0, "1003-eth1", 0.0, 0, 60),
            ]);
            aggregates
                .throughput
                .aggregate(&exp, &obs, &config.topology, config.duration);
            aggregates.utilization.aggregate(&exp, &obs, &config.topology);
        }
        aggregates
    }

    fn config() -> ReportConfig {
        ReportConfig::new(4, 2, 1, "/data")
            .unwrap()
            .with_traffics(["random1", "random2"])
    }

    #[test]
    fn line_chart() {
        let config = config();
        let aggregates = aggregates(&config);
        let Chart::Line(chart) =
            build_chart(Metric::AccumulatedThroughput, &aggregates, &config).unwrap()
        else {
            panic!("expected a line chart")
        };
        assert_eq!(chart.y_range, 0.0..320.0);
        assert_eq!(chart.panels.len(), 2);
        assert_eq!(chart.grid(), (2, 1));
        let panel = &chart.panels[1];
        assert_eq!(panel.traffic, "random2");
        assert_eq!(
            panel.series.iter().map(|s| s.strategy).collect_vec(),
            LINE_ORDER.to_vec()
        );
        let points = &panel.series[0].points;
        assert_eq!(points.len(), 3);
        assert_close(points[2].0, 2.0);
        assert_close(points[2].1, 3.0);
    }

    #[test]
    fn cdf_chart() {
        let config = config();
        let aggregates = aggregates(&config);
        let Chart::Line(chart) =
            build_chart(Metric::LinkBandwidthUtilizationRatio, &aggregates, &config).unwrap()
        else {
            panic!("expected a line chart")
        };
        let series = &chart.panels[0].series;
        assert_eq!(series.len(), 4);
        let points = &series[0].points;
        assert_eq!(points.len(), 101);
        assert_eq!(points[100], (1.0, 1.0));
        // 2 Mbit over 2 s on a 10 Mbit/s link: utilization 0.1, the other directions nearly idle
        assert_close(points[5].1, 0.75);
        assert_close(points[50].1, 1.0);
    }

    #[test]
    fn bar_chart() {
        let config = config();
        let aggregates = aggregates(&config);
        let Chart::Bar(chart) =
            build_chart(Metric::AverageThroughput, &aggregates, &config).unwrap()
        else {
            panic!("expected a bar chart")
        };
        assert_eq!(chart.strategies, BAR_ORDER.to_vec());
        assert_eq!(chart.panels.len(), 2);
        assert_eq!(chart.panels[0].groups[0].traffic, "random1");
        for v in &chart.panels[0].groups[0].values {
            assert_close(*v, 1.5);
        }

        let Chart::Bar(chart) =
            build_chart(Metric::LinkUtilizationRatio, &aggregates, &config).unwrap()
        else {
            panic!("expected a bar chart")
        };
        assert_eq!(
            chart.strategies,
            vec![
                Strategy::Ecmp,
                Strategy::Hedera,
                Strategy::PureSdn,
                Strategy::BFlows
            ]
        );
        assert_eq!(chart.metric, Metric::LinkUtilizationRatio);
        assert_eq!(chart.panels[1].groups[0].values, vec![0.25; 4]);
    }

    #[test]
    fn configured_strategies() {
        let config = config().with_strategies([Strategy::NonBlocking, Strategy::Hedera]);
        let aggregates = aggregates(&config);
        let Chart::Bar(chart) =
            build_chart(Metric::AverageThroughput, &aggregates, &config).unwrap()
        else {
            panic!("expected a bar chart")
        };
        assert_eq!(chart.strategies, vec![Strategy::Hedera, Strategy::NonBlocking]);
        assert_eq!(chart.panels[0].groups[0].values.len(), 2);

        let Chart::Bar(chart) =
            build_chart(Metric::LinkUtilizationRatio, &aggregates, &config).unwrap()
        else {
            panic!("expected a bar chart")
        };
        assert_eq!(chart.strategies, vec![Strategy::Hedera]);
        assert_eq!(chart.panels[1].groups[0].values, vec![0.25]);
    }

    #[test]
    fn bar_panels_split_traffics() {
        let config = ReportConfig::new(4, 2, 1, "/data").unwrap();
        let aggregates = aggregates(&config);
        let Chart::Bar(chart) =
            build_chart(Metric::NormalizedTotalThroughput, &aggregates, &config).unwrap()
        else {
            panic!("expected a bar chart")
        };
        assert_eq!(chart.panels.len(), 3);
        assert!(chart.panels.iter().all(|p| p.groups.len() == 9));
        assert_eq!(chart.panels[1].groups[0].traffic, "stag1_0.3_0.3");
    }

    #[test]
    fn missing_data() {
        let config = config();
        let mut aggregates = Aggregates::new();
        let exp = Experiment::new("random1", Strategy::Ecmp);
        aggregates.throughput.aggregate(
            &exp,
            &observations(&[(0, "3001-eth3", 1.0, 1, 0)]),
            &config.topology,
            config.duration,
        );
        for metric in Metric::iter() {
            assert!(matches!(
                build_chart(metric, &aggregates, &config),
                Err(ReportError::MissingExperiment { .. })
            ));
        }
    }
}
