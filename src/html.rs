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
//! Interactive HTML version of the report charts.
use std::{
    fs,
    path::{Path, PathBuf},
};

use plotly::{
    common::{Line, Marker, Mode},
    layout::{GridPattern, LayoutGrid},
    Bar, Layout, Plot, Scatter,
};

use crate::{
    experiments::Strategy,
    report::{strategy_color, BarChart, Chart, LineChart, BAR_PANELS},
    ReportConfig, ReportError,
};

/// Height of a single row of panels, in pixels.
const ROW_HEIGHT: usize = 350;

fn color(strategy: Strategy) -> String {
    let (r, g, b) = strategy_color(strategy);
    format!("#{r:02X}{g:02X}{b:02X}")
}

/// Names of the x and y axis of the `i`-th subplot.
fn axes(i: usize) -> (String, String) {
    match i {
        0 => ("x".to_string(), "y".to_string()),
        i => (format!("x{}", i + 1), format!("y{}", i + 1)),
    }
}

fn layout(title: String, rows: usize, columns: usize) -> Layout {
    Layout::new()
        .title(title)
        .grid(
            LayoutGrid::new()
                .rows(rows)
                .columns(columns)
                .pattern(GridPattern::Independent),
        )
        .height(ROW_HEIGHT * rows)
}

fn line_plot(chart: &LineChart) -> Plot {
    let mut plot = Plot::new();
    let (rows, columns) = chart.grid();
    plot.set_layout(layout(
        format!("<b>{}</b> ({})", chart.metric.title(), chart.y_label),
        rows,
        columns,
    ));

    for (i, panel) in chart.panels.iter().enumerate() {
        let (x_axis, y_axis) = axes(i);
        for series in &panel.series {
            let (x, y): (Vec<f64>, Vec<f64>) = series.points.iter().copied().unzip();
            let trace = Scatter::new(x, y)
                .name(format!("{} ({})", series.strategy, panel.traffic))
                .legend_group(&series.strategy.to_string())
                .mode(Mode::Lines)
                .line(Line::new().color(color(series.strategy)))
                .x_axis(&x_axis)
                .y_axis(&y_axis);
            plot.add_trace(trace);
        }
    }
    plot
}

fn bar_plot(chart: &BarChart) -> Plot {
    let mut plot = Plot::new();
    plot.set_layout(layout(
        format!("<b>{}</b>", chart.metric.title()),
        BAR_PANELS,
        1,
    ));

    for (i, panel) in chart.panels.iter().enumerate() {
        let (x_axis, y_axis) = axes(i);
        let traffics: Vec<String> = panel.groups.iter().map(|g| g.traffic.clone()).collect();
        for (s, strategy) in chart.strategies.iter().enumerate() {
            let values: Vec<f64> = panel
                .groups
                .iter()
                .map(|g| g.values.get(s).copied().unwrap_or(0.0))
                .collect();
            let trace = Bar::new(traffics.clone(), values)
                .name(strategy.to_string())
                .legend_group(&strategy.to_string())
                .show_legend(i == 0)
                .marker(Marker::new().color(color(*strategy)))
                .x_axis(&x_axis)
                .y_axis(&y_axis);
            plot.add_trace(trace);
        }
    }
    plot
}

/// Write `chart` as an interactive HTML page to `path`.
pub fn write_chart(chart: &Chart, path: impl AsRef<Path>) -> Result<(), ReportError> {
    let path = path.as_ref();
    let plot = match chart {
        Chart::Line(chart) => line_plot(chart),
        Chart::Bar(chart) => bar_plot(chart),
    };
    fs::write(path, plot.to_html())?;
    log::info!("Wrote {}", path.display());
    Ok(())
}

/// Write all `charts` into `{out_dir}/{fnum}-{n}.{metric}.html`, returning the written paths.
pub fn write_report(
    charts: &[Chart],
    config: &ReportConfig,
) -> Result<Vec<PathBuf>, ReportError> {
    charts
        .iter()
        .map(|chart| {
            let path = config.output_path(chart.metric().file_name("html"));
            write_chart(chart, &path)?;
            Ok(path)
        })
        .collect()
}
