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
//! Draw the report charts as PNG images.
use std::{
    error::Error,
    ops::Range,
    path::{Path, PathBuf},
};

use plotters::{
    prelude::*,
    style::text_anchor::{HPos, Pos, VPos},
};

use crate::{
    experiments::Strategy,
    report::{strategy_color, BarChart, Chart, LegendPosition, LineChart, BAR_PANELS},
    ReportConfig, ReportError,
};

/// Image size of charts with one panel per traffic pattern.
pub const LINE_CHART_SIZE: (u32, u32) = (2000, 3400);
/// Image size of grouped bar charts.
pub const BAR_CHART_SIZE: (u32, u32) = (1200, 1500);

/// Fraction of a group's width covered by its bars.
const BAR_GROUP_WIDTH: f64 = 0.8;
const FONT: &str = "sans-serif";

/// Draw `chart` into the PNG file at `path`.
pub fn render_chart(chart: &Chart, path: impl AsRef<Path>) -> Result<(), ReportError> {
    let path = path.as_ref();
    match chart {
        Chart::Line(chart) => draw_line_chart(chart, path),
        Chart::Bar(chart) => draw_bar_chart(chart, path),
    }
    .map_err(|e| ReportError::Render(format!("{}: {e}", path.display())))?;
    log::info!("Wrote {}", path.display());
    Ok(())
}

/// Draw all `charts` into `{out_dir}/{fnum}-{n}.{metric}.png`, returning the written paths.
pub fn render_report(
    charts: &[Chart],
    config: &ReportConfig,
) -> Result<Vec<PathBuf>, ReportError> {
    charts
        .iter()
        .map(|chart| {
            let path = config.output_path(chart.metric().file_name("png"));
            render_chart(chart, &path)?;
            Ok(path)
        })
        .collect()
}

fn color(strategy: Strategy) -> RGBColor {
    let (r, g, b) = strategy_color(strategy);
    RGBColor(r, g, b)
}

fn label_position(legend: LegendPosition) -> SeriesLabelPosition {
    match legend {
        LegendPosition::UpperLeft => SeriesLabelPosition::UpperLeft,
        LegendPosition::UpperRight => SeriesLabelPosition::UpperRight,
        LegendPosition::LowerRight => SeriesLabelPosition::LowerRight,
    }
}

/// plotters cannot map an empty range.
fn non_empty(range: &Range<f64>) -> Range<f64> {
    if range.end > range.start {
        range.clone()
    } else {
        range.start..range.start + 1.0
    }
}

fn draw_line_chart(chart: &LineChart, path: &Path) -> Result<(), Box<dyn Error>> {
    let root = BitMapBackend::new(path, LINE_CHART_SIZE).into_drawing_area();
    root.fill(&WHITE)?;
    let panels = root.split_evenly(chart.grid());

    for (area, panel) in panels.iter().zip(&chart.panels) {
        let mut ctx = ChartBuilder::on(area)
            .caption(&panel.traffic, (FONT, 24))
            .margin(15)
            .x_label_area_size(40)
            .y_label_area_size(70)
            .build_cartesian_2d(non_empty(&chart.x_range), non_empty(&chart.y_range))?;

        ctx.configure_mesh()
            .x_desc(&chart.x_label)
            .y_desc(&chart.y_label)
            .x_labels(11)
            .y_labels(11)
            .draw()?;

        for series in &panel.series {
            let color = color(series.strategy);
            ctx.draw_series(LineSeries::new(
                series.points.iter().copied(),
                color.stroke_width(2),
            ))?
            .label(series.strategy.to_string())
            .legend(move |(x, y)| {
                PathElement::new(vec![(x, y), (x + 20, y)], color.stroke_width(2))
            });
        }

        ctx.configure_series_labels()
            .position(label_position(chart.legend))
            .background_style(WHITE.mix(0.8))
            .border_style(BLACK)
            .draw()?;
    }

    root.present()?;
    Ok(())
}

fn draw_bar_chart(chart: &BarChart, path: &Path) -> Result<(), Box<dyn Error>> {
    let root = BitMapBackend::new(path, BAR_CHART_SIZE).into_drawing_area();
    root.fill(&WHITE)?;
    let panels = root.split_evenly((BAR_PANELS, 1));
    let bar_width = BAR_GROUP_WIDTH / chart.strategies.len().max(1) as f64;
    let label_style =
        TextStyle::from((FONT, 16).into_font()).pos(Pos::new(HPos::Center, VPos::Top));

    for (area, panel) in panels.iter().zip(&chart.panels) {
        let num_groups = panel.groups.len().max(1) as f64;
        let mut ctx = ChartBuilder::on(area)
            .margin(15)
            .x_label_area_size(30)
            .y_label_area_size(70)
            .build_cartesian_2d(0f64..num_groups, non_empty(&chart.y_range))?;

        // groups are labelled by traffic pattern below
        ctx.configure_mesh()
            .disable_x_mesh()
            .x_label_formatter(&|_| String::new())
            .y_desc(&chart.y_label)
            .y_labels(11)
            .draw()?;

        for (i, strategy) in chart.strategies.iter().enumerate() {
            let color = color(*strategy);
            let offset = (1.0 - BAR_GROUP_WIDTH) / 2.0 + i as f64 * bar_width;
            ctx.draw_series(panel.groups.iter().enumerate().map(|(g, group)| {
                let x0 = g as f64 + offset;
                let value = group.values.get(i).copied().unwrap_or(0.0);
                Rectangle::new([(x0, 0.0), (x0 + bar_width, value)], color.filled())
            }))?
            .label(strategy.to_string())
            .legend(move |(x, y)| Rectangle::new([(x, y - 5), (x + 10, y + 5)], color.filled()));
        }

        for (g, group) in panel.groups.iter().enumerate() {
            let (x, y) = ctx
                .plotting_area()
                .map_coordinate(&(g as f64 + 0.5, chart.y_range.start));
            root.draw(&Text::new(
                group.traffic.clone(),
                (x, y + 5),
                label_style.clone(),
            ))?;
        }

        ctx.configure_series_labels()
            .position(label_position(chart.legend))
            .background_style(WHITE.mix(0.8))
            .border_style(BLACK)
            .draw()?;
    }

    root.present()?;
    Ok(())
}
