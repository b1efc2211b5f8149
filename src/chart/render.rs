use std::path::Path;

use chrono::{DateTime, Offset, Utc};
use itertools::{Itertools, MinMaxResult};
use plotters::prelude::*;

use crate::{
    chart::figure::{DATE_FORMAT, Figure, Marker, TraceColor, TraceStyle},
    prelude::*,
};

const FONT: &str = "sans-serif";
const LEGEND_LINE_LENGTH: i32 = 20;

/// Render the figure into an SVG file.
///
/// The time axis is plotted in Unix seconds and labelled in the offset of the earliest point.
/// A figure without points gets empty axes.
#[instrument(skip_all, fields(title = figure.title, path = ?path))]
pub fn render_svg(figure: &Figure, path: &Path) -> Result {
    let points = figure.traces.iter().flat_map(|trace| &trace.points);
    let offset = points
        .clone()
        .min_by_key(|(time, _)| *time)
        .map_or_else(|| Utc.fix(), |(earliest, _)| *earliest.offset());
    if points.clone().next().is_none() {
        warn!("nothing to plot, rendering empty axes");
    }
    let x_range = widen(points.clone().map(|(time, _)| time.timestamp()).minmax(), 3600);
    let y_range = pad(points.map(|(_, value)| *value).minmax_by(f64::total_cmp));

    let root = SVGBackend::new(path, figure.size).into_drawing_area();
    root.fill(&WHITE)?;
    let mut chart = ChartBuilder::on(&root)
        .caption(figure.title, (FONT, 24))
        .margin(16)
        .x_label_area_size(96)
        .y_label_area_size(64)
        .build_cartesian_2d(x_range, y_range)?;

    let format_tick = |seconds: &i64| {
        DateTime::from_timestamp(*seconds, 0)
            .map(|time| time.with_timezone(&offset).format(DATE_FORMAT).to_string())
            .unwrap_or_default()
    };
    chart
        .configure_mesh()
        .x_desc(figure.x_label)
        .y_desc(figure.y_label)
        .x_label_formatter(&format_tick)
        .x_label_style((FONT, 12).into_font().transform(FontTransform::Rotate90))
        .draw()?;

    for trace in &figure.traces {
        let color = match trace.color {
            TraceColor::Blue => BLUE,
            TraceColor::Red => RED,
        };
        let data =
            trace.points.iter().map(|(time, value)| (time.timestamp(), *value)).collect_vec();
        match trace.style {
            TraceStyle::Line { width, opacity } => {
                let style = color.mix(opacity).stroke_width(width);
                chart.draw_series(LineSeries::new(data, style))?.label(trace.label).legend(
                    move |(x, y)| PathElement::new([(x, y), (x + LEGEND_LINE_LENGTH, y)], style),
                );
            }
            TraceStyle::Markers { marker, size, joined } => {
                if joined {
                    let line = LineSeries::new(data.iter().copied(), color.stroke_width(1));
                    chart.draw_series(line)?;
                }
                let style = color.filled();
                match marker {
                    Marker::Circle => {
                        chart
                            .draw_series(data.iter().map(|&point| Circle::new(point, size, style)))?
                            .label(trace.label)
                            .legend(move |point| Circle::new(point, size, style));
                    }
                    Marker::Triangle => {
                        chart
                            .draw_series(
                                data.iter().map(|&point| TriangleMarker::new(point, size, style)),
                            )?
                            .label(trace.label)
                            .legend(move |point| TriangleMarker::new(point, size, style));
                    }
                }
            }
        }
    }

    if !figure.traces.is_empty() {
        chart
            .configure_series_labels()
            .background_style(&WHITE.mix(0.8))
            .border_style(&BLACK)
            .draw()?;
    }
    root.present().with_context(|| format!("failed to write `{}`", path.display()))?;
    info!(n_traces = figure.traces.len(), "rendered");
    Ok(())
}

/// Make sure a single-valued time axis still spans some time.
fn widen(minmax: MinMaxResult<i64>, by: i64) -> std::ops::Range<i64> {
    match minmax {
        MinMaxResult::MinMax(min, max) if min < max => min..max,
        MinMaxResult::MinMax(value, _) | MinMaxResult::OneElement(value) => {
            (value - by)..(value + by)
        }
        MinMaxResult::NoElements => 0..by,
    }
}

/// Pad the value axis by 5% on both sides, or by 1 when flat.
fn pad(minmax: MinMaxResult<f64>) -> std::ops::Range<f64> {
    let (min, max) = match minmax {
        MinMaxResult::NoElements => (0.0, 0.0),
        MinMaxResult::OneElement(value) => (value, value),
        MinMaxResult::MinMax(min, max) => (min, max),
    };
    let padding = if max - min > f64::EPSILON { (max - min) * 0.05 } else { 1.0 };
    (min - padding)..(max + padding)
}
