use chrono::{DateTime, FixedOffset};
use itertools::Itertools;

use crate::{
    chart::{
        MissingTimeField,
        figure::{Figure, Marker, Trace, TraceColor, TraceStyle},
        frame::{Frame, Row},
    },
    core::peaks::find_peaks,
    quantity::power::Kilowatts,
};

const PEAK_DISTANCE: usize = 5;
const PEAK_PROMINENCE: f64 = 1.0;
const MARKER_SIZE: u32 = 6;

/// Peaks and zeros of the power drawn by each boiler.
///
/// The draws are mostly flat, so the plateaus in between are left out.
pub fn build_power_chart(frame: &Frame) -> Result<Figure, MissingTimeField> {
    let time = frame.time()?;
    let mut traces = Vec::with_capacity(4);
    traces.extend(build_traces(time, &frame.rows, |row| row.electric_power, Labels::ELECTRIC));
    traces.extend(build_traces(time, &frame.rows, |row| row.gas_power, Labels::GAS));
    Ok(Figure {
        title: "Boiler Power Delivery - Peaks and Zeros",
        x_label: "Time",
        y_label: "Power (kW)",
        size: (1400, 800),
        traces,
    })
}

struct Labels {
    peaks: &'static str,
    zeros: &'static str,
    color: TraceColor,
}

impl Labels {
    const ELECTRIC: Self =
        Self { peaks: "E-boiler Peaks", zeros: "E-boiler Zeros", color: TraceColor::Blue };
    const GAS: Self =
        Self { peaks: "Gas-boiler Peaks", zeros: "Gas-boiler Zeros", color: TraceColor::Red };
}

fn build_traces(
    time: &[DateTime<FixedOffset>],
    rows: &[Row],
    power: impl Fn(&Row) -> Kilowatts,
    labels: Labels,
) -> [Trace; 2] {
    let series = time.iter().copied().zip(rows.iter().map(power)).collect_vec();
    let signal = series.iter().map(|(_, power)| power.0).collect_vec();
    let peaks = find_peaks(&signal, PEAK_DISTANCE, PEAK_PROMINENCE)
        .into_iter()
        .map(|index| (series[index].0, series[index].1.0))
        .collect();
    let zeros = series
        .iter()
        .filter(|(_, power)| *power == Kilowatts::ZERO)
        .map(|(time, power)| (*time, power.0))
        .collect();
    [
        Trace {
            label: labels.peaks,
            color: labels.color,
            style: TraceStyle::Markers { marker: Marker::Circle, size: MARKER_SIZE, joined: true },
            points: peaks,
        },
        Trace {
            label: labels.zeros,
            color: labels.color,
            style: TraceStyle::Markers {
                marker: Marker::Triangle,
                size: MARKER_SIZE,
                joined: false,
            },
            points: zeros,
        },
    ]
}
