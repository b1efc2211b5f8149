use crate::{
    chart::{
        MissingTimeField,
        figure::{Figure, Trace, TraceColor, TraceStyle},
        frame::Frame,
    },
    core::boiler::Boiler,
};

const STYLE: TraceStyle = TraceStyle::Line { width: 1, opacity: 0.7 };

/// Combined price over time, split by the favoured boiler.
pub fn build_price_chart(frame: &Frame) -> Result<Figure, MissingTimeField> {
    let time = frame.time()?;
    let trace = |boiler: Boiler, label: &'static str, color: TraceColor| Trace {
        label,
        color,
        style: STYLE,
        points: time
            .iter()
            .zip(&frame.rows)
            .filter(|(_, row)| row.boiler == boiler)
            .filter_map(|(time, row)| Some((*time, row.combined?.0)))
            .collect(),
    };
    Ok(Figure {
        title: "Boiler Price Efficiency Over Time",
        x_label: "Time",
        y_label: "Price EUR per MWh",
        size: (1200, 600),
        traces: vec![
            trace(Boiler::Electric, "E-boiler Price", TraceColor::Blue),
            trace(Boiler::Gas, "Gas-boiler Price", TraceColor::Red),
        ],
    })
}
