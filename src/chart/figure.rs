use chrono::{DateTime, FixedOffset};

/// Tick label format of the time axis.
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// Backend-independent chart description.
#[must_use]
#[derive(Clone, Debug, PartialEq)]
pub struct Figure {
    pub title: &'static str,
    pub x_label: &'static str,
    pub y_label: &'static str,

    /// Width and height in pixels.
    pub size: (u32, u32),

    pub traces: Vec<Trace>,
}

#[derive(Clone, Debug, PartialEq)]
pub struct Trace {
    pub label: &'static str,
    pub color: TraceColor,
    pub style: TraceStyle,
    pub points: Vec<(DateTime<FixedOffset>, f64)>,
}

#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum TraceColor {
    Blue,
    Red,
}

#[derive(Copy, Clone, Debug, PartialEq)]
pub enum TraceStyle {
    Line {
        /// Stroke width in pixels.
        width: u32,

        /// From 0 to 1.
        opacity: f64,
    },

    Markers {
        marker: Marker,
        size: u32,

        /// Connect the markers with a line.
        joined: bool,
    },
}

#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum Marker {
    Circle,
    Triangle,
}
