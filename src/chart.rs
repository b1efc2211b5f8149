pub mod figure;
pub mod frame;
pub mod power;
pub mod price;
pub mod render;

/// The charts are plotted against time, and the frame has none.
#[derive(Copy, Clone, Debug, Eq, PartialEq, derive_more::Display, derive_more::Error)]
#[display("no time field to plot against")]
pub struct MissingTimeField;
