use std::path::PathBuf;

use clap::Parser;

use crate::{
    chart::{
        frame::Frame,
        power::build_power_chart,
        price::build_price_chart,
        render::render_svg,
    },
    prelude::*,
};

#[derive(Parser)]
pub struct ChartArgs {
    /// Output path of the price chart.
    #[clap(long = "price-chart", env = "PRICE_CHART_PATH", default_value = "price.svg")]
    pub price_path: PathBuf,

    /// Output path of the power chart.
    #[clap(long = "power-chart", env = "POWER_CHART_PATH", default_value = "power.svg")]
    pub power_path: PathBuf,
}

impl ChartArgs {
    /// Render both charts, logging the failures.
    ///
    /// Returns the number of charts rendered.
    pub fn render(&self, frame: &Frame) -> usize {
        let charts = [
            (build_price_chart(frame), &self.price_path),
            (build_power_chart(frame), &self.power_path),
        ];
        let mut n_rendered = 0;
        for (figure, path) in charts {
            match figure.map_err(Error::from).and_then(|figure| render_svg(&figure, path)) {
                Ok(()) => {
                    n_rendered += 1;
                }
                Err(error) => {
                    error!(path = %path.display(), "failed to render the chart: {error:#}");
                }
            }
        }
        n_rendered
    }
}
