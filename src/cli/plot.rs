use std::{fs::File, io::BufReader, path::PathBuf};

use clap::Parser;

use crate::{chart::frame::Frame, cli::chart::ChartArgs, prelude::*};

#[derive(Parser)]
pub struct PlotArgs {
    /// CSV file written by `analyze --export`.
    #[clap(long, env = "INPUT_PATH")]
    input: PathBuf,

    #[clap(flatten)]
    charts: ChartArgs,
}

impl PlotArgs {
    pub fn run(self) -> Result {
        let file = File::open(&self.input)
            .with_context(|| format!("failed to open `{}`", self.input.display()))?;
        let frame = Frame::read_csv(BufReader::new(file))
            .with_context(|| format!("failed to read `{}`", self.input.display()))?;
        info!(n_rows = frame.rows.len(), "loaded");
        ensure!(self.charts.render(&frame) != 0, "no charts were rendered");
        Ok(())
    }
}
