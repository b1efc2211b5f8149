mod analyze;
mod chart;
mod plot;

use clap::{Parser, Subcommand};

pub use self::{analyze::AnalyzeArgs, plot::PlotArgs};

#[derive(Parser)]
#[command(author, version, about, propagate_version = true)]
#[must_use]
pub struct Args {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// Main command: fetch the prices, pick the cheaper boiler, and estimate the savings.
    #[clap(name = "analyze")]
    Analyze(Box<AnalyzeArgs>),

    /// Render the charts from a previously exported series.
    #[clap(name = "plot")]
    Plot(PlotArgs),
}
