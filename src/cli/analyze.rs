use std::{fs::File, io::BufWriter, path::PathBuf};

use chrono::NaiveDate;
use clap::Parser;

use crate::{
    api::entsoe,
    chart::frame::Frame,
    cli::chart::ChartArgs,
    core::{analysis::Analysis, interval::Interval},
    prelude::*,
    quantity::{power::Kilowatts, rate::KilowattHourRate},
    tables::build_series_table,
};

#[derive(Parser)]
pub struct AnalyzeArgs {
    /// First day of the analysed period.
    #[clap(long, env = "START_DATE", default_value = "2023-01-01")]
    start: NaiveDate,

    /// Day after the analysed period.
    #[clap(long, env = "END_DATE", default_value = "2024-01-01")]
    end: NaiveDate,

    /// Country code (for example, `NL` or `DE_LU`), or a raw EIC area code.
    #[clap(long, env = "COUNTRY_CODE", default_value = "NL")]
    country: String,

    /// Gas price in euro per kilowatt-hour [default: 0.30 / 9.796].
    #[clap(long = "gas-price-per-kwh", env = "GAS_PRICE_PER_KWH")]
    gas_price: Option<KilowattHourRate>,

    /// Constant power delivered by the favoured boiler.
    #[clap(
        long = "desired-power-kilowatts",
        env = "DESIRED_POWER_KILOWATTS",
        default_value = "100"
    )]
    desired_power: Kilowatts,

    /// Write the allocated series to this CSV file.
    #[clap(long, env = "EXPORT_PATH")]
    export: Option<PathBuf>,

    #[clap(flatten)]
    entsoe: EntsoeArgs,

    #[clap(flatten)]
    charts: ChartArgs,
}

#[derive(Parser)]
pub struct EntsoeArgs {
    /// ENTSO-E Transparency Platform security token.
    #[clap(long = "entsoe-token", env = "ENTSOE_API_TOKEN", hide_env_values = true)]
    token: String,

    #[clap(long, env = "ENTSOE_TIMEOUT", default_value = "60s")]
    timeout: humantime::Duration,
}

impl AnalyzeArgs {
    pub async fn run(self) -> Result {
        ensure!(
            self.desired_power >= Kilowatts::ZERO,
            "the desired power must be non-negative, got {}",
            self.desired_power,
        );
        let interval = Interval::try_from_dates(self.start, self.end)?;
        let provider = entsoe::Api::try_new(self.entsoe.token, self.entsoe.timeout.into())?;

        let Some(report) = Analysis::builder()
            .provider(&provider)
            .country_code(&self.country)
            .interval(interval)
            .gas_rate(self.gas_price.unwrap_or(KilowattHourRate::DEFAULT_GAS))
            .desired_power(self.desired_power)
            .build()
            .run()
            .await?
        else {
            return Ok(());
        };

        println!("{}", build_series_table(&report.series));

        let frame = Frame::from(report.series.as_slice());
        self.charts.render(&frame);

        println!("{}", report.savings);

        if let Some(path) = &self.export {
            let file = File::create(path)
                .with_context(|| format!("failed to create `{}`", path.display()))?;
            frame.write_csv(BufWriter::new(file)).context("failed to export the series")?;
            info!(path = %path.display(), n_rows = frame.rows.len(), "exported");
        }
        Ok(())
    }
}
