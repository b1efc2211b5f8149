use bon::Builder;
use itertools::Itertools;

use crate::{
    api::price_provider::PriceProvider,
    core::{
        allocation::Allocate,
        boiler::Classify,
        interval::Interval,
        point::AllocatedPoint,
        prices::{DataUnavailable, fetch_prices},
        savings::Savings,
    },
    prelude::*,
    quantity::{power::Kilowatts, rate::KilowattHourRate},
};

/// Single boiler analysis run.
#[derive(Builder)]
pub struct Analysis<'a> {
    provider: &'a dyn PriceProvider,
    country_code: &'a str,
    interval: Interval,
    gas_rate: KilowattHourRate,
    desired_power: Kilowatts,
}

#[must_use]
pub struct Report {
    pub series: Vec<AllocatedPoint>,
    pub savings: Savings,
}

impl Analysis<'_> {
    /// Fetch the prices, pick the cheaper boiler for every point, and sum up the costs.
    ///
    /// Returns [`None`] when there is no data to analyse.
    #[instrument(skip_all, fields(country_code = self.country_code))]
    pub async fn run(self) -> Result<Option<Report>> {
        let prices = match fetch_prices(self.provider, self.country_code, self.interval).await {
            Ok(prices) => prices,
            Err(fetch_error) => {
                let reason = fetch_error.downcast::<DataUnavailable>()?;
                error!(%reason, "no data available");
                return Ok(None);
            }
        };

        let series = prices
            .into_iter()
            .classify(self.gas_rate)
            .allocate(self.desired_power)
            .collect_vec();
        info!(
            n_points = series.len(),
            gas_rate = %self.gas_rate,
            desired_power = %self.desired_power,
            "allocated",
        );

        let savings = Savings::calculate(&series, self.gas_rate, self.desired_power);
        Ok(Some(Report { series, savings }))
    }
}
