use async_trait::async_trait;
use chrono::DateTime;
use chrono_tz::Tz;

use crate::{
    core::{interval::Interval, point::Point},
    prelude::*,
    quantity::rate::MegawattHourRate,
};

/// Source of the market price series for a country.
#[async_trait]
pub trait PriceProvider: Sync {
    async fn day_ahead_prices(
        &self,
        country_code: &str,
        interval: Interval,
    ) -> Result<Vec<Point<MegawattHourRate>>>;

    async fn imbalance_prices(&self, country_code: &str, interval: Interval)
    -> Result<ImbalanceFrame>;
}

/// Imbalance prices as reported by a provider.
///
/// The columns, when present, are aligned with the time axis.
#[must_use]
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ImbalanceFrame {
    /// [`None`] when the response carried no time axis at all.
    pub time: Option<Vec<DateTime<Tz>>>,

    /// Price for a long (excess) position.
    pub long: Option<Vec<Option<MegawattHourRate>>>,

    /// Price for a short (deficit) position.
    pub short: Option<Vec<Option<MegawattHourRate>>>,
}
