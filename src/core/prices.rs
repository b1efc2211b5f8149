use std::collections::BTreeMap;

use chrono::DateTime;
use chrono_tz::Tz;
use itertools::{Itertools, izip};

use crate::{
    api::price_provider::{ImbalanceFrame, PriceProvider},
    core::{
        interval::Interval,
        point::{Point, PricePoint},
    },
    prelude::*,
    quantity::rate::MegawattHourRate,
};

/// There is nothing to analyse.
#[derive(Copy, Clone, Debug, Eq, PartialEq, derive_more::Display, derive_more::Error)]
pub enum DataUnavailable {
    #[display("the time column was not found in the imbalance prices")]
    MissingTimeAxis,

    #[display("the long and short imbalance price columns were not found")]
    MissingImbalanceColumns,

    #[display("the provider returned no prices")]
    Empty,
}

/// Fetch the day-ahead and imbalance prices and merge them on time.
///
/// # Errors
///
/// [`DataUnavailable`] when the imbalance prices are unusable or there are no prices at all,
/// provider errors are passed through.
#[instrument(skip_all, fields(country_code = country_code, interval = ?interval))]
pub async fn fetch_prices(
    provider: &dyn PriceProvider,
    country_code: &str,
    interval: Interval,
) -> Result<Vec<PricePoint>> {
    let day_ahead = provider.day_ahead_prices(country_code, interval).await?;
    info!(n_points = day_ahead.len(), "fetched day-ahead prices");

    let imbalance = average_imbalance(provider.imbalance_prices(country_code, interval).await?)?;
    info!(n_points = imbalance.len(), "fetched imbalance prices");

    let prices = merge(day_ahead, imbalance);
    if prices.is_empty() {
        return Err(DataUnavailable::Empty.into());
    }
    Ok(prices)
}

/// Average the long and short prices into a single imbalance price per timestamp.
///
/// # Errors
///
/// [`DataUnavailable`] when the time axis or a price column is missing,
/// and a plain error when the columns are not of the same length.
pub fn average_imbalance(frame: ImbalanceFrame) -> Result<Vec<Point<Option<MegawattHourRate>>>> {
    let time = frame.time.ok_or(DataUnavailable::MissingTimeAxis)?;
    let (Some(long), Some(short)) = (frame.long, frame.short) else {
        return Err(DataUnavailable::MissingImbalanceColumns.into());
    };
    ensure!(
        long.len() == time.len() && short.len() == time.len(),
        "misaligned imbalance columns: {} timestamps, {} long and {} short prices",
        time.len(),
        long.len(),
        short.len(),
    );
    Ok(izip!(time, long, short)
        .map(|(time, long, short)| Point::new(time, MegawattHourRate::mean([long, short])))
        .collect())
}

/// Outer join on time: every timestamp present in either series is kept.
///
/// The result is sorted by time. Should a series repeat a timestamp, its first value wins.
pub fn merge(
    day_ahead: Vec<Point<MegawattHourRate>>,
    imbalance: Vec<Point<Option<MegawattHourRate>>>,
) -> Vec<PricePoint> {
    let mut rows: BTreeMap<DateTime<Tz>, (Option<MegawattHourRate>, Option<MegawattHourRate>)> =
        BTreeMap::new();
    for point in day_ahead.into_iter().unique_by(|point| point.time) {
        rows.entry(point.time).or_default().0 = Some(point.value);
    }
    for point in imbalance.into_iter().unique_by(|point| point.time) {
        rows.entry(point.time).or_default().1 = point.value;
    }
    rows.into_iter()
        .map(|(time, (day_ahead, imbalance))| PricePoint::new(time, day_ahead, imbalance))
        .collect()
}
