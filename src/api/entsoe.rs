//! [ENTSO-E Transparency Platform](https://transparency.entsoe.eu) client.

mod area;
mod document;

use std::{collections::BTreeMap, time::Duration};

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use chrono_tz::Tz;
use reqwest::Client;

use self::document::{MarketDocument, acknowledgement};
use crate::{
    api::{
        client,
        price_provider::{ImbalanceFrame, PriceProvider},
    },
    core::{
        interval::{Interval, REFERENCE_TIME_ZONE},
        point::Point,
    },
    prelude::*,
    quantity::rate::MegawattHourRate,
};

const LONG: &str = "A04";
const SHORT: &str = "A05";

pub struct Api {
    client: Client,
    security_token: String,
}

impl Api {
    const URL: &'static str = "https://web-api.tp.entsoe.eu/api";

    pub fn try_new(security_token: String, timeout: Duration) -> Result<Self> {
        ensure!(!security_token.is_empty(), "the ENTSO-E security token is empty");
        Ok(Self { client: client::try_new(timeout)?, security_token })
    }

    /// Request the documents chunk by chunk, for the platform serves at most a year at once.
    #[instrument(skip_all, level = Level::DEBUG, fields(interval = ?interval))]
    async fn query(
        &self,
        parameters: &[(&str, &str)],
        interval: Interval,
    ) -> Result<Vec<MarketDocument>> {
        let mut documents = Vec::new();
        for chunk in interval.split_by_year()? {
            info!(?chunk, "fetching…");
            let response = self
                .client
                .get(Self::URL)
                .query(parameters)
                .query(&[
                    ("periodStart", format_period(chunk.start)),
                    ("periodEnd", format_period(chunk.end)),
                ])
                .query(&[("securityToken", &self.security_token)])
                .send()
                .await
                .map_err(reqwest::Error::without_url)
                .context("failed to call ENTSO-E")?;
            let status = response.status();
            let body = response
                .bytes()
                .await
                .map_err(reqwest::Error::without_url)
                .context("failed to read the response")?;
            if status.is_success() {
                documents.extend(document::decode(&body)?);
            } else {
                // «No matching data» comes with a client error status:
                let document = MarketDocument::from_xml(&String::from_utf8_lossy(&body))
                    .ok()
                    .filter(|document| acknowledgement(std::slice::from_ref(document)).is_some())
                    .with_context(|| format!("ENTSO-E responded with `{status}`"))?;
                documents.push(document);
            }
        }
        Ok(documents)
    }
}

#[async_trait]
impl PriceProvider for Api {
    #[instrument(skip_all, fields(country_code = country_code))]
    async fn day_ahead_prices(
        &self,
        country_code: &str,
        interval: Interval,
    ) -> Result<Vec<Point<MegawattHourRate>>> {
        let area = area::lookup(country_code)?;
        let documents = self
            .query(
                &[
                    ("documentType", "A44"),
                    ("contract_MarketAgreement.type", "A01"),
                    ("in_Domain", area),
                    ("out_Domain", area),
                ],
                interval,
            )
            .await
            .context("failed to fetch the day-ahead prices")?;
        day_ahead_points(&documents, interval)
    }

    #[instrument(skip_all, fields(country_code = country_code))]
    async fn imbalance_prices(
        &self,
        country_code: &str,
        interval: Interval,
    ) -> Result<ImbalanceFrame> {
        let area = area::lookup(country_code)?;
        let documents = self
            .query(&[("documentType", "A85"), ("controlArea_Domain", area)], interval)
            .await
            .context("failed to fetch the imbalance prices")?;
        imbalance_frame(&documents, interval)
    }
}

fn format_period(time: DateTime<Tz>) -> String {
    time.with_timezone(&Utc).format("%Y%m%d%H%M").to_string()
}

fn day_ahead_points(
    documents: &[MarketDocument],
    interval: Interval,
) -> Result<Vec<Point<MegawattHourRate>>> {
    if let Some(reason) = acknowledgement(documents) {
        bail!("no day-ahead prices: {reason}");
    }
    let mut points = Vec::new();
    for time_series in documents.iter().flat_map(|document| &document.time_series) {
        for (time, point) in time_series.points()? {
            let time = time.with_timezone(&REFERENCE_TIME_ZONE);
            if let Some(price) = point.price.filter(|_| interval.contains(time)) {
                points.push(Point::new(time, MegawattHourRate(price)));
            }
        }
    }
    Ok(points)
}

/// Pivot the imbalance points on their category.
///
/// A column is only present when the documents contain at least one point of its category.
fn imbalance_frame(documents: &[MarketDocument], interval: Interval) -> Result<ImbalanceFrame> {
    if let Some(reason) = acknowledgement(documents) {
        warn!(%reason, "no imbalance prices");
        return Ok(ImbalanceFrame::default());
    }

    let mut rows: BTreeMap<DateTime<Tz>, (Option<MegawattHourRate>, Option<MegawattHourRate>)> =
        BTreeMap::new();
    let mut has_long = false;
    let mut has_short = false;
    for time_series in documents.iter().flat_map(|document| &document.time_series) {
        for (time, point) in time_series.points()? {
            let time = time.with_timezone(&REFERENCE_TIME_ZONE);
            let Some(amount) = point.imbalance_price.filter(|_| interval.contains(time)) else {
                continue;
            };
            match point.imbalance_category.as_deref() {
                Some(LONG) => {
                    has_long = true;
                    rows.entry(time).or_default().0 = Some(MegawattHourRate(amount));
                }
                Some(SHORT) => {
                    has_short = true;
                    rows.entry(time).or_default().1 = Some(MegawattHourRate(amount));
                }
                category => {
                    debug!(?category, %time, "skipped");
                }
            }
        }
    }

    let (time, columns): (Vec<_>, Vec<_>) = rows.into_iter().unzip();
    let (long, short): (Vec<_>, Vec<_>) = columns.into_iter().unzip();
    Ok(ImbalanceFrame {
        time: Some(time),
        long: has_long.then_some(long),
        short: has_short.then_some(short),
    })
}

#[cfg(test)]
mod tests {
    use chrono::{NaiveDate, TimeZone};

    use super::{
        document::{
            decode,
            tests::{ACKNOWLEDGEMENT, DAY_AHEAD, IMBALANCE},
        },
        *,
    };

    fn interval() -> Result<Interval> {
        Interval::try_from_dates(
            NaiveDate::from_ymd_opt(2023, 1, 1).unwrap(),
            NaiveDate::from_ymd_opt(2023, 1, 2).unwrap(),
        )
    }

    #[test]
    fn test_format_period() {
        let time = REFERENCE_TIME_ZONE.with_ymd_and_hms(2023, 1, 1, 0, 0, 0).unwrap();
        assert_eq!(format_period(time), "202212312300");
    }

    #[test]
    fn test_day_ahead_points() -> Result {
        let points = day_ahead_points(&decode(DAY_AHEAD.as_bytes())?, interval()?)?;
        assert_eq!(points.len(), 4);
        assert_eq!(
            points[0].time,
            REFERENCE_TIME_ZONE.with_ymd_and_hms(2023, 1, 1, 0, 0, 0).unwrap()
        );
        assert_eq!(points[0].value, MegawattHourRate(-3.61));
        assert_eq!(points[2].value, MegawattHourRate(-5.0));
        Ok(())
    }

    #[test]
    fn test_day_ahead_points_truncated() -> Result {
        let start = REFERENCE_TIME_ZONE.with_ymd_and_hms(2023, 1, 1, 1, 0, 0).unwrap();
        let end = REFERENCE_TIME_ZONE.with_ymd_and_hms(2023, 1, 1, 3, 0, 0).unwrap();
        let points =
            day_ahead_points(&decode(DAY_AHEAD.as_bytes())?, Interval::new(start, end))?;
        assert_eq!(points.len(), 2);
        assert_eq!(points[0].time, start);
        Ok(())
    }

    #[test]
    fn test_day_ahead_acknowledgement_is_error() -> Result {
        assert!(day_ahead_points(&decode(ACKNOWLEDGEMENT.as_bytes())?, interval()?).is_err());
        Ok(())
    }

    #[test]
    fn test_imbalance_frame() -> Result {
        let frame = imbalance_frame(&decode(IMBALANCE.as_bytes())?, interval()?)?;
        let start = REFERENCE_TIME_ZONE.with_ymd_and_hms(2023, 1, 1, 0, 0, 0).unwrap();
        assert_eq!(frame.time, Some(vec![start, start + chrono::TimeDelta::minutes(15)]));
        assert_eq!(
            frame.long,
            Some(vec![Some(MegawattHourRate(100.0)), Some(MegawattHourRate(80.0))])
        );
        assert_eq!(frame.short, Some(vec![Some(MegawattHourRate(120.0)), None]));
        Ok(())
    }

    #[test]
    fn test_imbalance_acknowledgement_has_no_time() -> Result {
        let frame = imbalance_frame(&decode(ACKNOWLEDGEMENT.as_bytes())?, interval()?)?;
        assert_eq!(frame, ImbalanceFrame::default());
        Ok(())
    }

    #[test]
    fn test_imbalance_without_short_column() -> Result {
        let text = IMBALANCE.replace("A05", "A06");
        let frame = imbalance_frame(&decode(text.as_bytes())?, interval()?)?;
        assert!(frame.long.is_some());
        assert_eq!(frame.short, None);
        Ok(())
    }

    #[tokio::test]
    async fn test_request_error_hides_token() -> Result {
        const TOKEN: &str = "secret-entsoe-token";
        let api = Api::try_new(TOKEN.to_string(), Duration::from_millis(1))?;
        let error = api.day_ahead_prices("NL", interval()?).await.unwrap_err();
        let message = format!("{error:#}");
        assert!(message.contains("failed to call ENTSO-E"), "{message}");
        assert!(!message.contains(TOKEN), "{message}");
        assert!(!format!("{error:?}").contains(TOKEN));
        Ok(())
    }

    #[tokio::test]
    #[ignore = "requires ENTSOE_API_TOKEN and network access"]
    async fn test_fetch_online() -> Result {
        let _ = dotenvy::dotenv();
        let api =
            Api::try_new(std::env::var("ENTSOE_API_TOKEN")?, Duration::from_secs(60))?;
        let prices = api.day_ahead_prices("NL", interval()?).await?;
        assert!(!prices.is_empty());
        let frame = api.imbalance_prices("NL", interval()?).await?;
        assert!(frame.time.is_some());
        Ok(())
    }
}
