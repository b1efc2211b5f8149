//! Transparency Platform market documents.

use std::{
    collections::BTreeMap,
    fmt::{Display, Formatter},
    io::{Cursor, Read},
};

use chrono::{DateTime, NaiveDateTime, TimeDelta, Utc};
use serde::{Deserialize, Deserializer, de};
use zip::ZipArchive;

use crate::prelude::*;

/// Curve type where a missing position repeats the previous one.
const SEQUENTIAL_FIXED_SIZE_BLOCKS: &str = "A03";

/// Decode a response body: either a single XML document, or a ZIP archive of them.
pub fn decode(body: &[u8]) -> Result<Vec<MarketDocument>> {
    if !body.starts_with(b"PK\x03\x04") {
        let text = std::str::from_utf8(body).context("the document is not valid UTF-8")?;
        return Ok(vec![MarketDocument::from_xml(text)?]);
    }
    let mut archive = ZipArchive::new(Cursor::new(body)).context("failed to open the archive")?;
    let mut documents = Vec::with_capacity(archive.len());
    for index in 0..archive.len() {
        let mut file = archive.by_index(index)?;
        let mut text = String::new();
        file.read_to_string(&mut text)
            .with_context(|| format!("failed to read `{}` from the archive", file.name()))?;
        documents.push(MarketDocument::from_xml(&text)?);
    }
    debug!(n_documents = documents.len(), "unpacked");
    Ok(documents)
}

/// The reason of the first acknowledgement, if none of the documents carry any time series.
pub fn acknowledgement(documents: &[MarketDocument]) -> Option<&Reason> {
    if documents.iter().any(|document| !document.time_series.is_empty()) {
        return None;
    }
    documents.iter().find_map(|document| document.reasons.first())
}

/// Publication, balancing, or acknowledgement document.
///
/// Only the parts needed for the prices are deserialized.
#[derive(Debug, Deserialize)]
pub struct MarketDocument {
    #[serde(rename = "TimeSeries", default)]
    pub time_series: Vec<TimeSeries>,

    #[serde(rename = "Reason", default)]
    pub reasons: Vec<Reason>,
}

impl MarketDocument {
    pub fn from_xml(text: &str) -> Result<Self> {
        quick_xml::de::from_str(text).context("failed to deserialize the market document")
    }
}

#[derive(Debug, Deserialize)]
pub struct Reason {
    pub code: String,
    pub text: Option<String>,
}

impl Display for Reason {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match &self.text {
            Some(text) => write!(f, "{text} ({})", self.code),
            None => write!(f, "reason code {}", self.code),
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct TimeSeries {
    #[serde(rename = "curveType")]
    pub curve_type: Option<String>,

    #[serde(rename = "Period", default)]
    pub periods: Vec<Period>,
}

impl TimeSeries {
    /// Points of all the periods along with their start times.
    pub fn points(&self) -> Result<Vec<(DateTime<Utc>, &Point)>> {
        let fill_gaps = self.curve_type.as_deref() == Some(SEQUENTIAL_FIXED_SIZE_BLOCKS);
        let mut points = Vec::new();
        for period in &self.periods {
            points.extend(period.points(fill_gaps)?);
        }
        Ok(points)
    }
}

#[derive(Debug, Deserialize)]
pub struct Period {
    #[serde(rename = "timeInterval")]
    pub time_interval: TimeInterval,

    #[serde(deserialize_with = "deserialize_resolution")]
    pub resolution: TimeDelta,

    #[serde(rename = "Point", default)]
    pub points: Vec<Point>,
}

impl Period {
    fn points(&self, fill_gaps: bool) -> Result<Vec<(DateTime<Utc>, &Point)>> {
        let time_at = |position: usize| -> Result<DateTime<Utc>> {
            let offset = i32::try_from(position.saturating_sub(1))?;
            Ok(self.time_interval.start + self.resolution * offset)
        };
        if !fill_gaps {
            return self
                .points
                .iter()
                .map(|point| -> Result<_> { Ok((time_at(point.position)?, point)) })
                .collect();
        }

        let n_positions = (self.time_interval.end - self.time_interval.start).num_seconds()
            / self.resolution.num_seconds();
        let by_position: BTreeMap<usize, &Point> =
            self.points.iter().map(|point| (point.position, point)).collect();
        let mut last = None;
        let mut points = Vec::new();
        for position in 1..=usize::try_from(n_positions)? {
            if let Some(point) = by_position.get(&position) {
                last = Some(*point);
            }
            if let Some(point) = last {
                points.push((time_at(position)?, point));
            }
        }
        Ok(points)
    }
}

#[derive(Debug, Deserialize)]
pub struct TimeInterval {
    #[serde(deserialize_with = "deserialize_time")]
    pub start: DateTime<Utc>,

    #[serde(deserialize_with = "deserialize_time")]
    pub end: DateTime<Utc>,
}

#[derive(Debug, Deserialize)]
pub struct Point {
    /// One-based.
    pub position: usize,

    /// Day-ahead price in EUR/MWh.
    #[serde(rename = "price.amount")]
    pub price: Option<f64>,

    /// Imbalance price in EUR/MWh.
    #[serde(rename = "imbalance_Price.amount")]
    pub imbalance_price: Option<f64>,

    /// `A04` for long and `A05` for short positions.
    #[serde(rename = "imbalance_Price.category")]
    pub imbalance_category: Option<String>,
}

fn deserialize_time<'de, D: Deserializer<'de>>(deserializer: D) -> Result<DateTime<Utc>, D::Error> {
    let text = String::deserialize(deserializer)?;
    NaiveDateTime::parse_from_str(&text, "%Y-%m-%dT%H:%MZ")
        .map(|time| time.and_utc())
        .map_err(|_| {
            de::Error::invalid_value(de::Unexpected::Str(&text), &"a `%Y-%m-%dT%H:%MZ` time")
        })
}

fn deserialize_resolution<'de, D: Deserializer<'de>>(
    deserializer: D,
) -> Result<TimeDelta, D::Error> {
    let text = String::deserialize(deserializer)?;
    parse_resolution(&text).ok_or_else(|| {
        de::Error::invalid_value(de::Unexpected::Str(&text), &"a positive ISO 8601 duration")
    })
}

/// Parse the resolutions the platform uses: `PTnM`, `PTnH`, and `PnD`.
fn parse_resolution(text: &str) -> Option<TimeDelta> {
    let resolution = if let Some(time) = text.strip_prefix("PT") {
        if let Some(minutes) = time.strip_suffix('M') {
            TimeDelta::try_minutes(minutes.parse().ok()?)?
        } else {
            TimeDelta::try_hours(time.strip_suffix('H')?.parse().ok()?)?
        }
    } else {
        TimeDelta::try_days(text.strip_prefix('P')?.strip_suffix('D')?.parse().ok()?)?
    };
    (resolution > TimeDelta::zero()).then_some(resolution)
}

#[cfg(test)]
pub mod tests {
    use chrono::TimeZone;

    use super::*;

    pub const DAY_AHEAD: &str = r#"<?xml version="1.0" encoding="utf-8"?>
<Publication_MarketDocument xmlns="urn:iec62325.351:tc57wg16:451-3:publicationdocument:7:3">
    <mRID>a1b2c3</mRID>
    <type>A44</type>
    <period.timeInterval>
        <start>2022-12-31T23:00Z</start>
        <end>2023-01-01T03:00Z</end>
    </period.timeInterval>
    <TimeSeries>
        <mRID>1</mRID>
        <businessType>A62</businessType>
        <in_Domain.mRID codingScheme="A01">10YNL----------L</in_Domain.mRID>
        <currency_Unit.name>EUR</currency_Unit.name>
        <price_Measure_Unit.name>MWH</price_Measure_Unit.name>
        <curveType>A03</curveType>
        <Period>
            <timeInterval>
                <start>2022-12-31T23:00Z</start>
                <end>2023-01-01T03:00Z</end>
            </timeInterval>
            <resolution>PT60M</resolution>
            <Point>
                <position>1</position>
                <price.amount>-3.61</price.amount>
            </Point>
            <Point>
                <position>2</position>
                <price.amount>-5.00</price.amount>
            </Point>
            <Point>
                <position>4</position>
                <price.amount>12.5</price.amount>
            </Point>
        </Period>
    </TimeSeries>
</Publication_MarketDocument>"#;

    pub const IMBALANCE: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<Balancing_MarketDocument xmlns="urn:iec62325.351:tc57wg16:451-6:balancingdocument:4:4">
    <mRID>d4e5f6</mRID>
    <type>A85</type>
    <TimeSeries>
        <mRID>1</mRID>
        <businessType>A19</businessType>
        <curveType>A01</curveType>
        <Period>
            <timeInterval>
                <start>2022-12-31T23:00Z</start>
                <end>2022-12-31T23:30Z</end>
            </timeInterval>
            <resolution>PT15M</resolution>
            <Point>
                <position>1</position>
                <imbalance_Price.amount>100.0</imbalance_Price.amount>
                <imbalance_Price.category>A04</imbalance_Price.category>
            </Point>
            <Point>
                <position>2</position>
                <imbalance_Price.amount>80.0</imbalance_Price.amount>
                <imbalance_Price.category>A04</imbalance_Price.category>
            </Point>
        </Period>
    </TimeSeries>
    <TimeSeries>
        <mRID>2</mRID>
        <businessType>A19</businessType>
        <curveType>A01</curveType>
        <Period>
            <timeInterval>
                <start>2022-12-31T23:00Z</start>
                <end>2022-12-31T23:30Z</end>
            </timeInterval>
            <resolution>PT15M</resolution>
            <Point>
                <position>1</position>
                <imbalance_Price.amount>120.0</imbalance_Price.amount>
                <imbalance_Price.category>A05</imbalance_Price.category>
            </Point>
        </Period>
    </TimeSeries>
</Balancing_MarketDocument>"#;

    pub const ACKNOWLEDGEMENT: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<Acknowledgement_MarketDocument xmlns="urn:iec62325.351:tc57wg16:451-1:acknowledgementdocument:7:0">
    <mRID>g7h8i9</mRID>
    <createdDateTime>2024-01-01T00:00:00Z</createdDateTime>
    <Reason>
        <code>999</code>
        <text>No matching data found for Data item Day-ahead Prices</text>
    </Reason>
</Acknowledgement_MarketDocument>"#;

    #[test]
    fn test_parse_resolution() {
        assert_eq!(parse_resolution("PT15M"), Some(TimeDelta::minutes(15)));
        assert_eq!(parse_resolution("PT60M"), Some(TimeDelta::hours(1)));
        assert_eq!(parse_resolution("PT1H"), Some(TimeDelta::hours(1)));
        assert_eq!(parse_resolution("P1D"), Some(TimeDelta::days(1)));
        assert_eq!(parse_resolution("PT0M"), None);
        assert_eq!(parse_resolution("P1Y"), None);
        assert_eq!(parse_resolution("15 minutes"), None);
    }

    #[test]
    fn test_day_ahead_fills_gaps() -> Result {
        let documents = decode(DAY_AHEAD.as_bytes())?;
        assert_eq!(documents.len(), 1);
        let points = documents[0].time_series[0].points()?;
        let start = Utc.with_ymd_and_hms(2022, 12, 31, 23, 0, 0).unwrap();
        let times = points.iter().map(|(time, _)| *time).collect::<Vec<_>>();
        assert_eq!(
            times,
            [
                start,
                start + TimeDelta::hours(1),
                start + TimeDelta::hours(2),
                start + TimeDelta::hours(3),
            ]
        );
        let prices = points.iter().map(|(_, point)| point.price).collect::<Vec<_>>();
        assert_eq!(prices, [Some(-3.61), Some(-5.0), Some(-5.0), Some(12.5)]);
        Ok(())
    }

    #[test]
    fn test_imbalance_categories() -> Result {
        let documents = decode(IMBALANCE.as_bytes())?;
        let time_series = &documents[0].time_series;
        assert_eq!(time_series.len(), 2);

        let long = time_series[0].points()?;
        assert_eq!(long.len(), 2);
        assert_eq!(long[1].0, Utc.with_ymd_and_hms(2022, 12, 31, 23, 15, 0).unwrap());
        assert_eq!(long[1].1.imbalance_price, Some(80.0));
        assert_eq!(long[1].1.imbalance_category.as_deref(), Some("A04"));

        let short = time_series[1].points()?;
        assert_eq!(short.len(), 1);
        assert_eq!(short[0].1.imbalance_category.as_deref(), Some("A05"));
        assert!(acknowledgement(&documents).is_none());
        Ok(())
    }

    #[test]
    fn test_acknowledgement() -> Result {
        let documents = decode(ACKNOWLEDGEMENT.as_bytes())?;
        let reason = acknowledgement(&documents).expect("the acknowledgement should be detected");
        assert_eq!(reason.code, "999");
        assert_eq!(
            reason.to_string(),
            "No matching data found for Data item Day-ahead Prices (999)"
        );
        Ok(())
    }

    #[test]
    fn test_decode_garbage() {
        assert!(decode(b"\xff\xfe").is_err());
    }
}
