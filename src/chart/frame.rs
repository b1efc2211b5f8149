//! Tabular chart input, exportable to CSV and back.

use std::io::{Read, Write};

use chrono::{DateTime, FixedOffset};
use serde::{Deserialize, Serialize};

use crate::{
    chart::MissingTimeField,
    core::{boiler::Boiler, point::AllocatedPoint},
    prelude::*,
    quantity::{power::Kilowatts, rate::MegawattHourRate},
};

const TIME: &str = "Time";
const REQUIRED_COLUMNS: [&str; 4] =
    ["Combined_Price_EUR_per_MWh", "Efficient_Boiler", "E-boiler_Power", "Gas-boiler_Power"];

#[must_use]
#[derive(Clone, Debug, PartialEq)]
pub struct Frame {
    /// Aligned with the rows, [`None`] when the source had no time column.
    pub time: Option<Vec<DateTime<FixedOffset>>>,

    pub rows: Vec<Row>,
}

#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Row {
    pub day_ahead: Option<MegawattHourRate>,
    pub imbalance: Option<MegawattHourRate>,
    pub combined: Option<MegawattHourRate>,
    pub boiler: Boiler,
    pub electric_power: Kilowatts,
    pub gas_power: Kilowatts,
}

#[derive(Deserialize, Serialize)]
struct Record {
    #[serde(rename = "Time")]
    time: Option<DateTime<FixedOffset>>,

    #[serde(rename = "Day-Ahead_Price_EUR_per_MWh")]
    day_ahead: Option<MegawattHourRate>,

    #[serde(rename = "Imbalance_Price_EUR_per_MWh")]
    imbalance: Option<MegawattHourRate>,

    #[serde(rename = "Combined_Price_EUR_per_MWh")]
    combined: Option<MegawattHourRate>,

    #[serde(rename = "Efficient_Boiler")]
    boiler: Boiler,

    #[serde(rename = "E-boiler_Power")]
    electric_power: Kilowatts,

    #[serde(rename = "Gas-boiler_Power")]
    gas_power: Kilowatts,
}

impl From<&[AllocatedPoint]> for Frame {
    fn from(series: &[AllocatedPoint]) -> Self {
        Self {
            time: Some(series.iter().map(|point| point.time.fixed_offset()).collect()),
            rows: series
                .iter()
                .map(|point| Row {
                    day_ahead: point.day_ahead,
                    imbalance: point.imbalance,
                    combined: point.combined,
                    boiler: point.boiler,
                    electric_power: point.electric_power,
                    gas_power: point.gas_power,
                })
                .collect(),
        }
    }
}

impl Frame {
    pub fn time(&self) -> Result<&[DateTime<FixedOffset>], MissingTimeField> {
        self.time.as_deref().ok_or(MissingTimeField)
    }

    /// Read a frame written by [`Frame::write_csv`].
    ///
    /// The time and the separate price columns are optional.
    pub fn read_csv(reader: impl Read) -> Result<Self> {
        let mut reader = csv::Reader::from_reader(reader);
        let headers = reader.headers().context("failed to read the header")?.clone();
        for column in REQUIRED_COLUMNS {
            ensure!(headers.iter().any(|header| header == column), "missing column `{column}`");
        }
        let has_time = headers.iter().any(|header| header == TIME);

        let mut time = Vec::new();
        let mut rows = Vec::new();
        for (index, record) in reader.deserialize::<Record>().enumerate() {
            let record = record.with_context(|| format!("failed to read row #{index}"))?;
            if has_time {
                time.push(record.time.with_context(|| format!("row #{index} has no time"))?);
            }
            rows.push(Row {
                day_ahead: record.day_ahead,
                imbalance: record.imbalance,
                combined: record.combined,
                boiler: record.boiler,
                electric_power: record.electric_power,
                gas_power: record.gas_power,
            });
        }
        debug!(n_rows = rows.len(), has_time, "read");
        Ok(Self { time: has_time.then_some(time), rows })
    }

    pub fn write_csv(&self, writer: impl Write) -> Result {
        let time = self.time()?;
        let mut writer = csv::Writer::from_writer(writer);
        for (time, row) in time.iter().zip(&self.rows) {
            writer.serialize(Record {
                time: Some(*time),
                day_ahead: row.day_ahead,
                imbalance: row.imbalance,
                combined: row.combined,
                boiler: row.boiler,
                electric_power: row.electric_power,
                gas_power: row.gas_power,
            })?;
        }
        writer.flush()?;
        Ok(())
    }
}
