use chrono::DateTime;
use chrono_tz::Tz;

use crate::{
    core::boiler::Boiler,
    quantity::{power::Kilowatts, rate::MegawattHourRate},
};

/// A time series point.
#[derive(Clone, Copy, Debug, PartialEq, derive_more::Constructor)]
pub struct Point<V> {
    pub time: DateTime<Tz>,
    pub value: V,
}

/// Merged market prices at a single timestamp.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PricePoint {
    pub time: DateTime<Tz>,
    pub day_ahead: Option<MegawattHourRate>,
    pub imbalance: Option<MegawattHourRate>,

    /// Mean of the present day-ahead and imbalance prices, [`None`] when both are missing.
    pub combined: Option<MegawattHourRate>,
}

impl PricePoint {
    pub fn new(
        time: DateTime<Tz>,
        day_ahead: Option<MegawattHourRate>,
        imbalance: Option<MegawattHourRate>,
    ) -> Self {
        let combined = MegawattHourRate::mean([day_ahead, imbalance]);
        Self { time, day_ahead, imbalance, combined }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, derive_more::Deref)]
pub struct ClassifiedPoint {
    #[deref]
    pub price: PricePoint,

    pub boiler: Boiler,
}

#[derive(Clone, Copy, Debug, PartialEq, derive_more::Deref)]
pub struct AllocatedPoint {
    #[deref]
    pub classified: ClassifiedPoint,

    pub electric_power: Kilowatts,
    pub gas_power: Kilowatts,
}
