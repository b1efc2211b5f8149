use std::fmt::{Display, Formatter};

use serde::{Deserialize, Serialize};

const EURO_PER_CUBIC_METER: f64 = 0.30;
const KILOWATT_HOURS_PER_CUBIC_METER: f64 = 9.796;

/// Euro per kilowatt-hour, the basis of the gas price.
#[derive(
    Copy,
    Clone,
    Debug,
    Deserialize,
    PartialEq,
    PartialOrd,
    Serialize,
    derive_more::From,
    derive_more::FromStr,
)]
pub struct KilowattHourRate(pub f64);

impl KilowattHourRate {
    pub const DEFAULT_GAS: Self = Self(EURO_PER_CUBIC_METER / KILOWATT_HOURS_PER_CUBIC_METER);

    /// Electricity rate below which the electric boiler is cheaper than gas at this rate.
    ///
    /// The rate is divided by 1000, not multiplied.
    #[must_use]
    pub fn decision_threshold(self) -> MegawattHourRate {
        MegawattHourRate(self.0 / 1000.0)
    }
}

impl Display for KilowattHourRate {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:.4} EUR/kWh", self.0)
    }
}

/// Euro per megawatt-hour, the basis of the market electricity prices.
#[derive(
    Copy,
    Clone,
    Debug,
    Deserialize,
    PartialEq,
    PartialOrd,
    Serialize,
    derive_more::Add,
    derive_more::From,
    derive_more::FromStr,
    derive_more::Sum,
)]
pub struct MegawattHourRate(pub f64);

impl MegawattHourRate {
    /// Mean of the present rates, [`None`] when there are none.
    pub fn mean(rates: impl IntoIterator<Item = Option<Self>>) -> Option<Self> {
        let (sum, count) = rates
            .into_iter()
            .flatten()
            .fold((0.0, 0_u32), |(sum, count), rate| (sum + rate.0, count + 1));
        (count != 0).then(|| Self(sum / f64::from(count)))
    }
}

impl Display for MegawattHourRate {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:.2} EUR/MWh", self.0)
    }
}
