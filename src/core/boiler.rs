use serde::{Deserialize, Serialize};

use crate::{
    core::point::{ClassifiedPoint, PricePoint},
    quantity::rate::{KilowattHourRate, MegawattHourRate},
};

/// The boiler which is cheaper to run at a given price.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash, Deserialize, Serialize, derive_more::Display)]
pub enum Boiler {
    #[display("E-boiler")]
    #[serde(rename = "E-boiler")]
    Electric,

    #[display("Gas-boiler")]
    #[serde(rename = "Gas-boiler")]
    Gas,

    Unknown,
}

impl Boiler {
    #[must_use]
    pub fn classify(combined: Option<MegawattHourRate>, gas_rate: KilowattHourRate) -> Self {
        match combined {
            None => Self::Unknown,
            Some(combined) if combined < gas_rate.decision_threshold() => Self::Electric,
            Some(_) => Self::Gas,
        }
    }
}

impl<T> Classify for T where T: ?Sized {}

pub trait Classify {
    /// Label every point independently with the cheaper boiler.
    fn classify(self, gas_rate: KilowattHourRate) -> impl Iterator<Item = ClassifiedPoint>
    where
        Self: Iterator<Item = PricePoint> + Sized,
    {
        self.map(move |price| ClassifiedPoint {
            boiler: Boiler::classify(price.combined, gas_rate),
            price,
        })
    }
}
