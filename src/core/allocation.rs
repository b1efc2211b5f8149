use crate::{
    core::{
        boiler::Boiler,
        point::{AllocatedPoint, ClassifiedPoint},
    },
    quantity::power::Kilowatts,
};

impl<T> Allocate for T where T: ?Sized {}

pub trait Allocate {
    /// Assign the desired power to the favoured boiler at every point.
    ///
    /// Switching is instantaneous, there is no ramping between points.
    fn allocate(self, desired_power: Kilowatts) -> impl Iterator<Item = AllocatedPoint>
    where
        Self: Iterator<Item = ClassifiedPoint> + Sized,
    {
        self.map(move |classified| {
            let (electric_power, gas_power) = match classified.boiler {
                Boiler::Electric => (desired_power, Kilowatts::ZERO),
                Boiler::Gas => (Kilowatts::ZERO, desired_power),
                Boiler::Unknown => (Kilowatts::ZERO, Kilowatts::ZERO),
            };
            AllocatedPoint { classified, electric_power, gas_power }
        })
    }
}
