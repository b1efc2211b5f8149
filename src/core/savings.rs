use std::fmt::{Display, Formatter};

use crate::{
    core::{boiler::Boiler, point::AllocatedPoint},
    fmt::FormattedPercentage,
    prelude::*,
    quantity::{
        cost::Cost,
        power::Kilowatts,
        rate::{KilowattHourRate, MegawattHourRate},
    },
};

/// Cost comparison of running the favoured boilers.
///
/// Energy is approximated by the plain sum of the allocated power over the points,
/// regardless of the point duration.
#[must_use]
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Savings {
    /// Absolute electric boiler cost.
    pub total_savings: Cost,

    /// [`Savings::total_cost`] relative to [`Savings::gas_cost`], in percent.
    pub percentage_savings: f64,

    pub electric_cost: Cost,
    pub gas_cost: Cost,

    /// Absolute difference between the gas cost and the absolute electric cost.
    pub total_cost: Cost,
}

impl Savings {
    /// The desired power has already shaped the allocation and does not enter the arithmetic.
    #[instrument(skip_all, fields(n_points = series.len(), desired_power = %desired_power))]
    pub fn calculate(
        series: &[AllocatedPoint],
        gas_rate: KilowattHourRate,
        desired_power: Kilowatts,
    ) -> Self {
        let electric_power: Kilowatts = series.iter().map(|point| point.electric_power).sum();
        let gas_power: Kilowatts = series.iter().map(|point| point.gas_power).sum();

        let electric_megawatt_hours = electric_power.0 / 1000.0;
        let gas_megawatt_hours = gas_power.0 / 1000.0;

        // Zero when no point favours the electric boiler:
        let electric_rate = MegawattHourRate::mean(
            series
                .iter()
                .filter(|point| point.boiler == Boiler::Electric)
                .map(|point| point.combined),
        )
        .unwrap_or(MegawattHourRate(0.0));

        let electric_cost = Cost::from(electric_megawatt_hours * electric_rate.0);
        let gas_cost = Cost::from(gas_megawatt_hours * gas_rate.0 * 1000.0);
        let total_cost = (gas_cost - electric_cost.abs()).abs();
        let percentage_savings =
            if gas_cost == Cost::ZERO { 0.0 } else { total_cost.0 / gas_cost.0 * 100.0 };

        let savings = Self {
            total_savings: electric_cost.abs(),
            percentage_savings,
            electric_cost,
            gas_cost,
            total_cost,
        };
        debug!(?savings, "calculated");
        savings
    }
}

impl Display for Savings {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "Total savings: {}", self.total_savings)?;
        writeln!(f, "Percentage savings: {}", FormattedPercentage(self.percentage_savings))?;
        writeln!(f, "E-boiler cost: {}", self.electric_cost)?;
        writeln!(f, "Gas-boiler cost: {}", self.gas_cost)?;
        write!(f, "Total cost: {}", self.total_cost)
    }
}

#[cfg(test)]
mod tests {
    use approx::assert_abs_diff_eq;
    use itertools::Itertools;

    use super::*;
    use crate::core::{
        allocation::Allocate,
        boiler::Classify,
        point::PricePoint,
        prices::tests::hour,
    };

    fn allocate(
        combined: &[Option<f64>],
        gas_rate: KilowattHourRate,
        desired_power: Kilowatts,
    ) -> Vec<AllocatedPoint> {
        combined
            .iter()
            .zip(0..)
            .map(|(combined, index)| {
                PricePoint::new(hour(index), combined.map(MegawattHourRate), None)
            })
            .classify(gas_rate)
            .allocate(desired_power)
            .collect_vec()
    }

    #[test]
    fn test_calculate() {
        let gas_rate = KilowattHourRate(30_000.0);
        let desired_power = Kilowatts::from(100.0);
        let series =
            allocate(&[Some(10.0), Some(20.0), Some(50.0), None], gas_rate, desired_power);
        let savings = Savings::calculate(&series, gas_rate, desired_power);

        // 0.2 MWh at the mean electric rate of 15 €/MWh:
        assert_abs_diff_eq!(savings.electric_cost.0, 3.0, epsilon = 1e-9);
        // 0.1 MWh × 30000 × 1000:
        assert_abs_diff_eq!(savings.gas_cost.0, 3_000_000.0, epsilon = 1e-9);
        assert_abs_diff_eq!(savings.total_cost.0, 2_999_997.0, epsilon = 1e-9);
        assert_abs_diff_eq!(savings.total_savings.0, 3.0, epsilon = 1e-9);
        assert_abs_diff_eq!(savings.percentage_savings, 99.9999, epsilon = 1e-9);
    }

    #[test]
    fn test_negative_electric_cost() {
        let gas_rate = KilowattHourRate(0.03);
        let desired_power = Kilowatts::from(100.0);
        let series = allocate(&[Some(-40.0), Some(50.0)], gas_rate, desired_power);
        let savings = Savings::calculate(&series, gas_rate, desired_power);

        assert_abs_diff_eq!(savings.electric_cost.0, -4.0, epsilon = 1e-9);
        assert_abs_diff_eq!(savings.gas_cost.0, 3.0, epsilon = 1e-9);
        assert_abs_diff_eq!(savings.total_savings.0, 4.0, epsilon = 1e-9);
        assert_abs_diff_eq!(savings.total_cost.0, 1.0, epsilon = 1e-9);
        assert_abs_diff_eq!(savings.percentage_savings, 100.0 / 3.0, epsilon = 1e-9);
    }

    #[test]
    fn test_no_gas_cost() {
        let gas_rate = KilowattHourRate(30_000.0);
        let desired_power = Kilowatts::from(100.0);
        let series = allocate(&[Some(10.0), None], gas_rate, desired_power);
        let savings = Savings::calculate(&series, gas_rate, desired_power);

        assert_abs_diff_eq!(savings.gas_cost.0, 0.0, epsilon = 1e-9);
        assert_abs_diff_eq!(savings.electric_cost.0, 1.0, epsilon = 1e-9);
        assert_abs_diff_eq!(savings.percentage_savings, 0.0, epsilon = 1e-9);
    }

    #[test]
    fn test_no_electric_points() {
        let gas_rate = KilowattHourRate(0.03);
        let desired_power = Kilowatts::from(50.0);
        let series = allocate(&[Some(10.0), Some(20.0)], gas_rate, desired_power);
        let savings = Savings::calculate(&series, gas_rate, desired_power);

        assert_abs_diff_eq!(savings.electric_cost.0, 0.0, epsilon = 1e-9);
        assert_abs_diff_eq!(savings.gas_cost.0, 3.0, epsilon = 1e-9);
        assert_abs_diff_eq!(savings.total_cost.0, 3.0, epsilon = 1e-9);
        assert_abs_diff_eq!(savings.percentage_savings, 100.0, epsilon = 1e-9);
    }

    #[test]
    fn test_desired_power_only_shapes_allocation() {
        let gas_rate = KilowattHourRate(30_000.0);
        let series = allocate(&[Some(10.0), Some(50.0)], gas_rate, Kilowatts::from(100.0));
        assert_eq!(
            Savings::calculate(&series, gas_rate, Kilowatts::from(100.0)),
            Savings::calculate(&series, gas_rate, Kilowatts::from(1.0)),
        );
    }

    #[test]
    fn test_display() {
        let savings = Savings {
            total_savings: Cost::from(1.0),
            percentage_savings: 12.3456,
            electric_cost: Cost::from(-1.0),
            gas_cost: Cost::from(3.5),
            total_cost: Cost::from(2.5),
        };
        assert_eq!(
            savings.to_string(),
            "Total savings: 1.00 EUR\n\
             Percentage savings: 12.35%\n\
             E-boiler cost: -1.00 EUR\n\
             Gas-boiler cost: 3.50 EUR\n\
             Total cost: 2.50 EUR",
        );
    }
}
