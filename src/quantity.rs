pub mod cost;
pub mod power;
pub mod rate;

use std::ops::{Div, Mul};

use serde::{Deserialize, Serialize};

#[derive(
    Clone,
    Copy,
    Debug,
    Deserialize,
    PartialEq,
    PartialOrd,
    Serialize,
    derive_more::Add,
    derive_more::AddAssign,
    derive_more::From,
    derive_more::FromStr,
    derive_more::Neg,
    derive_more::Sub,
    derive_more::SubAssign,
    derive_more::Sum,
)]
pub struct Quantity<T, const POWER: isize, const TIME: isize, const COST: isize>(pub T);

impl<const POWER: isize, const TIME: isize, const COST: isize> Quantity<f64, POWER, TIME, COST> {
    pub const ZERO: Self = Self(0.0);

    #[must_use]
    pub const fn abs(self) -> Self {
        Self(self.0.abs())
    }
}

impl<T, const POWER: isize, const TIME: isize, const COST: isize> Mul<T>
    for Quantity<T, POWER, TIME, COST>
where
    T: Mul<T>,
{
    type Output = Quantity<T::Output, POWER, TIME, COST>;

    fn mul(self, rhs: T) -> Self::Output {
        Quantity(self.0 * rhs)
    }
}

impl<T, const POWER: isize, const TIME: isize, const COST: isize> Div<T>
    for Quantity<T, POWER, TIME, COST>
where
    T: Div<T>,
{
    type Output = Quantity<T::Output, POWER, TIME, COST>;

    fn div(self, rhs: T) -> Self::Output {
        Quantity(self.0 / rhs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    pub type Bare = Quantity<f64, 0, 0, 0>;

    #[test]
    fn test_abs() {
        assert_eq!(Bare::from(-1.5).abs(), Bare::from(1.5));
        assert_eq!(Bare::from(2.0).abs(), Bare::from(2.0));
    }

    #[test]
    fn test_sum() {
        let total: Bare = [Bare::from(1.0), Bare::from(2.0), Bare::ZERO].into_iter().sum();
        assert_eq!(total, Bare::from(3.0));
    }

    #[test]
    fn test_scale() {
        assert_eq!(Bare::from(3.0) * 2.0, Bare::from(6.0));
        assert_eq!(Bare::from(3.0) / 1000.0, Bare::from(0.003));
    }
}
