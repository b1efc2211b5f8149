use std::fmt::{Display, Formatter};

use crate::quantity::Quantity;

/// Euros.
pub type Cost = Quantity<f64, 0, 0, 1>;

impl Display for Cost {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:.2} EUR", self.0)
    }
}
