use std::fmt::{Debug, Display, Formatter};

/// Percentage which is already scaled to 0..=100.
pub struct FormattedPercentage(pub f64);

impl Debug for FormattedPercentage {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        Display::fmt(self, f)
    }
}

impl Display for FormattedPercentage {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:.2}%", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display() {
        assert_eq!(FormattedPercentage(42.0).to_string(), "42.00%");
        assert_eq!(format!("{:?}", FormattedPercentage(0.126)), "0.13%");
    }
}
