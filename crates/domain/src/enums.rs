use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Direction of an open position.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Side {
    Long,
    Short,
}

impl Side {
    /// Derives the side from a signed size. Zero has no side.
    #[must_use]
    pub fn from_size(size: Decimal) -> Option<Self> {
        if size.is_sign_positive() && !size.is_zero() {
            Some(Side::Long)
        } else if size.is_sign_negative() && !size.is_zero() {
            Some(Side::Short)
        } else {
            None
        }
    }

    /// Upper-case label used in alerts.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Side::Long => "LONG",
            Side::Short => "SHORT",
        }
    }
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_side_from_size() {
        assert_eq!(Side::from_size(dec!(2)), Some(Side::Long));
        assert_eq!(Side::from_size(dec!(-0.5)), Some(Side::Short));
        assert_eq!(Side::from_size(Decimal::ZERO), None);
        assert_eq!(Side::from_size(dec!(-0.0)), None);
    }

    #[test]
    fn test_side_display() {
        assert_eq!(Side::Long.to_string(), "LONG");
        assert_eq!(Side::Short.to_string(), "SHORT");
    }
}
