use crate::enums::Side;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// One open exposure in one instrument.
///
/// Only `size` is interpreted. Entry price, PnL and leverage are carried
/// exactly as the venue reported them and are only ever rendered.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Position {
    /// Instrument identifier, unique within a snapshot.
    pub instrument: String,
    /// Signed size; positive is long, negative is short.
    pub size: Decimal,
    /// Average entry price as reported.
    pub entry_price: Option<String>,
    /// Unrealized PnL as reported.
    pub unrealized_pnl: Option<String>,
    /// Leverage as reported.
    pub leverage: Option<String>,
}

impl Position {
    /// Creates a position with no display fields.
    pub fn new(instrument: impl Into<String>, size: Decimal) -> Self {
        Self {
            instrument: instrument.into(),
            size,
            entry_price: None,
            unrealized_pnl: None,
            leverage: None,
        }
    }

    /// Sets the entry price.
    #[must_use]
    pub fn with_entry_price(mut self, entry_price: impl Into<String>) -> Self {
        self.entry_price = Some(entry_price.into());
        self
    }

    /// Sets the unrealized PnL.
    #[must_use]
    pub fn with_unrealized_pnl(mut self, pnl: impl Into<String>) -> Self {
        self.unrealized_pnl = Some(pnl.into());
        self
    }

    /// Sets the leverage.
    #[must_use]
    pub fn with_leverage(mut self, leverage: impl Into<String>) -> Self {
        self.leverage = Some(leverage.into());
        self
    }

    /// Side derived from the size sign, `None` for a zero size.
    #[must_use]
    pub fn side(&self) -> Option<Side> {
        Side::from_size(self.size)
    }

    /// Whether the position has a non-zero size.
    #[must_use]
    pub fn is_open(&self) -> bool {
        !self.size.is_zero()
    }
}
