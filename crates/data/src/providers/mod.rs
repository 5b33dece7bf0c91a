//! Venue providers implementing [`PositionSource`](crate::PositionSource).

mod hyperliquid;

pub use hyperliquid::{
    DEFAULT_INFO_URL, HyperliquidConfig, HyperliquidProvider, parse_clearinghouse_state,
};
