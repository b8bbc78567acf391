//! Domain types for the valuation engine.
//!
//! This module provides:
//! - Lossless numeric handling via the Decimal wrapper
//! - Domain primitives: BlockNumber, TimestampS, Address, PairIndex, Side
//! - Position value types (Trade, TradeInfo, InitialAccFees)
//! - The immutable ProtocolSnapshot the engine evaluates against

pub mod decimal;
pub mod position;
pub mod primitives;
pub mod snapshot;

pub use decimal::Decimal;
pub use position::{InitialAccFees, PositionEnvelope, Trade, TradeInfo};
pub use primitives::{Address, BlockNumber, PairIndex, Side, TimestampS};
pub use snapshot::{
    BorrowingGroup, BorrowingPair, LiquidationParams, OiWindows, OiWindowsSettings, OpenInterest,
    PairDepth, PairFee, PairFundingFees, PairGroupCheckpoint, PairOi, PairParams,
    PairRolloverFees, ProtocolSnapshot,
};
