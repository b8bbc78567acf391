//! Off-chain position valuation engine for a perpetual-style trading
//! protocol.
//!
//! Replicates the protocol's on-chain interest-accrual and price-impact
//! formulas so consumers (front-ends, bots, risk dashboards) can read the
//! real-time economic state of leveraged positions without an on-chain
//! call per position: unrealized PnL, borrowing/funding/rollover/closing
//! fees, and the effective execution spread.
//!
//! The engine is purely computational. Callers supply a position snapshot
//! and a protocol-state snapshot (see [`datasource`] for the collaborator
//! seams that assemble them) and get values back; missing inputs degrade
//! silently per field rather than erroring.
//!
//! This crate mirrors a specific accrual formula set and must be versioned
//! alongside the protocol contracts it tracks.

pub mod config;
pub mod datasource;
pub mod domain;
pub mod engine;
pub mod error;

pub use config::{ConfigError, ValuationConfig};
pub use datasource::{BlockTag, MockSource, PositionSource, SnapshotError, StateSource};
pub use domain::{
    Address, BlockNumber, Decimal, InitialAccFees, PairIndex, PositionEnvelope, ProtocolSnapshot,
    Side, TimestampS, Trade, TradeInfo,
};
pub use engine::{evaluate_position, Pnl, PositionValuation};
pub use error::EngineError;
