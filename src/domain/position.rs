//! Position-side value types: the open trade, its live info, and the
//! accumulated-fee snapshot recorded when the trade was opened.

use serde::{Deserialize, Serialize};

use super::decimal::Decimal;
use super::primitives::{Address, BlockNumber, PairIndex, Side};

/// An open trade as recorded by the protocol's trade storage.
///
/// Immutable once opened; supplied externally per query.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Trade {
    pub trader: Address,
    pub pair_index: PairIndex,
    /// Slot index within the trader's per-pair trade slots.
    pub index: u32,
    /// Initial collateral in position-token units.
    pub initial_pos_token: Decimal,
    pub open_price: Decimal,
    pub side: Side,
    pub leverage: Decimal,
    /// Take-profit price.
    pub tp: Decimal,
    /// Stop-loss price.
    pub sl: Decimal,
}

/// Live trade info held alongside the trade itself.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TradeInfo {
    pub being_market_closed: bool,
    /// Price of the position token in collateral units at open time.
    pub token_price_collateral: Decimal,
    /// Leveraged exposure this trade contributes, in collateral units.
    pub open_interest_collateral: Decimal,
    pub tp_last_updated: BlockNumber,
    pub sl_last_updated: BlockNumber,
}

/// Accumulated-fee indices snapshotted when the position opened.
///
/// The engine subtracts these from current/pending indices to isolate the
/// fee accrued strictly after open.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct InitialAccFees {
    /// Block the position was opened at.
    pub block: BlockNumber,
    /// Accumulated rollover index at open.
    pub rollover: Decimal,
    /// Accumulated funding index at open.
    pub funding: Decimal,
    /// Accumulated pair borrowing index at open, for the position's side.
    pub borrowing_pair: Decimal,
    /// Accumulated group borrowing index at open, for the position's side.
    pub borrowing_group: Decimal,
    /// False for positions opened before the fee-model upgrade; such
    /// positions skip the rollover and funding terms entirely.
    pub opened_after_update: bool,
}

/// One open position as returned by a position source: the trade, its info
/// and its initial fee snapshot, fetched together.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PositionEnvelope {
    pub trade: Trade,
    pub trade_info: TradeInfo,
    pub initial_acc_fees: InitialAccFees,
}

impl PositionEnvelope {
    /// Position size in collateral units (notional before leverage).
    pub fn position_collateral(&self) -> Decimal {
        self.trade.initial_pos_token * self.trade_info.token_price_collateral
    }
}
