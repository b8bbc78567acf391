//! Protocol-state snapshot: everything the engine reads about pairs, risk
//! groups, open interest, depth and fee parameters, consistent as of one
//! block. The engine never mutates a snapshot.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use super::decimal::Decimal;
use super::primitives::{BlockNumber, PairIndex, Side, TimestampS};

/// Aggregate open interest for one pair or group, per direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct OpenInterest {
    pub long: Decimal,
    pub short: Decimal,
    /// Protocol cap on either side.
    pub max: Decimal,
}

impl OpenInterest {
    /// OI of the given side.
    pub fn side(&self, side: Side) -> Decimal {
        match side {
            Side::Long => self.long,
            Side::Short => self.short,
        }
    }
}

/// Record of a pair's risk-group assignment fixed at one block, with the
/// indices inherited at that boundary. Appended only when group assignment
/// changes; ordered ascending by block and never mutated after creation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PairGroupCheckpoint {
    pub group_index: usize,
    pub block: BlockNumber,
    /// Group accumulated index at the boundary, per side.
    pub initial_acc_fee_long: Decimal,
    pub initial_acc_fee_short: Decimal,
    /// Group running index as inherited from the previous checkpoint.
    pub prev_group_acc_fee_long: Decimal,
    pub prev_group_acc_fee_short: Decimal,
    /// The pair's own accumulated index at the boundary.
    pub pair_acc_fee_long: Decimal,
    pub pair_acc_fee_short: Decimal,
}

impl PairGroupCheckpoint {
    pub fn initial_acc_fee(&self, side: Side) -> Decimal {
        match side {
            Side::Long => self.initial_acc_fee_long,
            Side::Short => self.initial_acc_fee_short,
        }
    }

    pub fn prev_group_acc_fee(&self, side: Side) -> Decimal {
        match side {
            Side::Long => self.prev_group_acc_fee_long,
            Side::Short => self.prev_group_acc_fee_short,
        }
    }

    pub fn pair_acc_fee(&self, side: Side) -> Decimal {
        match side {
            Side::Long => self.pair_acc_fee_long,
            Side::Short => self.pair_acc_fee_short,
        }
    }
}

/// Per-pair borrowing accrual state.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BorrowingPair {
    pub acc_fee_long: Decimal,
    pub acc_fee_short: Decimal,
    pub fee_per_block: Decimal,
    pub acc_last_updated_block: BlockNumber,
    /// Time-weighted vault-market-cap accumulator at the last index update.
    pub last_acc_block_weighted_market_cap: Decimal,
    /// Group-membership history, block-ascending.
    pub groups: Vec<PairGroupCheckpoint>,
}

/// Per-risk-group borrowing accrual state, pooled across the group's pairs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BorrowingGroup {
    pub oi_long: Decimal,
    pub oi_short: Decimal,
    pub fee_per_block: Decimal,
    pub acc_fee_long: Decimal,
    pub acc_fee_short: Decimal,
    pub acc_last_updated_block: BlockNumber,
    pub last_acc_block_weighted_market_cap: Decimal,
}

/// Pair fee tiers used for the closing fee.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PairFee {
    pub open_fee_p: Decimal,
    pub close_fee_p: Decimal,
    /// Fee share paid to limit-order executors on close.
    pub limit_order_fee_p: Decimal,
}

/// Per-pair rollover/funding rate parameters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PairParams {
    pub rollover_fee_per_block_p: Decimal,
    pub funding_fee_per_block_p: Decimal,
}

/// Pair rollover accrual index state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PairRolloverFees {
    /// Accumulated rollover fee per unit of collateral.
    pub acc_per_collateral: Decimal,
    pub last_update_block: BlockNumber,
}

/// Pair funding accrual index state, per unit of side OI.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PairFundingFees {
    pub acc_per_oi_long: Decimal,
    pub acc_per_oi_short: Decimal,
    pub last_update_block: BlockNumber,
}

/// Market depth at one percent price move, per side of the book.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct PairDepth {
    pub one_percent_depth_above: Option<Decimal>,
    pub one_percent_depth_below: Option<Decimal>,
}

/// Configuration of the trailing open-interest windows for price impact.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct OiWindowsSettings {
    pub start_ts: TimestampS,
    /// Window length in seconds.
    pub windows_duration: TimestampS,
    /// Number of trailing windows considered active; 0 disables impact.
    pub windows_count: u64,
}

/// Open interest accrued in one window.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct PairOi {
    pub oi_long: Decimal,
    pub oi_short: Decimal,
}

/// Per-pair OI windows, keyed by window id.
pub type OiWindows = HashMap<i64, PairOi>;

/// Pair liquidation parameters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LiquidationParams {
    /// Cap on the half-spread applied to liquidation quotes. A value of
    /// exactly 0 marks a pre-upgrade pair that charges no dynamic spread
    /// on close.
    pub max_liq_spread_p: Decimal,
    pub start_liq_threshold_p: Decimal,
    pub end_liq_threshold_p: Decimal,
    pub start_leverage: Decimal,
    pub end_leverage: Decimal,
}

/// Full protocol-state snapshot, consistent as of `current_block`.
///
/// Per-pair collections are addressed by `PairIndex`; a pair missing from a
/// collection means that input is unavailable and the engine degrades per
/// field (fee 0, static half-spread, no PnL).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProtocolSnapshot {
    pub current_block: BlockNumber,
    pub current_ts: TimestampS,
    /// Protocol-wide time-weighted vault-market-cap accumulator.
    pub acc_block_weighted_market_cap: Decimal,
    pub pairs: Vec<BorrowingPair>,
    pub groups: Vec<BorrowingGroup>,
    pub open_interest: Vec<OpenInterest>,
    pub pair_params: Vec<Option<PairParams>>,
    pub pair_rollover_fees: Vec<Option<PairRolloverFees>>,
    pub pair_funding_fees: Vec<Option<PairFundingFees>>,
    pub pair_fees: Vec<Option<PairFee>>,
    pub pair_spread_p: Vec<Option<Decimal>>,
    pub pair_depths: Vec<Option<PairDepth>>,
    pub oi_windows_settings: Option<OiWindowsSettings>,
    pub oi_windows: Vec<Option<OiWindows>>,
    pub liquidation_params: Vec<Option<LiquidationParams>>,
    /// Max gain cap in percent of collateral; None means uncapped.
    pub max_gain_p: Option<Decimal>,
}

impl ProtocolSnapshot {
    pub fn borrowing_pair(&self, pair: PairIndex) -> Option<&BorrowingPair> {
        self.pairs.get(pair.as_usize())
    }

    pub fn pair_open_interest(&self, pair: PairIndex) -> Option<&OpenInterest> {
        self.open_interest.get(pair.as_usize())
    }

    pub fn pair_params(&self, pair: PairIndex) -> Option<&PairParams> {
        self.pair_params.get(pair.as_usize())?.as_ref()
    }

    pub fn pair_rollover_fees(&self, pair: PairIndex) -> Option<&PairRolloverFees> {
        self.pair_rollover_fees.get(pair.as_usize())?.as_ref()
    }

    pub fn pair_funding_fees(&self, pair: PairIndex) -> Option<&PairFundingFees> {
        self.pair_funding_fees.get(pair.as_usize())?.as_ref()
    }

    pub fn pair_fee(&self, pair: PairIndex) -> Option<&PairFee> {
        self.pair_fees.get(pair.as_usize())?.as_ref()
    }

    pub fn pair_spread_p(&self, pair: PairIndex) -> Option<Decimal> {
        *self.pair_spread_p.get(pair.as_usize())?
    }

    pub fn pair_depth(&self, pair: PairIndex) -> Option<&PairDepth> {
        self.pair_depths.get(pair.as_usize())?.as_ref()
    }

    pub fn pair_oi_windows(&self, pair: PairIndex) -> Option<&OiWindows> {
        self.oi_windows.get(pair.as_usize())?.as_ref()
    }

    pub fn pair_liquidation_params(&self, pair: PairIndex) -> Option<&LiquidationParams> {
        self.liquidation_params.get(pair.as_usize())?.as_ref()
    }
}
