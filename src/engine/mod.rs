//! Pure valuation engine: side-effect-free functions over immutable
//! snapshots. Safe to call concurrently; no shared or hidden state.

pub mod accrual;
pub mod borrowing;
pub mod fees;
pub mod oi_windows;
pub mod pnl;
pub mod spread;
pub mod valuation;

pub use accrual::{
    group_pending_acc_fee, group_pending_acc_fees, pair_pending_acc_fee, pair_pending_acc_fees,
    pending_acc_fees, weighted_vault_market_cap, PendingAccFees,
};
pub use borrowing::{borrowing_fee, BorrowingContext};
pub use fees::{closing_fee, funding_fee, rollover_fee, FundingContext, RolloverContext};
pub use oi_windows::{active_oi, current_oi_window_id};
pub use pnl::{pnl, Pnl, PnlContext};
pub use spread::{
    half_spread_p, protection_close_factor, spread_with_price_impact_p, SpreadContext,
};
pub use valuation::{evaluate_position, PositionValuation};
