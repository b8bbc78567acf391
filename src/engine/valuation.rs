//! Whole-position valuation: assembles the per-pair contexts from a
//! protocol snapshot and evaluates one open position in a single call.

use serde::{Deserialize, Serialize};

use crate::config::ValuationConfig;
use crate::domain::{Decimal, PositionEnvelope, ProtocolSnapshot};

use super::borrowing::{borrowing_fee, BorrowingContext};
use super::fees::{closing_fee, funding_fee, rollover_fee, FundingContext, RolloverContext};
use super::pnl::{pnl, Pnl, PnlContext};

/// Economic state of one open position at one price and one snapshot.
///
/// `pnl` already reflects rollover, funding and closing fees when fee
/// application is enabled; the individual fee figures are reported
/// alongside for dashboards. The borrowing fee is accounted separately
/// since the protocol settles it on close, outside the PnL formula.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PositionValuation {
    pub value: Decimal,
    pub percent: Decimal,
    pub borrowing_fee: Decimal,
    pub rollover_fee: Decimal,
    pub funding_fee: Decimal,
    pub closing_fee: Decimal,
}

/// Evaluate one position against a snapshot.
///
/// Returns `None` when the position cannot be priced (no price, zero
/// price, or zero collateral notional).
pub fn evaluate_position(
    envelope: &PositionEnvelope,
    price: Option<Decimal>,
    snapshot: &ProtocolSnapshot,
    config: &ValuationConfig,
) -> Option<PositionValuation> {
    let trade = &envelope.trade;
    let pair = trade.pair_index;
    let collateral = envelope.position_collateral();

    let pnl_ctx = PnlContext {
        current_block: snapshot.current_block,
        max_gain_p: snapshot.max_gain_p.or(config.max_gain_p),
        pair_fee: snapshot.pair_fee(pair),
        pair_params: snapshot.pair_params(pair),
        pair_rollover_fees: snapshot.pair_rollover_fees(pair),
        pair_funding_fees: snapshot.pair_funding_fees(pair),
        open_interest: snapshot.pair_open_interest(pair),
    };

    let Pnl { value, percent } = pnl(
        price,
        trade,
        &envelope.trade_info,
        &envelope.initial_acc_fees,
        config.apply_fees,
        &pnl_ctx,
    )?;

    let borrowing = snapshot
        .pair_open_interest(pair)
        .map(|oi| {
            borrowing_fee(
                collateral,
                pair,
                trade.side,
                &envelope.initial_acc_fees,
                &BorrowingContext {
                    current_block: snapshot.current_block,
                    acc_block_weighted_market_cap: snapshot.acc_block_weighted_market_cap,
                    groups: &snapshot.groups,
                    pairs: &snapshot.pairs,
                    open_interest: oi,
                },
            )
        })
        .unwrap_or_else(Decimal::zero);

    let rollover = rollover_fee(
        collateral,
        envelope.initial_acc_fees.rollover,
        envelope.initial_acc_fees.opened_after_update,
        &RolloverContext {
            current_block: snapshot.current_block,
            pair_params: snapshot.pair_params(pair),
            pair_rollover_fees: snapshot.pair_rollover_fees(pair),
        },
    );

    let funding = funding_fee(
        collateral * trade.leverage,
        envelope.initial_acc_fees.funding,
        trade.side,
        envelope.initial_acc_fees.opened_after_update,
        &FundingContext {
            current_block: snapshot.current_block,
            pair_params: snapshot.pair_params(pair),
            pair_funding_fees: snapshot.pair_funding_fees(pair),
            open_interest: snapshot.pair_open_interest(pair),
        },
    );

    let closing = closing_fee(collateral, trade.leverage, snapshot.pair_fee(pair));

    Some(PositionValuation {
        value,
        percent,
        borrowing_fee: borrowing,
        rollover_fee: rollover,
        funding_fee: funding,
        closing_fee: closing,
    })
}
