//! PnL evaluator: turns a current price into a mutually-consistent
//! (absolute, percent) PnL pair with gain cap, fee deduction and
//! liquidation clamps applied in protocol order.

use crate::domain::{
    BlockNumber, Decimal, InitialAccFees, OpenInterest, PairFee, PairFundingFees, PairParams,
    PairRolloverFees, Side, Trade, TradeInfo,
};

use super::fees::{closing_fee, funding_fee, rollover_fee, FundingContext, RolloverContext};

/// PnL percent at or below which a position is liquidatable: the result is
/// forced to a full loss and no closing fee is charged.
fn liq_threshold_p() -> Decimal {
    Decimal::from(-90i64)
}

fn full_loss_p() -> Decimal {
    -Decimal::hundred()
}

/// Absolute PnL in collateral units plus the matching percent of collateral.
///
/// The two figures are always mutually consistent:
/// `value == collateral * percent / 100`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pnl {
    pub value: Decimal,
    pub percent: Decimal,
}

/// Snapshot inputs for a PnL evaluation. Absent fields degrade the
/// corresponding fee to 0; `max_gain_p == None` means uncapped.
#[derive(Debug, Clone, Copy, Default)]
pub struct PnlContext<'a> {
    pub current_block: BlockNumber,
    pub max_gain_p: Option<Decimal>,
    pub pair_fee: Option<&'a PairFee>,
    pub pair_params: Option<&'a PairParams>,
    pub pair_rollover_fees: Option<&'a PairRolloverFees>,
    pub pair_funding_fees: Option<&'a PairFundingFees>,
    pub open_interest: Option<&'a OpenInterest>,
}

/// Evaluate a position at `price`.
///
/// Returns `None` when the price is unavailable or zero ("cannot price
/// now"), which callers must not conflate with zero PnL. A position with no
/// collateral notional is likewise unpriceable.
pub fn pnl(
    price: Option<Decimal>,
    trade: &Trade,
    trade_info: &TradeInfo,
    initial: &InitialAccFees,
    use_fees: bool,
    ctx: &PnlContext<'_>,
) -> Option<Pnl> {
    let price = price.filter(|p| !p.is_zero())?;

    let collateral = trade.initial_pos_token * trade_info.token_price_collateral;
    if collateral.is_zero() {
        return None;
    }

    let open_price = trade.open_price;
    let mut value = match trade.side {
        Side::Long => (price - open_price) / open_price,
        Side::Short => (open_price - price) / open_price,
    } * trade.leverage
        * collateral;

    if let Some(max_gain_p) = ctx.max_gain_p {
        let max_gain = max_gain_p / Decimal::hundred() * collateral;
        value = value.min(max_gain);
    }

    if use_fees {
        value -= rollover_fee(
            collateral,
            initial.rollover,
            initial.opened_after_update,
            &RolloverContext {
                current_block: ctx.current_block,
                pair_params: ctx.pair_params,
                pair_rollover_fees: ctx.pair_rollover_fees,
            },
        );
        value -= funding_fee(
            collateral * trade.leverage,
            initial.funding,
            trade.side,
            initial.opened_after_update,
            &FundingContext {
                current_block: ctx.current_block,
                pair_params: ctx.pair_params,
                pair_funding_fees: ctx.pair_funding_fees,
                open_interest: ctx.open_interest,
            },
        );
    }

    let mut percent = value / collateral * Decimal::hundred();

    if percent <= liq_threshold_p() {
        // Deeply underwater positions are already liquidatable: full loss,
        // and no closing fee on top of it.
        percent = full_loss_p();
    } else {
        value -= closing_fee(collateral, trade.leverage, ctx.pair_fee);
        percent = value / collateral * Decimal::hundred();
    }

    percent = percent.max(full_loss_p());

    // Recompute the absolute figure from the clamped percent so both
    // returned values agree.
    let value = collateral * percent / Decimal::hundred();

    Some(Pnl { value, percent })
}
