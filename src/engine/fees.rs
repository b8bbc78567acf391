//! Closing, rollover and funding fees.
//!
//! Rollover and funding follow the same lazy accrual-index pattern as
//! borrowing, but over single non-grouped indices, so no checkpoint walk is
//! needed. Positions opened before the fee-model upgrade
//! (`opened_after_update == false`) skip both terms.

use crate::domain::{
    BlockNumber, Decimal, OpenInterest, PairFee, PairFundingFees, PairParams, PairRolloverFees,
    Side,
};

/// Inputs for the rollover fee. Absent fields degrade the fee to 0.
#[derive(Debug, Clone, Copy, Default)]
pub struct RolloverContext<'a> {
    pub current_block: BlockNumber,
    pub pair_params: Option<&'a PairParams>,
    pub pair_rollover_fees: Option<&'a PairRolloverFees>,
}

/// Inputs for the funding fee. Absent fields degrade the fee to 0.
#[derive(Debug, Clone, Copy, Default)]
pub struct FundingContext<'a> {
    pub current_block: BlockNumber,
    pub pair_params: Option<&'a PairParams>,
    pub pair_funding_fees: Option<&'a PairFundingFees>,
    pub open_interest: Option<&'a OpenInterest>,
}

/// Fee charged when a position closes, combining the close fee and the
/// limit-order executor share. 0 when the pair's fee config is absent.
pub fn closing_fee(
    pos_collateral: Decimal,
    leverage: Decimal,
    pair_fee: Option<&PairFee>,
) -> Decimal {
    let Some(fee) = pair_fee else {
        return Decimal::zero();
    };
    (fee.close_fee_p + fee.limit_order_fee_p) * pos_collateral * leverage
}

/// Rollover fee accrued per unit of collateral since the position opened.
pub fn rollover_fee(
    pos_collateral: Decimal,
    initial_acc_rollover: Decimal,
    opened_after_update: bool,
    ctx: &RolloverContext<'_>,
) -> Decimal {
    if !opened_after_update {
        return Decimal::zero();
    }
    let (Some(params), Some(rollover)) = (ctx.pair_params, ctx.pair_rollover_fees) else {
        return Decimal::zero();
    };

    let pending_acc = rollover.acc_per_collateral
        + Decimal::from(ctx.current_block.saturating_sub(rollover.last_update_block))
            * params.rollover_fee_per_block_p;

    pos_collateral * (pending_acc - initial_acc_rollover)
}

/// Funding fee accrued per unit of the side's open interest since the
/// position opened. Positive OI imbalance means longs pay shorts; the
/// resulting fee can be negative (a rebate) for the receiving side.
///
/// A side with zero OI accrues nothing new for the span: there is no
/// exposure to distribute the imbalance over.
pub fn funding_fee(
    leveraged_pos: Decimal,
    initial_acc_funding: Decimal,
    side: Side,
    opened_after_update: bool,
    ctx: &FundingContext<'_>,
) -> Decimal {
    if !opened_after_update {
        return Decimal::zero();
    }
    let (Some(params), Some(funding), Some(oi)) =
        (ctx.pair_params, ctx.pair_funding_fees, ctx.open_interest)
    else {
        return Decimal::zero();
    };

    let paid_by_longs = (oi.long - oi.short)
        * params.funding_fee_per_block_p
        * Decimal::from(ctx.current_block.saturating_sub(funding.last_update_block));

    let pending_acc = match side {
        Side::Long => {
            if oi.long.is_zero() {
                funding.acc_per_oi_long
            } else {
                funding.acc_per_oi_long + paid_by_longs / oi.long
            }
        }
        Side::Short => {
            if oi.short.is_zero() {
                funding.acc_per_oi_short
            } else {
                funding.acc_per_oi_short - paid_by_longs / oi.short
            }
        }
    };

    leveraged_pos * (pending_acc - initial_acc_funding)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn d(s: &str) -> Decimal {
        Decimal::from_str_canonical(s).unwrap()
    }

    fn params() -> PairParams {
        PairParams {
            rollover_fee_per_block_p: d("0.001"),
            funding_fee_per_block_p: d("0.0001"),
        }
    }

    #[test]
    fn test_closing_fee() {
        let fee = PairFee {
            open_fee_p: d("0.0008"),
            close_fee_p: d("0.001"),
            limit_order_fee_p: d("0.0005"),
        };
        assert_eq!(
            closing_fee(d("100"), d("10"), Some(&fee)),
            d("1.5") // (0.001 + 0.0005) * 100 * 10
        );
    }

    #[test]
    fn test_closing_fee_absent_config() {
        assert_eq!(closing_fee(d("100"), d("10"), None), Decimal::zero());
    }

    #[test]
    fn test_rollover_fee() {
        let rollover = PairRolloverFees {
            acc_per_collateral: d("0.1"),
            last_update_block: 1000,
        };
        let ctx = RolloverContext {
            current_block: 1100,
            pair_params: Some(&params()),
            pair_rollover_fees: Some(&rollover),
        };
        // pending = 0.1 + 100 * 0.001 = 0.2; fee = 100 * (0.2 - 0.05)
        assert_eq!(rollover_fee(d("100"), d("0.05"), true, &ctx), d("15"));
    }

    #[test]
    fn test_rollover_fee_pre_update_position() {
        let rollover = PairRolloverFees {
            acc_per_collateral: d("0.1"),
            last_update_block: 1000,
        };
        let ctx = RolloverContext {
            current_block: 1100,
            pair_params: Some(&params()),
            pair_rollover_fees: Some(&rollover),
        };
        assert_eq!(
            rollover_fee(d("100"), d("0.05"), false, &ctx),
            Decimal::zero()
        );
    }

    #[test]
    fn test_rollover_fee_missing_state() {
        let ctx = RolloverContext {
            current_block: 1100,
            ..Default::default()
        };
        assert_eq!(rollover_fee(d("100"), d("0.05"), true, &ctx), Decimal::zero());
    }

    #[test]
    fn test_funding_fee_long_pays_when_majority() {
        let funding = PairFundingFees {
            acc_per_oi_long: d("0.02"),
            acc_per_oi_short: d("0.01"),
            last_update_block: 1000,
        };
        let oi = OpenInterest {
            long: d("200"),
            short: d("100"),
            max: d("1000"),
        };
        let ctx = FundingContext {
            current_block: 1100,
            pair_params: Some(&params()),
            pair_funding_fees: Some(&funding),
            open_interest: Some(&oi),
        };
        // paid_by_longs = 100 * 0.0001 * 100 = 1
        // long pending = 0.02 + 1/200 = 0.025; fee = 1000 * (0.025 - 0.01)
        assert_eq!(funding_fee(d("1000"), d("0.01"), Side::Long, true, &ctx), d("15"));
        // short pending = 0.01 - 1/100 = 0; fee = 1000 * (0 - 0.01) => rebate
        assert_eq!(
            funding_fee(d("1000"), d("0.01"), Side::Short, true, &ctx),
            d("-10")
        );
    }

    #[test]
    fn test_funding_fee_zero_oi_side_accrues_nothing() {
        let funding = PairFundingFees {
            acc_per_oi_long: d("0.02"),
            acc_per_oi_short: d("0.01"),
            last_update_block: 1000,
        };
        let oi = OpenInterest {
            long: Decimal::zero(),
            short: d("100"),
            max: d("1000"),
        };
        let ctx = FundingContext {
            current_block: 1100,
            pair_params: Some(&params()),
            pair_funding_fees: Some(&funding),
            open_interest: Some(&oi),
        };
        // long side has no OI: pending stays at the stored index
        assert_eq!(
            funding_fee(d("1000"), d("0.02"), Side::Long, true, &ctx),
            Decimal::zero()
        );
    }

    #[test]
    fn test_funding_fee_missing_state() {
        let ctx = FundingContext {
            current_block: 1100,
            ..Default::default()
        };
        assert_eq!(
            funding_fee(d("1000"), d("0.01"), Side::Long, true, &ctx),
            Decimal::zero()
        );
    }
}
