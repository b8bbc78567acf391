//! Accrual index model: projects a borrowing index forward to an arbitrary
//! block without replaying every intermediate block.
//!
//! The same projection serves both granularities: a pair's own index and the
//! index of the risk group the pair belongs to.

use crate::domain::{BlockNumber, BorrowingGroup, BorrowingPair, Decimal, OpenInterest, Side};

/// Result of projecting an accrual index pair forward by one span.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PendingAccFees {
    pub acc_fee_long: Decimal,
    pub acc_fee_short: Decimal,
    /// Raw signed imbalance delta for the span (positive means longs pay).
    pub delta: Decimal,
}

/// Weighting factor that scales fee accrual by how the vault's backing
/// capital moved relative to elapsed blocks: accrual dampens when backing
/// grew and amplifies when it shrank.
///
/// Returns 1 (neutral) when no blocks elapsed. A stalled accumulator
/// (`acc_weighted == last_acc_weighted` over a non-empty span) yields 0,
/// which disables accrual for the span.
pub fn weighted_vault_market_cap(
    acc_weighted: Decimal,
    last_acc_weighted: Decimal,
    block_delta: u64,
) -> Decimal {
    if block_delta == 0 {
        return Decimal::one();
    }
    let diff = acc_weighted - last_acc_weighted;
    if diff.is_zero() {
        return Decimal::zero();
    }
    Decimal::from(block_delta) / diff
}

/// Project an accrual index pair from `acc_last_updated_block` to
/// `current_block`.
///
/// The span's delta is an imbalance tax: only the majority-OI side's index
/// absorbs it, the minority side never accrues for the span.
///
/// `current_block < acc_last_updated_block` is a precondition violation.
pub fn pending_acc_fees(
    acc_fee_long: Decimal,
    acc_fee_short: Decimal,
    oi_long: Decimal,
    oi_short: Decimal,
    fee_per_block: Decimal,
    current_block: BlockNumber,
    acc_last_updated_block: BlockNumber,
    vault_market_cap: Decimal,
) -> PendingAccFees {
    debug_assert!(
        current_block >= acc_last_updated_block,
        "accrual span must not run backwards"
    );

    let delta = if vault_market_cap.is_zero() {
        Decimal::zero()
    } else {
        (oi_long - oi_short)
            * fee_per_block
            * Decimal::from(current_block - acc_last_updated_block)
            / vault_market_cap
    };

    let acc_fee_long = if delta.is_positive() {
        acc_fee_long + delta
    } else {
        acc_fee_long
    };
    let acc_fee_short = if delta.is_negative() {
        acc_fee_short - delta
    } else {
        acc_fee_short
    };

    PendingAccFees {
        acc_fee_long,
        acc_fee_short,
        delta,
    }
}

/// Pending projection of a pair's own borrowing index at `current_block`.
pub fn pair_pending_acc_fees(
    pair: &BorrowingPair,
    pair_oi: &OpenInterest,
    acc_block_weighted_market_cap: Decimal,
    current_block: BlockNumber,
) -> PendingAccFees {
    let vault_market_cap = weighted_vault_market_cap(
        acc_block_weighted_market_cap,
        pair.last_acc_block_weighted_market_cap,
        current_block.saturating_sub(pair.acc_last_updated_block),
    );
    pending_acc_fees(
        pair.acc_fee_long,
        pair.acc_fee_short,
        pair_oi.long,
        pair_oi.short,
        pair.fee_per_block,
        current_block,
        pair.acc_last_updated_block,
        vault_market_cap,
    )
}

/// Pending pair index value for one side.
pub fn pair_pending_acc_fee(
    pair: &BorrowingPair,
    pair_oi: &OpenInterest,
    acc_block_weighted_market_cap: Decimal,
    current_block: BlockNumber,
    side: Side,
) -> Decimal {
    let pending = pair_pending_acc_fees(pair, pair_oi, acc_block_weighted_market_cap, current_block);
    match side {
        Side::Long => pending.acc_fee_long,
        Side::Short => pending.acc_fee_short,
    }
}

/// Pending projection of a risk group's borrowing index at `current_block`.
pub fn group_pending_acc_fees(
    group: &BorrowingGroup,
    acc_block_weighted_market_cap: Decimal,
    current_block: BlockNumber,
) -> PendingAccFees {
    let vault_market_cap = weighted_vault_market_cap(
        acc_block_weighted_market_cap,
        group.last_acc_block_weighted_market_cap,
        current_block.saturating_sub(group.acc_last_updated_block),
    );
    pending_acc_fees(
        group.acc_fee_long,
        group.acc_fee_short,
        group.oi_long,
        group.oi_short,
        group.fee_per_block,
        current_block,
        group.acc_last_updated_block,
        vault_market_cap,
    )
}

/// Pending group index value for one side.
pub fn group_pending_acc_fee(
    group: &BorrowingGroup,
    acc_block_weighted_market_cap: Decimal,
    current_block: BlockNumber,
    side: Side,
) -> Decimal {
    let pending = group_pending_acc_fees(group, acc_block_weighted_market_cap, current_block);
    match side {
        Side::Long => pending.acc_fee_long,
        Side::Short => pending.acc_fee_short,
    }
}
