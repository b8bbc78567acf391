//! Borrowing fee reconciler: walks a pair's group-membership checkpoints
//! backwards and charges, per span, whichever of the pair's or the risk
//! group's marginal rate is higher.

use tracing::trace;

use crate::domain::{
    BlockNumber, BorrowingGroup, BorrowingPair, Decimal, InitialAccFees, OpenInterest, PairIndex,
    Side,
};

use super::accrual::{group_pending_acc_fee, pair_pending_acc_fee};

/// Everything the reconciler reads. `open_interest` is the OI of the pair
/// being priced; `groups`/`pairs` are the snapshot's full collections since
/// checkpoints may reference any group.
#[derive(Debug, Clone, Copy)]
pub struct BorrowingContext<'a> {
    pub current_block: BlockNumber,
    pub acc_block_weighted_market_cap: Decimal,
    pub groups: &'a [BorrowingGroup],
    pub pairs: &'a [BorrowingPair],
    pub open_interest: &'a OpenInterest,
}

/// Group and pair index deltas for one checkpoint span.
#[derive(Debug, Clone, Copy)]
struct SpanDeltas {
    delta_group: Decimal,
    delta_pair: Decimal,
    before_trade_open: bool,
}

/// Borrowing fee owed by a position between its open block and now.
///
/// A pair missing from the snapshot yields 0 (cannot price, assume no drag).
/// The snapshot is read-only; two calls with identical inputs return
/// identical output.
pub fn borrowing_fee(
    pos_collateral: Decimal,
    pair_index: PairIndex,
    side: Side,
    initial: &InitialAccFees,
    ctx: &BorrowingContext<'_>,
) -> Decimal {
    let Some(pair) = ctx.pairs.get(pair_index.as_usize()) else {
        trace!(pair = %pair_index, "pair missing from snapshot, borrowing fee degrades to 0");
        return Decimal::zero();
    };

    let checkpoints = &pair.groups;
    let first = checkpoints.first();

    // Seed covers the span before the earliest checkpoint: a position that
    // has lived entirely under current group conditions (no checkpoints)
    // reads the pending pair index, otherwise the earliest checkpoint's
    // recorded pair index.
    let mut fee = Decimal::zero();
    if first.map_or(true, |cp| cp.block > initial.block) {
        fee = match first {
            None => pair_pending_acc_fee(
                pair,
                ctx.open_interest,
                ctx.acc_block_weighted_market_cap,
                ctx.current_block,
                side,
            ),
            Some(cp) => cp.pair_acc_fee(side),
        };
    }

    for i in (0..checkpoints.len()).rev() {
        let span = span_deltas(i, pair, initial, side, ctx);

        fee += pos_collateral * span.delta_group.max(span.delta_pair) / Decimal::hundred();

        if span.before_trade_open {
            // This checkpoint is the boundary; older history predates the
            // position and is irrelevant.
            break;
        }
    }

    fee
}

/// Deltas for checkpoint `i`, net of what was already accrued before the
/// span started.
///
/// The most recent checkpoint projects pending group/pair indices from live
/// state; older checkpoints are self-describing and read the next
/// checkpoint's inherited indices.
fn span_deltas(
    i: usize,
    pair: &BorrowingPair,
    initial: &InitialAccFees,
    side: Side,
    ctx: &BorrowingContext<'_>,
) -> SpanDeltas {
    let checkpoints = &pair.groups;
    let cp = &checkpoints[i];
    let before_trade_open = cp.block < initial.block;

    let (mut delta_group, mut delta_pair) = if i == checkpoints.len() - 1 {
        let delta_group = match ctx.groups.get(cp.group_index) {
            Some(group) => group_pending_acc_fee(
                group,
                ctx.acc_block_weighted_market_cap,
                ctx.current_block,
                side,
            ),
            None => {
                trace!(
                    group = cp.group_index,
                    "group missing from snapshot, group delta degrades to 0"
                );
                Decimal::zero()
            }
        };
        let delta_pair = pair_pending_acc_fee(
            pair,
            ctx.open_interest,
            ctx.acc_block_weighted_market_cap,
            ctx.current_block,
            side,
        );
        (delta_group, delta_pair)
    } else {
        let next = &checkpoints[i + 1];
        if before_trade_open && next.block < initial.block {
            // Whole span predates the position: nothing accrued to it.
            return SpanDeltas {
                delta_group: Decimal::zero(),
                delta_pair: Decimal::zero(),
                before_trade_open,
            };
        }
        (next.prev_group_acc_fee(side), next.pair_acc_fee(side))
    };

    if before_trade_open {
        delta_group -= initial.borrowing_group;
        delta_pair -= initial.borrowing_pair;
    } else {
        delta_group -= cp.initial_acc_fee(side);
        delta_pair -= cp.pair_acc_fee(side);
    }

    SpanDeltas {
        delta_group,
        delta_pair,
        before_trade_open,
    }
}
