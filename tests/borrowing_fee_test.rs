use perpmirror::domain::{
    BorrowingGroup, BorrowingPair, OpenInterest, PairGroupCheckpoint,
};
use perpmirror::engine::{borrowing_fee, pair_pending_acc_fee, BorrowingContext};
use perpmirror::{Decimal, InitialAccFees, PairIndex, Side};

fn d(s: &str) -> Decimal {
    Decimal::from_str_canonical(s).unwrap()
}

fn initial_fees(block: u64, pair_fee: &str, group_fee: &str) -> InitialAccFees {
    InitialAccFees {
        block,
        rollover: Decimal::zero(),
        funding: Decimal::zero(),
        borrowing_pair: d(pair_fee),
        borrowing_group: d(group_fee),
        opened_after_update: true,
    }
}

fn pair(
    acc_fee_long: &str,
    acc_fee_short: &str,
    fee_per_block: &str,
    acc_last_updated_block: u64,
    last_acc_weighted: &str,
    groups: Vec<PairGroupCheckpoint>,
) -> BorrowingPair {
    BorrowingPair {
        acc_fee_long: d(acc_fee_long),
        acc_fee_short: d(acc_fee_short),
        fee_per_block: d(fee_per_block),
        acc_last_updated_block,
        last_acc_block_weighted_market_cap: d(last_acc_weighted),
        groups,
    }
}

fn group(
    oi_long: &str,
    oi_short: &str,
    fee_per_block: &str,
    acc_fee_long: &str,
    acc_last_updated_block: u64,
    last_acc_weighted: &str,
) -> BorrowingGroup {
    BorrowingGroup {
        oi_long: d(oi_long),
        oi_short: d(oi_short),
        fee_per_block: d(fee_per_block),
        acc_fee_long: d(acc_fee_long),
        acc_fee_short: Decimal::zero(),
        acc_last_updated_block,
        last_acc_block_weighted_market_cap: d(last_acc_weighted),
    }
}

fn oi(long: &str, short: &str) -> OpenInterest {
    OpenInterest {
        long: d(long),
        short: d(short),
        max: d("100000"),
    }
}

fn checkpoint(
    block: u64,
    initial_acc_fee_long: &str,
    prev_group_acc_fee_long: &str,
    pair_acc_fee_long: &str,
) -> PairGroupCheckpoint {
    PairGroupCheckpoint {
        group_index: 0,
        block,
        initial_acc_fee_long: d(initial_acc_fee_long),
        initial_acc_fee_short: Decimal::zero(),
        prev_group_acc_fee_long: d(prev_group_acc_fee_long),
        prev_group_acc_fee_short: Decimal::zero(),
        pair_acc_fee_long: d(pair_acc_fee_long),
        pair_acc_fee_short: Decimal::zero(),
    }
}

#[test]
fn test_no_checkpoints_seeds_from_pending_pair_index() {
    // Weighting: 100 blocks over accumulator growth 100 => factor 1.
    // Imbalance delta = (300 - 100) * 0.001 * 100 = 20.
    let pairs = vec![pair("10", "5", "0.001", 1000, "0", vec![])];
    let groups = vec![];
    let pair_oi = oi("300", "100");
    let ctx = BorrowingContext {
        current_block: 1100,
        acc_block_weighted_market_cap: d("100"),
        groups: &groups,
        pairs: &pairs,
        open_interest: &pair_oi,
    };
    let initial = initial_fees(1000, "0", "0");

    let long_fee = borrowing_fee(d("1000"), PairIndex::new(0), Side::Long, &initial, &ctx);
    assert_eq!(long_fee, d("30"));

    // Minority side never accrues for the span
    let short_fee = borrowing_fee(d("1000"), PairIndex::new(0), Side::Short, &initial, &ctx);
    assert_eq!(short_fee, d("5"));

    // The empty-checkpoint fee is exactly the pending pair index
    assert_eq!(
        long_fee,
        pair_pending_acc_fee(&pairs[0], &pair_oi, d("100"), 1100, Side::Long)
    );
}

#[test]
fn test_borrowing_fee_is_idempotent() {
    let pairs = vec![pair("10", "5", "0.001", 1000, "0", vec![])];
    let groups = vec![];
    let pair_oi = oi("300", "100");
    let ctx = BorrowingContext {
        current_block: 1100,
        acc_block_weighted_market_cap: d("100"),
        groups: &groups,
        pairs: &pairs,
        open_interest: &pair_oi,
    };
    let initial = initial_fees(1000, "0", "0");

    let first = borrowing_fee(d("1000"), PairIndex::new(0), Side::Long, &initial, &ctx);
    let second = borrowing_fee(d("1000"), PairIndex::new(0), Side::Long, &initial, &ctx);
    assert_eq!(first, second);
}

#[test]
fn test_missing_pair_degrades_to_zero() {
    let pairs = vec![pair("10", "5", "0.001", 1000, "0", vec![])];
    let groups = vec![];
    let pair_oi = oi("300", "100");
    let ctx = BorrowingContext {
        current_block: 1100,
        acc_block_weighted_market_cap: d("100"),
        groups: &groups,
        pairs: &pairs,
        open_interest: &pair_oi,
    };
    let initial = initial_fees(1000, "0", "0");

    assert_eq!(
        borrowing_fee(d("1000"), PairIndex::new(5), Side::Long, &initial, &ctx),
        Decimal::zero()
    );
}

#[test]
fn test_missing_group_degrades_group_delta_to_zero() {
    // Checkpoint references group 0 but the snapshot carries no groups:
    // the group index projects to 0 and the pair delta alone drives the fee.
    let cp = checkpoint(150, "0.01", "0.01", "0.02");
    let pairs = vec![pair("0.05", "0", "0.00004", 150, "150", vec![cp])];
    let groups: Vec<BorrowingGroup> = vec![];
    let pair_oi = oi("20", "10");
    let ctx = BorrowingContext {
        current_block: 200,
        acc_block_weighted_market_cap: d("200"),
        groups: &groups,
        pairs: &pairs,
        open_interest: &pair_oi,
    };
    let initial = initial_fees(100, "0.005", "0.004");

    // Pair pending: 0.05 + 10 * 0.00004 * 50 = 0.07, delta vs checkpoint 0.05.
    // Seed from the checkpoint's recorded pair index: 0.02.
    let fee = borrowing_fee(d("1000"), PairIndex::new(0), Side::Long, &initial, &ctx);
    assert_eq!(fee, d("0.02") + d("1000") * d("0.05") / d("100"));
}

#[test]
fn test_single_checkpoint_after_open_uses_max_of_pair_and_group_deltas() {
    // Position opened at block 100; the pair's group assignment changed at
    // block 150; we price at block 200.
    //
    // Pair pending long index: 0.05 + (20-10) * 0.00004 * 50 = 0.07
    //   => pair delta vs checkpoint = 0.07 - 0.02 = 0.05
    // Group pending long index: 0.025 + (30-10) * 0.000015 * 50 = 0.04
    //   => group delta vs checkpoint = 0.04 - 0.01 = 0.03
    let cp = checkpoint(150, "0.01", "0.01", "0.02");
    let pairs = vec![pair("0.05", "0", "0.00004", 150, "150", vec![cp])];
    let groups = vec![group("30", "10", "0.000015", "0.025", 150, "150")];
    let pair_oi = oi("20", "10");
    let ctx = BorrowingContext {
        current_block: 200,
        acc_block_weighted_market_cap: d("200"),
        groups: &groups,
        pairs: &pairs,
        open_interest: &pair_oi,
    };
    let initial = initial_fees(100, "0.005", "0.004");

    // Seed: earliest checkpoint (150) is after open (100), so the pre-150
    // span reads the checkpoint's recorded pair index (0.02). The post-150
    // span pays max(0.05, 0.03) = 0.05 scaled by position size.
    let fee = borrowing_fee(d("1000"), PairIndex::new(0), Side::Long, &initial, &ctx);
    assert_eq!(fee, d("0.52"));
}

#[test]
fn test_boundary_checkpoint_subtracts_initial_snapshot_and_stops_walk() {
    // Checkpoints at 50 and 150; position opened at 100.
    let cp0 = checkpoint(50, "0.002", "0.001", "0.003");
    let cp1 = checkpoint(150, "0.012", "0.011", "0.03");
    let pairs = vec![pair("0.05", "0", "0.00004", 150, "150", vec![cp0, cp1])];
    let groups = vec![group("30", "10", "0.000015", "0.025", 150, "150")];
    let pair_oi = oi("20", "10");
    let ctx = BorrowingContext {
        current_block: 200,
        acc_block_weighted_market_cap: d("200"),
        groups: &groups,
        pairs: &pairs,
        open_interest: &pair_oi,
    };
    let initial = initial_fees(100, "0.006", "0.004");

    // Span 150..now: group delta 0.04 - 0.012 = 0.028,
    //                pair delta 0.07 - 0.03 = 0.04 => pays 0.04.
    // Span open..150 (boundary, checkpoint 50 < open): deltas come from the
    // next checkpoint's inherited indices net of the position's own initial
    // snapshot: group 0.011 - 0.004 = 0.007, pair 0.03 - 0.006 = 0.024
    //   => pays 0.024, then the walk stops.
    // No seed: earliest checkpoint (50) precedes the open block.
    let fee = borrowing_fee(d("1000"), PairIndex::new(0), Side::Long, &initial, &ctx);
    assert_eq!(fee, d("0.64"));
}

#[test]
fn test_walk_stops_at_boundary_ignoring_older_checkpoints() {
    // Same as above with an extra, even older checkpoint at block 40.
    // The boundary at block 50 stops the walk, so the result is unchanged.
    let cp_old = checkpoint(40, "0.9", "0.9", "0.9");
    let cp0 = checkpoint(50, "0.002", "0.001", "0.003");
    let cp1 = checkpoint(150, "0.012", "0.011", "0.03");
    let pairs = vec![pair(
        "0.05",
        "0",
        "0.00004",
        150,
        "150",
        vec![cp_old, cp0, cp1],
    )];
    let groups = vec![group("30", "10", "0.000015", "0.025", 150, "150")];
    let pair_oi = oi("20", "10");
    let ctx = BorrowingContext {
        current_block: 200,
        acc_block_weighted_market_cap: d("200"),
        groups: &groups,
        pairs: &pairs,
        open_interest: &pair_oi,
    };
    let initial = initial_fees(100, "0.006", "0.004");

    let fee = borrowing_fee(d("1000"), PairIndex::new(0), Side::Long, &initial, &ctx);
    assert_eq!(fee, d("0.64"));
}
