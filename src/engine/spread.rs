//! Spread and price-impact model: static half-spread plus a dynamic
//! open-interest-driven impact term, with an anti-front-running protection
//! factor on early profitable closes.

use tracing::trace;

use crate::domain::{
    BlockNumber, Decimal, LiquidationParams, OiWindows, OiWindowsSettings, PairDepth, Side,
    TimestampS,
};

use super::oi_windows::{active_oi, current_oi_window_id};

/// Quote context. Every field is optional; an incomplete context falls back
/// to defaults (treated as an open, full price impact).
///
/// `is_pnl_positive` is supplied by the caller, not computed here: it must
/// be derived from the same price observation the quote is for, otherwise
/// the protection gating can disagree with the quoted price.
#[derive(Debug, Clone, Copy, Default)]
pub struct SpreadContext<'a> {
    pub is_open: Option<bool>,
    pub is_pnl_positive: Option<bool>,
    pub protection_close_factor: Option<Decimal>,
    pub protection_close_factor_blocks: Option<u64>,
    pub created_block: Option<BlockNumber>,
    pub liquidation_params: Option<&'a LiquidationParams>,
    pub current_block: Option<BlockNumber>,
}

/// Scalar applied to the price-impact term. 1 (full impact) unless the
/// quote is a profitable close still inside the position's protection
/// window, which would otherwise let impact be gamed away by an immediate
/// open/close round trip.
pub fn protection_close_factor(ctx: Option<&SpreadContext<'_>>) -> Decimal {
    let Some(ctx) = ctx else {
        return Decimal::one();
    };
    let (
        Some(is_open),
        Some(is_pnl_positive),
        Some(factor),
        Some(factor_blocks),
        Some(created_block),
        Some(current_block),
    ) = (
        ctx.is_open,
        ctx.is_pnl_positive,
        ctx.protection_close_factor,
        ctx.protection_close_factor_blocks,
        ctx.created_block,
        ctx.current_block,
    )
    else {
        return Decimal::one();
    };

    if is_pnl_positive
        && !is_open
        && factor.is_positive()
        && current_block <= created_block + factor_blocks
    {
        return factor;
    }

    Decimal::one()
}

/// Static half-spread, capped at `max_liq_spread_p` for liquidation quotes
/// when that cap is configured positive. 0 when the pair spread is absent
/// or zero.
pub fn half_spread_p(
    pair_spread_p: Option<Decimal>,
    is_liquidation: bool,
    liquidation_params: Option<&LiquidationParams>,
) -> Decimal {
    let Some(pair_spread_p) = pair_spread_p else {
        return Decimal::zero();
    };
    if pair_spread_p.is_zero() {
        return Decimal::zero();
    }

    let spread_p = pair_spread_p / Decimal::two();

    if is_liquidation {
        if let Some(params) = liquidation_params {
            if params.max_liq_spread_p.is_positive() && spread_p > params.max_liq_spread_p {
                return params.max_liq_spread_p;
            }
        }
    }

    spread_p
}

/// Effective half-spread a trade pays, including the OI-driven price-impact
/// term when depth and active OI are known.
///
/// Degrades to the static half-spread when depth or active OI is
/// unavailable, and to 0 for closes on pre-upgrade pairs whose liquidation
/// spread cap is configured as exactly 0.
#[allow(clippy::too_many_arguments)]
pub fn spread_with_price_impact_p(
    pair_spread_p: Option<Decimal>,
    side: Side,
    collateral: Decimal,
    leverage: Decimal,
    pair_depth: Option<&PairDepth>,
    oi_windows_settings: Option<&OiWindowsSettings>,
    oi_windows: Option<&OiWindows>,
    current_ts: Option<TimestampS>,
    ctx: Option<&SpreadContext<'_>>,
) -> Decimal {
    let Some(pair_spread_p) = pair_spread_p else {
        return Decimal::zero();
    };

    // A quote is an open unless the context explicitly says otherwise.
    let is_open = ctx.and_then(|c| c.is_open) != Some(false);

    if !is_open {
        if let Some(params) = ctx.and_then(|c| c.liquidation_params) {
            if params.max_liq_spread_p.is_zero() {
                // Pre-upgrade pair: no spread or impact charged on close.
                return Decimal::zero();
            }
        }
    }

    // A close is economically the opposite trade, so it consumes the other
    // side of the depth curve.
    let one_percent_depth = pair_depth.and_then(|depth| {
        match (side.is_long(), is_open) {
            (true, true) | (false, false) => depth.one_percent_depth_above,
            (true, false) | (false, true) => depth.one_percent_depth_below,
        }
    });

    let mut oi = None;
    if let Some(settings) = oi_windows_settings {
        if settings.windows_count > 0 {
            if let Some(now) = current_ts {
                let consuming_long = if is_open { side.is_long() } else { !side.is_long() };
                oi = active_oi(
                    current_oi_window_id(settings, now),
                    settings.windows_count,
                    oi_windows,
                    consuming_long,
                );
            }
        }
    }

    let (Some(depth), Some(oi)) = (one_percent_depth.filter(|d| !d.is_zero()), oi) else {
        trace!("depth or active OI unavailable, degrading to static half-spread");
        return pair_spread_p / Decimal::two();
    };

    half_spread_p(Some(pair_spread_p), false, None)
        + ((oi + collateral * leverage / Decimal::two())
            / depth
            / Decimal::hundred()
            / Decimal::two())
            * protection_close_factor(ctx)
}
