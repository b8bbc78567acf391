//! Trailing open-interest windows: recently-traded OI that still counts
//! against market depth when pricing impact.

use crate::domain::{Decimal, OiWindows, OiWindowsSettings, TimestampS};

/// Id of the window containing `current_ts`.
///
/// Window ids grow by one every `windows_duration` seconds from `start_ts`.
pub fn current_oi_window_id(settings: &OiWindowsSettings, current_ts: TimestampS) -> i64 {
    debug_assert!(settings.windows_duration > 0, "window duration must be positive");
    (current_ts - settings.start_ts).div_euclid(settings.windows_duration)
}

/// Open interest accrued on one side within the `windows_count` trailing
/// non-expired windows, ending at `current_window_id`.
///
/// Returns `None` when no window data was supplied; callers degrade to the
/// static half-spread in that case.
pub fn active_oi(
    current_window_id: i64,
    windows_count: u64,
    oi_windows: Option<&OiWindows>,
    long: bool,
) -> Option<Decimal> {
    let windows = oi_windows?;

    let mut total = Decimal::zero();
    let first = current_window_id - (windows_count as i64 - 1);
    for id in first..=current_window_id {
        if let Some(window) = windows.get(&id) {
            total += if long { window.oi_long } else { window.oi_short };
        }
    }
    Some(total)
}
