//! Centralized display formatting for player-facing messages.
//!
//! All chat-visible numbers go through this module so reminder and expiry
//! notifications read the same everywhere (engine core, validate tool).
//!
//! Durations inside the engine are counted in host ticks; the host simulation
//! runs at a fixed 20 ticks per second.

/// Host simulation rate. One boost tick is 1/20th of a second.
pub const TICKS_PER_SECOND: u32 = 20;

/// Format a tick count as a remaining-time string for chat.
///
/// - Values >= 60s: `M:SS`
/// - Values >= 10s: whole seconds with an `s` suffix
/// - Values < 10s: one decimal place with an `s` suffix
/// - Zero: `"expired"`
///
/// # Examples
/// ```
/// use lure_types::formatting::format_remaining;
/// assert_eq!(format_remaining(2400), "2:00");
/// assert_eq!(format_remaining(300), "15s");
/// assert_eq!(format_remaining(150), "7.5s");
/// assert_eq!(format_remaining(0), "expired");
/// ```
pub fn format_remaining(ticks: u32) -> String {
    if ticks == 0 {
        return "expired".to_string();
    }
    let secs = ticks as f32 / TICKS_PER_SECOND as f32;
    if secs >= 60.0 {
        let mins = (secs / 60.0).floor() as u32;
        let remaining_secs = (secs % 60.0).floor() as u32;
        format!("{}:{:02}", mins, remaining_secs)
    } else if secs >= 10.0 {
        format!("{:.0}s", secs)
    } else {
        format!("{:.1}s", secs)
    }
}

/// Format a duration as `M:SS` from whole seconds.
///
/// # Examples
/// ```
/// use lure_types::formatting::format_duration;
/// assert_eq!(format_duration(125), "2:05");
/// assert_eq!(format_duration(59), "0:59");
/// assert_eq!(format_duration(0), "0:00");
/// ```
pub fn format_duration(secs: u64) -> String {
    format!("{}:{:02}", secs / 60, secs % 60)
}

/// Format an absolute percent chance with 1 decimal place.
///
/// # Examples
/// ```
/// use lure_types::formatting::format_pct;
/// assert_eq!(format_pct(85.0), "85.0%");
/// assert_eq!(format_pct(0.5), "0.5%");
/// ```
pub fn format_pct(n: f32) -> String {
    format!("{:.1}%", n)
}

/// Format an affinity multiplier for chat (`5x`, `2.5x`).
///
/// Whole multipliers drop the decimal; fractional ones keep one place.
///
/// # Examples
/// ```
/// use lure_types::formatting::format_multiplier;
/// assert_eq!(format_multiplier(5.0), "5x");
/// assert_eq!(format_multiplier(2.5), "2.5x");
/// ```
pub fn format_multiplier(n: f32) -> String {
    if n.fract() == 0.0 {
        format!("{:.0}x", n)
    } else {
        format!("{:.1}x", n)
    }
}
