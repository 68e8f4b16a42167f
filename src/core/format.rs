//! Display helpers shared by the CLI output and the console renderer.

use chrono::{DateTime, FixedOffset, TimeZone};
use unicode_segmentation::UnicodeSegmentation;

const UNITS: [&str; 7] = ["B", "KB", "MB", "GB", "TB", "PB", "EB"];

/// Converts a byte count to a human readable value.
///
/// Uses binary units, at most two decimals and no trailing zeros.
///
/// # Examples
///
/// ```
/// use maillog_console::core::bytes_to_human;
///
/// assert_eq!(bytes_to_human(512), "512 B");
/// assert_eq!(bytes_to_human(1536), "1.5 KB");
/// ```
#[must_use]
#[allow(clippy::cast_precision_loss)]
pub fn bytes_to_human(bytes: u64) -> String {
    if bytes == 0 {
        return "0 B".to_string();
    }

    let mut value = bytes as f64;
    let mut unit = 0;
    while value >= 1024.0 && unit < UNITS.len() - 1 {
        value /= 1024.0;
        unit += 1;
    }

    let rounded = (value * 100.0).round() / 100.0;
    format!("{rounded} {}", UNITS[unit])
}

/// Formats a timestamp as `YYYY-MM-DD HH:MM:SS` in the given zone.
#[must_use]
pub fn format_received<Tz: TimeZone>(received: &DateTime<FixedOffset>, zone: &Tz) -> String
where
    Tz::Offset: std::fmt::Display,
{
    received
        .with_timezone(zone)
        .format("%Y-%m-%d %H:%M:%S")
        .to_string()
}

/// Truncates to `max_width` graphemes, marking the cut with `...`.
#[must_use]
pub fn truncate(s: &str, max_width: usize) -> String {
    let count = s.graphemes(true).count();
    if count <= max_width {
        return s.to_string();
    }
    if max_width <= 3 {
        return s.graphemes(true).take(max_width).collect();
    }
    let mut out: String = s.graphemes(true).take(max_width - 3).collect();
    out.push_str("...");
    out
}

/// Truncates or pads to exactly `width` graphemes.
#[must_use]
pub fn fit(s: &str, width: usize) -> String {
    let mut out = truncate(s, width);
    let len = out.graphemes(true).count();
    out.extend(std::iter::repeat_n(' ', width.saturating_sub(len)));
    out
}
