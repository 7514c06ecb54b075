//! Wall-clock display stamps and the `DD/MM HH:MM` input mask.
//!
//! The board never stores real timestamps for operator-facing times —
//! everything is display text, entered or stamped in the rig's local
//! clock. Callers pass the clock in, so tests inject fixed instants.

use jiff::Zoned;

/// `DD/MM HH:MM` stamp of the given instant.
pub fn stamp_datetime(now: &Zoned) -> String {
    now.strftime("%d/%m %H:%M").to_string()
}

/// `HH:MM` stamp of the given instant.
pub fn stamp_time(now: &Zoned) -> String {
    now.strftime("%H:%M").to_string()
}

/// Masks free-typed input into `DD/MM HH:MM`.
///
/// Non-digits are stripped, at most eight digits are kept, and the
/// separators appear as the digits fill in. Partial input stays
/// partial: `"0708"` masks to `"07/08"`.
pub fn mask_datetime(raw: &str) -> String {
    let digits: String = raw.chars().filter(char::is_ascii_digit).take(8).collect();
    let d = digits.as_str();
    match d.len() {
        0..=2 => d.to_string(),
        3..=4 => format!("{}/{}", &d[..2], &d[2..]),
        5..=6 => format!("{}/{} {}", &d[..2], &d[2..4], &d[4..]),
        _ => format!("{}/{} {}:{}", &d[..2], &d[2..4], &d[4..6], &d[6..]),
    }
}
