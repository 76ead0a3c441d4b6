// Number parsing helpers shared by every CSV flavour the engine reads.
use anyhow::{anyhow, Result};
use std::str::FromStr;

/// Parses a decimal written with arbitrary separators, e.g. "1.234,56" with
/// (',', '.') or "1,234.56" with ('.', ',').
pub fn parse_decimal(s: &str, decimal_separator: char, thousand_separator: Option<char>) -> Result<f64> {
    let trimmed = s.trim();
    let mut normalized = String::with_capacity(trimmed.len());
    for ch in trimmed.chars() {
        if Some(ch) == thousand_separator {
            continue;
        }
        normalized.push(if ch == decimal_separator { '.' } else { ch });
    }

    f64::from_str(&normalized)
        .map_err(|e| anyhow!("Failed to parse decimal '{}': {}", s, e))
}
