// Technical indicators module
pub mod cross;
pub mod ema;
pub mod macd;
pub mod rsi;
pub mod shift;
pub mod sma;

pub use cross::{CrossPoint, CrossSignalDetector};
pub use ema::Ema;
pub use macd::{Macd, MacdOutput};
pub use rsi::{Rsi, RsiOutput};
pub use shift::{shift, shift_column_name};
pub use sma::Sma;

use shared::models::Candle;
use serde_json::Value;

// Common trait for all indicators
pub trait IndicatorCalculator: Send + Sync {
    fn name(&self) -> &str;
    fn parameters(&self) -> Value; // Parameters used for this indicator instance
    /// Name of the table column this indicator writes, e.g. `sma_10`.
    fn column(&self) -> String;
    fn calculate(&self, data: &[Candle]) -> Vec<Option<f64>>; // None where the indicator is not yet defined (warm-up rows)
}

/// Trailing arithmetic mean. The first `period - 1` positions are `None`,
/// as is everything when `values.len() < period`.
pub fn sma(values: &[f64], period: usize) -> Vec<Option<f64>> {
    if period == 0 || values.len() < period {
        return vec![None; values.len()];
    }

    let mut results = vec![None; period - 1];

    let mut sum: f64 = values.iter().take(period).sum();
    results.push(Some(sum / period as f64));

    // Slide the window
    for i in period..values.len() {
        sum = sum - values[i - period] + values[i];
        results.push(Some(sum / period as f64));
    }
    results
}

/// Exponential moving average with span `period` (alpha = 2 / (period + 1)).
///
/// Missing inputs are skipped rather than treated as zero: the average is
/// seeded with the plain mean of the first `period` defined values and emits
/// `None` until then. This lets the same routine smooth derived series that
/// carry their own warm-up gap (the MACD line, for example). A missing value
/// after seeding yields `None` at that row and leaves the running average untouched.
pub fn ema(values: &[Option<f64>], period: usize) -> Vec<Option<f64>> {
    let mut results = Vec::with_capacity(values.len());
    if period == 0 {
        results.resize(values.len(), None);
        return results;
    }

    let multiplier = 2.0 / (period as f64 + 1.0);
    let mut seed_sum = 0.0;
    let mut seed_count = 0usize;
    let mut previous_ema: Option<f64> = None;

    for value in values {
        let Some(x) = *value else {
            results.push(None);
            continue;
        };
        match previous_ema {
            Some(prev) => {
                let ema = (x - prev) * multiplier + prev;
                previous_ema = Some(ema);
                results.push(Some(ema));
            }
            None => {
                seed_sum += x;
                seed_count += 1;
                if seed_count == period {
                    previous_ema = Some(seed_sum / period as f64);
                }
                results.push(previous_ema);
            }
        }
    }
    results
}
