// Golden-cross / death-cross detection between a fast and a slow average.
// A row is a Buy when the fast average is strictly above the slow one and it
// was at or below the slow one on each of the previous `confirm` rows
// (mirrored for Sell); a missing value anywhere in that window gives Neutral.
use shared::models::Signal;

use super::shift::shift_column_name;
use crate::error::EngineError;
use crate::models::IndicatorTable;

/// Fast and slow average values at one row.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CrossPoint {
    pub fast: Option<f64>,
    pub slow: Option<f64>,
}

impl CrossPoint {
    pub fn new(fast: Option<f64>, slow: Option<f64>) -> Self {
        Self { fast, slow }
    }

    fn is_defined(&self) -> bool {
        self.fast.is_some() && self.slow.is_some()
    }

    fn at_or_below(&self) -> bool {
        matches!((self.fast, self.slow), (Some(f), Some(s)) if f <= s)
    }

    fn at_or_above(&self) -> bool {
        matches!((self.fast, self.slow), (Some(f), Some(s)) if f >= s)
    }
}

/// Classifies one row from its current point and the `confirm` points before it
/// (`history[j - 1]` is the point `j` rows back).
pub fn classify(current: CrossPoint, history: &[CrossPoint]) -> Signal {
    let (Some(fast), Some(slow)) = (current.fast, current.slow) else {
        return Signal::Neutral;
    };
    if !history.iter().all(CrossPoint::is_defined) {
        return Signal::Neutral;
    }

    if fast > slow && history.iter().all(CrossPoint::at_or_below) {
        Signal::Buy
    } else if fast < slow && history.iter().all(CrossPoint::at_or_above) {
        Signal::Sell
    } else {
        Signal::Neutral
    }
}

pub struct CrossSignalDetector {
    fast_column: String,
    slow_column: String,
    confirm: usize,
}

impl CrossSignalDetector {
    pub fn new(fast_column: impl Into<String>, slow_column: impl Into<String>, confirm: usize) -> Self {
        Self {
            fast_column: fast_column.into(),
            slow_column: slow_column.into(),
            confirm,
        }
    }

    /// Reads the averages and their `_shift<j>` lag columns from `table`.
    /// The lag columns must already exist for j in 1..=confirm.
    pub fn detect(&self, table: &IndicatorTable) -> Result<Vec<Signal>, EngineError> {
        let fast = table.require_values(&self.fast_column)?;
        let slow = table.require_values(&self.slow_column)?;

        let mut lags = Vec::with_capacity(self.confirm);
        for lag in 1..=self.confirm {
            let fast_lag = table.require_values(&shift_column_name(&self.fast_column, lag))?;
            let slow_lag = table.require_values(&shift_column_name(&self.slow_column, lag))?;
            lags.push((fast_lag, slow_lag));
        }

        let mut history = Vec::with_capacity(self.confirm);
        let signals = (0..table.len())
            .map(|i| {
                history.clear();
                history.extend(lags.iter().map(|(f, s)| CrossPoint::new(f[i], s[i])));
                classify(CrossPoint::new(fast[i], slow[i]), &history)
            })
            .collect();
        Ok(signals)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pt(fast: f64, slow: f64) -> CrossPoint {
        CrossPoint::new(Some(fast), Some(slow))
    }

    #[test]
    fn test_fresh_golden_cross_is_buy() {
        assert_eq!(classify(pt(11.0, 10.0), &[pt(10.0, 10.0), pt(9.0, 10.0)]), Signal::Buy);
    }

    #[test]
    fn test_stale_cross_is_neutral() {
        // Already above one row back: not a fresh crossover.
        assert_eq!(classify(pt(11.0, 10.0), &[pt(10.5, 10.0), pt(9.0, 10.0)]), Signal::Neutral);
    }

    #[test]
    fn test_death_cross_is_sell() {
        assert_eq!(classify(pt(9.0, 10.0), &[pt(10.0, 10.0), pt(12.0, 10.0)]), Signal::Sell);
    }

    #[test]
    fn test_equality_at_current_row_is_neutral() {
        assert_eq!(classify(pt(10.0, 10.0), &[pt(9.0, 10.0)]), Signal::Neutral);
        assert_eq!(classify(pt(10.0, 10.0), &[pt(11.0, 10.0)]), Signal::Neutral);
    }

    #[test]
    fn test_zero_confirmation_is_plain_inequality() {
        assert_eq!(classify(pt(11.0, 10.0), &[]), Signal::Buy);
        assert_eq!(classify(pt(9.0, 10.0), &[]), Signal::Sell);
    }

    #[test]
    fn test_missing_lag_is_neutral() {
        let gap = CrossPoint::new(None, Some(10.0));
        assert_eq!(classify(pt(11.0, 10.0), &[pt(9.0, 10.0), gap]), Signal::Neutral);
        assert_eq!(classify(CrossPoint::new(None, None), &[]), Signal::Neutral);
    }

    #[test]
    fn test_nan_never_signals() {
        assert_eq!(classify(pt(f64::NAN, 10.0), &[pt(9.0, 10.0)]), Signal::Neutral);
    }
}
