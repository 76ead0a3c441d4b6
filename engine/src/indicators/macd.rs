// MACD (Moving Average Convergence Divergence) indicator implementation
// MACD = EMA(fast) - EMA(slow), signal = EMA(signal) of MACD, histogram = MACD - signal
use shared::models::{Candle, Signal};
use serde_json::Value;

use super::{ema, shift};

/// Period of the short SMA/EMA pair the composite entry condition reads.
pub const COMPOSITE_SHORT_PERIOD: usize = 10;

#[derive(Debug, Clone, PartialEq)]
pub struct MacdOutput {
    pub fast_ema: Vec<Option<f64>>,
    pub slow_ema: Vec<Option<f64>>,
    pub macd: Vec<Option<f64>>,
    pub signal: Vec<Option<f64>>,
    pub signal_prev: Vec<Option<f64>>,
    pub histogram: Vec<Option<f64>>,
}

pub struct Macd {
    name: String,
    fast_period: usize,
    slow_period: usize,
    signal_period: usize,
}

impl Macd {
    pub fn new(fast_period: usize, slow_period: usize, signal_period: usize) -> Self {
        Self {
            name: format!("MACD({},{},{})", fast_period, slow_period, signal_period),
            fast_period,
            slow_period,
            signal_period,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn parameters(&self) -> Value {
        serde_json::json!({
            "fast": self.fast_period,
            "slow": self.slow_period,
            "signal": self.signal_period,
        })
    }

    pub fn fast_period(&self) -> usize {
        self.fast_period
    }

    pub fn slow_period(&self) -> usize {
        self.slow_period
    }

    pub fn compute(&self, data: &[Candle]) -> MacdOutput {
        let closes: Vec<Option<f64>> = data.iter().map(|c| Some(c.close)).collect();
        let fast_ema = ema(&closes, self.fast_period);
        let slow_ema = ema(&closes, self.slow_period);

        let macd = difference(&fast_ema, &slow_ema);
        let signal = ema(&macd, self.signal_period);
        let signal_prev = shift(&signal, 1);
        let histogram = difference(&macd, &signal);

        MacdOutput { fast_ema, slow_ema, macd, signal, signal_prev, histogram }
    }
}

impl Default for Macd {
    fn default() -> Self {
        Self::new(12, 26, 9)
    }
}

fn difference(a: &[Option<f64>], b: &[Option<f64>]) -> Vec<Option<f64>> {
    a.iter()
        .zip(b)
        .map(|(x, y)| x.zip(*y).map(|(x, y)| x - y))
        .collect()
}

/// Inputs of the composite entry condition for one row.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CompositeRow {
    pub close: f64,
    pub macd: Option<f64>,
    pub signal: Option<f64>,
    pub signal_prev: Option<f64>,
    pub ema_short: Option<f64>,
    pub sma_short: Option<f64>,
}

/// Buy when the signal line is flat or falling, MACD sits at or under it,
/// the short EMA is at or under the short SMA and both averages are below
/// the close. Any missing input gives Neutral.
pub fn composite_signal(row: CompositeRow) -> Signal {
    let (Some(macd), Some(signal), Some(signal_prev), Some(ema_short), Some(sma_short)) =
        (row.macd, row.signal, row.signal_prev, row.ema_short, row.sma_short)
    else {
        return Signal::Neutral;
    };

    let entry = signal <= signal_prev
        && macd <= signal
        && ema_short <= sma_short
        && ema_short < row.close
        && sma_short < row.close;

    if entry {
        Signal::Buy
    } else {
        Signal::Neutral
    }
}
