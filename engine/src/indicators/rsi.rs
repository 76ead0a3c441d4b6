// Relative Strength Index (RSI), intraday variant.
//
// gain = max(close - open, 0), loss = max(open - close, 0) on the same candle,
// both smoothed with the EMA used everywhere else. The ratio is
// ema_loss / ema_gain, so RSI = 100 - 100 / (1 + ema_loss / ema_gain).
// Division by zero is left to IEEE semantics: ema_gain == 0 gives an infinite
// ratio (RSI 100) or NaN when both averages are zero.
use super::{ema, IndicatorCalculator};
use shared::models::Candle;
use serde_json::Value;

#[derive(Debug, Clone, PartialEq)]
pub struct RsiOutput {
    pub gain: Vec<Option<f64>>,
    pub loss: Vec<Option<f64>>,
    pub ema_gain: Vec<Option<f64>>,
    pub ema_loss: Vec<Option<f64>>,
    pub rs: Vec<Option<f64>>,
    pub rsi: Vec<Option<f64>>,
}

pub struct Rsi {
    name: String,
    period: usize,
}

impl Rsi {
    pub fn new(period: usize) -> Self {
        Self {
            name: format!("RSI({})", period),
            period,
        }
    }

    pub fn compute(&self, data: &[Candle]) -> RsiOutput {
        let gain: Vec<Option<f64>> = data.iter().map(|c| Some((c.close - c.open).max(0.0))).collect();
        let loss: Vec<Option<f64>> = data.iter().map(|c| Some((c.open - c.close).max(0.0))).collect();

        let ema_gain = ema(&gain, self.period);
        let ema_loss = ema(&loss, self.period);

        let rs: Vec<Option<f64>> = ema_loss
            .iter()
            .zip(&ema_gain)
            .map(|(l, g)| l.zip(*g).map(|(l, g)| l / g))
            .collect();
        let rsi = rs.iter().map(|r| r.map(|r| 100.0 - 100.0 / (r + 1.0))).collect();

        RsiOutput { gain, loss, ema_gain, ema_loss, rs, rsi }
    }
}

impl Default for Rsi {
    fn default() -> Self {
        Self::new(14)
    }
}

impl IndicatorCalculator for Rsi {
    fn name(&self) -> &str {
        &self.name
    }

    fn parameters(&self) -> Value {
        serde_json::json!({ "period": self.period })
    }

    fn column(&self) -> String {
        format!("rsi_{}", self.period)
    }

    fn calculate(&self, data: &[Candle]) -> Vec<Option<f64>> {
        self.compute(data).rsi
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn create_candle(open: f64, close: f64) -> Candle {
        Candle {
            symbol: "TEST".to_string(),
            timestamp: Utc::now(),
            open, high: open.max(close), low: open.min(close), close,
            volume: 0.0,
        }
    }

    #[test]
    fn test_gain_loss_use_same_candle_open() {
        // Closes rise row over row, but every candle opens at its close:
        // there is no intraday move, so no gain and no loss.
        let candles: Vec<Candle> = (1..=5).map(|i| create_candle(i as f64, i as f64)).collect();
        let out = Rsi::new(3).compute(&candles);
        assert!(out.gain.iter().all(|g| *g == Some(0.0)));
        assert!(out.loss.iter().all(|l| *l == Some(0.0)));
    }

    #[test]
    fn test_gain_loss_split() {
        let candles = vec![create_candle(10.0, 12.0), create_candle(12.0, 9.0), create_candle(9.0, 9.0)];
        let out = Rsi::new(2).compute(&candles);
        assert_eq!(out.gain, vec![Some(2.0), Some(0.0), Some(0.0)]);
        assert_eq!(out.loss, vec![Some(0.0), Some(3.0), Some(0.0)]);
    }

    #[test]
    fn test_ratio_is_loss_over_gain() {
        // Gains average 2, losses average 1 after seeding with period 2.
        let candles = vec![create_candle(10.0, 14.0), create_candle(14.0, 12.0)];
        let out = Rsi::new(2).compute(&candles);
        assert_eq!(out.ema_gain[1], Some(2.0));
        assert_eq!(out.ema_loss[1], Some(1.0));
        assert_eq!(out.rs[1], Some(0.5));
        // Textbook RSI would be 66.67 here; the inverted ratio gives 33.33.
        assert!((out.rsi[1].unwrap() - (100.0 - 100.0 / 1.5)).abs() < 1e-9);
    }

    #[test]
    fn test_all_up_candles_give_zero() {
        let candles: Vec<Candle> = (0..10).map(|i| create_candle(i as f64, i as f64 + 1.0)).collect();
        let out = Rsi::new(4).compute(&candles);
        for i in 3..10 {
            assert_eq!(out.rs[i], Some(0.0));
            assert_eq!(out.rsi[i], Some(0.0));
        }
    }

    #[test]
    fn test_all_down_candles_degenerate_to_hundred() {
        let candles: Vec<Candle> = (0..10).map(|i| create_candle(20.0 - i as f64, 19.0 - i as f64)).collect();
        let out = Rsi::new(4).compute(&candles);
        for i in 3..10 {
            assert!(out.rs[i].unwrap().is_infinite());
            assert_eq!(out.rsi[i], Some(100.0));
        }
    }

    #[test]
    fn test_no_movement_is_nan() {
        let candles = vec![create_candle(5.0, 5.0); 4];
        let out = Rsi::new(2).compute(&candles);
        assert!(out.rsi[1].unwrap().is_nan());
    }

    #[test]
    fn test_rsi_warm_up_and_bounds() {
        let candles: Vec<Candle> = (0..30)
            .map(|i| {
                let open = 100.0 + (i as f64 * 0.9).sin() * 3.0;
                let close = open + (i as f64 * 1.7).cos() * 2.0;
                create_candle(open, close)
            })
            .collect();
        let out = Rsi::default().compute(&candles);
        assert!(out.rsi[..13].iter().all(Option::is_none));
        for (i, value) in out.rsi.iter().enumerate().skip(13) {
            let ema_gain = out.ema_gain[i].unwrap();
            if ema_gain > 0.0 {
                let v = value.unwrap();
                assert!((0.0..=100.0).contains(&v), "RSI[{}] out of range: {}", i, v);
            }
        }
    }

    #[test]
    fn test_rsi_insufficient_data() {
        let candles = vec![create_candle(1.0, 2.0); 10];
        let results = Rsi::new(14).calculate(&candles);
        assert_eq!(results, vec![None; 10]);
    }
}
