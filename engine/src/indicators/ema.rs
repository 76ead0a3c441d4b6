// Exponential Moving Average (EMA) indicator implementation
use super::IndicatorCalculator;
use shared::models::Candle;
use serde_json::Value;

pub struct Ema {
    name: String,
    period: usize,
}

impl Ema {
    pub fn new(period: usize) -> Self {
        Self {
            name: format!("EMA({})", period),
            period,
        }
    }
}

impl IndicatorCalculator for Ema {
    fn name(&self) -> &str {
        &self.name
    }

    fn parameters(&self) -> Value {
        serde_json::json!({ "period": self.period })
    }

    fn column(&self) -> String {
        format!("ema_{}", self.period)
    }

    fn calculate(&self, data: &[Candle]) -> Vec<Option<f64>> {
        let closes: Vec<Option<f64>> = data.iter().map(|c| Some(c.close)).collect();
        super::ema(&closes, self.period)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn create_candle(close: f64) -> Candle {
        Candle {
            symbol: "TEST".to_string(),
            timestamp: Utc::now(),
            open: close, high: close, low: close, close,
            volume: 0.0,
        }
    }

    #[test]
    fn test_ema_calculation() {
        let candles = vec![
            create_candle(10.0), create_candle(11.0), create_candle(12.0),
            create_candle(13.0), create_candle(14.0),
        ];
        let ema = Ema::new(3); // Period 3
        let results = ema.calculate(&candles);
        // SMA for first 3: (10+11+12)/3 = 11.0
        // EMA for 13: (13 - 11.0) * 0.5 + 11.0 = 12.0
        // EMA for 14: (14 - 12.0) * 0.5 + 12.0 = 13.0
        assert_eq!(results[2].unwrap(), 11.0); // Initial SMA
        assert_eq!(results[3].unwrap(), 12.0);
        assert_eq!(results[4].unwrap(), 13.0);
        assert_eq!(results.len(), 5);
        assert_eq!(results[0], None);
        assert_eq!(results[1], None);
    }

    #[test]
    fn test_ema_recurrence_holds_after_seed() {
        let closes = [3.0, 7.0, 2.0, 9.0, 4.0, 8.0, 6.0, 1.0];
        let candles: Vec<Candle> = closes.iter().map(|c| create_candle(*c)).collect();
        let period = 4;
        let alpha = 2.0 / (period as f64 + 1.0);
        let results = Ema::new(period).calculate(&candles);

        let seed = closes[..period].iter().sum::<f64>() / period as f64;
        assert!((results[period - 1].unwrap() - seed).abs() < 1e-12);
        for i in period..closes.len() {
            let expected = alpha * closes[i] + (1.0 - alpha) * results[i - 1].unwrap();
            assert!((results[i].unwrap() - expected).abs() < 1e-9, "row {}", i);
        }
    }

    #[test]
    fn test_ema_insufficient_data() {
        let candles = vec![create_candle(1.0); 3];
        assert_eq!(Ema::new(5).calculate(&candles), vec![None; 3]);
    }

    #[test]
    fn test_ema_column_name() {
        assert_eq!(Ema::new(26).column(), "ema_26");
        assert_eq!(Ema::new(26).name(), "EMA(26)");
    }
}
