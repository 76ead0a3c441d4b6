// Simple Moving Average (SMA) indicator implementation
use super::IndicatorCalculator;
use shared::models::Candle;
use serde_json::Value;

pub struct Sma {
    name: String,
    period: usize,
}

impl Sma {
    pub fn new(period: usize) -> Self {
        Self {
            name: format!("SMA({})", period),
            period,
        }
    }
}

impl IndicatorCalculator for Sma {
    fn name(&self) -> &str {
        &self.name
    }

    fn parameters(&self) -> Value {
        serde_json::json!({ "period": self.period })
    }

    fn column(&self) -> String {
        format!("sma_{}", self.period)
    }

    fn calculate(&self, data: &[Candle]) -> Vec<Option<f64>> {
        let closes: Vec<f64> = data.iter().map(|c| c.close).collect();
        super::sma(&closes, self.period)
    }
}
