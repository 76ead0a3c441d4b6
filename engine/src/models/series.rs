use shared::models::Candle;

use crate::error::EngineError;

/// Chronologically ordered candles for one symbol.
#[derive(Debug, Clone)]
pub struct PriceSeries {
    symbol: String,
    candles: Vec<Candle>,
}

impl PriceSeries {
    /// Rejects duplicate or out-of-order timestamps instead of sorting them,
    /// so every derived column stays aligned with the rows the supplier sent.
    pub fn new(symbol: impl Into<String>, candles: Vec<Candle>) -> Result<Self, EngineError> {
        let symbol = symbol.into();
        if let Some(pos) = candles.windows(2).position(|w| w[1].timestamp <= w[0].timestamp) {
            return Err(EngineError::SeriesOrder { symbol, index: pos + 1 });
        }
        Ok(Self { symbol, candles })
    }

    pub fn symbol(&self) -> &str {
        &self.symbol
    }

    pub fn candles(&self) -> &[Candle] {
        &self.candles
    }

    pub fn len(&self) -> usize {
        self.candles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.candles.is_empty()
    }

    pub fn closes(&self) -> Vec<f64> {
        self.candles.iter().map(|c| c.close).collect()
    }
}
