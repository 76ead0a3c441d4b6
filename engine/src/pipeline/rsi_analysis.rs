use crate::error::EngineError;
use crate::indicators::{IndicatorCalculator, Rsi};
use crate::models::IndicatorTable;

use super::PipelineStep;

pub struct RsiAnalysis {
    rsi: Rsi,
}

impl RsiAnalysis {
    pub fn new(period: usize) -> Self {
        Self { rsi: Rsi::new(period) }
    }
}

impl Default for RsiAnalysis {
    fn default() -> Self {
        Self { rsi: Rsi::default() }
    }
}

impl PipelineStep for RsiAnalysis {
    fn name(&self) -> &str {
        "rsi"
    }

    fn run(&self, mut table: IndicatorTable) -> Result<IndicatorTable, EngineError> {
        tracing::debug!(
            symbol = %table.symbol(),
            indicator = self.rsi.name(),
            parameters = %self.rsi.parameters(),
            "Computing RSI"
        );
        let out = self.rsi.compute(table.candles());
        table.insert_values("gain", out.gain)?;
        table.insert_values("loss", out.loss)?;
        table.insert_values("ema_gain", out.ema_gain)?;
        table.insert_values("ema_loss", out.ema_loss)?;
        table.insert_values("rs", out.rs)?;
        table.insert_values(self.rsi.column(), out.rsi)?;
        Ok(table)
    }
}
