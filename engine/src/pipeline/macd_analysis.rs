// MACD columns plus the composite `MyIndicator` entry flag.
use shared::models::Signal;

use crate::config::IndicatorSettings;
use crate::error::EngineError;
use crate::indicators::macd::{composite_signal, CompositeRow, COMPOSITE_SHORT_PERIOD};
use crate::indicators::Macd;
use crate::models::IndicatorTable;

use super::PipelineStep;

pub const MACD_COLUMN: &str = "MACD";
pub const MACD_SIGNAL_COLUMN: &str = "MACD_signal";
pub const MACD_SIGNAL_PREV_COLUMN: &str = "MACD_signal_prev";
pub const MACD_HIST_COLUMN: &str = "MACD_hist";
pub const COMPOSITE_COLUMN: &str = "MyIndicator";

pub struct MacdAnalysis {
    macd: Macd,
}

impl MacdAnalysis {
    pub fn new(fast_ema: usize, slow_ema: usize, period_signal: usize) -> Self {
        Self { macd: Macd::new(fast_ema, slow_ema, period_signal) }
    }

    pub fn from_settings(settings: &IndicatorSettings) -> Self {
        Self::new(settings.fast_ema, settings.slow_ema, settings.period_signal)
    }

    fn macd_signal_line(&self, table: &mut IndicatorTable) -> Result<(), EngineError> {
        tracing::debug!(
            symbol = %table.symbol(),
            indicator = self.macd.name(),
            parameters = %self.macd.parameters(),
            "Computing MACD"
        );
        let out = self.macd.compute(table.candles());
        table.insert_values(format!("ema_{}", self.macd.fast_period()), out.fast_ema)?;
        table.insert_values(format!("ema_{}", self.macd.slow_period()), out.slow_ema)?;
        table.insert_values(MACD_COLUMN, out.macd)?;
        table.insert_values(MACD_SIGNAL_COLUMN, out.signal)?;
        table.insert_values(MACD_SIGNAL_PREV_COLUMN, out.signal_prev)?;
        table.insert_values(MACD_HIST_COLUMN, out.histogram)
    }

    // A table without the short SMA/EMA pair gets an all-zero flag column.
    fn sma_ema_macd_cross(&self, table: &mut IndicatorTable) -> Result<(), EngineError> {
        let ema_short = table.values(&format!("ema_{}", COMPOSITE_SHORT_PERIOD));
        let sma_short = table.values(&format!("sma_{}", COMPOSITE_SHORT_PERIOD));

        let flags: Vec<Signal> = match (ema_short, sma_short) {
            (Some(ema_short), Some(sma_short)) => {
                let macd = table.require_values(MACD_COLUMN)?;
                let signal = table.require_values(MACD_SIGNAL_COLUMN)?;
                let signal_prev = table.require_values(MACD_SIGNAL_PREV_COLUMN)?;
                table
                    .candles()
                    .iter()
                    .enumerate()
                    .map(|(i, candle)| {
                        composite_signal(CompositeRow {
                            close: candle.close,
                            macd: macd[i],
                            signal: signal[i],
                            signal_prev: signal_prev[i],
                            ema_short: ema_short[i],
                            sma_short: sma_short[i],
                        })
                    })
                    .collect()
            }
            _ => {
                tracing::warn!(
                    symbol = %table.symbol(),
                    period = COMPOSITE_SHORT_PERIOD,
                    "Short SMA/EMA columns absent; composite indicator left at 0"
                );
                vec![Signal::Neutral; table.len()]
            }
        };
        table.insert_signals(COMPOSITE_COLUMN, flags)
    }
}

impl Default for MacdAnalysis {
    fn default() -> Self {
        Self { macd: Macd::default() }
    }
}

impl PipelineStep for MacdAnalysis {
    fn name(&self) -> &str {
        "macd"
    }

    fn run(&self, mut table: IndicatorTable) -> Result<IndicatorTable, EngineError> {
        self.macd_signal_line(&mut table)?;
        self.sma_ema_macd_cross(&mut table)?;
        Ok(table)
    }
}
