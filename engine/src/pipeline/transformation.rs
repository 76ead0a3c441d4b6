// SMA, EMA, their lag columns and the confirmed cross signal.
use crate::config::IndicatorSettings;
use crate::error::EngineError;
use crate::indicators::shift::lagged_columns;
use crate::indicators::{CrossSignalDetector, Ema, IndicatorCalculator, Sma};
use crate::models::IndicatorTable;

use super::PipelineStep;

pub const SIGNAL_COLUMN: &str = "signal";

pub struct Transformation {
    sma: Sma,
    ema: Ema,
    shift_number: usize,
    shift_confirm: usize,
}

impl Transformation {
    pub fn new(period_sma: usize, period_ema: usize, shift_number: usize, shift_confirm: usize) -> Self {
        Self {
            sma: Sma::new(period_sma),
            ema: Ema::new(period_ema),
            shift_number,
            shift_confirm,
        }
    }

    pub fn from_settings(settings: &IndicatorSettings) -> Self {
        Self::new(settings.period_sma, settings.period_ema, settings.shift_number, settings.shift_confirm)
    }

    pub fn sma_column(&self) -> String {
        self.sma.column()
    }

    pub fn ema_column(&self) -> String {
        self.ema.column()
    }

    fn add_indicator(&self, table: &mut IndicatorTable, calculator: &dyn IndicatorCalculator) -> Result<(), EngineError> {
        tracing::debug!(
            symbol = %table.symbol(),
            indicator = calculator.name(),
            parameters = %calculator.parameters(),
            "Computing moving average"
        );
        let values = calculator.calculate(table.candles());
        table.insert_values(calculator.column(), values)
    }

    fn shift_data(&self, table: &mut IndicatorTable) -> Result<(), EngineError> {
        for base in [self.sma_column(), self.ema_column()] {
            let source = table.require_values(&base)?.to_vec();
            for (name, lagged) in lagged_columns(&base, &source, self.shift_number) {
                table.insert_values(name, lagged)?;
            }
        }
        Ok(())
    }

    fn sma_ema_cross(&self, table: &mut IndicatorTable) -> Result<(), EngineError> {
        let detector = CrossSignalDetector::new(self.ema_column(), self.sma_column(), self.shift_confirm);
        let signals = detector.detect(table)?;
        table.insert_signals(SIGNAL_COLUMN, signals)
    }
}

impl PipelineStep for Transformation {
    fn name(&self) -> &str {
        "transformation"
    }

    fn run(&self, mut table: IndicatorTable) -> Result<IndicatorTable, EngineError> {
        self.add_indicator(&mut table, &self.sma)?;
        self.add_indicator(&mut table, &self.ema)?;
        self.shift_data(&mut table)?;
        self.sma_ema_cross(&mut table)?;
        Ok(table)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::PriceSeries;
    use chrono::{Duration, TimeZone, Utc};
    use shared::models::{Candle, Signal};

    fn table_from_closes(closes: &[f64]) -> IndicatorTable {
        let start = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
        let candles = closes
            .iter()
            .enumerate()
            .map(|(i, c)| Candle {
                symbol: "TEST".to_string(),
                timestamp: start + Duration::days(i as i64),
                open: *c, high: *c, low: *c, close: *c,
                volume: 0.0,
            })
            .collect();
        IndicatorTable::new(PriceSeries::new("TEST", candles).unwrap())
    }

    #[test]
    fn test_produces_expected_columns() {
        let table = Transformation::new(3, 2, 2, 1).run(table_from_closes(&[1.0, 2.0, 3.0, 4.0])).unwrap();
        let names: Vec<&str> = table.column_names().collect();
        assert_eq!(
            names,
            vec!["sma_3", "ema_2", "sma_3_shift1", "sma_3_shift2", "ema_2_shift1", "ema_2_shift2", "signal"]
        );
    }

    #[test]
    fn test_lag_columns_align_with_source() {
        let closes = [10.0, 11.0, 12.0, 11.0, 10.0, 9.0, 10.0, 11.0, 12.0, 13.0, 14.0];
        let table = Transformation::new(3, 3, 3, 2).run(table_from_closes(&closes)).unwrap();
        let sma = table.values("sma_3").unwrap();
        for lag in 1..=3 {
            let lagged = table.values(&format!("sma_3_shift{}", lag)).unwrap();
            for i in lag..closes.len() {
                assert_eq!(lagged[i], sma[i - lag]);
            }
        }
        assert!((sma[2].unwrap() - 11.0).abs() < 1e-9);
        assert!((sma[3].unwrap() - 34.0 / 3.0).abs() < 1e-9);
    }

    #[test]
    fn test_single_lag_cross_matches_plain_crossover() {
        // Dip then rally: EMA(2) drops under SMA(4) and later climbs back over it.
        let closes = [10.0, 10.0, 10.0, 10.0, 8.0, 7.0, 7.0, 9.0, 12.0, 14.0, 15.0];
        let table = Transformation::new(4, 2, 1, 1).run(table_from_closes(&closes)).unwrap();
        let ema = table.values("ema_2").unwrap();
        let sma = table.values("sma_4").unwrap();
        let signals = table.signals(SIGNAL_COLUMN).unwrap();

        for i in 1..closes.len() {
            let expected = match (ema[i], sma[i], ema[i - 1], sma[i - 1]) {
                (Some(e), Some(s), Some(pe), Some(ps)) if e > s && pe <= ps => Signal::Buy,
                (Some(e), Some(s), Some(pe), Some(ps)) if e < s && pe >= ps => Signal::Sell,
                _ => Signal::Neutral,
            };
            assert_eq!(signals[i], expected, "row {}", i);
        }
        assert!(signals.contains(&Signal::Buy));
        assert!(signals.contains(&Signal::Sell));
    }

    #[test]
    fn test_short_series_is_all_neutral() {
        let table = Transformation::new(10, 10, 3, 3).run(table_from_closes(&[1.0, 2.0, 3.0])).unwrap();
        assert!(table.values("sma_10").unwrap().iter().all(Option::is_none));
        assert!(table.signals(SIGNAL_COLUMN).unwrap().iter().all(|s| *s == Signal::Neutral));
    }

    #[test]
    fn test_confirmation_without_lags_is_missing_column() {
        let transformation = Transformation::new(3, 3, 1, 2);
        let err = transformation.run(table_from_closes(&[1.0; 5])).unwrap_err();
        assert!(matches!(err, EngineError::MissingColumn { ref column } if column == "ema_3_shift2"));
    }
}
