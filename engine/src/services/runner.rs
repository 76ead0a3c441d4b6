use std::path::PathBuf;
use std::sync::Arc;

use anyhow::anyhow;
use shared::models::Signal;

use crate::config::EngineSettings;
use crate::data::ingestion::{Ingestion, SymbolSet};
use crate::data::output::write_table_csv_file;
use crate::error::EngineError;
use crate::models::IndicatorTable;
use crate::pipeline::macd_analysis::COMPOSITE_COLUMN;
use crate::pipeline::transformation::SIGNAL_COLUMN;
use crate::pipeline::Pipeline;

#[derive(Debug, Clone, PartialEq)]
pub struct RunSummary {
    pub symbol: String,
    pub rows: usize,
    pub buy_signals: usize,
    pub sell_signals: usize,
    pub composite_entries: usize,
    pub output_path: PathBuf,
}

impl RunSummary {
    fn from_table(table: &IndicatorTable, output_path: PathBuf) -> Self {
        let markers = table.signal_markers(SIGNAL_COLUMN);
        RunSummary {
            symbol: table.symbol().to_string(),
            rows: table.len(),
            buy_signals: markers.iter().filter(|m| m.signal == Signal::Buy).count(),
            sell_signals: markers.iter().filter(|m| m.signal == Signal::Sell).count(),
            composite_entries: table.signal_markers(COMPOSITE_COLUMN).len(),
            output_path,
        }
    }
}

/// Runs every configured symbol as an independent blocking job. Runs share
/// only the read-only pipeline definition; the first failing symbol fails the batch.
pub async fn run_all(settings: &EngineSettings) -> Result<Vec<RunSummary>, EngineError> {
    settings.validate()?;
    let symbols = SymbolSet::from_value(&settings.ingestion.symbols)?;

    let ingestion = Arc::new(Ingestion::new(
        symbols.clone(),
        settings.ingestion.data_dir.clone(),
        settings.data.csv_format(),
    ));
    let pipeline = Arc::new(Pipeline::from_settings(&settings.indicators));
    let output_dir = settings.ingestion.output_dir.clone();

    let handles: Vec<_> = symbols
        .symbols()
        .into_iter()
        .map(|symbol| {
            let symbol = symbol.to_string();
            let ingestion = Arc::clone(&ingestion);
            let pipeline = Arc::clone(&pipeline);
            let output_path = output_dir.join(format!("{}_indicators.csv", symbol));
            tokio::task::spawn_blocking(move || -> Result<RunSummary, EngineError> {
                let series = ingestion.load_symbol(&symbol)?;
                let table = pipeline.run(series)?;
                write_table_csv_file(&table, &output_path)?;
                Ok(RunSummary::from_table(&table, output_path))
            })
        })
        .collect();

    let mut summaries = Vec::with_capacity(handles.len());
    for handle in handles {
        let summary = handle
            .await
            .map_err(|e| EngineError::from(anyhow!("Symbol run aborted: {}", e)))??;
        tracing::info!(
            symbol = %summary.symbol,
            rows = summary.rows,
            buy = summary.buy_signals,
            sell = summary.sell_signals,
            composite = summary.composite_entries,
            "Symbol processed"
        );
        summaries.push(summary);
    }
    Ok(summaries)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::fmt::Write as _;
    use std::fs;
    use tempfile::tempdir;

    fn write_prices(dir: &std::path::Path, symbol: &str, closes: &[f64]) {
        let mut csv = String::from("Date,Open,High,Low,Close,Volume\n");
        let start = chrono::NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
        for (i, close) in closes.iter().enumerate() {
            let date = start + chrono::Duration::days(i as i64);
            let open = close - 0.5;
            writeln!(csv, "{},{},{},{},{},1000", date.format("%Y-%m-%d"), open, close + 1.0, open - 1.0, close).unwrap();
        }
        fs::write(dir.join(format!("{}.csv", symbol)), csv).unwrap();
    }

    fn settings_for(data_dir: &std::path::Path, output_dir: &std::path::Path, symbols: serde_json::Value) -> EngineSettings {
        let mut settings = EngineSettings::default();
        settings.ingestion.symbols = symbols;
        settings.ingestion.data_dir = data_dir.to_path_buf();
        settings.ingestion.output_dir = output_dir.to_path_buf();
        settings
    }

    #[tokio::test]
    async fn test_run_all_processes_each_symbol() {
        let data = tempdir().unwrap();
        let out = tempdir().unwrap();
        let closes: Vec<f64> = (0..60).map(|i| 100.0 + (i as f64 * 0.3).sin() * 10.0).collect();
        write_prices(data.path(), "AAA", &closes);
        write_prices(data.path(), "BBB", &closes[..30]);

        let settings = settings_for(data.path(), out.path(), json!(["AAA", "BBB"]));
        let summaries = run_all(&settings).await.unwrap();

        assert_eq!(summaries.len(), 2);
        assert_eq!(summaries[0].symbol, "AAA");
        assert_eq!(summaries[0].rows, 60);
        assert_eq!(summaries[1].rows, 30);
        assert!(summaries[0].buy_signals + summaries[0].sell_signals > 0);

        let written = fs::read_to_string(out.path().join("AAA_indicators.csv")).unwrap();
        let header = written.lines().next().unwrap();
        assert!(header.contains("sma_10_shift3"));
        assert!(header.contains("MyIndicator"));
        assert!(header.ends_with("rsi_14"));
        assert_eq!(written.lines().count(), 61);
    }

    #[tokio::test]
    async fn test_run_all_with_bundled_settings() {
        let data = tempdir().unwrap();
        let out = tempdir().unwrap();
        let closes: Vec<f64> = (0..40).map(|i| 50.0 + (i as f64 * 0.5).cos() * 4.0).collect();
        write_prices(data.path(), "PPTA", &closes);
        write_prices(data.path(), "AEM", &closes);

        let mut settings = EngineSettings::load(None).unwrap();
        settings.ingestion.data_dir = data.path().to_path_buf();
        settings.ingestion.output_dir = out.path().to_path_buf();

        let summaries = run_all(&settings).await.unwrap();
        let symbols: Vec<&str> = summaries.iter().map(|s| s.symbol.as_str()).collect();
        assert_eq!(symbols, vec!["PPTA", "AEM"]);
        assert!(out.path().join("AEM_indicators.csv").exists());
    }

    #[tokio::test]
    async fn test_run_all_rejects_bad_symbol_shape() {
        let dir = tempdir().unwrap();
        let settings = settings_for(dir.path(), dir.path(), json!(7));
        let err = run_all(&settings).await.unwrap_err();
        assert!(matches!(err, EngineError::ConfigError(_)));
    }

    #[tokio::test]
    async fn test_run_all_surfaces_missing_data() {
        let dir = tempdir().unwrap();
        let settings = settings_for(dir.path(), dir.path(), json!("MISSING"));
        assert!(matches!(run_all(&settings).await, Err(EngineError::IoError { .. })));
    }
}
