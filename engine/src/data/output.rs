// Writes an enriched table for whatever draws it (charts, spreadsheets).
use std::fs::File;
use std::io::Write;
use std::path::Path;

use crate::error::EngineError;
use crate::models::{Column, IndicatorTable};

/// One row per candle: timestamp, OHLCV, then every derived column in the
/// order the stages added them. Missing values are empty fields; signal
/// columns are written as 1 / -1 / 0.
pub fn write_table_csv<W: Write>(table: &IndicatorTable, writer: W) -> Result<(), EngineError> {
    let mut wtr = csv::Writer::from_writer(writer);

    let mut header: Vec<&str> = vec!["timestamp", "Open", "High", "Low", "Close", "Volume"];
    header.extend(table.column_names());
    wtr.write_record(&header)?;

    for (i, candle) in table.candles().iter().enumerate() {
        let mut record = vec![
            candle.timestamp.to_rfc3339(),
            candle.open.to_string(),
            candle.high.to_string(),
            candle.low.to_string(),
            candle.close.to_string(),
            candle.volume.to_string(),
        ];
        for (_, column) in table.columns() {
            record.push(match column {
                Column::Values(values) => values[i].map(|v| v.to_string()).unwrap_or_default(),
                Column::Signals(signals) => signals[i].as_i8().to_string(),
            });
        }
        wtr.write_record(&record)?;
    }
    wtr.flush()?;
    Ok(())
}

pub fn write_table_csv_file(table: &IndicatorTable, path: impl AsRef<Path>) -> Result<(), EngineError> {
    if let Some(parent) = path.as_ref().parent() {
        std::fs::create_dir_all(parent)?;
    }
    let file = File::create(path.as_ref())?;
    write_table_csv(table, file)?;
    tracing::info!(symbol = %table.symbol(), path = %path.as_ref().display(), rows = table.len(), "Wrote indicator table");
    Ok(())
}
