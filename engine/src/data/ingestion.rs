// Resolves the configured tickers and loads one price series per ticker.
use serde_json::Value;
use std::path::PathBuf;

use super::csv_parser::{CsvFormat, CsvParser};
use crate::error::EngineError;
use crate::models::PriceSeries;

/// The symbol set may be given as one ticker or as a list of tickers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SymbolSet {
    Single(String),
    Many(Vec<String>),
}

impl SymbolSet {
    /// Anything that is neither a string nor a non-empty list of strings is rejected.
    pub fn from_value(value: &Value) -> Result<Self, EngineError> {
        let shape_error = || EngineError::ConfigError("symbols must be a string or a list of strings".to_string());
        match value {
            Value::String(s) if !s.trim().is_empty() => Ok(SymbolSet::Single(s.trim().to_string())),
            Value::Array(items) if items.is_empty() => {
                Err(EngineError::ConfigError("symbols list is empty; configure at least one ticker".to_string()))
            }
            Value::Array(items) => items
                .iter()
                .map(|item| match item {
                    Value::String(s) if !s.trim().is_empty() => Ok(s.trim().to_string()),
                    _ => Err(shape_error()),
                })
                .collect::<Result<Vec<_>, _>>()
                .map(SymbolSet::Many),
            _ => Err(shape_error()),
        }
    }

    pub fn symbols(&self) -> Vec<&str> {
        match self {
            SymbolSet::Single(s) => vec![s.as_str()],
            SymbolSet::Many(list) => list.iter().map(String::as_str).collect(),
        }
    }
}

pub struct Ingestion {
    symbols: SymbolSet,
    data_dir: PathBuf,
    format: CsvFormat,
}

impl Ingestion {
    pub fn new(symbols: SymbolSet, data_dir: impl Into<PathBuf>, format: CsvFormat) -> Self {
        Self {
            symbols,
            data_dir: data_dir.into(),
            format,
        }
    }

    pub fn path_for(&self, symbol: &str) -> PathBuf {
        self.data_dir.join(format!("{}.csv", symbol))
    }

    pub fn load_symbol(&self, symbol: &str) -> Result<PriceSeries, EngineError> {
        let path = self.path_for(symbol);
        tracing::info!(symbol, path = %path.display(), "Loading price history");
        let candles = CsvParser::load_candles_from_csv(&path, symbol, &self.format)?;
        PriceSeries::new(symbol, candles)
    }

    /// Loads every configured symbol; the first failure aborts the whole load.
    pub fn run(&self) -> Result<Vec<PriceSeries>, EngineError> {
        self.symbols
            .symbols()
            .into_iter()
            .map(|symbol| self.load_symbol(symbol))
            .collect()
    }
}
