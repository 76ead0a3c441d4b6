use thiserror::Error;

#[derive(Error, Debug)]
pub enum EngineError {
    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("CSV parsing system error: {source}")]
    CsvSystemError {
        #[from]
        source: csv::Error,
    },

    #[error("I/O error: {source}")]
    IoError {
        #[from]
        source: std::io::Error,
    },

    #[error("CSV data format error: {0}")]
    CsvDataFormatError(String),

    // Input rows must arrive strictly ascending by timestamp; the engine never reorders.
    #[error("Price series for '{symbol}' is not strictly ascending at row {index}")]
    SeriesOrder { symbol: String, index: usize },

    #[error("Missing prerequisite column '{column}' (stages run out of dependency order?)")]
    MissingColumn { column: String },

    #[error("Column '{column}' has {actual} rows, table has {expected}")]
    ColumnLength {
        column: String,
        expected: usize,
        actual: usize,
    },

    #[error(transparent)]
    AnyhowError(#[from] anyhow::Error),
}

impl EngineError {
    pub fn missing_column(column: impl Into<String>) -> Self {
        EngineError::MissingColumn { column: column.into() }
    }
}
