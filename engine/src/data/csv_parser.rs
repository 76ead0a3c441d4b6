use anyhow::{anyhow, Context, Result};
use chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime, Utc};
use csv::{ReaderBuilder, StringRecord};
use shared::models::Candle; // Using the Candle model from the shared crate
use shared::utils::parse_decimal;
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

use crate::error::EngineError;

/// Header names of the columns the parser reads.
#[derive(Debug, Clone, PartialEq)]
pub struct ColumnNames {
    pub symbol: Option<String>,
    pub date: String,
    pub time: Option<String>,
    pub open: String,
    pub high: String,
    pub low: String,
    pub close: String,
    pub volume: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct CsvFormat {
    pub delimiter: u8,
    pub decimal_separator: char,
    pub thousand_separator: Option<char>,
    pub date_format: String,
    // None when the date column carries the whole timestamp (or only a date).
    pub time_format: Option<String>,
    pub columns: ColumnNames,
}

impl CsvFormat {
    /// `Date,Open,High,Low,Close,Volume` with ISO dates, as market-data exports write it.
    pub fn standard() -> Self {
        CsvFormat {
            delimiter: b',',
            decimal_separator: '.',
            thousand_separator: None,
            date_format: "%Y-%m-%d".to_string(),
            time_format: None,
            columns: ColumnNames {
                symbol: None,
                date: "Date".to_string(),
                time: None,
                open: "Open".to_string(),
                high: "High".to_string(),
                low: "Low".to_string(),
                close: "Close".to_string(),
                volume: Some("Volume".to_string()),
            },
        }
    }

    // CSV Header: Ativo;Data;Hora;Abertura;Máximo;Mínimo;Fechamento;Volume;Quantidade
    // Example Row: WINFUT;30/12/2024;18:20:00;124.080;124.090;123.938;123.983;600.822.115,84;24.228
    pub fn brazilian() -> Self {
        CsvFormat {
            delimiter: b';',
            decimal_separator: ',',
            thousand_separator: Some('.'),
            date_format: "%d/%m/%Y".to_string(),
            time_format: Some("%H:%M:%S".to_string()),
            columns: ColumnNames {
                symbol: Some("Ativo".to_string()),
                date: "Data".to_string(),
                time: Some("Hora".to_string()),
                open: "Abertura".to_string(),
                high: "Máximo".to_string(),
                low: "Mínimo".to_string(),
                close: "Fechamento".to_string(),
                volume: Some("Volume".to_string()),
            },
        }
    }

    fn parse_decimal(&self, s: &str) -> Result<f64> {
        parse_decimal(s, self.decimal_separator, self.thousand_separator)
    }

    /// Date plus optional time column, interpreted as UTC. Without a time column
    /// the date column may hold a full datetime in `date_format`, or just a date
    /// (midnight).
    pub fn parse_datetime(&self, date_str: &str, time_str: Option<&str>) -> Result<DateTime<Utc>> {
        let date_str = date_str.trim();
        let naive = match (time_str, &self.time_format) {
            (Some(time_str), Some(time_format)) => {
                let date = NaiveDate::parse_from_str(date_str, &self.date_format)
                    .map_err(|e| anyhow!("Failed to parse date '{}': {}", date_str, e))?;
                let time = NaiveTime::parse_from_str(time_str.trim(), time_format)
                    .map_err(|e| anyhow!("Failed to parse time '{}': {}", time_str, e))?;
                date.and_time(time)
            }
            _ => match NaiveDate::parse_from_str(date_str, &self.date_format) {
                Ok(date) => date.and_time(NaiveTime::MIN),
                Err(_) => NaiveDateTime::parse_from_str(date_str, &self.date_format)
                    .map_err(|e| anyhow!("Failed to parse date '{}': {}", date_str, e))?,
            },
        };
        Ok(DateTime::from_naive_utc_and_offset(naive, Utc))
    }
}

impl Default for CsvFormat {
    fn default() -> Self {
        Self::standard()
    }
}

pub struct CsvParser;

impl CsvParser {
    pub fn load_candles_from_csv(
        file_path: impl AsRef<Path>,
        default_symbol: &str,
        format: &CsvFormat,
    ) -> Result<Vec<Candle>, EngineError> {
        let file = File::open(file_path.as_ref())?;
        let candles = Self::read_candles(BufReader::new(file), default_symbol, format)?;
        tracing::debug!(
            path = %file_path.as_ref().display(),
            symbol = default_symbol,
            rows = candles.len(),
            "Parsed candles from CSV"
        );
        Ok(candles)
    }

    pub fn read_candles<R: Read>(reader: R, default_symbol: &str, format: &CsvFormat) -> Result<Vec<Candle>, EngineError> {
        let mut rdr = ReaderBuilder::new()
            .delimiter(format.delimiter)
            .has_headers(true)
            .from_reader(reader);

        let headers = rdr.headers()?.clone();
        let mut candles = Vec::new();

        for (idx, result) in rdr.records().enumerate() {
            let record = result?;
            let line = idx + 2; // header is line 1
            let candle = Self::parse_record(&record, &headers, default_symbol, format)
                .with_context(|| format!("line {}", line))
                .map_err(|e| EngineError::CsvDataFormatError(format!("{:#}", e)))?;
            candles.push(candle);
        }
        Ok(candles)
    }

    fn parse_record(record: &StringRecord, headers: &StringRecord, default_symbol: &str, format: &CsvFormat) -> Result<Candle> {
        let cols = &format.columns;

        let symbol = match &cols.symbol {
            Some(name) => Self::get_field(record, headers, name).unwrap_or(default_symbol),
            None => default_symbol,
        };
        let date_str = Self::require_field(record, headers, &cols.date)?;
        let time_str = match &cols.time {
            Some(name) => Some(Self::require_field(record, headers, name)?),
            None => None,
        };
        let timestamp = format.parse_datetime(date_str, time_str)?;

        let open = Self::decimal_field(record, headers, &cols.open, format)?;
        let high = Self::decimal_field(record, headers, &cols.high, format)?;
        let low = Self::decimal_field(record, headers, &cols.low, format)?;
        let close = Self::decimal_field(record, headers, &cols.close, format)?;
        let volume = match &cols.volume {
            Some(name) if Self::get_field(record, headers, name).is_some() => Self::decimal_field(record, headers, name, format)?,
            _ => 0.0,
        };

        Ok(Candle {
            symbol: symbol.to_string(),
            timestamp,
            open,
            high,
            low,
            close,
            volume,
        })
    }

    fn decimal_field(record: &StringRecord, headers: &StringRecord, name: &str, format: &CsvFormat) -> Result<f64> {
        let raw = Self::require_field(record, headers, name)?;
        format.parse_decimal(raw).with_context(|| format!("Error parsing '{}'", name))
    }

    fn require_field<'a>(record: &'a StringRecord, headers: &StringRecord, name: &str) -> Result<&'a str> {
        Self::get_field(record, headers, name).ok_or_else(|| anyhow!("Missing '{}' field", name))
    }

    // Looks a field up by header name so column order in the file does not matter.
    fn get_field<'a>(record: &'a StringRecord, headers: &StringRecord, name: &str) -> Option<&'a str> {
        headers
            .iter()
            .position(|header| header.trim() == name)
            .and_then(|pos| record.get(pos))
    }
}
