// Engine settings, loaded from a JSON file; every field falls back to its default.
use serde::Deserialize;
use serde_json::Value;
use std::path::{Path, PathBuf};

use crate::data::csv_parser::CsvFormat;
use crate::error::EngineError;

// Used when the binary is started without a settings path.
const BUNDLED_SETTINGS: &str = include_str!("../../config/default.json");

#[derive(Debug, Deserialize, Clone, Default)]
#[serde(default)]
pub struct EngineSettings {
    pub indicators: IndicatorSettings,
    pub data: DataSettings,
    pub ingestion: IngestionSettings,
}

#[derive(Debug, Deserialize, Clone, PartialEq)]
#[serde(default, rename_all = "camelCase")]
pub struct IndicatorSettings {
    pub period_sma: usize,
    pub period_ema: usize,
    pub shift_number: usize,
    pub shift_confirm: usize,
    pub fast_ema: usize,
    pub slow_ema: usize,
    pub period_signal: usize,
    pub rsi_period: usize,
    pub macd: bool,
    pub rsi: bool,
}

impl Default for IndicatorSettings {
    fn default() -> Self {
        IndicatorSettings {
            period_sma: 10,
            period_ema: 10,
            shift_number: 3,
            shift_confirm: 3,
            fast_ema: 12,
            slow_ema: 26,
            period_signal: 9,
            rsi_period: 14,
            macd: true,
            rsi: true,
        }
    }
}

#[derive(Debug, Deserialize, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum FormatPreset {
    #[default]
    Standard,
    Brazilian,
}

#[derive(Debug, Deserialize, Clone, Default)]
#[serde(default, rename_all = "camelCase")]
pub struct DataSettings {
    pub format: FormatPreset,
    pub csv_delimiter: Option<char>,
    pub decimal_separator: Option<char>,
    pub thousand_separator: Option<char>,
    pub date_format: Option<String>,
    pub time_format: Option<String>,
}

impl DataSettings {
    pub fn csv_format(&self) -> CsvFormat {
        let mut format = match self.format {
            FormatPreset::Standard => CsvFormat::standard(),
            FormatPreset::Brazilian => CsvFormat::brazilian(),
        };
        if let Some(delimiter) = self.csv_delimiter {
            format.delimiter = delimiter as u8;
        }
        if let Some(decimal) = self.decimal_separator {
            format.decimal_separator = decimal;
        }
        if self.thousand_separator.is_some() {
            format.thousand_separator = self.thousand_separator;
        }
        if let Some(date_format) = &self.date_format {
            format.date_format = date_format.clone();
        }
        if self.time_format.is_some() {
            format.time_format = self.time_format.clone();
        }
        format
    }
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default, rename_all = "camelCase")]
pub struct IngestionSettings {
    // A single ticker string or a list of tickers; validated by `SymbolSet::from_value`.
    pub symbols: Value,
    pub data_dir: PathBuf,
    pub output_dir: PathBuf,
}

impl Default for IngestionSettings {
    fn default() -> Self {
        IngestionSettings {
            symbols: Value::Array(vec![Value::from("PPTA"), Value::from("AEM")]),
            data_dir: PathBuf::from("data"),
            output_dir: PathBuf::from("output"),
        }
    }
}

impl EngineSettings {
    pub fn from_json_str(raw: &str) -> Result<Self, EngineError> {
        serde_json::from_str(raw)
            .map_err(|e| EngineError::ConfigError(format!("Invalid settings JSON: {}", e)))
    }

    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self, EngineError> {
        let raw = std::fs::read_to_string(path.as_ref())?;
        tracing::debug!(path = %path.as_ref().display(), "Loaded settings file");
        Self::from_json_str(&raw)
    }

    pub fn bundled() -> Result<Self, EngineError> {
        Self::from_json_str(BUNDLED_SETTINGS)
    }

    /// Reads `path` when given, otherwise falls back to the bundled settings.
    pub fn load(path: Option<&str>) -> Result<Self, EngineError> {
        match path {
            Some(path) => {
                tracing::info!(path = %path, "Loading settings");
                Self::from_json_file(path)
            }
            None => {
                tracing::info!("No settings file given, using bundled defaults");
                Self::bundled()
            }
        }
    }

    pub fn validate(&self) -> Result<(), EngineError> {
        self.indicators.validate()?;
        if self.data.csv_delimiter.is_some_and(|d| !d.is_ascii()) {
            return Err(EngineError::ConfigError("csvDelimiter must be a single ASCII character".to_string()));
        }
        Ok(())
    }
}

impl IndicatorSettings {
    pub fn validate(&self) -> Result<(), EngineError> {
        let periods = [
            ("periodSma", self.period_sma),
            ("periodEma", self.period_ema),
            ("fastEma", self.fast_ema),
            ("slowEma", self.slow_ema),
            ("periodSignal", self.period_signal),
            ("rsiPeriod", self.rsi_period),
        ];
        if let Some((name, _)) = periods.iter().find(|(_, p)| *p == 0) {
            return Err(EngineError::ConfigError(format!("{} must be a positive integer", name)));
        }
        // Confirmation reads lag columns 1..=shiftConfirm, which only exist up to shiftNumber.
        if self.shift_confirm > self.shift_number {
            return Err(EngineError::ConfigError(format!(
                "shiftConfirm ({}) cannot exceed shiftNumber ({})",
                self.shift_confirm, self.shift_number
            )));
        }
        if self.macd && self.fast_ema >= self.slow_ema {
            tracing::warn!(
                fast_ema = self.fast_ema,
                slow_ema = self.slow_ema,
                "fastEma is not shorter than slowEma; MACD line will be non-standard"
            );
        }
        Ok(())
    }
}
