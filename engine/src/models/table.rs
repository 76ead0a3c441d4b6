// The price series plus every column the pipeline stages derive from it.
use shared::models::{Candle, Signal, SignalMarker};

use super::series::PriceSeries;
use crate::error::EngineError;

#[derive(Debug, Clone, PartialEq)]
pub enum Column {
    Values(Vec<Option<f64>>),
    Signals(Vec<Signal>),
}

impl Column {
    pub fn len(&self) -> usize {
        match self {
            Column::Values(v) => v.len(),
            Column::Signals(s) => s.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Row-aligned table: column values at position `i` belong to candle `i`.
#[derive(Debug, Clone)]
pub struct IndicatorTable {
    series: PriceSeries,
    columns: Vec<(String, Column)>,
}

impl IndicatorTable {
    pub fn new(series: PriceSeries) -> Self {
        Self { series, columns: Vec::new() }
    }

    pub fn symbol(&self) -> &str {
        self.series.symbol()
    }

    pub fn candles(&self) -> &[Candle] {
        self.series.candles()
    }

    pub fn len(&self) -> usize {
        self.series.len()
    }

    pub fn is_empty(&self) -> bool {
        self.series.is_empty()
    }

    pub fn insert_values(&mut self, name: impl Into<String>, values: Vec<Option<f64>>) -> Result<(), EngineError> {
        self.insert(name.into(), Column::Values(values))
    }

    pub fn insert_signals(&mut self, name: impl Into<String>, signals: Vec<Signal>) -> Result<(), EngineError> {
        self.insert(name.into(), Column::Signals(signals))
    }

    // Re-inserting a name overwrites in place and keeps the original column position.
    fn insert(&mut self, name: String, column: Column) -> Result<(), EngineError> {
        if column.len() != self.len() {
            return Err(EngineError::ColumnLength {
                column: name,
                expected: self.len(),
                actual: column.len(),
            });
        }
        tracing::trace!(symbol = %self.symbol(), column = %name, "Inserting column");
        match self.columns.iter_mut().find(|(existing, _)| *existing == name) {
            Some((_, slot)) => *slot = column,
            None => self.columns.push((name, column)),
        }
        Ok(())
    }

    pub fn column(&self, name: &str) -> Option<&Column> {
        self.columns.iter().find(|(n, _)| n == name).map(|(_, c)| c)
    }

    pub fn has_column(&self, name: &str) -> bool {
        self.column(name).is_some()
    }

    pub fn values(&self, name: &str) -> Option<&[Option<f64>]> {
        match self.column(name)? {
            Column::Values(v) => Some(v),
            Column::Signals(_) => None,
        }
    }

    /// Like `values` but treats absence as a stage-ordering defect.
    pub fn require_values(&self, name: &str) -> Result<&[Option<f64>], EngineError> {
        self.values(name).ok_or_else(|| EngineError::missing_column(name))
    }

    pub fn signals(&self, name: &str) -> Option<&[Signal]> {
        match self.column(name)? {
            Column::Signals(s) => Some(s),
            Column::Values(_) => None,
        }
    }

    pub fn column_names(&self) -> impl Iterator<Item = &str> {
        self.columns.iter().map(|(n, _)| n.as_str())
    }

    pub fn columns(&self) -> &[(String, Column)] {
        &self.columns
    }

    /// Buy/Sell rows of a signal column as chart markers, in row order.
    pub fn signal_markers(&self, name: &str) -> Vec<SignalMarker> {
        let Some(signals) = self.signals(name) else {
            return Vec::new();
        };
        self.candles()
            .iter()
            .zip(signals)
            .filter(|(_, s)| s.is_actionable())
            .map(|(c, s)| SignalMarker { timestamp: c.timestamp, signal: *s })
            .collect()
    }
}
