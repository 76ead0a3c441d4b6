use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Candle {
    pub symbol: String,
    pub timestamp: DateTime<Utc>,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    pub volume: f64,
}

/// Per-row trading decision. Serialized as 1 / -1 / 0 so downstream tables
/// keep the numeric convention.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Signal {
    Buy,
    Sell,
    #[default]
    Neutral,
}

impl Signal {
    pub fn as_i8(self) -> i8 {
        match self {
            Signal::Buy => 1,
            Signal::Sell => -1,
            Signal::Neutral => 0,
        }
    }

    pub fn from_i8(value: i8) -> Option<Self> {
        match value {
            1 => Some(Signal::Buy),
            -1 => Some(Signal::Sell),
            0 => Some(Signal::Neutral),
            _ => None,
        }
    }

    pub fn is_actionable(self) -> bool {
        !matches!(self, Signal::Neutral)
    }
}

impl Serialize for Signal {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_i8(self.as_i8())
    }
}

impl<'de> Deserialize<'de> for Signal {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = i8::deserialize(deserializer)?;
        Signal::from_i8(raw)
            .ok_or_else(|| serde::de::Error::custom(format!("invalid signal value {}, expected 1, -1 or 0", raw)))
    }
}

// A point the chart layer draws as a vertical line (green for Buy, red for Sell).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SignalMarker {
    pub timestamp: DateTime<Utc>,
    pub signal: Signal,
}
