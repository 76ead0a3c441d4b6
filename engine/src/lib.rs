// Engine library root
// Indicator and signal derivation over a complete price history:
// raw price table -> moving averages -> lag columns -> cross signal -> MACD / RSI.

pub mod config;
pub mod data;
pub mod error;
pub mod indicators;
pub mod models;
pub mod pipeline;
pub mod services;

pub use error::EngineError;
pub use models::{IndicatorTable, PriceSeries};
pub use pipeline::Pipeline;
