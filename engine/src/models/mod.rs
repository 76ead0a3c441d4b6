// Engine-side containers around the shared Candle model.
pub mod series;
pub mod table;

pub use series::PriceSeries;
pub use table::{Column, IndicatorTable};
