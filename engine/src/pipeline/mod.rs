// Ordered stages that each append columns to one indicator table.
pub mod macd_analysis;
pub mod rsi_analysis;
pub mod transformation;

pub use macd_analysis::MacdAnalysis;
pub use rsi_analysis::RsiAnalysis;
pub use transformation::Transformation;

use crate::config::IndicatorSettings;
use crate::error::EngineError;
use crate::models::{IndicatorTable, PriceSeries};

pub trait PipelineStep: Send + Sync {
    fn name(&self) -> &str;
    /// Reads columns produced by earlier stages and appends its own.
    fn run(&self, table: IndicatorTable) -> Result<IndicatorTable, EngineError>;
}

pub struct Pipeline {
    steps: Vec<Box<dyn PipelineStep>>,
}

impl Pipeline {
    /// Transformation first (the cross signal needs its lag columns), then the
    /// optional MACD and RSI stages.
    pub fn from_settings(settings: &IndicatorSettings) -> Self {
        let mut steps: Vec<Box<dyn PipelineStep>> = vec![Box::new(Transformation::from_settings(settings))];
        if settings.macd {
            steps.push(Box::new(MacdAnalysis::from_settings(settings)));
        }
        if settings.rsi {
            steps.push(Box::new(RsiAnalysis::new(settings.rsi_period)));
        }
        Self { steps }
    }

    pub fn step_names(&self) -> Vec<&str> {
        self.steps.iter().map(|s| s.name()).collect()
    }

    pub fn run(&self, series: PriceSeries) -> Result<IndicatorTable, EngineError> {
        let symbol = series.symbol().to_string();
        let rows = series.len();
        tracing::info!(symbol = %symbol, rows, "Running indicator pipeline");

        let mut table = IndicatorTable::new(series);
        for step in &self.steps {
            tracing::debug!(symbol = %symbol, stage = step.name(), "Running stage");
            table = step.run(table)?;
        }

        tracing::info!(symbol = %symbol, columns = table.columns().len(), "Pipeline finished");
        Ok(table)
    }
}
