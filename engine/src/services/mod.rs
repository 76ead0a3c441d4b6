// Batch runner that drives ingestion, the pipeline and output per symbol.
pub mod runner;

pub use runner::{run_all, RunSummary};
