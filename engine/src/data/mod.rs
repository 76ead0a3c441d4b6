// Data acquisition (CSV supplier) and the table handoff to presentation layers.
pub mod csv_parser;
pub mod ingestion;
pub mod output;
