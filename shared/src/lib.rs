pub mod models;
pub mod utils;

// Shared between the engine library and anything that consumes its output
// tables (chart layers, notebooks, other services).
