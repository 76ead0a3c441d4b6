// Lagged copies of indicator columns, used by the confirmation window.

/// Value at row `i` is `values[i - lag]`; the first `lag` rows are `None`.
pub fn shift(values: &[Option<f64>], lag: usize) -> Vec<Option<f64>> {
    let lead = lag.min(values.len());
    let mut shifted = vec![None; lead];
    shifted.extend_from_slice(&values[..values.len() - lead]);
    shifted
}

pub fn shift_column_name(base: &str, lag: usize) -> String {
    format!("{}_shift{}", base, lag)
}

/// Lags 1..=depth of `values`, paired with their column names.
pub fn lagged_columns(base: &str, values: &[Option<f64>], depth: usize) -> Vec<(String, Vec<Option<f64>>)> {
    (1..=depth)
        .map(|lag| (shift_column_name(base, lag), shift(values, lag)))
        .collect()
}
