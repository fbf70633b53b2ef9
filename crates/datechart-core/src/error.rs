// File: crates/datechart-core/src/error.rs
// Summary: Error type for fallible configuration entry points.

use thiserror::Error;

pub type ChartResult<T> = Result<T, ChartError>;

#[derive(Debug, Error)]
pub enum ChartError {
    #[error("invalid color: {0:?}")]
    InvalidColor(String),

    #[error("a color scale needs at least two stops, got {got}")]
    TooFewColorStops { got: usize },

    #[error("dates and values differ in length: {dates} dates, {values} values")]
    LengthMismatch { dates: usize, values: usize },

    #[error("invalid config: {0}")]
    Config(#[from] serde_json::Error),
}
