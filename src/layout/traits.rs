// Dimensionality reduction trait: the swap-ready abstraction.
//
// The projector hands over an N x M matrix and gets N x target_dim back.
// Implementations must be deterministic for a fixed seed: identical input
// and parameters give identical coordinates.

use thiserror::Error;

/// Hyperparameters passed to every reduction.
#[derive(Debug, Clone, PartialEq)]
pub struct ReductionParams {
    pub target_dim: usize,
    /// Neighborhood size; always less than the number of rows
    pub neighbors: usize,
    pub seed: u64,
    pub spread: f64,
    pub min_dist: f64,
}

#[derive(Debug, Error)]
pub enum ReductionError {
    #[error("need at least 2 points, got {0}")]
    TooFewPoints(usize),

    #[error("neighborhood size {neighbors} must be between 1 and {max}")]
    InvalidNeighbors { neighbors: usize, max: usize },

    #[error("row {row} has {found} columns, expected {expected}")]
    RaggedInput {
        row: usize,
        expected: usize,
        found: usize,
    },

    #[error("invalid parameter: {0}")]
    InvalidParameter(String),

    #[error("reducer returned {rows}x{cols} coordinates, expected {expected_rows}x{expected_cols}")]
    Shape {
        rows: usize,
        cols: usize,
        expected_rows: usize,
        expected_cols: usize,
    },

    #[error("reducer produced a non-finite coordinate at row {0}")]
    NonFinite(usize),

    #[error("{0}")]
    Failed(String),
}

/// Trait for reducing high-dimensional rows to a low-dimensional layout.
pub trait Reducer: Send + Sync {
    fn reduce(
        &self,
        data: &[Vec<f32>],
        params: &ReductionParams,
    ) -> Result<Vec<Vec<f64>>, ReductionError>;
}
