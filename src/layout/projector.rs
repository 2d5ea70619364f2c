// Layout projection: vectors to canvas coordinates.
//
// The reducer produces an unbounded 2D layout; each axis is then min-max
// normalized to [0, 1] on its own and stretched to the canvas size. An axis
// with no spread maps to 0.

use tracing::debug;

use super::traits::{ReductionError, ReductionParams, Reducer};
use crate::error::PipelineError;

/// Canvas size and reducer hyperparameters for a projection.
#[derive(Debug, Clone, PartialEq)]
pub struct ProjectionSettings {
    pub canvas_width: f64,
    pub canvas_height: f64,
    /// Upper bound on the neighborhood size; the effective value is
    /// min(max_neighbors, N - 1)
    pub max_neighbors: usize,
    pub min_dist: f64,
    pub spread: f64,
    pub seed: u64,
}

impl Default for ProjectionSettings {
    fn default() -> Self {
        Self {
            canvas_width: 2560.0,
            canvas_height: 1600.0,
            max_neighbors: 15,
            min_dist: 0.6,
            spread: 1.2,
            seed: 42,
        }
    }
}

impl ProjectionSettings {
    /// Reducer parameters for `n` points.
    pub fn reduction_params(&self, n: usize) -> ReductionParams {
        ReductionParams {
            target_dim: 2,
            neighbors: self.max_neighbors.min(n.saturating_sub(1)),
            seed: self.seed,
            spread: self.spread,
            min_dist: self.min_dist,
        }
    }
}

/// Project the matrix rows onto the canvas. One (x, y) per row, same order.
pub fn project(
    matrix: &[Vec<f32>],
    reducer: &dyn Reducer,
    settings: &ProjectionSettings,
) -> Result<Vec<(f64, f64)>, PipelineError> {
    let n = matrix.len();
    if n < 2 {
        return Err(PipelineError::InsufficientTerms { found: n });
    }

    let params = settings.reduction_params(n);
    debug!(
        points = n,
        neighbors = params.neighbors,
        min_dist = params.min_dist,
        spread = params.spread,
        seed = params.seed,
        "Reducing embeddings to 2D"
    );

    let reduced = reducer.reduce(matrix, &params)?;
    check_shape(&reduced, n)?;

    let xs: Vec<f64> = reduced.iter().map(|row| row[0]).collect();
    let ys: Vec<f64> = reduced.iter().map(|row| row[1]).collect();

    let xs = min_max_normalize(&xs);
    let ys = min_max_normalize(&ys);

    Ok(xs
        .into_iter()
        .zip(ys)
        .map(|(x, y)| (x * settings.canvas_width, y * settings.canvas_height))
        .collect())
}

fn check_shape(reduced: &[Vec<f64>], n: usize) -> Result<(), ReductionError> {
    let cols = reduced.first().map_or(0, Vec::len);
    if reduced.len() != n || reduced.iter().any(|row| row.len() != 2) {
        return Err(ReductionError::Shape {
            rows: reduced.len(),
            cols,
            expected_rows: n,
            expected_cols: 2,
        });
    }
    if let Some(row) = reduced
        .iter()
        .position(|r| r.iter().any(|v| !v.is_finite()))
    {
        return Err(ReductionError::NonFinite(row));
    }
    Ok(())
}

/// Scale values linearly so the minimum becomes 0 and the maximum 1.
/// A constant input maps to all zeros.
pub fn min_max_normalize(values: &[f64]) -> Vec<f64> {
    let min = values.iter().copied().fold(f64::INFINITY, f64::min);
    let max = values.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    let range = max - min;
    values
        .iter()
        .map(|v| if range > 0.0 { (v - min) / range } else { 0.0 })
        .collect()
}
