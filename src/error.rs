// Pipeline error taxonomy.
//
// Every stage validates its own preconditions and fails with one of these
// kinds. Nothing here is retried; the caller decides what to do with it.

use thiserror::Error;

use crate::layout::traits::ReductionError;

/// A terminal failure of one pipeline invocation.
#[derive(Debug, Error)]
pub enum PipelineError {
    /// Sentence splitting found nothing in the input text.
    #[error("No valid sentences found.")]
    EmptyInput,

    /// Filtering left no usable terms.
    #[error("No valid terms after processing.")]
    NoTerms,

    /// The selected terms carry zero total score.
    #[error("Normalization failed due to zero sum of scores.")]
    Normalization,

    /// Projection needs at least two points.
    #[error("Insufficient terms for dimensionality reduction.")]
    InsufficientTerms { found: usize },

    /// The embedding matrix came out empty.
    #[error("No embeddings found.")]
    NoEmbeddings,

    /// The reduction algorithm failed internally.
    #[error("UMAP reduction failed: {0}")]
    Projection(#[from] ReductionError),

    /// The pipeline was built from an invalid configuration.
    #[error("Invalid pipeline configuration: {0}")]
    InvalidConfig(String),
}

impl PipelineError {
    /// True when the failure was caused by the submitted text rather than
    /// by the system. The HTTP layer maps these to 400.
    pub fn is_client_error(&self) -> bool {
        !matches!(
            self,
            PipelineError::Projection(_) | PipelineError::InvalidConfig(_)
        )
    }
}
