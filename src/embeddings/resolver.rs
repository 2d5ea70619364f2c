// Embedding resolution: one vector per selected term, in rank order.
//
// Unknown terms get a zero vector instead of being dropped, so terms, scores,
// tiers and vectors stay positionally aligned through the rest of the
// pipeline. They are reported, never fatal.

use tracing::{debug, warn};

use super::traits::WordVectors;
use crate::error::PipelineError;
use crate::scoring::selection::RankedTerm;

/// Where a term's vector came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VectorSource {
    /// Found in the word-vector table
    Resolved,
    /// Unknown term, zero vector substituted
    ZeroFallback,
}

/// A term paired with its vector.
#[derive(Debug, Clone, PartialEq)]
pub struct TermVector {
    pub term: String,
    pub vector: Vec<f32>,
    pub source: VectorSource,
}

/// The vector matrix for a ranked term list.
#[derive(Debug, Clone)]
pub struct ResolvedEmbeddings {
    /// One entry per ranked term, same order
    pub vectors: Vec<TermVector>,
    /// Terms the provider didn't recognize
    pub missing: Vec<String>,
}

impl ResolvedEmbeddings {
    /// The bare vectors as matrix rows, for the reducer.
    pub fn matrix(&self) -> Vec<Vec<f32>> {
        self.vectors.iter().map(|tv| tv.vector.clone()).collect()
    }
}

/// Look up every ranked term in the provider.
///
/// Fails with `NoEmbeddings` on an empty matrix and with
/// `InsufficientTerms` when fewer than two rows are available, since the
/// projection is undefined below two points.
pub fn resolve_embeddings(
    terms: &[RankedTerm],
    provider: &dyn WordVectors,
) -> Result<ResolvedEmbeddings, PipelineError> {
    let dim = provider.dimensionality();
    let mut missing = Vec::new();

    let vectors: Vec<TermVector> = terms
        .iter()
        .map(|ranked| match provider.lookup(&ranked.term) {
            Some(vector) => TermVector {
                term: ranked.term.clone(),
                vector: vector.to_vec(),
                source: VectorSource::Resolved,
            },
            None => {
                missing.push(ranked.term.clone());
                TermVector {
                    term: ranked.term.clone(),
                    vector: vec![0.0; dim],
                    source: VectorSource::ZeroFallback,
                }
            }
        })
        .collect();

    if vectors.is_empty() {
        return Err(PipelineError::NoEmbeddings);
    }

    if !missing.is_empty() {
        warn!(
            missing = missing.len(),
            terms = ?missing,
            "No embedding for some terms, using zero vectors"
        );
    }

    if vectors.len() < 2 {
        return Err(PipelineError::InsufficientTerms {
            found: vectors.len(),
        });
    }

    debug!(rows = vectors.len(), dim, "Resolved embedding matrix");

    Ok(ResolvedEmbeddings { vectors, missing })
}
