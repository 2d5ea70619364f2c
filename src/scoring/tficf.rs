// TF-ICF scoring: term frequency times inverse corpus frequency.
//
// A smoothed TF-IDF where the "documents" are the sentences of the one
// submitted text. It measures how salient a term is within the text, not how
// rare it is in the language:
//
//   tf(t)  = count(t) / total_terms
//   icf(t) = ln((1 + total_sentences) / (1 + sentences_containing(t))) + 1
//   score  = tf(t) * icf(t)

use std::collections::{HashMap, HashSet};

use serde::Serialize;
use tracing::debug;

use crate::error::PipelineError;
use crate::text::preprocess::SentenceTerms;

/// A unique term with its TF-ICF score.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScoredTerm {
    pub term: String,
    pub score: f64,
    /// Position of the term's first occurrence in the flattened term
    /// stream. Used as the tie-break when scores are equal.
    pub first_seen: usize,
}

struct TermStats {
    count: usize,
    sentences: usize,
    first_seen: usize,
}

/// Score every distinct term across the sentence groups.
///
/// Returns one entry per distinct term, in first-occurrence order.
/// Fails with `NoTerms` when every group is empty.
pub fn score_terms(groups: &[SentenceTerms]) -> Result<Vec<ScoredTerm>, PipelineError> {
    let mut order: Vec<&str> = Vec::new();
    let mut stats: HashMap<&str, TermStats> = HashMap::new();
    let mut position = 0usize;

    for group in groups {
        let mut in_this_sentence: HashSet<&str> = HashSet::new();
        for term in group {
            let entry = stats.entry(term.as_str()).or_insert_with(|| {
                order.push(term.as_str());
                TermStats {
                    count: 0,
                    sentences: 0,
                    first_seen: position,
                }
            });
            entry.count += 1;
            if in_this_sentence.insert(term.as_str()) {
                entry.sentences += 1;
            }
            position += 1;
        }
    }

    if order.is_empty() {
        return Err(PipelineError::NoTerms);
    }

    let total_terms = position as f64;
    let total_sentences = groups.len() as f64;

    let scored: Vec<ScoredTerm> = order
        .into_iter()
        .map(|term| {
            let s = &stats[term];
            let tf = s.count as f64 / total_terms;
            let icf = ((1.0 + total_sentences) / (1.0 + s.sentences as f64)).ln() + 1.0;
            ScoredTerm {
                term: term.to_string(),
                score: tf * icf,
                first_seen: s.first_seen,
            }
        })
        .collect();

    debug!(
        distinct_terms = scored.len(),
        total_terms = position,
        sentences = groups.len(),
        "Computed TF-ICF scores"
    );

    Ok(scored)
}
