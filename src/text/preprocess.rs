// Text preprocessing: raw text into per-sentence term groups.
//
// Each sentence is lower-cased, annotated by the Analyzer, and filtered down
// to alphabetic, non-stopword adjective and noun lemmas. Sentences that end
// up with no terms are kept as empty groups: they still count toward the
// sentence total the scorer divides by.

use tracing::{debug, trace};

use super::analyzer::{Analyzer, Token};
use crate::error::PipelineError;

/// The filtered, lemmatized terms of one input sentence, in token order.
pub type SentenceTerms = Vec<String>;

/// Split `text` into sentences and extract the terms of each one.
///
/// Fails with `EmptyInput` when sentence splitting finds nothing.
pub fn preprocess(analyzer: &dyn Analyzer, text: &str) -> Result<Vec<SentenceTerms>, PipelineError> {
    let sentences = analyzer.sentences(text);
    if sentences.is_empty() {
        return Err(PipelineError::EmptyInput);
    }

    let groups: Vec<SentenceTerms> = sentences
        .iter()
        .map(|sentence| {
            let lowered = sentence.to_lowercase();
            let terms: SentenceTerms = analyzer
                .annotate(&lowered)
                .into_iter()
                .filter(|token| keep_token(analyzer, token))
                .map(|token| token.lemma)
                .collect();
            trace!(terms = ?terms, "Filtered sentence terms");
            terms
        })
        .collect();

    debug!(
        sentences = groups.len(),
        terms = groups.iter().map(Vec::len).sum::<usize>(),
        "Preprocessed text"
    );

    Ok(groups)
}

/// A token survives filtering when its lemma is purely alphabetic, not a
/// stopword, and tagged as an adjective or noun.
pub fn keep_token(analyzer: &dyn Analyzer, token: &Token) -> bool {
    !token.lemma.is_empty()
        && token.lemma.chars().all(char::is_alphabetic)
        && token.tag.is_content()
        && !analyzer.is_stopword(&token.lemma)
}
