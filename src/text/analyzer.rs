// Linguistic toolkit trait and the token types it produces.
//
// The preprocessor only needs sentence splitting, per-sentence annotation
// (word, lemma, part-of-speech tag) and a stopword test. The default
// implementation is the rule-based HeuristicAnalyzer; anything that can
// produce Penn-style tags can be plugged in instead.

/// Penn Treebank style part-of-speech tags.
///
/// Only the tags the heuristic tagger can produce are listed; anything else
/// collapses into `Other`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PosTag {
    /// Adjective
    JJ,
    /// Adjective, comparative
    JJR,
    /// Adjective, superlative
    JJS,
    /// Noun, singular or mass
    NN,
    /// Noun, plural
    NNS,
    /// Proper noun, singular
    NNP,
    /// Proper noun, plural
    NNPS,
    /// Verb, base form
    VB,
    /// Verb, past tense
    VBD,
    /// Verb, gerund or present participle
    VBG,
    /// Verb, non-3rd person singular present
    VBP,
    /// Verb, 3rd person singular present
    VBZ,
    /// Adverb
    RB,
    /// Determiner
    DT,
    /// Preposition or subordinating conjunction
    IN,
    /// Coordinating conjunction
    CC,
    /// Personal pronoun
    PRP,
    /// Possessive pronoun
    PRPS,
    /// Modal
    MD,
    /// The word "to"
    TO,
    /// Cardinal number
    CD,
    /// Possessive ending ('s, ')
    POS,
    /// Punctuation and symbols
    Punct,
    Other,
}

impl PosTag {
    /// Tags whose lemmas are kept as terms: adjectives, nouns and proper
    /// nouns in all their inflections.
    pub fn is_content(self) -> bool {
        matches!(
            self,
            PosTag::JJ
                | PosTag::JJR
                | PosTag::JJS
                | PosTag::NN
                | PosTag::NNS
                | PosTag::NNP
                | PosTag::NNPS
        )
    }

    pub fn is_noun(self) -> bool {
        matches!(self, PosTag::NN | PosTag::NNS | PosTag::NNP | PosTag::NNPS)
    }

    pub fn is_verb(self) -> bool {
        matches!(
            self,
            PosTag::VB | PosTag::VBD | PosTag::VBG | PosTag::VBP | PosTag::VBZ
        )
    }
}

/// One annotated token of a sentence.
#[derive(Debug, Clone, PartialEq)]
pub struct Token {
    /// The surface form as it appeared in the (lower-cased) sentence
    pub word: String,
    /// Dictionary base form
    pub lemma: String,
    pub tag: PosTag,
}

impl Token {
    pub fn new(word: impl Into<String>, lemma: impl Into<String>, tag: PosTag) -> Self {
        Self {
            word: word.into(),
            lemma: lemma.into(),
            tag,
        }
    }
}

/// Trait for the linguistic toolkit the preprocessor consumes.
///
/// Implementations must be pure: the same input always yields the same
/// sentences and annotations.
pub trait Analyzer: Send + Sync {
    /// Split raw text into sentences, in order.
    fn sentences(&self, text: &str) -> Vec<String>;

    /// Tokenize, tag and lemmatize a single sentence. Tokens come back in
    /// original order.
    fn annotate(&self, sentence: &str) -> Vec<Token>;

    /// Whether a lemma is in the stopword set.
    fn is_stopword(&self, lemma: &str) -> bool;
}
