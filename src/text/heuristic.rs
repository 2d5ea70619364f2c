// Rule-based linguistic toolkit.
//
// Sentence and word boundaries come from `unicode-segmentation` (UAX #29),
// with clitics split off Penn-style ("fox's" -> "fox" "'s"). The stopword
// list is NLTK's English list from the `stop-words` crate. Part-of-speech tagging is a
// lexicon + suffix + left-context tagger: closed-class words are looked up,
// open-class words are guessed from their endings and the previous tag.
// Lemmatization is noun lemmatization (plural -> singular), applied to
// tokens tagged as plural nouns.
//
// It is nowhere near a statistical tagger, but it separates the adjectives
// and nouns we keep from the verbs and function words we drop well enough
// for term maps.

use std::collections::HashSet;

use stop_words::{get, LANGUAGE};
use unicode_segmentation::UnicodeSegmentation;

use super::analyzer::{Analyzer, PosTag, Token};

/// The default `Analyzer`: English, rule-based, no model files.
pub struct HeuristicAnalyzer {
    stop_words: HashSet<String>,
}

impl HeuristicAnalyzer {
    pub fn new() -> Self {
        let stop_words: Vec<String> = get(LANGUAGE::English);
        Self {
            stop_words: stop_words.into_iter().collect(),
        }
    }
}

impl Default for HeuristicAnalyzer {
    fn default() -> Self {
        Self::new()
    }
}

impl Analyzer for HeuristicAnalyzer {
    fn sentences(&self, text: &str) -> Vec<String> {
        text.unicode_sentences()
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::to_string)
            .collect()
    }

    fn annotate(&self, sentence: &str) -> Vec<Token> {
        let pieces: Vec<String> = sentence
            .split_word_bounds()
            .filter(|w| !w.trim().is_empty())
            .flat_map(split_clitics)
            .collect();
        let words: Vec<&str> = pieces.iter().map(String::as_str).collect();

        let tags = tag_words(&words);

        words
            .iter()
            .zip(tags)
            .map(|(word, tag)| Token::new(*word, lemmatize(word, tag), tag))
            .collect()
    }

    fn is_stopword(&self, lemma: &str) -> bool {
        self.stop_words.contains(lemma)
    }
}

// ------------------------------------------------------------
// Tokenization
// ------------------------------------------------------------

/// Clitics split off the end of a word, longest match first.
const CLITICS: &[&str] = &["n't", "'ll", "'re", "'ve", "'s", "'d", "'m"];

/// Split a word the way the Penn tokenizer does: "fox's" -> "fox" "'s",
/// "don't" -> "do" "n't", "wolves'" -> "wolves" "'". Curly apostrophes are
/// folded to ASCII first.
fn split_clitics(word: &str) -> Vec<String> {
    let word = word.replace('\u{2019}', "'");

    for clitic in CLITICS {
        if let Some(stem) = word.strip_suffix(clitic) {
            if stem.chars().any(char::is_alphabetic) {
                return vec![stem.to_string(), clitic.to_string()];
            }
        }
    }
    if let Some(stem) = word.strip_suffix('\'') {
        if stem.chars().any(char::is_alphabetic) {
            return vec![stem.to_string(), "'".to_string()];
        }
    }

    vec![word]
}

// ------------------------------------------------------------
// Tagging
// ------------------------------------------------------------

const DETERMINERS: &[&str] = &[
    "a", "an", "the", "this", "that", "these", "those", "each", "every", "some", "any", "no",
    "all", "both", "either", "neither", "another", "such", "what", "which", "whatever",
];

const PRONOUNS: &[&str] = &[
    "i", "you", "he", "she", "it", "we", "they", "me", "him", "us", "them", "who", "whom",
    "myself", "yourself", "himself", "herself", "itself", "ourselves", "themselves",
    "someone", "somebody", "anyone", "everyone", "nobody",
];

const POSSESSIVES: &[&str] = &["my", "your", "his", "her", "its", "our", "their", "whose"];

const PREPOSITIONS: &[&str] = &[
    "of", "in", "on", "at", "by", "for", "with", "about", "against", "between", "into",
    "through", "during", "before", "after", "above", "below", "from", "up", "down", "out",
    "off", "over", "under", "since", "without", "within", "across", "behind", "beyond",
    "near", "toward", "towards", "upon", "among", "around", "like", "than", "because", "if",
    "while", "although", "though", "unless", "until", "whether", "as", "per", "via",
];

const CONJUNCTIONS: &[&str] = &["and", "or", "but", "nor", "yet", "so", "plus"];

const MODALS: &[&str] = &[
    "can", "could", "may", "might", "must", "shall", "should", "will", "would",
];

const ADVERBS: &[&str] = &[
    "not", "very", "also", "just", "too", "never", "always", "often", "here", "there", "now",
    "then", "quite", "rather", "really", "again", "already", "still", "soon", "only", "even",
    "ever", "perhaps", "maybe", "almost", "instead", "together", "away", "back", "how", "when",
    "where", "why", "once", "twice", "else", "however", "therefore", "n't",
];

const AUXILIARIES: &[(&str, PosTag)] = &[
    ("be", PosTag::VB),
    ("am", PosTag::VBP),
    ("are", PosTag::VBP),
    ("is", PosTag::VBZ),
    ("was", PosTag::VBD),
    ("were", PosTag::VBD),
    ("been", PosTag::VBD),
    ("being", PosTag::VBG),
    ("have", PosTag::VBP),
    ("has", PosTag::VBZ),
    ("had", PosTag::VBD),
    ("do", PosTag::VBP),
    ("does", PosTag::VBZ),
    ("did", PosTag::VBD),
];

/// Common adjectives whose shape gives no hint.
const ADJECTIVES: &[&str] = &[
    "quick", "slow", "brown", "lazy", "big", "small", "large", "little", "good", "bad", "new",
    "old", "young", "long", "short", "high", "low", "great", "real", "whole", "true", "false",
    "red", "blue", "green", "black", "white", "yellow", "grey", "gray", "dark", "bright",
    "light", "hot", "cold", "warm", "cool", "fast", "hard", "soft", "easy", "strong", "weak",
    "rich", "poor", "full", "empty", "open", "free", "clear", "clean", "dirty", "deep",
    "wide", "narrow", "thick", "thin", "heavy", "happy", "sad", "angry", "calm", "quiet",
    "loud", "early", "late", "simple", "common", "rare", "modern", "ancient", "public",
    "private", "human", "social", "political", "natural", "national", "local", "global",
    "general", "special", "major", "minor", "main", "certain", "possible", "important",
    "different", "same", "similar", "recent", "current", "final", "sure", "ready",
    "fat", "tall", "wise", "wild", "safe", "strange", "beautiful", "pretty", "ugly",
    "friendly", "lonely", "lovely", "likely", "daily", "holy", "sacred", "naked", "wicked",
    "fresh", "fine", "proud", "brave", "gentle", "kind", "cruel", "silent", "vast", "tiny",
    "huge", "key", "basic", "complex", "medical", "civil", "moral", "legal", "visual",
    "digital", "physical", "mental", "total", "equal", "central", "personal", "several",
    "entire", "only", "own", "other", "next", "last", "first", "best", "worst",
];

/// Open-class words whose suffix would mislead the suffix rules.
const NOUNS: &[&str] = &[
    "family", "supply", "reply", "assembly", "ally", "rally", "belly", "jelly", "bully", "lily",
    "fly", "anomaly", "monopoly", "morning", "evening", "building", "ceiling", "spring",
    "string", "meeting", "feeling", "painting", "clothing", "wedding", "pudding", "darling",
    "thing", "king", "ring", "wing", "something", "nothing", "anything", "everything",
    "need", "seed", "speed", "feed", "greed", "breed", "hundred", "creed", "steed", "weed",
    "reed", "deed", "bed", "shed", "music", "logic", "topic", "traffic", "magic", "panic",
    "clinic", "mechanic", "fabric", "republic", "critic", "rhetoric", "picnic", "festival",
    "animal", "signal", "capital", "hospital", "metal", "journal", "material", "individual",
    "potential", "arrival", "proposal", "approval", "survival", "ritual", "detective",
    "objective", "executive", "representative", "relative", "native", "alternative",
    "motive", "archive", "olive", "fox", "bus", "gas", "news", "series", "species", "means",
];

/// Base verbs used for context tagging of unmarked forms.
const VERBS: &[&str] = &[
    "make", "take", "get", "go", "come", "see", "know", "think", "say", "give", "find", "tell",
    "run", "jump", "sleep", "eat", "walk", "seem", "become", "feel", "leave", "keep", "begin",
    "show", "hear", "play", "move", "live", "believe", "bring", "happen", "write", "sit",
    "stand", "lose", "pay", "meet", "include", "continue", "learn", "change", "lead",
    "understand", "watch", "follow", "stop", "create", "speak", "read", "allow", "add",
    "spend", "grow", "win", "offer", "remember", "love", "consider", "appear", "buy",
    "wait", "serve", "die", "send", "expect", "build", "stay", "fall", "cut", "reach", "kill",
    "remain", "suggest", "raise", "pass", "sell", "require", "report", "decide", "pull",
    "want", "like", "use", "try", "ask", "work", "call", "help", "start", "turn", "put",
    "mean", "look", "let", "fight", "face", "cause", "promote", "challenge", "fly", "swim",
];

const IRREGULAR_PAST: &[&str] = &[
    "went", "came", "saw", "took", "made", "said", "got", "gave", "found", "told", "knew",
    "thought", "became", "left", "felt", "brought", "began", "kept", "held", "wrote", "stood",
    "heard", "meant", "met", "ran", "paid", "sat", "spoke", "lay", "led", "grew", "lost",
    "fell", "sent", "built", "understood", "drew", "broke", "spent", "rose", "drove", "bought",
    "wore", "chose", "sought", "threw", "caught", "dealt", "won", "slept", "ate", "swam",
    "flew", "fought",
];

/// Adjective-forming suffixes, checked after the lexicons.
const ADJECTIVE_SUFFIXES: &[&str] = &[
    "ous", "ful", "ive", "able", "ible", "ical", "ial", "less", "ish", "ary", "ic", "ese",
];

fn tag_words(words: &[&str]) -> Vec<PosTag> {
    let mut tags: Vec<PosTag> = Vec::with_capacity(words.len());
    for (i, word) in words.iter().enumerate() {
        let prev = tags.last().copied();
        let mut tag = tag_word(word, prev);
        // Whatever n't hangs off is an auxiliary or a modal: "ca n't", "ai n't".
        if words.get(i + 1) == Some(&"n't") && !tag.is_verb() && tag != PosTag::MD {
            tag = PosTag::MD;
        }
        tags.push(tag);
    }
    tags
}

fn tag_word(word: &str, prev: Option<PosTag>) -> PosTag {
    match word {
        "'s" => {
            return if prev == Some(PosTag::PRP) {
                PosTag::VBZ
            } else {
                PosTag::POS
            }
        }
        "'" if prev == Some(PosTag::NNS) => return PosTag::POS,
        "'re" | "'ve" | "'m" => return PosTag::VBP,
        "'ll" | "'d" => return PosTag::MD,
        _ => {}
    }
    if !word.chars().any(char::is_alphanumeric) {
        return PosTag::Punct;
    }
    if word.chars().next().is_some_and(|c| c.is_ascii_digit()) {
        return PosTag::CD;
    }

    if word == "to" {
        return PosTag::TO;
    }
    if DETERMINERS.contains(&word) {
        return PosTag::DT;
    }
    if POSSESSIVES.contains(&word) {
        return PosTag::PRPS;
    }
    if PRONOUNS.contains(&word) {
        return PosTag::PRP;
    }
    if MODALS.contains(&word) {
        return PosTag::MD;
    }
    if let Some((_, tag)) = AUXILIARIES.iter().find(|(aux, _)| *aux == word) {
        return *tag;
    }
    if CONJUNCTIONS.contains(&word) {
        return PosTag::CC;
    }
    if PREPOSITIONS.contains(&word) {
        return PosTag::IN;
    }
    if ADVERBS.contains(&word) {
        return PosTag::RB;
    }

    // After "to" or a modal the next open-class word is a base verb.
    if matches!(prev, Some(PosTag::TO) | Some(PosTag::MD)) && !ADJECTIVES.contains(&word) {
        return PosTag::VB;
    }

    if ADJECTIVES.contains(&word) {
        return PosTag::JJ;
    }
    if let Some(tag) = graded_adjective(word) {
        return tag;
    }
    if IRREGULAR_PAST.contains(&word) {
        return PosTag::VBD;
    }

    let after_subject = matches!(
        prev,
        Some(PosTag::PRP) | Some(PosTag::NN) | Some(PosTag::NNS) | Some(PosTag::NNP) | Some(PosTag::NNPS)
    );
    let after_modifier = matches!(
        prev,
        Some(PosTag::DT)
            | Some(PosTag::PRPS)
            | Some(PosTag::POS)
            | Some(PosTag::JJ)
            | Some(PosTag::JJR)
            | Some(PosTag::JJS)
    );

    if VERBS.contains(&word) {
        return if after_modifier {
            PosTag::NN
        } else if after_subject {
            PosTag::VBP
        } else {
            PosTag::VB
        };
    }
    if let Some(base) = strip_plural_s(word) {
        if VERBS.contains(&base) {
            return if after_modifier {
                PosTag::NNS
            } else {
                PosTag::VBZ
            };
        }
    }

    if NOUNS.contains(&word) {
        return if is_plural_shape(word) && !matches!(word, "news" | "series" | "species" | "means" | "bus" | "gas") {
            PosTag::NNS
        } else {
            PosTag::NN
        };
    }

    let len = word.chars().count();
    if len > 4 && word.ends_with("ly") {
        return PosTag::RB;
    }
    if len > 5 && word.ends_with("ing") {
        return if after_modifier { PosTag::NN } else { PosTag::VBG };
    }
    if len > 4 && word.ends_with("ed") {
        return if after_modifier { PosTag::JJ } else { PosTag::VBD };
    }
    if ADJECTIVE_SUFFIXES
        .iter()
        .any(|suffix| word.ends_with(suffix) && len > suffix.len() + 2)
    {
        return PosTag::JJ;
    }

    // An unknown -s word is a verb only right after a pronoun ("it rains").
    // After a noun it heads a compound: "health services".
    if is_plural_shape(word) {
        return if prev == Some(PosTag::PRP) {
            PosTag::VBZ
        } else {
            PosTag::NNS
        };
    }

    PosTag::NN
}

/// Comparative / superlative forms of lexicon adjectives.
fn graded_adjective(word: &str) -> Option<PosTag> {
    let (stem, tag) = if let Some(stem) = word.strip_suffix("est") {
        (stem, PosTag::JJS)
    } else if let Some(stem) = word.strip_suffix("er") {
        (stem, PosTag::JJR)
    } else {
        return None;
    };

    let mut candidates = vec![stem.to_string(), format!("{stem}e")];
    if let Some(base) = stem.strip_suffix('i') {
        candidates.push(format!("{base}y"));
    }
    // bigger -> big, hottest -> hot
    let chars: Vec<char> = stem.chars().collect();
    if chars.len() >= 2 && chars[chars.len() - 1] == chars[chars.len() - 2] {
        candidates.push(chars[..chars.len() - 1].iter().collect());
    }

    candidates
        .iter()
        .any(|c| ADJECTIVES.contains(&c.as_str()))
        .then_some(tag)
}

fn is_plural_shape(word: &str) -> bool {
    word.chars().count() > 3
        && word.ends_with('s')
        && !word.ends_with("ss")
        && !word.ends_with("us")
        && !word.ends_with("is")
}

fn strip_plural_s(word: &str) -> Option<&str> {
    if !is_plural_shape(word) {
        return None;
    }
    if let Some(stem) = word.strip_suffix("es") {
        if stem.ends_with("sh") || stem.ends_with("ch") || stem.ends_with('x') {
            return Some(stem);
        }
    }
    word.strip_suffix('s')
}

// ------------------------------------------------------------
// Lemmatization
// ------------------------------------------------------------

const IRREGULAR_PLURALS: &[(&str, &str)] = &[
    ("men", "man"),
    ("women", "woman"),
    ("children", "child"),
    ("feet", "foot"),
    ("teeth", "tooth"),
    ("geese", "goose"),
    ("mice", "mouse"),
    ("lives", "life"),
    ("wives", "wife"),
    ("knives", "knife"),
    ("leaves", "leaf"),
    ("wolves", "wolf"),
    ("halves", "half"),
    ("shelves", "shelf"),
    ("thieves", "thief"),
    ("calves", "calf"),
    ("data", "datum"),
    ("criteria", "criterion"),
    ("phenomena", "phenomenon"),
];

const INVARIANT_PLURALS: &[&str] = &["series", "species", "news", "means", "sheep", "deer", "fish"];

/// Noun lemma of a token. Only plural noun tags are reduced; everything
/// else is already its own lemma for the purposes of term extraction.
pub fn lemmatize(word: &str, tag: PosTag) -> String {
    if !matches!(tag, PosTag::NNS | PosTag::NNPS) {
        return word.to_string();
    }
    singularize(word)
}

fn singularize(word: &str) -> String {
    if let Some((_, singular)) = IRREGULAR_PLURALS.iter().find(|(plural, _)| *plural == word) {
        return singular.to_string();
    }
    if INVARIANT_PLURALS.contains(&word) || !is_plural_shape(word) {
        return word.to_string();
    }
    if let Some(stem) = word.strip_suffix("ies") {
        if stem.chars().count() > 1 {
            return format!("{stem}y");
        }
    }
    if let Some(stem) = word.strip_suffix("es") {
        if stem.ends_with("ss")
            || stem.ends_with("sh")
            || stem.ends_with("ch")
            || stem.ends_with('x')
            || stem.ends_with("zz")
        {
            return stem.to_string();
        }
    }
    word.strip_suffix('s').unwrap_or(word).to_string()
}
