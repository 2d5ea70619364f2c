// Unit tests for text preprocessing with the bundled heuristic analyzer.
//
// Stopword-sensitive assertions stick to words that are unambiguous in any
// English stopword list ("the", "and", "is") and to concrete nouns.

use termscape::error::PipelineError;
use termscape::text::analyzer::{Analyzer, PosTag};
use termscape::text::heuristic::HeuristicAnalyzer;
use termscape::text::preprocess::preprocess;

fn tags(analyzer: &HeuristicAnalyzer, sentence: &str) -> Vec<(String, PosTag)> {
    analyzer
        .annotate(sentence)
        .into_iter()
        .map(|t| (t.word, t.tag))
        .collect()
}

// ============================================================
// Sentence splitting
// ============================================================

#[test]
fn splits_on_sentence_terminators() {
    let analyzer = HeuristicAnalyzer::new();
    let sentences = analyzer.sentences("Cats purr. Dogs bark! Do birds sing?");
    assert_eq!(sentences, vec!["Cats purr.", "Dogs bark!", "Do birds sing?"]);
}

#[test]
fn text_without_terminator_is_one_sentence() {
    let analyzer = HeuristicAnalyzer::new();
    let sentences = analyzer.sentences("a single fragment with no period");
    assert_eq!(sentences.len(), 1);
}

// ============================================================
// Annotation
// ============================================================

#[test]
fn punctuation_is_its_own_token() {
    let analyzer = HeuristicAnalyzer::new();
    let tokens = tags(&analyzer, "the fox, the hound.");
    let words: Vec<&str> = tokens.iter().map(|(w, _)| w.as_str()).collect();
    assert_eq!(words, vec!["the", "fox", ",", "the", "hound", "."]);
    assert_eq!(tokens[2].1, PosTag::Punct);
    assert_eq!(tokens[5].1, PosTag::Punct);
}

#[test]
fn plural_nouns_are_lemmatized() {
    let analyzer = HeuristicAnalyzer::new();
    let tokens = analyzer.annotate("the foxes chased the rabbits");
    let foxes = tokens.iter().find(|t| t.word == "foxes").unwrap();
    assert_eq!(foxes.tag, PosTag::NNS);
    assert_eq!(foxes.lemma, "fox");
    let rabbits = tokens.iter().find(|t| t.word == "rabbits").unwrap();
    assert_eq!(rabbits.lemma, "rabbit");
}

#[test]
fn modal_is_followed_by_verb() {
    let analyzer = HeuristicAnalyzer::new();
    let tokens = tags(&analyzer, "we will walk");
    assert_eq!(tokens[1].1, PosTag::MD);
    assert_eq!(tokens[2].1, PosTag::VB);
}

// ============================================================
// Preprocessing
// ============================================================

#[test]
fn fox_text_keeps_nouns_and_drops_function_words() {
    let analyzer = HeuristicAnalyzer::new();
    let groups =
        preprocess(&analyzer, "The quick brown fox jumps. The lazy fox sleeps.").unwrap();

    assert_eq!(groups.len(), 2);
    for group in &groups {
        assert!(group.contains(&"fox".to_string()));
        assert!(!group.contains(&"the".to_string()));
        assert!(!group.iter().any(|t| t == "jumps" || t == "sleeps"));
    }
}

#[test]
fn terms_are_lowercase_lemmas() {
    let analyzer = HeuristicAnalyzer::new();
    let groups = preprocess(&analyzer, "Wolves and Foxes.").unwrap();
    assert_eq!(groups.len(), 1);
    assert!(groups[0].iter().all(|t| t.chars().all(char::is_lowercase)));
    assert!(groups[0].contains(&"wolf".to_string()));
}

#[test]
fn numbers_and_punctuation_are_dropped() {
    let analyzer = HeuristicAnalyzer::new();
    let groups = preprocess(&analyzer, "The 42 rockets, launched in 1969.").unwrap();
    let terms: Vec<&String> = groups.iter().flatten().collect();
    assert!(terms.iter().all(|t| t.chars().all(char::is_alphabetic)));
    assert!(terms.iter().any(|t| t.as_str() == "rocket"));
}

#[test]
fn sentence_with_only_stopwords_gives_empty_group() {
    let analyzer = HeuristicAnalyzer::new();
    let groups = preprocess(&analyzer, "It is what it is. Rivers flood.").unwrap();
    assert_eq!(groups.len(), 2);
    assert!(groups[0].is_empty());
    assert!(groups[1].contains(&"river".to_string()));
}

#[test]
fn possessed_nouns_are_kept() {
    let analyzer = HeuristicAnalyzer::new();
    let groups = preprocess(
        &analyzer,
        "The fox's tail was long. The dog\u{2019}s bone broke.",
    )
    .unwrap();
    assert!(groups[0].contains(&"fox".to_string()));
    assert!(groups[0].contains(&"tail".to_string()));
    assert!(groups[1].contains(&"dog".to_string()));
    assert!(groups[1].contains(&"bone".to_string()));
    assert!(groups.iter().flatten().all(|t| !t.contains('\'')));
}

#[test]
fn compound_plural_heads_are_kept() {
    let analyzer = HeuristicAnalyzer::new();
    let groups = preprocess(
        &analyzer,
        "Public health services improved. The computer systems failed. Water resources are scarce.",
    )
    .unwrap();
    assert!(groups[0].contains(&"service".to_string()));
    assert!(groups[1].contains(&"computer".to_string()));
    assert!(groups[1].contains(&"system".to_string()));
    assert!(groups[2].contains(&"resource".to_string()));
}

#[test]
fn common_content_nouns_are_not_stopwords() {
    let analyzer = HeuristicAnalyzer::new();
    let groups = preprocess(
        &analyzer,
        "The research group studied the information problem. Every computer needs a system.",
    )
    .unwrap();
    let terms: Vec<&str> = groups.iter().flatten().map(String::as_str).collect();
    for noun in ["research", "group", "information", "problem", "computer", "system"] {
        assert!(terms.contains(&noun), "{noun} missing from {terms:?}");
    }
}

#[test]
fn whitespace_only_text_is_empty_input() {
    let analyzer = HeuristicAnalyzer::new();
    let result = preprocess(&analyzer, "  \n\t  ");
    assert!(matches!(result, Err(PipelineError::EmptyInput)));
}
