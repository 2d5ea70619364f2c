// Composition tests: verifying that the pipeline stages chain together.
//
// These tests exercise the full data flow:
//   Preprocess -> TF-ICF -> Selection -> Embeddings -> Projection
// with a deterministic word-list analyzer, small in-memory vector tables,
// and either the real UMAP reducer (few epochs) or a pass-through reducer.
// No network or filesystem access.

use std::collections::HashSet;
use std::sync::Arc;

use termscape::embeddings::table::VectorTable;
use termscape::error::PipelineError;
use termscape::layout::traits::{ReductionError, ReductionParams, Reducer};
use termscape::layout::umap::UmapReducer;
use termscape::pipeline::{rank_text, Pipeline, PipelineConfig, TermLayout};
use termscape::text::analyzer::{Analyzer, PosTag, Token};
use termscape::text::heuristic::HeuristicAnalyzer;

/// Sentences end at '.', every alphabetic word is a noun, and a handful of
/// function words are stopwords.
struct WordListAnalyzer;

impl Analyzer for WordListAnalyzer {
    fn sentences(&self, text: &str) -> Vec<String> {
        text.split('.')
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::to_string)
            .collect()
    }

    fn annotate(&self, sentence: &str) -> Vec<Token> {
        sentence
            .split_whitespace()
            .map(|w| Token::new(w, w, PosTag::NN))
            .collect()
    }

    fn is_stopword(&self, lemma: &str) -> bool {
        matches!(lemma, "the" | "a" | "an" | "and" | "of")
    }
}

/// Uses the first two vector components as the layout.
struct FirstTwoColumns;

impl Reducer for FirstTwoColumns {
    fn reduce(
        &self,
        data: &[Vec<f32>],
        _params: &ReductionParams,
    ) -> Result<Vec<Vec<f64>>, ReductionError> {
        Ok(data.iter().map(|r| vec![r[0] as f64, r[1] as f64]).collect())
    }
}

struct FailingReducer;

impl Reducer for FailingReducer {
    fn reduce(
        &self,
        _data: &[Vec<f32>],
        _params: &ReductionParams,
    ) -> Result<Vec<Vec<f64>>, ReductionError> {
        Err(ReductionError::Failed("optimizer diverged".to_string()))
    }
}

fn vectors(entries: &[(&str, [f32; 3])]) -> Arc<VectorTable> {
    Arc::new(
        VectorTable::from_entries(
            entries
                .iter()
                .map(|(word, v)| (word.to_string(), v.to_vec())),
        )
        .unwrap(),
    )
}

fn animal_vectors() -> Arc<VectorTable> {
    vectors(&[
        ("quick", [0.9, 0.1, 0.0]),
        ("brown", [0.2, 0.8, 0.1]),
        ("fox", [0.5, 0.5, 0.9]),
        ("lazy", [0.1, 0.3, 0.7]),
        ("dog", [0.6, 0.4, 0.8]),
        ("river", [0.0, 1.0, 0.2]),
    ])
}

fn pipeline_with(reducer: Arc<dyn Reducer>, config: PipelineConfig) -> Pipeline {
    Pipeline::new(Arc::new(WordListAnalyzer), animal_vectors(), reducer, config).unwrap()
}

fn umap_pipeline() -> Pipeline {
    pipeline_with(
        Arc::new(UmapReducer::with_epochs(60)),
        PipelineConfig::default(),
    )
}

const FOX_TEXT: &str = "The quick brown fox. The lazy fox.";

// ============================================================
// Chain: text -> ranked, tiered, positioned terms
// ============================================================

#[test]
fn fox_text_end_to_end() {
    let layouts = umap_pipeline().run(FOX_TEXT).unwrap();

    let terms: Vec<&str> = layouts.iter().map(|l| l.term.as_str()).collect();
    assert_eq!(terms, vec!["fox", "quick", "brown", "lazy"]);

    let groups: Vec<u32> = layouts.iter().map(|l| l.group).collect();
    assert_eq!(groups, vec![1, 2, 3, 5]);

    // fox: 0.4 / (0.4 + 3 * 0.2 * (ln 1.5 + 1))
    let single = 0.2 * ((1.5f64).ln() + 1.0);
    let expected_fox = 0.4 / (0.4 + 3.0 * single);
    assert!((layouts[0].score - expected_fox).abs() < 1e-9);
}

#[test]
fn records_satisfy_output_invariants() {
    let config = PipelineConfig::default();
    let layouts = umap_pipeline()
        .run("The quick brown fox and the lazy dog. A fox crossed the river. The dog slept.")
        .unwrap();

    let unique: HashSet<&str> = layouts.iter().map(|l| l.term.as_str()).collect();
    assert_eq!(unique.len(), layouts.len());
    assert!(layouts.len() <= config.top_n);

    let total: f64 = layouts.iter().map(|l| l.score).sum();
    assert!((total - 1.0).abs() < 1e-9);

    assert!(layouts.windows(2).all(|w| w[0].group <= w[1].group));
    assert!(layouts.windows(2).all(|w| w[0].score >= w[1].score));

    for l in &layouts {
        assert!((0.0..=config.projection.canvas_width).contains(&l.x));
        assert!((0.0..=config.projection.canvas_height).contains(&l.y));
        assert!((1..=5).contains(&l.group));
    }
}

#[test]
fn same_text_same_layout() {
    let pipeline = umap_pipeline();
    let first = pipeline.run(FOX_TEXT).unwrap();
    let second = pipeline.run(FOX_TEXT).unwrap();
    assert_eq!(first, second);
}

#[test]
fn concurrent_runs_share_one_pipeline() {
    let pipeline = umap_pipeline();
    let expected = pipeline.run(FOX_TEXT).unwrap();

    let results: Vec<Vec<TermLayout>> = std::thread::scope(|scope| {
        let handles: Vec<_> = (0..4)
            .map(|_| scope.spawn(|| pipeline.run(FOX_TEXT).unwrap()))
            .collect();
        handles.into_iter().map(|h| h.join().unwrap()).collect()
    });

    for result in results {
        assert_eq!(result, expected);
    }
}

#[test]
fn top_term_cap_limits_output() {
    let mut config = PipelineConfig::default();
    config.top_n = 3;
    let pipeline = pipeline_with(Arc::new(FirstTwoColumns), config);

    let layouts = pipeline
        .run("quick brown fox. lazy dog. river fox dog.")
        .unwrap();
    assert_eq!(layouts.len(), 3);
}

#[test]
fn pass_through_reducer_positions_are_min_max_scaled() {
    let pipeline = pipeline_with(Arc::new(FirstTwoColumns), PipelineConfig::default());
    let layouts = pipeline.run("quick river.").unwrap();

    // quick = (0.9, 0.1), river = (0.0, 1.0): each axis spans the canvas
    let quick = layouts.iter().find(|l| l.term == "quick").unwrap();
    let river = layouts.iter().find(|l| l.term == "river").unwrap();
    assert_eq!((quick.x, quick.y), (2560.0, 0.0));
    assert_eq!((river.x, river.y), (0.0, 1600.0));
}

// ============================================================
// Missing embeddings
// ============================================================

#[test]
fn unknown_terms_fall_back_to_zero_vectors() {
    let pipeline = pipeline_with(Arc::new(FirstTwoColumns), PipelineConfig::default());
    let run = pipeline.run_detailed("fox zebra. fox.").unwrap();

    assert_eq!(run.layouts.len(), 2);
    assert_eq!(run.missing_embeddings, vec!["zebra".to_string()]);

    // zebra sits at the origin of the reduced space, which is the minimum
    // on both axes here
    let zebra = run.layouts.iter().find(|l| l.term == "zebra").unwrap();
    assert_eq!((zebra.x, zebra.y), (0.0, 0.0));
}

#[test]
fn all_terms_unknown_still_lays_out() {
    let pipeline = pipeline_with(Arc::new(FirstTwoColumns), PipelineConfig::default());
    let run = pipeline.run_detailed("zebra okapi.").unwrap();
    assert_eq!(run.missing_embeddings.len(), 2);
    assert!(run.layouts.iter().all(|l| l.x == 0.0 && l.y == 0.0));
}

// ============================================================
// Failure modes
// ============================================================

#[test]
fn single_distinct_term_is_insufficient() {
    for text in ["The fox.", "fox. fox."] {
        let result = umap_pipeline().run(text);
        assert!(matches!(
            result,
            Err(PipelineError::InsufficientTerms { found: 1 })
        ));
    }
}

#[test]
fn stopwords_only_is_no_terms() {
    let result = umap_pipeline().run("the. a and of , ! 42.");
    assert!(matches!(result, Err(PipelineError::NoTerms)));
}

#[test]
fn blank_text_is_empty_input() {
    let result = umap_pipeline().run("   ");
    assert!(matches!(result, Err(PipelineError::EmptyInput)));
}

#[test]
fn reducer_failure_surfaces_as_projection_error() {
    let pipeline = pipeline_with(Arc::new(FailingReducer), PipelineConfig::default());
    let err = pipeline.run(FOX_TEXT).unwrap_err();
    assert!(matches!(err, PipelineError::Projection(_)));
    assert!(!err.is_client_error());
}

#[test]
fn invalid_config_is_rejected_at_construction() {
    let mut config = PipelineConfig::default();
    config.tier_percentages = vec![50, 40];
    let result = Pipeline::new(
        Arc::new(WordListAnalyzer),
        animal_vectors(),
        Arc::new(FirstTwoColumns),
        config,
    );
    assert!(matches!(result, Err(PipelineError::InvalidConfig(_))));
}

#[test]
fn rank_needs_no_projection() {
    let pipeline = pipeline_with(Arc::new(FailingReducer), PipelineConfig::default());
    let ranked = pipeline.rank(FOX_TEXT).unwrap();
    assert_eq!(ranked[0].term, "fox");
    assert_eq!(ranked[0].tier, 1);
}

#[test]
fn rank_text_matches_pipeline_rank() {
    let mut config = PipelineConfig::default();
    config.top_n = 3;
    config.tier_percentages = vec![50, 50];
    let pipeline = pipeline_with(Arc::new(FailingReducer), config.clone());

    let text = "quick brown fox. lazy dog. river fox dog.";
    let standalone = rank_text(&WordListAnalyzer, &config, text).unwrap();
    let composed = pipeline.rank(text).unwrap();

    assert_eq!(standalone, composed);
    assert_eq!(standalone.len(), 3);
    assert!(standalone.iter().all(|t| t.tier <= 2));
}

#[test]
fn rank_text_rejects_bad_tiers() {
    let mut config = PipelineConfig::default();
    config.tier_percentages = vec![60, 60];
    let result = rank_text(&WordListAnalyzer, &config, FOX_TEXT);
    assert!(matches!(result, Err(PipelineError::InvalidConfig(_))));
}

// ============================================================
// Bundled analyzer end to end
// ============================================================

#[test]
fn heuristic_analyzer_pipeline() {
    let table = vectors(&[
        ("village", [0.1, 0.9, 0.3]),
        ("harbor", [0.8, 0.2, 0.4]),
        ("ash", [0.3, 0.3, 0.9]),
        ("wall", [0.7, 0.6, 0.1]),
    ]);
    let pipeline = Pipeline::new(
        Arc::new(HeuristicAnalyzer::new()),
        table,
        Arc::new(UmapReducer::with_epochs(60)),
        PipelineConfig::default(),
    )
    .unwrap();

    let layouts = pipeline
        .run("Volcanic ash covered the village. The village rebuilt its harbor. Fishermen repaired the walls of the harbor.")
        .unwrap();

    let terms: HashSet<&str> = layouts.iter().map(|l| l.term.as_str()).collect();
    assert!(terms.contains("village"));
    assert!(terms.contains("harbor"));
    assert!(terms.contains("wall"));
    assert!(!terms.contains("the"));
    assert!(!terms.contains("covered"));
    assert_eq!(layouts[0].group, 1);
}
