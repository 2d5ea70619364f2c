// Pipeline orchestration: text in, term layout records out.
//
// Stages, each validating its own preconditions:
//   preprocess -> score_terms -> select_terms -> resolve_embeddings -> project
//
// The pipeline is synchronous and stateless per call. The collaborators are
// shared read-only behind Arcs, so one Pipeline serves any number of
// concurrent callers without locking.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::embeddings::resolver::resolve_embeddings;
use crate::embeddings::traits::WordVectors;
use crate::error::PipelineError;
use crate::layout::projector::{project, ProjectionSettings};
use crate::layout::traits::Reducer;
use crate::scoring::selection::{select_terms, validate_tiers, RankedTerm};
use crate::scoring::tficf::score_terms;
use crate::text::analyzer::Analyzer;
use crate::text::preprocess::preprocess;

/// Default cap on the number of selected terms.
pub const DEFAULT_TOP_TERMS: usize = 500;

/// Default tier percentages, best tier first.
pub const DEFAULT_TIER_PERCENTAGES: [u32; 5] = [30, 30, 25, 10, 5];

/// One positioned term: the pipeline's output record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TermLayout {
    pub term: String,
    pub x: f64,
    pub y: f64,
    /// Importance tier, 1 = most important
    pub group: u32,
    /// Normalized score (share of total score mass)
    pub score: f64,
}

/// Tunable pipeline constants.
#[derive(Debug, Clone, PartialEq)]
pub struct PipelineConfig {
    pub top_n: usize,
    pub tier_percentages: Vec<u32>,
    pub projection: ProjectionSettings,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            top_n: DEFAULT_TOP_TERMS,
            tier_percentages: DEFAULT_TIER_PERCENTAGES.to_vec(),
            projection: ProjectionSettings::default(),
        }
    }
}

impl PipelineConfig {
    pub fn validate(&self) -> Result<(), PipelineError> {
        if self.top_n == 0 {
            return Err(PipelineError::InvalidConfig(
                "top term cap must be at least 1".to_string(),
            ));
        }
        validate_tiers(&self.tier_percentages)?;

        let p = &self.projection;
        for (name, value) in [("canvas width", p.canvas_width), ("canvas height", p.canvas_height)] {
            if !(value.is_finite() && value > 0.0) {
                return Err(PipelineError::InvalidConfig(format!(
                    "{name} must be positive, got {value}"
                )));
            }
        }
        if p.max_neighbors == 0 {
            return Err(PipelineError::InvalidConfig(
                "max neighbors must be at least 1".to_string(),
            ));
        }
        if !(p.spread.is_finite() && p.spread > 0.0) {
            return Err(PipelineError::InvalidConfig(format!(
                "spread must be positive, got {}",
                p.spread
            )));
        }
        if !(p.min_dist.is_finite() && p.min_dist >= 0.0) {
            return Err(PipelineError::InvalidConfig(format!(
                "min_dist must be non-negative, got {}",
                p.min_dist
            )));
        }
        Ok(())
    }
}

/// Output of a full run plus what was observed along the way.
#[derive(Debug, Clone)]
pub struct PipelineRun {
    pub layouts: Vec<TermLayout>,
    /// Selected terms the word-vector table didn't know
    pub missing_embeddings: Vec<String>,
}

/// Preprocess, score and select: the stages that need no word vectors.
///
/// `Pipeline::rank` goes through here, and so can callers that have an
/// analyzer but no vector table.
pub fn rank_text(
    analyzer: &dyn Analyzer,
    config: &PipelineConfig,
    text: &str,
) -> Result<Vec<RankedTerm>, PipelineError> {
    let groups = preprocess(analyzer, text)?;
    let scored = score_terms(&groups)?;
    select_terms(scored, config.top_n, &config.tier_percentages)
}

/// The composed pipeline with its injected collaborators.
#[derive(Clone)]
pub struct Pipeline {
    analyzer: Arc<dyn Analyzer>,
    vectors: Arc<dyn WordVectors>,
    reducer: Arc<dyn Reducer>,
    config: PipelineConfig,
}

impl Pipeline {
    /// Build a pipeline. Fails with `InvalidConfig` on a bad configuration.
    pub fn new(
        analyzer: Arc<dyn Analyzer>,
        vectors: Arc<dyn WordVectors>,
        reducer: Arc<dyn Reducer>,
        config: PipelineConfig,
    ) -> Result<Self, PipelineError> {
        config.validate()?;
        Ok(Self {
            analyzer,
            vectors,
            reducer,
            config,
        })
    }

    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    /// Extract, score and rank terms without laying them out.
    pub fn rank(&self, text: &str) -> Result<Vec<RankedTerm>, PipelineError> {
        rank_text(self.analyzer.as_ref(), &self.config, text)
    }

    /// Run every stage and return the layout records.
    pub fn run(&self, text: &str) -> Result<Vec<TermLayout>, PipelineError> {
        self.run_detailed(text).map(|run| run.layouts)
    }

    /// Run every stage, also reporting terms that fell back to zero vectors.
    pub fn run_detailed(&self, text: &str) -> Result<PipelineRun, PipelineError> {
        let ranked = self.rank(text)?;
        let embeddings = resolve_embeddings(&ranked, self.vectors.as_ref())?;
        let coords = project(
            &embeddings.matrix(),
            self.reducer.as_ref(),
            &self.config.projection,
        )?;

        let layouts: Vec<TermLayout> = ranked
            .into_iter()
            .zip(coords)
            .map(|(term, (x, y))| TermLayout {
                term: term.term,
                x,
                y,
                group: term.tier,
                score: term.score,
            })
            .collect();

        info!(
            terms = layouts.len(),
            missing_embeddings = embeddings.missing.len(),
            "Pipeline complete"
        );

        Ok(PipelineRun {
            layouts,
            missing_embeddings: embeddings.missing,
        })
    }
}
