use std::env;
use std::path::PathBuf;
use std::str::FromStr;

use anyhow::{Context, Result};

use crate::embeddings::table::default_vectors_path;
use crate::layout::projector::ProjectionSettings;
use crate::pipeline::{PipelineConfig, DEFAULT_TIER_PERCENTAGES, DEFAULT_TOP_TERMS};

/// Default number of UMAP optimization epochs.
pub const DEFAULT_EPOCHS: usize = 500;

/// Central configuration loaded from environment variables.
///
/// Every value has a default, so an empty environment runs the reference
/// setup. The .env file is loaded automatically at startup via dotenvy.
#[derive(Debug, Clone)]
pub struct Config {
    /// Word-vector table in word2vec/GloVe text format
    pub vectors_path: PathBuf,
    /// Pipeline constants (top-term cap, tiers, canvas, reducer settings)
    pub pipeline: PipelineConfig,
    /// SGD epochs for the UMAP reducer
    pub epochs: usize,
}

impl Config {
    /// Load configuration from environment variables.
    pub fn load() -> Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build a configuration from any key lookup. `load()` passes the
    /// process environment; tests pass a map.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = ProjectionSettings::default();

        let tier_percentages = match lookup("TERMSCAPE_TIERS") {
            Some(raw) => parse_tiers(&raw).context("Invalid TERMSCAPE_TIERS")?,
            None => DEFAULT_TIER_PERCENTAGES.to_vec(),
        };

        let pipeline = PipelineConfig {
            top_n: parse_var(&lookup, "TERMSCAPE_TOP_TERMS", DEFAULT_TOP_TERMS)?,
            tier_percentages,
            projection: ProjectionSettings {
                canvas_width: parse_var(&lookup, "TERMSCAPE_CANVAS_WIDTH", defaults.canvas_width)?,
                canvas_height: parse_var(&lookup, "TERMSCAPE_CANVAS_HEIGHT", defaults.canvas_height)?,
                max_neighbors: parse_var(&lookup, "TERMSCAPE_MAX_NEIGHBORS", defaults.max_neighbors)?,
                min_dist: parse_var(&lookup, "TERMSCAPE_MIN_DIST", defaults.min_dist)?,
                spread: parse_var(&lookup, "TERMSCAPE_SPREAD", defaults.spread)?,
                seed: parse_var(&lookup, "TERMSCAPE_SEED", defaults.seed)?,
            },
        };
        pipeline
            .validate()
            .context("Invalid pipeline configuration in environment")?;

        let epochs = parse_var(&lookup, "TERMSCAPE_EPOCHS", DEFAULT_EPOCHS)?;
        if epochs == 0 {
            anyhow::bail!("TERMSCAPE_EPOCHS must be at least 1");
        }

        Ok(Self {
            vectors_path: lookup("TERMSCAPE_VECTORS_PATH")
                .map(PathBuf::from)
                .unwrap_or_else(default_vectors_path),
            pipeline,
            epochs,
        })
    }

    /// Check that the word-vector file exists.
    /// Call this before any operation that lays terms out.
    pub fn require_vectors(&self) -> Result<()> {
        if !self.vectors_path.exists() {
            anyhow::bail!(
                "Word vectors not found: {}\n\
                 Set TERMSCAPE_VECTORS_PATH to a word2vec/GloVe text file.",
                self.vectors_path.display()
            );
        }
        Ok(())
    }
}

fn parse_var<F, T>(lookup: &F, key: &str, default: T) -> Result<T>
where
    F: Fn(&str) -> Option<String>,
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match lookup(key) {
        Some(raw) => raw
            .trim()
            .parse()
            .with_context(|| format!("Invalid value for {key}: {raw:?}")),
        None => Ok(default),
    }
}

/// Parse a comma-separated percentage list like "30,30,25,10,5".
fn parse_tiers(raw: &str) -> Result<Vec<u32>> {
    raw.split(',')
        .map(|part| {
            part.trim()
                .parse::<u32>()
                .with_context(|| format!("not a percentage: {part:?}"))
        })
        .collect()
}
