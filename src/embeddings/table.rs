// In-memory word-vector table loaded from the word2vec / GloVe text format.
//
// Format: an optional header line "<count> <dim>", then one line per word:
// "<word> <f1> <f2> ... <fD>". Every row must have the same dimensionality.
// The table is built once and never mutated afterwards.
//
// Files are stored in a platform-appropriate directory
// (~/.local/share/termscape/ on Linux) unless TERMSCAPE_VECTORS_PATH says
// otherwise.

use std::collections::HashMap;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::{Path, PathBuf};

use indicatif::{ProgressBar, ProgressStyle};
use thiserror::Error;
use tracing::info;

use super::traits::WordVectors;

/// Default file name of the vectors table inside the data directory.
pub const DEFAULT_VECTORS_FILE: &str = "vectors.txt";

/// Returns the default vectors path.
/// Uses the platform data directory: ~/.local/share/termscape/vectors.txt on Linux.
pub fn default_vectors_path() -> PathBuf {
    dirs::data_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("termscape")
        .join(DEFAULT_VECTORS_FILE)
}

#[derive(Debug, Error)]
pub enum VectorLoadError {
    #[error("failed to read word vectors from {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("line {line}: {reason}")]
    Malformed { line: usize, reason: String },

    #[error("line {line}: expected {expected} dimensions, found {found}")]
    DimensionMismatch {
        line: usize,
        expected: usize,
        found: usize,
    },

    #[error("word vector table is empty")]
    Empty,
}

/// A word -> vector table held entirely in memory.
#[derive(Debug, Default)]
pub struct VectorTable {
    vectors: HashMap<String, Vec<f32>>,
    dim: usize,
}

impl VectorTable {
    /// Load a text-format table from disk, showing a spinner with the
    /// running word count.
    pub fn load(path: &Path) -> Result<Self, VectorLoadError> {
        let file = File::open(path).map_err(|source| VectorLoadError::Io {
            path: path.to_path_buf(),
            source,
        })?;

        let pb = ProgressBar::new_spinner();
        pb.set_style(
            ProgressStyle::default_spinner()
                .template("    {spinner} {msg}")
                .expect("valid template"),
        );
        pb.set_message(format!("Loading word vectors from {}", path.display()));

        let table = Self::read(BufReader::new(file), Some(&pb)).map_err(|e| match e {
            VectorLoadError::Io { source, .. } => VectorLoadError::Io {
                path: path.to_path_buf(),
                source,
            },
            other => other,
        });
        pb.finish_and_clear();
        let table = table?;

        info!(
            words = table.len(),
            dim = table.dim,
            path = %path.display(),
            "Loaded word vectors"
        );
        Ok(table)
    }

    /// Parse a text-format table from any reader.
    pub fn from_reader<R: BufRead>(reader: R) -> Result<Self, VectorLoadError> {
        Self::read(reader, None)
    }

    /// Build a table from (word, vector) pairs. All vectors must share one
    /// length. Later duplicates of a word are ignored.
    pub fn from_entries<I>(entries: I) -> Result<Self, VectorLoadError>
    where
        I: IntoIterator<Item = (String, Vec<f32>)>,
    {
        let mut table = Self::default();
        for (i, (word, vector)) in entries.into_iter().enumerate() {
            table.insert(i + 1, word, vector)?;
        }
        if table.vectors.is_empty() {
            return Err(VectorLoadError::Empty);
        }
        Ok(table)
    }

    pub fn len(&self) -> usize {
        self.vectors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.vectors.is_empty()
    }

    fn read<R: BufRead>(reader: R, pb: Option<&ProgressBar>) -> Result<Self, VectorLoadError> {
        let mut table = Self::default();

        for (index, line) in reader.lines().enumerate() {
            let line_no = index + 1;
            let line = line.map_err(|source| VectorLoadError::Io {
                path: PathBuf::new(),
                source,
            })?;
            let mut fields = line.split_whitespace();
            let Some(word) = fields.next() else {
                continue;
            };
            let rest: Vec<&str> = fields.collect();

            // word2vec header: "<count> <dim>"
            if line_no == 1 && rest.len() == 1 {
                if let (Ok(_), Ok(dim)) = (word.parse::<usize>(), rest[0].parse::<usize>()) {
                    table.dim = dim;
                    continue;
                }
            }

            let vector = rest
                .iter()
                .map(|v| {
                    v.parse::<f32>().map_err(|_| VectorLoadError::Malformed {
                        line: line_no,
                        reason: format!("invalid number {v:?} for word {word:?}"),
                    })
                })
                .collect::<Result<Vec<f32>, _>>()?;

            table.insert(line_no, word.to_string(), vector)?;

            if let Some(pb) = pb {
                if table.vectors.len() % 10_000 == 0 {
                    pb.set_message(format!("{} words", table.vectors.len()));
                    pb.tick();
                }
            }
        }

        if table.vectors.is_empty() {
            return Err(VectorLoadError::Empty);
        }
        Ok(table)
    }

    fn insert(&mut self, line: usize, word: String, vector: Vec<f32>) -> Result<(), VectorLoadError> {
        if vector.is_empty() {
            return Err(VectorLoadError::Malformed {
                line,
                reason: format!("word {word:?} has no vector components"),
            });
        }
        if self.dim == 0 {
            self.dim = vector.len();
        } else if vector.len() != self.dim {
            return Err(VectorLoadError::DimensionMismatch {
                line,
                expected: self.dim,
                found: vector.len(),
            });
        }
        self.vectors.entry(word).or_insert(vector);
        Ok(())
    }
}

impl WordVectors for VectorTable {
    fn lookup(&self, term: &str) -> Option<&[f32]> {
        self.vectors.get(term).map(Vec::as_slice)
    }

    fn dimensionality(&self) -> usize {
        self.dim
    }
}
