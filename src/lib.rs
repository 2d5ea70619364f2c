// Termscape: text to a 2D map of its most salient terms
//
// This is the library root. Each module corresponds to a stage or a
// collaborator of the term layout pipeline.

pub mod config;
pub mod embeddings;
pub mod error;
pub mod layout;
pub mod output;
pub mod pipeline;
pub mod scoring;
pub mod text;

#[cfg(feature = "web")]
pub mod web;
