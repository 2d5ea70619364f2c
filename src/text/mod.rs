// Text processing: linguistic toolkit and sentence term extraction.

pub mod analyzer;
pub mod heuristic;
pub mod preprocess;
