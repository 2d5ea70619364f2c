// Word embeddings: provider trait, text-format table, term resolution.

pub mod resolver;
pub mod table;
pub mod traits;
