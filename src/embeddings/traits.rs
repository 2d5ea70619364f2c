// Word-vector provider trait.
//
// Any static word-embedding table with exact lookup works. The provider is
// loaded once at startup and then only read, so implementations are shared
// across requests behind an Arc without locking.

/// A read-only table of fixed-length word vectors.
pub trait WordVectors: Send + Sync {
    /// The vector for `term`, or None when the table doesn't know it.
    fn lookup(&self, term: &str) -> Option<&[f32]>;

    /// Length of every vector in the table.
    fn dimensionality(&self) -> usize;
}
