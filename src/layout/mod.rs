// Layout: dimensionality reduction and canvas projection.

pub mod projector;
pub mod traits;
pub mod umap;
