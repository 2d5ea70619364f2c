// Term scoring: TF-ICF importance and tiered top-term selection.

pub mod selection;
pub mod tficf;
