mod analyzer;
mod engine;
mod percentile;

pub use analyzer::{CutoffResult, VariantSignificanceAnalyzer};
pub use engine::{DrawRecord, NullDistributionEngine, RunOutput, DEFAULT_SAMPLE_COUNT};
pub use percentile::{nearest_rank_cutoff, nearest_rank_index};
