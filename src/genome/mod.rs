mod index;
mod region;
mod sampler;

pub use index::{ChromosomeSpan, GenomeIndex};
pub use region::SampledRegion;
pub use sampler::RegionSampler;
