use crate::error::{Error, Result};
use crate::genome::{GenomeIndex, SampledRegion};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::sync::Arc;

const MAX_REJECTIONS: u64 = 100_000_000;

/// Draws fixed-length regions uniformly at random from the genome.
///
/// Positions are drawn uniformly over the whole coordinate space before the
/// boundary check, so each chromosome contributes accepted samples in
/// proportion to its length. Picking a chromosome first and an offset second
/// would weight all chromosomes equally and bias the null distribution.
pub struct RegionSampler {
    index: Arc<GenomeIndex>,
    rng: StdRng,
    seed: u64,
}

impl RegionSampler {
    pub fn new(index: Arc<GenomeIndex>) -> Self {
        let seed = rand::rng().random();
        Self::with_seed(index, seed)
    }

    pub fn with_seed(index: Arc<GenomeIndex>, seed: u64) -> Self {
        Self {
            index,
            rng: StdRng::seed_from_u64(seed),
            seed,
        }
    }

    /// Derives an independent sampler for a numbered stream. Forking with
    /// the same stream number always yields the same draw sequence.
    pub fn fork(&self, stream: u64) -> Self {
        let seed = self
            .seed
            .wrapping_add(stream.wrapping_add(1).wrapping_mul(0x9E37_79B9_7F4A_7C15));
        Self::with_seed(self.index.clone(), seed)
    }

    pub fn index(&self) -> &GenomeIndex {
        &self.index
    }

    pub fn can_sample(&self, size: u64) -> bool {
        size <= self.index.largest_span_len()
    }

    /// Samples one region of exactly `size` bases by rejection: draw a
    /// global position, accept it if the region fits on the chromosome that
    /// owns it, redraw otherwise.
    pub fn sample(&mut self, size: u64) -> Result<SampledRegion> {
        if !self.can_sample(size) {
            return Err(Error::InvalidSampleSize {
                size,
                largest: self.index.largest_span_len(),
            });
        }

        let total = self.index.total_size();
        for _ in 0..MAX_REJECTIONS {
            let pos = self.rng.random_range(0..total);
            let span = self
                .index
                .span_containing(pos)
                .expect("drawn position is inside the genome");
            if pos + size <= span.end {
                let start = pos - span.start + 1;
                return Ok(SampledRegion::new(span.name.clone(), start, start + size));
            }
        }

        Err(Error::SamplingExhausted {
            size,
            attempts: MAX_REJECTIONS,
        })
    }
}
