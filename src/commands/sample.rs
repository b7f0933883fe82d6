use crate::cli::SampleArgs;
use crate::error::Result;
use crate::genome::{GenomeIndex, RegionSampler};
use std::sync::Arc;

pub fn sample(args: SampleArgs) -> Result<()> {
    let index = Arc::new(GenomeIndex::from_fasta(&args.genome_path)?);
    let mut sampler = match args.seed {
        Some(seed) => RegionSampler::with_seed(index, seed),
        None => RegionSampler::new(index),
    };

    for _ in 0..args.count {
        println!("{}", sampler.sample(args.size)?);
    }
    Ok(())
}
