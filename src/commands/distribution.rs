use crate::cli::DistributionArgs;
use crate::distribution::{nearest_rank_cutoff, NullDistributionEngine};
use crate::error::Result;
use crate::genome::{GenomeIndex, RegionSampler};
use crate::overlap::{BedtoolsRunner, GeneCatalog, IdMarkers, OverlapResolver};
use crate::writers::{write_distribution, LogContext};
use std::sync::Arc;
use std::time::Duration;

pub fn distribution(args: DistributionArgs) -> Result<()> {
    let index = Arc::new(GenomeIndex::from_fasta(&args.genome_path)?);
    log::info!(
        "Indexed {} chromosomes spanning {} bp",
        index.spans().len(),
        index.total_size()
    );

    let catalog = Arc::new(GeneCatalog::from_gff(&args.annotation_path)?);
    log::info!("Gene catalog holds {} genes", catalog.len());

    let logs = LogContext::new(args.output_prefix.as_str());
    logs.write_genome_index(&index);
    logs.write_catalog(&catalog);

    let sampler = match args.seed {
        Some(seed) => RegionSampler::with_seed(index, seed),
        None => RegionSampler::new(index),
    };
    let runner = BedtoolsRunner::new(
        &args.bedtools,
        &args.features_path,
        Duration::from_secs(args.engine_timeout),
    );
    let markers = IdMarkers::new(args.id_prefix.as_str(), args.id_suffix.as_str());
    let resolver = OverlapResolver::new(catalog, markers);
    let mut engine = NullDistributionEngine::new(
        sampler,
        runner,
        resolver,
        args.samples,
        args.num_threads,
    )?;

    let run_id = format!("dist_{}_{}", args.size, args.goi);
    let output = engine.run(args.size, &args.goi, Some(logs.run_log(&run_id)))?;
    logs.write_regions(&run_id, &output.regions);

    let mut counts = output.counts;
    counts.sort_unstable();
    let dist_path = logs.path_for(&format!("{}_distribution.txt", run_id));
    write_distribution(&dist_path, &counts)?;

    let cutoff = nearest_rank_cutoff(&counts, args.percentile)?;
    log::info!(
        "{}th-percentile gene-of-interest count for size {} is {}",
        args.percentile,
        args.size,
        cutoff
    );
    log::info!("Wrote distribution to {}", dist_path.display());
    Ok(())
}
