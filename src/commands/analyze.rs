use crate::cli::AnalyzeArgs;
use crate::distribution::{NullDistributionEngine, VariantSignificanceAnalyzer};
use crate::error::Result;
use crate::genome::{GenomeIndex, RegionSampler};
use crate::overlap::{BedtoolsRunner, GeneCatalog, IdMarkers, OverlapResolver};
use crate::variants::read_variants;
use crate::writers::{write_cutoff_table, LogContext};
use std::sync::Arc;
use std::time::Duration;

pub fn analyze(args: AnalyzeArgs) -> Result<()> {
    let index = Arc::new(GenomeIndex::from_fasta(&args.genome_path)?);
    log::info!(
        "Indexed {} chromosomes spanning {} bp",
        index.spans().len(),
        index.total_size()
    );

    let catalog = Arc::new(GeneCatalog::from_gff(&args.annotation_path)?);
    log::info!("Gene catalog holds {} genes", catalog.len());
    if catalog.is_empty() {
        log::warn!(
            "Gene catalog from {} is empty; every overlapped feature will be unresolved",
            args.annotation_path.display()
        );
    }

    let variants = read_variants(&args.variants_path)?;
    log::info!("Read {} structural variants", variants.len());

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
    let engine = NullDistributionEngine::new(
        sampler,
        runner,
        resolver,
        args.samples,
        args.num_threads,
    )?;

    let mut analyzer = VariantSignificanceAnalyzer::new(engine, args.percentile);
    let cutoffs = analyzer.analyze(&variants, &args.goi, Some(&logs))?;

    let table_path = logs.path_for(&format!("cutoffs_{}.txt", args.goi));
    write_cutoff_table(&table_path, &cutoffs)?;
    log::info!("Wrote cutoff table to {}", table_path.display());
    Ok(())
}
