use crate::distribution::{nearest_rank_cutoff, NullDistributionEngine};
use crate::error::{Error, Result};
use crate::variants::StructuralVariant;
use crate::writers::LogContext;

/// Percentile cutoff derived for one variant. A cutoff of 0 marks a variant
/// whose size could not be sampled from the genome.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CutoffResult {
    pub variant_id: String,
    pub cutoff: u32,
}

/// Runs the null-distribution engine once per structural variant and turns
/// each distribution into a nearest-rank percentile cutoff.
pub struct VariantSignificanceAnalyzer {
    engine: NullDistributionEngine,
    percentile: f64,
}

impl VariantSignificanceAnalyzer {
    pub fn new(engine: NullDistributionEngine, percentile: f64) -> Self {
        Self { engine, percentile }
    }

    /// Analyzes the variants in order, one engine run per variant with the
    /// variant's size as the region size.
    ///
    /// A variant whose size exceeds the largest chromosome gets a zero
    /// cutoff and a warning; the rest of the batch still runs. Any other
    /// engine failure aborts the batch.
    pub fn analyze(
        &mut self,
        variants: &[StructuralVariant],
        goi: &str,
        logs: Option<&LogContext>,
    ) -> Result<Vec<CutoffResult>> {
        let mut cutoffs = Vec::with_capacity(variants.len());

        for variant in variants {
            let run_id = format!("var_{}_{}_{}", variant.id, variant.size, goi);
            log::info!(
                "Building null distribution for variant {} (size {})",
                variant.id,
                variant.size
            );
            let run_log = logs.map(|ctx| ctx.run_log(&run_id));

            match self.engine.run(variant.size, goi, run_log) {
                Err(Error::InvalidSampleSize { size, largest }) => {
                    log::warn!(
                        "Variant {} has size {} that cannot be sampled (largest chromosome is {} bp); recording a zero cutoff and skipping it",
                        variant.id,
                        size,
                        largest
                    );
                    cutoffs.push(CutoffResult {
                        variant_id: variant.id.clone(),
                        cutoff: 0,
                    });
                }
                Err(e) => return Err(e),
                Ok(output) => {
                    let mut counts = output.counts;
                    counts.sort_unstable();
                    let cutoff = nearest_rank_cutoff(&counts, self.percentile)?;
                    log::debug!(
                        "Variant {}: {}th-percentile cutoff is {}",
                        variant.id,
                        self.percentile,
                        cutoff
                    );
                    cutoffs.push(CutoffResult {
                        variant_id: variant.id.clone(),
                        cutoff,
                    });
                    if let Some(ctx) = logs {
                        ctx.write_regions(&run_id, &output.regions);
                    }
                }
            }
        }

        Ok(cutoffs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::genome::{GenomeIndex, RegionSampler};
    use crate::overlap::{BedtoolsRunner, GeneCatalog, IdMarkers, OverlapResolver};
    use std::io::Cursor;
    use std::os::unix::fs::PermissionsExt;
    use std::path::PathBuf;
    use std::sync::Arc;
    use std::time::Duration;
    use tempfile::TempDir;

    fn fake_engine(dir: &TempDir, body: &str) -> PathBuf {
        let path = dir.path().join("engine.sh");
        std::fs::write(&path, format!("#!/bin/sh\n{}\n", body)).unwrap();
        let mut perms = std::fs::metadata(&path).unwrap().permissions();
        perms.set_mode(0o755);
        std::fs::set_permissions(&path, perms).unwrap();
        path
    }

    fn analyzer(dir: &TempDir, body: &str) -> VariantSignificanceAnalyzer {
        let index = GenomeIndex::new(vec![
            ("chr1".to_string(), 1000),
            ("chr2".to_string(), 2000),
        ])
        .unwrap();
        let sampler = RegionSampler::with_seed(Arc::new(index), 11);
        let runner = BedtoolsRunner::new(
            fake_engine(dir, body),
            "/tmp/features.gff",
            Duration::from_secs(5),
        );
        let gff = "chr1\tsrc\tgene\t1\t9\t.\t+\t.\tID=ABC123;description=VSP surface antigen\n";
        let catalog = Arc::new(GeneCatalog::from_gff_reader(Cursor::new(gff), "test").unwrap());
        let resolver = OverlapResolver::new(catalog, IdMarkers::default());
        let engine = NullDistributionEngine::new(sampler, runner, resolver, 50, 1).unwrap();
        VariantSignificanceAnalyzer::new(engine, 95.0)
    }

    fn variant(id: &str, size: u64) -> StructuralVariant {
        StructuralVariant {
            id: id.to_string(),
            size,
        }
    }

    #[test]
    fn oversized_variant_gets_zero_cutoff_and_batch_survives() {
        let dir = TempDir::new().unwrap();
        let hit = "printf 'chr1\\t1\\t2\\tsequence ABC123-t26_1-p1 mapped\\n'";
        let mut analyzer = analyzer(&dir, hit);

        let variants = vec![variant("sv1", 100), variant("sv2", 5000)];
        let cutoffs = analyzer.analyze(&variants, "VSP", None).unwrap();

        assert_eq!(cutoffs.len(), 2);
        assert_eq!(cutoffs[0].variant_id, "sv1");
        // every draw hits the same gene once, so the cutoff is exactly 1
        assert_eq!(cutoffs[0].cutoff, 1);
        assert_eq!(
            cutoffs[1],
            CutoffResult {
                variant_id: "sv2".to_string(),
                cutoff: 0
            }
        );
    }

    #[test]
    fn results_follow_input_order() {
        let dir = TempDir::new().unwrap();
        let mut analyzer = analyzer(&dir, "true");
        let variants = vec![
            variant("svA", 9000),
            variant("svB", 10),
            variant("svC", 9000),
        ];
        let cutoffs = analyzer.analyze(&variants, "VSP", None).unwrap();
        let ids: Vec<&str> = cutoffs.iter().map(|c| c.variant_id.as_str()).collect();
        assert_eq!(ids, vec!["svA", "svB", "svC"]);
        assert_eq!(cutoffs[0].cutoff, 0);
        assert_eq!(cutoffs[2].cutoff, 0);
    }

    #[test]
    fn engine_failures_other_than_size_abort_the_batch() {
        let dir = TempDir::new().unwrap();
        let mut analyzer = analyzer(&dir, "exit 7");
        let variants = vec![variant("sv1", 100)];
        let result = analyzer.analyze(&variants, "VSP", None);
        assert!(matches!(result, Err(Error::ExternalEngineFailure(_))));
    }
}
