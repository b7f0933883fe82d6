use crate::error::{Error, Result};
use crate::genome::{RegionSampler, SampledRegion};
use crate::overlap::{BedtoolsRunner, OverlapResolver};
use crate::writers::RunLog;
use crossbeam_channel::{bounded, Sender};
use rayon::iter::{IntoParallelIterator, ParallelIterator};
use rayon::ThreadPoolBuilder;
use std::ops::Range;
use std::thread;

pub const DEFAULT_SAMPLE_COUNT: usize = 10_000;

const CHANNEL_BUFFER_SIZE: usize = 2048;

/// Everything observed for a single draw, handed to the draw-log writer.
#[derive(Debug, Clone)]
pub struct DrawRecord {
    pub draw: usize,
    pub region: SampledRegion,
    pub raw_lines: Vec<String>,
    pub all_ids: Vec<String>,
    pub unique_ids: Vec<String>,
    pub descriptions: Vec<(String, Option<String>)>,
    pub count: u32,
}

/// One finished engine run: GOI counts and the regions they came from,
/// both in draw order.
#[derive(Debug)]
pub struct RunOutput {
    pub counts: Vec<u32>,
    pub regions: Vec<SampledRegion>,
}

/// Builds an empirical null distribution of GOI counts by repeatedly
/// sampling a region and resolving its overlaps.
pub struct NullDistributionEngine {
    sampler: RegionSampler,
    runner: BedtoolsRunner,
    resolver: OverlapResolver,
    sample_count: usize,
    pool: Option<rayon::ThreadPool>,
    runs_started: u64,
}

impl NullDistributionEngine {
    pub fn new(
        sampler: RegionSampler,
        runner: BedtoolsRunner,
        resolver: OverlapResolver,
        sample_count: usize,
        num_threads: usize,
    ) -> Result<Self> {
        let pool = if num_threads > 1 {
            log::debug!("Initializing thread pool with {} threads...", num_threads);
            Some(
                ThreadPoolBuilder::new()
                    .num_threads(num_threads)
                    .thread_name(|i| format!("svgoi-{}", i))
                    .build()
                    .map_err(|e| {
                        Error::io("Initializing thread pool", std::io::Error::other(e))
                    })?,
            )
        } else {
            None
        };
        Ok(Self {
            sampler,
            runner,
            resolver,
            sample_count,
            pool,
            runs_started: 0,
        })
    }

    pub fn sampler(&self) -> &RegionSampler {
        &self.sampler
    }

    pub fn sample_count(&self) -> usize {
        self.sample_count
    }

    /// Runs `sample_count` draws of size `size` and returns the counts in
    /// draw order. The size check happens before any draw is attempted.
    ///
    /// Draw records stream to `run_log` on a dedicated writer thread; the
    /// log is a side channel and never fails the run. Draws are split into
    /// contiguous chunks, one forked sampler stream per chunk, so a fixed
    /// seed and thread count reproduce the run exactly.
    pub fn run(&mut self, size: u64, goi: &str, run_log: Option<RunLog>) -> Result<RunOutput> {
        if !self.sampler.can_sample(size) {
            return Err(Error::InvalidSampleSize {
                size,
                largest: self.sampler.index().largest_span_len(),
            });
        }

        self.runs_started += 1;
        let run_sampler = self.sampler.fork(self.runs_started);

        let (sender, receiver) = bounded::<DrawRecord>(CHANNEL_BUFFER_SIZE);
        let writer_thread = thread::spawn(move || {
            let mut run_log = run_log;
            for record in receiver {
                if let Some(log) = run_log.as_mut() {
                    log.write_record(&record);
                }
            }
            if let Some(log) = run_log {
                log.finish();
            }
        });

        let n = self.sample_count;
        let num_chunks = self
            .pool
            .as_ref()
            .map(|pool| pool.current_num_threads())
            .unwrap_or(1)
            .clamp(1, n.max(1));
        let chunk_len = n.div_ceil(num_chunks);
        let chunks: Vec<(usize, Range<usize>)> = (0..num_chunks)
            .map(|c| (c, c * chunk_len..((c + 1) * chunk_len).min(n)))
            .filter(|(_, range)| !range.is_empty())
            .collect();

        let results: Result<Vec<Vec<(usize, SampledRegion, u32)>>> = match &self.pool {
            Some(pool) => pool.install(|| {
                chunks
                    .into_par_iter()
                    .map(|(c, range)| self.run_chunk(&run_sampler, c, range, size, goi, &sender))
                    .collect()
            }),
            None => chunks
                .into_iter()
                .map(|(c, range)| self.run_chunk(&run_sampler, c, range, size, goi, &sender))
                .collect(),
        };
        drop(sender);
        if writer_thread.join().is_err() {
            log::warn!("Draw log writer thread panicked; draw logs may be incomplete");
        }

        let mut draws: Vec<(usize, SampledRegion, u32)> =
            results?.into_iter().flatten().collect();
        draws.sort_by_key(|(draw, _, _)| *draw);

        let mut counts = Vec::with_capacity(n);
        let mut regions = Vec::with_capacity(n);
        for (_, region, count) in draws {
            counts.push(count);
            regions.push(region);
        }
        Ok(RunOutput { counts, regions })
    }

    fn run_chunk(
        &self,
        run_sampler: &RegionSampler,
        chunk: usize,
        draws: Range<usize>,
        size: u64,
        goi: &str,
        sender: &Sender<DrawRecord>,
    ) -> Result<Vec<(usize, SampledRegion, u32)>> {
        let mut sampler = run_sampler.fork(chunk as u64);
        let mut out = Vec::with_capacity(draws.len());

        for draw in draws {
            if draw > 0 && draw % 100 == 0 {
                log::debug!("Finished {} of {} draws", draw, self.sample_count);
            }
            let region = sampler.sample(size)?;
            let raw_lines = self.runner.find_overlaps(&region)?;
            let resolved = self.resolver.resolve(&raw_lines, goi)?;
            let count = resolved.goi_count;

            let record = DrawRecord {
                draw,
                region: region.clone(),
                raw_lines,
                all_ids: resolved.all_ids,
                unique_ids: resolved.unique_ids,
                descriptions: resolved.descriptions,
                count,
            };
            if sender.send(record).is_err() {
                log::warn!("Draw log writer is gone; continuing without draw logs");
            }

            out.push((draw, region, count));
        }
        Ok(out)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::genome::GenomeIndex;
    use crate::overlap::{GeneCatalog, IdMarkers};
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

    fn catalog() -> Arc<GeneCatalog> {
        let gff = "chr1\tsrc\tgene\t1\t9\t.\t+\t.\tID=ABC123;description=VSP surface antigen\n";
        Arc::new(GeneCatalog::from_gff_reader(Cursor::new(gff), "test").unwrap())
    }

    fn sampler(seed: u64) -> RegionSampler {
        let index = GenomeIndex::new(vec![
            ("chr1".to_string(), 1000),
            ("chr2".to_string(), 2000),
        ])
        .unwrap();
        RegionSampler::with_seed(Arc::new(index), seed)
    }

    fn engine_with(dir: &TempDir, body: &str, seed: u64, threads: usize) -> NullDistributionEngine {
        let runner = BedtoolsRunner::new(
            fake_engine(dir, body),
            "/tmp/features.gff",
            Duration::from_secs(5),
        );
        let resolver = OverlapResolver::new(catalog(), IdMarkers::default());
        NullDistributionEngine::new(sampler(seed), runner, resolver, 20, threads).unwrap()
    }

    #[test]
    fn oversized_run_fails_before_any_draw() {
        let dir = TempDir::new().unwrap();
        // the stand-in engine would fail loudly if it were ever invoked
        let mut engine = engine_with(&dir, "exit 9", 1, 1);
        let result = engine.run(5000, "VSP", None);
        assert!(matches!(
            result,
            Err(Error::InvalidSampleSize {
                size: 5000,
                largest: 2000
            })
        ));
    }

    #[test]
    fn every_draw_contributes_one_count() {
        let dir = TempDir::new().unwrap();
        let hit = "printf 'chr1\\t1\\t2\\tsequence ABC123-t26_1-p1 mapped\\n'";
        let mut engine = engine_with(&dir, hit, 2, 1);
        let output = engine.run(100, "VSP", None).unwrap();
        assert_eq!(output.counts.len(), 20);
        assert_eq!(output.regions.len(), 20);
        assert!(output.counts.iter().all(|&c| c == 1));
        assert!(output.regions.iter().all(|r| r.len() == 100));
    }

    #[test]
    fn draw_failures_abort_the_run() {
        let dir = TempDir::new().unwrap();
        // output line carries no id markers
        let mut engine = engine_with(&dir, "printf 'chr1\\t1\\t2\\tgarbage\\n'", 3, 1);
        let result = engine.run(100, "VSP", None);
        assert!(matches!(result, Err(Error::MalformedOverlapLine { .. })));
    }

    #[test]
    fn fixed_seed_reproduces_the_distribution() {
        let dir = TempDir::new().unwrap();
        let empty = "true";
        let mut a = engine_with(&dir, empty, 42, 1);
        let mut b = engine_with(&dir, empty, 42, 1);
        let out_a = a.run(100, "VSP", None).unwrap();
        let out_b = b.run(100, "VSP", None).unwrap();
        assert_eq!(out_a.regions, out_b.regions);
        assert_eq!(out_a.counts, out_b.counts);
    }

    #[test]
    fn consecutive_runs_use_different_draws() {
        let dir = TempDir::new().unwrap();
        let mut engine = engine_with(&dir, "true", 42, 1);
        let first = engine.run(100, "VSP", None).unwrap();
        let second = engine.run(100, "VSP", None).unwrap();
        assert_ne!(first.regions, second.regions);
    }

    #[test]
    fn parallel_run_completes_with_all_draws() {
        let dir = TempDir::new().unwrap();
        let hit = "printf 'chr1\\t1\\t2\\tsequence ABC123-t26_1-p1 mapped\\n'";
        let mut engine = engine_with(&dir, hit, 5, 4);
        let output = engine.run(100, "VSP", None).unwrap();
        assert_eq!(output.counts.len(), 20);
        assert!(output.counts.iter().all(|&c| c == 1));
    }
}
