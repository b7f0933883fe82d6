use crate::distribution::DrawRecord;
use crate::genome::{GenomeIndex, SampledRegion};
use crate::overlap::GeneCatalog;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::PathBuf;

/// Creates the log and report files that document a run, all named
/// `<prefix>_<suffix>`. Log writing is a side channel: every failure is
/// reported as a warning and the computation carries on.
#[derive(Debug, Clone)]
pub struct LogContext {
    prefix: String,
}

impl LogContext {
    pub fn new(prefix: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
        }
    }

    pub fn path_for(&self, suffix: &str) -> PathBuf {
        PathBuf::from(format!("{}_{}", self.prefix, suffix))
    }

    fn open(&self, suffix: &str) -> Option<BufWriter<File>> {
        let path = self.path_for(suffix);
        match File::create(&path) {
            Ok(file) => Some(BufWriter::new(file)),
            Err(e) => {
                log::warn!("Could not create log file {}: {}", path.display(), e);
                None
            }
        }
    }

    pub fn write_genome_index(&self, index: &GenomeIndex) {
        if let Some(mut out) = self.open("genome_index.txt") {
            if let Err(e) = index.dump(&mut out) {
                log::warn!("Could not write genome index log: {}", e);
            }
        }
    }

    pub fn write_catalog(&self, catalog: &GeneCatalog) {
        if let Some(mut out) = self.open("gene_catalog.txt") {
            if let Err(e) = catalog.dump(&mut out) {
                log::warn!("Could not write gene catalog log: {}", e);
            }
        }
    }

    /// Flat list of every region drawn during one run.
    pub fn write_regions(&self, run_id: &str, regions: &[SampledRegion]) {
        if let Some(mut out) = self.open(&format!("{}_samples.txt", run_id)) {
            for region in regions {
                if let Err(e) = writeln!(out, "{}", region) {
                    log::warn!("Could not write region list for {}: {}", run_id, e);
                    return;
                }
            }
        }
    }

    /// Opens the per-draw log set for one engine run.
    pub fn run_log(&self, run_id: &str) -> RunLog {
        RunLog {
            overlaps: self.open(&format!("{}_bedtools_results.txt", run_id)),
            all_ids: self.open(&format!("{}_all_ids.txt", run_id)),
            unique_ids: self.open(&format!("{}_unique_ids.txt", run_id)),
            descriptions: self.open(&format!("{}_gene_descriptions.txt", run_id)),
        }
    }
}

/// Per-draw dumps of one engine run: raw overlap lines, extracted ids,
/// deduplicated ids, and resolved descriptions. Each file carries a
/// `Sample N` header per draw followed by a blank line.
#[derive(Debug)]
pub struct RunLog {
    overlaps: Option<BufWriter<File>>,
    all_ids: Option<BufWriter<File>>,
    unique_ids: Option<BufWriter<File>>,
    descriptions: Option<BufWriter<File>>,
}

fn write_section(
    writer: &mut Option<BufWriter<File>>,
    what: &str,
    draw: usize,
    mut lines: &mut dyn Iterator<Item = String>,
) {
    if let Some(out) = writer.as_mut() {
        let result = writeln!(out, "Sample {}", draw + 1)
            .and_then(|_| {
                <&mut dyn Iterator<Item = String> as Iterator>::try_for_each(&mut lines, |line| {
                    writeln!(out, "{}", line)
                })
            })
            .and_then(|_| writeln!(out));
        if let Err(e) = result {
            log::warn!("Could not write {} log: {}; disabling it", what, e);
            *writer = None;
        }
    }
}

impl RunLog {
    pub fn write_record(&mut self, record: &DrawRecord) {
        write_section(
            &mut self.overlaps,
            "overlap results",
            record.draw,
            &mut record.raw_lines.iter().cloned(),
        );
        write_section(
            &mut self.all_ids,
            "all ids",
            record.draw,
            &mut record.all_ids.iter().cloned(),
        );
        write_section(
            &mut self.unique_ids,
            "unique ids",
            record.draw,
            &mut record.unique_ids.iter().cloned(),
        );
        write_section(
            &mut self.descriptions,
            "gene descriptions",
            record.draw,
            &mut record.descriptions.iter().map(|(id, description)| {
                match description {
                    Some(description) => description.clone(),
                    None => format!("{}: unresolved", id),
                }
            }),
        );
    }

    pub fn finish(self) {
        for writer in [self.overlaps, self.all_ids, self.unique_ids, self.descriptions] {
            if let Some(mut out) = writer {
                if let Err(e) = out.flush() {
                    log::warn!("Could not flush draw log: {}", e);
                }
            }
        }
    }
}
