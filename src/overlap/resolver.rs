use crate::error::{Error, Result};
use crate::overlap::GeneCatalog;
use itertools::Itertools;
use std::sync::Arc;

/// Literal markers bounding the feature id inside the last field of an
/// overlap line, e.g. `"sequence "` and `"-t26_1-p1"` in
/// `... sequence ABC123-t26_1-p1 extra text`.
#[derive(Debug, Clone)]
pub struct IdMarkers {
    pub prefix: String,
    pub suffix: String,
}

impl IdMarkers {
    pub fn new(prefix: impl Into<String>, suffix: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
            suffix: suffix.into(),
        }
    }
}

impl Default for IdMarkers {
    fn default() -> Self {
        Self {
            prefix: "sequence ".to_string(),
            suffix: "-t26_1-p1".to_string(),
        }
    }
}

/// Everything resolved from one region's overlap lines. The unresolved ids
/// (present in the overlap output but absent from the catalog) keep a `None`
/// description and never count toward the GOI tally.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedDraw {
    pub all_ids: Vec<String>,
    pub unique_ids: Vec<String>,
    pub descriptions: Vec<(String, Option<String>)>,
    pub goi_count: u32,
}

/// Turns raw overlap-engine lines into a deduplicated id set, gene
/// descriptions, and a gene-of-interest count.
#[derive(Debug, Clone)]
pub struct OverlapResolver {
    catalog: Arc<GeneCatalog>,
    markers: IdMarkers,
}

impl OverlapResolver {
    pub fn new(catalog: Arc<GeneCatalog>, markers: IdMarkers) -> Self {
        Self { catalog, markers }
    }

    pub fn catalog(&self) -> &GeneCatalog {
        &self.catalog
    }

    pub fn resolve(&self, lines: &[String], goi: &str) -> Result<ResolvedDraw> {
        let all_ids = lines
            .iter()
            .map(|line| self.extract_id(line))
            .collect::<Result<Vec<_>>>()?;
        let unique_ids = dedupe_case_insensitive(all_ids.clone());

        let descriptions: Vec<(String, Option<String>)> = unique_ids
            .iter()
            .map(|id| {
                let description = self.catalog.get(id).map(str::to_string);
                if description.is_none() {
                    log::warn!("Feature id {} is not in the gene catalog; leaving it unresolved", id);
                }
                (id.clone(), description)
            })
            .collect();

        let goi_count = count_goi(
            goi,
            descriptions.iter().filter_map(|(_, d)| d.as_deref()),
        );

        Ok(ResolvedDraw {
            all_ids,
            unique_ids,
            descriptions,
            goi_count,
        })
    }

    /// Extracts the feature id from the last tab-delimited field of an
    /// overlap line. Lines missing either marker are an error, not a skip.
    fn extract_id(&self, line: &str) -> Result<String> {
        let field = line.rsplit('\t').next().unwrap_or(line);
        let malformed = || Error::MalformedOverlapLine {
            prefix: self.markers.prefix.clone(),
            suffix: self.markers.suffix.clone(),
            line: line.to_string(),
        };

        let at = field.find(&self.markers.prefix).ok_or_else(malformed)?;
        let after = &field[at + self.markers.prefix.len()..];
        let end = after.find(&self.markers.suffix).ok_or_else(malformed)?;
        Ok(after[..end].to_string())
    }
}

/// Sorts ids by their case-folded form and collapses adjacent entries that
/// are case-insensitively equal, keeping the first of each run. Idempotent.
pub fn dedupe_case_insensitive(mut ids: Vec<String>) -> Vec<String> {
    ids.sort_by(|a, b| {
        a.to_lowercase()
            .cmp(&b.to_lowercase())
            .then_with(|| a.cmp(b))
    });
    ids.into_iter()
        .dedup_by(|a, b| a.to_lowercase() == b.to_lowercase())
        .collect()
}

/// Counts descriptions matching the gene-of-interest label. A description
/// matches when its case-folded form contains the case-folded label;
/// equality is a special case of containment.
pub fn count_goi<'a>(goi: &str, descriptions: impl Iterator<Item = &'a str>) -> u32 {
    let needle = goi.to_lowercase();
    descriptions
        .filter(|description| description.to_lowercase().contains(&needle))
        .count() as u32
}
