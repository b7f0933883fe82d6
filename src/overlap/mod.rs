mod bedtools;
mod catalog;
mod resolver;

pub use bedtools::BedtoolsRunner;
pub use catalog::GeneCatalog;
pub use resolver::{count_goi, dedupe_case_insensitive, IdMarkers, OverlapResolver, ResolvedDraw};
