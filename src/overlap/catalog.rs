use crate::error::{Error, Result};
use crate::utils::open_text_reader;
use std::collections::BTreeMap;
use std::io::{BufRead, Write};
use std::path::Path;

const DESCRIPTION_MARKER: &str = "description=";
const ID_PREFIX_LEN: usize = 3; // "ID="

/// Read-only map from gene id to free-text description, built from the
/// `gene` records of a GFF annotation.
#[derive(Debug, Default)]
pub struct GeneCatalog {
    descriptions: BTreeMap<String, String>,
}

impl GeneCatalog {
    pub fn from_gff(path: &Path) -> Result<Self> {
        let reader = open_text_reader(path)?;
        Self::from_gff_reader(reader, &path.display().to_string())
    }

    /// Keeps `gene` records; the id is the attribute column up to the first
    /// `;` with its `ID=` prefix stripped, the description is everything
    /// after the `description=` marker. Gene records missing either marker
    /// are skipped.
    pub fn from_gff_reader<R: BufRead>(reader: R, input: &str) -> Result<Self> {
        let mut descriptions = BTreeMap::new();

        for (line_number, line) in reader.lines().enumerate() {
            let line = line.map_err(|e| {
                Error::parse(input, line_number + 1, format!("read failed: {}", e))
            })?;
            if line.is_empty() || line.starts_with('#') {
                continue;
            }

            let fields: Vec<&str> = line.split('\t').collect();
            if fields.len() < 9 {
                return Err(Error::parse(
                    input,
                    line_number + 1,
                    format!("expected 9 tab-delimited fields, found {}", fields.len()),
                ));
            }
            if !fields[2].eq_ignore_ascii_case("gene") {
                continue;
            }

            let attributes = fields[8];
            let id = attributes
                .split(';')
                .next()
                .filter(|head| head.len() > ID_PREFIX_LEN)
                .map(|head| &head[ID_PREFIX_LEN..]);
            let description = attributes
                .find(DESCRIPTION_MARKER)
                .map(|at| &attributes[at + DESCRIPTION_MARKER.len()..]);

            match (id, description) {
                (Some(id), Some(description)) => {
                    descriptions.insert(id.to_string(), description.to_string());
                }
                _ => {
                    log::debug!(
                        "{}: line {}: gene record without id/description attributes",
                        input,
                        line_number + 1
                    );
                }
            }
        }

        Ok(Self { descriptions })
    }

    pub fn get(&self, id: &str) -> Option<&str> {
        self.descriptions.get(id).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.descriptions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.descriptions.is_empty()
    }

    /// Writes the catalog as `id\tdescription` lines, sorted by id.
    pub fn dump<W: Write>(&self, out: &mut W) -> std::io::Result<()> {
        for (id, description) in &self.descriptions {
            writeln!(out, "{}\t{}", id, description)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    const GFF: &str = "\
##gff-version 3
chr1\tsrc\tgene\t100\t900\t.\t+\t.\tID=gene1;description=variant-specific surface protein
chr1\tsrc\tmRNA\t100\t900\t.\t+\t.\tID=mrna1;Parent=gene1;description=ignored
chr1\tsrc\tgene\t1200\t1800\t.\t-\t.\tID=gene2;description=hypothetical protein
chr2\tsrc\tgene\t10\t90\t.\t+\t.\tID=gene3;Note=no description here
";

    #[test]
    fn keeps_only_gene_records() {
        let catalog = GeneCatalog::from_gff_reader(Cursor::new(GFF), "test").unwrap();
        assert_eq!(catalog.len(), 2);
        assert_eq!(
            catalog.get("gene1"),
            Some("variant-specific surface protein")
        );
        assert_eq!(catalog.get("gene2"), Some("hypothetical protein"));
        assert_eq!(catalog.get("mrna1"), None);
        // gene record without a description marker is skipped
        assert_eq!(catalog.get("gene3"), None);
    }

    #[test]
    fn short_lines_are_a_parse_error() {
        let result = GeneCatalog::from_gff_reader(Cursor::new("chr1\tgene\n"), "test");
        assert!(matches!(result, Err(Error::Parse { line: 1, .. })));
    }

    #[test]
    fn dump_is_sorted_by_id() {
        let gff = "\
chr1\tsrc\tgene\t1\t9\t.\t+\t.\tID=zzz;description=last
chr1\tsrc\tgene\t1\t9\t.\t+\t.\tID=aaa;description=first
";
        let catalog = GeneCatalog::from_gff_reader(Cursor::new(gff), "test").unwrap();
        let mut out = Vec::new();
        catalog.dump(&mut out).unwrap();
        assert_eq!(String::from_utf8(out).unwrap(), "aaa\tfirst\nzzz\tlast\n");
    }
}
