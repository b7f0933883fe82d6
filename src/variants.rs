use crate::error::{Error, Result};
use crate::utils::open_text_reader;
use std::io::BufRead;
use std::path::Path;

const SVLEN_MARKER: &str = "SVLEN=";

/// A called structural variant, reduced to its id and absolute size.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StructuralVariant {
    pub id: String,
    pub size: u64,
}

pub fn read_variants(path: &Path) -> Result<Vec<StructuralVariant>> {
    let reader = open_text_reader(path)?;
    read_variants_from(reader, &path.display().to_string())
}

/// Reads a VCF-style stream of structural variants: the id is column 3 and
/// the size is the absolute value of the `SVLEN=` entry in the INFO column,
/// truncated at the next `;`.
pub fn read_variants_from<R: BufRead>(reader: R, input: &str) -> Result<Vec<StructuralVariant>> {
    let mut variants = Vec::new();

    for (line_number, line) in reader.lines().enumerate() {
        let line =
            line.map_err(|e| Error::parse(input, line_number + 1, format!("read failed: {}", e)))?;
        if line.is_empty() || line.starts_with('#') {
            continue;
        }

        let fields: Vec<&str> = line.split('\t').collect();
        if fields.len() < 8 {
            return Err(Error::parse(
                input,
                line_number + 1,
                format!("expected 8 tab-delimited fields, found {}", fields.len()),
            ));
        }

        let info = fields[7];
        let svlen = info
            .find(SVLEN_MARKER)
            .map(|at| &info[at + SVLEN_MARKER.len()..])
            .map(|tail| tail.split(';').next().unwrap_or(tail))
            .ok_or_else(|| {
                Error::parse(input, line_number + 1, "INFO column has no SVLEN entry")
            })?;
        let size: i64 = svlen.parse().map_err(|_| {
            Error::parse(
                input,
                line_number + 1,
                format!("SVLEN value {:?} is not an integer", svlen),
            )
        })?;

        variants.push(StructuralVariant {
            id: fields[2].to_string(),
            size: size.unsigned_abs(),
        });
    }

    Ok(variants)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    const VCF: &str = "\
##fileformat=VCFv4.2
#CHROM\tPOS\tID\tREF\tALT\tQUAL\tFILTER\tINFO
chr1\t1000\tsv1\tN\t<DEL>\t.\tPASS\tSVTYPE=DEL;SVLEN=-100;END=1100
chr2\t5000\tsv2\tN\t<INS>\t.\tPASS\tSVTYPE=INS;SVLEN=5000
";

    #[test]
    fn sizes_are_absolute_values_of_svlen() {
        let variants = read_variants_from(Cursor::new(VCF), "test").unwrap();
        assert_eq!(
            variants,
            vec![
                StructuralVariant {
                    id: "sv1".to_string(),
                    size: 100
                },
                StructuralVariant {
                    id: "sv2".to_string(),
                    size: 5000
                },
            ]
        );
    }

    #[test]
    fn missing_svlen_is_a_parse_error() {
        let vcf = "chr1\t1000\tsv1\tN\t<DEL>\t.\tPASS\tSVTYPE=DEL;END=1100\n";
        let result = read_variants_from(Cursor::new(vcf), "test");
        assert!(matches!(result, Err(Error::Parse { line: 1, .. })));
    }

    #[test]
    fn unparsable_svlen_is_a_parse_error() {
        let vcf = "chr1\t1000\tsv1\tN\t<DEL>\t.\tPASS\tSVLEN=abc;END=1100\n";
        let result = read_variants_from(Cursor::new(vcf), "test");
        assert!(matches!(result, Err(Error::Parse { line: 1, .. })));
    }

    #[test]
    fn comment_lines_are_skipped() {
        let variants = read_variants_from(Cursor::new("##only\n#comments\n"), "test").unwrap();
        assert!(variants.is_empty());
    }
}
