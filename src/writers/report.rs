use crate::distribution::CutoffResult;
use crate::error::{Error, Result};
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

/// Writes the final `variant_id\tcutoff` table, one row per input variant
/// in input order. Unlike the draw logs this is the analysis product, so
/// failures are fatal.
pub fn write_cutoff_table(path: &Path, cutoffs: &[CutoffResult]) -> Result<()> {
    let file = File::create(path)
        .map_err(|e| Error::io(format!("Creating {}", path.display()), e))?;
    let mut out = BufWriter::new(file);
    for result in cutoffs {
        writeln!(out, "{}\t{}", result.variant_id, result.cutoff)
            .map_err(|e| Error::io(format!("Writing {}", path.display()), e))?;
    }
    out.flush()
        .map_err(|e| Error::io(format!("Writing {}", path.display()), e))
}

/// Writes a sorted null distribution, one count per line.
pub fn write_distribution(path: &Path, sorted_counts: &[u32]) -> Result<()> {
    let file = File::create(path)
        .map_err(|e| Error::io(format!("Creating {}", path.display()), e))?;
    let mut out = BufWriter::new(file);
    for count in sorted_counts {
        writeln!(out, "{}", count)
            .map_err(|e| Error::io(format!("Writing {}", path.display()), e))?;
    }
    out.flush()
        .map_err(|e| Error::io(format!("Writing {}", path.display()), e))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn cutoff_table_preserves_input_order() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("cutoffs.txt");
        let cutoffs = vec![
            CutoffResult {
                variant_id: "sv1".to_string(),
                cutoff: 3,
            },
            CutoffResult {
                variant_id: "sv2".to_string(),
                cutoff: 0,
            },
        ];
        write_cutoff_table(&path, &cutoffs).unwrap();
        assert_eq!(
            std::fs::read_to_string(&path).unwrap(),
            "sv1\t3\nsv2\t0\n"
        );
    }

    #[test]
    fn distribution_is_one_count_per_line() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("dist.txt");
        write_distribution(&path, &[0, 0, 1, 2]).unwrap();
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "0\n0\n1\n2\n");
    }

    #[test]
    fn unwritable_table_path_is_fatal() {
        let result = write_cutoff_table(Path::new("/nonexistent/dir/cutoffs.txt"), &[]);
        assert!(result.is_err());
    }
}
