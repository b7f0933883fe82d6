use crate::error::{Error, Result};
use crate::utils::open_text_reader;
use std::io::{BufRead, Write};
use std::path::Path;

/// One chromosome's slice of the linear genome coordinate space.
/// `start` and `end` are inclusive global offsets.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChromosomeSpan {
    pub name: String,
    pub start: u64,
    pub end: u64,
}

impl ChromosomeSpan {
    pub fn len(&self) -> u64 {
        self.end - self.start + 1
    }

    pub fn contains(&self, pos: u64) -> bool {
        pos >= self.start && pos <= self.end
    }
}

/// Ordered, gap-free index of chromosome spans over a single linear
/// coordinate space. Built once, never mutated.
#[derive(Debug)]
pub struct GenomeIndex {
    spans: Vec<ChromosomeSpan>,
    total_size: u64,
    largest_span_len: u64,
}

impl GenomeIndex {
    /// Builds the index from an ordered list of (chromosome, length) pairs.
    pub fn new(lengths: impl IntoIterator<Item = (String, u64)>) -> Result<Self> {
        let mut spans = Vec::new();
        let mut offset = 0u64;
        let mut largest_span_len = 0u64;

        for (name, len) in lengths {
            if len == 0 {
                return Err(Error::EmptyChromosome(name));
            }
            spans.push(ChromosomeSpan {
                name,
                start: offset,
                end: offset + len - 1,
            });
            largest_span_len = largest_span_len.max(len);
            offset += len;
        }

        if spans.is_empty() {
            return Err(Error::EmptyGenome);
        }

        Ok(Self {
            spans,
            total_size: offset,
            largest_span_len,
        })
    }

    pub fn from_fasta(path: &Path) -> Result<Self> {
        let reader = open_text_reader(path)?;
        Self::from_fasta_reader(reader, &path.display().to_string())
    }

    /// Scans a FASTA stream and indexes each record by its sequence length.
    /// Records appear in the index in file order.
    pub fn from_fasta_reader<R: BufRead>(reader: R, input: &str) -> Result<Self> {
        let mut lengths: Vec<(String, u64)> = Vec::new();
        let mut current: Option<(String, u64)> = None;

        for (line_number, line) in reader.lines().enumerate() {
            let line = line.map_err(|e| {
                Error::parse(input, line_number + 1, format!("read failed: {}", e))
            })?;
            let line = line.trim_end();
            if let Some(header) = line.strip_prefix('>') {
                if let Some(record) = current.take() {
                    lengths.push(record);
                }
                let name = header.split_whitespace().next().unwrap_or("").to_string();
                if name.is_empty() {
                    return Err(Error::parse(input, line_number + 1, "empty FASTA header"));
                }
                current = Some((name, 0));
            } else if !line.is_empty() {
                match current.as_mut() {
                    Some((_, len)) => *len += line.len() as u64,
                    None => {
                        return Err(Error::parse(
                            input,
                            line_number + 1,
                            "sequence data before first FASTA header",
                        ))
                    }
                }
            }
        }
        if let Some(record) = current.take() {
            lengths.push(record);
        }

        Self::new(lengths)
    }

    pub fn spans(&self) -> &[ChromosomeSpan] {
        &self.spans
    }

    pub fn total_size(&self) -> u64 {
        self.total_size
    }

    pub fn largest_span_len(&self) -> u64 {
        self.largest_span_len
    }

    /// Finds the span holding a global position. Spans are sorted and
    /// gap-free, so any position below `total_size` has exactly one owner.
    pub fn span_containing(&self, pos: u64) -> Option<&ChromosomeSpan> {
        if pos >= self.total_size {
            return None;
        }
        let idx = self.spans.partition_point(|span| span.end < pos);
        self.spans.get(idx)
    }

    /// Writes the index as one `name\tstart\tend` line per span.
    pub fn dump<W: Write>(&self, out: &mut W) -> std::io::Result<()> {
        for span in &self.spans {
            writeln!(out, "{}\t{}\t{}", span.name, span.start, span.end)?;
        }
        Ok(())
    }
}
