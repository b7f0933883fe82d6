use std::fmt;

/// A region drawn from the genome. Coordinates are 1-based and relative to
/// the chromosome; `end` is exclusive, so the region covers `end - start`
/// bases.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SampledRegion {
    pub chr: String,
    pub start: u64,
    pub end: u64,
}

impl SampledRegion {
    pub fn new(chr: impl Into<String>, start: u64, end: u64) -> Self {
        Self {
            chr: chr.into(),
            start,
            end,
        }
    }

    pub fn len(&self) -> u64 {
        self.end - self.start
    }

    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }
}

impl fmt::Display for SampledRegion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}\t{}\t{}", self.chr, self.start, self.end)
    }
}
