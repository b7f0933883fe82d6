use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Error)]
pub enum Error {
    #[error("Genome contains no chromosomes")]
    EmptyGenome,

    #[error("Chromosome {0} has zero length")]
    EmptyChromosome(String),

    #[error("The size {size} is too big to sample from this genome (largest chromosome is {largest} bp)")]
    InvalidSampleSize { size: u64, largest: u64 },

    #[error("Gave up sampling a region of size {size} after {attempts} rejections")]
    SamplingExhausted { size: u64, attempts: u64 },

    #[error("Overlap engine failed: {0}")]
    ExternalEngineFailure(String),

    #[error("Overlap line has no id between {prefix:?} and {suffix:?}: {line}")]
    MalformedOverlapLine {
        prefix: String,
        suffix: String,
        line: String,
    },

    #[error("Invalid percentile {0}: must be > 0 and <= 100")]
    InvalidPercentile(f64),

    #[error("Cannot take a percentile of an empty distribution")]
    EmptyDistribution,

    #[error("{input}: line {line}: {reason}")]
    Parse {
        input: String,
        line: usize,
        reason: String,
    },

    #[error("{context}: {source}")]
    Io {
        context: String,
        #[source]
        source: std::io::Error,
    },
}

impl Error {
    pub fn io(context: impl Into<String>, source: std::io::Error) -> Self {
        Error::Io {
            context: context.into(),
            source,
        }
    }

    pub fn parse(input: impl Into<String>, line: usize, reason: impl Into<String>) -> Self {
        Error::Parse {
            input: input.into(),
            line,
            reason: reason.into(),
        }
    }
}

pub fn handle_error_and_exit(err: Error) -> ! {
    log::error!("{}", err);
    std::process::exit(1);
}
