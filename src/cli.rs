use clap::{ArgAction, ArgGroup, Parser, Subcommand};
use env_logger::fmt::Color;
use log::{Level, LevelFilter};
use std::{
    io::Write,
    path::{Path, PathBuf},
};

#[derive(Parser)]
#[command(name="svgoi",
          author="Stephen Pollo",
          version,
          about = "Structural variant gene-of-interest enrichment analysis by genome resampling",
          long_about = None,
          disable_help_subcommand = true,
          help_template = "{name} {version}\n{author}\n{about-section}\n{usage-heading}\n    {usage}\n\n{all-args}{after-help}",
          )]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    #[clap(short = 'v')]
    #[clap(long = "verbose")]
    #[clap(action = ArgAction::Count, help = "Specify multiple times to increase verbosity level (e.g., -vv for more verbosity)")]
    pub verbosity: u8,
}

#[derive(Subcommand)]
pub enum Command {
    #[clap(about = "Score structural variants against null gene-of-interest distributions")]
    Analyze(AnalyzeArgs),
    #[clap(about = "Build one null gene-of-interest distribution for a fixed region size")]
    Distribution(DistributionArgs),
    #[clap(about = "Draw random regions from a genome")]
    Sample(SampleArgs),
}

#[derive(Parser, Debug)]
#[command(group(ArgGroup::new("analyze")))]
#[command(arg_required_else_help(true))]
pub struct AnalyzeArgs {
    #[clap(required = true)]
    #[clap(short = 'g')]
    #[clap(long = "genome")]
    #[clap(help = "Path to reference genome FASTA")]
    #[clap(value_name = "FASTA")]
    #[arg(value_parser = check_file_exists)]
    pub genome_path: PathBuf,

    #[clap(required = true)]
    #[clap(short = 'f')]
    #[clap(long = "features")]
    #[clap(help = "GFF file of mapped features given to the overlap engine")]
    #[clap(value_name = "GFF")]
    #[arg(value_parser = check_file_exists)]
    pub features_path: PathBuf,

    #[clap(required = true)]
    #[clap(short = 'a')]
    #[clap(long = "annotation")]
    #[clap(help = "GFF annotation linking gene ids to descriptions")]
    #[clap(value_name = "GFF")]
    #[arg(value_parser = check_file_exists)]
    pub annotation_path: PathBuf,

    #[clap(required = true)]
    #[clap(long = "variants")]
    #[clap(help = "VCF file with called structural variants")]
    #[clap(value_name = "VCF")]
    #[arg(value_parser = check_file_exists)]
    pub variants_path: PathBuf,

    #[clap(required = true)]
    #[clap(short = 'o')]
    #[clap(long = "output-prefix")]
    #[clap(help = "Prefix for all output files")]
    #[clap(value_name = "OUTPUT_PREFIX")]
    #[arg(value_parser = check_prefix_path)]
    pub output_prefix: String,

    #[clap(required = true)]
    #[clap(long = "goi")]
    #[clap(help = "Gene-of-interest label matched against gene descriptions")]
    #[clap(value_name = "LABEL")]
    pub goi: String,

    #[clap(short = 't')]
    #[clap(long = "threads")]
    #[clap(help = "Number of threads")]
    #[clap(value_name = "THREADS")]
    #[clap(default_value = "1")]
    #[arg(value_parser = threads_in_range)]
    pub num_threads: usize,

    #[clap(help_heading("Advanced"))]
    #[clap(long = "percentile")]
    #[clap(value_name = "PERC")]
    #[clap(help = "Percentile of the null distribution used as the cutoff")]
    #[clap(default_value = "95.0")]
    #[arg(value_parser = ensure_percentile)]
    pub percentile: f64,

    #[clap(help_heading("Advanced"))]
    #[clap(long = "samples")]
    #[clap(value_name = "SAMPLES")]
    #[clap(help = "Number of random draws per null distribution")]
    #[clap(default_value = "10000")]
    #[arg(value_parser = count_in_range)]
    pub samples: usize,

    #[clap(help_heading("Advanced"))]
    #[clap(long = "seed")]
    #[clap(value_name = "SEED")]
    #[clap(help = "Seed for the random region sampler")]
    pub seed: Option<u64>,

    #[clap(help_heading("Advanced"))]
    #[clap(long = "bedtools")]
    #[clap(value_name = "PATH")]
    #[clap(help = "bedtools executable")]
    #[clap(default_value = "bedtools")]
    pub bedtools: PathBuf,

    #[clap(help_heading("Advanced"))]
    #[clap(long = "engine-timeout")]
    #[clap(value_name = "SECS")]
    #[clap(help = "Timeout for each overlap engine call, in seconds")]
    #[clap(default_value = "300")]
    pub engine_timeout: u64,

    #[clap(help_heading("Advanced"))]
    #[clap(long = "id-prefix")]
    #[clap(value_name = "MARKER")]
    #[clap(help = "Literal marker preceding the feature id in overlap output")]
    #[clap(default_value = "sequence ")]
    pub id_prefix: String,

    #[clap(help_heading("Advanced"))]
    #[clap(long = "id-suffix")]
    #[clap(value_name = "MARKER")]
    #[clap(help = "Literal marker following the feature id in overlap output")]
    #[clap(default_value = "-t26_1-p1")]
    pub id_suffix: String,
}

#[derive(Parser, Debug)]
#[command(group(ArgGroup::new("distribution")))]
#[command(arg_required_else_help(true))]
pub struct DistributionArgs {
    #[clap(required = true)]
    #[clap(short = 'g')]
    #[clap(long = "genome")]
    #[clap(help = "Path to reference genome FASTA")]
    #[clap(value_name = "FASTA")]
    #[arg(value_parser = check_file_exists)]
    pub genome_path: PathBuf,

    #[clap(required = true)]
    #[clap(short = 'f')]
    #[clap(long = "features")]
    #[clap(help = "GFF file of mapped features given to the overlap engine")]
    #[clap(value_name = "GFF")]
    #[arg(value_parser = check_file_exists)]
    pub features_path: PathBuf,

    #[clap(required = true)]
    #[clap(short = 'a')]
    #[clap(long = "annotation")]
    #[clap(help = "GFF annotation linking gene ids to descriptions")]
    #[clap(value_name = "GFF")]
    #[arg(value_parser = check_file_exists)]
    pub annotation_path: PathBuf,

    #[clap(required = true)]
    #[clap(short = 'o')]
    #[clap(long = "output-prefix")]
    #[clap(help = "Prefix for all output files")]
    #[clap(value_name = "OUTPUT_PREFIX")]
    #[arg(value_parser = check_prefix_path)]
    pub output_prefix: String,

    #[clap(required = true)]
    #[clap(short = 's')]
    #[clap(long = "size")]
    #[clap(help = "Region size to sample, in base pairs")]
    #[clap(value_name = "SIZE")]
    pub size: u64,

    #[clap(required = true)]
    #[clap(long = "goi")]
    #[clap(help = "Gene-of-interest label matched against gene descriptions")]
    #[clap(value_name = "LABEL")]
    pub goi: String,

    #[clap(short = 't')]
    #[clap(long = "threads")]
    #[clap(help = "Number of threads")]
    #[clap(value_name = "THREADS")]
    #[clap(default_value = "1")]
    #[arg(value_parser = threads_in_range)]
    pub num_threads: usize,

    #[clap(help_heading("Advanced"))]
    #[clap(long = "percentile")]
    #[clap(value_name = "PERC")]
    #[clap(help = "Percentile of the null distribution to report")]
    #[clap(default_value = "95.0")]
    #[arg(value_parser = ensure_percentile)]
    pub percentile: f64,

    #[clap(help_heading("Advanced"))]
    #[clap(long = "samples")]
    #[clap(value_name = "SAMPLES")]
    #[clap(help = "Number of random draws in the distribution")]
    #[clap(default_value = "10000")]
    #[arg(value_parser = count_in_range)]
    pub samples: usize,

    #[clap(help_heading("Advanced"))]
    #[clap(long = "seed")]
    #[clap(value_name = "SEED")]
    #[clap(help = "Seed for the random region sampler")]
    pub seed: Option<u64>,

    #[clap(help_heading("Advanced"))]
    #[clap(long = "bedtools")]
    #[clap(value_name = "PATH")]
    #[clap(help = "bedtools executable")]
    #[clap(default_value = "bedtools")]
    pub bedtools: PathBuf,

    #[clap(help_heading("Advanced"))]
    #[clap(long = "engine-timeout")]
    #[clap(value_name = "SECS")]
    #[clap(help = "Timeout for each overlap engine call, in seconds")]
    #[clap(default_value = "300")]
    pub engine_timeout: u64,

    #[clap(help_heading("Advanced"))]
    #[clap(long = "id-prefix")]
    #[clap(value_name = "MARKER")]
    #[clap(help = "Literal marker preceding the feature id in overlap output")]
    #[clap(default_value = "sequence ")]
    pub id_prefix: String,

    #[clap(help_heading("Advanced"))]
    #[clap(long = "id-suffix")]
    #[clap(value_name = "MARKER")]
    #[clap(help = "Literal marker following the feature id in overlap output")]
    #[clap(default_value = "-t26_1-p1")]
    pub id_suffix: String,
}

#[derive(Parser, Debug)]
#[command(group(ArgGroup::new("sample")))]
#[command(arg_required_else_help(true))]
pub struct SampleArgs {
    #[clap(required = true)]
    #[clap(short = 'g')]
    #[clap(long = "genome")]
    #[clap(help = "Path to reference genome FASTA")]
    #[clap(value_name = "FASTA")]
    #[arg(value_parser = check_file_exists)]
    pub genome_path: PathBuf,

    #[clap(required = true)]
    #[clap(short = 's')]
    #[clap(long = "size")]
    #[clap(help = "Region size to sample, in base pairs")]
    #[clap(value_name = "SIZE")]
    pub size: u64,

    #[clap(short = 'c')]
    #[clap(long = "count")]
    #[clap(help = "Number of regions to draw")]
    #[clap(value_name = "COUNT")]
    #[clap(default_value = "1")]
    #[arg(value_parser = count_in_range)]
    pub count: usize,

    #[clap(long = "seed")]
    #[clap(value_name = "SEED")]
    #[clap(help = "Seed for the random region sampler")]
    pub seed: Option<u64>,
}

pub fn init_verbose(args: &Cli) {
    let filter_level: LevelFilter = match args.verbosity {
        0 => LevelFilter::Warn,
        1 => LevelFilter::Info,
        _ => LevelFilter::Debug,
    };

    env_logger::Builder::from_default_env()
        .format(|buf, record| {
            let level = record.level();
            let mut style = buf.style();
            match record.level() {
                Level::Error => style.set_color(Color::Red),
                Level::Warn => style.set_color(Color::Yellow),
                Level::Info => style.set_color(Color::Green),
                Level::Debug => style.set_color(Color::Blue),
                Level::Trace => style.set_color(Color::Cyan),
            };

            writeln!(
                buf,
                "{} [{}] - {}",
                chrono::Local::now().format("%Y-%m-%d %H:%M:%S"),
                style.value(level),
                record.args()
            )
        })
        .filter_level(filter_level)
        .init();
}

type ParseResult<T> = std::result::Result<T, String>;

fn check_prefix_path(s: &str) -> ParseResult<String> {
    let path = Path::new(s);
    if let Some(parent_dir) = path.parent() {
        if !parent_dir.as_os_str().is_empty() && !parent_dir.exists() {
            return Err(format!("Path does not exist: {}", parent_dir.display()));
        }
    }
    Ok(s.to_string())
}

fn threads_in_range(s: &str) -> ParseResult<usize> {
    let thread: usize = s
        .parse()
        .map_err(|_| format!("`{}` is not a valid thread number", s))?;
    if thread >= 1 {
        Ok(thread)
    } else {
        Err("Number of threads must be at least 1".into())
    }
}

fn count_in_range(s: &str) -> ParseResult<usize> {
    let count: usize = s
        .parse()
        .map_err(|_| format!("`{}` is not a valid count", s))?;
    if count >= 1 {
        Ok(count)
    } else {
        Err("Count must be at least 1".into())
    }
}

fn check_file_exists(s: &str) -> ParseResult<PathBuf> {
    let path = Path::new(s);
    if !path.exists() {
        Err(format!("File does not exist: {}", path.display()))
    } else {
        Ok(path.to_path_buf())
    }
}

fn ensure_percentile(s: &str) -> ParseResult<f64> {
    let value = s
        .parse::<f64>()
        .map_err(|e| format!("Could not parse percentile: {}", e))?;
    if value > 0.0 && value <= 100.0 {
        Ok(value)
    } else {
        Err(format!(
            "The percentile must be > 0 and <= 100, got: {}",
            value
        ))
    }
}
