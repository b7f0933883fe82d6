mod report;
mod run_log;

pub use report::{write_cutoff_table, write_distribution};
pub use run_log::{LogContext, RunLog};
