use clap::Parser;
use svgoi::{
    cli::{init_verbose, Cli, Command},
    commands::{analyze, distribution, sample},
    error::{handle_error_and_exit, Result},
};

fn runner() -> Result<()> {
    let cli = Cli::parse();
    init_verbose(&cli);
    let subcommand_name = match cli.command {
        Command::Analyze(_) => "analyze",
        Command::Distribution(_) => "distribution",
        Command::Sample(_) => "sample",
    };

    log::info!(
        "Running {}-{} [{}]",
        env!("CARGO_PKG_NAME"),
        env!("CARGO_PKG_VERSION"),
        subcommand_name
    );
    match cli.command {
        Command::Analyze(args) => analyze::analyze(args)?,
        Command::Distribution(args) => distribution::distribution(args)?,
        Command::Sample(args) => sample::sample(args)?,
    }
    log::info!("{} end", env!("CARGO_PKG_NAME"));
    Ok(())
}

fn main() {
    if let Err(e) = runner() {
        handle_error_and_exit(e);
    }
}
