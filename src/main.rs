mod cli;
mod config;
mod params;
mod ui;

use anyhow::Result;
use clap::{CommandFactory, Parser};
use clap_complete::generate;
use cli::{Cli, Command};
use config::{Config, OutputFormat};
use defaultskit::Client;
use params::Params;
use std::io;

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging based on verbosity
    let log_level = match cli.verbose {
        0 => log::LevelFilter::Warn,
        1 => log::LevelFilter::Info,
        2 => log::LevelFilter::Debug,
        _ => log::LevelFilter::Trace,
    };

    env_logger::Builder::new()
        .filter_level(if cli.quiet {
            log::LevelFilter::Error
        } else {
            log_level
        })
        .format_timestamp(None)
        .init();

    if let Some(Command::Completions { shell }) = cli.command {
        let mut cmd = Cli::command();
        generate(shell, &mut cmd, "osx-defaults", &mut io::stdout());
        return Ok(());
    }

    let config = Config::load(cli.config.as_deref())?;

    let file_params = match &cli.params {
        Some(path) => Params::load(path)?,
        None => Params::default(),
    };
    // Validate before touching the store
    let request = file_params.merge(cli.flag_params()).into_request()?;

    let check_mode = cli.check || config.check_mode;
    let client = match config.defaults_path() {
        Some(path) => Client::from_path(path)?,
        None => Client::new()?,
    }
    .check_mode(check_mode);

    let report = client.apply(&request)?;

    let format = if cli.json {
        OutputFormat::Json
    } else {
        config.output
    };
    match format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&report)?),
        OutputFormat::Human => ui::report(&report, check_mode),
    }

    Ok(())
}
