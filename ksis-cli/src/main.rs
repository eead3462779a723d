mod cli;
mod commands;
mod output;
mod paths;

use std::fs::File;

use anyhow::Result;
use clap::Parser;
use simplelog::ColorChoice;
use simplelog::CombinedLogger;
use simplelog::Config;
use simplelog::LevelFilter;
use simplelog::SharedLogger;
use simplelog::TermLogger;
use simplelog::TerminalMode;
use simplelog::WriteLogger;

use crate::cli::Cli;
use crate::cli::Commands;
use crate::commands::BoardCommand;
use crate::commands::Session;

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();
    init_logging(cli.verbose);

    if let Err(err) = run(cli).await {
        log::error!("{err:#}");
        eprintln!("error: {err:#}");
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<()> {
    let session = Session::open(&cli.backend).await?;

    match &cli.command {
        Commands::Whoami => commands::whoami(&session),
        Commands::Boards => commands::list_boards(&session),
        Commands::List(args) => commands::on_board(&session, BoardCommand::List(&args.query)).await,
        Commands::Bulk(args) => commands::on_board(&session, BoardCommand::Bulk(args)).await,
        Commands::Watch { max_retries } => commands::watch(&session, *max_retries).await,
    }
}

/// Debug log to the cache dir; info and up on stderr with `--verbose`.
fn init_logging(verbose: bool) {
    let mut loggers: Vec<Box<dyn SharedLogger>> = Vec::new();

    paths::rotate_logs();
    if let Some(path) = paths::log_file()
        && let Ok(file) = File::create(path)
    {
        loggers.push(WriteLogger::new(LevelFilter::Debug, Config::default(), file));
    }

    if verbose {
        loggers.push(TermLogger::new(
            LevelFilter::Info,
            Config::default(),
            TerminalMode::Stderr,
            ColorChoice::Auto,
        ));
    }

    if !loggers.is_empty() {
        let _ = CombinedLogger::init(loggers);
    }
}
