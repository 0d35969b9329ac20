//! dvds - DVD catalog semantic search CLI
//!
//! Index catalog descriptions as embeddings and run hybrid searches over them.

use std::process::ExitCode;

use clap::Parser;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

use dvd_search::Result;
use dvd_search::app::AppContext;
use dvd_search::cli::Cli;

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(&cli);

    match run(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            if cli.robot {
                // Robot mode: structured JSON error on stdout
                let structured = e.to_structured();
                println!(
                    "{}",
                    serde_json::to_string(&structured).unwrap_or_default()
                );
            } else {
                eprintln!("Error: {e}");
                eprintln!("Hint: {}", e.kind().suggestion());
            }
            ExitCode::FAILURE
        }
    }
}

fn run(cli: &Cli) -> Result<()> {
    let ctx = AppContext::from_cli(cli)?;
    dvd_search::cli::commands::run(&ctx, &cli.command)
}

fn init_tracing(cli: &Cli) {
    if cli.quiet {
        return;
    }

    let filter = match cli.verbose {
        0 => "warn,dvd_search=info",
        1 => "info,dvd_search=debug",
        2 => "debug,dvd_search=trace",
        _ => "trace",
    };

    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter));

    if cli.robot {
        tracing_subscriber::registry()
            .with(env_filter)
            .with(fmt::layer().json().with_writer(std::io::stderr))
            .init();
    } else {
        tracing_subscriber::registry()
            .with(env_filter)
            .with(fmt::layer().with_writer(std::io::stderr))
            .init();
    }
}
