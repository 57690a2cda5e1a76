//! `tsxkit` - check, inspect and convert Tiled `.tsx` tilesets
//!
//! ```text
//! tsxkit check assets/tilesets --strict
//! tsxkit inspect assets/tilesets/water.tsx
//! tsxkit export assets/tilesets/water.tsx --to json -o water.json
//! ```

mod cli;
mod commands;
mod config;
mod discover;

use anyhow::Context;
use clap::Parser;
use cli::{Cli, Command};
use commands::CheckArgs;
use config::Config;
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

fn init_logging(filter: &str) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn main() -> anyhow::Result<ExitCode> {
    let cli = Cli::parse();

    let cwd = std::env::current_dir().context("Reading the working directory")?;
    let (config, config_path) = Config::load(cli.config.as_deref(), &cwd)?;
    init_logging(cli.log_override().unwrap_or(config.log_filter.as_str()));
    if let Some(path) = &config_path {
        tracing::debug!(path = %path.display(), "using config");
    }

    match &cli.command {
        Command::Check {
            paths,
            no_images,
            json,
            strict,
        } => {
            let args = CheckArgs {
                paths,
                no_images: *no_images,
                json: *json,
                strict: *strict,
            };
            let (output, passed) = commands::check(&config, &args)?;
            print!("{output}");
            if !passed {
                return Ok(ExitCode::FAILURE);
            }
        }
        Command::Inspect { file } => {
            print!("{}", commands::inspect(file)?);
        }
        Command::Export { file, to, output } => {
            let content = commands::export(file, *to)?;
            match output {
                Some(out) => {
                    std::fs::write(out, content)
                        .with_context(|| format!("Writing {}", out.display()))?;
                    tracing::info!(path = %out.display(), "exported tileset");
                }
                None => print!("{content}"),
            }
        }
    }

    Ok(ExitCode::SUCCESS)
}
