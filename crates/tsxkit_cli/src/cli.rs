use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "tsxkit")]
#[command(author, version, about = "Check, inspect and convert Tiled .tsx tilesets")]
pub struct Cli {
    /// Configuration file (defaults to ./tsxkit.toml when present)
    #[arg(long, global = true, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// More log output; repeat for trace level
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Only log errors
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Validate tilesets; directories are searched for .tsx files
    Check {
        #[arg(required = true, value_name = "PATH")]
        paths: Vec<PathBuf>,

        /// Skip checking that image files exist
        #[arg(long)]
        no_images: bool,

        /// Print reports as JSON
        #[arg(long)]
        json: bool,

        /// Fail on warnings too
        #[arg(long)]
        strict: bool,
    },

    /// Summarize a tileset: grid, wang sets and animations
    Inspect {
        #[arg(value_name = "FILE")]
        file: PathBuf,
    },

    /// Convert a tileset to JSON or re-serialized .tsx
    Export {
        #[arg(value_name = "FILE")]
        file: PathBuf,

        #[arg(long, value_enum, default_value_t = ExportFormat::Json)]
        to: ExportFormat,

        /// Output file; stdout when omitted
        #[arg(short, long, value_name = "OUT")]
        output: Option<PathBuf>,
    },
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportFormat {
    Json,
    Tsx,
}

impl Cli {
    /// Log filter implied by `-v`/`-q`, if either was given
    pub fn log_override(&self) -> Option<&'static str> {
        if self.quiet {
            return Some("error");
        }
        match self.verbose {
            0 => None,
            1 => Some("debug"),
            _ => Some("trace"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_check_flags() {
        let cli = Cli::try_parse_from([
            "tsxkit",
            "check",
            "assets/tilesets",
            "extra.tsx",
            "--no-images",
            "--strict",
        ])
        .unwrap();

        match cli.command {
            Command::Check {
                paths,
                no_images,
                json,
                strict,
            } => {
                assert_eq!(
                    paths,
                    vec![PathBuf::from("assets/tilesets"), PathBuf::from("extra.tsx")]
                );
                assert!(no_images);
                assert!(!json);
                assert!(strict);
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn test_check_needs_a_path() {
        assert!(Cli::try_parse_from(["tsxkit", "check"]).is_err());
    }

    #[test]
    fn test_export_defaults_to_json() {
        let cli = Cli::try_parse_from(["tsxkit", "export", "water.tsx"]).unwrap();
        assert!(matches!(
            cli.command,
            Command::Export {
                to: ExportFormat::Json,
                output: None,
                ..
            }
        ));

        let cli =
            Cli::try_parse_from(["tsxkit", "export", "water.tsx", "--to", "tsx", "-o", "out.tsx"])
                .unwrap();
        assert!(matches!(
            cli.command,
            Command::Export {
                to: ExportFormat::Tsx,
                output: Some(_),
                ..
            }
        ));
    }

    #[test]
    fn test_global_flags() {
        let cli = Cli::try_parse_from(["tsxkit", "inspect", "water.tsx", "-vv"]).unwrap();
        assert_eq!(cli.log_override(), Some("trace"));

        let cli = Cli::try_parse_from(["tsxkit", "-q", "--config", "ci.toml", "inspect", "a.tsx"])
            .unwrap();
        assert_eq!(cli.log_override(), Some("error"));
        assert_eq!(cli.config, Some(PathBuf::from("ci.toml")));

        assert!(Cli::try_parse_from(["tsxkit", "-q", "-v", "inspect", "a.tsx"]).is_err());
    }
}
