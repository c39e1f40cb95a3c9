//! graphsync CLI
//!
//! - `serialize`: NDJSON records → SPARQL update text on stdout
//! - `load`: serialize and submit to a SPARQL update endpoint
//! - `jsonld`: gather records into one JSON-LD document
//!
//! Logs go to stderr and are filtered by `RUST_LOG` (default `info`).

use anyhow::Result;
use chrono::NaiveDate;
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

mod commands;
mod input;

#[derive(Parser)]
#[command(name = "graphsync")]
#[command(author, version, about = "Versioned named-graph updates from JSON records")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Args, Clone)]
struct RecordArgs {
    /// NDJSON input (stdin when omitted)
    #[arg(short, long)]
    input: Option<PathBuf>,

    /// JSON object mapping organization codes to organization IRIs
    #[arg(long)]
    org_map: Option<PathBuf>,

    /// Base IRI for derived subjects (cards, relationships, positions)
    #[arg(long, env = "GRAPHSYNC_CONTEXT_BASE", default_value = graphsync_core::vocab::DEFAULT_CONTEXT_BASE)]
    context_base: String,

    /// Validity date stamped on every record (defaults to today, UTC)
    #[arg(long, value_parser = parse_date)]
    date: Option<NaiveDate>,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the update statements for each record.
    Serialize {
        #[command(flatten)]
        records: RecordArgs,
    },

    /// Serialize records and submit them to the update endpoint.
    ///
    /// Exits non-zero when any record fails.
    Load {
        #[command(flatten)]
        records: RecordArgs,

        /// SPARQL update endpoint
        #[arg(long, env = "GRAPHSYNC_UPDATE_URL")]
        update_url: Option<String>,

        /// Extra request header, `Name: value` (repeatable)
        #[arg(long = "header", value_name = "K:V")]
        headers: Vec<String>,

        /// Retries after the first attempt
        #[arg(long)]
        max_retries: Option<u32>,

        /// Apply to an in-memory store instead of submitting
        #[arg(long)]
        dry_run: bool,
    },

    /// Collect records into one JSON-LD document on stdout.
    Jsonld {
        /// NDJSON input (stdin when omitted)
        #[arg(short, long)]
        input: Option<PathBuf>,

        /// JSON file whose content becomes `@context`
        #[arg(long)]
        context: Option<PathBuf>,
    },
}

fn parse_date(raw: &str) -> Result<NaiveDate, String> {
    NaiveDate::parse_from_str(raw, "%Y-%m-%d").map_err(|e| format!("expected YYYY-MM-DD: {e}"))
}

fn init_logging() {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging();

    match cli.command {
        Commands::Serialize { records } => commands::cmd_serialize(&records),
        Commands::Load {
            records,
            update_url,
            headers,
            max_retries,
            dry_run,
        } => commands::cmd_load(&records, update_url, &headers, max_retries, dry_run),
        Commands::Jsonld { input, context } => {
            commands::cmd_jsonld(input.as_deref(), context.as_deref())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn parses_load_flags() {
        let cli = Cli::try_parse_from([
            "graphsync",
            "load",
            "--input",
            "people.ndjson",
            "--update-url",
            "http://localhost:3030/ds/update",
            "--header",
            "Authorization: Bearer x",
            "--header",
            "X-Trace: 1",
            "--date",
            "2024-05-01",
            "--dry-run",
        ])
        .unwrap();
        match cli.command {
            Commands::Load {
                records,
                headers,
                dry_run,
                update_url,
                ..
            } => {
                assert_eq!(headers.len(), 2);
                assert!(dry_run);
                assert_eq!(update_url.as_deref(), Some("http://localhost:3030/ds/update"));
                assert_eq!(records.date, NaiveDate::from_ymd_opt(2024, 5, 1));
            }
            _ => panic!("expected load"),
        }
    }

    #[test]
    fn rejects_bad_dates() {
        assert!(Cli::try_parse_from(["graphsync", "serialize", "--date", "May 1st"]).is_err());
    }
}
