//! `pdl` CLI: format, query, hash and convert PDL documents.
//!
//! ## Usage
//!
//! ```sh
//! # Re-indent a document (stdin → stdout)
//! cat app.pdl | pdl fmt
//!
//! # Compact canonical form, file to file
//! pdl fmt --canonical -i app.pdl -o app.min.pdl
//!
//! # Read one value
//! pdl get -i app.pdl servers[0]/host
//!
//! # Structural fingerprint
//! pdl hash -i app.pdl
//!
//! # Convert to JSON
//! pdl json -i app.pdl
//! ```

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use pdl::{Parameters, PdlOptions, Value};
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "pdl", version, about = "Parameter Description Language tool")]
struct Cli {
    /// Enable verbose output. Repeat for more verbosity (-v, -vv, -vvv).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Reformat a document (cooked layout unless --canonical)
    Fmt {
        /// Input file (reads from stdin if omitted)
        #[arg(short, long)]
        input: Option<PathBuf>,
        /// Output file (writes to stdout if omitted)
        #[arg(short, long)]
        output: Option<PathBuf>,
        /// Write compact single-line output
        #[arg(long)]
        canonical: bool,
    },
    /// Print the value stored at a path
    Get {
        /// Input file (reads from stdin if omitted)
        #[arg(short, long)]
        input: Option<PathBuf>,
        /// Path such as `servers[0]/host`
        path: String,
    },
    /// Print the structural hash of a document
    Hash {
        /// Input file (reads from stdin if omitted)
        #[arg(short, long)]
        input: Option<PathBuf>,
    },
    /// Convert a document to pretty-printed JSON
    Json {
        /// Input file (reads from stdin if omitted)
        #[arg(short, long)]
        input: Option<PathBuf>,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let filter = match cli.verbose {
        0 => EnvFilter::new("warn"),
        1 => EnvFilter::new("info"),
        2 => EnvFilter::new("debug"),
        _ => EnvFilter::new("trace"),
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    match cli.command {
        Commands::Fmt {
            input,
            output,
            canonical,
        } => {
            let params = read_input(input.as_deref())?;
            let options = if canonical {
                PdlOptions::canonical()
            } else {
                PdlOptions::cooked()
            };
            match output {
                Some(path) => pdl::to_file(&path, &params, &options)
                    .with_context(|| format!("Failed to write file: {}", path.display()))?,
                None => pdl::to_writer(std::io::stdout().lock(), &params, &options)
                    .context("Failed to write to stdout")?,
            }
        }
        Commands::Get { input, path } => {
            let params = read_input(input.as_deref())?;
            let value = params
                .get(&path)
                .with_context(|| format!("No value at path: {path}"))?;
            println!("{}", display_value(&value));
        }
        Commands::Hash { input } => {
            let params = read_input(input.as_deref())?;
            println!("{}", params.structural_hash());
        }
        Commands::Json { input } => {
            let params = read_input(input.as_deref())?;
            let json = serde_json::to_string_pretty(&params).context("Failed to convert to JSON")?;
            println!("{json}");
        }
    }

    Ok(())
}

/// Strings print bare; everything else in PDL notation.
fn display_value(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

fn read_input(path: Option<&Path>) -> Result<Parameters> {
    match path {
        Some(path) => pdl::parse_file(path)
            .with_context(|| format!("Failed to read file: {}", path.display())),
        None => pdl::parse_stdin().context("Failed to read from stdin"),
    }
}
