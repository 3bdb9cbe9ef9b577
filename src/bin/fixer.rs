//! camt053_fix - CLI tool that makes camt.053.001.10 statements acceptable
//! to strict camt.053.001.02 importers.

use camt053_downgrade::{default_output_path, fix_statement_file, Error, Result};
use clap::Parser;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "camt053_fix")]
#[command(about = "Fix camt.053 statements for strict importers", long_about = None)]
struct Cli {
    /// Input camt.053 XML file
    input: PathBuf,

    /// Output file (defaults to <input>_FIXED.<ext> next to the input)
    output: Option<PathBuf>,

    /// Log every change made to the document
    #[arg(short, long)]
    verbose: bool,
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match run(&cli) {
        Ok(output) => println!("Fixed file written to: {}", output.display()),
        Err(e @ Error::InputNotFound(_)) => {
            eprintln!("ERROR: {}", e);
            std::process::exit(2);
        }
        Err(e) => {
            eprintln!("ERROR: {}", e);
            std::process::exit(1);
        }
    }
}

fn run(cli: &Cli) -> Result<PathBuf> {
    let output = cli
        .output
        .clone()
        .unwrap_or_else(|| default_output_path(&cli.input));

    fix_statement_file(&cli.input, &output)?;

    Ok(output)
}

/// Log to stderr so stdout only carries the result line. `RUST_LOG` wins
/// over `--verbose`.
fn init_logging(verbose: bool) {
    let default_level = if verbose { "debug" } else { "warn" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}
