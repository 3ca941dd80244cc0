//! CLI for BEST group comparison over a CSV of measurements.
//!
//! # Usage
//!
//! ```bash
//! # Compare every group against the alphabetically first one
//! bestimate --input trial.csv
//!
//! # Name the columns and the reference group
//! bestimate --input trial.csv \
//!   --group-column arm --value-column response --reference control
//!
//! # Longer run, machine-readable output
//! bestimate --input trial.csv --draws 10000 --chains 4 --json
//! ```

use std::error::Error;
use std::path::PathBuf;
use std::process;

use clap::Parser;

use bestimate::data::{load_csv, load_two_column_csv};
use bestimate::output;
use bestimate::{BestEstimator, Config};

/// Robust Bayesian comparison of treatment groups against a control.
#[derive(Parser, Debug)]
#[command(name = "bestimate")]
#[command(about = "Estimate group differences with Student-t robust Bayesian models")]
#[command(version)]
struct Args {
    /// Input CSV file with one observation per row
    #[arg(short, long)]
    input: PathBuf,

    /// Header name of the group-label column
    #[arg(long, default_value = "group")]
    group_column: String,

    /// Header name of the numeric measurement column
    #[arg(long, default_value = "value")]
    value_column: String,

    /// Treat the file as headerless two-column (label, value) data
    #[arg(long)]
    two_column: bool,

    /// Reference group label (default: alphabetically first group)
    #[arg(short, long)]
    reference: Option<String>,

    /// Number of chains
    #[arg(long, default_value_t = 4)]
    chains: usize,

    /// Post-warmup draws per chain
    #[arg(long, default_value_t = 2000)]
    draws: usize,

    /// Warmup sweeps per chain
    #[arg(long, default_value_t = 1000)]
    warmup: usize,

    /// Base RNG seed
    #[arg(long, default_value_t = 42)]
    seed: u64,

    /// HPD interval mass
    #[arg(long, default_value_t = 0.95)]
    hpd_mass: f64,

    /// Emit the report as pretty-printed JSON instead of plots
    #[arg(long)]
    json: bool,
}

fn main() {
    if let Err(e) = run(Args::parse()) {
        eprintln!("error: {}", e);
        process::exit(1);
    }
}

fn run(args: Args) -> Result<(), Box<dyn Error>> {
    let dataset = if args.two_column {
        load_two_column_csv(&args.input, false)?
    } else {
        load_csv(&args.input, &args.group_column, &args.value_column)?
    };

    let mut config = Config::new()
        .chains(args.chains)
        .draws(args.draws)
        .warmup(args.warmup)
        .seed(args.seed)
        .hpd_mass(args.hpd_mass);
    if let Some(reference) = args.reference {
        config = config.reference(reference);
    }

    let report = BestEstimator::with_config(config).analyze(&dataset)?;

    if args.json {
        println!("{}", output::to_json_pretty(&report)?);
    } else {
        print!("{}", output::format_report(&report));
    }

    Ok(())
}
