use std::fs::File;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use shield_data::ScheduleLoader;

/// Validate a bracket schedule CSV file and print the resulting table.
///
/// The CSV file should have the following columns:
/// - label: display name of the bracket
/// - lower_bound: inclusive floor of the bracket
/// - upper_bound: exclusive ceiling (empty for the unbounded top bracket)
/// - rate: the marginal tax rate as a decimal (e.g. 0.1905)
#[derive(Parser, Debug)]
#[command(name = "shield-data-loader")]
#[command(version, about, long_about = None)]
struct Args {
    /// Path to the CSV file containing the bracket schedule
    #[arg(short, long)]
    file: PathBuf,
}

fn main() -> Result<()> {
    let args = Args::parse();

    println!("Loading bracket schedule from: {}", args.file.display());

    let file = File::open(&args.file)
        .with_context(|| format!("Failed to open: {}", args.file.display()))?;

    let table = ScheduleLoader::load(file)
        .with_context(|| format!("Failed to load schedule: {}", args.file.display()))?;

    println!("Schedule is valid ({} brackets):", table.brackets().len());
    for bracket in table.brackets() {
        match bracket.upper_bound {
            Some(upper) => println!(
                "  {:<12} {:>12} to {:>12} at {}",
                bracket.label, bracket.lower_bound, upper, bracket.rate
            ),
            None => println!(
                "  {:<12} {:>12} and above       at {}",
                bracket.label, bracket.lower_bound, bracket.rate
            ),
        }
    }

    Ok(())
}
