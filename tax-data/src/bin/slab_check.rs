use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use tax_core::calculations::common::format_rate;
use tax_data::SlabTableLoader;

/// Validate a slab table CSV file and print its schedules.
///
/// The CSV file should have the following columns:
/// - fiscal_year: The fiscal year label (e.g., 2024-25)
/// - regime: `new` or `old`
/// - age_bracket: `below60`, `60to80` or `above80`
/// - min_income: The lower edge of the slab
/// - max_income: The upper edge of the slab (empty for unbounded)
/// - rate: The slab rate as a percentage (e.g., 5 for 5%)
#[derive(Parser, Debug)]
#[command(name = "tax-slab-check")]
#[command(version, about, long_about = None)]
struct Args {
    /// Path to the CSV file containing slab data
    #[arg(short, long)]
    file: PathBuf,
}

fn main() -> Result<()> {
    let args = Args::parse();

    println!("Checking slab table: {}", args.file.display());

    let table = SlabTableLoader::load_from_path(&args.file)
        .with_context(|| format!("Failed to load slab table: {}", args.file.display()))?;

    println!("Fiscal year {}", table.fiscal_year());
    for (regime, age_bracket, slabs) in table.schedules() {
        let rates: Vec<String> = slabs.iter().map(|s| format!("{}%", format_rate(s.rate))).collect();
        println!(
            "  {:<12} {:<14} {} slabs [{}]",
            regime.label(),
            age_bracket.label(),
            slabs.len(),
            rates.join(", ")
        );
    }
    println!("Slab table is valid.");

    Ok(())
}
