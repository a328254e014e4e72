use std::path::PathBuf;

use anyhow::Context;
use chrono::Local;
use clap::{Args, Parser, Subcommand};
use tracing::{debug, info};

use tax_cli::app::{self, OutputFormat};
use tax_cli::config::CliConfig;
use tax_cli::utils::{RawDeductions, parse_amount_or_zero};
use tax_cli::{csv_loader, logging};
use tax_core::{AgeBracket, Regime, TaxEngine, TaxInput, TaxYearConfig};

// ─── CLI definition ──────────────────────────────────────────────────────────

/// Indian income tax calculator for the New and Old regimes.
///
/// Computes slab-wise tax with 4% health and education cess, and compares
/// both regimes to recommend the cheaper one.
#[derive(Debug, Parser)]
#[command(name = "taxcalc", version, about)]
struct Cli {
    /// TOML file with default age bracket, regime, slab table and log level.
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// CSV slab table replacing the built-in FY 2024-25 table.
    #[arg(long, global = true)]
    slabs: Option<PathBuf>,

    /// Log filter, e.g. `info` or `warn,tax_core=debug`. Overrides RUST_LOG.
    #[arg(long, global = true)]
    log_level: Option<String>,

    /// Append log output to this file as well as stderr.
    #[arg(long, global = true)]
    log_file: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Compute tax under one regime.
    Calculate(CalculateArgs),
    /// Compute tax under both regimes and recommend one.
    Compare(CompareArgs),
    /// Print the active slab schedules.
    Slabs(SlabsArgs),
    /// Compare every scenario in a CSV file.
    Batch(BatchArgs),
}

/// Old-regime deduction amounts. Unreadable text counts as 0.
#[derive(Debug, Args)]
struct DeductionArgs {
    /// Investment deduction (capped at ₹150,000).
    #[arg(long, default_value = "", allow_hyphen_values = true)]
    investment: String,

    /// Insurance premium deduction.
    #[arg(long, default_value = "", allow_hyphen_values = true)]
    insurance: String,

    /// House rent allowance exemption.
    #[arg(long, default_value = "", allow_hyphen_values = true)]
    hra: String,

    /// Any other deductions.
    #[arg(long, default_value = "", allow_hyphen_values = true)]
    other: String,
}

impl DeductionArgs {
    fn raw(&self) -> RawDeductions<'_> {
        RawDeductions {
            investment: &self.investment,
            insurance: &self.insurance,
            housing_allowance: &self.hra,
            other: &self.other,
        }
    }
}

#[derive(Debug, Args)]
struct CalculateArgs {
    /// Gross annual income in rupees, e.g. `1200000` or `12,00,000`.
    #[arg(long, allow_hyphen_values = true)]
    income: String,

    /// below60, 60to80 or above80.
    #[arg(long)]
    age: Option<AgeBracket>,

    /// new or old.
    #[arg(long)]
    regime: Option<Regime>,

    #[command(flatten)]
    deductions: DeductionArgs,

    #[arg(long, value_enum, default_value_t)]
    format: OutputFormat,

    /// Write the plain-text report; defaults to tax-calculation-<year>.txt.
    #[arg(long, num_args = 0..=1)]
    export: Option<Option<PathBuf>>,
}

#[derive(Debug, Args)]
struct CompareArgs {
    #[arg(long, allow_hyphen_values = true)]
    income: String,

    #[arg(long)]
    age: Option<AgeBracket>,

    #[command(flatten)]
    deductions: DeductionArgs,

    #[arg(long, value_enum, default_value_t)]
    format: OutputFormat,
}

#[derive(Debug, Args)]
struct SlabsArgs {
    #[arg(long)]
    regime: Option<Regime>,

    #[arg(long)]
    age: Option<AgeBracket>,
}

#[derive(Debug, Args)]
struct BatchArgs {
    /// Scenarios CSV: label,gross_income,age_bracket,investment,insurance,housing_allowance,other
    #[arg(long)]
    file: PathBuf,
}

// ─── entry point ─────────────────────────────────────────────────────────────

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let config = match &cli.config {
        Some(path) => CliConfig::load(path)?,
        None => CliConfig::default(),
    };

    let log_level = cli.log_level.as_deref().or(config.log_level.as_deref());
    logging::init_logging(log_level, cli.log_file.as_deref())?;
    debug!(?config, "configuration resolved");

    let slabs_path = cli.slabs.as_deref().or(config.slabs.as_deref());
    let table = app::load_slab_table(slabs_path)?;
    let year_config = TaxYearConfig::default();
    let engine = TaxEngine::new(&table, &year_config);

    let age_default = config.age_bracket.unwrap_or_default();
    let mut pending_export = None;
    let output = match cli.command {
        Command::Calculate(args) => {
            let input = TaxInput::new(
                parse_amount_or_zero("income", &args.income),
                args.age.unwrap_or(age_default),
                args.regime.or(config.regime).unwrap_or_default(),
            )
            .with_deductions(args.deductions.raw().to_inputs());

            let (result, output) = app::calculate(&engine, &input, args.format)?;
            pending_export = args.export.map(|explicit| (result, explicit));
            output
        }
        Command::Compare(args) => app::compare(
            &engine,
            parse_amount_or_zero("income", &args.income),
            args.age.unwrap_or(age_default),
            &args.deductions.raw().to_inputs(),
            args.format,
        )?,
        Command::Slabs(args) => app::slabs(&engine, args.regime, args.age),
        Command::Batch(args) => {
            let scenarios = csv_loader::load_from_file(&args.file)
                .with_context(|| format!("Failed to load scenarios: {}", args.file.display()))?;
            info!(count = scenarios.len(), "scenarios loaded");
            app::batch(&engine, &scenarios)
        }
    };

    // The result is shown even when the export below is refused.
    print!("{output}");

    if let Some((result, explicit)) = pending_export {
        let today = Local::now().date_naive();
        let path = app::report_path(explicit, config.export_dir.as_deref(), today);
        app::export(&result, &path, today)?;
        eprintln!("Report written to {}", path.display());
    }
    Ok(())
}
