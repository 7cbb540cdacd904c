use std::fs::File;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use rust_decimal::Decimal;
use shield_core::calculations::planner::{self, LumpSumPlanner};
use shield_core::{AllocationOutcome, BracketTable, TaxAllocationEngine};
use shield_data::{ScheduleLoader, schedules};
use tracing::debug;
use tracing_subscriber::EnvFilter;

/// Show how gross income spreads across the marginal tax brackets and how
/// much of it RRSP contributions shield from tax.
#[derive(Parser, Debug)]
#[command(name = "shield")]
#[command(version, about, long_about = None)]
struct Args {
    /// Total gross income (salary plus bonus)
    #[arg(long)]
    income: Decimal,

    /// Tax-deferred contribution already made this year
    #[arg(long, default_value = "0")]
    contribution: Decimal,

    /// Annual base salary, used to derive the payroll contribution
    #[arg(long)]
    base_salary: Option<Decimal>,

    /// Payroll contribution as a percent of base salary
    #[arg(long, default_value = "0")]
    employee_pct: Decimal,

    /// Employer match as a percent of base salary
    #[arg(long, default_value = "0")]
    employer_pct: Decimal,

    /// Unused RRSP contribution room; enables the lump-sum recommendation
    #[arg(long)]
    rrsp_room: Option<Decimal>,

    /// Income threshold the lump-sum planner contributes down to
    /// (defaults to the built-in schedule's efficiency cliff)
    #[arg(long)]
    cliff: Option<Decimal>,

    /// Bracket schedule CSV to use instead of the built-in 2026 ON/federal one
    #[arg(long)]
    schedule: Option<PathBuf>,

    /// Assumed annual growth rate for the projection (e.g. 0.06)
    #[arg(long, default_value = "0.06")]
    growth_rate: Decimal,

    /// Years to project the shielded balance forward; 0 disables it
    #[arg(long, default_value_t = 0)]
    growth_years: u32,
}

fn init_logging() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(filter).init();
}

fn load_schedule(path: Option<&PathBuf>) -> Result<BracketTable> {
    match path {
        Some(path) => {
            debug!(path = %path.display(), "loading schedule from CSV");
            let file = File::open(path)
                .with_context(|| format!("Failed to open schedule: {}", path.display()))?;
            ScheduleLoader::load(file)
                .with_context(|| format!("Failed to load schedule: {}", path.display()))
        }
        None => Ok(schedules::on_combined_2026()),
    }
}

fn percent(rate: Decimal) -> Decimal {
    (rate * Decimal::ONE_HUNDRED).round_dp(2)
}

fn print_breakdown(outcome: &AllocationOutcome) {
    println!("{:<12} {:>12} {:>12} {:>12}  status", "bracket", "amount", "shielded", "taxed");
    for allocation in &outcome.allocations {
        let status = if allocation.taxed == Decimal::ZERO {
            "shielded (0% tax)".to_string()
        } else {
            format!("taxed at {}%", percent(allocation.rate))
        };
        println!(
            "{:<12} {:>12} {:>12} {:>12}  {}",
            allocation.label,
            allocation.amount_in_bracket,
            allocation.shielded,
            allocation.taxed,
            status
        );
    }

    let summary = &outcome.summary;
    println!();
    println!("Taxable income:    {}", summary.taxable_income);
    println!("Total tax:         {}", summary.total_tax);
    println!("Marginal rate:     {}%", percent(summary.marginal_rate));
    println!("Total shielded:    {}", summary.total_shielded);
    println!("Estimated refund:  {}", summary.estimated_refund);
}

fn main() -> Result<()> {
    init_logging();
    let args = Args::parse();

    let table = load_schedule(args.schedule.as_ref())?;

    let payroll = match args.base_salary {
        Some(base_salary) => {
            planner::periodic_contribution(base_salary, args.employee_pct, args.employer_pct)?
        }
        None => Decimal::ZERO,
    };
    let contribution = args.contribution + payroll;
    debug!(%contribution, "total tax-deferred contribution");

    let engine = TaxAllocationEngine::new(&table);
    let outcome = engine.allocate(args.income, contribution)?;
    print_breakdown(&outcome);

    if let Some(rrsp_room) = args.rrsp_room {
        let unused_room = planner::room_remaining(rrsp_room, contribution)?;
        let cliff = args.cliff.unwrap_or_else(schedules::efficiency_cliff);
        let plan = LumpSumPlanner::new(&table).recommend(
            outcome.summary.taxable_income,
            cliff,
            unused_room,
        )?;

        println!();
        println!("Room remaining:        {}", unused_room);
        println!("Income above cliff:    {}", plan.income_above_cliff);
        println!("Recommended lump sum:  {}", plan.recommended_lump_sum);
        println!("Est. lump-sum refund:  {}", plan.estimated_refund);
    }

    if args.growth_years > 0 {
        let projected = planner::project_growth(
            outcome.summary.total_shielded,
            args.growth_rate,
            args.growth_years,
        )?;
        println!();
        println!(
            "Shielded balance after {} years at {}%: {}",
            args.growth_years,
            percent(args.growth_rate),
            projected
        );
    }

    Ok(())
}
