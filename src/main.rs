//! Portfolio Planner CLI
//!
//! Command-line front end for the allocation and projection engines.
//!
//! Usage:
//!   portfolio_planner allocate --budget 100000 --rows portfolio.csv [--quotes quotes.json]
//!   portfolio_planner allocate --budget 100000 --index imoex.json --quotes quotes.json
//!   portfolio_planner schedule --amount 1000 --growth 5 --duration 10
//!   portfolio_planner project --initial 10000 --rate 7 --duration 10 --amount 1000 --growth 5

use anyhow::{bail, Context, Result};
use clap::{Args, Parser, Subcommand, ValueEnum};
use portfolio_planner::allocation::{self, distribute_evenly, load_rows, weight_total};
use portfolio_planner::contributions::{load_amounts, ContributionSchedule, ScheduleParams};
use portfolio_planner::parse::{parse_decimal, parse_or_zero, parse_percent, parse_periods};
use portfolio_planner::projection::ProjectionForm;
use portfolio_planner::quotes::{
    populate_rows, rows_from_index, IndexComponent, StaticQuotes, StockInfo,
};
use portfolio_planner::{ContributionFrequency, DurationUnit, Horizon, ScenarioRunner};
use serde::de::DeserializeOwned;
use std::fs::File;
use std::path::{Path, PathBuf};

#[derive(Parser)]
#[command(name = "portfolio_planner")]
#[command(version, about = "Plan lot allocations and project contribution growth")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Split a budget across weighted assets in whole lots
    Allocate(AllocateArgs),
    /// Print the generated contribution schedule
    Schedule(ScheduleArgs),
    /// Project the balance over time
    Project(ProjectArgs),
}

#[derive(Copy, Clone, Debug, Eq, PartialEq, ValueEnum)]
enum CliUnit {
    Years,
    Months,
}

impl From<CliUnit> for DurationUnit {
    fn from(value: CliUnit) -> Self {
        match value {
            CliUnit::Years => DurationUnit::Years,
            CliUnit::Months => DurationUnit::Months,
        }
    }
}

#[derive(Copy, Clone, Debug, Eq, PartialEq, ValueEnum)]
enum CliFrequency {
    Yearly,
    Monthly,
}

impl From<CliFrequency> for ContributionFrequency {
    fn from(value: CliFrequency) -> Self {
        match value {
            CliFrequency::Yearly => ContributionFrequency::Yearly,
            CliFrequency::Monthly => ContributionFrequency::Monthly,
        }
    }
}

#[derive(Args)]
struct AllocateArgs {
    /// Total amount to invest
    #[arg(short, long, default_value = "")]
    budget: String,

    /// CSV with columns ticker,price,weight,lot_size
    #[arg(short, long, required_unless_present = "index", conflicts_with = "index")]
    rows: Option<PathBuf>,

    /// JSON list of {ticker, weight}; builds the rows from the index instead
    #[arg(long)]
    index: Option<PathBuf>,

    /// JSON list of {ticker, name, lot_size, last_price} used to fill blanks
    #[arg(short, long)]
    quotes: Option<PathBuf>,

    /// Replace all weights with an even split
    #[arg(long)]
    distribute_evenly: bool,

    /// Print JSON instead of a table
    #[arg(long)]
    json: bool,
}

#[derive(Args)]
struct ScheduleInputArgs {
    /// Periodic contribution amount
    #[arg(short, long, default_value = "")]
    amount: String,

    /// Yearly indexation of the contribution, in percent
    #[arg(short, long, default_value = "")]
    growth: String,

    /// Duration, in --unit
    #[arg(short, long, default_value = "")]
    duration: String,

    #[arg(short, long, value_enum, default_value = "years")]
    unit: CliUnit,

    #[arg(short, long, value_enum, default_value = "yearly")]
    frequency: CliFrequency,
}

impl ScheduleInputArgs {
    fn params(&self) -> ScheduleParams {
        ScheduleParams::new(
            parse_or_zero(&self.amount),
            parse_percent(&self.growth),
            Horizon::new(parse_periods(&self.duration), self.unit.into()),
            self.frequency.into(),
        )
    }
}

#[derive(Args)]
struct ScheduleArgs {
    #[command(flatten)]
    schedule: ScheduleInputArgs,

    /// Print JSON instead of a table
    #[arg(long)]
    json: bool,
}

#[derive(Args)]
struct ProjectArgs {
    /// Starting balance
    #[arg(short, long, default_value = "")]
    initial: String,

    /// Annual interest rate, in percent
    #[arg(short, long, default_value = "")]
    rate: String,

    /// Skip all interest in yearly mode
    #[arg(long)]
    no_reinvest: bool,

    #[command(flatten)]
    schedule: ScheduleInputArgs,

    /// CSV with an `amount` column; replaces the generated schedule
    #[arg(long)]
    schedule_csv: Option<PathBuf>,

    /// Extra annual rates (percent) to compare against, comma separated
    #[arg(long, value_delimiter = ',')]
    compare_rates: Vec<String>,

    /// Print JSON instead of a table
    #[arg(long)]
    json: bool,
}

fn main() -> Result<()> {
    env_logger::init();

    let cli = Cli::parse();
    match cli.command {
        Command::Allocate(args) => run_allocate(args),
        Command::Schedule(args) => run_schedule(args),
        Command::Project(args) => run_project(args),
    }
}

fn read_json<T: DeserializeOwned>(path: &Path) -> Result<T> {
    let file = File::open(path).with_context(|| format!("Failed to open {}", path.display()))?;
    serde_json::from_reader(file).with_context(|| format!("Failed to parse {}", path.display()))
}

fn run_allocate(args: AllocateArgs) -> Result<()> {
    let stocks: Vec<StockInfo> = match &args.quotes {
        Some(path) => read_json(path)?,
        None => Vec::new(),
    };

    let mut rows = match (&args.rows, &args.index) {
        (_, Some(path)) => {
            let components: Vec<IndexComponent> = read_json(path)?;
            let source = StaticQuotes::new(stocks).with_index(components);
            rows_from_index(&source).context("Failed to copy index components")?
        }
        (Some(path), None) => {
            let mut rows = load_rows(path)
                .with_context(|| format!("Failed to load rows from {}", path.display()))?;
            if args.quotes.is_some() {
                let populated = populate_rows(&StaticQuotes::new(stocks), &mut rows);
                log::info!("Filled quote data for {} rows", populated);
            }
            rows
        }
        (None, None) => bail!("Either --rows or --index is required"),
    };

    if args.distribute_evenly {
        distribute_evenly(&mut rows);
    }

    let outcome = match allocation::allocate(parse_decimal(&args.budget), &rows) {
        Ok(outcome) => outcome,
        Err(errors) => {
            if args.json {
                println!("{}", serde_json::to_string_pretty(&errors)?);
            } else {
                println!("Warning:");
                for error in errors.errors() {
                    println!("  - {}", error);
                }
            }
            std::process::exit(1);
        }
    };

    if args.json {
        println!("{}", serde_json::to_string_pretty(&outcome)?);
        return Ok(());
    }

    println!("{:>4} {:<10} {:>12} {:>8} {:>8} {:>8} {:>14}",
        "#", "Ticker", "Price", "Weight", "LotSize", "Lots", "Sum");
    println!("{}", "-".repeat(70));
    for (row, result) in rows.iter().zip(&outcome.rows) {
        let text = |v: Option<String>| v.unwrap_or_default();
        println!("{:>4} {:<10} {:>12} {:>8} {:>8} {:>8} {:>14}",
            row.id,
            row.ticker.as_deref().unwrap_or(""),
            text(row.price.map(|p| p.to_string())),
            text(row.weight.map(|w| w.to_string())),
            text(row.lot_size.map(|l| l.to_string())),
            text(result.lots.map(|l| l.to_string())),
            text(result.sum.map(|s| format!("{:.2}", s))),
        );
    }
    println!("Total weight: {}", weight_total(&rows).display());

    if let Some(summary) = &outcome.summary {
        println!("\nSummary:");
        println!("  Total Budget:   {:.2}", summary.total_budget);
        println!("  Total Invested: {:.2}", summary.total_invested);
        println!("  Remaining:      {:.2}", summary.remaining);
        println!("  Utilization:    {:.2}%", summary.utilization);
    }

    Ok(())
}

fn run_schedule(args: ScheduleArgs) -> Result<()> {
    let schedule = ContributionSchedule::auto(args.schedule.params());

    if args.json {
        println!("{}", serde_json::to_string_pretty(&schedule)?);
        return Ok(());
    }

    println!("{:>6} {:>14}", "Period", "Amount");
    for period in schedule.periods() {
        println!("{:>6} {:>14.2}", period.index + 1, period.amount);
    }
    Ok(())
}

fn run_project(args: ProjectArgs) -> Result<()> {
    let schedule = match &args.schedule_csv {
        Some(path) => load_amounts(path)
            .with_context(|| format!("Failed to load schedule from {}", path.display()))?,
        None => ContributionSchedule::auto(args.schedule.params()),
    };

    let form = ProjectionForm {
        initial: args.initial.clone(),
        rate_percent: args.rate.clone(),
        duration: args.schedule.duration.clone(),
        unit: args.schedule.unit.into(),
        frequency: args.schedule.frequency.into(),
        reinvest: !args.no_reinvest,
    };
    let runner = ScenarioRunner::new(form.to_input(&schedule));
    let result = runner.run();

    let rates: Vec<f64> = args.compare_rates.iter().map(|r| parse_percent(r)).collect();
    let comparisons = runner.run_rates(&rates);

    if args.json {
        let compared: Vec<serde_json::Value> = rates
            .iter()
            .zip(&comparisons)
            .map(|(rate, r)| {
                serde_json::json!({ "annual_rate": rate, "final_balance": r.final_balance })
            })
            .collect();
        let output = serde_json::json!({
            "result": &result,
            "summary": result.summary(),
            "comparisons": compared,
        });
        println!("{}", serde_json::to_string_pretty(&output)?);
        return Ok(());
    }

    println!("{:<10} {:>16}", "Period", "Balance");
    println!("{}", "-".repeat(27));
    for year in &result.breakdown {
        println!("{:<10} {:>16.2}", year.label(), year.balance);
    }

    let summary = result.summary();
    println!("\nSummary:");
    println!("  Initial:           {:.2}", summary.initial);
    println!("  Contributions:     {:.2}", summary.total_contributed);
    println!("  Growth:            {:.2} ({:.2}%)", summary.growth, summary.growth_pct);
    println!("  Final Balance:     {:.2}", summary.final_balance);

    if !comparisons.is_empty() {
        println!("\nRate comparison:");
        for (rate, other) in rates.iter().zip(&comparisons) {
            println!("  {:>6.2}%  {:>16.2}", rate * 100.0, other.final_balance);
        }
    }

    Ok(())
}
