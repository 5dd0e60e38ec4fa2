use std::collections::BTreeSet;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use serde::Serialize;
use serde_json::Value;

use space_missions::data::filter::MissionFilter;
use space_missions::data::loader::DEFAULT_PATH;
use space_missions::state::DashboardState;
use space_missions::summary::Summary;
use space_missions::{api, LoaderConfig, MissionStore};

/// Query the space missions dataset
#[derive(Parser, Debug)]
#[clap(name = "space-missions", version)]
struct Args {
    /// CSV source; fallback names are tried when it does not exist
    #[clap(long, env = "SPACE_MISSIONS_CSV", default_value = DEFAULT_PATH, global = true)]
    data: PathBuf,

    /// Print results as JSON
    #[clap(long, global = true)]
    json: bool,

    #[clap(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Number of missions flown by a company
    Count { company: String },
    /// Percentage of a company's missions that succeeded
    SuccessRate { company: String },
    /// Missions launched between two YYYY-MM-DD dates (inclusive)
    Range { start: String, end: String },
    /// Companies with the most missions
    Top {
        #[clap(allow_negative_numbers = true)]
        n: i64,
    },
    /// Mission counts for the four outcome statuses
    Statuses,
    /// Missions launched in a year
    Year {
        #[clap(allow_negative_numbers = true)]
        year: i64,
    },
    /// The most frequently flown rocket
    Rocket,
    /// Average missions per year over an inclusive range
    Average {
        #[clap(allow_negative_numbers = true)]
        start: i64,
        #[clap(allow_negative_numbers = true)]
        end: i64,
    },
    /// Invoke an operation by name with JSON arguments, e.g. `call getMissionsByYear 2020`
    Call {
        operation: String,
        /// Each argument is parsed as JSON; bare words are taken as strings
        args: Vec<String>,
    },
    /// Dashboard aggregates for a filter selection
    Summary {
        /// Restrict to these companies (repeatable)
        #[clap(long = "company")]
        companies: Vec<String>,
        /// Restrict to these mission statuses (repeatable)
        #[clap(long = "status")]
        statuses: Vec<String>,
        /// Restrict to these rocket statuses (repeatable)
        #[clap(long = "rocket-status")]
        rocket_statuses: Vec<String>,
        /// First year of the range
        #[clap(long, requires = "to")]
        from: Option<i32>,
        /// Last year of the range
        #[clap(long, requires = "from")]
        to: Option<i32>,
        /// Also list the selected records
        #[clap(long)]
        rows: bool,
    },
}

fn main() -> Result<()> {
    env_logger::init();
    let args = Args::parse();
    let store = MissionStore::new(LoaderConfig::with_path(&args.data));
    let json = args.json;

    match args.command {
        Command::Count { company } => emit(json, &store.mission_count_by_company(&company)?),
        Command::SuccessRate { company } => emit(json, &store.success_rate(&company)?),
        Command::Range { start, end } => {
            let missions = store.missions_by_date_range(&start, &end)?;
            if json {
                emit(true, &missions)
            } else {
                missions.iter().for_each(|m| println!("{m}"));
                Ok(())
            }
        }
        Command::Top { n } => {
            let top = store.top_companies_by_mission_count(n)?;
            if json {
                emit(true, &top)
            } else {
                top.iter().for_each(|(c, n)| println!("{n:>6}  {c}"));
                Ok(())
            }
        }
        Command::Statuses => {
            if json {
                emit(true, &api::call(&store, "getMissionStatusCount", &[])?)
            } else {
                store
                    .mission_status_count()?
                    .labelled()
                    .iter()
                    .for_each(|(label, n)| println!("{label:<18}{n}"));
                Ok(())
            }
        }
        Command::Year { year } => emit(json, &store.missions_by_year(year)?),
        Command::Rocket => emit(json, &store.most_used_rocket()?),
        Command::Average { start, end } => emit(json, &store.average_missions_per_year(start, end)?),
        Command::Call { operation, args } => {
            let values: Vec<Value> = args.iter().map(String::as_str).map(parse_arg).collect();
            let result = api::call(&store, &operation, &values)?;
            emit(true, &result)
        }
        Command::Summary {
            companies,
            statuses,
            rocket_statuses,
            from,
            to,
            rows,
        } => {
            let dataset = store.snapshot().context("loading dataset")?;
            let mut state = DashboardState::new(dataset);
            state.set_filter(MissionFilter {
                companies: companies.into_iter().collect::<BTreeSet<_>>(),
                mission_statuses: statuses.into_iter().collect(),
                rocket_statuses: rocket_statuses.into_iter().collect(),
                years: from.zip(to),
            });
            if json {
                emit(true, &state.summary)
            } else {
                print_summary(&state.summary);
                if rows {
                    print_rows(&state.summary);
                }
                Ok(())
            }
        }
    }
}

/// JSON when it parses, otherwise the raw text as a string.
fn parse_arg(raw: &str) -> Value {
    serde_json::from_str(raw).unwrap_or_else(|_| Value::String(raw.to_string()))
}

fn emit<T: Serialize>(json: bool, value: &T) -> Result<()> {
    let text = serde_json::to_string_pretty(value).context("serialising result")?;
    if json {
        println!("{text}");
    } else {
        // Scalars print bare; strings lose their quotes.
        match serde_json::to_value(value).context("serialising result")? {
            Value::String(s) => println!("{s}"),
            _ => println!("{text}"),
        }
    }
    Ok(())
}

fn print_summary(s: &Summary) {
    println!("Total missions   {}", s.total);
    match s.success_rate {
        Some(rate) => println!("Success rate     {rate}% ({} successes)", s.successes),
        None => println!("Success rate     -"),
    }
    println!("Companies        {}", s.companies);
    match s.year_span {
        Some((lo, hi)) => println!("Year span        {lo}-{hi} ({} years)", hi - lo + 1),
        None => println!("Year span        -"),
    }

    println!("\nStatus breakdown");
    for (status, n) in &s.status_breakdown {
        println!("  {status:<20}{n}");
    }

    println!("\nTop companies");
    for rate in s.top_company_rates.iter().rev() {
        println!(
            "  {:<28}{:>6} missions  {:>6.2}% success",
            rate.company, rate.missions, rate.success_rate
        );
    }

    println!("\nLaunches per decade (+0 .. +9)");
    for row in &s.decade_heatmap {
        let cells: Vec<String> = row.launches.iter().map(|n| format!("{n:>4}")).collect();
        println!("  {:<6}{}", row.decade, cells.join(""));
    }
}

fn print_rows(s: &Summary) {
    println!("\nMissions ({})", s.row_count_label());
    println!(
        "  {:<20}{:<28}{:<12}{:<24}{:<14}{:>10}  {}",
        "Company", "Mission", "Date", "Rocket", "RocketStatus", "Price (M$)", "Status"
    );
    for row in &s.rows {
        println!(
            "  {:<20}{:<28}{:<12}{:<24}{:<14}{:>10}  {}",
            row.company, row.mission, row.date, row.rocket, row.rocket_status, row.price, row.mission_status
        );
    }
}
