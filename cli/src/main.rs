mod logging;
mod report;
mod tui;

use std::path::PathBuf;

use anyhow::{bail, Result};
use chrono::NaiveDate;
use clap::Parser;
use dietlog_core::{
    chart_data, parse_date, parse_meal_args, parse_range, parse_weight, today, ChartRange, Config,
    CustomMealTarget, DietStore, FileDietRepository, MealTime, Period,
};

#[derive(Parser)]
#[command(name = "dietlog")]
#[command(about = "Track meals, macros and body weight per day", long_about = None)]
struct Cli {
    /// Config file (default: ~/.config/dietlog/config.yaml)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(clap::Subcommand)]
enum Commands {
    /// Show a day's meals, totals and weight
    Day {
        /// today, yesterday, -1d, 2025-01-31 ...
        #[arg(short, long, default_value = "today")]
        date: String,
    },
    /// List catalog options (all meal times if none given)
    Options {
        meal_time: Option<String>,
    },
    /// Select a catalog option by its 1-based index (see `options`)
    Select {
        meal_time: String,
        index: usize,
        #[arg(short, long, default_value = "today")]
        date: String,
    },
    /// Add a custom meal (usage: add Lunch "Dal Rice" cal:420 pro:14)
    Add {
        meal_time: String,
        /// Put the meal on the day only instead of the catalog
        #[arg(long)]
        day_only: bool,
        #[arg(short, long, default_value = "today")]
        date: String,
        /// Meal name followed by cal:N pro:N; flags may come before or after
        #[arg(required = true)]
        args: Vec<String>,
    },
    /// Clear the selection of a meal time
    Delete {
        meal_time: String,
        #[arg(short, long, default_value = "today")]
        date: String,
    },
    /// Log body weight in kg
    Weight {
        #[arg(allow_hyphen_values = true)]
        kg: String,
        #[arg(short, long, default_value = "today")]
        date: String,
    },
    /// Print chart records for a period or a custom range
    Chart {
        /// day, week or month
        #[arg(short, long, default_value = "day")]
        period: String,
        #[arg(long, requires = "to")]
        from: Option<String>,
        #[arg(long, requires = "from")]
        to: Option<String>,
        /// Anchor date of the period
        #[arg(short, long, default_value = "today")]
        date: String,
    },
    /// Open the Terminal User Interface
    Tui,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let config = Config::load(cli.config)?;
    let command = cli.command.unwrap_or(Commands::Tui);

    if matches!(command, Commands::Tui) {
        logging::init_file(&config.log_filter, &config.data_dir)?;
    } else {
        logging::init_stderr(&config.log_filter)?;
    }

    let repo = FileDietRepository::new(Some(config.data_dir.clone()))?;
    let mut store = DietStore::open(repo)?;
    let today = today();

    match command {
        Commands::Day { date } => {
            let date = resolve_date(&date, today)?;
            report::show_day(store.snapshot(), date);
        }
        Commands::Options { meal_time } => {
            let meal_times = match meal_time {
                Some(m) => vec![m.parse::<MealTime>()?],
                None => MealTime::ALL.to_vec(),
            };
            report::show_options(store.snapshot(), &meal_times);
        }
        Commands::Select { meal_time, index, date } => {
            let meal_time: MealTime = meal_time.parse()?;
            let date = resolve_date(&date, today)?;
            let options = store.snapshot().options(meal_time);
            let Some(meal) = index.checked_sub(1).and_then(|i| options.get(i)).cloned() else {
                bail!("{} has no option #{} ({} available)", meal_time.label(), index, options.len());
            };
            store.select_meal(date, meal_time, meal.clone());
            println!("Selected for {} on {}: {}", meal_time.label(), date, meal);
        }
        Commands::Add { meal_time, day_only, date, args } => {
            let meal_time: MealTime = meal_time.parse()?;
            let meal = parse_meal_args(&args).validate()?;
            let target = if day_only {
                CustomMealTarget::Day(resolve_date(&date, today)?)
            } else {
                CustomMealTarget::Catalog
            };
            store.add_custom_meal(meal_time, meal.clone(), target);
            match target {
                CustomMealTarget::Catalog => {
                    println!("Added to {} options: {}", meal_time.label(), meal)
                }
                CustomMealTarget::Day(d) => {
                    println!("Added for {} on {}: {}", meal_time.label(), d, meal)
                }
            }
        }
        Commands::Delete { meal_time, date } => {
            let meal_time: MealTime = meal_time.parse()?;
            let date = resolve_date(&date, today)?;
            if store.snapshot().selection(date, meal_time).is_none() {
                println!("Nothing selected for {} on {}.", meal_time.label(), date);
            } else {
                store.delete_meal(date, meal_time);
                println!("Removed {} on {}.", meal_time.label(), date);
            }
        }
        Commands::Weight { kg, date } => {
            let weight = parse_weight(&kg)?;
            let date = resolve_date(&date, today)?;
            store.add_weight(date, weight);
            println!("Weight on {}: {} kg", date, weight);
        }
        Commands::Chart { period, from, to, date } => {
            let range = match (from, to) {
                (Some(from), Some(to)) => {
                    let (start, end) = parse_range(&from, &to, today)?;
                    ChartRange::Custom { start, end }
                }
                _ => ChartRange::Period(period.parse::<Period>()?, resolve_date(&date, today)?),
            };
            let data = chart_data(store.snapshot(), range)?;
            report::show_chart(&data);
        }
        Commands::Tui => {
            tui::run(store, today)?;
            return Ok(());
        }
    }

    store.flush();
    Ok(())
}

fn resolve_date(input: &str, today: NaiveDate) -> Result<NaiveDate> {
    Ok(parse_date(input, today)?)
}
