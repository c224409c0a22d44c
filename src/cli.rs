// src/cli.rs
use chrono::{Datelike, Duration, Local, NaiveDate};
use clap::{CommandFactory, Parser, Subcommand};
use clap_complete::Shell;
use trackme_lib::Day;

#[derive(Parser, Debug)]
#[command(author, version, about = "Plan, log and analyze strength-training sessions", long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
    /// Print tables as CSV
    #[arg(long, global = true)]
    pub export_csv: bool,
}

// Custom parser for date strings and shorthands
pub fn parse_date_shorthand(s: &str) -> Result<NaiveDate, String> {
    let today = Local::now().date_naive();
    match s.trim().to_lowercase().as_str() {
        "today" => Ok(today),
        "yesterday" => Ok(today - Duration::days(1)),
        trimmed => ["%Y-%m-%d", "%d.%m.%Y", "%Y/%m/%d"]
            .iter()
            .find_map(|fmt| NaiveDate::parse_from_str(trimmed, fmt).ok())
            .ok_or_else(|| {
                format!(
                    "Invalid date format: '{s}'. Use 'today', 'yesterday', YYYY-MM-DD, DD.MM.YYYY, or YYYY/MM/DD."
                )
            }),
    }
}

/// Parses `YYYY-MM` into (year, month).
pub fn parse_month(s: &str) -> Result<(i32, u32), String> {
    let first = NaiveDate::parse_from_str(&format!("{}-01", s.trim()), "%Y-%m-%d")
        .map_err(|_| format!("Invalid month: '{s}'. Use YYYY-MM."))?;
    Ok((first.year(), first.month()))
}

fn parse_day(s: &str) -> Result<Day, String> {
    s.parse::<Day>()
        .map_err(|_| format!("Invalid day: '{s}'. Use a weekday name like 'monday'."))
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Log a workout interactively
    Shell {
        /// Start on this date instead of today
        #[arg(long, value_parser = parse_date_shorthand)]
        date: Option<NaiveDate>,
    },
    /// Overall statistics, personal records and body-part distribution
    Progress,
    /// Per-session figures for one exercise
    Series {
        /// Exercise name, exactly as logged
        exercise: String,
    },
    /// Ask the AI coach about an exercise's progress
    Feedback { exercise: String },
    /// List predefined and custom exercises
    Exercises {
        /// Body part, or several joined with " & "
        #[arg(short, long, default_value = "Chest")]
        body_part: String,
        /// Case-insensitive name filter
        #[arg(short, long, default_value = "")]
        search: String,
    },
    /// Define a custom exercise
    AddExercise {
        #[arg(short, long)]
        name: String,
        #[arg(short, long)]
        body_part: String,
        #[arg(short, long)]
        image_url: Option<String>,
    },
    /// List saved workout plans
    Plans {
        #[arg(short, long)]
        body_part: Option<String>,
    },
    /// Show or edit the weekly split
    #[command(subcommand)]
    Split(SplitCommand),
    /// Days of a month with a saved workout
    Calendar {
        /// Month as YYYY-MM (defaults to the current month)
        #[arg(short, long, value_parser = parse_month)]
        month: Option<(i32, u32)>,
    },
    /// Show the workout saved on a date
    Show {
        #[arg(value_parser = parse_date_shorthand, default_value = "today")]
        date: NaiveDate,
    },
    /// Show the path to the database file
    DbPath,
    /// Show the path to the config file
    ConfigPath,
    GenerateCompletion {
        /// The shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

#[derive(Subcommand, Debug)]
pub enum SplitCommand {
    Show,
    /// Add body parts to a day
    Set {
        #[arg(value_parser = parse_day)]
        day: Day,
        #[arg(required = true)]
        body_parts: Vec<String>,
    },
    /// Remove every body part from a day
    Clear {
        #[arg(value_parser = parse_day)]
        day: Day,
    },
}

// Function to parse CLI arguments
pub fn parse_args() -> Cli {
    Cli::parse()
}

pub fn build_cli_command() -> clap::Command {
    Cli::command()
}
