//src/main.rs
mod cli; // Keep cli module for parsing args
mod shell;

use anyhow::{bail, Context, Result};
use chrono::{Datelike, Local, NaiveDate};
use comfy_table::{presets::UTF8_FULL, Cell, Color, ContentArrangement, Table};
use std::io::{self, stdout};
use tracing_subscriber::EnvFilter;

use trackme_lib::{
    catalog, AppService, CatalogEntry, GeminiClient, ProgressReport, SeriesPoint, Units,
    ValidationError, WorkoutPlan, WorkoutSession, WorkoutSplit,
};

fn main() -> Result<()> {
    // --- Check for completion generation request FIRST ---
    let cli_args = cli::parse_args(); // Parse arguments once
    let export_csv = cli_args.export_csv;

    if let cli::Commands::GenerateCompletion { shell } = cli_args.command {
        let mut cmd = cli::build_cli_command(); // Get the command structure
        let bin_name = cmd.get_name().to_string(); // Get the binary name

        eprintln!("Generating completion script for {}...", shell); // Print to stderr
        clap_complete::generate(shell, &mut cmd, bin_name, &mut stdout()); // Print script to stdout
        return Ok(()); // Exit after generating script
    }

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .try_init();

    // Initialize the application service (loads config, connects to DB)
    let mut service =
        AppService::initialize().context("Failed to initialize application service")?;
    let header_color = trackme_lib::parse_color(&service.config.theme.header_color)
        .map(Color::from)
        .unwrap_or(Color::Green); // Fallback
    let units = service.config.units;

    match cli_args.command {
        cli::Commands::GenerateCompletion { .. } => {
            // This case is handled above, but keep it exhaustive
            unreachable!("Completion generation should have exited already");
        }
        cli::Commands::Shell { date } => {
            if let Some(date) = date {
                service.select_date(date);
            }
            let stdin = io::stdin();
            shell::run(&mut service, stdin.lock(), stdout())?;
        }
        cli::Commands::Progress => {
            let report = service.progress();
            if export_csv {
                print_records_csv(&report, units)?;
            } else {
                print_progress(&report, header_color, units);
            }
        }
        cli::Commands::Series { exercise } => {
            let series = service.exercise_series(&exercise);
            if series.is_empty() {
                println!("No sessions found for exercise '{}'.", exercise);
            } else if export_csv {
                print_series_csv(&series, units)?;
            } else {
                print_series_table(&series, header_color, units);
            }
        }
        cli::Commands::Feedback { exercise } => {
            let client = GeminiClient::from_config(&service.config.feedback)
                .context("Feedback is not configured")?;
            let runtime = tokio::runtime::Runtime::new()?;
            match runtime.block_on(service.request_feedback(&client, &exercise)) {
                Ok(text) => println!("{text}"),
                Err(e @ ValidationError::NotEnoughData { .. }) => println!("{e}"),
                Err(e) => bail!("Error requesting feedback: {}", e),
            }
        }
        cli::Commands::Exercises { body_part, search } => {
            let entries = catalog::available_exercises(&body_part, service.custom_exercises(), &search);
            if entries.is_empty() {
                println!("No exercises found for '{}'.", body_part);
            } else if export_csv {
                print_exercises_csv(&entries)?;
            } else {
                print_exercises_table(&entries, header_color);
            }
        }
        cli::Commands::AddExercise {
            name,
            body_part,
            image_url,
        } => {
            if !catalog::is_known_body_part(body_part.trim()) {
                println!(
                    "Note: '{}' is not one of the standard body parts ({}).",
                    body_part.trim(),
                    trackme_lib::BODY_PARTS.join(", ")
                );
            }
            match service.add_custom_exercise(&name, &body_part, image_url) {
                Ok(ex) => println!(
                    "Successfully defined custom exercise: '{}' (Body part: {})",
                    ex.name, ex.body_part
                ),
                Err(e) => bail!("Error creating exercise: {}", e),
            }
        }
        cli::Commands::Plans { body_part } => {
            let plans: Vec<&WorkoutPlan> = service
                .plans()
                .values()
                .filter(|p| body_part.as_deref().map_or(true, |bp| p.body_part == bp))
                .collect();
            if plans.is_empty() {
                println!("No workout plans saved yet.");
            } else if export_csv {
                print_plans_csv(&plans)?;
            } else {
                print_plans_table(&plans, header_color);
            }
        }
        cli::Commands::Split(command) => match command {
            cli::SplitCommand::Show => print_split_table(service.split(), header_color),
            cli::SplitCommand::Set { day, body_parts } => {
                let mut draft = service.split_draft();
                for part in &body_parts {
                    draft.add(day, part);
                }
                let summary = draft.parts(day).join(", ");
                service.save_split(draft);
                println!("{day}: {summary}");
            }
            cli::SplitCommand::Clear { day } => {
                let mut draft = service.split_draft();
                draft.clear(day);
                service.save_split(draft);
                println!("Cleared {day}.");
            }
        },
        cli::Commands::Calendar { month } => {
            let today = Local::now().date_naive();
            let (year, month) = month.unwrap_or((today.year(), today.month()));
            let days = service.month_overview(year, month)?;
            if export_csv {
                print_calendar_csv(&days)?;
            } else {
                print_calendar(year, month, &days, today);
            }
        }
        cli::Commands::Show { date } => match service.session(date) {
            Some(session) if export_csv => print_session_csv(session, units)?,
            Some(session) => print_session_table(session, header_color, units),
            None => println!("No workout saved on {}.", date),
        },
        cli::Commands::DbPath => {
            println!("Database file is located at: {:?}", service.get_db_path());
        }
        cli::Commands::ConfigPath => {
            println!("Config file is located at: {:?}", service.get_config_path());
        }
    }

    Ok(())
}

// --- Table Printing Functions (Remain in CLI) ---

fn header(table: &mut Table, header_color: Color, titles: &[&str]) {
    table
        .load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(
            titles
                .iter()
                .map(|t| Cell::new(t).fg(header_color))
                .collect::<Vec<_>>(),
        );
}

fn print_progress(report: &ProgressReport, header_color: Color, units: Units) {
    let unit = units.weight_label();
    let mut overall = Table::new();
    header(&mut overall, header_color, &["Metric", "Value"]);
    overall.add_row(vec![
        Cell::new("Workouts"),
        Cell::new(report.overall.total_workouts),
    ]);
    overall.add_row(vec![
        Cell::new(format!("Volume ({unit})")),
        Cell::new(format!("{:.1}", report.overall.total_volume)),
    ]);
    overall.add_row(vec![Cell::new("Sets"), Cell::new(report.overall.total_sets)]);
    overall.add_row(vec![Cell::new("Reps"), Cell::new(report.overall.total_reps)]);
    overall.add_row(vec![
        Cell::new("Exercises"),
        Cell::new(report.unique_exercises.len()),
    ]);
    println!("{overall}");

    if report.personal_records.is_empty() {
        println!("No personal records yet.");
    } else {
        let mut records = Table::new();
        header(
            &mut records,
            header_color,
            &["Exercise", &format!("Max Weight ({unit})"), "Date"],
        );
        for pr in &report.personal_records {
            records.add_row(vec![
                Cell::new(&pr.exercise_name),
                Cell::new(format!("{:.2}", pr.max_weight)),
                Cell::new(pr.date),
            ]);
        }
        println!("{records}");
    }

    if !report.body_parts.is_empty() {
        let mut parts = Table::new();
        header(&mut parts, header_color, &["Body Part", "Exercises Logged"]);
        for share in &report.body_parts {
            parts.add_row(vec![Cell::new(&share.body_part), Cell::new(share.count)]);
        }
        println!("{parts}");
    }
}

fn print_series_table(series: &[SeriesPoint], header_color: Color, units: Units) {
    let unit = units.weight_label();
    let mut table = Table::new();
    header(
        &mut table,
        header_color,
        &[
            "Date",
            &format!("Max Weight ({unit})"),
            "Max Reps",
            &format!("Volume ({unit})"),
        ],
    );
    for point in series {
        table.add_row(vec![
            Cell::new(point.date),
            Cell::new(format!("{:.2}", point.max_weight)),
            Cell::new(point.max_reps),
            Cell::new(format!("{:.1}", point.total_volume)),
        ]);
    }
    println!("{table}");
}

fn print_exercises_table(entries: &[CatalogEntry], header_color: Color) {
    let mut table = Table::new();
    header(&mut table, header_color, &["Name", "Body Part", "Custom"]);
    for entry in entries {
        table.add_row(vec![
            Cell::new(&entry.name),
            Cell::new(&entry.body_part),
            Cell::new(if entry.is_custom { "yes" } else { "" }),
        ]);
    }
    println!("{table}");
}

fn print_plans_table(plans: &[&WorkoutPlan], header_color: Color) {
    let mut table = Table::new();
    header(&mut table, header_color, &["ID", "Name", "Body Part", "Exercises"]);
    for plan in plans {
        let names: Vec<&str> = plan.exercises.iter().map(|t| t.name.as_str()).collect();
        table.add_row(vec![
            Cell::new(&plan.id),
            Cell::new(&plan.name),
            Cell::new(&plan.body_part),
            Cell::new(names.join(", ")),
        ]);
    }
    println!("{table}");
}

fn print_split_table(split: &WorkoutSplit, header_color: Color) {
    use strum::IntoEnumIterator;
    let mut table = Table::new();
    header(&mut table, header_color, &["Day", "Body Parts"]);
    for day in trackme_lib::Day::iter() {
        let parts = trackme_lib::registry::body_parts_for_day(split, day);
        table.add_row(vec![
            Cell::new(day),
            Cell::new(if parts.is_empty() {
                "Rest".to_string()
            } else {
                parts.join(", ")
            }),
        ]);
    }
    println!("{table}");
}

fn print_session_table(session: &WorkoutSession, header_color: Color, units: Units) {
    let unit = units.weight_label();
    println!("{} - {}", session.date, session.body_part_label());
    let mut table = Table::new();
    header(
        &mut table,
        header_color,
        &["Exercise", "Set", "Reps", &format!("Weight ({unit})")],
    );
    for exercise in &session.exercises {
        for (i, set) in exercise.sets.iter().enumerate() {
            table.add_row(vec![
                Cell::new(if i == 0 { exercise.name.as_str() } else { "" }),
                Cell::new(i + 1),
                Cell::new(set.reps),
                Cell::new(format!("{:.2}", set.weight)),
            ]);
        }
    }
    println!("{table}");
}

/// Month grid, Sunday first, saved days marked with `*` and today in brackets.
fn print_calendar(year: i32, month: u32, days: &[(NaiveDate, bool)], today: NaiveDate) {
    let Some((first, _)) = days.first() else {
        return;
    };
    println!("{year}-{month:02}");
    println!(" Sun  Mon  Tue  Wed  Thu  Fri  Sat");
    let offset = first.weekday().num_days_from_sunday() as usize;
    let mut line = "     ".repeat(offset);
    for (date, worked) in days {
        let mark = if *worked { '*' } else { ' ' };
        let cell = if *date == today {
            format!("[{:>2}]{mark}", date.day())
        } else {
            format!(" {:>2}{mark} ", date.day())
        };
        line.push_str(&cell);
        if date.weekday().num_days_from_sunday() == 6 {
            println!("{}", line.trim_end());
            line.clear();
        }
    }
    if !line.is_empty() {
        println!("{}", line.trim_end());
    }
    let count = days.iter().filter(|(_, worked)| *worked).count();
    println!("{count} workout(s) this month.");
}

// --- CSV Printing Functions ---

fn print_records_csv(report: &ProgressReport, units: Units) -> Result<()> {
    let mut writer = csv::Writer::from_writer(io::stdout());
    writer.write_record([
        "Exercise",
        &format!("Max_Weight_{}", units.weight_label()),
        "Date",
    ])?;
    for pr in &report.personal_records {
        writer.write_record([
            pr.exercise_name.clone(),
            format!("{:.2}", pr.max_weight),
            pr.date.to_string(),
        ])?;
    }
    writer.flush()?;
    Ok(())
}

fn print_series_csv(series: &[SeriesPoint], units: Units) -> Result<()> {
    let unit = units.weight_label();
    let mut writer = csv::Writer::from_writer(io::stdout());
    writer.write_record([
        "Date",
        &format!("Max_Weight_{unit}"),
        "Max_Reps",
        &format!("Volume_{unit}"),
    ])?;
    for point in series {
        writer.write_record([
            point.date.to_string(),
            format!("{:.2}", point.max_weight),
            point.max_reps.to_string(),
            format!("{:.1}", point.total_volume),
        ])?;
    }
    writer.flush()?;
    Ok(())
}

fn print_exercises_csv(entries: &[CatalogEntry]) -> Result<()> {
    let mut writer = csv::Writer::from_writer(io::stdout());
    writer.write_record(["Name", "Body_Part", "Custom", "Image_URL"])?;
    for entry in entries {
        writer.write_record([
            entry.name.as_str(),
            entry.body_part.as_str(),
            if entry.is_custom { "true" } else { "false" },
            entry.image_url.as_deref().unwrap_or(""),
        ])?;
    }
    writer.flush()?;
    Ok(())
}

fn print_plans_csv(plans: &[&WorkoutPlan]) -> Result<()> {
    let mut writer = csv::Writer::from_writer(io::stdout());
    writer.write_record(["ID", "Name", "Body_Part", "Exercises"])?;
    for plan in plans {
        let names: Vec<&str> = plan.exercises.iter().map(|t| t.name.as_str()).collect();
        writer.write_record([
            plan.id.as_str(),
            plan.name.as_str(),
            plan.body_part.as_str(),
            &names.join("; "),
        ])?;
    }
    writer.flush()?;
    Ok(())
}

fn print_calendar_csv(days: &[(NaiveDate, bool)]) -> Result<()> {
    let mut writer = csv::Writer::from_writer(io::stdout());
    writer.write_record(["Date", "Workout"])?;
    for (date, worked) in days {
        writer.write_record([date.to_string(), worked.to_string()])?;
    }
    writer.flush()?;
    Ok(())
}

fn print_session_csv(session: &WorkoutSession, units: Units) -> Result<()> {
    let mut writer = csv::Writer::from_writer(io::stdout());
    writer.write_record([
        "Date",
        "Exercise",
        "Body_Part",
        "Set",
        "Reps",
        &format!("Weight_{}", units.weight_label()),
    ])?;
    for exercise in &session.exercises {
        for (i, set) in exercise.sets.iter().enumerate() {
            writer.write_record([
                session.date.to_string(),
                exercise.name.clone(),
                exercise.body_part.clone(),
                (i + 1).to_string(),
                set.reps.to_string(),
                format!("{:.2}", set.weight),
            ])?;
        }
    }
    writer.flush()?;
    Ok(())
}
