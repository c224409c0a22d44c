// src/shell.rs
//! Line-driven front end for the workout logger.
use crate::cli::parse_date_shorthand;
use anyhow::Result;
use chrono::Local;
use std::io::{BufRead, Write};
use trackme_lib::{AppService, Step, Store, ValidationError, View, BODY_PARTS};

const HELP: &str = "\
Commands:
  status                      show the current workout
  date <date>                 select a date (today, yesterday, YYYY-MM-DD)
  view <logger|calendar|progress>
  parts                       list body parts
  pick <body part>            start a workout for a body part
  plans                       list plans for the selected body part
  use <n>                     load plan n
  fresh                       pick exercises yourself
  list [search]               list exercises for the selected body part
  add <n|name>                add an exercise from the list
  remove <n>                  remove staged exercise n
  confirm                     start logging the selected exercises
  back                        go back one step
  addset <ex>                 add a set to exercise ex
  set <ex> <set> <reps> <weight>
  rmset <ex> <set>
  last <ex>                   show the previous performance of exercise ex
  save                        save the workout for the selected date
  saveplan <name>             save the exercises as a plan
  reset                       discard the current workout
  custom <name> | <body part> define a custom exercise
  quit";

/// Reads commands from `input` until EOF or `quit`.
pub fn run<S, R, W>(service: &mut AppService<S>, input: R, mut out: W) -> Result<()>
where
    S: Store,
    R: BufRead,
    W: Write,
{
    writeln!(out, "Type 'help' for commands.")?;
    print_status(service, &mut out)?;
    for line in input.lines() {
        let line = line?;
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        service.set_today(Local::now().date_naive());
        let (command, rest) = line.split_once(' ').unwrap_or((line, ""));
        let rest = rest.trim();
        match command {
            "quit" | "exit" => break,
            "help" => writeln!(out, "{HELP}")?,
            _ => {
                if let Err(message) = execute(service, command, rest, &mut out)? {
                    writeln!(out, "! {message}")?;
                }
            }
        }
    }
    Ok(())
}

fn index(arg: Option<&str>, what: &str) -> Result<usize, String> {
    let raw = arg.ok_or_else(|| format!("Missing {what} number."))?;
    match raw.parse::<usize>() {
        Ok(n) if n > 0 => Ok(n - 1),
        _ => Err(format!("Invalid {what} number: '{raw}'.")),
    }
}

fn invalid(e: ValidationError) -> String {
    e.to_string()
}

/// Runs one command. The inner `Err` is a message for the user; the outer
/// one is an I/O failure.
#[allow(clippy::too_many_lines)]
fn execute<S: Store, W: Write>(
    service: &mut AppService<S>,
    command: &str,
    rest: &str,
    out: &mut W,
) -> Result<Result<(), String>> {
    let mut args = rest.split_whitespace();
    let outcome = match command {
        "status" => Ok(()),
        "date" => parse_date_shorthand(rest).map(|date| match service.view() {
            View::Logger => service.select_date(date),
            View::Calendar | View::Progress => service.open_date_in_logger(date),
        }),
        "view" => rest
            .parse::<View>()
            .map(|view| service.switch_view(view))
            .map_err(|_| format!("Unknown view: '{rest}'.")),
        "parts" => {
            for (i, part) in BODY_PARTS.iter().enumerate() {
                writeln!(out, "  {}. {part}", i + 1)?;
            }
            return Ok(Ok(()));
        }
        "pick" => service.pick_body_part(rest).map_err(invalid),
        "plans" => {
            let plans = service.plans_for_selected_body_part();
            if plans.is_empty() {
                writeln!(out, "No plans for this body part.")?;
            }
            for (i, plan) in plans.iter().enumerate() {
                writeln!(out, "  {}. {} ({} exercises)", i + 1, plan.name, plan.exercises.len())?;
            }
            return Ok(Ok(()));
        }
        "use" => index(args.next(), "plan").and_then(|i| {
            let id = service
                .plans_for_selected_body_part()
                .get(i)
                .map(|plan| plan.id.clone())
                .ok_or_else(|| format!("No plan {}.", i + 1))?;
            service.use_plan(&id).map_err(invalid)
        }),
        "fresh" => service.start_fresh().map_err(invalid),
        "list" => {
            let entries = service.available_exercises(rest);
            if entries.is_empty() {
                writeln!(out, "No exercises found.")?;
            }
            for (i, entry) in entries.iter().enumerate() {
                let tag = if entry.is_custom { " (custom)" } else { "" };
                writeln!(out, "  {}. {}{tag}", i + 1, entry.name)?;
            }
            return Ok(Ok(()));
        }
        "add" => {
            let entries = service.available_exercises("");
            let found = match rest.parse::<usize>() {
                Ok(n) if n > 0 => entries.get(n - 1).cloned(),
                _ => entries
                    .iter()
                    .find(|e| e.name.eq_ignore_ascii_case(rest))
                    .cloned(),
            };
            match found {
                Some(entry) => service.add_exercise(entry).map_err(invalid),
                None => Err(format!("No exercise '{rest}' for this body part.")),
            }
        }
        "remove" => index(args.next(), "exercise").and_then(|i| {
            let id = service
                .flow()
                .staged
                .get(i)
                .map(|ex| ex.id.clone())
                .ok_or_else(|| format!("No exercise {}.", i + 1))?;
            service.remove_exercise(&id).map_err(invalid)
        }),
        "confirm" => service.confirm_selection().map_err(invalid),
        "back" => {
            let step = service.flow().step;
            let result = if step == Step::Logging {
                service.back_to_selection()
            } else {
                service.back_to_body_part()
            };
            result.map_err(invalid)
        }
        "addset" => index(args.next(), "exercise")
            .and_then(|ex| service.add_set(ex).map_err(invalid)),
        "set" => {
            let ex = index(args.next(), "exercise");
            let set = index(args.next(), "set");
            let reps = args.next().map(str::parse::<u32>);
            let weight = args.next().map(str::parse::<f64>);
            match (ex, set, reps, weight) {
                (Ok(ex), Ok(set), Some(Ok(reps)), Some(Ok(weight))) => {
                    service.update_set(ex, set, reps, weight).map_err(invalid)
                }
                (Err(e), _, _, _) | (_, Err(e), _, _) => Err(e),
                _ => Err("Usage: set <ex> <set> <reps> <weight>".to_string()),
            }
        }
        "rmset" => index(args.next(), "exercise").and_then(|ex| {
            let set = index(args.next(), "set")?;
            service.remove_set(ex, set).map_err(invalid)
        }),
        "last" => {
            let name = index(args.next(), "exercise").and_then(|i| {
                service
                    .flow()
                    .staged
                    .get(i)
                    .map(|ex| ex.name.clone())
                    .ok_or_else(|| format!("No exercise {}.", i + 1))
            });
            match name {
                Ok(name) => {
                    print_last_performance(service, &name, out)?;
                    return Ok(Ok(()));
                }
                Err(e) => Err(e),
            }
        }
        "save" => match service.save_workout() {
            Ok(session) => {
                writeln!(out, "Saved workout for {}.", session.date)?;
                Ok(())
            }
            Err(e) => Err(invalid(e)),
        },
        "saveplan" => match service.save_as_plan(rest) {
            Ok(id) => {
                writeln!(out, "Saved plan '{}' ({id}).", rest.trim())?;
                Ok(())
            }
            Err(e) => Err(invalid(e)),
        },
        "reset" => {
            service.reset_workout();
            Ok(())
        }
        "custom" => {
            let (name, body_part) = rest.split_once('|').unwrap_or((rest, ""));
            let body_part = if body_part.trim().is_empty() {
                service.flow().selected_body_part.clone().unwrap_or_default()
            } else {
                body_part.trim().to_string()
            };
            match service.add_custom_exercise(name, &body_part, None) {
                Ok(ex) => {
                    writeln!(out, "Added custom exercise '{}' ({}).", ex.name, ex.body_part)?;
                    Ok(())
                }
                Err(e) => Err(invalid(e)),
            }
        }
        other => Err(format!("Unknown command '{other}'. Type 'help'.")),
    };
    if outcome.is_ok() {
        print_status(service, out)?;
    }
    Ok(outcome)
}

fn print_last_performance<S: Store, W: Write>(
    service: &AppService<S>,
    name: &str,
    out: &mut W,
) -> Result<()> {
    let Some(session) = service.last_performance(name) else {
        writeln!(out, "No earlier {name} on record.")?;
        return Ok(());
    };
    writeln!(out, "Last {name} on {}:", session.date)?;
    let unit = service.config.units.weight_label();
    for exercise in session.exercises.iter().filter(|ex| ex.name == name) {
        for (i, set) in exercise.sets.iter().enumerate() {
            writeln!(out, "  set {}: {} x {}{unit}", i + 1, set.reps, set.weight)?;
        }
    }
    Ok(())
}

fn print_status<S: Store, W: Write>(service: &AppService<S>, out: &mut W) -> Result<()> {
    let flow = service.flow();
    let date = service.selected_date();
    let marker = if date == service.today() { " (today)" } else { "" };
    writeln!(out, "[{} {date}{marker}] {}", service.view(), flow.step)?;
    if let Some(body_part) = &flow.selected_body_part {
        writeln!(out, "Body part: {body_part}")?;
    }
    let unit = service.config.units.weight_label();
    for (i, exercise) in flow.staged.iter().enumerate() {
        writeln!(out, "  {}. {} ({})", i + 1, exercise.name, exercise.body_part)?;
        if flow.step == Step::Logging {
            for (j, set) in exercise.sets.iter().enumerate() {
                writeln!(out, "       set {}: {} x {}{unit}", j + 1, set.reps, set.weight)?;
            }
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use trackme_lib::{Config, MemoryStore};

    fn run_script(script: &str) -> (AppService<MemoryStore>, String) {
        let today = Local::now().date_naive();
        let mut service = AppService::with_store(Config::default(), MemoryStore::default(), today);
        let mut out = Vec::new();
        run(&mut service, script.as_bytes(), &mut out).unwrap();
        (service, String::from_utf8(out).unwrap())
    }

    #[test]
    fn test_log_and_save_a_workout() {
        let (service, out) = run_script(
            "date 2026-10-01\npick Legs\nadd squat\nconfirm\nset 1 1 5 100\naddset 1\nsave\nquit\n",
        );
        let date = NaiveDate::from_ymd_opt(2026, 10, 1).unwrap();
        let session = service.session(date).unwrap();
        assert_eq!(session.exercises[0].name, "Squat");
        assert_eq!(session.exercises[0].sets[0].weight, 100.0);
        assert_eq!(session.exercises[0].sets.len(), 2);
        assert!(out.contains("Saved workout for 2026-10-01."));
    }

    #[test]
    fn test_errors_are_reported_and_loop_continues() {
        let (service, out) = run_script("date 2026-10-01\nconfirm\nbogus\nset x\npick Core\n");
        assert!(out.contains("! Cannot confirm the selection while picking a body part."));
        assert!(out.contains("! Unknown command 'bogus'."));
        assert!(out.contains("! Invalid exercise number: 'x'."));
        assert_eq!(service.flow().step, Step::SelectingExercises);
    }

    #[test]
    fn test_infinite_weight_is_refused() {
        let (service, out) =
            run_script("date 2026-10-01
pick Legs
add squat
confirm
set 1 1 5 inf
");
        assert!(out.contains("! Weight must be a finite, non-negative number, got inf."));
        assert_eq!(service.flow().staged[0].sets[0].weight, 0.0);
    }

    #[test]
    fn test_date_from_calendar_opens_logger() {
        let (service, _) = run_script("view calendar
date 2026-10-01
");
        assert_eq!(service.view(), View::Logger);
        assert_eq!(
            service.selected_date(),
            NaiveDate::from_ymd_opt(2026, 10, 1).unwrap()
        );
    }

    #[test]
    fn test_custom_exercise_joins_selection() {
        let (service, out) = run_script("date 2026-10-01
pick Legs
custom Sled Push
");
        assert!(out.contains("Added custom exercise 'Sled Push' (Legs)."));
        let staged: Vec<&str> = service.flow().staged.iter().map(|ex| ex.name.as_str()).collect();
        assert_eq!(staged, ["Sled Push"]);
        assert!(service.flow().staged[0].is_custom);
    }
}
