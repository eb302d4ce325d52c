use polars::prelude::{AnyValue, DataFrame};
use std::io::{self, Write};
use std::sync::Arc;
use std::thread;
use timetable::{
    Conflict, DailySchedule, Event, EventRow, EventUpdate, LogNotifier, NewEvent, NewRoutine,
    RecordTable, ReminderPoller, Routine, RoutineRow, RoutineUpdate, Table, TableRow, Timetable,
    TimetableConfig, TimetableResult, calendar, config, table::ID_COLUMN,
};
use tokio::sync::watch;

fn cell_text(value: &AnyValue) -> String {
    match value {
        AnyValue::Null => String::new(),
        AnyValue::String(s) => s.to_string(),
        other => other.to_string(),
    }
}

/// Box-drawn text table of a record table, without the key column.
/// With `numbered`, a leading `#` column carries each row's position.
fn render_df_as_text_table(df: &DataFrame, numbered: bool) -> String {
    let columns: Vec<_> = df
        .get_columns()
        .iter()
        .filter(|c| c.name().as_str() != ID_COLUMN)
        .collect();

    let mut headers: Vec<String> = Vec::with_capacity(columns.len() + 1);
    if numbered {
        headers.push("#".to_string());
    }
    headers.extend(columns.iter().map(|c| c.name().to_string()));

    let mut rows: Vec<Vec<String>> = Vec::with_capacity(df.height());
    for row_idx in 0..df.height() {
        let mut cells = Vec::with_capacity(headers.len());
        if numbered {
            cells.push(row_idx.to_string());
        }
        for col in &columns {
            let text = col.get(row_idx).map(|av| cell_text(&av)).unwrap_or_default();
            cells.push(text);
        }
        rows.push(cells);
    }

    let mut widths: Vec<usize> = headers.iter().map(|h| h.len()).collect();
    for cells in &rows {
        for (ci, text) in cells.iter().enumerate() {
            widths[ci] = widths[ci].max(text.len());
        }
    }

    let mut sep = String::from("+");
    for w in &widths {
        sep.push_str(&"-".repeat(*w + 2));
        sep.push('+');
    }

    let push_line = |out: &mut String, cells: &[String]| {
        out.push('|');
        for (ci, text) in cells.iter().enumerate() {
            out.push(' ');
            out.push_str(text);
            out.push_str(&" ".repeat(widths[ci].saturating_sub(text.len())));
            out.push_str(" |");
        }
        out.push('\n');
    };

    let mut out = String::new();
    out.push_str(&sep);
    out.push('\n');
    push_line(&mut out, &headers);
    out.push_str(&sep);
    out.push('\n');
    for cells in &rows {
        push_line(&mut out, cells);
    }
    out.push_str(&sep);
    out.push('\n');
    out
}

fn render_rows<R: TableRow>(rows: &[R], numbered: bool) -> TimetableResult<String> {
    if rows.is_empty() {
        return Ok("None\n".to_string());
    }
    let table = RecordTable::from_rows(rows)?;
    Ok(render_df_as_text_table(table.dataframe(), numbered))
}

fn render_events(events: &[Event]) -> TimetableResult<String> {
    let rows: Vec<EventRow> = events.iter().map(Event::to_row).collect();
    render_rows(&rows, false)
}

fn render_routines(routines: &[Routine]) -> TimetableResult<String> {
    let rows: Vec<RoutineRow> = routines.iter().map(Routine::to_row).collect();
    render_rows(&rows, false)
}

fn render_day(day: &DailySchedule) -> TimetableResult<String> {
    Ok(format!(
        "{} ({}):\nLessons/Exams:\n{}Routines:\n{}",
        calendar::format_date(day.date),
        calendar::weekday_name(calendar::weekday_of(day.date)),
        render_events(&day.events)?,
        render_routines(&day.routines)?
    ))
}

fn print_help() {
    println!(
        "Commands:\n  help                                    Show this help\n  events                                  List lessons/exams with their index\n  routines                                List routines with their index\n  add-event <lesson|exam> <name> <YYYY-MM-DD> <HH:MM> <HH:MM> [location] [notes...]\n                                          Add a lesson or exam\n  add-routine <name> <day|Everyday> <HH:MM> <HH:MM> [notes...]\n                                          Add a routine\n  edit-event <index> <field> <value...>   Fields: type name date start end location notes\n  edit-routine <index> <field> <value...> Fields: name day start end notes\n  delete-event <index>                    Delete a lesson/exam\n  delete-routine <index>                  Delete a routine\n  day <YYYY-MM-DD>                        Daily schedule\n  week <YYYY-MM-DD>                       Seven days starting at date\n  semester                                All events by date and all routines\n  upcoming                                Next 5 events from today\n  conflicts <YYYY-MM-DD>                  Overlapping events on a date\n  quit|exit                               Exit"
    );
}

fn usage(text: &str) -> TimetableResult<()> {
    println!("Usage: {text}");
    Ok(())
}

fn parse_index(raw: Option<&str>) -> Option<usize> {
    raw.and_then(|s| s.parse::<usize>().ok())
}

fn event_update(field: &str, value: String) -> Option<EventUpdate> {
    let update = EventUpdate::default();
    Some(match field {
        "type" => update.kind(value),
        "name" => update.name(value),
        "date" => update.date(value),
        "start" => update.start_time(value),
        "end" => update.end_time(value),
        "location" => update.location(value),
        "notes" => update.notes(value),
        _ => return None,
    })
}

fn routine_update(field: &str, value: String) -> Option<RoutineUpdate> {
    let update = RoutineUpdate::default();
    Some(match field {
        "name" => update.name(value),
        "day" => update.day_of_week(value),
        "start" => update.start_time(value),
        "end" => update.end_time(value),
        "notes" => update.notes(value),
        _ => return None,
    })
}

fn run_command(timetable: &Timetable, cmd: &str, args: &[&str]) -> TimetableResult<()> {
    match cmd {
        "help" => print_help(),
        "events" => {
            let rows = timetable.load_events()?;
            println!("{}", render_df_as_text_table(rows.dataframe(), true));
        }
        "routines" => {
            let rows = timetable.load_routines()?;
            println!("{}", render_df_as_text_table(rows.dataframe(), true));
        }
        "add-event" => {
            if args.len() < 5 {
                return usage(
                    "add-event <lesson|exam> <name> <YYYY-MM-DD> <HH:MM> <HH:MM> [location] [notes...]",
                );
            }
            let mut fields = NewEvent::new(args[0], args[1], args[2], args[3], args[4]);
            if let Some(location) = args.get(5) {
                fields = fields.with_location(*location);
            }
            if args.len() > 6 {
                fields = fields.with_notes(args[6..].join(" "));
            }
            let id = timetable.append_event(fields)?;
            println!("Entry added (id {id}).");
        }
        "add-routine" => {
            if args.len() < 4 {
                return usage("add-routine <name> <day|Everyday> <HH:MM> <HH:MM> [notes...]");
            }
            let fields = NewRoutine::new(args[0], args[2], args[3], args[1])
                .with_notes(args[4..].join(" "));
            let id = timetable.append_routine(fields)?;
            println!("Entry added (id {id}).");
        }
        "edit-event" | "edit-routine" => {
            let (Some(index), Some(field)) = (parse_index(args.first().copied()), args.get(1))
            else {
                return usage(&format!("{cmd} <index> <field> <value...>"));
            };
            let value = args[2..].join(" ");
            let applied = if cmd == "edit-event" {
                event_update(field, value).map(|update| timetable.update_by_index(index, update))
            } else {
                routine_update(field, value).map(|update| timetable.update_by_index(index, update))
            };
            match applied {
                Some(result) => {
                    result?;
                    println!("Entry updated.");
                }
                None => println!("Unknown field '{field}'"),
            }
        }
        "delete-event" | "delete-routine" => {
            let Some(index) = parse_index(args.first().copied()) else {
                return usage(&format!("{cmd} <index>"));
            };
            let table = if cmd == "delete-event" {
                Table::Events
            } else {
                Table::Routines
            };
            timetable.delete_by_index(table, index)?;
            println!("Entry deleted.");
        }
        "day" | "week" | "conflicts" => {
            let Some(raw) = args.first() else {
                return usage(&format!("{cmd} <YYYY-MM-DD>"));
            };
            let date = calendar::parse_date("date", raw)?;
            match cmd {
                "day" => println!("{}", render_day(&timetable.daily_schedule(date)?)?),
                "week" => {
                    for day in timetable.weekly_schedule(date)? {
                        println!("{}", render_day(&day)?);
                    }
                }
                _ => {
                    let conflicts: Vec<Conflict> = timetable.conflicts_on(date)?;
                    if conflicts.is_empty() {
                        println!("No conflicts.");
                    }
                    for conflict in conflicts {
                        println!("{conflict}");
                    }
                }
            }
        }
        "semester" => {
            let semester = timetable.semester_schedule()?;
            println!(
                "All Lessons/Exams:\n{}\nAll Routines:\n{}",
                render_events(&semester.events)?,
                render_routines(&semester.routines)?
            );
        }
        "upcoming" => {
            let now = chrono::Local::now().naive_local();
            let upcoming = timetable.upcoming_events(now)?;
            println!("Upcoming Events:\n{}", render_events(&upcoming)?);
        }
        other => println!("Unknown command '{other}'. Type 'help' for commands."),
    }
    Ok(())
}

fn spawn_reminders(
    timetable: Arc<Timetable>,
    config: &TimetableConfig,
) -> (watch::Sender<bool>, thread::JoinHandle<()>) {
    let (shutdown_tx, shutdown_rx) = watch::channel(false);
    let poller = ReminderPoller::from_config(timetable, LogNotifier, config);
    let handle = thread::spawn(move || {
        match tokio::runtime::Builder::new_current_thread()
            .enable_time()
            .build()
        {
            Ok(runtime) => runtime.block_on(poller.run(shutdown_rx)),
            Err(err) => tracing::warn!(error = %err, "could not start reminder runtime"),
        }
    });
    (shutdown_tx, handle)
}

fn main() {
    config::load_dotenv();
    tracing_subscriber::fmt()
        .with_writer(io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .init();

    let config = TimetableConfig::from_env();
    let timetable = match Timetable::open(&config) {
        Ok(timetable) => Arc::new(timetable),
        Err(e) => {
            eprintln!("Could not open timetable in {}: {e}", config.data_dir.display());
            std::process::exit(1);
        }
    };
    let reminders = config
        .reminders_enabled
        .then(|| spawn_reminders(timetable.clone(), &config));

    println!("Timetable (CLI) - type 'help' for commands\n");

    let stdin = io::stdin();
    let mut line = String::new();
    loop {
        print!("> ");
        let _ = io::stdout().flush();
        line.clear();
        match stdin.read_line(&mut line) {
            Ok(0) | Err(_) => break,
            Ok(_) => {}
        }
        let tokens: Vec<&str> = line.split_whitespace().collect();
        let Some((cmd, args)) = tokens.split_first() else {
            continue;
        };
        if matches!(*cmd, "quit" | "exit") {
            break;
        }
        if let Err(e) = run_command(&timetable, cmd, args) {
            println!("Error: {e}");
        }
    }

    if let Some((shutdown, handle)) = reminders {
        let _ = shutdown.send(true);
        let _ = handle.join();
    }
}
