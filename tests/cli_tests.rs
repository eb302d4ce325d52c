#![cfg(feature = "cli")]

use assert_cmd::Command;
use predicates::str::contains as str_contains;
use std::path::Path;
use tempfile::tempdir;

#[allow(deprecated)]
fn run_cli(data_dir: &Path, script: &str) -> assert_cmd::assert::Assert {
    let mut cmd = Command::cargo_bin("cli").expect("cli binary");
    cmd.env("TIMETABLE_DATA_DIR", data_dir)
        .env("TIMETABLE_REMINDERS", "false")
        .write_stdin(script.to_string())
        .assert()
}

#[test]
fn cli_adds_and_lists_events() {
    let dir = tempdir().unwrap();
    run_cli(
        dir.path(),
        "add-event lesson Math 2024-03-15 09:00 10:00 Room1 bring notes\nevents\nquit\n",
    )
    .success()
    .stdout(str_contains("Entry added"))
    .stdout(str_contains("Friday"))
    .stdout(str_contains("bring notes"));

    let persisted = std::fs::read_to_string(dir.path().join("lessons_exams.csv")).unwrap();
    assert!(persisted.contains("Lesson,Math,2024-03-15,09:00,10:00,Friday,Room1,bring notes,"));
}

#[test]
fn cli_reports_validation_errors_and_keeps_going() {
    let dir = tempdir().unwrap();
    run_cli(
        dir.path(),
        "add-event lesson Math 2024-03-15 9am 10:00\nadd-routine Gym Someday 07:00 08:00\nhelp\nquit\n",
    )
    .success()
    .stdout(str_contains("Error: malformed Start_Time '9am'"))
    .stdout(str_contains("Error: validation error: unknown day of week 'Someday'"))
    .stdout(str_contains("Commands:"));
}

#[test]
fn cli_edit_and_delete_by_index() {
    let dir = tempdir().unwrap();
    let assert = run_cli(
        dir.path(),
        "add-routine Gym Monday 07:00 08:00\nadd-routine Read Everyday 21:00 22:00\n\
         edit-routine 1 notes chapter three\ndelete-routine 0\ndelete-routine 5\nroutines\nquit\n",
    )
    .success()
    .stdout(str_contains("Entry updated."))
    .stdout(str_contains("Entry deleted."))
    .stdout(str_contains("index 5 is out of range"));

    let output = String::from_utf8_lossy(&assert.get_output().stdout).to_string();
    let listing = output.split("Entry deleted.").last().unwrap_or_default();
    assert!(listing.contains("chapter three"));
    assert!(!listing.contains("Gym"), "deleted routine still listed:\n{listing}");
}

#[test]
fn cli_day_and_conflicts() {
    let dir = tempdir().unwrap();
    run_cli(
        dir.path(),
        "add-event lesson A 2024-03-15 09:00 10:00\nadd-event exam B 2024-03-15 09:30 11:00\n\
         add-routine Read Everyday 21:00 22:00\nday 2024-03-15\nconflicts 2024-03-15\n\
         conflicts 2024-03-16\nquit\n",
    )
    .success()
    .stdout(str_contains("2024-03-15 (Friday):"))
    .stdout(str_contains("Read"))
    .stdout(str_contains("Conflict between A and B"))
    .stdout(str_contains("No conflicts."));
}

#[test]
fn cli_semester_and_usage_messages() {
    let dir = tempdir().unwrap();
    run_cli(dir.path(), "semester\nday\nfrobnicate\nexit\n")
        .success()
        .stdout(str_contains("All Lessons/Exams:"))
        .stdout(str_contains("Usage: day <YYYY-MM-DD>"))
        .stdout(str_contains("Unknown command 'frobnicate'"));
}
