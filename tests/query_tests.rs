use chrono::{NaiveDate, NaiveDateTime};
use tempfile::tempdir;
use timetable::{NewEvent, NewRoutine, Timetable, TimetableError, UPCOMING_LIMIT};

fn d(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

fn at(date: NaiveDate, h: u32, m: u32) -> NaiveDateTime {
    date.and_hms_opt(h, m, 0).unwrap()
}

fn event(kind: &str, name: &str, date: &str, start: &str, end: &str) -> NewEvent {
    NewEvent::new(kind, name, date, start, end)
}

fn seeded() -> (tempfile::TempDir, Timetable) {
    let dir = tempdir().unwrap();
    let timetable = Timetable::open_dir(dir.path()).unwrap();
    timetable
        .append_event(event("Lesson", "Math", "2024-03-15", "09:00", "10:00"))
        .unwrap();
    timetable
        .append_event(event("Exam", "Physics", "2024-03-01", "13:00", "15:00"))
        .unwrap();
    timetable
        .append_event(event("Lesson", "History", "2024-03-15", "11:00", "12:00"))
        .unwrap();
    timetable
        .append_routine(NewRoutine::new("Gym", "07:00", "08:00", "Friday"))
        .unwrap();
    timetable
        .append_routine(NewRoutine::new("Read", "21:00", "22:00", "Everyday"))
        .unwrap();
    timetable
        .append_routine(NewRoutine::new("Laundry", "18:00", "19:00", "Sunday"))
        .unwrap();
    (dir, timetable)
}

fn names<'a>(items: impl IntoIterator<Item = &'a String>) -> Vec<&'a str> {
    items.into_iter().map(String::as_str).collect()
}

#[test]
fn daily_schedule_matches_date_and_weekday() {
    let (_dir, timetable) = seeded();
    let day = timetable.daily_schedule(d(2024, 3, 15)).unwrap();

    assert_eq!(day.date, d(2024, 3, 15));
    assert_eq!(names(day.events.iter().map(|e| &e.name)), ["Math", "History"]);
    assert_eq!(names(day.routines.iter().map(|r| &r.name)), ["Gym", "Read"]);
}

#[test]
fn daily_schedule_without_events_still_lists_everyday_routines() {
    let (_dir, timetable) = seeded();
    let day = timetable.daily_schedule(d(2024, 3, 12)).unwrap();

    assert!(day.events.is_empty());
    assert_eq!(names(day.routines.iter().map(|r| &r.name)), ["Read"]);
    assert!(!day.is_empty());
}

#[test]
fn weekly_schedule_spans_month_boundary() {
    let (_dir, timetable) = seeded();
    timetable
        .append_event(event("Lesson", "Leap", "2024-02-29", "10:00", "11:00"))
        .unwrap();

    let week = timetable.weekly_schedule(d(2024, 2, 27)).unwrap();
    let dates: Vec<NaiveDate> = week.iter().map(|day| day.date).collect();
    assert_eq!(
        dates,
        vec![
            d(2024, 2, 27),
            d(2024, 2, 28),
            d(2024, 2, 29),
            d(2024, 3, 1),
            d(2024, 3, 2),
            d(2024, 3, 3),
            d(2024, 3, 4),
        ]
    );
    assert_eq!(names(week[2].events.iter().map(|e| &e.name)), ["Leap"]);
    assert_eq!(names(week[3].events.iter().map(|e| &e.name)), ["Physics"]);
    assert_eq!(
        names(week[3].routines.iter().map(|r| &r.name)),
        ["Gym", "Read"]
    );
    assert_eq!(
        names(week[5].routines.iter().map(|r| &r.name)),
        ["Read", "Laundry"]
    );
}

#[test]
fn semester_schedule_sorts_events_by_date_stably() {
    let (_dir, timetable) = seeded();
    let semester = timetable.semester_schedule().unwrap();

    assert_eq!(
        names(semester.events.iter().map(|e| &e.name)),
        ["Physics", "Math", "History"]
    );
    assert_eq!(
        names(semester.routines.iter().map(|r| &r.name)),
        ["Gym", "Read", "Laundry"]
    );
}

#[test]
fn upcoming_returns_at_most_five_from_today() {
    let dir = tempdir().unwrap();
    let timetable = Timetable::open_dir(dir.path()).unwrap();
    let dates = [
        ("Past", "2024-03-09"),
        ("Today", "2024-03-10"),
        ("E1", "2024-03-12"),
        ("E2", "2024-03-11"),
        ("E3", "2024-03-14"),
        ("E4", "2024-03-13"),
        ("E5", "2024-03-20"),
        ("E6", "2024-03-15"),
    ];
    for (name, date) in dates {
        timetable
            .append_event(event("Lesson", name, date, "08:00", "09:00"))
            .unwrap();
    }

    // Start time has passed, but the date still counts as upcoming.
    let upcoming = timetable
        .upcoming_events(at(d(2024, 3, 10), 12, 0))
        .unwrap();
    assert_eq!(upcoming.len(), UPCOMING_LIMIT);
    assert_eq!(
        names(upcoming.iter().map(|e| &e.name)),
        ["Today", "E2", "E1", "E4", "E3"]
    );
}

#[test]
fn upcoming_with_no_future_events_is_empty() {
    let (_dir, timetable) = seeded();
    let upcoming = timetable.upcoming_events(at(d(2025, 1, 1), 0, 0)).unwrap();
    assert!(upcoming.is_empty());
}

#[test]
fn daily_schedule_fails_on_malformed_stored_date() {
    let (dir, timetable) = seeded();
    let path = dir.path().join("lessons_exams.csv");
    let mut contents = std::fs::read_to_string(&path).unwrap();
    contents.push_str("Lesson,Broken,2024/03/15,09:00,10:00,Friday,,,bad-date\n");
    std::fs::write(&path, contents).unwrap();

    let err = timetable.daily_schedule(d(2024, 3, 15)).unwrap_err();
    assert!(matches!(
        err,
        TimetableError::MalformedDate { field: "Date", ref value, .. } if value == "2024/03/15"
    ));
    assert!(timetable.semester_schedule().is_err());
}
