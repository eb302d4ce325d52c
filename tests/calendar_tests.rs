use chrono::{NaiveDate, Weekday};
use timetable::calendar::{self, RoutineDay};
use timetable::{TimetableError, weekday_name, weekday_of};

fn d(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

#[test]
fn weekday_of_known_dates() {
    assert_eq!(weekday_of(d(2024, 3, 15)), Weekday::Fri);
    assert_eq!(weekday_of(d(2024, 2, 29)), Weekday::Thu);
    assert_eq!(weekday_of(d(2000, 1, 1)), Weekday::Sat);
    assert_eq!(weekday_name(weekday_of(d(2024, 2, 27))), "Tuesday");
}

#[test]
fn week_from_crosses_month_boundary() {
    let days: Vec<NaiveDate> = calendar::week_from(d(2024, 2, 27)).collect();
    assert_eq!(days.len(), 7);
    assert_eq!(days[0], d(2024, 2, 27));
    assert_eq!(days[2], d(2024, 2, 29));
    assert_eq!(days[3], d(2024, 3, 1));
    assert_eq!(days[6], d(2024, 3, 4));
}

#[test]
fn routine_day_parses_names_and_everyday() {
    assert_eq!("Monday".parse::<RoutineDay>().unwrap(), RoutineDay::On(Weekday::Mon));
    assert_eq!("everyday".parse::<RoutineDay>().unwrap(), RoutineDay::Everyday);
    assert_eq!(RoutineDay::On(Weekday::Sun).to_string(), "Sunday");
    assert_eq!(RoutineDay::Everyday.to_string(), "Everyday");

    let err = "Someday".parse::<RoutineDay>().unwrap_err();
    assert!(matches!(err, TimetableError::Validation(_)));
}

#[test]
fn routine_day_matching() {
    let friday = d(2024, 3, 15);
    assert!(RoutineDay::Everyday.matches(friday));
    assert!(RoutineDay::On(Weekday::Fri).matches(friday));
    assert!(!RoutineDay::On(Weekday::Mon).matches(friday));
}

#[test]
fn malformed_inputs_are_rejected() {
    let err = calendar::parse_time("Start_Time", "25:00").unwrap_err();
    assert!(matches!(
        err,
        TimetableError::MalformedDate {
            field: "Start_Time",
            ..
        }
    ));
    assert!(calendar::parse_time("Start_Time", "9am").is_err());
    assert!(calendar::parse_date("Date", "15/03/2024").is_err());
    assert!(calendar::parse_date("Date", "2023-02-29").is_err());

    let time = calendar::parse_time("Start_Time", "09:05").unwrap();
    assert_eq!(calendar::format_time(time), "09:05");
}
