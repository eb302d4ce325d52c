use std::cell::RefCell;
use std::sync::Arc;

use chrono::{Duration, NaiveDate, NaiveDateTime};
use tempfile::tempdir;
use timetable::reminder::due_reminders;
use timetable::{NewEvent, Notifier, Reminder, ReminderPoller, Timetable};

#[derive(Default)]
struct RecordingNotifier {
    messages: RefCell<Vec<String>>,
}

impl Notifier for RecordingNotifier {
    fn notify(&self, reminder: &Reminder) {
        self.messages.borrow_mut().push(reminder.message());
    }
}

fn at(h: u32, m: u32) -> NaiveDateTime {
    NaiveDate::from_ymd_opt(2024, 3, 15)
        .unwrap()
        .and_hms_opt(h, m, 0)
        .unwrap()
}

fn seeded() -> (tempfile::TempDir, Arc<Timetable>) {
    let dir = tempdir().unwrap();
    let timetable = Timetable::open_dir(dir.path()).unwrap();
    for (name, start, end) in [
        ("Math", "09:00", "10:00"),
        ("Physics", "09:10", "10:00"),
        ("History", "11:00", "12:00"),
    ] {
        timetable
            .append_event(NewEvent::new("Lesson", name, "2024-03-15", start, end))
            .unwrap();
    }
    (dir, Arc::new(timetable))
}

#[test]
fn due_window_is_strict_on_both_ends() {
    let (_dir, timetable) = seeded();
    let upcoming = timetable.upcoming_events(at(8, 30)).unwrap();

    // Math starts exactly 30 minutes out, Physics 40.
    assert!(due_reminders(&upcoming, at(8, 30), Duration::minutes(30)).is_empty());

    let due = due_reminders(&upcoming, at(8, 31), Duration::minutes(30));
    assert_eq!(due.len(), 1);
    assert_eq!(due[0].event.name, "Math");
    assert_eq!(due[0].minutes_until, 29);
    assert_eq!(due[0].title(), "Upcoming Event");
    assert_eq!(due[0].message(), "Math starts at 09:00 on 2024-03-15");

    // Already started.
    assert!(
        due_reminders(&upcoming, at(9, 0), Duration::minutes(30))
            .iter()
            .all(|r| r.event.name != "Math")
    );
}

#[test]
fn poller_notifies_each_event_once() {
    let (_dir, timetable) = seeded();
    let mut poller = ReminderPoller::new(timetable, RecordingNotifier::default());

    let first = poller.poll_once(at(8, 45)).unwrap();
    assert_eq!(first.len(), 2);

    let second = poller.poll_once(at(8, 50)).unwrap();
    assert!(second.is_empty());

    let later = poller.poll_once(at(10, 40)).unwrap();
    assert_eq!(later.len(), 1);
    assert_eq!(later[0].event.name, "History");

    assert_eq!(
        *poller.notifier().messages.borrow(),
        vec![
            "Math starts at 09:00 on 2024-03-15".to_string(),
            "Physics starts at 09:10 on 2024-03-15".to_string(),
            "History starts at 11:00 on 2024-03-15".to_string(),
        ]
    );
}

#[test]
fn custom_lead_narrows_the_window() {
    let (_dir, timetable) = seeded();
    let mut poller =
        ReminderPoller::new(timetable, RecordingNotifier::default()).with_lead(Duration::minutes(5));

    assert!(poller.poll_once(at(8, 45)).unwrap().is_empty());
    let due = poller.poll_once(at(8, 56)).unwrap();
    assert_eq!(due.len(), 1);
    assert_eq!(due[0].event.name, "Math");
}
