//! Reminder polling on top of the read-only query API.
//!
//! The poller never mutates the store. The actual notification sink is the
//! [`Notifier`] seam; [`LogNotifier`] just emits a tracing event.

use crate::calendar;
use crate::config::TimetableConfig;
use crate::error::TimetableResult;
use crate::event::Event;
use crate::persistence::TableStore;
use crate::timetable::Timetable;
use chrono::{Duration, NaiveDateTime};
use serde::Serialize;
use std::collections::HashSet;
use std::sync::Arc;
use tracing::{debug, info};

pub const REMINDER_TITLE: &str = "Upcoming Event";

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Reminder {
    pub event: Event,
    pub starts_at: NaiveDateTime,
    pub minutes_until: i64,
}

impl Reminder {
    pub fn title(&self) -> &'static str {
        REMINDER_TITLE
    }

    pub fn message(&self) -> String {
        format!(
            "{} starts at {} on {}",
            self.event.name,
            calendar::format_time(self.event.start_time),
            calendar::format_date(self.event.date)
        )
    }
}

/// Events starting strictly within `(now, now + lead)`.
pub fn due_reminders(upcoming: &[Event], now: NaiveDateTime, lead: Duration) -> Vec<Reminder> {
    upcoming
        .iter()
        .filter_map(|event| {
            let starts_at = event.starts_at();
            let until = starts_at - now;
            (until > Duration::zero() && until < lead).then(|| Reminder {
                event: event.clone(),
                starts_at,
                minutes_until: until.num_minutes(),
            })
        })
        .collect()
}

pub trait Notifier {
    fn notify(&self, reminder: &Reminder);
}

#[derive(Debug, Default, Clone, Copy)]
pub struct LogNotifier;

impl Notifier for LogNotifier {
    fn notify(&self, reminder: &Reminder) {
        info!(
            title = reminder.title(),
            event = %reminder.event.name,
            minutes_until = reminder.minutes_until,
            "{}",
            reminder.message()
        );
    }
}

pub struct ReminderPoller<S, N> {
    timetable: Arc<Timetable<S>>,
    notifier: N,
    lead: Duration,
    interval: std::time::Duration,
    sent: HashSet<(String, NaiveDateTime)>,
}

impl<S: TableStore, N: Notifier> ReminderPoller<S, N> {
    pub fn new(timetable: Arc<Timetable<S>>, notifier: N) -> Self {
        Self::from_config(timetable, notifier, &TimetableConfig::default())
    }

    pub fn from_config(timetable: Arc<Timetable<S>>, notifier: N, config: &TimetableConfig) -> Self {
        Self {
            timetable,
            notifier,
            lead: config.reminder_lead(),
            interval: config.reminder_interval(),
            sent: HashSet::new(),
        }
    }

    pub fn with_lead(mut self, lead: Duration) -> Self {
        self.lead = lead;
        self
    }

    pub fn notifier(&self) -> &N {
        &self.notifier
    }

    /// One poll at `now`: notify each due reminder that was not already sent.
    pub fn poll_once(&mut self, now: NaiveDateTime) -> TimetableResult<Vec<Reminder>> {
        let upcoming = self.timetable.upcoming_events(now)?;
        let mut fresh = Vec::new();
        for reminder in due_reminders(&upcoming, now, self.lead) {
            if self
                .sent
                .insert((reminder.event.id.clone(), reminder.starts_at))
            {
                self.notifier.notify(&reminder);
                fresh.push(reminder);
            }
        }
        self.sent.retain(|(_, starts_at)| *starts_at > now);
        debug!(upcoming = upcoming.len(), notified = fresh.len(), "reminder poll");
        Ok(fresh)
    }

    /// Poll every interval until `shutdown` flips to true or its sender is dropped.
    /// A failed poll is logged and the loop keeps going.
    #[cfg(feature = "reminders")]
    pub async fn run(mut self, mut shutdown: tokio::sync::watch::Receiver<bool>) {
        let mut ticker = tokio::time::interval(self.interval);
        info!(interval_secs = self.interval.as_secs(), "reminder poller started");
        loop {
            tokio::select! {
                _ = ticker.tick() => {
                    let now = chrono::Local::now().naive_local();
                    if let Err(err) = self.poll_once(now) {
                        tracing::warn!(error = %err, "reminder poll failed");
                    }
                }
                changed = shutdown.changed() => {
                    if changed.is_err() || *shutdown.borrow() {
                        break;
                    }
                }
            }
        }
        info!("reminder poller stopped");
    }
}
