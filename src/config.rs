use std::env;
use std::path::PathBuf;
use std::time::Duration;

use serde::{Deserialize, Serialize};

pub const DEFAULT_EVENTS_FILE: &str = "lessons_exams.csv";
pub const DEFAULT_ROUTINES_FILE: &str = "daily_routines.csv";

/// Load .env file (silently ignores if missing).
pub fn load_dotenv() {
    dotenvy::dotenv().ok();
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TimetableConfig {
    pub data_dir: PathBuf,
    pub events_file: String,
    pub routines_file: String,
    pub reminder_lead_minutes: i64,
    pub reminder_interval_secs: u64,
    pub reminders_enabled: bool,
    pub http_addr: String,
}

impl Default for TimetableConfig {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from("."),
            events_file: DEFAULT_EVENTS_FILE.to_string(),
            routines_file: DEFAULT_ROUTINES_FILE.to_string(),
            reminder_lead_minutes: 30,
            reminder_interval_secs: 600,
            reminders_enabled: false,
            http_addr: "127.0.0.1:3000".to_string(),
        }
    }
}

impl TimetableConfig {
    /// Build config from environment variables (call `load_dotenv()` first).
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build config from an arbitrary key lookup; blank values count as unset.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());
        let defaults = Self::default();
        Self {
            data_dir: get("TIMETABLE_DATA_DIR")
                .map(PathBuf::from)
                .unwrap_or(defaults.data_dir),
            events_file: get("TIMETABLE_EVENTS_FILE").unwrap_or(defaults.events_file),
            routines_file: get("TIMETABLE_ROUTINES_FILE").unwrap_or(defaults.routines_file),
            reminder_lead_minutes: get("TIMETABLE_REMINDER_LEAD_MINUTES")
                .and_then(|v| v.trim().parse().ok())
                .unwrap_or(defaults.reminder_lead_minutes),
            reminder_interval_secs: get("TIMETABLE_REMINDER_INTERVAL_SECS")
                .and_then(|v| v.trim().parse().ok())
                .unwrap_or(defaults.reminder_interval_secs),
            reminders_enabled: get("TIMETABLE_REMINDERS")
                .map(|v| parse_flag(&v))
                .unwrap_or(defaults.reminders_enabled),
            http_addr: get("TIMETABLE_HTTP_ADDR").unwrap_or(defaults.http_addr),
        }
    }

    /// Same settings, tables stored under `dir`.
    pub fn with_data_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.data_dir = dir.into();
        self
    }

    pub fn events_path(&self) -> PathBuf {
        self.data_dir.join(&self.events_file)
    }

    pub fn routines_path(&self) -> PathBuf {
        self.data_dir.join(&self.routines_file)
    }

    pub fn reminder_lead(&self) -> chrono::Duration {
        chrono::Duration::minutes(self.reminder_lead_minutes)
    }

    pub fn reminder_interval(&self) -> Duration {
        Duration::from_secs(self.reminder_interval_secs.max(1))
    }
}

fn parse_flag(value: &str) -> bool {
    matches!(
        value.trim().to_ascii_lowercase().as_str(),
        "1" | "true" | "yes" | "on"
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn defaults_when_nothing_set() {
        let config = TimetableConfig::from_lookup(|_| None);
        assert_eq!(config.events_path(), PathBuf::from(".").join("lessons_exams.csv"));
        assert_eq!(config.routines_path(), PathBuf::from(".").join("daily_routines.csv"));
        assert_eq!(config.reminder_lead_minutes, 30);
        assert_eq!(config.reminder_interval(), Duration::from_secs(600));
        assert!(!config.reminders_enabled);
    }

    #[test]
    fn reads_overrides_and_ignores_garbage_numbers() {
        let config = TimetableConfig::from_lookup(lookup(&[
            ("TIMETABLE_DATA_DIR", "/tmp/tt"),
            ("TIMETABLE_EVENTS_FILE", "events.csv"),
            ("TIMETABLE_REMINDER_LEAD_MINUTES", "soon"),
            ("TIMETABLE_REMINDER_INTERVAL_SECS", "60"),
            ("TIMETABLE_REMINDERS", "Yes"),
        ]));
        assert_eq!(config.events_path(), PathBuf::from("/tmp/tt/events.csv"));
        assert_eq!(config.reminder_lead_minutes, 30);
        assert_eq!(config.reminder_interval_secs, 60);
        assert!(config.reminders_enabled);
    }

    #[test]
    fn blank_values_fall_back_to_defaults() {
        let config = TimetableConfig::from_lookup(lookup(&[("TIMETABLE_ROUTINES_FILE", "  ")]));
        assert_eq!(config.routines_file, DEFAULT_ROUTINES_FILE);
    }
}
