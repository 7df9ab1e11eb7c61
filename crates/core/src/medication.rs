//! Medication schedules, reminder timing, refills, and adherence.
//!
//! All times are UTC. A schedule is a list of wall-clock `HH:MM` times at
//! which one dose is due each day.

use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

use chrono::{Duration, NaiveDate, NaiveTime};
use serde::{Deserialize, Serialize};

use crate::error::CoreError;
use crate::types::Timestamp;

/// Refills are reported once fewer than this many days remain.
pub const REFILL_WARNING_DAYS: i64 = 7;

/// Adherence window used when the caller does not pass one.
pub const DEFAULT_ADHERENCE_WINDOW_DAYS: u32 = 30;

/// Longest adherence window a caller may ask for.
pub const MAX_ADHERENCE_WINDOW_DAYS: u32 = 3650;

/// How far back a late scheduler tick will still fire reminders.
const MAX_REMINDER_CATCH_UP_DAYS: i64 = 1;

const SECONDS_PER_DAY: i64 = 86_400;

// ---------------------------------------------------------------------------
// ReminderTime
// ---------------------------------------------------------------------------

/// A daily dose time, strictly `HH:MM` in 24-hour form.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ReminderTime(NaiveTime);

impl ReminderTime {
    pub fn new(hour: u32, minute: u32) -> Option<Self> {
        NaiveTime::from_hms_opt(hour, minute, 0).map(Self)
    }

    pub fn time(&self) -> NaiveTime {
        self.0
    }

    /// The UTC instant of this time on `date`.
    pub fn on(&self, date: NaiveDate) -> Timestamp {
        date.and_time(self.0).and_utc()
    }
}

impl FromStr for ReminderTime {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || CoreError::Validation(format!("invalid reminder time '{s}', expected HH:MM"));
        let (h, m) = s.split_once(':').ok_or_else(invalid)?;
        if h.len() != 2 || m.len() != 2 {
            return Err(invalid());
        }
        let hour: u32 = h.parse().map_err(|_| invalid())?;
        let minute: u32 = m.parse().map_err(|_| invalid())?;
        Self::new(hour, minute).ok_or_else(invalid)
    }
}

impl TryFrom<String> for ReminderTime {
    type Error = CoreError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<ReminderTime> for String {
    fn from(t: ReminderTime) -> Self {
        t.to_string()
    }
}

impl fmt::Display for ReminderTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.format("%H:%M"))
    }
}

/// Parse a list of `HH:MM` strings, failing on the first bad entry.
pub fn parse_schedule<S: AsRef<str>>(times: &[S]) -> Result<Vec<ReminderTime>, CoreError> {
    times.iter().map(|t| t.as_ref().parse()).collect()
}

// ---------------------------------------------------------------------------
// NewMedication
// ---------------------------------------------------------------------------

/// A medication to start tracking for a patient.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewMedication {
    pub name: String,
    pub dosage: String,
    /// Human description such as "twice daily".
    pub frequency: String,
    pub times: Vec<ReminderTime>,
    #[serde(default)]
    pub instructions: String,
    #[serde(default)]
    pub refill_date: Option<Timestamp>,
}

impl NewMedication {
    pub fn validate(&self) -> Result<(), CoreError> {
        if self.name.trim().is_empty() {
            return Err(CoreError::Validation("medication name is required".to_string()));
        }
        if self.dosage.trim().is_empty() {
            return Err(CoreError::Validation("dosage is required".to_string()));
        }
        if self.times.is_empty() {
            return Err(CoreError::Validation(
                "at least one reminder time is required".to_string(),
            ));
        }
        let mut sorted = self.times.clone();
        sorted.sort();
        sorted.dedup();
        if sorted.len() != self.times.len() {
            return Err(CoreError::Validation(
                "reminder times must not repeat".to_string(),
            ));
        }
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Reminders
// ---------------------------------------------------------------------------

/// Every occurrence of `times` in `(since, until]`, ascending.
fn occurrences(times: &[ReminderTime], since: Timestamp, until: Timestamp) -> Vec<Timestamp> {
    if times.is_empty() || until <= since {
        return Vec::new();
    }
    let mut out = Vec::new();
    let mut date = since.date_naive();
    let last = until.date_naive();
    while date <= last {
        for t in times {
            let at = t.on(date);
            if at > since && at <= until {
                out.push(at);
            }
        }
        let Some(next) = date.succ_opt() else {
            break;
        };
        date = next;
    }
    out.sort();
    out
}

/// Reminder instants that fell due in `(since, until]`.
///
/// A scheduler that was paused for longer than a day only catches up on the
/// last day.
pub fn due_reminders(times: &[ReminderTime], since: Timestamp, until: Timestamp) -> Vec<Timestamp> {
    let since = match until.checked_sub_signed(Duration::days(MAX_REMINDER_CATCH_UP_DAYS)) {
        Some(cap) => since.max(cap),
        None => since,
    };
    occurrences(times, since, until)
}

// ---------------------------------------------------------------------------
// Refills
// ---------------------------------------------------------------------------

/// Whole days until `refill_date`, floored. Negative once overdue.
pub fn days_until(refill_date: Timestamp, now: Timestamp) -> i64 {
    (refill_date - now).num_seconds().div_euclid(SECONDS_PER_DAY)
}

/// Days remaining when a refill is due soon (or overdue), else `None`.
pub fn refill_due(refill_date: Timestamp, now: Timestamp) -> Option<i64> {
    let days = days_until(refill_date, now);
    (days <= REFILL_WARNING_DAYS).then_some(days)
}

// ---------------------------------------------------------------------------
// Adherence
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AdherenceReport {
    /// Doses counted as on schedule over expected, in `[0, 1]`. `1.0` when
    /// nothing was expected.
    pub adherence_rate: f64,
    pub expected_doses: u32,
    /// Every dose recorded in the window, including extras beyond the
    /// schedule.
    pub taken_doses: u32,
    pub missed_doses: u32,
    /// Consecutive fully-dosed days ending yesterday.
    pub streak_days: u32,
}

impl AdherenceReport {
    fn new(expected: u32, taken: u32, streak_days: u32) -> Self {
        let missed = expected - taken.min(expected);
        Self::from_counts(expected, taken, missed, streak_days)
    }

    fn from_counts(expected: u32, taken: u32, missed: u32, streak_days: u32) -> Self {
        let adherence_rate = if expected == 0 {
            1.0
        } else {
            f64::from(expected - missed) / f64::from(expected)
        };
        Self {
            adherence_rate,
            expected_doses: expected,
            taken_doses: taken,
            missed_doses: missed,
            streak_days,
        }
    }

    /// Aggregate per-medication reports into one patient-level report.
    ///
    /// Counts are summed as reported, so extra doses of one medication never
    /// cover missed doses of another. The streak is the shortest streak
    /// across medications.
    pub fn combine(reports: &[AdherenceReport]) -> Self {
        let expected = reports.iter().map(|r| r.expected_doses).sum();
        let taken = reports.iter().map(|r| r.taken_doses).sum();
        let missed = reports.iter().map(|r| r.missed_doses).sum();
        let streak = reports.iter().map(|r| r.streak_days).min().unwrap_or(0);
        Self::from_counts(expected, taken, missed, streak)
    }
}

/// Reject adherence windows outside `1..=MAX_ADHERENCE_WINDOW_DAYS`.
pub fn validate_adherence_window(window_days: u32) -> Result<(), CoreError> {
    if window_days == 0 {
        return Err(CoreError::Validation("days must be at least 1".to_string()));
    }
    if window_days > MAX_ADHERENCE_WINDOW_DAYS {
        return Err(CoreError::Validation(format!(
            "days must be at most {MAX_ADHERENCE_WINDOW_DAYS}"
        )));
    }
    Ok(())
}

/// Compare recorded doses with the schedule over the last `window_days`.
///
/// Doses taken beyond what was scheduled do not raise the rate above 1.
pub fn compute_adherence(
    schedule: &[ReminderTime],
    started_at: Timestamp,
    taken_at: &[Timestamp],
    now: Timestamp,
    window_days: u32,
) -> AdherenceReport {
    let window_start = match now.checked_sub_signed(Duration::days(i64::from(window_days))) {
        Some(cutoff) => started_at.max(cutoff),
        None => started_at,
    };

    let expected = occurrences(schedule, window_start, now).len();
    let taken = taken_at
        .iter()
        .filter(|t| **t > window_start && **t <= now)
        .count();

    let streak = streak_days(schedule, started_at, taken_at, now, window_days);
    AdherenceReport::new(to_u32(expected), to_u32(taken), streak)
}

fn streak_days(
    schedule: &[ReminderTime],
    started_at: Timestamp,
    taken_at: &[Timestamp],
    now: Timestamp,
    window_days: u32,
) -> u32 {
    if schedule.is_empty() {
        return 0;
    }

    let mut per_day: HashMap<NaiveDate, usize> = HashMap::new();
    for t in taken_at {
        *per_day.entry(t.date_naive()).or_default() += 1;
    }

    let mut streak = 0;
    let mut day = now.date_naive();
    while streak < window_days {
        let Some(prev) = day.pred_opt() else {
            break;
        };
        day = prev;

        let due = schedule.iter().filter(|t| t.on(day) > started_at).count();
        if due == 0 || per_day.get(&day).copied().unwrap_or(0) < due {
            break;
        }
        streak += 1;
    }
    streak
}

fn to_u32(n: usize) -> u32 {
    u32::try_from(n).unwrap_or(u32::MAX)
}
