//! Derived reporting over the session history.
//!
//! Everything here is a pure function of `&[Session]` and a reference
//! instant, recomputed on each read; there is no incremental cache to
//! invalidate. Only completed sessions with an end time count, and a
//! session without a subject is bucketed under "No Project".

use crate::store::Session;
use chrono::{DateTime, Days, Local, NaiveDate, TimeZone};

pub const NO_PROJECT: &str = "No Project";

/// One calendar day of the trailing week, with a per-task breakdown in
/// first-encounter order for the stacked bars.
#[derive(Debug, Clone, PartialEq)]
pub struct DayReport {
    pub date: NaiveDate,
    pub by_task: Vec<(String, i64)>,
    pub total_minutes: i64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct WeekReport {
    /// Oldest first; the last entry is today. Always 7 entries.
    pub days: Vec<DayReport>,
    /// Legend order: task names as first encountered in the history.
    pub task_names: Vec<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct TaskTotal {
    pub name: String,
    pub minutes: i64,
}

fn counted(session: &Session) -> Option<(i64, &str)> {
    if !session.completed {
        return None;
    }
    let end = session.end_time?;
    Some((end, session.subject.as_deref().unwrap_or(NO_PROJECT)))
}

fn local_date_of_millis(ms: i64) -> Option<NaiveDate> {
    Local
        .timestamp_millis_opt(ms)
        .earliest()
        .map(|dt| dt.date_naive())
}

fn add_minutes(buckets: &mut Vec<(String, i64)>, name: &str, minutes: i64) {
    match buckets.iter_mut().find(|(n, _)| n == name) {
        Some((_, total)) => *total += minutes,
        None => buckets.push((name.to_string(), minutes)),
    }
}

/// Today and the preceding six calendar days, each with a stacked
/// per-task breakdown.
pub fn week_report(sessions: &[Session], now: DateTime<Local>) -> WeekReport {
    let today = now.date_naive();
    let mut days: Vec<DayReport> = (0..7u64)
        .rev()
        .filter_map(|back| today.checked_sub_days(Days::new(back)))
        .map(|date| DayReport {
            date,
            by_task: vec![],
            total_minutes: 0,
        })
        .collect();
    let mut task_names: Vec<String> = vec![];

    for session in sessions {
        let Some((end, name)) = counted(session) else {
            continue;
        };
        let Some(date) = local_date_of_millis(end) else {
            continue;
        };
        if let Some(day) = days.iter_mut().find(|d| d.date == date) {
            add_minutes(&mut day.by_task, name, session.duration);
            day.total_minutes += session.duration;
            if !task_names.iter().any(|n| n == name) {
                task_names.push(name.to_string());
            }
        }
    }

    WeekReport { days, task_names }
}

/// Sum of minutes across every completed session ever.
pub fn total_minutes_overall(sessions: &[Session]) -> i64 {
    sessions
        .iter()
        .filter(|s| counted(s).is_some())
        .map(|s| s.duration)
        .sum()
}

/// Sum of minutes for sessions ending on or after local midnight seven
/// days ago.
pub fn total_minutes_this_week(sessions: &[Session], now: DateTime<Local>) -> i64 {
    let cutoff = now
        .date_naive()
        .checked_sub_days(Days::new(7))
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .and_then(|naive| Local.from_local_datetime(&naive).earliest())
        .map(|dt| dt.timestamp_millis())
        .unwrap_or(i64::MIN);

    sessions
        .iter()
        .filter_map(|s| counted(s).map(|(end, _)| (end, s.duration)))
        .filter(|(end, _)| *end >= cutoff)
        .map(|(_, minutes)| minutes)
        .sum()
}

/// All-history totals per task name, descending by minutes. Ties keep
/// encounter order (stable sort).
pub fn task_totals(sessions: &[Session]) -> Vec<TaskTotal> {
    let mut buckets: Vec<(String, i64)> = vec![];
    for session in sessions {
        if let Some((_, name)) = counted(session) {
            add_minutes(&mut buckets, name, session.duration);
        }
    }
    let mut totals: Vec<TaskTotal> = buckets
        .into_iter()
        .map(|(name, minutes)| TaskTotal { name, minutes })
        .collect();
    totals.sort_by(|a, b| b.minutes.cmp(&a.minutes));
    totals
}

/// `HH:MM`, hours not capped at 24.
pub fn format_minutes(minutes: i64) -> String {
    format!("{:02}:{:02}", minutes / 60, minutes % 60)
}

/// Decimal hours with one fractional digit, e.g. `150` -> `"2.5"`.
pub fn format_hours(minutes: i64) -> String {
    format!("{:.1}", minutes as f64 / 60.0)
}
