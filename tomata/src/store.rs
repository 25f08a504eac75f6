//! The timer store: phase state machine, session history, tasks, settings.
//!
//! All state lives in one owned [`Store`] mutated through command methods;
//! there is no ambient global. The countdown is deadline-based: `tick()`
//! recomputes the remaining time from `end_time - now` instead of
//! decrementing a counter, so late, dropped, or bunched-up ticks from the
//! clock thread never make the display drift from the actual completion
//! moment.
//!
//! Invalid transitions (pausing while idle, ticking while paused) are
//! silent no-ops; the store never panics and never returns an error. The
//! UI is expected to gate its affordances, not this layer.

use chrono::{DateTime, Local, NaiveDate, TimeZone};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub enum TimerType {
    #[default]
    Work,
    ShortBreak,
    LongBreak,
}

impl TimerType {
    pub fn label(self) -> &'static str {
        match self {
            TimerType::Work => "Pomodoro",
            TimerType::ShortBreak => "Short Break",
            TimerType::LongBreak => "Long Break",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub enum EndSoundType {
    #[default]
    Jingle,
    Birds,
    Ring,
    None,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub enum ClickSoundType {
    #[default]
    Click,
    None,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    pub id: u64,
    pub name: String,
    pub target_pomodoros: u32,
    pub completed_pomodoros: u32,
    /// Epoch milliseconds.
    pub created_at: i64,
}

/// One completed work interval. Immutable once appended: deleting the task
/// it pointed at does not rewrite history, `subject` stays as a label.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Session {
    pub id: u64,
    /// Minutes credited for the session.
    pub duration: i64,
    /// Epoch milliseconds.
    pub start_time: i64,
    pub end_time: Option<i64>,
    pub completed: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub subject: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub task_id: Option<u64>,
}

/// Partial update for [`Task`]; present fields win.
#[derive(Debug, Clone, Default)]
pub struct TaskPatch {
    pub name: Option<String>,
    pub target_pomodoros: Option<u32>,
    pub completed_pomodoros: Option<u32>,
}

/// Partial update for the three configured durations (minutes).
#[derive(Debug, Clone, Default)]
pub struct SettingsPatch {
    pub work_duration: Option<i64>,
    pub short_break_duration: Option<i64>,
    pub long_break_duration: Option<i64>,
}

#[derive(Debug, Clone, Default)]
pub struct SoundSettingsPatch {
    pub sound_enabled: Option<bool>,
    pub end_sound_type: Option<EndSoundType>,
    pub click_sound_type: Option<ClickSoundType>,
}

#[derive(Debug, Clone, Default)]
pub struct QuoteSettingsPatch {
    pub quotes_enabled: Option<bool>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Store {
    // Current timer
    pub is_running: bool,
    pub is_paused: bool,
    /// Remaining seconds, as of the last tick or transition.
    pub current_time: i64,
    /// Total seconds of the run in progress (or of the last reset).
    pub duration: i64,
    /// Absolute deadline in epoch milliseconds while running.
    pub end_time: Option<i64>,
    /// Remaining seconds captured by `pause_timer`.
    pub paused_time_remaining: Option<i64>,
    pub timer_type: TimerType,
    pub current_task_id: Option<u64>,
    /// Quick-entry task label; valid without a registered task.
    pub current_task_name: Option<String>,

    // Settings (minutes)
    pub work_duration: i64,
    pub short_break_duration: i64,
    pub long_break_duration: i64,

    // Sound settings
    pub sound_enabled: bool,
    pub end_sound_type: EndSoundType,
    pub click_sound_type: ClickSoundType,

    // Quote settings
    pub quotes_enabled: bool,

    // Tasks
    pub tasks: Vec<Task>,
    pub next_task_id: u64,

    // History
    pub sessions: Vec<Session>,
    pub next_session_id: u64,
    pub total_completed: u32,
    pub current_streak: u32,
    pub longest_streak: u32,
}

impl Default for Store {
    fn default() -> Self {
        Self {
            is_running: false,
            is_paused: false,
            current_time: 25 * 60,
            duration: 25 * 60,
            end_time: None,
            paused_time_remaining: None,
            timer_type: TimerType::Work,
            current_task_id: None,
            current_task_name: None,
            work_duration: 25,
            short_break_duration: 5,
            long_break_duration: 15,
            sound_enabled: true,
            end_sound_type: EndSoundType::Jingle,
            click_sound_type: ClickSoundType::Click,
            quotes_enabled: true,
            tasks: vec![],
            next_task_id: 1,
            sessions: vec![],
            next_session_id: 1,
            total_completed: 0,
            current_streak: 0,
            longest_streak: 0,
        }
    }
}

fn local_date_of_millis(ms: i64) -> Option<NaiveDate> {
    Local
        .timestamp_millis_opt(ms)
        .earliest()
        .map(|dt| dt.date_naive())
}

impl Store {
    pub fn new() -> Self {
        Self::default()
    }

    /// Configured length of the current phase, in seconds.
    pub fn configured_duration(&self) -> i64 {
        let minutes = match self.timer_type {
            TimerType::Work => self.work_duration,
            TimerType::ShortBreak => self.short_break_duration,
            TimerType::LongBreak => self.long_break_duration,
        };
        minutes * 60
    }

    /// Actively counting down (running and not paused).
    pub fn is_active(&self) -> bool {
        self.is_running && !self.is_paused
    }

    /// Elapsed fraction of the run in progress, for the gauge.
    pub fn progress(&self) -> f64 {
        if self.duration > 0 {
            ((self.duration - self.current_time) as f64 / self.duration as f64).clamp(0.0, 1.0)
        } else {
            0.0
        }
    }

    // --- Timer engine transitions ---

    pub fn start_timer(&mut self, custom_minutes: Option<i64>) {
        self.start_timer_at(custom_minutes, Local::now());
    }

    /// Fresh start from idle or paused; a paused remainder is discarded.
    pub fn start_timer_at(&mut self, custom_minutes: Option<i64>, now: DateTime<Local>) {
        let duration = match custom_minutes {
            Some(minutes) => minutes * 60,
            None => self.configured_duration(),
        };
        self.is_running = true;
        self.is_paused = false;
        self.current_time = duration;
        self.duration = duration;
        self.end_time = Some(now.timestamp_millis() + duration * 1000);
        self.paused_time_remaining = None;
    }

    /// Captures the last *computed* remaining time, not a fresh sample of
    /// the deadline; call `tick` first if precision at the pause instant
    /// matters.
    pub fn pause_timer(&mut self) {
        if !self.is_running {
            return;
        }
        self.paused_time_remaining = Some(self.current_time);
        self.is_running = false;
        self.is_paused = true;
        self.end_time = None;
    }

    pub fn resume_timer(&mut self) {
        self.resume_timer_at(Local::now());
    }

    /// Re-arms the deadline from the paused remainder, falling back to the
    /// last computed remaining time. Tolerated from any state.
    pub fn resume_timer_at(&mut self, now: DateTime<Local>) {
        let remaining = self.paused_time_remaining.unwrap_or(self.current_time);
        self.is_running = true;
        self.is_paused = false;
        self.end_time = Some(now.timestamp_millis() + remaining * 1000);
        self.paused_time_remaining = None;
    }

    /// Back to idle at the configured length of the current phase.
    pub fn reset_timer(&mut self) {
        let duration = self.configured_duration();
        self.is_running = false;
        self.is_paused = false;
        self.current_time = duration;
        self.duration = duration;
        self.end_time = None;
        self.paused_time_remaining = None;
    }

    pub fn tick(&mut self) -> Option<TimerType> {
        self.tick_at(Local::now())
    }

    /// Re-sample the deadline. No-op unless actively running. Returns the
    /// phase that just finished when the countdown reaches zero, so the UI
    /// layer can notify.
    pub fn tick_at(&mut self, now: DateTime<Local>) -> Option<TimerType> {
        if !self.is_active() {
            return None;
        }
        let end = self.end_time?;
        let diff = end - now.timestamp_millis();
        let remaining = if diff <= 0 { 0 } else { (diff + 999) / 1000 };
        self.current_time = remaining;
        if remaining == 0 {
            Some(self.complete_session_at(now))
        } else {
            None
        }
    }

    /// Phase change resets unconditionally, interrupting any run in
    /// progress without confirmation. Documented behavior.
    pub fn set_timer_type(&mut self, timer_type: TimerType) {
        self.timer_type = timer_type;
        self.reset_timer();
    }

    pub fn set_current_task(&mut self, task_id: Option<u64>, task_name: Option<String>) {
        self.current_task_id = task_id;
        self.current_task_name = task_name;
    }

    // --- Session recording ---

    /// Clears the run state for any phase; records history only for work.
    ///
    /// The session is credited with the *currently configured* work
    /// duration, not the length the run was actually started with. A
    /// custom-minutes start or a mid-run settings change therefore records
    /// the configured value; see the pinning test below before "fixing"
    /// this.
    fn complete_session_at(&mut self, now: DateTime<Local>) -> TimerType {
        let finished = self.timer_type;
        self.is_running = false;
        self.is_paused = false;
        self.end_time = None;
        self.paused_time_remaining = None;

        if finished != TimerType::Work {
            return finished;
        }

        let now_ms = now.timestamp_millis();
        let session = Session {
            id: self.next_session_id,
            duration: self.work_duration,
            start_time: now_ms - self.duration * 1000,
            end_time: Some(now_ms),
            completed: true,
            subject: self.current_task_name.clone(),
            task_id: self.current_task_id,
        };
        self.next_session_id += 1;

        if let Some(task_id) = self.current_task_id {
            // A dangling id finds nothing to credit; that is fine.
            if let Some(task) = self.tasks.iter_mut().find(|t| t.id == task_id) {
                task.completed_pomodoros += 1;
            }
        }

        // One-step lookback: only the date of the immediately preceding
        // session matters, not a scan of all days with activity.
        let today = now.date_naive();
        let last_session_date = self
            .sessions
            .last()
            .and_then(|s| local_date_of_millis(s.end_time.unwrap_or(s.start_time)));
        let new_streak = match last_session_date {
            Some(date) if date == today => self.current_streak,
            Some(date) if today.signed_duration_since(date).num_days() == 1 => {
                self.current_streak + 1
            }
            _ => 1,
        };

        self.sessions.push(session);
        self.total_completed += 1;
        self.current_streak = new_streak;
        self.longest_streak = self.longest_streak.max(new_streak);
        finished
    }

    // --- Task registry ---

    pub fn add_task(&mut self, name: String, target_pomodoros: Option<u32>) {
        self.add_task_at(name, target_pomodoros, Local::now());
    }

    /// Name trimming is the input boundary's job; the registry stores what
    /// it is given.
    pub fn add_task_at(&mut self, name: String, target_pomodoros: Option<u32>, now: DateTime<Local>) {
        self.tasks.push(Task {
            id: self.next_task_id,
            name,
            target_pomodoros: target_pomodoros.unwrap_or(20),
            completed_pomodoros: 0,
            created_at: now.timestamp_millis(),
        });
        self.next_task_id += 1;
    }

    pub fn update_task(&mut self, task_id: u64, patch: TaskPatch) {
        if let Some(task) = self.tasks.iter_mut().find(|t| t.id == task_id) {
            if let Some(name) = patch.name {
                task.name = name;
            }
            if let Some(target) = patch.target_pomodoros {
                task.target_pomodoros = target;
            }
            if let Some(completed) = patch.completed_pomodoros {
                task.completed_pomodoros = completed;
            }
        }
    }

    /// Removes the task and, when it was the current one, clears the
    /// current-task pointer so no dangling reference survives. Past
    /// sessions keep their `subject` label.
    pub fn delete_task(&mut self, task_id: u64) {
        self.tasks.retain(|t| t.id != task_id);
        if self.current_task_id == Some(task_id) {
            self.current_task_id = None;
        }
    }

    // --- Settings patches ---

    /// A run in progress keeps its old duration to completion; the new
    /// lengths apply from the next start or reset.
    pub fn update_settings(&mut self, patch: SettingsPatch) {
        if let Some(minutes) = patch.work_duration {
            self.work_duration = minutes;
        }
        if let Some(minutes) = patch.short_break_duration {
            self.short_break_duration = minutes;
        }
        if let Some(minutes) = patch.long_break_duration {
            self.long_break_duration = minutes;
        }
        if !self.is_running {
            self.reset_timer();
        }
    }

    pub fn update_sound_settings(&mut self, patch: SoundSettingsPatch) {
        if let Some(enabled) = patch.sound_enabled {
            self.sound_enabled = enabled;
        }
        if let Some(sound) = patch.end_sound_type {
            self.end_sound_type = sound;
        }
        if let Some(sound) = patch.click_sound_type {
            self.click_sound_type = sound;
        }
    }

    pub fn update_quote_settings(&mut self, patch: QuoteSettingsPatch) {
        if let Some(enabled) = patch.quotes_enabled {
            self.quotes_enabled = enabled;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn t0() -> DateTime<Local> {
        Local.with_ymd_and_hms(2026, 1, 25, 12, 0, 0).unwrap()
    }

    fn millis_at(dt: DateTime<Local>) -> i64 {
        dt.timestamp_millis()
    }

    #[test]
    fn start_uses_configured_work_duration() {
        let mut store = Store::new();
        store.start_timer_at(None, t0());
        assert!(store.is_running);
        assert!(!store.is_paused);
        assert_eq!(store.duration, 25 * 60);
        assert_eq!(store.current_time, 25 * 60);
        assert_eq!(store.end_time, Some(millis_at(t0()) + 25 * 60 * 1000));
        assert_eq!(store.paused_time_remaining, None);
    }

    #[test]
    fn start_with_custom_minutes() {
        // Scenario B
        let mut store = Store::new();
        store.start_timer_at(Some(10), t0());
        assert_eq!(store.duration, 600);
        assert_eq!(store.current_time, 600);
        assert_eq!(store.end_time, Some(millis_at(t0()) + 600_000));
    }

    #[test]
    fn start_uses_break_durations_per_phase() {
        let mut store = Store::new();
        store.set_timer_type(TimerType::ShortBreak);
        store.start_timer_at(None, t0());
        assert_eq!(store.duration, 5 * 60);

        store.set_timer_type(TimerType::LongBreak);
        store.start_timer_at(None, t0());
        assert_eq!(store.duration, 15 * 60);
    }

    #[test]
    fn pause_captures_last_computed_remaining() {
        let mut store = Store::new();
        store.start_timer_at(None, t0());
        store.tick_at(t0() + Duration::seconds(100));
        assert_eq!(store.current_time, 25 * 60 - 100);
        store.pause_timer();
        assert!(store.is_paused);
        assert!(!store.is_running);
        assert_eq!(store.paused_time_remaining, Some(25 * 60 - 100));
        assert_eq!(store.end_time, None);
    }

    #[test]
    fn pause_while_idle_is_a_no_op() {
        let mut store = Store::new();
        store.pause_timer();
        assert!(!store.is_paused);
        assert_eq!(store.paused_time_remaining, None);
    }

    #[test]
    fn pause_resume_round_trip_preserves_remaining() {
        let mut store = Store::new();
        store.start_timer_at(None, t0());
        store.tick_at(t0() + Duration::seconds(900));
        let before = store.current_time;
        store.pause_timer();
        let resume_at = t0() + Duration::seconds(1000);
        store.resume_timer_at(resume_at);
        assert!(store.is_running);
        assert_eq!(store.current_time, before);
        assert_eq!(
            store.end_time,
            Some(millis_at(resume_at) + before * 1000)
        );
        assert_eq!(store.paused_time_remaining, None);
    }

    #[test]
    fn resume_falls_back_to_current_time() {
        let mut store = Store::new();
        store.current_time = 300;
        store.paused_time_remaining = None;
        store.resume_timer_at(t0());
        assert_eq!(store.end_time, Some(millis_at(t0()) + 300_000));
    }

    #[test]
    fn reset_returns_to_configured_duration_from_any_state() {
        let mut store = Store::new();
        store.start_timer_at(None, t0());
        store.tick_at(t0() + Duration::seconds(40));
        store.reset_timer();
        assert!(!store.is_running);
        assert!(!store.is_paused);
        assert_eq!(store.current_time, 25 * 60);
        assert_eq!(store.end_time, None);

        store.start_timer_at(None, t0());
        store.pause_timer();
        store.reset_timer();
        assert_eq!(store.paused_time_remaining, None);
        assert_eq!(store.current_time, 25 * 60);
    }

    #[test]
    fn tick_recomputes_from_deadline() {
        let mut store = Store::new();
        store.start_timer_at(None, t0());
        store.tick_at(t0() + Duration::seconds(3));
        assert_eq!(store.current_time, 25 * 60 - 3);
        // A late tick self-corrects: no drift from missed deliveries.
        store.tick_at(t0() + Duration::seconds(120));
        assert_eq!(store.current_time, 25 * 60 - 120);
    }

    #[test]
    fn tick_rounds_partial_seconds_up() {
        let mut store = Store::new();
        store.start_timer_at(None, t0());
        store.tick_at(t0() + Duration::milliseconds(500));
        assert_eq!(store.current_time, 25 * 60);
        store.tick_at(t0() + Duration::milliseconds(1500));
        assert_eq!(store.current_time, 25 * 60 - 1);
    }

    #[test]
    fn tick_is_a_no_op_when_idle_or_paused() {
        let mut store = Store::new();
        let idle = store.clone();
        assert_eq!(store.tick_at(t0()), None);
        assert_eq!(store.current_time, idle.current_time);

        store.start_timer_at(None, t0());
        store.pause_timer();
        let paused = store.current_time;
        assert_eq!(store.tick_at(t0() + Duration::seconds(50)), None);
        assert_eq!(store.current_time, paused);
    }

    #[test]
    fn work_completion_records_session_and_counters() {
        // Scenario A
        let mut store = Store::new();
        store.start_timer_at(None, t0());
        let finished = store.tick_at(t0() + Duration::seconds(1500));
        assert_eq!(finished, Some(TimerType::Work));
        assert_eq!(store.current_time, 0);
        assert!(!store.is_running);
        assert_eq!(store.end_time, None);
        assert_eq!(store.sessions.len(), 1);
        assert_eq!(store.total_completed, 1);

        let session = &store.sessions[0];
        assert_eq!(session.duration, 25);
        assert_eq!(session.start_time, millis_at(t0()));
        assert_eq!(session.end_time, Some(millis_at(t0()) + 1_500_000));
        assert!(session.completed);
    }

    #[test]
    fn completion_credits_configured_work_duration_not_started_one() {
        // Pins the known discrepancy: a 10-minute custom run is still
        // recorded as the configured 25 minutes.
        let mut store = Store::new();
        store.start_timer_at(Some(10), t0());
        store.tick_at(t0() + Duration::seconds(600));
        assert_eq!(store.sessions.len(), 1);
        assert_eq!(store.sessions[0].duration, 25);
    }

    #[test]
    fn break_completion_records_nothing() {
        let mut store = Store::new();
        store.set_timer_type(TimerType::ShortBreak);
        store.start_timer_at(None, t0());
        let finished = store.tick_at(t0() + Duration::seconds(5 * 60));
        assert_eq!(finished, Some(TimerType::ShortBreak));
        assert!(!store.is_running);
        assert!(store.sessions.is_empty());
        assert_eq!(store.total_completed, 0);
        assert_eq!(store.current_streak, 0);
    }

    #[test]
    fn completion_credits_current_task() {
        let mut store = Store::new();
        store.add_task_at("Study".to_string(), None, t0());
        let task_id = store.tasks[0].id;
        store.set_current_task(Some(task_id), Some("Study".to_string()));
        store.start_timer_at(None, t0());
        store.tick_at(t0() + Duration::seconds(1500));
        assert_eq!(store.tasks[0].completed_pomodoros, 1);
        assert_eq!(store.sessions[0].task_id, Some(task_id));
        assert_eq!(store.sessions[0].subject.as_deref(), Some("Study"));
    }

    #[test]
    fn completion_with_dangling_task_id_still_records() {
        let mut store = Store::new();
        store.set_current_task(Some(999), Some("Ghost".to_string()));
        store.start_timer_at(None, t0());
        store.tick_at(t0() + Duration::seconds(1500));
        assert_eq!(store.sessions.len(), 1);
        assert_eq!(store.sessions[0].task_id, Some(999));
    }

    fn complete_one(store: &mut Store, at: DateTime<Local>) {
        store.start_timer_at(None, at - Duration::seconds(1500));
        store.tick_at(at);
    }

    #[test]
    fn first_session_ever_starts_streak_at_one() {
        let mut store = Store::new();
        complete_one(&mut store, t0());
        assert_eq!(store.current_streak, 1);
        assert_eq!(store.longest_streak, 1);
    }

    #[test]
    fn same_day_completion_keeps_streak() {
        // Scenario D
        let mut store = Store::new();
        complete_one(&mut store, t0());
        store.current_streak = 3;
        store.longest_streak = 3;
        complete_one(&mut store, t0() + Duration::hours(2));
        assert_eq!(store.current_streak, 3);
    }

    #[test]
    fn yesterday_completion_extends_streak() {
        // Scenario C
        let mut store = Store::new();
        complete_one(&mut store, t0() - Duration::days(1));
        store.current_streak = 3;
        store.longest_streak = 3;
        complete_one(&mut store, t0());
        assert_eq!(store.current_streak, 4);
        assert_eq!(store.longest_streak, 4);
    }

    #[test]
    fn gap_resets_streak_to_one() {
        let mut store = Store::new();
        complete_one(&mut store, t0() - Duration::days(3));
        store.current_streak = 5;
        store.longest_streak = 5;
        complete_one(&mut store, t0());
        assert_eq!(store.current_streak, 1);
        assert_eq!(store.longest_streak, 5);
    }

    #[test]
    fn longest_streak_never_decreases() {
        let mut store = Store::new();
        let mut observed = 0;
        for day in [0i64, 1, 2, 5, 6, 6, 10] {
            complete_one(&mut store, t0() + Duration::days(day));
            assert!(store.longest_streak >= observed);
            observed = store.longest_streak;
        }
        assert_eq!(store.longest_streak, 3);
    }

    #[test]
    fn only_most_recent_session_date_matters() {
        // Two sessions yesterday, none the day before: completing today
        // still extends from the one-step lookback, whatever older gaps
        // exist.
        let mut store = Store::new();
        complete_one(&mut store, t0() - Duration::days(10));
        complete_one(&mut store, t0() - Duration::days(1));
        complete_one(&mut store, t0() - Duration::days(1) + Duration::hours(1));
        assert_eq!(store.current_streak, 1);
        complete_one(&mut store, t0());
        assert_eq!(store.current_streak, 2);
    }

    #[test]
    fn set_timer_type_resets_even_while_running() {
        let mut store = Store::new();
        store.start_timer_at(None, t0());
        store.tick_at(t0() + Duration::seconds(100));
        store.set_timer_type(TimerType::ShortBreak);
        assert!(!store.is_running);
        assert_eq!(store.timer_type, TimerType::ShortBreak);
        assert_eq!(store.current_time, 5 * 60);
        assert_eq!(store.end_time, None);
    }

    #[test]
    fn add_task_defaults_target_to_twenty() {
        let mut store = Store::new();
        store.add_task_at("Read".to_string(), None, t0());
        store.add_task_at("Write".to_string(), Some(8), t0());
        assert_eq!(store.tasks[0].target_pomodoros, 20);
        assert_eq!(store.tasks[0].completed_pomodoros, 0);
        assert_eq!(store.tasks[1].target_pomodoros, 8);
        assert_ne!(store.tasks[0].id, store.tasks[1].id);
    }

    #[test]
    fn update_task_merges_present_fields_only() {
        let mut store = Store::new();
        store.add_task_at("Read".to_string(), None, t0());
        let id = store.tasks[0].id;
        store.update_task(
            id,
            TaskPatch {
                target_pomodoros: Some(12),
                ..Default::default()
            },
        );
        assert_eq!(store.tasks[0].name, "Read");
        assert_eq!(store.tasks[0].target_pomodoros, 12);

        // Unknown id: no-op.
        store.update_task(
            999,
            TaskPatch {
                name: Some("Ghost".to_string()),
                ..Default::default()
            },
        );
        assert_eq!(store.tasks.len(), 1);
    }

    #[test]
    fn delete_task_clears_current_pointer() {
        let mut store = Store::new();
        store.add_task_at("Read".to_string(), None, t0());
        store.add_task_at("Write".to_string(), None, t0());
        let read_id = store.tasks[0].id;
        let write_id = store.tasks[1].id;

        store.set_current_task(Some(write_id), Some("Write".to_string()));
        store.delete_task(read_id);
        assert_eq!(store.current_task_id, Some(write_id));

        store.delete_task(write_id);
        assert_eq!(store.current_task_id, None);
        assert!(store.tasks.is_empty());
    }

    #[test]
    fn deleting_task_leaves_past_sessions_untouched() {
        let mut store = Store::new();
        store.add_task_at("Study".to_string(), None, t0());
        let id = store.tasks[0].id;
        store.set_current_task(Some(id), Some("Study".to_string()));
        complete_one(&mut store, t0());
        store.delete_task(id);
        assert_eq!(store.sessions[0].subject.as_deref(), Some("Study"));
        assert_eq!(store.sessions[0].task_id, Some(id));
    }

    #[test]
    fn update_settings_resets_only_when_not_running() {
        let mut store = Store::new();
        store.update_settings(SettingsPatch {
            work_duration: Some(50),
            ..Default::default()
        });
        assert_eq!(store.work_duration, 50);
        assert_eq!(store.current_time, 50 * 60);
        assert_eq!(store.short_break_duration, 5);

        store.start_timer_at(None, t0());
        store.update_settings(SettingsPatch {
            work_duration: Some(30),
            ..Default::default()
        });
        // The countdown in flight keeps its old duration.
        assert!(store.is_running);
        assert_eq!(store.duration, 50 * 60);
        assert_eq!(store.end_time, Some(millis_at(t0()) + 50 * 60 * 1000));
    }

    #[test]
    fn sound_and_quote_patches_merge_with_patch_wins() {
        let mut store = Store::new();
        store.update_sound_settings(SoundSettingsPatch {
            end_sound_type: Some(EndSoundType::Birds),
            ..Default::default()
        });
        assert!(store.sound_enabled);
        assert_eq!(store.end_sound_type, EndSoundType::Birds);
        assert_eq!(store.click_sound_type, ClickSoundType::Click);

        store.update_sound_settings(SoundSettingsPatch {
            sound_enabled: Some(false),
            ..Default::default()
        });
        assert!(!store.sound_enabled);
        assert_eq!(store.end_sound_type, EndSoundType::Birds);

        store.update_quote_settings(QuoteSettingsPatch {
            quotes_enabled: Some(false),
        });
        assert!(!store.quotes_enabled);
        store.update_quote_settings(QuoteSettingsPatch::default());
        assert!(!store.quotes_enabled);
    }
}
