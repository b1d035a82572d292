use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use serde::{Deserialize, Serialize};

/// Every n-th completed focus session is followed by a long break.
pub const LONG_BREAK_INTERVAL: u32 = 4;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub struct FocusSettings {
    #[serde(default = "default_focus_minutes")]
    pub focus_minutes: u32,
    #[serde(default = "default_short_break_minutes")]
    pub short_break_minutes: u32,
    #[serde(default = "default_long_break_minutes")]
    pub long_break_minutes: u32,
}

impl Default for FocusSettings {
    fn default() -> Self {
        Self {
            focus_minutes: default_focus_minutes(),
            short_break_minutes: default_short_break_minutes(),
            long_break_minutes: default_long_break_minutes(),
        }
    }
}

impl FocusSettings {
    /// Every duration is at least one minute.
    pub fn normalized(self) -> Self {
        Self {
            focus_minutes: self.focus_minutes.max(1),
            short_break_minutes: self.short_break_minutes.max(1),
            long_break_minutes: self.long_break_minutes.max(1),
        }
    }

    pub fn duration_secs(&self, mode: TimerMode) -> u32 {
        let minutes = match mode {
            TimerMode::Focus => self.focus_minutes,
            TimerMode::ShortBreak => self.short_break_minutes,
            TimerMode::LongBreak => self.long_break_minutes,
        };
        minutes.saturating_mul(60)
    }
}

fn default_focus_minutes() -> u32 {
    25
}

fn default_short_break_minutes() -> u32 {
    5
}

fn default_long_break_minutes() -> u32 {
    15
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "kebab-case")]
pub enum TimerMode {
    Focus,
    ShortBreak,
    LongBreak,
}

/// A finished session and the mode that follows it.
#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub struct Transition {
    pub finished: TimerMode,
    pub next: TimerMode,
    pub completed_cycles: u32,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "snake_case")]
pub struct FocusSnapshot {
    pub mode: TimerMode,
    pub remaining_secs: u32,
    pub display: String,
    pub progress: f64,
    pub active: bool,
    pub completed_cycles: u32,
    pub task_id: Option<String>,
    pub settings: FocusSettings,
}

#[derive(Debug, Clone)]
pub struct FocusTimer {
    mode: TimerMode,
    remaining_secs: u32,
    active: bool,
    completed_cycles: u32,
    settings: FocusSettings,
    task_id: Option<String>,
}

impl FocusTimer {
    pub fn new(settings: FocusSettings) -> Self {
        let settings = settings.normalized();
        Self {
            mode: TimerMode::Focus,
            remaining_secs: settings.duration_secs(TimerMode::Focus),
            active: false,
            completed_cycles: 0,
            settings,
            task_id: None,
        }
    }

    pub fn mode(&self) -> TimerMode {
        self.mode
    }

    pub fn remaining_secs(&self) -> u32 {
        self.remaining_secs
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    pub fn completed_cycles(&self) -> u32 {
        self.completed_cycles
    }

    pub fn settings(&self) -> FocusSettings {
        self.settings
    }

    pub fn task_id(&self) -> Option<&str> {
        self.task_id.as_deref()
    }

    pub fn start(&mut self) {
        self.active = true;
    }

    pub fn pause(&mut self) {
        self.active = false;
    }

    pub fn toggle(&mut self) {
        self.active = !self.active;
    }

    /// One second elapsed. Returns the transition when the session ran out.
    pub fn tick(&mut self) -> Option<Transition> {
        if !self.active {
            return None;
        }
        if self.remaining_secs > 0 {
            self.remaining_secs -= 1;
        }
        if self.remaining_secs == 0 {
            return Some(self.complete());
        }
        None
    }

    /// Ends the current session now, as if it had run out.
    pub fn skip(&mut self) -> Transition {
        self.complete()
    }

    pub fn reset(&mut self) {
        self.active = false;
        self.remaining_secs = self.settings.duration_secs(self.mode);
    }

    pub fn switch_mode(&mut self, mode: TimerMode) {
        self.mode = mode;
        self.remaining_secs = self.settings.duration_secs(mode);
        self.active = false;
    }

    /// A running session keeps its remaining time; otherwise the new duration applies at once.
    pub fn update_settings(&mut self, settings: FocusSettings) {
        self.settings = settings.normalized();
        if !self.active {
            self.remaining_secs = self.settings.duration_secs(self.mode);
        }
    }

    pub fn select_task(&mut self, task_id: Option<String>) {
        self.task_id = task_id;
    }

    /// Percent of the current session already elapsed.
    pub fn progress(&self) -> f64 {
        let total = self.settings.duration_secs(self.mode);
        if total == 0 {
            return 0.0;
        }
        let elapsed = total.saturating_sub(self.remaining_secs);
        f64::from(elapsed) / f64::from(total) * 100.0
    }

    pub fn format_remaining(&self) -> String {
        format_clock(self.remaining_secs)
    }

    pub fn snapshot(&self) -> FocusSnapshot {
        FocusSnapshot {
            mode: self.mode,
            remaining_secs: self.remaining_secs,
            display: self.format_remaining(),
            progress: self.progress(),
            active: self.active,
            completed_cycles: self.completed_cycles,
            task_id: self.task_id.clone(),
            settings: self.settings,
        }
    }

    fn complete(&mut self) -> Transition {
        let finished = self.mode;
        let next = match finished {
            TimerMode::Focus => {
                self.completed_cycles += 1;
                if self.completed_cycles % LONG_BREAK_INTERVAL == 0 {
                    TimerMode::LongBreak
                } else {
                    TimerMode::ShortBreak
                }
            }
            TimerMode::ShortBreak | TimerMode::LongBreak => TimerMode::Focus,
        };
        self.switch_mode(next);
        log::debug!(
            "focus session finished mode={finished:?} next={next:?} cycles={}",
            self.completed_cycles
        );
        Transition {
            finished,
            next,
            completed_cycles: self.completed_cycles,
        }
    }
}

/// `MM:SS`; minutes are not wrapped into hours.
pub fn format_clock(seconds: u32) -> String {
    format!("{:02}:{:02}", seconds / 60, seconds % 60)
}

/// Shared handle to the single focus timer.
#[derive(Clone)]
pub struct FocusState {
    inner: Arc<Mutex<FocusTimer>>,
}

impl FocusState {
    pub fn new(settings: FocusSettings) -> Self {
        Self {
            inner: Arc::new(Mutex::new(FocusTimer::new(settings))),
        }
    }

    fn lock(&self) -> MutexGuard<'_, FocusTimer> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Runs `f` against the timer and returns its result along with the resulting snapshot.
    pub fn with<R>(&self, f: impl FnOnce(&mut FocusTimer) -> R) -> (R, FocusSnapshot) {
        let mut guard = self.lock();
        let result = f(&mut *guard);
        (result, guard.snapshot())
    }

    pub fn snapshot(&self) -> FocusSnapshot {
        self.lock().snapshot()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn short_settings() -> FocusSettings {
        FocusSettings {
            focus_minutes: 1,
            short_break_minutes: 1,
            long_break_minutes: 2,
        }
    }

    #[test]
    fn defaults_match_pomodoro_durations() {
        let timer = FocusTimer::new(FocusSettings::default());
        assert_eq!(timer.mode(), TimerMode::Focus);
        assert_eq!(timer.remaining_secs(), 25 * 60);
        assert!(!timer.is_active());
        assert_eq!(timer.format_remaining(), "25:00");
    }

    #[test]
    fn settings_serde_fills_missing_durations() {
        let settings: FocusSettings =
            serde_json::from_str(r#"{"focus_minutes":50}"#).expect("focus settings");
        assert_eq!(settings.focus_minutes, 50);
        assert_eq!(settings.short_break_minutes, 5);
        assert_eq!(settings.long_break_minutes, 15);
    }

    #[test]
    fn tick_only_counts_down_while_active() {
        let mut timer = FocusTimer::new(short_settings());
        assert_eq!(timer.tick(), None);
        assert_eq!(timer.remaining_secs(), 60);

        timer.toggle();
        assert_eq!(timer.tick(), None);
        assert_eq!(timer.remaining_secs(), 59);
        assert_eq!(timer.format_remaining(), "00:59");

        timer.pause();
        timer.tick();
        assert_eq!(timer.remaining_secs(), 59);
    }

    #[test]
    fn running_out_switches_to_break_and_stops() {
        let mut timer = FocusTimer::new(short_settings());
        timer.start();
        let mut transition = None;
        for _ in 0..60 {
            transition = timer.tick();
        }
        assert_eq!(
            transition,
            Some(Transition {
                finished: TimerMode::Focus,
                next: TimerMode::ShortBreak,
                completed_cycles: 1,
            })
        );
        assert_eq!(timer.mode(), TimerMode::ShortBreak);
        assert!(!timer.is_active());
        assert_eq!(timer.remaining_secs(), 60);
    }

    #[test]
    fn every_fourth_focus_session_earns_a_long_break() {
        let mut timer = FocusTimer::new(short_settings());
        let mut nexts = Vec::new();
        for _ in 0..8 {
            nexts.push(timer.skip().next);
        }
        assert_eq!(
            nexts,
            vec![
                TimerMode::ShortBreak,
                TimerMode::Focus,
                TimerMode::ShortBreak,
                TimerMode::Focus,
                TimerMode::ShortBreak,
                TimerMode::Focus,
                TimerMode::LongBreak,
                TimerMode::Focus,
            ]
        );
        assert_eq!(timer.completed_cycles(), 4);
    }

    #[test]
    fn breaks_do_not_count_as_cycles() {
        let mut timer = FocusTimer::new(short_settings());
        timer.switch_mode(TimerMode::LongBreak);
        assert_eq!(timer.remaining_secs(), 120);
        let transition = timer.skip();
        assert_eq!(transition.next, TimerMode::Focus);
        assert_eq!(timer.completed_cycles(), 0);
    }

    #[test]
    fn reset_restores_full_duration() {
        let mut timer = FocusTimer::new(short_settings());
        timer.start();
        timer.tick();
        timer.tick();
        timer.reset();
        assert!(!timer.is_active());
        assert_eq!(timer.remaining_secs(), 60);
        assert_eq!(timer.progress(), 0.0);
    }

    #[test]
    fn update_settings_applies_immediately_only_when_paused() {
        let mut timer = FocusTimer::new(FocusSettings::default());
        timer.update_settings(FocusSettings {
            focus_minutes: 0,
            ..FocusSettings::default()
        });
        // Clamped to one minute.
        assert_eq!(timer.remaining_secs(), 60);

        timer.start();
        timer.tick();
        timer.update_settings(FocusSettings::default());
        assert_eq!(timer.remaining_secs(), 59);
        assert_eq!(timer.settings(), FocusSettings::default());
    }

    #[test]
    fn progress_and_snapshot_track_elapsed_time() {
        let mut timer = FocusTimer::new(short_settings());
        timer.select_task(Some("task-1".to_string()));
        timer.start();
        for _ in 0..15 {
            timer.tick();
        }
        assert!((timer.progress() - 25.0).abs() < f64::EPSILON);

        let snapshot = timer.snapshot();
        assert_eq!(snapshot.display, "00:45");
        assert_eq!(snapshot.task_id.as_deref(), Some("task-1"));
        assert!(snapshot.active);
    }

    #[test]
    fn format_clock_pads_both_fields() {
        assert_eq!(format_clock(0), "00:00");
        assert_eq!(format_clock(61), "01:01");
        assert_eq!(format_clock(90 * 60), "90:00");
    }

    #[test]
    fn focus_state_handles_share_the_timer() {
        let state = FocusState::new(short_settings());
        let other = state.clone();
        let (transition, snapshot) = state.with(|timer| timer.skip());
        assert_eq!(transition.next, TimerMode::ShortBreak);
        assert_eq!(snapshot.mode, TimerMode::ShortBreak);
        assert_eq!(other.snapshot().completed_cycles, 1);
    }
}
