use std::ops::ControlFlow;
use std::time::Duration;

use tokio::time::{interval_at, Instant, MissedTickBehavior};

use crate::focus::{FocusSnapshot, FocusState, Transition};

#[cfg(all(feature = "app", not(test)))]
use crate::events::EVENT_FOCUS_UPDATED;
#[cfg(all(feature = "app", not(test)))]
use crate::focus::TimerMode;
#[cfg(all(feature = "app", not(test)))]
use tauri::{AppHandle, Emitter};

pub const TICK_PERIOD: Duration = Duration::from_secs(1);

/// Advances the focus timer once per second. `on_tick` sees every tick of a running timer
/// (including the one that finishes a session) and may stop the loop.
pub async fn run_focus_ticker<F>(state: FocusState, mut on_tick: F)
where
    F: FnMut(&FocusSnapshot, Option<Transition>) -> ControlFlow<()>,
{
    let mut interval = interval_at(Instant::now() + TICK_PERIOD, TICK_PERIOD);
    interval.set_missed_tick_behavior(MissedTickBehavior::Skip);
    loop {
        interval.tick().await;
        let ((was_active, transition), snapshot) =
            state.with(|timer| (timer.is_active(), timer.tick()));
        if !was_active {
            continue;
        }
        if on_tick(&snapshot, transition).is_break() {
            break;
        }
    }
}

#[cfg(all(feature = "app", not(test)))]
pub fn start_focus_ticker(app: AppHandle, state: FocusState) {
    tauri::async_runtime::spawn(async move {
        run_focus_ticker(state, |snapshot, transition| {
            let _ = app.emit(EVENT_FOCUS_UPDATED, snapshot.clone());
            if let Some(transition) = transition {
                notify_session_finished(&app, &transition);
            }
            ControlFlow::Continue(())
        })
        .await;
    });
}

#[cfg(all(feature = "app", not(test)))]
fn notify_session_finished(app: &AppHandle, transition: &Transition) {
    use tauri_plugin_notification::NotificationExt;

    let (title, body) = match transition.next {
        TimerMode::Focus => ("Break is over", "Time to focus again."),
        TimerMode::ShortBreak => ("Focus session done", "Take a short break."),
        TimerMode::LongBreak => ("Focus session done", "Take a long break."),
    };
    if let Err(err) = app.notification().builder().title(title).body(body).show() {
        log::warn!("failed to show focus notification: {err}");
    }
}
