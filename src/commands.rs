// The `*_impl` functions are only reached through the Tauri wrappers and tests.
#![cfg_attr(not(feature = "app"), allow(dead_code))]

use chrono::{DateTime, TimeZone};
use serde::{Deserialize, Serialize};

use crate::auth::User;
use crate::categories::{CategoryDeletion, CategoryUsage};
use crate::events::StatePayload;
#[cfg(all(feature = "app", not(test)))]
use crate::events::{EVENT_FOCUS_UPDATED, EVENT_STATE_UPDATED};
use crate::filter::{paginate, Page};
use crate::focus::{FocusSnapshot, TimerMode};
use crate::models::{FilterCriteria, NewTask, Settings, SortKey, Task};
use crate::state::AppState;

#[cfg(all(feature = "app", not(test)))]
use tauri::{AppHandle, Emitter, Runtime, State};

#[derive(Debug, serde::Serialize)]
pub struct CommandResult<T> {
    pub ok: bool,
    pub data: Option<T>,
    pub error: Option<String>,
}

/// What the commands need from the host besides the managed state.
trait CommandCtx {
    fn emit_state_updated(&self, payload: StatePayload);
    fn emit_focus_updated(&self, snapshot: FocusSnapshot);
}

fn ok<T>(data: T) -> CommandResult<T> {
    CommandResult {
        ok: true,
        data: Some(data),
        error: None,
    }
}

fn err<T>(message: &str) -> CommandResult<T> {
    CommandResult {
        ok: false,
        data: None,
        error: Some(message.to_string()),
    }
}

fn broadcast(ctx: &impl CommandCtx, state: &AppState) {
    ctx.emit_state_updated(StatePayload {
        tasks: state.tasks.display_tasks(),
        categories: state.tasks.categories(),
    });
}

#[cfg(all(feature = "app", not(test)))]
struct TauriCommandCtx<'a, R: Runtime> {
    app: &'a AppHandle<R>,
}

#[cfg(all(feature = "app", not(test)))]
impl<R: Runtime> CommandCtx for TauriCommandCtx<'_, R> {
    fn emit_state_updated(&self, payload: StatePayload) {
        let _ = self.app.emit(EVENT_STATE_UPDATED, payload);
    }

    fn emit_focus_updated(&self, snapshot: FocusSnapshot) {
        let _ = self.app.emit(EVENT_FOCUS_UPDATED, snapshot);
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "snake_case")]
pub struct LoadedState {
    pub tasks: Vec<Task>,
    pub categories: Vec<String>,
    pub settings: Settings,
    pub focus: FocusSnapshot,
    pub user: Option<User>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct TaskQuery {
    #[serde(default)]
    pub criteria: FilterCriteria,
    /// Falls back to the saved default sort.
    #[serde(default)]
    pub sort: Option<SortKey>,
    #[serde(default = "first_page")]
    pub page: usize,
    /// Falls back to the saved page size.
    #[serde(default)]
    pub page_size: Option<usize>,
}

fn first_page() -> usize {
    1
}

fn load_state_impl(state: &AppState) -> CommandResult<LoadedState> {
    ok(LoadedState {
        tasks: state.tasks.display_tasks(),
        categories: state.tasks.categories(),
        settings: state.settings(),
        focus: state.focus.snapshot(),
        user: state.auth.current_user(),
    })
}

fn create_task_impl(ctx: &impl CommandCtx, state: &AppState, task: NewTask) -> CommandResult<Task> {
    match state.tasks.add_task(task) {
        Ok(task) => {
            broadcast(ctx, state);
            ok(task)
        }
        Err(error) => err(&error.to_string()),
    }
}

fn update_task_impl(ctx: &impl CommandCtx, state: &AppState, task: Task) -> CommandResult<Task> {
    match state.tasks.update_task(task) {
        Ok(task) => {
            broadcast(ctx, state);
            ok(task)
        }
        Err(error) => err(&error.to_string()),
    }
}

fn delete_task_impl(
    ctx: &impl CommandCtx,
    state: &AppState,
    task_id: String,
) -> CommandResult<bool> {
    if let Err(error) = state.tasks.delete_task(&task_id) {
        return err(&error.to_string());
    }
    // A timer pointing at a deleted task falls back to a free session.
    let (cleared, snapshot) = state.focus.with(|timer| {
        let selected = timer.task_id() == Some(task_id.as_str());
        if selected {
            timer.select_task(None);
        }
        selected
    });
    if cleared {
        ctx.emit_focus_updated(snapshot);
    }
    broadcast(ctx, state);
    ok(true)
}

fn list_categories_impl(state: &AppState, query: Option<String>) -> CommandResult<Vec<CategoryUsage>> {
    let usage = state.tasks.category_usage();
    let Some(query) = query.filter(|q| !q.trim().is_empty()) else {
        return ok(usage);
    };
    let matching = state.tasks.search_categories(&query);
    ok(usage
        .into_iter()
        .filter(|entry| matching.contains(&entry.name))
        .collect())
}

fn add_category_impl(ctx: &impl CommandCtx, state: &AppState, name: String) -> CommandResult<bool> {
    if name.trim().is_empty() {
        return err("category name is required");
    }
    let created = state.tasks.add_category(&name);
    if created {
        broadcast(ctx, state);
    }
    ok(created)
}

fn delete_category_impl(
    ctx: &impl CommandCtx,
    state: &AppState,
    name: String,
) -> CommandResult<CategoryDeletion> {
    let deletion = state.tasks.delete_category(&name);
    broadcast(ctx, state);
    ok(deletion)
}

fn restore_category_impl(
    ctx: &impl CommandCtx,
    state: &AppState,
    name: String,
    task_ids: Vec<String>,
) -> CommandResult<Vec<String>> {
    if name.trim().is_empty() {
        return err("category name is required");
    }
    let restored = state.tasks.restore_category(&name, &task_ids);
    broadcast(ctx, state);
    ok(restored)
}

fn query_tasks_impl<Tz: TimeZone>(
    state: &AppState,
    query: TaskQuery,
    now: &DateTime<Tz>,
) -> CommandResult<Page<Task>> {
    let settings = state.settings();
    let sort = query.sort.unwrap_or(settings.sort);
    let page_size = query.page_size.unwrap_or(settings.page_size);
    let view = state.tasks.view(&query.criteria, sort, now);
    ok(paginate(&view, query.page, page_size))
}

fn update_settings_impl(
    ctx: &impl CommandCtx,
    state: &AppState,
    settings: Settings,
) -> CommandResult<Settings> {
    let settings = state.update_settings(settings);
    ctx.emit_focus_updated(state.focus.snapshot());
    ok(settings)
}

fn focus_state_impl(state: &AppState) -> CommandResult<FocusSnapshot> {
    ok(state.focus.snapshot())
}

fn focus_tasks_impl(state: &AppState) -> CommandResult<Vec<Task>> {
    ok(state.tasks.active_tasks())
}

fn focus_toggle_impl(ctx: &impl CommandCtx, state: &AppState) -> CommandResult<FocusSnapshot> {
    let ((), snapshot) = state.focus.with(|timer| timer.toggle());
    ctx.emit_focus_updated(snapshot.clone());
    ok(snapshot)
}

fn focus_reset_impl(ctx: &impl CommandCtx, state: &AppState) -> CommandResult<FocusSnapshot> {
    let ((), snapshot) = state.focus.with(|timer| timer.reset());
    ctx.emit_focus_updated(snapshot.clone());
    ok(snapshot)
}

fn focus_skip_impl(ctx: &impl CommandCtx, state: &AppState) -> CommandResult<FocusSnapshot> {
    let (_, snapshot) = state.focus.with(|timer| timer.skip());
    ctx.emit_focus_updated(snapshot.clone());
    ok(snapshot)
}

fn focus_switch_mode_impl(
    ctx: &impl CommandCtx,
    state: &AppState,
    mode: TimerMode,
) -> CommandResult<FocusSnapshot> {
    let ((), snapshot) = state.focus.with(|timer| timer.switch_mode(mode));
    ctx.emit_focus_updated(snapshot.clone());
    ok(snapshot)
}

fn focus_select_task_impl(
    ctx: &impl CommandCtx,
    state: &AppState,
    task_id: Option<String>,
) -> CommandResult<FocusSnapshot> {
    if let Some(id) = &task_id {
        if state.tasks.task(id).is_none() {
            return err(&format!("task not found: {id}"));
        }
    }
    let ((), snapshot) = state.focus.with(|timer| timer.select_task(task_id));
    ctx.emit_focus_updated(snapshot.clone());
    ok(snapshot)
}

fn current_user_impl(state: &AppState) -> CommandResult<Option<User>> {
    ok(state.auth.current_user())
}

fn login_impl(state: &AppState, email: String, password: String) -> CommandResult<User> {
    match state.auth.login(&email, &password) {
        Ok(user) => ok(user),
        Err(error) => err(&error.to_string()),
    }
}

fn register_impl(
    state: &AppState,
    name: String,
    email: String,
    password: String,
    confirm_password: String,
) -> CommandResult<User> {
    if password != confirm_password {
        return err("passwords do not match");
    }
    match state.auth.register(&name, &email, &password) {
        Ok(user) => ok(user),
        Err(error) => err(&error.to_string()),
    }
}

fn logout_impl(state: &AppState) -> CommandResult<bool> {
    state.auth.logout();
    ok(true)
}

#[cfg(all(feature = "app", not(test)))]
#[tauri::command]
pub fn load_state(state: State<AppState>) -> CommandResult<LoadedState> {
    load_state_impl(state.inner())
}

#[cfg(all(feature = "app", not(test)))]
#[tauri::command]
pub fn create_task(app: AppHandle, state: State<AppState>, task: NewTask) -> CommandResult<Task> {
    let ctx = TauriCommandCtx { app: &app };
    create_task_impl(&ctx, state.inner(), task)
}

#[cfg(all(feature = "app", not(test)))]
#[tauri::command]
pub fn update_task(app: AppHandle, state: State<AppState>, task: Task) -> CommandResult<Task> {
    let ctx = TauriCommandCtx { app: &app };
    update_task_impl(&ctx, state.inner(), task)
}

#[cfg(all(feature = "app", not(test)))]
#[tauri::command]
pub fn delete_task(app: AppHandle, state: State<AppState>, task_id: String) -> CommandResult<bool> {
    let ctx = TauriCommandCtx { app: &app };
    delete_task_impl(&ctx, state.inner(), task_id)
}

#[cfg(all(feature = "app", not(test)))]
#[tauri::command]
pub fn list_categories(
    state: State<AppState>,
    query: Option<String>,
) -> CommandResult<Vec<CategoryUsage>> {
    list_categories_impl(state.inner(), query)
}

#[cfg(all(feature = "app", not(test)))]
#[tauri::command]
pub fn add_category(app: AppHandle, state: State<AppState>, name: String) -> CommandResult<bool> {
    let ctx = TauriCommandCtx { app: &app };
    add_category_impl(&ctx, state.inner(), name)
}

#[cfg(all(feature = "app", not(test)))]
#[tauri::command]
pub fn delete_category(
    app: AppHandle,
    state: State<AppState>,
    name: String,
) -> CommandResult<CategoryDeletion> {
    let ctx = TauriCommandCtx { app: &app };
    delete_category_impl(&ctx, state.inner(), name)
}

#[cfg(all(feature = "app", not(test)))]
#[tauri::command]
pub fn restore_category(
    app: AppHandle,
    state: State<AppState>,
    name: String,
    task_ids: Vec<String>,
) -> CommandResult<Vec<String>> {
    let ctx = TauriCommandCtx { app: &app };
    restore_category_impl(&ctx, state.inner(), name, task_ids)
}

#[cfg(all(feature = "app", not(test)))]
#[tauri::command]
pub fn query_tasks(state: State<AppState>, query: TaskQuery) -> CommandResult<Page<Task>> {
    query_tasks_impl(state.inner(), query, &chrono::Local::now())
}

#[cfg(all(feature = "app", not(test)))]
#[tauri::command]
pub fn update_settings(
    app: AppHandle,
    state: State<AppState>,
    settings: Settings,
) -> CommandResult<Settings> {
    let ctx = TauriCommandCtx { app: &app };
    update_settings_impl(&ctx, state.inner(), settings)
}

#[cfg(all(feature = "app", not(test)))]
#[tauri::command]
pub fn focus_state(state: State<AppState>) -> CommandResult<FocusSnapshot> {
    focus_state_impl(state.inner())
}

#[cfg(all(feature = "app", not(test)))]
#[tauri::command]
pub fn focus_tasks(state: State<AppState>) -> CommandResult<Vec<Task>> {
    focus_tasks_impl(state.inner())
}

#[cfg(all(feature = "app", not(test)))]
#[tauri::command]
pub fn focus_toggle(app: AppHandle, state: State<AppState>) -> CommandResult<FocusSnapshot> {
    let ctx = TauriCommandCtx { app: &app };
    focus_toggle_impl(&ctx, state.inner())
}

#[cfg(all(feature = "app", not(test)))]
#[tauri::command]
pub fn focus_reset(app: AppHandle, state: State<AppState>) -> CommandResult<FocusSnapshot> {
    let ctx = TauriCommandCtx { app: &app };
    focus_reset_impl(&ctx, state.inner())
}

#[cfg(all(feature = "app", not(test)))]
#[tauri::command]
pub fn focus_skip(app: AppHandle, state: State<AppState>) -> CommandResult<FocusSnapshot> {
    let ctx = TauriCommandCtx { app: &app };
    focus_skip_impl(&ctx, state.inner())
}

#[cfg(all(feature = "app", not(test)))]
#[tauri::command]
pub fn focus_switch_mode(
    app: AppHandle,
    state: State<AppState>,
    mode: TimerMode,
) -> CommandResult<FocusSnapshot> {
    let ctx = TauriCommandCtx { app: &app };
    focus_switch_mode_impl(&ctx, state.inner(), mode)
}

#[cfg(all(feature = "app", not(test)))]
#[tauri::command]
pub fn focus_select_task(
    app: AppHandle,
    state: State<AppState>,
    task_id: Option<String>,
) -> CommandResult<FocusSnapshot> {
    let ctx = TauriCommandCtx { app: &app };
    focus_select_task_impl(&ctx, state.inner(), task_id)
}

#[cfg(all(feature = "app", not(test)))]
#[tauri::command]
pub fn current_user(state: State<AppState>) -> CommandResult<Option<User>> {
    current_user_impl(state.inner())
}

#[cfg(all(feature = "app", not(test)))]
#[tauri::command]
pub fn login(state: State<AppState>, email: String, password: String) -> CommandResult<User> {
    login_impl(state.inner(), email, password)
}

#[cfg(all(feature = "app", not(test)))]
#[tauri::command]
pub fn register(
    state: State<AppState>,
    name: String,
    email: String,
    password: String,
    confirm_password: String,
) -> CommandResult<User> {
    register_impl(state.inner(), name, email, password, confirm_password)
}

#[cfg(all(feature = "app", not(test)))]
#[tauri::command]
pub fn logout(state: State<AppState>) -> CommandResult<bool> {
    logout_impl(state.inner())
}
