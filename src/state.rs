use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use chrono::{DateTime, TimeZone, Utc};

use crate::auth::AuthService;
use crate::categories::CategoryDeletion;
use crate::filter::filter_and_sort;
use crate::focus::FocusState;
use crate::models::{FilterCriteria, NewTask, Priority, Settings, SortKey, Status, Task};
use crate::storage::{
    load_json, save_json, KeyValueStore, CATEGORIES_KEY, SETTINGS_KEY, TASKS_KEY,
};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    EmptyTitle,
    EmptyCategory,
}

impl std::fmt::Display for ValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ValidationError::EmptyTitle => write!(f, "title is required"),
            ValidationError::EmptyCategory => write!(f, "category is required"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TaskError {
    Invalid(ValidationError),
    NotFound(String),
}

impl std::fmt::Display for TaskError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TaskError::Invalid(err) => write!(f, "invalid input: {err}"),
            TaskError::NotFound(id) => write!(f, "task not found: {id}"),
        }
    }
}

impl std::error::Error for TaskError {}

impl From<ValidationError> for TaskError {
    fn from(value: ValidationError) -> Self {
        TaskError::Invalid(value)
    }
}

/// Emitted to subscribers after every successful mutation.
#[derive(Debug, Clone, PartialEq)]
pub enum StoreEvent {
    TaskAdded(Task),
    TaskUpdated(Task),
    TaskDeleted(Task),
    CategoryAdded(String),
    CategoryDeleted(CategoryDeletion),
    CategoryRestored {
        category: String,
        task_ids: Vec<String>,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SubscriptionId(u64);

type Listener = Arc<dyn Fn(&StoreEvent) + Send + Sync>;

/// Canonical owner of tasks and categories. Cloning yields another handle to the same data.
#[derive(Clone)]
pub struct TaskStore {
    inner: Arc<Mutex<StoreData>>,
    listeners: Arc<Mutex<Listeners>>,
    backend: Arc<dyn KeyValueStore>,
}

#[derive(Debug)]
pub(crate) struct StoreData {
    pub(crate) tasks: Vec<Task>,
    pub(crate) categories: Vec<String>,
}

impl StoreData {
    /// Resolve-or-create: every path that commits a category name goes through here.
    /// Returns whether `name` was created.
    pub(crate) fn resolve_category(&mut self, name: &str) -> bool {
        if name.is_empty() || self.has_category(name) {
            return false;
        }
        self.categories.push(name.to_string());
        true
    }

    fn has_category(&self, name: &str) -> bool {
        self.categories.iter().any(|c| c == name)
    }

    /// Tasks as presented: a category missing from the set reads as uncategorized.
    fn visible_tasks(&self) -> Vec<Task> {
        self.tasks
            .iter()
            .map(|task| {
                let mut task = task.clone();
                if !task.category.is_empty() && !self.has_category(&task.category) {
                    task.category.clear();
                }
                task
            })
            .collect()
    }
}

#[derive(Default)]
struct Listeners {
    next_id: u64,
    entries: Vec<(SubscriptionId, Listener)>,
}

impl TaskStore {
    pub fn new(tasks: Vec<Task>, categories: Vec<String>, backend: Arc<dyn KeyValueStore>) -> Self {
        let mut data = StoreData {
            tasks,
            categories: Vec::new(),
        };
        for category in categories {
            data.resolve_category(category.trim());
        }
        Self {
            inner: Arc::new(Mutex::new(data)),
            listeners: Arc::new(Mutex::new(Listeners::default())),
            backend,
        }
    }

    /// Restores persisted state. Missing or unreadable task data falls back to the sample set;
    /// missing or unreadable categories are derived from the tasks.
    pub fn load(backend: Arc<dyn KeyValueStore>) -> Self {
        let tasks = match load_json::<Vec<Task>>(backend.as_ref(), TASKS_KEY) {
            Ok(Some(tasks)) => tasks,
            Ok(None) => {
                log::info!("no stored tasks, starting from sample data");
                sample_tasks()
            }
            Err(err) => {
                log::warn!("failed to read stored tasks, using sample data: {err}");
                sample_tasks()
            }
        };
        let categories = match load_json::<Vec<String>>(backend.as_ref(), CATEGORIES_KEY) {
            Ok(Some(categories)) => categories,
            Ok(None) => derive_categories(&tasks),
            Err(err) => {
                log::warn!("failed to read stored categories, deriving from tasks: {err}");
                derive_categories(&tasks)
            }
        };
        log::info!(
            "task store loaded tasks={} categories={}",
            tasks.len(),
            categories.len()
        );
        Self::new(tasks, categories, backend)
    }

    pub(crate) fn lock_data(&self) -> MutexGuard<'_, StoreData> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn tasks(&self) -> Vec<Task> {
        self.lock_data().tasks.clone()
    }

    pub fn categories(&self) -> Vec<String> {
        self.lock_data().categories.clone()
    }

    pub fn task(&self, task_id: &str) -> Option<Task> {
        self.lock_data()
            .tasks
            .iter()
            .find(|task| task.id == task_id)
            .cloned()
    }

    /// Tasks that can still be picked for a focus session.
    pub fn active_tasks(&self) -> Vec<Task> {
        self.lock_data()
            .tasks
            .iter()
            .filter(|task| !task.is_completed())
            .cloned()
            .collect()
    }

    /// All tasks in store order, with orphaned category references shown as uncategorized.
    pub fn display_tasks(&self) -> Vec<Task> {
        self.lock_data().visible_tasks()
    }

    /// Filtered and sorted display list. Orphaned references match the uncategorized
    /// selection (`""`), never their stale name.
    pub fn view<Tz: TimeZone>(
        &self,
        criteria: &FilterCriteria,
        sort: SortKey,
        now: &DateTime<Tz>,
    ) -> Vec<Task> {
        let visible = self.lock_data().visible_tasks();
        filter_and_sort(&visible, criteria, sort, now)
    }

    pub fn add_task(&self, fields: NewTask) -> Result<Task, TaskError> {
        let mut fields = fields;
        fields.title = fields.title.trim().to_string();
        fields.category = fields.category.trim().to_string();
        if fields.title.is_empty() {
            return Err(ValidationError::EmptyTitle.into());
        }
        if fields.category.is_empty() {
            return Err(ValidationError::EmptyCategory.into());
        }

        let mut events = Vec::new();
        let task = {
            let mut guard = self.lock_data();
            if guard.resolve_category(&fields.category) {
                events.push(StoreEvent::CategoryAdded(fields.category.clone()));
            }
            let id = unique_task_id(&guard.tasks);
            let task = fields.into_task(id);
            guard.tasks.push(task.clone());
            self.persist_locked(&guard);
            task
        };
        log::debug!("task added id={} category={}", task.id, task.category);
        events.push(StoreEvent::TaskAdded(task.clone()));
        self.notify_all(&events);
        Ok(task)
    }

    pub fn update_task(&self, task: Task) -> Result<Task, TaskError> {
        let mut task = task;
        task.title = task.title.trim().to_string();
        task.category = task.category.trim().to_string();
        if task.title.is_empty() {
            return Err(ValidationError::EmptyTitle.into());
        }

        let mut events = Vec::new();
        {
            let mut guard = self.lock_data();
            let Some(index) = guard.tasks.iter().position(|t| t.id == task.id) else {
                log::debug!("update skipped, task not found id={}", task.id);
                return Err(TaskError::NotFound(task.id));
            };
            if guard.resolve_category(&task.category) {
                events.push(StoreEvent::CategoryAdded(task.category.clone()));
            }
            guard.tasks[index] = task.clone();
            self.persist_locked(&guard);
        }
        log::debug!("task updated id={}", task.id);
        events.push(StoreEvent::TaskUpdated(task.clone()));
        self.notify_all(&events);
        Ok(task)
    }

    pub fn delete_task(&self, task_id: &str) -> Result<Task, TaskError> {
        let removed = {
            let mut guard = self.lock_data();
            let Some(index) = guard.tasks.iter().position(|t| t.id == task_id) else {
                return Err(TaskError::NotFound(task_id.to_string()));
            };
            let removed = guard.tasks.remove(index);
            self.persist_locked(&guard);
            removed
        };
        log::debug!("task deleted id={}", removed.id);
        self.notify(&StoreEvent::TaskDeleted(removed.clone()));
        Ok(removed)
    }

    pub fn subscribe<F>(&self, listener: F) -> SubscriptionId
    where
        F: Fn(&StoreEvent) + Send + Sync + 'static,
    {
        let mut guard = self.listeners.lock().unwrap_or_else(PoisonError::into_inner);
        guard.next_id += 1;
        let id = SubscriptionId(guard.next_id);
        guard.entries.push((id, Arc::new(listener)));
        id
    }

    pub fn unsubscribe(&self, id: SubscriptionId) -> bool {
        let mut guard = self.listeners.lock().unwrap_or_else(PoisonError::into_inner);
        let before = guard.entries.len();
        guard.entries.retain(|(entry_id, _)| *entry_id != id);
        guard.entries.len() != before
    }

    /// Must be called without holding the data lock.
    pub(crate) fn notify(&self, event: &StoreEvent) {
        self.notify_all(std::slice::from_ref(event));
    }

    pub(crate) fn notify_all(&self, events: &[StoreEvent]) {
        let listeners: Vec<Listener> = {
            let guard = self.listeners.lock().unwrap_or_else(PoisonError::into_inner);
            guard.entries.iter().map(|(_, l)| Arc::clone(l)).collect()
        };
        for event in events {
            for listener in &listeners {
                listener(event);
            }
        }
    }

    /// Best-effort: a failed write is logged and the in-memory state stays authoritative.
    pub(crate) fn persist_locked(&self, data: &StoreData) {
        if let Err(err) = save_json(self.backend.as_ref(), TASKS_KEY, &data.tasks) {
            log::warn!("failed to persist tasks: {err}");
        }
        if let Err(err) = save_json(self.backend.as_ref(), CATEGORIES_KEY, &data.categories) {
            log::warn!("failed to persist categories: {err}");
        }
    }
}

/// Everything the shell manages: the task store, the focus timer, the sign-in gate and the
/// persisted view settings, all over one backend.
#[derive(Clone)]
pub struct AppState {
    pub tasks: TaskStore,
    pub focus: FocusState,
    pub auth: AuthService,
    settings: Arc<Mutex<Settings>>,
    backend: Arc<dyn KeyValueStore>,
}

impl AppState {
    pub fn load(backend: Arc<dyn KeyValueStore>) -> Self {
        let settings = match load_json::<Settings>(backend.as_ref(), SETTINGS_KEY) {
            Ok(settings) => settings.unwrap_or_default(),
            Err(err) => {
                log::warn!("failed to read settings, using defaults: {err}");
                Settings::default()
            }
        }
        .normalized();
        Self {
            tasks: TaskStore::load(backend.clone()),
            focus: FocusState::new(settings.focus),
            auth: AuthService::load(backend.clone()),
            settings: Arc::new(Mutex::new(settings)),
            backend,
        }
    }

    pub fn settings(&self) -> Settings {
        self.settings
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Stores normalized settings and hands the focus durations to the timer.
    pub fn update_settings(&self, settings: Settings) -> Settings {
        let settings = settings.normalized();
        {
            let mut guard = self.settings.lock().unwrap_or_else(PoisonError::into_inner);
            *guard = settings.clone();
            if let Err(err) = save_json(self.backend.as_ref(), SETTINGS_KEY, &*guard) {
                log::warn!("failed to persist settings: {err}");
            }
        }
        self.focus.with(|timer| timer.update_settings(settings.focus));
        settings
    }
}

fn unique_task_id(existing: &[Task]) -> String {
    loop {
        let id = uuid::Uuid::new_v4().simple().to_string();
        if existing.iter().all(|task| task.id != id) {
            return id;
        }
    }
}

fn derive_categories(tasks: &[Task]) -> Vec<String> {
    let mut categories: Vec<String> = Vec::new();
    for task in tasks {
        if !task.category.is_empty() && !categories.contains(&task.category) {
            categories.push(task.category.clone());
        }
    }
    categories
}

/// Seed data shown on first start or when stored tasks cannot be read.
pub fn sample_tasks() -> Vec<Task> {
    let sample = |id: &str,
                  title: &str,
                  description: &str,
                  (y, m, d): (i32, u32, u32),
                  category: &str,
                  priority: Priority,
                  status: Status| Task {
        id: id.to_string(),
        title: title.to_string(),
        description: description.to_string(),
        deadline: Utc
            .with_ymd_and_hms(y, m, d, 0, 0, 0)
            .single()
            .unwrap_or_default(),
        category: category.to_string(),
        priority,
        status,
    };
    vec![
        sample(
            "1",
            "Sketch the dashboard layout",
            "Wireframes and mockups for the reworked overview page",
            (2025, 12, 10),
            "Design",
            Priority::High,
            Status::InProgress,
        ),
        sample(
            "2",
            "Go through open pull requests",
            "Review and merge what is pending from the team",
            (2025, 12, 8),
            "Development",
            Priority::High,
            Status::Todo,
        ),
        sample(
            "3",
            "Refresh the API guide",
            "Document the new endpoints with request examples",
            (2025, 12, 15),
            "Documentation",
            Priority::Medium,
            Status::Todo,
        ),
        sample(
            "4",
            "Fix the login redirect bug",
            "Users land on a blank page after signing in",
            (2026, 1, 5),
            "Development",
            Priority::High,
            Status::Todo,
        ),
        sample(
            "5",
            "Summarize client feedback",
            "Collect and rank notes from the last client meeting",
            (2025, 12, 9),
            "Communication",
            Priority::Medium,
            Status::Completed,
        ),
        sample(
            "6",
            "Profile slow queries",
            "Find and speed up the slowest production queries",
            (2026, 1, 12),
            "Development",
            Priority::Low,
            Status::Todo,
        ),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::test_support::ReadOnlyStore;
    use crate::storage::MemoryStore;
    use std::collections::HashSet;

    pub(crate) fn make_task(id: &str, category: &str, priority: Priority, day: u32) -> Task {
        Task {
            id: id.to_string(),
            title: format!("task-{id}"),
            description: String::new(),
            deadline: Utc.with_ymd_and_hms(2025, 12, day, 9, 0, 0).unwrap(),
            category: category.to_string(),
            priority,
            status: Status::Todo,
        }
    }

    fn new_task(title: &str, category: &str) -> NewTask {
        NewTask {
            title: title.to_string(),
            description: String::new(),
            deadline: Utc.with_ymd_and_hms(2025, 12, 1, 0, 0, 0).unwrap(),
            category: category.to_string(),
            priority: Priority::Medium,
            status: Status::Todo,
        }
    }

    fn memory_store(tasks: Vec<Task>, categories: &[&str]) -> (TaskStore, Arc<MemoryStore>) {
        let backend = Arc::new(MemoryStore::new());
        let store = TaskStore::new(
            tasks,
            categories.iter().map(|c| c.to_string()).collect(),
            backend.clone(),
        );
        (store, backend)
    }

    #[test]
    fn new_drops_blank_and_duplicate_categories() {
        let (store, _) = memory_store(Vec::new(), &["Design", " ", "Design", "Ops"]);
        assert_eq!(store.categories(), vec!["Design", "Ops"]);
    }

    #[test]
    fn add_task_assigns_unique_ids_and_creates_missing_category() {
        let (store, backend) = memory_store(vec![make_task("1", "Design", Priority::Low, 1)], &["Design"]);

        let first = store.add_task(new_task("  Write specs ", " Research ")).unwrap();
        let second = store.add_task(new_task("Write specs", "Research")).unwrap();

        assert_eq!(first.title, "Write specs");
        assert_eq!(first.category, "Research");
        assert_ne!(first.id, second.id);
        let ids: HashSet<String> = store.tasks().into_iter().map(|t| t.id).collect();
        assert_eq!(ids.len(), 3);
        assert_eq!(store.categories(), vec!["Design", "Research"]);

        let persisted: Vec<Task> = load_json(backend.as_ref(), TASKS_KEY).unwrap().unwrap();
        assert_eq!(persisted.len(), 3);
        let persisted: Vec<String> = load_json(backend.as_ref(), CATEGORIES_KEY).unwrap().unwrap();
        assert_eq!(persisted, vec!["Design", "Research"]);
    }

    #[test]
    fn add_task_rejects_missing_title_or_category() {
        let (store, backend) = memory_store(Vec::new(), &[]);
        assert_eq!(
            store.add_task(new_task("   ", "Design")),
            Err(TaskError::Invalid(ValidationError::EmptyTitle))
        );
        assert_eq!(
            store.add_task(new_task("Title", "")),
            Err(TaskError::Invalid(ValidationError::EmptyCategory))
        );
        assert!(store.tasks().is_empty());
        assert!(store.categories().is_empty());
        // Nothing was written.
        assert!(backend.get(TASKS_KEY).unwrap().is_none());
    }

    #[test]
    fn update_task_replaces_by_id_and_reports_not_found() {
        let (store, _) = memory_store(vec![make_task("1", "Design", Priority::Low, 1)], &["Design"]);

        let mut edited = store.task("1").unwrap();
        edited.title = "renamed".to_string();
        edited.category = "Ops".to_string();
        let updated = store.update_task(edited).unwrap();
        assert_eq!(updated.title, "renamed");
        assert_eq!(store.task("1").unwrap().category, "Ops");
        assert_eq!(store.categories(), vec!["Design", "Ops"]);

        let before = store.tasks();
        let missing = make_task("nonexistent", "Design", Priority::High, 2);
        assert_eq!(
            store.update_task(missing),
            Err(TaskError::NotFound("nonexistent".to_string()))
        );
        assert_eq!(store.tasks(), before);
    }

    #[test]
    fn update_task_allows_clearing_the_category() {
        let (store, _) = memory_store(vec![make_task("1", "Design", Priority::Low, 1)], &["Design"]);
        let mut edited = store.task("1").unwrap();
        edited.category = String::new();
        store.update_task(edited).unwrap();
        assert_eq!(store.task("1").unwrap().category, "");
        assert_eq!(store.categories(), vec!["Design"]);

        let mut blank = store.task("1").unwrap();
        blank.title = " ".to_string();
        assert_eq!(
            store.update_task(blank),
            Err(TaskError::Invalid(ValidationError::EmptyTitle))
        );
    }

    #[test]
    fn delete_task_removes_and_reports_not_found() {
        let (store, _) = memory_store(
            vec![
                make_task("1", "Design", Priority::Low, 1),
                make_task("2", "Design", Priority::Low, 2),
            ],
            &["Design"],
        );
        assert_eq!(store.delete_task("1").unwrap().id, "1");
        assert!(store.task("1").is_none());
        assert_eq!(store.delete_task("1"), Err(TaskError::NotFound("1".to_string())));
        assert_eq!(store.tasks().len(), 1);
    }

    #[test]
    fn load_uses_sample_data_when_nothing_is_stored() {
        let store = TaskStore::load(Arc::new(MemoryStore::new()));
        assert_eq!(store.tasks().len(), sample_tasks().len());
        assert_eq!(
            store.categories(),
            vec!["Design", "Development", "Documentation", "Communication"]
        );
    }

    #[test]
    fn load_falls_back_on_corrupt_data() {
        let backend = MemoryStore::with_entries([(TASKS_KEY, "{broken"), (CATEGORIES_KEY, "[1,2")]);
        let store = TaskStore::load(Arc::new(backend));
        assert_eq!(store.tasks(), sample_tasks());
        assert_eq!(store.categories().len(), 4);
    }

    #[test]
    fn load_restores_stored_tasks_and_derives_missing_categories() {
        let tasks = vec![
            make_task("a", "Ops", Priority::Low, 3),
            make_task("b", "", Priority::Low, 4),
            make_task("c", "Ops", Priority::High, 5),
            make_task("d", "Home", Priority::High, 5),
        ];
        let backend = MemoryStore::new();
        save_json(&backend, TASKS_KEY, &tasks).unwrap();
        let store = TaskStore::load(Arc::new(backend));
        assert_eq!(store.tasks(), tasks);
        assert_eq!(store.categories(), vec!["Ops", "Home"]);
    }

    #[test]
    fn persistence_failure_keeps_in_memory_state() {
        let store = TaskStore::new(Vec::new(), Vec::new(), Arc::new(ReadOnlyStore::new()));
        let task = store.add_task(new_task("offline", "Design")).unwrap();
        assert_eq!(store.tasks(), vec![task.clone()]);
        store.delete_task(&task.id).unwrap();
        assert!(store.tasks().is_empty());
    }

    #[test]
    fn subscribers_see_mutations_until_unsubscribed() {
        let (store, _) = memory_store(Vec::new(), &[]);
        let seen = Arc::new(Mutex::new(Vec::new()));
        let sink = seen.clone();
        let id = store.subscribe(move |event| sink.lock().unwrap().push(event.clone()));

        let task = store.add_task(new_task("observe", "Design")).unwrap();
        {
            let events = seen.lock().unwrap();
            assert_eq!(events.len(), 2);
            assert_eq!(events[0], StoreEvent::CategoryAdded("Design".to_string()));
            assert_eq!(events[1], StoreEvent::TaskAdded(task.clone()));
        }

        assert!(store.unsubscribe(id));
        assert!(!store.unsubscribe(id));
        store.delete_task(&task.id).unwrap();
        assert_eq!(seen.lock().unwrap().len(), 2);
    }

    #[test]
    fn listeners_may_read_the_store() {
        let (store, _) = memory_store(Vec::new(), &[]);
        let reader = store.clone();
        let counts = Arc::new(Mutex::new(Vec::new()));
        let sink = counts.clone();
        store.subscribe(move |_| sink.lock().unwrap().push(reader.tasks().len()));
        store.add_task(new_task("one", "Design")).unwrap();
        assert_eq!(*counts.lock().unwrap(), vec![1, 1]);
    }

    #[test]
    fn app_state_loads_settings_and_applies_updates() {
        let backend = Arc::new(MemoryStore::with_entries([(
            SETTINGS_KEY,
            r#"{"page_size":0,"focus":{"focus_minutes":50}}"#,
        )]));
        let state = AppState::load(backend.clone());
        assert_eq!(state.settings().page_size, 1);
        assert_eq!(state.focus.snapshot().remaining_secs, 50 * 60);

        let mut next = state.settings();
        next.sort = SortKey::PriorityDesc;
        next.focus.focus_minutes = 10;
        state.update_settings(next);

        let reloaded = AppState::load(backend);
        assert_eq!(reloaded.settings().sort, SortKey::PriorityDesc);
        assert_eq!(state.focus.snapshot().remaining_secs, 10 * 60);
    }

    #[test]
    fn app_state_survives_corrupt_settings() {
        let backend = Arc::new(MemoryStore::with_entries([(SETTINGS_KEY, "[")]));
        let state = AppState::load(backend);
        assert_eq!(state.settings(), Settings::default());
    }

    #[test]
    fn active_tasks_skip_completed() {
        let mut done = make_task("2", "Design", Priority::Low, 2);
        done.status = Status::Completed;
        let open = make_task("1", "Design", Priority::Low, 1);
        let (store, _) = memory_store(vec![open, done], &["Design"]);

        let active: Vec<String> = store.active_tasks().into_iter().map(|t| t.id).collect();
        assert_eq!(active, vec!["1"]);
    }

    #[test]
    fn orphaned_categories_read_as_uncategorized() {
        let backend = MemoryStore::new();
        save_json(
            &backend,
            TASKS_KEY,
            &vec![
                make_task("1", "Legacy", Priority::Low, 1),
                make_task("2", "Design", Priority::Low, 2),
            ],
        )
        .unwrap();
        save_json(&backend, CATEGORIES_KEY, &vec!["Design"]).unwrap();
        let store = TaskStore::load(Arc::new(backend));
        let now = Utc.with_ymd_and_hms(2025, 12, 1, 12, 0, 0).unwrap();

        let uncategorized = FilterCriteria {
            categories: vec![String::new()],
            ..FilterCriteria::default()
        };
        let out = store.view(&uncategorized, SortKey::DeadlineAsc, &now);
        assert_eq!(out.len(), 1);
        assert_eq!(out[0].id, "1");
        assert_eq!(out[0].category, "");

        let legacy = FilterCriteria {
            categories: vec!["Legacy".into()],
            ..FilterCriteria::default()
        };
        assert!(store.view(&legacy, SortKey::DeadlineAsc, &now).is_empty());

        let shown: Vec<String> = store.display_tasks().into_iter().map(|t| t.category).collect();
        assert_eq!(shown, vec!["", "Design"]);
        // The stored reference itself is left alone.
        assert_eq!(store.task("1").unwrap().category, "Legacy");
        assert_eq!(store.categories(), vec!["Design"]);
    }
}
