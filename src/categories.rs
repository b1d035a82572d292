use serde::{Deserialize, Serialize};

use crate::state::{StoreEvent, TaskStore};

/// What a category deletion touched; hand it back to `restore_category` to undo.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct CategoryDeletion {
    pub category: String,
    pub task_ids: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub struct CategoryUsage {
    pub name: String,
    pub task_count: usize,
}

impl TaskStore {
    /// Returns `false` when the name is blank or already known.
    pub fn add_category(&self, name: &str) -> bool {
        let name = name.trim();
        let created = {
            let mut guard = self.lock_data();
            let created = guard.resolve_category(name);
            if created {
                self.persist_locked(&guard);
            }
            created
        };
        if created {
            log::debug!("category added name={name}");
            self.notify(&StoreEvent::CategoryAdded(name.to_string()));
        }
        created
    }

    /// Drops the category and clears it from every task that referenced it.
    /// Tasks are kept; the returned value restores them.
    pub fn delete_category(&self, name: &str) -> CategoryDeletion {
        let name = name.trim();
        let deletion = {
            let mut guard = self.lock_data();
            guard.categories.retain(|c| c != name);
            let mut task_ids = Vec::new();
            // A blank name never matches; uncategorized tasks stay out of the undo record.
            for task in guard
                .tasks
                .iter_mut()
                .filter(|t| !name.is_empty() && t.category == name)
            {
                task.category.clear();
                task_ids.push(task.id.clone());
            }
            self.persist_locked(&guard);
            CategoryDeletion {
                category: name.to_string(),
                task_ids,
            }
        };
        log::debug!(
            "category deleted name={} cleared_tasks={}",
            deletion.category,
            deletion.task_ids.len()
        );
        self.notify(&StoreEvent::CategoryDeleted(deletion.clone()));
        deletion
    }

    /// Undo for `delete_category`. Ids of tasks deleted in the meantime are skipped.
    /// Returns the ids that were reassigned.
    pub fn restore_category(&self, name: &str, task_ids: &[String]) -> Vec<String> {
        let name = name.trim();
        let restored = {
            let mut guard = self.lock_data();
            guard.resolve_category(name);
            let mut restored = Vec::new();
            for task in guard.tasks.iter_mut().filter(|t| task_ids.contains(&t.id)) {
                task.category = name.to_string();
                restored.push(task.id.clone());
            }
            self.persist_locked(&guard);
            restored
        };
        log::debug!(
            "category restored name={name} tasks={} skipped={}",
            restored.len(),
            task_ids.len().saturating_sub(restored.len())
        );
        self.notify(&StoreEvent::CategoryRestored {
            category: name.to_string(),
            task_ids: restored.clone(),
        });
        restored
    }

    /// Case-insensitive substring match, in display order.
    pub fn search_categories(&self, query: &str) -> Vec<String> {
        let needle = query.trim().to_lowercase();
        self.lock_data()
            .categories
            .iter()
            .filter(|c| c.to_lowercase().contains(&needle))
            .cloned()
            .collect()
    }

    pub fn category_usage(&self) -> Vec<CategoryUsage> {
        let guard = self.lock_data();
        guard
            .categories
            .iter()
            .map(|name| CategoryUsage {
                name: name.clone(),
                task_count: guard.tasks.iter().filter(|t| t.category == *name).count(),
            })
            .collect()
    }
}
