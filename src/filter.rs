use std::cmp::Ordering;

use chrono::{DateTime, TimeZone};
use serde::Serialize;

use crate::models::{DueWindow, FilterCriteria, SortKey, Task};

/// Whether `task` passes every non-empty selection in `criteria`.
///
/// Within a field any selected value matches (OR); across fields all must match (AND).
/// An empty selection places no constraint on its field. Due windows compare calendar days in
/// the zone of `now`.
pub fn matches<Tz: TimeZone>(task: &Task, criteria: &FilterCriteria, now: &DateTime<Tz>) -> bool {
    if !criteria.categories.is_empty() && !criteria.categories.contains(&task.category) {
        return false;
    }
    if !criteria.priorities.is_empty() && !criteria.priorities.contains(&task.priority) {
        return false;
    }
    if !criteria.statuses.is_empty() && !criteria.statuses.contains(&task.status) {
        return false;
    }
    let Some(due) = criteria.due else {
        return true;
    };
    let today = now.date_naive();
    let day = task.deadline_day(&now.timezone());
    match due {
        DueWindow::Today => day == today,
        DueWindow::Upcoming => day > today && !task.is_completed(),
    }
}

fn compare(a: &Task, b: &Task, sort: SortKey) -> Ordering {
    match sort {
        SortKey::DeadlineAsc => a.deadline.cmp(&b.deadline),
        SortKey::DeadlineDesc => b.deadline.cmp(&a.deadline),
        SortKey::PriorityAsc => a.priority.rank().cmp(&b.priority.rank()),
        SortKey::PriorityDesc => b.priority.rank().cmp(&a.priority.rank()),
        SortKey::TitleAsc => a.title.to_lowercase().cmp(&b.title.to_lowercase()),
    }
}

/// Derives the visible list. Never mutates the input; ties keep their input order.
pub fn filter_and_sort<Tz: TimeZone>(
    tasks: &[Task],
    criteria: &FilterCriteria,
    sort: SortKey,
    now: &DateTime<Tz>,
) -> Vec<Task> {
    let mut view: Vec<Task> = tasks
        .iter()
        .filter(|task| matches(task, criteria, now))
        .cloned()
        .collect();
    // `sort_by` is stable.
    view.sort_by(|a, b| compare(a, b, sort));
    view
}

#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "snake_case")]
pub struct Page<T> {
    pub items: Vec<T>,
    pub page: usize,
    pub page_size: usize,
    pub total_pages: usize,
    pub total_items: usize,
}

/// Slices a view into 1-based pages. Out-of-range pages are clamped to the nearest valid one.
pub fn paginate<T: Clone>(items: &[T], page: usize, page_size: usize) -> Page<T> {
    let page_size = page_size.max(1);
    let total_items = items.len();
    let total_pages = total_items.div_ceil(page_size).max(1);
    let page = page.clamp(1, total_pages);
    let start = (page - 1) * page_size;
    let end = (start + page_size).min(total_items);
    Page {
        items: items[start.min(end)..end].to_vec(),
        page,
        page_size,
        total_pages,
        total_items,
    }
}
