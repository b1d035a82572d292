use chrono::{DateTime, NaiveDate, TimeZone, Utc};
use serde::{Deserialize, Serialize};

use crate::focus::FocusSettings;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum Priority {
    Low,
    Medium,
    High,
}

impl Priority {
    /// Ascending weight: low < medium < high.
    pub fn rank(self) -> u8 {
        match self {
            Priority::Low => 0,
            Priority::Medium => 1,
            Priority::High => 2,
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "kebab-case")]
pub enum Status {
    Todo,
    InProgress,
    Completed,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "snake_case")]
pub struct Task {
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(with = "deadline_format")]
    pub deadline: DateTime<Utc>,
    #[serde(default)]
    pub category: String,
    pub priority: Priority,
    pub status: Status,
}

impl Task {
    /// Calendar day of the deadline as seen in `tz`; time of day is ignored.
    pub fn deadline_day<Tz: TimeZone>(&self, tz: &Tz) -> NaiveDate {
        self.deadline.with_timezone(tz).date_naive()
    }

    pub fn is_completed(&self) -> bool {
        self.status == Status::Completed
    }
}

/// Task fields as submitted by a form, before an id is assigned.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "snake_case")]
pub struct NewTask {
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(with = "deadline_format")]
    pub deadline: DateTime<Utc>,
    #[serde(default)]
    pub category: String,
    pub priority: Priority,
    pub status: Status,
}

impl NewTask {
    pub fn into_task(self, id: String) -> Task {
        Task {
            id,
            title: self.title,
            description: self.description,
            deadline: self.deadline,
            category: self.category,
            priority: self.priority,
            status: self.status,
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum DueWindow {
    Today,
    Upcoming,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "snake_case")]
pub struct FilterCriteria {
    #[serde(default)]
    pub categories: Vec<String>,
    #[serde(default)]
    pub priorities: Vec<Priority>,
    #[serde(default)]
    pub statuses: Vec<Status>,
    #[serde(default)]
    pub due: Option<DueWindow>,
}

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "kebab-case")]
pub enum SortKey {
    #[default]
    DeadlineAsc,
    DeadlineDesc,
    PriorityAsc,
    PriorityDesc,
    /// Case-insensitive A to Z.
    #[serde(rename = "title")]
    TitleAsc,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "snake_case")]
pub struct Settings {
    #[serde(default)]
    pub sort: SortKey,
    #[serde(default = "default_page_size")]
    pub page_size: usize,
    #[serde(default)]
    pub focus: FocusSettings,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            sort: SortKey::default(),
            page_size: default_page_size(),
            focus: FocusSettings::default(),
        }
    }
}

impl Settings {
    pub fn normalized(self) -> Self {
        Self {
            sort: self.sort,
            page_size: self.page_size.max(1),
            focus: self.focus.normalized(),
        }
    }
}

fn default_page_size() -> usize {
    10
}

/// Deadlines are written as RFC 3339. Older data may carry a bare `YYYY-MM-DD`,
/// which is read as midnight UTC.
mod deadline_format {
    use chrono::{DateTime, NaiveDate, SecondsFormat, Utc};
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S>(value: &DateTime<Utc>, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&value.to_rfc3339_opts(SecondsFormat::Millis, true))
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<DateTime<Utc>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = String::deserialize(deserializer)?;
        parse(raw.trim()).ok_or_else(|| serde::de::Error::custom(format!("invalid deadline: {raw}")))
    }

    fn parse(raw: &str) -> Option<DateTime<Utc>> {
        if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
            return Some(dt.with_timezone(&Utc));
        }
        NaiveDate::parse_from_str(raw, "%Y-%m-%d")
            .ok()
            .and_then(|date| date.and_hms_opt(0, 0, 0))
            .map(|naive| naive.and_utc())
    }
}
