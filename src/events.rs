use crate::models::Task;

pub const EVENT_STATE_UPDATED: &str = "state_updated";
pub const EVENT_FOCUS_UPDATED: &str = "focus_updated";

#[derive(Debug, Clone, serde::Serialize)]
pub struct StatePayload {
    pub tasks: Vec<Task>,
    pub categories: Vec<String>,
}
