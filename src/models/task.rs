use serde::{Deserialize, Serialize};
use surrealdb::RecordId;

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum TaskStatus {
    Todo,
    InProgress,
    Review,
    Done,
}

#[derive(Serialize, Deserialize, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    pub id: RecordId,
    pub event_id: RecordId,
    pub department_id: RecordId,
    pub title: String,
    pub description: String,
    pub assignee_id: Option<RecordId>,
    pub due_date: Option<String>,
    pub estimate: Option<f64>,
    pub estimate_unit: Option<String>,
    pub progress_pct: f64,
    pub status: TaskStatus,
    pub milestone_id: Option<RecordId>,
    /// Parent task for subtasks.
    pub parent_id: Option<RecordId>,
    pub dependencies: Vec<RecordId>,
    pub created_at: String,
    pub updated_at: Option<String>,
}

#[derive(Serialize, Deserialize, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct CreateTask {
    pub event_id: RecordId,
    pub department_id: RecordId,
    pub title: String,
    pub description: String,
    pub assignee_id: Option<RecordId>,
    pub due_date: Option<String>,
    pub estimate: Option<f64>,
    pub estimate_unit: Option<String>,
    pub progress_pct: f64,
    pub status: TaskStatus,
    pub milestone_id: Option<RecordId>,
    pub parent_id: Option<RecordId>,
    pub dependencies: Vec<RecordId>,
    pub created_at: String,
    pub updated_at: Option<String>,
}

/// Row shape of the status aggregation feeding the progress chart.
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct StatusCount {
    pub status: TaskStatus,
    pub count: usize,
}
