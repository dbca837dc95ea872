use serde::{Deserialize, Serialize};
use surrealdb::RecordId;

#[derive(Serialize, Deserialize, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct Milestone {
    pub id: RecordId,
    pub event_id: RecordId,
    pub name: String,
    pub description: String,
    pub due_date: Option<String>,
    pub created_at: String,
    pub updated_at: Option<String>,
}

#[derive(Serialize, Deserialize, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct CreateMilestone {
    pub event_id: RecordId,
    pub name: String,
    pub description: String,
    pub due_date: Option<String>,
    pub created_at: String,
    pub updated_at: Option<String>,
}
