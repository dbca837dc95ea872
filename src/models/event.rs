use serde::{Deserialize, Serialize};
use surrealdb::RecordId;

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum EventVisibility {
    Public,
    Private,
}

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum EventStatus {
    Scheduled,
    Ongoing,
    Completed,
    Cancelled,
}

#[derive(Serialize, Deserialize, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct Event {
    pub id: RecordId,
    pub name: String,
    pub description: String,
    pub event_date: String,
    pub location: String,
    pub visibility: EventVisibility,
    pub organizer_name: String,
    /// Short token granting self-service join; globally unique among events.
    pub join_code: String,
    pub status: EventStatus,
    pub images: Vec<String>,
    pub created_at: String,
    pub updated_at: Option<String>,
}

#[derive(Serialize, Deserialize, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct CreateEvent {
    pub name: String,
    pub description: String,
    pub event_date: String,
    pub location: String,
    pub visibility: EventVisibility,
    pub organizer_name: String,
    pub join_code: String,
    pub status: EventStatus,
    pub images: Vec<String>,
    pub created_at: String,
    pub updated_at: Option<String>,
}
