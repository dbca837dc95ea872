use serde::{Deserialize, Serialize};
use surrealdb::RecordId;

/// Event-scoped role. A flat tag, not a hierarchy: each action carries its
/// own allowed set and `HoOC` holds no implicit grant over the others.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
pub enum Role {
    HoOC,
    HoD,
    Member,
    #[serde(rename = "staff")]
    Staff,
}

/// The (event, user) → role binding. At most one row exists per pair; every
/// write goes through the membership registry's upsert.
#[derive(Serialize, Deserialize, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct EventMember {
    pub id: RecordId,
    pub event_id: RecordId,
    pub user_id: RecordId,
    pub role: Role,
    pub department_id: Option<RecordId>,
    pub created_at: String,
}

#[derive(Serialize, Deserialize, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct CreateEventMember {
    pub event_id: RecordId,
    pub user_id: RecordId,
    pub role: Role,
    pub department_id: Option<RecordId>,
    pub created_at: String,
}
