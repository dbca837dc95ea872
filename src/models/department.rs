use serde::{Deserialize, Serialize};
use surrealdb::RecordId;

#[derive(Serialize, Deserialize, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct Department {
    pub id: RecordId,
    pub event_id: RecordId,
    pub name: String,
    pub description: String,
    /// Expected to agree with the HoD membership of the same event; the
    /// assign-hod flow maintains both, nothing re-validates it afterwards.
    pub leader_id: Option<RecordId>,
    pub created_at: String,
    pub updated_at: Option<String>,
}

#[derive(Serialize, Deserialize, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct CreateDepartment {
    pub event_id: RecordId,
    pub name: String,
    pub description: String,
    pub leader_id: Option<RecordId>,
    pub created_at: String,
    pub updated_at: Option<String>,
}
