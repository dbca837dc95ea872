use axum::{
    extract::{Path, State},
    Json,
};
use surrealdb::RecordId;

use crate::{
    consts::db_const::EVENT_TABLE,
    errors::{Error, Result},
    membership::find_membership,
    middleware::UserId,
    models::event_member::Role,
    state::AppState,
    utils::{record_id::record_id, respond::DataEnvelope},
};

#[derive(serde::Serialize, serde::Deserialize, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct RoleResponse {
    pub role: Role,
    pub department_id: Option<RecordId>,
}

/// GET /api/user/me/events/{event_id}/role
pub async fn get_my_role_in_event(
    State(state): State<AppState>,
    UserId(user_id): UserId,
    Path(event_id): Path<String>,
) -> Result<Json<DataEnvelope<RoleResponse>>> {
    let event_id = record_id(EVENT_TABLE, &event_id);
    let membership = find_membership(&state.sdb, &event_id, &user_id)
        .await?
        .ok_or(Error::NotFound("Membership"))?;

    Ok(Json(DataEnvelope::new(RoleResponse {
        role: membership.role,
        department_id: membership.department_id,
    })))
}
