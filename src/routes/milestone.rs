use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use surrealdb::{engine::any::Any, RecordId, Surreal};

use crate::{
    consts::db_const::{EVENT_TABLE, MILESTONE_TABLE},
    errors::{Error, Result},
    membership::find_membership,
    middleware::UserId,
    models::{
        milestone::{CreateMilestone, Milestone},
        permission::{EventAction, RequireAction},
    },
    state::AppState,
    utils::{
        record_id::record_id,
        respond::{DataEnvelope, MessageEnvelope},
        time::time_now,
        validated_json::ValidatedJson,
    },
};

async fn find_milestone_in_event(
    sdb: &Surreal<Any>,
    event_id: &RecordId,
    milestone_id: &RecordId,
) -> Result<Milestone> {
    sdb.query("SELECT * FROM type::table($table) WHERE id = $id AND eventId = $event_id;")
        .bind(("table", MILESTONE_TABLE))
        .bind(("id", milestone_id.clone()))
        .bind(("event_id", event_id.clone()))
        .await?
        .take::<Vec<Milestone>>(0)?
        .into_iter()
        .next()
        .ok_or(Error::NotFound("Milestone"))
}

/// GET /api/events/{event_id}/milestones (HoOC/HoD/staff).
pub async fn list_milestones(
    State(state): State<AppState>,
    UserId(user_id): UserId,
    Path(event_id): Path<String>,
) -> Result<Json<DataEnvelope<Vec<Milestone>>>> {
    let event_id = record_id(EVENT_TABLE, &event_id);
    find_membership(&state.sdb, &event_id, &user_id)
        .await?
        .require(EventAction::ViewMilestones)?;

    let milestones = state
        .sdb
        .query(
            "SELECT * FROM type::table($table) WHERE eventId = $event_id \
             ORDER BY dueDate ASC;",
        )
        .bind(("table", MILESTONE_TABLE))
        .bind(("event_id", event_id))
        .await?
        .take::<Vec<Milestone>>(0)?;

    Ok(Json(DataEnvelope::new(milestones)))
}

/// GET /api/events/{event_id}/milestones/{milestone_id} (HoOC/HoD/staff).
pub async fn get_milestone_detail(
    State(state): State<AppState>,
    UserId(user_id): UserId,
    Path((event_id, milestone_id)): Path<(String, String)>,
) -> Result<Json<DataEnvelope<Milestone>>> {
    let event_id = record_id(EVENT_TABLE, &event_id);
    let milestone_id = record_id(MILESTONE_TABLE, &milestone_id);
    find_membership(&state.sdb, &event_id, &user_id)
        .await?
        .require(EventAction::ViewMilestones)?;

    let milestone = find_milestone_in_event(&state.sdb, &event_id, &milestone_id).await?;

    Ok(Json(DataEnvelope::new(milestone)))
}

#[derive(serde::Deserialize, serde::Serialize, Debug, Clone, validator::Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateMilestoneRequest {
    #[validate(length(min = 1, max = 255))]
    pub name: String,
    pub description: Option<String>,
    pub due_date: Option<String>,
}

/// POST /api/events/{event_id}/milestones (HoOC/HoD).
pub async fn create_milestone(
    State(state): State<AppState>,
    UserId(user_id): UserId,
    Path(event_id): Path<String>,
    ValidatedJson(input): ValidatedJson<CreateMilestoneRequest>,
) -> Result<(StatusCode, Json<DataEnvelope<Milestone>>)> {
    let event_id = record_id(EVENT_TABLE, &event_id);
    find_membership(&state.sdb, &event_id, &user_id)
        .await?
        .require(EventAction::ManageMilestones)?;

    let milestone_data = CreateMilestone {
        event_id,
        name: input.name,
        description: input.description.unwrap_or_default(),
        due_date: input.due_date,
        created_at: time_now(),
        updated_at: None,
    };
    let milestone: Option<Milestone> = state
        .sdb
        .create(MILESTONE_TABLE)
        .content(milestone_data)
        .await?;
    let milestone = milestone.ok_or(Error::NotFound("Milestone"))?;

    Ok((StatusCode::CREATED, Json(DataEnvelope::new(milestone))))
}

#[derive(serde::Deserialize, serde::Serialize, Debug, Clone, validator::Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateMilestoneRequest {
    #[validate(length(min = 1, max = 255))]
    pub name: Option<String>,
    pub description: Option<String>,
    pub due_date: Option<String>,
}

/// PATCH /api/events/{event_id}/milestones/{milestone_id} (HoOC/HoD).
pub async fn update_milestone(
    State(state): State<AppState>,
    UserId(user_id): UserId,
    Path((event_id, milestone_id)): Path<(String, String)>,
    ValidatedJson(input): ValidatedJson<UpdateMilestoneRequest>,
) -> Result<Json<DataEnvelope<Milestone>>> {
    let event_id = record_id(EVENT_TABLE, &event_id);
    let milestone_id = record_id(MILESTONE_TABLE, &milestone_id);
    find_membership(&state.sdb, &event_id, &user_id)
        .await?
        .require(EventAction::ManageMilestones)?;

    let mut milestone = find_milestone_in_event(&state.sdb, &event_id, &milestone_id).await?;
    if let Some(name) = input.name {
        milestone.name = name;
    }
    if let Some(description) = input.description {
        milestone.description = description;
    }
    if let Some(due_date) = input.due_date {
        milestone.due_date = Some(due_date);
    }
    milestone.updated_at = Some(time_now());
    let milestone: Option<Milestone> = state.sdb.update(milestone_id).content(milestone).await?;
    let milestone = milestone.ok_or(Error::NotFound("Milestone"))?;

    Ok(Json(DataEnvelope::new(milestone)))
}

/// DELETE /api/events/{event_id}/milestones/{milestone_id} (HoOC/HoD). Tasks
/// keep their milestoneId; no cascade.
pub async fn delete_milestone(
    State(state): State<AppState>,
    UserId(user_id): UserId,
    Path((event_id, milestone_id)): Path<(String, String)>,
) -> Result<Json<MessageEnvelope>> {
    let event_id = record_id(EVENT_TABLE, &event_id);
    let milestone_id = record_id(MILESTONE_TABLE, &milestone_id);
    find_membership(&state.sdb, &event_id, &user_id)
        .await?
        .require(EventAction::ManageMilestones)?;

    find_milestone_in_event(&state.sdb, &event_id, &milestone_id).await?;
    let _: Option<Milestone> = state.sdb.delete(milestone_id).await?;

    Ok(Json(MessageEnvelope::new("Milestone deleted")))
}
