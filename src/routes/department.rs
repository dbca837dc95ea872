use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use surrealdb::{engine::any::Any, RecordId, Surreal};

use crate::{
    consts::db_const::{DEPARTMENT_TABLE, EVENT_TABLE, USER_TABLE},
    errors::{Error, Result},
    membership::{find_membership, upsert_membership},
    middleware::UserId,
    models::{
        department::{CreateDepartment, Department},
        event::Event,
        event_member::{EventMember, Role},
        permission::{is_hod_of, EventAction, RequireAction},
        user::User,
    },
    state::AppState,
    utils::{
        pagination::{CountRow, PageQuery, Pagination},
        record_id::record_id,
        respond::{DataEnvelope, MessageEnvelope, Paginated},
        time::time_now,
        validated_json::ValidatedJson,
    },
};

async fn ensure_event_exists(sdb: &Surreal<Any>, event_id: &RecordId) -> Result<()> {
    let event: Option<Event> = sdb.select(event_id.clone()).await?;
    event.map(|_| ()).ok_or(Error::NotFound("Event"))
}

async fn ensure_department_in_event(
    sdb: &Surreal<Any>,
    event_id: &RecordId,
    department_id: &RecordId,
) -> Result<Department> {
    sdb.query("SELECT * FROM type::table($table) WHERE id = $id AND eventId = $event_id;")
        .bind(("table", DEPARTMENT_TABLE))
        .bind(("id", department_id.clone()))
        .bind(("event_id", event_id.clone()))
        .await?
        .take::<Vec<Department>>(0)?
        .into_iter()
        .next()
        .ok_or(Error::NotFound("Department"))
}

async fn ensure_user_exists(sdb: &Surreal<Any>, user_id: &RecordId) -> Result<User> {
    let user: Option<User> = sdb.select(user_id.clone()).await?;
    user.ok_or(Error::NotFound("User"))
}

/// HoOC passes outright; a HoD passes only for their own department.
fn require_department_manager(
    membership: Option<EventMember>,
    department_id: &RecordId,
) -> Result<EventMember> {
    let member = membership.require(EventAction::ManageDepartmentMembers)?;
    if member.role == Role::HoD && !is_hod_of(&member, department_id) {
        return Err(Error::Forbidden);
    }
    Ok(member)
}

/// GET /api/events/{event_id}/departments
pub async fn list_departments(
    State(state): State<AppState>,
    UserId(_user_id): UserId,
    Path(event_id): Path<String>,
    Query(query): Query<PageQuery>,
) -> Result<Json<Paginated<Department>>> {
    let event_id = record_id(EVENT_TABLE, &event_id);
    let (page, limit, start) = query.window();
    let search = query.search_term();

    let mut where_clause = String::from("eventId = $event_id");
    if search.is_some() {
        where_clause.push_str(
            " AND (string::contains(string::lowercase(name), $search) \
             OR string::contains(string::lowercase(description), $search))",
        );
    }

    let list_sql = format!(
        "SELECT * FROM type::table($table) WHERE {where_clause} \
         ORDER BY createdAt DESC LIMIT $limit START $start;"
    );
    let count_sql = format!(
        "SELECT count() AS total FROM type::table($table) WHERE {where_clause} GROUP ALL;"
    );

    let mut request = state
        .sdb
        .query(list_sql)
        .query(count_sql)
        .bind(("table", DEPARTMENT_TABLE))
        .bind(("event_id", event_id))
        .bind(("limit", limit))
        .bind(("start", start));
    if let Some(search) = search {
        request = request.bind(("search", search));
    }

    let mut response = request.await?;
    let items = response.take::<Vec<Department>>(0)?;
    let total = response
        .take::<Vec<CountRow>>(1)?
        .into_iter()
        .next()
        .map(|row| row.total)
        .unwrap_or(0);

    Ok(Json(Paginated {
        data: items,
        pagination: Pagination::new(page, limit, total),
    }))
}

/// GET /api/events/{event_id}/departments/{department_id}
pub async fn get_department_detail(
    State(state): State<AppState>,
    UserId(_user_id): UserId,
    Path((event_id, department_id)): Path<(String, String)>,
) -> Result<Json<DataEnvelope<Department>>> {
    let event_id = record_id(EVENT_TABLE, &event_id);
    let department_id = record_id(DEPARTMENT_TABLE, &department_id);
    let department = ensure_department_in_event(&state.sdb, &event_id, &department_id).await?;

    Ok(Json(DataEnvelope::new(department)))
}

#[derive(serde::Deserialize, serde::Serialize, Debug, Clone, validator::Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateDepartmentRequest {
    #[validate(length(min = 1, max = 255))]
    pub name: String,
    pub description: Option<String>,
    pub leader_id: Option<String>,
}

/// POST /api/events/{event_id}/departments (HoOC only).
pub async fn create_department(
    State(state): State<AppState>,
    UserId(user_id): UserId,
    Path(event_id): Path<String>,
    ValidatedJson(input): ValidatedJson<CreateDepartmentRequest>,
) -> Result<(StatusCode, Json<DataEnvelope<Department>>)> {
    let event_id = record_id(EVENT_TABLE, &event_id);
    ensure_event_exists(&state.sdb, &event_id).await?;
    find_membership(&state.sdb, &event_id, &user_id)
        .await?
        .require(EventAction::CreateDepartment)?;

    let department_data = CreateDepartment {
        event_id,
        name: input.name,
        description: input.description.unwrap_or_default(),
        leader_id: input
            .leader_id
            .filter(|id| !id.is_empty())
            .map(|id| record_id(USER_TABLE, &id)),
        created_at: time_now(),
        updated_at: None,
    };
    let department: Option<Department> = state
        .sdb
        .create(DEPARTMENT_TABLE)
        .content(department_data)
        .await?;
    let department = department.ok_or(Error::NotFound("Department"))?;

    Ok((StatusCode::CREATED, Json(DataEnvelope::new(department))))
}

#[derive(serde::Deserialize, serde::Serialize, Debug, Clone, validator::Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateDepartmentRequest {
    #[validate(length(min = 1, max = 255))]
    pub name: Option<String>,
    pub description: Option<String>,
    pub leader_id: Option<String>,
}

impl UpdateDepartmentRequest {
    fn apply_to(&self, department: &mut Department) {
        if let Some(name) = &self.name {
            department.name = name.clone();
        }
        if let Some(description) = &self.description {
            department.description = description.clone();
        }
        // leaderId is replaced wholesale when present and non-empty;
        // absence never clears it.
        if let Some(leader_id) = self.leader_id.as_deref().filter(|id| !id.is_empty()) {
            department.leader_id = Some(record_id(USER_TABLE, leader_id));
        }
    }
}

/// PATCH /api/events/{event_id}/departments/{department_id} (HoOC only).
pub async fn edit_department(
    State(state): State<AppState>,
    UserId(user_id): UserId,
    Path((event_id, department_id)): Path<(String, String)>,
    ValidatedJson(input): ValidatedJson<UpdateDepartmentRequest>,
) -> Result<Json<DataEnvelope<Department>>> {
    let event_id = record_id(EVENT_TABLE, &event_id);
    let department_id = record_id(DEPARTMENT_TABLE, &department_id);
    ensure_event_exists(&state.sdb, &event_id).await?;
    let mut department = ensure_department_in_event(&state.sdb, &event_id, &department_id).await?;
    find_membership(&state.sdb, &event_id, &user_id)
        .await?
        .require(EventAction::EditDepartment)?;

    input.apply_to(&mut department);
    department.updated_at = Some(time_now());
    let department: Option<Department> = state
        .sdb
        .update(department_id)
        .content(department)
        .await?;
    let department = department.ok_or(Error::NotFound("Department"))?;

    Ok(Json(DataEnvelope::new(department)))
}

/// DELETE /api/events/{event_id}/departments/{department_id} (HoOC only).
/// Does not cascade to tasks or member rows.
pub async fn delete_department(
    State(state): State<AppState>,
    UserId(user_id): UserId,
    Path((event_id, department_id)): Path<(String, String)>,
) -> Result<Json<MessageEnvelope>> {
    let event_id = record_id(EVENT_TABLE, &event_id);
    let department_id = record_id(DEPARTMENT_TABLE, &department_id);
    ensure_event_exists(&state.sdb, &event_id).await?;
    ensure_department_in_event(&state.sdb, &event_id, &department_id).await?;
    find_membership(&state.sdb, &event_id, &user_id)
        .await?
        .require(EventAction::DeleteDepartment)?;

    let _: Option<Department> = state.sdb.delete(department_id).await?;

    Ok(Json(MessageEnvelope::new("Department deleted")))
}

#[derive(serde::Deserialize, serde::Serialize, Debug, Clone, validator::Validate)]
#[serde(rename_all = "camelCase")]
pub struct AssignHodRequest {
    #[validate(length(min = 1))]
    pub user_id: String,
}

/// PATCH /api/events/{event_id}/departments/{department_id}/assign-hod (HoOC only). Three writes, in order: department leader, new leader's
/// membership, previous leader's demotion to staff. No rollback on partial
/// failure; the ordering is the contract.
pub async fn assign_hod(
    State(state): State<AppState>,
    UserId(user_id): UserId,
    Path((event_id, department_id)): Path<(String, String)>,
    ValidatedJson(input): ValidatedJson<AssignHodRequest>,
) -> Result<Json<DataEnvelope<Department>>> {
    let event_id = record_id(EVENT_TABLE, &event_id);
    let department_id = record_id(DEPARTMENT_TABLE, &department_id);
    ensure_event_exists(&state.sdb, &event_id).await?;
    let mut department = ensure_department_in_event(&state.sdb, &event_id, &department_id).await?;
    find_membership(&state.sdb, &event_id, &user_id)
        .await?
        .require(EventAction::AssignHod)?;

    let target_id = record_id(USER_TABLE, &input.user_id);
    ensure_user_exists(&state.sdb, &target_id).await?;

    let previous_leader = department.leader_id.clone();

    department.leader_id = Some(target_id.clone());
    department.updated_at = Some(time_now());
    let updated: Option<Department> = state
        .sdb
        .update(department_id.clone())
        .content(department)
        .await?;
    let department = updated.ok_or(Error::NotFound("Department"))?;

    upsert_membership(
        &state.sdb,
        &event_id,
        &target_id,
        Role::HoD,
        Some(department_id.clone()),
    )
    .await?;

    if let Some(previous) = previous_leader {
        if previous != target_id {
            upsert_membership(
                &state.sdb,
                &event_id,
                &previous,
                Role::Staff,
                Some(department_id),
            )
            .await?;
        }
    }

    Ok(Json(DataEnvelope::new(department)))
}

#[derive(serde::Deserialize, serde::Serialize, Debug, Clone, validator::Validate)]
#[serde(rename_all = "camelCase")]
pub struct AddMemberRequest {
    #[validate(length(min = 1))]
    pub user_id: String,
}

/// POST /api/events/{event_id}/departments/{department_id}/members
/// (HoOC, or the HoD of this department).
pub async fn add_member_to_department(
    State(state): State<AppState>,
    UserId(user_id): UserId,
    Path((event_id, department_id)): Path<(String, String)>,
    ValidatedJson(input): ValidatedJson<AddMemberRequest>,
) -> Result<Json<DataEnvelope<EventMember>>> {
    let event_id = record_id(EVENT_TABLE, &event_id);
    let department_id = record_id(DEPARTMENT_TABLE, &department_id);
    ensure_event_exists(&state.sdb, &event_id).await?;
    ensure_department_in_event(&state.sdb, &event_id, &department_id).await?;

    let requester = find_membership(&state.sdb, &event_id, &user_id).await?;
    require_department_manager(requester, &department_id)?;

    let target_id = record_id(USER_TABLE, &input.user_id);
    ensure_user_exists(&state.sdb, &target_id).await?;

    let target_membership = find_membership(&state.sdb, &event_id, &target_id).await?;
    let role = match &target_membership {
        Some(m) if m.role == Role::HoOC => {
            return Err(Error::Conflict("Cannot move HoOC into a department"));
        }
        Some(m) if m.role == Role::HoD && m.department_id.as_ref() != Some(&department_id) => {
            return Err(Error::Conflict("User is HoD of another department"));
        }
        Some(m) if m.role == Role::HoD => Role::HoD,
        _ => Role::Staff,
    };

    let membership = upsert_membership(
        &state.sdb,
        &event_id,
        &target_id,
        role,
        Some(department_id),
    )
    .await?;

    Ok(Json(DataEnvelope::new(membership)))
}

/// DELETE /api/events/{event_id}/departments/{department_id}/members/{user_id} (HoOC,
/// or the HoD of this department). Clears the departmentId only;
/// the role is left unchanged.
pub async fn remove_member_from_department(
    State(state): State<AppState>,
    UserId(user_id): UserId,
    Path((event_id, department_id, member_user_id)): Path<(String, String, String)>,
) -> Result<Json<MessageEnvelope>> {
    let event_id = record_id(EVENT_TABLE, &event_id);
    let department_id = record_id(DEPARTMENT_TABLE, &department_id);
    ensure_event_exists(&state.sdb, &event_id).await?;
    ensure_department_in_event(&state.sdb, &event_id, &department_id).await?;

    let requester = find_membership(&state.sdb, &event_id, &user_id).await?;
    require_department_manager(requester, &department_id)?;

    let target_id = record_id(USER_TABLE, &member_user_id);
    let target_membership = find_membership(&state.sdb, &event_id, &target_id).await?;
    let mut target_membership = match target_membership {
        Some(m) if m.department_id.as_ref() == Some(&department_id) => m,
        _ => return Err(Error::NotFound("Department member")),
    };

    if target_membership.role == Role::HoOC {
        return Err(Error::Conflict("Cannot remove HoOC from department"));
    }
    if target_membership.role == Role::HoD {
        return Err(Error::Conflict(
            "Unassign HoD before removing from department",
        ));
    }

    target_membership.department_id = None;
    let _: Option<EventMember> = state
        .sdb
        .update(target_membership.id.clone())
        .content(target_membership)
        .await?;

    Ok(Json(MessageEnvelope::new("Member removed from department")))
}
