use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use surrealdb::{engine::any::Any, RecordId, Surreal};

use crate::{
    consts::db_const::{DEPARTMENT_TABLE, EVENT_TABLE, MILESTONE_TABLE, TASK_TABLE, USER_TABLE},
    errors::{Error, Result},
    membership::find_membership,
    middleware::UserId,
    models::{
        permission::{EventAction, RequireAction},
        task::{CreateTask, StatusCount, Task, TaskStatus},
    },
    state::AppState,
    utils::{
        pagination::PageQuery,
        record_id::record_id,
        respond::{DataEnvelope, MessageEnvelope},
        time::time_now,
        validated_json::ValidatedJson,
    },
};

async fn find_task_in_event(
    sdb: &Surreal<Any>,
    event_id: &RecordId,
    task_id: &RecordId,
) -> Result<Task> {
    sdb.query("SELECT * FROM type::table($table) WHERE id = $id AND eventId = $event_id;")
        .bind(("table", TASK_TABLE))
        .bind(("id", task_id.clone()))
        .bind(("event_id", event_id.clone()))
        .await?
        .take::<Vec<Task>>(0)?
        .into_iter()
        .next()
        .ok_or(Error::NotFound("Task"))
}

/// GET /api/events/{event_id}/tasks (HoOC/HoD/staff). Optional filters:
/// departmentId, search (title), status.
pub async fn list_tasks(
    State(state): State<AppState>,
    UserId(user_id): UserId,
    Path(event_id): Path<String>,
    Query(query): Query<PageQuery>,
) -> Result<Json<DataEnvelope<Vec<Task>>>> {
    let event_id = record_id(EVENT_TABLE, &event_id);
    find_membership(&state.sdb, &event_id, &user_id)
        .await?
        .require(EventAction::ViewTasks)?;

    let department_id = query
        .department_id
        .as_deref()
        .filter(|s| !s.is_empty())
        .map(|id| record_id(DEPARTMENT_TABLE, id));
    let search = query.search_term();
    let status = query
        .status
        .as_deref()
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string);

    let mut where_clause = String::from("eventId = $event_id");
    if department_id.is_some() {
        where_clause.push_str(" AND departmentId = $department_id");
    }
    if search.is_some() {
        where_clause.push_str(" AND string::contains(string::lowercase(title), $search)");
    }
    if status.is_some() {
        where_clause.push_str(" AND status = $status");
    }

    let sql = format!(
        "SELECT * FROM type::table($table) WHERE {where_clause} ORDER BY createdAt DESC;"
    );
    let mut request = state
        .sdb
        .query(sql)
        .bind(("table", TASK_TABLE))
        .bind(("event_id", event_id));
    if let Some(department_id) = department_id {
        request = request.bind(("department_id", department_id));
    }
    if let Some(search) = search {
        request = request.bind(("search", search));
    }
    if let Some(status) = status {
        request = request.bind(("status", status));
    }

    let tasks = request.await?.take::<Vec<Task>>(0)?;

    Ok(Json(DataEnvelope::new(tasks)))
}

/// GET /api/events/{event_id}/tasks/{task_id} (HoOC/HoD/staff).
pub async fn get_task_detail(
    State(state): State<AppState>,
    UserId(user_id): UserId,
    Path((event_id, task_id)): Path<(String, String)>,
) -> Result<Json<DataEnvelope<Task>>> {
    let event_id = record_id(EVENT_TABLE, &event_id);
    let task_id = record_id(TASK_TABLE, &task_id);
    find_membership(&state.sdb, &event_id, &user_id)
        .await?
        .require(EventAction::ViewTasks)?;

    let task = find_task_in_event(&state.sdb, &event_id, &task_id).await?;

    Ok(Json(DataEnvelope::new(task)))
}

#[derive(serde::Deserialize, serde::Serialize, Debug, Clone, validator::Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateTaskRequest {
    #[validate(length(min = 1, max = 255))]
    pub title: String,
    pub description: Option<String>,
    pub department_id: Option<String>,
    pub assignee_id: Option<String>,
    pub due_date: Option<String>,
    pub estimate: Option<f64>,
    pub estimate_unit: Option<String>,
    pub milestone_id: Option<String>,
    pub parent_id: Option<String>,
    pub dependencies: Option<Vec<String>>,
}

/// POST /api/events/{event_id}/tasks (HoD only).
pub async fn create_task(
    State(state): State<AppState>,
    UserId(user_id): UserId,
    Path(event_id): Path<String>,
    ValidatedJson(input): ValidatedJson<CreateTaskRequest>,
) -> Result<(StatusCode, Json<DataEnvelope<Task>>)> {
    let event_id = record_id(EVENT_TABLE, &event_id);
    find_membership(&state.sdb, &event_id, &user_id)
        .await?
        .require(EventAction::CreateTask)?;

    let department_id = input
        .department_id
        .as_deref()
        .filter(|s| !s.is_empty())
        .ok_or(Error::BadRequest("departmentId is required"))?;

    let task_data = CreateTask {
        event_id,
        department_id: record_id(DEPARTMENT_TABLE, department_id),
        title: input.title,
        description: input.description.unwrap_or_default(),
        assignee_id: input
            .assignee_id
            .filter(|s| !s.is_empty())
            .map(|id| record_id(USER_TABLE, &id)),
        due_date: input.due_date,
        estimate: input.estimate,
        estimate_unit: input.estimate_unit,
        progress_pct: 0.0,
        status: TaskStatus::Todo,
        milestone_id: input
            .milestone_id
            .filter(|s| !s.is_empty())
            .map(|id| record_id(MILESTONE_TABLE, &id)),
        parent_id: input
            .parent_id
            .filter(|s| !s.is_empty())
            .map(|id| record_id(TASK_TABLE, &id)),
        dependencies: input
            .dependencies
            .unwrap_or_default()
            .iter()
            .map(|id| record_id(TASK_TABLE, id))
            .collect(),
        created_at: time_now(),
        updated_at: None,
    };
    let task: Option<Task> = state.sdb.create(TASK_TABLE).content(task_data).await?;
    let task = task.ok_or(Error::NotFound("Task"))?;

    Ok((StatusCode::CREATED, Json(DataEnvelope::new(task))))
}

#[derive(serde::Deserialize, serde::Serialize, Debug, Clone, validator::Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateTaskRequest {
    #[validate(length(min = 1, max = 255))]
    pub title: Option<String>,
    pub description: Option<String>,
    pub due_date: Option<String>,
    pub estimate: Option<f64>,
    pub estimate_unit: Option<String>,
    pub status: Option<TaskStatus>,
    pub progress_pct: Option<f64>,
    pub milestone_id: Option<String>,
    pub parent_id: Option<String>,
    pub dependencies: Option<Vec<String>>,
}

impl UpdateTaskRequest {
    fn apply_to(&self, task: &mut Task) {
        if let Some(title) = &self.title {
            task.title = title.clone();
        }
        if let Some(description) = &self.description {
            task.description = description.clone();
        }
        if let Some(due_date) = &self.due_date {
            task.due_date = Some(due_date.clone());
        }
        if let Some(estimate) = self.estimate {
            task.estimate = Some(estimate);
        }
        if let Some(estimate_unit) = &self.estimate_unit {
            task.estimate_unit = Some(estimate_unit.clone());
        }
        if let Some(status) = self.status {
            task.status = status;
        }
        if let Some(progress_pct) = self.progress_pct {
            task.progress_pct = progress_pct;
        }
        if let Some(milestone_id) = self.milestone_id.as_deref().filter(|s| !s.is_empty()) {
            task.milestone_id = Some(record_id(MILESTONE_TABLE, milestone_id));
        }
        if let Some(parent_id) = self.parent_id.as_deref().filter(|s| !s.is_empty()) {
            task.parent_id = Some(record_id(TASK_TABLE, parent_id));
        }
        if let Some(dependencies) = &self.dependencies {
            task.dependencies = dependencies
                .iter()
                .map(|id| record_id(TASK_TABLE, id))
                .collect();
        }
    }
}

/// PATCH /api/events/{event_id}/tasks/{task_id} (HoD only).
pub async fn edit_task(
    State(state): State<AppState>,
    UserId(user_id): UserId,
    Path((event_id, task_id)): Path<(String, String)>,
    ValidatedJson(input): ValidatedJson<UpdateTaskRequest>,
) -> Result<Json<DataEnvelope<Task>>> {
    let event_id = record_id(EVENT_TABLE, &event_id);
    let task_id = record_id(TASK_TABLE, &task_id);
    find_membership(&state.sdb, &event_id, &user_id)
        .await?
        .require(EventAction::EditTask)?;

    let mut task = find_task_in_event(&state.sdb, &event_id, &task_id).await?;
    input.apply_to(&mut task);
    task.updated_at = Some(time_now());
    let task: Option<Task> = state.sdb.update(task_id).content(task).await?;
    let task = task.ok_or(Error::NotFound("Task"))?;

    Ok(Json(DataEnvelope::new(task)))
}

/// DELETE /api/events/{event_id}/tasks/{task_id} (HoD only).
pub async fn delete_task(
    State(state): State<AppState>,
    UserId(user_id): UserId,
    Path((event_id, task_id)): Path<(String, String)>,
) -> Result<Json<MessageEnvelope>> {
    let event_id = record_id(EVENT_TABLE, &event_id);
    let task_id = record_id(TASK_TABLE, &task_id);
    find_membership(&state.sdb, &event_id, &user_id)
        .await?
        .require(EventAction::DeleteTask)?;

    find_task_in_event(&state.sdb, &event_id, &task_id).await?;
    let _: Option<Task> = state.sdb.delete(task_id).await?;

    Ok(Json(MessageEnvelope::new("Task deleted")))
}

#[derive(serde::Deserialize, serde::Serialize, Debug, Clone, validator::Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateProgressRequest {
    pub progress_pct: Option<f64>,
    pub status: Option<TaskStatus>,
}

/// PATCH /api/events/{event_id}/tasks/{task_id}/progress (staff role), AND
/// the requester must be the task's assignee. No HoOC/HoD override.
pub async fn update_task_progress(
    State(state): State<AppState>,
    UserId(user_id): UserId,
    Path((event_id, task_id)): Path<(String, String)>,
    ValidatedJson(input): ValidatedJson<UpdateProgressRequest>,
) -> Result<Json<DataEnvelope<Task>>> {
    let event_id = record_id(EVENT_TABLE, &event_id);
    let task_id = record_id(TASK_TABLE, &task_id);
    find_membership(&state.sdb, &event_id, &user_id)
        .await?
        .require(EventAction::UpdateTaskProgress)?;

    let mut task = find_task_in_event(&state.sdb, &event_id, &task_id).await?;
    if task.assignee_id.as_ref() != Some(&user_id) {
        return Err(Error::Forbidden);
    }

    if let Some(progress_pct) = input.progress_pct {
        task.progress_pct = progress_pct;
    }
    if let Some(status) = input.status {
        task.status = status;
    }
    task.updated_at = Some(time_now());
    let task: Option<Task> = state.sdb.update(task_id).content(task).await?;
    let task = task.ok_or(Error::NotFound("Task"))?;

    Ok(Json(DataEnvelope::new(task)))
}

#[derive(serde::Deserialize, serde::Serialize, Debug, Clone, validator::Validate)]
#[serde(rename_all = "camelCase")]
pub struct AssignTaskRequest {
    #[validate(length(min = 1))]
    pub assignee_id: String,
}

/// PATCH /api/events/{event_id}/tasks/{task_id}/assign (HoD only). The
/// assignee is not validated against the event or department.
pub async fn assign_task(
    State(state): State<AppState>,
    UserId(user_id): UserId,
    Path((event_id, task_id)): Path<(String, String)>,
    ValidatedJson(input): ValidatedJson<AssignTaskRequest>,
) -> Result<Json<DataEnvelope<Task>>> {
    let event_id = record_id(EVENT_TABLE, &event_id);
    let task_id = record_id(TASK_TABLE, &task_id);
    find_membership(&state.sdb, &event_id, &user_id)
        .await?
        .require(EventAction::AssignTask)?;

    let mut task = find_task_in_event(&state.sdb, &event_id, &task_id).await?;
    task.assignee_id = Some(record_id(USER_TABLE, &input.assignee_id));
    task.updated_at = Some(time_now());
    let task: Option<Task> = state.sdb.update(task_id).content(task).await?;
    let task = task.ok_or(Error::NotFound("Task"))?;

    Ok(Json(DataEnvelope::new(task)))
}

/// PATCH /api/events/{event_id}/tasks/{task_id}/unassign (HoD only).
pub async fn unassign_task(
    State(state): State<AppState>,
    UserId(user_id): UserId,
    Path((event_id, task_id)): Path<(String, String)>,
) -> Result<Json<DataEnvelope<Task>>> {
    let event_id = record_id(EVENT_TABLE, &event_id);
    let task_id = record_id(TASK_TABLE, &task_id);
    find_membership(&state.sdb, &event_id, &user_id)
        .await?
        .require(EventAction::AssignTask)?;

    let mut task = find_task_in_event(&state.sdb, &event_id, &task_id).await?;
    task.assignee_id = None;
    task.updated_at = Some(time_now());
    let task: Option<Task> = state.sdb.update(task_id).content(task).await?;
    let task = task.ok_or(Error::NotFound("Task"))?;

    Ok(Json(DataEnvelope::new(task)))
}

/// GET /api/events/{event_id}/tasks/progress (HoOC/HoD). Counts grouped by
/// status for chart consumption.
pub async fn task_progress_chart(
    State(state): State<AppState>,
    UserId(user_id): UserId,
    Path(event_id): Path<String>,
) -> Result<Json<DataEnvelope<Vec<StatusCount>>>> {
    let event_id = record_id(EVENT_TABLE, &event_id);
    find_membership(&state.sdb, &event_id, &user_id)
        .await?
        .require(EventAction::ViewProgressChart)?;

    let stats = state
        .sdb
        .query(
            "SELECT status, count() AS count FROM type::table($table) \
             WHERE eventId = $event_id GROUP BY status;",
        )
        .bind(("table", TASK_TABLE))
        .bind(("event_id", event_id))
        .await?
        .take::<Vec<StatusCount>>(0)?;

    Ok(Json(DataEnvelope::new(stats)))
}
