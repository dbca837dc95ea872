use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use surrealdb::RecordId;

use crate::{
    consts::db_const::EVENT_TABLE,
    errors::{Error, Result},
    membership::{delete_event_memberships, find_membership, memberships_for_user, upsert_membership},
    middleware::UserId,
    models::{
        event::{CreateEvent, Event, EventStatus, EventVisibility},
        event_member::{EventMember, Role},
        permission::{EventAction, RequireAction},
    },
    state::AppState,
    utils::{
        join_code::generate_join_code,
        pagination::{CountRow, PageQuery, Pagination},
        record_id::record_id,
        respond::{DataEnvelope, MessageEnvelope, Paginated},
        time::time_now,
        validated_json::ValidatedJson,
    },
};

/// Event as exposed on unauthenticated endpoints: everything but the join
/// code.
#[derive(serde::Serialize, serde::Deserialize, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct PublicEvent {
    pub id: RecordId,
    pub name: String,
    pub description: String,
    pub event_date: String,
    pub location: String,
    pub visibility: EventVisibility,
    pub organizer_name: String,
    pub status: EventStatus,
    pub images: Vec<String>,
    pub created_at: String,
    pub updated_at: Option<String>,
}

/// GET /api/events/public
pub async fn list_public_events(
    State(state): State<AppState>,
    Query(query): Query<PageQuery>,
) -> Result<Json<Paginated<PublicEvent>>> {
    let (page, limit, start) = query.window();
    let status = query
        .status
        .as_deref()
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string);
    let search = query.search_term();

    let mut where_clause = String::from("visibility = 'public'");
    if status.is_some() {
        where_clause.push_str(" AND status = $status");
    }
    if search.is_some() {
        where_clause.push_str(
            " AND (string::contains(string::lowercase(name), $search) \
             OR string::contains(string::lowercase(description), $search))",
        );
    }

    let list_sql = format!(
        "SELECT * OMIT joinCode FROM type::table($table) WHERE {where_clause} \
         ORDER BY eventDate ASC, createdAt DESC LIMIT $limit START $start;"
    );
    let count_sql = format!(
        "SELECT count() AS total FROM type::table($table) WHERE {where_clause} GROUP ALL;"
    );

    let mut request = state
        .sdb
        .query(list_sql)
        .query(count_sql)
        .bind(("table", EVENT_TABLE))
        .bind(("limit", limit))
        .bind(("start", start));
    if let Some(status) = status {
        request = request.bind(("status", status));
    }
    if let Some(search) = search {
        request = request.bind(("search", search));
    }

    let mut response = request.await?;
    let items = response.take::<Vec<PublicEvent>>(0)?;
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

/// GET /api/events/{event_id}, public events only.
pub async fn get_public_event_detail(
    State(state): State<AppState>,
    Path(event_id): Path<String>,
) -> Result<Json<DataEnvelope<PublicEvent>>> {
    let event_id = record_id(EVENT_TABLE, &event_id);
    let event = state
        .sdb
        .query("SELECT * OMIT joinCode FROM type::table($table) WHERE id = $id AND visibility = 'public';")
        .bind(("table", EVENT_TABLE))
        .bind(("id", event_id))
        .await?
        .take::<Vec<PublicEvent>>(0)?
        .into_iter()
        .next()
        .ok_or(Error::NotFound("Event"))?;

    Ok(Json(DataEnvelope::new(event)))
}

/// GET /api/events/detail/{event_id}, any visibility; private events
/// require membership.
pub async fn get_event_detail(
    State(state): State<AppState>,
    UserId(user_id): UserId,
    Path(event_id): Path<String>,
) -> Result<Json<DataEnvelope<Event>>> {
    let event_id = record_id(EVENT_TABLE, &event_id);
    let event: Option<Event> = state.sdb.select(event_id.clone()).await?;
    let event = event.ok_or(Error::NotFound("Event"))?;

    if event.visibility == EventVisibility::Private {
        let membership = find_membership(&state.sdb, &event_id, &user_id).await?;
        if membership.is_none() {
            return Err(Error::Forbidden);
        }
    }

    Ok(Json(DataEnvelope::new(event)))
}

#[derive(serde::Deserialize, serde::Serialize, Debug, Clone, validator::Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateEventRequest {
    #[validate(length(min = 1, max = 255))]
    pub name: String,
    #[validate(length(min = 1, max = 255))]
    pub organizer_name: String,
    pub description: Option<String>,
    pub event_date: Option<String>,
    pub location: Option<String>,
    pub visibility: Option<EventVisibility>,
    pub images: Option<Vec<String>>,
}

#[derive(serde::Serialize, serde::Deserialize, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct CreatedEvent {
    pub id: RecordId,
    pub join_code: String,
}

fn is_image_ref(value: &str) -> bool {
    value.starts_with("http://")
        || value.starts_with("https://")
        || value.starts_with("data:image/")
}

/// POST /api/events, any authenticated user; the creator becomes HoOC.
pub async fn create_event(
    State(state): State<AppState>,
    UserId(user_id): UserId,
    ValidatedJson(input): ValidatedJson<CreateEventRequest>,
) -> Result<(StatusCode, Json<DataEnvelope<CreatedEvent>>)> {
    let join_code = generate_join_code(&state.sdb).await?;

    let images = input
        .images
        .unwrap_or_default()
        .into_iter()
        .filter(|img| is_image_ref(img))
        .collect();

    let event_data = CreateEvent {
        name: input.name,
        description: input.description.unwrap_or_default(),
        event_date: input.event_date.unwrap_or_else(time_now),
        location: input.location.unwrap_or_default(),
        visibility: input.visibility.unwrap_or(EventVisibility::Private),
        organizer_name: input.organizer_name,
        join_code: join_code.clone(),
        status: EventStatus::Scheduled,
        images,
        created_at: time_now(),
        updated_at: None,
    };
    let event: Option<Event> = state.sdb.create(EVENT_TABLE).content(event_data).await?;
    let event = event.ok_or(Error::NotFound("Event"))?;

    upsert_membership(&state.sdb, &event.id, &user_id, Role::HoOC, None).await?;

    Ok((
        StatusCode::CREATED,
        Json(DataEnvelope::new(CreatedEvent {
            id: event.id,
            join_code,
        })),
    ))
}

#[derive(serde::Deserialize, serde::Serialize, Debug, Clone, validator::Validate)]
pub struct JoinEventRequest {
    #[validate(length(min = 1))]
    pub code: String,
}

#[derive(serde::Serialize, serde::Deserialize, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct JoinedEvent {
    pub event_id: RecordId,
}

/// POST /api/events/join. Idempotent: an existing membership is left
/// untouched, whatever its role.
pub async fn join_event_by_code(
    State(state): State<AppState>,
    UserId(user_id): UserId,
    ValidatedJson(input): ValidatedJson<JoinEventRequest>,
) -> Result<Json<DataEnvelope<JoinedEvent>>> {
    let event = state
        .sdb
        .query("SELECT * FROM type::table($table) WHERE joinCode = $code;")
        .bind(("table", EVENT_TABLE))
        .bind(("code", input.code))
        .await?
        .take::<Vec<Event>>(0)?
        .into_iter()
        .next()
        .ok_or(Error::NotFound("Event"))?;

    let existing = find_membership(&state.sdb, &event.id, &user_id).await?;
    if existing.is_none() {
        upsert_membership(&state.sdb, &event.id, &user_id, Role::Member, None).await?;
    }

    Ok(Json(DataEnvelope::new(JoinedEvent { event_id: event.id })))
}

#[derive(serde::Serialize, serde::Deserialize, Debug, Clone)]
pub struct EventSummary {
    pub event: Event,
    pub members: Vec<EventMember>,
}

/// GET /api/events/{event_id}/summary
pub async fn get_event_summary(
    State(state): State<AppState>,
    UserId(_user_id): UserId,
    Path(event_id): Path<String>,
) -> Result<Json<DataEnvelope<EventSummary>>> {
    let event_id = record_id(EVENT_TABLE, &event_id);
    let event: Option<Event> = state.sdb.select(event_id.clone()).await?;
    let event = event.ok_or(Error::NotFound("Event"))?;

    let members = crate::membership::memberships_for_event(&state.sdb, &event_id).await?;

    Ok(Json(DataEnvelope::new(EventSummary { event, members })))
}

#[derive(serde::Serialize, serde::Deserialize, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct MembershipSummary {
    pub id: RecordId,
    pub user_id: RecordId,
    pub role: Role,
}

#[derive(serde::Serialize, serde::Deserialize, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct MyEvent {
    #[serde(flatten)]
    pub event: Event,
    pub event_member: Option<MembershipSummary>,
}

/// GET /api/events/me/list lists events the requester belongs to, with the
/// requester's membership attached.
pub async fn list_my_events(
    State(state): State<AppState>,
    UserId(user_id): UserId,
) -> Result<Json<DataEnvelope<Vec<MyEvent>>>> {
    let memberships = memberships_for_user(&state.sdb, &user_id).await?;
    if memberships.is_empty() {
        return Ok(Json(DataEnvelope::new(Vec::new())));
    }

    let event_ids: Vec<RecordId> = memberships.iter().map(|m| m.event_id.clone()).collect();
    let events = state
        .sdb
        .query("SELECT * FROM type::table($table) WHERE id INSIDE $ids;")
        .bind(("table", EVENT_TABLE))
        .bind(("ids", event_ids))
        .await?
        .take::<Vec<Event>>(0)?;

    let data = events
        .into_iter()
        .map(|event| {
            let event_member = memberships
                .iter()
                .find(|m| m.event_id == event.id)
                .map(|m| MembershipSummary {
                    id: m.id.clone(),
                    user_id: m.user_id.clone(),
                    role: m.role,
                });
            MyEvent {
                event,
                event_member,
            }
        })
        .collect();

    Ok(Json(DataEnvelope::new(data)))
}

#[derive(serde::Deserialize, serde::Serialize, Debug, Clone, validator::Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateEventRequest {
    #[validate(length(min = 1, max = 255))]
    pub name: Option<String>,
    pub description: Option<String>,
    #[validate(length(min = 1, max = 255))]
    pub organizer_name: Option<String>,
    pub event_date: Option<String>,
    pub location: Option<String>,
    pub visibility: Option<EventVisibility>,
    pub status: Option<EventStatus>,
}

impl UpdateEventRequest {
    fn apply_to(&self, event: &mut Event) {
        if let Some(name) = &self.name {
            event.name = name.clone();
        }
        if let Some(description) = &self.description {
            event.description = description.clone();
        }
        if let Some(organizer_name) = &self.organizer_name {
            event.organizer_name = organizer_name.clone();
        }
        if let Some(event_date) = &self.event_date {
            event.event_date = event_date.clone();
        }
        if let Some(location) = &self.location {
            event.location = location.clone();
        }
        if let Some(visibility) = &self.visibility {
            event.visibility = *visibility;
        }
        if let Some(status) = &self.status {
            event.status = *status;
        }
    }
}

/// PATCH /api/events/{event_id} (HoOC only).
pub async fn update_event(
    State(state): State<AppState>,
    UserId(user_id): UserId,
    Path(event_id): Path<String>,
    ValidatedJson(input): ValidatedJson<UpdateEventRequest>,
) -> Result<Json<DataEnvelope<Event>>> {
    let event_id = record_id(EVENT_TABLE, &event_id);
    find_membership(&state.sdb, &event_id, &user_id)
        .await?
        .require(EventAction::UpdateEvent)?;

    let event: Option<Event> = state.sdb.select(event_id.clone()).await?;
    let mut event = event.ok_or(Error::NotFound("Event"))?;

    input.apply_to(&mut event);
    event.updated_at = Some(time_now());
    let event: Option<Event> = state.sdb.update(event_id).content(event).await?;
    let event = event.ok_or(Error::NotFound("Event"))?;

    Ok(Json(DataEnvelope::new(event)))
}

/// DELETE /api/events/{event_id} (HoOC only). Memberships go first, then
/// the event row; that ordering is the contract.
pub async fn delete_event(
    State(state): State<AppState>,
    UserId(user_id): UserId,
    Path(event_id): Path<String>,
) -> Result<Json<MessageEnvelope>> {
    let event_id = record_id(EVENT_TABLE, &event_id);
    find_membership(&state.sdb, &event_id, &user_id)
        .await?
        .require(EventAction::DeleteEvent)?;

    let event: Option<Event> = state.sdb.select(event_id.clone()).await?;
    if event.is_none() {
        return Err(Error::NotFound("Event"));
    }

    delete_event_memberships(&state.sdb, &event_id).await?;
    let _: Option<Event> = state.sdb.delete(event_id).await?;

    Ok(Json(MessageEnvelope::new("Event deleted")))
}

#[derive(serde::Deserialize, serde::Serialize, Debug, Clone, validator::Validate)]
pub struct ImagesPayload {
    pub images: Vec<String>,
}

#[derive(serde::Serialize, serde::Deserialize, Debug, Clone)]
pub struct ImagesView {
    pub images: Vec<String>,
}

async fn gated_event_for_images(
    state: &AppState,
    event_id: &RecordId,
    user_id: &RecordId,
) -> Result<Event> {
    find_membership(&state.sdb, event_id, user_id)
        .await?
        .require(EventAction::ManageEventImages)?;
    let event: Option<Event> = state.sdb.select(event_id.clone()).await?;
    event.ok_or(Error::NotFound("Event"))
}

/// PATCH /api/events/{event_id}/images overwrites the whole list.
pub async fn replace_event_images(
    State(state): State<AppState>,
    UserId(user_id): UserId,
    Path(event_id): Path<String>,
    ValidatedJson(input): ValidatedJson<ImagesPayload>,
) -> Result<Json<DataEnvelope<ImagesView>>> {
    let event_id = record_id(EVENT_TABLE, &event_id);
    let mut event = gated_event_for_images(&state, &event_id, &user_id).await?;

    event.images = input.images.into_iter().filter(|s| !s.is_empty()).collect();
    event.updated_at = Some(time_now());
    let event: Option<Event> = state.sdb.update(event_id).content(event).await?;
    let event = event.ok_or(Error::NotFound("Event"))?;

    Ok(Json(DataEnvelope::new(ImagesView {
        images: event.images,
    })))
}

/// POST /api/events/{event_id}/images appends a batch.
pub async fn add_event_images(
    State(state): State<AppState>,
    UserId(user_id): UserId,
    Path(event_id): Path<String>,
    ValidatedJson(input): ValidatedJson<ImagesPayload>,
) -> Result<Json<DataEnvelope<ImagesView>>> {
    if input.images.is_empty() {
        return Err(Error::BadRequest("images is required"));
    }

    let event_id = record_id(EVENT_TABLE, &event_id);
    let mut event = gated_event_for_images(&state, &event_id, &user_id).await?;

    event
        .images
        .extend(input.images.into_iter().filter(|s| !s.is_empty()));
    event.updated_at = Some(time_now());
    let event: Option<Event> = state.sdb.update(event_id).content(event).await?;
    let event = event.ok_or(Error::NotFound("Event"))?;

    Ok(Json(DataEnvelope::new(ImagesView {
        images: event.images,
    })))
}

#[derive(serde::Deserialize, serde::Serialize, Debug, Clone, validator::Validate)]
pub struct ImageIndexesPayload {
    pub indexes: Vec<usize>,
}

/// DELETE /api/events/{event_id}/images removes by position.
pub async fn remove_event_images(
    State(state): State<AppState>,
    UserId(user_id): UserId,
    Path(event_id): Path<String>,
    ValidatedJson(input): ValidatedJson<ImageIndexesPayload>,
) -> Result<Json<DataEnvelope<ImagesView>>> {
    let event_id = record_id(EVENT_TABLE, &event_id);
    let mut event = gated_event_for_images(&state, &event_id, &user_id).await?;

    event.images = event
        .images
        .into_iter()
        .enumerate()
        .filter(|(idx, _)| !input.indexes.contains(idx))
        .map(|(_, img)| img)
        .collect();
    event.updated_at = Some(time_now());
    let event: Option<Event> = state.sdb.update(event_id).content(event).await?;
    let event = event.ok_or(Error::NotFound("Event"))?;

    Ok(Json(DataEnvelope::new(ImagesView {
        images: event.images,
    })))
}
