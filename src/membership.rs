//! Membership registry: every read and write of the (event, user) → role
//! binding goes through here, which is what keeps the one-row-per-pair
//! invariant intact.

use surrealdb::{engine::any::Any, RecordId, Surreal};

use crate::consts::db_const::EVENT_MEMBER_TABLE;
use crate::errors::Result;
use crate::models::event_member::{CreateEventMember, EventMember, Role};
use crate::utils::time::time_now;

/// Compound-key lookup. Absence means the user has no standing in the event.
pub async fn find_membership(
    sdb: &Surreal<Any>,
    event_id: &RecordId,
    user_id: &RecordId,
) -> Result<Option<EventMember>> {
    let rows = sdb
        .query("SELECT * FROM type::table($table) WHERE eventId = $event_id AND userId = $user_id;")
        .bind(("table", EVENT_MEMBER_TABLE))
        .bind(("event_id", event_id.clone()))
        .bind(("user_id", user_id.clone()))
        .await?
        .take::<Vec<EventMember>>(0)?;
    Ok(rows.into_iter().next())
}

/// Sets role/department for the pair, creating the row when absent. The
/// existing row is updated in place so the pair never duplicates.
pub async fn upsert_membership(
    sdb: &Surreal<Any>,
    event_id: &RecordId,
    user_id: &RecordId,
    role: Role,
    department_id: Option<RecordId>,
) -> Result<EventMember> {
    if let Some(mut existing) = find_membership(sdb, event_id, user_id).await? {
        existing.role = role;
        existing.department_id = department_id;
        let updated: Option<EventMember> = sdb
            .update(existing.id.clone())
            .content(existing.clone())
            .await?;
        return Ok(updated.unwrap_or(existing));
    }

    let data = CreateEventMember {
        event_id: event_id.clone(),
        user_id: user_id.clone(),
        role,
        department_id,
        created_at: time_now(),
    };
    let created: Option<EventMember> = sdb.create(EVENT_MEMBER_TABLE).content(data).await?;
    created.ok_or(crate::errors::Error::NotFound("Membership"))
}

/// Cascade helper for event deletion; runs before the event row is removed.
pub async fn delete_event_memberships(sdb: &Surreal<Any>, event_id: &RecordId) -> Result<()> {
    sdb.query("DELETE type::table($table) WHERE eventId = $event_id;")
        .bind(("table", EVENT_MEMBER_TABLE))
        .bind(("event_id", event_id.clone()))
        .await?;
    Ok(())
}

pub async fn memberships_for_event(
    sdb: &Surreal<Any>,
    event_id: &RecordId,
) -> Result<Vec<EventMember>> {
    let rows = sdb
        .query("SELECT * FROM type::table($table) WHERE eventId = $event_id;")
        .bind(("table", EVENT_MEMBER_TABLE))
        .bind(("event_id", event_id.clone()))
        .await?
        .take::<Vec<EventMember>>(0)?;
    Ok(rows)
}

pub async fn memberships_for_user(
    sdb: &Surreal<Any>,
    user_id: &RecordId,
) -> Result<Vec<EventMember>> {
    let rows = sdb
        .query(
            "SELECT * FROM type::table($table) WHERE userId = $user_id ORDER BY createdAt DESC;",
        )
        .bind(("table", EVENT_MEMBER_TABLE))
        .bind(("user_id", user_id.clone()))
        .await?
        .take::<Vec<EventMember>>(0)?;
    Ok(rows)
}
