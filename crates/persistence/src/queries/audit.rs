// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Audit event queries.

use diesel::prelude::*;
use diesel::SqliteConnection;
use meetup_audit::{Action, Actor, ActorRole, AuditEvent, Cause, StateSnapshot};
use meetup_domain::EventId;

use crate::data_models::{AuditEventRow, parse_timestamp};
use crate::diesel_schema::audit_events;
use crate::error::PersistenceError;

/// Retrieves an audit event by its audit ID.
///
/// # Errors
///
/// Returns an error if the audit event is not found or cannot be deserialized.
pub fn get_audit_event(
    conn: &mut SqliteConnection,
    audit_id: i64,
) -> Result<AuditEvent, PersistenceError> {
    let row: AuditEventRow = audit_events::table
        .filter(audit_events::audit_id.eq(audit_id))
        .select(AuditEventRow::as_select())
        .first::<AuditEventRow>(conn)
        .optional()?
        .ok_or_else(|| PersistenceError::NotFound(format!("Audit event {audit_id}")))?;

    audit_event_from_row(row)
}

/// Retrieves every audit event of an event in the order it was recorded.
///
/// # Errors
///
/// Returns an error if the query fails or a row cannot be deserialized.
pub fn get_audit_timeline(
    conn: &mut SqliteConnection,
    event_id: EventId,
) -> Result<Vec<AuditEvent>, PersistenceError> {
    let rows: Vec<AuditEventRow> = audit_events::table
        .filter(audit_events::event_id.eq(event_id.value()))
        .order(audit_events::audit_id.asc())
        .select(AuditEventRow::as_select())
        .load::<AuditEventRow>(conn)?;

    rows.into_iter().map(audit_event_from_row).collect()
}

fn audit_event_from_row(row: AuditEventRow) -> Result<AuditEvent, PersistenceError> {
    let role: ActorRole = ActorRole::parse(&row.actor_role).ok_or_else(|| {
        PersistenceError::ReconstructionError(format!("Unknown actor role '{}'", row.actor_role))
    })?;
    let cause: Cause = serde_json::from_str(&row.cause_json)?;
    let action: Action = serde_json::from_str(&row.action_json)?;
    let before: StateSnapshot = serde_json::from_str(&row.before_snapshot_json)?;
    let after: StateSnapshot = serde_json::from_str(&row.after_snapshot_json)?;

    Ok(AuditEvent::new(
        Some(EventId::new(row.event_id)),
        Actor::new(row.actor_id, role),
        cause,
        action,
        before,
        after,
        parse_timestamp(&row.recorded_at)?,
    )
    .with_audit_id(row.audit_id))
}
