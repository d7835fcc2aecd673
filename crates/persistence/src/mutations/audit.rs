// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use diesel::prelude::*;
use diesel::SqliteConnection;
use meetup_audit::AuditEvent;
use meetup_domain::EventId;
use tracing::debug;

use crate::backend::sqlite::get_last_insert_rowid;
use crate::data_models::format_timestamp;
use crate::diesel_schema::audit_events;
use crate::error::PersistenceError;

/// Persists an audit event under `event_id`.
///
/// The event's own `event_id` is ignored; creation events do not carry one
/// until the event row exists.
///
/// # Returns
///
/// The audit ID assigned by the database.
///
/// # Errors
///
/// Returns an error if persistence or serialization fails.
pub fn persist_audit_event(
    conn: &mut SqliteConnection,
    event_id: EventId,
    event: &AuditEvent,
) -> Result<i64, PersistenceError> {
    let cause_json: String = serde_json::to_string(&event.cause)?;
    let action_json: String = serde_json::to_string(&event.action)?;
    let before_json: String = serde_json::to_string(&event.before)?;
    let after_json: String = serde_json::to_string(&event.after)?;

    diesel::insert_into(audit_events::table)
        .values((
            audit_events::event_id.eq(event_id.value()),
            audit_events::actor_id.eq(&event.actor.id),
            audit_events::actor_role.eq(event.actor.role.as_str()),
            audit_events::cause_json.eq(cause_json),
            audit_events::action_json.eq(action_json),
            audit_events::before_snapshot_json.eq(before_json),
            audit_events::after_snapshot_json.eq(after_json),
            audit_events::recorded_at.eq(format_timestamp(event.recorded_at)?),
        ))
        .execute(conn)?;

    let audit_id: i64 = get_last_insert_rowid(conn)?;
    debug!(audit_id, event_id = event_id.value(), action = %event.action.name, "Persisted audit event");
    Ok(audit_id)
}
