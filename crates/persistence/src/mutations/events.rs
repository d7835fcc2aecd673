// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use diesel::prelude::*;
use diesel::SqliteConnection;
use meetup::{CreationResult, State};
use meetup_domain::{Enrollment, Event, EventDraft, EventId};
use tracing::debug;

use crate::backend::sqlite::get_last_insert_rowid;
use crate::data_models::{format_timestamp, to_flag};
use crate::diesel_schema::{enrollments, events};
use crate::error::PersistenceError;

/// The version every newly created event starts at.
pub const INITIAL_VERSION: i64 = 1;

/// The identifier the first enrollment of every event receives.
pub const FIRST_ENROLLMENT_ID: i64 = 1;

/// Inserts a new event row and returns the identifier the database assigned.
///
/// # Errors
///
/// Returns an error if the insert fails.
pub fn insert_event(
    conn: &mut SqliteConnection,
    result: &CreationResult,
) -> Result<EventId, PersistenceError> {
    let draft: &EventDraft = &result.draft;

    diesel::insert_into(events::table)
        .values((
            events::title.eq(&draft.title),
            events::created_by.eq(result.created_by.value()),
            events::enrollment_type.eq(draft.enrollment_type.as_str()),
            events::capacity_limit.eq(i64::from(draft.limit.value())),
            events::starts_at.eq(format_timestamp(draft.schedule.starts_at())?),
            events::ends_at.eq(format_timestamp(draft.schedule.ends_at())?),
            events::enrollment_deadline.eq(format_timestamp(draft.schedule.enrollment_deadline())?),
            events::created_at.eq(format_timestamp(result.created_at)?),
            events::next_enrollment_id.eq(FIRST_ENROLLMENT_ID),
            events::version.eq(INITIAL_VERSION),
        ))
        .execute(conn)?;

    let event_id: EventId = EventId::new(get_last_insert_rowid(conn)?);
    debug!(event_id = event_id.value(), "Inserted event row");
    Ok(event_id)
}

/// Moves the event row from `base_version` to the new state's version,
/// storing the new limit and enrollment id counter.
///
/// Zero updated rows means another writer stored a transition first.
///
/// # Errors
///
/// Returns `VersionConflict` if the stored version is not `base_version`,
/// `EventNotFound` if the event row is gone.
pub fn advance_event_version(
    conn: &mut SqliteConnection,
    state: &State,
    base_version: i64,
) -> Result<(), PersistenceError> {
    let event_id: i64 = state.event.event_id().value();

    let updated: usize = diesel::update(
        events::table
            .filter(events::event_id.eq(event_id))
            .filter(events::version.eq(base_version)),
    )
    .set((
        events::capacity_limit.eq(i64::from(state.event.limit().value())),
        events::next_enrollment_id.eq(state.event.next_enrollment_id().value()),
        events::version.eq(state.version),
    ))
    .execute(conn)?;

    if updated == 0 {
        let exists: bool = diesel::select(diesel::dsl::exists(
            events::table.filter(events::event_id.eq(event_id)),
        ))
        .get_result(conn)?;

        if !exists {
            return Err(PersistenceError::EventNotFound(event_id));
        }
        return Err(PersistenceError::VersionConflict {
            event_id,
            expected_version: base_version,
        });
    }

    Ok(())
}

/// Replaces the stored enrollments of an event with the event's current ones.
///
/// # Errors
///
/// Returns an error if any delete or insert fails.
pub fn sync_enrollments(conn: &mut SqliteConnection, event: &Event) -> Result<(), PersistenceError> {
    let event_id: i64 = event.event_id().value();

    diesel::delete(enrollments::table.filter(enrollments::event_id.eq(event_id)))
        .execute(conn)?;

    for enrollment in event.enrollments() {
        insert_enrollment(conn, event_id, enrollment)?;
    }

    debug!(
        event_id,
        enrollment_count = event.enrollments().len(),
        "Synced enrollments"
    );
    Ok(())
}

fn insert_enrollment(
    conn: &mut SqliteConnection,
    event_id: i64,
    enrollment: &Enrollment,
) -> Result<(), PersistenceError> {
    diesel::insert_into(enrollments::table)
        .values((
            enrollments::event_id.eq(event_id),
            enrollments::enrollment_id.eq(enrollment.enrollment_id().value()),
            enrollments::participant_id.eq(enrollment.participant().value()),
            enrollments::enrolled_at.eq(format_timestamp(enrollment.enrolled_at())?),
            enrollments::accepted.eq(to_flag(enrollment.is_accepted())),
            enrollments::attended.eq(to_flag(enrollment.is_attended())),
        ))
        .execute(conn)?;
    Ok(())
}
