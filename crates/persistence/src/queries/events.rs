// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use std::str::FromStr;

use diesel::prelude::*;
use diesel::SqliteConnection;
use meetup::State;
use meetup_domain::{
    CapacityLimit, Enrollment, EnrollmentId, EnrollmentType, Event, EventDraft, EventId,
    EventSchedule, ParticipantId,
};

use crate::data_models::{EnrollmentRow, EventRow, from_flag, parse_timestamp};
use crate::diesel_schema::{enrollments, events};
use crate::error::PersistenceError;

/// Loads an event with all of its enrollments and its stored version.
///
/// # Errors
///
/// Returns `EventNotFound` if no such event exists, or an error if a row
/// cannot be reconstructed.
pub fn load_event(conn: &mut SqliteConnection, event_id: EventId) -> Result<State, PersistenceError> {
    let row: EventRow = events::table
        .filter(events::event_id.eq(event_id.value()))
        .select(EventRow::as_select())
        .first::<EventRow>(conn)
        .optional()?
        .ok_or(PersistenceError::EventNotFound(event_id.value()))?;

    let enrollment_rows: Vec<EnrollmentRow> = enrollments::table
        .filter(enrollments::event_id.eq(event_id.value()))
        .order(enrollments::enrollment_id.asc())
        .select(EnrollmentRow::as_select())
        .load::<EnrollmentRow>(conn)?;

    let enrollments: Vec<Enrollment> = enrollment_rows
        .iter()
        .map(enrollment_from_row)
        .collect::<Result<_, _>>()?;

    let version: i64 = row.version;
    let next_enrollment_id: EnrollmentId = EnrollmentId::new(row.next_enrollment_id);
    let event: Event = event_from_row(row)?.with_enrollments(enrollments, next_enrollment_id);
    Ok(State::new(event, version))
}

/// Lists the identifiers of all stored events, oldest first.
///
/// # Errors
///
/// Returns an error if the query fails.
pub fn list_event_ids(conn: &mut SqliteConnection) -> Result<Vec<EventId>, PersistenceError> {
    let ids: Vec<i64> = events::table
        .select(events::event_id)
        .order(events::event_id.asc())
        .load::<i64>(conn)?;
    Ok(ids.into_iter().map(EventId::new).collect())
}

fn event_from_row(row: EventRow) -> Result<Event, PersistenceError> {
    let enrollment_type: EnrollmentType = EnrollmentType::from_str(&row.enrollment_type)
        .map_err(|e| PersistenceError::ReconstructionError(e.to_string()))?;
    let limit: u32 = u32::try_from(row.capacity_limit).map_err(|_| {
        PersistenceError::ReconstructionError(format!(
            "Capacity limit {} out of range for event {}",
            row.capacity_limit, row.event_id
        ))
    })?;

    let draft: EventDraft = EventDraft {
        title: row.title,
        enrollment_type,
        limit: CapacityLimit::new(limit),
        schedule: EventSchedule::new(
            parse_timestamp(&row.starts_at)?,
            parse_timestamp(&row.ends_at)?,
            parse_timestamp(&row.enrollment_deadline)?,
        ),
    };

    Ok(Event::new(
        EventId::new(row.event_id),
        ParticipantId::new(&row.created_by),
        draft,
        parse_timestamp(&row.created_at)?,
    ))
}

fn enrollment_from_row(row: &EnrollmentRow) -> Result<Enrollment, PersistenceError> {
    Ok(Enrollment::restore(
        EnrollmentId::new(row.enrollment_id),
        ParticipantId::new(&row.participant_id),
        parse_timestamp(&row.enrolled_at)?,
        from_flag(row.accepted),
        from_flag(row.attended),
    ))
}
