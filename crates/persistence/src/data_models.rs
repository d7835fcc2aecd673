// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Row types and column conversions.
//!
//! Timestamps are stored as RFC 3339 text. Booleans are stored as `0`/`1`
//! integers.

use diesel::prelude::*;
use time::OffsetDateTime;
use time::format_description::well_known::Rfc3339;

use crate::diesel_schema::{audit_events, enrollments, events};
use crate::error::PersistenceError;

/// A row of the `events` table.
#[derive(Debug, Queryable, Selectable)]
#[diesel(table_name = events)]
pub struct EventRow {
    pub event_id: i64,
    pub title: String,
    pub created_by: String,
    pub enrollment_type: String,
    pub capacity_limit: i64,
    pub starts_at: String,
    pub ends_at: String,
    pub enrollment_deadline: String,
    pub created_at: String,
    pub next_enrollment_id: i64,
    pub version: i64,
}

/// A row of the `enrollments` table.
#[derive(Debug, Queryable, Selectable)]
#[diesel(table_name = enrollments)]
pub struct EnrollmentRow {
    #[allow(dead_code)]
    pub event_id: i64,
    pub enrollment_id: i64,
    pub participant_id: String,
    pub enrolled_at: String,
    pub accepted: i32,
    pub attended: i32,
}

/// A row of the `audit_events` table.
#[derive(Debug, Queryable, Selectable)]
#[diesel(table_name = audit_events)]
pub struct AuditEventRow {
    pub audit_id: i64,
    pub event_id: i64,
    pub actor_id: String,
    pub actor_role: String,
    pub cause_json: String,
    pub action_json: String,
    pub before_snapshot_json: String,
    pub after_snapshot_json: String,
    pub recorded_at: String,
}

/// Formats a timestamp for storage.
///
/// # Errors
///
/// Returns an error if the timestamp cannot be represented in RFC 3339.
pub fn format_timestamp(value: OffsetDateTime) -> Result<String, PersistenceError> {
    value
        .format(&Rfc3339)
        .map_err(|e| PersistenceError::SerializationError(e.to_string()))
}

/// Parses a stored timestamp.
///
/// # Errors
///
/// Returns an error if the text is not RFC 3339.
pub fn parse_timestamp(value: &str) -> Result<OffsetDateTime, PersistenceError> {
    OffsetDateTime::parse(value, &Rfc3339)
        .map_err(|e| PersistenceError::ReconstructionError(format!("Bad timestamp '{value}': {e}")))
}

pub fn to_flag(value: bool) -> i32 {
    i32::from(value)
}

pub const fn from_flag(value: i32) -> bool {
    value != 0
}
