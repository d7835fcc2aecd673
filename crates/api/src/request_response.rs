// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! API request and response data transfer objects.
//!
//! Timestamps in responses are RFC 3339 strings.

use meetup::State;
use meetup_audit::AuditEvent;
use meetup_domain::{
    CapacityLimit, DomainError, Enrollment, EnrollmentType, Event, EventDraft, EventSchedule,
};
use serde::{Deserialize, Serialize};
use time::OffsetDateTime;
use time::format_description::well_known::Rfc3339;

use crate::error::ApiError;

/// API request to create a new event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreateEventRequest {
    /// The event title.
    pub title: String,
    /// `FCFS` or `CONFIRMATIVE`.
    pub enrollment_type: String,
    /// The capacity limit (0 for unlimited).
    pub limit: u32,
    /// When the event starts.
    pub starts_at: OffsetDateTime,
    /// When the event ends.
    pub ends_at: OffsetDateTime,
    /// The last moment at which participants may enroll.
    pub enrollment_deadline: OffsetDateTime,
}

impl CreateEventRequest {
    /// Converts the request into a draft.
    ///
    /// # Errors
    ///
    /// Returns an error if the enrollment type is not recognised.
    pub fn to_draft(&self) -> Result<EventDraft, DomainError> {
        let enrollment_type: EnrollmentType = self.enrollment_type.parse()?;
        Ok(EventDraft {
            title: self.title.clone(),
            enrollment_type,
            limit: CapacityLimit::new(self.limit),
            schedule: EventSchedule::new(self.starts_at, self.ends_at, self.enrollment_deadline),
        })
    }
}

/// API response for a successful event creation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreateEventResponse {
    /// The identifier assigned to the event.
    pub event_id: i64,
    /// The event title.
    pub title: String,
    /// The acceptance policy.
    pub enrollment_type: String,
    /// The capacity limit (0 for unlimited).
    pub limit: u32,
    /// A success message.
    pub message: String,
}

/// API response for a successful enrollment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EnrollmentResponse {
    /// The event.
    pub event_id: i64,
    /// The new enrollment.
    pub enrollment_id: i64,
    /// The enrolled participant.
    pub participant: String,
    /// Whether the enrollment holds a seat. `false` means waiting.
    pub accepted: bool,
    /// A success message.
    pub message: String,
}

/// API response for a successful withdrawal.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DisenrollResponse {
    /// The event.
    pub event_id: i64,
    /// The participant who withdrew.
    pub participant: String,
    /// Participants promoted into the freed seat, in promotion order.
    pub promoted: Vec<String>,
    /// A success message.
    pub message: String,
}

/// API response for a successful capacity change.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CapacityResponse {
    /// The event.
    pub event_id: i64,
    /// The new limit (0 for unlimited).
    pub limit: u32,
    /// The capacity state after the change.
    pub capacity_state: String,
    /// Participants promoted by the change, in promotion order.
    pub promoted: Vec<String>,
    /// A success message.
    pub message: String,
}

/// API response for organizer actions on one enrollment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EnrollmentActionResponse {
    /// The event.
    pub event_id: i64,
    /// The enrollment after the action.
    pub enrollment: EnrollmentView,
    /// A success message.
    pub message: String,
}

/// One enrollment as shown to callers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EnrollmentView {
    pub enrollment_id: i64,
    pub participant: String,
    pub enrolled_at: String,
    pub accepted: bool,
    pub attended: bool,
}

impl EnrollmentView {
    /// Builds the view of an enrollment.
    ///
    /// # Errors
    ///
    /// Returns an error if the timestamp cannot be formatted.
    pub fn from_enrollment(enrollment: &Enrollment) -> Result<Self, ApiError> {
        Ok(Self {
            enrollment_id: enrollment.enrollment_id().value(),
            participant: enrollment.participant().value().to_string(),
            enrolled_at: format_timestamp(enrollment.enrolled_at())?,
            accepted: enrollment.is_accepted(),
            attended: enrollment.is_attended(),
        })
    }
}

/// Read model of an event.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventView {
    pub event_id: i64,
    pub title: String,
    pub created_by: String,
    pub enrollment_type: String,
    /// The capacity limit (0 for unlimited).
    pub limit: u32,
    pub capacity_state: String,
    pub starts_at: String,
    pub ends_at: String,
    pub enrollment_deadline: String,
    pub created_at: String,
    pub version: i64,
    /// Accepted enrollments in enrollment order.
    pub accepted: Vec<EnrollmentView>,
    /// Waiting enrollments in promotion order.
    pub waiting: Vec<EnrollmentView>,
}

impl EventView {
    /// Builds the read model of a stored event.
    ///
    /// # Errors
    ///
    /// Returns an error if a timestamp cannot be formatted.
    pub fn from_state(state: &State) -> Result<Self, ApiError> {
        let event: &Event = &state.event;
        let accepted: Vec<EnrollmentView> = event
            .accepted_list()
            .into_iter()
            .map(EnrollmentView::from_enrollment)
            .collect::<Result<Vec<EnrollmentView>, ApiError>>()?;
        let waiting: Vec<EnrollmentView> = event
            .waiting_list()
            .into_iter()
            .map(EnrollmentView::from_enrollment)
            .collect::<Result<Vec<EnrollmentView>, ApiError>>()?;

        Ok(Self {
            event_id: event.event_id().value(),
            title: event.title().to_string(),
            created_by: event.created_by().value().to_string(),
            enrollment_type: event.enrollment_type().as_str().to_string(),
            limit: event.limit().value(),
            capacity_state: event.capacity_state().as_str().to_string(),
            starts_at: format_timestamp(event.schedule().starts_at())?,
            ends_at: format_timestamp(event.schedule().ends_at())?,
            enrollment_deadline: format_timestamp(event.schedule().enrollment_deadline())?,
            created_at: format_timestamp(event.created_at())?,
            version: state.version,
            accepted,
            waiting,
        })
    }
}

/// One stored audit event.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuditEntryView {
    pub audit_id: Option<i64>,
    pub actor_id: String,
    pub actor_role: String,
    pub cause: String,
    pub action: String,
    pub details: Option<String>,
    pub before: String,
    pub after: String,
    pub recorded_at: String,
}

impl AuditEntryView {
    /// Builds the view of an audit event.
    ///
    /// # Errors
    ///
    /// Returns an error if the timestamp cannot be formatted.
    pub fn from_audit_event(event: &AuditEvent) -> Result<Self, ApiError> {
        Ok(Self {
            audit_id: event.audit_id,
            actor_id: event.actor.id.clone(),
            actor_role: event.actor.role.as_str().to_string(),
            cause: event.cause.description.clone(),
            action: event.action.name.clone(),
            details: event.action.details.clone(),
            before: event.before.to_string(),
            after: event.after.to_string(),
            recorded_at: format_timestamp(event.recorded_at)?,
        })
    }
}

/// Formats a timestamp as RFC 3339.
///
/// # Errors
///
/// Returns `ApiError::Internal` if the timestamp cannot be represented.
pub(crate) fn format_timestamp(value: OffsetDateTime) -> Result<String, ApiError> {
    value.format(&Rfc3339).map_err(|e| ApiError::Internal {
        message: format!("Failed to format timestamp: {e}"),
    })
}
