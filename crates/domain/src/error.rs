// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::types::{CapacityLimit, EnrollmentId, EnrollmentType, EventId, ParticipantId};
use time::OffsetDateTime;

/// Errors that can occur while applying enrollment rules.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DomainError {
    /// The participant already holds an enrollment for this event.
    DuplicateEnrollment {
        /// The event.
        event_id: EventId,
        /// The participant attempting to enroll again.
        participant: ParticipantId,
    },
    /// The participant holds no enrollment for this event.
    EnrollmentNotFound {
        /// The event.
        event_id: EventId,
        /// The participant that was looked up.
        participant: ParticipantId,
    },
    /// No enrollment with this identifier exists in the event.
    EnrollmentIdNotFound {
        /// The event.
        event_id: EventId,
        /// The unknown enrollment identifier.
        enrollment_id: EnrollmentId,
    },
    /// Enrollment was attempted after the deadline.
    EnrollmentClosed {
        /// The event.
        event_id: EventId,
        /// The deadline that has passed.
        deadline: OffsetDateTime,
    },
    /// An attended enrollment cannot be withdrawn.
    AlreadyAttended {
        /// The event.
        event_id: EventId,
        /// The participant who already checked in.
        participant: ParticipantId,
    },
    /// Organizer acceptance is only available for confirmative events.
    ManualAcceptanceNotAllowed {
        /// The event.
        event_id: EventId,
        /// The event's enrollment type.
        enrollment_type: EnrollmentType,
    },
    /// Accepting would exceed the capacity limit.
    CapacityReached {
        /// The event.
        event_id: EventId,
        /// The limit in force.
        limit: CapacityLimit,
    },
    /// Only accepted enrollments can be checked in.
    CheckInNotAllowed {
        /// The event.
        event_id: EventId,
        /// The enrollment that is not accepted.
        enrollment_id: EnrollmentId,
    },
    /// Event title is empty or invalid.
    InvalidTitle(String),
    /// Event schedule is inconsistent.
    InvalidSchedule {
        /// Description of the violated ordering rule.
        reason: String,
    },
    /// Enrollment type string is not recognised.
    InvalidEnrollmentType(String),
    /// Participant identity is empty or invalid.
    InvalidParticipant(String),
}

impl std::fmt::Display for DomainError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::DuplicateEnrollment {
                event_id,
                participant,
            } => {
                write!(
                    f,
                    "Participant '{participant}' is already enrolled in event {event_id}"
                )
            }
            Self::EnrollmentNotFound {
                event_id,
                participant,
            } => {
                write!(
                    f,
                    "Participant '{participant}' is not enrolled in event {event_id}"
                )
            }
            Self::EnrollmentIdNotFound {
                event_id,
                enrollment_id,
            } => {
                write!(f, "Enrollment {enrollment_id} not found in event {event_id}")
            }
            Self::EnrollmentClosed { event_id, deadline } => {
                write!(
                    f,
                    "Enrollment for event {event_id} closed at {deadline}"
                )
            }
            Self::AlreadyAttended {
                event_id,
                participant,
            } => {
                write!(
                    f,
                    "Participant '{participant}' already attended event {event_id} and cannot withdraw"
                )
            }
            Self::ManualAcceptanceNotAllowed {
                event_id,
                enrollment_type,
            } => {
                write!(
                    f,
                    "Event {event_id} uses {enrollment_type} enrollment; organizer acceptance is not available"
                )
            }
            Self::CapacityReached { event_id, limit } => {
                write!(f, "Event {event_id} has reached its limit of {limit}")
            }
            Self::CheckInNotAllowed {
                event_id,
                enrollment_id,
            } => {
                write!(
                    f,
                    "Enrollment {enrollment_id} in event {event_id} is not accepted and cannot check in"
                )
            }
            Self::InvalidTitle(msg) => write!(f, "Invalid title: {msg}"),
            Self::InvalidSchedule { reason } => write!(f, "Invalid schedule: {reason}"),
            Self::InvalidEnrollmentType(value) => {
                write!(f, "Invalid enrollment type: {value}")
            }
            Self::InvalidParticipant(msg) => write!(f, "Invalid participant: {msg}"),
        }
    }
}

impl std::error::Error for DomainError {}
