// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Error types for the API layer.

use meetup::CoreError;
use meetup_domain::DomainError;
use meetup_persistence::PersistenceError;
use thiserror::Error;

/// API-level errors.
///
/// Domain errors are carried unchanged so callers can match on the exact
/// rule that rejected a request.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ApiError {
    /// An enrollment rule rejected the request.
    #[error(transparent)]
    Domain(#[from] DomainError),
    /// The event does not exist.
    #[error("Event {event_id} not found")]
    EventNotFound {
        /// The unknown event.
        event_id: i64,
    },
    /// The acting participant may not perform this action.
    #[error("Unauthorized: '{action}' is reserved for the organizer of event {event_id}")]
    Unauthorized {
        /// The action that was attempted.
        action: String,
        /// The event.
        event_id: i64,
    },
    /// Another writer changed the event first. The request may be retried.
    #[error("Event {event_id} was modified concurrently")]
    ConcurrentModification {
        /// The event.
        event_id: i64,
    },
    /// The store failed.
    #[error("Persistence error: {0}")]
    Persistence(PersistenceError),
    /// An internal error occurred.
    #[error("Internal error: {message}")]
    Internal {
        /// A description of the internal error.
        message: String,
    },
}

impl ApiError {
    /// Renders the message shown to the participant or organizer.
    #[must_use]
    pub fn user_message(&self) -> String {
        match self {
            Self::Domain(err) => domain_user_message(err),
            Self::EventNotFound { .. } => String::from("This event does not exist."),
            Self::Unauthorized { .. } => {
                String::from("Only the organizer of this event can do that.")
            }
            Self::ConcurrentModification { .. } => {
                String::from("The event changed while you were acting on it. Please try again.")
            }
            Self::Persistence(_) | Self::Internal { .. } => {
                String::from("Something went wrong. Please try again later.")
            }
        }
    }
}

fn domain_user_message(err: &DomainError) -> String {
    match err {
        DomainError::DuplicateEnrollment { .. } => {
            String::from("You have already joined this event.")
        }
        DomainError::EnrollmentNotFound { .. } => {
            String::from("You are not enrolled in this event.")
        }
        DomainError::EnrollmentIdNotFound { .. } => {
            String::from("That enrollment does not exist.")
        }
        DomainError::EnrollmentClosed { .. } => {
            String::from("Enrollment for this event is closed.")
        }
        DomainError::AlreadyAttended { .. } => {
            String::from("You already attended this event and cannot withdraw.")
        }
        DomainError::ManualAcceptanceNotAllowed { .. } => {
            String::from("This event accepts participants automatically.")
        }
        DomainError::CapacityReached { .. } => String::from("This event is full."),
        DomainError::CheckInNotAllowed { .. } => {
            String::from("Only accepted participants can check in.")
        }
        DomainError::InvalidTitle(msg)
        | DomainError::InvalidParticipant(msg)
        | DomainError::InvalidEnrollmentType(msg) => msg.clone(),
        DomainError::InvalidSchedule { reason } => reason.clone(),
    }
}

impl From<CoreError> for ApiError {
    fn from(err: CoreError) -> Self {
        match err {
            CoreError::DomainViolation(domain) => Self::Domain(domain),
        }
    }
}

impl From<PersistenceError> for ApiError {
    fn from(err: PersistenceError) -> Self {
        match err {
            PersistenceError::EventNotFound(event_id) => Self::EventNotFound { event_id },
            PersistenceError::VersionConflict { event_id, .. } => {
                Self::ConcurrentModification { event_id }
            }
            other => Self::Persistence(other),
        }
    }
}

/// A notice could not be handed to its sink.
///
/// Delivery failures are logged by the orchestrator and never undo the
/// stored transition.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum NotificationError {
    /// The sink rejected the notice.
    #[error("Notification delivery failed: {message}")]
    DeliveryFailed {
        /// A description of the failure.
        message: String,
    },
}
