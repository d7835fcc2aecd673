// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::error::DomainError;
use crate::types::{EventSchedule, ParticipantId};
use time::OffsetDateTime;

/// Maximum accepted title length, in characters.
const MAX_TITLE_LEN: usize = 50;

/// Validates an event title.
///
/// # Errors
///
/// Returns an error if the title is blank or longer than 50 characters.
pub fn validate_title(title: &str) -> Result<(), DomainError> {
    if title.trim().is_empty() {
        return Err(DomainError::InvalidTitle(String::from(
            "Title cannot be empty",
        )));
    }

    if title.chars().count() > MAX_TITLE_LEN {
        return Err(DomainError::InvalidTitle(format!(
            "Title must be at most {MAX_TITLE_LEN} characters"
        )));
    }

    Ok(())
}

/// Validates a participant identity.
///
/// # Errors
///
/// Returns an error if the identity is blank.
pub fn validate_participant(participant: &ParticipantId) -> Result<(), DomainError> {
    if participant.value().trim().is_empty() {
        return Err(DomainError::InvalidParticipant(String::from(
            "Participant identity cannot be empty",
        )));
    }
    Ok(())
}

/// Validates the schedule of a new event.
///
/// # Arguments
///
/// * `schedule` - The proposed schedule
/// * `now` - The current time
///
/// # Errors
///
/// Returns an error if:
/// - The enrollment deadline is not in the future
/// - The event starts before the enrollment deadline
/// - The event ends before it starts
pub fn validate_schedule(schedule: &EventSchedule, now: OffsetDateTime) -> Result<(), DomainError> {
    if schedule.enrollment_deadline() <= now {
        return Err(DomainError::InvalidSchedule {
            reason: String::from("Enrollment deadline must be in the future"),
        });
    }

    if schedule.starts_at() < schedule.enrollment_deadline() {
        return Err(DomainError::InvalidSchedule {
            reason: String::from("Event cannot start before the enrollment deadline"),
        });
    }

    if schedule.ends_at() < schedule.starts_at() {
        return Err(DomainError::InvalidSchedule {
            reason: String::from("Event cannot end before it starts"),
        });
    }

    Ok(())
}
