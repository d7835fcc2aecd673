// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::types::{EnrollmentId, ParticipantId};
use time::OffsetDateTime;

/// One participant's enrollment in one event.
///
/// Enrollments are owned by their event and only change through the
/// event's operations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Enrollment {
    enrollment_id: EnrollmentId,
    participant: ParticipantId,
    enrolled_at: OffsetDateTime,
    accepted: bool,
    attended: bool,
}

impl Enrollment {
    /// Creates a new, not yet attended enrollment.
    ///
    /// # Arguments
    ///
    /// * `enrollment_id` - The identifier allocated by the event
    /// * `participant` - The enrolling participant
    /// * `enrolled_at` - When the enrollment was made
    /// * `accepted` - Whether the enrollment holds a confirmed seat
    #[must_use]
    pub const fn new(
        enrollment_id: EnrollmentId,
        participant: ParticipantId,
        enrolled_at: OffsetDateTime,
        accepted: bool,
    ) -> Self {
        Self {
            enrollment_id,
            participant,
            enrolled_at,
            accepted,
            attended: false,
        }
    }

    /// Rebuilds an enrollment from stored fields.
    #[must_use]
    pub const fn restore(
        enrollment_id: EnrollmentId,
        participant: ParticipantId,
        enrolled_at: OffsetDateTime,
        accepted: bool,
        attended: bool,
    ) -> Self {
        Self {
            enrollment_id,
            participant,
            enrolled_at,
            accepted,
            attended,
        }
    }

    #[must_use]
    pub const fn enrollment_id(&self) -> EnrollmentId {
        self.enrollment_id
    }

    #[must_use]
    pub const fn participant(&self) -> &ParticipantId {
        &self.participant
    }

    #[must_use]
    pub const fn enrolled_at(&self) -> OffsetDateTime {
        self.enrolled_at
    }

    /// Returns whether this enrollment holds a confirmed seat.
    #[must_use]
    pub const fn is_accepted(&self) -> bool {
        self.accepted
    }

    /// Returns whether this enrollment is on the waiting list.
    #[must_use]
    pub const fn is_waiting(&self) -> bool {
        !self.accepted
    }

    /// Returns whether the participant has checked in.
    #[must_use]
    pub const fn is_attended(&self) -> bool {
        self.attended
    }

    pub(crate) const fn accept(&mut self) {
        self.accepted = true;
    }

    pub(crate) const fn reject(&mut self) {
        self.accepted = false;
        self.attended = false;
    }

    pub(crate) const fn set_attended(&mut self, attended: bool) {
        self.attended = attended;
    }
}
