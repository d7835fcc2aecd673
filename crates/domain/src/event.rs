// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! The event aggregate and its capacity state machine.
//!
//! An event exclusively owns its enrollments, kept in enrollment order.
//! Capacity state is never stored; it is derived from the accepted count
//! and the limit on demand.
//!
//! ## Invariants
//!
//! - A participant holds at most one enrollment per event
//! - No operation accepts an enrollment while the limit has no room
//! - Lowering the limit never demotes accepted enrollments, so an event
//!   may sit over capacity until enough accepted participants withdraw
//! - Only FCFS events promote waiting enrollments on their own

use time::OffsetDateTime;

use crate::enrollment::Enrollment;
use crate::error::DomainError;
use crate::types::{
    CapacityLimit, CapacityState, EnrollmentId, EnrollmentType, EventId, EventSchedule,
    ParticipantId,
};
use crate::validation::{validate_participant, validate_schedule, validate_title};
use crate::waitlist;

/// The organizer-supplied description of an event that does not exist yet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EventDraft {
    /// The event title.
    pub title: String,
    /// The acceptance policy.
    pub enrollment_type: EnrollmentType,
    /// The capacity limit (0 for unlimited).
    pub limit: CapacityLimit,
    /// The event's time frame.
    pub schedule: EventSchedule,
}

impl EventDraft {
    /// Checks that the draft may be turned into an event at `now`.
    ///
    /// # Errors
    ///
    /// Returns an error if the title or the schedule is invalid.
    pub fn validate(&self, now: OffsetDateTime) -> Result<(), DomainError> {
        validate_title(&self.title)?;
        validate_schedule(&self.schedule, now)
    }
}

/// The outcome of a withdrawal.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Disenrollment {
    /// The enrollment that was removed, as it was before removal.
    pub removed: Enrollment,
    /// Waiting enrollments promoted into the freed seat, in promotion order.
    pub promoted: Vec<Enrollment>,
}

/// A scheduled, capacity-limited event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Event {
    event_id: EventId,
    title: String,
    created_by: ParticipantId,
    enrollment_type: EnrollmentType,
    limit: CapacityLimit,
    schedule: EventSchedule,
    created_at: OffsetDateTime,
    enrollments: Vec<Enrollment>,
    next_enrollment_id: EnrollmentId,
}

impl Event {
    /// Creates an event without enrollments.
    ///
    /// # Arguments
    ///
    /// * `event_id` - The identifier assigned by the store
    /// * `created_by` - The organizer
    /// * `draft` - The validated draft
    /// * `created_at` - When the event was created
    #[must_use]
    pub fn new(
        event_id: EventId,
        created_by: ParticipantId,
        draft: EventDraft,
        created_at: OffsetDateTime,
    ) -> Self {
        Self {
            event_id,
            title: draft.title,
            created_by,
            enrollment_type: draft.enrollment_type,
            limit: draft.limit,
            schedule: draft.schedule,
            created_at,
            enrollments: Vec::new(),
            next_enrollment_id: EnrollmentId::new(1),
        }
    }

    /// Attaches stored enrollments, in enrollment order, and the stored
    /// enrollment id counter.
    ///
    /// The counter never ends up at or below an identifier already in use.
    #[must_use]
    pub fn with_enrollments(
        mut self,
        enrollments: Vec<Enrollment>,
        next_enrollment_id: EnrollmentId,
    ) -> Self {
        let floor: i64 = enrollments
            .iter()
            .map(|e| e.enrollment_id().value())
            .max()
            .unwrap_or(0)
            + 1;
        self.next_enrollment_id = EnrollmentId::new(next_enrollment_id.value().max(floor));
        self.enrollments = enrollments;
        self
    }

    #[must_use]
    pub const fn event_id(&self) -> EventId {
        self.event_id
    }

    #[must_use]
    pub fn title(&self) -> &str {
        &self.title
    }

    #[must_use]
    pub const fn created_by(&self) -> &ParticipantId {
        &self.created_by
    }

    #[must_use]
    pub const fn enrollment_type(&self) -> EnrollmentType {
        self.enrollment_type
    }

    #[must_use]
    pub const fn limit(&self) -> CapacityLimit {
        self.limit
    }

    #[must_use]
    pub const fn schedule(&self) -> &EventSchedule {
        &self.schedule
    }

    #[must_use]
    pub const fn created_at(&self) -> OffsetDateTime {
        self.created_at
    }

    /// Returns all enrollments in enrollment order.
    #[must_use]
    pub fn enrollments(&self) -> &[Enrollment] {
        &self.enrollments
    }

    /// Returns whether `participant` organizes this event.
    #[must_use]
    pub fn is_organized_by(&self, participant: &ParticipantId) -> bool {
        &self.created_by == participant
    }

    /// Returns the number of accepted enrollments.
    #[must_use]
    pub fn accepted_count(&self) -> usize {
        self.enrollments.iter().filter(|e| e.is_accepted()).count()
    }

    /// Returns the accepted enrollments in enrollment order.
    #[must_use]
    pub fn accepted_list(&self) -> Vec<&Enrollment> {
        self.enrollments.iter().filter(|e| e.is_accepted()).collect()
    }

    /// Returns the waiting enrollments in promotion order.
    #[must_use]
    pub fn waiting_list(&self) -> Vec<&Enrollment> {
        waitlist::waiting_list(&self.enrollments)
    }

    /// Returns the current capacity state.
    #[must_use]
    pub fn capacity_state(&self) -> CapacityState {
        CapacityState::classify(self.limit, self.accepted_count())
    }

    /// Finds the enrollment held by `participant`.
    #[must_use]
    pub fn find_enrollment(&self, participant: &ParticipantId) -> Option<&Enrollment> {
        self.enrollments
            .iter()
            .find(|e| e.participant() == participant)
    }

    /// Finds an enrollment by identifier.
    #[must_use]
    pub fn find_enrollment_by_id(&self, enrollment_id: EnrollmentId) -> Option<&Enrollment> {
        self.enrollments
            .iter()
            .find(|e| e.enrollment_id() == enrollment_id)
    }

    /// Returns whether `participant` may enroll at `now`.
    #[must_use]
    pub fn is_enrollable_for(&self, participant: &ParticipantId, now: OffsetDateTime) -> bool {
        self.schedule.is_enrollment_open(now) && self.find_enrollment(participant).is_none()
    }

    /// Returns whether `participant` may withdraw.
    #[must_use]
    pub fn is_disenrollable_for(&self, participant: &ParticipantId) -> bool {
        self.find_enrollment(participant)
            .is_some_and(|e| !e.is_attended())
    }

    /// Returns the identifier the next enrollment will receive.
    ///
    /// Identifiers only move forward, so a withdrawn enrollment's id is
    /// never handed to someone else.
    #[must_use]
    pub const fn next_enrollment_id(&self) -> EnrollmentId {
        self.next_enrollment_id
    }

    fn allocate_enrollment_id(&mut self) -> EnrollmentId {
        let allocated: EnrollmentId = self.next_enrollment_id;
        self.next_enrollment_id = EnrollmentId::new(allocated.value() + 1);
        allocated
    }

    fn enrollment_mut(&mut self, enrollment_id: EnrollmentId) -> Result<&mut Enrollment, DomainError> {
        let event_id: EventId = self.event_id;
        self.enrollments
            .iter_mut()
            .find(|e| e.enrollment_id() == enrollment_id)
            .ok_or(DomainError::EnrollmentIdNotFound {
                event_id,
                enrollment_id,
            })
    }

    /// Enrolls a participant.
    ///
    /// FCFS events accept the enrollment while the limit has room.
    /// Everything else lands on the waiting list.
    ///
    /// # Arguments
    ///
    /// * `participant` - The enrolling participant
    /// * `now` - The current time, used for the deadline check and as the
    ///   enrollment timestamp
    ///
    /// # Returns
    ///
    /// A copy of the created enrollment.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The participant identity is blank
    /// - The participant is already enrolled
    /// - The enrollment deadline has passed
    pub fn enroll(
        &mut self,
        participant: ParticipantId,
        now: OffsetDateTime,
    ) -> Result<Enrollment, DomainError> {
        validate_participant(&participant)?;

        if self.find_enrollment(&participant).is_some() {
            return Err(DomainError::DuplicateEnrollment {
                event_id: self.event_id,
                participant,
            });
        }

        if !self.schedule.is_enrollment_open(now) {
            return Err(DomainError::EnrollmentClosed {
                event_id: self.event_id,
                deadline: self.schedule.enrollment_deadline(),
            });
        }

        let accepted: bool = self.enrollment_type.auto_accepts()
            && self.limit.has_room_for(self.accepted_count());

        let enrollment_id: EnrollmentId = self.allocate_enrollment_id();
        let enrollment: Enrollment = Enrollment::new(enrollment_id, participant, now, accepted);
        self.enrollments.push(enrollment.clone());

        Ok(enrollment)
    }

    /// Withdraws a participant's enrollment.
    ///
    /// Withdrawing an accepted enrollment from an FCFS event promotes the
    /// next waiting enrollment into the freed seat.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The participant holds no enrollment
    /// - The participant has already checked in
    pub fn disenroll(&mut self, participant: &ParticipantId) -> Result<Disenrollment, DomainError> {
        let position: usize = self
            .enrollments
            .iter()
            .position(|e| e.participant() == participant)
            .ok_or_else(|| DomainError::EnrollmentNotFound {
                event_id: self.event_id,
                participant: participant.clone(),
            })?;

        if self.enrollments[position].is_attended() {
            return Err(DomainError::AlreadyAttended {
                event_id: self.event_id,
                participant: participant.clone(),
            });
        }

        let removed: Enrollment = self.enrollments.remove(position);
        let promoted: Vec<Enrollment> = if removed.is_accepted() {
            self.promote_waiting()
        } else {
            Vec::new()
        };

        Ok(Disenrollment { removed, promoted })
    }

    /// Replaces the capacity limit.
    ///
    /// A larger (or unlimited) limit promotes waiting enrollments into the
    /// new seats. A smaller limit demotes nobody.
    ///
    /// # Returns
    ///
    /// The promoted enrollments, in promotion order.
    pub fn change_capacity_limit(&mut self, new_limit: CapacityLimit) -> Vec<Enrollment> {
        let grew: bool = self.limit.grows_to(new_limit);
        self.limit = new_limit;

        if grew {
            self.promote_waiting()
        } else {
            Vec::new()
        }
    }

    /// Fills free seats from the waiting list.
    ///
    /// Only FCFS events promote. Calling this again without an intervening
    /// change promotes nobody.
    ///
    /// # Returns
    ///
    /// The promoted enrollments, in promotion order.
    pub fn promote_waiting(&mut self) -> Vec<Enrollment> {
        if !self.enrollment_type.auto_accepts() {
            return Vec::new();
        }

        let slots: Option<usize> = waitlist::available_slots(self.limit, self.accepted_count());
        let selected: Vec<EnrollmentId> = waitlist::select_promotions(&self.enrollments, slots);

        let mut promoted: Vec<Enrollment> = Vec::with_capacity(selected.len());
        for enrollment_id in selected {
            if let Some(enrollment) = self
                .enrollments
                .iter_mut()
                .find(|e| e.enrollment_id() == enrollment_id)
            {
                enrollment.accept();
                promoted.push(enrollment.clone());
            }
        }
        promoted
    }

    /// Accepts a waiting enrollment on behalf of the organizer.
    ///
    /// # Returns
    ///
    /// The accepted enrollment, or `None` if it was already accepted.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The event is not confirmative
    /// - The enrollment does not exist
    /// - The limit has no room
    pub fn accept(&mut self, enrollment_id: EnrollmentId) -> Result<Option<Enrollment>, DomainError> {
        self.require_confirmative()?;

        let accepted_count: usize = self.accepted_count();
        let limit: CapacityLimit = self.limit;
        let event_id: EventId = self.event_id;
        let enrollment: &mut Enrollment = self.enrollment_mut(enrollment_id)?;

        if enrollment.is_accepted() {
            return Ok(None);
        }

        if !limit.has_room_for(accepted_count) {
            return Err(DomainError::CapacityReached { event_id, limit });
        }

        enrollment.accept();
        Ok(Some(enrollment.clone()))
    }

    /// Moves an accepted enrollment back to the waiting list on behalf of the
    /// organizer.
    ///
    /// # Returns
    ///
    /// The rejected enrollment, or `None` if it was already waiting.
    ///
    /// # Errors
    ///
    /// Returns an error if the event is not confirmative or the enrollment
    /// does not exist.
    pub fn reject(&mut self, enrollment_id: EnrollmentId) -> Result<Option<Enrollment>, DomainError> {
        self.require_confirmative()?;

        let enrollment: &mut Enrollment = self.enrollment_mut(enrollment_id)?;
        if enrollment.is_waiting() {
            return Ok(None);
        }

        enrollment.reject();
        Ok(Some(enrollment.clone()))
    }

    /// Marks an accepted enrollment as attended.
    ///
    /// # Errors
    ///
    /// Returns an error if the enrollment does not exist or is not accepted.
    pub fn check_in(&mut self, enrollment_id: EnrollmentId) -> Result<(), DomainError> {
        let event_id: EventId = self.event_id;
        let enrollment: &mut Enrollment = self.enrollment_mut(enrollment_id)?;

        if !enrollment.is_accepted() {
            return Err(DomainError::CheckInNotAllowed {
                event_id,
                enrollment_id,
            });
        }

        enrollment.set_attended(true);
        Ok(())
    }

    /// Clears the attended mark of an enrollment.
    ///
    /// # Errors
    ///
    /// Returns an error if the enrollment does not exist.
    pub fn cancel_check_in(&mut self, enrollment_id: EnrollmentId) -> Result<(), DomainError> {
        self.enrollment_mut(enrollment_id)?.set_attended(false);
        Ok(())
    }

    fn require_confirmative(&self) -> Result<(), DomainError> {
        if self.enrollment_type.auto_accepts() {
            return Err(DomainError::ManualAcceptanceNotAllowed {
                event_id: self.event_id,
                enrollment_type: self.enrollment_type,
            });
        }
        Ok(())
    }
}
