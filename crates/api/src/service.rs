// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! The enrollment orchestrator.
//!
//! Every mutating request follows the same path:
//! 1. Take the event's lock
//! 2. Load the stored state
//! 3. Authorize organizer-only actions
//! 4. Apply the command to a copy of the state
//! 5. Persist the transition atomically
//! 6. Deliver notices
//!
//! A request that fails before step 5 completes leaves the store untouched.
//! Notices are only sent for stored transitions.

use meetup::{
    Command, CreationResult, EnrollmentNotice, NoticeKind, State, TransitionResult, apply,
    apply_create_event,
};
use meetup_audit::{Actor, ActorRole, AuditEvent, Cause};
use meetup_domain::{CapacityLimit, Enrollment, EnrollmentId, EventDraft, EventId, ParticipantId};
use meetup_persistence::Persistence;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use tracing::{info, warn};

use crate::auth::AuthorizationService;
use crate::clock::Clock;
use crate::error::ApiError;
use crate::locks::EventLocks;
use crate::notify::NotificationSink;
use crate::request_response::{
    AuditEntryView, CapacityResponse, CreateEventResponse, DisenrollResponse,
    EnrollmentActionResponse, EnrollmentResponse, EnrollmentView, EventView,
};

/// Who may issue a command.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Permission {
    /// Any participant acting for themselves.
    Participant,
    /// Only the event's organizer.
    Organizer,
}

/// Coordinates enrollment requests against the store.
///
/// The service holds no event state. It owns its clock, its notification
/// sink, and the per-event lock registry; the store is passed into every
/// call.
pub struct EnrollmentService<C: Clock, N: NotificationSink> {
    clock: C,
    sink: N,
    locks: EventLocks,
}

impl<C: Clock, N: NotificationSink> EnrollmentService<C, N> {
    #[must_use]
    pub fn new(clock: C, sink: N) -> Self {
        Self {
            clock,
            sink,
            locks: EventLocks::new(),
        }
    }

    #[must_use]
    pub const fn clock(&self) -> &C {
        &self.clock
    }

    #[must_use]
    pub const fn sink(&self) -> &N {
        &self.sink
    }

    #[must_use]
    pub const fn locks(&self) -> &EventLocks {
        &self.locks
    }

    /// Creates an event organized by `organizer`.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The title is blank or too long
    /// - The schedule is inconsistent or the deadline has passed
    /// - The event cannot be stored
    pub fn create_event(
        &self,
        persistence: &mut Persistence,
        organizer: &ParticipantId,
        draft: EventDraft,
        cause: Cause,
    ) -> Result<CreateEventResponse, ApiError> {
        let actor: Actor = Actor::new(organizer.value().to_string(), ActorRole::Organizer);
        let result: CreationResult =
            apply_create_event(organizer.clone(), draft, self.clock.now(), actor, cause)
                .map_err(|err| {
                    warn!(organizer = %organizer, error = %err, "Rejected event creation");
                    ApiError::from(err)
                })?;

        let event_id: EventId = persistence.create_event(&result)?;

        Ok(CreateEventResponse {
            event_id: event_id.value(),
            title: result.draft.title.clone(),
            enrollment_type: result.draft.enrollment_type.as_str().to_string(),
            limit: result.draft.limit.value(),
            message: format!("Created event '{}'", result.draft.title),
        })
    }

    /// Enrolls `participant` in an event.
    ///
    /// FCFS events accept the participant while seats remain; otherwise the
    /// participant joins the waiting list.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The event does not exist
    /// - The participant is already enrolled
    /// - The enrollment deadline has passed
    /// - The event changed concurrently
    pub fn request_enroll(
        &self,
        persistence: &mut Persistence,
        event_id: EventId,
        participant: &ParticipantId,
        cause: Cause,
    ) -> Result<EnrollmentResponse, ApiError> {
        let command: Command = Command::Enroll {
            participant: participant.clone(),
        };
        let result: TransitionResult = self.execute(
            persistence,
            event_id,
            participant,
            Permission::Participant,
            command,
            cause,
        )?;

        let enrollment: &Enrollment = result
            .new_state
            .event
            .find_enrollment(participant)
            .ok_or_else(|| missing_enrollment(event_id))?;

        let message: String = if enrollment.is_accepted() {
            format!("Enrolled in '{}'", result.new_state.event.title())
        } else {
            format!(
                "Added to the waiting list for '{}'",
                result.new_state.event.title()
            )
        };

        Ok(EnrollmentResponse {
            event_id: event_id.value(),
            enrollment_id: enrollment.enrollment_id().value(),
            participant: participant.value().to_string(),
            accepted: enrollment.is_accepted(),
            message,
        })
    }

    /// Withdraws `participant` from an event.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The event does not exist
    /// - The participant is not enrolled
    /// - The participant has already checked in
    /// - The event changed concurrently
    pub fn request_disenroll(
        &self,
        persistence: &mut Persistence,
        event_id: EventId,
        participant: &ParticipantId,
        cause: Cause,
    ) -> Result<DisenrollResponse, ApiError> {
        let command: Command = Command::Disenroll {
            participant: participant.clone(),
        };
        let result: TransitionResult = self.execute(
            persistence,
            event_id,
            participant,
            Permission::Participant,
            command,
            cause,
        )?;

        Ok(DisenrollResponse {
            event_id: event_id.value(),
            participant: participant.value().to_string(),
            promoted: promoted_participants(&result.notices),
            message: format!("Withdrew from '{}'", result.new_state.event.title()),
        })
    }

    /// Replaces an event's capacity limit.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The event does not exist
    /// - `organizer` did not create the event
    /// - The event changed concurrently
    pub fn update_capacity(
        &self,
        persistence: &mut Persistence,
        event_id: EventId,
        organizer: &ParticipantId,
        new_limit: CapacityLimit,
        cause: Cause,
    ) -> Result<CapacityResponse, ApiError> {
        let command: Command = Command::ChangeCapacityLimit { limit: new_limit };
        let result: TransitionResult = self.execute(
            persistence,
            event_id,
            organizer,
            Permission::Organizer,
            command,
            cause,
        )?;

        Ok(CapacityResponse {
            event_id: event_id.value(),
            limit: new_limit.value(),
            capacity_state: result
                .new_state
                .event
                .capacity_state()
                .as_str()
                .to_string(),
            promoted: promoted_participants(&result.notices),
            message: format!("Changed limit to {new_limit}"),
        })
    }

    /// Accepts a waiting enrollment in a confirmative event.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The event does not exist or is not confirmative
    /// - `organizer` did not create the event
    /// - The enrollment does not exist
    /// - The limit has no room
    pub fn accept_enrollment(
        &self,
        persistence: &mut Persistence,
        event_id: EventId,
        organizer: &ParticipantId,
        enrollment_id: EnrollmentId,
        cause: Cause,
    ) -> Result<EnrollmentActionResponse, ApiError> {
        self.enrollment_action(
            persistence,
            event_id,
            organizer,
            Command::AcceptEnrollment { enrollment_id },
            enrollment_id,
            cause,
            "Accepted",
        )
    }

    /// Sends an accepted enrollment in a confirmative event back to the
    /// waiting list.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The event does not exist or is not confirmative
    /// - `organizer` did not create the event
    /// - The enrollment does not exist
    pub fn reject_enrollment(
        &self,
        persistence: &mut Persistence,
        event_id: EventId,
        organizer: &ParticipantId,
        enrollment_id: EnrollmentId,
        cause: Cause,
    ) -> Result<EnrollmentActionResponse, ApiError> {
        self.enrollment_action(
            persistence,
            event_id,
            organizer,
            Command::RejectEnrollment { enrollment_id },
            enrollment_id,
            cause,
            "Rejected",
        )
    }

    /// Records that an accepted participant attended.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The event does not exist
    /// - `organizer` did not create the event
    /// - The enrollment does not exist or is not accepted
    pub fn check_in(
        &self,
        persistence: &mut Persistence,
        event_id: EventId,
        organizer: &ParticipantId,
        enrollment_id: EnrollmentId,
        cause: Cause,
    ) -> Result<EnrollmentActionResponse, ApiError> {
        self.enrollment_action(
            persistence,
            event_id,
            organizer,
            Command::CheckIn { enrollment_id },
            enrollment_id,
            cause,
            "Checked in",
        )
    }

    /// Clears a recorded attendance.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The event does not exist
    /// - `organizer` did not create the event
    /// - The enrollment does not exist
    pub fn cancel_check_in(
        &self,
        persistence: &mut Persistence,
        event_id: EventId,
        organizer: &ParticipantId,
        enrollment_id: EnrollmentId,
        cause: Cause,
    ) -> Result<EnrollmentActionResponse, ApiError> {
        self.enrollment_action(
            persistence,
            event_id,
            organizer,
            Command::CancelCheckIn { enrollment_id },
            enrollment_id,
            cause,
            "Cancelled check-in for",
        )
    }

    /// Returns the read model of an event.
    ///
    /// # Errors
    ///
    /// Returns `ApiError::EventNotFound` if the event does not exist.
    #[allow(clippy::unused_self)]
    pub fn get_event(
        &self,
        persistence: &mut Persistence,
        event_id: EventId,
    ) -> Result<EventView, ApiError> {
        let state: State = persistence.load_event(event_id)?;
        EventView::from_state(&state)
    }

    /// Returns the read model of every event, oldest first.
    ///
    /// # Errors
    ///
    /// Returns an error if the events cannot be loaded.
    #[allow(clippy::unused_self)]
    pub fn list_events(&self, persistence: &mut Persistence) -> Result<Vec<EventView>, ApiError> {
        persistence
            .list_events()?
            .iter()
            .map(EventView::from_state)
            .collect()
    }

    /// Returns the stored audit events of an event, oldest first.
    ///
    /// # Errors
    ///
    /// Returns `ApiError::EventNotFound` if the event does not exist.
    #[allow(clippy::unused_self)]
    pub fn audit_timeline(
        &self,
        persistence: &mut Persistence,
        event_id: EventId,
    ) -> Result<Vec<AuditEntryView>, ApiError> {
        persistence.load_event(event_id)?;
        let timeline: Vec<AuditEvent> = persistence.get_audit_timeline(event_id)?;
        timeline.iter().map(AuditEntryView::from_audit_event).collect()
    }

    #[allow(clippy::too_many_arguments)]
    fn enrollment_action(
        &self,
        persistence: &mut Persistence,
        event_id: EventId,
        organizer: &ParticipantId,
        command: Command,
        enrollment_id: EnrollmentId,
        cause: Cause,
        verb: &str,
    ) -> Result<EnrollmentActionResponse, ApiError> {
        let result: TransitionResult = self.execute(
            persistence,
            event_id,
            organizer,
            Permission::Organizer,
            command,
            cause,
        )?;

        let enrollment: &Enrollment = result
            .new_state
            .event
            .find_enrollment_by_id(enrollment_id)
            .ok_or_else(|| missing_enrollment(event_id))?;

        Ok(EnrollmentActionResponse {
            event_id: event_id.value(),
            enrollment: EnrollmentView::from_enrollment(enrollment)?,
            message: format!("{verb} '{}'", enrollment.participant()),
        })
    }

    fn execute(
        &self,
        persistence: &mut Persistence,
        event_id: EventId,
        acting: &ParticipantId,
        permission: Permission,
        command: Command,
        cause: Cause,
    ) -> Result<TransitionResult, ApiError> {
        let action: &'static str = command.name();
        let lock: Arc<Mutex<()>> = self.locks.lock_for(event_id);
        let guard: MutexGuard<'_, ()> = lock.lock().unwrap_or_else(PoisonError::into_inner);

        let outcome: Result<TransitionResult, ApiError> =
            self.transition(persistence, event_id, acting, permission, command, cause);
        drop(guard);
        self.locks.release(event_id, lock);

        let result: TransitionResult = outcome?;
        info!(
            event_id = event_id.value(),
            participant = %acting,
            action,
            version = result.new_state.version,
            notices = result.notices.len(),
            "Completed request"
        );

        self.deliver(&result.notices);
        Ok(result)
    }

    /// Loads, authorizes, applies, and stores one command. Callers hold the
    /// event's lock.
    fn transition(
        &self,
        persistence: &mut Persistence,
        event_id: EventId,
        acting: &ParticipantId,
        permission: Permission,
        command: Command,
        cause: Cause,
    ) -> Result<TransitionResult, ApiError> {
        let action: &'static str = command.name();
        let state: State = persistence.load_event(event_id)?;

        let actor: Actor = match permission {
            Permission::Participant => AuthorizationService::participant_actor(acting),
            Permission::Organizer => {
                AuthorizationService::authorize_organizer(&state.event, acting, action)?
            }
        };

        let result: TransitionResult = apply(&state, command, self.clock.now(), actor, cause)
            .map_err(|err| {
                warn!(
                    event_id = event_id.value(),
                    participant = %acting,
                    action,
                    error = %err,
                    "Rejected request"
                );
                ApiError::from(err)
            })?;

        persistence.persist_transition(&result)?;
        Ok(result)
    }

    fn deliver(&self, notices: &[EnrollmentNotice]) {
        for notice in notices {
            if let Err(err) = self.sink.deliver(notice) {
                warn!(
                    event_id = notice.event_id.value(),
                    participant = %notice.participant,
                    kind = %notice.kind,
                    error = %err,
                    "Failed to deliver enrollment notice"
                );
            }
        }
    }
}

fn promoted_participants(notices: &[EnrollmentNotice]) -> Vec<String> {
    notices
        .iter()
        .filter(|n| n.kind == NoticeKind::Promoted)
        .map(|n| n.participant.value().to_string())
        .collect()
}

fn missing_enrollment(event_id: EventId) -> ApiError {
    ApiError::Internal {
        message: format!("Stored transition for event {event_id} lost its enrollment"),
    }
}
