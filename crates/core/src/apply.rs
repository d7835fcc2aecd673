// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use meetup_audit::{Action, Actor, AuditEvent, Cause, StateSnapshot};
use meetup_domain::{
    CapacityLimit, Disenrollment, Enrollment, Event, EventDraft, EventId, ParticipantId,
};
use time::OffsetDateTime;

use crate::command::Command;
use crate::error::CoreError;
use crate::notice::{EnrollmentNotice, NoticeKind};
use crate::state::{CreationResult, State, TransitionResult};

/// Validates a draft and prepares the creation of a new event.
///
/// # Arguments
///
/// * `organizer` - The participant creating the event
/// * `draft` - The proposed event
/// * `now` - The current time
/// * `actor` - The actor performing this action
/// * `cause` - The cause or reason for this action
///
/// # Errors
///
/// Returns an error if the title or schedule is invalid.
pub fn apply_create_event(
    organizer: ParticipantId,
    draft: EventDraft,
    now: OffsetDateTime,
    actor: Actor,
    cause: Cause,
) -> Result<CreationResult, CoreError> {
    draft.validate(now)?;

    let action: Action = Action::new(
        String::from("CreateEvent"),
        Some(format!(
            "Created {} event '{}' with limit {}",
            draft.enrollment_type, draft.title, draft.limit
        )),
    );
    let after: StateSnapshot = StateSnapshot::new(draft.limit, 0, 0, 1);
    let audit_event: AuditEvent = AuditEvent::new(
        None,
        actor,
        cause,
        action,
        StateSnapshot::empty(),
        after,
        now,
    );

    Ok(CreationResult {
        created_by: organizer,
        draft,
        created_at: now,
        audit_event,
    })
}

/// Applies a command to the current state, producing a new state and audit event.
///
/// The input state is never modified. On success the returned state carries
/// the next version and the transition lists the notices to deliver.
///
/// # Arguments
///
/// * `state` - The current state (immutable)
/// * `command` - The command to apply
/// * `now` - The current time
/// * `actor` - The actor performing this action
/// * `cause` - The cause or reason for this action
///
/// # Errors
///
/// Returns an error if the command violates an enrollment rule.
pub fn apply(
    state: &State,
    command: Command,
    now: OffsetDateTime,
    actor: Actor,
    cause: Cause,
) -> Result<TransitionResult, CoreError> {
    let mut event: Event = state.event.clone();
    let event_id: EventId = event.event_id();
    let action_name: &'static str = command.name();

    let (details, notices): (String, Vec<EnrollmentNotice>) = match command {
        Command::Enroll { participant } => {
            let enrollment: Enrollment = event.enroll(participant, now)?;
            let kind: NoticeKind = if enrollment.is_accepted() {
                NoticeKind::Enrolled
            } else {
                NoticeKind::Waitlisted
            };
            (
                format!(
                    "Enrolled '{}' as enrollment {} ({kind})",
                    enrollment.participant(),
                    enrollment.enrollment_id()
                ),
                vec![EnrollmentNotice::for_enrollment(kind, event_id, &enrollment)],
            )
        }
        Command::Disenroll { participant } => {
            let outcome: Disenrollment = event.disenroll(&participant)?;
            let mut notices: Vec<EnrollmentNotice> = vec![EnrollmentNotice {
                kind: NoticeKind::Disenrolled,
                event_id,
                participant,
                accepted: false,
            }];
            notices.extend(promotion_notices(event_id, &outcome.promoted));
            (
                format!(
                    "Withdrew '{}', promoted {}",
                    outcome.removed.participant(),
                    outcome.promoted.len()
                ),
                notices,
            )
        }
        Command::ChangeCapacityLimit { limit } => {
            let previous: CapacityLimit = event.limit();
            let promoted: Vec<Enrollment> = event.change_capacity_limit(limit);
            (
                format!(
                    "Changed limit {previous} -> {limit}, promoted {}",
                    promoted.len()
                ),
                promotion_notices(event_id, &promoted),
            )
        }
        Command::AcceptEnrollment { enrollment_id } => match event.accept(enrollment_id)? {
            Some(enrollment) => (
                format!("Accepted enrollment {enrollment_id}"),
                vec![EnrollmentNotice::for_enrollment(
                    NoticeKind::Accepted,
                    event_id,
                    &enrollment,
                )],
            ),
            None => (
                format!("Enrollment {enrollment_id} was already accepted"),
                Vec::new(),
            ),
        },
        Command::RejectEnrollment { enrollment_id } => match event.reject(enrollment_id)? {
            Some(enrollment) => (
                format!("Rejected enrollment {enrollment_id}"),
                vec![EnrollmentNotice::for_enrollment(
                    NoticeKind::Rejected,
                    event_id,
                    &enrollment,
                )],
            ),
            None => (
                format!("Enrollment {enrollment_id} was already waiting"),
                Vec::new(),
            ),
        },
        Command::CheckIn { enrollment_id } => {
            event.check_in(enrollment_id)?;
            (format!("Checked in enrollment {enrollment_id}"), Vec::new())
        }
        Command::CancelCheckIn { enrollment_id } => {
            event.cancel_check_in(enrollment_id)?;
            (
                format!("Cancelled check-in of enrollment {enrollment_id}"),
                Vec::new(),
            )
        }
    };

    let new_state: State = State::new(event, state.version + 1);

    let audit_event: AuditEvent = AuditEvent::new(
        Some(event_id),
        actor,
        cause,
        Action::new(String::from(action_name), Some(details)),
        state.to_snapshot(),
        new_state.to_snapshot(),
        now,
    );

    Ok(TransitionResult {
        new_state,
        base_version: state.version,
        audit_event,
        notices,
    })
}

fn promotion_notices(event_id: EventId, promoted: &[Enrollment]) -> Vec<EnrollmentNotice> {
    promoted
        .iter()
        .map(|e| EnrollmentNotice::for_enrollment(NoticeKind::Promoted, event_id, e))
        .collect()
}
