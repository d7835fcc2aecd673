// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use meetup_audit::AuditEvent;
use meetup_domain::{CapacityLimit, DomainError, EnrollmentId, EnrollmentType, ParticipantId};
use time::Duration;

use crate::tests::helpers::{
    create_test_actor, create_test_cause, create_test_state, enroll_many, participant, test_now,
};
use crate::{
    Command, CoreError, EnrollmentNotice, NoticeKind, State, TransitionResult, apply,
};

fn run(state: &State, command: Command) -> Result<TransitionResult, CoreError> {
    apply(
        state,
        command,
        test_now() + Duration::hours(1),
        create_test_actor(),
        create_test_cause(),
    )
}

fn kinds(notices: &[EnrollmentNotice]) -> Vec<NoticeKind> {
    notices.iter().map(|n| n.kind).collect()
}

#[test]
fn test_enroll_returns_new_state_and_bumps_version() {
    let state: State = create_test_state(EnrollmentType::Fcfs, 3);

    let transition: TransitionResult = run(
        &state,
        Command::Enroll {
            participant: participant(1),
        },
    )
    .unwrap();

    assert_eq!(transition.base_version, 1);
    assert_eq!(transition.new_state.version, 2);
    assert_eq!(transition.new_state.event.accepted_count(), 1);
    assert!(state.event.enrollments().is_empty());
}

#[test]
fn test_enroll_emits_enrolled_then_waitlisted() {
    let state: State = enroll_many(create_test_state(EnrollmentType::Fcfs, 1), 1);

    let transition: TransitionResult = run(
        &state,
        Command::Enroll {
            participant: participant(2),
        },
    )
    .unwrap();

    assert_eq!(kinds(&transition.notices), vec![NoticeKind::Waitlisted]);
    assert_eq!(transition.notices[0].participant, participant(2));
    assert!(!transition.notices[0].accepted);

    let first: TransitionResult = run(
        &create_test_state(EnrollmentType::Fcfs, 1),
        Command::Enroll {
            participant: participant(1),
        },
    )
    .unwrap();
    assert_eq!(kinds(&first.notices), vec![NoticeKind::Enrolled]);
}

#[test]
fn test_audit_event_contains_before_and_after_state() {
    let state: State = enroll_many(create_test_state(EnrollmentType::Fcfs, 3), 3);

    let transition: TransitionResult = run(
        &state,
        Command::Enroll {
            participant: participant(4),
        },
    )
    .unwrap();

    let audit: &AuditEvent = &transition.audit_event;
    assert_eq!(audit.action.name, "Enroll");
    assert_eq!(audit.actor.id, "member-1");
    assert_eq!(audit.cause.id, "req-456");
    assert_eq!(audit.event_id, Some(state.event.event_id()));
    assert_eq!(audit.before.accepted, 3);
    assert_eq!(audit.before.waiting, 0);
    assert_eq!(audit.after.accepted, 3);
    assert_eq!(audit.after.waiting, 1);
    assert_eq!(audit.after.version, audit.before.version + 1);
    assert!(audit.action.details.as_ref().unwrap().contains("member-4"));
}

#[test]
fn test_disenroll_emits_promotion_notices() {
    let state: State = enroll_many(create_test_state(EnrollmentType::Fcfs, 3), 4);

    let transition: TransitionResult = run(
        &state,
        Command::Disenroll {
            participant: participant(1),
        },
    )
    .unwrap();

    assert_eq!(
        kinds(&transition.notices),
        vec![NoticeKind::Disenrolled, NoticeKind::Promoted]
    );
    assert_eq!(transition.notices[1].participant, participant(4));
    assert!(transition.notices[1].accepted);
    assert!(transition.new_state.event.waiting_list().is_empty());
}

#[test]
fn test_change_limit_promotes_in_order() {
    let state: State = enroll_many(create_test_state(EnrollmentType::Fcfs, 3), 7);

    let transition: TransitionResult = run(
        &state,
        Command::ChangeCapacityLimit {
            limit: CapacityLimit::new(5),
        },
    )
    .unwrap();

    let promoted: Vec<ParticipantId> = transition
        .notices
        .iter()
        .map(|n| n.participant.clone())
        .collect();
    assert_eq!(promoted, vec![participant(4), participant(5)]);
    assert_eq!(transition.new_state.event.waiting_list().len(), 2);
    assert_eq!(transition.audit_event.after.limit, CapacityLimit::new(5));
}

#[test]
fn test_failed_command_leaves_state_untouched() {
    let state: State = enroll_many(create_test_state(EnrollmentType::Fcfs, 3), 1);
    let before: State = state.clone();

    let result: Result<TransitionResult, CoreError> = run(
        &state,
        Command::Enroll {
            participant: participant(1),
        },
    );

    assert!(matches!(
        result,
        Err(CoreError::DomainViolation(
            DomainError::DuplicateEnrollment { .. }
        ))
    ));
    assert_eq!(state, before);
}

#[test]
fn test_enroll_after_deadline_fails() {
    let state: State = create_test_state(EnrollmentType::Fcfs, 3);

    let result: Result<TransitionResult, CoreError> = apply(
        &state,
        Command::Enroll {
            participant: participant(1),
        },
        test_now() + Duration::days(1),
        create_test_actor(),
        create_test_cause(),
    );

    assert!(matches!(
        result,
        Err(CoreError::DomainViolation(DomainError::EnrollmentClosed { .. }))
    ));
}

#[test]
fn test_accept_and_reject_emit_notices() {
    let state: State = enroll_many(create_test_state(EnrollmentType::Confirmative, 2), 2);

    let accepted: TransitionResult = run(
        &state,
        Command::AcceptEnrollment {
            enrollment_id: EnrollmentId::new(2),
        },
    )
    .unwrap();
    assert_eq!(kinds(&accepted.notices), vec![NoticeKind::Accepted]);
    assert_eq!(accepted.notices[0].participant, participant(2));

    let rejected: TransitionResult = run(
        &accepted.new_state,
        Command::RejectEnrollment {
            enrollment_id: EnrollmentId::new(2),
        },
    )
    .unwrap();
    assert_eq!(kinds(&rejected.notices), vec![NoticeKind::Rejected]);
    assert_eq!(rejected.new_state.event.accepted_count(), 0);
}

#[test]
fn test_repeated_accept_is_recorded_without_notice() {
    let state: State = enroll_many(create_test_state(EnrollmentType::Confirmative, 2), 1);
    let accepted: TransitionResult = run(
        &state,
        Command::AcceptEnrollment {
            enrollment_id: EnrollmentId::new(1),
        },
    )
    .unwrap();

    let again: TransitionResult = run(
        &accepted.new_state,
        Command::AcceptEnrollment {
            enrollment_id: EnrollmentId::new(1),
        },
    )
    .unwrap();

    assert!(again.notices.is_empty());
    assert_eq!(again.new_state.event.accepted_count(), 1);
}

#[test]
fn test_check_in_blocks_withdrawal() {
    let state: State = enroll_many(create_test_state(EnrollmentType::Fcfs, 2), 1);

    let checked_in: TransitionResult = run(
        &state,
        Command::CheckIn {
            enrollment_id: EnrollmentId::new(1),
        },
    )
    .unwrap();
    assert!(checked_in.notices.is_empty());

    let result: Result<TransitionResult, CoreError> = run(
        &checked_in.new_state,
        Command::Disenroll {
            participant: participant(1),
        },
    );
    assert!(matches!(
        result,
        Err(CoreError::DomainViolation(DomainError::AlreadyAttended { .. }))
    ));

    let cancelled: TransitionResult = run(
        &checked_in.new_state,
        Command::CancelCheckIn {
            enrollment_id: EnrollmentId::new(1),
        },
    )
    .unwrap();
    assert!(
        run(
            &cancelled.new_state,
            Command::Disenroll {
                participant: participant(1),
            },
        )
        .is_ok()
    );
}
