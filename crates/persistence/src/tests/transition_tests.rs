// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use meetup::{Command, State, TransitionResult, apply};
use meetup_domain::{CapacityLimit, EnrollmentId, EnrollmentType, EventId};

use crate::tests::{
    apply_and_store, create_stored_event, create_test_actor, create_test_cause, enroll_stored,
    participant, test_now,
};
use crate::{Persistence, PersistenceError};

fn enroll(state: &State, n: i64) -> TransitionResult {
    apply(
        state,
        Command::Enroll {
            participant: participant(n),
        },
        test_now(),
        create_test_actor(),
        create_test_cause(),
    )
    .unwrap()
}

#[test]
fn test_persist_transition_bumps_stored_version() {
    let mut persistence: Persistence = Persistence::new_in_memory().unwrap();
    let event_id: EventId = create_stored_event(&mut persistence, EnrollmentType::Fcfs, 3);

    enroll_stored(&mut persistence, event_id, 2);

    let state: State = persistence.load_event(event_id).unwrap();
    assert_eq!(state.version, 3);
    assert_eq!(state.event.accepted_count(), 2);
}

#[test]
fn test_stale_transition_is_rejected() {
    let mut persistence: Persistence = Persistence::new_in_memory().unwrap();
    let event_id: EventId = create_stored_event(&mut persistence, EnrollmentType::Fcfs, 1);
    let loaded: State = persistence.load_event(event_id).unwrap();

    let first: TransitionResult = enroll(&loaded, 1);
    let second: TransitionResult = enroll(&loaded, 2);

    persistence.persist_transition(&first).unwrap();
    let result: Result<i64, PersistenceError> = persistence.persist_transition(&second);

    assert!(matches!(
        result,
        Err(PersistenceError::VersionConflict {
            expected_version: 1,
            ..
        })
    ));

    // The rejected transition left nothing behind.
    let state: State = persistence.load_event(event_id).unwrap();
    assert_eq!(state.event.enrollments().len(), 1);
    assert_eq!(state.event.accepted_count(), 1);
    assert_eq!(persistence.get_audit_timeline(event_id).unwrap().len(), 2);
}

#[test]
fn test_transition_for_unknown_event_reports_not_found() {
    let mut persistence: Persistence = Persistence::new_in_memory().unwrap();
    let event_id: EventId = create_stored_event(&mut persistence, EnrollmentType::Fcfs, 1);
    let loaded: State = persistence.load_event(event_id).unwrap();

    let orphan: TransitionResult = enroll(&loaded, 1);
    let mut other: Persistence = Persistence::new_in_memory().unwrap();

    let result: Result<i64, PersistenceError> = other.persist_transition(&orphan);

    assert!(matches!(result, Err(PersistenceError::EventNotFound(_))));
}

#[test]
fn test_withdrawal_and_promotion_are_stored() {
    let mut persistence: Persistence = Persistence::new_in_memory().unwrap();
    let event_id: EventId = create_stored_event(&mut persistence, EnrollmentType::Fcfs, 3);
    enroll_stored(&mut persistence, event_id, 4);

    apply_and_store(
        &mut persistence,
        event_id,
        Command::Disenroll {
            participant: participant(1),
        },
    );

    let state: State = persistence.load_event(event_id).unwrap();
    assert_eq!(state.event.enrollments().len(), 3);
    assert_eq!(state.event.accepted_count(), 3);
    assert!(state.event.waiting_list().is_empty());
    assert!(state.event.find_enrollment(&participant(1)).is_none());
}

#[test]
fn test_limit_change_is_stored() {
    let mut persistence: Persistence = Persistence::new_in_memory().unwrap();
    let event_id: EventId = create_stored_event(&mut persistence, EnrollmentType::Fcfs, 3);
    enroll_stored(&mut persistence, event_id, 7);

    apply_and_store(
        &mut persistence,
        event_id,
        Command::ChangeCapacityLimit {
            limit: CapacityLimit::new(5),
        },
    );

    let state: State = persistence.load_event(event_id).unwrap();
    assert_eq!(state.event.limit(), CapacityLimit::new(5));
    assert_eq!(state.event.waiting_list().len(), 2);
}

#[test]
fn test_attended_flag_is_stored() {
    let mut persistence: Persistence = Persistence::new_in_memory().unwrap();
    let event_id: EventId = create_stored_event(&mut persistence, EnrollmentType::Fcfs, 3);
    enroll_stored(&mut persistence, event_id, 1);

    apply_and_store(
        &mut persistence,
        event_id,
        Command::CheckIn {
            enrollment_id: EnrollmentId::new(1),
        },
    );

    let state: State = persistence.load_event(event_id).unwrap();
    assert!(state.event.enrollments()[0].is_attended());
}

#[test]
fn test_limit_above_signed_range_persists() {
    let mut persistence: Persistence = Persistence::new_in_memory().unwrap();
    let event_id: EventId = create_stored_event(&mut persistence, EnrollmentType::Fcfs, 1);
    let limit: CapacityLimit = CapacityLimit::new(u32::MAX - 1);

    apply_and_store(
        &mut persistence,
        event_id,
        Command::ChangeCapacityLimit { limit },
    );

    let state: State = persistence.load_event(event_id).unwrap();
    assert_eq!(state.event.limit(), limit);
}

#[test]
fn test_enrollment_counter_survives_withdrawal_of_highest_id() {
    let mut persistence: Persistence = Persistence::new_in_memory().unwrap();
    let event_id: EventId =
        create_stored_event(&mut persistence, EnrollmentType::Confirmative, 2);
    enroll_stored(&mut persistence, event_id, 2);

    apply_and_store(
        &mut persistence,
        event_id,
        Command::Disenroll {
            participant: participant(2),
        },
    );

    let reloaded: State = persistence.load_event(event_id).unwrap();
    assert_eq!(reloaded.event.next_enrollment_id(), EnrollmentId::new(3));

    let late: TransitionResult = apply_and_store(
        &mut persistence,
        event_id,
        Command::Enroll {
            participant: participant(3),
        },
    );

    let enrollment_id: EnrollmentId = late
        .new_state
        .event
        .find_enrollment(&participant(3))
        .unwrap()
        .enrollment_id();
    assert_eq!(enrollment_id, EnrollmentId::new(3));

    let state: State = persistence.load_event(event_id).unwrap();
    assert!(state.event.find_enrollment_by_id(EnrollmentId::new(2)).is_none());
    assert_eq!(state.event.next_enrollment_id(), EnrollmentId::new(4));
}
