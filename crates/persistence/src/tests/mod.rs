// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

#![allow(clippy::expect_used, clippy::unwrap_used)]

mod transition_tests;

use meetup::{Command, CreationResult, State, TransitionResult, apply, apply_create_event};
use meetup_audit::{Actor, ActorRole, Cause};
use meetup_domain::{
    CapacityLimit, EnrollmentType, EventDraft, EventId, EventSchedule, ParticipantId,
};
use time::macros::datetime;
use time::{Duration, OffsetDateTime};

use crate::Persistence;

pub fn test_now() -> OffsetDateTime {
    datetime!(2026-03-01 10:00 UTC)
}

pub fn create_test_actor() -> Actor {
    Actor::new(String::from("test-actor"), ActorRole::System)
}

pub fn create_test_cause() -> Cause {
    Cause::new(String::from("test-cause"), String::from("Test operation"))
}

pub fn participant(n: i64) -> ParticipantId {
    ParticipantId::new(&format!("member-{n}"))
}

pub fn create_test_draft(enrollment_type: EnrollmentType, limit: u32) -> EventDraft {
    let now: OffsetDateTime = test_now();
    EventDraft {
        title: String::from("Rust study night"),
        enrollment_type,
        limit: CapacityLimit::new(limit),
        schedule: EventSchedule::new(
            now + Duration::days(1),
            now + Duration::days(2),
            now + Duration::hours(3),
        ),
    }
}

/// Creates and stores an event, returning its identifier.
pub fn create_stored_event(
    persistence: &mut Persistence,
    enrollment_type: EnrollmentType,
    limit: u32,
) -> EventId {
    let result: CreationResult = apply_create_event(
        ParticipantId::new("organizer"),
        create_test_draft(enrollment_type, limit),
        test_now(),
        create_test_actor(),
        create_test_cause(),
    )
    .unwrap();
    persistence.create_event(&result).unwrap()
}

/// Loads the event, applies the command, and stores the transition.
pub fn apply_and_store(
    persistence: &mut Persistence,
    event_id: EventId,
    command: Command,
) -> TransitionResult {
    let state: State = persistence.load_event(event_id).unwrap();
    let transition: TransitionResult = apply(
        &state,
        command,
        test_now() + Duration::minutes(30),
        create_test_actor(),
        create_test_cause(),
    )
    .unwrap();
    persistence.persist_transition(&transition).unwrap();
    transition
}

pub fn enroll_stored(persistence: &mut Persistence, event_id: EventId, count: i64) {
    for n in 1..=count {
        apply_and_store(
            persistence,
            event_id,
            Command::Enroll {
                participant: participant(n),
            },
        );
    }
}
