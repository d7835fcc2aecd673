// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use meetup_audit::{Actor, ActorRole, Cause};
use meetup_domain::{
    CapacityLimit, EnrollmentType, Event, EventDraft, EventId, EventSchedule, ParticipantId,
};
use time::macros::datetime;
use time::{Duration, OffsetDateTime};

use crate::{Command, State, apply};

pub fn test_now() -> OffsetDateTime {
    datetime!(2026-03-01 10:00 UTC)
}

pub fn create_test_actor() -> Actor {
    Actor::new(String::from("member-1"), ActorRole::Participant)
}

pub fn create_test_cause() -> Cause {
    Cause::new(String::from("req-456"), String::from("Participant request"))
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

pub fn create_test_state(enrollment_type: EnrollmentType, limit: u32) -> State {
    let event: Event = Event::new(
        EventId::new(1),
        ParticipantId::new("organizer"),
        create_test_draft(enrollment_type, limit),
        test_now(),
    );
    State::new(event, 1)
}

pub fn participant(n: i64) -> ParticipantId {
    ParticipantId::new(&format!("member-{n}"))
}

/// Enrolls `count` participants one command at a time.
pub fn enroll_many(state: State, count: i64) -> State {
    (1..=count).fold(state, |state, n| {
        let at: OffsetDateTime = test_now() + Duration::minutes(n);
        apply(
            &state,
            Command::Enroll {
                participant: participant(n),
            },
            at,
            create_test_actor(),
            create_test_cause(),
        )
        .unwrap()
        .new_state
    })
}
