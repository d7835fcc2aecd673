// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

#![allow(clippy::expect_used, clippy::unwrap_used)]

mod notification_tests;

use meetup_audit::Cause;
use meetup_domain::{
    CapacityLimit, EnrollmentType, EventDraft, EventId, EventSchedule, ParticipantId,
};
use meetup_persistence::Persistence;
use time::macros::datetime;
use time::{Duration, OffsetDateTime};

use crate::{CreateEventResponse, EnrollmentService, FixedClock, MemoryNotificationSink};

pub type TestService = EnrollmentService<FixedClock, MemoryNotificationSink>;

pub fn test_now() -> OffsetDateTime {
    datetime!(2026-03-01 10:00 UTC)
}

pub fn create_test_service() -> TestService {
    EnrollmentService::new(FixedClock::new(test_now()), MemoryNotificationSink::new())
}

pub fn create_test_cause() -> Cause {
    Cause::new(String::from("test-request"), String::from("Test request"))
}

pub fn organizer() -> ParticipantId {
    ParticipantId::new("organizer")
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

/// Creates an event organized by [`organizer`].
pub fn create_test_event(
    service: &TestService,
    persistence: &mut Persistence,
    enrollment_type: EnrollmentType,
    limit: u32,
) -> EventId {
    let response: CreateEventResponse = service
        .create_event(
            persistence,
            &organizer(),
            create_test_draft(enrollment_type, limit),
            create_test_cause(),
        )
        .unwrap();
    EventId::new(response.event_id)
}

/// Enrolls `member-1` through `member-{count}`, one minute apart, and
/// discards the resulting notices.
pub fn enroll_many(
    service: &TestService,
    persistence: &mut Persistence,
    event_id: EventId,
    count: i64,
) {
    for n in 1..=count {
        service.clock().advance(Duration::minutes(1));
        service
            .request_enroll(persistence, event_id, &participant(n), create_test_cause())
            .unwrap();
    }
    service.sink().take();
}
