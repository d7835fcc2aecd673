// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use time::macros::datetime;
use time::{Duration, OffsetDateTime};

use crate::{
    CapacityLimit, Enrollment, EnrollmentType, Event, EventDraft, EventId, EventSchedule,
    ParticipantId,
};

/// A fixed instant well before every test deadline.
pub fn test_now() -> OffsetDateTime {
    datetime!(2026-03-01 10:00 UTC)
}

pub fn create_test_schedule() -> EventSchedule {
    let now: OffsetDateTime = test_now();
    EventSchedule::new(
        now + Duration::days(1),
        now + Duration::days(2),
        now + Duration::hours(3),
    )
}

pub fn create_test_draft(enrollment_type: EnrollmentType, limit: u32) -> EventDraft {
    EventDraft {
        title: String::from("Rust study night"),
        enrollment_type,
        limit: CapacityLimit::new(limit),
        schedule: create_test_schedule(),
    }
}

pub fn create_test_event(enrollment_type: EnrollmentType, limit: u32) -> Event {
    Event::new(
        EventId::new(1),
        ParticipantId::new("organizer"),
        create_test_draft(enrollment_type, limit),
        test_now(),
    )
}

pub fn participant(n: i64) -> ParticipantId {
    ParticipantId::new(&format!("member-{n}"))
}

/// Enrolls `count` fresh participants one minute apart, starting at `first`.
pub fn enroll_many(event: &mut Event, first: i64, count: i64) -> Vec<Enrollment> {
    (first..first + count)
        .map(|n| {
            let at: OffsetDateTime = test_now() + Duration::minutes(n);
            event.enroll(participant(n), at).unwrap()
        })
        .collect()
}
