// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use meetup_audit::{Actor, ActorRole, Cause};
use meetup_domain::{DomainError, EnrollmentType, EventDraft, ParticipantId};
use time::Duration;

use crate::tests::helpers::{create_test_cause, create_test_draft, test_now};
use crate::{CoreError, CreationResult, apply_create_event};

fn organizer() -> Actor {
    Actor::new(String::from("organizer"), ActorRole::Organizer)
}

#[test]
fn test_create_event_records_audit_event() {
    let draft: EventDraft = create_test_draft(EnrollmentType::Confirmative, 12);

    let result: CreationResult = apply_create_event(
        ParticipantId::new("organizer"),
        draft.clone(),
        test_now(),
        organizer(),
        create_test_cause(),
    )
    .unwrap();

    assert_eq!(result.draft, draft);
    assert_eq!(result.created_by, ParticipantId::new("organizer"));
    assert_eq!(result.created_at, test_now());
    assert_eq!(result.audit_event.action.name, "CreateEvent");
    assert_eq!(result.audit_event.event_id, None);
    assert_eq!(result.audit_event.after.limit.value(), 12);
    assert_eq!(result.audit_event.after.version, 1);
    assert!(
        result
            .audit_event
            .action
            .details
            .as_ref()
            .unwrap()
            .contains("CONFIRMATIVE")
    );
}

#[test]
fn test_create_event_rejects_blank_title() {
    let mut draft: EventDraft = create_test_draft(EnrollmentType::Fcfs, 3);
    draft.title = String::from("  ");

    let result: Result<CreationResult, CoreError> = apply_create_event(
        ParticipantId::new("organizer"),
        draft,
        test_now(),
        organizer(),
        create_test_cause(),
    );

    assert!(matches!(
        result,
        Err(CoreError::DomainViolation(DomainError::InvalidTitle(_)))
    ));
}

#[test]
fn test_create_event_rejects_deadline_in_the_past() {
    let draft: EventDraft = create_test_draft(EnrollmentType::Fcfs, 3);
    let later: time::OffsetDateTime = test_now() + Duration::hours(4);

    let result: Result<CreationResult, CoreError> = apply_create_event(
        ParticipantId::new("organizer"),
        draft,
        later,
        organizer(),
        Cause::new(String::from("req-1"), String::from("Organizer request")),
    );

    assert!(matches!(
        result,
        Err(CoreError::DomainViolation(DomainError::InvalidSchedule { .. }))
    ));
}
