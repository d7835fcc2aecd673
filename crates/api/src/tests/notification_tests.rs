// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use meetup::{EnrollmentNotice, NoticeKind};
use meetup_domain::{CapacityLimit, EnrollmentId, EnrollmentType, EventId};
use meetup_persistence::Persistence;
use tokio::sync::broadcast;

use super::{
    TestService, create_test_cause, create_test_draft, create_test_event, create_test_service,
    enroll_many, organizer, participant, test_now,
};
use crate::{
    ApiError, BroadcastNotificationSink, CreateEventResponse, EnrollmentResponse, EnrollmentService,
    EventView, FixedClock, NotificationError, NotificationSink, TracingNotificationSink,
};

struct FailingSink;

impl NotificationSink for FailingSink {
    fn deliver(&self, _notice: &EnrollmentNotice) -> Result<(), NotificationError> {
        Err(NotificationError::DeliveryFailed {
            message: String::from("mail server unavailable"),
        })
    }
}

fn kinds(notices: &[EnrollmentNotice]) -> Vec<NoticeKind> {
    notices.iter().map(|n| n.kind).collect()
}

fn sample_notice() -> EnrollmentNotice {
    EnrollmentNotice {
        kind: NoticeKind::Enrolled,
        event_id: EventId::new(1),
        participant: participant(1),
        accepted: true,
    }
}

#[test]
fn test_enroll_notices_distinguish_seat_and_waitlist() {
    let service: TestService = create_test_service();
    let mut persistence: Persistence = Persistence::new_in_memory().unwrap();
    let event_id: EventId =
        create_test_event(&service, &mut persistence, EnrollmentType::Fcfs, 1);

    for n in 1..=2 {
        service
            .request_enroll(&mut persistence, event_id, &participant(n), create_test_cause())
            .unwrap();
    }

    let notices: Vec<EnrollmentNotice> = service.sink().take();
    assert_eq!(kinds(&notices), vec![NoticeKind::Enrolled, NoticeKind::Waitlisted]);
    assert_eq!(notices[0].participant, participant(1));
    assert!(notices[0].accepted);
    assert!(!notices[1].accepted);
}

#[test]
fn test_disenroll_notifies_withdrawn_and_promoted() {
    let service: TestService = create_test_service();
    let mut persistence: Persistence = Persistence::new_in_memory().unwrap();
    let event_id: EventId =
        create_test_event(&service, &mut persistence, EnrollmentType::Fcfs, 1);
    enroll_many(&service, &mut persistence, event_id, 2);

    service
        .request_disenroll(&mut persistence, event_id, &participant(1), create_test_cause())
        .unwrap();

    let notices: Vec<EnrollmentNotice> = service.sink().take();
    assert_eq!(kinds(&notices), vec![NoticeKind::Disenrolled, NoticeKind::Promoted]);
    assert_eq!(notices[0].participant, participant(1));
    assert_eq!(notices[1].participant, participant(2));
    assert!(notices[1].accepted);
}

#[test]
fn test_limit_increase_notifies_each_promotion() {
    let service: TestService = create_test_service();
    let mut persistence: Persistence = Persistence::new_in_memory().unwrap();
    let event_id: EventId =
        create_test_event(&service, &mut persistence, EnrollmentType::Fcfs, 3);
    enroll_many(&service, &mut persistence, event_id, 7);

    service
        .update_capacity(
            &mut persistence,
            event_id,
            &organizer(),
            CapacityLimit::new(5),
            create_test_cause(),
        )
        .unwrap();

    let notices: Vec<EnrollmentNotice> = service.sink().take();
    assert_eq!(kinds(&notices), vec![NoticeKind::Promoted, NoticeKind::Promoted]);
    assert_eq!(notices[0].participant, participant(4));
    assert_eq!(notices[1].participant, participant(5));
}

#[test]
fn test_organizer_decisions_are_notified() {
    let service: TestService = create_test_service();
    let mut persistence: Persistence = Persistence::new_in_memory().unwrap();
    let event_id: EventId =
        create_test_event(&service, &mut persistence, EnrollmentType::Confirmative, 2);
    enroll_many(&service, &mut persistence, event_id, 1);

    service
        .accept_enrollment(
            &mut persistence,
            event_id,
            &organizer(),
            EnrollmentId::new(1),
            create_test_cause(),
        )
        .unwrap();
    service
        .reject_enrollment(
            &mut persistence,
            event_id,
            &organizer(),
            EnrollmentId::new(1),
            create_test_cause(),
        )
        .unwrap();

    let notices: Vec<EnrollmentNotice> = service.sink().take();
    assert_eq!(kinds(&notices), vec![NoticeKind::Accepted, NoticeKind::Rejected]);
}

#[test]
fn test_repeated_accept_sends_no_second_notice() {
    let service: TestService = create_test_service();
    let mut persistence: Persistence = Persistence::new_in_memory().unwrap();
    let event_id: EventId =
        create_test_event(&service, &mut persistence, EnrollmentType::Confirmative, 2);
    enroll_many(&service, &mut persistence, event_id, 1);

    for _ in 0..2 {
        service
            .accept_enrollment(
                &mut persistence,
                event_id,
                &organizer(),
                EnrollmentId::new(1),
                create_test_cause(),
            )
            .unwrap();
    }

    assert_eq!(service.sink().take().len(), 1);
}

#[test]
fn test_failed_request_sends_no_notice() {
    let service: TestService = create_test_service();
    let mut persistence: Persistence = Persistence::new_in_memory().unwrap();
    let event_id: EventId =
        create_test_event(&service, &mut persistence, EnrollmentType::Fcfs, 1);
    enroll_many(&service, &mut persistence, event_id, 1);

    let result: Result<EnrollmentResponse, ApiError> =
        service.request_enroll(&mut persistence, event_id, &participant(1), create_test_cause());
    assert!(result.is_err());

    assert!(service.sink().notices().is_empty());
}

#[test]
fn test_failed_delivery_keeps_stored_transition() {
    let service: EnrollmentService<FixedClock, FailingSink> =
        EnrollmentService::new(FixedClock::new(test_now()), FailingSink);
    let mut persistence: Persistence = Persistence::new_in_memory().unwrap();
    let created: CreateEventResponse = service
        .create_event(
            &mut persistence,
            &organizer(),
            create_test_draft(EnrollmentType::Fcfs, 2),
            create_test_cause(),
        )
        .unwrap();
    let event_id: EventId = EventId::new(created.event_id);

    let response: EnrollmentResponse = service
        .request_enroll(&mut persistence, event_id, &participant(1), create_test_cause())
        .unwrap();

    assert!(response.accepted);
    let view: EventView = service.get_event(&mut persistence, event_id).unwrap();
    assert_eq!(view.accepted.len(), 1);
    assert_eq!(view.version, 2);
}

#[test]
fn test_broadcast_sink_reaches_subscribers() {
    let sink: BroadcastNotificationSink = BroadcastNotificationSink::new();
    let mut receiver: broadcast::Receiver<EnrollmentNotice> = sink.subscribe();

    sink.deliver(&sample_notice()).unwrap();

    let received: EnrollmentNotice = receiver.try_recv().unwrap();
    assert_eq!(received, sample_notice());
}

#[test]
fn test_broadcast_sink_without_subscribers_succeeds() {
    let sink: BroadcastNotificationSink = BroadcastNotificationSink::new();

    assert!(sink.deliver(&sample_notice()).is_ok());
}

#[test]
fn test_broadcast_sink_reaches_every_subscriber() {
    let sink: BroadcastNotificationSink = BroadcastNotificationSink::new();
    let mut first: broadcast::Receiver<EnrollmentNotice> = sink.subscribe();
    let mut second: broadcast::Receiver<EnrollmentNotice> = sink.subscribe();

    sink.deliver(&sample_notice()).unwrap();

    assert_eq!(first.try_recv().unwrap().kind, NoticeKind::Enrolled);
    assert_eq!(second.try_recv().unwrap().kind, NoticeKind::Enrolled);
}

#[test]
fn test_tracing_sink_accepts_notices() {
    assert!(TracingNotificationSink.deliver(&sample_notice()).is_ok());
}
