// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use std::str::FromStr;

use time::Duration;

use crate::tests::helpers::{create_test_schedule, test_now};
use crate::{CapacityLimit, CapacityState, DomainError, EnrollmentType, EventSchedule};

#[test]
fn test_enrollment_type_round_trips_through_strings() {
    assert_eq!(EnrollmentType::Fcfs.as_str(), "FCFS");
    assert_eq!(EnrollmentType::Confirmative.as_str(), "CONFIRMATIVE");
    assert_eq!(
        EnrollmentType::from_str("FCFS").unwrap(),
        EnrollmentType::Fcfs
    );
    assert_eq!(
        EnrollmentType::from_str("confirmative").unwrap(),
        EnrollmentType::Confirmative
    );
}

#[test]
fn test_enrollment_type_rejects_unknown_values() {
    let result: Result<EnrollmentType, DomainError> = EnrollmentType::from_str("lottery");
    assert!(matches!(
        result,
        Err(DomainError::InvalidEnrollmentType(value)) if value == "lottery"
    ));
}

#[test]
fn test_only_fcfs_auto_accepts() {
    assert!(EnrollmentType::Fcfs.auto_accepts());
    assert!(!EnrollmentType::Confirmative.auto_accepts());
}

#[test]
fn test_zero_limit_is_unlimited() {
    let limit: CapacityLimit = CapacityLimit::new(0);
    assert!(limit.is_unlimited());
    assert_eq!(limit, CapacityLimit::unlimited());
    assert!(limit.has_room_for(10_000));
    assert_eq!(format!("{limit}"), "unlimited");
}

#[test]
fn test_finite_limit_room() {
    let limit: CapacityLimit = CapacityLimit::new(3);
    assert!(limit.has_room_for(2));
    assert!(!limit.has_room_for(3));
    assert!(!limit.has_room_for(4));
    assert_eq!(format!("{limit}"), "3");
}

#[test]
fn test_limit_growth() {
    let three: CapacityLimit = CapacityLimit::new(3);
    assert!(three.grows_to(CapacityLimit::new(5)));
    assert!(three.grows_to(CapacityLimit::unlimited()));
    assert!(!three.grows_to(CapacityLimit::new(3)));
    assert!(!three.grows_to(CapacityLimit::new(2)));
    assert!(!CapacityLimit::unlimited().grows_to(CapacityLimit::new(10)));
}

#[test]
fn test_capacity_state_classification() {
    let limit: CapacityLimit = CapacityLimit::new(3);
    assert_eq!(
        CapacityState::classify(limit, 2),
        CapacityState::UnderCapacity
    );
    assert_eq!(CapacityState::classify(limit, 3), CapacityState::AtCapacity);
    assert_eq!(
        CapacityState::classify(limit, 4),
        CapacityState::OverCapacity
    );
    assert_eq!(
        CapacityState::classify(CapacityLimit::unlimited(), 50),
        CapacityState::UnderCapacity
    );
}

#[test]
fn test_enrollment_open_until_deadline_inclusive() {
    let schedule: EventSchedule = create_test_schedule();
    let deadline = schedule.enrollment_deadline();

    assert!(schedule.is_enrollment_open(test_now()));
    assert!(schedule.is_enrollment_open(deadline));
    assert!(!schedule.is_enrollment_open(deadline + Duration::seconds(1)));
}
