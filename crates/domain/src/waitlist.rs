// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Waitlist ordering and promotion selection.
//!
//! Waiting enrollments are promoted in a strict total order:
//! 1. Enrollment time (earliest first)
//! 2. Enrollment identifier (lowest first)
//!
//! Enrollment identifiers are unique within an event, so the order never
//! contains a tie.
//!
//! Everything here is a pure function over a slice of enrollments. Flipping
//! the selected enrollments to accepted is the event's job.

use std::cmp::Ordering;

use crate::enrollment::Enrollment;
use crate::types::{CapacityLimit, EnrollmentId};

/// Compares two enrollments by promotion priority.
///
/// `Ordering::Less` means `a` is promoted before `b`.
#[must_use]
pub fn compare_waitlist_priority(a: &Enrollment, b: &Enrollment) -> Ordering {
    a.enrolled_at()
        .cmp(&b.enrolled_at())
        .then_with(|| a.enrollment_id().cmp(&b.enrollment_id()))
}

/// Returns the waiting enrollments in promotion order.
#[must_use]
pub fn waiting_list(enrollments: &[Enrollment]) -> Vec<&Enrollment> {
    let mut waiting: Vec<&Enrollment> = enrollments.iter().filter(|e| e.is_waiting()).collect();
    waiting.sort_by(|a, b| compare_waitlist_priority(a, b));
    waiting
}

/// Returns how many enrollments may still be accepted.
///
/// `None` means unbounded (unlimited capacity). A limit already exceeded
/// yields `Some(0)`.
#[must_use]
pub fn available_slots(limit: CapacityLimit, accepted: usize) -> Option<usize> {
    if limit.is_unlimited() {
        return None;
    }
    Some(usize::try_from(limit.value()).map_or(usize::MAX, |cap| cap.saturating_sub(accepted)))
}

/// Selects the waiting enrollments to promote, in promotion order.
///
/// # Arguments
///
/// * `enrollments` - All enrollments of the event
/// * `slots` - Free slots as returned by [`available_slots`]
#[must_use]
pub fn select_promotions(enrollments: &[Enrollment], slots: Option<usize>) -> Vec<EnrollmentId> {
    let waiting: Vec<&Enrollment> = waiting_list(enrollments);
    let take: usize = slots.map_or(waiting.len(), |k| k.min(waiting.len()));

    waiting
        .into_iter()
        .take(take)
        .map(Enrollment::enrollment_id)
        .collect()
}
