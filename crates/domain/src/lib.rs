// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

#![deny(
    clippy::pedantic,
    clippy::cargo,
    clippy::nursery,
    clippy::style,
    clippy::correctness,
    clippy::all,
    clippy::suspicious,
    clippy::complexity,
    clippy::perf,
    clippy::unwrap_used,
    clippy::expect_used
)]

mod enrollment;
mod error;
mod event;
mod types;
mod validation;
pub mod waitlist;

#[cfg(test)]
mod tests;

pub use enrollment::Enrollment;
pub use error::DomainError;
pub use event::{Disenrollment, Event, EventDraft};
pub use types::{
    CapacityLimit, CapacityState, EnrollmentId, EnrollmentType, EventId, EventSchedule,
    ParticipantId,
};
pub use validation::{validate_participant, validate_schedule, validate_title};
pub use waitlist::{available_slots, compare_waitlist_priority, select_promotions, waiting_list};
