// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::error::DomainError;
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use time::OffsetDateTime;

/// The acceptance policy of an event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum EnrollmentType {
    /// First come, first served. Enrollments are accepted while capacity remains.
    #[default]
    #[serde(rename = "FCFS")]
    Fcfs,
    /// Every enrollment waits until the organizer accepts it.
    #[serde(rename = "CONFIRMATIVE")]
    Confirmative,
}

impl FromStr for EnrollmentType {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_uppercase().as_str() {
            "FCFS" => Ok(Self::Fcfs),
            "CONFIRMATIVE" => Ok(Self::Confirmative),
            _ => Err(DomainError::InvalidEnrollmentType(s.to_string())),
        }
    }
}

impl std::fmt::Display for EnrollmentType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl EnrollmentType {
    /// Converts this enrollment type to its stored string representation.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Fcfs => "FCFS",
            Self::Confirmative => "CONFIRMATIVE",
        }
    }

    /// Returns whether waiting enrollments are promoted without organizer action.
    #[must_use]
    pub const fn auto_accepts(&self) -> bool {
        matches!(self, Self::Fcfs)
    }
}

/// Identifier of an event, assigned by the store.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct EventId(i64);

impl EventId {
    /// Wraps a stored event identifier.
    #[must_use]
    pub const fn new(value: i64) -> Self {
        Self(value)
    }

    /// Returns the raw identifier.
    #[must_use]
    pub const fn value(&self) -> i64 {
        self.0
    }
}

impl std::fmt::Display for EventId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Identifier of an enrollment within its event.
///
/// Allocated by the event in enrollment order, so it doubles as the
/// deterministic tie-breaker for enrollments sharing a timestamp.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct EnrollmentId(i64);

impl EnrollmentId {
    /// Wraps an enrollment identifier.
    #[must_use]
    pub const fn new(value: i64) -> Self {
        Self(value)
    }

    /// Returns the raw identifier.
    #[must_use]
    pub const fn value(&self) -> i64 {
        self.0
    }
}

impl std::fmt::Display for EnrollmentId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Opaque participant identity (an account key supplied by the caller).
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct ParticipantId(String);

impl ParticipantId {
    /// Creates a participant identity from an account key.
    #[must_use]
    pub fn new(value: &str) -> Self {
        Self(value.to_string())
    }

    /// Returns the account key.
    #[must_use]
    pub fn value(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for ParticipantId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Maximum number of accepted enrollments. Zero means unlimited.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(transparent)]
pub struct CapacityLimit(u32);

impl CapacityLimit {
    /// Creates a capacity limit. Zero is unlimited.
    #[must_use]
    pub const fn new(limit: u32) -> Self {
        Self(limit)
    }

    /// An unlimited capacity.
    #[must_use]
    pub const fn unlimited() -> Self {
        Self(0)
    }

    /// Returns the raw limit (0 for unlimited).
    #[must_use]
    pub const fn value(&self) -> u32 {
        self.0
    }

    /// Returns whether this limit is unlimited.
    #[must_use]
    pub const fn is_unlimited(&self) -> bool {
        self.0 == 0
    }

    /// Returns whether one more enrollment may be accepted given the current
    /// accepted count.
    #[must_use]
    pub const fn has_room_for(&self, accepted: usize) -> bool {
        self.is_unlimited() || accepted < self.0 as usize
    }

    /// Returns whether moving from `self` to `new_limit` frees capacity.
    #[must_use]
    pub const fn grows_to(&self, new_limit: Self) -> bool {
        if self.is_unlimited() {
            return false;
        }
        new_limit.is_unlimited() || new_limit.0 > self.0
    }
}

impl std::fmt::Display for CapacityLimit {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.is_unlimited() {
            write!(f, "unlimited")
        } else {
            write!(f, "{}", self.0)
        }
    }
}

/// Capacity state of an event, derived from its accepted enrollments.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CapacityState {
    /// Fewer accepted enrollments than the limit, or no limit at all.
    UnderCapacity,
    /// Accepted enrollments exactly fill the limit.
    AtCapacity,
    /// More accepted enrollments than the limit. Only reachable by lowering
    /// the limit below the accepted count.
    OverCapacity,
}

impl CapacityState {
    /// Classifies an accepted count against a limit.
    #[must_use]
    pub fn classify(limit: CapacityLimit, accepted: usize) -> Self {
        if limit.is_unlimited() {
            return Self::UnderCapacity;
        }
        match accepted.cmp(&(limit.value() as usize)) {
            std::cmp::Ordering::Less => Self::UnderCapacity,
            std::cmp::Ordering::Equal => Self::AtCapacity,
            std::cmp::Ordering::Greater => Self::OverCapacity,
        }
    }

    /// Converts this state to a display string.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::UnderCapacity => "under_capacity",
            Self::AtCapacity => "at_capacity",
            Self::OverCapacity => "over_capacity",
        }
    }
}

/// The time frame of an event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EventSchedule {
    starts_at: OffsetDateTime,
    ends_at: OffsetDateTime,
    enrollment_deadline: OffsetDateTime,
}

impl EventSchedule {
    /// Creates a schedule. Ordering rules are checked by `validate_schedule`.
    ///
    /// # Arguments
    ///
    /// * `starts_at` - When the event begins
    /// * `ends_at` - When the event ends
    /// * `enrollment_deadline` - The last instant at which enrollment is accepted
    #[must_use]
    pub const fn new(
        starts_at: OffsetDateTime,
        ends_at: OffsetDateTime,
        enrollment_deadline: OffsetDateTime,
    ) -> Self {
        Self {
            starts_at,
            ends_at,
            enrollment_deadline,
        }
    }

    /// Returns when the event begins.
    #[must_use]
    pub const fn starts_at(&self) -> OffsetDateTime {
        self.starts_at
    }

    /// Returns when the event ends.
    #[must_use]
    pub const fn ends_at(&self) -> OffsetDateTime {
        self.ends_at
    }

    /// Returns the enrollment deadline.
    #[must_use]
    pub const fn enrollment_deadline(&self) -> OffsetDateTime {
        self.enrollment_deadline
    }

    /// Returns whether enrollment is still open at `now`.
    #[must_use]
    pub fn is_enrollment_open(&self, now: OffsetDateTime) -> bool {
        now <= self.enrollment_deadline
    }
}
