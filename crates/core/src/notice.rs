// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use meetup_domain::{Enrollment, EventId, ParticipantId};

/// What happened to a participant's enrollment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NoticeKind {
    /// Enrolled with a confirmed seat.
    Enrolled,
    /// Enrolled onto the waiting list.
    Waitlisted,
    /// Withdrew from the event.
    Disenrolled,
    /// Moved from the waiting list into a seat.
    Promoted,
    /// Accepted by the organizer.
    Accepted,
    /// Sent back to the waiting list by the organizer.
    Rejected,
}

impl NoticeKind {
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Enrolled => "enrolled",
            Self::Waitlisted => "waitlisted",
            Self::Disenrolled => "disenrolled",
            Self::Promoted => "promoted",
            Self::Accepted => "accepted",
            Self::Rejected => "rejected",
        }
    }
}

impl std::fmt::Display for NoticeKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A fact about one participant's enrollment, produced by a transition and
/// delivered after it is stored.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EnrollmentNotice {
    /// What happened.
    pub kind: NoticeKind,
    /// The event.
    pub event_id: EventId,
    /// The affected participant.
    pub participant: ParticipantId,
    /// Whether the participant holds a seat afterwards.
    pub accepted: bool,
}

impl EnrollmentNotice {
    /// Builds a notice from the enrollment it concerns.
    #[must_use]
    pub fn for_enrollment(kind: NoticeKind, event_id: EventId, enrollment: &Enrollment) -> Self {
        Self {
            kind,
            event_id,
            participant: enrollment.participant().clone(),
            accepted: enrollment.is_accepted(),
        }
    }
}
