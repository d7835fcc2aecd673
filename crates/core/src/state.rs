// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use meetup_audit::{AuditEvent, StateSnapshot};
use meetup_domain::{Event, EventDraft, ParticipantId};
use time::OffsetDateTime;

use crate::notice::EnrollmentNotice;

/// One event together with the stored version it was loaded at.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct State {
    /// The event aggregate, including its enrollments.
    pub event: Event,
    /// Incremented by every stored transition.
    pub version: i64,
}

impl State {
    #[must_use]
    pub const fn new(event: Event, version: i64) -> Self {
        Self { event, version }
    }

    /// Converts the state to a snapshot for audit purposes.
    #[must_use]
    pub fn to_snapshot(&self) -> StateSnapshot {
        StateSnapshot::new(
            self.event.limit(),
            self.event.accepted_count(),
            self.event.waiting_list().len(),
            self.version,
        )
    }
}

/// The result of a successful state transition.
///
/// Transitions are atomic: they either succeed completely or fail without side effects.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransitionResult {
    /// The new state after the transition.
    pub new_state: State,
    /// The version the transition was computed from. The store must still
    /// hold this version for the transition to apply.
    pub base_version: i64,
    /// The audit event recording this transition.
    pub audit_event: AuditEvent,
    /// Notices to deliver once the transition is stored.
    pub notices: Vec<EnrollmentNotice>,
}

/// The result of creating an event.
///
/// The event has no identifier until the store assigns one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreationResult {
    /// The organizer.
    pub created_by: ParticipantId,
    /// The validated draft.
    pub draft: EventDraft,
    /// When the event was created.
    pub created_at: OffsetDateTime,
    /// The audit event recording the creation.
    pub audit_event: AuditEvent,
}
