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
    clippy::all
)]

use meetup_domain::{CapacityLimit, EventId};
use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

#[cfg(test)]
mod tests;

/// The role under which an actor changed an event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActorRole {
    /// A participant acting on their own enrollment.
    Participant,
    /// The organizer of the event.
    Organizer,
    /// An internal process.
    System,
}

impl ActorRole {
    /// Converts this role to its stored string representation.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Participant => "participant",
            Self::Organizer => "organizer",
            Self::System => "system",
        }
    }

    /// Parses a stored role string.
    #[must_use]
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "participant" => Some(Self::Participant),
            "organizer" => Some(Self::Organizer),
            "system" => Some(Self::System),
            _ => None,
        }
    }
}

impl std::fmt::Display for ActorRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Represents the entity performing an action.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Actor {
    /// The participant identity or process name.
    pub id: String,
    /// The role the actor acted under.
    pub role: ActorRole,
}

impl Actor {
    /// Creates a new Actor.
    ///
    /// # Arguments
    ///
    /// * `id` - The unique identifier for this actor
    /// * `role` - The role the actor acted under
    #[must_use]
    pub const fn new(id: String, role: ActorRole) -> Self {
        Self { id, role }
    }
}

/// Represents the reason or trigger for an action.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Cause {
    /// A unique identifier for this cause (e.g., request ID).
    pub id: String,
    /// A description of the cause.
    pub description: String,
}

impl Cause {
    #[must_use]
    pub const fn new(id: String, description: String) -> Self {
        Self { id, description }
    }
}

/// Represents the specific action performed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Action {
    /// The name of the action (e.g., "`Enroll`", "`ChangeCapacityLimit`").
    pub name: String,
    /// Optional additional details about the action.
    pub details: Option<String>,
}

impl Action {
    #[must_use]
    pub const fn new(name: String, details: Option<String>) -> Self {
        Self { name, details }
    }
}

/// The capacity picture of an event at a point in time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct StateSnapshot {
    /// The capacity limit (0 for unlimited).
    pub limit: CapacityLimit,
    /// Number of accepted enrollments.
    pub accepted: usize,
    /// Number of waiting enrollments.
    pub waiting: usize,
    /// The event version the snapshot was taken at.
    pub version: i64,
}

impl StateSnapshot {
    #[must_use]
    pub const fn new(limit: CapacityLimit, accepted: usize, waiting: usize, version: i64) -> Self {
        Self {
            limit,
            accepted,
            waiting,
            version,
        }
    }

    /// The snapshot of an event that does not exist yet.
    #[must_use]
    pub const fn empty() -> Self {
        Self::new(CapacityLimit::unlimited(), 0, 0, 0)
    }
}

impl std::fmt::Display for StateSnapshot {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "limit={} accepted={} waiting={} version={}",
            self.limit, self.accepted, self.waiting, self.version
        )
    }
}

/// An immutable audit event representing a state transition.
///
/// Every successful state change must produce exactly one audit event.
/// Audit events are immutable once created and capture:
/// - Who performed the action (actor)
/// - Why it was performed (cause)
/// - What action was performed (action)
/// - The capacity picture before and after the transition
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuditEvent {
    /// The store-assigned identifier. `None` until persisted.
    pub audit_id: Option<i64>,
    /// The event this transition belongs to. `None` for an event that is
    /// being created and has no identifier yet.
    pub event_id: Option<EventId>,
    /// The actor who initiated this state change.
    pub actor: Actor,
    /// The cause or reason for this state change.
    pub cause: Cause,
    /// The action that was performed.
    pub action: Action,
    /// The state before the transition.
    pub before: StateSnapshot,
    /// The state after the transition.
    pub after: StateSnapshot,
    /// When the transition happened.
    pub recorded_at: OffsetDateTime,
}

impl AuditEvent {
    /// Creates a new, not yet persisted `AuditEvent`.
    ///
    /// # Arguments
    ///
    /// * `event_id` - The event the transition belongs to, if it exists yet
    /// * `actor` - The actor who initiated the change
    /// * `cause` - The reason for the change
    /// * `action` - The action that was performed
    /// * `before` - The state before the transition
    /// * `after` - The state after the transition
    /// * `recorded_at` - When the transition happened
    #[must_use]
    pub const fn new(
        event_id: Option<EventId>,
        actor: Actor,
        cause: Cause,
        action: Action,
        before: StateSnapshot,
        after: StateSnapshot,
        recorded_at: OffsetDateTime,
    ) -> Self {
        Self {
            audit_id: None,
            event_id,
            actor,
            cause,
            action,
            before,
            after,
            recorded_at,
        }
    }

    /// Returns this audit event bound to a stored identifier.
    #[must_use]
    pub const fn with_audit_id(mut self, audit_id: i64) -> Self {
        self.audit_id = Some(audit_id);
        self
    }

    /// Returns this audit event bound to an event.
    #[must_use]
    pub const fn with_event_id(mut self, event_id: EventId) -> Self {
        self.event_id = Some(event_id);
        self
    }
}
