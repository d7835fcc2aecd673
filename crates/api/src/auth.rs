// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Authorization of organizer-only actions and audit attribution.

use meetup_audit::{Actor, ActorRole};
use meetup_domain::{Event, ParticipantId};
use tracing::warn;

use crate::error::ApiError;

/// Authorization checks performed at the API boundary.
///
/// The domain knows nothing about who may do what. Every organizer-only
/// request passes through here before a command is applied.
pub struct AuthorizationService;

impl AuthorizationService {
    /// Checks that `participant` organizes `event`.
    ///
    /// # Arguments
    ///
    /// * `event` - The event being acted on
    /// * `participant` - The acting participant
    /// * `action` - The name of the attempted action, for error reporting
    ///
    /// # Errors
    ///
    /// Returns `ApiError::Unauthorized` if `participant` did not create the event.
    pub fn authorize_organizer(
        event: &Event,
        participant: &ParticipantId,
        action: &str,
    ) -> Result<Actor, ApiError> {
        if !event.is_organized_by(participant) {
            warn!(
                event_id = event.event_id().value(),
                participant = %participant,
                action,
                "Rejected organizer-only action"
            );
            return Err(ApiError::Unauthorized {
                action: action.to_string(),
                event_id: event.event_id().value(),
            });
        }

        Ok(Actor::new(participant.value().to_string(), ActorRole::Organizer))
    }

    /// Builds the audit actor for a participant acting on their own behalf.
    #[must_use]
    pub fn participant_actor(participant: &ParticipantId) -> Actor {
        Actor::new(participant.value().to_string(), ActorRole::Participant)
    }
}
