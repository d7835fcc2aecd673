// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use meetup_domain::{CapacityLimit, EnrollmentId, ParticipantId};

/// A command represents participant or organizer intent as data only.
///
/// Commands are the only way to request changes to an existing event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Enroll a participant.
    Enroll {
        /// The enrolling participant.
        participant: ParticipantId,
    },
    /// Withdraw a participant's enrollment.
    Disenroll {
        /// The withdrawing participant.
        participant: ParticipantId,
    },
    /// Replace the capacity limit (0 for unlimited).
    ChangeCapacityLimit {
        /// The new limit.
        limit: CapacityLimit,
    },
    /// Accept a waiting enrollment of a confirmative event.
    AcceptEnrollment {
        /// The enrollment to accept.
        enrollment_id: EnrollmentId,
    },
    /// Move an accepted enrollment of a confirmative event back to waiting.
    RejectEnrollment {
        /// The enrollment to reject.
        enrollment_id: EnrollmentId,
    },
    /// Mark an accepted enrollment as attended.
    CheckIn {
        /// The enrollment that checked in.
        enrollment_id: EnrollmentId,
    },
    /// Clear an attended mark.
    CancelCheckIn {
        /// The enrollment to clear.
        enrollment_id: EnrollmentId,
    },
}

impl Command {
    /// Returns the action name recorded in the audit trail.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::Enroll { .. } => "Enroll",
            Self::Disenroll { .. } => "Disenroll",
            Self::ChangeCapacityLimit { .. } => "ChangeCapacityLimit",
            Self::AcceptEnrollment { .. } => "AcceptEnrollment",
            Self::RejectEnrollment { .. } => "RejectEnrollment",
            Self::CheckIn { .. } => "CheckIn",
            Self::CancelCheckIn { .. } => "CancelCheckIn",
        }
    }
}
