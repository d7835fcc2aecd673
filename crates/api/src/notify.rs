// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Delivery of enrollment notices.
//!
//! Notices are facts about a transition that has already been stored.
//! Sinks are informational only: a failed delivery is logged by the
//! orchestrator and the stored state stands.

use meetup::EnrollmentNotice;
use std::sync::{Mutex, PoisonError};
use tokio::sync::broadcast;
use tracing::{debug, info};

use crate::error::NotificationError;

/// Maximum number of notices buffered for broadcast subscribers.
/// Subscribers that fall behind lose the oldest notices.
const NOTICE_BUFFER_SIZE: usize = 100;

/// Receives enrollment notices after a transition is stored.
pub trait NotificationSink: Send + Sync {
    /// Delivers one notice.
    ///
    /// # Errors
    ///
    /// Returns an error if the notice could not be delivered.
    fn deliver(&self, notice: &EnrollmentNotice) -> Result<(), NotificationError>;
}

/// Writes every notice to the log.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingNotificationSink;

impl NotificationSink for TracingNotificationSink {
    fn deliver(&self, notice: &EnrollmentNotice) -> Result<(), NotificationError> {
        info!(
            event_id = notice.event_id.value(),
            participant = %notice.participant,
            kind = %notice.kind,
            accepted = notice.accepted,
            "Enrollment notice"
        );
        Ok(())
    }
}

/// Fans notices out to any number of subscribers.
///
/// Sending with no subscribers is not an error.
#[derive(Debug, Clone)]
pub struct BroadcastNotificationSink {
    sender: broadcast::Sender<EnrollmentNotice>,
}

impl BroadcastNotificationSink {
    #[must_use]
    pub fn new() -> Self {
        let (sender, _receiver) = broadcast::channel(NOTICE_BUFFER_SIZE);
        Self { sender }
    }

    /// Subscribes to notices delivered from now on.
    #[must_use]
    pub fn subscribe(&self) -> broadcast::Receiver<EnrollmentNotice> {
        self.sender.subscribe()
    }
}

impl Default for BroadcastNotificationSink {
    fn default() -> Self {
        Self::new()
    }
}

impl NotificationSink for BroadcastNotificationSink {
    fn deliver(&self, notice: &EnrollmentNotice) -> Result<(), NotificationError> {
        match self.sender.send(notice.clone()) {
            Ok(receiver_count) => {
                debug!(
                    receiver_count,
                    kind = %notice.kind,
                    "Broadcast enrollment notice"
                );
            }
            Err(_) => {
                debug!(kind = %notice.kind, "No subscribers for enrollment notice");
            }
        }
        Ok(())
    }
}

/// Collects notices in memory, in delivery order.
#[derive(Debug, Default)]
pub struct MemoryNotificationSink {
    notices: Mutex<Vec<EnrollmentNotice>>,
}

impl MemoryNotificationSink {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns a copy of every notice delivered so far.
    #[must_use]
    pub fn notices(&self) -> Vec<EnrollmentNotice> {
        self.notices
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Removes and returns every notice delivered so far.
    pub fn take(&self) -> Vec<EnrollmentNotice> {
        std::mem::take(&mut *self.notices.lock().unwrap_or_else(PoisonError::into_inner))
    }
}

impl NotificationSink for MemoryNotificationSink {
    fn deliver(&self, notice: &EnrollmentNotice) -> Result<(), NotificationError> {
        self.notices
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(notice.clone());
        Ok(())
    }
}
