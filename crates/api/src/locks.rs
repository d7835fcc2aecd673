// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Per-event serialization of mutating requests.

use meetup_domain::EventId;
use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

type LockMap = HashMap<EventId, Arc<Mutex<()>>>;

/// Hands out one lock per event.
///
/// Requests against the same event take the same lock. Different events
/// never contend. Entries live only while some request holds them.
#[derive(Debug, Default)]
pub struct EventLocks {
    locks: Mutex<LockMap>,
}

impl EventLocks {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the lock guarding `event_id`, creating it on first use.
    ///
    /// Hand the returned handle back through [`EventLocks::release`] once
    /// the request is done with it.
    #[must_use]
    pub fn lock_for(&self, event_id: EventId) -> Arc<Mutex<()>> {
        let mut locks: MutexGuard<'_, LockMap> =
            self.locks.lock().unwrap_or_else(PoisonError::into_inner);
        Arc::clone(locks.entry(event_id).or_default())
    }

    /// Gives back a handle from [`EventLocks::lock_for`].
    ///
    /// The entry is removed when no other request holds a handle to it.
    /// Handles are only cloned under the registry mutex, so the count
    /// cannot grow between the check and the removal.
    pub fn release(&self, event_id: EventId, handle: Arc<Mutex<()>>) {
        let mut locks: MutexGuard<'_, LockMap> =
            self.locks.lock().unwrap_or_else(PoisonError::into_inner);
        drop(handle);

        if locks
            .get(&event_id)
            .is_some_and(|lock| Arc::strong_count(lock) == 1)
        {
            locks.remove(&event_id);
        }
    }

    /// Returns how many events currently have a lock entry.
    #[must_use]
    pub fn len(&self) -> usize {
        self.locks
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
