// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Persistence layer for the meetup enrollment engine.
//!
//! Events, their enrollments, and the audit trail are stored in `SQLite`
//! through Diesel. Every write happens inside a single database
//! transaction, so a failed write leaves nothing behind.
//!
//! ## Versioning
//!
//! Each event row carries a version. A transition is stored only if the
//! row still holds the version the transition was computed from, which
//! rejects lost updates from concurrent writers with
//! [`PersistenceError::VersionConflict`].
//!
//! ## Testing
//!
//! [`Persistence::new_in_memory`] gives each caller its own shared-cache
//! in-memory database, so tests never see each other's rows.

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
#![allow(clippy::multiple_crate_versions)]

use diesel::{Connection, SqliteConnection};
use meetup::{CreationResult, State, TransitionResult};
use meetup_audit::AuditEvent;
use meetup_domain::EventId;
use std::path::Path;
use std::sync::atomic::{AtomicU64, Ordering};
use tracing::info;

mod backend;
mod data_models;
mod diesel_schema;
mod error;
mod mutations;
mod queries;

#[cfg(test)]
mod tests;

pub use error::PersistenceError;

/// Atomic counter for generating unique in-memory database names.
///
/// Each call to `new_in_memory()` receives a unique sequential ID.
static DB_COUNTER: AtomicU64 = AtomicU64::new(0);

/// Persistence adapter for events, enrollments, and audit events.
pub struct Persistence {
    conn: SqliteConnection,
}

impl Persistence {
    /// Creates a new persistence adapter with an in-memory `SQLite` database.
    ///
    /// Each call receives a unique database instance via atomic counter.
    ///
    /// # Errors
    ///
    /// Returns an error if the database cannot be initialized.
    pub fn new_in_memory() -> Result<Self, PersistenceError> {
        let db_id: u64 = DB_COUNTER.fetch_add(1, Ordering::SeqCst);
        let shared_memory_url: String = format!("file:memdb_test_{db_id}?mode=memory&cache=shared");

        let mut conn: SqliteConnection = backend::sqlite::initialize_database(&shared_memory_url)?;
        backend::sqlite::verify_foreign_key_enforcement(&mut conn)?;

        Ok(Self { conn })
    }

    /// Creates a new persistence adapter with a file-based `SQLite` database.
    ///
    /// Several adapters may open the same file; writers wait for each other.
    ///
    /// # Arguments
    ///
    /// * `path` - The path to the `SQLite` database file
    ///
    /// # Errors
    ///
    /// Returns an error if the database cannot be opened or initialized.
    pub fn new_with_file<P: AsRef<Path>>(path: P) -> Result<Self, PersistenceError> {
        let path_str: &str = path.as_ref().to_str().ok_or_else(|| {
            PersistenceError::InitializationError("Invalid database path".to_string())
        })?;

        let mut conn: SqliteConnection = backend::sqlite::initialize_database(path_str)?;
        backend::sqlite::enable_wal_mode(&mut conn)?;
        backend::sqlite::verify_foreign_key_enforcement(&mut conn)?;

        Ok(Self { conn })
    }

    /// Verifies that foreign key enforcement is enabled.
    ///
    /// # Errors
    ///
    /// Returns an error if foreign key enforcement is not enabled.
    pub fn verify_foreign_key_enforcement(&mut self) -> Result<(), PersistenceError> {
        backend::sqlite::verify_foreign_key_enforcement(&mut self.conn)
    }

    // ========================================================================
    // Writes
    // ========================================================================

    /// Stores a newly created event together with its creation audit event.
    ///
    /// # Returns
    ///
    /// The identifier assigned to the event.
    ///
    /// # Errors
    ///
    /// Returns an error if persistence fails. Nothing is stored in that case.
    pub fn create_event(&mut self, result: &CreationResult) -> Result<EventId, PersistenceError> {
        let event_id: EventId = self
            .conn
            .immediate_transaction::<_, PersistenceError, _>(|conn| {
                let event_id: EventId = mutations::events::insert_event(conn, result)?;
                mutations::audit::persist_audit_event(conn, event_id, &result.audit_event)?;
                Ok(event_id)
            })?;

        info!(
            event_id = event_id.value(),
            title = %result.draft.title,
            enrollment_type = %result.draft.enrollment_type,
            "Created event"
        );
        Ok(event_id)
    }

    /// Stores a transition: the new event version, its enrollments, and the
    /// audit event.
    ///
    /// # Returns
    ///
    /// The audit ID of the stored audit event.
    ///
    /// # Errors
    ///
    /// Returns `VersionConflict` if the event changed since the transition's
    /// base version was loaded. Nothing is stored in that case.
    pub fn persist_transition(&mut self, result: &TransitionResult) -> Result<i64, PersistenceError> {
        let event_id: EventId = result.new_state.event.event_id();

        let audit_id: i64 = self
            .conn
            .immediate_transaction::<_, PersistenceError, _>(|conn| {
                mutations::events::advance_event_version(
                    conn,
                    &result.new_state,
                    result.base_version,
                )?;
                mutations::events::sync_enrollments(conn, &result.new_state.event)?;
                mutations::audit::persist_audit_event(conn, event_id, &result.audit_event)
            })?;

        info!(
            event_id = event_id.value(),
            audit_id,
            version = result.new_state.version,
            action = %result.audit_event.action.name,
            "Persisted transition"
        );
        Ok(audit_id)
    }

    // ========================================================================
    // Reads
    // ========================================================================

    /// Loads an event with its enrollments and stored version.
    ///
    /// # Errors
    ///
    /// Returns `EventNotFound` if no such event exists.
    pub fn load_event(&mut self, event_id: EventId) -> Result<State, PersistenceError> {
        queries::events::load_event(&mut self.conn, event_id)
    }

    /// Loads every stored event, oldest first.
    ///
    /// # Errors
    ///
    /// Returns an error if any event cannot be loaded.
    pub fn list_events(&mut self) -> Result<Vec<State>, PersistenceError> {
        let ids: Vec<EventId> = queries::events::list_event_ids(&mut self.conn)?;
        ids.into_iter()
            .map(|event_id| queries::events::load_event(&mut self.conn, event_id))
            .collect()
    }

    /// Retrieves an audit event by its audit ID.
    ///
    /// # Errors
    ///
    /// Returns an error if the audit event is not found or cannot be deserialized.
    pub fn get_audit_event(&mut self, audit_id: i64) -> Result<AuditEvent, PersistenceError> {
        queries::audit::get_audit_event(&mut self.conn, audit_id)
    }

    /// Retrieves the audit trail of an event, oldest first.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails or a row cannot be deserialized.
    pub fn get_audit_timeline(
        &mut self,
        event_id: EventId,
    ) -> Result<Vec<AuditEvent>, PersistenceError> {
        queries::audit::get_audit_timeline(&mut self.conn, event_id)
    }
}
