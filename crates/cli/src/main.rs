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
    clippy::unwrap_used,
    clippy::expect_used
)]
#![allow(clippy::multiple_crate_versions)]

use clap::{Parser, Subcommand};
use meetup_api::{
    ApiError, CreateEventRequest, EnrollmentService, FixedClock, TracingNotificationSink,
};
use meetup_audit::Cause;
use meetup_domain::{CapacityLimit, EnrollmentId, EventDraft, EventId, ParticipantId};
use meetup_persistence::{Persistence, PersistenceError};
use std::process::ExitCode;
use thiserror::Error;
use time::OffsetDateTime;
use time::format_description::well_known::Rfc3339;
use tracing::{error, info};

type CliService = EnrollmentService<FixedClock, TracingNotificationSink>;

/// Meetup enrollment engine
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Path to the `SQLite` database file. If not provided, uses in-memory database.
    #[arg(short, long, global = true)]
    database: Option<String>,

    /// Treat this RFC 3339 timestamp as the current time.
    #[arg(long, global = true, value_parser = parse_timestamp)]
    now: Option<OffsetDateTime>,

    /// Reason recorded in the audit trail.
    #[arg(long, global = true, default_value = "Requested from the command line")]
    cause: String,

    #[command(subcommand)]
    command: CliCommand,
}

#[derive(Subcommand, Debug, PartialEq, Eq)]
enum CliCommand {
    /// Create an event.
    CreateEvent {
        /// The organizing participant.
        #[arg(long)]
        organizer: String,
        #[arg(long)]
        title: String,
        /// FCFS or CONFIRMATIVE.
        #[arg(long = "type", default_value = "FCFS")]
        enrollment_type: String,
        /// Maximum accepted participants; 0 means unlimited.
        #[arg(long, default_value_t = 0)]
        limit: u32,
        #[arg(long, value_parser = parse_timestamp)]
        starts_at: OffsetDateTime,
        #[arg(long, value_parser = parse_timestamp)]
        ends_at: OffsetDateTime,
        #[arg(long, value_parser = parse_timestamp)]
        deadline: OffsetDateTime,
    },
    /// Enroll a participant.
    Enroll {
        #[arg(long)]
        event: i64,
        #[arg(long)]
        participant: String,
    },
    /// Withdraw a participant.
    Disenroll {
        #[arg(long)]
        event: i64,
        #[arg(long)]
        participant: String,
    },
    /// Change an event's capacity limit.
    SetLimit {
        #[arg(long)]
        event: i64,
        #[arg(long)]
        organizer: String,
        /// The new limit; 0 means unlimited.
        #[arg(long)]
        limit: u32,
    },
    /// Accept a waiting enrollment (confirmative events).
    Accept {
        #[arg(long)]
        event: i64,
        #[arg(long)]
        organizer: String,
        #[arg(long)]
        enrollment: i64,
    },
    /// Return an accepted enrollment to the waiting list (confirmative events).
    Reject {
        #[arg(long)]
        event: i64,
        #[arg(long)]
        organizer: String,
        #[arg(long)]
        enrollment: i64,
    },
    /// Record attendance.
    CheckIn {
        #[arg(long)]
        event: i64,
        #[arg(long)]
        organizer: String,
        #[arg(long)]
        enrollment: i64,
    },
    /// Clear recorded attendance.
    CancelCheckIn {
        #[arg(long)]
        event: i64,
        #[arg(long)]
        organizer: String,
        #[arg(long)]
        enrollment: i64,
    },
    /// Show one event.
    Show {
        #[arg(long)]
        event: i64,
    },
    /// List all events.
    List,
    /// Show an event's audit trail.
    Audit {
        #[arg(long)]
        event: i64,
    },
}

#[derive(Debug, Error)]
enum CliError {
    #[error(transparent)]
    Api(#[from] ApiError),
    #[error("Failed to render output: {0}")]
    Output(#[from] serde_json::Error),
}

impl CliError {
    fn user_message(&self) -> String {
        match self {
            Self::Api(err) => err.user_message(),
            Self::Output(err) => err.to_string(),
        }
    }
}

impl From<PersistenceError> for CliError {
    fn from(err: PersistenceError) -> Self {
        Self::Api(ApiError::from(err))
    }
}

fn parse_timestamp(value: &str) -> Result<OffsetDateTime, String> {
    OffsetDateTime::parse(value, &Rfc3339).map_err(|e| format!("invalid RFC 3339 timestamp: {e}"))
}

fn open_persistence(database: Option<&str>) -> Result<Persistence, PersistenceError> {
    if let Some(path) = database {
        info!(path, "Using file-based database");
        Persistence::new_with_file(path)
    } else {
        info!("Using in-memory database");
        Persistence::new_in_memory()
    }
}

fn render<T: serde::Serialize>(value: &T) -> Result<String, CliError> {
    Ok(serde_json::to_string_pretty(value)?)
}

#[allow(clippy::too_many_lines)]
fn run(args: &Args) -> Result<String, CliError> {
    let mut persistence: Persistence = open_persistence(args.database.as_deref())?;
    let clock: FixedClock = FixedClock::new(args.now.unwrap_or_else(OffsetDateTime::now_utc));
    let service: CliService = EnrollmentService::new(clock, TracingNotificationSink);
    let cause: Cause = Cause::new(String::from("cli"), args.cause.clone());
    let db: &mut Persistence = &mut persistence;

    match &args.command {
        CliCommand::CreateEvent {
            organizer,
            title,
            enrollment_type,
            limit,
            starts_at,
            ends_at,
            deadline,
        } => {
            let request: CreateEventRequest = CreateEventRequest {
                title: title.clone(),
                enrollment_type: enrollment_type.clone(),
                limit: *limit,
                starts_at: *starts_at,
                ends_at: *ends_at,
                enrollment_deadline: *deadline,
            };
            let draft: EventDraft = request.to_draft().map_err(ApiError::from)?;
            render(&service.create_event(db, &ParticipantId::new(organizer), draft, cause)?)
        }
        CliCommand::Enroll { event, participant } => render(&service.request_enroll(
            db,
            EventId::new(*event),
            &ParticipantId::new(participant),
            cause,
        )?),
        CliCommand::Disenroll { event, participant } => render(&service.request_disenroll(
            db,
            EventId::new(*event),
            &ParticipantId::new(participant),
            cause,
        )?),
        CliCommand::SetLimit {
            event,
            organizer,
            limit,
        } => render(&service.update_capacity(
            db,
            EventId::new(*event),
            &ParticipantId::new(organizer),
            CapacityLimit::new(*limit),
            cause,
        )?),
        CliCommand::Accept {
            event,
            organizer,
            enrollment,
        } => render(&service.accept_enrollment(
            db,
            EventId::new(*event),
            &ParticipantId::new(organizer),
            EnrollmentId::new(*enrollment),
            cause,
        )?),
        CliCommand::Reject {
            event,
            organizer,
            enrollment,
        } => render(&service.reject_enrollment(
            db,
            EventId::new(*event),
            &ParticipantId::new(organizer),
            EnrollmentId::new(*enrollment),
            cause,
        )?),
        CliCommand::CheckIn {
            event,
            organizer,
            enrollment,
        } => render(&service.check_in(
            db,
            EventId::new(*event),
            &ParticipantId::new(organizer),
            EnrollmentId::new(*enrollment),
            cause,
        )?),
        CliCommand::CancelCheckIn {
            event,
            organizer,
            enrollment,
        } => render(&service.cancel_check_in(
            db,
            EventId::new(*event),
            &ParticipantId::new(organizer),
            EnrollmentId::new(*enrollment),
            cause,
        )?),
        CliCommand::Show { event } => render(&service.get_event(db, EventId::new(*event))?),
        CliCommand::List => render(&service.list_events(db)?),
        CliCommand::Audit { event } => {
            render(&service.audit_timeline(db, EventId::new(*event))?)
        }
    }
}

fn main() -> ExitCode {
    let args: Args = Args::parse();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    match run(&args) {
        Ok(output) => {
            println!("{output}");
            ExitCode::SUCCESS
        }
        Err(err) => {
            error!(error = %err, "Command failed");
            eprintln!("{}", err.user_message());
            ExitCode::FAILURE
        }
    }
}
