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
    clippy::suspicious,
    clippy::complexity,
    clippy::perf,
    clippy::unwrap_used,
    clippy::expect_used
)]
#![allow(clippy::multiple_crate_versions)]

mod auth;
mod clock;
mod error;
mod locks;
mod notify;
mod request_response;
mod service;

#[cfg(test)]
mod tests;

pub use auth::AuthorizationService;
pub use clock::{Clock, FixedClock, SystemClock};
pub use error::{ApiError, NotificationError};
pub use locks::EventLocks;
pub use notify::{
    BroadcastNotificationSink, MemoryNotificationSink, NotificationSink, TracingNotificationSink,
};
pub use request_response::{
    AuditEntryView, CapacityResponse, CreateEventRequest, CreateEventResponse, DisenrollResponse,
    EnrollmentActionResponse, EnrollmentResponse, EnrollmentView, EventView,
};
pub use service::EnrollmentService;
