// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! State-changing operations for the persistence layer.
//!
//! Mutations run inside the transaction opened by the `Persistence`
//! adapter and never open their own.
//!
//! - `events`: Event rows, version bumps, and enrollment sync
//! - `audit`: Audit event rows

pub mod audit;
pub mod events;
