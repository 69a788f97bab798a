// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@kernel.org>

//! Data models for the application.

pub mod activity;
pub mod athlete;
pub mod credential;
pub mod stream;
pub mod table;

pub use activity::RawActivity;
pub use athlete::{Athlete, Gear};
pub use credential::{Credential, CredentialState, Session};
pub use stream::{RawStream, StreamSet, StreamType};
pub use table::{Cell, Table};
