// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.
//
// Copyright 2026 Edgecast Cloud LLC.

//! Datera storage REST API types
//!
//! This crate holds the data shapes exchanged with the Datera management
//! REST service. It has no behavior of its own: the `datera-client` crate
//! performs requests and decodes responses into these records.
//!
//! Two families of types live here:
//!
//! - **Envelopes** ([`ApiOuter`], [`ApiListOuter`], [`ErrorResponse`], ...)
//!   wrap every response the service sends back.
//! - **Resource schemas** ([`AppInstance`], [`StorageInstance`],
//!   [`Volume`], ...) are the static view of the `data` payload for a
//!   given resource path. The client can always fall back to the raw JSON
//!   when a field is missing from a schema.

pub mod types;

pub use types::*;
